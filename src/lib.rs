//! Property-panel generation for egui.
//!
//! A nested configuration tree (usually loaded from JSON) is turned into a
//! panel of folders and widgets. Every control gets a `/`-separated path,
//! values live in a [`ValueTree`](values::ValueTree) shaped like the
//! configuration, and controls can be selected in bulk with wildcard
//! patterns such as `/Inputs/*`.

pub mod builder;
pub mod config;
pub mod controls;
pub mod error;
pub mod manager;
pub mod query;
pub mod registry;
pub mod settings;
pub mod values;

pub use config::{ConfigNode, Folder, NumberSlider, OptionSelect, Value};
pub use controls::{Control, ControlId, ControlKind, Widget};
pub use error::{ConfigError, GuiError};
pub use manager::GuiManager;
pub use values::{BoundNode, ValueTree};
