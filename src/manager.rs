//! Panel manager: owns the built controls and bound values, dispatches
//! widget changes to the change handler and button clicks to actions.
//!
//! `S` is the application state handed to every handler, so handlers work
//! on explicit state rather than globals.

use crate::builder::build;
use crate::config::{ConfigNode, Value};
use crate::controls::{Control, ControlId, ControlKind, Widget};
use crate::error::{ConfigResult, GuiError, GuiResult};
use crate::registry::PathRegistry;
use crate::values::{BoundNode, ValueTree};
use std::collections::HashMap;

type ChangeHandler<S> = Box<dyn FnMut(&mut S, &mut ValueTree, &str, &Value)>;
type ActionHandler<S> = Box<dyn FnMut(&mut S, &mut ValueTree)>;

pub struct GuiManager<S> {
    pub(crate) registry: PathRegistry,
    pub(crate) values: ValueTree,
    on_change: Option<ChangeHandler<S>>,
    actions: HashMap<String, ActionHandler<S>>,
}

impl<S> Default for GuiManager<S> {
    fn default() -> Self {
        Self {
            registry: PathRegistry::new(),
            values: ValueTree::new(),
            on_change: None,
            actions: HashMap::new(),
        }
    }
}

impl<S> GuiManager<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the panel with one built from `config`. On error the
    /// previous panel is kept. Handlers survive a rebuild.
    pub fn make_gui(&mut self, config: &ConfigNode, base_path: &str) -> ConfigResult<&ValueTree> {
        let (values, registry) = build(config, base_path)?;
        self.values = values;
        self.registry = registry;
        Ok(&self.values)
    }

    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    pub fn values(&self) -> &ValueTree {
        &self.values
    }

    /// Direct access for external updates. Call
    /// [`refresh_display`](Self::refresh_display) afterwards so widgets
    /// show the new values.
    pub fn values_mut(&mut self) -> &mut ValueTree {
        &mut self.values
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.registry.get(id)
    }

    pub fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.registry.get_mut(id)
    }

    pub fn lookup(&self, path: &str) -> Option<ControlId> {
        self.registry.lookup(path)
    }

    pub fn controls(&self, pattern: &str, kind: ControlKind) -> GuiResult<Vec<ControlId>> {
        self.registry.query(pattern, kind)
    }

    pub fn for_each_control(
        &mut self,
        pattern: &str,
        kind: ControlKind,
        mut f: impl FnMut(&mut Control),
    ) -> GuiResult<()> {
        for id in self.registry.query(pattern, kind)? {
            if let Some(control) = self.registry.get_mut(id) {
                f(control);
            }
        }
        Ok(())
    }

    /// Sets the change handler, dropping any previous one.
    pub fn on_change(&mut self, handler: impl FnMut(&mut S, &mut ValueTree, &str, &Value) + 'static) {
        self.on_change = Some(Box::new(handler));
    }

    pub fn register_action(&mut self, name: impl Into<String>, handler: impl FnMut(&mut S, &mut ValueTree) + 'static) {
        self.actions.insert(name.into(), Box::new(handler));
    }

    /// Copies every bound leaf value into its widget.
    pub fn refresh_display(&mut self) {
        let values = &self.values;
        for control in self.registry.iter_mut() {
            if control.is_folder() || control.display.is_none() {
                continue;
            }
            if let Some(BoundNode::Value(v)) = values.lookup(&control.value_path) {
                control.display = Some(v.clone());
            }
        }
    }

    /// Applies a value coming from a widget: updates the widget, the bound
    /// leaf, then calls the change handler.
    pub fn apply_widget_value(&mut self, id: ControlId, value: Value, state: &mut S) -> GuiResult<()> {
        let control = self.registry.get_mut(id).ok_or(GuiError::UnknownControl(id.index()))?;
        if control.is_folder() || matches!(control.widget, Widget::Button(_)) {
            return Err(GuiError::NotAValueControl(control.path.clone()));
        }
        if !control.accepts(&value) {
            return Err(GuiError::TypeMismatch {
                path: control.path.clone(),
                value: value.to_string(),
            });
        }
        control.display = Some(value.clone());
        let path = control.path.clone();
        self.values.set_at(&control.value_path, value.clone());

        if let Some(handler) = self.on_change.as_mut() {
            handler(state, &mut self.values, &path, &value);
        }
        Ok(())
    }

    /// Runs the action bound to a button control.
    pub fn trigger_action(&mut self, id: ControlId, state: &mut S) -> GuiResult<()> {
        let control = self.registry.get(id).ok_or(GuiError::UnknownControl(id.index()))?;
        let Widget::Button(action) = &control.widget else {
            return Err(GuiError::NotAnAction(control.path.clone()));
        };
        match self.actions.get_mut(action) {
            Some(handler) => handler(state, &mut self.values),
            None => log::warn!("no handler registered for action {action:?} at {}", control.path),
        }
        Ok(())
    }
}
