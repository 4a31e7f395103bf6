//! Panel controls and their display state.

use crate::config::Value;
use crate::error::GuiError;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Handle to a control in a [`PathRegistry`](crate::registry::PathRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub(crate) usize);

impl ControlId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which controls a query returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Folder,
    Value,
    Any,
}

impl ControlKind {
    pub fn matches(self, path: &str) -> bool {
        match self {
            ControlKind::Folder => path.ends_with('/'),
            ControlKind::Value => !path.ends_with('/'),
            ControlKind::Any => true,
        }
    }
}

impl FromStr for ControlKind {
    type Err = GuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FOLDER_CONTROL" | "FOLDER" => Ok(ControlKind::Folder),
            "VALUE_CONTROL" | "VALUE" => Ok(ControlKind::Value),
            "ANY_CONTROL" | "ANY" => Ok(ControlKind::Any),
            _ => Err(GuiError::UnknownControlKind(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    Folder,
    /// Slider when a range is present, drag value otherwise.
    Number {
        range: Option<RangeInclusive<f64>>,
        step: Option<f64>,
    },
    Options(Vec<String>),
    Checkbox,
    Text,
    /// Button invoking the named action.
    Button(String),
}

#[derive(Clone, Debug)]
pub struct Control {
    pub(crate) path: String,
    pub(crate) name: String,
    pub(crate) widget: Widget,
    pub(crate) value_path: Vec<String>,
    pub(crate) display: Option<Value>,
    pub(crate) enabled: bool,
    pub(crate) invalid: bool,
    pub(crate) open_request: Option<bool>,
    pub(crate) children: Vec<ControlId>,
}

impl Control {
    pub(crate) fn new(path: String, name: &str, widget: Widget, value_path: Vec<String>, display: Option<Value>) -> Self {
        Self {
            path,
            name: name.to_string(),
            widget,
            value_path,
            display,
            enabled: true,
            invalid: false,
            open_request: None,
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    /// Value the widget currently shows, which may lag the bound value
    /// until the display is refreshed.
    pub fn display(&self) -> Option<&Value> {
        self.display.as_ref()
    }

    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    pub fn is_folder(&self) -> bool {
        self.path.ends_with('/')
    }

    /// The top-level container at `/`, drawn without a header.
    pub fn is_root_container(&self) -> bool {
        self.path == "/"
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn has_open_request(&self) -> bool {
        self.open_request.is_some()
    }

    /// Expands the folder on the next draw.
    pub fn open(&mut self) {
        self.open_request = Some(true);
    }

    pub fn close(&mut self) {
        self.open_request = Some(false);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.invalid = false;
    }

    pub fn disable(&mut self, invalid: bool) {
        self.enabled = false;
        self.invalid = invalid;
    }

    pub(crate) fn accepts(&self, value: &Value) -> bool {
        match (&self.widget, value) {
            (Widget::Number { .. }, Value::Number(n)) => n.is_finite(),
            (Widget::Checkbox, Value::Bool(_)) => true,
            (Widget::Text, Value::Text(_)) => true,
            (Widget::Options(choices), Value::Text(s)) => choices.contains(s),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_by_trailing_slash() {
        assert!(ControlKind::Folder.matches("/A/"));
        assert!(!ControlKind::Folder.matches("/A/x"));
        assert!(ControlKind::Value.matches("/A/x"));
        assert!(!ControlKind::Value.matches("/"));
        assert!(ControlKind::Any.matches("/A/") && ControlKind::Any.matches("/A/x"));
    }

    #[test]
    fn parses_kind_names() {
        assert_eq!("FOLDER_CONTROL".parse::<ControlKind>(), Ok(ControlKind::Folder));
        assert_eq!("value".parse::<ControlKind>(), Ok(ControlKind::Value));
        assert_eq!("ANY_CONTROL".parse::<ControlKind>(), Ok(ControlKind::Any));
        assert_eq!(
            "LEAF".parse::<ControlKind>(),
            Err(GuiError::UnknownControlKind("LEAF".to_string()))
        );
    }

    #[test]
    fn enable_clears_invalid() {
        let mut c = Control::new("/x".to_string(), "x", Widget::Checkbox, vec!["x".to_string()], Some(Value::Bool(true)));
        c.disable(true);
        assert!(!c.is_enabled() && c.is_invalid());
        c.enable();
        assert!(c.is_enabled() && !c.is_invalid());
    }

    #[test]
    fn options_accept_only_choices() {
        let c = Control::new(
            "/o".to_string(),
            "o",
            Widget::Options(vec!["A".to_string(), "B".to_string()]),
            vec!["o".to_string()],
            Some(Value::from("A")),
        );
        assert!(c.accepts(&Value::from("B")));
        assert!(!c.accepts(&Value::from("C")));
        assert!(!c.accepts(&Value::Number(1.0)));
    }
}
