//! Configuration trees describing a property panel.
//!
//! A tree is a folder of named nodes. Leaves hold plain values, descriptors
//! add a slider range or an option list, and actions name a handler that is
//! registered on the panel. Trees can be assembled in code or loaded from
//! JSON using the `val`/`min`/`max`/`inc`/`options` descriptor keys.

use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value as Json};
use std::fmt;
use std::ops::RangeInclusive;

const DESCRIPTOR_VALUE_KEY: &str = "val";
const SLIDER_KEYS: [&str; 4] = ["val", "min", "max", "inc"];
const OPTIONS_KEY: &str = "options";
const ACTION_KEY: &str = "action";

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when both values are the same variant.
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Number control with an optional range and increment.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberSlider {
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl NumberSlider {
    pub fn new(value: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            value,
            min: Some(min),
            max: Some(max),
            step: Some(step),
        }
    }

    /// Range shown by the slider, present only when both bounds are set.
    pub fn range(&self) -> Option<RangeInclusive<f64>> {
        Some(self.min?..=self.max?)
    }

    pub(crate) fn validate(&self, path: &str) -> ConfigResult<()> {
        let malformed = |reason: String| ConfigError::MalformedDescriptor {
            path: path.to_string(),
            reason,
        };
        let fields = [
            ("val", Some(self.value)),
            ("min", self.min),
            ("max", self.max),
            ("inc", self.step),
        ];
        for (key, n) in fields {
            if let Some(n) = n {
                if !n.is_finite() {
                    return Err(malformed(format!("{key} is not a finite number")));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(malformed(format!("min {min} is greater than max {max}")));
            }
        }
        if let Some(step) = self.step {
            if step <= 0.0 {
                return Err(malformed(format!("inc {step} must be positive")));
            }
        }
        Ok(())
    }
}

/// Drop-down selection over a fixed list of choices.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionSelect {
    pub value: String,
    pub choices: Vec<String>,
}

impl OptionSelect {
    pub fn new<I, S>(value: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            value: value.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn validate(&self, path: &str) -> ConfigResult<()> {
        if self.choices.is_empty() {
            return Err(ConfigError::MalformedDescriptor {
                path: path.to_string(),
                reason: "options list is empty".to_string(),
            });
        }
        if !self.choices.contains(&self.value) {
            return Err(ConfigError::MalformedDescriptor {
                path: path.to_string(),
                reason: format!("{:?} is not one of the options", self.value),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigNode {
    Leaf(Value),
    Slider(NumberSlider),
    Options(OptionSelect),
    /// Button bound to the named action handler.
    Action(String),
    Folder(Folder),
}

impl ConfigNode {
    pub fn slider(value: f64, min: f64, max: f64, step: f64) -> Self {
        ConfigNode::Slider(NumberSlider::new(value, min, max, step))
    }

    pub fn options<I, S>(value: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConfigNode::Options(OptionSelect::new(value, choices))
    }

    pub fn action(name: impl Into<String>) -> Self {
        ConfigNode::Action(name.into())
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ConfigNode::Folder(_))
    }

    /// Parses a panel description. The root must be a non-empty object.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let json: Json = serde_json::from_str(text)?;
        Self::from_json_value(&json)
    }

    pub fn from_json_value(json: &Json) -> ConfigResult<Self> {
        let root = json.as_object().ok_or(ConfigError::NotAnObject)?;
        if root.is_empty() {
            return Err(ConfigError::EmptyRoot);
        }
        folder_from_json(root, "/").map(ConfigNode::Folder)
    }
}

impl From<Value> for ConfigNode {
    fn from(v: Value) -> Self {
        ConfigNode::Leaf(v)
    }
}

impl From<f64> for ConfigNode {
    fn from(n: f64) -> Self {
        ConfigNode::Leaf(Value::Number(n))
    }
}

impl From<bool> for ConfigNode {
    fn from(b: bool) -> Self {
        ConfigNode::Leaf(Value::Bool(b))
    }
}

impl From<&str> for ConfigNode {
    fn from(s: &str) -> Self {
        ConfigNode::Leaf(Value::Text(s.to_string()))
    }
}

impl From<NumberSlider> for ConfigNode {
    fn from(s: NumberSlider) -> Self {
        ConfigNode::Slider(s)
    }
}

impl From<OptionSelect> for ConfigNode {
    fn from(o: OptionSelect) -> Self {
        ConfigNode::Options(o)
    }
}

impl From<Folder> for ConfigNode {
    fn from(f: Folder) -> Self {
        ConfigNode::Folder(f)
    }
}

/// Ordered list of named children. Order is display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Folder {
    entries: Vec<(String, ConfigNode)>,
}

impl Folder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, node: impl Into<ConfigNode>) -> Self {
        self.push(name, node);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, node: impl Into<ConfigNode>) {
        self.entries.push((name.into(), node.into()));
    }

    pub fn get(&self, name: &str) -> Option<&ConfigNode> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(n, node)| (n.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, ConfigNode)> for Folder {
    fn from_iter<T: IntoIterator<Item = (N, ConfigNode)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, node)| (n.into(), node)).collect(),
        }
    }
}

fn folder_from_json(map: &Map<String, Json>, path: &str) -> ConfigResult<Folder> {
    let mut folder = Folder::new();
    for (name, json) in map {
        let node = node_from_json(json, &format!("{path}{name}"))?;
        folder.push(name.as_str(), node);
    }
    Ok(folder)
}

fn node_from_json(json: &Json, path: &str) -> ConfigResult<ConfigNode> {
    match json {
        Json::Bool(b) => Ok(ConfigNode::Leaf(Value::Bool(*b))),
        Json::Number(n) => n
            .as_f64()
            .map(|n| ConfigNode::Leaf(Value::Number(n)))
            .ok_or_else(|| ConfigError::UnsupportedValue(path.to_string())),
        Json::String(s) => Ok(ConfigNode::Leaf(Value::Text(s.clone()))),
        Json::Object(map) => {
            if map.is_empty() {
                return Err(ConfigError::EmptyFolder(format!("{path}/")));
            }
            if map.contains_key(DESCRIPTOR_VALUE_KEY) {
                return descriptor_from_json(map, path);
            }
            if map.len() == 1 {
                if let Some(Json::String(action)) = map.get(ACTION_KEY) {
                    return Ok(ConfigNode::Action(action.clone()));
                }
            }
            folder_from_json(map, &format!("{path}/")).map(ConfigNode::Folder)
        }
        Json::Null | Json::Array(_) => Err(ConfigError::UnsupportedValue(path.to_string())),
    }
}

fn descriptor_from_json(map: &Map<String, Json>, path: &str) -> ConfigResult<ConfigNode> {
    let malformed = |reason: String| ConfigError::MalformedDescriptor {
        path: path.to_string(),
        reason,
    };

    if let Some(options) = map.get(OPTIONS_KEY) {
        if let Some(key) = map.keys().find(|k| *k != DESCRIPTOR_VALUE_KEY && *k != OPTIONS_KEY) {
            return Err(malformed(format!("unexpected key {key:?}")));
        }
        let choices = options
            .as_array()
            .ok_or_else(|| malformed("options is not a list".to_string()))?
            .iter()
            .map(|c| c.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| malformed("options must all be strings".to_string()))?;
        let value = map[DESCRIPTOR_VALUE_KEY]
            .as_str()
            .ok_or_else(|| malformed("val of an option list must be a string".to_string()))?;
        let select = OptionSelect::new(value, choices);
        select.validate(path)?;
        return Ok(ConfigNode::Options(select));
    }

    let mut numbers = [None; 4];
    for (key, json) in map {
        let slot = SLIDER_KEYS
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| malformed(format!("unexpected key {key:?}")))?;
        let n = json
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| malformed(format!("{key} is not a finite number")))?;
        numbers[slot] = Some(n);
    }
    let [value, min, max, step] = numbers;
    let slider = NumberSlider {
        value: value.ok_or_else(|| malformed("missing val".to_string()))?,
        min,
        max,
        step,
    };
    slider.validate(path)?;
    Ok(ConfigNode::Slider(slider))
}
