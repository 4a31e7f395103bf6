//! Flat path-to-control registry of a built panel.

use crate::controls::{Control, ControlId, ControlKind};
use crate::error::GuiResult;
use crate::query::pattern_to_regex;
use std::collections::HashMap;

/// Controls in build order (folders before their children), indexed by path.
#[derive(Clone, Debug, Default)]
pub struct PathRegistry {
    controls: Vec<Control>,
    index: HashMap<String, ControlId>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, control: Control) -> ControlId {
        let id = ControlId(self.controls.len());
        self.index.insert(control.path.clone(), id);
        self.controls.push(control);
        id
    }

    pub(crate) fn add_child(&mut self, parent: ControlId, child: ControlId) {
        if let Some(p) = self.controls.get_mut(parent.0) {
            p.children.push(child);
        }
    }

    /// The first control of the build: the folder at the base path.
    pub fn top(&self) -> Option<ControlId> {
        (!self.controls.is_empty()).then_some(ControlId(0))
    }

    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0)
    }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(id.0)
    }

    pub fn lookup(&self, path: &str) -> Option<ControlId> {
        self.index.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlId, &Control)> {
        self.controls.iter().enumerate().map(|(i, c)| (ControlId(i), c))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Control> {
        self.controls.iter_mut()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|c| c.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Controls whose path matches the glob pattern, in registry order.
    pub fn query(&self, pattern: &str, kind: ControlKind) -> GuiResult<Vec<ControlId>> {
        let regex = pattern_to_regex(pattern)?;
        Ok(self
            .iter()
            .filter(|(_, c)| regex.is_match(&c.path) && kind.matches(&c.path))
            .map(|(id, _)| id)
            .collect())
    }
}
