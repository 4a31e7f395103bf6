//! Live values bound to panel controls.
//!
//! The tree has the same shape as the configuration it was built from but
//! keeps only the current value of each leaf. Paths are `/`-separated; a
//! leading or trailing slash is ignored.

use crate::config::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum BoundNode {
    Value(Value),
    /// Placeholder for an action leaf, which has no value.
    Action,
    Folder(ValueTree),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueTree {
    entries: Vec<(String, BoundNode)>,
}

impl ValueTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&BoundNode> {
        let mut segments = segments(path);
        let first = segments.next()?;
        segments.try_fold(self.entry(first)?, |node, name| match node {
            BoundNode::Folder(tree) => tree.entry(name),
            _ => None,
        })
    }

    pub fn value(&self, path: &str) -> Option<&Value> {
        match self.get(path)? {
            BoundNode::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn number(&self, path: &str) -> Option<f64> {
        self.value(path)?.as_number()
    }

    pub fn boolean(&self, path: &str) -> Option<bool> {
        self.value(path)?.as_bool()
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.value(path)?.as_text()
    }

    pub fn folder(&self, path: &str) -> Option<&ValueTree> {
        if segments(path).next().is_none() {
            return Some(self);
        }
        match self.get(path)? {
            BoundNode::Folder(tree) => Some(tree),
            _ => None,
        }
    }

    /// Overwrites an existing leaf. The new value must have the leaf's kind;
    /// returns false and leaves the tree untouched otherwise.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> bool {
        let segments: Vec<&str> = segments(path).collect();
        self.set_at(&segments, value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundNode)> {
        self.entries.iter().map(|(n, node)| (n.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn set_at<S: AsRef<str>>(&mut self, segments: &[S], value: Value) -> bool {
        match self.lookup_mut(segments) {
            Some(BoundNode::Value(current)) if current.same_kind(&value) => {
                *current = value;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Option<&BoundNode> {
        let (first, rest) = segments.split_first()?;
        rest.iter().try_fold(self.entry(first.as_ref())?, |node, name| match node {
            BoundNode::Folder(tree) => tree.entry(name.as_ref()),
            _ => None,
        })
    }

    fn lookup_mut<S: AsRef<str>>(&mut self, segments: &[S]) -> Option<&mut BoundNode> {
        let (first, rest) = segments.split_first()?;
        let mut node = self.entry_mut(first.as_ref())?;
        for name in rest {
            node = match node {
                BoundNode::Folder(tree) => tree.entry_mut(name.as_ref())?,
                _ => return None,
            };
        }
        Some(node)
    }

    pub(crate) fn insert(&mut self, name: &str, node: BoundNode) -> &mut BoundNode {
        let idx = match self.entries.iter().position(|(n, _)| n == name) {
            Some(idx) => {
                self.entries[idx].1 = node;
                idx
            }
            None => {
                self.entries.push((name.to_string(), node));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub(crate) fn insert_folder(&mut self, name: &str) -> &mut ValueTree {
        match self.insert(name, BoundNode::Folder(ValueTree::new())) {
            BoundNode::Folder(tree) => tree,
            _ => unreachable!("folder was just inserted"),
        }
    }

    fn entry(&self, name: &str) -> Option<&BoundNode> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut BoundNode> {
        self.entries.iter_mut().find(|(n, _)| n == name).map(|(_, node)| node)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
