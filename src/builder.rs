//! Builds the control registry and bound values from a configuration tree.

use crate::config::{ConfigNode, Folder, Value};
use crate::controls::{Control, ControlId, Widget};
use crate::error::{ConfigError, ConfigResult};
use crate::registry::PathRegistry;
use crate::values::{BoundNode, ValueTree};
use std::collections::HashSet;

pub const ROOT_PATH: &str = "/";

/// Walks `config` depth-first, creating one control per node.
///
/// With the root base path the top-level folder is the panel itself; any
/// other base path (`/a/b/`) wraps the tree in a folder named by its last
/// segment, so the bound values become `{ "b": { ... } }`.
pub fn build(config: &ConfigNode, base_path: &str) -> ConfigResult<(ValueTree, PathRegistry)> {
    let ConfigNode::Folder(root) = config else {
        return Err(ConfigError::NotAnObject);
    };
    if root.is_empty() {
        return Err(ConfigError::EmptyRoot);
    }
    let base_path = normalize_base_path(base_path)?;

    let mut values = ValueTree::new();
    let mut registry = PathRegistry::new();

    if base_path == ROOT_PATH {
        let top = registry.push(Control::new(base_path, "", Widget::Folder, Vec::new(), None));
        add_children(root, top, ROOT_PATH, &[], &mut values, &mut registry)?;
    } else {
        let name = base_path
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string();
        let value_path = vec![name.clone()];
        let top = registry.push(Control::new(base_path.clone(), &name, Widget::Folder, value_path.clone(), None));
        let sub = values.insert_folder(&name);
        add_children(root, top, &base_path, &value_path, sub, &mut registry)?;
    }

    log::debug!("built panel at {} with {} controls", registry.paths().next().unwrap_or(ROOT_PATH), registry.len());
    Ok((values, registry))
}

fn normalize_base_path(base_path: &str) -> ConfigResult<String> {
    if base_path.is_empty() || base_path == ROOT_PATH {
        return Ok(ROOT_PATH.to_string());
    }
    let inner = base_path
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .ok_or_else(|| ConfigError::InvalidBasePath(base_path.to_string()))?;
    if inner.split('/').any(str::is_empty) {
        return Err(ConfigError::InvalidBasePath(base_path.to_string()));
    }
    Ok(base_path.to_string())
}

fn add_children(
    folder: &Folder,
    parent: ControlId,
    parent_path: &str,
    value_path: &[String],
    values: &mut ValueTree,
    registry: &mut PathRegistry,
) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for (name, node) in folder.iter() {
        if name.is_empty() || name.contains('/') {
            return Err(ConfigError::InvalidName {
                parent: parent_path.to_string(),
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateName {
                parent: parent_path.to_string(),
                name: name.to_string(),
            });
        }

        let mut child_value_path = value_path.to_vec();
        child_value_path.push(name.to_string());
        let leaf_path = format!("{parent_path}{name}");

        let (control, bound) = match node {
            ConfigNode::Folder(sub) => {
                let path = format!("{leaf_path}/");
                if sub.is_empty() {
                    return Err(ConfigError::EmptyFolder(path));
                }
                let id = registry.push(Control::new(path.clone(), name, Widget::Folder, child_value_path.clone(), None));
                registry.add_child(parent, id);
                let sub_values = values.insert_folder(name);
                add_children(sub, id, &path, &child_value_path, sub_values, registry)?;
                continue;
            }
            ConfigNode::Leaf(value) => {
                let widget = match value {
                    Value::Number(_) => Widget::Number { range: None, step: None },
                    Value::Bool(_) => Widget::Checkbox,
                    Value::Text(_) => Widget::Text,
                };
                (
                    Control::new(leaf_path, name, widget, child_value_path, Some(value.clone())),
                    BoundNode::Value(value.clone()),
                )
            }
            ConfigNode::Slider(slider) => {
                slider.validate(&leaf_path)?;
                let value = Value::Number(slider.value);
                let widget = Widget::Number {
                    range: slider.range(),
                    step: slider.step,
                };
                (
                    Control::new(leaf_path, name, widget, child_value_path, Some(value.clone())),
                    BoundNode::Value(value),
                )
            }
            ConfigNode::Options(select) => {
                select.validate(&leaf_path)?;
                let value = Value::Text(select.value.clone());
                let widget = Widget::Options(select.choices.clone());
                (
                    Control::new(leaf_path, name, widget, child_value_path, Some(value.clone())),
                    BoundNode::Value(value),
                )
            }
            ConfigNode::Action(action) => {
                if action.is_empty() {
                    return Err(ConfigError::MalformedDescriptor {
                        path: leaf_path,
                        reason: "action name is empty".to_string(),
                    });
                }
                (
                    Control::new(leaf_path, name, Widget::Button(action.clone()), child_value_path, None),
                    BoundNode::Action,
                )
            }
        };

        values.insert(name, bound);
        let id = registry.push(control);
        registry.add_child(parent, id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumberSlider;
    use proptest::prelude::*;

    fn count_nodes(folder: &Folder) -> usize {
        folder
            .iter()
            .map(|(_, node)| match node {
                ConfigNode::Folder(sub) => 1 + count_nodes(sub),
                _ => 1,
            })
            .sum()
    }

    #[test]
    fn slider_folder_builds_bound_tree_and_paths() {
        let config = ConfigNode::Folder(
            Folder::new().with("F", Folder::new().with("n", ConfigNode::slider(1.0, 0.0, 2.0, 0.5))),
        );
        let (values, registry) = build(&config, "/").unwrap();

        assert_eq!(values.number("/F/n"), Some(1.0));
        assert_eq!(values.len(), 1);
        assert_eq!(values.folder("/F").map(ValueTree::len), Some(1));

        let paths: Vec<_> = registry.paths().collect();
        assert_eq!(paths, ["/", "/F/", "/F/n"]);

        let n = registry.get(registry.lookup("/F/n").unwrap()).unwrap();
        assert_eq!(n.widget(), &Widget::Number { range: Some(0.0..=2.0), step: Some(0.5) });
        assert_eq!(n.display(), Some(&Value::Number(1.0)));
    }

    #[test]
    fn root_container_links_children_in_order() {
        let config = ConfigNode::Folder(
            Folder::new()
                .with("b", true)
                .with("A", Folder::new().with("x", 1.0).with("go", ConfigNode::action("go")))
                .with("s", "text"),
        );
        let (values, registry) = build(&config, "").unwrap();
        let top = registry.get(registry.top().unwrap()).unwrap();
        assert!(top.is_root_container());

        let names: Vec<_> = top
            .children()
            .iter()
            .map(|id| registry.get(*id).unwrap().name())
            .collect();
        assert_eq!(names, ["b", "A", "s"]);

        let a = registry.get(registry.lookup("/A/").unwrap()).unwrap();
        assert_eq!(a.children().len(), 2);
        assert_eq!(values.get("/A/go"), Some(&BoundNode::Action));
        assert!(registry.get(registry.lookup("/A/go").unwrap()).unwrap().display().is_none());
        assert_eq!(values.boolean("/b"), Some(true));
        assert_eq!(values.text("/s"), Some("text"));
    }

    #[test]
    fn nested_base_path_wraps_tree_in_named_folder() {
        let config = ConfigNode::Folder(Folder::new().with("x", 1.0));
        let (values, registry) = build(&config, "/panel/rotation/").unwrap();

        let paths: Vec<_> = registry.paths().collect();
        assert_eq!(paths, ["/panel/rotation/", "/panel/rotation/x"]);
        assert_eq!(values.number("/rotation/x"), Some(1.0));
        assert!(!registry.get(registry.top().unwrap()).unwrap().is_root_container());
    }

    #[test]
    fn rejects_bad_base_paths() {
        let config = ConfigNode::Folder(Folder::new().with("x", 1.0));
        for base in ["panel", "/panel", "panel/", "/a//b/"] {
            assert!(
                matches!(build(&config, base), Err(ConfigError::InvalidBasePath(_))),
                "{base}"
            );
        }
    }

    #[test]
    fn rejects_invalid_trees() {
        assert!(matches!(build(&ConfigNode::from(1.0), "/"), Err(ConfigError::NotAnObject)));
        assert!(matches!(build(&ConfigNode::Folder(Folder::new()), "/"), Err(ConfigError::EmptyRoot)));

        let empty_sub = ConfigNode::Folder(Folder::new().with("A", Folder::new()));
        assert!(matches!(build(&empty_sub, "/"), Err(ConfigError::EmptyFolder(p)) if p == "/A/"));

        let dup = ConfigNode::Folder(Folder::new().with("x", 1.0).with("x", 2.0));
        assert!(matches!(build(&dup, "/"), Err(ConfigError::DuplicateName { name, .. }) if name == "x"));

        let slash = ConfigNode::Folder(Folder::new().with("a/b", 1.0));
        assert!(matches!(build(&slash, "/"), Err(ConfigError::InvalidName { .. })));

        let bad_slider = ConfigNode::Folder(Folder::new().with(
            "n",
            NumberSlider { value: 1.0, min: Some(2.0), max: Some(0.0), step: None },
        ));
        assert!(matches!(
            build(&bad_slider, "/"),
            Err(ConfigError::MalformedDescriptor { path, .. }) if path == "/n"
        ));

        let bad_option = ConfigNode::Folder(Folder::new().with("o", ConfigNode::options("z", ["a"])));
        assert!(matches!(build(&bad_option, "/"), Err(ConfigError::MalformedDescriptor { .. })));
    }

    fn leaf() -> impl Strategy<Value = ConfigNode> {
        prop_oneof![
            (-1.0e6..1.0e6_f64).prop_map(ConfigNode::from),
            any::<bool>().prop_map(ConfigNode::from),
            "[a-z]{0,6}".prop_map(|s| ConfigNode::from(s.as_str())),
            (0.0..10.0_f64).prop_map(|v| ConfigNode::slider(v, 0.0, 10.0, 0.1)),
            "[a-z]{1,6}".prop_map(|name| ConfigNode::action(name)),
        ]
    }

    fn folder_of(node: impl Strategy<Value = ConfigNode>) -> impl Strategy<Value = Folder> {
        prop::collection::btree_map("[A-Za-z][A-Za-z ]{0,5}", node, 1..5)
            .prop_map(|entries| entries.into_iter().collect())
    }

    fn tree() -> impl Strategy<Value = Folder> {
        let node = leaf().prop_recursive(3, 32, 4, |inner| folder_of(inner).prop_map(ConfigNode::Folder));
        folder_of(node)
    }

    proptest! {
        #[test]
        fn every_node_gets_exactly_one_path(root in tree()) {
            let (_, registry) = build(&ConfigNode::Folder(root.clone()), "/").unwrap();

            prop_assert_eq!(registry.len(), count_nodes(&root) + 1);
            let unique: HashSet<_> = registry.paths().collect();
            prop_assert_eq!(unique.len(), registry.len());

            for (id, control) in registry.iter() {
                prop_assert_eq!(registry.lookup(control.path()), Some(id));
                let is_folder = matches!(control.widget(), Widget::Folder);
                prop_assert_eq!(control.path().ends_with('/'), is_folder);
            }
        }
    }
}
