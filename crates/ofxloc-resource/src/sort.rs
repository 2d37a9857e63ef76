use ofxloc_core::ResourceDocument;
use std::cmp::Ordering;

/// Ordinal (byte-wise) comparison on plugin names; an empty name sorts
/// first.
pub fn compare_plugin_names(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Stable sort of the document's plugins by name.
pub fn sort_plugins(doc: &mut ResourceDocument) {
    doc.plugins
        .sort_by(|a, b| compare_plugin_names(&a.name, &b.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofxloc_core::{Plugin, ResourceSet};

    fn plugin(name: &str, label: &str) -> Plugin {
        Plugin {
            name: name.into(),
            resource_set: ResourceSet {
                label: label.into(),
                ..ResourceSet::default()
            },
        }
    }

    #[test]
    fn ordinal_not_case_insensitive() {
        assert_eq!(compare_plugin_names("B", "a"), Ordering::Less);
        assert_eq!(compare_plugin_names("a", "ab"), Ordering::Less);
        assert_eq!(compare_plugin_names("Z", "a"), Ordering::Less);
        assert_eq!(compare_plugin_names("é", "z"), Ordering::Greater);
    }

    #[test]
    fn empty_name_first() {
        assert_eq!(compare_plugin_names("", "a"), Ordering::Less);
        assert_eq!(compare_plugin_names("a", ""), Ordering::Greater);
        assert_eq!(compare_plugin_names("", ""), Ordering::Equal);

        let mut doc = ResourceDocument::new("p");
        doc.plugins = vec![plugin("com.a", "a"), plugin("", "empty")];
        sort_plugins(&mut doc);
        assert_eq!(doc.plugins[0].resource_set.label, "empty");
    }

    #[test]
    fn sort_is_stable_and_non_decreasing() {
        let mut doc = ResourceDocument::new("p");
        doc.plugins = vec![
            plugin("com.b", "first b"),
            plugin("com.a", "a"),
            plugin("com.b", "second b"),
            plugin("Com.c", "c"),
        ];
        sort_plugins(&mut doc);
        let order: Vec<_> = doc
            .plugins
            .iter()
            .map(|p| p.resource_set.label.as_str())
            .collect();
        assert_eq!(order, ["c", "a", "first b", "second b"]);
        assert!(doc.plugins.windows(2).all(|w| w[0].name <= w[1].name));
    }
}
