use crate::clean_text;
use crate::description::extract_description;
use crate::params::{map_parameters, MapOptions};
use crate::sort::sort_plugins;
use ofxloc_core::{Plugin, RawPluginDescriptor, ResourceDocument, ResourceSet};
use std::collections::BTreeMap;

/// Documents of one export run, keyed by module path.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceDocuments {
    docs: BTreeMap<String, ResourceDocument>,
}

impl ResourceDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin to the document of its module path, creating the
    /// document on first use. Plugins sharing an id are not merged.
    pub fn add_plugin(
        &mut self,
        plugin_id: &str,
        descriptor: &RawPluginDescriptor,
        opts: &MapOptions,
    ) {
        let plugin = build_plugin(plugin_id, descriptor, opts);
        tracing::debug!(
            event = "plugin_added",
            plugin = %plugin.name,
            module = %descriptor.module_path,
            params = plugin.resource_set.context.parameters.len()
        );
        self.docs
            .entry(descriptor.module_path.clone())
            .or_insert_with(|| ResourceDocument::new(descriptor.module_path.clone()))
            .plugins
            .push(plugin);
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn plugin_count(&self) -> usize {
        self.docs.values().map(|d| d.plugins.len()).sum()
    }

    pub fn get(&self, module_path: &str) -> Option<&ResourceDocument> {
        self.docs.get(module_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDocument> {
        self.docs.values()
    }

    pub fn sort_all(&mut self) {
        for doc in self.docs.values_mut() {
            sort_plugins(doc);
        }
    }
}

/// Plugin entry with its single resource set and context.
pub fn build_plugin(plugin_id: &str, descriptor: &RawPluginDescriptor, opts: &MapOptions) -> Plugin {
    let description =
        extract_description(descriptor.info_text.as_deref()).map(|d| clean_text(d).to_string());
    Plugin {
        name: plugin_id.to_string(),
        resource_set: ResourceSet {
            label: descriptor.display_name.clone(),
            grouping: descriptor.group.clone(),
            description,
            context: map_parameters(&descriptor.parameters, opts),
        },
    }
}
