//! Host plugin registry: a container tree whose leaves describe plugins.
//!
//! The registry only lists plugins; reading a plugin's module path and
//! parameters requires instantiating it on the host, which can fail. That
//! step is [`PluginRegistry::materialize`].

use color_eyre::eyre::WrapErr;
use ofxloc_core::{OfxLocError, RawParameter, RawPluginDescriptor, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Node of the registry tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginNode {
    Container {
        name: String,
        children: Vec<PluginNode>,
    },
    Plugin(PluginEntry),
}

/// A plugin as listed by the registry, before it is materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    pub unique_id: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub info: Option<String>,
    /// Non-OFX plugins (DirectX, builtin...) are never collected.
    #[serde(default = "default_true")]
    pub is_ofx: bool,
    #[serde(default)]
    pub module_path: Option<String>,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
}

fn default_true() -> bool {
    true
}

pub trait PluginRegistry {
    fn root(&self) -> &PluginNode;

    /// Instantiate `entry` on the host and read back its module path and
    /// parameters.
    fn materialize(&self, entry: &PluginEntry) -> Result<RawPluginDescriptor>;

    /// `Program Files` directory of the machine the host runs on.
    fn program_files_dir(&self) -> Option<&str> {
        None
    }

    /// Directory containing the host executable.
    fn host_dir(&self) -> Option<&str> {
        None
    }
}

/// Depth-first walk collecting OFX leaves, first occurrence of a unique id
/// wins. Plugins are often listed under several folders (by vendor, by
/// category, favourites), hence the dedup.
pub fn collect_plugin_descriptors(root: &PluginNode) -> Vec<&PluginEntry> {
    let mut out = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    collect_into(root, &mut out, &mut seen);
    out
}

fn collect_into<'a>(
    node: &'a PluginNode,
    out: &mut Vec<&'a PluginEntry>,
    seen: &mut HashSet<&'a str>,
) {
    match node {
        PluginNode::Container { children, .. } => {
            for child in children {
                collect_into(child, out, seen);
            }
        }
        PluginNode::Plugin(entry) => {
            if entry.is_ofx && seen.insert(entry.unique_id.as_str()) {
                out.push(entry);
            }
        }
    }
}

/// Top level of a snapshot: the root container plus where the host lives.
#[derive(Debug, Deserialize)]
struct SnapshotRoot {
    name: String,
    children: Vec<PluginNode>,
    #[serde(default)]
    program_files: Option<String>,
    #[serde(default)]
    host_dir: Option<String>,
}

/// Registry backed by a JSON snapshot exported from the host.
#[derive(Debug, Clone)]
pub struct JsonRegistry {
    root: PluginNode,
    program_files: Option<String>,
    host_dir: Option<String>,
}

impl JsonRegistry {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read registry snapshot {}", path.display()))?;
        let reg = Self::from_json(&text)
            .wrap_err_with(|| format!("failed to load registry snapshot {}", path.display()))?;
        tracing::debug!(event = "registry_loaded", path = %path.display());
        Ok(reg)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: SnapshotRoot = serde_json::from_str(text)
            .map_err(|e| OfxLocError::Registry(e.to_string()))?;
        Ok(Self {
            root: PluginNode::Container {
                name: snapshot.name,
                children: snapshot.children,
            },
            program_files: non_blank(snapshot.program_files),
            host_dir: non_blank(snapshot.host_dir),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PluginRegistry for JsonRegistry {
    fn root(&self) -> &PluginNode {
        &self.root
    }

    fn program_files_dir(&self) -> Option<&str> {
        self.program_files.as_deref()
    }

    fn host_dir(&self) -> Option<&str> {
        self.host_dir.as_deref()
    }

    fn materialize(&self, entry: &PluginEntry) -> Result<RawPluginDescriptor> {
        let module_path = match entry.module_path.as_deref() {
            Some(p) if !p.trim().is_empty() => p.to_string(),
            _ => {
                return Err(OfxLocError::Materialize {
                    unique_id: entry.unique_id.clone(),
                    reason: "host reported no module path".into(),
                }
                .into())
            }
        };
        Ok(RawPluginDescriptor {
            unique_id: entry.unique_id.clone(),
            display_name: entry.name.clone(),
            group: entry.group.clone(),
            info_text: entry.info.clone(),
            module_path,
            parameters: entry.parameters.clone(),
        })
    }
}
