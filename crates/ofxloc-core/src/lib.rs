use serde::{Deserialize, Serialize};
use thiserror::Error;

mod model;

pub use model::{
    ChoiceParam, Context, OutputParameter, ParamKind, ParamProps, Plugin, ResourceDocument,
    ResourceSet, DEFAULT_CONTEXT_NAME, DEFAULT_HOST,
};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// One parameter as reported by the host for a plugin instance.
///
/// Everything is optional: hosts routinely report parameters without a label
/// or hint, and the kind is carried verbatim as the host's type code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParameter {
    /// Host type code, e.g. "Double", "Choice" or "16" for image clips.
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Option names, only reported for Choice parameters.
    #[serde(default)]
    pub choices: Vec<String>,
}

/// Fully materialized plugin as handed over by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPluginDescriptor {
    /// Host unique id, `{Svfx:<plugin id>}` for OFX plugins.
    pub unique_id: String,
    pub display_name: String,
    pub group: String,
    /// Free-text info blob, may bundle several localized sections.
    pub info_text: Option<String>,
    /// Path of the binary backing the plugin; documents are keyed by it.
    pub module_path: String,
    pub parameters: Vec<RawParameter>,
}

#[derive(Debug, Error)]
pub enum OfxLocError {
    #[error("invalid id pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("failed to materialize plugin `{unique_id}`: {reason}")]
    Materialize { unique_id: String, reason: String },
    #[error("invalid registry snapshot: {0}")]
    Registry(String),
    #[error("{0}")]
    Other(String),
}
