use ofxloc_core::{OfxLocError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

static PLUGIN_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{Svfx:(.*)\}$").unwrap());

/// Plugin id inside a host unique id (`{Svfx:com.vendor.effect}`).
/// `None` for non-OFX ids and for an empty capture.
pub fn extract_plugin_id(unique_id: &str) -> Option<&str> {
    PLUGIN_ID_RE
        .captures(unique_id)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Drop ids matching any pattern.
    #[default]
    Deny,
    /// Keep only ids matching some pattern.
    Allow,
}

impl FromStr for FilterMode {
    type Err = OfxLocError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deny" | "black" | "blacklist" | "exclude" => Ok(FilterMode::Deny),
            "allow" | "white" | "whitelist" | "include" => Ok(FilterMode::Allow),
            other => Err(OfxLocError::Other(format!(
                "unknown filter mode `{other}` (expected deny or allow)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome<'a> {
    /// Unique id is not an OFX id or carries an empty plugin id.
    NoId,
    /// Rejected by the pattern list.
    Filtered(&'a str),
    Accepted(&'a str),
}

/// Plugin-id filter built from a `;`-separated list of regular expressions.
#[derive(Debug, Clone)]
pub struct DescriptorFilter {
    patterns: Vec<Regex>,
    mode: FilterMode,
}

impl DescriptorFilter {
    pub fn new(pattern: &str, mode: FilterMode) -> Result<Self> {
        let mut patterns = Vec::new();
        for fragment in pattern.split(';').map(|f| f.trim_matches(' ')) {
            if fragment.is_empty() {
                continue;
            }
            let re = Regex::new(fragment).map_err(|e| OfxLocError::InvalidPattern {
                pattern: fragment.to_string(),
                reason: e.to_string(),
            })?;
            patterns.push(re);
        }
        Ok(Self { patterns, mode })
    }

    /// Deny-mode filter with no patterns: every OFX id passes.
    pub fn accept_all() -> Self {
        Self {
            patterns: Vec::new(),
            mode: FilterMode::Deny,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Substring search: `Hit` matches `com.fxhome.HitFilm.Blur`.
    pub fn matches(&self, plugin_id: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(plugin_id))
    }

    pub fn accepts(&self, plugin_id: &str) -> bool {
        self.matches(plugin_id) == (self.mode == FilterMode::Allow)
    }

    pub fn check<'a>(&self, unique_id: &'a str) -> FilterOutcome<'a> {
        match extract_plugin_id(unique_id) {
            None => FilterOutcome::NoId,
            Some(id) if self.accepts(id) => FilterOutcome::Accepted(id),
            Some(id) => FilterOutcome::Filtered(id),
        }
    }
}
