use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ofxloc.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfxLocConfig {
    /// Root directory for generated resource files.
    pub output_dir: Option<String>,
    /// Extra string inserted before `.xml`, e.g. ".de-DE".
    pub suffix: Option<String>,
    /// Preset: "standard", "classic" or "ignite".
    pub variant: Option<String>,
    pub filter: Option<FilterCfg>,
    pub groups: Option<GroupsCfg>,
    pub params: Option<ParamsCfg>,
    pub run: Option<RunCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterCfg {
    /// `;`-separated regular expressions matched against plugin ids.
    pub pattern: Option<String>,
    /// "deny" or "allow".
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupsCfg {
    pub expand: Option<bool>,
    /// Kept signed so that zero/negative values can be reported and ignored.
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamsCfg {
    pub suppress_font_index_options: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunCfg {
    /// "skip" or "propagate".
    pub resilience: Option<String>,
    pub shared_ofx_dir: Option<String>,
    pub host_ofx_dir: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Search order: CWD/ofxloc.toml, then <config_dir>/ofxloc/ofxloc.toml.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(p) = std::env::current_dir() {
        paths.push(p.join(CONFIG_FILE_NAME));
    }
    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("ofxloc").join(CONFIG_FILE_NAME));
    }
    paths
}

pub fn load_config() -> Result<OfxLocConfig, ConfigError> {
    load_config_from(&config_search_paths())
}

/// Load and merge the given files; earlier files win field by field.
/// Missing files are skipped.
pub fn load_config_from(paths: &[PathBuf]) -> Result<OfxLocConfig, ConfigError> {
    let mut merged = OfxLocConfig::default();
    for path in paths {
        if let Some(cfg) = read_config_file(path)? {
            tracing::debug!(event = "config_loaded", path = %path.display());
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_config_file(path: &Path) -> Result<Option<OfxLocConfig>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str::<OfxLocConfig>(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge(mut a: OfxLocConfig, b: OfxLocConfig) -> OfxLocConfig {
    if a.output_dir.is_none() {
        a.output_dir = b.output_dir;
    }
    if a.suffix.is_none() {
        a.suffix = b.suffix;
    }
    if a.variant.is_none() {
        a.variant = b.variant;
    }
    a.filter = merge_opt(a.filter, b.filter, merge_filter);
    a.groups = merge_opt(a.groups, b.groups, merge_groups);
    a.params = merge_opt(a.params, b.params, merge_params);
    a.run = merge_opt(a.run, b.run, merge_run);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_filter(mut a: FilterCfg, b: FilterCfg) -> FilterCfg {
    if a.pattern.is_none() {
        a.pattern = b.pattern;
    }
    if a.mode.is_none() {
        a.mode = b.mode;
    }
    a
}

fn merge_groups(mut a: GroupsCfg, b: GroupsCfg) -> GroupsCfg {
    if a.expand.is_none() {
        a.expand = b.expand;
    }
    if a.max.is_none() {
        a.max = b.max;
    }
    a
}

fn merge_params(mut a: ParamsCfg, b: ParamsCfg) -> ParamsCfg {
    if a.suppress_font_index_options.is_none() {
        a.suppress_font_index_options = b.suppress_font_index_options;
    }
    a
}

fn merge_run(mut a: RunCfg, b: RunCfg) -> RunCfg {
    if a.resilience.is_none() {
        a.resilience = b.resilience;
    }
    if a.shared_ofx_dir.is_none() {
        a.shared_ofx_dir = b.shared_ofx_dir;
    }
    if a.host_ofx_dir.is_none() {
        a.host_ofx_dir = b.host_ofx_dir;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn first_file_wins_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.toml");
        let global = dir.path().join("global.toml");
        fs::write(
            &local,
            "suffix = \".de-DE\"\n[filter]\npattern = \"HitFilm\"\n",
        )
        .unwrap();
        fs::write(
            &global,
            "suffix = \".en-US\"\noutput_dir = \"/tmp/ofx\"\n[filter]\npattern = \"Other\"\nmode = \"allow\"\n[groups]\nmax = 12\n",
        )
        .unwrap();

        let cfg = load_config_from(&[local, global]).unwrap();
        assert_eq!(cfg.suffix.as_deref(), Some(".de-DE"));
        assert_eq!(cfg.output_dir.as_deref(), Some("/tmp/ofx"));
        let filter = cfg.filter.unwrap();
        assert_eq!(filter.pattern.as_deref(), Some("HitFilm"));
        assert_eq!(filter.mode.as_deref(), Some("allow"));
        assert_eq!(cfg.groups.unwrap().max, Some(12));
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&[dir.path().join("nope.toml")]).unwrap();
        assert!(cfg.output_dir.is_none());
        assert!(cfg.run.is_none());
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[groups]\nmax = \"many\"\n").unwrap();
        let err = load_config_from(&[bad]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
