use ofxloc_config::OfxLocConfig;
use ofxloc_core::{OfxLocError, Result};
use ofxloc_resource::{FilterMode, MapOptions, StandardDirs, DEFAULT_GROUP_MAX};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Filename suffixes offered for localized resource files.
pub const SUFFIX_PRESETS: [&str; 10] = [
    "", ".de-DE", ".en-US", ".es-ES", ".fr-FR", ".ja-JP", ".ko-KR", ".pl-PL", ".pt-BR", ".zh-CN",
];

/// Named presets matching the export flavours in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Group expansion and font-index suppression on, deny-list filter.
    #[default]
    Standard,
    /// Parameters exported as reported, no expansion or suppression.
    Classic,
    /// Only HitFilm/Ignite plugins, failures abort the run.
    Ignite,
}

impl FromStr for Variant {
    type Err = OfxLocError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Variant::Standard),
            "classic" => Ok(Variant::Classic),
            "ignite" => Ok(Variant::Ignite),
            other => Err(OfxLocError::Other(format!(
                "unknown variant `{other}` (expected standard, classic or ignite)"
            ))),
        }
    }
}

/// What to do when a plugin cannot be materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resilience {
    /// Log and continue with the next plugin.
    #[default]
    Skip,
    /// Abort the run.
    Propagate,
}

impl FromStr for Resilience {
    type Err = OfxLocError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Resilience::Skip),
            "propagate" | "fail" => Ok(Resilience::Propagate),
            other => Err(OfxLocError::Other(format!(
                "unknown resilience mode `{other}` (expected skip or propagate)"
            ))),
        }
    }
}

pub fn default_output_dir() -> PathBuf {
    dirs::desktop_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("OFX_XML")
}

/// Accept `raw` when it is a positive integer, otherwise keep `prior`.
pub fn resolve_group_max(raw: Option<i64>, prior: u32) -> u32 {
    match raw {
        None => prior,
        Some(v) => match u32::try_from(v) {
            Ok(v) if v > 0 => v,
            _ => {
                tracing::warn!(event = "group_max_ignored", value = v, kept = prior);
                prior
            }
        },
    }
}

/// Command-line values; each one beats the config file.
#[derive(Debug, Clone, Default)]
pub struct ExportOverrides {
    pub output_dir: Option<PathBuf>,
    pub pattern: Option<String>,
    pub mode: Option<FilterMode>,
    pub suffix: Option<String>,
    pub group_max: Option<i64>,
    pub variant: Option<Variant>,
    pub resilience: Option<Resilience>,
    pub shared_ofx_dir: Option<String>,
    pub host_ofx_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub suffix: String,
    pub filter_pattern: String,
    pub filter_mode: FilterMode,
    pub map: MapOptions,
    pub resilience: Resilience,
    /// Directories set in the config file or on the command line. Gaps are
    /// filled at run time from the registry, then from the environment.
    pub standard_dirs: StandardDirs,
}

impl ExportOptions {
    pub fn for_variant(variant: Variant) -> Self {
        let base = Self {
            output_dir: default_output_dir(),
            suffix: String::new(),
            filter_pattern: String::new(),
            filter_mode: FilterMode::Deny,
            map: MapOptions::default(),
            resilience: Resilience::Skip,
            standard_dirs: StandardDirs::default(),
        };
        match variant {
            Variant::Standard => base,
            Variant::Classic => Self {
                map: MapOptions {
                    expand_groups: false,
                    group_max: DEFAULT_GROUP_MAX,
                    suppress_font_index_options: false,
                },
                ..base
            },
            Variant::Ignite => Self {
                filter_pattern: "HitFilm".into(),
                filter_mode: FilterMode::Allow,
                resilience: Resilience::Propagate,
                ..base
            },
        }
    }

    /// Variant preset, then config file values, then command-line overrides.
    pub fn resolve(cfg: &OfxLocConfig, overrides: ExportOverrides) -> Result<Self> {
        let variant = match (overrides.variant, cfg.variant.as_deref()) {
            (Some(v), _) => v,
            (None, Some(s)) => s.parse()?,
            (None, None) => Variant::default(),
        };
        let mut opts = Self::for_variant(variant);

        if let Some(dir) = &cfg.output_dir {
            opts.output_dir = PathBuf::from(dir);
        }
        if let Some(suffix) = &cfg.suffix {
            opts.suffix = suffix.clone();
        }
        if let Some(filter) = &cfg.filter {
            if let Some(pattern) = &filter.pattern {
                opts.filter_pattern = pattern.clone();
            }
            if let Some(mode) = &filter.mode {
                opts.filter_mode = mode.parse()?;
            }
        }
        if let Some(groups) = &cfg.groups {
            if let Some(expand) = groups.expand {
                opts.map.expand_groups = expand;
            }
            opts.map.group_max = resolve_group_max(groups.max, opts.map.group_max);
        }
        if let Some(flag) = cfg
            .params
            .as_ref()
            .and_then(|p| p.suppress_font_index_options)
        {
            opts.map.suppress_font_index_options = flag;
        }
        if let Some(run) = &cfg.run {
            if let Some(r) = &run.resilience {
                opts.resilience = r.parse()?;
            }
            if run.shared_ofx_dir.is_some() {
                opts.standard_dirs.shared = run.shared_ofx_dir.clone();
            }
            if run.host_ofx_dir.is_some() {
                opts.standard_dirs.host = run.host_ofx_dir.clone();
            }
        }

        if let Some(dir) = overrides.output_dir {
            opts.output_dir = dir;
        }
        if let Some(suffix) = overrides.suffix {
            opts.suffix = suffix;
        }
        if let Some(pattern) = overrides.pattern {
            opts.filter_pattern = pattern;
        }
        if let Some(mode) = overrides.mode {
            opts.filter_mode = mode;
        }
        opts.map.group_max = resolve_group_max(overrides.group_max, opts.map.group_max);
        if let Some(r) = overrides.resilience {
            opts.resilience = r;
        }
        if overrides.shared_ofx_dir.is_some() {
            opts.standard_dirs.shared = overrides.shared_ofx_dir;
        }
        if overrides.host_ofx_dir.is_some() {
            opts.standard_dirs.host = overrides.host_ofx_dir;
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofxloc_config::{FilterCfg, GroupsCfg, RunCfg};

    #[test]
    fn group_max_must_be_positive() {
        assert_eq!(resolve_group_max(None, 250), 250);
        assert_eq!(resolve_group_max(Some(12), 250), 12);
        assert_eq!(resolve_group_max(Some(0), 250), 250);
        assert_eq!(resolve_group_max(Some(-3), 250), 250);
        assert_eq!(resolve_group_max(Some(i64::MAX), 250), 250);
    }

    #[test]
    fn variant_presets() {
        let std = ExportOptions::for_variant(Variant::Standard);
        assert!(std.map.expand_groups);
        assert!(std.map.suppress_font_index_options);
        assert_eq!(std.filter_mode, FilterMode::Deny);
        assert_eq!(std.map.group_max, 250);

        let classic = ExportOptions::for_variant(Variant::Classic);
        assert!(!classic.map.expand_groups);
        assert!(!classic.map.suppress_font_index_options);
        assert_eq!(classic.resilience, Resilience::Skip);

        let ignite = ExportOptions::for_variant(Variant::Ignite);
        assert_eq!(ignite.filter_pattern, "HitFilm");
        assert_eq!(ignite.filter_mode, FilterMode::Allow);
        assert_eq!(ignite.resilience, Resilience::Propagate);
        assert!(ignite.output_dir.ends_with("OFX_XML"));
        assert_eq!(ignite.standard_dirs, StandardDirs::default());
    }

    #[test]
    fn config_then_overrides() {
        let cfg = OfxLocConfig {
            variant: Some("ignite".into()),
            output_dir: Some("/cfg/out".into()),
            suffix: Some(".fr-FR".into()),
            filter: Some(FilterCfg {
                pattern: Some("Foo".into()),
                mode: None,
            }),
            groups: Some(GroupsCfg {
                expand: None,
                max: Some(10),
            }),
            run: Some(RunCfg {
                resilience: Some("skip".into()),
                shared_ofx_dir: Some("S:\\OFX".into()),
                host_ofx_dir: None,
            }),
            ..OfxLocConfig::default()
        };
        let opts = ExportOptions::resolve(
            &cfg,
            ExportOverrides {
                suffix: Some(".de-DE".into()),
                group_max: Some(-1),
                host_ofx_dir: Some("H:\\Host".into()),
                ..ExportOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(opts.output_dir, PathBuf::from("/cfg/out"));
        assert_eq!(opts.suffix, ".de-DE");
        assert_eq!(opts.filter_pattern, "Foo");
        // mode still comes from the ignite preset
        assert_eq!(opts.filter_mode, FilterMode::Allow);
        assert_eq!(opts.map.group_max, 10);
        assert_eq!(opts.resilience, Resilience::Skip);
        assert_eq!(opts.standard_dirs.shared.as_deref(), Some("S:\\OFX"));
        assert_eq!(opts.standard_dirs.host.as_deref(), Some("H:\\Host"));
    }

    #[test]
    fn bad_config_values_are_errors() {
        let cfg = OfxLocConfig {
            filter: Some(FilterCfg {
                pattern: None,
                mode: Some("sideways".into()),
            }),
            ..OfxLocConfig::default()
        };
        assert!(ExportOptions::resolve(&cfg, ExportOverrides::default()).is_err());

        let cfg = OfxLocConfig {
            variant: Some("fancy".into()),
            ..OfxLocConfig::default()
        };
        assert!(ExportOptions::resolve(&cfg, ExportOverrides::default()).is_err());
    }

    #[test]
    fn suffix_presets_start_with_empty() {
        assert_eq!(SUFFIX_PRESETS[0], "");
        assert!(SUFFIX_PRESETS[1..].iter().all(|s| s.starts_with('.')));
    }
}
