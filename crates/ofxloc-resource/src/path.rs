//! Output location of a resource document.
//!
//! Module paths come from the host and are Windows paths, so both `\` and `/`
//! count as separators here whatever platform we run on. Plugins installed
//! under a standard OFX directory get their file placed the way a bundle
//! expects it (`<bundle>/Contents/Resources/<name>.xml`); anything else is
//! written flat into the output root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The two install roots hosts scan for OFX plugins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardDirs {
    /// System-wide directory, `%ProgramFiles%\Common Files\OFX`.
    pub shared: Option<String>,
    /// Plugin directory private to the host application.
    pub host: Option<String>,
}

impl StandardDirs {
    /// Directories of a host installed under `program_files` and running
    /// from `host_dir`.
    pub fn from_host(program_files: Option<&str>, host_dir: Option<&str>) -> Self {
        let shared = program_files
            .map(|p| p.trim_end_matches(is_separator))
            .filter(|p| !p.is_empty())
            .map(|p| format!("{p}\\Common Files\\OFX"));
        let host = host_dir
            .map(|h| h.trim_end_matches(is_separator))
            .filter(|h| !h.is_empty())
            .map(str::to_string);
        Self { shared, host }
    }

    /// Shared directory from `%ProgramFiles%` of the current process; no host
    /// directory.
    pub fn detect() -> Self {
        let program_files = std::env::var("ProgramFiles").ok();
        Self::from_host(program_files.as_deref(), None)
    }

    /// Fill whatever is unset from `fallback`.
    pub fn or(self, fallback: StandardDirs) -> Self {
        Self {
            shared: self.shared.or(fallback.shared),
            host: self.host.or(fallback.host),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLocation {
    StandardShared,
    StandardHost,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    pub path: PathBuf,
    pub location: OutputLocation,
}

fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/// `<module stem><suffix>.xml`, e.g. `Blur.de-DE.xml` for `...\Blur.ofx`.
pub fn output_file_name(module_path: &str, suffix: &str) -> String {
    let base = module_path.rsplit(is_separator).next().unwrap_or(module_path);
    let stem = match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => base,
    };
    format!("{stem}{suffix}.xml")
}

/// Case-insensitive prefix strip where `\` and `/` are interchangeable.
fn strip_prefix_ci<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let mut rest = path.char_indices();
    for p in prefix.chars() {
        let (_, c) = rest.next()?;
        let same = if is_separator(p) {
            is_separator(c)
        } else {
            c == p || c.to_lowercase().eq(p.to_lowercase())
        };
        if !same {
            return None;
        }
    }
    Some(match rest.next() {
        Some((idx, _)) => &path[idx..],
        None => "",
    })
}

pub fn resolve_output_path(
    module_path: &str,
    out_root: &Path,
    suffix: &str,
    dirs: &StandardDirs,
) -> ResolvedOutput {
    let file_name = output_file_name(module_path, suffix);

    let candidates = [
        (dirs.shared.as_deref(), OutputLocation::StandardShared),
        (dirs.host.as_deref(), OutputLocation::StandardHost),
    ];
    let matched = candidates.into_iter().find_map(|(prefix, location)| {
        prefix
            .and_then(|p| strip_prefix_ci(module_path, p))
            .map(|rest| (rest, location))
    });

    let Some((remainder, location)) = matched else {
        return ResolvedOutput {
            path: out_root.join(file_name),
            location: OutputLocation::Other,
        };
    };

    // <vendor>\<name>.ofx.bundle\<arch>\<name>.ofx: drop the binary and its
    // architecture directory to land on the bundle contents.
    let segments: Vec<&str> = remainder
        .split(is_separator)
        .filter(|s| !s.is_empty())
        .collect();
    let keep = segments.len().saturating_sub(2);

    let mut path = out_root.to_path_buf();
    for segment in &segments[..keep] {
        path.push(segment);
    }
    path.push("Resources");
    path.push(file_name);

    ResolvedOutput { path, location }
}
