use crate::writer::render_document;
use color_eyre::eyre::{Result, WrapErr};
use ofxloc_core::ResourceDocument;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Destination for generated files.
pub trait OutputSink {
    /// Create `path` and its parents if missing.
    fn ensure_dir(&mut self, path: &Path) -> Result<()>;
    fn write_file(&mut self, path: &Path, content: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn ensure_dir(&mut self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .wrap_err_with(|| format!("failed to create directory {}", path.display()))
    }

    fn write_file(&mut self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content)
            .wrap_err_with(|| format!("failed to write {}", path.display()))
    }
}

/// Keeps everything in memory; used for dry runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub dirs: BTreeSet<PathBuf>,
    pub files: BTreeMap<PathBuf, String>,
}

impl OutputSink for MemorySink {
    fn ensure_dir(&mut self, path: &Path) -> Result<()> {
        self.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&mut self, path: &Path, content: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

/// Render `doc` and write it to `path`, creating the parent directory first.
pub fn write_document(sink: &mut dyn OutputSink, path: &Path, doc: &ResourceDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        sink.ensure_dir(parent)?;
    }
    let xml = render_document(doc)?;
    sink.write_file(path, &xml)?;
    tracing::debug!(event = "document_written", path = %path.display(), plugins = doc.plugins.len());
    Ok(())
}
