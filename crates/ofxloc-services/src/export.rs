use crate::options::{ExportOptions, Resilience};
use color_eyre::eyre::WrapErr;
use ofxloc_core::Result;
use ofxloc_export_xml::{write_document, MemorySink, OutputSink};
use ofxloc_registry::{collect_plugin_descriptors, PluginRegistry};
use ofxloc_resource::{
    resolve_output_path, DescriptorFilter, FilterOutcome, OutputLocation, ResourceDocuments,
    StandardDirs,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub module_path: String,
    pub path: PathBuf,
    pub location: OutputLocation,
    pub plugins: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    pub documents: usize,
    pub plugins: usize,
    /// Registry entries without a usable OFX id.
    pub skipped_ids: usize,
    /// Entries rejected by the id filter.
    pub filtered: usize,
    /// Entries that failed to materialize (skip mode only).
    pub failed: usize,
    pub files: Vec<ExportFile>,
}

/// Collect, build, sort and write every resource document.
///
/// The output root is created before anything else; failing that aborts the
/// run with nothing written. Files already written are left in place if a
/// later write fails.
pub fn run_export(
    registry: &dyn PluginRegistry,
    opts: &ExportOptions,
    sink: &mut dyn OutputSink,
) -> Result<ExportSummary> {
    let filter = DescriptorFilter::new(&opts.filter_pattern, opts.filter_mode)?;

    sink.ensure_dir(&opts.output_dir).wrap_err_with(|| {
        format!(
            "cannot create output directory {}",
            opts.output_dir.display()
        )
    })?;

    let mut summary = ExportSummary {
        output_dir: opts.output_dir.clone(),
        ..ExportSummary::default()
    };
    let mut docs = build_documents(registry, opts, &filter, &mut summary)?;
    docs.sort_all();

    let dirs = standard_dirs(registry, opts);
    tracing::debug!(event = "standard_dirs", shared = ?dirs.shared, host = ?dirs.host);

    summary.documents = docs.len();
    summary.plugins = docs.plugin_count();

    for doc in docs.iter() {
        let resolved = resolve_output_path(
            &doc.module_path,
            &opts.output_dir,
            &opts.suffix,
            &dirs,
        );
        write_document(sink, &resolved.path, doc)?;
        tracing::info!(
            event = "export_written",
            path = %resolved.path.display(),
            location = ?resolved.location,
            plugins = doc.plugins.len()
        );
        summary.files.push(ExportFile {
            module_path: doc.module_path.clone(),
            path: resolved.path,
            location: resolved.location,
            plugins: doc.plugins.len(),
        });
    }

    tracing::info!(
        event = "export_finished",
        documents = summary.documents,
        plugins = summary.plugins,
        skipped_ids = summary.skipped_ids,
        filtered = summary.filtered,
        failed = summary.failed
    );
    Ok(summary)
}

/// Same as [`run_export`] but nothing touches the filesystem. Returns the
/// summary and the rendered files.
pub fn plan_export(
    registry: &dyn PluginRegistry,
    opts: &ExportOptions,
) -> Result<(ExportSummary, MemorySink)> {
    let mut sink = MemorySink::default();
    let summary = run_export(registry, opts, &mut sink)?;
    Ok((summary, sink))
}

/// Configured directories first, then what the registry knows about the
/// host, then the current machine.
fn standard_dirs(registry: &dyn PluginRegistry, opts: &ExportOptions) -> StandardDirs {
    opts.standard_dirs
        .clone()
        .or(StandardDirs::from_host(
            registry.program_files_dir(),
            registry.host_dir(),
        ))
        .or(StandardDirs::detect())
}

fn build_documents(
    registry: &dyn PluginRegistry,
    opts: &ExportOptions,
    filter: &DescriptorFilter,
    summary: &mut ExportSummary,
) -> Result<ResourceDocuments> {
    let mut docs = ResourceDocuments::new();

    for entry in collect_plugin_descriptors(registry.root()) {
        let plugin_id = match filter.check(&entry.unique_id) {
            FilterOutcome::NoId => {
                tracing::debug!(event = "plugin_no_id", unique_id = %entry.unique_id);
                summary.skipped_ids += 1;
                continue;
            }
            FilterOutcome::Filtered(id) => {
                tracing::debug!(event = "plugin_filtered", plugin = %id, mode = ?filter.mode());
                summary.filtered += 1;
                continue;
            }
            FilterOutcome::Accepted(id) => id,
        };

        let descriptor = match registry.materialize(entry) {
            Ok(d) => d,
            Err(e) => match opts.resilience {
                Resilience::Skip => {
                    tracing::warn!(event = "plugin_skipped", plugin = %plugin_id, error = %e);
                    summary.failed += 1;
                    continue;
                }
                Resilience::Propagate => return Err(e),
            },
        };

        docs.add_plugin(plugin_id, &descriptor, &opts.map);
    }

    Ok(docs)
}
