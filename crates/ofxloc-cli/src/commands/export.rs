use clap::Args;
use ofxloc_export_xml::FsSink;
use ofxloc_registry::JsonRegistry;
use ofxloc_resource::{FilterMode, OutputLocation};
use ofxloc_services::{plan_export, ExportOptions, ExportOverrides, ExportSummary, Resilience, Variant};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Registry snapshot (JSON) describing the installed plugins
    #[arg(short, long)]
    pub registry: PathBuf,

    /// Output root (defaults to OFX_XML on the desktop)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// `;`-separated regex fragments matched against plugin ids
    #[arg(long)]
    pub pattern: Option<String>,

    /// Whether pattern matches are dropped (deny) or kept (allow)
    #[arg(long, value_parser = clap::value_parser!(FilterMode))]
    pub mode: Option<FilterMode>,

    /// Suffix inserted before `.xml`, e.g. `.fr-FR`
    #[arg(long, allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// Highest index for expanded group parameters
    #[arg(long, allow_negative_numbers = true)]
    pub group_max: Option<i64>,

    /// Preset: standard, classic or ignite
    #[arg(long, value_parser = clap::value_parser!(Variant))]
    pub variant: Option<Variant>,

    /// On plugin load failure: skip or propagate
    #[arg(long, value_parser = clap::value_parser!(Resilience))]
    pub resilience: Option<Resilience>,

    /// Shared OFX install directory used to mirror bundle layout
    #[arg(long)]
    pub shared_ofx_dir: Option<String>,

    /// Host specific OFX install directory
    #[arg(long)]
    pub host_ofx_dir: Option<String>,

    /// Build everything but write nothing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Output format: text or json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

pub fn run_export(args: ExportArgs, use_color: bool) -> color_eyre::Result<()> {
    tracing::debug!(event = "export_args", registry = ?args.registry, out_dir = ?args.out_dir, dry_run = args.dry_run);

    let cfg = ofxloc_config::load_config()?;
    let opts = ExportOptions::resolve(
        &cfg,
        ExportOverrides {
            output_dir: args.out_dir,
            pattern: args.pattern,
            mode: args.mode,
            suffix: args.suffix,
            group_max: args.group_max,
            variant: args.variant,
            resilience: args.resilience,
            shared_ofx_dir: args.shared_ofx_dir,
            host_ofx_dir: args.host_ofx_dir,
        },
    )?;
    tracing::info!(
        event = "export_options",
        out = %opts.output_dir.display(),
        pattern = %opts.filter_pattern,
        mode = ?opts.filter_mode,
        group_max = opts.map.group_max
    );

    let registry = JsonRegistry::load(&args.registry)?;
    let summary = if args.dry_run {
        plan_export(&registry, &opts)?.0
    } else {
        ofxloc_services::run_export(&registry, &opts, &mut FsSink)?
    };

    if args.format == "json" {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &summary)?;
        println!();
        return Ok(());
    }
    print_summary(&summary, args.dry_run, use_color);
    Ok(())
}

fn location_tag(location: OutputLocation) -> &'static str {
    match location {
        OutputLocation::StandardShared => "shared",
        OutputLocation::StandardHost => "host",
        OutputLocation::Other => "other",
    }
}

fn print_summary(summary: &ExportSummary, dry_run: bool, use_color: bool) {
    let verb = if dry_run { "would write" } else { "wrote" };
    for file in &summary.files {
        let path = file.path.display().to_string();
        if use_color {
            use owo_colors::OwoColorize;
            println!(
                "{} {} {} [{}] ({} plugins)",
                "✔".green(),
                verb,
                path.blue(),
                location_tag(file.location).magenta(),
                file.plugins
            );
        } else {
            println!(
                "✔ {} {} [{}] ({} plugins)",
                verb,
                path,
                location_tag(file.location),
                file.plugins
            );
        }
    }

    let totals = format!(
        "{} documents, {} plugins, {} filtered, {} without id, {} failed",
        summary.documents, summary.plugins, summary.filtered, summary.skipped_ids, summary.failed
    );
    if use_color && summary.failed > 0 {
        use owo_colors::OwoColorize;
        println!("{}", totals.yellow());
    } else {
        println!("{totals}");
    }
}
