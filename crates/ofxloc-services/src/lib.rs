//! Export use cases: option resolution (variant preset, config file, flags)
//! and the registry-to-files pipeline the CLI drives.

mod export;
mod options;

pub use export::{plan_export, run_export, ExportFile, ExportSummary};
pub use ofxloc_core::Result;
pub use options::{
    default_output_dir, resolve_group_max, ExportOptions, ExportOverrides, Resilience, Variant,
    SUFFIX_PRESETS,
};
