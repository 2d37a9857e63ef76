//! Transformation from raw plugin descriptors to translation resource
//! documents: id filtering, description extraction, parameter mapping with
//! group expansion, per-module accumulation, ordering and output paths.

pub mod builder;
pub mod description;
pub mod filter;
pub mod group;
pub mod params;
pub mod path;
pub mod sort;

pub use builder::{build_plugin, ResourceDocuments};
pub use description::{extract_description, DESCRIPTION_KEYWORDS};
pub use filter::{extract_plugin_id, DescriptorFilter, FilterMode, FilterOutcome};
pub use group::{expand_group, group_name_template, GroupCounter, GROUP_PLACEHOLDER};
pub use params::{map_parameter, map_parameters, MapOptions, DEFAULT_GROUP_MAX};
pub use path::{output_file_name, resolve_output_path, OutputLocation, ResolvedOutput, StandardDirs};
pub use sort::{compare_plugin_names, sort_plugins};

/// Host strings come padded with spaces and stray newlines. Spaces are
/// stripped first, then newlines, so "\n x \n" keeps its inner spaces.
pub fn clean_text(s: &str) -> &str {
    s.trim_matches(' ').trim_matches('\n')
}

#[cfg(test)]
mod tests {
    use super::clean_text;

    #[test]
    fn clean_text_strips_spaces_then_newlines() {
        assert_eq!(clean_text("  Radius \n"), "Radius ");
        assert_eq!(clean_text(" Radius "), "Radius");
        assert_eq!(clean_text("\nRadius\n"), "Radius");
        assert_eq!(clean_text("\n Radius \n"), " Radius ");
        assert_eq!(clean_text("   "), "");
    }
}
