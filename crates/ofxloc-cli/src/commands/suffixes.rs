use ofxloc_services::SUFFIX_PRESETS;

pub fn run_suffixes() -> color_eyre::Result<()> {
    for suffix in SUFFIX_PRESETS {
        if suffix.is_empty() {
            println!("(none)");
        } else {
            println!("{suffix}");
        }
    }
    Ok(())
}
