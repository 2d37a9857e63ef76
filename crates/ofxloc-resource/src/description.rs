/// Section headers plugin vendors use for the description inside the info
/// blob, one per shipped locale.
pub const DESCRIPTION_KEYWORDS: [&str; 9] = [
    "Beschreibung:",
    "Description:",
    "Descripción:",
    "Description :",
    "説明：",
    "설명:",
    "Opis:",
    "Descrição:",
    "说明:",
];

/// Text following the earliest description header in `info`, with leading
/// spaces removed. Position decides, not keyword order; keyword order only
/// breaks ties at the same offset.
pub fn extract_description(info: Option<&str>) -> Option<&str> {
    let text = info.filter(|s| !s.is_empty())?;

    let mut found: Option<(usize, &str)> = None;
    for keyword in DESCRIPTION_KEYWORDS {
        if let Some(idx) = text.find(keyword) {
            if found.map_or(true, |(best, _)| idx < best) {
                found = Some((idx, keyword));
            }
        }
    }

    let (idx, keyword) = found?;
    Some(text[idx + keyword.len()..].trim_start_matches(' '))
}
