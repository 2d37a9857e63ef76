//! Numbered group expansion.
//!
//! Hosts only report the first instance of a repeated group ("Layer1"), while
//! plugins create "Layer1".."LayerN" at runtime. Translation files need an
//! entry for every instance, so a group whose name ends in digits is emitted
//! once per index up to a configurable cap.

use ofxloc_core::ParamProps;
use once_cell::sync::Lazy;
use regex::Regex;

pub const GROUP_PLACEHOLDER: &str = "{0}";

static TRAILING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+$").unwrap());

/// Number of groups already expanded in the current context.
///
/// Each expanding group starts its run at this count rather than at zero, so
/// the second group of a plugin starts at 1, the third at 2 and so on. This
/// mirrors the output existing translation packs were generated with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupCounter {
    expanded: u32,
}

impl GroupCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> u32 {
        self.expanded
    }
}

/// Naming template for a group: trailing digits of `name` become the
/// placeholder. When `label` ends in digits that prefix the name's digits,
/// those are kept literally in front of the placeholder.
///
/// `("Layer10", "Layer 1")` gives `"Layer1{0}"`; a name without trailing
/// digits is returned as is.
pub fn group_name_template(name: &str, label: &str) -> String {
    let Some(name_digits) = TRAILING_DIGITS.find(name) else {
        return name.to_string();
    };

    let mut replacement = GROUP_PLACEHOLDER.to_string();
    if let Some(label_digits) = TRAILING_DIGITS.find(label) {
        if name_digits.as_str().starts_with(label_digits.as_str()) {
            replacement = format!("{}{}", label_digits.as_str(), GROUP_PLACEHOLDER);
        }
    }

    format!("{}{}", &name[..name_digits.start()], replacement)
}

/// Expanded run for one group parameter, or `None` when its template has no
/// placeholder and the parameter should be emitted unchanged.
pub fn expand_group(
    group: &ParamProps,
    group_max: u32,
    counter: &mut GroupCounter,
) -> Option<Vec<ParamProps>> {
    let template = group_name_template(&group.name, group.label.as_deref().unwrap_or(""));
    if !template.contains(GROUP_PLACEHOLDER) {
        return None;
    }

    let run = (counter.expanded..=group_max)
        .map(|i| ParamProps {
            name: template.replace(GROUP_PLACEHOLDER, &i.to_string()),
            label: group.label.clone(),
            hint: group.hint.clone(),
        })
        .collect();
    counter.expanded += 1;
    Some(run)
}
