use crate::clean_text;
use crate::group::{expand_group, GroupCounter};
use ofxloc_core::{Context, OutputParameter, ParamKind, ParamProps, RawParameter};

pub const DEFAULT_GROUP_MAX: u32 = 250;

/// Knobs that differ between export variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    pub expand_groups: bool,
    /// Highest index emitted by group expansion, inclusive.
    pub group_max: u32,
    /// Leave `*fontindex*` choices without options; their option lists are
    /// installed font names, not translatable strings.
    pub suppress_font_index_options: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            expand_groups: true,
            group_max: DEFAULT_GROUP_MAX,
            suppress_font_index_options: true,
        }
    }
}

fn cleaned(value: Option<&str>) -> Option<String> {
    value.map(|v| clean_text(v).to_string())
}

/// Map one raw parameter and append the result(s) to `out`. Parameters with
/// an unknown kind, no name, or no label (Choice excepted) are dropped.
pub fn map_parameter(
    raw: &RawParameter,
    opts: &MapOptions,
    counter: &mut GroupCounter,
    out: &mut Vec<OutputParameter>,
) {
    let Some(kind) = ParamKind::from_raw(&raw.kind) else {
        tracing::trace!(event = "param_unmapped", kind = %raw.kind, name = ?raw.name);
        return;
    };

    let name = cleaned(raw.name.as_deref()).unwrap_or_default();
    let label = cleaned(raw.label.as_deref());
    let hint = cleaned(raw.hint.as_deref());

    let label_missing = label.as_deref().map_or(true, str::is_empty);
    if name.is_empty() || (label_missing && kind != ParamKind::Choice) {
        tracing::trace!(event = "param_dropped", kind = ?kind, name = %name);
        return;
    }

    let props = ParamProps { name, label, hint };

    match kind {
        ParamKind::Choice => {
            let suppress = opts.suppress_font_index_options
                && props.name.to_lowercase().contains("fontindex");
            let options = if suppress {
                Vec::new()
            } else {
                raw.choices.clone()
            };
            out.push(OutputParameter::choice(props, options));
        }
        ParamKind::Group if opts.expand_groups => {
            match expand_group(&props, opts.group_max, counter) {
                Some(run) => out.extend(run.into_iter().map(OutputParameter::Group)),
                None => out.push(OutputParameter::Group(props)),
            }
        }
        _ => out.push(OutputParameter::new(kind, props)),
    }
}

/// Build the single context of a plugin from its raw parameters, in order.
pub fn map_parameters(raws: &[RawParameter], opts: &MapOptions) -> Context {
    let mut counter = GroupCounter::new();
    let mut parameters = Vec::with_capacity(raws.len());
    for raw in raws {
        map_parameter(raw, opts, &mut counter, &mut parameters);
    }
    Context { parameters }
}
