//! Output tree of a translation resource document:
//! document → plugin → resource set → context → parameters.

use serde::{Deserialize, Serialize};

/// Value of `OfxResourceSet/@ofxHost`.
pub const DEFAULT_HOST: &str = "default";
/// Value of `OfxImageEffectContext/@name`.
pub const DEFAULT_CONTEXT_NAME: &str = "default";

/// Closed set of parameter kinds that end up in a resource document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Group,
    Boolean,
    Choice,
    Custom,
    Double2D,
    Double3D,
    Double,
    Integer2D,
    Integer3D,
    Integer,
    #[serde(rename = "RGBA")]
    Rgba,
    #[serde(rename = "RGB")]
    Rgb,
    String,
    PushButton,
    Image,
}

impl ParamKind {
    pub const ALL: [ParamKind; 15] = [
        ParamKind::Group,
        ParamKind::Boolean,
        ParamKind::Choice,
        ParamKind::Custom,
        ParamKind::Double2D,
        ParamKind::Double3D,
        ParamKind::Double,
        ParamKind::Integer2D,
        ParamKind::Integer3D,
        ParamKind::Integer,
        ParamKind::Rgba,
        ParamKind::Rgb,
        ParamKind::String,
        ParamKind::PushButton,
        ParamKind::Image,
    ];

    /// Map a host type code. The host reports image clips as the bare code "16".
    pub fn from_raw(code: &str) -> Option<Self> {
        let kind = match code {
            "Group" => ParamKind::Group,
            "Boolean" => ParamKind::Boolean,
            "Choice" => ParamKind::Choice,
            "Custom" => ParamKind::Custom,
            "Double2D" => ParamKind::Double2D,
            "Double3D" => ParamKind::Double3D,
            "Double" => ParamKind::Double,
            "Integer2D" => ParamKind::Integer2D,
            "Integer3D" => ParamKind::Integer3D,
            "Integer" => ParamKind::Integer,
            "RGBA" => ParamKind::Rgba,
            "RGB" => ParamKind::Rgb,
            "String" => ParamKind::String,
            "PushButton" => ParamKind::PushButton,
            "16" => ParamKind::Image,
            _ => return None,
        };
        Some(kind)
    }

    pub fn element_name(self) -> &'static str {
        match self {
            ParamKind::Group => "OfxParamTypeGroup",
            ParamKind::Boolean => "OfxParamTypeBoolean",
            ParamKind::Choice => "OfxParamTypeChoice",
            ParamKind::Custom => "OfxParamTypeCustom",
            ParamKind::Double2D => "OfxParamTypeDouble2D",
            ParamKind::Double3D => "OfxParamTypeDouble3D",
            ParamKind::Double => "OfxParamTypeDouble",
            ParamKind::Integer2D => "OfxParamTypeInteger2D",
            ParamKind::Integer3D => "OfxParamTypeInteger3D",
            ParamKind::Integer => "OfxParamTypeInteger",
            ParamKind::Rgba => "OfxParamTypeRGBA",
            ParamKind::Rgb => "OfxParamTypeRGB",
            ParamKind::String => "OfxParamTypeString",
            ParamKind::PushButton => "OfxParamTypePushButton",
            ParamKind::Image => "OfxParamTypeImage",
        }
    }
}

/// Properties shared by every parameter element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamProps {
    pub name: String,
    /// Always present and non-empty except on Choice parameters.
    pub label: Option<String>,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceParam {
    #[serde(flatten)]
    pub props: ParamProps,
    pub options: Vec<String>,
}

/// A typed parameter element. Only Choice carries options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OutputParameter {
    Group(ParamProps),
    Boolean(ParamProps),
    Choice(ChoiceParam),
    Custom(ParamProps),
    Double2D(ParamProps),
    Double3D(ParamProps),
    Double(ParamProps),
    Integer2D(ParamProps),
    Integer3D(ParamProps),
    Integer(ParamProps),
    #[serde(rename = "RGBA")]
    Rgba(ParamProps),
    #[serde(rename = "RGB")]
    Rgb(ParamProps),
    String(ParamProps),
    PushButton(ParamProps),
    Image(ParamProps),
}

impl OutputParameter {
    /// Build a parameter of `kind`; a Choice built this way has no options.
    pub fn new(kind: ParamKind, props: ParamProps) -> Self {
        match kind {
            ParamKind::Group => OutputParameter::Group(props),
            ParamKind::Boolean => OutputParameter::Boolean(props),
            ParamKind::Choice => OutputParameter::Choice(ChoiceParam {
                props,
                options: Vec::new(),
            }),
            ParamKind::Custom => OutputParameter::Custom(props),
            ParamKind::Double2D => OutputParameter::Double2D(props),
            ParamKind::Double3D => OutputParameter::Double3D(props),
            ParamKind::Double => OutputParameter::Double(props),
            ParamKind::Integer2D => OutputParameter::Integer2D(props),
            ParamKind::Integer3D => OutputParameter::Integer3D(props),
            ParamKind::Integer => OutputParameter::Integer(props),
            ParamKind::Rgba => OutputParameter::Rgba(props),
            ParamKind::Rgb => OutputParameter::Rgb(props),
            ParamKind::String => OutputParameter::String(props),
            ParamKind::PushButton => OutputParameter::PushButton(props),
            ParamKind::Image => OutputParameter::Image(props),
        }
    }

    pub fn choice(props: ParamProps, options: Vec<String>) -> Self {
        OutputParameter::Choice(ChoiceParam { props, options })
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            OutputParameter::Group(_) => ParamKind::Group,
            OutputParameter::Boolean(_) => ParamKind::Boolean,
            OutputParameter::Choice(_) => ParamKind::Choice,
            OutputParameter::Custom(_) => ParamKind::Custom,
            OutputParameter::Double2D(_) => ParamKind::Double2D,
            OutputParameter::Double3D(_) => ParamKind::Double3D,
            OutputParameter::Double(_) => ParamKind::Double,
            OutputParameter::Integer2D(_) => ParamKind::Integer2D,
            OutputParameter::Integer3D(_) => ParamKind::Integer3D,
            OutputParameter::Integer(_) => ParamKind::Integer,
            OutputParameter::Rgba(_) => ParamKind::Rgba,
            OutputParameter::Rgb(_) => ParamKind::Rgb,
            OutputParameter::String(_) => ParamKind::String,
            OutputParameter::PushButton(_) => ParamKind::PushButton,
            OutputParameter::Image(_) => ParamKind::Image,
        }
    }

    pub fn props(&self) -> &ParamProps {
        match self {
            OutputParameter::Choice(c) => &c.props,
            OutputParameter::Group(p)
            | OutputParameter::Boolean(p)
            | OutputParameter::Custom(p)
            | OutputParameter::Double2D(p)
            | OutputParameter::Double3D(p)
            | OutputParameter::Double(p)
            | OutputParameter::Integer2D(p)
            | OutputParameter::Integer3D(p)
            | OutputParameter::Integer(p)
            | OutputParameter::Rgba(p)
            | OutputParameter::Rgb(p)
            | OutputParameter::String(p)
            | OutputParameter::PushButton(p)
            | OutputParameter::Image(p) => p,
        }
    }

    pub fn name(&self) -> &str {
        &self.props().name
    }

    /// Choice options; empty for every other kind.
    pub fn options(&self) -> &[String] {
        match self {
            OutputParameter::Choice(c) => &c.options,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub parameters: Vec<OutputParameter>,
}

impl Context {
    pub fn name(&self) -> &'static str {
        DEFAULT_CONTEXT_NAME
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    pub label: String,
    pub grouping: String,
    pub description: Option<String>,
    pub context: Context,
}

impl ResourceSet {
    pub fn host(&self) -> &'static str {
        DEFAULT_HOST
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Plugin id extracted from the host unique id, never empty.
    pub name: String,
    pub resource_set: ResourceSet,
}

/// Everything written for one module path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDocument {
    pub module_path: String,
    pub plugins: Vec<Plugin>,
}

impl ResourceDocument {
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            plugins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_map_to_kinds() {
        assert_eq!(ParamKind::from_raw("Double3D"), Some(ParamKind::Double3D));
        assert_eq!(ParamKind::from_raw("RGBA"), Some(ParamKind::Rgba));
        assert_eq!(ParamKind::from_raw("16"), Some(ParamKind::Image));
        // the host never reports "Image" by name
        assert_eq!(ParamKind::from_raw("Image"), None);
        assert_eq!(ParamKind::from_raw("Camera"), None);
        assert_eq!(ParamKind::from_raw("double"), None);
    }

    #[test]
    fn every_kind_round_trips_through_output_parameter() {
        for kind in ParamKind::ALL {
            let p = OutputParameter::new(
                kind,
                ParamProps {
                    name: "p".into(),
                    label: Some("P".into()),
                    hint: None,
                },
            );
            assert_eq!(p.kind(), kind);
            assert_eq!(p.name(), "p");
            assert!(p.kind().element_name().starts_with("OfxParamType"));
        }
    }

    #[test]
    fn only_choice_exposes_options() {
        let props = ParamProps {
            name: "style".into(),
            label: None,
            hint: None,
        };
        let choice = OutputParameter::choice(props.clone(), vec!["A".into(), "B".into()]);
        assert_eq!(choice.options(), ["A".to_string(), "B".to_string()]);
        let boolean = OutputParameter::new(ParamKind::Boolean, props);
        assert!(boolean.options().is_empty());
    }

    #[test]
    fn parameters_serialize_with_kind_tag() {
        let p = OutputParameter::new(
            ParamKind::Rgb,
            ParamProps {
                name: "color".into(),
                label: Some("Color".into()),
                hint: Some("Tint".into()),
            },
        );
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["kind"], "RGB");
        assert_eq!(json["name"], "color");
    }
}
