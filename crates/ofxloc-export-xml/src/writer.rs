use color_eyre::eyre::Result;
use ofxloc_core::{OutputParameter, Plugin, ResourceDocument};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;

const ROOT: &str = "OfxImageEffectResource";
const PLUGIN: &str = "OfxPlugin";
const RESOURCE_SET: &str = "OfxResourceSet";
const CONTEXT: &str = "OfxImageEffectContext";
const LABEL: &str = "OfxPropLabel";
const GROUPING: &str = "OfxImageEffectPluginPropGrouping";
const DESCRIPTION: &str = "OfxPropPluginDescription";
const HINT: &str = "OfxParamPropHint";
const CHOICE_OPTION: &str = "OfxParamPropChoiceOption";

/// Render a document to a UTF-8 XML string.
pub fn render_document(doc: &ResourceDocument) -> Result<String> {
    let mut buf = Vec::new();
    write_resource_xml(&mut buf, doc)?;
    Ok(String::from_utf8(buf)?)
}

/// Write `doc` as an `OfxImageEffectResource` document, two-space indented,
/// no namespace. Absent values are omitted, empty ones become empty elements.
pub fn write_resource_xml<W: Write>(out: W, doc: &ResourceDocument) -> Result<()> {
    let mut w = Writer::new_with_indent(out, b' ', 2);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    if doc.plugins.is_empty() {
        w.write_event(Event::Empty(BytesStart::new(ROOT)))?;
    } else {
        w.write_event(Event::Start(BytesStart::new(ROOT)))?;
        for plugin in &doc.plugins {
            write_plugin(&mut w, plugin)?;
        }
        w.write_event(Event::End(BytesEnd::new(ROOT)))?;
    }

    w.into_inner().flush()?;
    Ok(())
}

fn write_plugin<W: Write>(w: &mut Writer<W>, plugin: &Plugin) -> Result<()> {
    let mut tag = BytesStart::new(PLUGIN);
    tag.push_attribute(("name", &*xml_chars(&plugin.name)));
    w.write_event(Event::Start(tag))?;

    let set = &plugin.resource_set;
    let mut tag = BytesStart::new(RESOURCE_SET);
    tag.push_attribute(("ofxHost", set.host()));
    w.write_event(Event::Start(tag))?;

    write_text_element(w, LABEL, Some(&set.label))?;
    write_text_element(w, GROUPING, Some(&set.grouping))?;
    write_text_element(w, DESCRIPTION, set.description.as_deref())?;

    let mut tag = BytesStart::new(CONTEXT);
    tag.push_attribute(("name", set.context.name()));
    if set.context.parameters.is_empty() {
        w.write_event(Event::Empty(tag))?;
    } else {
        w.write_event(Event::Start(tag))?;
        for param in &set.context.parameters {
            write_parameter(w, param)?;
        }
        w.write_event(Event::End(BytesEnd::new(CONTEXT)))?;
    }

    w.write_event(Event::End(BytesEnd::new(RESOURCE_SET)))?;
    w.write_event(Event::End(BytesEnd::new(PLUGIN)))?;
    Ok(())
}

fn write_parameter<W: Write>(w: &mut Writer<W>, param: &OutputParameter) -> Result<()> {
    let element = param.kind().element_name();
    let props = param.props();

    let mut tag = BytesStart::new(element);
    tag.push_attribute(("name", &*xml_chars(&props.name)));

    let has_children =
        props.label.is_some() || props.hint.is_some() || !param.options().is_empty();
    if !has_children {
        w.write_event(Event::Empty(tag))?;
        return Ok(());
    }

    w.write_event(Event::Start(tag))?;
    write_text_element(w, LABEL, props.label.as_deref())?;
    write_text_element(w, HINT, props.hint.as_deref())?;
    for option in param.options() {
        write_text_element(w, CHOICE_OPTION, Some(option))?;
    }
    w.write_event(Event::End(BytesEnd::new(element)))?;
    Ok(())
}

fn write_text_element<W: Write>(w: &mut Writer<W>, tag: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let value = xml_chars(value);
    if value.is_empty() {
        w.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    w.write_event(Event::Text(BytesText::new(&value)))?;
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Host strings are free text; control characters and other code points
/// XML 1.0 cannot carry, even escaped, are dropped.
fn xml_chars(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        return Cow::Borrowed(value);
    }
    tracing::warn!(event = "xml_chars_dropped", value = ?value);
    Cow::Owned(value.chars().filter(|c| is_xml_char(*c)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofxloc_core::{Context, ParamKind, ParamProps, ResourceSet};

    fn props(name: &str, label: Option<&str>, hint: Option<&str>) -> ParamProps {
        ParamProps {
            name: name.into(),
            label: label.map(Into::into),
            hint: hint.map(Into::into),
        }
    }

    fn sample() -> ResourceDocument {
        ResourceDocument {
            module_path: r"C:\OFX\Blur.ofx".into(),
            plugins: vec![Plugin {
                name: "com.myco.blur".into(),
                resource_set: ResourceSet {
                    label: "Blur & Soften".into(),
                    grouping: "MyCo".into(),
                    description: Some("Blurs <things>.".into()),
                    context: Context {
                        parameters: vec![
                            OutputParameter::new(
                                ParamKind::Double,
                                props("radius", Some("Radius"), Some("Blur radius")),
                            ),
                            OutputParameter::choice(
                                props("mode", Some(""), None),
                                vec!["Fast".into(), "Best".into()],
                            ),
                            OutputParameter::new(ParamKind::Rgba, props("tint", Some("Tint"), None)),
                        ],
                    },
                },
            }],
        }
    }

    fn elements<'a, 'i>(node: roxmltree::Node<'a, 'i>) -> Vec<roxmltree::Node<'a, 'i>> {
        node.children().filter(|n| n.is_element()).collect()
    }

    #[test]
    fn renders_expected_shape() {
        let xml = render_document(&sample()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(!xml.contains("xmlns"));

        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "OfxImageEffectResource");

        let plugins = elements(root);
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].attribute("name"), Some("com.myco.blur"));

        let set = elements(plugins[0])[0];
        assert_eq!(set.tag_name().name(), "OfxResourceSet");
        assert_eq!(set.attribute("ofxHost"), Some("default"));
        let children = elements(set);
        let tags: Vec<_> = children.iter().map(|n| n.tag_name().name()).collect();
        assert_eq!(
            tags,
            [
                "OfxPropLabel",
                "OfxImageEffectPluginPropGrouping",
                "OfxPropPluginDescription",
                "OfxImageEffectContext"
            ]
        );
        assert_eq!(children[0].text(), Some("Blur & Soften"));
        assert_eq!(children[2].text(), Some("Blurs <things>."));

        let ctx = children[3];
        assert_eq!(ctx.attribute("name"), Some("default"));
        let params = elements(ctx);
        let tags: Vec<_> = params.iter().map(|n| n.tag_name().name()).collect();
        assert_eq!(
            tags,
            ["OfxParamTypeDouble", "OfxParamTypeChoice", "OfxParamTypeRGBA"]
        );

        let radius = elements(params[0]);
        assert_eq!(radius[0].text(), Some("Radius"));
        assert_eq!(radius[1].tag_name().name(), "OfxParamPropHint");

        let choice = elements(params[1]);
        let tags: Vec<_> = choice.iter().map(|n| n.tag_name().name()).collect();
        assert_eq!(
            tags,
            [
                "OfxPropLabel",
                "OfxParamPropChoiceOption",
                "OfxParamPropChoiceOption"
            ]
        );
        assert_eq!(choice[0].text(), None);
        assert_eq!(choice[2].text(), Some("Best"));

        // no hint on tint
        assert_eq!(elements(params[2]).len(), 1);
    }

    #[test]
    fn missing_description_is_omitted() {
        let mut doc = sample();
        doc.plugins[0].resource_set.description = None;
        let xml = render_document(&doc).unwrap();
        assert!(!xml.contains("OfxPropPluginDescription"));
    }

    #[test]
    fn empty_context_is_self_closing() {
        let mut doc = sample();
        doc.plugins[0].resource_set.context.parameters.clear();
        let xml = render_document(&doc).unwrap();
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        let ctx = parsed
            .descendants()
            .find(|n| n.has_tag_name("OfxImageEffectContext"))
            .unwrap();
        assert_eq!(ctx.attribute("name"), Some("default"));
        assert_eq!(elements(ctx).len(), 0);
    }

    #[test]
    fn characters_outside_xml_are_dropped() {
        let mut doc = sample();
        doc.plugins[0].name = "com.myco.\u{1b}blur".into();
        let set = &mut doc.plugins[0].resource_set;
        set.description = Some("Description: bad\u{1}char".into());
        set.label = "\u{0}".into();
        set.context.parameters[0] = OutputParameter::new(
            ParamKind::Double,
            props("rad\u{FFFE}ius", Some("Radius\u{7}"), Some("tab\tkept")),
        );

        let xml = render_document(&doc).unwrap();
        let parsed = roxmltree::Document::parse(&xml).unwrap();

        let plugin = parsed
            .descendants()
            .find(|n| n.has_tag_name("OfxPlugin"))
            .unwrap();
        assert_eq!(plugin.attribute("name"), Some("com.myco.blur"));
        let set = elements(plugin)[0];
        let children = elements(set);
        assert_eq!(children[0].text(), None);
        assert_eq!(children[2].text(), Some("Description: badchar"));

        let radius = parsed
            .descendants()
            .find(|n| n.has_tag_name("OfxParamTypeDouble"))
            .unwrap();
        assert_eq!(radius.attribute("name"), Some("radius"));
        let texts: Vec<_> = elements(radius).iter().map(|n| n.text()).collect();
        assert_eq!(texts, [Some("Radius"), Some("tab\tkept")]);
    }

    #[test]
    fn xml_chars_borrows_clean_text() {
        assert!(matches!(xml_chars("Blur & Soften"), Cow::Borrowed(_)));
        assert_eq!(xml_chars("a\u{b}b\u{FFFF}c"), "abc");
        assert_eq!(xml_chars("日本\u{1F600}"), "日本\u{1F600}");
    }

    #[test]
    fn plugin_order_is_preserved() {
        let mut doc = sample();
        let mut second = doc.plugins[0].clone();
        second.name = "com.myco.a".into();
        doc.plugins.push(second);
        let xml = render_document(&doc).unwrap();
        let first = xml.find("com.myco.blur").unwrap();
        let second = xml.find("com.myco.a\"").unwrap();
        assert!(first < second);
    }
}
