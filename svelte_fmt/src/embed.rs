//! Printing of `<script>` and `<style>` regions.
//!
//! The body of a region is handed to the external formatter untouched,
//! then re-indented line by line.

use crate::{
    Hints,
    ast::{Attribute, AttributeValue, Node, NodeKind, Script, Text},
    ctx::Ctx,
    doc::Doc,
    extract::{CONTENT_ATTR, decode_content},
    printer::{DocGen, DocResult},
    state::{Slot, State},
};
use std::borrow::Cow;

pub(crate) fn region_doc<'s, E, F>(
    kind: &NodeKind<'s>,
    script: &Script<'s>,
    ctx: &mut Ctx<'_, E, F>,
) -> DocResult<'s>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    let is_style = matches!(kind, NodeKind::Style(..));
    let (tag_name, indent) = if is_style {
        ("style", ctx.options.style_indent)
    } else {
        ("script", ctx.options.script_indent)
    };

    let state = State::new(Slot::Attributes);
    let attrs = ctx.indented(|ctx| {
        script
            .attributes
            .iter()
            .filter(|attr| !is_content_attr(attr))
            .map(|attr| attr.doc(ctx, &state))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let content = original_content(script);
    let lines = if content.trim().is_empty() {
        vec![]
    } else {
        let ext = region_lang(script).unwrap_or(if is_style { "css" } else { "js" });
        tracing::trace!(tag_name, ext, "formatting embedded region");
        let formatted = if is_style {
            ctx.format_style(&content, ext)
        } else {
            ctx.format_script(&content, ext)
        };
        dedent_lines(&formatted)
    };

    let mut docs = vec![
        Doc::text("<"),
        Doc::text(tag_name),
        Doc::list(attrs)
            .append(Doc::soft_line().dedent())
            .group()
            .indent(),
        Doc::text(">"),
    ];
    if !lines.is_empty() {
        let body = Doc::list(
            lines
                .into_iter()
                .flat_map(|line| {
                    // no trailing indentation on blank lines
                    let line_break = if line.is_empty() {
                        Doc::empty_line()
                    } else {
                        Doc::hard_line()
                    };
                    [line_break, Doc::text(line)]
                })
                .collect(),
        );
        docs.push(if indent { body.indent() } else { body });
        docs.push(Doc::hard_line());
    }
    docs.push(Doc::text("</"));
    docs.push(Doc::text(tag_name));
    docs.push(Doc::text(">"));
    Ok(Doc::list(docs))
}

fn is_content_attr(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Attribute(Attribute { name, .. }) if *name == CONTENT_ATTR)
}

/// Body as written by the user, recovered from the encoded attribute
/// which preprocessing left on the tag.
fn original_content<'s>(script: &Script<'s>) -> Cow<'s, str> {
    let encoded = script.attributes.iter().find_map(|attr| match &attr.kind {
        NodeKind::Attribute(Attribute {
            name,
            value: AttributeValue::Fragments(value),
        }) if *name == CONTENT_ATTR => match value.as_slice() {
            [] => Some(""),
            [
                Node {
                    kind: NodeKind::Text(Text { data }),
                    ..
                },
            ] => Some(*data),
            _ => None,
        },
        _ => None,
    });
    match encoded.map(|encoded| (encoded, decode_content(encoded))) {
        Some((_, Some(content))) => Cow::Owned(content),
        Some((encoded, None)) => {
            tracing::debug!(encoded, "failed to decode region content, using the visible body");
            Cow::Borrowed(script.content)
        }
        None => Cow::Borrowed(script.content),
    }
}

/// Language of a region from its `lang` or `type` attribute,
/// as a file extension for the external formatter.
fn region_lang<'s>(script: &Script<'s>) -> Option<&'s str> {
    let attr_value = |attr_name: &str| {
        script.attributes.iter().find_map(|attr| match &attr.kind {
            NodeKind::Attribute(Attribute {
                name,
                value: AttributeValue::Fragments(value),
            }) if name.eq_ignore_ascii_case(attr_name) => match value.as_slice() {
                [
                    Node {
                        kind: NodeKind::Text(Text { data }),
                        ..
                    },
                ] => Some(*data),
                _ => None,
            },
            _ => None,
        })
    };
    let lang = attr_value("lang").or_else(|| attr_value("type"))?.trim();
    let lang = lang
        .strip_prefix("text/")
        .or_else(|| lang.strip_prefix("application/"))
        .unwrap_or(lang);
    match lang {
        "" => None,
        "javascript" | "module" | "babel" => Some("js"),
        "typescript" => Some("ts"),
        lang => Some(lang),
    }
}

/// Splits formatted code into lines without surrounding blank lines
/// and without the indentation shared by all of them.
fn dedent_lines(code: &str) -> Vec<String> {
    let lines = code
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.trim_end_matches('\r')
            }
        })
        .collect::<Vec<_>>();
    let Some(start) = lines.iter().position(|line| !line.is_empty()) else {
        return vec![];
    };
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(start, |i| i + 1);
    let lines = &lines[start..end];

    let indent = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or_default();
    lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or_default().to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::FormatOptions, format_text};
    use std::convert::Infallible;

    fn script_with(attrs: Vec<(&'static str, &'static str)>) -> Script<'static> {
        Script {
            attributes: attrs
                .into_iter()
                .map(|(name, data)| Node {
                    kind: NodeKind::Attribute(Attribute {
                        name,
                        value: AttributeValue::Fragments(vec![Node {
                            kind: NodeKind::Text(Text { data }),
                            start: 0,
                            end: 0,
                        }]),
                    }),
                    start: 0,
                    end: 0,
                })
                .collect(),
            content: "",
        }
    }

    #[test]
    fn lang_from_attributes() {
        assert_eq!(region_lang(&script_with(vec![("lang", "ts")])), Some("ts"));
        assert_eq!(
            region_lang(&script_with(vec![("type", "text/typescript")])),
            Some("ts")
        );
        assert_eq!(
            region_lang(&script_with(vec![("type", "module")])),
            Some("js")
        );
        assert_eq!(
            region_lang(&script_with(vec![("type", "application/javascript")])),
            Some("js")
        );
        assert_eq!(
            region_lang(&script_with(vec![("type", "text/css"), ("lang", "scss")])),
            Some("scss")
        );
        assert_eq!(region_lang(&script_with(vec![("context", "module")])), None);
    }

    #[test]
    fn content_falls_back_to_visible_body() {
        let mut script = script_with(vec![(CONTENT_ATTR, "not base64!")]);
        script.content = "let a;";
        assert_eq!(original_content(&script), "let a;");

        let script = script_with(vec![]);
        assert_eq!(original_content(&script), "");
    }

    #[test]
    fn lines_are_dedented() {
        assert_eq!(
            dedent_lines("\n\n    a {\n      color: red;\n    }\n\n    b {}\n  \n"),
            ["a {", "  color: red;", "}", "", "b {}"]
        );
        assert_eq!(dedent_lines("\tx\r\n\ty\r\n"), ["x", "y"]);
        assert!(dedent_lines(" \n \n").is_empty());
    }

    #[test]
    fn formatter_receives_hints() {
        let mut calls = vec![];
        let formatted = format_text(
            "<p>a</p>\n<style lang=\"scss\">\n  $c: red;\n  p { color: $c; }\n</style>\n<script type=\"text/typescript\">let a: number</script>",
            &FormatOptions::default(),
            |code, hints| {
                calls.push((code.to_owned(), hints.ext.to_owned(), hints.kind));
                Ok::<_, Infallible>(code.into())
            },
        )
        .unwrap();
        assert_eq!(
            formatted,
            "<script type=\"text/typescript\">\nlet a: number\n</script>\n<p>a</p>\n\n<style lang=\"scss\">\n$c: red;\np { color: $c; }\n</style>\n"
        );
        assert_eq!(
            calls,
            [
                (
                    "let a: number".to_owned(),
                    "ts".to_owned(),
                    crate::EmbedKind::Script
                ),
                (
                    "\n  $c: red;\n  p { color: $c; }\n".to_owned(),
                    "scss".to_owned(),
                    crate::EmbedKind::Style
                ),
            ]
        );
    }
}
