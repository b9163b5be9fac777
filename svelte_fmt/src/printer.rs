use crate::{
    Hints,
    ast::*,
    children::{Child, group_children},
    config::Quotes,
    ctx::Ctx,
    doc::{Doc, LineKind, join},
    embed,
    error::UnexpectedNode,
    helpers,
    state::{Slot, State},
};
use std::borrow::Cow;

pub(crate) type DocResult<'s> = Result<Doc<'s>, UnexpectedNode>;

pub(crate) trait DocGen<'s> {
    fn doc<E, F>(&self, ctx: &mut Ctx<'_, E, F>, state: &State) -> DocResult<'s>
    where
        F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>;
}

impl<'s> DocGen<'s> for Root<'s> {
    fn doc<E, F>(&self, ctx: &mut Ctx<'_, E, F>, _: &State) -> DocResult<'s>
    where
        F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
    {
        let mut parts = Vec::with_capacity(5);
        for script in [&self.module, &self.js, &self.instance].into_iter().flatten() {
            parts.push(script.doc(ctx, &State::new(Slot::Script))?);
        }

        let html = self.html.doc(ctx, &State::new(Slot::Html))?;
        let has_html = !html.is_empty();
        if has_html {
            parts.push(html);
        }

        if let Some(css) = &self.css {
            parts.push(css.doc(ctx, &State::new(Slot::Style))?);
        }

        if parts.is_empty() {
            return Ok(Doc::nil());
        }
        let doc = join(parts, Doc::hard_line()).group();
        // printed markup already ends with a line break
        if has_html && self.css.is_none() {
            Ok(doc)
        } else {
            Ok(doc.append(Doc::hard_line()))
        }
    }
}

impl<'s> DocGen<'s> for Node<'s> {
    fn doc<E, F>(&self, ctx: &mut Ctx<'_, E, F>, state: &State) -> DocResult<'s>
    where
        F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
    {
        if !state.slot.accepts(&self.kind) {
            return Err(state.unexpected(self));
        }

        match &self.kind {
            NodeKind::Fragment(fragment) => {
                if fragment.children.iter().all(is_whitespace_text) {
                    Ok(Doc::nil())
                } else {
                    Ok(print_children(&fragment.children, ctx, false)?.append(Doc::hard_line()))
                }
            }
            NodeKind::Text(text) => {
                if state.slot == Slot::AttributeValue {
                    Ok(Doc::text(text.data))
                } else {
                    Ok(text_doc(text.data))
                }
            }
            NodeKind::Element(element)
            | NodeKind::InlineComponent(element)
            | NodeKind::Slot(element)
            | NodeKind::Window(element)
            | NodeKind::Head(element)
            | NodeKind::Title(element) => element_doc(&self.kind, element, ctx),
            NodeKind::Comment(comment) => Ok(Doc::text("<!--")
                .concat(reflow_raw(comment.data))
                .append(Doc::text("-->"))
                .group()),
            NodeKind::MustacheTag(tag) => Ok(Doc::text(format!(
                "{{{}}}",
                ctx.format_expr(tag.expression.raw)
            ))),
            NodeKind::RawMustacheTag(tag) => Ok(Doc::text(format!(
                "{{@html {}}}",
                ctx.format_expr(tag.expression.raw)
            ))),
            NodeKind::IfBlock(if_block) => {
                let mut docs = vec![
                    Doc::text(format!(
                        "{{#if {}}}",
                        ctx.format_expr(if_block.expression.raw)
                    )),
                    block_children(&if_block.children, ctx)?,
                ];
                if let Some(else_block) = &if_block.else_block {
                    docs.push(else_block.doc(ctx, &State::new(Slot::Else))?);
                }
                docs.push(Doc::text("{/if}"));
                Ok(Doc::list(docs).group())
            }
            NodeKind::ElseBlock(fragment) => match (state.slot, fragment.children.as_slice()) {
                // `{:else if}` chains are flattened, which is only valid in if blocks
                (
                    Slot::Else,
                    [
                        Node {
                            kind: NodeKind::IfBlock(if_block),
                            ..
                        },
                    ],
                ) => {
                    let mut docs = vec![
                        Doc::text(format!(
                            "{{:else if {}}}",
                            ctx.format_expr(if_block.expression.raw)
                        )),
                        block_children(&if_block.children, ctx)?,
                    ];
                    if let Some(else_block) = &if_block.else_block {
                        docs.push(else_block.doc(ctx, &State::new(Slot::Else))?);
                    }
                    Ok(Doc::list(docs).group())
                }
                (_, children) => Ok(Doc::text("{:else}")
                    .append(block_children(children, ctx)?)
                    .group()),
            },
            NodeKind::EachBlock(each_block) => {
                let mut header = format!(
                    "{{#each {} as {}",
                    ctx.format_expr(each_block.expression.raw),
                    ctx.format_binding(each_block.context.raw),
                );
                if let Some(index) = each_block.index {
                    header.push_str(", ");
                    header.push_str(index);
                }
                if let Some(key) = &each_block.key {
                    header = format!("{header} ({})", ctx.format_expr(key.raw));
                }
                header.push('}');

                let mut docs = vec![
                    Doc::text(header),
                    block_children(&each_block.children, ctx)?,
                ];
                if let Some(else_block) = &each_block.else_block {
                    docs.push(else_block.doc(ctx, &State::new(Slot::EachElse))?);
                }
                docs.push(Doc::text("{/each}"));
                Ok(Doc::list(docs).group())
            }
            NodeKind::AwaitBlock(await_block) => {
                let then = match await_block.value {
                    Some(value) => format!("{{:then {}}}", ctx.format_binding(value)),
                    None => "{:then}".into(),
                };
                let catch = match await_block.error {
                    Some(error) => format!("{{:catch {}}}", ctx.format_binding(error)),
                    None => "{:catch}".into(),
                };
                Ok(Doc::list(vec![
                    Doc::text(format!(
                        "{{#await {}}}",
                        ctx.format_expr(await_block.expression.raw)
                    )),
                    ctx.indented(|ctx| await_block.pending.doc(ctx, &State::new(Slot::Pending)))?
                        .indent(),
                    Doc::text(then),
                    ctx.indented(|ctx| await_block.then.doc(ctx, &State::new(Slot::Then)))?
                        .indent(),
                    Doc::text(catch),
                    ctx.indented(|ctx| await_block.catch.doc(ctx, &State::new(Slot::Catch)))?
                        .indent(),
                    Doc::text("{/await}"),
                ])
                .group())
            }
            NodeKind::PendingBlock(fragment)
            | NodeKind::ThenBlock(fragment)
            | NodeKind::CatchBlock(fragment) => print_children(&fragment.children, ctx, true),
            NodeKind::Attribute(attribute) => attribute_doc(attribute, ctx),
            NodeKind::Class(directive) => Ok(directive_doc("class:", directive, true, ctx)),
            NodeKind::EventHandler(directive) => Ok(directive_doc("on:", directive, false, ctx)),
            NodeKind::Binding(directive) => Ok(directive_doc("bind:", directive, true, ctx)),
            NodeKind::Let(directive) => Ok(directive_doc("let:", directive, true, ctx)),
            NodeKind::Action(directive) => Ok(directive_doc("use:", directive, false, ctx)),
            NodeKind::Animation(directive) => Ok(directive_doc("animate:", directive, false, ctx)),
            NodeKind::Transition(transition) => {
                let prefix = match (transition.intro, transition.outro) {
                    (true, true) => "transition:",
                    (true, false) => "in:",
                    _ => "out:",
                };
                Ok(directive_doc(prefix, &transition.directive, false, ctx))
            }
            NodeKind::Ref(directive) => Ok(directive_doc("ref:", directive, false, ctx)),
            NodeKind::DebugTag(debug_tag) => {
                let state = State::new(Slot::DebugIdentifiers);
                let identifiers = debug_tag
                    .identifiers
                    .iter()
                    .map(|identifier| identifier.doc(ctx, &state))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut docs = vec![Doc::text("{@debug")];
                if !identifiers.is_empty() {
                    docs.push(Doc::text(" "));
                    docs.push(join(identifiers, Doc::text(", ")));
                }
                docs.push(Doc::text("}"));
                Ok(Doc::list(docs))
            }
            NodeKind::Spread(spread) => Ok(Doc::line().append(Doc::text(format!(
                "{{...{}}}",
                ctx.format_expr(spread.expression.raw)
            )))),
            NodeKind::Identifier(identifier) => Ok(Doc::text(identifier.name)),
            NodeKind::Script(script) | NodeKind::Style(script) => {
                embed::region_doc(&self.kind, script, ctx)
            }
        }
    }
}

fn element_doc<'s, E, F>(
    kind: &NodeKind<'s>,
    element: &Element<'s>,
    ctx: &mut Ctx<'_, E, F>,
) -> DocResult<'s>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    let raw_text = match (kind, element.children.as_slice()) {
        (
            NodeKind::Element(..),
            [
                Node {
                    kind: NodeKind::Text(text),
                    ..
                },
            ],
        ) if helpers::is_raw_text_element(element.name) => Some(text.data),
        _ => None,
    };
    let not_empty =
        raw_text.is_some() || element.children.iter().any(|child| !is_whitespace_text(child));
    let is_void = !not_empty
        && (!matches!(kind, NodeKind::Element(..)) || helpers::is_void_element(element.name));

    let attrs = ctx.indented(|ctx| -> DocResult<'s> {
        let mut docs = Vec::with_capacity(element.attributes.len() + 2);
        if let (NodeKind::InlineComponent(..), Some(expression)) = (kind, &element.expression) {
            docs.push(Doc::line());
            docs.push(Doc::text(format!(
                "this={{{}}}",
                ctx.format_expr(expression.raw)
            )));
        }
        let state = State::new(Slot::Attributes);
        for attr in &element.attributes {
            docs.push(attr.doc(ctx, &state)?);
        }
        docs.push(if is_void { Doc::line() } else { Doc::soft_line() }.dedent());
        Ok(Doc::list(docs).group().indent())
    })?;

    let mut docs = vec![Doc::text("<"), Doc::text(element.name), attrs];
    if is_void {
        docs.push(Doc::text("/>"));
        return Ok(Doc::list(docs).group());
    }

    docs.push(Doc::text(">"));
    if let Some(text) = raw_text {
        docs.extend(reflow_raw(text));
    } else if not_empty {
        docs.push(block_children(&element.children, ctx)?);
    }
    docs.push(Doc::text("</"));
    docs.push(Doc::text(element.name));
    docs.push(Doc::text(">"));
    Ok(Doc::list(docs).group())
}

fn attribute_doc<'s, E, F>(attribute: &Attribute<'s>, ctx: &mut Ctx<'_, E, F>) -> DocResult<'s>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    let value = match &attribute.value {
        AttributeValue::True => return Ok(Doc::line().append(Doc::text(attribute.name))),
        AttributeValue::Fragments(value) => value,
    };

    if let [
        Node {
            kind: NodeKind::MustacheTag(MustacheTag { expression }),
            ..
        },
    ] = value.as_slice()
    {
        // `name={name}` is the same as `{name}`
        if expression.identifier() == Some(attribute.name) {
            return Ok(Doc::line().append(Doc::text(format!("{{{}}}", attribute.name))));
        }
        if !ctx.options.strict_svelte_attr {
            return Ok(Doc::line().concat([
                Doc::text(attribute.name),
                Doc::text("="),
                Doc::text(format!("{{{}}}", ctx.format_expr(expression.raw))),
            ]));
        }
    }

    let quote = match ctx.options.quotes {
        Quotes::Double => '"',
        Quotes::Single => '\'',
    };
    let contains_quote = value.iter().any(|node| {
        matches!(&node.kind, NodeKind::Text(text) if text.data.contains(quote))
    });
    let quote = match (quote, contains_quote) {
        ('"', true) => "'",
        ('\'', false) => "'",
        _ => "\"",
    };

    let state = State::new(Slot::AttributeValue);
    let value = value
        .iter()
        .map(|node| node.doc(ctx, &state))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Doc::line()
        .concat([Doc::text(attribute.name), Doc::text("="), Doc::text(quote)])
        .concat(value)
        .append(Doc::text(quote)))
}

/// Prints a directive with its prefix, like `on:click|once={handler}`.
///
/// With `collapse`, an expression which is the same identifier as the
/// directive name is omitted.
fn directive_doc<'s, E, F>(
    prefix: &'static str,
    directive: &Directive<'s>,
    collapse: bool,
    ctx: &mut Ctx<'_, E, F>,
) -> Doc<'s>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    let mut docs = vec![Doc::line(), Doc::text(prefix), Doc::text(directive.name)];
    for modifier in &directive.modifiers {
        docs.push(Doc::text("|"));
        docs.push(Doc::text(*modifier));
    }
    match &directive.expression {
        Some(expression) if !(collapse && expression.identifier() == Some(directive.name)) => {
            let expr = ctx.format_expr(expression.raw);
            docs.push(Doc::text(if ctx.options.strict_svelte_attr {
                format!("=\"{{{expr}}}\"")
            } else {
                format!("={{{expr}}}")
            }));
        }
        _ => {}
    }
    Doc::list(docs)
}

fn block_children<'s, E, F>(children: &[Node<'s>], ctx: &mut Ctx<'_, E, F>) -> DocResult<'s>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    Ok(ctx
        .indented(|ctx| print_children(children, ctx, true))?
        .indent())
}

fn print_children<'s, E, F>(
    children: &[Node<'s>],
    ctx: &mut Ctx<'_, E, F>,
    surrounding_lines: bool,
) -> DocResult<'s>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    let state = State::new(Slot::Children);
    let children = children
        .iter()
        .map(|child| {
            let doc = child.doc(ctx, &state)?;
            Ok(match child.kind {
                NodeKind::Text(..) | NodeKind::MustacheTag(..) => Child::Inline(doc),
                _ => Child::Block(doc),
            })
        })
        .collect::<Result<Vec<_>, UnexpectedNode>>()?;
    Ok(group_children(children, surrounding_lines))
}

fn text_doc(data: &str) -> Doc<'_> {
    if helpers::is_whitespace_only(data) {
        Doc::Line {
            kind: LineKind::Line,
            keep_if_lonely: helpers::has_blank_line(data),
        }
    } else {
        Doc::fill(
            itertools::intersperse(
                helpers::split_words(data).into_iter().map(Doc::text),
                Doc::line(),
            )
            .collect(),
        )
    }
}

fn reflow_raw(s: &str) -> impl Iterator<Item = Doc<'_>> {
    itertools::intersperse(
        s.split('\n')
            .map(|s| Doc::text(s.strip_suffix('\r').unwrap_or(s))),
        Doc::empty_line(),
    )
}

fn is_whitespace_text(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Text(text) if helpers::is_whitespace_only(text.data))
}

#[cfg(test)]
mod tests {
    use crate::{
        FormatError, UnexpectedNode, ast::*, config::FormatOptions, format_ast, format_text,
        parse,
    };
    use std::convert::Infallible;

    fn format_with(code: &str, options: &FormatOptions) -> String {
        format_text(code, options, |code, _| Ok::<_, Infallible>(code.into())).unwrap()
    }

    fn format(code: &str) -> String {
        format_with(code, &Default::default())
    }

    #[track_caller]
    fn assert_stable(code: &str) {
        assert_eq!(format(code), code);
    }

    #[test]
    fn inline_run_stays_flat() {
        assert_stable("<p>foo {bar} baz</p>\n");
        assert_eq!(format("<p>foo   {bar}\n baz</p>"), "<p>foo {bar} baz</p>\n");
        assert_stable("<p>{a}{b}, {c}!</p>\n");
    }

    #[test]
    fn block_children_break() {
        assert_eq!(
            format("<div><p>a</p><p>b</p></div>"),
            "<div>\n  <p>a</p>\n  <p>b</p>\n</div>\n"
        );
        assert_eq!(
            format("<div></div>\n<div></div>"),
            "<div></div>\n<div></div>\n"
        );
        assert_stable("<div></div>\n\n<div></div>\n");
        assert_eq!(
            format("<div></div>\n\n\n\n<div></div>"),
            "<div></div>\n\n<div></div>\n"
        );
    }

    #[test]
    fn blank_lines_around_interpolation() {
        assert_stable("<p>a</p>\n\n{c}\n\n<p>b</p>\n");
        assert_eq!(
            format("<p>a</p>\n{c}\n\n\n<p>b</p>"),
            "<p>a</p>\n{c}\n\n<p>b</p>\n"
        );
    }

    #[test]
    fn void_elements() {
        assert_eq!(format("<br>"), "<br />\n");
        assert_eq!(format(r#"<img src="a.png">"#), "<img src=\"a.png\" />\n");
        assert_stable("<div></div>\n");
        assert_stable("<custom-element></custom-element>\n");
        assert_eq!(format("<Foo></Foo>"), "<Foo />\n");
        assert_eq!(format("<slot>  </slot>"), "<slot />\n");
    }

    #[test]
    fn attributes_wrap() {
        let options = FormatOptions {
            layout: crate::config::LayoutOptions {
                print_width: 40,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            format_with(
                r#"<input type="text" name="username" placeholder="Your name" required>"#,
                &options
            ),
            "<input\n  type=\"text\"\n  name=\"username\"\n  placeholder=\"Your name\"\n  required\n/>\n"
        );
        assert_eq!(
            format_with(
                r#"<div class="container" id="main-content-area"><p>a</p></div>"#,
                &options
            ),
            "<div\n  class=\"container\"\n  id=\"main-content-area\"\n>\n  <p>a</p>\n</div>\n"
        );
    }

    #[test]
    fn attribute_values() {
        assert_eq!(format("<input value={value}>"), "<input {value} />\n");
        assert_stable("<input {value} />\n");
        assert_eq!(format("<input value={other}>"), "<input value=\"{other}\" />\n");
        assert_stable("<input value=\"{other}\" />\n");
        assert_eq!(format("<a href=/about title='x'>a</a>"), "<a href=\"/about\" title=\"x\">a</a>\n");
        assert_stable("<p title='say \"hi\"'>a</p>\n");
        assert_stable("<p class=\"a {b} c\">a</p>\n");
        assert_stable("<div {...rest}></div>\n");

        let options = FormatOptions {
            language: crate::config::LanguageOptions {
                quotes: crate::config::Quotes::Single,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            format_with("<input value={other} on:input={handle}>", &options),
            "<input value='{other}' on:input=\"{handle}\" />\n"
        );

        let options = FormatOptions {
            language: crate::config::LanguageOptions {
                strict_svelte_attr: false,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            format_with("<input value=\"{other}\" on:input=\"{handle}\">", &options),
            "<input value={other} on:input={handle} />\n"
        );
    }

    #[test]
    fn directives() {
        assert_eq!(
            format("<div on:click|once={handle} bind:value={value} class:active={active} let:item={item}></div>"),
            "<div on:click|once=\"{handle}\" bind:value class:active let:item></div>\n"
        );
        assert_stable("<div class:active=\"{isActive}\" bind:this=\"{element}\"></div>\n");
        assert_stable("<div use:tooltip=\"{tooltip}\" animate:flip></div>\n");
        assert_stable("<div transition:fade in:fly=\"{{ y: 20 }}\" out:slide|local></div>\n");
        assert_stable("<button on:click>a</button>\n");
    }

    #[test]
    fn if_else_chain() {
        assert_stable("{#if a}\n  <p>x</p>\n{:else}\n  <p>y</p>\n{/if}\n");
        assert_eq!(
            format("{#if a}<p>1</p>{:else if b}<p>2</p>{:else if c}<p>3</p>{:else}<p>4</p>{/if}"),
            "{#if a}\n  <p>1</p>\n{:else if b}\n  <p>2</p>\n{:else if c}\n  <p>3</p>\n{:else}\n  <p>4</p>\n{/if}\n"
        );
        assert_stable("{#if visible}shown{:else}hidden{/if}\n");
    }

    #[test]
    fn each_else_is_never_flattened() {
        let formatted = format("{#each xs as x}{x}{:else}{#if y}a{/if}{/each}");
        assert_eq!(
            formatted,
            "{#each xs as x}\n  {x}\n{:else}\n  {#if y}a{/if}\n{/each}\n"
        );
        assert_eq!(format(&formatted), formatted);

        // a lone if block in an if's else branch reads the same as `{:else if}`
        assert_eq!(
            format("{#if a}x{:else}{#if b}y{/if}{/if}"),
            "{#if a}x{:else if b}y{/if}\n"
        );
    }

    #[test]
    fn each_block() {
        assert_stable(
            "{#each items as { id, name }, i (id)}\n  <li>{i}: {name}</li>\n{:else}\n  <p>empty</p>\n{/each}\n",
        );
        assert_eq!(
            format("{#each   items   as item}{item}{/each}"),
            "{#each items as item}{item}{/each}\n"
        );
    }

    #[test]
    fn await_block() {
        assert_stable(
            "{#await promise}\n  <p>waiting</p>\n{:then value}\n  <p>{value}</p>\n{:catch error}\n  <p>{error.message}</p>\n{/await}\n",
        );
        assert_eq!(
            format("{#await promise then value}<p>{value}</p>{/await}"),
            "{#await promise}{:then value}\n  <p>{value}</p>\n{:catch}{/await}\n"
        );
    }

    #[test]
    fn tags() {
        assert_eq!(
            format("<p>{@html content}</p>"),
            "<p>\n  {@html content}\n</p>\n"
        );
        assert_stable("{@debug a, b}\n");
        assert_eq!(format("{@debug}"), "{@debug}\n");
        assert_stable("<!-- a comment -->\n<p>a</p>\n");
        assert_stable("<div>\n  <!--\n    multi\n    line\n  -->\n</div>\n");
    }

    #[test]
    fn raw_text_elements() {
        assert_stable("<pre>  keep\n    this   </pre>\n");
        assert_stable("<div>\n  <textarea>\n a  b</textarea>\n</div>\n");
    }

    #[test]
    fn components() {
        assert_stable("<svelte:component this={current} foo=\"{bar}\" />\n");
        assert_stable("<svelte:head>\n  <title>Page</title>\n</svelte:head>\n");
        assert_stable("<svelte:window on:keydown=\"{handle}\" />\n");
        assert_stable("<Nested answer=\"{42}\">\n  <span slot=\"name\">x</span>\n</Nested>\n");
    }

    #[test]
    fn text_wraps_in_fill() {
        let options = FormatOptions {
            layout: crate::config::LayoutOptions {
                print_width: 20,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            format_with("<p>one two three four five six</p>", &options),
            "<p>\n  one two three four\n  five six\n</p>\n"
        );
    }

    #[test]
    fn regions() {
        assert_eq!(
            format("<style>\n  p { color: red; }\n</style>\n<div>x</div>\n<script>\n  let a = 1;\n\n  let b = 2;\n</script>"),
            "<script>\nlet a = 1;\n\nlet b = 2;\n</script>\n<div>x</div>\n\n<style>\np { color: red; }\n</style>\n"
        );

        let options = FormatOptions {
            language: crate::config::LanguageOptions {
                script_indent: true,
                style_indent: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let code = "<script context=\"module\">\n  export const a = 1;\n</script>\n<script lang=\"ts\">\n  let b: number;\n\n  if (b) {\n    b++;\n  }\n</script>\n<p>x</p>\n\n<style>\n  p {\n    color: red;\n  }\n</style>\n";
        assert_eq!(format_with(code, &options), code);
        assert_eq!(format("<script></script>"), "<script></script>\n");
    }

    #[test]
    fn ignore_file() {
        let code = "<!-- svelte-fmt-ignore-file -->\n<div   >  </div>";
        assert_eq!(format(code), code);
    }

    #[test]
    fn unexpected_nodes() {
        let code = "<div>{value}</div>";
        let mut root = parse(code).unwrap();
        let NodeKind::Fragment(fragment) = &mut root.html.kind else {
            unreachable!()
        };
        fragment.children.push(Node {
            kind: NodeKind::Binding(Directive {
                name: "value",
                modifiers: vec![],
                expression: None,
            }),
            start: 18,
            end: 18,
        });
        let error = format_ast(&root, &Default::default(), |code, _| {
            Ok::<_, Infallible>(code.into())
        })
        .unwrap_err();
        let FormatError::UnexpectedNode(error) = error else {
            panic!("expected unexpected node error: {error}");
        };
        assert_eq!(error.kind, "Binding");
        assert_eq!(error.slot, "children");
        assert!(error.node.contains("Binding"));

        let mut root = parse("<div></div>").unwrap();
        root.instance = Some(Node {
            kind: NodeKind::Style(Script {
                attributes: vec![],
                content: "",
            }),
            start: 0,
            end: 0,
        });
        let error = format_ast(&root, &Default::default(), |code, _| {
            Ok::<_, Infallible>(code.into())
        })
        .unwrap_err();
        assert!(matches!(
            error,
            FormatError::UnexpectedNode(UnexpectedNode {
                kind: "Style",
                slot: "script",
                ..
            })
        ));
    }
}
