#![doc = include_str!("../README.md")]

pub mod ast;
mod children;
pub mod config;
mod ctx;
mod doc;
mod embed;
mod error;
mod extract;
mod helpers;
mod parser;
mod printer;
mod state;

use crate::{
    ast::{Comment, Node, NodeKind, Root},
    config::FormatOptions,
    ctx::Ctx,
    printer::DocGen,
    state::{Slot, State},
};
pub use crate::{
    ctx::{EmbedKind, Hints},
    error::*,
    extract::{
        Body, CONTENT_ATTR, Extraction, Placeholder, Preprocessed, decode_content, encode_content,
        extract, preprocess,
    },
    parser::{PResult, Parser, parse},
};
use std::borrow::Cow;

/// Format the given Svelte component.
///
/// An external formatter is required for formatting code
/// inside `<script>` and `<style>` tags and inside template expressions.
/// If you don't need to format them or you don't have available formatters,
/// you can pass a closure that returns the original code. (see example below)
///
/// ```
/// use svelte_fmt::format_text;
///
/// let code = r#"
/// <script>
///   let name = 'world';
/// </script>
/// <h1   class="title">Hello {name}!</h1>"#;
///
/// let formatted = format_text(
///     code,
///     &Default::default(),
///     |code, _| Ok::<_, std::convert::Infallible>(code.into()),
/// ).unwrap();
/// assert_eq!(
///     formatted,
///     "<script>\nlet name = 'world';\n</script>\n<h1 class=\"title\">Hello {name}!</h1>\n",
/// );
/// ```
///
/// For the external formatter closure,
///
/// - The first argument is code that needs formatting.
/// - The second argument is hints which contains useful information for external formatters,
///   such as file extension, print width and what kind of code it is.
pub fn format_text<E, F>(
    code: &str,
    options: &FormatOptions,
    external_formatter: F,
) -> Result<String, FormatError<E>>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    let preprocessed = preprocess(code);
    tracing::debug!(
        scripts = preprocessed.scripts().len(),
        styles = preprocessed.styles().len(),
        "extracted embedded regions"
    );

    let ast = parse(&preprocessed.text).map_err(|error| {
        let pos = preprocessed.source_pos(error.pos);
        let (line, column) = helpers::line_column(code, pos);
        FormatError::Syntax(SyntaxError {
            pos,
            line,
            column,
            ..error
        })
    })?;

    if is_ignored(&ast, &options.language.ignore_file_comment_directive) {
        tracing::debug!("file is ignored by comment directive");
        return Ok(code.into());
    }

    format_ast(&ast, options, external_formatter)
}

/// Format an already parsed component.
///
/// The tree can come from [`parse`] or be built by hand.
/// A node placed where its kind can't be printed
/// fails with [`FormatError::UnexpectedNode`].
pub fn format_ast<E, F>(
    ast: &Root,
    options: &FormatOptions,
    external_formatter: F,
) -> Result<String, FormatError<E>>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    let mut ctx = Ctx {
        indent_width: options.layout.indent_width,
        print_width: options.layout.print_width,
        options: &options.language,
        indent_level: 0,
        external_formatter,
        external_formatter_errors: Default::default(),
    };

    let doc = ast.doc(&mut ctx, &State::new(Slot::Html))?;
    if !ctx.external_formatter_errors.is_empty() {
        return Err(FormatError::External(ctx.external_formatter_errors));
    }

    Ok(doc::render(doc, &options.layout))
}

fn is_ignored(ast: &Root, directive: &str) -> bool {
    let NodeKind::Fragment(fragment) = &ast.html.kind else {
        return false;
    };
    fragment
        .children
        .iter()
        .find(|child| !matches!(&child.kind, NodeKind::Text(text) if text.data.trim().is_empty()))
        .is_some_and(|child| {
            if let Node {
                kind: NodeKind::Comment(Comment { data }),
                ..
            } = child
            {
                data.trim_start()
                    .strip_prefix(directive)
                    .is_some_and(|rest| {
                        rest.starts_with(|c: char| c.is_ascii_whitespace()) || rest.is_empty()
                    })
            } else {
                false
            }
        })
}
