//! Layout instructions emitted by the printer.
//!
//! The printer never decides where lines break. It builds a [`Doc`] tree
//! which is lowered into [`tiny_pretty::Doc`] and rendered at a given width.

use crate::config::LayoutOptions;
use std::borrow::Cow;
use tiny_pretty::{IndentKind, PrintOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Nothing when flat, a line break otherwise.
    Soft,
    /// A space when flat, a line break otherwise.
    Line,
    /// Always a line break.
    Hard,
    /// Always a line break, without indentation after it.
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Doc<'s> {
    Text(Cow<'s, str>),
    Line {
        kind: LineKind,
        /// Whether a run consisting of this line alone survives grouping.
        keep_if_lonely: bool,
    },
    Group {
        doc: Box<Doc<'s>>,
        /// Set when the content contains a forced break.
        should_break: bool,
    },
    Indent(Box<Doc<'s>>),
    Dedent(Box<Doc<'s>>),
    /// Content and separator docs, alternating. Separators are lines.
    Fill(Vec<Doc<'s>>),
    Concat(Vec<Doc<'s>>),
    BreakParent,
}

impl<'s> Doc<'s> {
    pub(crate) fn nil() -> Doc<'s> {
        Doc::Concat(vec![])
    }

    pub(crate) fn text(text: impl Into<Cow<'s, str>>) -> Doc<'s> {
        Doc::Text(text.into())
    }

    pub(crate) fn soft_line() -> Doc<'s> {
        Doc::Line {
            kind: LineKind::Soft,
            keep_if_lonely: false,
        }
    }

    pub(crate) fn line() -> Doc<'s> {
        Doc::Line {
            kind: LineKind::Line,
            keep_if_lonely: false,
        }
    }

    pub(crate) fn hard_line() -> Doc<'s> {
        Doc::Line {
            kind: LineKind::Hard,
            keep_if_lonely: false,
        }
    }

    pub(crate) fn empty_line() -> Doc<'s> {
        Doc::Line {
            kind: LineKind::Empty,
            keep_if_lonely: false,
        }
    }

    pub(crate) fn list(docs: Vec<Doc<'s>>) -> Doc<'s> {
        Doc::Concat(docs)
    }

    pub(crate) fn fill(parts: Vec<Doc<'s>>) -> Doc<'s> {
        debug_assert!(
            is_alternating(&parts),
            "fill parts must alternate content and lines: {parts:?}"
        );
        Doc::Fill(parts)
    }

    pub(crate) fn group(self) -> Doc<'s> {
        let should_break = self.has_forced_break();
        Doc::Group {
            doc: Box::new(self),
            should_break,
        }
    }

    pub(crate) fn indent(self) -> Doc<'s> {
        Doc::Indent(Box::new(self))
    }

    pub(crate) fn dedent(self) -> Doc<'s> {
        Doc::Dedent(Box::new(self))
    }

    pub(crate) fn append(self, other: Doc<'s>) -> Doc<'s> {
        match self {
            Doc::Concat(mut docs) => {
                docs.push(other);
                Doc::Concat(docs)
            }
            doc => Doc::Concat(vec![doc, other]),
        }
    }

    pub(crate) fn concat(self, iter: impl IntoIterator<Item = Doc<'s>>) -> Doc<'s> {
        match self {
            Doc::Concat(mut docs) => {
                docs.extend(iter);
                Doc::Concat(docs)
            }
            doc => Doc::Concat(std::iter::once(doc).chain(iter).collect()),
        }
    }

    /// Whether this doc prints nothing at all.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Doc::Text(text) => text.is_empty(),
            Doc::Concat(docs) => docs.iter().all(Doc::is_empty),
            _ => false,
        }
    }

    pub(crate) fn is_line(&self) -> bool {
        matches!(self, Doc::Line { .. })
    }

    pub(crate) fn has_forced_break(&self) -> bool {
        match self {
            Doc::Line {
                kind: LineKind::Hard | LineKind::Empty,
                ..
            }
            | Doc::BreakParent => true,
            Doc::Group { should_break, .. } => *should_break,
            Doc::Indent(doc) | Doc::Dedent(doc) => doc.has_forced_break(),
            Doc::Fill(docs) | Doc::Concat(docs) => docs.iter().any(Doc::has_forced_break),
            Doc::Text(..) | Doc::Line { .. } => false,
        }
    }

    fn ends_with_dedent(&self) -> bool {
        match self {
            Doc::Dedent(..) => true,
            Doc::Concat(docs) => docs.last().is_some_and(Doc::ends_with_dedent),
            Doc::Group { doc, .. } => doc.ends_with_dedent(),
            _ => false,
        }
    }
}

pub(crate) fn join<'s>(docs: impl IntoIterator<Item = Doc<'s>>, separator: Doc<'s>) -> Doc<'s> {
    Doc::list(itertools::intersperse(docs, separator).collect())
}

fn is_alternating(parts: &[Doc]) -> bool {
    parts
        .iter()
        .enumerate()
        .all(|(i, part)| (i % 2 == 1) == part.is_line())
}

/// Rewrites `Indent(doc)` where `doc` ends with a `Dedent`,
/// so the dedented tail sits outside of the indentation.
fn hoist_dedent(doc: Doc<'_>) -> Doc<'_> {
    match doc {
        Doc::Dedent(doc) => *doc,
        Doc::Concat(mut docs) => match docs.pop() {
            Some(last) => Doc::list(vec![Doc::list(docs).indent(), hoist_dedent(last)]),
            None => Doc::nil(),
        },
        Doc::Group { doc, should_break } => Doc::Group {
            doc: Box::new(hoist_dedent(*doc)),
            should_break,
        },
        doc => doc.indent(),
    }
}

struct Lowering {
    indent_width: usize,
}

impl Lowering {
    fn lower<'s>(&self, doc: Doc<'s>, broken: bool) -> tiny_pretty::Doc<'s> {
        match doc {
            Doc::Text(text) => tiny_pretty::Doc::text(text),
            Doc::Line { kind, .. } => match kind {
                LineKind::Hard => tiny_pretty::Doc::hard_line(),
                LineKind::Empty => tiny_pretty::Doc::empty_line(),
                LineKind::Soft if broken => tiny_pretty::Doc::hard_line(),
                LineKind::Line if broken => tiny_pretty::Doc::hard_line(),
                LineKind::Soft => tiny_pretty::Doc::line_or_nil(),
                LineKind::Line => tiny_pretty::Doc::line_or_space(),
            },
            Doc::Group { doc, should_break } => {
                if should_break {
                    self.lower(*doc, true)
                } else {
                    self.lower(*doc, false).group()
                }
            }
            Doc::Indent(doc) => {
                if doc.ends_with_dedent() {
                    self.lower(hoist_dedent(*doc), broken)
                } else {
                    self.lower(*doc, broken).nest(self.indent_width)
                }
            }
            // only meaningful at the end of an indentation, see `hoist_dedent`
            Doc::Dedent(doc) => self.lower(*doc, broken),
            Doc::Fill(parts) => tiny_pretty::Doc::list(
                parts
                    .into_iter()
                    .enumerate()
                    .map(|(i, part)| {
                        if i % 2 == 1 {
                            self.lower_separator(part, broken)
                        } else {
                            self.lower(part, broken)
                        }
                    })
                    .collect(),
            ),
            Doc::Concat(docs) => tiny_pretty::Doc::list(
                docs.into_iter()
                    .map(|doc| self.lower(doc, broken))
                    .collect(),
            ),
            Doc::BreakParent => tiny_pretty::Doc::nil(),
        }
    }

    /// Each separator of a fill decides on its own,
    /// by looking at the content that follows it.
    fn lower_separator<'s>(&self, separator: Doc<'s>, broken: bool) -> tiny_pretty::Doc<'s> {
        match separator {
            Doc::Line {
                kind: LineKind::Line,
                ..
            } => tiny_pretty::Doc::soft_line(),
            Doc::Line {
                kind: LineKind::Soft,
                ..
            } => tiny_pretty::Doc::line_or_nil().group(),
            separator => self.lower(separator, broken),
        }
    }
}

pub(crate) fn render(doc: Doc<'_>, options: &LayoutOptions) -> String {
    let lowering = Lowering {
        indent_width: options.indent_width,
    };
    tiny_pretty::print(
        &lowering.lower(doc, true),
        &PrintOptions {
            indent_kind: if options.use_tabs {
                IndentKind::Tab
            } else {
                IndentKind::Space
            },
            line_break: options.line_break.clone().into(),
            width: options.print_width,
            tab_size: options.indent_width,
        },
    )
}
