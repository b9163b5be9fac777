//! Lays out the children of a fragment, an element or a block.
//!
//! Consecutive inline children (text and interpolations) form a run
//! which is printed as one fill, so it only wraps at whitespace.
//! Every other child is a block which always starts on its own line.

use crate::doc::Doc;

pub(crate) enum Child<'s> {
    Inline(Doc<'s>),
    Block(Doc<'s>),
}

enum Piece<'s> {
    Inline(Doc<'s>),
    Block(Doc<'s>),
    /// A whitespace-only run holding a blank line.
    Blank,
}

/// Joins children with hard lines.
///
/// With `surrounding_lines`, the result starts with a soft line and ends with
/// a dedented soft line, ready to be wrapped in an indentation by the caller.
/// Blank lines at the edges are only kept in that case.
pub(crate) fn group_children<'s>(
    children: impl IntoIterator<Item = Child<'s>>,
    surrounding_lines: bool,
) -> Doc<'s> {
    let (mut pieces, run) = children.into_iter().fold(
        (vec![], vec![]),
        |(mut pieces, mut run): (Vec<Piece<'s>>, Vec<Doc<'s>>), child| {
            match child {
                Child::Inline(doc) => run.push(doc),
                Child::Block(doc) => {
                    pieces.extend(flush(run));
                    pieces.push(Piece::Block(doc));
                    run = vec![];
                }
            }
            (pieces, run)
        },
    );
    pieces.extend(flush(run));

    let mut body = Vec::with_capacity(pieces.len() * 2);
    let mut leading_blank = false;
    let mut pending_blank = false;
    for piece in pieces {
        let doc = match piece {
            Piece::Blank => {
                pending_blank = true;
                continue;
            }
            Piece::Inline(doc) => doc,
            Piece::Block(doc) => Doc::list(vec![Doc::BreakParent, doc]),
        };
        if body.is_empty() {
            leading_blank = pending_blank;
        } else {
            if pending_blank {
                body.push(Doc::empty_line());
            }
            body.push(Doc::hard_line());
        }
        pending_blank = false;
        body.push(doc);
    }

    if body.is_empty() {
        Doc::nil()
    } else if surrounding_lines {
        let mut docs = Vec::with_capacity(body.len() + 4);
        if leading_blank {
            docs.push(Doc::empty_line());
        }
        docs.push(Doc::soft_line());
        docs.append(&mut body);
        if pending_blank {
            docs.push(Doc::empty_line());
        }
        docs.push(Doc::soft_line().dedent());
        Doc::list(docs)
    } else {
        Doc::list(body)
    }
}

/// Turns a run into a fill. Blank lines at its edges become separate pieces,
/// so they survive trimming.
fn flush(run: Vec<Doc<'_>>) -> Vec<Piece<'_>> {
    let is_blank = |doc: &Doc| {
        matches!(
            doc,
            Doc::Line {
                keep_if_lonely: true,
                ..
            }
        )
    };
    let leading_blank = run.first().is_some_and(is_blank);
    let trailing_blank = run.len() > 1 && run.last().is_some_and(is_blank);

    let parts = trim(fill_parts(run));
    if parts.is_empty() {
        return if leading_blank || trailing_blank {
            vec![Piece::Blank]
        } else {
            vec![]
        };
    }

    let mut pieces = Vec::with_capacity(3);
    if leading_blank {
        pieces.push(Piece::Blank);
    }
    pieces.push(Piece::Inline(Doc::fill(parts)));
    if trailing_blank {
        pieces.push(Piece::Blank);
    }
    pieces
}

/// Flattens the docs of a run into alternating contents and separators.
fn fill_parts(run: Vec<Doc<'_>>) -> Vec<Doc<'_>> {
    let mut parts = Vec::with_capacity(run.len() * 2);
    for doc in run {
        let items = match doc {
            Doc::Fill(items) => items,
            doc => vec![doc],
        };
        for item in items {
            let expects_content = parts.len() % 2 == 0;
            if item.is_line() {
                if expects_content {
                    parts.push(Doc::text(""));
                }
                parts.push(item);
            } else if expects_content {
                parts.push(item);
            } else if let Some(last) = parts.pop() {
                // text touching an interpolation stays glued to it
                parts.push(last.append(item));
            }
        }
    }
    parts
}

/// Drops empty contents and separators at both edges.
fn trim(mut parts: Vec<Doc<'_>>) -> Vec<Doc<'_>> {
    let is_content = |part: &Doc| !part.is_line() && !part.is_empty();
    let Some(start) = parts.iter().position(is_content) else {
        return vec![];
    };
    let end = parts.iter().rposition(is_content).map_or(start, |i| i + 1);
    parts.truncate(end);
    parts.drain(..start);
    parts
}
