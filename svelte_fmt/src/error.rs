use std::{borrow::Cow, error::Error, fmt};

#[derive(Clone, Debug)]
/// Syntax error when parsing the component.
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Byte offset in the original input.
    pub pos: usize,
    /// 1-based line of `pos`.
    pub line: usize,
    /// 1-based column (in chars) of `pos`.
    pub column: usize,
}

#[derive(Clone, Debug)]
pub enum SyntaxErrorKind {
    DuplicateScript,
    DuplicateStyle,
    ExpectAttrName,
    ExpectAttrValue,
    ExpectChar(char),
    ExpectCloseTag,
    ExpectComment,
    ExpectDirectiveValue,
    ExpectElement,
    ExpectIdentifier,
    ExpectKeyword(&'static str),
    ExpectSelfCloseTag,
    ExpectSvelteAtTag,
    ExpectSvelteAwaitBlock,
    ExpectSvelteBlockEnd,
    ExpectSvelteEachBlock,
    ExpectSvelteIfBlock,
    ExpectSvelteInterpolation,
    ExpectTagName,
    ExpectTextNode,
    UnknownSvelteBlock,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason: Cow<_> = match self.kind {
            SyntaxErrorKind::DuplicateScript => "duplicate instance or module script".into(),
            SyntaxErrorKind::DuplicateStyle => "duplicate style".into(),
            SyntaxErrorKind::ExpectAttrName => "expect attribute name".into(),
            SyntaxErrorKind::ExpectAttrValue => "expect attribute value".into(),
            SyntaxErrorKind::ExpectChar(c) => format!("expect char '{c}'").into(),
            SyntaxErrorKind::ExpectCloseTag => "expect close tag".into(),
            SyntaxErrorKind::ExpectComment => "expect comment".into(),
            SyntaxErrorKind::ExpectDirectiveValue => "expect directive expression".into(),
            SyntaxErrorKind::ExpectElement => "expect element".into(),
            SyntaxErrorKind::ExpectIdentifier => "expect identifier".into(),
            SyntaxErrorKind::ExpectKeyword(keyword) => format!("expect keyword '{keyword}'").into(),
            SyntaxErrorKind::ExpectSelfCloseTag => "expect self close tag".into(),
            SyntaxErrorKind::ExpectSvelteAtTag => "expect Svelte `{@` tag".into(),
            SyntaxErrorKind::ExpectSvelteAwaitBlock => "expect Svelte await block".into(),
            SyntaxErrorKind::ExpectSvelteBlockEnd => "expect end of Svelte block".into(),
            SyntaxErrorKind::ExpectSvelteEachBlock => "expect Svelte each block".into(),
            SyntaxErrorKind::ExpectSvelteIfBlock => "expect Svelte if block".into(),
            SyntaxErrorKind::ExpectSvelteInterpolation => "expect Svelte interpolation".into(),
            SyntaxErrorKind::ExpectTagName => "expect tag name".into(),
            SyntaxErrorKind::ExpectTextNode => "expect text node".into(),
            SyntaxErrorKind::UnknownSvelteBlock => "unknown Svelte block".into(),
        };

        write!(
            f,
            "syntax error '{reason}' at line {}, column {}",
            self.line, self.column
        )
    }
}

impl Error for SyntaxError {}

#[derive(Clone, Debug)]
/// A node was found in a place where its kind can't be printed.
///
/// This means the tree is malformed, so formatting is aborted.
pub struct UnexpectedNode {
    /// Kind of the offending node.
    pub kind: &'static str,
    /// Where the node was found, like "children" or "attributes".
    pub slot: &'static str,
    /// Debug dump of the offending node.
    pub node: String,
}

impl fmt::Display for UnexpectedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected node `{}` in {}:\n{}",
            self.kind, self.slot, self.node
        )
    }
}

impl Error for UnexpectedNode {}

#[derive(Debug)]
/// The error type for svelte_fmt.
pub enum FormatError<E> {
    /// Syntax error when parsing the component.
    Syntax(SyntaxError),
    /// Errors from external formatter, for example,
    /// there're errors when formatting the `<script>` or `<style>` tag.
    External(Vec<E>),
    /// The syntax tree is malformed.
    UnexpectedNode(UnexpectedNode),
}

impl<E> fmt::Display for FormatError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Syntax(e) => fmt::Display::fmt(e, f),
            FormatError::External(errors) => {
                writeln!(f, "failed to format code with external formatter:")?;
                for error in errors {
                    writeln!(f, "{error}")?;
                }
                Ok(())
            }
            FormatError::UnexpectedNode(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl<E> Error for FormatError<E> where E: Error {}

impl<E> From<UnexpectedNode> for FormatError<E> {
    fn from(value: UnexpectedNode) -> Self {
        FormatError::UnexpectedNode(value)
    }
}
