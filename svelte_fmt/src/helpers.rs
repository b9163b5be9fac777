/// Whitespace-only text with at least this many line breaks
/// counts as a deliberate blank line and survives grouping.
pub(crate) const BLANK_LINE_THRESHOLD: usize = 2;

static VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Components are never void, even if they share a name with an HTML element.
pub(crate) fn is_void_element(name: &str) -> bool {
    !is_component(name)
        && VOID_ELEMENTS
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Elements whose text content is printed exactly as written.
static RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "pre", "textarea"];

pub(crate) fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Capitalized or dotted names refer to components, like `<Foo>` or `<ui.Button>`.
pub(crate) fn is_component(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) || name.contains('.')
}

pub(crate) fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '-'
        || c == '_'
        || c == '.'
        || c == ':'
        || !c.is_ascii()
        || c == '\\'
}

pub(crate) fn is_attr_name_char(c: char) -> bool {
    !matches!(c, '"' | '\'' | '>' | '/' | '=' | '{' | '}') && !c.is_ascii_whitespace()
}

pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

pub(crate) fn is_whitespace_only(text: &str) -> bool {
    text.chars().all(is_whitespace)
}

/// Whether a whitespace-only text holds a blank line.
pub(crate) fn has_blank_line(text: &str) -> bool {
    text.matches('\n').count() >= BLANK_LINE_THRESHOLD
}

/// Splits text into words at runs of HTML whitespace.
///
/// Leading or trailing whitespace yields an empty word at that edge.
pub(crate) fn split_words(text: &str) -> Vec<&str> {
    let mut words = text
        .split(is_whitespace)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>();
    if text.starts_with(is_whitespace) {
        words.insert(0, "");
    }
    if text.ends_with(is_whitespace) {
        words.push("");
    }
    words
}

/// 1-based line and column (counted in chars) of a byte offset.
pub(crate) fn line_column(source: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(source.len());
    let before = source.get(..pos).unwrap_or(source);
    let line = memchr::memchr_iter(b'\n', before.as_bytes()).count() + 1;
    let line_start = memchr::memrchr(b'\n', before.as_bytes()).map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
