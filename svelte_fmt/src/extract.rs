//! Moves the content of top-level `<script>` and `<style>` regions
//! into a synthetic attribute before parsing.
//!
//! The content is stored as base64, so the markup parser never has to look
//! inside the regions and the embedding step can restore the exact bytes.

use crate::helpers::is_tag_name_char;
use aho_corasick::AhoCorasick;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use memchr::{memchr2, memmem};
use std::sync::LazyLock;

/// Name of the attribute holding the encoded content.
pub const CONTENT_ATTR: &str = "✂svelte_fmt:content✂";

static RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

static RAW_TEXT_CLOSING: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(RAW_TEXT_TAGS.map(|tag| format!("</{tag}")))
        .unwrap()
});

/// What to leave between the tags of an extracted region.
#[derive(Clone, Copy, Debug)]
pub enum Body<'b> {
    Empty,
    /// Keep the original content.
    Content,
    Literal(&'b str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub tag_name: String,
    /// Attributes as written, without the synthetic one.
    pub attrs: String,
    /// Base64 of the original content.
    pub encoded: String,
    pub body: String,
    /// Position among the extracted regions.
    pub order: usize,
    /// Byte offset of the region in the scanned source.
    pub start: usize,
}

impl Placeholder {
    /// Renders the rewritten tag.
    pub fn to_tag(&self) -> String {
        format!(
            "<{tag}{attrs} {CONTENT_ATTR}=\"{encoded}\">{body}</{tag}>",
            tag = self.tag_name,
            attrs = self.attrs,
            encoded = self.encoded,
            body = self.body,
        )
    }

    pub fn content(&self) -> Option<String> {
        decode_content(&self.encoded)
    }
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    out_start: usize,
    src_start: usize,
}

#[derive(Clone, Debug)]
pub struct Extraction {
    /// Source with every extracted region removed.
    pub text: String,
    pub tags: Vec<Placeholder>,
    segments: Vec<Segment>,
}

impl Extraction {
    /// Translates an offset in [`Extraction::text`] back to the scanned source.
    pub fn source_pos(&self, pos: usize) -> usize {
        let index = self
            .segments
            .partition_point(|segment| segment.out_start <= pos);
        match index.checked_sub(1).and_then(|i| self.segments.get(i)) {
            Some(segment) => segment.src_start + (pos - segment.out_start),
            None => pos,
        }
    }
}

pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content)
}

pub fn decode_content(encoded: &str) -> Option<String> {
    STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Extracts every top-level `<tag_name ...>...</tag_name>` region.
///
/// Regions nested in elements, comments or mustaches are left alone,
/// as are regions without a closing tag.
pub fn extract(tag_name: &str, source: &str, body: Body) -> Extraction {
    let mut extraction = Extraction {
        text: String::with_capacity(source.len()),
        tags: vec![],
        segments: vec![],
    };
    let bytes = source.as_bytes();
    let mut kept_from = 0;
    let mut depth = 0usize;
    let mut pos = 0;
    while let Some(offset) = memchr2(b'<', b'{', &bytes[pos..]) {
        let i = pos + offset;
        if bytes[i] == b'{' {
            pos = skip_braces(bytes, i);
            continue;
        }

        let rest = &source[i..];
        if rest.starts_with("<!--") {
            pos = memmem::find(&bytes[i + 4..], b"-->").map_or(bytes.len(), |end| i + 4 + end + 3);
            continue;
        }
        if rest.starts_with("</") {
            depth = depth.saturating_sub(1);
            pos = find_tag_end(bytes, i + 2).map_or(bytes.len(), |end| end + 1);
            continue;
        }

        let name_len = rest[1..]
            .find(|c: char| !is_tag_name_char(c))
            .unwrap_or(rest.len() - 1);
        if name_len == 0 {
            pos = i + 1;
            continue;
        }
        let name = &rest[1..1 + name_len];
        let attrs_start = i + 1 + name_len;
        let Some(tag_end) = find_tag_end(bytes, attrs_start) else {
            break;
        };
        let self_closing = bytes[tag_end - 1] == b'/';
        let is_raw_text = RAW_TEXT_TAGS
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(name));

        if self_closing || crate::helpers::is_void_element(name) {
            pos = tag_end + 1;
            continue;
        }
        if !is_raw_text {
            depth += 1;
            pos = tag_end + 1;
            continue;
        }

        let content_start = tag_end + 1;
        let Some((close_start, close_end)) = find_closing_tag(source, content_start, name) else {
            pos = content_start;
            continue;
        };

        if depth == 0 && name.eq_ignore_ascii_case(tag_name) {
            let attrs = &source[attrs_start..tag_end];
            let content = &source[content_start..close_start];
            let order = extraction.tags.len();
            extraction.tags.push(build_placeholder(
                tag_name, attrs, content, body, order, i,
            ));

            extraction.segments.push(Segment {
                out_start: extraction.text.len(),
                src_start: kept_from,
            });
            extraction.text.push_str(&source[kept_from..i]);
            kept_from = close_end;
        }
        pos = close_end;
    }

    extraction.segments.push(Segment {
        out_start: extraction.text.len(),
        src_start: kept_from,
    });
    extraction.text.push_str(&source[kept_from..]);
    tracing::trace!(
        tag_name,
        count = extraction.tags.len(),
        "extracted embedded regions"
    );
    extraction
}

fn build_placeholder(
    tag_name: &str,
    attrs: &str,
    content: &str,
    body: Body,
    order: usize,
    start: usize,
) -> Placeholder {
    // already rewritten: reuse the stored content unless the body differs from it
    let (attrs, existing) = split_content_attr(attrs);
    let encoded = match existing {
        Some(encoded)
            if content.is_empty() || decode_content(encoded).is_some_and(|c| c == content) =>
        {
            encoded.to_owned()
        }
        _ => encode_content(content),
    };
    let body = match body {
        Body::Empty => String::new(),
        Body::Content => decode_content(&encoded).unwrap_or_else(|| content.to_owned()),
        Body::Literal(literal) => literal.to_owned(),
    };
    Placeholder {
        tag_name: tag_name.to_owned(),
        attrs,
        encoded,
        body,
        order,
        start,
    }
}

/// Splits the synthetic attribute off the raw attribute text.
fn split_content_attr(attrs: &str) -> (String, Option<&str>) {
    let Some(attr_start) = attrs.find(CONTENT_ATTR) else {
        return (attrs.to_owned(), None);
    };
    let value_start = attr_start + CONTENT_ATTR.len();
    let Some(value) = attrs[value_start..].strip_prefix("=\"") else {
        return (attrs.to_owned(), None);
    };
    let Some(value_len) = value.find('"') else {
        return (attrs.to_owned(), None);
    };
    let before = attrs[..attr_start].trim_end();
    let after = &value[value_len + 1..];
    (format!("{before}{after}"), Some(&value[..value_len]))
}

/// Finds the `>` closing an opening tag, skipping quoted values and mustaches.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i),
            quote @ (b'"' | b'\'') => {
                i = memchr::memchr(quote, &bytes[i + 1..]).map_or(bytes.len(), |end| i + 1 + end + 1);
            }
            b'{' => i = skip_braces(bytes, i),
            _ => i += 1,
        }
    }
    None
}

/// Returns the position right after the `}` matching the `{` at `start`.
pub(crate) fn skip_braces(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn find_closing_tag(source: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let haystack = &source[from..];
    RAW_TEXT_CLOSING
        .find_iter(haystack)
        .filter(|m| RAW_TEXT_TAGS[m.pattern().as_usize()].eq_ignore_ascii_case(name))
        .find_map(|m| {
            let after = haystack[m.end()..].trim_start_matches(|c: char| c.is_ascii_whitespace());
            after
                .starts_with('>')
                .then(|| (from + m.start(), from + haystack.len() - after.len() + 1))
        })
}

enum Origin {
    Region(usize),
    Markup { trim_offset: usize },
}

/// Component text ready for parsing.
///
/// Scripts come first, then the trimmed markup, then styles.
pub struct Preprocessed {
    pub text: String,
    styles: Extraction,
    scripts: Extraction,
    origins: Vec<(usize, Origin)>,
}

impl Preprocessed {
    pub fn scripts(&self) -> &[Placeholder] {
        &self.scripts.tags
    }

    pub fn styles(&self) -> &[Placeholder] {
        &self.styles.tags
    }

    /// Translates an offset in [`Preprocessed::text`] back to the input.
    ///
    /// Offsets inside a rewritten region map to the start of that region.
    pub fn source_pos(&self, pos: usize) -> usize {
        let index = self.origins.partition_point(|(start, _)| *start <= pos);
        match index.checked_sub(1).and_then(|i| self.origins.get(i)) {
            Some((start, Origin::Markup { trim_offset })) => {
                let markup_pos = pos - start + trim_offset;
                self.styles
                    .source_pos(self.scripts.source_pos(markup_pos))
            }
            Some((_, Origin::Region(start))) => *start,
            None => pos,
        }
    }
}

pub fn preprocess(source: &str) -> Preprocessed {
    let styles = extract("style", source, Body::Empty);
    let scripts = extract("script", &styles.text, Body::Content);

    let markup = scripts.text.as_str();
    let trim_offset = markup.len() - markup.trim_start().len();
    let mut text = String::with_capacity(source.len());
    let mut origins = Vec::with_capacity(scripts.tags.len() + styles.tags.len() + 1);
    for tag in &scripts.tags {
        origins.push((text.len(), Origin::Region(styles.source_pos(tag.start))));
        text.push_str(&tag.to_tag());
    }
    origins.push((text.len(), Origin::Markup { trim_offset }));
    text.push_str(markup.trim());
    for tag in &styles.tags {
        origins.push((text.len(), Origin::Region(tag.start)));
        text.push_str(&tag.to_tag());
    }

    Preprocessed {
        text,
        styles,
        scripts,
        origins,
    }
}
