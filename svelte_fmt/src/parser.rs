//! This parser is designed for internal use,
//! not generating general-purpose AST.
//!
//! It consumes string then produces AST directly without tokenizing.
//! Script expressions aren't parsed: they're kept as source text,
//! and only their extent is found by balancing brackets.

use crate::{
    ast::*,
    error::{SyntaxError, SyntaxErrorKind},
    helpers,
};
use std::{iter::Peekable, str::CharIndices};

pub type PResult<T> = Result<T, SyntaxError>;

/// Parses a component.
///
/// Top-level `<script>` and `<style>` tags become the embedded regions of
/// the returned [`Root`]; everything else belongs to its markup fragment.
/// The input is usually the text produced by [`preprocess`](crate::preprocess).
pub fn parse(source: &str) -> PResult<Root<'_>> {
    Parser::new(source).parse_root()
}

pub struct Parser<'s> {
    source: &'s str,
    chars: Peekable<CharIndices<'s>>,
    in_head: bool,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            in_head: false,
        }
    }

    fn try_parse<F, R>(&mut self, f: F) -> PResult<R>
    where
        F: FnOnce(&mut Self) -> PResult<R>,
    {
        let chars = self.chars.clone();
        let result = f(self);
        if result.is_err() {
            self.chars = chars;
        }
        result
    }

    fn emit_error(&mut self, kind: SyntaxErrorKind) -> SyntaxError {
        let pos = self.pos();
        self.error_at(kind, pos)
    }

    fn error_at(&self, kind: SyntaxErrorKind, pos: usize) -> SyntaxError {
        let (line, column) = helpers::line_column(self.source, pos);
        SyntaxError {
            kind,
            pos,
            line,
            column,
        }
    }

    fn pos(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(pos, _)| *pos)
            .unwrap_or(self.source.len())
    }

    fn skip_ws(&mut self) {
        while self
            .chars
            .next_if(|(_, c)| c.is_ascii_whitespace())
            .is_some()
        {}
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|(_, c)| *c == expected).is_some()
    }

    fn expect(&mut self, expected: char) -> PResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.emit_error(SyntaxErrorKind::ExpectChar(expected)))
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut chars = self.chars.clone();
        s.chars()
            .all(|expected| chars.next_if(|(_, c)| *c == expected).is_some())
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            s.chars().for_each(|_| {
                self.chars.next();
            });
            true
        } else {
            false
        }
    }

    /// Builds an expression from a source range, without surrounding whitespace.
    fn expression(&self, start: usize, end: usize) -> Expression<'s> {
        let raw = &self.source[start..end];
        let trimmed_start = raw.trim_start();
        let start = start + raw.len() - trimmed_start.len();
        let raw = trimmed_start.trim_end();
        Expression {
            raw,
            start,
            end: start + raw.len(),
        }
    }

    fn parse_word(&mut self) -> &'s str {
        take_word(&mut self.chars, self.source)
    }

    /// Returns the keyword of an upcoming `{:keyword ...}` clause.
    fn peek_clause(&self) -> Option<&'s str> {
        let mut chars = self.chars.clone();
        chars
            .next_if(|(_, c)| *c == '{')
            .and_then(|_| chars.next_if(|(_, c)| *c == ':'))?;
        Some(take_word(&mut chars, self.source))
    }

    fn peek_tag_name(&self) -> Option<&'s str> {
        let mut chars = self.chars.clone();
        let (start, _) = chars.next_if(|(_, c)| *c == '<')?;
        let mut end = start + 1;
        while let Some((i, c)) = chars.next_if(|(_, c)| helpers::is_tag_name_char(*c)) {
            end = i + c.len_utf8();
        }
        (end > start + 1).then(|| &self.source[start + 1..end])
    }

    fn parse_attr(&mut self) -> PResult<Node<'s>> {
        let start = self.pos();
        if self.starts_with("{") {
            let tag = self.parse_mustache_tag()?;
            let NodeKind::MustacheTag(MustacheTag { expression }) = &tag.kind else {
                return Err(self.error_at(SyntaxErrorKind::ExpectAttrName, start));
            };
            let kind = if let Some(spread) = expression.raw.strip_prefix("...") {
                NodeKind::Spread(Spread {
                    expression: self.expression(expression.end - spread.len(), expression.end),
                })
            } else if let Some(name) = expression.identifier() {
                NodeKind::Attribute(Attribute {
                    name,
                    value: AttributeValue::Fragments(vec![tag.clone()]),
                })
            } else {
                return Err(self.error_at(SyntaxErrorKind::ExpectAttrName, start));
            };
            return Ok(Node {
                kind,
                start,
                end: tag.end,
            });
        }

        let name = self.parse_attr_name()?;
        let name_end = self.pos();
        let mut chars = self.chars.clone();
        while chars.next_if(|(_, c)| c.is_ascii_whitespace()).is_some() {}
        let has_value = chars.next_if(|(_, c)| *c == '=').is_some();
        if has_value {
            self.chars = chars;
        }

        if let Some((prefix, rest)) = name.split_once(':') {
            if is_directive_prefix(prefix) {
                let mut parts = rest.split('|');
                let directive = Directive {
                    name: parts.next().unwrap_or_default(),
                    modifiers: parts.collect(),
                    expression: if has_value {
                        Some(self.parse_directive_value()?)
                    } else {
                        None
                    },
                };
                let kind = match prefix {
                    "on" => NodeKind::EventHandler(directive),
                    "bind" => NodeKind::Binding(directive),
                    "class" => NodeKind::Class(directive),
                    "use" => NodeKind::Action(directive),
                    "animate" => NodeKind::Animation(directive),
                    "let" => NodeKind::Let(directive),
                    "ref" => NodeKind::Ref(directive),
                    _ => NodeKind::Transition(Transition {
                        directive,
                        intro: prefix != "out",
                        outro: prefix != "in",
                    }),
                };
                return Ok(Node {
                    kind,
                    start,
                    end: if has_value { self.pos() } else { name_end },
                });
            }
        }

        let value = if has_value {
            AttributeValue::Fragments(self.parse_attr_value()?)
        } else {
            AttributeValue::True
        };
        Ok(Node {
            kind: NodeKind::Attribute(Attribute { name, value }),
            start,
            end: if has_value { self.pos() } else { name_end },
        })
    }

    fn parse_attr_name(&mut self) -> PResult<&'s str> {
        let Some((start, c)) = self
            .chars
            .next_if(|(_, c)| helpers::is_attr_name_char(*c))
        else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectAttrName));
        };
        let mut end = start + c.len_utf8();

        while let Some((i, c)) = self
            .chars
            .next_if(|(_, c)| helpers::is_attr_name_char(*c))
        {
            end = i + c.len_utf8();
        }

        Ok(&self.source[start..end])
    }

    fn parse_attr_value(&mut self) -> PResult<Vec<Node<'s>>> {
        self.skip_ws();
        match self.chars.peek() {
            Some((_, quote @ ('"' | '\''))) => {
                let quote = *quote;
                self.chars.next();
                let fragments = self.parse_attr_fragments(|c| c == quote)?;
                self.expect(quote)?;
                Ok(fragments)
            }
            Some((_, '{')) => Ok(vec![self.parse_mustache_tag()?]),
            Some(..) => {
                fn is_unquoted_attr_value_end(c: char) -> bool {
                    c.is_ascii_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '`')
                }

                let fragments = self.parse_attr_fragments(is_unquoted_attr_value_end)?;
                if fragments.is_empty() {
                    Err(self.emit_error(SyntaxErrorKind::ExpectAttrValue))
                } else {
                    Ok(fragments)
                }
            }
            None => Err(self.emit_error(SyntaxErrorKind::ExpectAttrValue)),
        }
    }

    /// Parses text and mustaches until `is_end` matches or input ends.
    fn parse_attr_fragments(&mut self, is_end: impl Fn(char) -> bool) -> PResult<Vec<Node<'s>>> {
        let mut fragments = vec![];
        loop {
            match self.chars.peek() {
                Some((_, c)) if is_end(*c) => break,
                Some((_, '{')) => fragments.push(self.parse_mustache_tag()?),
                Some((start, _)) => {
                    let start = *start;
                    while self
                        .chars
                        .next_if(|(_, c)| !is_end(*c) && *c != '{')
                        .is_some()
                    {}
                    let end = self.pos();
                    fragments.push(Node {
                        kind: NodeKind::Text(Text {
                            data: &self.source[start..end],
                        }),
                        start,
                        end,
                    });
                }
                None => break,
            }
        }
        Ok(fragments)
    }

    /// Parses a list of attributes until the end of an opening tag.
    /// Returns whether the tag is self-closing.
    fn parse_attrs(&mut self) -> PResult<(Vec<Node<'s>>, bool)> {
        let mut attrs = vec![];
        loop {
            self.skip_ws();
            match self.chars.peek() {
                Some((_, '/')) => {
                    self.chars.next();
                    if self.eat('>') {
                        return Ok((attrs, true));
                    } else {
                        return Err(self.emit_error(SyntaxErrorKind::ExpectSelfCloseTag));
                    }
                }
                Some((_, '>')) => {
                    self.chars.next();
                    return Ok((attrs, false));
                }
                Some(..) => attrs.push(self.parse_attr()?),
                None => return Err(self.emit_error(SyntaxErrorKind::ExpectChar('>'))),
            }
        }
    }

    fn parse_await_block(&mut self, start: usize) -> PResult<Node<'s>> {
        let header = self.parse_block_header(SyntaxErrorKind::ExpectSvelteAwaitBlock)?;
        let shorthand = top_level_offsets(header.raw).into_iter().find_map(|i| {
            ["then", "catch"]
                .into_iter()
                .find(|keyword| is_keyword_at(header.raw, i, keyword))
                .map(|keyword| (i, keyword))
        });

        let mut value = None;
        let mut error = None;
        let mut pending = None;
        let mut then = None;
        let mut catch = None;
        let expression = match shorthand {
            Some((i, keyword)) => {
                let binding = self.expression(
                    header.start + i + keyword.len(),
                    header.start + header.raw.len(),
                );
                let binding = (!binding.raw.is_empty()).then_some(binding.raw);
                let branch_start = self.pos();
                if keyword == "then" {
                    value = binding;
                    then = Some(self.parse_await_branch(NodeKind::ThenBlock, branch_start)?);
                } else {
                    error = binding;
                    catch = Some(self.parse_await_branch(NodeKind::CatchBlock, branch_start)?);
                }
                self.expression(header.start, header.start + i)
            }
            None => {
                let branch_start = self.pos();
                pending = Some(self.parse_await_branch(NodeKind::PendingBlock, branch_start)?);
                header
            }
        };

        loop {
            let branch_start = self.pos();
            match self.peek_clause() {
                Some("then") if then.is_none() && catch.is_none() => {
                    value = self.parse_await_clause()?;
                    then = Some(self.parse_await_branch(NodeKind::ThenBlock, branch_start)?);
                }
                Some("catch") if catch.is_none() => {
                    error = self.parse_await_clause()?;
                    catch = Some(self.parse_await_branch(NodeKind::CatchBlock, branch_start)?);
                }
                _ => break,
            }
        }

        let branches_end = self.pos();
        self.parse_block_end("await")?;
        let empty_branch = |kind: fn(Fragment<'s>) -> NodeKind<'s>| Node {
            kind: kind(Fragment::default()),
            start: branches_end,
            end: branches_end,
        };
        Ok(Node {
            kind: NodeKind::AwaitBlock(Box::new(AwaitBlock {
                expression,
                value,
                error,
                pending: pending.unwrap_or_else(|| empty_branch(NodeKind::PendingBlock)),
                then: then.unwrap_or_else(|| empty_branch(NodeKind::ThenBlock)),
                catch: catch.unwrap_or_else(|| empty_branch(NodeKind::CatchBlock)),
            })),
            start,
            end: self.pos(),
        })
    }

    fn parse_await_branch(
        &mut self,
        kind: fn(Fragment<'s>) -> NodeKind<'s>,
        start: usize,
    ) -> PResult<Node<'s>> {
        let children = self.parse_block_children()?;
        Ok(Node {
            kind: kind(Fragment { children }),
            start,
            end: self.pos(),
        })
    }

    /// Parses `{:then value}` or `{:catch error}`, returning the binding.
    fn parse_await_clause(&mut self) -> PResult<Option<&'s str>> {
        self.eat_str("{:");
        self.parse_word();
        let start = self.pos();
        let binding = self.parse_svelte_expr(start)?;
        Ok((!binding.raw.is_empty()).then_some(binding.raw))
    }

    fn parse_at_tag(&mut self) -> PResult<Node<'s>> {
        let start = self.pos();
        self.eat_str("{@");
        let keyword_pos = self.pos();
        let kind = match self.parse_word() {
            "html" => NodeKind::RawMustacheTag(MustacheTag {
                expression: self.parse_block_header(SyntaxErrorKind::ExpectSvelteAtTag)?,
            }),
            "debug" => {
                let expr_start = self.pos();
                let expression = self.parse_svelte_expr(expr_start)?;
                let mut identifiers = vec![];
                if !expression.raw.is_empty() {
                    let mut offset = expression.start;
                    for part in expression.raw.split(',') {
                        let identifier = self.expression(offset, offset + part.len());
                        if identifier.identifier().is_none() {
                            return Err(
                                self.error_at(SyntaxErrorKind::ExpectIdentifier, identifier.start)
                            );
                        }
                        identifiers.push(Node {
                            kind: NodeKind::Identifier(Identifier {
                                name: identifier.raw,
                            }),
                            start: identifier.start,
                            end: identifier.end,
                        });
                        offset += part.len() + 1;
                    }
                }
                NodeKind::DebugTag(DebugTag { identifiers })
            }
            _ => return Err(self.error_at(SyntaxErrorKind::ExpectSvelteAtTag, keyword_pos)),
        };
        Ok(Node {
            kind,
            start,
            end: self.pos(),
        })
    }

    fn parse_block(&mut self) -> PResult<Node<'s>> {
        let start = self.pos();
        self.eat_str("{#");
        let keyword_pos = self.pos();
        match self.parse_word() {
            "if" => self.parse_if_block(start),
            "each" => self.parse_each_block(start),
            "await" => self.parse_await_block(start),
            _ => Err(self.error_at(SyntaxErrorKind::UnknownSvelteBlock, keyword_pos)),
        }
    }

    fn parse_block_children(&mut self) -> PResult<Vec<Node<'s>>> {
        let mut children = vec![];
        loop {
            if self.starts_with("{:") || self.starts_with("{/") {
                break;
            } else if self.chars.peek().is_some() {
                children.push(self.parse_node()?);
            } else {
                return Err(self.emit_error(SyntaxErrorKind::ExpectSvelteBlockEnd));
            }
        }
        Ok(children)
    }

    fn parse_block_end(&mut self, keyword: &str) -> PResult<()> {
        if self.eat_str("{/") {
            self.skip_ws();
            if self.parse_word() == keyword {
                self.skip_ws();
                if self.eat('}') {
                    return Ok(());
                }
            }
        }
        Err(self.emit_error(SyntaxErrorKind::ExpectSvelteBlockEnd))
    }

    /// Parses the rest of a block header after its keyword, consuming `}`.
    fn parse_block_header(&mut self, kind: SyntaxErrorKind) -> PResult<Expression<'s>> {
        let Some((start, _)) = self.chars.next_if(|(_, c)| c.is_ascii_whitespace()) else {
            return Err(self.emit_error(kind));
        };
        self.parse_svelte_expr(start)
    }

    fn parse_close_tag(&mut self, tag_name: &str) -> PResult<()> {
        let pos = self.pos();
        if !self.eat_str("</") {
            return Err(self.emit_error(SyntaxErrorKind::ExpectCloseTag));
        }
        let close_tag_name = self.parse_tag_name()?;
        if !close_tag_name.eq_ignore_ascii_case(tag_name) {
            return Err(self.error_at(SyntaxErrorKind::ExpectCloseTag, pos));
        }
        self.skip_ws();
        if self.eat('>') {
            Ok(())
        } else {
            Err(self.emit_error(SyntaxErrorKind::ExpectCloseTag))
        }
    }

    fn parse_comment(&mut self) -> PResult<Node<'s>> {
        let start = self.pos();
        if !self.eat_str("<!--") {
            return Err(self.emit_error(SyntaxErrorKind::ExpectComment));
        }
        let data_start = self.pos();
        loop {
            let pos = self.pos();
            if self.eat_str("-->") {
                return Ok(Node {
                    kind: NodeKind::Comment(Comment {
                        data: &self.source[data_start..pos],
                    }),
                    start,
                    end: self.pos(),
                });
            } else if self.chars.next().is_none() {
                return Err(self.error_at(SyntaxErrorKind::ExpectComment, start));
            }
        }
    }

    fn parse_each_block(&mut self, start: usize) -> PResult<Node<'s>> {
        let header = self.parse_block_header(SyntaxErrorKind::ExpectSvelteEachBlock)?;
        let raw = header.raw;
        let Some(as_pos) = top_level_offsets(raw)
            .into_iter()
            .find(|i| is_keyword_at(raw, *i, "as"))
        else {
            return Err(self.error_at(SyntaxErrorKind::ExpectKeyword("as"), header.end));
        };
        let expression = self.expression(header.start, header.start + as_pos);

        let rest_start = as_pos + "as".len();
        let rest = &raw[rest_start..];
        let key_open = rest
            .ends_with(')')
            .then(|| {
                top_level_offsets(rest)
                    .into_iter()
                    .rev()
                    .find(|i| rest.as_bytes()[*i] == b'(')
            })
            .flatten();
        let key = key_open.map(|i| {
            self.expression(
                header.start + rest_start + i + 1,
                header.start + raw.len() - 1,
            )
        });

        let binding = &rest[..key_open.unwrap_or(rest.len())];
        let comma = top_level_offsets(binding)
            .into_iter()
            .find(|i| binding.as_bytes()[*i] == b',');
        let context_end = comma.unwrap_or(binding.len());
        let context = self.expression(
            header.start + rest_start,
            header.start + rest_start + context_end,
        );
        if context.raw.is_empty() {
            return Err(self.error_at(SyntaxErrorKind::ExpectIdentifier, context.start));
        }
        let index = match comma {
            Some(comma) => {
                let index = self.expression(
                    header.start + rest_start + comma + 1,
                    header.start + rest_start + binding.len(),
                );
                if index.identifier().is_none() {
                    return Err(self.error_at(SyntaxErrorKind::ExpectIdentifier, index.start));
                }
                Some(index.raw)
            }
            None => None,
        };

        let children = self.parse_block_children()?;
        let else_block = match self.peek_clause() {
            Some("else") => Some(Box::new(self.parse_else_block(false)?)),
            _ => None,
        };
        self.parse_block_end("each")?;

        Ok(Node {
            kind: NodeKind::EachBlock(EachBlock {
                expression,
                context,
                index,
                key,
                children,
                else_block,
            }),
            start,
            end: self.pos(),
        })
    }

    fn parse_element(&mut self) -> PResult<Node<'s>> {
        let start = self.pos();
        self.expect('<')?;
        let name = self.parse_tag_name()?;
        let (mut attributes, self_closing) = self.parse_attrs()?;
        let expression = if name == "svelte:component" {
            take_this_attribute(&mut attributes)
        } else {
            None
        };

        let children = if self_closing || helpers::is_void_element(name) {
            vec![]
        } else if helpers::is_raw_text_element(name) && !helpers::is_component(name) {
            let text_start = self.pos();
            let data = self.parse_raw_text(name);
            self.parse_close_tag(name)?;
            if data.is_empty() {
                vec![]
            } else {
                vec![Node {
                    kind: NodeKind::Text(Text { data }),
                    start: text_start,
                    end: text_start + data.len(),
                }]
            }
        } else {
            let was_in_head = self.in_head;
            self.in_head = name == "svelte:head";
            let mut children = vec![];
            loop {
                if self.starts_with("</") {
                    break;
                } else if self.chars.peek().is_some() {
                    children.push(self.parse_node()?);
                } else {
                    return Err(self.emit_error(SyntaxErrorKind::ExpectCloseTag));
                }
            }
            self.in_head = was_in_head;
            self.parse_close_tag(name)?;
            children
        };

        let element = Element {
            name,
            attributes,
            children,
            expression,
        };
        let kind = match name {
            "slot" => NodeKind::Slot(element),
            "svelte:window" => NodeKind::Window(element),
            "svelte:head" => NodeKind::Head(element),
            "title" if self.in_head => NodeKind::Title(element),
            _ if name.starts_with("svelte:") || helpers::is_component(name) => {
                NodeKind::InlineComponent(element)
            }
            _ => NodeKind::Element(element),
        };
        Ok(Node {
            kind,
            start,
            end: self.pos(),
        })
    }

    fn parse_else_block(&mut self, allow_else_if: bool) -> PResult<Node<'s>> {
        let start = self.pos();
        self.eat_str("{:");
        self.parse_word();
        self.skip_ws();

        let mut chars = self.chars.clone();
        let children = if allow_else_if && take_word(&mut chars, self.source) == "if" {
            let if_start = self.pos();
            self.parse_word();
            let expression = self.parse_block_header(SyntaxErrorKind::ExpectSvelteIfBlock)?;
            vec![self.parse_if_branches(if_start, expression, true)?]
        } else {
            self.expect('}')?;
            self.parse_block_children()?
        };

        Ok(Node {
            kind: NodeKind::ElseBlock(Fragment { children }),
            start,
            end: self.pos(),
        })
    }

    fn parse_if_block(&mut self, start: usize) -> PResult<Node<'s>> {
        let expression = self.parse_block_header(SyntaxErrorKind::ExpectSvelteIfBlock)?;
        let mut node = self.parse_if_branches(start, expression, false)?;
        self.parse_block_end("if")?;
        node.end = self.pos();
        Ok(node)
    }

    /// Parses the children of an if block and its else branches,
    /// leaving the closing `{/if}` to the caller.
    fn parse_if_branches(
        &mut self,
        start: usize,
        expression: Expression<'s>,
        else_if: bool,
    ) -> PResult<Node<'s>> {
        let children = self.parse_block_children()?;
        let else_block = match self.peek_clause() {
            Some("else") => Some(Box::new(self.parse_else_block(true)?)),
            _ => None,
        };
        Ok(Node {
            kind: NodeKind::IfBlock(IfBlock {
                expression,
                children,
                else_block,
                else_if,
            }),
            start,
            end: self.pos(),
        })
    }

    fn parse_directive_value(&mut self) -> PResult<Expression<'s>> {
        self.skip_ws();
        let quote = self.chars.next_if(|(_, c)| *c == '"' || *c == '\'');
        let start = self.pos();
        if !self.eat('{') {
            return Err(self.error_at(SyntaxErrorKind::ExpectDirectiveValue, start));
        }
        let expression = self.parse_svelte_expr(start + 1)?;
        if let Some((_, quote)) = quote {
            self.expect(quote)?;
        }
        Ok(expression)
    }

    fn parse_mustache_tag(&mut self) -> PResult<Node<'s>> {
        let Some((start, _)) = self.chars.next_if(|(_, c)| *c == '{') else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectSvelteInterpolation));
        };
        let expression = self.parse_svelte_expr(start + 1)?;
        Ok(Node {
            kind: NodeKind::MustacheTag(MustacheTag { expression }),
            start,
            end: self.pos(),
        })
    }

    fn parse_node(&mut self) -> PResult<Node<'s>> {
        let mut chars = self.chars.clone();
        match (chars.next(), chars.next()) {
            (Some((_, '<')), Some((_, '!'))) if self.starts_with("<!--") => self.parse_comment(),
            (Some((_, '<')), Some((_, c))) if helpers::is_tag_name_char(c) => self.parse_element(),
            (Some((_, '{')), Some((_, '#'))) => self.parse_block(),
            (Some((_, '{')), Some((_, '@'))) => self.parse_at_tag(),
            (Some((pos, '{')), Some((_, ':' | '/'))) => {
                Err(self.error_at(SyntaxErrorKind::UnknownSvelteBlock, pos))
            }
            (Some((_, '{')), _) => self.parse_mustache_tag(),
            (Some(..), _) => self.parse_text(),
            (None, _) => Err(self.emit_error(SyntaxErrorKind::ExpectElement)),
        }
    }

    /// Consumes text until the closing tag of a raw text element.
    fn parse_raw_text(&mut self, tag_name: &str) -> &'s str {
        let start = self.pos();
        loop {
            match self.chars.peek() {
                Some((i, '<')) => {
                    let i = *i;
                    let mut chars = self.chars.clone();
                    chars.next();
                    if chars.next_if(|(_, c)| *c == '/').is_some()
                        && tag_name.chars().all(|expected| {
                            chars
                                .next_if(|(_, c)| c.eq_ignore_ascii_case(&expected))
                                .is_some()
                        })
                        && chars
                            .peek()
                            .is_none_or(|(_, c)| !helpers::is_tag_name_char(*c))
                    {
                        return &self.source[start..i];
                    }
                    self.chars.next();
                }
                Some(..) => {
                    self.chars.next();
                }
                None => return &self.source[start..],
            }
        }
    }

    /// Parses a top-level `<script>` or `<style>` tag.
    fn parse_region(&mut self) -> PResult<Node<'s>> {
        let start = self.pos();
        self.expect('<')?;
        let name = self.parse_tag_name()?;
        let (attributes, self_closing) = self.parse_attrs()?;
        let content = if self_closing {
            ""
        } else {
            let content = self.parse_raw_text(name);
            self.parse_close_tag(name)?;
            content
        };

        let script = Script {
            attributes,
            content,
        };
        Ok(Node {
            kind: if name.eq_ignore_ascii_case("style") {
                NodeKind::Style(script)
            } else {
                NodeKind::Script(script)
            },
            start,
            end: self.pos(),
        })
    }

    pub fn parse_root(&mut self) -> PResult<Root<'s>> {
        let mut module = None;
        let mut instance = None;
        let mut css = None;
        let mut children = vec![];

        while self.chars.peek().is_some() {
            match self.peek_tag_name() {
                Some(name) if name.eq_ignore_ascii_case("script") => {
                    let node = self.try_parse(Parser::parse_region)?;
                    let slot = if is_module_script(&node) {
                        &mut module
                    } else {
                        &mut instance
                    };
                    if slot.is_some() {
                        return Err(self.error_at(SyntaxErrorKind::DuplicateScript, node.start));
                    }
                    *slot = Some(node);
                }
                Some(name) if name.eq_ignore_ascii_case("style") => {
                    let node = self.try_parse(Parser::parse_region)?;
                    if css.is_some() {
                        return Err(self.error_at(SyntaxErrorKind::DuplicateStyle, node.start));
                    }
                    css = Some(node);
                }
                _ => children.push(self.parse_node()?),
            }
        }

        let (start, end) = match (children.first(), children.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (self.source.len(), self.source.len()),
        };
        Ok(Root {
            module,
            js: None,
            instance,
            html: Node {
                kind: NodeKind::Fragment(Fragment { children }),
                start,
                end,
            },
            css,
        })
    }

    /// This will consume `}`.
    fn parse_svelte_expr(&mut self, start: usize) -> PResult<Expression<'s>> {
        let mut braces_stack = 0usize;
        let mut quote = None;
        loop {
            match (self.chars.next(), quote) {
                (Some((_, '\\')), Some(_)) => {
                    self.chars.next();
                }
                (Some((_, c)), Some(q)) => {
                    if c == q {
                        quote = None;
                    }
                }
                (Some((_, c @ ('"' | '\'' | '`'))), None) => quote = Some(c),
                (Some((_, '{')), None) => braces_stack += 1,
                (Some((i, '}')), None) => {
                    if braces_stack == 0 {
                        return Ok(self.expression(start, i));
                    }
                    braces_stack -= 1;
                }
                (Some(..), None) => {}
                (None, _) => return Err(self.emit_error(SyntaxErrorKind::ExpectChar('}'))),
            }
        }
    }

    fn parse_tag_name(&mut self) -> PResult<&'s str> {
        let Some((start, c)) = self
            .chars
            .next_if(|(_, c)| helpers::is_tag_name_char(*c))
        else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectTagName));
        };
        let mut end = start + c.len_utf8();

        while let Some((i, c)) = self
            .chars
            .next_if(|(_, c)| helpers::is_tag_name_char(*c))
        {
            end = i + c.len_utf8();
        }

        Ok(&self.source[start..end])
    }

    fn parse_text(&mut self) -> PResult<Node<'s>> {
        let Some((start, _)) = self.chars.next() else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectTextNode));
        };

        let end;
        loop {
            match self.chars.peek() {
                Some((i, '{')) => {
                    end = *i;
                    break;
                }
                Some((i, '<')) => {
                    let i = *i;
                    let mut chars = self.chars.clone();
                    chars.next();
                    match chars.next() {
                        Some((_, c)) if helpers::is_tag_name_char(c) || c == '/' || c == '!' => {
                            end = i;
                            break;
                        }
                        _ => {
                            self.chars.next();
                        }
                    }
                }
                Some(..) => {
                    self.chars.next();
                }
                None => {
                    end = self.source.len();
                    break;
                }
            }
        }

        Ok(Node {
            kind: NodeKind::Text(Text {
                data: &self.source[start..end],
            }),
            start,
            end,
        })
    }
}

fn take_word<'s>(chars: &mut Peekable<CharIndices<'s>>, source: &'s str) -> &'s str {
    let Some((start, _)) = chars.peek().copied() else {
        return "";
    };
    let mut end = start;
    while let Some((i, c)) = chars.next_if(|(_, c)| c.is_ascii_alphabetic()) {
        end = i + c.len_utf8();
    }
    &source[start..end]
}

fn is_directive_prefix(prefix: &str) -> bool {
    matches!(
        prefix,
        "on" | "bind" | "class" | "use" | "animate" | "transition" | "in" | "out" | "let" | "ref"
    )
}

fn is_module_script(node: &Node) -> bool {
    let NodeKind::Script(script) = &node.kind else {
        return false;
    };
    script.attributes.iter().any(|attr| {
        matches!(
            &attr.kind,
            NodeKind::Attribute(Attribute {
                name: "context",
                value: AttributeValue::Fragments(value),
            }) if matches!(
                value.as_slice(),
                [Node { kind: NodeKind::Text(Text { data: "module" }), .. }]
            )
        )
    })
}

/// Removes `this={...}` from the attributes of `<svelte:component>`.
fn take_this_attribute<'s>(attributes: &mut Vec<Node<'s>>) -> Option<Expression<'s>> {
    let index = attributes.iter().position(|attr| {
        matches!(
            &attr.kind,
            NodeKind::Attribute(Attribute {
                name: "this",
                value: AttributeValue::Fragments(value),
            }) if matches!(value.as_slice(), [Node { kind: NodeKind::MustacheTag(..), .. }])
        )
    })?;
    let NodeKind::Attribute(Attribute {
        value: AttributeValue::Fragments(mut value),
        ..
    }) = attributes.remove(index).kind
    else {
        return None;
    };
    match value.pop()?.kind {
        NodeKind::MustacheTag(MustacheTag { expression }) => Some(expression),
        _ => None,
    }
}

/// Byte offsets of chars in script code which aren't nested in
/// brackets or string literals.
fn top_level_offsets(code: &str) -> Vec<usize> {
    let mut offsets = vec![];
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in code.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => {
                if depth == 0 {
                    offsets.push(i);
                }
                depth += 1;
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => offsets.push(i),
            _ => {}
        }
    }
    offsets
}

/// Whether `keyword` appears at `i` as a separate word.
fn is_keyword_at(code: &str, i: usize, keyword: &str) -> bool {
    code[i..].starts_with(keyword)
        && code[..i].ends_with(|c: char| c.is_ascii_whitespace())
        && code[i + keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| c.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_markup(source: &str) -> Vec<Node<'_>> {
        let root = parse(source).unwrap();
        match root.html.kind {
            NodeKind::Fragment(fragment) => fragment.children,
            _ => unreachable!(),
        }
    }

    #[test]
    fn element_with_attributes() {
        let children = parse_markup(r#"<input type=text {value} bind:checked {...rest} disabled />"#);
        let [node] = children.as_slice() else {
            panic!("expected one node: {children:?}");
        };
        let NodeKind::Element(element) = &node.kind else {
            panic!("expected element: {node:?}");
        };
        assert_eq!(element.name, "input");
        assert!(element.children.is_empty());
        let kinds = element
            .attributes
            .iter()
            .map(|attr| attr.kind.name())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            ["Attribute", "Attribute", "Binding", "Spread", "Attribute"]
        );
        let NodeKind::Attribute(Attribute {
            name: "value",
            value: AttributeValue::Fragments(value),
        }) = &element.attributes[1].kind
        else {
            panic!("expected shorthand attribute");
        };
        assert!(matches!(
            value.as_slice(),
            [Node {
                kind: NodeKind::MustacheTag(MustacheTag {
                    expression: Expression { raw: "value", .. }
                }),
                ..
            }]
        ));
        let NodeKind::Spread(spread) = &element.attributes[3].kind else {
            unreachable!()
        };
        assert_eq!(spread.expression.raw, "rest");
        assert!(matches!(
            element.attributes[4].kind,
            NodeKind::Attribute(Attribute {
                value: AttributeValue::True,
                ..
            })
        ));
    }

    #[test]
    fn quoted_attribute_fragments() {
        let children = parse_markup(r#"<div class="a {b} c"></div>"#);
        let NodeKind::Element(element) = &children[0].kind else {
            unreachable!()
        };
        let NodeKind::Attribute(Attribute {
            value: AttributeValue::Fragments(value),
            ..
        }) = &element.attributes[0].kind
        else {
            unreachable!()
        };
        let kinds = value.iter().map(|node| node.kind.name()).collect::<Vec<_>>();
        assert_eq!(kinds, ["Text", "MustacheTag", "Text"]);
        assert_eq!((value[1].start, value[1].end), (14, 17));
    }

    #[test]
    fn directives() {
        let children = parse_markup(
            r#"<div on:click|once|preventDefault={handle} in:fade out:fly={{ y: 20 }} transition:slide class:active use:tooltip={text} let:item ref:el animate:flip></div>"#,
        );
        let NodeKind::Element(element) = &children[0].kind else {
            unreachable!()
        };
        let NodeKind::EventHandler(handler) = &element.attributes[0].kind else {
            panic!("expected event handler");
        };
        assert_eq!(handler.name, "click");
        assert_eq!(handler.modifiers, ["once", "preventDefault"]);
        assert_eq!(handler.expression.as_ref().map(|e| e.raw), Some("handle"));

        let transitions = element
            .attributes
            .iter()
            .filter_map(|attr| match &attr.kind {
                NodeKind::Transition(transition) => Some((
                    transition.directive.name,
                    transition.intro,
                    transition.outro,
                )),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            transitions,
            [
                ("fade", true, false),
                ("fly", false, true),
                ("slide", true, true)
            ]
        );
        let NodeKind::Transition(fly) = &element.attributes[2].kind else {
            unreachable!()
        };
        assert_eq!(
            fly.directive.expression.as_ref().map(|e| e.raw),
            Some("{ y: 20 }")
        );

        let kinds = element.attributes[4..]
            .iter()
            .map(|attr| attr.kind.name())
            .collect::<Vec<_>>();
        assert_eq!(kinds, ["Class", "Action", "Let", "Ref", "Animation"]);
    }

    #[test]
    fn element_kinds() {
        let children = parse_markup(
            "<Foo /><ui.Button /><slot /><svelte:window /><svelte:head><title>x</title></svelte:head><title>y</title><svelte:self /><custom-element></custom-element>",
        );
        let kinds = children
            .iter()
            .map(|node| node.kind.name())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                "InlineComponent",
                "InlineComponent",
                "Slot",
                "Window",
                "Head",
                "Element",
                "InlineComponent",
                "Element"
            ]
        );
        let NodeKind::Head(head) = &children[4].kind else {
            unreachable!()
        };
        assert_eq!(head.children[0].kind.name(), "Title");
    }

    #[test]
    fn svelte_component_this() {
        let children = parse_markup("<svelte:component this={current} foo={bar} />");
        let NodeKind::InlineComponent(component) = &children[0].kind else {
            unreachable!()
        };
        assert_eq!(component.expression.as_ref().map(|e| e.raw), Some("current"));
        assert_eq!(component.attributes.len(), 1);
    }

    #[test]
    fn raw_text_elements() {
        let children = parse_markup("<pre>  a <b>\n {c}</pre>");
        let NodeKind::Element(pre) = &children[0].kind else {
            unreachable!()
        };
        assert!(matches!(
            pre.children.as_slice(),
            [Node {
                kind: NodeKind::Text(Text {
                    data: "  a <b>\n {c}"
                }),
                ..
            }]
        ));
    }

    #[test]
    fn text_mustache_and_comment() {
        let children = parse_markup("a < b {c}<!-- d -->{@html e}{@debug f, g}{@debug}");
        let kinds = children
            .iter()
            .map(|node| node.kind.name())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                "Text",
                "MustacheTag",
                "Comment",
                "RawMustacheTag",
                "DebugTag",
                "DebugTag"
            ]
        );
        let NodeKind::DebugTag(debug) = &children[4].kind else {
            unreachable!()
        };
        let names = debug
            .identifiers
            .iter()
            .map(|node| match &node.kind {
                NodeKind::Identifier(identifier) => identifier.name,
                _ => unreachable!(),
            })
            .collect::<Vec<_>>();
        assert_eq!(names, ["f", "g"]);
    }

    #[test]
    fn if_else_if_chain() {
        let children = parse_markup("{#if a}x{:else if b}y{:else if c}z{:else}w{/if}");
        let NodeKind::IfBlock(if_block) = &children[0].kind else {
            panic!("expected if block");
        };
        assert_eq!(if_block.expression.raw, "a");
        assert!(!if_block.else_if);
        assert_eq!(children[0].end, 47);

        let Some(else_block) = &if_block.else_block else {
            panic!("expected else block");
        };
        let NodeKind::ElseBlock(fragment) = &else_block.kind else {
            unreachable!()
        };
        let NodeKind::IfBlock(else_if) = &fragment.children[0].kind else {
            panic!("expected else if");
        };
        assert!(else_if.else_if);
        assert_eq!(else_if.expression.raw, "b");
        let Some(else_block) = &else_if.else_block else {
            unreachable!()
        };
        let NodeKind::ElseBlock(fragment) = &else_block.kind else {
            unreachable!()
        };
        let NodeKind::IfBlock(else_if) = &fragment.children[0].kind else {
            unreachable!()
        };
        assert_eq!(else_if.expression.raw, "c");
        assert!(else_if.else_block.is_some());
    }

    #[test]
    fn each_header() {
        let children = parse_markup(
            "{#each list.filter((x) => x, 1) as { id, name }, i (id)}{name}{:else}empty{/each}",
        );
        let NodeKind::EachBlock(each) = &children[0].kind else {
            panic!("expected each block");
        };
        assert_eq!(each.expression.raw, "list.filter((x) => x, 1)");
        assert_eq!(each.context.raw, "{ id, name }");
        assert_eq!(each.index, Some("i"));
        assert_eq!(each.key.as_ref().map(|key| key.raw), Some("id"));
        assert!(each.else_block.is_some());

        let children = parse_markup("{#each items as item}{item}{/each}");
        let NodeKind::EachBlock(each) = &children[0].kind else {
            unreachable!()
        };
        assert_eq!(each.context.raw, "item");
        assert_eq!(each.index, None);
        assert!(each.key.is_none());
    }

    #[test]
    fn await_branches() {
        let children =
            parse_markup("{#await promise}wait{:then value}{value}{:catch error}{error}{/await}");
        let NodeKind::AwaitBlock(await_block) = &children[0].kind else {
            panic!("expected await block");
        };
        assert_eq!(await_block.expression.raw, "promise");
        assert_eq!(await_block.value, Some("value"));
        assert_eq!(await_block.error, Some("error"));
        assert_eq!(await_block.pending.kind.name(), "PendingBlock");
        assert_eq!(await_block.then.kind.name(), "ThenBlock");
        assert_eq!(await_block.catch.kind.name(), "CatchBlock");

        let children = parse_markup("{#await promise then { data }}{data}{/await}");
        let NodeKind::AwaitBlock(await_block) = &children[0].kind else {
            unreachable!()
        };
        assert_eq!(await_block.expression.raw, "promise");
        assert_eq!(await_block.value, Some("{ data }"));
        assert!(matches!(
            &await_block.pending.kind,
            NodeKind::PendingBlock(Fragment { children }) if children.is_empty()
        ));
        assert!(matches!(
            &await_block.then.kind,
            NodeKind::ThenBlock(Fragment { children }) if children.len() == 1
        ));
    }

    #[test]
    fn regions() {
        let root = parse(
            r#"<script context="module">export const a = 1;</script><script lang="ts">let b;</script><p>hi</p><style>p {}</style>"#,
        )
        .unwrap();
        assert!(matches!(
            &root.module,
            Some(Node { kind: NodeKind::Script(Script { content: "export const a = 1;", .. }), .. })
        ));
        assert!(matches!(
            &root.instance,
            Some(Node { kind: NodeKind::Script(Script { content: "let b;", .. }), .. })
        ));
        assert!(matches!(
            &root.css,
            Some(Node { kind: NodeKind::Style(Script { content: "p {}", .. }), .. })
        ));
        assert!(root.js.is_none());
        assert_eq!(root.html.start, 86);
    }

    #[test]
    fn duplicate_regions() {
        let error = parse("<script>a</script>\n<script>b</script>").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::DuplicateScript));
        assert_eq!((error.line, error.column), (2, 1));

        let error = parse("<style></style><style></style>").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::DuplicateStyle));
    }

    #[test]
    fn syntax_errors() {
        let error = parse("<div>\n  <p>text</div>").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::ExpectCloseTag));
        assert_eq!((error.line, error.column), (2, 10));

        let error = parse("{#if a}\n  x").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::ExpectSvelteBlockEnd));

        let error = parse("{#for a}{/for}").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::UnknownSvelteBlock));

        let error = parse("{:else}").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::UnknownSvelteBlock));

        let error = parse("{#each items}{/each}").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::ExpectKeyword("as")));

        let error = parse("<div on:click=handler></div>").unwrap_err();
        assert!(matches!(error.kind, SyntaxErrorKind::ExpectDirectiveValue));
    }
}
