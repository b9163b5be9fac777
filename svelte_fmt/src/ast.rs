//! Syntax tree of a Svelte component.
//!
//! Every node carries the byte range it covers in the (preprocessed) source.
//! The tree can be produced by the bundled parser or built by hand and passed
//! to [`format_ast`](crate::format_ast).

#[derive(Clone, Debug)]
pub struct Node<'s> {
    pub kind: NodeKind<'s>,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Debug)]
pub enum NodeKind<'s> {
    Fragment(Fragment<'s>),
    Text(Text<'s>),
    Element(Element<'s>),
    InlineComponent(Element<'s>),
    Slot(Element<'s>),
    Window(Element<'s>),
    Head(Element<'s>),
    Title(Element<'s>),
    Comment(Comment<'s>),
    MustacheTag(MustacheTag<'s>),
    RawMustacheTag(MustacheTag<'s>),
    IfBlock(IfBlock<'s>),
    ElseBlock(Fragment<'s>),
    EachBlock(EachBlock<'s>),
    AwaitBlock(Box<AwaitBlock<'s>>),
    PendingBlock(Fragment<'s>),
    ThenBlock(Fragment<'s>),
    CatchBlock(Fragment<'s>),
    Attribute(Attribute<'s>),
    Class(Directive<'s>),
    EventHandler(Directive<'s>),
    Binding(Directive<'s>),
    Let(Directive<'s>),
    Action(Directive<'s>),
    Animation(Directive<'s>),
    Transition(Transition<'s>),
    Ref(Directive<'s>),
    DebugTag(DebugTag<'s>),
    Spread(Spread<'s>),
    Identifier(Identifier<'s>),
    Script(Script<'s>),
    Style(Script<'s>),
}

impl NodeKind<'_> {
    /// Name of the node kind, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Fragment(..) => "Fragment",
            NodeKind::Text(..) => "Text",
            NodeKind::Element(..) => "Element",
            NodeKind::InlineComponent(..) => "InlineComponent",
            NodeKind::Slot(..) => "Slot",
            NodeKind::Window(..) => "Window",
            NodeKind::Head(..) => "Head",
            NodeKind::Title(..) => "Title",
            NodeKind::Comment(..) => "Comment",
            NodeKind::MustacheTag(..) => "MustacheTag",
            NodeKind::RawMustacheTag(..) => "RawMustacheTag",
            NodeKind::IfBlock(..) => "IfBlock",
            NodeKind::ElseBlock(..) => "ElseBlock",
            NodeKind::EachBlock(..) => "EachBlock",
            NodeKind::AwaitBlock(..) => "AwaitBlock",
            NodeKind::PendingBlock(..) => "PendingBlock",
            NodeKind::ThenBlock(..) => "ThenBlock",
            NodeKind::CatchBlock(..) => "CatchBlock",
            NodeKind::Attribute(..) => "Attribute",
            NodeKind::Class(..) => "Class",
            NodeKind::EventHandler(..) => "EventHandler",
            NodeKind::Binding(..) => "Binding",
            NodeKind::Let(..) => "Let",
            NodeKind::Action(..) => "Action",
            NodeKind::Animation(..) => "Animation",
            NodeKind::Transition(..) => "Transition",
            NodeKind::Ref(..) => "Ref",
            NodeKind::DebugTag(..) => "DebugTag",
            NodeKind::Spread(..) => "Spread",
            NodeKind::Identifier(..) => "Identifier",
            NodeKind::Script(..) => "Script",
            NodeKind::Style(..) => "Style",
        }
    }
}

/// The whole parsed component.
///
/// This isn't a node kind: it's the distinguished root holding the
/// embedded regions and the markup fragment.
#[derive(Clone, Debug)]
pub struct Root<'s> {
    /// `<script context="module">`
    pub module: Option<Node<'s>>,
    /// Legacy alias of the instance script, only set by external parsers.
    pub js: Option<Node<'s>>,
    pub instance: Option<Node<'s>>,
    pub html: Node<'s>,
    pub css: Option<Node<'s>>,
}

#[derive(Clone, Debug, Default)]
pub struct Fragment<'s> {
    pub children: Vec<Node<'s>>,
}

#[derive(Clone, Debug)]
pub struct Text<'s> {
    pub data: &'s str,
}

#[derive(Clone, Debug)]
pub struct Element<'s> {
    pub name: &'s str,
    pub attributes: Vec<Node<'s>>,
    pub children: Vec<Node<'s>>,
    /// `this` of `<svelte:component>`.
    pub expression: Option<Expression<'s>>,
}

#[derive(Clone, Debug)]
pub struct Comment<'s> {
    pub data: &'s str,
}

#[derive(Clone, Debug)]
pub struct MustacheTag<'s> {
    pub expression: Expression<'s>,
}

#[derive(Clone, Debug)]
pub struct IfBlock<'s> {
    pub expression: Expression<'s>,
    pub children: Vec<Node<'s>>,
    /// An `ElseBlock` node.
    pub else_block: Option<Box<Node<'s>>>,
    /// Whether this block was written as `{:else if}`.
    pub else_if: bool,
}

#[derive(Clone, Debug)]
pub struct EachBlock<'s> {
    pub expression: Expression<'s>,
    pub context: Expression<'s>,
    pub index: Option<&'s str>,
    pub key: Option<Expression<'s>>,
    pub children: Vec<Node<'s>>,
    /// An `ElseBlock` node.
    pub else_block: Option<Box<Node<'s>>>,
}

#[derive(Clone, Debug)]
pub struct AwaitBlock<'s> {
    pub expression: Expression<'s>,
    pub value: Option<&'s str>,
    pub error: Option<&'s str>,
    /// A `PendingBlock` node.
    pub pending: Node<'s>,
    /// A `ThenBlock` node.
    pub then: Node<'s>,
    /// A `CatchBlock` node.
    pub catch: Node<'s>,
}

#[derive(Clone, Debug)]
pub struct Attribute<'s> {
    pub name: &'s str,
    pub value: AttributeValue<'s>,
}

#[derive(Clone, Debug)]
pub enum AttributeValue<'s> {
    /// Attribute without value, like `disabled`.
    True,
    /// Sequence of `Text` and `MustacheTag` nodes.
    Fragments(Vec<Node<'s>>),
}

#[derive(Clone, Debug)]
pub struct Directive<'s> {
    pub name: &'s str,
    pub modifiers: Vec<&'s str>,
    pub expression: Option<Expression<'s>>,
}

#[derive(Clone, Debug)]
pub struct Transition<'s> {
    pub directive: Directive<'s>,
    pub intro: bool,
    pub outro: bool,
}

#[derive(Clone, Debug)]
pub struct DebugTag<'s> {
    /// `Identifier` nodes.
    pub identifiers: Vec<Node<'s>>,
}

#[derive(Clone, Debug)]
pub struct Spread<'s> {
    pub expression: Expression<'s>,
}

#[derive(Clone, Debug)]
pub struct Identifier<'s> {
    pub name: &'s str,
}

/// `<script>` or `<style>` region.
#[derive(Clone, Debug)]
pub struct Script<'s> {
    pub attributes: Vec<Node<'s>>,
    /// Visible body between the tags.
    pub content: &'s str,
}

/// Script expression kept as source text.
#[derive(Clone, Debug)]
pub struct Expression<'s> {
    pub raw: &'s str,
    pub start: usize,
    pub end: usize,
}

impl<'s> Expression<'s> {
    /// Returns the name if this expression is a bare identifier.
    pub fn identifier(&self) -> Option<&'s str> {
        let raw = self.raw.trim();
        let mut chars = raw.chars();
        let first = chars.next()?;
        if (first.is_alphabetic() || first == '_' || first == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            && !matches!(raw, "true" | "false" | "null" | "this")
        {
            Some(raw)
        } else {
            None
        }
    }
}
