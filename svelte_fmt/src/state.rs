use crate::{
    ast::{Node, NodeKind},
    error::UnexpectedNode,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where a node is printed. Each slot accepts a fixed set of node kinds.
pub(crate) enum Slot {
    /// The markup fragment of the root.
    Html,
    /// `<script>` regions of the root.
    Script,
    /// The `<style>` region of the root.
    Style,
    Children,
    Attributes,
    AttributeValue,
    /// `{:else}` of an if block.
    Else,
    /// `{:else}` of an each block.
    EachElse,
    Pending,
    Then,
    Catch,
    DebugIdentifiers,
}

impl Slot {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Slot::Html => "html",
            Slot::Script => "script",
            Slot::Style => "style",
            Slot::Children => "children",
            Slot::Attributes => "attributes",
            Slot::AttributeValue => "attribute value",
            Slot::Else => "else branch",
            Slot::EachElse => "each else branch",
            Slot::Pending => "pending branch",
            Slot::Then => "then branch",
            Slot::Catch => "catch branch",
            Slot::DebugIdentifiers => "debug identifiers",
        }
    }

    pub(crate) fn accepts(self, kind: &NodeKind) -> bool {
        match self {
            Slot::Html => matches!(kind, NodeKind::Fragment(..)),
            Slot::Script => matches!(kind, NodeKind::Script(..)),
            Slot::Style => matches!(kind, NodeKind::Style(..)),
            Slot::Children => matches!(
                kind,
                NodeKind::Text(..)
                    | NodeKind::Element(..)
                    | NodeKind::InlineComponent(..)
                    | NodeKind::Slot(..)
                    | NodeKind::Window(..)
                    | NodeKind::Head(..)
                    | NodeKind::Title(..)
                    | NodeKind::Comment(..)
                    | NodeKind::MustacheTag(..)
                    | NodeKind::RawMustacheTag(..)
                    | NodeKind::IfBlock(..)
                    | NodeKind::EachBlock(..)
                    | NodeKind::AwaitBlock(..)
                    | NodeKind::DebugTag(..)
            ),
            Slot::Attributes => matches!(
                kind,
                NodeKind::Attribute(..)
                    | NodeKind::Class(..)
                    | NodeKind::EventHandler(..)
                    | NodeKind::Binding(..)
                    | NodeKind::Let(..)
                    | NodeKind::Action(..)
                    | NodeKind::Animation(..)
                    | NodeKind::Transition(..)
                    | NodeKind::Ref(..)
                    | NodeKind::Spread(..)
            ),
            Slot::AttributeValue => matches!(kind, NodeKind::Text(..) | NodeKind::MustacheTag(..)),
            Slot::Else | Slot::EachElse => matches!(kind, NodeKind::ElseBlock(..)),
            Slot::Pending => matches!(kind, NodeKind::PendingBlock(..)),
            Slot::Then => matches!(kind, NodeKind::ThenBlock(..)),
            Slot::Catch => matches!(kind, NodeKind::CatchBlock(..)),
            Slot::DebugIdentifiers => matches!(kind, NodeKind::Identifier(..)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
/// Context passed down to the node being printed.
pub(crate) struct State {
    pub(crate) slot: Slot,
}

impl State {
    pub(crate) fn new(slot: Slot) -> Self {
        Self { slot }
    }

    pub(crate) fn unexpected(self, node: &Node) -> UnexpectedNode {
        UnexpectedNode {
            kind: node.kind.name(),
            slot: self.slot.name(),
            node: format!("{node:#?}"),
        }
    }
}
