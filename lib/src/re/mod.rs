/*! This module parses regular expressions and builds automata for them.

The parsing of regular expressions is actually done by the [`regex-syntax`][1]
crate, which produces a high-level intermediate representation (HIR) for a
given regular expression in text form. The HIR is then lowered into a
[`tree::ParseTree`], a binary tree where every operator has at most two
operands, which is the input accepted by the automaton builder.

Before building the automaton, bounded repetitions like `a{2,5}` are
rewritten in terms of concatenations and the three basic repetition
operators (`?`, `*` and `+`) by the [`desugar`] module. Then, the
[`thompson::NfaBuilder`] walks the tree in post-order and produces a
[`thompson::Graph`] using a variant of [Thompson's construction][2] that
preserves the match priority expressed by greedy and non-greedy operators
in the order of each vertex's outgoing edges.

[1]: https://docs.rs/regex-syntax
[2]: https://en.wikipedia.org/wiki/Thompson%27s_construction
*/

use thiserror::Error;

use crate::re::thompson::Vertex;
use crate::re::tree::NodeId;

pub use crate::re::byteset::ByteSet;

mod byteset;

pub mod desugar;
pub mod hir;
pub mod parser;
pub mod thompson;
pub mod tree;

/// Errors returned while building an automaton from a parse tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A literal can't be represented in the builder's encoding.
    #[error("code point U+{code_point:04X} in node {node} can't be encoded")]
    UnencodableLiteral { code_point: u32, node: NodeId },

    /// The pattern can match the empty string.
    #[error("pattern matches the empty string")]
    ZeroLengthMatch,

    /// The fragment stack doesn't have the expected depth when the root of
    /// the regular expression is reached. This happens with trees that are
    /// not rooted at a [`tree::NodeKind::Regexp`] node, or whose operators
    /// don't have the right number of operands.
    #[error("malformed fragment stack (depth: {depth})")]
    MalformedStack { depth: usize },

    /// A repetition with `{0,0}` bounds, which matches nothing.
    #[error("empty repetition in node {node}")]
    EmptyRepetition { node: NodeId },

    /// A repetition other than `?`, `*` or `+` reached the builder.
    #[error("unexpanded repetition in node {node}")]
    UnexpandedRepetition { node: NodeId },

    /// A unary or binary operator lacks some of its operands.
    #[error("node {node} is missing an operand")]
    MissingOperand { node: NodeId },

    /// An accepting vertex has no transition.
    #[error("vertex {vertex} has no transition")]
    UnlabeledVertex { vertex: Vertex },

    /// The parse tree has no root.
    #[error("empty parse tree")]
    EmptyTree,
}
