/*! Binary parse trees for regular expressions.

A [`ParseTree`] is an arena of [`Node`]s, where nodes reference their
children by [`NodeId`]. Nodes have at most two children: binary operators
(alternation and concatenation) use both, unary operators (repetition and
the root of the regular expression) use only the left one, and the remaining
nodes are leaves.

Trees are usually produced by [`crate::re::parser::Parser`], but they can also
be built by hand, which is handy for feeding the automaton builder with
shapes that a parser would simplify away.

```
use regraph::re::tree::{Node, ParseTree};

// Tree for `ab`.
let mut tree = ParseTree::new();
let a = tree.add(Node::literal('a' as u32));
let b = tree.add(Node::literal('b' as u32));
let ab = tree.add(Node::concatenation(a, b));
let root = tree.add(Node::regexp(ab));
tree.set_root(root);

assert_eq!(tree.to_string(), "(re (cat 'a' 'b'))");
```
*/

use std::fmt::{Debug, Display, Formatter};
use std::ops::Index;

use ::ascii_tree::Tree;

use crate::re::ByteSet;

/// Index of a node within a [`ParseTree`].
pub type NodeId = usize;

/// The kind of a [`Node`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a regular expression. Its left child is the pattern.
    Regexp,
    /// Matches either the left or the right child, with the left one
    /// taking precedence.
    Alternation,
    /// Matches the left child followed by the right child.
    Concatenation,
    /// Matches the left child between `min` and `max` times. A `max` of
    /// `None` means no upper bound.
    Repetition { min: u32, max: Option<u32>, greedy: bool },
    /// A single Unicode code point.
    Literal(u32),
    /// Any byte.
    Dot,
    /// Any byte in the set.
    CharClass(ByteSet),
}

/// A node in a [`ParseTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Node {
    /// Creates a node without children.
    pub fn leaf(kind: NodeKind) -> Self {
        Self { kind, left: None, right: None }
    }

    pub fn regexp(child: NodeId) -> Self {
        Self { kind: NodeKind::Regexp, left: Some(child), right: None }
    }

    pub fn alternation(left: NodeId, right: NodeId) -> Self {
        Self {
            kind: NodeKind::Alternation,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn concatenation(left: NodeId, right: NodeId) -> Self {
        Self {
            kind: NodeKind::Concatenation,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn repetition(
        child: NodeId,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    ) -> Self {
        Self {
            kind: NodeKind::Repetition { min, max, greedy },
            left: Some(child),
            right: None,
        }
    }

    pub fn literal(code_point: u32) -> Self {
        Self::leaf(NodeKind::Literal(code_point))
    }

    pub fn dot() -> Self {
        Self::leaf(NodeKind::Dot)
    }

    pub fn char_class(set: ByteSet) -> Self {
        Self::leaf(NodeKind::CharClass(set))
    }
}

/// An arena of nodes with a designated root.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the tree and returns its identifier. The node is not
    /// connected to the root until some other node references it, or it
    /// is made the root with [`ParseTree::set_root`].
    pub fn add(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Number of nodes in the arena, including those not reachable from
    /// the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reserves room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Returns an iterator that traverses the tree in depth-first order
    /// starting at the root.
    pub fn dfs(&self) -> DFSIter<'_> {
        DFSIter::new(self, self.root)
    }

    /// Returns a representation of the tree as an ASCII tree.
    fn ascii_tree(&self, root: NodeId) -> Tree {
        let mut stack: Vec<Tree> = Vec::new();
        for event in DFSIter::new(self, Some(root)) {
            let DFSEvent::Leave(id) = event else { continue };
            let node = &self[id];
            let children = node.left.iter().chain(node.right.iter()).count();
            let children = stack.split_off(stack.len() - children);
            let label = node_label(&node.kind);
            stack.push(if children.is_empty() {
                Tree::Leaf(vec![label])
            } else {
                Tree::Node(label, children)
            });
        }
        stack.pop().unwrap_or(Tree::Leaf(vec![]))
    }
}

impl Index<NodeId> for ParseTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}

fn node_label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Regexp => "regexp".to_string(),
        NodeKind::Alternation => "alternation".to_string(),
        NodeKind::Concatenation => "concatenation".to_string(),
        NodeKind::Repetition { .. } => {
            format!("repetition {}", repetition_op(kind))
        }
        NodeKind::Literal(c) => format!("literal {}", code_point(*c)),
        NodeKind::Dot => "dot".to_string(),
        NodeKind::CharClass(set) => format!("class {}", set),
    }
}

fn repetition_op(kind: &NodeKind) -> String {
    let NodeKind::Repetition { min, max, greedy } = kind else {
        return String::new();
    };
    let op = match (min, max) {
        (0, Some(1)) => "?".to_string(),
        (0, None) => "*".to_string(),
        (1, None) => "+".to_string(),
        (min, None) => format!("{{{},}}", min),
        (min, Some(max)) => format!("{{{},{}}}", min, max),
    };
    if *greedy {
        op
    } else {
        op + "?"
    }
}

fn code_point(c: u32) -> String {
    match char::from_u32(c) {
        Some(c) if c.is_ascii_graphic() || c == ' ' => format!("'{}'", c),
        _ => format!("U+{:04X}", c),
    }
}

/// Writes the tree as an s-expression, like `(re (cat 'a' (* 'b')))`.
impl Display for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut stack: Vec<String> = Vec::new();
        for event in self.dfs() {
            let DFSEvent::Leave(id) = event else { continue };
            let node = &self[id];
            let children = node.left.iter().chain(node.right.iter()).count();
            let children = stack.split_off(stack.len() - children).join(" ");
            let s = match &node.kind {
                NodeKind::Literal(c) => code_point(*c),
                NodeKind::Dot => ".".to_string(),
                NodeKind::CharClass(set) => set.to_string(),
                NodeKind::Regexp => format!("(re {})", children),
                NodeKind::Alternation => format!("(alt {})", children),
                NodeKind::Concatenation => format!("(cat {})", children),
                kind @ NodeKind::Repetition { .. } => {
                    format!("({} {})", repetition_op(kind), children)
                }
            };
            stack.push(s);
        }
        for s in stack {
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

impl Debug for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.root {
            Some(root) => ::ascii_tree::write_tree(f, &self.ascii_tree(root)),
            None => write!(f, "<empty>"),
        }
    }
}

/// Events yielded by [`DFSIter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DFSEvent {
    Enter(NodeId),
    Leave(NodeId),
}

/// An iterator that performs a depth-first search traversal of a
/// [`ParseTree`].
///
/// This iterator yields a [`DFSEvent::Enter`] when entering a node and a
/// [`DFSEvent::Leave`] when leaving it. The left child is always visited
/// before the right one, so the sequence of `Leave` events is a post-order
/// traversal of the tree. For leaf nodes, the `Enter` and `Leave` events are
/// emitted consecutively. A node reachable through more than one parent is
/// visited once per parent.
pub struct DFSIter<'a> {
    tree: &'a ParseTree,
    stack: Vec<DFSEvent>,
}

impl<'a> DFSIter<'a> {
    /// Creates a new [`DFSIter`] that traverses `tree` starting at the
    /// given node. If `start` is `None` the iterator yields nothing.
    pub fn new(tree: &'a ParseTree, start: Option<NodeId>) -> Self {
        Self { tree, stack: start.map(DFSEvent::Enter).into_iter().collect() }
    }
}

impl Iterator for DFSIter<'_> {
    type Item = DFSEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.stack.pop()?;
        if let DFSEvent::Enter(id) = event {
            let node = &self.tree[id];
            self.stack.push(DFSEvent::Leave(id));
            if let Some(right) = node.right {
                self.stack.push(DFSEvent::Enter(right));
            }
            if let Some(left) = node.left {
                self.stack.push(DFSEvent::Enter(left));
            }
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{DFSEvent, Node, ParseTree};
    use crate::re::ByteSet;

    #[test]
    fn dfs_order() {
        // (a|b)c
        let mut tree = ParseTree::new();
        let a = tree.add(Node::literal('a' as u32));
        let b = tree.add(Node::literal('b' as u32));
        let alt = tree.add(Node::alternation(a, b));
        let c = tree.add(Node::literal('c' as u32));
        let cat = tree.add(Node::concatenation(alt, c));
        let root = tree.add(Node::regexp(cat));

        tree.set_root(root);

        let leaves: Vec<_> = tree
            .dfs()
            .filter_map(|event| match event {
                DFSEvent::Leave(id) => Some(id),
                _ => None,
            })
            .collect();

        assert_eq!(leaves, vec![a, b, alt, c, cat, root]);

        let events: Vec<_> = tree.dfs().take(4).collect();

        assert_eq!(
            events,
            vec![
                DFSEvent::Enter(root),
                DFSEvent::Enter(cat),
                DFSEvent::Enter(alt),
                DFSEvent::Enter(a),
            ]
        );
    }

    #[test]
    fn shared_children_are_visited_once_per_parent() {
        let mut tree = ParseTree::new();
        let a = tree.add(Node::literal('a' as u32));
        let aa = tree.add(Node::concatenation(a, a));
        tree.set_root(aa);

        let visits = tree
            .dfs()
            .filter(|event| *event == DFSEvent::Leave(a))
            .count();

        assert_eq!(visits, 2);
    }

    #[test]
    fn display() {
        let mut tree = ParseTree::new();
        let a = tree.add(Node::literal('a' as u32));
        let star = tree.add(Node::repetition(a, 0, None, true));
        let digits = ByteSet::from_range(b'0', b'9');
        let class = tree.add(Node::char_class(digits));
        let lazy = tree.add(Node::repetition(class, 2, Some(3), false));
        let dot = tree.add(Node::dot());
        let alt = tree.add(Node::alternation(lazy, dot));
        let cat = tree.add(Node::concatenation(star, alt));
        let root = tree.add(Node::regexp(cat));

        tree.set_root(root);

        assert_eq!(
            tree.to_string(),
            "(re (cat (* 'a') (alt ({2,3}? [0x30-0x39]) .)))"
        );

        let ascii = format!("{:?}", tree);

        assert!(ascii.contains("concatenation"));
        assert!(ascii.contains("repetition {2,3}?"));
        assert!(ascii.contains("literal 'a'"));
    }

    #[test]
    fn empty_tree() {
        let tree = ParseTree::new();

        assert!(tree.is_empty());
        assert_eq!(tree.dfs().count(), 0);
        assert_eq!(tree.to_string(), "");
    }
}
