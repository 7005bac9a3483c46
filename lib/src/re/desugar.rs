/*! Rewrites bounded repetitions in terms of simpler operators.

The automaton builder only knows how to build the three basic repetition
operators: `?` (`{0,1}`), `*` (`{0,}`) and `+` (`{1,}`). Any other repetition
is rewritten by [`desugar`] as follows, where `L` is the repeated operand:

| repetition | rewritten as                     |
|------------|----------------------------------|
| `L{1}`     | `L`                              |
| `L{n}`     | `LL...L` (`n` times)             |
| `L{n,}`    | `LL...L+` (`n-1` times and `L+`) |
| `L{0,m}`   | `(L(L(L)?)?)?` (`m` levels)      |
| `L{n,m}`   | `L{n}` followed by `L{0,m-n}`    |

Concatenations are right-nested and the operand `L` is not copied: all the
occurrences reference the same node, so the result is a DAG. The greediness
of the original repetition is kept by every optional introduced while
rewriting it.
*/

use log::*;

use crate::re::tree::{DFSEvent, Node, NodeId, NodeKind, ParseTree};
use crate::re::BuildError;

/// Returns a copy of `tree` where every repetition has been rewritten in
/// terms of `?`, `*`, `+` and concatenation.
///
/// Returns [`BuildError::EmptyRepetition`] if some repetition is `{0,0}`,
/// and [`BuildError::EmptyTree`] if the tree has no root.
pub fn desugar(tree: &ParseTree) -> Result<ParseTree, BuildError> {
    let root = tree.root().ok_or(BuildError::EmptyTree)?;

    let mut result = ParseTree::new();
    result.reserve(tree.len());

    // Maps the nodes in `tree` to their counterparts in `result`. Nodes that
    // are reachable through more than one parent are translated only once.
    let mut translated: Vec<Option<NodeId>> = vec![None; tree.len()];

    for event in tree.dfs() {
        let DFSEvent::Leave(id) = event else { continue };

        if translated[id].is_some() {
            continue;
        }

        let node = &tree[id];
        let left = node.left.and_then(|left| translated[left]);
        let right = node.right.and_then(|right| translated[right]);

        let new_id = match node.kind {
            NodeKind::Repetition { min, max, greedy } => {
                let child =
                    left.ok_or(BuildError::MissingOperand { node: id })?;
                expand(&mut result, id, child, min, max, greedy)?
            }
            _ => result.add(Node { kind: node.kind.clone(), left, right }),
        };

        translated[id] = Some(new_id);
    }

    if let Some(root) = translated[root] {
        result.set_root(root);
    }

    debug!("desugared tree: {} nodes -> {} nodes", tree.len(), result.len());

    Ok(result)
}

/// Number of nodes added by [`expand`] for a repetition.
fn expansion_size(min: u32, max: Option<u32>) -> usize {
    match (min, max) {
        (n, Some(m)) if n == m => n.saturating_sub(1) as usize,
        (n, None) => n as usize,
        (n, Some(m)) => 2 * m as usize - n as usize - 1,
    }
}

fn expand(
    tree: &mut ParseTree,
    id: NodeId,
    child: NodeId,
    min: u32,
    max: Option<u32>,
    greedy: bool,
) -> Result<NodeId, BuildError> {
    match (min, max) {
        (0, Some(0)) => return Err(BuildError::EmptyRepetition { node: id }),
        (1, Some(1)) => return Ok(child),
        (0, Some(1)) | (0, None) | (1, None) => {
            return Ok(tree.add(Node::repetition(child, min, max, greedy)))
        }
        _ => {}
    }

    if let Some(max) = max {
        if max < min {
            return Err(BuildError::EmptyRepetition { node: id });
        }
    }

    tree.reserve(expansion_size(min, max));

    // The innermost node of the expansion, which is the one that follows
    // the mandatory occurrences of the operand.
    let (mut node, mandatory) = match max {
        None => (tree.add(Node::repetition(child, 1, None, greedy)), min - 1),
        Some(max) if max == min => (child, min - 1),
        Some(max) => {
            let mut optional =
                tree.add(Node::repetition(child, 0, Some(1), greedy));
            for _ in 1..max - min {
                let cat = tree.add(Node::concatenation(child, optional));
                optional = tree.add(Node::repetition(cat, 0, Some(1), greedy));
            }
            (optional, min)
        }
    };

    for _ in 0..mandatory {
        node = tree.add(Node::concatenation(child, node));
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{desugar, expansion_size};
    use crate::re::tree::{Node, ParseTree};
    use crate::re::BuildError;

    /// Returns the tree for `a{min,max}` after desugaring.
    fn repeat_a(min: u32, max: Option<u32>, greedy: bool) -> ParseTree {
        let mut tree = ParseTree::new();
        let a = tree.add(Node::literal('a' as u32));
        let rep = tree.add(Node::repetition(a, min, max, greedy));
        let root = tree.add(Node::regexp(rep));
        tree.set_root(root);
        desugar(&tree).unwrap()
    }

    macro_rules! assert_desugar {
        ($min:expr, $max:expr, $expected:expr) => {{
            assert_eq!(repeat_a($min, $max, true).to_string(), $expected);
        }};
    }

    #[test]
    fn basic_operators_are_kept() {
        assert_desugar!(0, Some(1), "(re (? 'a'))");
        assert_desugar!(0, None, "(re (* 'a'))");
        assert_desugar!(1, None, "(re (+ 'a'))");
        assert_desugar!(1, Some(1), "(re 'a')");
    }

    #[test]
    fn exact_repetitions() {
        assert_desugar!(2, Some(2), "(re (cat 'a' 'a'))");
        assert_desugar!(3, Some(3), "(re (cat 'a' (cat 'a' 'a')))");
    }

    #[test]
    fn unbounded_repetitions() {
        assert_desugar!(2, None, "(re (cat 'a' (+ 'a')))");
        assert_desugar!(3, None, "(re (cat 'a' (cat 'a' (+ 'a'))))");
    }

    #[test]
    fn bounded_repetitions() {
        assert_desugar!(0, Some(2), "(re (? (cat 'a' (? 'a'))))");
        assert_desugar!(
            0,
            Some(3),
            "(re (? (cat 'a' (? (cat 'a' (? 'a'))))))"
        );
        assert_desugar!(1, Some(2), "(re (cat 'a' (? 'a')))");
        assert_desugar!(2, Some(3), "(re (cat 'a' (cat 'a' (? 'a'))))");
        assert_desugar!(
            2,
            Some(4),
            "(re (cat 'a' (cat 'a' (? (cat 'a' (? 'a'))))))"
        );
    }

    #[test]
    fn greediness_is_propagated() {
        assert_eq!(
            repeat_a(1, Some(3), false).to_string(),
            "(re (cat 'a' (?? (cat 'a' (?? 'a')))))"
        );
        assert_eq!(
            repeat_a(2, None, false).to_string(),
            "(re (cat 'a' (+? 'a')))"
        );
    }

    #[test]
    fn operand_is_shared() {
        let tree = repeat_a(3, Some(3), true);
        // One literal, two concatenations and the root.
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn reserved_sizes() {
        assert_eq!(expansion_size(3, Some(3)), 2);
        assert_eq!(expansion_size(3, None), 3);
        assert_eq!(expansion_size(1, Some(4)), 6);
        assert_eq!(expansion_size(0, Some(3)), 5);
    }

    #[test]
    fn empty_repetition() {
        let mut tree = ParseTree::new();
        let a = tree.add(Node::literal('a' as u32));
        let rep = tree.add(Node::repetition(a, 0, Some(0), true));
        let root = tree.add(Node::regexp(rep));
        tree.set_root(root);

        assert_eq!(
            desugar(&tree),
            Err(BuildError::EmptyRepetition { node: rep })
        );
        assert_eq!(desugar(&ParseTree::new()), Err(BuildError::EmptyTree));
    }
}
