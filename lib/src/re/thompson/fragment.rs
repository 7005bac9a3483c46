use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::re::thompson::Vertex;
use crate::re::tree::NodeId;

/// A partially built piece of automaton.
///
/// While the automaton is being built every subexpression is represented
/// by a fragment, which describes how the subexpression connects to its
/// surroundings:
///
/// * `in_list` contains the vertices where the subexpression starts, in
///   priority order. Whatever precedes the fragment must get edges to
///   these vertices.
///
/// * `out_list` contains the vertices where the subexpression ends. Each
///   one comes with the position in the vertex's outgoing list where edges
///   to whatever follows the fragment must be inserted.
///
/// * `skippable` is `Some(i)` when the subexpression can match the empty
///   string. In that case `i` is the position within the `in_list` of a
///   preceding fragment where the `in_list` of the following fragment must
///   be spliced, which determines whether skipping the subexpression has
///   more or less priority than entering it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub in_list: Vec<Vertex>,
    pub out_list: Vec<(Vertex, usize)>,
    pub skippable: Option<usize>,
    /// Parse tree node that produced this fragment.
    pub node: Option<NodeId>,
}

impl Fragment {
    /// Creates a fragment that starts and ends at `vertex`.
    pub fn single(vertex: Vertex, node: Option<NodeId>) -> Self {
        Self {
            in_list: vec![vertex],
            out_list: vec![(vertex, 0)],
            skippable: None,
            node,
        }
    }

    /// Creates a fragment that starts at `first` and ends at `last`.
    pub fn path(first: Vertex, last: Vertex, node: NodeId) -> Self {
        Self {
            in_list: vec![first],
            out_list: vec![(last, 0)],
            skippable: None,
            node: Some(node),
        }
    }

    #[inline]
    pub fn is_skippable(&self) -> bool {
        self.skippable.is_some()
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "in [{}], out [{}]",
            self.in_list.iter().join(", "),
            self.out_list
                .iter()
                .map(|(v, pos)| format!("({}, {})", v, pos))
                .join(", ")
        )?;
        if let Some(skip) = self.skippable {
            write!(f, ", skip {}", skip)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Fragment;

    #[test]
    fn display() {
        let mut fragment = Fragment::single(0, None);

        assert_eq!(fragment.to_string(), "in [0], out [(0, 0)]");

        fragment.in_list.push(3);
        fragment.out_list.push((3, 1));
        fragment.skippable = Some(1);

        assert_eq!(
            fragment.to_string(),
            "in [0, 3], out [(0, 0), (3, 1)], skip 1"
        );
    }
}
