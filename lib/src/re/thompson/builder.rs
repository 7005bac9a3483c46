use log::*;

use crate::config::BuilderConfig;
use crate::encoding::{Ascii, Encoding};
use crate::re::desugar::desugar;
use crate::re::thompson::{Fragment, Graph, Transition, Vertex};
use crate::re::tree::{DFSEvent, NodeId, NodeKind, ParseTree};
use crate::re::{BuildError, ByteSet};

/// Builds a [`Graph`] from a [`ParseTree`].
///
/// The builder walks the tree in post-order, keeping a stack of
/// [`Fragment`]s. Leaves push a new fragment, unary operators transform the
/// fragment at the top of the stack, and binary operators combine the two
/// topmost fragments into one. The bottom of the stack is always a fragment
/// that represents the start vertex (vertex 0), which is joined with the
/// pattern's fragment when the root of the tree is reached.
///
/// The priority of greedy and non-greedy operators is expressed in the
/// order of each vertex's outgoing edges: the earlier a successor appears in
/// the list, the more it is preferred.
///
/// ```
/// use regraph::re::parser::Parser;
/// use regraph::re::thompson::NfaBuilder;
///
/// let tree = Parser::new().parse("ab").unwrap();
/// let mut builder = NfaBuilder::new();
///
/// builder.set_label(7);
/// builder.build(&tree).unwrap();
///
/// let graph = builder.into_graph();
///
/// assert_eq!(graph.num_vertices(), 3);
/// assert_eq!(graph.accepting().collect::<Vec<_>>(), vec![2]);
/// ```
pub struct NfaBuilder {
    case_sensitive: bool,
    encoding: Box<dyn Encoding>,
    /// Scratch buffer where literals are encoded.
    buf: Vec<u8>,
    graph: Graph,
    stack: Vec<Fragment>,
    label: u32,
    size_hint: usize,
    is_good: bool,
}

impl NfaBuilder {
    /// Creates a case-sensitive builder for ASCII patterns.
    pub fn new() -> Self {
        let mut builder = Self {
            case_sensitive: true,
            encoding: Box::new(Ascii),
            buf: vec![0; Ascii.max_byte_length()],
            graph: Graph::new(),
            stack: Vec::new(),
            label: 0,
            size_hint: 0,
            is_good: false,
        };
        builder.reset();
        builder
    }

    /// Creates a builder configured according to `config`.
    pub fn with_config(config: &BuilderConfig) -> Self {
        let mut builder = Self::new();
        builder.set_case_sensitive(config.case_sensitive);
        builder.set_encoding(config.encoding.encoder());
        builder.set_size_hint(config.size_hint);
        builder
    }

    pub fn set_case_sensitive(&mut self, yes: bool) -> &mut Self {
        self.case_sensitive = yes;
        self
    }

    pub fn set_encoding(&mut self, encoding: Box<dyn Encoding>) -> &mut Self {
        self.buf = vec![0; encoding.max_byte_length()];
        self.encoding = encoding;
        self
    }

    /// Sets the label that identifies the pattern in accepting vertices.
    pub fn set_label(&mut self, label: u32) -> &mut Self {
        self.label = label;
        self
    }

    /// Number of vertices to reserve in the graph on every reset.
    pub fn set_size_hint(&mut self, size_hint: usize) -> &mut Self {
        self.size_hint = size_hint;
        self.graph.reserve(size_hint);
        self
    }

    /// Returns true if the last build completed successfully.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.is_good
    }

    /// Returns the graph built so far.
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Consumes the builder and returns the graph.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Leaves the builder ready for building a new automaton. The graph is
    /// emptied except for the start vertex, and the fragment stack contains
    /// only the fragment for the start vertex.
    pub fn reset(&mut self) {
        self.is_good = false;
        self.graph.clear();
        self.graph.reserve(self.size_hint);
        let start = self.graph.add_vertex();
        self.stack.clear();
        self.stack.push(Fragment::single(start, None));
    }

    /// Builds the automaton for `tree`.
    ///
    /// The builder is reset before starting, so any graph produced by a
    /// previous call is discarded. On error the builder is reset again,
    /// leaving just the start vertex in the graph.
    pub fn build(&mut self, tree: &ParseTree) -> Result<(), BuildError> {
        self.reset();

        let result = desugar(tree).and_then(|tree| self.traverse(&tree));

        match &result {
            Ok(_) => debug!(
                "built automaton for label {}: {} vertices",
                self.label,
                self.graph.num_vertices()
            ),
            Err(err) => {
                debug!("failed to build automaton: {}", err);
                self.reset();
            }
        }

        result
    }

    fn traverse(&mut self, tree: &ParseTree) -> Result<(), BuildError> {
        for event in tree.dfs() {
            if let DFSEvent::Leave(id) = event {
                self.callback(tree, id)?;
            }
        }
        if self.is_good {
            Ok(())
        } else {
            Err(BuildError::MalformedStack { depth: self.stack.len() })
        }
    }

    fn callback(
        &mut self,
        tree: &ParseTree,
        id: NodeId,
    ) -> Result<(), BuildError> {
        match &tree[id].kind {
            NodeKind::Regexp => self.finish(id)?,
            NodeKind::Alternation => self.alternate(id)?,
            NodeKind::Concatenation => self.concatenate(id)?,
            NodeKind::Repetition { min, max, greedy: true } => {
                self.repetition(id, *min, *max)?
            }
            NodeKind::Repetition { min, max, greedy: false } => {
                self.repetition_ng(id, *min, *max)?
            }
            NodeKind::Literal(code_point) => self.literal(id, *code_point)?,
            NodeKind::Dot => self.dot(id),
            NodeKind::CharClass(set) => self.char_class(id, set),
        }
        if let Some(top) = self.stack.last() {
            trace!("node {}: {}", id, top);
        }
        Ok(())
    }

    fn pop(&mut self) -> Result<Fragment, BuildError> {
        self.stack
            .pop()
            .ok_or(BuildError::MalformedStack { depth: 0 })
    }

    fn top(&mut self) -> Result<&mut Fragment, BuildError> {
        self.stack
            .last_mut()
            .ok_or(BuildError::MalformedStack { depth: 0 })
    }

    /// Adds edges from every vertex in `src` to every vertex in `dst`,
    /// inserted at the positions indicated in `src`. The positions in `src`
    /// are advanced, so that edges added later go after these ones.
    fn patch_pre(
        graph: &mut Graph,
        src: &mut [(Vertex, usize)],
        dst: &[Vertex],
    ) {
        for (v, pos) in src.iter_mut() {
            for &w in dst {
                graph.add_edge_at(*v, w, *pos);
                *pos += 1;
            }
        }
    }

    /// Like [`NfaBuilder::patch_pre`], but positions in `src` are not
    /// advanced, so that edges added later go before these ones.
    fn patch_post(
        graph: &mut Graph,
        src: &[(Vertex, usize)],
        dst: &[Vertex],
    ) {
        for &(v, pos) in src {
            let mut pos = pos;
            for &w in dst {
                graph.add_edge_at(v, w, pos);
                pos += 1;
            }
        }
    }

    fn literal(
        &mut self,
        id: NodeId,
        code_point: u32,
    ) -> Result<(), BuildError> {
        let len = self.encoding.write(code_point, &mut self.buf);

        if len == 0 {
            return Err(BuildError::UnencodableLiteral {
                code_point,
                node: id,
            });
        }

        let first = self.graph.add_vertex();
        let transition = self.literal_transition(self.buf[0]);
        self.graph.set_transition(first, transition);

        let mut last = first;

        for i in 1..len {
            let v = self.graph.add_vertex();
            let transition = self.literal_transition(self.buf[i]);
            self.graph.set_transition(v, transition);
            self.graph.add_edge(last, v);
            last = v;
        }

        self.stack.push(Fragment::path(first, last, id));
        Ok(())
    }

    fn literal_transition(&self, byte: u8) -> Transition {
        if self.case_sensitive || !byte.is_ascii_alphabetic() {
            Transition::lit(byte)
        } else {
            Transition::either(
                byte.to_ascii_uppercase(),
                byte.to_ascii_lowercase(),
            )
        }
    }

    fn dot(&mut self, id: NodeId) {
        let v = self.graph.add_vertex();
        self.graph.set_transition(v, Transition::any());
        self.stack.push(Fragment::single(v, Some(id)));
    }

    fn char_class(&mut self, id: NodeId, set: &ByteSet) {
        let mut set = set.clone();
        if !self.case_sensitive {
            set.fold_ascii_case();
        }
        let v = self.graph.add_vertex();
        self.graph.set_transition(v, Transition::class(set));
        self.stack.push(Fragment::single(v, Some(id)));
    }

    fn alternate(&mut self, id: NodeId) -> Result<(), BuildError> {
        let second = self.pop()?;
        let first = self.top()?;

        first.skippable = match (first.skippable, second.skippable) {
            (Some(skip), _) => Some(skip),
            (None, Some(skip)) => Some(first.in_list.len() + skip),
            (None, None) => None,
        };

        first.in_list.extend(second.in_list);
        first.out_list.extend(second.out_list);
        first.node = Some(id);

        Ok(())
    }

    fn concatenate(&mut self, id: NodeId) -> Result<(), BuildError> {
        let second = self.pop()?;
        let first = self
            .stack
            .last_mut()
            .ok_or(BuildError::MalformedStack { depth: 0 })?;

        // The edges towards `second` take precedence over the edges that
        // will be added later to the vertices in the out list, unless the
        // splice point of `first` is not before the one of `second`.
        match (first.skippable, second.skippable) {
            (Some(a), Some(b)) if a >= b => Self::patch_post(
                &mut self.graph,
                &first.out_list,
                &second.in_list,
            ),
            _ => Self::patch_pre(
                &mut self.graph,
                &mut first.out_list,
                &second.in_list,
            ),
        }

        if let Some(skip) = first.skippable {
            let tail = first.in_list.split_off(skip);
            first.in_list.extend_from_slice(&second.in_list);
            first.in_list.extend(tail);
        }

        if second.is_skippable() {
            first.out_list.extend(second.out_list);
        } else {
            first.out_list = second.out_list;
        }

        first.skippable = match (first.skippable, second.skippable) {
            (Some(a), Some(b)) => Some(a + b),
            _ => None,
        };

        first.node = Some(id);

        Ok(())
    }

    fn repetition(
        &mut self,
        id: NodeId,
        min: u32,
        max: Option<u32>,
    ) -> Result<(), BuildError> {
        match (min, max) {
            (0, Some(1)) => self.question(id),
            (0, None) => self.star(id),
            (1, None) => self.plus(id),
            _ => Err(BuildError::UnexpandedRepetition { node: id }),
        }
    }

    fn repetition_ng(
        &mut self,
        id: NodeId,
        min: u32,
        max: Option<u32>,
    ) -> Result<(), BuildError> {
        match (min, max) {
            (0, Some(1)) => self.question_ng(id),
            (0, None) => self.star_ng(id),
            (1, None) => self.plus_ng(id),
            _ => Err(BuildError::UnexpandedRepetition { node: id }),
        }
    }

    fn question(&mut self, id: NodeId) -> Result<(), BuildError> {
        let top = self.top()?;
        let len = top.in_list.len();
        if top.skippable.map_or(true, |skip| skip > len) {
            top.skippable = Some(len);
        }
        top.node = Some(id);
        Ok(())
    }

    fn question_ng(&mut self, id: NodeId) -> Result<(), BuildError> {
        let top = self.top()?;
        top.skippable = Some(0);
        top.node = Some(id);
        Ok(())
    }

    fn plus(&mut self, id: NodeId) -> Result<(), BuildError> {
        let top = self
            .stack
            .last_mut()
            .ok_or(BuildError::MalformedStack { depth: 0 })?;
        Self::patch_pre(&mut self.graph, &mut top.out_list, &top.in_list);
        top.node = Some(id);
        Ok(())
    }

    fn plus_ng(&mut self, id: NodeId) -> Result<(), BuildError> {
        let top = self
            .stack
            .last_mut()
            .ok_or(BuildError::MalformedStack { depth: 0 })?;
        Self::patch_post(&mut self.graph, &top.out_list, &top.in_list);
        top.node = Some(id);
        Ok(())
    }

    fn star(&mut self, id: NodeId) -> Result<(), BuildError> {
        self.plus(id)?;
        self.question(id)
    }

    fn star_ng(&mut self, id: NodeId) -> Result<(), BuildError> {
        self.plus_ng(id)?;
        self.question_ng(id)
    }

    /// Joins the start fragment with the pattern's fragment and marks the
    /// vertices where the pattern ends as accepting.
    fn finish(&mut self, id: NodeId) -> Result<(), BuildError> {
        let depth = self.stack.len();

        if depth != 2 {
            return Err(BuildError::MalformedStack { depth });
        }

        self.concatenate(id)?;

        let start = self
            .stack
            .last()
            .ok_or(BuildError::MalformedStack { depth: 0 })?;

        for &(v, _) in &start.out_list {
            if v == 0 {
                return Err(BuildError::ZeroLengthMatch);
            }
            match self.graph.transition_mut(v) {
                Some(transition) => {
                    transition.label = self.label;
                    transition.is_match = true;
                }
                None => return Err(BuildError::UnlabeledVertex { vertex: v }),
            }
        }

        self.is_good = true;

        Ok(())
    }
}

#[cfg(test)]
impl NfaBuilder {
    /// Number of fragments in the stack.
    pub(crate) fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for NfaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
