use std::fmt::{Display, Formatter};

use crate::re::thompson::Transition;

/// Index of a vertex in a [`Graph`].
pub type Vertex = u32;

/// Compact representation of an adjacency list.
///
/// Most vertices in a Thompson automaton have zero or one neighbour in each
/// direction, so those cases are stored inline. Only when a second neighbour
/// is added the list is moved to the graph's shared pool of adjacency lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Adjacency {
    #[default]
    Zero,
    One(Vertex),
    /// Index of the list within [`Graph::lists`].
    Many(u32),
}

#[derive(Clone, Debug, Default)]
struct VertexData {
    transition: Option<Transition>,
    incoming: Adjacency,
    outgoing: Adjacency,
}

/// A directed multigraph with ordered adjacency lists.
///
/// The order of the outgoing list of a vertex is significant: it determines
/// the priority in which a matcher explores the successors of the vertex.
/// Edges can be inserted at arbitrary positions of the outgoing list with
/// [`Graph::add_edge_at`], while the incoming list of the target always
/// grows at the end. Duplicate edges are allowed.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: Vec<VertexData>,
    lists: Vec<Vec<Vertex>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { vertices: Vec::with_capacity(capacity), lists: Vec::new() }
    }

    /// Number of vertices in the graph.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of vertices the graph can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.vertices.capacity()
    }

    /// Reserves room for at least `additional` more vertices.
    pub fn reserve(&mut self, additional: usize) {
        self.vertices.reserve(additional);
    }

    /// Removes all vertices and edges.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.lists.clear();
    }

    /// Adds an isolated vertex without transition and returns its index.
    pub fn add_vertex(&mut self) -> Vertex {
        self.vertices.push(VertexData::default());
        (self.vertices.len() - 1) as Vertex
    }

    /// Appends an edge `source -> target` at the end of the outgoing list
    /// of `source`.
    pub fn add_edge(&mut self, source: Vertex, target: Vertex) {
        let pos = self.out_degree(source);
        self.add_edge_at(source, target, pos);
    }

    /// Inserts an edge `source -> target` at position `pos` of the outgoing
    /// list of `source`, shifting later entries to the right. `target`
    /// gets `source` appended to its incoming list.
    ///
    /// # Panics
    ///
    /// If `pos` is greater than the out-degree of `source`.
    pub fn add_edge_at(&mut self, source: Vertex, target: Vertex, pos: usize) {
        let outgoing = self.vertices[source as usize].outgoing;
        let outgoing = self.insert(outgoing, pos, target);
        self.vertices[source as usize].outgoing = outgoing;

        let incoming = self.vertices[target as usize].incoming;
        let len = self.degree(incoming);
        let incoming = self.insert(incoming, len, source);
        self.vertices[target as usize].incoming = incoming;
    }

    /// Returns true if there's at least one edge `source -> target`.
    pub fn edge_exists(&self, source: Vertex, target: Vertex) -> bool {
        self.out_vertices(source).any(|v| v == target)
    }

    #[inline]
    pub fn in_degree(&self, v: Vertex) -> usize {
        self.degree(self.vertices[v as usize].incoming)
    }

    #[inline]
    pub fn out_degree(&self, v: Vertex) -> usize {
        self.degree(self.vertices[v as usize].outgoing)
    }

    /// Returns the `i`-th predecessor of `v`.
    ///
    /// # Panics
    ///
    /// If `i` is not lower than the in-degree of `v`.
    pub fn in_vertex(&self, v: Vertex, i: usize) -> Vertex {
        self.nth(self.vertices[v as usize].incoming, i)
    }

    /// Returns the `i`-th successor of `v`.
    ///
    /// # Panics
    ///
    /// If `i` is not lower than the out-degree of `v`.
    pub fn out_vertex(&self, v: Vertex, i: usize) -> Vertex {
        self.nth(self.vertices[v as usize].outgoing, i)
    }

    /// Returns an iterator over the predecessors of `v`, in order.
    pub fn in_vertices(&self, v: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.in_degree(v)).map(move |i| self.in_vertex(v, i))
    }

    /// Returns an iterator over the successors of `v`, in priority order.
    pub fn out_vertices(
        &self,
        v: Vertex,
    ) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.out_degree(v)).map(move |i| self.out_vertex(v, i))
    }

    /// Returns the transition of `v`, if any.
    #[inline]
    pub fn transition(&self, v: Vertex) -> Option<&Transition> {
        self.vertices[v as usize].transition.as_ref()
    }

    #[inline]
    pub fn transition_mut(&mut self, v: Vertex) -> Option<&mut Transition> {
        self.vertices[v as usize].transition.as_mut()
    }

    pub fn set_transition(&mut self, v: Vertex, transition: Transition) {
        self.vertices[v as usize].transition = Some(transition);
    }

    /// Returns an iterator over the vertices whose transition is marked as
    /// match.
    pub fn accepting(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.vertices.iter().enumerate().filter_map(|(i, data)| {
            match &data.transition {
                Some(t) if t.is_match => Some(i as Vertex),
                _ => None,
            }
        })
    }

    fn degree(&self, adjacency: Adjacency) -> usize {
        match adjacency {
            Adjacency::Zero => 0,
            Adjacency::One(_) => 1,
            Adjacency::Many(list) => self.lists[list as usize].len(),
        }
    }

    fn nth(&self, adjacency: Adjacency, i: usize) -> Vertex {
        match adjacency {
            Adjacency::One(v) if i == 0 => v,
            Adjacency::Many(list) => self.lists[list as usize][i],
            _ => panic!(
                "adjacency index {} out of range (degree {})",
                i,
                self.degree(adjacency)
            ),
        }
    }

    fn insert(
        &mut self,
        adjacency: Adjacency,
        pos: usize,
        v: Vertex,
    ) -> Adjacency {
        match adjacency {
            Adjacency::Zero => {
                assert_eq!(pos, 0, "insertion position out of range");
                Adjacency::One(v)
            }
            Adjacency::One(w) => {
                let mut list = vec![w];
                list.insert(pos, v);
                self.lists.push(list);
                Adjacency::Many((self.lists.len() - 1) as u32)
            }
            Adjacency::Many(list) => {
                self.lists[list as usize].insert(pos, v);
                adjacency
            }
        }
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for v in 0..self.num_vertices() as Vertex {
            write!(f, "{:05}: ", v)?;
            match self.transition(v) {
                Some(transition) => write!(f, "{}", transition)?,
                None => write!(f, "START")?,
            }
            if self.out_degree(v) > 0 {
                write!(f, " ->")?;
                for w in self.out_vertices(v) {
                    write!(f, " {:05}", w)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
