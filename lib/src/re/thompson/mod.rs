/*! An automaton builder based on the [Thompson's construction][1] algorithm.

The automaton produced here is a bit different from the one described in the
literature. Instead of labeling edges, each vertex is labeled with the
[`Transition`] that a byte must satisfy for *entering* the vertex, and there
are no epsilon edges at all. The start vertex (vertex 0) is the only one
without a transition. Vertices that complete a match have their transitions
marked as match, together with a label that identifies the pattern.

Without epsilon edges, optional subexpressions and alternatives are expressed
by connecting every possible predecessor with every possible successor. The
order in which those connections are made determines the priority of each
path: successors are tried in the order they appear in the vertex's
outgoing list. This is how the greediness of operators like `*` and `*?` is
encoded in the automaton.

For example, the automaton for `ab*c` looks like this:

```text
00000: START -> 00001
00001: LIT 0x61 -> 00002 00003
00002: LIT 0x62 -> 00002 00003
00003: LIT 0x63 MATCH(0)
```

[1]: https://en.wikipedia.org/wiki/Thompson%27s_construction
*/

pub use builder::NfaBuilder;
pub use fragment::Fragment;
pub use graph::{Graph, Vertex};
pub use transition::{Transition, TransitionKind};

mod builder;
mod fragment;
mod graph;
mod transition;
