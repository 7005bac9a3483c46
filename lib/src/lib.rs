/*! Turns regular expressions into byte-level automata.

Patterns are parsed into a binary [`ParseTree`], which is then handed to a
[`NfaBuilder`] that produces a [`Graph`]: a Thompson-style automaton where
each vertex is labeled with the byte predicate required for entering it, and
where the order of each vertex's outgoing edges reflects the priority of the
paths that leave it. Greedy operators prefer to keep matching, non-greedy
ones prefer to leave, and alternatives are tried from left to right.

The resulting graph is meant to be consumed by a byte-oriented search
engine. Accepting vertices carry a label that identifies the pattern, so
graphs for many patterns can be told apart after they are merged.

# Example

```rust
let config = regraph::Config::default();
let graph = regraph::compile("ab+c", 1, &config).unwrap();

// Start vertex, plus one vertex per literal.
assert_eq!(graph.num_vertices(), 4);
assert_eq!(graph.accepting().collect::<Vec<_>>(), vec![3]);
```
*/

use log::*;

pub use config::Config;
pub use errors::Error;
pub use re::parser::Error as ParseError;
pub use re::parser::Parser;
pub use re::thompson::Graph;
pub use re::thompson::NfaBuilder;
pub use re::tree::ParseTree;
pub use re::BuildError;

pub mod config;
pub mod encoding;
pub mod re;

mod errors;

#[cfg(test)]
mod tests;

/// Parses `pattern` and builds its automaton, labeling accepting vertices
/// with `label`.
///
/// This is a shortcut for parsing with a [`Parser`] and building with a
/// [`NfaBuilder`], both configured according to `config`.
pub fn compile(
    pattern: &str,
    label: u32,
    config: &Config,
) -> Result<Graph, Error> {
    let tree = Parser::with_config(&config.parser).parse(pattern)?;

    trace!("parse tree for `{}`:\n{:?}", pattern, tree);

    let mut builder = NfaBuilder::with_config(&config.builder);

    builder.set_label(label);
    builder.build(&tree)?;

    Ok(builder.into_graph())
}
