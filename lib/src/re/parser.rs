use bstr::ByteSlice;
use regex_syntax as re;
use regex_syntax::hir::{Class, ClassBytes, HirKind};
use thiserror::Error;

use crate::config::ParserConfig;
use crate::re::hir::{any_byte, Hir};
use crate::re::tree::{Node, NodeId, ParseTree};
use crate::re::ByteSet;

/// Maximum number of code points in a Unicode character class that can't
/// be expressed as a set of bytes. Such classes are expanded into an
/// alternation with one literal per code point.
pub const MAX_CLASS_EXPANSION: u32 = 256;

/// Errors returned by [`Parser::parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{msg}")]
    SyntaxError { msg: String, span: re::ast::Span },

    #[error("anchors and word boundaries are not supported")]
    UnsupportedAssertion,

    #[error("character class matches nothing")]
    EmptyClass,

    #[error(
        "character class is too large (max: {} code points)",
        MAX_CLASS_EXPANSION
    )]
    ClassTooLarge,

    #[error("pattern matches only the empty string")]
    EmptyPattern,
}

/// A regular expression parser.
///
/// Takes a regular expression in text form and produces its corresponding
/// [`ParseTree`].
pub struct Parser {
    case_insensitive: bool,
    dot_matches_new_line: bool,
    fixed_string: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            case_insensitive: false,
            dot_matches_new_line: true,
            fixed_string: false,
        }
    }

    /// Creates a parser configured according to `config`.
    pub fn with_config(config: &ParserConfig) -> Self {
        Self::new()
            .dot_matches_new_line(config.dot_matches_new_line)
            .fixed_string(config.fixed_string)
    }

    /// Parses the regexp as a case-insensitive one. Letters in the pattern
    /// become classes that contain both cases.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// If true, the dot (.) matches any byte, including newline characters.
    /// This is the default.
    pub fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    /// If true, the pattern is interpreted as a literal string, where
    /// characters like `*` or `(` have no special meaning.
    pub fn fixed_string(mut self, yes: bool) -> Self {
        self.fixed_string = yes;
        self
    }

    /// Parses the regexp and returns its HIR.
    pub fn parse_hir(&self, pattern: &str) -> Result<Hir, Error> {
        let escaped;
        let source = if self.fixed_string {
            escaped = re::escape(pattern);
            escaped.as_str()
        } else {
            pattern
        };

        let mut parser =
            re::ast::parse::ParserBuilder::new().empty_min_range(true).build();

        let ast = parser.parse(source).map_err(|err| Error::SyntaxError {
            msg: err.kind().to_string(),
            span: *err.span(),
        })?;

        let mut translator = re::hir::translate::TranslatorBuilder::new()
            .case_insensitive(self.case_insensitive)
            .dot_matches_new_line(self.dot_matches_new_line)
            .unicode(false)
            .utf8(false)
            .build();

        let hir = translator.translate(source, &ast).map_err(|err| {
            Error::SyntaxError {
                msg: err.kind().to_string(),
                span: *err.span(),
            }
        })?;

        Ok(hir.into())
    }

    /// Parses the regexp and returns its parse tree.
    ///
    /// Non-greedy repetitions at the end of the pattern are removed, see
    /// [`Hir::trim_trailing_non_greedy`].
    pub fn parse(&self, pattern: &str) -> Result<ParseTree, Error> {
        let hir = self.parse_hir(pattern)?.trim_trailing_non_greedy();
        re::hir::visit(hir.inner(), TreeBuilder::new())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowers a HIR into a [`ParseTree`].
///
/// The HIR is traversed in post-order. Each node leaves in `results` the
/// root of the subtree it was lowered into, or `None` if the node matches
/// only the empty string and therefore has no counterpart in the tree.
/// Concatenations and alternations with more than two items are lowered into
/// a left-nested chain of binary nodes.
struct TreeBuilder {
    tree: ParseTree,
    results: Vec<Option<NodeId>>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self { tree: ParseTree::new(), results: Vec::new() }
    }

    fn pop(&mut self, n: usize) -> Vec<Option<NodeId>> {
        self.results.split_off(self.results.len().saturating_sub(n))
    }

    fn concat(&mut self, items: Vec<Option<NodeId>>) -> Option<NodeId> {
        items.into_iter().flatten().reduce(|left, right| {
            self.tree.add(Node::concatenation(left, right))
        })
    }

    fn alternate(&mut self, items: Vec<Option<NodeId>>) -> Option<NodeId> {
        let empty_first = matches!(items.first(), Some(None));
        let has_empty = items.iter().any(Option::is_none);

        let alternation = items.into_iter().flatten().reduce(|left, right| {
            self.tree.add(Node::alternation(left, right))
        })?;

        // An empty alternative makes the whole alternation optional. If the
        // empty alternative comes first, skipping is preferred.
        if has_empty {
            Some(self.tree.add(Node::repetition(
                alternation,
                0,
                Some(1),
                !empty_first,
            )))
        } else {
            Some(alternation)
        }
    }

    fn literal(&mut self, bytes: &[u8]) -> Option<NodeId> {
        let mut nodes = Vec::new();
        for chunk in ByteSlice::utf8_chunks(bytes) {
            for c in chunk.valid().chars() {
                nodes.push(Some(self.tree.add(Node::literal(c as u32))));
            }
            // Bytes that are not valid UTF-8 are matched as they are.
            for byte in chunk.invalid() {
                nodes.push(Some(self.tree.add(Node::char_class(
                    ByteSet::from_range(*byte, *byte),
                ))));
            }
        }
        self.concat(nodes)
    }

    fn byte_class(&mut self, class: &ClassBytes) -> Result<NodeId, Error> {
        if any_byte(&HirKind::Class(Class::Bytes(class.clone()))) {
            return Ok(self.tree.add(Node::dot()));
        }
        let mut set = ByteSet::new();
        for range in class.ranges() {
            set.insert_range(range.start(), range.end());
        }
        if set.is_empty() {
            return Err(Error::EmptyClass);
        }
        Ok(self.tree.add(Node::char_class(set)))
    }

    fn class(&mut self, class: &Class) -> Result<NodeId, Error> {
        let class = match class {
            Class::Bytes(class) => return self.byte_class(class),
            Class::Unicode(class) => class,
        };

        if let Some(class) = class.to_byte_class() {
            return self.byte_class(&class);
        }

        let size: u32 = class
            .ranges()
            .iter()
            .map(|range| range.end() as u32 - range.start() as u32 + 1)
            .sum();

        if size > MAX_CLASS_EXPANSION {
            return Err(Error::ClassTooLarge);
        }

        let mut alternatives = Vec::with_capacity(size as usize);

        for range in class.ranges() {
            for c in range.start()..=range.end() {
                let literal = self.tree.add(Node::literal(c as u32));
                alternatives.push(Some(literal));
            }
        }

        self.alternate(alternatives).ok_or(Error::EmptyClass)
    }
}

impl re::hir::Visitor for TreeBuilder {
    type Output = ParseTree;
    type Err = Error;

    fn finish(mut self) -> Result<Self::Output, Self::Err> {
        let pattern = self.results.pop().flatten().ok_or(Error::EmptyPattern)?;
        let root = self.tree.add(Node::regexp(pattern));
        self.tree.set_root(root);
        Ok(self.tree)
    }

    fn visit_post(&mut self, hir: &re::hir::Hir) -> Result<(), Self::Err> {
        let result = match hir.kind() {
            HirKind::Empty => None,
            HirKind::Look(_) => return Err(Error::UnsupportedAssertion),
            HirKind::Literal(literal) => self.literal(&literal.0),
            HirKind::Class(class) => Some(self.class(class)?),
            HirKind::Capture(_) => self.results.pop().flatten(),
            HirKind::Repetition(rep) => {
                let sub = self.results.pop().flatten();
                match (sub, rep.min, rep.max) {
                    (None, _, _) | (_, 0, Some(0)) => None,
                    (Some(sub), min, max) => Some(self.tree.add(
                        Node::repetition(sub, min, max, rep.greedy),
                    )),
                }
            }
            HirKind::Concat(items) => {
                let items = self.pop(items.len());
                self.concat(items)
            }
            HirKind::Alternation(alternatives) => {
                let alternatives = self.pop(alternatives.len());
                self.alternate(alternatives)
            }
        };
        self.results.push(result);
        Ok(())
    }
}
