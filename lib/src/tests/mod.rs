/*! End-to-end tests.

Patterns are compiled into automata, which are then run over some data with
a simple backtracking matcher. The matcher explores the successors of each
vertex in the order they appear in the vertex's outgoing list, so the hits
reflect the priorities encoded in the automaton.
*/
use pretty_assertions::assert_eq;

use crate::encoding::EncodingKind;
use crate::re::thompson::{Graph, Vertex};
use crate::{compile, BuildError, Config, Error};

const TEXT: &[u8] = b"aaabaacabbabcacbaccbbbcbccca";

/// Returns the `(start, end, label)` of every hit of `graph` in `data`.
///
/// Hits are leftmost-first and non-overlapping: after a hit, the search
/// resumes at the offset where the hit ended.
fn search(graph: &Graph, data: &[u8]) -> Vec<(usize, usize, u32)> {
    let mut hits = Vec::new();
    let mut start = 0;
    while start < data.len() {
        match match_at(graph, 0, data, start) {
            Some((end, label)) => {
                hits.push((start, end, label));
                start = end;
            }
            None => start += 1,
        }
    }
    hits
}

/// Tries to continue a match that has reached `v` at offset `pos`. Longer
/// continuations are preferred over stopping at `v`, and successors are
/// tried in order.
fn match_at(
    graph: &Graph,
    v: Vertex,
    data: &[u8],
    pos: usize,
) -> Option<(usize, u32)> {
    if let Some(&byte) = data.get(pos) {
        for w in graph.out_vertices(v) {
            if graph.transition(w).is_some_and(|t| t.matches(byte)) {
                if let Some(hit) = match_at(graph, w, data, pos + 1) {
                    return Some(hit);
                }
            }
        }
    }
    graph.transition(v).filter(|t| t.is_match).map(|t| (pos, t.label))
}

macro_rules! hits {
    ($pattern:expr, $data:expr) => {{
        hits!($pattern, $data, &Config::default())
    }};
    ($pattern:expr, $data:expr, $config:expr) => {{
        let graph = compile($pattern, 0, $config).unwrap();
        search(&graph, $data)
            .into_iter()
            .map(|(start, end, _)| (start, end))
            .collect::<Vec<_>>()
    }};
}

#[test]
fn alternation_of_literals() {
    let expected: Vec<_> = (0..TEXT.len()).map(|i| (i, i + 1)).collect();
    assert_eq!(hits!("a|b|c", TEXT), expected);
}

#[test]
fn alternation_with_repeated_literals() {
    assert_eq!(
        hits!("a|b|a", TEXT),
        [
            0_usize, 1, 2, 3, 4, 5, 7, 8, 9, 10, 11, 13, 15, 16, 19, 20, 21,
            23, 27
        ]
        .into_iter()
        .map(|i| (i, i + 1))
        .collect::<Vec<_>>()
    );

    assert_eq!(
        hits!("a|a|aa", TEXT),
        [0_usize, 1, 2, 4, 5, 7, 10, 13, 16, 27]
            .into_iter()
            .map(|i| (i, i + 1))
            .collect::<Vec<_>>()
    );

    assert_eq!(
        hits!("a|a|ba", TEXT),
        vec![
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 5),
            (5, 6),
            (7, 8),
            (9, 11),
            (13, 14),
            (15, 17),
            (27, 28)
        ]
    );
}

#[test]
fn alternation_with_bounded_repetition() {
    let hits = hits!("a|b|c{1,2}", TEXT);

    assert_eq!(hits.len(), 26);
    assert_eq!(&hits[16..19], &[(16, 17), (17, 19), (19, 20)]);
    assert_eq!(&hits[23..], &[(24, 26), (26, 27), (27, 28)]);

    let expected: Vec<_> = (0..TEXT.len()).map(|i| (i, i + 1)).collect();

    assert_eq!(hits!("a|b|c{1,2}?", TEXT), expected);
}

#[test]
fn zero_length_match() {
    assert_eq!(
        compile("a|a|a*", 0, &Config::default()).err(),
        Some(Error::BuildError(BuildError::ZeroLengthMatch))
    );
}

#[test]
fn greedy_and_non_greedy() {
    assert_eq!(hits!("a.+b", b"axbxb"), vec![(0, 5)]);
    assert_eq!(hits!("a.+?b", b"axbxb"), vec![(0, 3)]);
    assert_eq!(hits!("a.*b", b"abab"), vec![(0, 4)]);
    assert_eq!(hits!("ab+", b"abbb"), vec![(0, 4)]);
    assert_eq!(hits!("ab+?", b"abbb"), vec![(0, 2)]);
    assert_eq!(hits!("ab{2,3}?", b"abbb"), vec![(0, 3)]);
}

#[test]
fn trailing_non_greedy_repetitions() {
    assert_eq!(hits!("(ab*?){2}?", b"abab"), vec![(0, 3)]);
    assert_eq!(hits!("(ab+?){2,3}?", b"abbabb"), vec![(0, 5)]);
    assert_eq!(hits!("(ab+?){2,3}?", b"abab"), vec![(0, 4)]);
    assert_eq!(hits!("x(ab*?){3,}?", b"xabbaab"), vec![(0, 6)]);
}

#[test]
fn alternatives_are_tried_in_order() {
    assert_eq!(hits!("ab|abcd", b"abcd"), vec![(0, 2)]);
    assert_eq!(hits!("abcd|ab", b"abcd"), vec![(0, 4)]);
}

#[test]
fn bounded_repetitions() {
    assert_eq!(hits!("a{2,3}", b"aaaaaaa"), vec![(0, 3), (3, 6)]);
    assert_eq!(hits!("a{3}", b"aaaaaaa"), vec![(0, 3), (3, 6)]);
    assert_eq!(hits!("ba{2,}", b"baaaab"), vec![(0, 5)]);
    assert_eq!(
        hits!("ba{0,2}c", b"bcbacbaacbaaac"),
        vec![(0, 2), (2, 5), (5, 9)]
    );
}

#[test]
fn labels() {
    let graph = compile("ab", 9, &Config::default()).unwrap();
    assert_eq!(search(&graph, b"xxab"), vec![(2, 4, 9)]);
}

#[test]
fn case_insensitive() {
    let mut config = Config::default();
    config.builder.case_sensitive = false;

    assert_eq!(hits!("abc", b"xABcx", &config), vec![(1, 4)]);
    assert_eq!(hits!("[a-c]+", b"xABcx", &config), vec![(1, 4)]);
    assert!(hits!("abc", b"xABcx").is_empty());
}

#[test]
fn encodings() {
    let mut config = Config::default();
    config.builder.encoding = EncodingKind::Utf16Le;

    assert_eq!(hits!("ab", b"a\0b\0", &config), vec![(0, 4)]);
    assert!(hits!("ab", b"ab", &config).is_empty());

    config.builder.encoding = EncodingKind::Utf8;

    assert_eq!(hits!("é+", "xéé".as_bytes(), &config), vec![(1, 5)]);

    config.builder.encoding = EncodingKind::Latin1;

    assert_eq!(hits!("é", b"x\xe9", &config), vec![(1, 2)]);

    config.builder.encoding = EncodingKind::Ascii;

    assert!(matches!(
        compile("é", 0, &config),
        Err(Error::BuildError(BuildError::UnencodableLiteral {
            code_point: 0xe9,
            ..
        }))
    ));
}

#[test]
fn parser_options() {
    let mut config = Config::default();

    assert_eq!(hits!("a.b", b"a\nb", &config), vec![(0, 3)]);

    config.parser.dot_matches_new_line = false;

    assert!(hits!("a.b", b"a\nb", &config).is_empty());

    config.parser.fixed_string = true;

    assert_eq!(hits!("a.b", b"axba.b", &config), vec![(3, 6)]);
}

#[test]
fn parse_errors() {
    assert!(matches!(
        compile("a(", 0, &Config::default()),
        Err(Error::ParseError(_))
    ));
}
