use regex_syntax::hir::{Capture, Class, HirKind, Repetition};

/// High level intermediate representation (HIR) for a regular expression.
///
/// This is a thin wrapper around [`regex_syntax::hir::Hir`] that implements
/// the rewrites applied before the HIR is lowered into a parse tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hir {
    pub(crate) inner: regex_syntax::hir::Hir,
}

impl From<regex_syntax::hir::Hir> for Hir {
    fn from(value: regex_syntax::hir::Hir) -> Self {
        Self { inner: value }
    }
}

impl Hir {
    /// Returns the kind of the top-level node.
    #[inline]
    pub fn kind(&self) -> &HirKind {
        self.inner.kind()
    }

    /// Returns a reference to the inner [`regex_syntax::hir::Hir`].
    #[inline]
    pub fn inner(&self) -> &regex_syntax::hir::Hir {
        &self.inner
    }

    /// Returns true if the HIR matches only the empty string.
    pub fn is_empty(&self) -> bool {
        matches!(self.inner.kind(), HirKind::Empty)
    }

    /// Removes the non-greedy repetitions found at the end of the
    /// regular expression.
    ///
    /// A non-greedy repetition that is not followed by anything else
    /// matches as few times as possible, so it's equivalent to a repetition
    /// of exactly `min` times. For instance, `ab+?` is equivalent to `ab`,
    /// and `ab*?` is equivalent to `a`. The rewrite is applied recursively
    /// to whatever becomes the end of the expression after removing the
    /// repetition, and to every branch of a trailing alternation. With
    /// `min >= 2` only the last copy is rewritten: `(?:ab*?){2}?` becomes
    /// `ab*?a`.
    pub fn trim_trailing_non_greedy(self) -> Self {
        Self { inner: trim_trailing_non_greedy(&self.inner) }
    }
}

fn trim_trailing_non_greedy(
    hir: &regex_syntax::hir::Hir,
) -> regex_syntax::hir::Hir {
    match hir.kind() {
        HirKind::Repetition(rep) if !rep.greedy => match rep.min {
            0 => regex_syntax::hir::Hir::empty(),
            1 => trim_trailing_non_greedy(&rep.sub),
            // Only the last of the `min` copies ends the expression, the
            // ones before it are kept intact.
            min => regex_syntax::hir::Hir::concat(vec![
                regex_syntax::hir::Hir::repetition(Repetition {
                    min: min - 1,
                    max: Some(min - 1),
                    greedy: true,
                    sub: rep.sub.clone(),
                }),
                trim_trailing_non_greedy(&rep.sub),
            ]),
        },
        HirKind::Capture(cap) => regex_syntax::hir::Hir::capture(Capture {
            index: cap.index,
            name: cap.name.clone(),
            sub: Box::new(trim_trailing_non_greedy(&cap.sub)),
        }),
        HirKind::Concat(items) => {
            let mut items = items.clone();
            while let Some(last) = items.pop() {
                let last = trim_trailing_non_greedy(&last);
                if !matches!(last.kind(), HirKind::Empty) {
                    items.push(last);
                    break;
                }
            }
            regex_syntax::hir::Hir::concat(items)
        }
        HirKind::Alternation(alternatives) => {
            regex_syntax::hir::Hir::alternation(
                alternatives.iter().map(trim_trailing_non_greedy).collect(),
            )
        }
        _ => hir.clone(),
    }
}

/// Returns true if `hir_kind` is a byte class containing all possible
/// bytes.
///
/// For example `.` in a regexp where `dot_matches_new_line` is true, or
/// `[\x00-\xFF]`.
pub fn any_byte(hir_kind: &HirKind) -> bool {
    match hir_kind {
        HirKind::Class(Class::Bytes(class)) => {
            if let Some(range) = class.ranges().first() {
                range.start() == 0 && range.end() == u8::MAX
            } else {
                false
            }
        }
        HirKind::Class(Class::Unicode(class)) => {
            if let Some(range) = class.ranges().first() {
                range.start() == 0 as char && range.end() == char::MAX
            } else {
                false
            }
        }
        _ => false,
    }
}
