use std::fmt::{Display, Formatter};

use crate::re::ByteSet;

/// The byte predicate attached to a vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Matches a single byte.
    Lit(u8),
    /// Matches either of two bytes. Used for case-insensitive ASCII letters.
    Either(u8, u8),
    /// Matches any byte in the inclusive range.
    Range(u8, u8),
    /// Matches any byte in the set.
    Class(ByteSet),
}

/// Label of a vertex in the automaton.
///
/// Every vertex except the start vertex carries exactly one transition,
/// which is the predicate a byte must satisfy for entering the vertex. A
/// transition marked as match means that reaching its vertex completes a
/// match for the pattern identified by `label`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    kind: TransitionKind,
    /// Identifier of the pattern matched when this vertex is reached. Only
    /// meaningful if `is_match` is true.
    pub label: u32,
    /// True if reaching this vertex completes a match.
    pub is_match: bool,
}

impl Transition {
    pub fn new(kind: TransitionKind) -> Self {
        Self { kind, label: 0, is_match: false }
    }

    pub fn lit(byte: u8) -> Self {
        Self::new(TransitionKind::Lit(byte))
    }

    pub fn either(a: u8, b: u8) -> Self {
        Self::new(TransitionKind::Either(a, b))
    }

    pub fn range(lo: u8, hi: u8) -> Self {
        Self::new(TransitionKind::Range(lo, hi))
    }

    /// Transition that matches any byte.
    pub fn any() -> Self {
        Self::range(0x00, 0xff)
    }

    /// Creates a transition for the given set. Sets that are a single
    /// contiguous run become a [`TransitionKind::Range`].
    pub fn class(set: ByteSet) -> Self {
        match set.as_range() {
            Some((lo, hi)) => Self::range(lo, hi),
            None => Self::new(TransitionKind::Class(set)),
        }
    }

    #[inline]
    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    /// Returns true if `byte` satisfies this transition.
    pub fn matches(&self, byte: u8) -> bool {
        match &self.kind {
            TransitionKind::Lit(b) => byte == *b,
            TransitionKind::Either(a, b) => byte == *a || byte == *b,
            TransitionKind::Range(lo, hi) => (*lo..=*hi).contains(&byte),
            TransitionKind::Class(set) => set.contains(byte),
        }
    }
}

impl Display for TransitionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::Lit(b) => write!(f, "LIT {:#04x}", b),
            TransitionKind::Either(a, b) => {
                write!(f, "EITHER {:#04x} {:#04x}", a, b)
            }
            TransitionKind::Range(lo, hi) => {
                write!(f, "RANGE {:#04x}-{:#04x}", lo, hi)
            }
            TransitionKind::Class(set) => write!(f, "CLASS {}", set),
        }
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.is_match {
            write!(f, " MATCH({})", self.label)?;
        }
        Ok(())
    }
}
