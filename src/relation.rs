//! Version relations as written in dependency fields and accepted by
//! `dpkg --compare-versions`.

use crate::version::compare_versions;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelationError {
    #[error("unknown version relation '{0}' (expected one of <<, <=, =, !=, >=, >>, lt, le, eq, ne, ge, gt)")]
    Unknown(String),
}

/// The comparison a relation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Earlier,
    EarlierEqual,
    Equal,
    NotEqual,
    LaterEqual,
    Later,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation {
    pub kind: RelationKind,
    /// Treat an empty version as later than every other version
    /// (the `-nl` spellings). Otherwise an empty version goes through the
    /// normal ordering, where it equals `0`.
    pub empty_is_later: bool,
}

impl Relation {
    pub const fn new(kind: RelationKind) -> Self {
        Self {
            kind,
            empty_is_later: false,
        }
    }

    /// Check whether `a <relation> b` holds.
    pub fn holds(&self, a: &str, b: &str) -> bool {
        let ord = if self.empty_is_later && (a.is_empty() || b.is_empty()) {
            // Empty sorts last, two empties are equal
            a.is_empty().cmp(&b.is_empty())
        } else {
            compare_versions(a.as_bytes(), b.as_bytes())
        };

        self.accepts(ord)
    }

    /// Check whether an ordering of `a` against `b` satisfies the relation.
    pub fn accepts(&self, ord: Ordering) -> bool {
        match self.kind {
            RelationKind::Earlier => ord == Ordering::Less,
            RelationKind::EarlierEqual => ord != Ordering::Greater,
            RelationKind::Equal => ord == Ordering::Equal,
            RelationKind::NotEqual => ord != Ordering::Equal,
            RelationKind::LaterEqual => ord != Ordering::Less,
            RelationKind::Later => ord == Ordering::Greater,
        }
    }

    /// The dependency-field operator for this relation.
    pub fn symbol(&self) -> &'static str {
        match self.kind {
            RelationKind::Earlier => "<<",
            RelationKind::EarlierEqual => "<=",
            RelationKind::Equal => "=",
            RelationKind::NotEqual => "!=",
            RelationKind::LaterEqual => ">=",
            RelationKind::Later => ">>",
        }
    }
}

impl FromStr for Relation {
    type Err = RelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (word, empty_is_later) = match s.strip_suffix("-nl") {
            Some(word) => (word, true),
            None => (s, false),
        };

        // `ne` and the symbolic operators have no -nl form
        let kind = match (word, empty_is_later) {
            ("lt", _) => RelationKind::Earlier,
            ("le", _) => RelationKind::EarlierEqual,
            ("ge", _) => RelationKind::LaterEqual,
            ("gt", _) => RelationKind::Later,
            ("eq", false) | ("=", false) => RelationKind::Equal,
            ("ne", false) | ("!=", false) => RelationKind::NotEqual,
            ("<<", false) => RelationKind::Earlier,
            // Bare < and > are the obsolete spellings of <= and >=
            ("<=", false) | ("<", false) => RelationKind::EarlierEqual,
            (">=", false) | (">", false) => RelationKind::LaterEqual,
            (">>", false) => RelationKind::Later,
            _ => return Err(RelationError::Unknown(s.to_string())),
        };

        Ok(Self {
            kind,
            empty_is_later,
        })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
