pub mod parse;
pub mod segment;

pub use parse::ParsedVersion;
pub use segment::compare_segment;

use parse::Split;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Compare two raw versions: epoch first, then upstream, then revision.
///
/// Each later part is only consulted when every earlier part is equal.
/// A version without a revision compares the same as one with an empty
/// revision, so `"1.0"` and `"1.0-"` are equal.
pub fn compare_versions(a: &[u8], b: &[u8]) -> Ordering {
    let a = ParsedVersion::parse(a);
    let b = ParsedVersion::parse(b);

    a.epoch
        .cmp(&b.epoch)
        .then_with(|| compare_segment(a.upstream, b.upstream))
        .then_with(|| compare_segment(a.revision_or_empty(), b.revision_or_empty()))
}

/// Three-way comparison over explicit lengths, returning -1, 0 or 1.
///
/// Only the first `a_len` bytes of `a` (and `b_len` of `b`) are read; a
/// length past the end of its buffer is clamped to the buffer.
pub fn compare_version(a: &[u8], a_len: usize, b: &[u8], b_len: usize) -> i32 {
    let a = &a[..a_len.min(a.len())];
    let b = &b[..b_len.min(b.len())];
    compare_versions(a, b) as i32
}

/// Check whether `candidate` is strictly newer than `current`.
///
/// Equal versions are not upgrades, so a reinstall is offered instead.
pub fn is_version_greater_than(candidate: &str, current: &str) -> bool {
    compare_versions(candidate.as_bytes(), current.as_bytes()) == Ordering::Greater
}

/// Sort version strings oldest first.
pub fn sort_versions<S: AsRef<str>>(versions: &mut [S]) {
    versions.sort_by(|a, b| compare_versions(a.as_ref().as_bytes(), b.as_ref().as_bytes()));
}

/// The newest of a list of versions. On ties the first one seen wins.
pub fn newest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions.into_iter().fold(None, |best, v| match best {
        Some(b) if !is_version_greater_than(v, b) => Some(b),
        _ => Some(v),
    })
}

/// An owned version string ordered by dpkg rules.
///
/// Equality follows the ordering, so `"1.0"` equals `"1.00"` and `"0:1.0"`
/// while still displaying the text it was created from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version {
    raw: String,
}

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> ParsedVersion<'_> {
        ParsedVersion::parse(self.raw.as_bytes())
    }

    pub fn epoch(&self) -> u64 {
        Split::of(self.raw.as_bytes()).epoch
    }

    pub fn upstream(&self) -> &str {
        // Split points sit on ASCII ':' and '-', so they are char boundaries
        let split = Split::of(self.raw.as_bytes());
        &self.raw[split.upstream_start..split.upstream_end(self.raw.len())]
    }

    pub fn revision(&self) -> Option<&str> {
        Split::of(self.raw.as_bytes())
            .revision_dash
            .map(|dash| &self.raw[dash + 1..])
    }

    pub fn is_newer_than(&self, other: &Version) -> bool {
        self > other
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(self.raw.as_bytes(), other.raw.as_bytes())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}
