//! Splitting a raw version into `[epoch:]upstream[-revision]`.

/// Byte offsets of the parts of a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Split {
    pub epoch: u64,
    /// Start of the upstream part (just past the epoch colon, or 0)
    pub upstream_start: usize,
    /// Index of the last `-` after `upstream_start`, if any
    pub revision_dash: Option<usize>,
}

impl Split {
    pub fn of(raw: &[u8]) -> Self {
        let (epoch, upstream_start) = match parse_epoch(raw) {
            Some((epoch, colon)) => (epoch, colon + 1),
            None => (0, 0),
        };

        let revision_dash = raw[upstream_start..]
            .iter()
            .rposition(|&b| b == b'-')
            .map(|idx| upstream_start + idx);

        Self {
            epoch,
            upstream_start,
            revision_dash,
        }
    }

    pub fn upstream_end(&self, len: usize) -> usize {
        self.revision_dash.unwrap_or(len)
    }
}

/// A leading run of ASCII digits directly followed by `:` is the epoch.
/// Returns the epoch value and the index of the colon.
fn parse_epoch(raw: &[u8]) -> Option<(u64, usize)> {
    let digits = raw.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || raw.get(digits) != Some(&b':') {
        return None;
    }

    // An epoch too large for u64 counts as "not a number"
    let epoch = raw[..digits].iter().try_fold(0u64, |acc, &b| {
        acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
    })?;

    Some((epoch, digits))
}

/// A version string split into its three comparable parts.
///
/// The parts borrow from the input buffer, so a parse is free to throw away
/// once the comparison that needed it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedVersion<'a> {
    pub epoch: u64,
    pub upstream: &'a [u8],
    /// `None` when the input has no `-` at all
    pub revision: Option<&'a [u8]>,
}

impl<'a> ParsedVersion<'a> {
    /// Parse a raw version. Never fails: malformed epochs fall back to 0 and
    /// a missing revision is `None`.
    pub fn parse(raw: &'a [u8]) -> Self {
        let split = Split::of(raw);
        let upstream = &raw[split.upstream_start..split.upstream_end(raw.len())];
        let revision = split.revision_dash.map(|dash| &raw[dash + 1..]);

        Self {
            epoch: split.epoch,
            upstream,
            revision,
        }
    }

    /// The revision as it takes part in comparisons: absent reads as empty.
    pub fn revision_or_empty(&self) -> &'a [u8] {
        self.revision.unwrap_or_default()
    }
}
