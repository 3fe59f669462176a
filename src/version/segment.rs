//! dpkg ordering of a single version part (upstream or revision).
//!
//! Both strings are walked as alternating runs: first a run of non-digits,
//! then a run of digits, and so on until both are exhausted. Non-digit runs
//! compare character by character with a modified ordering where `~` sorts
//! before everything (even the end of the run) and letters sort before any
//! other symbol. Digit runs compare by numeric value of any length.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NonDigit,
    Digit,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Phase::NonDigit => Phase::Digit,
            Phase::Digit => Phase::NonDigit,
        }
    }
}

/// Read position in one of the two strings being compared.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Consume the longest run whose bytes satisfy `pred` (possibly empty).
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let bytes = self.bytes;
        let rest = &bytes[self.pos..];
        let len = rest.iter().take_while(|&&b| pred(b)).count();
        self.pos += len;
        &rest[..len]
    }

    fn take_non_digits(&mut self) -> &'a [u8] {
        self.take_while(|b| !b.is_ascii_digit())
    }

    fn take_digits(&mut self) -> &'a [u8] {
        self.take_while(|b| b.is_ascii_digit())
    }
}

/// Sort weight of a byte inside a non-digit run; `None` is the end of the run.
fn weight(byte: Option<u8>) -> i32 {
    match byte {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(c) => i32::from(c) + 256,
    }
}

fn compare_non_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| weight(a.get(i).copied()).cmp(&weight(b.get(i).copied())))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Compare two digit runs as unsigned integers; an empty run is zero.
fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&b| b == b'0').count();
    &digits[zeros..]
}

/// Compare two version parts under the dpkg ordering.
pub fn compare_segment(a: &[u8], b: &[u8]) -> Ordering {
    let mut left = Cursor::new(a);
    let mut right = Cursor::new(b);
    let mut phase = Phase::NonDigit;

    while !(left.is_done() && right.is_done()) {
        let ord = match phase {
            Phase::NonDigit => {
                compare_non_digit_runs(left.take_non_digits(), right.take_non_digits())
            }
            Phase::Digit => compare_digit_runs(left.take_digits(), right.take_digits()),
        };
        if ord.is_ne() {
            return ord;
        }
        phase = phase.next();
    }

    Ordering::Equal
}
