use serde::{Deserialize, Serialize};

/// Locally held invoice counter for an interactive session.
///
/// The counter is seeded once from the record store and then only moves
/// forward. It never goes back, even if a lower number is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumberSequence {
    next_number: u64,
}

impl InvoiceNumberSequence {
    /// Create a sequence continuing from a given number.
    pub fn starting_at(next_number: u64) -> Self {
        Self {
            next_number: next_number.max(1),
        }
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> u64 {
        self.next_number
    }

    /// Record that `issued` has been used; the next number becomes
    /// `issued + 1` unless the sequence is already past it.
    pub fn advance_past(&mut self, issued: u64) {
        if issued >= self.next_number {
            self.next_number = issued.saturating_add(1);
        }
    }
}

/// Display format for invoice numbers on printed documents, e.g. "F-0042".
///
/// The record store always keeps the bare integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Text placed before the number.
    pub prefix: String,
    /// Minimum digit count, zero-padded. 0 disables padding.
    pub width: usize,
}

impl NumberFormat {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    pub fn format(&self, number: u64) -> String {
        format!("{}{:0>width$}", self.prefix, number, width = self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_numbering() {
        let mut seq = InvoiceNumberSequence::starting_at(1);
        for expected in 1..=3 {
            let issued = seq.peek();
            assert_eq!(issued, expected);
            seq.advance_past(issued);
        }
        assert_eq!(seq.peek(), 4);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = InvoiceNumberSequence::starting_at(5);
        assert_eq!(seq.peek(), 5);
        assert_eq!(seq.peek(), 5);
        seq.advance_past(5);
        assert_eq!(seq.peek(), 6);
    }

    #[test]
    fn advance_past_saturates() {
        let mut seq = InvoiceNumberSequence::starting_at(u64::MAX);
        seq.advance_past(u64::MAX);
        assert_eq!(seq.peek(), u64::MAX);
    }

    #[test]
    fn starting_at_zero_is_clamped() {
        assert_eq!(InvoiceNumberSequence::starting_at(0).peek(), 1);
    }

    #[test]
    fn advance_past_never_moves_back() {
        let mut seq = InvoiceNumberSequence::starting_at(10);
        seq.advance_past(3);
        assert_eq!(seq.peek(), 10);
        seq.advance_past(10);
        assert_eq!(seq.peek(), 11);
        seq.advance_past(20);
        assert_eq!(seq.peek(), 21);
    }

    #[test]
    fn plain_format() {
        assert_eq!(NumberFormat::default().format(42), "42");
    }

    #[test]
    fn padded_format() {
        let fmt = NumberFormat::new("F-", 4);
        assert_eq!(fmt.format(42), "F-0042");
        assert_eq!(fmt.format(123456), "F-123456");
    }
}
