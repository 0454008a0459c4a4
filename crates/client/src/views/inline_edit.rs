//! Inline amount editing with a dirty check.

use rust_decimal::Decimal;
use tally_core::validation::parse_amount_str;

/// What committing an inline edit should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Value equals the snapshot; send nothing.
    Unchanged,
    /// Input did not parse as an amount; show this value again.
    Reverted(Decimal),
    /// Send this value to the server.
    Changed(Decimal),
}

/// An editable amount cell.
///
/// The snapshot is the last value known to be on the server. Edits commit only
/// when the parsed input differs from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineAmountEdit {
    snapshot: Decimal,
    pending: Option<Decimal>,
}

impl InlineAmountEdit {
    /// Starts editing a cell currently showing `value`.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self {
            snapshot: value,
            pending: None,
        }
    }

    /// Last value known to be on the server.
    #[must_use]
    pub const fn snapshot(&self) -> Decimal {
        self.snapshot
    }

    /// Evaluates the text the user left in the cell.
    pub fn commit(&mut self, text: &str) -> EditOutcome {
        let Ok(value) = parse_amount_str(text) else {
            self.pending = None;
            return EditOutcome::Reverted(self.snapshot);
        };
        if value == self.snapshot {
            self.pending = None;
            return EditOutcome::Unchanged;
        }
        self.pending = Some(value);
        EditOutcome::Changed(value)
    }

    /// The server accepted the pending value; it becomes the snapshot.
    pub fn confirm(&mut self) {
        if let Some(value) = self.pending.take() {
            self.snapshot = value;
        }
    }

    /// The server rejected the pending value; returns the value to show again.
    pub fn rollback(&mut self) -> Decimal {
        self.pending = None;
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100", EditOutcome::Unchanged)]
    #[case("100.00", EditOutcome::Unchanged)]
    #[case(" 100 ", EditOutcome::Unchanged)]
    #[case("125.5", EditOutcome::Changed(dec!(125.5)))]
    #[case("0", EditOutcome::Changed(dec!(0)))]
    #[case("abc", EditOutcome::Reverted(dec!(100)))]
    #[case("-5", EditOutcome::Reverted(dec!(100)))]
    #[case("", EditOutcome::Reverted(dec!(100)))]
    fn test_commit(#[case] text: &str, #[case] expected: EditOutcome) {
        let mut edit = InlineAmountEdit::new(dec!(100));
        assert_eq!(edit.commit(text), expected);
    }

    #[test]
    fn test_confirm_moves_snapshot() {
        let mut edit = InlineAmountEdit::new(dec!(100));
        assert_eq!(edit.commit("150"), EditOutcome::Changed(dec!(150)));
        edit.confirm();
        assert_eq!(edit.snapshot(), dec!(150));
        assert_eq!(edit.commit("150"), EditOutcome::Unchanged);
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let mut edit = InlineAmountEdit::new(dec!(100));
        edit.commit("150");
        assert_eq!(edit.rollback(), dec!(100));
        edit.confirm();
        assert_eq!(edit.snapshot(), dec!(100));
    }
}
