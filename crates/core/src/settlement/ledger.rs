//! Extra-line ledgers: ad-hoc launches and withholding extras.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::LedgerError;

/// Kind of an operator-entered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraLineKind {
    /// Money received from the tenant.
    Receipt,
    /// Expense charged to the tenant.
    Expense,
    /// Fee charged to the tenant.
    Fee,
    /// Discount granted to the tenant.
    Discount,
    /// Downward adjustment.
    Adjustment,
    /// Extra amount withheld by the management company.
    Withheld,
    /// Amount anticipated by the management company.
    Anticipated,
}

impl ExtraLineKind {
    /// Sign applied when summing a line of this kind.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::Discount | Self::Adjustment => Decimal::NEGATIVE_ONE,
            Self::Receipt | Self::Expense | Self::Fee | Self::Withheld | Self::Anticipated => {
                Decimal::ONE
            }
        }
    }

    /// Ledger this kind belongs to.
    #[must_use]
    pub fn scope(self) -> LedgerScope {
        match self {
            Self::Withheld | Self::Anticipated => LedgerScope::Withholding,
            _ => LedgerScope::Launches,
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Expense => "expense",
            Self::Fee => "fee",
            Self::Discount => "discount",
            Self::Adjustment => "adjustment",
            Self::Withheld => "withheld",
            Self::Anticipated => "anticipated",
        }
    }
}

impl fmt::Display for ExtraLineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of the two session ledgers a line lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerScope {
    /// Tenant-facing launches, summed into the invoice.
    Launches,
    /// Extras summed into the withheld total.
    Withholding,
}

impl fmt::Display for LedgerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launches => write!(f, "launches"),
            Self::Withholding => write!(f, "withholding"),
        }
    }
}

/// A single operator-entered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraLine {
    /// Line kind.
    pub kind: ExtraLineKind,
    /// Free-text description.
    pub description: String,
    /// Unsigned amount; the sign comes from the kind.
    pub amount: Decimal,
    /// Date the line refers to.
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
}

impl ExtraLine {
    /// Creates a line without a date.
    pub fn new(kind: ExtraLineKind, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            entry_date: None,
        }
    }

    /// Sets the entry date.
    #[must_use]
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.entry_date = Some(date);
        self
    }

    /// Amount with the kind's sign applied.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.amount * self.kind.sign()
    }
}

/// Ordered collection of extra lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraLineLedger {
    scope: LedgerScope,
    lines: Vec<ExtraLine>,
}

impl ExtraLineLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(scope: LedgerScope) -> Self {
        Self {
            scope,
            lines: Vec::new(),
        }
    }

    /// Rebuilds a ledger from stored lines.
    ///
    /// Stored lines are taken as-is: zero or negative amounts are kept and
    /// summed with the sign of their kind.
    #[must_use]
    pub fn from_lines(scope: LedgerScope, lines: Vec<ExtraLine>) -> Self {
        Self { scope, lines }
    }

    /// Appends a new line.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, the description is
    /// blank, or the kind belongs to the other ledger.
    pub fn append(&mut self, line: ExtraLine) -> Result<(), LedgerError> {
        if line.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(line.amount));
        }
        if line.description.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        if line.kind.scope() != self.scope {
            return Err(LedgerError::KindOutOfScope {
                kind: line.kind,
                scope: self.scope,
            });
        }
        self.lines.push(line);
        Ok(())
    }

    /// Removes and returns the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<ExtraLine, LedgerError> {
        if index >= self.lines.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Signed sum of every line.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(ExtraLine::signed_amount).sum()
    }

    /// Ledger scope.
    #[must_use]
    pub fn scope(&self) -> LedgerScope {
        self.scope
    }

    /// Lines in entry order.
    #[must_use]
    pub fn lines(&self) -> &[ExtraLine] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the ledger has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_total() {
        let mut ledger = ExtraLineLedger::new(LedgerScope::Launches);
        ledger
            .append(ExtraLine::new(ExtraLineKind::Expense, "Plumbing repair", dec!(120.00)))
            .unwrap();
        ledger
            .append(ExtraLine::new(ExtraLineKind::Discount, "Goodwill", dec!(20.00)))
            .unwrap();
        ledger
            .append(ExtraLine::new(ExtraLineKind::Adjustment, "Meter reading", dec!(5.50)))
            .unwrap();
        assert_eq!(ledger.total(), dec!(94.50));
    }

    #[test]
    fn test_append_rejects_zero_and_negative() {
        let mut ledger = ExtraLineLedger::new(LedgerScope::Launches);
        assert_eq!(
            ledger.append(ExtraLine::new(ExtraLineKind::Fee, "Late fee", dec!(0))),
            Err(LedgerError::NonPositiveAmount(dec!(0)))
        );
        assert_eq!(
            ledger.append(ExtraLine::new(ExtraLineKind::Fee, "Late fee", dec!(-3))),
            Err(LedgerError::NonPositiveAmount(dec!(-3)))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_append_rejects_blank_description() {
        let mut ledger = ExtraLineLedger::new(LedgerScope::Launches);
        assert_eq!(
            ledger.append(ExtraLine::new(ExtraLineKind::Fee, "   ", dec!(10))),
            Err(LedgerError::EmptyDescription)
        );
    }

    #[test]
    fn test_append_rejects_kind_from_other_scope() {
        let mut launches = ExtraLineLedger::new(LedgerScope::Launches);
        let err = launches
            .append(ExtraLine::new(ExtraLineKind::Withheld, "Key copy", dec!(15)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::KindOutOfScope { .. }));

        let mut withholding = ExtraLineLedger::new(LedgerScope::Withholding);
        assert!(withholding
            .append(ExtraLine::new(ExtraLineKind::Withheld, "Key copy", dec!(15)))
            .is_ok());
        assert!(withholding
            .append(ExtraLine::new(ExtraLineKind::Expense, "Paint", dec!(15)))
            .is_err());
    }

    #[test]
    fn test_remove_by_index_keeps_order() {
        let mut ledger = ExtraLineLedger::new(LedgerScope::Launches);
        for (i, amount) in [dec!(1), dec!(2), dec!(3)].into_iter().enumerate() {
            ledger
                .append(ExtraLine::new(ExtraLineKind::Fee, format!("fee {i}"), amount))
                .unwrap();
        }
        let removed = ledger.remove(1).unwrap();
        assert_eq!(removed.amount, dec!(2));
        let amounts: Vec<_> = ledger.lines().iter().map(|l| l.amount).collect();
        assert_eq!(amounts, vec![dec!(1), dec!(3)]);
        assert_eq!(
            ledger.remove(5),
            Err(LedgerError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_stored_lines_pass_through() {
        let ledger = ExtraLineLedger::from_lines(
            LedgerScope::Launches,
            vec![
                ExtraLine::new(ExtraLineKind::Expense, "", dec!(0)),
                ExtraLine::new(ExtraLineKind::Expense, "Refund entered as expense", dec!(-40)),
                ExtraLine::new(ExtraLineKind::Discount, "Negative discount", dec!(-10)),
            ],
        );
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.total(), dec!(-30));
    }
}
