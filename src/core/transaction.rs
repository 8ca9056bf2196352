use crate::core::money::round2;
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ledger entry: `payer` paid `amount` on behalf of `beneficiary`.
///
/// Amounts are always stored positive; direction is encoded entirely by the
/// payer/beneficiary roles. The amount is rounded to two decimal places at
/// construction, so balance arithmetic downstream never accumulates
/// sub-cent residue.
///
/// Transactions are immutable once created, except for the soft-delete
/// marker. Soft-deleted entries stay in storage for audit but are excluded
/// from every balance computation.
///
/// # Examples
///
/// ```
/// use splitledger::core::participant::ParticipantId;
/// use splitledger::core::transaction::Transaction;
/// use rust_decimal_macros::dec;
///
/// let tx = Transaction::new(
///     ParticipantId::new("alice"),
///     ParticipantId::new("bob"),
///     dec!(30),
///     "Lunch",
/// );
/// assert_eq!(tx.amount(), dec!(30));
/// assert!(!tx.is_settlement());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for this entry.
    id: Uuid,
    /// When the expense occurred.
    date: DateTime<Utc>,
    /// Free-text description ("Lunch", "Taxi", ...).
    label: String,
    /// Who paid.
    payer: ParticipantId,
    /// Who the payment was for.
    beneficiary: ParticipantId,
    /// Positive amount, rounded to 2 decimal places.
    amount: Decimal,
    created_at: DateTime<Utc>,
    /// True for machine-generated settlement entries, false for
    /// user-entered expenses.
    settlement: bool,
    deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a new user-entered transaction dated now.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn new(
        payer: ParticipantId,
        beneficiary: ParticipantId,
        amount: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self::with_date(payer, beneficiary, amount, label, Utc::now())
    }

    /// Create a transaction with an explicit occurrence date.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn with_date(
        payer: ParticipantId,
        beneficiary: ParticipantId,
        amount: Decimal,
        label: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Transaction amount must be positive, got {}",
            amount
        );
        Self {
            id: Uuid::new_v4(),
            date,
            label: label.into(),
            payer,
            beneficiary,
            amount: round2(amount),
            created_at: Utc::now(),
            settlement: false,
            deleted: false,
            deleted_at: None,
        }
    }

    /// Tag this transaction as a machine-generated settlement entry.
    pub fn as_settlement(mut self) -> Self {
        self.settlement = true;
        self
    }

    /// Soft-delete this entry. The entry stays in storage but stops
    /// contributing to balances.
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
        self.deleted_at = Some(Utc::now());
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn beneficiary(&self) -> &ParticipantId {
        &self.beneficiary
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_settlement(&self) -> bool {
        self.settlement
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
