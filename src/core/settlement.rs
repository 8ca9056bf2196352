use crate::core::money::round2;
use crate::core::participant::ParticipantId;
use crate::core::transaction::Transaction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Label prefix for machine-generated settlement transactions.
pub const SETTLEMENT_LABEL_PREFIX: &str = "Settlement";

/// Net monetary position of one participant.
///
/// Positive means the participant is owed money (creditor), negative
/// means they owe (debtor). Balances are derived fresh from the ledger on
/// every computation and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant: ParticipantId,
    /// Net position, rounded to 2 decimal places.
    pub net: Decimal,
}

impl Balance {
    pub fn new(participant: ParticipantId, net: Decimal) -> Self {
        Self {
            participant,
            net: round2(net),
        }
    }

    /// True when this participant should receive money.
    pub fn is_creditor(&self) -> bool {
        self.net > Decimal::ZERO
    }

    /// True when this participant should pay money.
    pub fn is_debtor(&self) -> bool {
        self.net < Decimal::ZERO
    }

    /// Magnitude of the position, without sign.
    pub fn absolute_amount(&self) -> Decimal {
        self.net.abs()
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.participant, self.net)
    }
}

/// Net direct debt between an ordered pair of participants.
///
/// This is the local pairwise view: `debtor` owes `creditor` the
/// aggregate of all transactions between them, without any multilateral
/// netting against third parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub debtor: ParticipantId,
    pub creditor: ParticipantId,
    /// Strictly positive aggregate, rounded to 2 decimal places.
    pub amount: Decimal,
}

impl Debt {
    pub fn new(debtor: ParticipantId, creditor: ParticipantId, amount: Decimal) -> Self {
        Self {
            debtor,
            creditor,
            amount: round2(amount),
        }
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {} {}", self.debtor, self.creditor, self.amount)
    }
}

/// A solver-suggested transfer that has not yet been recorded as a
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementProposal {
    pub payer: ParticipantId,
    pub recipient: ParticipantId,
    /// Positive amount to transfer, rounded to 2 decimal places.
    pub amount: Decimal,
    pub suggested_date: DateTime<Utc>,
}

impl SettlementProposal {
    pub fn new(payer: ParticipantId, recipient: ParticipantId, amount: Decimal) -> Self {
        Self {
            payer,
            recipient,
            amount: round2(amount),
            suggested_date: Utc::now(),
        }
    }

    /// Convert this proposal into a settlement-tagged ledger transaction.
    ///
    /// `payer_name` and `recipient_name` are the display identifiers used
    /// in the label; callers fall back to the raw ids when the roster has
    /// no entry.
    pub fn to_transaction(&self, payer_name: &str, recipient_name: &str) -> Transaction {
        Transaction::with_date(
            self.payer.clone(),
            self.recipient.clone(),
            self.amount,
            format!(
                "{} {} -> {}",
                SETTLEMENT_LABEL_PREFIX, payer_name, recipient_name
            ),
            self.suggested_date,
        )
        .as_settlement()
    }
}

impl fmt::Display for SettlementProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} to {}",
            self.payer, self.amount, self.recipient
        )
    }
}

/// A persisted, not-yet-paid settlement suggestion.
///
/// Owned by the storage collaborator; the engine reads these and, as
/// settlements are applied, reduces their amount or deactivates them
/// through the store interface. They exist so a presentation layer can
/// show remaining pending settlements without re-running the solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSettlement {
    pub id: Uuid,
    pub payer: ParticipantId,
    pub recipient: ParticipantId,
    pub amount: Decimal,
    pub suggested_date: DateTime<Utc>,
    pub active: bool,
}

impl PendingSettlement {
    pub fn from_proposal(proposal: &SettlementProposal) -> Self {
        Self {
            id: Uuid::new_v4(),
            payer: proposal.payer.clone(),
            recipient: proposal.recipient.clone(),
            amount: proposal.amount,
            suggested_date: proposal.suggested_date,
            active: true,
        }
    }
}
