//! The balance & settlement engine.
//!
//! [`SettlementEngine`] wires the pure calculators in [`balances`],
//! [`debts`] and [`solver`] to a [`LedgerStore`] and adds the settlement
//! applier. Every operation reads fresh state from the store at call
//! time; nothing is cached across calls.

pub mod balances;
pub mod debts;
pub mod solver;

pub use balances::net_balances;
pub use debts::direct_debts;
pub use solver::settle_min_transfers;

use crate::core::money::is_settled;
use crate::core::participant::ParticipantId;
use crate::core::settlement::{Balance, Debt, PendingSettlement, SettlementProposal};
use crate::store::{LedgerStore, StoreError};
use log::{debug, error, info};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// The engine has no failure modes of its own beyond collaborator
/// failures: every variant wraps a store error, logged with operation
/// context and propagated unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Balance and settlement computations over a shared expense ledger.
///
/// The engine owns its store and performs fresh reads per operation.
/// Mutating operations (`apply_settlement`, `apply_all_settlements`,
/// `save_calculated_settlements`) take `&mut self`; everything else is a
/// read-only derivation.
pub struct SettlementEngine<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> SettlementEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Net balance of every active participant, sorted net-descending.
    ///
    /// The returned balances sum to exactly zero.
    pub fn calculate_balances(&self) -> Result<Vec<Balance>, EngineError> {
        debug!("starting balance calculation");

        let participants = self.store.participants().map_err(|e| {
            error!("balance calculation failed reading participants: {}", e);
            e
        })?;
        let transactions = self.store.transactions().map_err(|e| {
            error!("balance calculation failed reading transactions: {}", e);
            e
        })?;

        info!(
            "calculating balances for {} participants over {} transactions",
            participants.len(),
            transactions.len()
        );

        let result = net_balances(&participants, &transactions);
        debug!(
            "balance calculation completed: {} balances ({} creditors, {} debtors)",
            result.len(),
            result.iter().filter(|b| b.is_creditor()).count(),
            result.iter().filter(|b| b.is_debtor()).count()
        );
        Ok(result)
    }

    /// Net direct debts between participant pairs, sorted amount-descending.
    pub fn calculate_current_debts(&self) -> Result<Vec<Debt>, EngineError> {
        debug!("starting current debts calculation");

        let participants = self.store.participants().map_err(|e| {
            error!("debt calculation failed reading participants: {}", e);
            e
        })?;
        let transactions = self.store.transactions().map_err(|e| {
            error!("debt calculation failed reading transactions: {}", e);
            e
        })?;

        let result = direct_debts(&participants, &transactions);
        info!("current debts calculation completed: {} debts", result.len());
        Ok(result)
    }

    /// The minimal set of transfers that clears every balance.
    pub fn calculate_minimal_transfers(&self) -> Result<Vec<SettlementProposal>, EngineError> {
        debug!("starting minimal transfers calculation");

        let balances = self.calculate_balances()?;
        let proposals = settle_min_transfers(&balances);

        info!(
            "minimal transfers calculation completed: {} proposals",
            proposals.len()
        );
        Ok(proposals)
    }

    /// Net balance of one participant, or zero when the id is inactive or
    /// unknown.
    ///
    /// Zero means "no outstanding position" — indistinguishable from
    /// "never existed". Callers needing existence must consult the
    /// roster separately.
    pub fn get_user_balance(&self, participant: &ParticipantId) -> Result<Decimal, EngineError> {
        let balances = self.calculate_balances()?;
        let balance = balances
            .iter()
            .find(|b| &b.participant == participant)
            .map(|b| b.net)
            .unwrap_or(Decimal::ZERO);
        debug!("balance for {}: {}", participant, balance);
        Ok(balance)
    }

    /// Advisory check: true when the participant's balance is zero up to
    /// rounding tolerance. The engine does not enforce this on the
    /// ledger.
    pub fn can_delete_user(&self, participant: &ParticipantId) -> Result<bool, EngineError> {
        let balance = self.get_user_balance(participant)?;
        let can_delete = is_settled(balance);
        info!(
            "deletion check for {}: balance {}, can_delete {}",
            participant, balance, can_delete
        );
        Ok(can_delete)
    }

    /// Record one settlement as a ledger transaction and reconcile any
    /// matching pending-settlement record.
    ///
    /// The transaction append is the durable side effect; the
    /// pending-record reconciliation is best-effort bookkeeping for
    /// display purposes. When several active records match the
    /// (payer, recipient) pair, the oldest is consumed.
    pub fn apply_settlement(&mut self, proposal: &SettlementProposal) -> Result<(), EngineError> {
        info!(
            "applying settlement: {} pays {} to {}",
            proposal.payer, proposal.amount, proposal.recipient
        );

        let result = self.apply_settlement_inner(proposal);
        if let Err(e) = &result {
            error!(
                "failed to apply settlement {} -> {} ({}): {}",
                proposal.payer, proposal.recipient, proposal.amount, e
            );
        }
        result
    }

    fn apply_settlement_inner(&mut self, proposal: &SettlementProposal) -> Result<(), EngineError> {
        let participants = self.store.participants()?;
        let display_name = |id: &ParticipantId| {
            participants
                .iter()
                .find(|p| p.id() == id)
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| id.to_string())
        };

        let transaction = proposal.to_transaction(
            &display_name(&proposal.payer),
            &display_name(&proposal.recipient),
        );
        let transaction_id = transaction.id();
        self.store.append_transaction(transaction)?;

        let pending = self.store.active_pending_settlements()?;
        let matching = pending
            .iter()
            .filter(|s| s.payer == proposal.payer && s.recipient == proposal.recipient)
            .min_by(|a, b| {
                a.suggested_date
                    .cmp(&b.suggested_date)
                    .then_with(|| a.id.cmp(&b.id))
            });

        if let Some(record) = matching {
            if proposal.amount >= record.amount {
                // Exact payment or overpayment consumes the record whole.
                self.store.deactivate_pending_settlement(record.id)?;
                debug!("pending settlement {} fully consumed", record.id);
            } else {
                let remaining = record.amount - proposal.amount;
                if remaining <= Decimal::ZERO {
                    self.store.deactivate_pending_settlement(record.id)?;
                } else {
                    self.store.reduce_pending_settlement(record.id, remaining)?;
                    debug!(
                        "pending settlement {} reduced to {}",
                        record.id, remaining
                    );
                }
            }
        }

        debug!("settlement recorded as transaction {}", transaction_id);
        Ok(())
    }

    /// Run the solver and apply every proposal, in solver output order.
    ///
    /// Not transactional: a failure mid-loop aborts the remainder, but
    /// settlements already applied stay committed. Callers must treat an
    /// error as "some settlements may have been applied".
    pub fn apply_all_settlements(&mut self) -> Result<(), EngineError> {
        info!("applying all settlements");

        let proposals = self.calculate_minimal_transfers()?;
        info!("found {} settlements to apply", proposals.len());

        for proposal in &proposals {
            self.apply_settlement(proposal)?;
        }

        info!("applied all {} settlements", proposals.len());
        Ok(())
    }

    /// Active pending-settlement records, as persisted by
    /// [`save_calculated_settlements`](Self::save_calculated_settlements).
    pub fn get_stored_settlements(&self) -> Result<Vec<PendingSettlement>, EngineError> {
        debug!("reading stored settlements");
        let records = self.store.active_pending_settlements().map_err(|e| {
            error!("failed to read stored settlements: {}", e);
            e
        })?;
        Ok(records)
    }

    /// Replace the persisted pending settlements with a fresh solver run.
    ///
    /// Clears every existing record first; when the ledger is already
    /// settled nothing new is saved.
    pub fn save_calculated_settlements(&mut self) -> Result<(), EngineError> {
        debug!("calculating and saving settlements");

        self.store.clear_pending_settlements().map_err(|e| {
            error!("failed to clear pending settlements: {}", e);
            e
        })?;

        let proposals = self.calculate_minimal_transfers()?;
        if proposals.is_empty() {
            info!("no settlements needed, all balances are settled");
            return Ok(());
        }

        let records: Vec<PendingSettlement> = proposals
            .iter()
            .map(PendingSettlement::from_proposal)
            .collect();
        let count = records.len();
        self.store.save_pending_settlements(records).map_err(|e| {
            error!("failed to save pending settlements: {}", e);
            e
        })?;

        info!("saved {} new pending settlements", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant::Participant;
    use crate::core::settlement::PendingSettlement;
    use crate::core::transaction::Transaction;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn engine_with(
        participants: &[(&str, bool)],
        transactions: &[(&str, &str, Decimal)],
    ) -> SettlementEngine<MemoryStore> {
        let mut store = MemoryStore::new();
        for (id, active) in participants {
            let mut p = Participant::new(*id, *id);
            if !active {
                p.deactivate();
            }
            store.add_participant(p);
        }
        for (payer, beneficiary, amount) in transactions {
            store.add_transaction(Transaction::new(
                ParticipantId::new(*payer),
                ParticipantId::new(*beneficiary),
                *amount,
                "Test",
            ));
        }
        SettlementEngine::new(store)
    }

    #[test]
    fn test_get_user_balance_unknown_is_zero() {
        let engine = engine_with(&[("alice", true)], &[]);
        let balance = engine
            .get_user_balance(&ParticipantId::new("ghost"))
            .unwrap();
        assert_eq!(balance, Decimal::ZERO);
    }

    #[test]
    fn test_can_delete_user_follows_balance() {
        let engine = engine_with(
            &[("alice", true), ("bob", true)],
            &[("bob", "alice", dec!(20))],
        );
        assert!(!engine.can_delete_user(&ParticipantId::new("alice")).unwrap());
        assert!(!engine.can_delete_user(&ParticipantId::new("bob")).unwrap());
        // Unknown participant has no outstanding position.
        assert!(engine.can_delete_user(&ParticipantId::new("ghost")).unwrap());
    }

    #[test]
    fn test_apply_settlement_appends_tagged_transaction() {
        let mut engine = engine_with(
            &[("alice", true), ("bob", true)],
            &[("bob", "alice", dec!(20))],
        );
        let proposal = SettlementProposal::new(
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            dec!(20),
        );
        engine.apply_settlement(&proposal).unwrap();

        let transactions = engine.store().transactions().unwrap();
        assert_eq!(transactions.len(), 2);
        let settlement_tx = &transactions[1];
        assert!(settlement_tx.is_settlement());
        assert_eq!(settlement_tx.payer().as_str(), "alice");
        assert_eq!(settlement_tx.beneficiary().as_str(), "bob");
        assert_eq!(settlement_tx.amount(), dec!(20));
        assert_eq!(settlement_tx.label(), "Settlement alice -> bob");
    }

    #[test]
    fn test_apply_settlement_consumes_pending_record_fully() {
        let mut engine = engine_with(
            &[("alice", true), ("bob", true)],
            &[("bob", "alice", dec!(20))],
        );
        engine.save_calculated_settlements().unwrap();
        assert_eq!(engine.get_stored_settlements().unwrap().len(), 1);

        let proposal = SettlementProposal::new(
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            dec!(20),
        );
        engine.apply_settlement(&proposal).unwrap();
        assert!(engine.get_stored_settlements().unwrap().is_empty());
    }

    #[test]
    fn test_apply_settlement_overpayment_consumes_record() {
        let mut engine = engine_with(
            &[("alice", true), ("bob", true)],
            &[("bob", "alice", dec!(20))],
        );
        engine.save_calculated_settlements().unwrap();

        let proposal = SettlementProposal::new(
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            dec!(25),
        );
        engine.apply_settlement(&proposal).unwrap();
        assert!(engine.get_stored_settlements().unwrap().is_empty());
    }

    #[test]
    fn test_apply_settlement_partial_payment_reduces_record() {
        let mut engine = engine_with(
            &[("alice", true), ("bob", true)],
            &[("bob", "alice", dec!(20))],
        );
        engine.save_calculated_settlements().unwrap();

        let proposal = SettlementProposal::new(
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            dec!(8),
        );
        engine.apply_settlement(&proposal).unwrap();

        let stored = engine.get_stored_settlements().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].amount, dec!(12));
    }

    #[test]
    fn test_apply_settlement_without_matching_record_is_noop_bookkeeping() {
        let mut engine = engine_with(
            &[("alice", true), ("bob", true)],
            &[("bob", "alice", dec!(20))],
        );
        let proposal = SettlementProposal::new(
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            dec!(20),
        );
        // No stored settlements exist; the append still succeeds.
        engine.apply_settlement(&proposal).unwrap();
        assert_eq!(engine.store().transactions().unwrap().len(), 2);
    }

    #[test]
    fn test_reconciliation_consumes_oldest_record_first() {
        let mut engine = engine_with(&[("alice", true), ("bob", true)], &[]);

        let older = PendingSettlement {
            id: uuid::Uuid::new_v4(),
            payer: ParticipantId::new("alice"),
            recipient: ParticipantId::new("bob"),
            amount: dec!(10),
            suggested_date: Utc::now() - Duration::days(2),
            active: true,
        };
        let newer = PendingSettlement {
            id: uuid::Uuid::new_v4(),
            payer: ParticipantId::new("alice"),
            recipient: ParticipantId::new("bob"),
            amount: dec!(7),
            suggested_date: Utc::now(),
            active: true,
        };
        let older_id = older.id;
        engine
            .store_mut()
            .save_pending_settlements(vec![newer.clone(), older])
            .unwrap();

        let proposal = SettlementProposal::new(
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            dec!(10),
        );
        engine.apply_settlement(&proposal).unwrap();

        let stored = engine.get_stored_settlements().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, newer.id);
        assert!(stored.iter().all(|s| s.id != older_id));
    }

    #[test]
    fn test_apply_all_settlements_zeroes_balances() {
        let mut engine = engine_with(
            &[("alice", true), ("bob", true), ("charlie", true)],
            &[
                ("alice", "bob", dec!(30)),
                ("bob", "charlie", dec!(20)),
                ("charlie", "alice", dec!(10)),
            ],
        );
        engine.apply_all_settlements().unwrap();

        let balances = engine.calculate_balances().unwrap();
        assert!(balances.iter().all(|b| is_settled(b.net)));
    }

    #[test]
    fn test_save_calculated_settlements_replaces_previous() {
        let mut engine = engine_with(
            &[("alice", true), ("bob", true)],
            &[("bob", "alice", dec!(20))],
        );
        engine.save_calculated_settlements().unwrap();
        let first = engine.get_stored_settlements().unwrap();
        assert_eq!(first.len(), 1);

        engine.save_calculated_settlements().unwrap();
        let second = engine.get_stored_settlements().unwrap();
        // Old records were cleared, not accumulated.
        assert_eq!(second.len(), 1);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_save_calculated_settlements_when_settled() {
        let mut engine = engine_with(&[("alice", true), ("bob", true)], &[]);
        engine.save_calculated_settlements().unwrap();
        assert!(engine.get_stored_settlements().unwrap().is_empty());
    }
}
