use crate::core::money::round2;
use crate::core::participant::{Participant, ParticipantId};
use crate::core::settlement::PendingSettlement;
use crate::core::transaction::Transaction;
use crate::store::{LedgerStore, StoreError};
use rust_decimal::Decimal;
use uuid::Uuid;

/// In-memory [`LedgerStore`].
///
/// Backs the test suite and serves as the reference implementation of the
/// store contract. Soft-deleted transactions and inactive pending
/// settlements are retained but filtered out of reads, mirroring how a
/// durable backend would behave.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    participants: Vec<Participant>,
    transactions: Vec<Transaction>,
    pending: Vec<PendingSettlement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a participant into the roster.
    pub fn add_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
    }

    /// Seed a transaction into the ledger.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Soft-delete a transaction by id. Returns false when no live entry
    /// matches.
    pub fn soft_delete_transaction(&mut self, id: Uuid) -> bool {
        match self
            .transactions
            .iter_mut()
            .find(|t| t.id() == id && !t.is_deleted())
        {
            Some(tx) => {
                tx.mark_deleted();
                true
            }
            None => false,
        }
    }

    /// Number of live (non-soft-deleted) transactions.
    pub fn transaction_count(&self) -> usize {
        self.transactions.iter().filter(|t| !t.is_deleted()).count()
    }

    /// Look up a participant by id.
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }
}

impl LedgerStore for MemoryStore {
    fn participants(&self) -> Result<Vec<Participant>, StoreError> {
        Ok(self.participants.clone())
    }

    fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| !t.is_deleted())
            .cloned()
            .collect())
    }

    fn append_transaction(&mut self, transaction: Transaction) -> Result<(), StoreError> {
        self.transactions.push(transaction);
        Ok(())
    }

    fn active_pending_settlements(&self) -> Result<Vec<PendingSettlement>, StoreError> {
        Ok(self
            .pending
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect())
    }

    fn deactivate_pending_settlement(&mut self, id: Uuid) -> Result<(), StoreError> {
        let record = self
            .pending
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::PendingSettlementNotFound(id))?;
        record.active = false;
        Ok(())
    }

    fn reduce_pending_settlement(
        &mut self,
        id: Uuid,
        new_amount: Decimal,
    ) -> Result<(), StoreError> {
        let record = self
            .pending
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::PendingSettlementNotFound(id))?;
        record.amount = round2(new_amount);
        Ok(())
    }

    fn clear_pending_settlements(&mut self) -> Result<(), StoreError> {
        for record in &mut self.pending {
            record.active = false;
        }
        Ok(())
    }

    fn save_pending_settlements(
        &mut self,
        records: Vec<PendingSettlement>,
    ) -> Result<(), StoreError> {
        self.pending.extend(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settlement::SettlementProposal;
    use rust_decimal_macros::dec;

    fn sample_tx() -> Transaction {
        Transaction::new(
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            dec!(30),
            "Lunch",
        )
    }

    #[test]
    fn test_soft_deleted_transactions_filtered() {
        let mut store = MemoryStore::new();
        let tx = sample_tx();
        let id = tx.id();
        store.add_transaction(tx);
        store.add_transaction(sample_tx());

        assert!(store.soft_delete_transaction(id));
        let live = store.transactions().unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(store.transaction_count(), 1);

        // Deleting again is a no-op
        assert!(!store.soft_delete_transaction(id));
    }

    #[test]
    fn test_pending_settlement_lifecycle() {
        let mut store = MemoryStore::new();
        let proposal = SettlementProposal::new(
            ParticipantId::new("bob"),
            ParticipantId::new("alice"),
            dec!(20),
        );
        let record = PendingSettlement::from_proposal(&proposal);
        let id = record.id;
        store.save_pending_settlements(vec![record]).unwrap();

        store.reduce_pending_settlement(id, dec!(12.5)).unwrap();
        let active = store.active_pending_settlements().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].amount, dec!(12.5));

        store.deactivate_pending_settlement(id).unwrap();
        assert!(store.active_pending_settlements().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_pending_settlement_id() {
        let mut store = MemoryStore::new();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.deactivate_pending_settlement(missing),
            Err(StoreError::PendingSettlementNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_clear_deactivates_all() {
        let mut store = MemoryStore::new();
        for _ in 0..3 {
            let proposal = SettlementProposal::new(
                ParticipantId::new("bob"),
                ParticipantId::new("alice"),
                dec!(5),
            );
            store
                .save_pending_settlements(vec![PendingSettlement::from_proposal(&proposal)])
                .unwrap();
        }
        store.clear_pending_settlements().unwrap();
        assert!(store.active_pending_settlements().unwrap().is_empty());
    }
}
