//! The storage seam between the engine and its persistence collaborator.
//!
//! The engine owns no durable state. Everything it reads and writes goes
//! through [`LedgerStore`], which a host application backs with whatever
//! persistence it has (SQL, key-value, in-memory). [`MemoryStore`] is the
//! reference implementation of the contract.

pub mod memory;

pub use memory::MemoryStore;

use crate::core::participant::Participant;
use crate::core::settlement::PendingSettlement;
use crate::core::transaction::Transaction;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by a [`LedgerStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pending settlement {0} not found")]
    PendingSettlementNotFound(Uuid),
    /// Backend-specific failure (connection loss, IO, constraint
    /// violation). The engine never inspects the message, only
    /// propagates it.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Read and write access to the shared ledger.
///
/// Reads are fresh on every call; the engine caches nothing across
/// operations. Implementations decide their own consistency model (the
/// engine assumes at least one-connection-per-call consistency and does
/// no locking or retrying of its own).
pub trait LedgerStore {
    /// Full participant roster, active and inactive.
    fn participants(&self) -> Result<Vec<Participant>, StoreError>;

    /// All non-soft-deleted transactions, in insertion order.
    fn transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Append one transaction to the ledger.
    fn append_transaction(&mut self, transaction: Transaction) -> Result<(), StoreError>;

    /// All active pending-settlement records.
    fn active_pending_settlements(&self) -> Result<Vec<PendingSettlement>, StoreError>;

    /// Mark one pending-settlement record inactive.
    ///
    /// Unknown ids are a [`StoreError::PendingSettlementNotFound`].
    fn deactivate_pending_settlement(&mut self, id: Uuid) -> Result<(), StoreError>;

    /// Replace the stored amount of one pending-settlement record.
    ///
    /// Unknown ids are a [`StoreError::PendingSettlementNotFound`].
    fn reduce_pending_settlement(&mut self, id: Uuid, new_amount: Decimal)
        -> Result<(), StoreError>;

    /// Deactivate every pending-settlement record.
    fn clear_pending_settlements(&mut self) -> Result<(), StoreError>;

    /// Persist a batch of pending-settlement records.
    fn save_pending_settlements(
        &mut self,
        records: Vec<PendingSettlement>,
    ) -> Result<(), StoreError>;
}
