//! # splitledger
//!
//! Shared-expense balance tracking and minimal-transfer settlement engine.
//!
//! Given a group of participants and a ledger of who-paid-for-whom
//! transactions, this engine computes each participant's net balance,
//! the direct pairwise debts, and the smallest set of transfers that
//! settles everyone — then applies those settlements back into the
//! ledger.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, transactions, money,
//!   settlement records
//! - **store** — The [`LedgerStore`](store::LedgerStore) seam to the
//!   persistence collaborator, with an in-memory reference implementation
//! - **engine** — Balance calculator, debt-matrix builder, greedy
//!   minimal-transfer solver, and the settlement applier
//!
//! ## Example
//!
//! ```
//! use splitledger::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let mut store = MemoryStore::new();
//! store.add_participant(Participant::new("alice", "Alice"));
//! store.add_participant(Participant::new("bob", "Bob"));
//! store.add_transaction(Transaction::new(
//!     ParticipantId::new("bob"),
//!     ParticipantId::new("alice"),
//!     dec!(20),
//!     "Lunch",
//! ));
//!
//! let engine = SettlementEngine::new(store);
//! let transfers = engine.calculate_minimal_transfers().unwrap();
//! assert_eq!(transfers.len(), 1);
//! assert_eq!(transfers[0].payer.as_str(), "alice");
//! assert_eq!(transfers[0].amount, dec!(20));
//! ```

pub mod core;
pub mod engine;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::money::BALANCE_TOLERANCE;
    pub use crate::core::participant::{Participant, ParticipantId};
    pub use crate::core::settlement::{Balance, Debt, PendingSettlement, SettlementProposal};
    pub use crate::core::transaction::Transaction;
    pub use crate::engine::{EngineError, SettlementEngine};
    pub use crate::store::{LedgerStore, MemoryStore, StoreError};
}
