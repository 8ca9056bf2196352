//! Foundational types: participants, transactions, money, settlement records.

pub mod money;
pub mod participant;
pub mod settlement;
pub mod transaction;
