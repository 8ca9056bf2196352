use crate::core::participant::{Participant, ParticipantId};
use crate::core::settlement::Balance;
use crate::core::transaction::Transaction;
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Reduce the transaction ledger to one net balance per active
/// participant.
///
/// Every active participant starts at zero. Each transaction credits its
/// payer and debits its beneficiary by the same amount, so the returned
/// balances always sum to exactly zero. A transaction whose payer or
/// beneficiary is missing from the active roster contributes nothing to
/// anyone — it is skipped whole, never half-applied.
///
/// Result is sorted net-descending; equal balances are ordered by
/// participant id so a run is reproducible.
pub fn net_balances(participants: &[Participant], transactions: &[Transaction]) -> Vec<Balance> {
    let mut net: HashMap<ParticipantId, Decimal> = participants
        .iter()
        .filter(|p| p.is_active())
        .map(|p| (p.id().clone(), Decimal::ZERO))
        .collect();

    for tx in transactions {
        if !net.contains_key(tx.payer()) || !net.contains_key(tx.beneficiary()) {
            warn!(
                "skipping transaction {}: inactive or unknown participant (payer: {}, beneficiary: {})",
                tx.id(),
                tx.payer(),
                tx.beneficiary()
            );
            continue;
        }
        // Payer is owed more, beneficiary owes more.
        if let Some(balance) = net.get_mut(tx.payer()) {
            *balance += tx.amount();
        }
        if let Some(balance) = net.get_mut(tx.beneficiary()) {
            *balance -= tx.amount();
        }
    }

    let mut balances: Vec<Balance> = net
        .into_iter()
        .map(|(id, amount)| Balance::new(id, amount))
        .collect();
    balances.sort_by(|a, b| b.net.cmp(&a.net).then_with(|| a.participant.cmp(&b.participant)));
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn roster(ids: &[&str]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id, *id)).collect()
    }

    fn tx(payer: &str, beneficiary: &str, amount: Decimal) -> Transaction {
        Transaction::new(
            ParticipantId::new(payer),
            ParticipantId::new(beneficiary),
            amount,
            "Test",
        )
    }

    #[test]
    fn test_balances_simple_triangle() {
        let participants = roster(&["alice", "bob", "charlie"]);
        let transactions = vec![
            tx("alice", "bob", dec!(30)),
            tx("bob", "charlie", dec!(20)),
            tx("charlie", "alice", dec!(10)),
        ];

        let balances = net_balances(&participants, &transactions);
        assert_eq!(balances.len(), 3);
        // Sorted descending: alice +20, then bob/charlie at -10 each.
        assert_eq!(balances[0].participant.as_str(), "alice");
        assert_eq!(balances[0].net, dec!(20));
        assert_eq!(balances[1].net, dec!(-10));
        assert_eq!(balances[2].net, dec!(-10));
    }

    #[test]
    fn test_balances_sum_to_zero() {
        let participants = roster(&["alice", "bob", "charlie", "dora"]);
        let transactions = vec![
            tx("alice", "bob", dec!(12.34)),
            tx("bob", "charlie", dec!(56.78)),
            tx("dora", "alice", dec!(9.99)),
            tx("charlie", "dora", dec!(0.01)),
        ];

        let balances = net_balances(&participants, &transactions);
        let total: Decimal = balances.iter().map(|b| b.net).sum();
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_inactive_participant_excluded() {
        let mut participants = roster(&["alice", "bob"]);
        participants[1].deactivate();
        let transactions = vec![tx("alice", "bob", dec!(30))];

        let balances = net_balances(&participants, &transactions);
        // Only alice remains, and the bob transaction was skipped whole.
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].participant.as_str(), "alice");
        assert_eq!(balances[0].net, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_participant_skipped() {
        let participants = roster(&["alice"]);
        let transactions = vec![tx("alice", "ghost", dec!(30))];

        let balances = net_balances(&participants, &transactions);
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].net, Decimal::ZERO);
    }

    #[test]
    fn test_empty_ledger() {
        let participants = roster(&["alice", "bob"]);
        let balances = net_balances(&participants, &[]);
        assert_eq!(balances.len(), 2);
        assert!(balances.iter().all(|b| b.net == Decimal::ZERO));
    }
}
