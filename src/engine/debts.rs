use crate::core::participant::{Participant, ParticipantId};
use crate::core::settlement::Debt;
use crate::core::transaction::Transaction;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Aggregate raw transactions into net direct debts between participant
/// pairs.
///
/// For every transaction where payer and beneficiary are both active and
/// distinct, the beneficiary's debt towards the payer grows by the
/// amount. Self-transactions net to zero by definition and are skipped.
///
/// This is the local pairwise view: two participants can owe each other
/// directly here even when the minimal-transfer solver nets that debt
/// away against a third party.
///
/// Result contains only strictly positive aggregates, sorted
/// amount-descending (ties by debtor then creditor id).
pub fn direct_debts(participants: &[Participant], transactions: &[Transaction]) -> Vec<Debt> {
    let roster: HashMap<&ParticipantId, &Participant> =
        participants.iter().map(|p| (p.id(), p)).collect();

    let mut matrix: HashMap<(ParticipantId, ParticipantId), Decimal> = HashMap::new();

    for tx in transactions {
        let (payer, beneficiary) = match (roster.get(tx.payer()), roster.get(tx.beneficiary())) {
            (Some(p), Some(b)) => (*p, *b),
            _ => {
                warn!(
                    "skipping transaction {}: unknown participant (payer: {}, beneficiary: {})",
                    tx.id(),
                    tx.payer(),
                    tx.beneficiary()
                );
                continue;
            }
        };
        if !payer.is_active() || !beneficiary.is_active() {
            warn!(
                "skipping transaction {}: inactive participant (payer: {}, beneficiary: {})",
                tx.id(),
                tx.payer(),
                tx.beneficiary()
            );
            continue;
        }
        if tx.payer() == tx.beneficiary() {
            debug!("skipping self-transaction {} for {}", tx.id(), tx.payer());
            continue;
        }

        // Beneficiary owes payer.
        let key = (tx.beneficiary().clone(), tx.payer().clone());
        *matrix.entry(key).or_insert(Decimal::ZERO) += tx.amount();
    }

    let mut debts: Vec<Debt> = matrix
        .into_iter()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .map(|((debtor, creditor), amount)| Debt::new(debtor, creditor, amount))
        .collect();
    debts.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.debtor.cmp(&b.debtor))
            .then_with(|| a.creditor.cmp(&b.creditor))
    });
    debts
}
