use crate::core::participant::ParticipantId;
use crate::core::settlement::{Balance, SettlementProposal};
use rust_decimal::Decimal;

/// One side of the solver's working partition: a participant and the
/// amount still owed to or by them.
#[derive(Debug, Clone)]
struct OpenPosition {
    participant: ParticipantId,
    remaining: Decimal,
}

/// Compute the minimum number of payer→recipient transfers that clear
/// every balance.
///
/// Two-pointer greedy over sorted partitions:
///
/// 1. Split balances into creditors (net > 0) and debtors (net < 0,
///    stored as the positive amount they owe).
/// 2. Sort both partitions largest-first. The largest-first order is
///    what makes output reproducible; ties break by participant id.
/// 3. Walk a cursor over each list, transferring
///    `min(debtor remaining, creditor remaining)` at each step and
///    advancing whichever side reaches exactly zero (possibly both).
///
/// The emitted transfer total equals the sum of positive balances, and
/// the proposal count never exceeds `debtors + creditors - 1`. A pure
/// function of its input: no ledger access, no internal state.
pub fn settle_min_transfers(balances: &[Balance]) -> Vec<SettlementProposal> {
    let mut creditors: Vec<OpenPosition> = balances
        .iter()
        .filter(|b| b.is_creditor())
        .map(|b| OpenPosition {
            participant: b.participant.clone(),
            remaining: b.net,
        })
        .collect();
    let mut debtors: Vec<OpenPosition> = balances
        .iter()
        .filter(|b| b.is_debtor())
        .map(|b| OpenPosition {
            participant: b.participant.clone(),
            remaining: -b.net,
        })
        .collect();

    let largest_first = |a: &OpenPosition, b: &OpenPosition| {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.participant.cmp(&b.participant))
    };
    creditors.sort_by(largest_first);
    debtors.sort_by(largest_first);

    let mut proposals = Vec::new();
    let mut i = 0; // debtor cursor
    let mut j = 0; // creditor cursor

    while i < debtors.len() && j < creditors.len() {
        let pay_amount = debtors[i].remaining.min(creditors[j].remaining);

        // Partitions hold strictly non-zero positions, so this only
        // guards against a malformed input balance of zero.
        if pay_amount > Decimal::ZERO {
            proposals.push(SettlementProposal::new(
                debtors[i].participant.clone(),
                creditors[j].participant.clone(),
                pay_amount,
            ));
        }

        debtors[i].remaining -= pay_amount;
        creditors[j].remaining -= pay_amount;

        if debtors[i].remaining == Decimal::ZERO {
            i += 1;
        }
        if creditors[j].remaining == Decimal::ZERO {
            j += 1;
        }
    }

    proposals
}
