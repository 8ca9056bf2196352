use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tolerance under which a balance counts as settled.
///
/// One minor unit of the currency: a participant whose absolute net
/// balance is below this is considered to have no outstanding position.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// Round a monetary amount to two decimal places.
///
/// Uses banker's rounding (round half to even), matching how amounts are
/// normalized everywhere in the ledger. Applied in type constructors only,
/// so every stored amount is already rounded.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// True when `amount` is zero up to [`BALANCE_TOLERANCE`].
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() < BALANCE_TOLERANCE
}
