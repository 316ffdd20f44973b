//! Exact pro-rata arithmetic.

use primitive_types::U256;

/// `floor(a * b / divisor)`, computed in 256 bits so the product never
/// overflows.
///
/// Returns `None` when `divisor` is zero or the quotient does not fit in a
/// `u128`. Never rounds up.
pub fn mul_div_floor(a: u128, b: u128, divisor: u128) -> Option<u128> {
    let quotient = U256::from(a)
        .checked_mul(U256::from(b))?
        .checked_div(U256::from(divisor))?;
    u128::try_from(quotient).ok()
}
