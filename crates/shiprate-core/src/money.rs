//! # Money Rounding
//!
//! Costs are computed in `f64` but always reported to two decimal places.
//! Rounding is half away from zero on the *decimal* representation of the
//! value, so a computed 14.005 becomes 14.01 even though the nearest binary
//! double is slightly below 14.005.
//!
//! The value is first rendered with six fractional digits, which absorbs
//! binary representation noise, then parsed as fixed-point micro-units and
//! rounded to cents with integer arithmetic.

/// Micro-units per cent.
const MICROS_PER_CENT: i64 = 10_000;

/// Round a monetary amount to two decimal places, half away from zero.
///
/// Non-finite inputs are returned unchanged.
pub fn round_cents(value: f64) -> f64 {
    match to_cents(value) {
        Some(cents) => cents as f64 / 100.0,
        None => value,
    }
}

/// Convert a monetary amount to integer cents, half away from zero.
///
/// Returns `None` for NaN, infinities, and magnitudes that do not fit in
/// `i64` micro-units.
pub fn to_cents(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let rendered = format!("{:.6}", value.abs());
    let (whole, frac) = rendered.split_once('.')?;
    let micros = whole
        .parse::<i64>()
        .ok()?
        .checked_mul(1_000_000)?
        .checked_add(frac.parse::<i64>().ok()?)?;
    let cents = (micros + MICROS_PER_CENT / 2) / MICROS_PER_CENT;
    Some(if value < 0.0 { -cents } else { cents })
}

/// Format integer cents as a decimal string with two fractional digits.
///
/// 1401 → "14.01", -5 → "-0.05".
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
