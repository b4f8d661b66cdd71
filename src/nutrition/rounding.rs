//! Rounding helpers
//!
//! Gram quantities are reported with one decimal. Sums are done on integer
//! micrograms so that totals do not depend on the order entries are added
//! in, and only the finished total is rounded.

/// Round to one decimal place, half away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round a kcal quantity to a whole, non-negative number
pub fn round_kcal(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // Saturating float-to-int cast
    value.round() as u32
}

const MICROGRAMS_PER_GRAM: f64 = 1_000_000.0;

/// Convert grams to integer micrograms
pub fn to_micrograms(grams: f64) -> i64 {
    if !grams.is_finite() {
        return 0;
    }
    (grams * MICROGRAMS_PER_GRAM).round() as i64
}

pub fn from_micrograms(micrograms: i64) -> f64 {
    micrograms as f64 / MICROGRAMS_PER_GRAM
}
