//! Common types used throughout LightBnB RS

/// Primary key type for every table
pub type Id = i64;

/// Number of minor currency units (cents) in one major unit (dollar)
pub const CENTS_PER_DOLLAR: f64 = 100.0;

/// Convert a price in dollars to whole cents.
///
/// `cost_per_night` is stored as an integer number of cents, so fractional
/// cents are rounded to the nearest cent. Out of range inputs saturate, so
/// callers bound prices before converting.
pub fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * CENTS_PER_DOLLAR).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollars_to_cents() {
        assert_eq!(dollars_to_cents(50.0), 5000);
        assert_eq!(dollars_to_cents(150.0), 15000);
        assert_eq!(dollars_to_cents(0.0), 0);
    }

    #[test]
    fn test_fractional_dollars_round_to_nearest_cent() {
        assert_eq!(dollars_to_cents(19.99), 1999);
        assert_eq!(dollars_to_cents(0.005), 1);
        assert_eq!(dollars_to_cents(12.344), 1234);
    }
}
