use rust_decimal::{Decimal, RoundingStrategy};

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a Decimal with exactly `scale` fractional digits, rounding half-up.
pub(crate) fn format_scaled(value: Decimal, scale: u32) -> String {
    let s = round_half_up(value, scale).to_string();
    match s.find('.') {
        Some(dot) => {
            let decimals = s.len() - dot - 1;
            if decimals < scale as usize {
                format!("{s}{}", "0".repeat(scale as usize - decimals))
            } else {
                s
            }
        }
        None => {
            if scale == 0 {
                s
            } else {
                format!("{s}.{}", "0".repeat(scale as usize))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_half_up(dec!(0.175), 2), dec!(0.18));
        assert_eq!(round_half_up(dec!(2.3331), 2), dec!(2.33));
        assert_eq!(round_half_up(dec!(1.005), 2), dec!(1.01));
    }

    #[test]
    fn format_scaled_cases() {
        assert_eq!(format_scaled(dec!(10), 2), "10.00");
        assert_eq!(format_scaled(dec!(12.5), 2), "12.50");
        assert_eq!(format_scaled(dec!(35.50), 2), "35.50");
        assert_eq!(format_scaled(dec!(2), 4), "2.0000");
        assert_eq!(format_scaled(dec!(12.50), 10), "12.5000000000");
        assert_eq!(format_scaled(dec!(0.175), 2), "0.18");
        assert_eq!(format_scaled(dec!(7), 0), "7");
    }
}
