//! # Wei → Display Formatting
//!
//! Converts smallest-unit (wei) balances into the strings the site
//! actually renders: thousands-grouped whole QUAI with at most two
//! fractional digits.
//!
//! The fraction is *truncated*, never rounded. `0.019…` QUAI renders as
//! `"0.01"`, and anything below a hundredth renders as the whole part
//! alone. Rounding up here would let the marketing page claim money the
//! vaults don't hold, which is the kind of bug that ends up on Twitter.

use num_bigint::BigUint;

use crate::config::{DISPLAY_FRACTION_DIGITS, QUAI_DECIMALS};

/// Formats a wei amount as a human-readable QUAI string.
///
/// Output shape: `"<grouped-whole>"` or `"<grouped-whole>.<2 digits>"`.
/// The fractional suffix is omitted entirely when it would read `"00"`.
/// Defined for every non-negative integer; zero formats as `"0"`.
///
/// ```
/// use num_bigint::BigUint;
/// use quaivault_stats::format::format_quai_amount;
///
/// let one_and_a_half = BigUint::from(1_500_000_000_000_000_000u64);
/// assert_eq!(format_quai_amount(&one_and_a_half), "1.50");
/// ```
pub fn format_quai_amount(wei: &BigUint) -> String {
    let divisor = BigUint::from(10u8).pow(QUAI_DECIMALS);
    let whole = wei / &divisor;
    let remainder = wei % &divisor;

    // Zero-pad the remainder back to the full 18 digits, then keep the
    // two most significant. This is where truncation happens.
    let padded = format!(
        "{:0>width$}",
        remainder.to_string(),
        width = QUAI_DECIMALS as usize
    );
    let fraction = &padded[..DISPLAY_FRACTION_DIGITS];

    let grouped = group_thousands(&whole.to_string());
    if fraction.bytes().all(|b| b == b'0') {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}

/// Inserts `,` separators into a plain digit string, groups of three
/// from the right. Only the integer part is ever grouped.
fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(bytes.len() + bytes.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(n: u128) -> BigUint {
        BigUint::from(n)
    }

    /// 10^18 wei = 1 QUAI.
    fn quai(n: u128) -> BigUint {
        wei(n) * BigUint::from(10u8).pow(QUAI_DECIMALS)
    }

    #[test]
    fn zero_formats_as_bare_zero() {
        assert_eq!(format_quai_amount(&wei(0)), "0");
    }

    #[test]
    fn one_whole_unit_has_no_fraction() {
        assert_eq!(format_quai_amount(&quai(1)), "1");
    }

    #[test]
    fn half_units_keep_trailing_zero() {
        assert_eq!(format_quai_amount(&wei(1_500_000_000_000_000_000)), "1.50");
    }

    #[test]
    fn one_hundredth_is_the_resolution_floor() {
        assert_eq!(format_quai_amount(&wei(10_000_000_000_000_000)), "0.01");
    }

    #[test]
    fn below_resolution_truncates_to_whole() {
        // ~0.000999 QUAI: nonzero, but both display digits are zero.
        // Truncation, not rounding — this must NOT come back as "0.01".
        assert_eq!(format_quai_amount(&wei(999_999_999_999_999)), "0");
    }

    #[test]
    fn just_under_one_unit_truncates_to_99() {
        assert_eq!(format_quai_amount(&wei(999_999_999_999_999_999)), "0.99");
    }

    #[test]
    fn truncates_never_rounds() {
        // 1.999 QUAI shows as 1.99, not 2.00.
        assert_eq!(format_quai_amount(&wei(1_999_000_000_000_000_000)), "1.99");
    }

    #[test]
    fn whole_part_gets_thousands_grouping() {
        assert_eq!(format_quai_amount(&quai(1_234_567)), "1,234,567");
    }

    #[test]
    fn grouping_and_fraction_compose() {
        let amount = quai(1_234_567_890) + wei(500_000_000_000_000_000);
        assert_eq!(format_quai_amount(&amount), "1,234,567,890.50");
    }

    #[test]
    fn exact_group_boundaries() {
        assert_eq!(format_quai_amount(&quai(100)), "100");
        assert_eq!(format_quai_amount(&quai(1_000)), "1,000");
        assert_eq!(format_quai_amount(&quai(999_999)), "999,999");
        assert_eq!(format_quai_amount(&quai(1_000_000)), "1,000,000");
    }

    #[test]
    fn output_matches_display_grammar() {
        // ^\d{1,3}(,\d{3})*(\.\d{2})?$ — checked by hand, without regex.
        let samples: [u128; 6] = [
            0,
            1,
            999_999_999_999_999_999,
            1_500_000_000_000_000_000,
            12_345 * 1_000_000_000_000_000_000,
            98_765_432_109_876_543_210_000_000_000,
        ];
        for raw in samples {
            let s = format_quai_amount(&wei(raw));
            let (whole, frac) = match s.split_once('.') {
                Some((w, f)) => (w, Some(f)),
                None => (s.as_str(), None),
            };
            let groups: Vec<&str> = whole.split(',').collect();
            assert!(!groups[0].is_empty() && groups[0].len() <= 3, "bad lead group in {s:?}");
            for g in &groups[1..] {
                assert_eq!(g.len(), 3, "bad group in {s:?}");
            }
            assert!(whole.chars().all(|c| c.is_ascii_digit() || c == ','));
            if let Some(f) = frac {
                assert_eq!(f.len(), 2, "bad fraction in {s:?}");
                assert!(f.chars().all(|c| c.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn handles_amounts_beyond_u128() {
        // Sums across thousands of vaults can outgrow any machine word.
        let huge = quai(1) << 200u32;
        let s = format_quai_amount(&huge);
        assert!(s.len() > 40);
        assert!(s.contains(','));
    }
}
