//! Rupiah rendering for terminal output.

/// Full form with dot thousands separators: `Rp 1.250.000`, `-Rp 45.000`.
pub fn idr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}Rp {grouped}")
}

/// Short form: `1.0M` (miliar), `1.3jt` (juta), `45k` (ribu), else the
/// plain number.
pub fn idr_compact(amount: i64) -> String {
    let abs = amount.unsigned_abs();
    if abs >= 1_000_000_000 {
        tenths(amount, 100_000_000, "M")
    } else if abs >= 1_000_000 {
        tenths(amount, 100_000, "jt")
    } else if abs >= 1_000 {
        format!("{}k", div_round(amount, 1_000))
    } else {
        amount.to_string()
    }
}

fn tenths(amount: i64, unit: i64, suffix: &str) -> String {
    let tenths = div_round(amount, unit);
    let sign = if tenths < 0 { "-" } else { "" };
    let tenths = tenths.unsigned_abs();
    format!("{sign}{}.{}{suffix}", tenths / 10, tenths % 10)
}

/// Integer division rounding half away from zero.
fn div_round(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.unsigned_abs() * 2 >= divisor.unsigned_abs() {
        quotient + value.signum()
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_form_groups_thousands() {
        assert_eq!(idr(0), "Rp 0");
        assert_eq!(idr(999), "Rp 999");
        assert_eq!(idr(1_250_000), "Rp 1.250.000");
        assert_eq!(idr(-45_000), "-Rp 45.000");
        assert_eq!(idr(19_800_000), "Rp 19.800.000");
    }

    #[test]
    fn compact_form_picks_a_unit() {
        assert_eq!(idr_compact(950), "950");
        assert_eq!(idr_compact(45_000), "45k");
        assert_eq!(idr_compact(45_500), "46k");
        assert_eq!(idr_compact(-45_500), "-46k");
        assert_eq!(idr_compact(1_250_000), "1.3jt");
        assert_eq!(idr_compact(12_000_000), "12.0jt");
        assert_eq!(idr_compact(-1_750_000), "-1.8jt");
        assert_eq!(idr_compact(1_000_000_000), "1.0M");
    }

    #[test]
    fn small_negative_tenths_keep_their_sign() {
        assert_eq!(idr_compact(-1_040_000), "-1.0jt");
        assert_eq!(div_round(-50, 100), -1);
        assert_eq!(div_round(49, 100), 0);
    }
}
