use clap::Args;
use rust_decimal::Decimal;
use std::str::FromStr;

use lab_pricing_core::analytics::AnalyticsInputs;

/// Operating assumption flags. Each value that does not parse as a number is
/// taken as 0.
#[derive(Args, Debug, Clone)]
#[command(allow_hyphen_values = true)]
pub struct AssumptionArgs {
    /// Current daily operating overhead
    #[arg(long, default_value = "2500")]
    pub current_overhead: String,

    /// Current panels run per day
    #[arg(long, default_value = "50")]
    pub current_volume: String,

    /// Projected daily operating overhead
    #[arg(long, default_value = "3500")]
    pub future_overhead: String,

    /// Projected panels run per day
    #[arg(long, default_value = "80")]
    pub future_volume: String,
}

/// Longest leading `[+-]digits[.digits][e[+-]digits]` run of `raw`, rebuilt
/// with an explicit integer part. None when no digits lead the string.
fn numeric_prefix(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_end = digits_from(pos);
    let int_part = &raw[pos..int_end];
    let mut frac_part = "";
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        frac_part = &raw[int_end + 1..frac_end];
        end = frac_end;
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut number = String::new();
    if negative {
        number.push('-');
    }
    number.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        number.push('.');
        number.push_str(frac_part);
    }

    // exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'-') | Some(b'+')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            number.push('e');
            number.push_str(&raw[end + 1..exp_end]);
        }
    }
    Some(number)
}

/// Lenient number parsing for form-style input: the leading number of the
/// value is used ("50 panels" is 50), otherwise zero.
pub fn coerce(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    let parsed = numeric_prefix(trimmed).and_then(|n| {
        Decimal::from_str(&n)
            .or_else(|_| Decimal::from_scientific(&n))
            .ok()
    });
    parsed.unwrap_or_else(|| {
        if !trimmed.is_empty() {
            tracing::warn!(value = trimmed, "unparseable number treated as 0");
        }
        Decimal::ZERO
    })
}

impl AssumptionArgs {
    pub fn to_inputs(&self) -> AnalyticsInputs {
        AnalyticsInputs {
            current_daily_overhead: coerce(&self.current_overhead),
            current_panels_per_day: coerce(&self.current_volume),
            future_daily_overhead: coerce(&self.future_overhead),
            future_panels_per_day: coerce(&self.future_volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce("2500"), dec!(2500));
        assert_eq!(coerce(" 43.75 "), dec!(43.75));
        assert_eq!(coerce("1e3"), dec!(1000));
        assert_eq!(coerce("-5"), dec!(-5));
    }

    #[test]
    fn test_coerce_garbage_is_zero() {
        assert_eq!(coerce(""), Decimal::ZERO);
        assert_eq!(coerce("abc"), Decimal::ZERO);
        assert_eq!(coerce("-"), Decimal::ZERO);
        assert_eq!(coerce("."), Decimal::ZERO);
        assert_eq!(coerce("$50"), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_uses_leading_number() {
        assert_eq!(coerce("50 panels"), dec!(50));
        assert_eq!(coerce("1,000"), dec!(1));
        assert_eq!(coerce("12.5.3"), dec!(12.5));
        assert_eq!(coerce(".5"), dec!(0.5));
        assert_eq!(coerce("7."), dec!(7));
        assert_eq!(coerce("-3.25abc"), dec!(-3.25));
        assert_eq!(coerce("2e2x"), dec!(200));
        assert_eq!(coerce("4e"), dec!(4));
        assert_eq!(coerce("+9"), dec!(9));
    }

    #[test]
    fn test_each_field_coerced_independently() {
        let args = AssumptionArgs {
            current_overhead: "2500".to_string(),
            current_volume: "fifty".to_string(),
            future_overhead: "".to_string(),
            future_volume: "80".to_string(),
        };
        let inputs = args.to_inputs();
        assert_eq!(inputs.current_daily_overhead, dec!(2500));
        assert_eq!(inputs.current_panels_per_day, Decimal::ZERO);
        assert_eq!(inputs.future_daily_overhead, Decimal::ZERO);
        assert_eq!(inputs.future_panels_per_day, dec!(80));
    }
}
