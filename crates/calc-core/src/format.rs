//! Result formatting

/// Significant digits used for non-integral results
pub const SIGNIFICANT_DIGITS: usize = 6;

/// Render a finite result for display
///
/// Integral values inside the `i64` range print without a decimal point.
/// Everything else prints like C's `%.6g`.
pub fn format_result(value: f64) -> String {
    if is_integral(value) {
        return format!("{value:.0}");
    }
    format_general(value, SIGNIFICANT_DIGITS)
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
}

/// Shortest of fixed or scientific notation with `precision` significant
/// digits and trailing zeros removed
pub fn format_general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);

    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let limit = i32::try_from(precision).unwrap_or(i32::MAX);
    if exponent < -4 || exponent >= limit {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        );
    }

    let decimals = usize::try_from(limit - 1 - exponent).unwrap_or(0);
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
