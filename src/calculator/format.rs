//! Number formatting for calculator results.
//!
//! Results are kept at full precision inside the engine and only rounded
//! when turned into text for the entry buffer or the history.

/// Default number of significant digits a result is rounded to.
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 12;

/// Largest precision an `f64` can meaningfully carry.
pub const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// Round `value` to `digits` significant digits.
///
/// Clears binary floating-point noise such as `0.1 + 0.2 = 0.30000000000000004`.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let digits = digits.clamp(1, MAX_SIGNIFICANT_DIGITS);
    format!("{:.*e}", digits - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Format a result as a compact decimal string.
///
/// Trailing zeros are dropped, negative zero prints as `0`, and very large or
/// very small magnitudes switch to exponent notation (`1e+21`, `1.5e-7`).
pub fn format_result(value: f64, digits: usize) -> String {
    let rounded = round_significant(value, digits);

    if rounded == 0.0 {
        return "0".to_string();
    }

    let magnitude = rounded.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", rounded);
    }

    let formatted = format!("{:e}", rounded);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Parse entry text into a number.
///
/// Entry text is built by the engine itself, so anything unparsable
/// (only reachable through a bare `-` or `.`) counts as zero.
pub fn parse_entry(text: &str) -> f64 {
    text.parse().unwrap_or(0.0)
}

/// Insert thousand separators into the integer part of a numeral.
///
/// Text that is not a plain numeral (such as `Error` or exponent notation)
/// is returned unchanged. A trailing decimal point being typed is kept.
pub fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };

    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot_pos) => unsigned.split_at(dot_pos),
        None => (unsigned, ""),
    };

    if int_part.is_empty()
        || !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().skip(1).all(|c| c.is_ascii_digit())
    {
        return text.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let grouped: String = grouped.chars().rev().collect();
    format!("{}{}{}", sign, grouped, frac_part)
}
