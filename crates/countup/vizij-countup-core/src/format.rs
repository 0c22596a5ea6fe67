//! Number text handling: fixed-decimal rendering, digit grouping, and the
//! reverse direction used when a host hands bounds over as text.

use crate::config::CountUpOptions;

/// Round half toward positive infinity at the given scale (`10^decimals`).
#[inline]
pub fn round_to_scale(value: f64, scale: f64) -> f64 {
    round_half_up(value * scale) / scale
}

/// Nearest integer, exact halves toward positive infinity.
#[inline]
fn round_half_up(value: f64) -> f64 {
    // `round` breaks ties away from zero; only negative halves differ.
    let rounded = value.round();
    if value - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Render `value` with exactly `decimals` fractional digits.
///
/// Digits come from the exact binary value. An exact half at the last kept
/// digit rounds the magnitude up (`0.125` to two places is `0.13`), so
/// `1.005`, stored just below the half, gives `1.00`.
///
/// Negative zero renders as `0`; non-finite values use the host spellings
/// `NaN`, `Infinity` and `-Infinity`.
pub fn to_fixed(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    let places = decimals as usize;
    if exact_fraction_digits(value) != decimals + 1 {
        // No tie at this precision.
        return format!("{:.*}", places, value);
    }

    // One more place is the exact expansion, ending in the tying 5.
    let mut digits = format!("{:.*}", places + 1, value.abs()).into_bytes();
    digits.pop();
    if digits.last() == Some(&b'.') {
        digits.pop();
    }
    carry_one(&mut digits);

    let mut out = String::with_capacity(digits.len() + 1);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits.into_iter().map(char::from));
    out
}

/// Digits after the point in the exact decimal expansion of a finite value.
fn exact_fraction_digits(value: f64) -> u32 {
    if value == 0.0 {
        return 0;
    }
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    let exponent = exponent + mantissa.trailing_zeros() as i32;
    if exponent >= 0 {
        0
    } else {
        exponent.unsigned_abs()
    }
}

/// Add one unit in the last place of an ASCII decimal string.
fn carry_one(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        match *d {
            b'.' => continue,
            b'9' => *d = b'0',
            _ => {
                *d += 1;
                return;
            }
        }
    }
    digits.insert(0, b'1');
}

/// Apply grouping and the decimal mark to a fixed-decimal string such as
/// `"1234567.89"`.
///
/// Only the first run of digits in the integer part is grouped, so a leading
/// sign stays in front of the first group (`"-1234"` becomes `"-1,234"`).
pub fn format_number(fixed: &str, options: &CountUpOptions) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (fixed, None),
    };

    let mut out = if options.use_grouping {
        group_first_digit_run(int_part, &options.separator)
    } else {
        int_part.to_string()
    };
    if let Some(frac) = frac_part {
        out.push_str(&options.decimal);
        out.push_str(frac);
    }
    out
}

fn group_first_digit_run(text: &str, separator: &str) -> String {
    let start = match text.find(|c: char| c.is_ascii_digit()) {
        Some(i) => i,
        None => return text.to_string(),
    };
    let len = text[start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len() - start);
    let (prefix, rest) = text.split_at(start);
    let (digits, suffix) = rest.split_at(len);

    let mut out = String::with_capacity(text.len() + (len / 3) * separator.len());
    out.push_str(prefix);
    for (i, ch) in digits.char_indices() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out.push_str(suffix);
    out
}

/// Parse text produced by [`format_number`] back into a number.
pub fn unformat_number(text: &str, options: &CountUpOptions) -> Option<f64> {
    let mut plain = if options.use_grouping && !options.separator.is_empty() {
        text.replace(options.separator.as_str(), "")
    } else {
        text.to_string()
    };
    if !options.decimal.is_empty() && options.decimal != "." {
        plain = plain.replacen(options.decimal.as_str(), ".", 1);
    }
    let value = coerce_number(&plain);
    (!value.is_nan()).then_some(value)
}

/// Host-style numeric coercion of text: surrounding whitespace is ignored, an
/// empty string is `0`, anything unparsable is `NaN`.
pub fn coerce_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN);
    }
    // Rust also accepts "inf"/"nan" spellings, the host does not.
    let lower = s.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}
