//! Spreadsheet rendering of numbers as text.
//!
//! Spreadsheets keep 15 significant decimal digits and switch to scientific
//! notation only for very large or very small magnitudes, so a stored
//! `123.0` reads as `123` and `0.1 + 0.2` reads as `0.3`.

/// Longest text rendered in plain notation for values below one
const MAX_TEXT_LEN: usize = 20;

/// Largest decimal exponent rendered in plain notation
const MAX_PLAIN_EXPONENT: i32 = 19;

const SIGNIFICANT_DIGITS: usize = 15;

/// Smallest 16-digit value; rounding up to it carries into the exponent
const UNITS_LIMIT: u64 = 1_000_000_000_000_000;

/// Beyond this decimal exponent only 14 significant digits are shown
const MAX_FULL_PRECISION_EXPONENT: i32 = 98;

/// Enough fraction digits to print any finite f64 exactly
const EXACT_PRECISION: usize = 800;

/// NaN bit pattern Excel writes for its own overflowed values
const EXCEL_NAN_BITS: u64 = 0xFFFF_0420_003C_0000;

const SIGN_MASK: u64 = 0x8000_0000_0000_0000;
const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
const FRACTION_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;

/// Convert a number to the text a spreadsheet displays for it.
///
/// # Examples
///
/// ```
/// use xltab_sheet::number_to_text;
///
/// assert_eq!(number_to_text(123.0), "123");
/// assert_eq!(number_to_text(123.45), "123.45");
/// assert_eq!(number_to_text(1e20), "1E+20");
/// ```
#[must_use]
pub fn number_to_text(value: f64) -> String {
    let bits = value.to_bits();
    if bits == EXCEL_NAN_BITS {
        return "3.484840871308E+308".to_string();
    }

    let mut negative = bits & SIGN_MASK != 0;
    let magnitude = bits & !SIGN_MASK;
    let sign = if negative { "-" } else { "" };

    if magnitude == 0 {
        return format!("{sign}0");
    }
    // Subnormals display as zero
    if magnitude & EXPONENT_MASK == 0 {
        return format!("{sign}0");
    }

    let (units, exponent) = if magnitude & EXPONENT_MASK == EXPONENT_MASK {
        // Infinity and NaN: the sign is ignored and the significand is read
        // as if the exponent were 1024.
        negative = false;
        let significand = 1.0 + (magnitude & FRACTION_MASK) as f64 / (1u64 << 52) as f64;
        let tenth = significand * 2f64.powi(1023) / 5.0;
        let (units, exponent) = round_units(tenth);
        (units, exponent + 1)
    } else {
        round_units(f64::from_bits(magnitude))
    };

    let (digits, exponent) = if exponent.abs() > MAX_FULL_PRECISION_EXPONENT {
        last_digit_rounded(units, exponent)
    } else {
        (units.to_string(), exponent)
    };

    let mut text = String::with_capacity(MAX_TEXT_LEN + 2);
    if negative {
        text.push('-');
    }
    let count = digits.trim_end_matches('0').len().max(1);
    if exponent < 0 {
        format_less_than_one(&mut text, &digits, exponent, count);
    } else {
        format_at_least_one(&mut text, &digits, exponent, count);
    }
    text
}

/// Round half up to 15 significant digits, returning them as an integer
/// together with the decimal exponent of the first digit.
fn round_units(value: f64) -> (u64, i32) {
    let (mut digits, mut exponent) = scientific_digits(value, SIGNIFICANT_DIGITS + 1);
    // A rounded "50" tail may hide a value just below the half
    if digits[SIGNIFICANT_DIGITS..].starts_with("50") {
        (digits, exponent) = scientific_digits(value, EXACT_PRECISION);
    }

    let mut units: u64 = digits[..SIGNIFICANT_DIGITS].parse().unwrap_or(0);
    if digits.as_bytes()[SIGNIFICANT_DIGITS] >= b'5' {
        units += 1;
    }
    if units >= UNITS_LIMIT {
        units /= 10;
        exponent += 1;
    }
    (units, exponent)
}

/// Digits of `value` in scientific notation with `precision` fraction digits
fn scientific_digits(value: f64, precision: usize) -> (String, i32) {
    let rendered = format!("{value:.precision$e}");
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((rendered.as_str(), "0"));
    let digits = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent.parse().unwrap_or(0))
}

/// Round away the fifteenth digit, for magnitudes with a three-digit exponent
fn last_digit_rounded(units: u64, exponent: i32) -> (String, i32) {
    let mut digits = (units + 5).to_string();
    digits.pop();
    digits.push('0');
    if digits.len() > SIGNIFICANT_DIGITS {
        (digits, exponent + 1)
    } else {
        (digits, exponent)
    }
}

fn format_less_than_one(text: &mut String, digits: &str, exponent: i32, count: usize) {
    let leading_zeros = (-exponent - 1) as usize;
    let plain_len = 2 + leading_zeros + count;
    if plain_len > MAX_TEXT_LEN {
        push_scientific(text, digits, count);
        text.push_str("E-");
        push_exponent(text, -exponent);
        return;
    }
    text.push_str("0.");
    text.push_str(&"0".repeat(leading_zeros));
    text.push_str(&digits[..count]);
}

fn format_at_least_one(text: &mut String, digits: &str, exponent: i32, count: usize) {
    if exponent > MAX_PLAIN_EXPONENT {
        push_scientific(text, digits, count);
        text.push_str("E+");
        push_exponent(text, exponent);
        return;
    }
    let integer_len = exponent as usize + 1;
    if count > integer_len {
        text.push_str(&digits[..integer_len]);
        text.push('.');
        text.push_str(&digits[integer_len..count]);
        return;
    }
    text.push_str(&digits[..count]);
    text.push_str(&"0".repeat(integer_len - count));
}

fn push_scientific(text: &mut String, digits: &str, count: usize) {
    text.push_str(&digits[..1]);
    if count > 1 {
        text.push('.');
        text.push_str(&digits[1..count]);
    }
}

fn push_exponent(text: &mut String, exponent: i32) {
    if exponent < 10 {
        text.push('0');
    }
    text.push_str(&exponent.to_string());
}
