// ============================================================================
// Human Formatting
// Rounding, padding and grouping of decimal digit strings
// ============================================================================

use crate::domain::config::HumanFormat;

/// Render a magnitude given as integer and fraction digit strings.
///
/// `int_part` has no leading zeros (`"0"` when empty); `frac_part` may be
/// empty.
pub(crate) fn render_human(
    negative: bool,
    int_part: &str,
    frac_part: &str,
    format: &HumanFormat,
) -> String {
    let mut int_part = int_part.to_string();
    let mut frac_part = frac_part.to_string();

    if let Some(precision) = format.precision {
        if frac_part.len() > precision {
            let round_up = frac_part.as_bytes()[precision] >= b'5';
            frac_part.truncate(precision);
            if round_up {
                (int_part, frac_part) = increment(&int_part, &frac_part);
            }
        }
    }

    let keep = frac_part
        .trim_end_matches('0')
        .len()
        .max(format.min_precision);
    frac_part.truncate(keep);
    while frac_part.len() < format.min_precision {
        frac_part.push('0');
    }
    if format.skip_empty_fraction && frac_part.bytes().all(|b| b == b'0') {
        frac_part.clear();
    }

    let is_zero = int_part.bytes().chain(frac_part.bytes()).all(|b| b == b'0');
    let sign = if negative && format.signed && !is_zero {
        "-"
    } else {
        ""
    };

    let int_part = match format.group_separator {
        Some(separator) => group_digits(&int_part, separator, format.group_width),
        None => int_part,
    };

    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

/// Add one unit in the last fraction place (or to the integer when there is
/// no fraction), carrying as needed.
fn increment(int_part: &str, frac_part: &str) -> (String, String) {
    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }

    let mut int_len = int_part.len();
    if carry {
        digits.insert(0, b'1');
        int_len += 1;
    }

    let (int_digits, frac_digits) = digits.split_at(int_len);
    (
        String::from_utf8_lossy(int_digits).into_owned(),
        String::from_utf8_lossy(frac_digits).into_owned(),
    )
}

fn group_digits(digits: &str, separator: char, width: usize) -> String {
    if width == 0 {
        return digits.to_string();
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / width);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % width == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
