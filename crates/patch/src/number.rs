//! JSON number grammar and increment arithmetic
//!
//! Integer literals incremented by an integer delta are added exactly on
//! their decimal digits, so counters never lose precision however large they
//! grow. Any fraction or exponent, in the literal or the delta, switches to
//! `f64` addition.

use fieldpatch_core::Delta;
use std::cmp::Ordering;

/// True if `s` matches the JSON number grammar
///
/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
pub fn is_json_number(s: &str) -> bool {
    is_json_number_bytes(s.as_bytes())
}

pub(crate) fn is_json_number_bytes(s: &[u8]) -> bool {
    let mut i = 0;
    if s.first() == Some(&b'-') {
        i += 1;
    }
    match s.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while let Some(b'0'..=b'9') = s.get(i) {
                i += 1;
            }
        }
        _ => return false,
    }
    if s.get(i) == Some(&b'.') {
        i += 1;
        if !matches!(s.get(i), Some(b'0'..=b'9')) {
            return false;
        }
        while let Some(b'0'..=b'9') = s.get(i) {
            i += 1;
        }
    }
    if let Some(b'e' | b'E') = s.get(i) {
        i += 1;
        if let Some(b'+' | b'-') = s.get(i) {
            i += 1;
        }
        if !matches!(s.get(i), Some(b'0'..=b'9')) {
            return false;
        }
        while let Some(b'0'..=b'9') = s.get(i) {
            i += 1;
        }
    }
    i == s.len()
}

/// True if `s` is a JSON number with neither fraction nor exponent
pub fn is_integer_literal(s: &str) -> bool {
    is_json_number(s) && !s.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
}

/// Add `delta` to the JSON number `current`
///
/// Returns the new literal, or `None` when floating-point addition overflows
/// to a non-finite value. `current` must satisfy [`is_json_number`].
///
/// # Example
///
/// ```
/// use fieldpatch_core::Delta;
/// use fieldpatch_patch::number::add;
///
/// assert_eq!(add("2", Delta::Int(3)).as_deref(), Some("5"));
/// assert_eq!(add("99999999999999999999", Delta::Int(1)).as_deref(), Some("100000000000000000000"));
/// assert_eq!(add("1.5", Delta::Int(1)).as_deref(), Some("2.5"));
/// ```
pub fn add(current: &str, delta: Delta) -> Option<String> {
    match delta {
        Delta::Int(d) if is_integer_literal(current) => {
            if let Some(sum) = current.parse::<i64>().ok().and_then(|c| c.checked_add(d)) {
                return Some(sum.to_string());
            }
            Some(add_integers(current, &d.to_string()))
        }
        _ => {
            let c: f64 = current.parse().ok()?;
            let sum = c + delta.as_f64();
            sum.is_finite().then(|| format_float(sum))
        }
    }
}

/// Shortest text that reads back as `value`; integral values have no `.0`
fn format_float(value: f64) -> String {
    format!("{}", value)
}

// =============================================================================
// Decimal integer arithmetic
// =============================================================================

fn split_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, s),
    }
}

/// Exact sum of two decimal integer literals
fn add_integers(a: &str, b: &str) -> String {
    let (a_neg, a_mag) = split_sign(a);
    let (b_neg, b_mag) = split_sign(b);

    let (negative, magnitude) = if a_neg == b_neg {
        (a_neg, add_magnitudes(a_mag, b_mag))
    } else {
        match cmp_magnitudes(a_mag, b_mag) {
            Ordering::Equal => return "0".to_string(),
            Ordering::Greater => (a_neg, sub_magnitudes(a_mag, b_mag)),
            Ordering::Less => (b_neg, sub_magnitudes(b_mag, a_mag)),
        }
    };

    if negative && magnitude != "0" {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

/// Magnitudes carry no leading zeros, so length decides first
fn cmp_magnitudes(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn add_magnitudes(a: &str, b: &str) -> String {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut digits = Vec::with_capacity(a.len().max(b.len()) + 1);
    let mut carry = 0u8;
    let mut ai = a.iter().rev();
    let mut bi = b.iter().rev();
    loop {
        let (x, y) = (ai.next(), bi.next());
        if x.is_none() && y.is_none() {
            break;
        }
        let sum = x.map_or(0, |d| d - b'0') + y.map_or(0, |d| d - b'0') + carry;
        digits.push(b'0' + sum % 10);
        carry = sum / 10;
    }
    if carry > 0 {
        digits.push(b'0' + carry);
    }
    finish_digits(digits)
}

/// `big - small` where `big >= small`
fn sub_magnitudes(big: &str, small: &str) -> String {
    let (big, small) = (big.as_bytes(), small.as_bytes());
    let mut digits = Vec::with_capacity(big.len());
    let mut borrow = 0i8;
    let mut si = small.iter().rev();
    for &d in big.iter().rev() {
        let mut diff = (d - b'0') as i8 - borrow - si.next().map_or(0, |s| (s - b'0') as i8);
        if diff < 0 {
            diff += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        digits.push(b'0' + diff as u8);
    }
    while digits.len() > 1 && digits.last() == Some(&b'0') {
        digits.pop();
    }
    finish_digits(digits)
}

/// Reverse little-endian ASCII digits into a string
fn finish_digits(mut digits: Vec<u8>) -> String {
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}
