//! Digit-string helpers shared by validation and brand detection.

/// Returns `s` with every non-digit character removed.
///
/// Produces an empty string when `s` contains no digits. Spaces, dashes,
/// and any other formatting characters users type into card fields are
/// stripped here, once, before any rule looks at the value.
#[must_use]
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Returns `true` if `s` is non-empty and consists entirely of ASCII digits.
#[must_use]
pub fn is_digits_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Checks a digit string against the Luhn mod-10 checksum.
///
/// Doubles every second digit from the rightmost, subtracts 9 from doubled
/// values above 9, and requires the total to be divisible by 10. Returns
/// `false` for the empty string, for a single digit (too short to carry a
/// check digit), and for any input containing a non-digit character.
#[must_use]
pub fn luhn_check(digits: &str) -> bool {
    if digits.len() < 2 {
        return false;
    }

    let mut sum: u32 = 0;
    let mut double = false;

    for c in digits.chars().rev() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };

        let mut d = d;
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        double = !double;
        sum += d;
    }

    sum % 10 == 0
}
