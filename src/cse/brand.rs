//! Card brand detection from PAN prefixes.
//!
//! Brands are detected against a prioritized table of BIN (Bank
//! Identification Number) ranges. The table is evaluated top to bottom with
//! longer prefixes listed first, so a specific range always wins over a
//! broader one that contains it: the Discover 622126-622925 carve-out
//! matches before the general UnionPay 62 range, and the four-digit Maestro
//! prefixes match before the two-digit Mastercard ranges.
//!
//! Detection never fails: a PAN matching no documented range (or containing
//! no digits at all) detects as [`CardBrand::Unknown`], which is a valid
//! terminal result rather than an error.

use serde::{Deserialize, Serialize};

use crate::cse::digits::digits_only;

/// Payment network brands recognized by the engine.
///
/// Serializes to the wire names used by the processor
/// (`"visa"`, `"american-express"`, `"union-pay"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardBrand {
    /// Visa.
    Visa,
    /// Mastercard.
    Mastercard,
    /// Maestro.
    Maestro,
    /// American Express.
    AmericanExpress,
    /// Diners Club.
    DinersClub,
    /// Discover.
    Discover,
    /// JCB.
    Jcb,
    /// Troy.
    Troy,
    /// Dinacard.
    Dinacard,
    /// UnionPay.
    UnionPay,
    /// No documented range matched.
    Unknown,
}

impl CardBrand {
    /// Returns the brand's wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Maestro => "maestro",
            Self::AmericanExpress => "american-express",
            Self::DinersClub => "diners-club",
            Self::Discover => "discover",
            Self::Jcb => "jcb",
            Self::Troy => "troy",
            Self::Dinacard => "dinacard",
            Self::UnionPay => "union-pay",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One BIN range rule: PANs whose first `len` digits fall in `lo..=hi`
/// (inclusive) belong to `brand`. `lo` and `hi` always have `len` digits.
struct BinRule {
    len: usize,
    lo: u32,
    hi: u32,
    brand: CardBrand,
}

const fn rule(len: usize, lo: u32, hi: u32, brand: CardBrand) -> BinRule {
    BinRule { len, lo, hi, brand }
}

/// Prioritized BIN table. Ordered by prefix length, longest first; first
/// match wins. Within a length group the ranges are disjoint, so their
/// relative order does not matter.
#[rustfmt::skip]
const BIN_RULES: &[BinRule] = &[
    // 6-digit prefixes
    rule(6, 622_126, 622_925, CardBrand::Discover),
    rule(6, 989_100, 989_104, CardBrand::Dinacard),
    rule(6, 989_106, 989_107, CardBrand::Dinacard),
    rule(6, 989_109, 989_109, CardBrand::Dinacard),
    rule(6, 989_111, 989_115, CardBrand::Dinacard),
    rule(6, 989_117, 989_119, CardBrand::Dinacard),
    rule(6, 989_121, 989_125, CardBrand::Dinacard),
    rule(6, 989_127, 989_127, CardBrand::Dinacard),
    rule(6, 989_129, 989_131, CardBrand::Dinacard),
    rule(6, 989_135, 989_136, CardBrand::Dinacard),
    rule(6, 989_140, 989_144, CardBrand::Dinacard),
    rule(6, 989_146, 989_146, CardBrand::Dinacard),
    rule(6, 989_149, 989_153, CardBrand::Dinacard),
    rule(6, 989_155, 989_161, CardBrand::Dinacard),
    rule(6, 989_164, 989_170, CardBrand::Dinacard),
    rule(6, 989_173, 989_178, CardBrand::Dinacard),
    rule(6, 989_180, 989_180, CardBrand::Dinacard),
    rule(6, 989_186, 989_189, CardBrand::Dinacard),
    // 4-digit prefixes
    rule(4, 5018, 5018, CardBrand::Maestro),
    rule(4, 6020, 6020, CardBrand::Maestro),
    rule(4, 9792, 9792, CardBrand::Troy),
    rule(4, 3528, 3589, CardBrand::Jcb),
    rule(4, 2221, 2720, CardBrand::Mastercard),
    rule(4, 6011, 6011, CardBrand::Discover),
    // 3-digit prefixes
    rule(3, 502, 503, CardBrand::Maestro),
    rule(3, 506, 506, CardBrand::Maestro),
    rule(3, 639, 639, CardBrand::Maestro),
    rule(3, 300, 305, CardBrand::DinersClub),
    rule(3, 309, 309, CardBrand::DinersClub),
    rule(3, 644, 649, CardBrand::Discover),
    // 2-digit prefixes
    rule(2, 56, 56, CardBrand::Maestro),
    rule(2, 58, 58, CardBrand::Maestro),
    rule(2, 67, 67, CardBrand::Maestro),
    rule(2, 51, 55, CardBrand::Mastercard),
    rule(2, 34, 34, CardBrand::AmericanExpress),
    rule(2, 37, 37, CardBrand::AmericanExpress),
    rule(2, 36, 36, CardBrand::DinersClub),
    rule(2, 38, 39, CardBrand::DinersClub),
    rule(2, 65, 65, CardBrand::Discover),
    rule(2, 62, 62, CardBrand::UnionPay),
    // 1-digit prefixes
    rule(1, 4, 4, CardBrand::Visa),
];

/// Detects the card brand from a PAN.
///
/// Non-digit characters are stripped before matching, so formatted input
/// (`"4111 1111 …"`) detects the same as the bare digit string. A PAN
/// shorter than a rule's prefix cannot match that rule.
#[must_use]
pub fn detect_brand(pan: &str) -> CardBrand {
    let digits = digits_only(pan);
    if digits.is_empty() {
        return CardBrand::Unknown;
    }

    for rule in BIN_RULES {
        if digits.len() < rule.len {
            continue;
        }
        // The prefix is at most 6 ASCII digits, so the parse cannot fail
        // and the value fits in u32.
        let Ok(prefix) = digits[..rule.len].parse::<u32>() else {
            continue;
        };
        if (rule.lo..=rule.hi).contains(&prefix) {
            return rule.brand;
        }
    }

    CardBrand::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visa() {
        assert_eq!(detect_brand("4111111111111111"), CardBrand::Visa);
        assert_eq!(detect_brand("4242424242424242"), CardBrand::Visa);
    }

    #[test]
    fn test_mastercard_5_series() {
        assert_eq!(detect_brand("5105105105105100"), CardBrand::Mastercard);
        assert_eq!(detect_brand("5555555555554444"), CardBrand::Mastercard);
    }

    #[test]
    fn test_mastercard_2_series() {
        assert_eq!(detect_brand("2221000048400011"), CardBrand::Mastercard);
        assert_eq!(detect_brand("2720990000000006"), CardBrand::Mastercard);
        // Just outside the 2-series range on both ends.
        assert_eq!(detect_brand("2220990000000000"), CardBrand::Unknown);
        assert_eq!(detect_brand("2721000000000000"), CardBrand::Unknown);
    }

    #[test]
    fn test_amex() {
        assert_eq!(detect_brand("378282246310005"), CardBrand::AmericanExpress);
        assert_eq!(detect_brand("341111111111111"), CardBrand::AmericanExpress);
    }

    #[test]
    fn test_maestro_beats_mastercard_and_discover() {
        assert_eq!(detect_brand("5018000000000009"), CardBrand::Maestro);
        assert_eq!(detect_brand("6020000000000000"), CardBrand::Maestro);
        assert_eq!(detect_brand("5600000000000000"), CardBrand::Maestro);
        assert_eq!(detect_brand("6759649826438453"), CardBrand::Maestro);
        assert_eq!(detect_brand("6390000000000000"), CardBrand::Maestro);
        assert_eq!(detect_brand("5020000000000000"), CardBrand::Maestro);
    }

    #[test]
    fn test_diners() {
        assert_eq!(detect_brand("30569309025904"), CardBrand::DinersClub);
        assert_eq!(detect_brand("36006666333344"), CardBrand::DinersClub);
        assert_eq!(detect_brand("38000000000006"), CardBrand::DinersClub);
        assert_eq!(detect_brand("3090000000000000"), CardBrand::DinersClub);
    }

    #[test]
    fn test_discover() {
        assert_eq!(detect_brand("6011111111111117"), CardBrand::Discover);
        assert_eq!(detect_brand("6500000000000002"), CardBrand::Discover);
        assert_eq!(detect_brand("6440000000000000"), CardBrand::Discover);
        // Boundaries of the 62-series carve-out.
        assert_eq!(detect_brand("6221260000000000"), CardBrand::Discover);
        assert_eq!(detect_brand("6229250000000000"), CardBrand::Discover);
    }

    #[test]
    fn test_unionpay_outside_discover_carveout() {
        assert_eq!(detect_brand("6200000000000005"), CardBrand::UnionPay);
        assert_eq!(detect_brand("6221250000000000"), CardBrand::UnionPay);
        assert_eq!(detect_brand("6229260000000000"), CardBrand::UnionPay);
    }

    #[test]
    fn test_jcb() {
        assert_eq!(detect_brand("3528000000000007"), CardBrand::Jcb);
        assert_eq!(detect_brand("3530111333300000"), CardBrand::Jcb);
        assert_eq!(detect_brand("3589000000000000"), CardBrand::Jcb);
    }

    #[test]
    fn test_troy() {
        assert_eq!(detect_brand("9792000000000001"), CardBrand::Troy);
    }

    #[test]
    fn test_dinacard() {
        assert_eq!(detect_brand("9891001234567890"), CardBrand::Dinacard);
        assert_eq!(detect_brand("9891191234567890"), CardBrand::Dinacard);
        // 989105 and 989110 are holes in the Dinacard prefix set.
        assert_eq!(detect_brand("9891051234567890"), CardBrand::Unknown);
        assert_eq!(detect_brand("9891101234567890"), CardBrand::Unknown);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(detect_brand(""), CardBrand::Unknown);
        assert_eq!(detect_brand("no digits"), CardBrand::Unknown);
        assert_eq!(detect_brand("1234567890123456"), CardBrand::Unknown);
        assert_eq!(detect_brand("9999999999999999"), CardBrand::Unknown);
    }

    #[test]
    fn test_formatted_input_detects_same() {
        assert_eq!(detect_brand("4111 1111 1111 1111"), CardBrand::Visa);
        assert_eq!(detect_brand("3782-822463-10005"), CardBrand::AmericanExpress);
    }

    #[test]
    fn test_short_prefix_matches_short_rules_only() {
        // A lone "4" already detects as Visa (one-digit rule), but "62" is
        // needed before UnionPay can match.
        assert_eq!(detect_brand("4"), CardBrand::Visa);
        assert_eq!(detect_brand("6"), CardBrand::Unknown);
        assert_eq!(detect_brand("62"), CardBrand::UnionPay);
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&CardBrand::AmericanExpress).unwrap();
        assert_eq!(json, "\"american-express\"");
        let json = serde_json::to_string(&CardBrand::UnionPay).unwrap();
        assert_eq!(json, "\"union-pay\"");
        let brand: CardBrand = serde_json::from_str("\"diners-club\"").unwrap();
        assert_eq!(brand, CardBrand::DinersClub);
    }

    #[test]
    fn test_as_str_matches_serde() {
        for brand in [
            CardBrand::Visa,
            CardBrand::Mastercard,
            CardBrand::Maestro,
            CardBrand::AmericanExpress,
            CardBrand::DinersClub,
            CardBrand::Discover,
            CardBrand::Jcb,
            CardBrand::Troy,
            CardBrand::Dinacard,
            CardBrand::UnionPay,
            CardBrand::Unknown,
        ] {
            let json = serde_json::to_string(&brand).unwrap();
            assert_eq!(json, format!("\"{}\"", brand.as_str()));
        }
    }

    #[test]
    fn test_table_ordered_longest_prefix_first() {
        let lengths: Vec<usize> = BIN_RULES.iter().map(|r| r.len).collect();
        let mut sorted = lengths.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted, "BIN table must be ordered longest prefix first");
    }

    #[test]
    fn test_table_bounds_well_formed() {
        for rule in BIN_RULES {
            assert!(rule.lo <= rule.hi);
            let width = rule.hi.to_string().len();
            assert_eq!(width, rule.len, "hi bound must have the rule's prefix width");
        }
    }
}
