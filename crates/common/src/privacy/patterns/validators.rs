//! Post-match checks for built-in patterns
//!
//! Two kinds of check run after a regex candidate is found:
//!
//! - **validators** confirm the candidate structurally (checksums, reserved
//!   ranges). A rejected candidate is dropped and scanning resumes at its end.
//! - **guards** inspect the scan view around the candidate, where spans
//!   already accepted are masked. They stand in for lookbehind/lookahead,
//!   which the `regex` crate does not support. A rejected candidate is
//!   retried one character later.
//!
//! Validators only accept ASCII digits.

/// Strips the `-` and space separators the patterns allow.
fn compact(value: &str) -> String {
    value.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

fn ascii_digits(value: &str) -> Option<Vec<u32>> {
    value.chars().map(|c| if c.is_ascii_digit() { c.to_digit(10) } else { None }).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn luhn(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

/// US SSN: rejects all-same digits, area 000/666/9xx, group 00, serial 0000.
pub fn ssn(value: &str) -> bool {
    let Some(d) = ascii_digits(&compact(value)) else {
        return false;
    };
    if d.len() != 9 || all_same(&d) {
        return false;
    }
    let area = d[0] * 100 + d[1] * 10 + d[2];
    let group = d[3] * 10 + d[4];
    let serial = d[5] * 1000 + d[6] * 100 + d[7] * 10 + d[8];
    area != 0 && area != 666 && d[0] != 9 && group != 0 && serial != 0
}

/// US ITIN: area 900-988, except 909.
pub fn itin(value: &str) -> bool {
    let Some(d) = ascii_digits(&compact(value)) else {
        return false;
    };
    if d.len() != 9 {
        return false;
    }
    let area = d[0] * 100 + d[1] * 10 + d[2];
    (900..=988).contains(&area) && area != 909
}

/// Australian Medicare card: 10 digits, first digit 2-6.
pub fn medicare_au(value: &str) -> bool {
    match ascii_digits(&compact(value)) {
        Some(d) => d.len() == 10 && (2..=6).contains(&d[0]),
        None => false,
    }
}

/// Australian Tax File Number, weighted mod 11.
pub fn tfn(value: &str) -> bool {
    const WEIGHTS: [u32; 9] = [1, 4, 3, 7, 5, 8, 6, 9, 10];
    let Some(d) = ascii_digits(&compact(value)) else {
        return false;
    };
    if d.len() != 9 || all_same(&d) {
        return false;
    }
    let total: u32 = d.iter().zip(WEIGHTS).map(|(digit, w)| digit * w).sum();
    total % 11 == 0
}

/// Australian Business Number, weighted mod 89 with the first digit less one.
pub fn abn(value: &str) -> bool {
    const WEIGHTS: [i64; 11] = [10, 1, 3, 5, 7, 9, 11, 13, 15, 17, 19];
    let Some(d) = ascii_digits(&compact(value)) else {
        return false;
    };
    if d.len() != 11 {
        return false;
    }
    let total: i64 = d
        .iter()
        .enumerate()
        .map(|(i, &digit)| {
            let digit = i64::from(digit);
            if i == 0 {
                digit - 1
            } else {
                digit
            }
        })
        .zip(WEIGHTS)
        .map(|(digit, w)| digit * w)
        .sum();
    total % 89 == 0
}

/// IBAN, ISO 13616 mod 97.
pub fn iban(value: &str) -> bool {
    let iban: Vec<char> = compact(value).chars().map(|c| c.to_ascii_uppercase()).collect();
    if !(15..=34).contains(&iban.len()) || !iban.iter().all(char::is_ascii_alphanumeric) {
        return false;
    }
    let mut remainder: u32 = 0;
    for c in iban[4..].iter().chain(&iban[..4]) {
        let n = match c.to_digit(36) {
            Some(n) => n,
            None => return false,
        };
        remainder = if n < 10 { (remainder * 10 + n) % 97 } else { (remainder * 100 + n) % 97 };
    }
    remainder == 1
}

/// UK NHS number, mod 11 check digit.
pub fn nhs(value: &str) -> bool {
    let Some(d) = ascii_digits(&compact(value)) else {
        return false;
    };
    if d.len() != 10 || all_same(&d) {
        return false;
    }
    let total: u32 = d[..9].iter().enumerate().map(|(i, digit)| digit * (10 - i as u32)).sum();
    let check = match 11 - total % 11 {
        11 => 0,
        10 => return false,
        c => c,
    };
    d[9] == check
}

/// UK National Insurance number prefix rules.
pub fn nino(value: &str) -> bool {
    const INVALID_PREFIXES: [&str; 7] = ["BG", "GB", "KN", "NK", "NT", "TN", "ZZ"];
    let clean = compact(value).to_ascii_uppercase();
    if clean.len() != 9 || !clean.is_ascii() {
        return false;
    }
    let mut chars = clean.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return false;
    };
    !INVALID_PREFIXES.contains(&&clean[..2])
        && !"DFIQUV".contains(first)
        && !"DFIOQUV".contains(second)
}

/// Payment card number: 13-19 digits, Luhn, not all the same digit.
pub fn credit_card(value: &str) -> bool {
    let Some(d) = ascii_digits(&compact(value)) else {
        return false;
    };
    (13..=19).contains(&d.len()) && !all_same(&d) && luhn(&d)
}

/// ABA routing number, weights 3-7-1.
pub fn routing_number(value: &str) -> bool {
    const WEIGHTS: [u32; 9] = [3, 7, 1, 3, 7, 1, 3, 7, 1];
    let Some(d) = ascii_digits(value) else {
        return false;
    };
    if d.len() != 9 || d.iter().all(|&digit| digit == 0) {
        return false;
    }
    let total: u32 = d.iter().zip(WEIGHTS).map(|(digit, w)| digit * w).sum();
    total % 10 == 0
}

/// National Provider Identifier: Luhn over the `80840` prefixed number.
pub fn npi(value: &str) -> bool {
    let Some(d) = ascii_digits(value) else {
        return false;
    };
    if d.len() != 10 {
        return false;
    }
    let mut full = vec![8, 0, 8, 4, 0];
    full.extend(d);
    luhn(&full)
}

/// DEA registration number check digit.
pub fn dea_number(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() != 9 || !chars[0].is_ascii_alphabetic() {
        return false;
    }
    let tail: String = chars[2..].iter().collect();
    let Some(d) = ascii_digits(&tail) else {
        return false;
    };
    if d.iter().all(|&digit| digit == 0) {
        return false;
    }
    let odd = d[0] + d[2] + d[4];
    let even = d[1] + d[3] + d[5];
    (odd + even * 2) % 10 == d[6]
}

/// Spanish DNI (8 digits + letter) or NIE (X/Y/Z + 7 digits + letter).
pub fn spanish_dni(value: &str) -> bool {
    const LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";
    let clean = compact(value).to_ascii_uppercase();
    if clean.len() != 9 || !clean.is_ascii() {
        return false;
    }
    let normalized = match clean.as_bytes()[0] {
        b'X' => format!("0{}", &clean[1..]),
        b'Y' => format!("1{}", &clean[1..]),
        b'Z' => format!("2{}", &clean[1..]),
        _ => clean,
    };
    let Ok(number) = normalized[..8].parse::<u32>() else {
        return false;
    };
    normalized.as_bytes()[8] == LETTERS[(number % 23) as usize]
}

/// Italian codice fiscale check character.
pub fn italian_fiscal_code(value: &str) -> bool {
    const ODD: [u32; 26] = [
        1, 0, 5, 7, 9, 13, 15, 17, 19, 21, 2, 4, 18, 20, 11, 3, 6, 8, 12, 14, 16, 10, 22, 25, 24,
        23,
    ];
    let code = value.to_ascii_uppercase();
    let bytes = code.as_bytes();
    if bytes.len() != 16 || !bytes.iter().all(u8::is_ascii_alphanumeric) {
        return false;
    }
    let mut total = 0;
    for (i, &b) in bytes[..15].iter().enumerate() {
        let (digit_value, letter_index) = if b.is_ascii_digit() {
            (u32::from(b - b'0'), usize::from(b - b'0'))
        } else {
            (u32::from(b - b'A'), usize::from(b - b'A'))
        };
        // Positions are 1-based in the standard; index 0 is an odd position.
        total += if i % 2 == 0 { ODD[letter_index] } else { digit_value };
    }
    bytes[15] == b'A' + (total % 26) as u8
}

/// ISO 3166-1 alpha-2 codes, plus `XK` which SWIFT assigns to Kosovo.
/// Sorted for binary search.
const COUNTRY_CODES: [&str; 250] = [
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW",
    "AX", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN",
    "BO", "BQ", "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG",
    "CH", "CI", "CK", "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ",
    "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI",
    "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL",
    "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR",
    "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA",
    "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME",
    "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU",
    "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP",
    "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM", "PN", "PR",
    "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC", "SD",
    "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE",
    "VG", "VI", "VN", "VU", "WF", "WS", "XK", "YE", "YT", "ZA", "ZM", "ZW",
];

/// BIC: positions 5-6 must be an assigned country code.
///
/// The shape alone accepts any eight or eleven letter upper-case word. The
/// country check rejects most of them (`PASSWORD`, `FIREWALL`, `REDACTED`)
/// but words that happen to carry a country pair, such as `DOCUMENT` (`ME`)
/// or `DEADBEEF` (`BE`), are still reported at generic confidence.
pub fn swift_bic(value: &str) -> bool {
    value.get(4..6).is_some_and(|country| COUNTRY_CODES.binary_search(&country).is_ok())
}

/// Rejects identifier candidates made only of letters.
pub fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

// ============================================================================
// Guards
// ============================================================================

/// IPv4 must not be embedded in a longer dotted-number run.
pub fn ipv4_boundaries(text: &str, start: usize, end: usize) -> bool {
    let mut before = text[..start].chars().rev();
    let embedded_left = matches!(
        (before.next(), before.next()),
        (Some('.'), Some(c)) if c.is_numeric()
    );
    let mut after = text[end..].chars();
    let embedded_right = matches!(
        (after.next(), after.next()),
        (Some('.'), Some(c)) if c.is_numeric()
    );
    !embedded_left && !embedded_right
}

/// MAC address must not be embedded in a longer hex-pair run.
pub fn mac_boundaries(text: &str, start: usize, end: usize) -> bool {
    let is_sep = |c: char| c == ':' || c == '-';
    let mut before = text[..start].chars().rev();
    let embedded_left = matches!(
        (before.next(), before.next()),
        (Some(sep), Some(c)) if is_sep(sep) && c.is_ascii_hexdigit()
    );
    let mut after = text[end..].chars();
    let embedded_right = matches!(
        (after.next(), after.next()),
        (Some(sep), Some(c)) if is_sep(sep) && c.is_ascii_hexdigit()
    );
    !embedded_left && !embedded_right
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // National identifiers
    // ========================================================================

    /// Validates `ssn` behavior for the reserved range scenario.
    ///
    /// Assertions:
    /// - Ensures a well-formed SSN passes.
    /// - Ensures area 000/666/9xx, group 00, serial 0000 and repeated digits
    ///   fail.
    #[test]
    fn test_ssn_reserved_ranges() {
        assert!(ssn("123-45-6789"));
        assert!(ssn("123 45 6789"));
        assert!(ssn("123456789"));
        assert!(!ssn("000-12-3456"));
        assert!(!ssn("666-12-3456"));
        assert!(!ssn("912-34-5678"));
        assert!(!ssn("123-00-4567"));
        assert!(!ssn("123-45-0000"));
        assert!(!ssn("111-11-1111"));
        assert!(!ssn("123\t45-6789"));
    }

    /// Validates `itin` behavior for the area range scenario.
    ///
    /// Assertions:
    /// - Ensures 900 and 988 pass, 909 and 989 fail.
    #[test]
    fn test_itin_area_range() {
        assert!(itin("912-34-5678"));
        assert!(itin("900-12-3456"));
        assert!(itin("988 12 3456"));
        assert!(!itin("909-12-3456"));
        assert!(!itin("989-12-3456"));
    }

    /// Validates `tfn` behavior for the weighted checksum scenario.
    ///
    /// Assertions:
    /// - Ensures a published valid TFN passes and a neighbour fails.
    #[test]
    fn test_tfn_checksum() {
        assert!(tfn("123 456 782"));
        assert!(!tfn("123 456 789"));
        assert!(!tfn("000 000 000"));
    }

    /// Validates `nino` behavior for the prefix rules scenario.
    ///
    /// Assertions:
    /// - Ensures administrative and forbidden-letter prefixes fail.
    #[test]
    fn test_nino_prefix_rules() {
        assert!(nino("AB 12 34 56 C"));
        assert!(nino("ab123456c"));
        assert!(!nino("GB123456C"));
        assert!(!nino("DA123456C"));
        assert!(!nino("AO123456C"));
        assert!(!nino("AB12345C"));
    }

    /// Validates `spanish_dni` behavior for the control letter scenario.
    ///
    /// Assertions:
    /// - Ensures DNI and NIE control letters are checked.
    #[test]
    fn test_spanish_dni_control_letter() {
        assert!(spanish_dni("12345678Z"));
        assert!(spanish_dni("12345678-Z"));
        assert!(spanish_dni("X1234567L"));
        assert!(!spanish_dni("12345678A"));
        assert!(!spanish_dni("X1234567Z"));
    }

    /// Validates `italian_fiscal_code` behavior for the check character
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures two known codes pass and a tampered one fails.
    #[test]
    fn test_italian_fiscal_code() {
        assert!(italian_fiscal_code("RSSMRA85T10A562S"));
        assert!(italian_fiscal_code("MRTMTT25D09F205Z"));
        assert!(!italian_fiscal_code("RSSMRA85T10A562T"));
        assert!(!italian_fiscal_code("RSSMRA85T10A562"));
    }

    // ========================================================================
    // Financial
    // ========================================================================

    /// Validates `credit_card` behavior for the Luhn scenario.
    ///
    /// Assertions:
    /// - Ensures Visa and Amex test numbers pass in any separator style.
    /// - Ensures a bad check digit and repeated digits fail.
    #[test]
    fn test_credit_card_luhn() {
        assert!(credit_card("4111111111111111"));
        assert!(credit_card("4111-1111-1111-1111"));
        assert!(credit_card("3782 822463 10005"));
        assert!(!credit_card("4111-1111-1111-1112"));
        assert!(!credit_card("0000 0000 0000 0000"));
        assert!(!credit_card("411111111111"));
    }

    /// Validates `iban` behavior for the mod 97 scenario.
    ///
    /// Assertions:
    /// - Ensures spaced and compact IBANs pass.
    /// - Ensures a single changed digit fails.
    #[test]
    fn test_iban_mod97() {
        assert!(iban("GB82 WEST 1234 5698 7654 32"));
        assert!(iban("DE89370400440532013000"));
        assert!(iban("de89370400440532013000"));
        assert!(!iban("DE89370400440532013001"));
        assert!(!iban("DE8937040044"));
    }

    /// Validates `routing_number` behavior for the 3-7-1 weights scenario.
    ///
    /// Assertions:
    /// - Ensures a real routing number passes and a neighbour fails.
    #[test]
    fn test_routing_number() {
        assert!(routing_number("021000021"));
        assert!(!routing_number("021000022"));
        assert!(!routing_number("000000000"));
    }

    /// Validates `abn` behavior for the mod 89 scenario.
    ///
    /// Assertions:
    /// - Ensures the published example passes and a neighbour fails.
    #[test]
    fn test_abn_checksum() {
        assert!(abn("51 824 753 556"));
        assert!(abn("51824753556"));
        assert!(!abn("51 824 753 557"));
    }

    // ========================================================================
    // Healthcare
    // ========================================================================

    /// Validates `nhs` behavior for the mod 11 scenario.
    ///
    /// Assertions:
    /// - Ensures a valid NHS number passes and a wrong check digit fails.
    #[test]
    fn test_nhs_checksum() {
        assert!(nhs("943 476 5919"));
        assert!(nhs("9434765919"));
        assert!(!nhs("943 476 5918"));
        assert!(!nhs("1111111111"));
    }

    /// Validates `npi` and `dea_number` for the provider identifier scenario.
    ///
    /// Assertions:
    /// - Ensures valid identifiers pass and altered ones fail.
    #[test]
    fn test_provider_identifiers() {
        assert!(npi("1234567893"));
        assert!(!npi("1234567890"));
        assert!(dea_number("AB1234563"));
        assert!(!dea_number("AB1234567"));
        assert!(!dea_number("AB0000000"));
    }

    /// Validates `medicare_au` behavior for the leading digit scenario.
    ///
    /// Assertions:
    /// - Ensures leading digits outside 2-6 fail.
    #[test]
    fn test_medicare_au_leading_digit() {
        assert!(medicare_au("2123 45678 1"));
        assert!(medicare_au("6123-45678-1"));
        assert!(!medicare_au("7123456781"));
        assert!(!medicare_au("212345678"));
    }

    // ========================================================================
    // Guards
    // ========================================================================

    /// Validates `swift_bic` behavior for the country code scenario.
    ///
    /// Assertions:
    /// - Confirms real BICs with and without a branch code pass.
    /// - Ensures words without an assigned country pair fail.
    #[test]
    fn test_swift_bic_country() {
        assert!(swift_bic("DEUTDEFF"));
        assert!(swift_bic("NWBKGB2L"));
        assert!(swift_bic("CHASUS33XXX"));
        assert!(!swift_bic("PASSWORD"));
        assert!(!swift_bic("FIREWALL"));
        assert!(!swift_bic("ABC"));
    }

    /// Validates `ipv4_boundaries` behavior for the embedded address scenario.
    ///
    /// Assertions:
    /// - Ensures a standalone address passes.
    /// - Ensures an address inside a longer dotted run fails.
    #[test]
    fn test_ipv4_boundaries() {
        let text = "host 10.0.0.1 and 1.2.3.4.5";
        assert!(ipv4_boundaries(text, 5, 13));
        assert!(!ipv4_boundaries(text, 18, 25));
        assert!(ipv4_boundaries("10.0.0.1.", 0, 8));
    }

    /// Validates `mac_boundaries` behavior for the hex run scenario.
    ///
    /// Assertions:
    /// - Ensures a standalone MAC passes and an embedded one fails.
    #[test]
    fn test_mac_boundaries() {
        let text = "00:1A:2B:3C:4D:5E";
        assert!(mac_boundaries(text, 0, text.len()));
        let longer = "00:1A:2B:3C:4D:5E:6F";
        assert!(!mac_boundaries(longer, 0, 17));
        assert!(!mac_boundaries(longer, 3, longer.len()));
    }

    /// Validates `has_digit` behavior for the letters-only identifier
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures a word without digits fails.
    #[test]
    fn test_has_digit() {
        assert!(has_digit("BCBS12345678"));
        assert!(!has_digit("template"));
    }
}
