//! Built-in PII catalog
//!
//! The order of [`BUILTIN_PATTERNS`] is the detector's scan priority for
//! built-ins. It runs in three tiers:
//!
//! 1. Keyword-labelled identifiers, where a label such as `DL:`, `MRN` or
//!    `Name:` precedes the value.
//! 2. Structured and checksum-validated identifiers.
//! 3. Generic shapes that would otherwise swallow digits and capitals
//!    belonging to more specific types.
//!
//! Rule text is the contract. Changing a rule changes what every engine
//! detects, so each edit needs a matching test in `privacy_integration`.

use super::registry::MatchCheck;
use super::types::{ConfidenceScore, DetectionMethod, PatternCategory, Region};
use super::validators;

/// Static description of a built-in pattern, compiled lazily by the registry.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinPattern {
    pub id: &'static str,
    pub category: PatternCategory,
    pub region: Region,
    pub rule: &'static str,
    pub redaction: &'static str,
    pub confidence: f64,
    pub method: DetectionMethod,
    pub check: MatchCheck,
}

impl BuiltinPattern {
    const fn labelled(
        id: &'static str,
        category: PatternCategory,
        region: Region,
        rule: &'static str,
        redaction: &'static str,
    ) -> Self {
        Self {
            id,
            category,
            region,
            rule,
            redaction,
            confidence: ConfidenceScore::LABELLED.value(),
            method: DetectionMethod::Regex,
            check: MatchCheck::None,
        }
    }

    const fn structured(
        id: &'static str,
        category: PatternCategory,
        region: Region,
        rule: &'static str,
        redaction: &'static str,
    ) -> Self {
        Self {
            id,
            category,
            region,
            rule,
            redaction,
            confidence: ConfidenceScore::STRUCTURED.value(),
            method: DetectionMethod::Regex,
            check: MatchCheck::None,
        }
    }

    const fn generic(
        id: &'static str,
        category: PatternCategory,
        region: Region,
        rule: &'static str,
        redaction: &'static str,
    ) -> Self {
        Self {
            id,
            category,
            region,
            rule,
            redaction,
            confidence: ConfidenceScore::GENERIC.value(),
            method: DetectionMethod::Regex,
            check: MatchCheck::None,
        }
    }

    /// A structurally validated value: the validator runs on capture group 1.
    const fn validated(self, validator: fn(&str) -> bool) -> Self {
        Self {
            confidence: ConfidenceScore::VALIDATED.value(),
            method: DetectionMethod::ChecksumValidation,
            check: MatchCheck::Validate(validator),
            ..self
        }
    }

    /// Runs `validator` on capture group 1 without raising confidence.
    const fn checked(self, validator: fn(&str) -> bool) -> Self {
        Self { check: MatchCheck::Validate(validator), ..self }
    }

    /// Rejects letters-only captures.
    const fn requires_digit(self) -> Self {
        self.checked(validators::has_digit)
    }

    const fn guarded(self, guard: fn(&str, usize, usize) -> bool) -> Self {
        Self { check: MatchCheck::Guard(guard), ..self }
    }

    const fn with_confidence(self, confidence: f64) -> Self {
        Self { confidence, ..self }
    }

    /// Moves a validator from capture group 1 to the whole match.
    const fn whole_match(self) -> Self {
        match self.check {
            MatchCheck::Validate(validator) => {
                Self { check: MatchCheck::ValidateWhole(validator), ..self }
            }
            _ => self,
        }
    }
}

use PatternCategory::{Biometric, Financial, Healthcare, National, RegionalGovernment, Universal};
use Region::{Au, Eu, Global, Uk, Us};

pub const BUILTIN_PATTERNS: &[BuiltinPattern] = &[
    // ------------------------------------------------------------------------
    // Keyword-labelled
    // ------------------------------------------------------------------------
    BuiltinPattern::labelled(
        "driver_license_us",
        RegionalGovernment,
        Us,
        r"(?i)\b(?:DL|D\.L\.|Driver'?s?\s*License)[\s:#]*([A-Z]?\d{6,9})\b",
        "[DL_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "passport_us",
        National,
        Us,
        r"(?i)\b(?:Passport)[\s:#]*([A-Z]?\d{8,9})\b",
        "[PASSPORT_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "ein",
        RegionalGovernment,
        Us,
        r"(?i)\b(?:EIN)[\s:#]*(\d{2}[-\s]?\d{7})\b",
        "[EIN_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "abn",
        RegionalGovernment,
        Au,
        r"(?i)\b(?:ABN)[\s:#]*(\d{2}[-\s]?\d{3}[-\s]?\d{3}[-\s]?\d{3})\b",
        "[ABN_REDACTED]",
    )
    .validated(validators::abn),
    BuiltinPattern::labelled(
        "acn",
        RegionalGovernment,
        Au,
        r"(?i)\b(?:ACN)[\s:#]*(\d{3}[-\s]?\d{3}[-\s]?\d{3})\b",
        "[ACN_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "bank_account",
        Financial,
        Global,
        r"(?i)\b(?:Account(?:\s+Number)?|Acct|A/C)[\s:#]*(\d{8,17})\b",
        "[BANK_ACCOUNT_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "routing_number",
        Financial,
        Us,
        r"(?i)\b(?:Routing(?:\s+Number)?|ABA|RTN)[\s:#]*(\d{9})\b",
        "[ROUTING_REDACTED]",
    )
    .validated(validators::routing_number),
    BuiltinPattern::labelled(
        "cvv",
        Financial,
        Global,
        r"(?i)\b(?:CVV|CVC|CVV2|CVC2|CSC)[\s:]*(\d{3,4})\b",
        "[CVV_NEVER_STORE]",
    ),
    BuiltinPattern::labelled(
        "card_expiry",
        Financial,
        Global,
        r"(?i)\b(?:Exp(?:iry|iration)?|Valid\s*(?:Thru|Through))[\s:]*(\d{2}[/\-]\d{2,4})\b",
        "[EXPIRY_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "patient_id",
        Healthcare,
        Us,
        r"(?i)\b(?:Patient(?:\s*(?:ID|#|No\.?))?|PID)[\s:#]*([A-Z0-9\-]{5,15})\b",
        "[PATIENT_ID_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::labelled(
        "mrn",
        Healthcare,
        Us,
        r"(?i)\b(?:MRN|Medical\s*Record(?:\s*Number)?)[\s:#]*(\d{6,10})\b",
        "[MRN_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "npi",
        Healthcare,
        Us,
        r"(?i)\b(?:(?:Provider\s+)?NPI(?:\s*(?:Number|#))?)[\s:#]*(\d{10})\b",
        "[NPI_REDACTED]",
    )
    .validated(validators::npi),
    BuiltinPattern::labelled(
        "dea_number",
        Healthcare,
        Us,
        r"(?i)\b(?:DEA(?:\s*Number)?)[\s:#]*([A-Z][A-Z0-9]\d{7})\b",
        "[DEA_REDACTED]",
    )
    .validated(validators::dea_number),
    BuiltinPattern::labelled(
        "icd_code",
        Healthcare,
        Global,
        r"(?i)\b(?:ICD(?:[-\s]?10)?|Diagnosis|Dx)[\s:]*([A-Z]\d{2}(?:\.\d{1,4})?[A-Z]?)\b",
        "[DIAGNOSIS_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "cpt_code",
        Healthcare,
        Us,
        r"(?i)\b(?:CPT(?:\s*(?:Code|#))?|Procedure)[\s:#]*(\d{5})\b",
        "[PROCEDURE_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "biometric_id",
        Biometric,
        Global,
        r"(?i)\b(?:Biometric(?:\s*(?:ID|Identifier|Data\s*ID))?|Bio[-\s]?ID)[\s:#]*([A-Z0-9][A-Z0-9\-]{4,19})\b",
        "[BIOMETRIC_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::labelled(
        "face_id",
        Biometric,
        Global,
        r"(?i)\b(?:Face[-\s]?ID|FaceID|Facial[-\s]?(?:ID|Recognition(?:\s*(?:Data\s*)?ID)?)|Face[-\s]?(?:Recognition|Template)[-\s]?ID?)[\s:#]*([A-Z0-9][A-Z0-9\-]{4,19})\b",
        "[FACE_ID_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::labelled(
        "fingerprint_id",
        Biometric,
        Global,
        r"(?i)\b(?:Fingerprint(?:\s*(?:ID|Record|Template|Data[-\s]*ID))?|FP[-\s]?ID|Print[-\s]?ID)[\s:#]*([A-Z0-9][A-Z0-9\-]{4,19})\b",
        "[FINGERPRINT_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::labelled(
        "voice_id",
        Biometric,
        Global,
        r"(?i)\b(?:Voice[-\s]?print(?:[-\s]?ID)?|Voice[-\s]?ID)[\s:#]*([A-Z0-9][A-Z0-9\-]{4,19})\b",
        "[VOICE_ID_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::labelled(
        "iris_id",
        Biometric,
        Global,
        r"(?i)\b(?:Iris|Retina)[-\s]?(?:Scan[-\s]?)?ID[\s:#]*([A-Z0-9][A-Z0-9\-]{4,19})\b",
        "[IRIS_ID_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::labelled(
        "dna_profile",
        Biometric,
        Global,
        r"(?i)\bDNA[-\s]?(?:(?:Profile|Sample|Sequence)[-\s]?)?(?:ID|#)[\s:#]*([A-Z0-9][A-Z0-9\-]{4,19})\b",
        "[DNA_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::labelled(
        "date_of_birth",
        Universal,
        Global,
        r"(?i)\b(?:DOB|Date\s*of\s*Birth|Born|Birthday)[\s:]*(\d{1,2}[/\-\.]\d{1,2}[/\-\.]\d{2,4})\b",
        "[DOB_REDACTED]",
    ),
    BuiltinPattern::labelled(
        "name",
        Universal,
        Global,
        r"\b(?i:(?:full|first|last|patient|customer)[ \t]*)?(?i:name)[ \t]*:[ \t]*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){0,2})\b",
        "[NAME_REDACTED]",
    )
    .with_confidence(0.7),
    BuiltinPattern::labelled(
        "health_plan_id",
        Healthcare,
        Us,
        r"(?i)\b(?:Member\s*ID|Subscriber\s*ID|Policy|Insurance\s*ID|Group|Health\s*Plan|BCBS|Aetna|Cigna|UHC|United)[\s:#]*([A-Z0-9]{6,15})\b",
        "[HEALTH_PLAN_REDACTED]",
    )
    .requires_digit(),
    // ------------------------------------------------------------------------
    // Structured and checksum-validated
    // ------------------------------------------------------------------------
    // Query parts stop at brackets so the rule never spans a redaction token.
    BuiltinPattern::structured(
        "url_with_pii",
        Universal,
        Global,
        r"(?i)\bhttps?://[^\s?#\[\]]+\?[^\s#\[\]]*?\b(?:email|user(?:name)?|name|ssn|phone|dob|token|password)=[^\s#\[\]]*",
        "[URL_REDACTED]",
    ),
    BuiltinPattern::structured(
        "email",
        Universal,
        Global,
        r"\b([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})\b",
        "[EMAIL_REDACTED]",
    ),
    BuiltinPattern::structured(
        "credit_card",
        Financial,
        Global,
        r"\b((?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|3[47][0-9]{13}|6(?:011|5[0-9]{2})[0-9]{12}|(?:2131|1800|35\d{3})\d{11}))\b|\b(\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4})\b|\b(\d{4}[-\s]?\d{6}[-\s]?\d{5})\b",
        "[CARD_REDACTED]",
    )
    .validated(validators::credit_card)
    .whole_match(),
    BuiltinPattern::structured(
        "ssn",
        National,
        Us,
        r"\b(\d{3}[-\s]?\d{2}[-\s]?\d{4})\b",
        "[SSN_REDACTED]",
    )
    .validated(validators::ssn),
    BuiltinPattern::structured(
        "itin",
        National,
        Us,
        r"\b(9\d{2}[-\s]?\d{2}[-\s]?\d{4})\b",
        "[ITIN_REDACTED]",
    )
    .validated(validators::itin),
    BuiltinPattern::structured(
        "iban",
        Financial,
        Eu,
        r"\b([A-Z]{2}\d{2}[-\s]?(?:[A-Z0-9]{4}[-\s]?){2,7}[A-Z0-9]{1,4})\b",
        "[IBAN_REDACTED]",
    )
    .validated(validators::iban),
    BuiltinPattern::structured(
        "nino_uk",
        National,
        Uk,
        r"(?i)\b([A-CEGHJ-PR-TW-Z]{2}[-\s]?\d{2}[-\s]?\d{2}[-\s]?\d{2}[-\s]?[A-D])\b",
        "[NINO_REDACTED]",
    )
    .validated(validators::nino),
    BuiltinPattern::structured(
        "nhs_uk",
        Healthcare,
        Uk,
        r"\b(\d{3}[-\s]?\d{3}[-\s]?\d{4})\b",
        "[NHS_REDACTED]",
    )
    .validated(validators::nhs),
    BuiltinPattern::structured(
        "medicare_au",
        Healthcare,
        Au,
        r"\b(\d{4} \d{5} \d|\d{4}-\d{5}-\d|\d{10})\b",
        "[MEDICARE_REDACTED]",
    )
    .validated(validators::medicare_au),
    BuiltinPattern::structured(
        "tfn",
        National,
        Au,
        r"\b(\d{3}[-\s]?\d{3}[-\s]?\d{3})\b",
        "[TFN_REDACTED]",
    )
    .validated(validators::tfn),
    BuiltinPattern::structured(
        "medicare_us",
        Healthcare,
        Us,
        r"\b([1-9][AC-HJKMNP-RT-Y][AC-HJKMNP-RT-Y0-9]\d-?[AC-HJKMNP-RT-Y][AC-HJKMNP-RT-Y0-9]\d-?[AC-HJKMNP-RT-Y]{2}\d{2})\b",
        "[MBI_REDACTED]",
    ),
    BuiltinPattern::structured(
        "spanish_dni",
        National,
        Eu,
        r"\b([XYZ]?\d{7,8}[-\s]?[A-Z])\b",
        "[ES_DNI_REDACTED]",
    )
    .validated(validators::spanish_dni),
    BuiltinPattern::structured(
        "italian_fiscal_code",
        National,
        Eu,
        r"\b([A-Z]{6}\d{2}[A-EHLMPR-T]\d{2}[A-Z]\d{3}[A-Z])\b",
        "[IT_CF_REDACTED]",
    )
    .validated(validators::italian_fiscal_code),
    BuiltinPattern::structured(
        "uk_driving_licence",
        RegionalGovernment,
        Uk,
        r"\b([A-Z9]{5}\d{6}[A-Z9]{2}\d[A-Z]{2})\b",
        "[UK_DL_REDACTED]",
    ),
    BuiltinPattern::structured(
        "ipv6_address",
        Universal,
        Global,
        r"\b((?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4})\b",
        "[IPV6_REDACTED]",
    ),
    BuiltinPattern::structured(
        "mac_address",
        Universal,
        Global,
        r"\b((?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2})\b",
        "[MAC_REDACTED]",
    )
    .guarded(validators::mac_boundaries),
    BuiltinPattern::structured(
        "ip_address",
        Universal,
        Global,
        r"\b((?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?))\b",
        "[IP_REDACTED]",
    )
    .guarded(validators::ipv4_boundaries),
    BuiltinPattern::structured(
        "crypto_address",
        Financial,
        Global,
        r"\b((?:bc1|[13])[a-zA-HJ-NP-Z0-9]{25,39})\b|\b(0x[a-fA-F0-9]{40})\b",
        "[CRYPTO_REDACTED]",
    ),
    BuiltinPattern::structured(
        "phone_us",
        Universal,
        Us,
        r"\b(?:\+?1[-.\s]?)?\(?([2-9]\d{2})\)?[-.\s]?(\d{3})[-.\s]?(\d{4})\b",
        "[PHONE_US_REDACTED]",
    ),
    BuiltinPattern::structured(
        "phone_au",
        Universal,
        Au,
        r"\b(?:\+?61[-.\s]?)?0?4\d{2}[-.\s]?\d{3}[-.\s]?\d{3}\b|\b(?:\+?61[-.\s]?)?0?[2378][-.\s]?\d{4}[-.\s]?\d{4}\b",
        "[PHONE_AU_REDACTED]",
    ),
    BuiltinPattern::structured(
        "vat_eu",
        RegionalGovernment,
        Eu,
        r"\b((?:AT|BE|BG|CY|CZ|DE|DK|EE|EL|ES|FI|FR|HR|HU|IE|IT|LT|LU|LV|MT|NL|PL|PT|RO|SE|SI|SK)[A-Z0-9]{8,12})\b",
        "[VAT_REDACTED]",
    )
    .requires_digit(),
    BuiltinPattern::structured(
        "postcode_uk",
        Universal,
        Uk,
        r"(?i)\b(GIR\s*0AA|[A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2})\b",
        "[POSTCODE_UK_REDACTED]",
    ),
    BuiltinPattern::structured(
        "french_ssn",
        National,
        Eu,
        r"\b([12]\s?\d{2}\s?\d{2}\s?\d{2}\s?\d{3}\s?\d{3}\s?\d{2})\b",
        "[FR_SSN_REDACTED]",
    ),
    BuiltinPattern::structured(
        "phone_eu",
        Universal,
        Eu,
        r"\b\+?(3[0-9]|4[0-9]|5[0-9])[-.\s]?\d{1,3}[-.\s]?\d{2,4}[-.\s]?\d{2,4}[-.\s]?\d{2,4}\b",
        "[PHONE_EU_REDACTED]",
    ),
    BuiltinPattern::structured(
        "phone_generic",
        Universal,
        Global,
        r"\b(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
        "[PHONE_REDACTED]",
    ),
    BuiltinPattern::structured(
        "address",
        Universal,
        Global,
        r"(?i)\b\d{1,5}(?:[ \t]+\w+){1,4}[ \t]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Court|Ct|Way|Place|Pl)\b",
        "[ADDRESS_REDACTED]",
    ),
    // ------------------------------------------------------------------------
    // Generic shapes
    // ------------------------------------------------------------------------
    BuiltinPattern::generic(
        "swift_bic",
        Financial,
        Global,
        r"\b([A-Z]{6}[A-Z0-9]{2}(?:[A-Z0-9]{3})?)\b",
        "[SWIFT_REDACTED]",
    )
    .checked(validators::swift_bic),
    BuiltinPattern::generic(
        "german_id",
        National,
        Eu,
        r"\b([CFGHJKLMNPRTVWXYZ][0-9CFGHJKLMNPRTVWXYZ]{9})\b",
        "[DE_ID_REDACTED]",
    ),
    BuiltinPattern::generic(
        "sort_code_uk",
        Financial,
        Uk,
        r"\b(\d{2}[-\s]?\d{2}[-\s]?\d{2})\b",
        "[SORT_CODE_REDACTED]",
    ),
];
