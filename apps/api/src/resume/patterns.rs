//! Compiled pattern tables shared by the segmenter and the entry extractors.
//!
//! Every table is compiled once on first use. The patterns are heuristics:
//! they over- and under-match in known ways (see the extractor tests).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resume::segmenter::SectionKind;

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

fn compile(pattern: &str) -> Regex {
    // Patterns are compile-time constants; a failure here is a programming error
    // caught by `test_all_patterns_compile`.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

/// Section label patterns, checked in this order. Anchored at the start of the
/// trimmed line only, so "SKILLS & TOOLS" and "Education:" match as prefixes.
pub static SECTION_PATTERNS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    vec![
        (
            SectionKind::Summary,
            compile(r"(?i)^(?:SUMMARY|PROFESSIONAL SUMMARY|PROFILE|ABOUT|OBJECTIVE|CAREER SUMMARY)"),
        ),
        (
            SectionKind::Experience,
            compile(r"(?i)^(?:EXPERIENCE|WORK EXPERIENCE|PROFESSIONAL EXPERIENCE|EMPLOYMENT|WORK HISTORY)"),
        ),
        (
            SectionKind::Education,
            compile(r"(?i)^(?:EDUCATION|ACADEMIC|ACADEMICS|EDUCATIONAL BACKGROUND)"),
        ),
        (
            SectionKind::Skills,
            compile(r"(?i)^(?:SKILLS|TECHNICAL SKILLS|CORE COMPETENCIES|KEY SKILLS|COMPETENCIES)"),
        ),
        (
            SectionKind::Certifications,
            compile(r"(?i)^(?:CERTIFICATIONS|CERTIFICATES|LICENSES|CREDENTIALS)"),
        ),
    ]
});

/// Generic header fallback: uppercase letters, whitespace and ampersands only.
pub static UPPERCASE_HEADER: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z\s&]+$"));

pub static EMAIL: Lazy<Regex> = Lazy::new(|| compile(r"[\w.-]+@[\w.-]+\.\w+"));

pub static PHONE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}"));

pub static LINKEDIN: Lazy<Regex> = Lazy::new(|| compile(r"(?i)linkedin\.com/in/[\w-]+"));

/// "City, ST". Mixed case inside the city name is allowed (McAllen, O'Fallon).
pub static LOCATION: Lazy<Regex> =
    Lazy::new(|| compile(r"[A-Z][a-zA-Z'.-]+(?:\s[A-Z][a-zA-Z'.-]+)*,\s*[A-Z]{2}"));

pub static WEBSITE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)(?:https?://|www\.)[^\s|,]+"));

/// Title-case name: "Jane Doe", "Ada Lovelace".
pub static TITLE_CASE_NAME: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z][a-z]+(?:\s[A-Z][a-z]+)*$"));

pub static ALL_UPPERCASE: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z\s]+$"));

/// Month-year range: "Jan 2020 - Present", "March 2018 to Dec 2019". The end
/// year is optional ("Jan 2020 - Mar"), but consumed when present.
pub static MONTH_DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i){MONTH}\.?\s*\d{{4}}\s*[-–—to]+\s*(?:{MONTH}(?:\.?\s*\d{{4}})?|Present|Current)"
    ))
});

/// Bare year range: "2018 - 2020", "2021–Current".
pub static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\d{4}\s*[-–—to]+\s*(?:\d{4}|Present|Current)"));

/// Graduation-style year: 19xx or 20xx as a standalone token.
pub static EDUCATION_YEAR: Lazy<Regex> = Lazy::new(|| compile(r"\b(?:19|20)\d{2}\b"));

pub static DEGREE_KEYWORD: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)degree|bachelor|master|phd|associate|diploma"));

pub static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| compile(r"^[•\-*]\s*"));

pub static SKILL_DELIMITER: Lazy<Regex> = Lazy::new(|| compile(r"[,;|]"));

/// Removes a leading bullet marker ("• ", "- ", "* ") if present.
pub fn strip_bullet(line: &str) -> &str {
    match BULLET_MARKER.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

pub fn is_bullet(line: &str) -> bool {
    BULLET_MARKER.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(SECTION_PATTERNS.len(), 5);
        for pattern in [
            &*UPPERCASE_HEADER,
            &*EMAIL,
            &*PHONE,
            &*LINKEDIN,
            &*LOCATION,
            &*WEBSITE,
            &*TITLE_CASE_NAME,
            &*ALL_UPPERCASE,
            &*MONTH_DATE_RANGE,
            &*YEAR_RANGE,
            &*EDUCATION_YEAR,
            &*DEGREE_KEYWORD,
            &*BULLET_MARKER,
            &*SKILL_DELIMITER,
        ] {
            assert!(!pattern.as_str().is_empty());
        }
    }

    #[test]
    fn test_month_range_matches_both_ends() {
        let m = MONTH_DATE_RANGE
            .find("Engineer | Acme Jan 2020 - Mar 2021")
            .unwrap();
        assert_eq!(m.as_str(), "Jan 2020 - Mar 2021");
    }

    #[test]
    fn test_month_range_present_and_sept() {
        assert!(MONTH_DATE_RANGE.is_match("Sept 2019 to Present"));
        assert!(MONTH_DATE_RANGE.is_match("january 2020 – current"));
    }

    #[test]
    fn test_year_range() {
        assert_eq!(YEAR_RANGE.find("2018 - 2020").unwrap().as_str(), "2018 - 2020");
        assert!(YEAR_RANGE.is_match("2021–Current"));
        assert!(!YEAR_RANGE.is_match("555-000-1111"));
    }

    #[test]
    fn test_phone_formats() {
        for phone in ["555-000-1111", "(555) 000-1111", "+1 555.000.1111", "5550001111"] {
            assert!(PHONE.is_match(phone), "{phone} should match");
        }
    }

    #[test]
    fn test_location_mixed_case_city() {
        let m = LOCATION.find("jane@x.com | McAllen, TX").unwrap();
        assert_eq!(m.as_str(), "McAllen, TX");
    }

    #[test]
    fn test_section_label_matches_prefix() {
        let experience = &SECTION_PATTERNS[1].1;
        assert!(experience.is_match("Experience"));
        assert!(experience.is_match("WORK EXPERIENCE"));
        assert!(SECTION_PATTERNS[3].1.is_match("SKILLS & TOOLS"));
        assert!(SECTION_PATTERNS[2].1.is_match("Education:"));
    }

    #[test]
    fn test_section_label_prefix_known_limitation() {
        // Labels have no trailing boundary, so prose that starts with a label
        // word is still taken for a header.
        assert!(SECTION_PATTERNS[1].1.is_match("Experienced engineer with 10 years"));
        assert!(SECTION_PATTERNS[3].1.is_match("SKILLSET"));
    }

    #[test]
    fn test_month_range_end_year_optional() {
        assert_eq!(
            MONTH_DATE_RANGE.find("Engineer | Acme Jan 2020 - Mar").unwrap().as_str(),
            "Jan 2020 - Mar"
        );
        // A year after the end month is kept in the match.
        assert_eq!(
            MONTH_DATE_RANGE.find("Jan 2020 - Mar 2021, remote").unwrap().as_str(),
            "Jan 2020 - Mar 2021"
        );
    }

    #[test]
    fn test_strip_bullet_variants() {
        assert_eq!(strip_bullet("• Shipped X"), "Shipped X");
        assert_eq!(strip_bullet("- Shipped X"), "Shipped X");
        assert_eq!(strip_bullet("*Shipped X"), "Shipped X");
        assert_eq!(strip_bullet("Shipped X"), "Shipped X");
    }
}
