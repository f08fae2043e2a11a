//! Text Segmenter — finds the header block, the candidate name, contact details
//! and the line range of each labeled section.

use crate::resume::model::ContactInfo;
use crate::resume::patterns::{
    ALL_UPPERCASE, EMAIL, LINKEDIN, LOCATION, PHONE, SECTION_PATTERNS, TITLE_CASE_NAME,
    UPPERCASE_HEADER, WEBSITE,
};

const NAME_SCAN_LINES: usize = 5;
const CONTACT_SCAN_LINES: usize = 10;
const GENERIC_HEADER_MAX_CHARS: usize = 40;
const FALLBACK_NAME: &str = "Resume";

// ────────────────────────────────────────────────────────────────────────────
// Section ranges
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
}

/// Half-open `[start, end)` line range of one detected section. `start` is the
/// line after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
}

/// All detected sections in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    ranges: Vec<SectionRange>,
}

impl SectionMap {
    /// Last range for `kind`. A repeated label keeps its own range in `ranges()`,
    /// but a later occurrence replaces an earlier one for the extractors.
    pub fn get(&self, kind: SectionKind) -> Option<SectionRange> {
        self.ranges.iter().rev().copied().find(|r| r.kind == kind)
    }

    pub fn ranges(&self) -> &[SectionRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Which labeled section (if any) this line opens.
pub fn section_label(line: &str) -> Option<SectionKind> {
    let trimmed = line.trim();
    SECTION_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(trimmed))
        .map(|(kind, _)| *kind)
}

/// True for labeled section headers and for short all-uppercase lines.
///
/// The uppercase rule also matches non-standard titles such as
/// "VOLUNTEER WORK"; those end the header block and are skipped as content.
pub fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if section_label(trimmed).is_some() {
        return true;
    }
    trimmed.chars().count() < GENERIC_HEADER_MAX_CHARS && UPPERCASE_HEADER.is_match(trimmed)
}

/// Splits the text into labeled sections. Only label patterns open sections;
/// text before the first label belongs to no section.
pub fn find_sections(lines: &[&str]) -> SectionMap {
    let mut ranges = Vec::new();
    let mut open: Option<(SectionKind, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(kind) = section_label(line) {
            if let Some((open_kind, start)) = open.take() {
                ranges.push(SectionRange {
                    kind: open_kind,
                    start,
                    end: i,
                });
            }
            open = Some((kind, i + 1));
        }
    }

    if let Some((kind, start)) = open {
        ranges.push(SectionRange {
            kind,
            start,
            end: lines.len(),
        });
    }

    SectionMap { ranges }
}

// ────────────────────────────────────────────────────────────────────────────
// Name
// ────────────────────────────────────────────────────────────────────────────

/// Ordinary mixed-case line of reasonable length.
fn is_plain_line(line: &str) -> bool {
    line.chars().count() < 50 && !ALL_UPPERCASE.is_match(line)
}

fn is_title_case(line: &str) -> bool {
    TITLE_CASE_NAME.is_match(line)
}

/// Short all-caps line, e.g. "JANE DOE".
fn is_short_line(line: &str) -> bool {
    line.chars().count() < GENERIC_HEADER_MAX_CHARS
}

/// Acceptance rules for a name candidate, tried in order.
const NAME_RULES: &[fn(&str) -> bool] = &[is_plain_line, is_title_case, is_short_line];

pub fn extract_name(lines: &[&str]) -> String {
    lines
        .iter()
        .take(NAME_SCAN_LINES)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !EMAIL.is_match(line) && !PHONE.is_match(line))
        .find(|line| NAME_RULES.iter().any(|rule| rule(line)))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactField {
    Email,
    Phone,
    Linkedin,
    Location,
    Website,
}

/// Contact fields in extraction order. Each slot is filled at most once; the
/// first line that yields a value wins.
const CONTACT_FIELDS: [ContactField; 5] = [
    ContactField::Email,
    ContactField::Phone,
    ContactField::Linkedin,
    ContactField::Location,
    ContactField::Website,
];

impl ContactField {
    fn slot(self, contact: &mut ContactInfo) -> &mut Option<String> {
        match self {
            ContactField::Email => &mut contact.email,
            ContactField::Phone => &mut contact.phone,
            ContactField::Linkedin => &mut contact.linkedin,
            ContactField::Location => &mut contact.location,
            ContactField::Website => &mut contact.website,
        }
    }

    fn find(self, line: &str) -> Option<String> {
        let pattern = match self {
            ContactField::Email => &*EMAIL,
            ContactField::Phone => &*PHONE,
            ContactField::Linkedin => &*LINKEDIN,
            ContactField::Location => &*LOCATION,
            ContactField::Website => {
                // A LinkedIn URL is not a personal website.
                return WEBSITE
                    .find_iter(line)
                    .map(|m| m.as_str())
                    .find(|url| !url.to_ascii_lowercase().contains("linkedin.com"))
                    .map(str::to_string);
            }
        };
        pattern.find(line).map(|m| m.as_str().to_string())
    }
}

/// Contact details plus the index of the first line after the header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    pub contact: ContactInfo,
    pub header_end: usize,
}

/// Scans the first lines for contact details, stopping at the first section
/// header after line 0.
pub fn extract_contact(lines: &[&str]) -> HeaderBlock {
    let mut contact = ContactInfo::default();
    let mut header_end = 0;

    for (i, line) in lines.iter().take(CONTACT_SCAN_LINES).enumerate() {
        if i > 0 && is_header(line) {
            header_end = i;
            break;
        }

        for field in CONTACT_FIELDS {
            let slot = field.slot(&mut contact);
            if slot.is_none() {
                *slot = field.find(line);
            }
        }

        header_end = i + 1;
    }

    HeaderBlock {
        contact,
        header_end,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
