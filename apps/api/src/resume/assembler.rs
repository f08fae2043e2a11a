use tracing::debug;

use crate::resume::extractors::{
    parse_certifications, parse_education, parse_experience, parse_skills, parse_summary,
};
use crate::resume::model::ResumeData;
use crate::resume::patterns::{EMAIL, PHONE};
use crate::resume::segmenter::{extract_contact, extract_name, find_sections, SectionKind};

/// Header-area lines considered for the professional title (after the name).
const TITLE_SCAN_LINES: usize = 5;

/// Parses free-form resume text into a `ResumeData` record.
///
/// Pure and deterministic: the same text always yields the same record, and
/// malformed input degrades to empty fields instead of failing.
pub fn parse_resume(text: &str) -> ResumeData {
    let lines: Vec<&str> = text.split('\n').collect();

    let name = extract_name(&lines);
    let header = extract_contact(&lines);
    let sections = find_sections(&lines);

    let summary = sections
        .get(SectionKind::Summary)
        .map(|range| parse_summary(&lines, range))
        .unwrap_or_default();
    let experience = sections
        .get(SectionKind::Experience)
        .map(|range| parse_experience(&lines, range))
        .unwrap_or_default();
    let education = sections
        .get(SectionKind::Education)
        .map(|range| parse_education(&lines, range))
        .unwrap_or_default();
    let skills = sections
        .get(SectionKind::Skills)
        .map(|range| parse_skills(&lines, range))
        .unwrap_or_default();
    let certifications = sections
        .get(SectionKind::Certifications)
        .map(|range| parse_certifications(&lines, range));

    let title = experience
        .first()
        .map(|entry| entry.title.as_str())
        .filter(|title| !title.is_empty() && !title.contains(" | "))
        .map(str::to_string)
        .or_else(|| {
            // Without any labeled section there is no header block to read from.
            if sections.is_empty() {
                None
            } else {
                header_title(&lines, header.header_end, &name)
            }
        })
        .unwrap_or_default();

    debug!(
        sections = sections.ranges().len(),
        experience = experience.len(),
        education = education.len(),
        skills = skills.len(),
        has_certifications = certifications.is_some(),
        "Parsed resume text"
    );

    ResumeData {
        name,
        title,
        contact: header.contact,
        summary,
        experience,
        education,
        skills,
        certifications,
    }
}

/// First plausible title line in the header block, skipping the name line.
fn header_title(lines: &[&str], header_end: usize, name: &str) -> Option<String> {
    let end = header_end.min(TITLE_SCAN_LINES).min(lines.len());
    lines
        .get(1..end)?
        .iter()
        .map(|line| line.trim())
        .find(|line| {
            !line.is_empty()
                && !EMAIL.is_match(line)
                && !PHONE.is_match(line)
                && !line.contains(" | ")
                && *line != name
        })
        .map(str::to_string)
}
