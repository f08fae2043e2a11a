//! Entry extractors — turn the lines of one section into structured records.
//!
//! None of these fail: unparseable lines degrade to empty strings and lists.
//! Experience and education are single-pass state machines with named states.

use crate::resume::model::{EducationEntry, ExperienceEntry};
use crate::resume::patterns::{
    is_bullet, strip_bullet, DEGREE_KEYWORD, EDUCATION_YEAR, MONTH_DATE_RANGE, SKILL_DELIMITER,
    YEAR_RANGE,
};
use crate::resume::segmenter::{is_header, SectionRange};

/// Trimmed, non-empty lines inside `range`. Out-of-bounds ranges are clamped.
fn section_lines<'a>(lines: &'a [&'a str], range: SectionRange) -> impl Iterator<Item = &'a str> {
    let end = range.end.min(lines.len());
    let start = range.start.min(end);
    lines[start..end]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

pub fn parse_summary(lines: &[&str], range: SectionRange) -> String {
    section_lines(lines, range)
        .filter(|line| !is_header(line))
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Delimiters that separate a job title from a company, in priority order.
const TITLE_COMPANY_DELIMITERS: [&str; 3] = [" | ", " at ", ", "];

/// Finds the date range on a line: month-year form first, then bare years.
fn find_date_range(line: &str) -> Option<&str> {
    MONTH_DATE_RANGE
        .find(line)
        .or_else(|| YEAR_RANGE.find(line))
        .map(|m| m.as_str())
}

/// Splits "Title | Company" style text on the first delimiter that occurs.
/// Everything before is the title, the next segment is the company.
pub fn split_title_company(text: &str) -> (String, String) {
    for delimiter in TITLE_COMPANY_DELIMITERS {
        if text.contains(delimiter) {
            let mut parts = text.split(delimiter).map(str::trim);
            let title = parts.next().unwrap_or_default().to_string();
            let company = parts.next().unwrap_or_default().to_string();
            return (title, company);
        }
    }
    (text.to_string(), String::new())
}

/// A dated line with the date text removed: "Senior Engineer | Acme".
fn strip_dates(line: &str) -> String {
    let without_month = MONTH_DATE_RANGE.replace(line, "");
    let without_years = YEAR_RANGE.replace(&without_month, "");
    without_years
        .trim()
        .trim_matches(|c: char| c == '|' || c == ',' || c.is_whitespace())
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExperienceState {
    /// No entry opened yet. Bullets seen here carry over to the first entry.
    NoEntry { pending_bullets: Vec<String> },
    /// An entry is open and still collecting title/company/dates.
    AccumulatingEntry(ExperienceEntry),
    /// The open entry has started its bullet list.
    AccumulatingBullets(ExperienceEntry),
}

impl Default for ExperienceState {
    fn default() -> Self {
        ExperienceState::NoEntry {
            pending_bullets: Vec::new(),
        }
    }
}

impl ExperienceState {
    fn on_bullet(self, bullet: String) -> Self {
        match self {
            ExperienceState::NoEntry {
                mut pending_bullets,
            } => {
                pending_bullets.push(bullet);
                ExperienceState::NoEntry { pending_bullets }
            }
            ExperienceState::AccumulatingEntry(mut entry)
            | ExperienceState::AccumulatingBullets(mut entry) => {
                entry.bullets.push(bullet);
                ExperienceState::AccumulatingBullets(entry)
            }
        }
    }

    /// A line carrying a date range. Usually opens a new entry; a bare date line
    /// right under an undated title line completes that entry instead.
    fn on_dated_line(self, dates: &str, rest: String, out: &mut Vec<ExperienceEntry>) -> Self {
        if rest.is_empty() {
            if let ExperienceState::AccumulatingEntry(mut entry) = self {
                if entry.dates.is_empty() {
                    entry.dates = dates.to_string();
                    return ExperienceState::AccumulatingEntry(entry);
                }
                return Self::open(ExperienceState::AccumulatingEntry(entry), dates, rest, out);
            }
        }
        Self::open(self, dates, rest, out)
    }

    fn open(previous: Self, dates: &str, rest: String, out: &mut Vec<ExperienceEntry>) -> Self {
        let carried = previous.flush(out);
        let (title, company) = split_title_company(&rest);
        ExperienceState::AccumulatingEntry(ExperienceEntry {
            title,
            company,
            dates: dates.to_string(),
            bullets: carried,
        })
    }

    fn on_plain_line(self, line: &str) -> Self {
        match self {
            ExperienceState::NoEntry { pending_bullets } => {
                ExperienceState::AccumulatingEntry(ExperienceEntry {
                    title: line.to_string(),
                    bullets: pending_bullets,
                    ..Default::default()
                })
            }
            ExperienceState::AccumulatingEntry(mut entry) => {
                if entry.company.is_empty() {
                    entry.company = line.to_string();
                }
                ExperienceState::AccumulatingEntry(entry)
            }
            ExperienceState::AccumulatingBullets(mut entry) => {
                if entry.company.is_empty() {
                    entry.company = line.to_string();
                }
                ExperienceState::AccumulatingBullets(entry)
            }
        }
    }

    /// Emits the open entry if it has a title. Returns the bullets that were not
    /// emitted (entries without a title hand their bullets to the next entry).
    fn flush(self, out: &mut Vec<ExperienceEntry>) -> Vec<String> {
        match self {
            ExperienceState::NoEntry { pending_bullets } => pending_bullets,
            ExperienceState::AccumulatingEntry(entry)
            | ExperienceState::AccumulatingBullets(entry) => {
                if entry.title.is_empty() {
                    entry.bullets
                } else {
                    out.push(entry);
                    Vec::new()
                }
            }
        }
    }
}

pub fn parse_experience(lines: &[&str], range: SectionRange) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    let mut state = ExperienceState::default();

    for line in section_lines(lines, range) {
        state = if is_bullet(line) {
            state.on_bullet(strip_bullet(line).to_string())
        } else if let Some(dates) = find_date_range(line) {
            state.on_dated_line(dates, strip_dates(line), &mut entries)
        } else {
            state.on_plain_line(line)
        };
    }

    state.flush(&mut entries);
    entries
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// Delimiters that separate a degree from a school, in priority order.
const DEGREE_SCHOOL_DELIMITERS: [&str; 2] = [" | ", " - "];

fn starts_education_entry(line: &str) -> bool {
    EDUCATION_YEAR.is_match(line) || line.contains(" | ") || DEGREE_KEYWORD.is_match(line)
}

fn strip_year(text: &str) -> String {
    EDUCATION_YEAR.replace(text, "").trim().to_string()
}

fn parse_education_line(line: &str) -> EducationEntry {
    let year = EDUCATION_YEAR
        .find(line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let (degree, school) = DEGREE_SCHOOL_DELIMITERS
        .iter()
        .find(|delimiter| line.contains(*delimiter))
        .map(|delimiter| {
            let mut parts = line.split(delimiter).map(str::trim);
            let degree = strip_year(parts.next().unwrap_or_default());
            let school = strip_year(parts.next().unwrap_or_default());
            (degree, school)
        })
        .unwrap_or_else(|| (strip_year(line), String::new()));

    EducationEntry {
        degree,
        school,
        year,
        details: None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum EducationState {
    #[default]
    NoEntry,
    AccumulatingEntry(EducationEntry),
}

impl EducationState {
    fn flush(self, out: &mut Vec<EducationEntry>) {
        if let EducationState::AccumulatingEntry(entry) = self {
            if !entry.degree.is_empty() || !entry.school.is_empty() {
                out.push(entry);
            }
        }
    }
}

pub fn parse_education(lines: &[&str], range: SectionRange) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    let mut state = EducationState::default();

    for line in section_lines(lines, range) {
        state = if starts_education_entry(line) {
            state.flush(&mut entries);
            EducationState::AccumulatingEntry(parse_education_line(line))
        } else {
            match state {
                // Lines before the first entry trigger carry no structure.
                EducationState::NoEntry => EducationState::NoEntry,
                EducationState::AccumulatingEntry(mut entry) => {
                    if entry.school.is_empty() {
                        entry.school = line.to_string();
                    } else {
                        let details = match entry.details.take() {
                            Some(existing) => format!("{existing} {line}"),
                            None => line.to_string(),
                        };
                        entry.details = Some(details);
                    }
                    EducationState::AccumulatingEntry(entry)
                }
            }
        };
    }

    state.flush(&mut entries);
    entries
}

// ────────────────────────────────────────────────────────────────────────────
// Skills & certifications
// ────────────────────────────────────────────────────────────────────────────

pub fn parse_skills(lines: &[&str], range: SectionRange) -> Vec<String> {
    let mut skills = Vec::new();

    for line in section_lines(lines, range).filter(|line| !is_header(line)) {
        let cleaned = strip_bullet(line);
        let tokens: Vec<&str> = SKILL_DELIMITER
            .split(cleaned)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.len() > 1 {
            skills.extend(tokens.into_iter().map(str::to_string));
        } else if !cleaned.is_empty() {
            skills.push(cleaned.to_string());
        }
    }

    skills
}

pub fn parse_certifications(lines: &[&str], range: SectionRange) -> Vec<String> {
    section_lines(lines, range)
        .filter(|line| !is_header(line))
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
