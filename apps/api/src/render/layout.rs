//! The layout engine: turns a `ResumeData` record into a `DocumentModel`
//! according to a template's `Style`.
//!
//! Section order is fixed: header, summary, experience, education, skills,
//! certifications. Sections without data are omitted entirely.

use crate::render::document::{DocumentModel, Paragraph, Run};
use crate::render::style::{ContactLayout, SkillsLayout, Style};
use crate::resume::model::{EducationEntry, ExperienceEntry, ResumeData};

pub fn layout_resume(data: &ResumeData, style: &Style) -> DocumentModel {
    let mut paragraphs = Vec::new();

    layout_header(data, style, &mut paragraphs);

    if !data.summary.is_empty() {
        paragraphs.push(heading(style, style.labels.summary));
        paragraphs.push(
            Paragraph::text(style.summary.run(data.summary.as_str()))
                .aligned(style.summary_alignment)
                .spacing(0, style.summary_after),
        );
    }

    if !data.experience.is_empty() {
        paragraphs.push(heading(style, style.labels.experience));
        for entry in &data.experience {
            layout_experience(entry, style, &mut paragraphs);
        }
    }

    if !data.education.is_empty() {
        paragraphs.push(heading(style, style.labels.education));
        for entry in &data.education {
            layout_education(entry, style, &mut paragraphs);
        }
    }

    if !data.skills.is_empty() {
        paragraphs.push(heading(style, style.labels.skills));
        match style.skills {
            SkillsLayout::Bulleted => {
                paragraphs.extend(data.skills.iter().map(|skill| bullet(style, skill, 40)));
            }
            SkillsLayout::Inline { separator } => {
                paragraphs.push(
                    Paragraph::text(style.body.run(data.skills.join(separator))).spacing(0, 100),
                );
            }
        }
    }

    // Both an absent section and an empty one suppress the heading.
    if let Some(certifications) = data.certifications.as_ref().filter(|c| !c.is_empty()) {
        paragraphs.push(heading(style, style.labels.certifications));
        paragraphs.extend(certifications.iter().map(|item| bullet(style, item, 60)));
    }

    DocumentModel {
        paragraphs,
        margin: style.margin,
        font: style.font,
        title: format!("{} - Resume", data.name),
        author: data.name.clone(),
    }
}

fn layout_header(data: &ResumeData, style: &Style, out: &mut Vec<Paragraph>) {
    let header = &style.header;
    let name = if header.uppercase_name {
        data.name.to_uppercase()
    } else {
        data.name.clone()
    };
    let header_start = out.len();

    out.push(
        Paragraph::text(header.name.run(name))
            .aligned(header.alignment)
            .spacing(0, 80),
    );

    if let Some(title_style) = header.title.filter(|_| !data.title.is_empty()) {
        out.push(
            Paragraph::text(title_style.run(data.title.as_str()))
                .aligned(header.alignment)
                .spacing(0, 80),
        );
    }

    let parts = data.contact.parts();
    match header.contact_layout {
        ContactLayout::Inline { separator } if !parts.is_empty() => {
            out.push(
                Paragraph::text(header.contact.run(parts.join(separator)))
                    .aligned(header.alignment)
                    .spacing(0, 0),
            );
        }
        ContactLayout::Inline { .. } => {}
        ContactLayout::Stacked => {
            out.extend(parts.iter().map(|part| {
                Paragraph::text(header.contact.run(*part))
                    .aligned(header.alignment)
                    .spacing(0, 20)
            }));
        }
    }

    if header.rule.is_some() {
        if let Some(last) = out[header_start..].last_mut() {
            last.border_bottom = header.rule;
        }
    }
    out.push(Paragraph::empty().spacing(0, header.gap_after));
}

fn heading(style: &Style, label: &str) -> Paragraph {
    let heading = &style.heading;
    Paragraph::text(heading.text.run(label))
        .aligned(heading.alignment)
        .spacing(heading.spacing_before, heading.spacing_after)
        .with_border(heading.rule)
}

fn bullet(style: &Style, text: &str, after: u16) -> Paragraph {
    let glyph = Run::new(style.bullet.glyph, style.body.size, style.bullet.color);
    Paragraph::text(style.body.run(text))
        .indented(style.bullet.indent)
        .with_bullet(glyph, style.bullet.hanging)
        .spacing(0, after)
}

fn layout_experience(entry: &ExperienceEntry, style: &Style, out: &mut Vec<Paragraph>) {
    let mut title_line =
        Paragraph::text(style.entry_title.run(entry.title.as_str())).spacing(style.entry_before, 0);
    if !entry.dates.is_empty() {
        title_line = title_line.with_trailing(style.dates.run(entry.dates.as_str()));
    }
    out.push(title_line);

    if !entry.company.is_empty() {
        out.push(Paragraph::text(style.company.run(entry.company.as_str())).spacing(0, 80));
    }

    out.extend(entry.bullets.iter().map(|item| bullet(style, item, 60)));
}

fn layout_education(entry: &EducationEntry, style: &Style, out: &mut Vec<Paragraph>) {
    let degree = if entry.degree.is_empty() {
        entry.school.as_str()
    } else {
        entry.degree.as_str()
    };
    let mut degree_line = Paragraph::text(style.entry_title.run(degree)).spacing(style.entry_before, 0);
    if !entry.year.is_empty() {
        degree_line = degree_line.with_trailing(style.dates.run(entry.year.as_str()));
    }
    out.push(degree_line);

    if !entry.degree.is_empty() && !entry.school.is_empty() {
        out.push(Paragraph::text(style.company.run(entry.school.as_str())).spacing(0, 80));
    }

    if let Some(details) = entry.details.as_deref().filter(|d| !d.is_empty()) {
        out.push(Paragraph::text(style.body.run(details)).spacing(0, 80));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::document::Alignment;
    use crate::render::style::{CLASSIC, MINIMALIST, MODERN};
    use crate::resume::model::ContactInfo;

    fn sample() -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            title: "Senior Engineer".to_string(),
            contact: ContactInfo {
                email: Some("jane@x.com".to_string()),
                phone: Some("555-000-1111".to_string()),
                ..Default::default()
            },
            summary: "Builds reliable systems.".to_string(),
            experience: vec![ExperienceEntry {
                title: "Senior Engineer".to_string(),
                company: "Acme Corp".to_string(),
                dates: "Jan 2020 - Present".to_string(),
                bullets: vec!["Shipped X".to_string(), "Shipped Y".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "B.S. Computer Science".to_string(),
                school: "MIT".to_string(),
                year: "2018".to_string(),
                details: None,
            }],
            skills: vec!["Python".to_string(), "Go".to_string()],
            certifications: None,
        }
    }

    fn texts(doc: &DocumentModel) -> Vec<String> {
        doc.paragraphs.iter().map(Paragraph::plain_text).collect()
    }

    #[test]
    fn test_section_order_modern() {
        let doc = layout_resume(&sample(), &MODERN);
        let texts = texts(&doc);
        let position = |needle: &str| texts.iter().position(|t| t == needle).unwrap();
        assert!(position("Jane Doe") < position("PROFESSIONAL SUMMARY"));
        assert!(position("PROFESSIONAL SUMMARY") < position("EXPERIENCE"));
        assert!(position("EXPERIENCE") < position("EDUCATION"));
        assert!(position("EDUCATION") < position("SKILLS"));
        assert_eq!(doc.title, "Jane Doe - Resume");
        assert_eq!(doc.author, "Jane Doe");
    }

    #[test]
    fn test_no_certifications_heading_when_absent_or_empty() {
        let mut data = sample();
        for certifications in [None, Some(vec![])] {
            data.certifications = certifications;
            for style in [&MODERN, &CLASSIC, &MINIMALIST] {
                let doc = layout_resume(&data, style);
                assert!(!texts(&doc)
                    .iter()
                    .any(|t| t.starts_with(style.labels.certifications)));
            }
        }
    }

    #[test]
    fn test_certifications_rendered_as_bullets() {
        let mut data = sample();
        data.certifications = Some(vec!["CKA".to_string()]);
        let doc = layout_resume(&data, &MODERN);
        let cert = doc.paragraphs.last().unwrap();
        assert_eq!(cert.plain_text(), "CKA");
        assert!(cert.bullet.is_some());
    }

    #[test]
    fn test_empty_sections_omitted() {
        let data = ResumeData {
            name: "Jane Doe".to_string(),
            ..Default::default()
        };
        let doc = layout_resume(&data, &MODERN);
        // Name line plus the header gap paragraph.
        assert_eq!(doc.paragraphs.len(), 2);
    }

    #[test]
    fn test_experience_dates_are_trailing_run() {
        let doc = layout_resume(&sample(), &MODERN);
        let job = doc
            .paragraphs
            .iter()
            .find(|p| p.trailing.is_some() && p.plain_text() == "Senior Engineer")
            .unwrap();
        assert_eq!(job.trailing.as_ref().unwrap().text, "Jan 2020 - Present");
    }

    #[test]
    fn test_classic_centers_uppercase_name_and_inline_skills() {
        let doc = layout_resume(&sample(), &CLASSIC);
        assert_eq!(doc.paragraphs[0].plain_text(), "JANE DOE");
        assert_eq!(doc.paragraphs[0].alignment, Alignment::Center);
        assert!(texts(&doc).contains(&"Python  •  Go".to_string()));
        // Header rule lands on the contact line, the last header paragraph.
        assert_eq!(doc.paragraphs[2].plain_text(), "jane@x.com  •  555-000-1111");
        assert!(doc.paragraphs[2].border_bottom.is_some());
    }

    #[test]
    fn test_minimalist_stacks_contact_and_hides_title() {
        let doc = layout_resume(&sample(), &MINIMALIST);
        let texts = texts(&doc);
        assert_eq!(&texts[..3], &["Jane Doe", "jane@x.com", "555-000-1111"]);
        assert_eq!(texts.iter().filter(|t| *t == "Senior Engineer").count(), 1);
        assert!(texts.contains(&"ABOUT".to_string()));
    }
}
