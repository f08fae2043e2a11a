//! Per-template style descriptors.
//!
//! Every template is a plain data record consumed by the one layout engine in
//! `render::layout`; adding a template means adding a record, not code.

use crate::render::document::{Alignment, Border, BorderStyle, Run};
use crate::render::font_metrics::FontFamily;

/// Hex RGB colors, no leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub border: &'static str,
}

pub const MODERN_PALETTE: Palette = Palette {
    primary: "2563eb",
    secondary: "64748b",
    text: "1e293b",
    muted: "64748b",
    border: "e2e8f0",
};

pub const CLASSIC_PALETTE: Palette = Palette {
    primary: "1a1a1a",
    secondary: "4a4a4a",
    text: "1a1a1a",
    muted: "666666",
    border: "cccccc",
};

pub const MINIMALIST_PALETTE: Palette = Palette {
    primary: "000000",
    secondary: "555555",
    text: "333333",
    muted: "777777",
    border: "eeeeee",
};

/// Formatting of one kind of text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Half-points.
    pub size: u16,
    pub bold: bool,
    pub italic: bool,
    pub color: &'static str,
}

impl TextStyle {
    const fn plain(size: u16, color: &'static str) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            color,
        }
    }

    const fn bold(size: u16, color: &'static str) -> Self {
        Self {
            size,
            bold: true,
            italic: false,
            color,
        }
    }

    const fn italic(size: u16, color: &'static str) -> Self {
        Self {
            size,
            bold: false,
            italic: true,
            color,
        }
    }

    pub fn run(&self, text: impl Into<String>) -> Run {
        Run {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            size: self.size,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactLayout {
    /// One line, values joined by the separator.
    Inline { separator: &'static str },
    /// One paragraph per value.
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillsLayout {
    Bulleted,
    Inline { separator: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLabels {
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
    pub certifications: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStyle {
    pub name: TextStyle,
    pub uppercase_name: bool,
    /// Candidate title line; `None` hides it.
    pub title: Option<TextStyle>,
    pub contact: TextStyle,
    pub contact_layout: ContactLayout,
    pub alignment: Alignment,
    /// Rule under the last line of the header block.
    pub rule: Option<Border>,
    /// Space after the header block, in twips.
    pub gap_after: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingStyle {
    pub text: TextStyle,
    pub alignment: Alignment,
    pub spacing_before: u16,
    pub spacing_after: u16,
    pub rule: Option<Border>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletStyle {
    pub glyph: &'static str,
    pub color: &'static str,
    /// Text indent, in twips.
    pub indent: u16,
    /// Glyph hang, in twips.
    pub hanging: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub palette: Palette,
    pub font: FontFamily,
    /// Page margin on all sides, in twips.
    pub margin: u16,
    pub header: HeaderStyle,
    pub heading: HeadingStyle,
    pub labels: SectionLabels,
    pub summary: TextStyle,
    pub summary_alignment: Alignment,
    pub summary_after: u16,
    pub entry_title: TextStyle,
    pub entry_before: u16,
    pub dates: TextStyle,
    pub company: TextStyle,
    pub body: TextStyle,
    pub bullet: BulletStyle,
    pub skills: SkillsLayout,
}

pub static MODERN: Style = Style {
    palette: MODERN_PALETTE,
    font: FontFamily::Helvetica,
    margin: 720,
    header: HeaderStyle {
        name: TextStyle::bold(48, MODERN_PALETTE.primary),
        uppercase_name: false,
        title: Some(TextStyle::plain(28, MODERN_PALETTE.secondary)),
        contact: TextStyle::plain(20, MODERN_PALETTE.muted),
        contact_layout: ContactLayout::Inline { separator: "  |  " },
        alignment: Alignment::Left,
        rule: Some(Border {
            style: BorderStyle::Single,
            size: 12,
            color: MODERN_PALETTE.primary,
        }),
        gap_after: 240,
    },
    heading: HeadingStyle {
        text: TextStyle::bold(24, MODERN_PALETTE.primary),
        alignment: Alignment::Left,
        spacing_before: 200,
        spacing_after: 120,
        rule: Some(Border {
            style: BorderStyle::Single,
            size: 4,
            color: MODERN_PALETTE.border,
        }),
    },
    labels: SectionLabels {
        summary: "PROFESSIONAL SUMMARY",
        experience: "EXPERIENCE",
        education: "EDUCATION",
        skills: "SKILLS",
        certifications: "CERTIFICATIONS",
    },
    summary: TextStyle::plain(22, MODERN_PALETTE.text),
    summary_alignment: Alignment::Left,
    summary_after: 200,
    entry_title: TextStyle::bold(22, MODERN_PALETTE.text),
    entry_before: 120,
    dates: TextStyle::plain(20, MODERN_PALETTE.muted),
    company: TextStyle::plain(22, MODERN_PALETTE.muted),
    body: TextStyle::plain(22, MODERN_PALETTE.text),
    bullet: BulletStyle {
        glyph: "•",
        color: MODERN_PALETTE.text,
        indent: 360,
        hanging: 360,
    },
    skills: SkillsLayout::Bulleted,
};

pub static CLASSIC: Style = Style {
    palette: CLASSIC_PALETTE,
    font: FontFamily::Times,
    margin: 1008,
    header: HeaderStyle {
        name: TextStyle::bold(52, CLASSIC_PALETTE.primary),
        uppercase_name: true,
        title: Some(TextStyle::italic(28, CLASSIC_PALETTE.secondary)),
        contact: TextStyle::plain(20, CLASSIC_PALETTE.muted),
        contact_layout: ContactLayout::Inline { separator: "  •  " },
        alignment: Alignment::Center,
        rule: Some(Border {
            style: BorderStyle::Double,
            size: 6,
            color: CLASSIC_PALETTE.primary,
        }),
        gap_after: 120,
    },
    heading: HeadingStyle {
        text: TextStyle::bold(26, CLASSIC_PALETTE.primary),
        alignment: Alignment::Center,
        spacing_before: 240,
        spacing_after: 120,
        rule: Some(Border {
            style: BorderStyle::Single,
            size: 4,
            color: CLASSIC_PALETTE.muted,
        }),
    },
    labels: SectionLabels {
        summary: "PROFESSIONAL SUMMARY",
        experience: "PROFESSIONAL EXPERIENCE",
        education: "EDUCATION",
        skills: "SKILLS & COMPETENCIES",
        certifications: "CERTIFICATIONS & LICENSES",
    },
    summary: TextStyle::plain(22, CLASSIC_PALETTE.text),
    summary_alignment: Alignment::Justified,
    summary_after: 200,
    entry_title: TextStyle::bold(24, CLASSIC_PALETTE.text),
    entry_before: 160,
    dates: TextStyle::italic(22, CLASSIC_PALETTE.muted),
    company: TextStyle::italic(22, CLASSIC_PALETTE.muted),
    body: TextStyle::plain(22, CLASSIC_PALETTE.text),
    bullet: BulletStyle {
        glyph: "•",
        color: CLASSIC_PALETTE.text,
        indent: 360,
        hanging: 360,
    },
    skills: SkillsLayout::Inline { separator: "  •  " },
};

pub static MINIMALIST: Style = Style {
    palette: MINIMALIST_PALETTE,
    font: FontFamily::Helvetica,
    margin: 1080,
    header: HeaderStyle {
        name: TextStyle::plain(56, MINIMALIST_PALETTE.primary),
        uppercase_name: false,
        title: None,
        contact: TextStyle::plain(18, MINIMALIST_PALETTE.muted),
        contact_layout: ContactLayout::Stacked,
        alignment: Alignment::Left,
        rule: None,
        gap_after: 240,
    },
    heading: HeadingStyle {
        text: TextStyle::bold(18, MINIMALIST_PALETTE.muted),
        alignment: Alignment::Left,
        spacing_before: 280,
        spacing_after: 120,
        rule: None,
    },
    labels: SectionLabels {
        summary: "ABOUT",
        experience: "EXPERIENCE",
        education: "EDUCATION",
        skills: "SKILLS",
        certifications: "CERTIFICATIONS",
    },
    summary: TextStyle::plain(22, MINIMALIST_PALETTE.text),
    summary_alignment: Alignment::Left,
    summary_after: 0,
    entry_title: TextStyle::bold(24, MINIMALIST_PALETTE.primary),
    entry_before: 160,
    dates: TextStyle::plain(18, MINIMALIST_PALETTE.muted),
    company: TextStyle::plain(22, MINIMALIST_PALETTE.muted),
    body: TextStyle::plain(22, MINIMALIST_PALETTE.text),
    bullet: BulletStyle {
        glyph: "—",
        color: MINIMALIST_PALETTE.muted,
        indent: 560,
        hanging: 360,
    },
    skills: SkillsLayout::Inline { separator: "   " },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_differ_in_font_and_margin() {
        assert_eq!(MODERN.font, FontFamily::Helvetica);
        assert_eq!(CLASSIC.font, FontFamily::Times);
        assert!(MINIMALIST.margin > CLASSIC.margin && CLASSIC.margin > MODERN.margin);
    }

    #[test]
    fn test_text_style_run_carries_formatting() {
        let run = CLASSIC.company.run("Acme");
        assert!(run.italic);
        assert!(!run.bold);
        assert_eq!(run.color, "666666");
        assert_eq!(run.size, 22);
    }

    #[test]
    fn test_minimalist_hides_title_and_rules() {
        assert!(MINIMALIST.header.title.is_none());
        assert!(MINIMALIST.header.rule.is_none());
        assert!(MINIMALIST.heading.rule.is_none());
        assert_eq!(MINIMALIST.bullet.glyph, "—");
    }
}
