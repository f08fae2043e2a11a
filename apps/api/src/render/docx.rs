//! OOXML word-processing writer.
//!
//! Emits the minimal part set Word, LibreOffice and Google Docs accept and
//! zips it with fixed entry timestamps, so the same model always produces the
//! same bytes.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::render::document::{
    Alignment, BorderStyle, DocumentModel, Paragraph, Run, PAGE_HEIGHT_TWIPS, PAGE_WIDTH_TWIPS,
};
use crate::render::RenderError;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    r#"</Types>"#
);

const PACKAGE_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#
);

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Packages the model as a `.docx` file.
pub fn write_docx(doc: &DocumentModel) -> Result<Vec<u8>, RenderError> {
    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", PACKAGE_RELS_XML.to_string()),
        ("word/document.xml", document_xml(doc)),
        ("word/styles.xml", styles_xml(doc)),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
        ("docProps/core.xml", core_xml(doc)),
    ];

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in &parts {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn document_xml(doc: &DocumentModel) -> String {
    let content_width = doc.content_width();
    let mut xml = String::with_capacity(8 * 1024);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<w:document xmlns:w="{W_NS}"><w:body>"#
    ));

    for paragraph in &doc.paragraphs {
        write_paragraph(&mut xml, paragraph, content_width);
    }

    let margin = doc.margin;
    xml.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="{PAGE_WIDTH_TWIPS}" w:h="{PAGE_HEIGHT_TWIPS}"/><w:pgMar w:top="{margin}" w:right="{margin}" w:bottom="{margin}" w:left="{margin}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#
    ));
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph, content_width: u32) {
    xml.push_str("<w:p><w:pPr>");

    if let Some(border) = &paragraph.border_bottom {
        let val = match border.style {
            BorderStyle::Single => "single",
            BorderStyle::Double => "double",
        };
        xml.push_str(&format!(
            r#"<w:pBdr><w:bottom w:val="{val}" w:sz="{}" w:space="1" w:color="{}"/></w:pBdr>"#,
            border.size, border.color
        ));
    }

    if paragraph.trailing.is_some() {
        xml.push_str(&format!(
            r#"<w:tabs><w:tab w:val="right" w:pos="{content_width}"/></w:tabs>"#
        ));
    }

    xml.push_str(&format!(
        r#"<w:spacing w:before="{}" w:after="{}"/>"#,
        paragraph.spacing_before, paragraph.spacing_after
    ));

    match &paragraph.bullet {
        Some(bullet) => xml.push_str(&format!(
            r#"<w:ind w:left="{}" w:hanging="{}"/>"#,
            paragraph.indent_left, bullet.hanging
        )),
        None if paragraph.indent_left > 0 => xml.push_str(&format!(
            r#"<w:ind w:left="{}"/>"#,
            paragraph.indent_left
        )),
        None => {}
    }

    match paragraph.alignment {
        Alignment::Left => {}
        Alignment::Center => xml.push_str(r#"<w:jc w:val="center"/>"#),
        Alignment::Justified => xml.push_str(r#"<w:jc w:val="both"/>"#),
    }

    xml.push_str("</w:pPr>");

    if let Some(bullet) = &paragraph.bullet {
        write_run(xml, &bullet.glyph);
        xml.push_str("<w:r><w:tab/></w:r>");
    }

    for run in &paragraph.runs {
        write_run(xml, run);
    }

    if let Some(trailing) = &paragraph.trailing {
        xml.push_str("<w:r><w:tab/></w:r>");
        write_run(xml, trailing);
    }

    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r><w:rPr>");
    if run.bold {
        xml.push_str("<w:b/>");
    }
    if run.italic {
        xml.push_str("<w:i/>");
    }
    xml.push_str(&format!(
        r#"<w:color w:val="{}"/><w:sz w:val="{}"/><w:szCs w:val="{}"/>"#,
        run.color, run.size, run.size
    ));
    xml.push_str("</w:rPr>");

    // Embedded newlines become soft line breaks.
    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        if !line.is_empty() {
            xml.push_str(r#"<w:t xml:space="preserve">"#);
            xml.push_str(&escape(line));
            xml.push_str("</w:t>");
        }
    }
    xml.push_str("</w:r>");
}

fn styles_xml(doc: &DocumentModel) -> String {
    let font = escape(doc.font.docx_name());
    format!(
        concat!(
            r#"{decl}<w:styles xmlns:w="{ns}">"#,
            r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/>"#,
            r#"<w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/>"#,
            r#"</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr>"#,
            r#"<w:spacing w:after="0" w:line="259" w:lineRule="auto"/>"#,
            r#"</w:pPr></w:pPrDefault></w:docDefaults>"#,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
            r#"</w:styles>"#
        ),
        decl = XML_DECLARATION,
        ns = W_NS,
        font = font,
    )
}

fn core_xml(doc: &DocumentModel) -> String {
    format!(
        concat!(
            r#"{decl}<cp:coreProperties "#,
            r#"xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
            r#"xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dc:title>{title}</dc:title><dc:creator>{author}</dc:creator>"#,
            r#"</cp:coreProperties>"#
        ),
        decl = XML_DECLARATION,
        title = escape(doc.title.as_str()),
        author = escape(doc.author.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::document::{Border, Run};
    use crate::render::font_metrics::FontFamily;
    use std::io::Read;

    fn model(paragraphs: Vec<Paragraph>) -> DocumentModel {
        DocumentModel {
            paragraphs,
            margin: 720,
            font: FontFamily::Helvetica,
            title: "Jane Doe - Resume".to_string(),
            author: "Jane Doe".to_string(),
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = write_docx(&model(vec![])).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&part), "missing {part}");
        }
    }

    #[test]
    fn test_output_is_byte_identical() {
        let doc = model(vec![Paragraph::text(Run::new("Jane", 48, "2563eb").bold())]);
        assert_eq!(write_docx(&doc).unwrap(), write_docx(&doc).unwrap());
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = model(vec![Paragraph::text(Run::new("R&D <lead>", 22, "000000"))]);
        let xml = read_part(&write_docx(&doc).unwrap(), "word/document.xml");
        assert!(xml.contains("R&amp;D &lt;lead&gt;"));
    }

    #[test]
    fn test_trailing_run_uses_right_tab_at_content_width() {
        let doc = model(vec![Paragraph::text(Run::new("Engineer", 22, "000000"))
            .with_trailing(Run::new("2020 - 2021", 20, "64748b"))]);
        let xml = read_part(&write_docx(&doc).unwrap(), "word/document.xml");
        assert!(xml.contains(r#"<w:tab w:val="right" w:pos="10800"/>"#));
        assert!(xml.contains("<w:r><w:tab/></w:r>"));
    }

    #[test]
    fn test_bullet_border_and_alignment_properties() {
        let doc = model(vec![
            Paragraph::text(Run::new("Shipped", 22, "000000"))
                .indented(360)
                .with_bullet(Run::new("•", 22, "000000"), 360),
            Paragraph::text(Run::new("EDUCATION", 26, "1a1a1a"))
                .aligned(Alignment::Center)
                .with_border(Some(Border {
                    style: BorderStyle::Double,
                    size: 6,
                    color: "1a1a1a",
                })),
        ]);
        let xml = read_part(&write_docx(&doc).unwrap(), "word/document.xml");
        assert!(xml.contains(r#"<w:ind w:left="360" w:hanging="360"/>"#));
        assert!(xml.contains(r#"<w:bottom w:val="double" w:sz="6" w:space="1" w:color="1a1a1a"/>"#));
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
    }

    #[test]
    fn test_metadata_and_font() {
        let bytes = write_docx(&model(vec![])).unwrap();
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Jane Doe - Resume</dc:title>"));
        assert!(read_part(&bytes, "word/styles.xml").contains(r#"w:ascii="Arial""#));
    }
}
