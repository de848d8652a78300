use std::path::Path;

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use super::{dedup_lines, ExtractError};

/// Paragraph text first, then one ` | `-joined line per table row.
pub fn extract_docx_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    docx_text_from_bytes(&bytes)
}

pub(crate) fn docx_text_from_bytes(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    let mut table_rows = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => paragraphs.push(paragraph_text(paragraph)),
            DocumentChild::Table(table) => collect_table_rows(table, &mut table_rows),
            _ => {}
        }
    }

    Ok(dedup_lines(paragraphs.into_iter().chain(table_rows)))
}

fn collect_table_rows(table: &Table, rows: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        let mut cells = Vec::new();
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            let text = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                cells.push(text);
            }
        }
        if !cells.is_empty() {
            rows.push(cells.join(" | "));
        }
    }
}

pub(crate) fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        append_child_text(child, &mut buffer);
    }
    buffer
}

fn append_child_text(child: &ParagraphChild, buffer: &mut String) {
    match child {
        ParagraphChild::Run(run) => {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(text) => buffer.push_str(&text.text),
                    RunChild::Tab(_) => buffer.push(' '),
                    _ => {}
                }
            }
        }
        ParagraphChild::Hyperlink(link) => {
            for inner in &link.children {
                append_child_text(inner, buffer);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run, TableCell, TableRow};
    use std::io::Cursor;

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    fn cell(text: &str) -> TableCell {
        TableCell::new().add_paragraph(para(text))
    }

    fn pack(docx: Docx) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_paragraphs_then_table_rows() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(para("Jane   Doe"))
                .add_table(Table::new(vec![
                    TableRow::new(vec![cell("Skills"), cell("Rust"), cell("")]),
                    TableRow::new(vec![cell("Languages"), cell("English")]),
                ]))
                .add_paragraph(para("Senior Engineer")),
        );
        let text = docx_text_from_bytes(&bytes).unwrap();
        assert_eq!(
            text,
            "Jane Doe\nSenior Engineer\nSkills | Rust\nLanguages | English"
        );
    }

    #[test]
    fn test_repeated_lines_kept_once() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(para("Acme Corp"))
                .add_paragraph(para(""))
                .add_paragraph(para("Acme Corp")),
        );
        assert_eq!(docx_text_from_bytes(&bytes).unwrap(), "Acme Corp");
    }

    #[test]
    fn test_not_a_docx() {
        let err = docx_text_from_bytes(b"plain text").unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }
}
