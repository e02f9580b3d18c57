use std::path::{Path, PathBuf};

use prettytable::{row, Table};
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

use crate::error::Result;
use crate::models::Report;

const TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[day] [month repr:short] [year] [hour]:[minute]");
const DATE: &[FormatItem<'static>] = format_description!("[day] [month repr:short] [year]");
const FILE_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub const REPORT_HEADER: &str = "Alinea.MMTC Report";
pub const SUMMARY_HEADER: &str = "Alinea.MMTC Reports Summary";

/// A rendered document ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub body: String,
}

impl Document {
    /// Writes the document into `dir` and returns the full path.
    pub fn save(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.body)?;
        tracing::info!(path = %path.display(), "Document saved");
        Ok(path)
    }
}

/// Fixed layout for one report: labeled fields, then the content wrapped to
/// `page_width` columns.
pub fn render_report(report: &Report, page_width: usize) -> Result<Document> {
    let mut body = String::new();
    body.push_str(REPORT_HEADER);
    body.push_str("\n\n");
    body.push_str(&format!("Title: {}\n", report.title));
    body.push_str(&format!("Type: {}\n", report.type_label()));
    body.push_str(&format!("Division: {}\n", report.division));
    body.push_str(&format!("Author: {}\n", report.author_name));
    body.push_str(&format!("Status: {}\n", report.status));
    body.push_str(&format!("Created: {}\n", report.created_at.format(TIMESTAMP)?));
    body.push_str("\nContent:\n");
    for line in wrap(&report.content, page_width) {
        body.push_str(&line);
        body.push('\n');
    }

    Ok(Document {
        file_name: format!("report-{}.txt", file_stem(&report.id)),
        body,
    })
}

/// Tabular listing of `reports` in the order given, stamped with
/// `generated_at`.
pub fn render_all(reports: &[Report], generated_at: OffsetDateTime) -> Result<Document> {
    let mut table = Table::new();
    table.set_titles(row!["Title", "Division", "Type", "Author", "Status", "Created"]);
    for report in reports {
        let created = report.created_at.format(DATE)?;
        table.add_row(row![
            report.title,
            report.division,
            report.type_label(),
            report.author_name,
            report.status,
            created
        ]);
    }

    let body = format!(
        "{}\nGenerated on: {}\n\n{}",
        SUMMARY_HEADER,
        generated_at.format(TIMESTAMP)?,
        table
    );

    Ok(Document {
        file_name: format!("all-reports-{}.txt", generated_at.format(FILE_DATE)?),
        body,
    })
}

/// Keeps ids usable as file names: anything but ASCII letters, digits, `-`
/// and `_` becomes `_`.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Greedy word wrap. Paragraph breaks in the input are kept; words longer
/// than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            while chars.len() > width {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }

            let word_len = chars.len();
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(chars);
            line_len += word_len;
        }

        lines.push(line);
    }

    lines
}
