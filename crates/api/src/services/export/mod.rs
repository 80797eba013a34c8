//! Record list export as downloadable documents.

mod font_metrics;
pub mod pdf;
pub mod spreadsheet;

use chrono::NaiveDateTime;
use domain::models::Record;
use thiserror::Error;

pub use pdf::render_pdf;
pub use spreadsheet::render_spreadsheet;

/// Column headers shared by every export format.
pub const COLUMN_HEADERS: [&str; 5] = ["ID", "Name", "Surname", "Age", "Phone Number"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("PDF finalization failed: {0}")]
    Document(#[from] printpdf::lopdf::Error),

    #[error("Spreadsheet rendering failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Spreadsheet,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "Records.pdf",
            ExportFormat::Spreadsheet => "Records.xlsx",
        }
    }

    /// Label used for the `format` metric dimension.
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Spreadsheet => "excel",
        }
    }

    pub fn render(
        self,
        records: &[Record],
        rendered_at: NaiveDateTime,
    ) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Pdf => render_pdf(records, rendered_at),
            ExportFormat::Spreadsheet => render_spreadsheet(records),
        }
    }
}
