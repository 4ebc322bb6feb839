//! CSV implementation of the spreadsheet codec port.
//!
//! A CSV file holds exactly one sheet, so sheet names are only used in
//! messages.

use std::collections::HashMap;

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use steward_application::{ImportedSheet, SpreadsheetCodec};
use steward_core::{AppError, AppResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Spreadsheet codec reading and writing comma-separated files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSpreadsheetCodec;

impl CsvSpreadsheetCodec {
    /// Creates a CSV codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpreadsheetCodec for CsvSpreadsheetCodec {
    async fn export(
        &self,
        headers: &[&str],
        rows: Vec<Vec<String>>,
        sheet_name: &str,
    ) -> AppResult<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());

        writer.write_record(headers).map_err(|error| {
            AppError::Internal(format!("failed to write '{sheet_name}' header row: {error}"))
        })?;
        for row in rows {
            writer.write_record(&row).map_err(|error| {
                AppError::Internal(format!("failed to write '{sheet_name}' row: {error}"))
            })?;
        }

        writer.into_inner().map_err(|error| {
            AppError::Internal(format!("failed to flush '{sheet_name}' export: {error}"))
        })
    }

    async fn import(&self, content: &[u8], sheet_name: &str) -> AppResult<ImportedSheet> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(content);

        let headers = match reader.headers() {
            Ok(headers) if !headers.is_empty() => headers.clone(),
            Ok(_) => {
                return Ok(ImportedSheet {
                    rows: Vec::new(),
                    errors: vec![format!("sheet '{sheet_name}' has no header row")],
                });
            }
            Err(error) => {
                return Ok(ImportedSheet {
                    rows: Vec::new(),
                    errors: vec![format!("sheet '{sheet_name}': {error}")],
                });
            }
        };

        let mut sheet = ImportedSheet::default();
        for record in reader.records() {
            match record {
                Ok(record) if record.iter().all(str::is_empty) => {}
                Ok(record) => {
                    let row: HashMap<String, String> = headers
                        .iter()
                        .zip(record.iter())
                        .map(|(header, value)| (header.to_owned(), value.to_owned()))
                        .collect();
                    sheet.rows.push(row);
                }
                Err(error) => sheet.errors.push(error.to_string()),
            }
        }

        Ok(sheet)
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }
}

#[cfg(test)]
mod tests {
    use steward_application::SpreadsheetCodec;

    use super::CsvSpreadsheetCodec;

    #[tokio::test]
    async fn export_quotes_cells_that_need_it() {
        let codec = CsvSpreadsheetCodec::new();

        let content = codec
            .export(
                &["User Name", "Display Name"],
                vec![vec!["alice".to_owned(), "Smith, Alice".to_owned()]],
                "Users",
            )
            .await
            .unwrap_or_default();

        assert_eq!(
            String::from_utf8(content).unwrap_or_default(),
            "User Name,Display Name\nalice,\"Smith, Alice\"\n"
        );
    }

    #[tokio::test]
    async fn import_keys_cells_by_header_and_skips_blank_lines() {
        let codec = CsvSpreadsheetCodec::new();
        let content = b"\xEF\xBB\xBFUser Name,Email\n bob , bob@example.com\n,\ncarol,\n";

        let sheet = codec
            .import(content, "Users")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(sheet.errors.is_empty());
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("User Name").map(String::as_str), Some("bob"));
        assert_eq!(sheet.rows[1].get("Email").map(String::as_str), Some(""));
    }

    #[tokio::test]
    async fn ragged_rows_are_reported_as_errors() {
        let codec = CsvSpreadsheetCodec::new();

        let sheet = codec
            .import(b"User Name,Email\nbob\n", "Users")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(sheet.rows.is_empty());
        assert_eq!(sheet.errors.len(), 1);
    }

    #[tokio::test]
    async fn empty_upload_has_no_header_row() {
        let codec = CsvSpreadsheetCodec::new();

        let sheet = codec
            .import(b"", "Users")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(sheet.errors, vec!["sheet 'Users' has no header row".to_owned()]);
    }
}
