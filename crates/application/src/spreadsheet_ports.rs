use std::collections::HashMap;

use async_trait::async_trait;
use steward_core::AppResult;

/// Rows decoded from an uploaded sheet, keyed by column header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportedSheet {
    /// One map per data row.
    pub rows: Vec<HashMap<String, String>>,
    /// Decoding problems. When non-empty the import is rejected as a whole.
    pub errors: Vec<String>,
}

/// Port converting between tabular files and string cells.
#[async_trait]
pub trait SpreadsheetCodec: Send + Sync {
    /// Encodes a header row plus data rows into a file.
    async fn export(
        &self,
        headers: &[&str],
        rows: Vec<Vec<String>>,
        sheet_name: &str,
    ) -> AppResult<Vec<u8>>;

    /// Decodes an uploaded file.
    async fn import(&self, content: &[u8], sheet_name: &str) -> AppResult<ImportedSheet>;

    /// File extension of encoded files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// MIME type of encoded files.
    fn content_type(&self) -> &'static str;
}
