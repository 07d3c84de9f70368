//! Corpus loading and record normalization.
//!
//! The corpus is a CSV file with `id`, `source_link`, and `content` columns.
//! [`load_corpus`] reads it with a row cap and normalizes every row into the
//! canonical [`Document`] triple, dropping rows with missing fields or empty
//! content. Per-row failures are counted and logged, never fatal; a missing
//! file or missing required column aborts the run with
//! [`DocbotError::Schema`].

use std::path::Path;

use tracing::{info, warn};

use crate::document::Document;
use crate::error::{DocbotError, Result};

/// Required corpus columns, in canonical order: id, citation link, text.
const REQUIRED_COLUMNS: [&str; 3] = ["id", "source_link", "content"];

/// The outcome of loading and normalizing a corpus file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCorpus {
    /// Rows that normalized cleanly, in file order.
    pub documents: Vec<Document>,
    /// Rows dropped for a missing field or empty content.
    pub rejected: usize,
}

/// Load a corpus CSV and normalize its rows into [`Document`]s.
///
/// At most `max_rows` data rows are read. Rows where `content` is empty or
/// whitespace, or where any required cell is absent, are skipped and counted
/// in [`NormalizedCorpus::rejected`]. The `id` cell is carried as a string
/// whatever it held.
///
/// # Errors
///
/// Returns [`DocbotError::Schema`] if the file cannot be opened or any
/// required column is entirely absent from the header row.
pub fn load_corpus(path: &Path, max_rows: usize) -> Result<NormalizedCorpus> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DocbotError::Schema(format!("cannot read corpus '{}': {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| DocbotError::Schema(format!("cannot read corpus headers: {e}")))?
        .clone();

    let mut columns = [0usize; 3];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers.iter().position(|h| h == name).ok_or_else(|| {
            DocbotError::Schema(format!("corpus is missing required column '{name}'"))
        })?;
    }
    let [id_col, source_col, content_col] = columns;

    let mut documents = Vec::new();
    let mut rejected = 0usize;

    for (row, result) in reader.records().take(max_rows).enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row, error = %e, "skipping unparseable corpus row");
                rejected += 1;
                continue;
            }
        };

        let id = record.get(id_col).map(str::trim).unwrap_or_default();
        let source = record.get(source_col).map(str::trim).unwrap_or_default();
        let text = record.get(content_col).map(str::trim).unwrap_or_default();

        if id.is_empty() || source.is_empty() {
            warn!(row, "skipping corpus row with missing id or source_link");
            rejected += 1;
            continue;
        }
        if text.is_empty() {
            warn!(row, id, "skipping corpus row with empty content");
            rejected += 1;
            continue;
        }

        documents.push(Document {
            id: id.to_string(),
            source: source.to_string(),
            text: text.to_string(),
        });
    }

    info!(
        corpus = %path.display(),
        accepted = documents.len(),
        rejected,
        "corpus normalized"
    );

    Ok(NormalizedCorpus { documents, rejected })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_corpus(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_content_rows_are_dropped() {
        let file = write_corpus(
            "id,source_link,content\n\
             1,/wiki/a,First page text\n\
             2,/wiki/b,\n\
             3,/wiki/c,Third page text\n",
        );

        let corpus = load_corpus(file.path(), 2000).unwrap();
        assert_eq!(corpus.documents.len(), 2);
        assert_eq!(corpus.rejected, 1);
        assert_eq!(corpus.documents[0].id, "1");
        assert_eq!(corpus.documents[1].source, "/wiki/c");
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let file = write_corpus("id,content\n1,text\n");
        let err = load_corpus(file.path(), 2000).unwrap_err();
        assert!(matches!(err, DocbotError::Schema(_)));
        assert!(err.to_string().contains("source_link"));
    }

    #[test]
    fn missing_file_is_a_schema_error() {
        let err = load_corpus(Path::new("./no_such_corpus.csv"), 2000).unwrap_err();
        assert!(matches!(err, DocbotError::Schema(_)));
    }

    #[test]
    fn row_cap_is_applied() {
        let file = write_corpus(
            "id,source_link,content\n\
             1,/wiki/a,one\n\
             2,/wiki/b,two\n\
             3,/wiki/c,three\n",
        );

        let corpus = load_corpus(file.path(), 2).unwrap();
        assert_eq!(corpus.documents.len(), 2);
    }

    #[test]
    fn numeric_ids_become_strings() {
        let file = write_corpus("id,source_link,content\n42,/wiki/x,Answer page\n");
        let corpus = load_corpus(file.path(), 2000).unwrap();
        assert_eq!(corpus.documents[0].id, "42");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let file = write_corpus(
            "title,id,source_link,space,content\n\
             Welcome,7,/wiki/w,ENG,Welcome text\n",
        );
        let corpus = load_corpus(file.path(), 2000).unwrap();
        assert_eq!(corpus.documents.len(), 1);
        assert_eq!(corpus.documents[0].text, "Welcome text");
    }
}
