//! Published-spreadsheet CSV source
//!
//! Fetches keyword rows from a spreadsheet published as CSV (e.g. a Google
//! Sheets "publish to web" URL). Only the first two columns of each row are
//! used; the table layer decides about header rows and empty cells.

use async_trait::async_trait;

use super::{FetchError, KeywordSource};

/// Keyword source backed by a CSV document over HTTP(S)
#[derive(Debug, Clone)]
pub struct SheetCsvSource {
    url: String,
    client: reqwest::Client,
}

impl SheetCsvSource {
    /// Create a source for the given CSV URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl KeywordSource for SheetCsvSource {
    async fn fetch_rows(&self) -> Result<Vec<(String, String)>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FetchError::Auth(format!(
                "sheet fetch rejected with {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "sheet fetch returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(parse_csv_rows(&body))
    }
}

/// Parse CSV text into (keyword, reply) pairs.
///
/// Handles quoted fields with `""` escapes and newlines inside quotes.
/// Rows with fewer than two fields get an empty reply cell, which the
/// table rebuild then skips.
pub(crate) fn parse_csv_rows(text: &str) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
                push_row(&mut rows, &mut fields);
            }
            _ => field.push(c),
        }
    }

    // Final row without a trailing newline
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_row(&mut rows, &mut fields);
    }

    rows
}

fn push_row(rows: &mut Vec<(String, String)>, fields: &mut Vec<String>) {
    if fields.iter().all(|f| f.is_empty()) {
        fields.clear();
        return;
    }
    let mut it = fields.drain(..);
    let keyword = it.next().unwrap_or_default();
    let reply = it.next().unwrap_or_default();
    drop(it);
    rows.push((keyword, reply));
}
