//! Keyword Table
//!
//! The in-memory keyword → reply mapping the resolver matches against.
//! A table is immutable once built: refreshes construct a brand-new table
//! aside and publish it as a single `Arc` swap, so concurrent lookups only
//! ever see a complete table.

use std::collections::HashMap;

/// Normalize a keyword or message body for matching: trim surrounding
/// whitespace and, unless case-sensitive mode is on, fold to lowercase.
pub fn normalize(text: &str, case_sensitive: bool) -> String {
    let trimmed = text.trim();
    if case_sensitive {
        trimmed.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Immutable keyword → reply-template mapping.
///
/// Iteration order of [`entries`](KeywordTable::entries) is the insertion
/// order of the most recent rebuild. Partial-match resolution depends on it,
/// so sources that need deterministic precedence must order their rows.
#[derive(Debug, Default)]
pub struct KeywordTable {
    /// (normalized keyword, reply template) in insertion order
    entries: Vec<(String, String)>,
    /// normalized keyword -> index into `entries`
    index: HashMap<String, usize>,
    case_sensitive: bool,
}

impl KeywordTable {
    /// Empty table (startup state before the first refresh).
    pub fn empty(case_sensitive: bool) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            case_sensitive,
        }
    }

    /// Build a table from source rows.
    ///
    /// Skips the first row iff `has_header`, and any row with an empty
    /// keyword or reply cell. Duplicate normalized keys are last-writer-wins
    /// within the rebuild: the value is overwritten in place, keeping the
    /// position of the first occurrence.
    pub fn rebuild(
        rows: impl IntoIterator<Item = (String, String)>,
        has_header: bool,
        case_sensitive: bool,
    ) -> Self {
        let skip = usize::from(has_header);
        let mut table = Self::empty(case_sensitive);

        for (keyword, reply) in rows.into_iter().skip(skip) {
            let key = normalize(&keyword, case_sensitive);
            if key.is_empty() || reply.is_empty() {
                continue;
            }
            match table.index.get(&key) {
                Some(&i) => table.entries[i].1 = reply,
                None => {
                    table.index.insert(key.clone(), table.entries.len());
                    table.entries.push((key, reply));
                }
            }
        }

        table
    }

    /// Exact-match lookup. The probe is normalized with the table's own
    /// case-sensitivity before the read.
    pub fn lookup(&self, keyword: &str) -> Option<&str> {
        let key = normalize(keyword, self.case_sensitive);
        self.index.get(&key).map(|&i| self.entries[i].1.as_str())
    }

    /// All entries in insertion order of the most recent rebuild.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the table was built in case-sensitive mode
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}
