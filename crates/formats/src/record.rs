//! Record and schema types for parsed rows
//!
//! A schema is established once per file from the header row (or from
//! column positions when headers are absent) and every record in the
//! resulting dataset shares it.

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Name of the key field every schema carries
pub const ID_FIELD: &str = "id";

/// The declared field set for one dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Field names in column order
    fields: Vec<String>,
    /// Column index of the `id` field
    id_index: usize,
    /// Whether `id` was appended rather than sourced from a column
    synthesized_id: bool,
}

impl Schema {
    /// Build a schema from raw header tokens.
    ///
    /// Tokens are normalized (spaces to underscores, lowercased). An
    /// `id` column is appended when the header has none.
    pub fn from_headers<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut fields: Vec<String> = tokens
            .iter()
            .map(|t| normalize_header(t.as_ref()))
            .collect();

        match fields.iter().position(|f| f == ID_FIELD) {
            Some(idx) => Self {
                fields,
                id_index: idx,
                synthesized_id: false,
            },
            None => {
                fields.push(ID_FIELD.to_string());
                let id_index = fields.len() - 1;
                Self {
                    fields,
                    id_index,
                    synthesized_id: true,
                }
            }
        }
    }

    /// Build a positional schema for a headerless file.
    ///
    /// Field names are the column index rendered as a string, with a
    /// synthesized `id` appended.
    pub fn positional(width: usize) -> Self {
        let mut fields: Vec<String> = (0..width).map(|i| i.to_string()).collect();
        fields.push(ID_FIELD.to_string());
        let id_index = fields.len() - 1;
        Self {
            fields,
            id_index,
            synthesized_id: true,
        }
    }

    /// Field names in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields, including a synthesized `id`
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of columns expected in the source file
    ///
    /// One less than [`len`](Self::len) when the `id` is synthesized.
    pub fn source_width(&self) -> usize {
        if self.synthesized_id {
            self.fields.len() - 1
        } else {
            self.fields.len()
        }
    }

    /// Column index of the `id` field
    pub fn id_index(&self) -> usize {
        self.id_index
    }

    /// Whether the `id` field was synthesized from the row index
    pub fn has_synthesized_id(&self) -> bool {
        self.synthesized_id
    }

    /// Look up a field's column index by name (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.fields.iter().position(|f| *f == wanted)
    }
}

/// One parsed data row
///
/// Values are stored in schema column order; field access by name goes
/// through the owning dataset's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<FieldValue>,
}

impl Record {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalize a header token: spaces become underscores, lowercased
pub fn normalize_header(token: &str) -> String {
    token.trim().replace(' ', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_normalization() {
        assert_eq!(normalize_header("Content Rating"), "content_rating");
        assert_eq!(normalize_header("App"), "app");
        assert_eq!(normalize_header(" Last Updated\n"), "last_updated");
    }

    #[test]
    fn test_schema_with_existing_id() {
        let schema = Schema::from_headers(&["id", "track_name", "size_bytes"]);
        assert_eq!(schema.fields(), &["id", "track_name", "size_bytes"]);
        assert_eq!(schema.id_index(), 0);
        assert!(!schema.has_synthesized_id());
        assert_eq!(schema.source_width(), 3);
    }

    #[test]
    fn test_schema_appends_missing_id() {
        let schema = Schema::from_headers(&["App", "Category", "Rating"]);
        assert_eq!(schema.fields(), &["app", "category", "rating", "id"]);
        assert_eq!(schema.id_index(), 3);
        assert!(schema.has_synthesized_id());
        // The file itself only has three columns
        assert_eq!(schema.source_width(), 3);
    }

    #[test]
    fn test_positional_schema() {
        let schema = Schema::positional(3);
        assert_eq!(schema.fields(), &["0", "1", "2", "id"]);
        assert!(schema.has_synthesized_id());
        assert_eq!(schema.source_width(), 3);
    }

    #[test]
    fn test_index_of_is_case_insensitive() {
        let schema = Schema::from_headers(&["App", "Content Rating"]);
        assert_eq!(schema.index_of("Content_Rating"), Some(1));
        assert_eq!(schema.index_of("app"), Some(0));
        assert_eq!(schema.index_of("missing"), None);
    }
}
