//! Dataset: the keyed collection produced by one load operation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::{Record, Schema};
use crate::value::FieldValue;

/// A full collection of records keyed by id value
///
/// Constructed once per input file and read-only afterwards; there are
/// no update or delete operations. Every record shares the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    schema: Schema,
    records: HashMap<FieldValue, Record>,
}

impl Dataset {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a record under its id value.
    ///
    /// A colliding id replaces the previous record; first-column
    /// deduplication upstream makes collisions rare.
    pub fn insert(&mut self, id: FieldValue, record: Record) {
        self.records.insert(id, record);
    }

    /// Look up a record by id value
    pub fn get(&self, id: &FieldValue) -> Option<&Record> {
        self.records.get(id)
    }

    /// Iterate over (id, record) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldValue, &Record)> {
        self.records.iter()
    }

    /// Iterate over records in unspecified order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// A record's field value by field name
    pub fn field<'a>(&self, record: &'a Record, name: &str) -> Option<&'a FieldValue> {
        let idx = self.schema.index_of(name)?;
        record.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let schema = Schema::from_headers(&["id", "name", "rating"]);
        let mut ds = Dataset::new(schema);
        ds.insert(
            FieldValue::Int(1),
            Record::new(vec![
                FieldValue::Int(1),
                FieldValue::Text("Alpha".into()),
                FieldValue::Float(4.5),
            ]),
        );
        ds.insert(
            FieldValue::Int(2),
            Record::new(vec![
                FieldValue::Int(2),
                FieldValue::Text("Beta".into()),
                FieldValue::Float(3.9),
            ]),
        );
        ds
    }

    #[test]
    fn test_lookup_by_id() {
        let ds = sample();
        assert_eq!(ds.len(), 2);
        let rec = ds.get(&FieldValue::Int(1)).unwrap();
        assert_eq!(rec.get(1), Some(&FieldValue::Text("Alpha".into())));
        assert!(ds.get(&FieldValue::Int(99)).is_none());
    }

    #[test]
    fn test_field_access_by_name() {
        let ds = sample();
        let rec = ds.get(&FieldValue::Int(2)).unwrap();
        assert_eq!(ds.field(rec, "rating"), Some(&FieldValue::Float(3.9)));
        assert_eq!(ds.field(rec, "Name"), Some(&FieldValue::Text("Beta".into())));
        assert_eq!(ds.field(rec, "nope"), None);
    }

    #[test]
    fn test_colliding_id_replaces() {
        let mut ds = sample();
        ds.insert(
            FieldValue::Int(1),
            Record::new(vec![
                FieldValue::Int(1),
                FieldValue::Text("Gamma".into()),
                FieldValue::Float(2.0),
            ]),
        );
        assert_eq!(ds.len(), 2);
        let rec = ds.get(&FieldValue::Int(1)).unwrap();
        assert_eq!(rec.get(1), Some(&FieldValue::Text("Gamma".into())));
    }
}
