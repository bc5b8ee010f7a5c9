//! Summary operations over loaded datasets
//!
//! Frequency tables and grouped averages, plus field listing. Unknown
//! field names fail fast with the list of valid options.

use std::collections::{BTreeMap, HashMap};

use rowcast_formats::{Dataset, FieldValue};

use crate::{Error, Result};

/// Round to 5 decimal places (frequency percentages)
fn round5(x: f64) -> f64 {
    (x * 100_000.0).round() / 100_000.0
}

/// Round to 2 decimal places (averages)
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn field_index(dataset: &Dataset, field: &str) -> Result<usize> {
    dataset
        .schema()
        .index_of(field)
        .ok_or_else(|| Error::UnknownField {
            field: field.to_string(),
            available: dataset.schema().fields().to_vec(),
        })
}

/// The dataset's field names in column order
pub fn fields(dataset: &Dataset) -> &[String] {
    dataset.schema().fields()
}

/// Value frequency for one field, as percentages of the record count
/// rounded to 5 decimal places, sorted by descending share.
///
/// Ties sort by value display for deterministic output.
pub fn freq_table(dataset: &Dataset, field: &str) -> Result<Vec<(FieldValue, f64)>> {
    let index = field_index(dataset, field)?;
    let total = dataset.len();

    let mut counts: HashMap<FieldValue, usize> = HashMap::new();
    for record in dataset.records() {
        if let Some(value) = record.get(index) {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
    }

    let mut table: Vec<(FieldValue, f64)> = counts
        .into_iter()
        .map(|(value, count)| {
            let share = if total == 0 {
                0.0
            } else {
                round5((count as f64 / total as f64) * 100.0)
            };
            (value, share)
        })
        .collect();

    table.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
    });
    Ok(table)
}

/// Group records by one field's display value and average a numeric
/// second field per group, rounded to 2 decimal places.
///
/// Non-numeric values contribute nothing to the sum but still count
/// toward the group size. Groups come back sorted by name.
pub fn average_by(
    dataset: &Dataset,
    group_field: &str,
    value_field: &str,
) -> Result<Vec<(String, f64)>> {
    let group_index = field_index(dataset, group_field)?;
    let value_index = field_index(dataset, value_field)?;

    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in dataset.records() {
        let Some(group_value) = record.get(group_index) else {
            continue;
        };
        let entry = groups.entry(group_value.to_string()).or_insert((0.0, 0));
        entry.1 += 1;
        if let Some(n) = record.get(value_index).and_then(FieldValue::as_numeric) {
            entry.0 += n;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(name, (sum, count))| (name, round2(sum / count.max(1) as f64)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_formats::{Record, Schema};

    fn sample() -> Dataset {
        let schema = Schema::from_headers(&["id", "category", "rating"]);
        let mut ds = Dataset::new(schema);
        let rows = [
            (1, "GAME", FieldValue::Float(4.5)),
            (2, "GAME", FieldValue::Float(3.5)),
            (3, "SOCIAL", FieldValue::Float(4.0)),
            (4, "TOOLS", FieldValue::Text("NaN".into())),
        ];
        for (id, cat, rating) in rows {
            ds.insert(
                FieldValue::Int(id),
                Record::new(vec![
                    FieldValue::Int(id),
                    FieldValue::Text(cat.into()),
                    rating,
                ]),
            );
        }
        ds
    }

    #[test]
    fn test_fields_listing() {
        let ds = sample();
        assert_eq!(fields(&ds), &["id", "category", "rating"]);
    }

    #[test]
    fn test_freq_table_percentages() {
        let ds = sample();
        let table = freq_table(&ds, "category").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table[0].0, FieldValue::Text("GAME".into()));
        assert_eq!(table[0].1, 50.0);

        let total: f64 = table.iter().map(|(_, pct)| pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_freq_table_tie_order_is_deterministic() {
        let ds = sample();
        let table = freq_table(&ds, "category").unwrap();
        // SOCIAL and TOOLS tie at 25%; alphabetical order breaks it
        assert_eq!(table[1].0, FieldValue::Text("SOCIAL".into()));
        assert_eq!(table[2].0, FieldValue::Text("TOOLS".into()));
    }

    #[test]
    fn test_freq_table_rounds_to_5dp() {
        let schema = Schema::from_headers(&["id", "x"]);
        let mut ds = Dataset::new(schema);
        for id in 0..3 {
            ds.insert(
                FieldValue::Int(id),
                Record::new(vec![
                    FieldValue::Int(id),
                    FieldValue::Text(format!("v{}", id)),
                ]),
            );
        }
        let table = freq_table(&ds, "x").unwrap();
        // 1/3 = 33.33333%
        assert_eq!(table[0].1, 33.33333);
    }

    #[test]
    fn test_unknown_field_lists_options() {
        let ds = sample();
        let err = freq_table(&ds, "genre").unwrap_err();
        match err {
            Error::UnknownField { field, available } => {
                assert_eq!(field, "genre");
                assert_eq!(available, vec!["id", "category", "rating"]);
            }
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn test_average_by_group() {
        let ds = sample();
        let averages = average_by(&ds, "category", "rating").unwrap();
        assert_eq!(
            averages,
            vec![
                ("GAME".to_string(), 4.0),
                ("SOCIAL".to_string(), 4.0),
                // Non-numeric rating counts toward size, adds nothing
                ("TOOLS".to_string(), 0.0),
            ]
        );
    }

    #[test]
    fn test_average_by_unknown_value_field_is_fatal() {
        let ds = sample();
        assert!(matches!(
            average_by(&ds, "category", "reviews"),
            Err(Error::UnknownField { .. })
        ));
    }
}
