use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Record – one parsed data row
// ---------------------------------------------------------------------------

/// A single data row, positionally aligned with the owning [`Dataset`]'s
/// field list.
///
/// Every record carries exactly one slot per schema field; a missing or empty
/// raw value is stored as `None`, never omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    /// Build a record from raw cells, padding with nulls (or truncating) to
    /// `width` slots. Cells are trimmed and empty strings become null.
    pub fn from_raw<'a, I>(cells: I, width: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values: Vec<Option<String>> = cells
            .into_iter()
            .take(width)
            .map(|cell| {
                let cell = cell.trim();
                (!cell.is_empty()).then(|| cell.to_string())
            })
            .collect();
        values.resize(width, None);
        Record { values }
    }

    /// Raw value at a schema position.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    /// Number of slots (always the schema width).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete ingested table
// ---------------------------------------------------------------------------

/// The full parsed table: the header-derived schema plus every data row.
///
/// Created once at load time and never mutated afterwards; filtering and
/// grouping produce index lists that point back into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Ordered field names taken from the header line.
    fields: Vec<String>,
    /// All rows, each exactly `fields.len()` wide.
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(fields: Vec<String>, records: Vec<Record>) -> Self {
        debug_assert!(records.iter().all(|r| r.len() == fields.len()));
        Dataset { fields, records }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Position of a field in the schema.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Raw value of `field` in row `row`; `None` for null cells, unknown
    /// fields and out-of-range rows alike.
    pub fn value(&self, row: usize, field: &str) -> Option<&str> {
        let idx = self.field_index(field)?;
        self.records.get(row)?.get(idx)
    }

    /// Sorted set of distinct non-null values in a column.
    pub fn unique_values(&self, field: &str) -> BTreeSet<&str> {
        let Some(idx) = self.field_index(field) else {
            return BTreeSet::new();
        };
        self.records.iter().filter_map(|r| r.get(idx)).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records x {} fields",
            self.records.len(),
            self.fields.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_pads_short_rows() {
        let record = Record::from_raw(["1"], 3);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(0), Some("1"));
        assert_eq!(record.get(1), None);
        assert_eq!(record.get(2), None);
    }

    #[test]
    fn test_record_trims_and_nulls_empty() {
        let record = Record::from_raw([" 4.5 ", "   ", ""], 3);
        assert_eq!(record.get(0), Some("4.5"));
        assert_eq!(record.get(1), None);
        assert_eq!(record.get(2), None);
    }

    #[test]
    fn test_record_drops_extra_cells() {
        let record = Record::from_raw(["a", "b", "c"], 2);
        assert_eq!(record.values(), &[Some("a".into()), Some("b".into())]);
    }

    #[test]
    fn test_dataset_lookup() {
        let fields = vec!["name".to_string(), "koi_period".to_string()];
        let records = vec![
            Record::from_raw(["K1", "3.5"], 2),
            Record::from_raw(["K2"], 2),
        ];
        let ds = Dataset::new(fields, records);
        assert_eq!(ds.value(0, "koi_period"), Some("3.5"));
        assert_eq!(ds.value(1, "koi_period"), None);
        assert_eq!(ds.value(0, "unknown"), None);
        assert_eq!(ds.value(5, "name"), None);
        assert_eq!(ds.unique_values("name").len(), 2);
        assert_eq!(ds.to_string(), "2 records x 2 fields");
    }
}
