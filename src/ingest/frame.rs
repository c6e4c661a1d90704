use std::io::Read;

/// One named column of raw cell values. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl Column {
    /// True when every non-missing cell parses as a number. Empty columns do
    /// not count as numeric.
    pub fn is_numeric(&self) -> bool {
        let mut seen = false;
        for v in self.values.iter().flatten() {
            if v.trim().parse::<f64>().is_err() {
                return false;
            }
            seen = true;
        }
        seen
    }
}

/// An arbitrary tabular frame: ordered named columns of equal length.
///
/// This is the normalizer's input contract; no schema is assumed beyond
/// "some column looks like a date, some column looks like a value".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Read a headed CSV into a frame. Short rows pad with missing cells,
    /// long rows drop the extras.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column { name: h.to_string(), values: Vec::new() })
            .collect();

        for record in rdr.records() {
            let record = record?;
            for (i, col) in columns.iter_mut().enumerate() {
                let cell = record.get(i).map(str::trim);
                col.values.push(match cell {
                    None | Some("") => None,
                    Some(v) => Some(v.to_string()),
                });
            }
        }

        Ok(Self { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_basic() {
        let csv = "ds,y\n2023-01-01,100\n2023-01-02,110\n";
        let frame = Frame::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(frame.columns().len(), 2);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(
            frame.column("y").unwrap().values,
            vec![Some("100".to_string()), Some("110".to_string())]
        );
    }

    #[test]
    fn test_from_csv_short_rows_pad_with_missing() {
        let csv = "ds,y\n2023-01-01,100\n2023-01-02\n";
        let frame = Frame::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(frame.column("y").unwrap().values[1], None);
    }

    #[test]
    fn test_is_numeric() {
        let numeric = Column {
            name: "v".into(),
            values: vec![Some("1.5".into()), None, Some("-2".into())],
        };
        let mixed = Column {
            name: "v".into(),
            values: vec![Some("1.5".into()), Some("abc".into())],
        };
        let empty = Column { name: "v".into(), values: vec![None, None] };

        assert!(numeric.is_numeric());
        assert!(!mixed.is_numeric());
        assert!(!empty.is_numeric());
    }
}
