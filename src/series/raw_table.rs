use crate::error::{Result, WrangleError};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, warn};

/// One CSV file as read from disk, before any typing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names from the header line.
    pub headers: Vec<String>,
    /// Each data line, one String per field. Short lines are padded with "".
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }
        debug!(columns = headers.len(), rows = rows.len(), "read raw table");
        Ok(Self { headers, rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| WrangleError::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Remove rows by their position in the file (0 = first data line).
    /// Indices past the end are ignored with a warning.
    pub fn drop_rows(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        for &i in indices.iter().filter(|&&i| i >= self.rows.len()) {
            warn!(index = i, rows = self.rows.len(), "drop index out of range");
        }
        let mut idx = 0;
        self.rows.retain(|_| {
            let keep = !indices.contains(&idx);
            idx += 1;
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "observation_date,UNRATE\n1948-01-01,3.4\n1948-02-01,3.8\n1948-03-01\n";

    #[test]
    fn reads_headers_and_pads_short_rows() {
        let t = RawTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(t.headers, vec!["observation_date", "UNRATE"]);
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[2], vec!["1948-03-01".to_string(), String::new()]);
    }

    #[test]
    fn drops_by_original_position() {
        let mut t = RawTable::from_reader(SAMPLE.as_bytes()).unwrap();
        t.drop_rows(&[0, 2, 99]);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0][0], "1948-02-01");
    }

    #[test]
    fn missing_column_lists_available() {
        let t = RawTable::from_reader(SAMPLE.as_bytes()).unwrap();
        match t.column_index("GDP") {
            Err(WrangleError::MissingColumn { column, available }) => {
                assert_eq!(column, "GDP");
                assert_eq!(available.len(), 2);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
