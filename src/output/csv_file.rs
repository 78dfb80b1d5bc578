use csv::{ReaderBuilder, WriterBuilder};
use std::{fs::File, io::Read, path::Path};
use tracing::{info, instrument};

use super::{MONTH_COLUMN, PARTY_COLUMN, PRESIDENT_COLUMN, YEAR_COLUMN};
use crate::{
    error::{Result, WrangleError},
    month::{Month, MonthKey},
    reconcile::{ReconciledDataset, ReconciledRow},
    utils::{clean_opt, parse_value},
};

fn fmt_value(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

#[instrument(level = "info", skip(path, dataset), fields(path = %path.as_ref().display(), rows = dataset.len()))]
pub fn write_csv<P: AsRef<Path>>(path: P, dataset: &ReconciledDataset) -> Result<()> {
    if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = WriterBuilder::new().from_path(path.as_ref())?;

    let mut header = vec![MONTH_COLUMN.to_string(), YEAR_COLUMN.to_string()];
    header.extend(dataset.columns.iter().cloned());
    header.push(PRESIDENT_COLUMN.to_string());
    header.push(PARTY_COLUMN.to_string());
    wtr.write_record(&header)?;

    for row in &dataset.rows {
        let mut record = vec![row.key.month.name().to_string(), row.key.year.to_string()];
        record.extend(row.values.iter().copied().map(fmt_value));
        record.push(row.president.clone().unwrap_or_default());
        record.push(row.party.clone().unwrap_or_default());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    info!("wrote csv");
    Ok(())
}

/// Read a dataset written by [`write_csv`]. Every column other than Month,
/// Year, President and Party is taken as a numeric value column.
pub fn read_csv_from<R: Read>(reader: R) -> Result<ReconciledDataset> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| WrangleError::MissingColumn {
                column: name.to_string(),
                available: headers.clone(),
            })
    };
    let month_idx = find(MONTH_COLUMN)?;
    let year_idx = find(YEAR_COLUMN)?;
    let president_idx = find(PRESIDENT_COLUMN)?;
    let party_idx = find(PARTY_COLUMN)?;
    let value_idx: Vec<usize> = (0..headers.len())
        .filter(|i| ![month_idx, year_idx, president_idx, party_idx].contains(i))
        .collect();

    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let get = |i: usize| record.get(i).unwrap_or("");
        let invalid = |i: usize| WrangleError::InvalidValue {
            column: headers[i].clone(),
            row,
            value: get(i).to_string(),
        };

        let month = Month::from_name(get(month_idx)).ok_or_else(|| invalid(month_idx))?;
        let year: i32 = get(year_idx).trim().parse().map_err(|_| invalid(year_idx))?;
        let values = value_idx
            .iter()
            .map(|&i| parse_value(get(i)).map_err(|_| invalid(i)))
            .collect::<Result<Vec<_>>>()?;

        rows.push(ReconciledRow {
            key: MonthKey::new(year, month),
            values,
            president: clean_opt(record.get(president_idx)),
            party: clean_opt(record.get(party_idx)),
        });
    }

    Ok(ReconciledDataset {
        columns: value_idx.iter().map(|&i| headers[i].clone()).collect(),
        rows,
    })
}

#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<ReconciledDataset> {
    let file = File::open(path.as_ref())?;
    read_csv_from(file)
}
