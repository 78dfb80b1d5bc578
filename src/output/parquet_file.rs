use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, path::Path};
use tracing::{info, instrument};

use super::to_record_batch;
use crate::{error::Result, reconcile::ReconciledDataset};

/// Write the dataset as a single-row-group, Snappy-compressed Parquet file.
#[instrument(level = "info", skip(path, dataset), fields(path = %path.as_ref().display(), rows = dataset.len()))]
pub fn write_parquet<P: AsRef<Path>>(path: P, dataset: &ReconciledDataset) -> Result<()> {
    if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let batch = to_record_batch(dataset)?;
    let file = File::create(path.as_ref())?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    info!("wrote parquet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::small_dataset;
    use arrow::array::{Array, Float64Array, Int32Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    #[test]
    fn parquet_round_trips_columns() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dataset.parquet");
        write_parquet(&path, &small_dataset())?;

        let file = File::open(&path)?;
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(1024)
            .build()?;
        let batch = reader.next().transpose()?.expect("one batch");
        assert_eq!(batch.num_rows(), 3);

        let months = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(months.value(1), "January");
        let years = batch
            .column(1)
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap();
        assert_eq!(years.value(1), 1953);
        let gdp = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(gdp.is_null(2));
        assert_eq!(gdp.value(0), 358.2);
        Ok(())
    }
}
