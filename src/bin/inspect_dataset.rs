use anyhow::{Context, Result};
use clap::Parser;
use parquet::file::{
    metadata::{ColumnChunkMetaData, RowGroupMetaData},
    reader::{FileReader, SerializedFileReader},
};
use std::{fs::File, path::PathBuf};

/// Print the layout of a dataset Parquet file: schema, row groups and
/// per-column null counts.
#[derive(Parser)]
#[command(author, version)]
struct Args {
    path: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let file = File::open(&args.path).with_context(|| format!("opening {}", args.path.display()))?;
    let reader = SerializedFileReader::new(file)?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();

    println!("=== {} ===", args.path.display());
    println!("Created by:   {}", file_meta.created_by().unwrap_or("<unknown>"));
    println!("Rows:         {}", file_meta.num_rows());
    println!("Row groups:   {}", meta.num_row_groups());
    println!("Size on disk: {} bytes", std::fs::metadata(&args.path)?.len());
    println!();

    println!("=== Columns ===");
    for col in file_meta.schema_descr().columns() {
        let logical = col
            .logical_type()
            .as_ref()
            .map_or("<none>".to_string(), |lt| format!("{:?}", lt));
        println!(
            "- {:<24} | {:<10} | {}",
            col.name(),
            format!("{:?}", col.physical_type()),
            logical
        );
    }
    println!();

    for idx in 0..meta.num_row_groups() {
        print_row_group(idx, meta.row_group(idx));
    }
    Ok(())
}

fn print_row_group(idx: usize, rg: &RowGroupMetaData) {
    println!("--- Row group {} ({} rows, {} bytes) ---", idx, rg.num_rows(), rg.total_byte_size());
    for col in rg.columns() {
        print_column(col);
    }
    println!();
}

fn print_column(col: &ColumnChunkMetaData) {
    let nulls = col
        .statistics()
        .and_then(|s| s.null_count_opt())
        .map_or("?".to_string(), |n| n.to_string());
    println!(
        "  {:<24} {:?}, {} values, {} nulls, {} -> {} bytes",
        col.column_descr().name(),
        col.compression(),
        col.num_values(),
        nulls,
        col.uncompressed_size(),
        col.compressed_size()
    );
}
