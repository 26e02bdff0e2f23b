//! Parquet fixtures for CLI tests.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_writer::ArrowWriter;
use tempfile::TempDir;

/// Writes two well separated pairs of 2D points as a `features` column:
/// (0,0), (0,1), (5,5), (5,6).
pub(super) fn create_parquet_file(
    dir: &TempDir,
    name: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join(name);
    let item_field = Arc::new(Field::new("item", DataType::Float32, false));
    let schema = Arc::new(Schema::new(vec![Field::new(
        "features",
        DataType::FixedSizeList(item_field.clone(), 2),
        false,
    )]));
    let values = Float32Array::from(vec![0.0_f32, 0.0, 0.0, 1.0, 5.0, 5.0, 5.0, 6.0]);
    let list = FixedSizeListArray::new(item_field, 2, Arc::new(values) as ArrayRef, None);
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(list) as ArrayRef])?;
    let file = File::create(&path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(path)
}
