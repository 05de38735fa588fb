use std::fs;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use super::record::LabeledClaim;
use super::DatasetError;
use crate::constants::LABEL_COLUMN;
use crate::logic::claim::{FeatureValue, RAW_COLUMNS};

/// Write labeled claims in the canonical column layout, label last
pub fn write_claims<W: Write>(sink: W, rows: &[LabeledClaim]) -> Result<usize, DatasetError> {
    let mut writer = WriterBuilder::new().from_writer(sink);

    let header: Vec<&str> = RAW_COLUMNS
        .iter()
        .map(|c| c.name)
        .chain(std::iter::once(LABEL_COLUMN))
        .collect();
    writer.write_record(&header)?;

    for row in rows {
        let mut record: Vec<String> = row
            .claim
            .raw_values()
            .into_iter()
            .map(|v| match v {
                FeatureValue::Numeric(n) => n.to_string(),
                FeatureValue::Categorical(s) => s,
            })
            .collect();
        record.push(row.label.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(rows.len())
}

/// Write a dataset file, creating parent directories
pub fn write_csv(path: &Path, rows: &[LabeledClaim]) -> Result<usize, DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let count = write_claims(fs::File::create(path)?, rows)?;
    log::info!("Wrote {} labeled claims to {}", count, path.display());
    Ok(count)
}
