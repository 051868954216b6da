use std::path::Path;

use crate::domain::Field;
use crate::spreadsheets::WriteError;

/// Header row of field names, then one row per record.
pub fn export_results_csv(rows: &[Vec<&str>], path: &Path) -> Result<(), WriteError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(Field::ALL.iter().map(|f| f.as_str()))?;
    for row in rows {
        writer.write_record(row)?;
    }

    writer.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
