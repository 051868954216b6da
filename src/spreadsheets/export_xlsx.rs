use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::domain::Field;
use crate::spreadsheets::WriteError;

pub fn export_results_xlsx(rows: &[Vec<&str>], path: &Path) -> Result<(), WriteError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    for (col, field) in Field::ALL.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, field.as_str())
            .map_err(|e| {
                WriteError::Xlsx(format!("Failed to write header '{}': {}", field.as_str(), e))
            })?;
    }

    // Rows
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        for (col, value) in row.iter().enumerate() {
            worksheet.write_string(r, col as u16, *value).map_err(|e| {
                WriteError::Xlsx(format!(
                    "Failed to write {} for row {}: {}",
                    Field::ALL[col].as_str(),
                    r,
                    e
                ))
            })?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| WriteError::Xlsx(format!("Failed to save workbook: {}", e)))
}
