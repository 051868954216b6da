// src/spreadsheets/writer.rs
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::config::TabularFormat;
use crate::domain::{Field, ResultSet};
use crate::spreadsheets::export_csv::export_results_csv;
use crate::spreadsheets::export_xlsx::export_results_xlsx;
use crate::spreadsheets::WriteError;
use crate::telemetry::Telemetry;

pub const OUTPUT_STEM: &str = "available_cars";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Tabular(TabularFormat),
    /// `{field: [values]}`; used when columns differ in length.
    Structured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub encoding: Encoding,
    pub path: PathBuf,
    pub records: usize,
    pub column_lengths: Vec<(Field, usize)>,
}

impl PersistOutcome {
    pub fn fell_back(&self) -> bool {
        self.encoding == Encoding::Structured
    }
}

pub struct ResultWriter<'a> {
    dir: PathBuf,
    format: TabularFormat,
    telemetry: &'a dyn Telemetry,
}

impl<'a> ResultWriter<'a> {
    pub fn new(dir: &Path, format: TabularFormat, telemetry: &'a dyn Telemetry) -> Self {
        Self {
            dir: dir.to_path_buf(),
            format,
            telemetry,
        }
    }

    /// Writes a spreadsheet when every column has the same length and a JSON
    /// object of columns otherwise. A shape mismatch is reported in the
    /// outcome, never as an error.
    pub fn persist(&self, results: &ResultSet) -> Result<PersistOutcome, WriteError> {
        fs::create_dir_all(&self.dir).map_err(|source| WriteError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let column_lengths = results.column_lengths();

        let (encoding, path) = match results.rows() {
            Some(rows) => {
                let path = match self.format {
                    TabularFormat::Csv => {
                        let path = self.path_for("csv");
                        export_results_csv(&rows, &path)?;
                        path
                    }
                    TabularFormat::Xlsx => {
                        let path = self.path_for("xlsx");
                        export_results_xlsx(&rows, &path)?;
                        path
                    }
                };
                self.telemetry
                    .info(&format!("Saved {} records to {}", rows.len(), path.display()));
                (Encoding::Tabular(self.format), path)
            }
            None => {
                self.telemetry.warn(&format!(
                    "Columns differ in length, cannot save as a table: {}",
                    describe_lengths(&column_lengths)
                ));
                let path = self.path_for("json");
                self.write_json(results, &path)?;
                self.telemetry
                    .info(&format!("Saved columns as JSON in {}", path.display()));
                (Encoding::Structured, path)
            }
        };

        Ok(PersistOutcome {
            encoding,
            path,
            records: results.len(),
            column_lengths,
        })
    }

    fn path_for(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{OUTPUT_STEM}.{extension}"))
    }

    fn write_json(&self, results: &ResultSet, path: &Path) -> Result<(), WriteError> {
        let file = File::create(path).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), results)?;
        Ok(())
    }
}

fn describe_lengths(lengths: &[(Field, usize)]) -> String {
    lengths
        .iter()
        .map(|(field, len)| format!("{}={}", field.as_str(), len))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingRecord;
    use crate::tests::utils::RecordingTelemetry;

    fn filled(n: usize) -> ResultSet {
        let mut set = ResultSet::new();
        for i in 0..n {
            set.push_record(&ListingRecord {
                id: i.to_string(),
                make: "Honda".into(),
                model: "Civic".into(),
                year: "2022".into(),
                trim: "EX, Sedan".into(),
                mileage: "10,000 miles".into(),
                price: "$23,590".into(),
                monthly_payment: "$399/mo".into(),
                status: "None".into(),
                link: format!("https://www.carvana.com/vehicle/{i}"),
            });
        }
        set
    }

    #[test]
    fn uniform_columns_are_written_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let telemetry = RecordingTelemetry::default();

        let outcome = ResultWriter::new(dir.path(), TabularFormat::Csv, &telemetry)
            .persist(&filled(5))
            .unwrap();

        assert_eq!(outcome.encoding, Encoding::Tabular(TabularFormat::Csv));
        assert!(!outcome.fell_back());
        assert_eq!(outcome.records, 5);

        let mut reader = csv::Reader::from_path(&outcome.path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 10);
        assert_eq!(&headers[0], "id");
        assert_eq!(&headers[7], "monthly_payment");

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(&rows[4][0], "4");
        assert_eq!(&rows[4][4], "EX, Sedan");
    }

    #[test]
    fn uneven_columns_fall_back_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let telemetry = RecordingTelemetry::default();
        let mut set = filled(4);
        set.push_value(Field::Link, "https://www.carvana.com/vehicle/extra");
        set.push_value(Field::Id, "extra");

        let outcome = ResultWriter::new(dir.path(), TabularFormat::Csv, &telemetry)
            .persist(&set)
            .unwrap();

        assert!(outcome.fell_back());
        assert_eq!(outcome.path, dir.path().join("available_cars.json"));
        assert!(outcome.column_lengths.contains(&(Field::Link, 5)));
        assert!(outcome.column_lengths.contains(&(Field::Make, 4)));
        assert!(telemetry.contains("make=4"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&outcome.path).unwrap()).unwrap();
        assert_eq!(written["link"].as_array().unwrap().len(), 5);
        assert_eq!(written["make"].as_array().unwrap().len(), 4);
        assert!(!dir.path().join("available_cars.csv").exists());
    }

    #[test]
    fn xlsx_is_written_when_selected() {
        let dir = tempfile::tempdir().unwrap();
        let telemetry = RecordingTelemetry::default();

        let outcome = ResultWriter::new(dir.path(), TabularFormat::Xlsx, &telemetry)
            .persist(&filled(2))
            .unwrap();

        assert_eq!(outcome.encoding, Encoding::Tabular(TabularFormat::Xlsx));
        assert!(outcome.path.ends_with("available_cars.xlsx"));
        assert!(fs::metadata(&outcome.path).unwrap().len() > 0);
    }

    #[test]
    fn output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("raw");
        let telemetry = RecordingTelemetry::default();

        let outcome = ResultWriter::new(&nested, TabularFormat::Csv, &telemetry)
            .persist(&ResultSet::new())
            .unwrap();

        assert!(outcome.path.starts_with(&nested));
        assert_eq!(outcome.records, 0);
    }
}
