use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::dates::DateUnit;
use crate::record::BookingRecord;
use crate::Result;

/// Header of every day-file. The name labels pair with the record's name slots in reverse.
pub const HEADER: [&str; 10] = [
    "number",
    "last_name",
    "middle_name",
    "first_name",
    "race",
    "sex",
    "dob",
    "booking_date",
    "release_date",
    "location",
];
/// Fields are joined without escaping, a ',' inside a field shifts the columns.
pub const DELIMITER: char = ',';

/// Where a successfully fetched day ends up. Once `write_day` returns `Ok` the day is final.
#[async_trait]
pub trait DayWriter: Send + Sync {
    async fn write_day(&self, unit: DateUnit, records: &[BookingRecord]) -> Result<()>;
}

/// One `arrests_{year}-{month}-{day}.csv` per day inside `dir`.
#[derive(Debug, Clone)]
pub struct CsvDayWriter {
    dir: PathBuf,
}

impl CsvDayWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn day_path(&self, unit: DateUnit) -> PathBuf {
        self.dir.join(day_file_name(unit))
    }
}

pub fn day_file_name(unit: DateUnit) -> String {
    format!("arrests_{}-{}-{}.csv", unit.year(), unit.month(), unit.day())
}

/// Header line followed by one line per record.
pub fn render_day(records: &[BookingRecord]) -> String {
    let mut buf = [0u8; 4];
    let delimiter: &str = DELIMITER.encode_utf8(&mut buf);
    let mut out = HEADER.join(delimiter);
    out.push('\n');
    for record in records {
        out.push_str(&record.fields().join(delimiter));
        out.push('\n');
    }
    out
}

#[async_trait]
impl DayWriter for CsvDayWriter {
    async fn write_day(&self, unit: DateUnit, records: &[BookingRecord]) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let mut file = fs::File::create(self.day_path(unit)).await?;
        file.write_all(render_day(records).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
