use thiserror::Error;
use tracing::debug;

/// The ordered cell texts of one results-table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow(pub Vec<String>);

impl RawRow {
    pub fn cells(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        RawRow(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRecord {
    pub booking_number: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub race: String,
    pub sex: String,
    pub date_of_birth: String,
    pub booking_date: String,
    pub release_date: String,
    pub location: String,
}

impl BookingRecord {
    /// Fields in the order they are written to a day-file.
    pub fn fields(&self) -> [&str; 10] {
        [
            &self.booking_number,
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.race,
            &self.sex,
            &self.date_of_birth,
            &self.booking_date,
            &self.release_date,
            &self.location,
        ]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowExtractionError {
    #[error("row has {0} cells, expected at least 7")]
    TooFewCells(usize),
    #[error("name field {0:?} has no ',' separator")]
    MissingNameSeparator(String),
}

const MIN_CELLS: usize = 7;

/// Result of extracting every row of one results table.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<BookingRecord>,
    /// Data rows that were dropped. Header rows without cells aren't counted.
    pub skipped: usize,
}

/// Builds a record from one row. `None` for header rows and malformed rows.
pub fn extract(row: &RawRow) -> Option<BookingRecord> {
    if row.cells().is_empty() {
        return None;
    }
    match try_extract(row) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(error = %e, "dropping row");
            None
        }
    }
}

pub fn extract_all(rows: &[RawRow]) -> Extraction {
    let mut extraction = Extraction {
        records: Vec::with_capacity(rows.len()),
        skipped: 0,
    };
    for row in rows.iter().filter(|r| !r.cells().is_empty()) {
        match extract(row) {
            Some(record) => extraction.records.push(record),
            None => extraction.skipped += 1,
        }
    }
    extraction
}

/// The pre-comma segment lands in `first_name` and the first post-comma token in
/// `last_name`. Day-file headers label those columns the other way round.
pub fn try_extract(row: &RawRow) -> Result<BookingRecord, RowExtractionError> {
    let cols = row.cells();
    if cols.len() < MIN_CELLS {
        return Err(RowExtractionError::TooFewCells(cols.len()));
    }

    let name = &cols[1];
    let name_parts: Vec<&str> = name.split(',').map(str::trim).collect();
    if name_parts.len() < 2 {
        return Err(RowExtractionError::MissingNameSeparator(name.clone()));
    }
    let (last_name, middle_name) = match name_parts[1].split_once(' ') {
        Some((last, middle)) => (last, middle),
        None => (name_parts[1], ""),
    };

    let (race, sex) = split_race_sex(&cols[2]);

    Ok(BookingRecord {
        booking_number: cols[0].clone(),
        first_name: name_parts[0].to_string(),
        middle_name: middle_name.to_string(),
        last_name: last_name.to_string(),
        race: race.to_string(),
        sex: sex.to_string(),
        date_of_birth: cols[3].clone(),
        booking_date: cols[4].clone(),
        release_date: cols[5].clone(),
        location: cols[6].clone(),
    })
}

/// Race and sex come glued together ("WM"), split at the char midpoint.
/// An approximation: odd-length or multi-letter codes split unevenly.
fn split_race_sex(code: &str) -> (&str, &str) {
    let midpoint = code.chars().count() / 2;
    let byte_idx = code
        .char_indices()
        .nth(midpoint)
        .map(|(i, _)| i)
        .unwrap_or(code.len());
    code.split_at(byte_idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().copied().collect()
    }

    #[test]
    fn extracts_reference_row() {
        let record = extract(&row(&[
            "12345",
            "Smith, John Michael",
            "WM",
            "1980-01-01",
            "2017-01-02",
            "",
            "County Jail",
        ]))
        .unwrap();

        assert_eq!(record.booking_number, "12345");
        assert_eq!(record.first_name, "Smith");
        assert_eq!(record.last_name, "John");
        assert_eq!(record.middle_name, "Michael");
        assert_eq!(record.race, "W");
        assert_eq!(record.sex, "M");
        assert_eq!(record.date_of_birth, "1980-01-01");
        assert_eq!(record.booking_date, "2017-01-02");
        assert_eq!(record.release_date, "");
        assert_eq!(record.location, "County Jail");
    }

    #[test]
    fn missing_middle_name_is_empty() {
        let record = extract(&row(&["1", "Doe, Jane", "BF", "", "", "", ""])).unwrap();
        assert_eq!(record.first_name, "Doe");
        assert_eq!(record.last_name, "Jane");
        assert_eq!(record.middle_name, "");
    }

    #[test]
    fn middle_name_keeps_everything_after_first_space() {
        let record = extract(&row(&["1", "Doe, Jane Ann Marie", "BF", "", "", "", ""])).unwrap();
        assert_eq!(record.middle_name, "Ann Marie");
    }

    #[test]
    fn odd_race_sex_code_gives_longer_sex() {
        assert_eq!(split_race_sex("WMX"), ("W", "MX"));
        assert_eq!(split_race_sex(""), ("", ""));
        assert_eq!(split_race_sex("ÀÉ"), ("À", "É"));
    }

    #[test]
    fn name_without_comma_is_an_error() {
        assert_eq!(
            try_extract(&row(&["1", "Madonna", "WF", "", "", "", ""])),
            Err(RowExtractionError::MissingNameSeparator("Madonna".into()))
        );
    }

    #[test]
    fn short_row_is_an_error() {
        assert_eq!(
            try_extract(&row(&["1", "Doe, Jane", "BF"])),
            Err(RowExtractionError::TooFewCells(3))
        );
    }

    #[test]
    fn bad_rows_do_not_stop_their_siblings() {
        let rows = vec![
            RawRow::default(),
            row(&["1", "Doe, Jane", "BF", "a", "b", "c", "d"]),
            row(&["2", "NoComma", "WM", "a", "b", "c", "d"]),
            row(&["3"]),
            row(&["4", "Roe, Richard", "WM", "a", "b", "c", "d"]),
        ];
        let extraction = extract_all(&rows);

        let numbers: Vec<&str> = extraction
            .records
            .iter()
            .map(|r| r.booking_number.as_str())
            .collect();
        assert_eq!(numbers, ["1", "4"]);
        assert_eq!(extraction.skipped, 2);
    }
}
