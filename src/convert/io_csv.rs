// Primitives for reading and writing CSV files.

use std::fs;
use std::path::Path;

use log::{debug, info};
use snafu::prelude::*;

use precinct_returns::{Cell, Grid, StatewideTable};

use crate::convert::io_common::LoadedWorkbook;
use crate::convert::*;

/// Reads a CSV county file as a workbook with a single sheet, named after the file.
///
/// All the values are kept as text. The header line is part of the sheet.
pub fn read_csv_file(path: &Path) -> ConvertResult<LoadedWorkbook> {
    let path_s = path.display().to_string();
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu {
            path: path_s.clone(),
        })?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(ReadingCsvSnafu {
            path: path_s.clone(),
            lineno,
        })?;
        rows.push(line.iter().map(read_field).collect());
    }
    debug!("read_csv_file: {}: {} lines", path_s, rows.len());

    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();
    Ok(LoadedWorkbook::new(path_s, vec![(sheet_name, Grid::new(rows))]))
}

fn read_field(field: &str) -> Cell {
    if field.is_empty() {
        Cell::Empty
    } else {
        Cell::text(field)
    }
}

/// Renders the statewide table in CSV format, with a header line.
///
/// Votes are integers and a missing district is an empty field.
pub fn render_table(table: &StatewideTable) -> ConvertResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    wtr.write_record(StatewideTable::HEADER)
        .context(RenderingOutputSnafu {})?;
    for r in table.records() {
        let district = r.district.map(|d| d.to_string()).unwrap_or_default();
        let votes = r.votes.to_string();
        wtr.write_record([
            r.county.as_str(),
            r.precinct.as_str(),
            r.office.as_str(),
            district.as_str(),
            r.party.as_str(),
            r.candidate.as_str(),
            votes.as_str(),
        ])
        .context(RenderingOutputSnafu {})?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
        .context(RenderingOutputSnafu {})?;
    match String::from_utf8(bytes) {
        Ok(rendered) => Ok(rendered),
        Err(e) => whatever!("The rendered table is not UTF-8: {}", e),
    }
}

/// Writes the statewide table to a file, or to the standard output for `stdout`.
/// The rendered text is returned.
pub fn write_table(table: &StatewideTable, destination: &str) -> ConvertResult<String> {
    let rendered = render_table(table)?;
    if destination == "stdout" {
        print!("{}", rendered);
    } else {
        fs::write(destination, &rendered).context(WritingOutputSnafu { path: destination })?;
        info!(
            "write_table: {} records written to {}",
            table.len(),
            destination
        );
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use precinct_returns::{Aggregator, NormalizedRecord, SheetRef, SheetSource};

    #[test]
    fn read_flat_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2016-General-Autauga.csv");
        fs::write(
            &path,
            "county,votes,precinct\nAutauga,12,\"Hall, A\"\nAutauga,,P2,extra\n",
        )
        .unwrap();
        let mut wb = read_csv_file(&path).unwrap();
        assert_eq!(wb.sheet_names(), vec!["2016-General-Autauga"]);
        let grid = wb.load_sheet(&SheetRef::Index(0)).unwrap();
        assert_eq!(grid.num_rows(), 3);
        // Ragged lines are padded.
        assert_eq!(grid.num_cols(), 4);
        assert_eq!(grid.get(1, 2), &Cell::text("Hall, A"));
        assert_eq!(grid.get(2, 1), &Cell::Empty);
        assert_eq!(grid.get(1, 3), &Cell::Empty);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_csv_file(&dir.path().join("none.csv"));
        assert!(matches!(res, Err(ConvertError::OpeningCsv { .. })));
    }

    #[test]
    fn render() {
        let mut agg = Aggregator::new();
        agg.insert_county(
            "St. Clair",
            vec![
                NormalizedRecord {
                    county: String::new(),
                    precinct: "Hall, B".to_string(),
                    office: "U.S. House".to_string(),
                    district: Some(3),
                    party: "R".to_string(),
                    candidate: "Doe".to_string(),
                    votes: 1204,
                },
                NormalizedRecord {
                    county: String::new(),
                    precinct: "Hall A".to_string(),
                    office: "Governor".to_string(),
                    district: None,
                    party: String::new(),
                    candidate: "Write-ins".to_string(),
                    votes: 0,
                },
            ],
        );
        let rendered = render_table(&agg.finalize()).unwrap();
        assert_eq!(
            rendered,
            "county,precinct,office,district,party,candidate,votes\n\
             St. Clair,Hall A,Governor,,,Write-ins,0\n\
             St. Clair,\"Hall, B\",U.S. House,3,R,Doe,1204\n"
        );
    }

    #[test]
    fn render_empty_table() {
        let rendered = render_table(&StatewideTable::default()).unwrap();
        assert_eq!(
            rendered,
            "county,precinct,office,district,party,candidate,votes\n"
        );
    }
}
