//! Reshaping of each known layout into long-form records.
//!
//! All the layouts present the results as a wide grid meant to be read by
//! humans. The reshapers unpivot ("melt") these grids into one record per
//! (contest, candidate, precinct). Extraction of districts and parties is
//! left to the next stage.

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use snafu::prelude::*;

use crate::config::*;
use crate::sanitize::sanitize;
use crate::{LoadingSheetSnafu, MalformedSheetSnafu, NormalizeResult, SheetRef, SheetSource};

const REPORTED_TOTALS: &str = "REPORTED TOTALS";
const CALCULATED_TOTALS: &str = "CALCULATED TOTALS";
const TOTAL_PRECINCT: &str = "Total";

/// Propagates the last non-empty value rightward over the empty cells.
/// Leading empty cells stay empty.
pub fn forward_fill(row: &[Cell]) -> Vec<Cell> {
    let mut res: Vec<Cell> = Vec::with_capacity(row.len());
    let mut last: Cell = Cell::Empty;
    for c in row {
        if !c.is_empty() {
            last = c.clone();
        }
        res.push(last.clone());
    }
    res
}

pub fn transpose(grid: &Grid) -> Grid {
    let rows: Vec<Vec<Cell>> = (0..grid.num_cols())
        .map(|col| {
            (0..grid.num_rows())
                .map(|row| grid.get(row, col).clone())
                .collect()
        })
        .collect();
    Grid::new(rows)
}

fn resolve_votes(cell: &Cell, policy: MissingVotes) -> Option<u64> {
    match (cell.as_votes(), policy) {
        (Some(v), _) => Some(v),
        (None, MissingVotes::Zero) => Some(0),
        (None, MissingVotes::Drop) => None,
    }
}

fn find_column(header: &[Cell], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|c| names.iter().any(|n| c.is_text(n)))
}

// ******** Contest title column ********

/// Rows are (contest, party, candidate), every other column is a precinct.
pub fn reshape_contest_title(grid: &Grid) -> NormalizeResult<Vec<RawRecord>> {
    let layout = LayoutKind::ContestTitleColumn;
    let policy = layout.missing_votes();
    let header: Vec<Cell> = grid.rows().first().cloned().unwrap_or_default();
    debug!("reshape_contest_title: header: {:?}", header);

    let contest_idx =
        find_column(&header, &["Contest Title"]).context(MalformedSheetSnafu {
            layout,
            message: "no Contest Title column",
        })?;
    let party_idx =
        find_column(&header, &["Party", "Party Code"]).context(MalformedSheetSnafu {
            layout,
            message: "no party column",
        })?;
    let candidate_idx = find_column(&header, &["Candidate", "Candidate Name"]).context(
        MalformedSheetSnafu {
            layout,
            message: "no candidate column",
        },
    )?;
    let id_columns = [contest_idx, party_idx, candidate_idx];

    let mut res: Vec<RawRecord> = Vec::new();
    for (col, precinct_cell) in header.iter().enumerate() {
        if id_columns.contains(&col) {
            continue;
        }
        if precinct_cell.is_empty() {
            debug!("reshape_contest_title: column {} has no precinct name", col);
            continue;
        }
        let precinct = precinct_cell.label_or_empty();
        for row in 1..grid.num_rows() {
            let votes = match resolve_votes(grid.get(row, col), policy) {
                Some(v) => v,
                None => continue,
            };
            res.push(RawRecord {
                contest: grid.get(row, contest_idx).label_or_empty(),
                candidate: grid.get(row, candidate_idx).label_or_empty(),
                party: grid.get(row, party_idx).as_label(),
                precinct: precinct.clone(),
                votes,
            });
        }
    }
    Ok(res)
}

// ******** Blank header, transposed ********

/// Offices and candidates along the first two rows, one precinct per row.
///
/// `excluded_rows` are positions in the grid that must be dropped before the
/// transposition.
pub fn reshape_blank_header(grid: &Grid, excluded_rows: &[usize]) -> Vec<RawRecord> {
    let policy = LayoutKind::BlankHeaderTransposed.missing_votes();

    let mut rows: Vec<Vec<Cell>> = grid.rows().to_vec();
    if let Some(first) = rows.first_mut() {
        *first = forward_fill(first);
    }
    if !excluded_rows.is_empty() {
        info!(
            "reshape_blank_header: dropping excluded rows {:?}",
            excluded_rows
        );
    }
    let kept: Vec<Vec<Cell>> = rows
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !excluded_rows.contains(idx))
        .map(|(_, r)| r)
        .collect();

    let transposed = transpose(&Grid::new(kept));
    let mut header: Vec<Cell> = transposed.rows().first().cloned().unwrap_or_default();
    for (idx, label) in ["office", "candidate"].iter().enumerate() {
        if let Some(c) = header.get_mut(idx) {
            *c = Cell::text(label);
        }
    }
    debug!("reshape_blank_header: header: {:?}", header);

    let mut res: Vec<RawRecord> = Vec::new();
    for (col, precinct_cell) in header.iter().enumerate().skip(2) {
        let precinct = match precinct_cell.label_or_empty() {
            p if p == CALCULATED_TOTALS => continue,
            p if p == REPORTED_TOTALS => TOTAL_PRECINCT.to_string(),
            p => p,
        };
        for row in 1..transposed.num_rows() {
            let votes = match resolve_votes(transposed.get(row, col), policy) {
                Some(v) => v,
                None => continue,
            };
            res.push(RawRecord {
                contest: transposed.get(row, 0).label_or_empty(),
                candidate: transposed.get(row, 1).label_or_empty(),
                party: None,
                precinct: precinct.clone(),
                votes,
            });
        }
    }
    res
}

// ******** Table of contents ********

static VOTE_FOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:FOR )?(.*?)\s*\(Vote For \d+\)").unwrap());

/// The (sheet name, office description) entries of a table of contents that
/// start with one of the given prefixes.
pub fn relevant_sheets(directory: &Grid, prefixes: &[String]) -> Vec<(String, String)> {
    let mut res: Vec<(String, String)> = Vec::new();
    for row in 0..directory.num_rows() {
        let description = directory.get(row, 1).label_or_empty();
        if !prefixes.iter().any(|p| description.starts_with(p.as_str())) {
            continue;
        }
        match directory.get(row, 0).as_label() {
            Some(sheet) => res.push((sheet, description)),
            None => warn!(
                "relevant_sheets: no sheet name for contest {:?}",
                description
            ),
        }
    }
    res
}

/// "FOR UNITED STATES REPRESENTATIVE, 1ST DISTRICT (Vote For 1)"
///   -> "UNITED STATES REPRESENTATIVE, 1ST DISTRICT"
pub fn office_from_description(description: &str) -> String {
    match VOTE_FOR_REGEX.captures(description).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().to_string(),
        None => description
            .strip_prefix("FOR ")
            .unwrap_or(description)
            .to_string(),
    }
}

/// Reshapes one contest sheet of a table-of-contents file.
///
/// The sheet has a title row, then a header row of candidates in which every
/// other column holds a subtotal, and one row per precinct. The last column
/// and the last row are totals.
pub fn reshape_toc_sheet(sheet: &Grid, office: &str) -> Vec<RawRecord> {
    let policy = LayoutKind::TableOfContentsIndexed.missing_votes();
    let columns: Vec<usize> = (0..sheet.num_cols().saturating_sub(1))
        .step_by(2)
        .collect();
    let mut results: Vec<Vec<Cell>> = sheet
        .rows()
        .iter()
        .skip(1)
        .map(|r| columns.iter().map(|&c| r[c].clone()).collect())
        .collect();
    if results.is_empty() || columns.is_empty() {
        warn!("reshape_toc_sheet: nothing to read for {:?}", office);
        return Vec::new();
    }
    results[0][0] = Cell::text("precinct");
    let last = results.len() - 1;
    results[last][0] = Cell::text(TOTAL_PRECINCT);

    let header: Vec<Cell> = results[0].clone();
    debug!("reshape_toc_sheet: header: {:?}", header);
    let mut res: Vec<RawRecord> = Vec::new();
    for (col, candidate_cell) in header.iter().enumerate().skip(1) {
        let candidate = candidate_cell.label_or_empty();
        for row in results.iter().skip(2) {
            let votes = match resolve_votes(&row[col], policy) {
                Some(v) => v,
                None => continue,
            };
            res.push(RawRecord {
                contest: office.to_string(),
                candidate: candidate.clone(),
                party: None,
                precinct: row[0].label_or_empty(),
                votes,
            });
        }
    }
    res
}

/// Follows the table of contents to the sheets of the relevant contests.
pub fn reshape_table_of_contents(
    directory: &Grid,
    source: &mut dyn SheetSource,
    county: &str,
    prefixes: &[String],
) -> NormalizeResult<Vec<RawRecord>> {
    let mut res: Vec<RawRecord> = Vec::new();
    for (sheet_name, description) in relevant_sheets(directory, prefixes) {
        info!(
            "reshape_table_of_contents: county {} sheet {:?}",
            county, sheet_name
        );
        let sheet = source
            .load_sheet(&SheetRef::Name(sheet_name.clone()))
            .context(LoadingSheetSnafu {
                county,
                sheet: sheet_name.clone(),
            })?;
        let office = office_from_description(&description);
        res.extend(reshape_toc_sheet(&sanitize(&sheet), &office));
    }
    Ok(res)
}

// ******** Flat records ********

/// The columns of the CSV exports, in order.
pub const FLAT_RECORD_COLUMNS: [&str; 10] = [
    "county",
    "election_date",
    "contest_number",
    "candidate_number",
    "votes",
    "party",
    "contest_title",
    "candidate",
    "precinct",
    "district_name",
];

const CONTEST_NUMBER_COL: usize = 2;
const VOTES_COL: usize = 4;
const PARTY_COL: usize = 5;
const CONTEST_TITLE_COL: usize = 6;
const CANDIDATE_COL: usize = 7;
const PRECINCT_COL: usize = 8;

/// Contests numbered below this are registered voters, ballots cast, etc.
const FIRST_CANDIDATE_CONTEST: f64 = 100.0;

/// Already one observation per line. The first line is a header.
pub fn reshape_flat_record(grid: &Grid) -> NormalizeResult<Vec<RawRecord>> {
    let layout = LayoutKind::FlatRecord;
    let policy = layout.missing_votes();
    if grid.is_empty() {
        return Ok(Vec::new());
    }
    ensure!(
        grid.num_cols() == FLAT_RECORD_COLUMNS.len(),
        MalformedSheetSnafu {
            layout,
            message: format!(
                "expected {} columns, found {}",
                FLAT_RECORD_COLUMNS.len(),
                grid.num_cols()
            ),
        }
    );

    let mut res: Vec<RawRecord> = Vec::new();
    for row in 1..grid.num_rows() {
        match grid.get(row, CONTEST_NUMBER_COL).as_number() {
            Some(n) if n >= FIRST_CANDIDATE_CONTEST => {}
            Some(_) => continue,
            None => {
                debug!(
                    "reshape_flat_record: line {}: no contest number: {:?}",
                    row + 1,
                    grid.get(row, CONTEST_NUMBER_COL)
                );
                continue;
            }
        }
        let votes = match resolve_votes(grid.get(row, VOTES_COL), policy) {
            Some(v) => v,
            None => continue,
        };
        res.push(RawRecord {
            contest: grid.get(row, CONTEST_TITLE_COL).label_or_empty(),
            candidate: grid.get(row, CANDIDATE_COL).label_or_empty(),
            party: grid.get(row, PARTY_COL).as_label(),
            precinct: grid.get(row, PRECINCT_COL).label_or_empty(),
            votes,
        });
    }
    Ok(res)
}
