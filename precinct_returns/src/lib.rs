//! Normalization of precinct-level election results.
//!
//! County election offices publish their results as spreadsheets whose layout
//! changes from one year to the next. This crate detects which of the known
//! layouts a file uses and turns it into canonical records
//! `(county, precinct, office, district, party, candidate, votes)`.
//!
//! The pipeline for one county file is:
//! sanitize -> classify -> reshape -> extract fields -> normalize vocabulary.
//! The [`aggregate::Aggregator`] then collects the counties of a run.
//!
//! See the [`manual`] for the description of each layout.

mod classify;
mod config;
mod extract;
mod reshape;
mod sanitize;
mod vocabulary;

pub mod aggregate;
pub mod manual;

use log::{debug, info};
use snafu::prelude::*;
use std::fmt::Display;

pub use crate::aggregate::{Aggregator, StatewideTable};
pub use crate::classify::classify;
pub use crate::config::*;
pub use crate::extract::{extract_candidate_and_party, extract_office_and_district};
pub use crate::reshape::{
    forward_fill, office_from_description, relevant_sheets, reshape_blank_header,
    reshape_contest_title, reshape_flat_record, reshape_table_of_contents, reshape_toc_sheet,
    transpose, FLAT_RECORD_COLUMNS,
};
pub use crate::sanitize::sanitize;
pub use crate::vocabulary::title_case;

/// Designates a sheet in a workbook.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SheetRef {
    Index(usize),
    Name(String),
}

impl Display for SheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetRef::Index(idx) => write!(f, "#{}", idx),
            SheetRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Access to the raw cells of a county file.
///
/// CSV files expose a single sheet at index 0.
pub trait SheetSource {
    fn sheet_names(&self) -> Vec<String>;

    fn load_sheet(
        &mut self,
        sheet: &SheetRef,
    ) -> Result<Grid, Box<dyn std::error::Error + Send + Sync>>;
}

/// Errors that prevent a county file from being normalized.
///
/// Labels that cannot be split and offices outside of the vocabulary are not
/// errors: they respectively pass through and get filtered out.
#[derive(Debug, Snafu)]
pub enum NormalizeError {
    #[snafu(display("County {county}: unsupported layout, first cell is {first_cell:?}"))]
    UnsupportedLayout { county: String, first_cell: String },

    #[snafu(display("Malformed sheet for layout {layout:?}: {message}"))]
    MalformedSheet { layout: LayoutKind, message: String },

    #[snafu(display("County {county}: could not load sheet {sheet}"))]
    LoadingSheet {
        county: String,
        sheet: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// The layout of a county file, given its sanitized first sheet.
pub fn detect_layout(file: &CountyFile, first_sheet: &Grid, config: &EngineConfig) -> LayoutKind {
    match file.format {
        FileFormat::Csv => LayoutKind::FlatRecord,
        FileFormat::Spreadsheet => classify(first_sheet, &config.vocabulary),
    }
}

/// Runs the reshaper of the given layout.
pub fn reshape(
    layout: LayoutKind,
    first_sheet: &Grid,
    source: &mut dyn SheetSource,
    file: &CountyFile,
    config: &EngineConfig,
) -> NormalizeResult<Vec<RawRecord>> {
    match layout {
        LayoutKind::ContestTitleColumn => reshape_contest_title(first_sheet),
        LayoutKind::BlankHeaderTransposed => {
            let excluded = config.excluded_rows(&file.county, file.year.as_deref());
            Ok(reshape_blank_header(first_sheet, &excluded))
        }
        LayoutKind::TableOfContentsIndexed => reshape_table_of_contents(
            first_sheet,
            source,
            &file.county,
            &config.toc_office_prefixes,
        ),
        LayoutKind::FlatRecord => reshape_flat_record(first_sheet),
        LayoutKind::Unsupported => UnsupportedLayoutSnafu {
            county: file.county.clone(),
            first_cell: first_sheet
                .first_cell()
                .and_then(|c| c.as_label())
                .unwrap_or_default(),
        }
        .fail(),
    }
}

/// Splits the embedded districts and parties, and maps offices and
/// candidates to the vocabulary. Records outside of the valid offices are
/// dropped.
pub fn normalize_records(
    county: &str,
    raw_records: Vec<RawRecord>,
    vocabulary: &Vocabulary,
) -> Vec<NormalizedRecord> {
    let mut res: Vec<NormalizedRecord> = Vec::new();
    let mut num_dropped: usize = 0;
    for raw in raw_records {
        let (office, district) = extract_office_and_district(&raw.contest);
        let office = vocabulary.canonical_office(&office);
        if !vocabulary.is_valid_office(&office) {
            num_dropped += 1;
            continue;
        }
        // A party column wins over a party embedded in the candidate name.
        let (candidate, embedded_party) = extract_candidate_and_party(&raw.candidate);
        let party = raw
            .party
            .filter(|p| !p.is_empty())
            .or(embedded_party)
            .unwrap_or_default();
        res.push(NormalizedRecord {
            county: county.to_string(),
            precinct: raw.precinct,
            office,
            district,
            party,
            candidate: vocabulary.canonical_candidate(&candidate),
            votes: raw.votes,
        });
    }
    debug!(
        "normalize_records: {}: kept {} records, dropped {} outside of the valid offices",
        county,
        res.len(),
        num_dropped
    );
    res
}

/// Normalizes the results of one county file.
pub fn normalize_county(
    source: &mut dyn SheetSource,
    file: &CountyFile,
    config: &EngineConfig,
) -> NormalizeResult<Vec<NormalizedRecord>> {
    let first_ref = SheetRef::Index(0);
    let first_sheet = source.load_sheet(&first_ref).context(LoadingSheetSnafu {
        county: file.county.clone(),
        sheet: first_ref.to_string(),
    })?;
    let first_sheet = sanitize(&first_sheet);

    let layout = detect_layout(file, &first_sheet, config);
    info!("normalize_county: county {} layout {:?}", file.county, layout);

    let raw_records = reshape(layout, &first_sheet, source, file, config)?;
    debug!(
        "normalize_county: county {}: {} raw records",
        file.county,
        raw_records.len()
    );
    Ok(normalize_records(
        &file.county,
        raw_records,
        &config.vocabulary,
    ))
}
