use crate::config::{Cell, Grid, LayoutKind, Vocabulary};

pub const CONTEST_TITLE_MARKER: &str = "Contest Title";
pub const TABLE_OF_CONTENTS_MARKER: &str = "Table of Contents";

/// Finds the layout of a sanitized spreadsheet grid from its first cell.
///
/// The flat record layout is never returned: it is only used for CSV files.
pub fn classify(grid: &Grid, vocabulary: &Vocabulary) -> LayoutKind {
    match grid.first_cell() {
        None => LayoutKind::Unsupported,
        Some(Cell::Text(s)) if s == CONTEST_TITLE_MARKER => LayoutKind::ContestTitleColumn,
        Some(Cell::Text(s)) if s == TABLE_OF_CONTENTS_MARKER => {
            LayoutKind::TableOfContentsIndexed
        }
        Some(Cell::Empty) => LayoutKind::BlankHeaderTransposed,
        Some(Cell::Text(s)) if vocabulary.valid_offices.contains(s) => {
            LayoutKind::BlankHeaderTransposed
        }
        Some(_) => LayoutKind::Unsupported,
    }
}
