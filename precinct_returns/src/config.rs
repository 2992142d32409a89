// ********* Input data structures ***********

use std::collections::{HashMap, HashSet};

/// A single value read from a spreadsheet or a CSV file.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The content of the cell as a label. Numbers are rendered without a
    /// fractional part when they are integral (precinct numbers, sheet names).
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(f) => Some(format_number(*f)),
        }
    }

    /// Same as `as_label`, with missing values rendered as an empty string.
    pub fn label_or_empty(&self) -> String {
        self.as_label().unwrap_or_default()
    }

    /// Reads the cell as a number. Text cells are accepted when they hold a
    /// number, possibly with thousands separators.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(f) if f.is_finite() => Some(*f),
            Cell::Text(s) => s
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Reads the cell as a vote count. Negative and fractional counts are not
    /// votes: negative ones are rejected, fractional ones rounded. Counts that
    /// do not fit in a u64 are rejected.
    pub fn as_votes(&self) -> Option<u64> {
        match self.as_number() {
            Some(f) if f >= 0.0 && f.round() < u64::MAX as f64 => Some(f.round() as u64),
            _ => None,
        }
    }

    pub fn is_text(&self, s: &str) -> bool {
        matches!(self, Cell::Text(t) if t == s)
    }
}

fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// A rectangular array of cells, as read from one sheet.
///
/// Ragged rows are padded with empty cells at construction, so that all the
/// rows share the same column indexes.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Grid {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, Cell::Empty);
                r
            })
            .collect();
        Grid { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at the given position. Out-of-range positions read as empty.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn first_cell(&self) -> Option<&Cell> {
        self.rows.first().and_then(|r| r.first())
    }
}

/// The format of a county file, as deduced from its extension.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FileFormat {
    /// xls, xlsx: one of the grid layouts, detected from the first cell.
    Spreadsheet,
    /// csv: always the flat record layout.
    Csv,
}

/// One input file, corresponding to the results of one county.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CountyFile {
    pub county: String,
    /// The year of the election. It is only used to look up row exclusions.
    pub year: Option<String>,
    pub format: FileFormat,
}

/// An observation as produced by a layout reshaper, before the extraction
/// of districts and parties.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawRecord {
    pub contest: String,
    pub candidate: String,
    pub party: Option<String>,
    pub precinct: String,
    pub votes: u64,
}

// ******** Output data structures *********

/// One line of the statewide output.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct NormalizedRecord {
    pub county: String,
    pub precinct: String,
    /// Always a member of the valid offices.
    pub office: String,
    pub district: Option<u32>,
    pub party: String,
    pub candidate: String,
    pub votes: u64,
}

// ********* Configuration **********

/// The known layouts of county files.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum LayoutKind {
    /// Rows are contest x candidate, columns are precincts. The first cell
    /// is "Contest Title".
    ContestTitleColumn,
    /// Offices and candidates along the columns, precincts along the rows.
    /// The first cell is blank or holds an office name.
    BlankHeaderTransposed,
    /// A directory sheet pointing to one sheet per contest.
    TableOfContentsIndexed,
    /// CSV export with one observation per line.
    FlatRecord,
    Unsupported,
}

/// What to do with a precinct cell that holds no vote count.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MissingVotes {
    /// The blank means that the candidate was not on the ballot there.
    Drop,
    /// The blank means zero votes.
    Zero,
}

impl LayoutKind {
    /// Each layout defines its own meaning for blank vote cells. This must not
    /// be unified: it would change the numbers in the output.
    pub fn missing_votes(&self) -> MissingVotes {
        match self {
            LayoutKind::ContestTitleColumn => MissingVotes::Drop,
            LayoutKind::BlankHeaderTransposed => MissingVotes::Zero,
            LayoutKind::TableOfContentsIndexed => MissingVotes::Zero,
            LayoutKind::FlatRecord => MissingVotes::Drop,
            LayoutKind::Unsupported => MissingVotes::Drop,
        }
    }
}

/// Rows to drop from one specific county file before it gets transposed.
///
/// This covers known defects in published files. The row positions refer to the
/// grid after sanitizing (empty rows removed).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RowExclusion {
    pub county: String,
    pub year: String,
    pub rows: Vec<usize>,
}

/// The controlled vocabulary for offices and candidates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vocabulary {
    pub office_aliases: HashMap<String, String>,
    pub candidate_aliases: HashMap<String, String>,
    pub valid_offices: HashSet<String>,
}

const DEFAULT_OFFICE_ALIASES: &[(&str, &str)] = &[
    ("Registered Voters - Total", "Registered Voters"),
    (
        "President And Vice President Of The United States",
        "President",
    ),
    (
        "President And Vice-President Of The United States",
        "President",
    ),
    ("President Of The United States", "President"),
    ("United States Representative", "U.S. House"),
    ("US Rep", "U.S. House"),
    ("United States Senator", "U.S. Senate"),
    ("Governor", "Governor"),
    ("Lt. Governor", "Lieutenant Governor"),
    ("Attorney General", "Attorney General"),
    ("State Treasurer", "State Treasurer"),
    (
        "Commissioner Of Agriculture And Industries",
        "Commissioner of Agriculture and Industries",
    ),
    ("Secretary Of State", "Secretary of State"),
    ("State Auditor", "State Auditor"),
    ("State Senator", "State Senate"),
    ("State Representative", "State House"),
    ("Ballots Cast - Total", "Ballots Cast"),
    ("STRAIGHT PARTY", "Straight Party"),
];

const DEFAULT_CANDIDATE_ALIASES: &[(&str, &str)] =
    &[("Write-In", "Write-ins"), ("Write-in", "Write-ins")];

const DEFAULT_VALID_OFFICES: &[&str] = &[
    "Registered Voters",
    "Ballots Cast",
    "Straight Party",
    "President",
    "U.S. Senate",
    "U.S. House",
    "Governor",
    "Lieutenant Governor",
    "Attorney General",
    "State Treasurer",
    "Commissioner of Agriculture and Industries",
    "State Senate",
    "State House",
    "Secretary of State",
    "State Auditor",
];

const DEFAULT_TOC_OFFICE_PREFIXES: &[&str] =
    &["FOR PRESIDENT AND VICE", "FOR UNITED STATES REPRESENTATIVE"];

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary {
            office_aliases: to_map(DEFAULT_OFFICE_ALIASES),
            candidate_aliases: to_map(DEFAULT_CANDIDATE_ALIASES),
            valid_offices: DEFAULT_VALID_OFFICES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// All the data that parameterizes the engine for one run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EngineConfig {
    pub vocabulary: Vocabulary,
    /// Office descriptions in a table of contents that select a contest sheet.
    pub toc_office_prefixes: Vec<String>,
    pub row_exclusions: Vec<RowExclusion>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            vocabulary: Vocabulary::default(),
            toc_office_prefixes: DEFAULT_TOC_OFFICE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            // Bogus rows in the 2014 file of Clay county.
            row_exclusions: vec![RowExclusion {
                county: "Clay".to_string(),
                year: "2014".to_string(),
                rows: vec![21, 22, 23],
            }],
        }
    }
}

impl EngineConfig {
    /// The rows to drop for a given county file, if any.
    pub fn excluded_rows(&self, county: &str, year: Option<&str>) -> Vec<usize> {
        let year = match year {
            Some(y) => y,
            None => return Vec::new(),
        };
        self.row_exclusions
            .iter()
            .filter(|ex| ex.county == county && ex.year == year)
            .flat_map(|ex| ex.rows.iter().cloned())
            .collect()
    }
}
