// Primitives shared by the readers: naming of county files and in-memory workbooks.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use snafu::prelude::*;

use precinct_returns::{FileFormat, Grid, SheetRef, SheetSource};

use crate::convert::*;

static FILE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(General|Primary)-(.*)\.(csv|xlsx|xls)$").unwrap());

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

/// What the name of a file tells about its content.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedFileName {
    pub county: String,
    pub year: Option<String>,
    pub format: FileFormat,
}

pub fn simplify_file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// "2016-General-Autauga.xlsx" gives the county Autauga for the year 2016.
/// Other names are split at their first dot: "Autauga.xls" gives Autauga and is read as a
/// spreadsheet.
pub fn parse_file_name(name: &str) -> Option<ParsedFileName> {
    if let Some(caps) = FILE_NAME_REGEX.captures(name) {
        let county = caps.get(3).map(|m| m.as_str().to_string())?;
        let format = match caps.get(4).map(|m| m.as_str()) {
            Some("csv") => FileFormat::Csv,
            _ => FileFormat::Spreadsheet,
        };
        return Some(ParsedFileName {
            county,
            year: caps.get(1).map(|m| m.as_str().to_string()),
            format,
        });
    }
    match name.split_once('.') {
        Some((county, _)) if !county.is_empty() => Some(ParsedFileName {
            county: county.to_string(),
            year: None,
            format: FileFormat::Spreadsheet,
        }),
        _ => None,
    }
}

/// The input directories are commonly named after the year of the election.
pub fn year_from_directory(dir: &Path) -> Option<String> {
    simplify_file_name(dir).filter(|name| YEAR_REGEX.is_match(name))
}

/// The command line wins over the file name, which wins over the directory name.
pub fn resolve_year(
    flag: Option<&str>,
    from_file_name: Option<String>,
    from_directory: Option<&str>,
) -> Option<String> {
    flag.map(|s| s.to_string())
        .or(from_file_name)
        .or_else(|| from_directory.map(|s| s.to_string()))
}

/// The county files of a directory, in sorted order.
pub fn list_county_files(dir: &Path) -> ConvertResult<Vec<PathBuf>> {
    let dir_s = dir.display().to_string();
    let entries = fs::read_dir(dir).context(ReadingDirectorySnafu {
        path: dir_s.clone(),
    })?;
    let mut res: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.context(ReadingDirectorySnafu {
            path: dir_s.clone(),
        })?;
        let path = entry.path();
        let name = match simplify_file_name(&path) {
            Some(n) => n,
            None => {
                warn!("list_county_files: skipping non UTF-8 name {:?}", path);
                continue;
            }
        };
        if name.starts_with('.') {
            debug!("list_county_files: skipping hidden file {:?}", name);
            continue;
        }
        if path.is_dir() {
            warn!("list_county_files: skipping directory {:?}", name);
            continue;
        }
        if !name.contains('.') {
            warn!("list_county_files: skipping {:?}: no extension", name);
            continue;
        }
        res.push(path);
    }
    res.sort();
    Ok(res)
}

/// All the sheets of a county file, read upfront.
#[derive(PartialEq, Debug, Clone)]
pub struct LoadedWorkbook {
    path: String,
    sheets: Vec<(String, Grid)>,
}

impl LoadedWorkbook {
    pub fn new(path: String, sheets: Vec<(String, Grid)>) -> LoadedWorkbook {
        LoadedWorkbook { path, sheets }
    }
}

impl SheetSource for LoadedWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn load_sheet(
        &mut self,
        sheet: &SheetRef,
    ) -> Result<Grid, Box<dyn std::error::Error + Send + Sync>> {
        let found = match sheet {
            SheetRef::Index(idx) => self.sheets.get(*idx),
            SheetRef::Name(name) => self.sheets.iter().find(|(n, _)| n == name),
        };
        match found {
            Some((_, grid)) => Ok(grid.clone()),
            None => Err(format!("no sheet {} in {}", sheet, self.path).into()),
        }
    }
}
