use log::{debug, info, warn};

use precinct_returns::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use text_diff::print_diff;

use crate::args::Args;
use crate::convert::config_reader::read_config;
use crate::convert::io_common::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;

#[derive(Debug, Snafu)]
pub enum ConvertError {
    #[snafu(display("Error opening spreadsheet {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV file {path} at line {lineno}"))]
    ReadingCsv {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error reading the input directory {path}"))]
    ReadingDirectory {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening the configuration file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the configuration file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid value for {key} in the configuration: {value}"))]
    InvalidConfigValue { key: String, value: String },
    #[snafu(display("Error rendering the statewide table"))]
    RenderingOutput { source: csv::Error },
    #[snafu(display("Error writing output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening the reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error normalizing {path}"))]
    Normalizing {
        source: NormalizeError,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// What came out of converting one input directory.
#[derive(Debug)]
pub struct ConversionSummary {
    pub table: StatewideTable,
    /// The counties whose file could not be converted.
    pub skipped: Vec<String>,
}

fn read_county_file(path: &Path, file: &CountyFile) -> ConvertResult<Box<dyn SheetSource>> {
    match file.format {
        FileFormat::Spreadsheet => Ok(Box::new(io_excel::read_excel_file(path)?)),
        FileFormat::Csv => Ok(Box::new(io_csv::read_csv_file(path)?)),
    }
}

fn convert_county(
    path: &Path,
    file: &CountyFile,
    config: &EngineConfig,
) -> ConvertResult<Vec<NormalizedRecord>> {
    let mut source = read_county_file(path, file)?;
    normalize_county(source.as_mut(), file, config).context(NormalizingSnafu {
        path: path.display().to_string(),
    })
}

/// Converts all the county files of a directory.
///
/// A county file that cannot be read or normalized is skipped: the failure
/// is logged and the county is reported in the summary.
pub fn convert_directory(
    input_dir: &Path,
    year: Option<&str>,
    config: &EngineConfig,
) -> ConvertResult<ConversionSummary> {
    let paths = list_county_files(input_dir)?;
    let dir_year = year_from_directory(input_dir);
    info!(
        "convert_directory: {} files in {:?}",
        paths.len(),
        input_dir
    );

    let mut aggregator = Aggregator::new();
    let mut skipped: Vec<String> = Vec::new();
    for path in paths {
        let parsed = match simplify_file_name(&path).and_then(|n| parse_file_name(&n)) {
            Some(x) => x,
            None => {
                warn!("convert_directory: cannot find a county for {:?}", path);
                continue;
            }
        };
        let file = CountyFile {
            year: resolve_year(year, parsed.year, dir_year.as_deref()),
            county: parsed.county,
            format: parsed.format,
        };
        debug!("convert_directory: {:?} -> {:?}", path, file);

        match convert_county(&path, &file, config) {
            Ok(records) => {
                info!(
                    "convert_directory: county {}: {} records",
                    file.county,
                    records.len()
                );
                if aggregator.insert_county(&file.county, records).is_some() {
                    warn!(
                        "convert_directory: county {} found in several files, keeping {:?}",
                        file.county, path
                    );
                }
            }
            Err(e) => {
                warn!("convert_directory: skipping county {}: {}", file.county, e);
                if let Some(cause) = std::error::Error::source(&e) {
                    warn!("convert_directory: caused by: {}", cause);
                }
                skipped.push(file.county.clone());
            }
        }
    }

    info!(
        "convert_directory: {} counties converted: {}",
        aggregator.num_counties(),
        aggregator.counties().collect::<Vec<&str>>().join(", ")
    );
    if !skipped.is_empty() {
        warn!(
            "convert_directory: {} counties skipped: {}",
            skipped.len(),
            skipped.join(", ")
        );
    }
    Ok(ConversionSummary {
        table: aggregator.finalize(),
        skipped,
    })
}

fn check_reference(reference_path: &str, rendered: &str) -> ConvertResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: reference_path,
    })?;
    let reference = reference.replace("\r\n", "\n");
    if reference != rendered {
        warn!("Found differences with the reference file");
        print_diff(reference.as_str(), rendered, "\n");
        whatever!(
            "Difference detected between the statewide table and the reference {}",
            reference_path
        )
    }
    Ok(())
}

pub fn run_conversion(args: &Args) -> ConvertResult<()> {
    let config = match &args.config {
        Some(config_path) => read_config(config_path)?,
        None => EngineConfig::default(),
    };
    debug!("run_conversion: config: {:?}", config);

    let summary = convert_directory(Path::new(&args.input), args.year.as_deref(), &config)?;
    let destination = match args.out.as_deref() {
        None | Some("") => "stdout",
        Some(out_path) => out_path,
    };
    let rendered = io_csv::write_table(&summary.table, destination)?;

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &rendered)?;
    }
    Ok(())
}
