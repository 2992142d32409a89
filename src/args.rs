use clap::Parser;

/// This program converts county-level precinct election results into a single statewide table.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (directory) The directory containing one results file per county. The files are expected
    /// to be named <year>-<General|Primary>-<County>.<csv|xlsx|xls>.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path, 'stdout' or empty) Where the statewide table will be written in CSV format.
    /// By default, it is written to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) A JSON file with additional office aliases, candidate aliases, valid offices,
    /// table of contents prefixes and row exclusions. See the documentation of the configuration file
    /// in the manual of the precinct_returns crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected statewide table in CSV format. If provided,
    /// prconvert will check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (year, optional) The year of the election. It overrides the year found in the file names or in
    /// the name of the input directory. It is only used to apply the row exclusions.
    #[clap(long, value_parser)]
    pub year: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
