use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::NormalizedRecord;

/// Collects the normalized records of each county for one run.
///
/// ```
/// use precinct_returns::aggregate::Aggregator;
/// let mut aggregator = Aggregator::new();
/// aggregator.insert_county("Autauga", vec![]);
/// let table = aggregator.finalize();
/// assert!(table.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Aggregator {
    counties: BTreeMap<String, Vec<NormalizedRecord>>,
}

impl Aggregator {
    pub fn new() -> Aggregator {
        Aggregator::default()
    }

    /// Stores the records of a county. Processing the same county again
    /// replaces its previous records, which are returned.
    pub fn insert_county(
        &mut self,
        county: &str,
        records: Vec<NormalizedRecord>,
    ) -> Option<Vec<NormalizedRecord>> {
        debug!(
            "insert_county: {} with {} records",
            county,
            records.len()
        );
        self.counties.insert(county.to_string(), records)
    }

    pub fn counties(&self) -> impl Iterator<Item = &str> {
        self.counties.keys().map(|s| s.as_str())
    }

    pub fn num_counties(&self) -> usize {
        self.counties.len()
    }

    /// Builds the statewide table: all the records, tagged with their county
    /// and sorted.
    pub fn finalize(self) -> StatewideTable {
        let mut records: Vec<NormalizedRecord> = Vec::new();
        for (county, county_records) in self.counties {
            records.extend(county_records.into_iter().map(|r| NormalizedRecord {
                county: county.clone(),
                ..r
            }));
        }
        records.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        info!("finalize: {} records in the statewide table", records.len());
        StatewideTable { records }
    }
}

// A missing district sorts before any district number.
fn sort_key(r: &NormalizedRecord) -> (&str, &str, &str, Option<u32>, &str, &str) {
    (
        &r.county,
        &r.precinct,
        &r.office,
        r.district,
        &r.party,
        &r.candidate,
    )
}

/// The final output of a run, sorted by county, precinct, office, district,
/// party and candidate.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct StatewideTable {
    records: Vec<NormalizedRecord>,
}

impl StatewideTable {
    pub const HEADER: [&'static str; 7] = [
        "county",
        "precinct",
        "office",
        "district",
        "party",
        "candidate",
        "votes",
    ];

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
