use std::collections::{HashMap, HashSet};
use std::fs;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;

use precinct_returns::{EngineConfig, RowExclusion, Vocabulary};

use crate::convert::*;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RowExclusionConfig {
    pub county: String,
    /// Either a number or a string.
    pub year: JSValue,
    pub rows: Vec<usize>,
}

/// The content of the JSON configuration file. All the fields are optional.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(rename = "officeAliases", default)]
    pub office_aliases: HashMap<String, String>,
    #[serde(rename = "candidateAliases", default)]
    pub candidate_aliases: HashMap<String, String>,
    #[serde(rename = "validOffices", default)]
    pub valid_offices: Vec<String>,
    #[serde(rename = "tocOfficePrefixes", default)]
    pub toc_office_prefixes: Vec<String>,
    #[serde(rename = "rowExclusions", default)]
    pub row_exclusions: Vec<RowExclusionConfig>,
    /// If true, the built-in tables are discarded instead of being extended.
    #[serde(rename = "replaceDefaults")]
    pub replace_defaults: Option<bool>,
}

fn read_js_year(x: &JSValue) -> ConvertResult<String> {
    match x {
        JSValue::Number(n) => n.as_u64().map(|y| y.to_string()).context(
            InvalidConfigValueSnafu {
                key: "rowExclusions.year",
                value: n.to_string(),
            },
        ),
        JSValue::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => InvalidConfigValueSnafu {
            key: "rowExclusions.year",
            value: x.to_string(),
        }
        .fail(),
    }
}

fn empty_engine_config() -> EngineConfig {
    EngineConfig {
        vocabulary: Vocabulary {
            office_aliases: HashMap::new(),
            candidate_aliases: HashMap::new(),
            valid_offices: HashSet::new(),
        },
        toc_office_prefixes: Vec::new(),
        row_exclusions: Vec::new(),
    }
}

/// Merges a configuration file into the built-in tables.
pub fn build_engine_config(cc: ConversionConfig) -> ConvertResult<EngineConfig> {
    let mut config = if cc.replace_defaults.unwrap_or(false) {
        info!("build_engine_config: replacing the built-in tables");
        empty_engine_config()
    } else {
        EngineConfig::default()
    };

    let vocabulary = &mut config.vocabulary;
    vocabulary.office_aliases.extend(cc.office_aliases);
    vocabulary.candidate_aliases.extend(cc.candidate_aliases);
    vocabulary.valid_offices.extend(cc.valid_offices);
    for (alias, office) in vocabulary.office_aliases.iter() {
        if !vocabulary.valid_offices.contains(office) {
            warn!(
                "build_engine_config: alias {:?} maps to {:?}, which is not a valid office",
                alias, office
            );
        }
    }

    for prefix in cc.toc_office_prefixes {
        if !config.toc_office_prefixes.contains(&prefix) {
            config.toc_office_prefixes.push(prefix);
        }
    }

    for ex in cc.row_exclusions.iter() {
        config.row_exclusions.push(RowExclusion {
            county: ex.county.clone(),
            year: read_js_year(&ex.year)?,
            rows: ex.rows.clone(),
        });
    }
    Ok(config)
}

pub fn read_config(path: &str) -> ConvertResult<EngineConfig> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    let cc: ConversionConfig =
        serde_json::from_str(contents.as_str()).context(ParsingConfigSnafu { path })?;
    info!("read_config: {:?}", cc);
    build_engine_config(cc)
}
