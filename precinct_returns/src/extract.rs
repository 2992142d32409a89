//! Splitting of the free-text labels found in the county files.
//!
//! Contest labels may carry a district number ("STATE SENATOR, DISTRICT 7",
//! "US Rep Dist 2") and candidate labels may carry a party code
//! ("Jane Doe (R)"). Failing to find these parts is not an error: the label
//! is then returned as is.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// ", DISTRICT 7", ", 7", " 7" after a separator.
static DISTRICT_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ ,] (DISTRICT )?(\d+)").unwrap());

/// The abbreviated form found in the older layouts: "US Rep Dist 2".
static DISTRICT_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+[Dd]ist\W+").unwrap());

static PARTY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\s*([\w.]+)\s*\)\s*").unwrap());

/// Separates the office from the district number in a contest label.
pub fn extract_office_and_district(contest: &str) -> (String, Option<u32>) {
    if let Some(caps) = DISTRICT_SUFFIX_REGEX.captures(contest) {
        let district = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        if let (Some(whole), Some(district)) = (caps.get(0), district) {
            let office = contest[..whole.start()].trim().to_string();
            return (office, Some(district));
        }
    }

    let parts: Vec<&str> = DISTRICT_TOKEN_REGEX.split(contest).collect();
    if let [office, district] = parts.as_slice() {
        // "5A" is the district 5. A suffix without digits gives no district.
        let district = leading_number(district.trim());
        if district.is_none() {
            debug!(
                "extract_office_and_district: no district number in contest {:?}",
                contest
            );
        }
        return (office.trim().to_string(), district);
    }
    (contest.to_string(), None)
}

fn leading_number(s: &str) -> Option<u32> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    s[..end].parse::<u32>().ok()
}

/// Separates a party code in parentheses from a candidate label.
pub fn extract_candidate_and_party(candidate: &str) -> (String, Option<String>) {
    match PARTY_REGEX.captures(candidate) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let party = caps.get(1).map(|m| m.as_str().to_string());
            let name = candidate.replace(whole, "").trim().to_string();
            (name, party)
        }
        None => (candidate.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn district_suffix() {
        assert_eq!(
            extract_office_and_district("STATE SENATOR, DISTRICT 7"),
            ("STATE SENATOR".to_string(), Some(7))
        );
        assert_eq!(
            extract_office_and_district("STATE REPRESENTATIVE, 42"),
            ("STATE REPRESENTATIVE".to_string(), Some(42))
        );
    }

    #[test]
    fn district_token() {
        assert_eq!(
            extract_office_and_district("US Rep Dist 2"),
            ("US Rep".to_string(), Some(2))
        );
        assert_eq!(
            extract_office_and_district("State Senator - dist. 12"),
            ("State Senator".to_string(), Some(12))
        );
    }

    #[test]
    fn no_district() {
        assert_eq!(
            extract_office_and_district("GOVERNOR"),
            ("GOVERNOR".to_string(), None)
        );
        assert_eq!(
            extract_office_and_district("DISTRICT JUDGE"),
            ("DISTRICT JUDGE".to_string(), None)
        );
        assert_eq!(extract_office_and_district(""), ("".to_string(), None));
    }

    #[test]
    fn district_token_with_suffix() {
        assert_eq!(
            extract_office_and_district("State Representative Dist 5A"),
            ("State Representative".to_string(), Some(5))
        );
        // The office is still split off when the district has no number.
        assert_eq!(
            extract_office_and_district("Board Dist Seat"),
            ("Board".to_string(), None)
        );
    }

    #[test]
    fn party() {
        assert_eq!(
            extract_candidate_and_party("Jane Doe (R)"),
            ("Jane Doe".to_string(), Some("R".to_string()))
        );
        assert_eq!(
            extract_candidate_and_party("John Q. Public ( Ind. )"),
            ("John Q. Public".to_string(), Some("Ind.".to_string()))
        );
    }

    #[test]
    fn no_party() {
        assert_eq!(
            extract_candidate_and_party("Write-In"),
            ("Write-In".to_string(), None)
        );
        assert_eq!(extract_candidate_and_party(""), ("".to_string(), None));
        assert_eq!(
            extract_candidate_and_party("Smith (no party)"),
            ("Smith (no party)".to_string(), None)
        );
    }

    proptest! {
        #[test]
        fn district_suffix_is_removed(office in "[A-Za-z]([A-Za-z .]{0,20}[A-Za-z])?") {
            let label = format!("{}, DISTRICT 7", office);
            let (o, d) = extract_office_and_district(&label);
            prop_assert_eq!(d, Some(7));
            prop_assert_eq!(o, office.trim().to_string());
        }

        #[test]
        fn labels_without_digits_are_unchanged(label in "[A-Za-z ,.-]{0,30}") {
            prop_assume!(!DISTRICT_TOKEN_REGEX.is_match(&label));
            let (o, d) = extract_office_and_district(&label);
            prop_assert_eq!(d, None);
            prop_assert_eq!(o, label);
        }

        #[test]
        fn party_in_parentheses(name in "[A-Za-z]([A-Za-z .]{0,20}[A-Za-z])?", token in "[A-Z]{1,4}") {
            let (c, p) = extract_candidate_and_party(&format!("{} ({})", name, token));
            prop_assert_eq!(c, name.trim().to_string());
            prop_assert_eq!(p, Some(token));
        }

        #[test]
        fn labels_without_parentheses_are_unchanged(label in "[A-Za-z .-]{0,30}") {
            let (c, p) = extract_candidate_and_party(&label);
            prop_assert_eq!(c, label);
            prop_assert_eq!(p, None);
        }
    }
}
