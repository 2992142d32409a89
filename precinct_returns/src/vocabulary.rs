use crate::config::Vocabulary;

/// Title-cases a string the way spreadsheet exports are commonly normalized:
/// the first letter of every run of letters is uppercased, the rest lowercased.
///
/// "PRESIDENT AND VICE-PRESIDENT" -> "President And Vice-President"
pub fn title_case(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if prev_is_letter {
            res.extend(c.to_lowercase());
        } else {
            res.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }
    res
}

impl Vocabulary {
    /// The canonical name of an office.
    ///
    /// An alias matching the raw text exactly wins. Otherwise the text is
    /// title-cased and looked up again. Unknown offices are returned
    /// title-cased.
    pub fn canonical_office(&self, office: &str) -> String {
        if let Some(o) = self.office_aliases.get(office) {
            return o.clone();
        }
        let titled = title_case(office);
        match self.office_aliases.get(&titled) {
            Some(o) => o.clone(),
            None => titled,
        }
    }

    pub fn is_valid_office(&self, office: &str) -> bool {
        self.valid_offices.contains(office)
    }

    /// Folds the variants of pseudo-candidates (write-ins) into one spelling.
    pub fn canonical_candidate(&self, candidate: &str) -> String {
        self.candidate_aliases
            .get(candidate)
            .cloned()
            .unwrap_or_else(|| candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("UNITED STATES SENATOR"), "United States Senator");
        assert_eq!(
            title_case("president and vice-president"),
            "President And Vice-President"
        );
        assert_eq!(title_case("U.S. House"), "U.S. House");
        assert_eq!(title_case("LT. GOVERNOR"), "Lt. Governor");
        assert_eq!(title_case("o'NEIL"), "O'Neil");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn offices() {
        let v = Vocabulary::default();
        assert_eq!(
            v.canonical_office("PRESIDENT AND VICE PRESIDENT OF THE UNITED STATES"),
            "President"
        );
        assert_eq!(v.canonical_office("UNITED STATES REPRESENTATIVE"), "U.S. House");
        assert_eq!(v.canonical_office("LT. GOVERNOR"), "Lieutenant Governor");
        // Exact aliases apply before title-casing.
        assert_eq!(v.canonical_office("US Rep"), "U.S. House");
        assert_eq!(v.canonical_office("STRAIGHT PARTY"), "Straight Party");
        assert_eq!(v.canonical_office("U.S. House"), "U.S. House");
        // Unknown offices pass through, title-cased.
        assert_eq!(v.canonical_office("SHERIFF"), "Sheriff");
    }

    #[test]
    fn valid_offices() {
        let v = Vocabulary::default();
        assert!(v.is_valid_office("Governor"));
        assert!(v.is_valid_office("Commissioner of Agriculture and Industries"));
        assert!(!v.is_valid_office("Sheriff"));
        assert!(!v.is_valid_office("GOVERNOR"));
    }

    #[test]
    fn write_ins() {
        let v = Vocabulary::default();
        assert_eq!(v.canonical_candidate("Write-In"), "Write-ins");
        assert_eq!(v.canonical_candidate("Write-in"), "Write-ins");
        assert_eq!(v.canonical_candidate("WRITE-IN"), "WRITE-IN");
        assert_eq!(v.canonical_candidate("Jane Doe"), "Jane Doe");
    }
}
