//! Label resolution: free-text spreadsheet labels onto catalog entries.
//!
//! The source spreadsheets carry no schema; row meaning is encoded in
//! free-text labels. Resolution is a fixed, ordered set of
//! case-insensitive substring rules evaluated first-match-wins. Rules
//! are ordered most-specific-first because the labels overlap
//! ("bachelor's degree or higher" contains "bachelor's degree" and must
//! win before the shorter rule can shadow it).

use crate::catalog::{Demographic, EducationLevel, Gender, RaceEthnicity};

/// Ordered rule table for the earnings/attainment sheet row labels.
const LEVEL_RULES: &[(&str, EducationLevel)] = &[
    ("all education levels", EducationLevel::AllLevels),
    ("less than", EducationLevel::LessThanHighSchool),
    ("high school", EducationLevel::HighSchool),
    ("no degree", EducationLevel::SomeCollegeNoDegree),
    ("associate", EducationLevel::Associate),
    ("bachelor's degree or higher", EducationLevel::BachelorsOrHigher),
    ("bachelor's or higher", EducationLevel::BachelorsOrHigher),
    ("bachelor's degree", EducationLevel::Bachelors),
    ("master", EducationLevel::MastersOrHigher),
];

/// Resolve an earnings/attainment row label to a canonical level.
///
/// Returns `None` when no rule matches; callers must skip persisting
/// such rows rather than guessing a level.
pub fn resolve_level(label: &str) -> Option<EducationLevel> {
    let lower = label.to_lowercase();
    LEVEL_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|&(_, level)| level)
}

/// Resolve a cost-sheet section header to a canonical level.
///
/// The cost sheet uses institution-length wording rather than
/// attainment wording: "All institutions", "4-year", "2-year".
pub fn resolve_cost_level(label: &str) -> Option<EducationLevel> {
    let lower = label.to_lowercase();
    if lower.contains("all") {
        Some(EducationLevel::AllLevels)
    } else if lower.contains("4-year") {
        Some(EducationLevel::Bachelors)
    } else if lower.contains("2-year") {
        Some(EducationLevel::Associate)
    } else {
        None
    }
}

/// Result of resolving a cohort label to a demographic.
///
/// `Unmatched` replaces the old silent fall-through: any non-empty
/// label that hits no rule is surfaced to the caller, which decides
/// (and logs) what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemographicMatch {
    /// A rule matched the label.
    Matched(Demographic),

    /// No rule matched. By elimination the source tables only leave
    /// male cohorts here, so callers conventionally fall back to
    /// (Male, Union) after logging the label.
    Unmatched,
}

impl DemographicMatch {
    /// The demographic this match resolves to, applying the
    /// (Male, Union) convention for unmatched labels.
    pub const fn or_male_fallback(self) -> Demographic {
        match self {
            Self::Matched(demographic) => demographic,
            Self::Unmatched => Demographic::new(Gender::Male, RaceEthnicity::Union),
        }
    }
}

/// Resolve a cohort label (the anchor cell of an earnings sub-table)
/// to a (gender, race) pair.
///
/// Rule order: the aggregate "Total" row wins first — matched
/// case-sensitively, because race cohorts are labeled "White, total"
/// with a lowercase t and must fall through to the race rules. Then
/// race keywords, then "female". "male" cannot be a rule of its own
/// because it is a substring of "female"; male cohorts are identified
/// by elimination and reported as [`DemographicMatch::Unmatched`].
pub fn resolve_demographic(label: &str) -> DemographicMatch {
    if label.contains("Total") {
        return DemographicMatch::Matched(Demographic::total());
    }

    let lower = label.to_lowercase();

    let rules: &[(&str, Demographic)] = &[
        ("white", Demographic::new(Gender::All, RaceEthnicity::White)),
        ("black", Demographic::new(Gender::All, RaceEthnicity::Black)),
        ("asian", Demographic::new(Gender::All, RaceEthnicity::Asian)),
        (
            "hispanic",
            Demographic::new(Gender::All, RaceEthnicity::Hispanic),
        ),
        (
            "female",
            Demographic::new(Gender::Female, RaceEthnicity::Union),
        ),
    ];

    rules
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map_or(DemographicMatch::Unmatched, |&(_, demographic)| {
            DemographicMatch::Matched(demographic)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Less than high school completion", EducationLevel::LessThanHighSchool)]
    #[case("High school completion", EducationLevel::HighSchool)]
    #[case("Some college, no degree", EducationLevel::SomeCollegeNoDegree)]
    #[case("Associate degree", EducationLevel::Associate)]
    #[case(
        "Median annual earnings, all education levels",
        EducationLevel::AllLevels
    )]
    #[case("Bachelor's degree", EducationLevel::Bachelors)]
    #[case("Bachelor's degree or higher", EducationLevel::BachelorsOrHigher)]
    #[case("Bachelor's or higher degree", EducationLevel::BachelorsOrHigher)]
    #[case("Master's or higher degree", EducationLevel::MastersOrHigher)]
    fn test_level_rules(#[case] label: &str, #[case] expected: EducationLevel) {
        assert_eq!(resolve_level(label), Some(expected));
    }

    #[test]
    fn test_most_specific_rule_wins() {
        // "or higher" must not be shadowed by the plain bachelor's rule.
        assert_eq!(
            resolve_level("Bachelor's degree or higher"),
            Some(EducationLevel::BachelorsOrHigher)
        );
        assert_eq!(
            resolve_level("Bachelor's degree"),
            Some(EducationLevel::Bachelors)
        );
    }

    #[test]
    fn test_unrecognized_level_is_none() {
        assert_eq!(resolve_level("Doctoral studies abroad"), None);
        assert_eq!(resolve_level(""), None);
    }

    #[rstest]
    #[case("All institutions", EducationLevel::AllLevels)]
    #[case("4-year institutions", EducationLevel::Bachelors)]
    #[case("2-year institutions", EducationLevel::Associate)]
    fn test_cost_level_rules(#[case] label: &str, #[case] expected: EducationLevel) {
        assert_eq!(resolve_cost_level(label), Some(expected));
    }

    #[test]
    fn test_cost_level_unrecognized() {
        assert_eq!(resolve_cost_level("Footnote text"), None);
    }

    #[rstest]
    #[case("Total", Gender::All, RaceEthnicity::Union)]
    #[case("White__total", Gender::All, RaceEthnicity::White)]
    #[case("Black__total", Gender::All, RaceEthnicity::Black)]
    #[case("Asian__total", Gender::All, RaceEthnicity::Asian)]
    #[case("Hispanic__total", Gender::All, RaceEthnicity::Hispanic)]
    #[case("Female", Gender::Female, RaceEthnicity::Union)]
    fn test_demographic_rules(
        #[case] label: &str,
        #[case] gender: Gender,
        #[case] race: RaceEthnicity,
    ) {
        assert_eq!(
            resolve_demographic(label),
            DemographicMatch::Matched(Demographic::new(gender, race))
        );
    }

    #[test]
    fn test_male_is_unmatched_then_falls_back() {
        let matched = resolve_demographic("Male");
        assert_eq!(matched, DemographicMatch::Unmatched);
        assert_eq!(
            matched.or_male_fallback(),
            Demographic::new(Gender::Male, RaceEthnicity::Union)
        );
    }

    #[test]
    fn test_female_not_shadowed_by_elimination() {
        // "female" contains "male"; the female rule must fire first.
        assert_eq!(
            resolve_demographic("Female"),
            DemographicMatch::Matched(Demographic::new(Gender::Female, RaceEthnicity::Union))
        );
    }
}
