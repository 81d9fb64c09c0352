//! Fixed dimension catalogs for the education-ROI star schema.
//!
//! These are immutable reference data: eight canonical education levels
//! (ordered for display), three gender categories, five race/ethnicity
//! categories, and the demographic cross product of the last two. The
//! fact store seeds them once and never mutates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical education levels (8 levels).
///
/// The discriminant doubles as the surrogate ID used by the fact store,
/// matching the seeding order of the `dim_education_level` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i64)]
pub enum EducationLevel {
    /// Less than high school completion
    LessThanHighSchool = 1,

    /// High school completion (the ROI baseline level)
    HighSchool = 2,

    /// Some college, no degree
    SomeCollegeNoDegree = 3,

    /// Associate degree
    Associate = 4,

    /// All education levels (the aggregate row of the source tables)
    AllLevels = 5,

    /// Bachelor's degree
    Bachelors = 6,

    /// Bachelor's degree or higher
    BachelorsOrHigher = 7,

    /// Master's or higher degree
    MastersOrHigher = 8,
}

impl EducationLevel {
    /// Returns all education levels in display order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::LessThanHighSchool,
            Self::HighSchool,
            Self::SomeCollegeNoDegree,
            Self::Associate,
            Self::AllLevels,
            Self::Bachelors,
            Self::BachelorsOrHigher,
            Self::MastersOrHigher,
        ]
    }

    /// Returns the surrogate ID used by the fact store.
    pub const fn id(&self) -> i64 {
        *self as i64
    }

    /// Returns the display-order integer.
    pub const fn display_order(&self) -> i64 {
        *self as i64
    }

    /// Returns the canonical level name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LessThanHighSchool => "Less than high school completion",
            Self::HighSchool => "High school completion",
            Self::SomeCollegeNoDegree => "Some college, no degree",
            Self::Associate => "Associate degree",
            Self::AllLevels => "Median annual earnings, all education levels",
            Self::Bachelors => "Bachelor's degree",
            Self::BachelorsOrHigher => "Bachelor's degree or higher",
            Self::MastersOrHigher => "Master's or higher degree",
        }
    }

    /// Parse a level from its surrogate ID.
    pub const fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::LessThanHighSchool),
            2 => Some(Self::HighSchool),
            3 => Some(Self::SomeCollegeNoDegree),
            4 => Some(Self::Associate),
            5 => Some(Self::AllLevels),
            6 => Some(Self::Bachelors),
            7 => Some(Self::BachelorsOrHigher),
            8 => Some(Self::MastersOrHigher),
            _ => None,
        }
    }

    /// Program duration in years, used to scale per-student annual
    /// expenditure into a total education cost before storage.
    ///
    /// Associate programs run 2 years, Bachelor's 4, Master's-or-higher
    /// 6 (4 undergraduate + 2 graduate); every other level is already a
    /// total and scales by 1.
    pub const fn program_years(&self) -> f64 {
        match self {
            Self::Associate => 2.0,
            Self::Bachelors => 4.0,
            Self::MastersOrHigher => 6.0,
            _ => 1.0,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Gender categories, including the "All" aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Female
    Female,

    /// Male
    Male,

    /// All genders (not broken out)
    All,
}

impl Gender {
    /// Returns all gender categories.
    pub fn all() -> Vec<Self> {
        vec![Self::Female, Self::Male, Self::All]
    }

    /// Single-character code stored in the gender dimension.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male => "M",
            Self::All => "A",
        }
    }

    /// Returns the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
            Self::All => "All",
        }
    }
}

/// Race/ethnicity categories, including the "Union" aggregate.
///
/// `Union` means the source row is not broken out by race (gender-only
/// or fully aggregate cohorts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceEthnicity {
    /// Asian
    Asian,

    /// Black
    Black,

    /// Hispanic
    Hispanic,

    /// White
    White,

    /// Not broken out by race
    Union,
}

impl RaceEthnicity {
    /// Returns all race/ethnicity categories.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Asian,
            Self::Black,
            Self::Hispanic,
            Self::White,
            Self::Union,
        ]
    }

    /// Single-character code stored in the race dimension.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Asian => "A",
            Self::Black => "B",
            Self::Hispanic => "H",
            Self::White => "W",
            Self::Union => "U",
        }
    }

    /// Returns the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Asian => "Asian",
            Self::Black => "Black",
            Self::Hispanic => "Hispanic",
            Self::White => "White",
            Self::Union => "Union",
        }
    }
}

/// A demographic cohort: one (gender, race/ethnicity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Demographic {
    /// Gender component.
    pub gender: Gender,

    /// Race/ethnicity component.
    pub race: RaceEthnicity,
}

impl Demographic {
    /// Create a new demographic cohort.
    pub const fn new(gender: Gender, race: RaceEthnicity) -> Self {
        Self { gender, race }
    }

    /// The fully aggregate cohort: (All, Union).
    pub const fn total() -> Self {
        Self::new(Gender::All, RaceEthnicity::Union)
    }

    /// The full cross product of genders and races, in seeding order.
    pub fn cross_product() -> Vec<Self> {
        let mut out = Vec::with_capacity(15);
        for gender in Gender::all() {
            for race in RaceEthnicity::all() {
                out.push(Self::new(gender, race));
            }
        }
        out
    }
}

impl fmt::Display for Demographic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.gender.name(), self.race.name())
    }
}
