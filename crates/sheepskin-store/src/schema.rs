//! Star-schema DDL.
//!
//! Surrogate IDs everywhere; education levels are seeded with their
//! catalog IDs so the stored keys match [`sheepskin::EducationLevel`]
//! discriminants. The earnings fact table deliberately carries no
//! uniqueness constraint: the source can legitimately produce
//! duplicate observations and re-runs rebuild the table wholesale
//! instead of deduplicating.

/// All tables, newest-dependency-first so drops cascade manually.
pub const ALL_TABLES: &[&str] = &[
    "fact_roi",
    "fact_attainment",
    "fact_earnings",
    "fact_cost",
    "dim_demographic",
    "dim_race_ethnicity",
    "dim_gender",
    "dim_education_level",
    "dim_year",
];

/// Dimension tables.
pub const CREATE_DIMENSIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS dim_year (
        year_id INTEGER PRIMARY KEY AUTOINCREMENT,
        year INTEGER NOT NULL UNIQUE
            CHECK (year >= 2005 AND year <= 2022)
    )",
    "CREATE TABLE IF NOT EXISTS dim_education_level (
        level_id INTEGER PRIMARY KEY,
        level_name TEXT NOT NULL UNIQUE,
        display_order INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS dim_gender (
        gender_id INTEGER PRIMARY KEY AUTOINCREMENT,
        gender_name TEXT NOT NULL,
        gender_code TEXT NOT NULL UNIQUE
            CHECK (gender_code IN ('F', 'M', 'A'))
    )",
    "CREATE TABLE IF NOT EXISTS dim_race_ethnicity (
        race_id INTEGER PRIMARY KEY AUTOINCREMENT,
        race_name TEXT NOT NULL,
        race_code TEXT NOT NULL UNIQUE
            CHECK (race_code IN ('A', 'B', 'H', 'W', 'U'))
    )",
    "CREATE TABLE IF NOT EXISTS dim_demographic (
        demographic_id INTEGER PRIMARY KEY AUTOINCREMENT,
        gender_id INTEGER NOT NULL REFERENCES dim_gender(gender_id),
        race_id INTEGER NOT NULL REFERENCES dim_race_ethnicity(race_id),
        UNIQUE (gender_id, race_id)
    )",
];

/// Fact tables (ROI excluded; its stage recreates it).
pub const CREATE_FACTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS fact_cost (
        cost_id INTEGER PRIMARY KEY AUTOINCREMENT,
        level_id INTEGER NOT NULL REFERENCES dim_education_level(level_id),
        year_id INTEGER NOT NULL REFERENCES dim_year(year_id),
        cost REAL NOT NULL,
        loaded_at TEXT NOT NULL
    )",
    // No UNIQUE constraint: duplicate observations accumulate unless
    // the table is rebuilt first.
    "CREATE TABLE IF NOT EXISTS fact_earnings (
        earnings_id INTEGER PRIMARY KEY AUTOINCREMENT,
        level_id INTEGER NOT NULL REFERENCES dim_education_level(level_id),
        demographic_id INTEGER NOT NULL REFERENCES dim_demographic(demographic_id),
        year_id INTEGER NOT NULL REFERENCES dim_year(year_id),
        annual_earnings REAL NOT NULL,
        loaded_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS fact_attainment (
        attainment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        level_id INTEGER NOT NULL REFERENCES dim_education_level(level_id),
        demographic_id INTEGER NOT NULL REFERENCES dim_demographic(demographic_id),
        year_id INTEGER NOT NULL REFERENCES dim_year(year_id),
        percentage REAL NOT NULL,
        loaded_at TEXT NOT NULL
    )",
];

/// ROI fact table, unique on the cohort triple with replace-on-conflict
/// handled by the upsert statement.
pub const CREATE_ROI: &str = "CREATE TABLE IF NOT EXISTS fact_roi (
    roi_id INTEGER PRIMARY KEY AUTOINCREMENT,
    level_id INTEGER NOT NULL REFERENCES dim_education_level(level_id),
    year_id INTEGER NOT NULL REFERENCES dim_year(year_id),
    demographic_id INTEGER NOT NULL REFERENCES dim_demographic(demographic_id),

    total_education_cost REAL NOT NULL,
    loan_amount REAL NOT NULL,
    total_loan_cost REAL NOT NULL,
    monthly_loan_payment REAL NOT NULL,

    annual_earnings REAL NOT NULL,
    baseline_earnings REAL NOT NULL,
    net_monthly_earnings REAL NOT NULL,

    total_investment REAL NOT NULL,
    earnings_premium_monthly REAL NOT NULL,
    net_roi_10yr REAL NOT NULL,
    roi_percentage REAL NOT NULL,
    debt_to_income_ratio REAL NOT NULL,
    years_to_break_even REAL NOT NULL,

    UNIQUE (level_id, year_id, demographic_id)
)";
