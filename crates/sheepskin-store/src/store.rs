//! The fact store: SQLite access for dimensions and facts.

use crate::error::{Result, StoreError};
use crate::schema;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use sheepskin::{Demographic, EducationLevel, Gender, RaceEthnicity};
use sheepskin_roi::{CohortInput, RoiMetrics};
use std::path::Path;
use tracing::{info, warn};

/// SQLite-backed star-schema store.
#[derive(Debug)]
pub struct FactStore {
    conn: Connection,
}

/// One cost observation to load (unscaled; the store applies the
/// program-length multiplier on insert).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEntry {
    /// Education level of the section the observation came from.
    pub level: EducationLevel,

    /// Calendar year.
    pub year: i32,

    /// Per-full-time-student expenditure, unscaled.
    pub cost: f64,
}

/// One survey observation to load.
///
/// `value` is `None` for missing cells; the store substitutes zero at
/// this boundary (and nowhere earlier).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactEntry {
    /// Education level.
    pub level: EducationLevel,

    /// Calendar year.
    pub year: i32,

    /// Observed value, if the source cell held one.
    pub value: Option<f64>,
}

/// All survey observations for one demographic cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyBlock {
    /// The cohort the block describes.
    pub demographic: Demographic,

    /// Median-annual-earnings observations.
    pub earnings: Vec<FactEntry>,

    /// Percentage-attainment observations.
    pub attainment: Vec<FactEntry>,
}

/// Row counts from a survey load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurveyLoadReport {
    /// Earnings fact rows inserted.
    pub earnings_rows: usize,

    /// Attainment fact rows inserted.
    pub attainment_rows: usize,

    /// Blocks skipped because their demographic had no dimension row.
    pub skipped_blocks: usize,
}

/// Per-education-level averages over the ROI fact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiSummaryRow {
    /// Education level name.
    pub level_name: String,

    /// Average total education cost.
    pub avg_education_cost: f64,

    /// Average loan principal.
    pub avg_loan_amount: f64,

    /// Average monthly loan payment.
    pub avg_monthly_payment: f64,

    /// Average annual earnings.
    pub avg_annual_earnings: f64,

    /// Average monthly earnings net of the loan payment.
    pub avg_net_monthly_earnings: f64,

    /// Average ROI percentage.
    pub avg_roi_percentage: f64,

    /// Average debt-to-income ratio, as a percentage.
    pub avg_debt_to_income_pct: f64,

    /// Average years to break even.
    pub avg_years_to_break_even: f64,
}

impl FactStore {
    /// Open (or create) a store at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Drop and recreate the full schema, in one transaction.
    pub fn create_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for table in schema::ALL_TABLES {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {table}"))?;
        }
        for ddl in schema::CREATE_DIMENSIONS {
            tx.execute(ddl, [])?;
        }
        for ddl in schema::CREATE_FACTS {
            tx.execute(ddl, [])?;
        }
        tx.execute(schema::CREATE_ROI, [])?;
        tx.commit()?;
        info!("schema created");
        Ok(())
    }

    /// Seed the dimension catalogs. Idempotent; dimensions are never
    /// mutated after this.
    pub fn seed_dimensions(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;

        for level in EducationLevel::all() {
            tx.execute(
                "INSERT OR IGNORE INTO dim_education_level (level_id, level_name, display_order)
                 VALUES (?1, ?2, ?3)",
                params![level.id(), level.name(), level.display_order()],
            )?;
        }
        for gender in Gender::all() {
            tx.execute(
                "INSERT OR IGNORE INTO dim_gender (gender_name, gender_code) VALUES (?1, ?2)",
                params![gender.name(), gender.code()],
            )?;
        }
        for race in RaceEthnicity::all() {
            tx.execute(
                "INSERT OR IGNORE INTO dim_race_ethnicity (race_name, race_code) VALUES (?1, ?2)",
                params![race.name(), race.code()],
            )?;
        }
        for demographic in Demographic::cross_product() {
            tx.execute(
                "INSERT OR IGNORE INTO dim_demographic (gender_id, race_id)
                 SELECT g.gender_id, r.race_id
                 FROM dim_gender g, dim_race_ethnicity r
                 WHERE g.gender_code = ?1 AND r.race_code = ?2",
                params![demographic.gender.code(), demographic.race.code()],
            )?;
        }

        tx.commit()?;
        info!("dimensions seeded");
        Ok(())
    }

    /// Insert a year if absent and return its surrogate ID.
    pub fn upsert_year(&self, year: i32) -> Result<i64> {
        upsert_year_in(&self.conn, year)
    }

    /// Look up a year's surrogate ID.
    pub fn lookup_year_id(&self, year: i32) -> Result<i64> {
        lookup_year_in(&self.conn, year)
    }

    /// Look up a demographic's surrogate ID by codes.
    pub fn lookup_demographic_id(&self, demographic: Demographic) -> Result<i64> {
        lookup_demographic_in(&self.conn, demographic)
    }

    /// Insert one cost fact, scaling the per-student cost by the
    /// level's program length before storage.
    pub fn insert_cost_fact(&self, level: EducationLevel, year_id: i64, cost: f64) -> Result<()> {
        insert_cost_in(&self.conn, level, year_id, cost)
    }

    /// Insert one earnings fact. Missing values persist as zero; this
    /// is the pipeline's only zero-substitution point.
    pub fn insert_earnings_fact(
        &self,
        level_id: i64,
        demographic_id: i64,
        year_id: i64,
        value: Option<f64>,
    ) -> Result<()> {
        insert_survey_in(
            &self.conn,
            "INSERT INTO fact_earnings (level_id, demographic_id, year_id, annual_earnings, loaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            level_id,
            demographic_id,
            year_id,
            value,
        )
    }

    /// Insert one attainment fact (missing values persist as zero).
    pub fn insert_attainment_fact(
        &self,
        level_id: i64,
        demographic_id: i64,
        year_id: i64,
        value: Option<f64>,
    ) -> Result<()> {
        insert_survey_in(
            &self.conn,
            "INSERT INTO fact_attainment (level_id, demographic_id, year_id, percentage, loaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            level_id,
            demographic_id,
            year_id,
            value,
        )
    }

    /// Upsert one ROI fact on its (level, year, demographic) triple.
    pub fn upsert_roi_fact(&self, metrics: &RoiMetrics) -> Result<()> {
        upsert_roi_in(&self.conn, metrics)
    }

    /// Delete ROI rows with zero education cost. Returns the count.
    pub fn prune_zero_cost_roi(&self) -> Result<usize> {
        let pruned = self
            .conn
            .execute("DELETE FROM fact_roi WHERE total_education_cost = 0", [])?;
        Ok(pruned)
    }

    /// Rebuild the cost fact table from `entries`, in one transaction.
    pub fn load_cost_facts(&mut self, entries: &[CostEntry]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS fact_cost")?;
        tx.execute(schema::CREATE_FACTS[0], [])?;

        for entry in entries {
            let year_id = upsert_year_in(&tx, entry.year)?;
            insert_cost_in(&tx, entry.level, year_id, entry.cost)?;
        }

        tx.commit()?;
        info!(rows = entries.len(), "cost facts loaded");
        Ok(entries.len())
    }

    /// Rebuild the earnings and attainment fact tables from survey
    /// blocks, in one transaction.
    ///
    /// `years` is the sheet's full year-column list; all years are
    /// upserted up front so the per-cell lookups resolve. Blocks whose
    /// demographic has no dimension row are skipped, not fatal.
    pub fn load_survey_facts(
        &mut self,
        years: &[i32],
        blocks: &[SurveyBlock],
    ) -> Result<SurveyLoadReport> {
        let tx = self.conn.transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS fact_earnings; DROP TABLE IF EXISTS fact_attainment")?;
        tx.execute(schema::CREATE_FACTS[1], [])?;
        tx.execute(schema::CREATE_FACTS[2], [])?;

        for &year in years {
            upsert_year_in(&tx, year)?;
        }

        let mut report = SurveyLoadReport::default();
        for block in blocks {
            let demographic_id = match lookup_demographic_in(&tx, block.demographic) {
                Ok(id) => id,
                Err(StoreError::DemographicNotFound { gender, race }) => {
                    warn!(gender, race, "no demographic dimension row; skipping block");
                    report.skipped_blocks += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            for entry in &block.earnings {
                let year_id = lookup_year_in(&tx, entry.year)?;
                insert_survey_in(
                    &tx,
                    "INSERT INTO fact_earnings (level_id, demographic_id, year_id, annual_earnings, loaded_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    entry.level.id(),
                    demographic_id,
                    year_id,
                    entry.value,
                )?;
                report.earnings_rows += 1;
            }
            for entry in &block.attainment {
                let year_id = lookup_year_in(&tx, entry.year)?;
                insert_survey_in(
                    &tx,
                    "INSERT INTO fact_attainment (level_id, demographic_id, year_id, percentage, loaded_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    entry.level.id(),
                    demographic_id,
                    year_id,
                    entry.value,
                )?;
                report.attainment_rows += 1;
            }
        }

        tx.commit()?;
        info!(
            earnings = report.earnings_rows,
            attainment = report.attainment_rows,
            skipped = report.skipped_blocks,
            "survey facts loaded"
        );
        Ok(report)
    }

    /// Rebuild the ROI fact table from computed metrics, in one
    /// transaction: recreate, upsert every row, prune zero-cost rows.
    /// Returns the number of rows remaining.
    pub fn replace_roi_facts(&mut self, metrics: &[RoiMetrics]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS fact_roi")?;
        tx.execute(schema::CREATE_ROI, [])?;

        for row in metrics {
            upsert_roi_in(&tx, row)?;
        }
        let pruned = tx.execute("DELETE FROM fact_roi WHERE total_education_cost = 0", [])?;
        let kept: i64 = tx.query_row("SELECT COUNT(*) FROM fact_roi", [], |row| row.get(0))?;

        tx.commit()?;
        info!(kept, pruned, "ROI facts replaced");
        Ok(kept as usize)
    }

    /// The joined cohort rows feeding ROI computation: every positive
    /// earnings fact, left-joined to the high-school baseline for the
    /// same year/demographic and to the (demographic-free) cost for the
    /// same level/year. Absent baselines and costs degrade to zero.
    pub fn cohort_rows(&self) -> Result<Vec<CohortInput>> {
        let mut stmt = self.conn.prepare(
            "WITH baseline AS (
                SELECT year_id, demographic_id, annual_earnings AS baseline_earnings
                FROM fact_earnings
                WHERE level_id = ?1
            )
            SELECT e.level_id, e.year_id, e.demographic_id,
                   e.annual_earnings,
                   COALESCE(b.baseline_earnings, 0.0),
                   COALESCE(c.cost, 0.0)
            FROM fact_earnings e
            LEFT JOIN baseline b
                ON e.year_id = b.year_id AND e.demographic_id = b.demographic_id
            LEFT JOIN fact_cost c
                ON e.level_id = c.level_id AND e.year_id = c.year_id
            WHERE e.annual_earnings > 0
            ORDER BY e.level_id, e.year_id, e.demographic_id",
        )?;

        let rows = stmt.query_map(params![EducationLevel::HighSchool.id()], |row| {
            Ok(CohortInput {
                level_id: row.get(0)?,
                year_id: row.get(1)?,
                demographic_id: row.get(2)?,
                annual_earnings: row.get(3)?,
                baseline_earnings: row.get(4)?,
                total_education_cost: row.get(5)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    /// All persisted ROI facts, ordered by cohort triple.
    pub fn roi_facts(&self) -> Result<Vec<RoiMetrics>> {
        let mut stmt = self.conn.prepare(
            "SELECT level_id, year_id, demographic_id,
                    total_education_cost, loan_amount, total_loan_cost, monthly_loan_payment,
                    annual_earnings, baseline_earnings, net_monthly_earnings,
                    total_investment, earnings_premium_monthly, net_roi_10yr,
                    roi_percentage, debt_to_income_ratio, years_to_break_even
             FROM fact_roi
             ORDER BY level_id, year_id, demographic_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RoiMetrics {
                level_id: row.get(0)?,
                year_id: row.get(1)?,
                demographic_id: row.get(2)?,
                total_education_cost: row.get(3)?,
                loan_amount: row.get(4)?,
                total_loan_cost: row.get(5)?,
                monthly_loan_payment: row.get(6)?,
                annual_earnings: row.get(7)?,
                baseline_earnings: row.get(8)?,
                net_monthly_earnings: row.get(9)?,
                total_investment: row.get(10)?,
                earnings_premium_monthly: row.get(11)?,
                net_roi_10yr: row.get(12)?,
                roi_percentage: row.get(13)?,
                debt_to_income_ratio: row.get(14)?,
                years_to_break_even: row.get(15)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    /// Per-level averages over the ROI facts, in display order.
    pub fn roi_summary(&self) -> Result<Vec<RoiSummaryRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.level_name,
                    ROUND(AVG(r.total_education_cost), 2),
                    ROUND(AVG(r.loan_amount), 2),
                    ROUND(AVG(r.monthly_loan_payment), 2),
                    ROUND(AVG(r.annual_earnings), 2),
                    ROUND(AVG(r.net_monthly_earnings), 2),
                    ROUND(AVG(r.roi_percentage), 2),
                    ROUND(AVG(r.debt_to_income_ratio * 100), 2),
                    ROUND(AVG(r.years_to_break_even), 2)
             FROM fact_roi r
             JOIN dim_education_level l ON r.level_id = l.level_id
             GROUP BY l.level_name, l.display_order
             ORDER BY l.display_order",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RoiSummaryRow {
                level_name: row.get(0)?,
                avg_education_cost: row.get(1)?,
                avg_loan_amount: row.get(2)?,
                avg_monthly_payment: row.get(3)?,
                avg_annual_earnings: row.get(4)?,
                avg_net_monthly_earnings: row.get(5)?,
                avg_roi_percentage: row.get(6)?,
                avg_debt_to_income_pct: row.get(7)?,
                avg_years_to_break_even: row.get(8)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }
}

fn upsert_year_in(conn: &Connection, year: i32) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO dim_year (year) VALUES (?1)",
        params![year],
    )?;
    lookup_year_in(conn, year)
}

fn lookup_year_in(conn: &Connection, year: i32) -> Result<i64> {
    conn.query_row(
        "SELECT year_id FROM dim_year WHERE year = ?1",
        params![year],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(StoreError::YearNotFound(year))
}

fn lookup_demographic_in(conn: &Connection, demographic: Demographic) -> Result<i64> {
    conn.query_row(
        "SELECT d.demographic_id
         FROM dim_demographic d
         JOIN dim_gender g ON d.gender_id = g.gender_id
         JOIN dim_race_ethnicity r ON d.race_id = r.race_id
         WHERE g.gender_code = ?1 AND r.race_code = ?2",
        params![demographic.gender.code(), demographic.race.code()],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| StoreError::DemographicNotFound {
        gender: demographic.gender.code().to_string(),
        race: demographic.race.code().to_string(),
    })
}

fn insert_cost_in(conn: &Connection, level: EducationLevel, year_id: i64, cost: f64) -> Result<()> {
    let scaled = cost * level.program_years();
    conn.execute(
        "INSERT INTO fact_cost (level_id, year_id, cost, loaded_at) VALUES (?1, ?2, ?3, ?4)",
        params![level.id(), year_id, scaled, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn insert_survey_in(
    conn: &Connection,
    sql: &str,
    level_id: i64,
    demographic_id: i64,
    year_id: i64,
    value: Option<f64>,
) -> Result<()> {
    conn.execute(
        sql,
        params![
            level_id,
            demographic_id,
            year_id,
            value.unwrap_or(0.0),
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

fn upsert_roi_in(conn: &Connection, m: &RoiMetrics) -> Result<()> {
    conn.execute(
        "INSERT INTO fact_roi (
            level_id, year_id, demographic_id,
            total_education_cost, loan_amount, total_loan_cost, monthly_loan_payment,
            annual_earnings, baseline_earnings, net_monthly_earnings,
            total_investment, earnings_premium_monthly, net_roi_10yr,
            roi_percentage, debt_to_income_ratio, years_to_break_even
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        ON CONFLICT (level_id, year_id, demographic_id) DO UPDATE SET
            total_education_cost = excluded.total_education_cost,
            loan_amount = excluded.loan_amount,
            total_loan_cost = excluded.total_loan_cost,
            monthly_loan_payment = excluded.monthly_loan_payment,
            annual_earnings = excluded.annual_earnings,
            baseline_earnings = excluded.baseline_earnings,
            net_monthly_earnings = excluded.net_monthly_earnings,
            total_investment = excluded.total_investment,
            earnings_premium_monthly = excluded.earnings_premium_monthly,
            net_roi_10yr = excluded.net_roi_10yr,
            roi_percentage = excluded.roi_percentage,
            debt_to_income_ratio = excluded.debt_to_income_ratio,
            years_to_break_even = excluded.years_to_break_even",
        params![
            m.level_id,
            m.year_id,
            m.demographic_id,
            m.total_education_cost,
            m.loan_amount,
            m.total_loan_cost,
            m.monthly_loan_payment,
            m.annual_earnings,
            m.baseline_earnings,
            m.net_monthly_earnings,
            m.total_investment,
            m.earnings_premium_monthly,
            m.net_roi_10yr,
            m.roi_percentage,
            m.debt_to_income_ratio,
            m.years_to_break_even
        ],
    )?;
    Ok(())
}
