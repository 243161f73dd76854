//! Stats repository - aggregation queries over `immigration`
//!
//! Every read is a single GROUP BY with optional WHERE clauses:
//! - pie: one nationality, grouped by visa type group
//! - map: all nationalities, grouped by nationality
//! - import: chunked multi-row INSERT inside one transaction

use std::collections::BTreeSet;

use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use visamap_core::{
    Column, ExcludedGroups, ImmigrationRecord, MapFilter, PeriodFilter, PieFilter, QuarterLabel,
};

use super::DbError;
use crate::db::schema;

/// Postgres accepts at most 65535 bind parameters per statement.
const INSERT_CHUNK: usize = 65535 / Column::ALL.len();

/// Decisions for one visa type group
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VisaTypeTotal {
    pub visa_type_group: Option<String>,
    pub total: i64,
}

/// Decisions for one nationality
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct NationalityTotal {
    pub nationality: Option<String>,
    pub total: i64,
}

/// Distinct values used to populate the UI's dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub quarters: Vec<String>,
    pub statuses: Vec<String>,
    pub visa_groups: Vec<String>,
}

/// Stats repository
pub struct StatsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Visa type groups for one nationality, largest first.
    pub async fn pie_breakdown(
        &self,
        nationality: &str,
        filter: &PieFilter,
    ) -> Result<Vec<VisaTypeTotal>, DbError> {
        let mut qb = pie_query(nationality, filter);
        let rows = qb
            .build_query_as::<VisaTypeTotal>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Totals per nationality for the heatmap.
    pub async fn map_totals(&self, filter: &MapFilter) -> Result<Vec<NationalityTotal>, DbError> {
        let mut qb = map_query(filter);
        let rows = qb
            .build_query_as::<NationalityTotal>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Distinct years, quarter tokens, outcomes and visa groups.
    pub async fn filter_options(&self) -> Result<FilterOptions, DbError> {
        let years: Vec<i32> = sqlx::query_scalar(
            "SELECT DISTINCT year FROM immigration WHERE year IS NOT NULL ORDER BY year DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let labels: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT quarter FROM immigration WHERE quarter IS NOT NULL",
        )
        .fetch_all(self.pool)
        .await?;

        let statuses = self.distinct_text("case_outcome").await?;
        let visa_groups = self.distinct_text("visa_type_group").await?;

        Ok(FilterOptions {
            years,
            quarters: quarter_tokens(&labels),
            statuses,
            visa_groups,
        })
    }

    async fn distinct_text(&self, column: &'static str) -> Result<Vec<String>, DbError> {
        let sql = format!(
            "SELECT DISTINCT {column} FROM immigration \
             WHERE {column} IS NOT NULL AND {column} <> '' ORDER BY {column}"
        );
        let values: Vec<String> = sqlx::query_scalar(&sql).fetch_all(self.pool).await?;
        Ok(values)
    }

    /// Bulk insert records, optionally dropping existing data first.
    ///
    /// The reset and every insert chunk run in one transaction, so a failed
    /// import leaves the previous data in place.
    pub async fn import(&self, records: &[ImmigrationRecord], reset: bool) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        if reset {
            schema::reset(&mut *tx).await?;
        } else {
            schema::ensure(&mut *tx).await?;
        }

        let mut inserted = 0u64;
        for chunk in records.chunks(INSERT_CHUNK) {
            let mut qb = insert_query(chunk);
            let result = qb.build().execute(&mut *tx).await?;
            inserted += result.rows_affected();
            tracing::debug!(rows = chunk.len(), "inserted chunk");
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

/// Escape `ILIKE` wildcards so the comparison is plain case-insensitive
/// equality.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn push_excluded(qb: &mut QueryBuilder<'static, Postgres>, excluded: &ExcludedGroups) {
    if excluded.is_empty() {
        return;
    }
    qb.push(" AND visa_type_group NOT IN (");
    let mut separated = qb.separated(", ");
    for group in excluded.as_slice() {
        separated.push_bind(group.clone());
    }
    separated.push_unseparated(")");
}

fn push_period(qb: &mut QueryBuilder<'static, Postgres>, period: &PeriodFilter) {
    match period {
        PeriodFilter::QuarterPrefix(year) => {
            qb.push(" AND quarter LIKE ");
            qb.push_bind(format!("{} %", year));
        }
        PeriodFilter::Quarter { year, quarter } => {
            qb.push(" AND quarter ILIKE ");
            qb.push_bind(escape_like(&PeriodFilter::quarter_label(*year, quarter)));
        }
        PeriodFilter::Year(year) => {
            qb.push(" AND year = ");
            qb.push_bind(*year);
        }
    }
}

pub(crate) fn pie_query(nationality: &str, filter: &PieFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT visa_type_group, COALESCE(SUM(decisions), 0)::BIGINT AS total \
         FROM immigration WHERE nationality ILIKE ",
    );
    qb.push_bind(escape_like(nationality));
    qb.push(" AND case_outcome ILIKE ");
    qb.push_bind(escape_like(&filter.status));
    push_excluded(&mut qb, &filter.excluded);
    push_period(&mut qb, &filter.period());
    qb.push(" GROUP BY visa_type_group ORDER BY total DESC, visa_type_group");
    qb
}

pub(crate) fn map_query(filter: &MapFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT nationality, COALESCE(SUM(decisions), 0)::BIGINT AS total \
         FROM immigration WHERE case_outcome ILIKE ",
    );
    qb.push_bind(escape_like(&filter.status));
    push_excluded(&mut qb, &filter.excluded);
    if let Some(period) = filter.period() {
        push_period(&mut qb, &period);
    }
    qb.push(" GROUP BY nationality ORDER BY nationality");
    qb
}

pub(crate) fn insert_query(records: &[ImmigrationRecord]) -> QueryBuilder<'static, Postgres> {
    let columns: Vec<&str> = Column::ALL.iter().map(|c| c.sql_name()).collect();
    let mut qb = QueryBuilder::new(format!("INSERT INTO immigration ({}) ", columns.join(", ")));

    qb.push_values(records, |mut row, r| {
        row.push_bind(r.year)
            .push_bind(r.quarter.clone())
            .push_bind(r.nationality.clone())
            .push_bind(r.region.clone())
            .push_bind(r.visa_type_group.clone())
            .push_bind(r.visa_type.clone())
            .push_bind(r.visa_type_subgroup.clone())
            .push_bind(r.applicant_type.clone())
            .push_bind(r.case_outcome.clone())
            .push_bind(r.decisions);
    });
    qb
}

/// Unique quarter tokens (`Q1`, `Q2`, ...) from quarter column values.
fn quarter_tokens(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| QuarterLabel::parse(label))
        .map(|label| label.quarter)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("India"), "India");
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    #[test]
    fn pie_query_total_year_uses_prefix() {
        let filter = PieFilter::new(Some(2024), Some("Total"), Some("Issued"), None).unwrap();
        let qb = pie_query("India", &filter);
        let sql = qb.sql();

        assert!(sql.contains("nationality ILIKE $1"));
        assert!(sql.contains("case_outcome ILIKE $2"));
        assert!(sql.contains("quarter LIKE $3"));
        assert!(!sql.contains("NOT IN"));
        assert!(sql.ends_with("GROUP BY visa_type_group ORDER BY total DESC, visa_type_group"));
    }

    #[test]
    fn pie_query_with_exclusions_and_quarter() {
        let filter =
            PieFilter::new(Some(2024), Some("Q2"), Some("Refused"), Some("Work,Study")).unwrap();
        let qb = pie_query("France", &filter);
        let sql = qb.sql();

        assert!(sql.contains("visa_type_group NOT IN ($3, $4)"));
        assert!(sql.contains("quarter ILIKE $5"));
    }

    #[test]
    fn map_query_without_year_has_no_period() {
        let qb = map_query(&MapFilter::default());
        let sql = qb.sql();

        assert!(sql.contains("case_outcome ILIKE $1"));
        assert!(!sql.contains("quarter"));
        assert!(!sql.contains("year ="));
        assert!(sql.contains("GROUP BY nationality"));
    }

    #[test]
    fn map_query_period_variants() {
        let year = MapFilter::new(Some(2023), Some("Total"), None, None);
        assert!(map_query(&year).sql().contains("AND year = $2"));

        let quarter = MapFilter::new(Some(2023), Some("Q4"), None, Some("Visitor"));
        let qb = map_query(&quarter);
        let sql = qb.sql();
        assert!(sql.contains("visa_type_group NOT IN ($2)"));
        assert!(sql.contains("quarter ILIKE $3"));
    }

    #[test]
    fn insert_query_binds_every_column() {
        let records = vec![ImmigrationRecord::default(), ImmigrationRecord::default()];
        let qb = insert_query(&records);
        let sql = qb.sql();

        assert!(sql.starts_with("INSERT INTO immigration (year, quarter, nationality"));
        assert!(sql.contains("$20"));
        assert!(!sql.contains("$21"));
    }

    #[test]
    fn insert_chunk_respects_bind_limit() {
        assert!(INSERT_CHUNK * Column::ALL.len() <= 65535);
    }

    #[test]
    fn quarter_tokens_are_unique_and_sorted() {
        let labels = vec![
            "2024 Q2".to_string(),
            "2023 Q2".to_string(),
            "2024 Q1".to_string(),
            "garbage".to_string(),
        ];
        assert_eq!(quarter_tokens(&labels), vec!["Q1", "Q2"]);
    }

    // Integration tests - each one resets the table, so run them serially
    // against a scratch database:
    // DATABASE_URL=... cargo test -p visamap-server -- --ignored --test-threads=1

    async fn seeded_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        let csv = "\
Year,Quarter,Nationality,Visa type group,Case outcome,Decisions
2024,2024 Q1,India,Work,Issued,\"1,000\"
2024,2024 Q1,India,Study,Issued,400
2024,2024 Q2,India,Work,Issued,50
2024,2024 Q1,India,Work,Refused,7
2023,2023 Q4,France,Visitor,Issued,20
2024,2024 Q1,Stateless,Visitor,Issued,3
";
        let batch = visamap_core::read_records(csv.as_bytes()).unwrap();
        StatsRepo::new(&pool)
            .import(&batch.records, true)
            .await
            .expect("import failed");
        pool
    }

    fn issued(nationality: &str, decisions: i64) -> ImmigrationRecord {
        ImmigrationRecord {
            year: Some(2024),
            quarter: Some("2024 Q1".into()),
            nationality: Some(nationality.into()),
            visa_type_group: Some("Work".into()),
            case_outcome: Some("Issued".into()),
            decisions: Some(decisions),
            ..ImmigrationRecord::default()
        }
    }

    async fn row_count(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM immigration")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn import_spans_multiple_chunks() {
        let pool = seeded_pool().await;
        let records: Vec<_> = (0..INSERT_CHUNK + 447).map(|_| issued("Chile", 1)).collect();
        assert!(records.len() > INSERT_CHUNK);

        let inserted = StatsRepo::new(&pool).import(&records, true).await.unwrap();
        assert_eq!(inserted, records.len() as u64);
        assert_eq!(row_count(&pool).await, records.len() as i64);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failed_reset_import_keeps_previous_rows() {
        let pool = seeded_pool().await;
        let before = row_count(&pool).await;
        assert_eq!(before, 6);

        // Postgres rejects NUL in TEXT; the bad row lands in the second chunk
        let mut records: Vec<_> = (0..INSERT_CHUNK).map(|_| issued("Chile", 1)).collect();
        records.push(issued("Bad\0Land", 1));

        let result = StatsRepo::new(&pool).import(&records, true).await;
        assert!(result.is_err());
        assert_eq!(row_count(&pool).await, before);

        let filter = PieFilter::new(Some(2024), Some("Total"), Some("Issued"), None).unwrap();
        let rows = StatsRepo::new(&pool)
            .pie_breakdown("India", &filter)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pie_breakdown_sums_by_group() {
        let pool = seeded_pool().await;
        let repo = StatsRepo::new(&pool);

        let filter = PieFilter::new(Some(2024), Some("Total"), Some("issued"), None).unwrap();
        let rows = repo.pie_breakdown("india", &filter).await.unwrap();
        assert_eq!(
            rows,
            vec![
                VisaTypeTotal {
                    visa_type_group: Some("Work".into()),
                    total: 1050
                },
                VisaTypeTotal {
                    visa_type_group: Some("Study".into()),
                    total: 400
                },
            ]
        );

        let filter = PieFilter::new(Some(2024), Some("Q1"), Some("Issued"), Some("Study")).unwrap();
        let rows = repo.pie_breakdown("India", &filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 1000);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn map_totals_group_by_nationality() {
        let pool = seeded_pool().await;
        let repo = StatsRepo::new(&pool);

        let rows = repo.map_totals(&MapFilter::default()).await.unwrap();
        let india = rows
            .iter()
            .find(|r| r.nationality.as_deref() == Some("India"))
            .unwrap();
        assert_eq!(india.total, 1450);

        let filter = MapFilter::new(Some(2023), None, None, None);
        let rows = repo.map_totals(&filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].nationality.as_deref(), Some("France"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn filter_options_lists_distinct_values() {
        let pool = seeded_pool().await;
        let options = StatsRepo::new(&pool).filter_options().await.unwrap();

        assert_eq!(options.years, vec![2024, 2023]);
        assert_eq!(options.quarters, vec!["Q1", "Q2", "Q4"]);
        assert_eq!(options.statuses, vec!["Issued", "Refused"]);
        assert_eq!(options.visa_groups, vec!["Study", "Visitor", "Work"]);
    }
}
