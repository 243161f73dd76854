//! Schema for the `immigration` fact table

use sqlx::PgConnection;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS immigration (
        id BIGSERIAL PRIMARY KEY,
        year INTEGER,
        quarter TEXT,
        nationality TEXT,
        region TEXT,
        visa_type_group TEXT,
        visa_type TEXT,
        visa_type_subgroup TEXT,
        applicant_type TEXT,
        case_outcome TEXT,
        decisions BIGINT
    )
"#;

const CREATE_NATIONALITY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS immigration_nationality_idx ON immigration (nationality)";

const CREATE_PERIOD_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS immigration_period_idx ON immigration (year, quarter)";

/// Create the table and its indexes if they do not exist.
pub async fn ensure(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    tracing::debug!("ensuring immigration table exists");

    sqlx::query(CREATE_TABLE).execute(&mut *conn).await?;
    sqlx::query(CREATE_NATIONALITY_INDEX)
        .execute(&mut *conn)
        .await?;
    sqlx::query(CREATE_PERIOD_INDEX).execute(&mut *conn).await?;
    Ok(())
}

/// Drop the table and recreate it empty.
pub async fn reset(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    tracing::info!("Resetting database: dropping immigration table");

    sqlx::query("DROP TABLE IF EXISTS immigration")
        .execute(&mut *conn)
        .await?;
    ensure(conn).await?;

    tracing::info!("Database has been reset");
    Ok(())
}
