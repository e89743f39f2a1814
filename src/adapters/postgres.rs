use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, info, instrument};

use crate::data::RecordSource;
use crate::domain::{MatchFormat, PerformanceRecord};
use crate::error::{Result, XiError};

const RECORD_COLUMNS: &str = r#"
    id, format, player_name, role_text, bowling_style, batting_style, match_date,
    opposition, ground, pitch_type, weather, runs, balls_faced, strike_rate, fours,
    sixes, bat_position, dismissal, overs, maidens, runs_conceded, wickets, economy
"#;

/// PostgreSQL storage adapter for performance records
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a PostgreSQL store from an existing connection pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ==================== Records ====================

    /// Insert a record, returning its id
    #[instrument(skip(self, record), fields(format = %record.format, player = %record.player_name))]
    pub async fn insert_record(&self, record: &PerformanceRecord) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO performance_records (
                format, player_name, role_text, bowling_style, batting_style, match_date,
                opposition, ground, pitch_type, weather, runs, balls_faced, strike_rate,
                fours, sixes, bat_position, dismissal, overs, maidens, runs_conceded,
                wickets, economy
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22)
            RETURNING id
            "#,
        )
        .bind(record.format.as_str())
        .bind(record.player_name.trim())
        .bind(&record.role_text)
        .bind(&record.bowling_style)
        .bind(&record.batting_style)
        .bind(record.date)
        .bind(&record.opposition)
        .bind(&record.ground)
        .bind(&record.pitch_type)
        .bind(&record.weather)
        .bind(record.runs)
        .bind(record.balls_faced)
        .bind(record.strike_rate)
        .bind(record.fours)
        .bind(record.sixes)
        .bind(record.bat_position.map(i16::from))
        .bind(&record.dismissal)
        .bind(record.overs)
        .bind(record.maidens)
        .bind(record.runs_conceded)
        .bind(record.wickets)
        .bind(record.economy)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.get("id");
        debug!(id, "Inserted performance record");
        Ok(id)
    }

    /// Records of one format, newest match first
    #[instrument(skip(self))]
    pub async fn list_records(&self, format: MatchFormat) -> Result<Vec<PerformanceRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM performance_records WHERE format = $1 \
             ORDER BY match_date DESC NULLS LAST, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(format.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }

    /// Every record, in insertion order
    #[instrument(skip(self))]
    pub async fn all_records(&self) -> Result<Vec<PerformanceRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM performance_records ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(record_from_row).collect()
    }

    /// Delete a record; returns false when no such record exists for the format
    #[instrument(skip(self))]
    pub async fn delete_record(&self, format: MatchFormat, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM performance_records WHERE id = $1 AND format = $2")
            .bind(id)
            .bind(format.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the player already has a record against this opposition
    #[instrument(skip(self))]
    pub async fn record_exists(
        &self,
        format: MatchFormat,
        player_name: &str,
        opposition: &str,
    ) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM performance_records
                WHERE format = $1 AND player_name = $2 AND opposition = $3
            ) AS present
            "#,
        )
        .bind(format.as_str())
        .bind(player_name.trim())
        .bind(opposition.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("present"))
    }

    /// Record count per format
    pub async fn count_records(&self, format: MatchFormat) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM performance_records WHERE format = $1")
            .bind(format.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("n"))
    }
}

fn record_from_row(row: &PgRow) -> Result<PerformanceRecord> {
    let format_text: String = row.try_get("format")?;
    let format: MatchFormat = format_text
        .parse()
        .map_err(|e| XiError::Internal(format!("stored format '{format_text}': {e}")))?;

    let mut record = PerformanceRecord::new(format, row.try_get::<String, _>("player_name")?);
    record.id = Some(row.try_get("id")?);
    record.role_text = row.try_get("role_text")?;
    record.bowling_style = row.try_get("bowling_style")?;
    record.batting_style = row.try_get("batting_style")?;
    record.date = row.try_get("match_date")?;
    record.opposition = row.try_get("opposition")?;
    record.ground = row.try_get("ground")?;
    record.pitch_type = row.try_get("pitch_type")?;
    record.weather = row.try_get("weather")?;
    record.runs = row.try_get("runs")?;
    record.balls_faced = row.try_get("balls_faced")?;
    record.strike_rate = row.try_get("strike_rate")?;
    record.fours = row.try_get("fours")?;
    record.sixes = row.try_get("sixes")?;
    record.bat_position = row
        .try_get::<Option<i16>, _>("bat_position")?
        .and_then(|p| u8::try_from(p).ok());
    record.dismissal = row.try_get("dismissal")?;
    record.overs = row.try_get("overs")?;
    record.maidens = row.try_get("maidens")?;
    record.runs_conceded = row.try_get("runs_conceded")?;
    record.wickets = row.try_get("wickets")?;
    record.economy = row.try_get("economy")?;
    Ok(record)
}

#[async_trait]
impl RecordSource for PostgresStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn load_records(&self) -> Result<Vec<PerformanceRecord>> {
        self.all_records().await
    }
}
