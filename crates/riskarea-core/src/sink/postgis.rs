// crates/riskarea-core/src/sink/postgis.rs

//! PostgreSQL/PostGIS sink.

use super::RecordSink;
use crate::config::{IngestConfig, PoolConfig};
use crate::error::{IngestError, Result};
use crate::record::{RiskAreaRecord, SRID};
use crate::runtime;
use once_cell::sync::OnceCell;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;

/// Appends records to the target relation through a lazily created pool.
///
/// The pool lives as long as the sink; callers keep one sink per process so
/// that invocations share connections.
pub struct PostGisSink {
    config: IngestConfig,
    pool: OnceCell<PgPool>,
    table_ready: OnceCell<()>,
    create_sql: String,
    insert_sql: String,
}

impl PostGisSink {
    /// Validates the configuration; no connection is opened here.
    pub fn new(config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        let table = &config.target_table;

        let create_sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
                nome TEXT, \
                em_risco BOOLEAN, \
                descricao TEXT, \
                created_at TIMESTAMP, \
                area_risco geometry(MultiPolygon, {SRID}))"
        );
        let insert_sql = format!(
            "INSERT INTO {table} (nome, em_risco, descricao, created_at, area_risco) \
             VALUES ($1, $2, $3, $4, ST_Multi(ST_SetSRID(ST_GeomFromGeoJSON($5), {SRID})))"
        );

        Ok(Self {
            config: config.clone(),
            pool: OnceCell::new(),
            table_ready: OnceCell::new(),
            create_sql,
            insert_sql,
        })
    }

    fn pool(&self) -> Result<&PgPool> {
        self.pool.get_or_try_init(|| self.connect())
    }

    fn connect(&self) -> Result<PgPool> {
        if self.config.database_url.trim().is_empty() {
            return Err(IngestError::Persistence(
                "database connection string is not configured".into(),
            ));
        }
        let options = PgConnectOptions::from_str(&self.config.database_url)?;
        let pool_config = &self.config.pool;

        tracing::info!(
            host = options.get_host(),
            database = options.get_database().unwrap_or("<default>"),
            max_connections = pool_config.max_connections(),
            "Creating PostGIS connection pool"
        );

        // The pool spawns its maintenance task on the ambient runtime.
        let _guard = runtime::shared()?.enter();
        Ok(Self::pool_options(pool_config).connect_lazy_with(options))
    }

    /// `pool_size` connections are kept warm; `max_overflow` more may be
    /// opened under load.
    fn pool_options(pool_config: &PoolConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(pool_config.pool_size)
            .max_connections(pool_config.max_connections())
            .acquire_timeout(pool_config.acquire_timeout())
            .idle_timeout(pool_config.recycle_after())
            .max_lifetime(pool_config.recycle_after())
    }

    async fn insert(&self, pool: &PgPool, record: &RiskAreaRecord) -> Result<()> {
        if self.table_ready.get().is_none() {
            sqlx::query(&self.create_sql).execute(pool).await?;
            let _ = self.table_ready.set(());
        }

        let geometry = serde_json::to_string(&record.geometry_geojson())
            .map_err(|e| IngestError::Persistence(format!("geometry encoding: {e}")))?;

        sqlx::query(&self.insert_sql)
            .bind(record.nome())
            .bind(record.em_risco())
            .bind(record.descricao())
            .bind(record.created_at().naive_utc())
            .bind(geometry)
            .execute(pool)
            .await?;
        Ok(())
    }
}

impl RecordSink for PostGisSink {
    fn append(&self, record: &RiskAreaRecord) -> Result<()> {
        let pool = self.pool()?;
        runtime::block_on(self.insert(pool, record))?
    }

    fn target(&self) -> &str {
        &self.config.target_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Attributes, Feature, FeatureCollection};
    use crate::normalize::normalize;
    use geo::Rect;

    #[test]
    fn test_statements_target_configured_table() {
        let config = IngestConfig {
            target_table: "zona_risco_teste".into(),
            ..IngestConfig::default()
        };
        let sink = PostGisSink::new(&config).unwrap();
        assert!(sink.create_sql.starts_with("CREATE TABLE IF NOT EXISTS zona_risco_teste ("));
        assert!(sink.create_sql.contains("geometry(MultiPolygon, 4326)"));
        assert!(sink.insert_sql.contains("INSERT INTO zona_risco_teste"));
        assert_eq!(sink.target(), "zona_risco_teste");
    }

    #[test]
    fn test_pool_options_follow_config() {
        let pool = PoolConfig {
            pool_size: 4,
            max_overflow: 6,
            acquire_timeout_secs: 12,
            recycle_secs: 90,
        };
        let options = PostGisSink::pool_options(&pool);
        assert_eq!(options.get_min_connections(), 4);
        assert_eq!(options.get_max_connections(), 10);
        assert_eq!(options.get_acquire_timeout(), std::time::Duration::from_secs(12));
        assert_eq!(options.get_max_lifetime(), Some(std::time::Duration::from_secs(90)));
        assert_eq!(options.get_idle_timeout(), Some(std::time::Duration::from_secs(90)));
    }

    #[test]
    fn test_invalid_table_rejected_at_construction() {
        let config = IngestConfig {
            target_table: "zona-risco".into(),
            ..IngestConfig::default()
        };
        assert!(matches!(PostGisSink::new(&config), Err(IngestError::Config(_))));
    }

    #[test]
    fn test_missing_connection_string_fails_at_write_time() {
        let sink = PostGisSink::new(&IngestConfig::default()).unwrap();
        let fc = FeatureCollection::new(vec![Feature::new(
            Some(Rect::new((0.0, 0.0), (1.0, 1.0)).to_polygon().into()),
            Attributes::new(),
        )]);
        let record = normalize(&fc).unwrap();

        let err = sink.append(&record).unwrap_err();
        assert!(matches!(err, IngestError::Persistence(_)), "{err:?}");
    }
}
