//! Redshift over the PostgreSQL wire protocol.
//!
//! [`RedshiftPool`] wraps a deadpool-postgres pool; each [`RedshiftConnection`]
//! it hands out is one session implementing [`WarehouseConnection`].

mod tls;

pub use tls::SslMode;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use serde::{Deserialize, Serialize};
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::Config as PgConfig;
use tracing::{debug, info, warn};

use crate::config::WarehouseConfig;
use crate::core::schema::Row;
use crate::core::traits::WarehouseConnection;
use crate::error::{Result, UnloadError};

/// Connection pool for a Redshift cluster.
#[derive(Clone)]
pub struct RedshiftPool {
    pool: Pool,
    endpoint: String,
}

impl RedshiftPool {
    /// Build the pool and check that a session can be opened.
    pub async fn connect(config: &WarehouseConfig) -> Result<Self> {
        let mut pg_config = PgConfig::new();
        pg_config.host(&config.host);
        pg_config.port(config.port);
        pg_config.dbname(&config.database);
        pg_config.user(&config.user);
        pg_config.password(&config.password);
        pg_config.application_name("redshift-unload");
        if let Some(secs) = config.connect_timeout_secs {
            pg_config.connect_timeout(Duration::from_secs(secs));
        }

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let mgr = match config.ssl_mode.connector()? {
            Some(tls) => Manager::from_config(pg_config, tls, mgr_config),
            None => {
                warn!("Redshift TLS is disabled. Credentials will be transmitted in plaintext.");
                Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config)
            }
        };

        let pool = Pool::builder(mgr)
            .max_size(config.pool_size)
            .build()
            .map_err(|e| UnloadError::pool(e, "creating Redshift pool"))?;

        let endpoint = format!("{}:{}/{}", config.host, config.port, config.database);
        let redshift = Self { pool, endpoint };

        let conn = redshift.get().await?;
        conn.execute("SELECT 1").await?;
        info!("Connected to Redshift: {}", redshift.endpoint);

        Ok(redshift)
    }

    /// Check out one session.
    pub async fn get(&self) -> Result<RedshiftConnection> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| UnloadError::pool(e, format!("getting connection to {}", self.endpoint)))?;
        Ok(RedshiftConnection { client })
    }

    /// Round-trip a trivial query and report latency.
    pub async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let outcome = match self.get().await {
            Ok(conn) => conn.execute("SELECT 1").await,
            Err(e) => Err(e),
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => HealthCheckResult {
                endpoint: self.endpoint.clone(),
                connected: true,
                latency_ms,
                error: None,
            },
            Err(e) => HealthCheckResult {
                endpoint: self.endpoint.clone(),
                connected: false,
                latency_ms,
                error: Some(e.to_string()),
            },
        }
    }

    /// Close the pool; checked-out sessions finish their current call.
    pub fn close(&self) {
        self.pool.close();
    }
}

/// Outcome of [`RedshiftPool::health_check`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub endpoint: String,
    pub connected: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
}

/// One Redshift session.
pub struct RedshiftConnection {
    client: Object,
}

#[async_trait]
impl WarehouseConnection for RedshiftConnection {
    async fn execute(&self, sql: &str) -> Result<()> {
        // Simple query protocol: UNLOAD cannot be prepared.
        self.client.batch_execute(sql).await?;
        Ok(())
    }

    async fn query(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        let rows = self.client.query(sql, &params).await?;
        debug!("Query returned {} rows", rows.len());
        rows.iter().map(row_to_text).collect()
    }
}

/// Render every non-NULL value of a row as text, booleans as `t`/`f`.
fn row_to_text(row: &tokio_postgres::Row) -> Result<Row> {
    let mut out = Row::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let ty = column.type_();
        let value = if *ty == Type::BOOL {
            row.try_get::<_, Option<bool>>(idx)?
                .map(|b| if b { "t" } else { "f" }.to_string())
        } else if *ty == Type::INT2 {
            row.try_get::<_, Option<i16>>(idx)?.map(|v| v.to_string())
        } else if *ty == Type::INT4 {
            row.try_get::<_, Option<i32>>(idx)?.map(|v| v.to_string())
        } else if *ty == Type::INT8 {
            row.try_get::<_, Option<i64>>(idx)?.map(|v| v.to_string())
        } else if *ty == Type::CHAR {
            row.try_get::<_, Option<i8>>(idx)?
                .map(|v| (v as u8 as char).to_string())
        } else {
            row.try_get::<_, Option<String>>(idx)?
        };
        if let Some(value) = value {
            out.insert(column.name().to_string(), value);
        }
    }
    Ok(out)
}
