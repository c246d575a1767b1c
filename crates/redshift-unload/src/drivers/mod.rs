//! Concrete warehouse connections.
//!
//! - [`redshift`]: Amazon Redshift via tokio-postgres and deadpool-postgres

pub mod redshift;

pub use redshift::{HealthCheckResult, RedshiftConnection, RedshiftPool, SslMode};
