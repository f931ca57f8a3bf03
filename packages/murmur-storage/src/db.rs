use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

/// Serializes concurrent bootstraps from several API replicas.
const SCHEMA_LOCK_KEY: i64 = 0x6d75_726d;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &murmur_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.connect(cfg.dsn.as_str())
			.await?;

		Ok(Self { pool })
	}

	/// Applies every `CREATE ... IF NOT EXISTS` statement under a transaction-scoped advisory lock.
	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(SCHEMA_LOCK_KEY)
			.execute(&mut *tx)
			.await?;

		for statement in schema::statements(&sql) {
			sqlx::query(statement).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
