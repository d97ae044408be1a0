use crate::storage::{FlowRecord, PersistencePort, TaskRecord};
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use std::error::Error;

pub struct SqliteStorage {
    pub pool: Pool<Sqlite>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// A private in-memory database. Pinned to one connection, since every
    /// sqlite connection opens its own `:memory:` database.
    pub async fn in_memory() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl PersistencePort for SqliteStorage {
    async fn init(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS flows (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                flow_id TEXT NOT NULL REFERENCES flows(id),
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert(&self, record: &TaskRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO flows (id, name) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(record.flow.id.as_str())
        .bind(record.flow.name.as_str())
        .execute(&mut tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO tasks (id, name, flow_id) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                flow_id = excluded.flow_id,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.name.as_str())
        .bind(record.flow.id.as_str())
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<TaskRecord, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.name, f.id, f.name
            FROM tasks t
            JOIN flows f ON f.id = t.flow_id
            WHERE t.id = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| format!("task record '{}' not found", key))?;

        Ok(TaskRecord {
            id: row.get(0),
            name: row.get(1),
            flow: FlowRecord {
                id: row.get(2),
                name: row.get(3),
            },
        })
    }
}
