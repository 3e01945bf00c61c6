use crate::types::{AppError, FeedbackRecord, Result};
use libsql::{Builder, Connection, Database};

/// Local SQLite store for user feedback on answers.
///
/// The schema is created on first use. Timestamps are assigned by
/// SQLite (`CURRENT_TIMESTAMP`) at insert time.
pub struct FeedbackStore {
    db: Database,
}

impl FeedbackStore {
    /// Open (or create) the feedback database at the given path.
    ///
    /// `":memory:"` opens a non-persistent database, which the tests use.
    pub async fn new(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!("Failed to create database dir: {}", e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open feedback database: {}", e)))?;

        let store = Self { db };
        store.initialize_schema().await?;

        Ok(store)
    }

    pub fn connection(&self) -> Result<Connection> {
        self.db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS feedbacks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT,
                response TEXT,
                feedback TEXT,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create feedbacks table: {}", e)))?;

        Ok(())
    }

    /// Insert one feedback row and return its rowid.
    pub async fn insert(&self, question: &str, response: &str, feedback: &str) -> Result<i64> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO feedbacks (question, response, feedback) VALUES (?, ?, ?)",
            (question, response, feedback),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert feedback: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    /// List the most recent feedback rows, newest first.
    pub async fn list(&self, limit: usize) -> Result<Vec<FeedbackRecord>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, question, response, feedback, timestamp
                 FROM feedbacks ORDER BY id DESC LIMIT ?",
                [limit as i64],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query feedbacks: {}", e)))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            records.push(FeedbackRecord {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                question: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                response: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                feedback: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                timestamp: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            });
        }

        Ok(records)
    }

    /// Count stored feedback rows.
    pub async fn count(&self) -> Result<i64> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT COUNT(*) FROM feedbacks", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count feedbacks: {}", e)))?;

        let row = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::Database("COUNT returned no rows".to_string()))?;

        row.get(0).map_err(|e| AppError::Database(e.to_string()))
    }
}
