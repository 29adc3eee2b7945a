//! Durable translation cache.
//!
//! A content-addressed SQLite table that exists purely to avoid repeated
//! calls into the external translation model. Keys are the exact
//! (source text, source language, model identifier) triple: no
//! normalization, no case folding. Rows are append-only: never updated,
//! never evicted. Unbounded growth is an accepted tradeoff for the expected
//! volumes.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// Cache key: exact string equality on all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey<'a> {
    pub source_text: &'a str,
    pub source_language: &'a str,
    pub model: &'a str,
}

/// SQLite-backed translation cache, shared across a whole run.
#[derive(Clone)]
pub struct TranslationCache {
    conn: Arc<Mutex<Connection>>,
}

impl TranslationCache {
    /// Open (or create) the cache database at `path`.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open translation cache at {}", path))?;
        Self::from_connection(conn)
    }

    /// In-memory cache, for tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory cache")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                src_text TEXT NOT NULL,
                src_lang TEXT NOT NULL,
                model TEXT NOT NULL,
                translation TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create translations table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Point lookup for `key`.
    ///
    /// The table carries no uniqueness constraint, so duplicate keys can
    /// exist; the most recent write wins.
    pub fn lookup(&self, key: &CacheKey) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT translation FROM translations
             WHERE src_text = ?1 AND src_lang = ?2 AND model = ?3
             ORDER BY id DESC LIMIT 1",
            params![key.source_text, key.source_language, key.model],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to query translation cache")
    }

    /// Append a new entry unconditionally, even if an identical key exists.
    pub fn store(&self, key: &CacheKey, translation: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO translations (src_text, src_lang, model, translation, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                key.source_text,
                key.source_language,
                key.model,
                translation,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("Failed to store translation in cache")?;
        Ok(())
    }

    /// Total number of cached rows (duplicates included).
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True when the cache holds no rows.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
