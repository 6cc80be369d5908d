//! FTS5 full-text index on a background worker thread.
//!
//! The store pushes item changes through [`SearchSink`] without waiting;
//! commands travel over a channel to a single worker that owns the SQLite
//! connection, so they are applied in submission order. Queries ride the same
//! channel and get their answer on a reply channel, which means a query sees
//! every change submitted before it.
//!
//! # Column Weights (BM25)
//!
//! | Column      | Weight |
//! |-------------|--------|
//! | title       | 3.0    |
//! | description | 2.0    |
//! | tags        | 1.0    |
//! | comments    | 1.0    |
//!
//! # Tokenizer
//!
//! Porter stemmer over `unicode61`, with prefix indexes on 2 and 3
//! characters.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use scope42_core::error::ErrorCode;
use scope42_core::model::item::{Details, Item};
use scope42_core::search::SearchSink;
use scope42_core::ItemId;
use serde::Serialize;
use tracing::{debug, warn};

pub const BM25_WEIGHT_TITLE: f64 = 3.0;
pub const BM25_WEIGHT_DESCRIPTION: f64 = 2.0;
pub const BM25_WEIGHT_TAGS: f64 = 1.0;
pub const BM25_WEIGHT_COMMENTS: f64 = 1.0;

const SCHEMA: &str = "
CREATE VIRTUAL TABLE IF NOT EXISTS items_fts USING fts5(
    title,
    description,
    tags,
    comments,
    item_id UNINDEXED,
    tokenize='porter unicode61',
    prefix='2 3'
);";

/// One ranked search result. Lower `rank` is a better match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: ItemId,
    pub title: String,
    pub rank: f64,
}

/// Text of one item as it is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexDoc {
    id: String,
    title: String,
    description: String,
    tags: String,
    comments: String,
}

impl From<&Item> for IndexDoc {
    fn from(item: &Item) -> Self {
        let mut description = item.description.clone().unwrap_or_default();
        if let Details::Decision(decision) = &item.details {
            for text in [&decision.context, &decision.decision].into_iter().flatten() {
                description.push('\n');
                description.push_str(text);
            }
        }
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            description,
            tags: item.tags.join(" "),
            comments: item
                .comments
                .iter()
                .map(|c| c.content.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

enum Command {
    Upsert(IndexDoc),
    Reset,
    Search {
        query: String,
        limit: u32,
        reply: Sender<Result<Vec<SearchHit>>>,
    },
    Count {
        reply: Sender<Result<u64>>,
    },
}

/// Handle to the search worker.
///
/// Clones share one worker; it stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    tx: Sender<Command>,
}

impl SearchIndex {
    /// Start a worker with a fresh in-memory index.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot create the FTS5 table or the worker
    /// thread cannot be spawned.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory search database")?;
        conn.execute_batch(SCHEMA).context("create FTS5 search table")?;

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("scope42-search".into())
            .spawn(move || run_worker(&conn, &rx))
            .context("spawn search worker")?;
        Ok(Self { tx })
    }

    /// Search titles, descriptions, tags and comments.
    ///
    /// `query` is free text; see [`crate::query::fts_query`].
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped or SQLite rejects the query.
    pub fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>> {
        let Some(query) = crate::query::fts_query(query) else {
            return Ok(Vec::new());
        };
        let (reply, answer) = mpsc::channel();
        self.send(Command::Search {
            query,
            limit,
            reply,
        })?;
        answer.recv().map_err(|_| worker_gone())?
    }

    /// Number of indexed items.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped or the count query fails.
    pub fn indexed_count(&self) -> Result<u64> {
        let (reply, answer) = mpsc::channel();
        self.send(Command::Count { reply })?;
        answer.recv().map_err(|_| worker_gone())?
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| worker_gone())
    }

    fn submit(&self, command: Command) {
        if self.send(command).is_err() {
            warn!("search worker has stopped; dropping index update");
        }
    }
}

impl SearchSink for SearchIndex {
    fn add(&self, item: &Item) {
        self.submit(Command::Upsert(IndexDoc::from(item)));
    }

    fn update(&self, item: &Item) {
        self.submit(Command::Upsert(IndexDoc::from(item)));
    }

    fn reset(&self) {
        self.submit(Command::Reset);
    }
}

fn worker_gone() -> anyhow::Error {
    anyhow!(
        "{}: search worker has stopped",
        ErrorCode::SearchIndexUnavailable.code()
    )
}

fn run_worker(conn: &Connection, rx: &Receiver<Command>) {
    while let Ok(command) = rx.recv() {
        match command {
            Command::Upsert(doc) => {
                if let Err(err) = upsert(conn, &doc) {
                    warn!(id = %doc.id, error = %err, "failed to index item");
                }
            }
            Command::Reset => {
                if let Err(err) = conn.execute("DELETE FROM items_fts", []) {
                    warn!(error = %err, "failed to reset search index");
                }
            }
            Command::Search {
                query,
                limit,
                reply,
            } => {
                let _ = reply.send(search_bm25(conn, &query, limit));
            }
            Command::Count { reply } => {
                let _ = reply.send(row_count(conn));
            }
        }
    }
    debug!("search worker stopped");
}

fn upsert(conn: &Connection, doc: &IndexDoc) -> Result<()> {
    conn.execute("DELETE FROM items_fts WHERE item_id = ?1", params![doc.id])
        .context("remove previous index entry")?;
    conn.execute(
        "INSERT INTO items_fts(title, description, tags, comments, item_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![doc.title, doc.description, doc.tags, doc.comments, doc.id],
    )
    .context("insert index entry")?;
    Ok(())
}

fn search_bm25(conn: &Connection, query: &str, limit: u32) -> Result<Vec<SearchHit>> {
    let sql = "SELECT item_id, title, bm25(items_fts, ?1, ?2, ?3, ?4) AS rank \
               FROM items_fts \
               WHERE items_fts MATCH ?5 \
               ORDER BY rank \
               LIMIT ?6";

    let mut stmt = conn.prepare(sql).context("prepare FTS5 BM25 search query")?;
    let rows = stmt
        .query_map(
            params![
                BM25_WEIGHT_TITLE,
                BM25_WEIGHT_DESCRIPTION,
                BM25_WEIGHT_TAGS,
                BM25_WEIGHT_COMMENTS,
                query,
                limit,
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            },
        )
        .with_context(|| format!("execute FTS5 search for '{query}'"))?;

    let mut hits = Vec::new();
    for row in rows {
        let (id, title, rank) = row.context("read FTS5 search hit")?;
        let id = id
            .parse()
            .with_context(|| format!("indexed item id '{id}' is invalid"))?;
        hits.push(SearchHit { id, title, rank });
    }
    Ok(hits)
}

fn row_count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM items_fts", [], |row| row.get(0))
        .context("count FTS5 rows")?;
    Ok(u64::try_from(count).unwrap_or(0))
}
