//! SQLite export
//!
//! Writes the finished graph to a standalone database: one row per page, one
//! row per link, and an `export` row describing the run.

use crate::output::style::StyledGraph;
use crate::output::traits::{OutputResult, Renderer, RunMetadata};
use crate::url::{extract_domain, CanonicalUrl};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the exported database
pub const SCHEMA_SQL: &str = r#"
-- The crawl run this database was exported from
CREATE TABLE IF NOT EXISTS export (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    root_url TEXT NOT NULL,
    max_depth INTEGER NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    exported_at TEXT NOT NULL,
    requests INTEGER NOT NULL,
    budget_exhausted INTEGER NOT NULL,
    config_hash TEXT
);

-- One row per graph node; id is the node index
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY,
    url TEXT NOT NULL UNIQUE,
    host TEXT,
    depth INTEGER NOT NULL,
    state TEXT NOT NULL,
    degree INTEGER NOT NULL,
    is_root INTEGER NOT NULL DEFAULT 0,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_pages_host ON pages(host);
CREATE INDEX IF NOT EXISTS idx_pages_state ON pages(state);

-- Directed links between pages
CREATE TABLE IF NOT EXISTS links (
    from_page_id INTEGER NOT NULL REFERENCES pages(id),
    to_page_id INTEGER NOT NULL REFERENCES pages(id),
    PRIMARY KEY (from_page_id, to_page_id)
);

CREATE INDEX IF NOT EXISTS idx_links_to ON links(to_page_id);
"#;

/// Writes `<stem>.db`, replacing any existing database at that path
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteRenderer;

impl Renderer for SqliteRenderer {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn render(&self, graph: &StyledGraph, meta: &RunMetadata, path: &Path) -> OutputResult<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        let mut conn = Connection::open(path)?;
        write_graph(&mut conn, graph, meta)
    }
}

/// Creates the schema on `conn` and inserts the graph in one transaction
pub fn write_graph(conn: &mut Connection, graph: &StyledGraph, meta: &RunMetadata) -> OutputResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA_SQL)?;

    let tx = conn.transaction()?;

    tx.execute(
        "INSERT OR REPLACE INTO export (id, root_url, max_depth, started_at, finished_at, exported_at, requests, budget_exhausted, config_hash)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            meta.root_url,
            meta.max_depth,
            meta.started_at.to_rfc3339(),
            meta.finished_at.to_rfc3339(),
            Utc::now().to_rfc3339(),
            meta.requests as i64,
            meta.budget_exhausted,
            meta.config_hash,
        ],
    )?;

    {
        let mut insert_page = tx.prepare(
            "INSERT INTO pages (id, url, host, depth, state, degree, is_root, error_message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        for node in &graph.nodes {
            let host = CanonicalUrl::parse(&node.url)
                .ok()
                .and_then(|url| extract_domain(&url));

            insert_page.execute(params![
                node.index as i64,
                node.url,
                host,
                node.depth,
                node.state.as_str(),
                node.degree as i64,
                node.index == graph.root,
                node.error,
            ])?;
        }

        let mut insert_link =
            tx.prepare("INSERT OR IGNORE INTO links (from_page_id, to_page_id) VALUES (?1, ?2)")?;

        for edge in &graph.edges {
            insert_link.execute(params![edge.from as i64, edge.to as i64])?;
        }
    }

    tx.commit()?;

    tracing::debug!(
        "Wrote {} pages and {} links to SQLite",
        graph.nodes.len(),
        graph.edges.len()
    );

    Ok(())
}
