//! Forum feed store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist forum posts per channel with store-assigned ordering keys.
//! - Serve full-history and after-watermark reads in ascending order.
//!
//! # Invariants
//! - `seq` increases with insertion order across the whole store.
//! - `posted_at` never decreases within a channel, even if the wall clock
//!   steps backwards, so watermark reads cannot skip new posts.
//! - Reads are ordered by `(posted_at, seq)` ascending.

use crate::db::require_table;
use crate::model::feed::{ChannelId, FeedDraft, FeedEntry, FeedWatermark};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    seq,
    channel,
    author,
    body,
    posted_at
FROM feed_entries";

/// Remote feed store consumed by incremental sync.
pub trait FeedStore {
    /// Returns every entry of `channel`, oldest first.
    fn fetch_all(&self, channel: &ChannelId) -> RepoResult<Vec<FeedEntry>>;
    /// Returns entries of `channel` strictly after `after`, oldest first.
    fn fetch_after(&self, channel: &ChannelId, after: FeedWatermark)
        -> RepoResult<Vec<FeedEntry>>;
    /// Inserts a post, assigning `seq` and `posted_at`.
    fn insert_entry(&self, channel: &ChannelId, draft: &FeedDraft) -> RepoResult<FeedEntry>;
}

impl<T: FeedStore + ?Sized> FeedStore for &T {
    fn fetch_all(&self, channel: &ChannelId) -> RepoResult<Vec<FeedEntry>> {
        (**self).fetch_all(channel)
    }

    fn fetch_after(
        &self,
        channel: &ChannelId,
        after: FeedWatermark,
    ) -> RepoResult<Vec<FeedEntry>> {
        (**self).fetch_after(channel, after)
    }

    fn insert_entry(&self, channel: &ChannelId, draft: &FeedDraft) -> RepoResult<FeedEntry> {
        (**self).insert_entry(channel, draft)
    }
}

/// SQLite-backed feed store.
pub struct SqliteFeedStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFeedStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        require_table(conn, "feed_entries")?;
        Ok(Self { conn })
    }
}

impl FeedStore for SqliteFeedStore<'_> {
    fn fetch_all(&self, channel: &ChannelId) -> RepoResult<Vec<FeedEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE channel = ?1
             ORDER BY posted_at ASC, seq ASC;"
        ))?;
        let mut rows = stmt.query([channel.as_str()])?;
        collect_entries(&mut rows)
    }

    fn fetch_after(
        &self,
        channel: &ChannelId,
        after: FeedWatermark,
    ) -> RepoResult<Vec<FeedEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE channel = ?1
               AND (posted_at > ?2 OR (posted_at = ?2 AND seq > ?3))
             ORDER BY posted_at ASC, seq ASC;"
        ))?;
        let mut rows = stmt.query(params![channel.as_str(), after.posted_at_ms, after.seq])?;
        collect_entries(&mut rows)
    }

    fn insert_entry(&self, channel: &ChannelId, draft: &FeedDraft) -> RepoResult<FeedEntry> {
        draft.validate()?;

        let entry = self.conn.query_row(
            "INSERT INTO feed_entries (channel, author, body, posted_at)
             VALUES (
                ?1,
                ?2,
                ?3,
                MAX(
                    CAST(ROUND((julianday('now') - 2440587.5) * 86400000.0) AS INTEGER),
                    COALESCE((SELECT MAX(posted_at) FROM feed_entries WHERE channel = ?1), 0)
                )
             )
             RETURNING seq, channel, author, body, posted_at;",
            params![channel.as_str(), draft.author.trim(), draft.body.trim()],
            |row| Ok(parse_entry_row(row)),
        )??;

        Ok(entry)
    }
}

fn collect_entries(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<FeedEntry>> {
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        entries.push(parse_entry_row(row)?);
    }
    Ok(entries)
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<FeedEntry> {
    let channel_text: String = row.get("channel")?;
    Ok(FeedEntry {
        seq: row.get("seq")?,
        channel: ChannelId::new(channel_text)?,
        author: row.get("author")?,
        body: row.get("body")?,
        posted_at_ms: row.get("posted_at")?,
    })
}
