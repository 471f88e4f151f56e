//! Incremental polling sync for one forum channel.
//!
//! # Responsibility
//! - Keep an append-only local view of the selected channel.
//! - Fetch only entries past the watermark on each poll.
//!
//! # Invariants
//! - The view is ordered by `(posted_at_ms, seq)` and holds no duplicates;
//!   incoming entries at or below the watermark are dropped.
//! - At most one fetch is outstanding (single-flight); `begin_poll` yields
//!   no ticket while one is.
//! - Every channel switch bumps the generation; a completion carrying an
//!   older generation is discarded without touching state.
//! - Selecting a channel that has not loaded yet always issues a fresh full
//!   load, so a lost ticket cannot stall the channel.
//! - A failed fetch leaves the view and watermark unchanged.
//! - A stored post is reported as published even if the follow-up refresh
//!   fails.

use crate::model::feed::{ChannelId, FeedDraft, FeedEntry, FeedWatermark};
use crate::model::session::Session;
use crate::repo::feed_repo::FeedStore;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// What a fetch ticket asks the store for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Whole channel history.
    Full,
    /// Entries strictly after the watermark.
    After(FeedWatermark),
}

/// Handle for one outstanding fetch.
///
/// Produced by `switch_channel`/`begin_poll`, consumed by `complete_fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    channel: ChannelId,
    kind: FetchKind,
}

impl FetchTicket {
    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    /// Runs the fetch this ticket describes.
    pub fn fetch(&self, store: &impl FeedStore) -> RepoResult<Vec<FeedEntry>> {
        match self.kind {
            FetchKind::Full => store.fetch_all(&self.channel),
            FetchKind::After(watermark) => store.fetch_after(&self.channel, watermark),
        }
    }
}

/// Non-error result of a sync operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No channel selected; nothing to do.
    Idle,
    /// A fetch is already outstanding; this tick was skipped.
    Skipped,
    /// Channel already selected and loaded.
    Unchanged,
    /// Initial history load completed.
    Loaded { count: usize },
    /// Incremental fetch completed (`count` may be 0).
    Appended { count: usize },
    /// Completion belonged to a superseded selection and was dropped.
    Discarded,
}

/// Receipt for a stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// The entry as stored, with its assigned `seq` and timestamp.
    pub entry: FeedEntry,
    /// Whether the follow-up refresh brought the entry into the view.
    pub visible: bool,
}

/// Sync errors surfaced to callers.
#[derive(Debug)]
pub enum SyncError {
    NoChannelSelected,
    Fetch { channel: ChannelId, source: RepoError },
    Publish { channel: ChannelId, source: RepoError },
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoChannelSelected => write!(f, "no feed channel selected"),
            Self::Fetch { channel, source } => {
                write!(f, "fetching channel `{channel}` failed: {source}")
            }
            Self::Publish { channel, source } => {
                write!(f, "publishing to channel `{channel}` failed: {source}")
            }
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoChannelSelected => None,
            Self::Fetch { source, .. } | Self::Publish { source, .. } => Some(source),
        }
    }
}

/// Local view of one feed channel kept current by polling.
#[derive(Debug, Default)]
pub struct IncrementalFeedSync {
    channel: Option<ChannelId>,
    generation: u64,
    watermark: Option<FeedWatermark>,
    view: Vec<FeedEntry>,
    in_flight: Option<u64>,
    loaded: bool,
}

impl IncrementalFeedSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self) -> Option<&ChannelId> {
        self.channel.as_ref()
    }

    pub fn watermark(&self) -> Option<FeedWatermark> {
        self.watermark
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.view
    }

    /// Whether the current channel's initial history load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_fetch_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Selects `channel` and loads its full history.
    pub fn select_channel(
        &mut self,
        store: &impl FeedStore,
        channel: ChannelId,
    ) -> SyncResult<SyncOutcome> {
        match self.switch_channel(channel) {
            Some(ticket) => {
                let result = ticket.fetch(store);
                self.complete_fetch(&ticket, result)
            }
            None => Ok(SyncOutcome::Unchanged),
        }
    }

    /// Fetches entries newer than the watermark and appends them.
    pub fn poll(&mut self, store: &impl FeedStore) -> SyncResult<SyncOutcome> {
        if self.channel.is_none() {
            return Ok(SyncOutcome::Idle);
        }
        match self.begin_poll() {
            Some(ticket) => {
                let result = ticket.fetch(store);
                self.complete_fetch(&ticket, result)
            }
            None => Ok(SyncOutcome::Skipped),
        }
    }

    /// Stores a post authored by the session user, then polls so the post
    /// shows up in the view right away.
    ///
    /// Only a failed insert is an error. A failed or skipped refresh is
    /// logged and reported through `Published::visible`; the next poll picks
    /// the post up.
    pub fn publish(
        &mut self,
        store: &impl FeedStore,
        session: &Session,
        body: &str,
    ) -> SyncResult<Published> {
        let channel = self.channel.clone().ok_or(SyncError::NoChannelSelected)?;
        let draft = FeedDraft::new(session.user.as_str(), body).map_err(|err| {
            SyncError::Publish {
                channel: channel.clone(),
                source: err.into(),
            }
        })?;

        let entry = store
            .insert_entry(&channel, &draft)
            .map_err(|source| SyncError::Publish {
                channel: channel.clone(),
                source,
            })?;
        info!(
            "event=feed_publish module=sync status=ok channel={} seq={}",
            channel, entry.seq
        );

        if let Err(err) = self.poll(store) {
            warn!(
                "event=feed_publish_refresh module=sync status=error channel={} seq={} error={}",
                channel, entry.seq, err
            );
        }
        let visible = self.view.iter().any(|seen| seen.seq == entry.seq);
        Ok(Published { entry, visible })
    }

    /// Switches the selection and returns the full-load ticket.
    ///
    /// Clears the view and watermark and invalidates any outstanding ticket.
    /// Returns `None` only when `channel` is already selected and loaded;
    /// reselecting a channel that is still loading reissues the full load.
    pub fn switch_channel(&mut self, channel: ChannelId) -> Option<FetchTicket> {
        if self.loaded && self.channel.as_ref() == Some(&channel) {
            return None;
        }

        self.generation += 1;
        self.view.clear();
        self.watermark = None;
        self.loaded = false;
        self.in_flight = Some(self.generation);
        self.channel = Some(channel.clone());
        debug!(
            "event=feed_select module=sync status=start channel={} generation={}",
            channel, self.generation
        );

        Some(FetchTicket {
            generation: self.generation,
            channel,
            kind: FetchKind::Full,
        })
    }

    /// Starts a poll, or returns `None` when no channel is selected or a
    /// fetch is already outstanding.
    ///
    /// Until the initial load succeeds, polls retry the full load.
    pub fn begin_poll(&mut self) -> Option<FetchTicket> {
        let channel = self.channel.clone()?;
        if self.in_flight.is_some() {
            debug!("event=feed_poll module=sync status=skip reason=in_flight channel={channel}");
            return None;
        }

        let kind = match (self.loaded, self.watermark) {
            (true, Some(watermark)) => FetchKind::After(watermark),
            _ => FetchKind::Full,
        };
        self.in_flight = Some(self.generation);
        Some(FetchTicket {
            generation: self.generation,
            channel,
            kind,
        })
    }

    /// Releases `ticket` without a result, e.g. when its fetch was cancelled.
    ///
    /// Returns `false` for a superseded ticket, which holds nothing.
    pub fn abandon_fetch(&mut self, ticket: &FetchTicket) -> bool {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.generation) {
            return false;
        }
        self.in_flight = None;
        debug!(
            "event=feed_fetch module=sync status=abandoned channel={} kind={:?}",
            ticket.channel, ticket.kind
        );
        true
    }

    /// Applies the result of a ticket's fetch.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: RepoResult<Vec<FeedEntry>>,
    ) -> SyncResult<SyncOutcome> {
        if ticket.generation != self.generation {
            debug!(
                "event=feed_fetch module=sync status=discarded channel={} generation={} current_generation={}",
                ticket.channel, ticket.generation, self.generation
            );
            return Ok(SyncOutcome::Discarded);
        }
        self.in_flight = None;

        let entries = match result {
            Ok(entries) => entries,
            Err(source) => {
                warn!(
                    "event=feed_fetch module=sync status=error channel={} kind={:?} error={}",
                    ticket.channel, ticket.kind, source
                );
                return Err(SyncError::Fetch {
                    channel: ticket.channel.clone(),
                    source,
                });
            }
        };

        let count = self.append_newer(entries);
        let outcome = if self.loaded {
            SyncOutcome::Appended { count }
        } else {
            self.loaded = true;
            SyncOutcome::Loaded { count }
        };
        debug!(
            "event=feed_fetch module=sync status=ok channel={} appended={} view_len={}",
            ticket.channel,
            count,
            self.view.len()
        );
        Ok(outcome)
    }

    fn append_newer(&mut self, entries: Vec<FeedEntry>) -> usize {
        let mut appended = 0;
        for entry in entries {
            let mark = entry.watermark();
            if self.watermark.is_some_and(|current| mark <= current) {
                continue;
            }
            self.watermark = Some(mark);
            self.view.push(entry);
            appended += 1;
        }
        appended
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchKind, IncrementalFeedSync, SyncOutcome};
    use crate::model::feed::ChannelId;

    #[test]
    fn begin_poll_without_channel_yields_no_ticket() {
        let mut sync = IncrementalFeedSync::new();
        assert!(sync.begin_poll().is_none());
        assert!(!sync.is_fetch_in_flight());
    }

    #[test]
    fn reselecting_a_loading_channel_supersedes_the_first_ticket() {
        let mut sync = IncrementalFeedSync::new();
        let channel = ChannelId::new("CSE101").expect("valid channel");

        let first = sync
            .switch_channel(channel.clone())
            .expect("first selection issues a ticket");
        assert_eq!(first.kind(), FetchKind::Full);
        let second = sync
            .switch_channel(channel)
            .expect("unloaded channel reissues its load");
        assert_eq!(second.kind(), FetchKind::Full);
        assert!(sync.begin_poll().is_none());

        assert_eq!(
            sync.complete_fetch(&first, Ok(Vec::new()))
                .expect("stale completion is not an error"),
            SyncOutcome::Discarded
        );
        assert!(sync.is_fetch_in_flight());
        assert_eq!(
            sync.complete_fetch(&second, Ok(Vec::new()))
                .expect("current completion applies"),
            SyncOutcome::Loaded { count: 0 }
        );
        assert!(sync.is_loaded());
    }

    #[test]
    fn abandoning_only_releases_the_current_ticket() {
        let mut sync = IncrementalFeedSync::new();
        let channel = ChannelId::new("CSE101").expect("valid channel");

        let stale = sync.switch_channel(channel.clone()).expect("ticket");
        let current = sync.switch_channel(channel).expect("ticket");
        assert!(!sync.abandon_fetch(&stale));
        assert!(sync.is_fetch_in_flight());

        assert!(sync.abandon_fetch(&current));
        assert!(!sync.is_fetch_in_flight());
        assert!(!sync.abandon_fetch(&current));
        assert!(sync.begin_poll().is_some());
    }
}
