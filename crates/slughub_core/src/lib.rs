//! Core domain logic for SlugHub.
//! This crate is the single source of truth for schedule navigation,
//! routing, and forum feed invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod route;
pub mod schedule;
pub mod service;
pub mod sync;

pub use config::{ConfigError, CoreConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::event::{EventId, EventValidationError, RecurringEvent, StartTime, WeekdayTag};
pub use model::feed::{ChannelId, FeedDraft, FeedEntry, FeedValidationError, FeedWatermark};
pub use model::session::{Session, SessionError, UserId};
pub use repo::event_repo::{ScheduleRepository, SqliteScheduleRepository};
pub use repo::feed_repo::{FeedStore, SqliteFeedStore};
pub use repo::{RepoError, RepoResult};
pub use route::bridge::{RenderSurface, RouteBridge, RouteDispatch};
pub use route::command::{RouteCommand, TravelMode};
pub use schedule::cursor::{NavigationCursor, Step};
pub use schedule::resolver::{resolve_upcoming, Occurrence, Resolution};
pub use service::schedule_service::{NewEventRequest, ScheduleService};
pub use sync::feed_sync::{
    FetchKind, FetchTicket, IncrementalFeedSync, Published, SyncError, SyncOutcome, SyncResult,
};
pub use sync::ticker::PollTicker;
