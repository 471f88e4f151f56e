use super::{CliResult, Context};
use clap::Subcommand;
use slughub_core::{
    ChannelId, FeedEntry, IncrementalFeedSync, PollTicker, SqliteFeedStore, SyncOutcome,
};
use std::time::Instant;

#[derive(Subcommand)]
pub enum ForumAction {
    /// Post a message to a channel
    Post {
        /// Channel name, usually a course code
        #[arg(long)]
        channel: String,

        #[arg(long)]
        body: String,
    },
    /// Print a channel, then keep polling for new posts
    Read {
        #[arg(long)]
        channel: String,

        /// Number of polls after the initial load
        #[arg(long, default_value_t = 0)]
        polls: u32,
    },
}

pub fn run(action: ForumAction, ctx: &Context) -> CliResult {
    let store = SqliteFeedStore::try_new(&ctx.conn)?;
    let mut sync = IncrementalFeedSync::new();

    match action {
        ForumAction::Post { channel, body } => {
            let session = ctx.session()?;
            sync.select_channel(&store, ChannelId::new(channel)?)?;
            let published = sync.publish(&store, &session, &body)?;
            print_entry(&published.entry);
            if !published.visible {
                eprintln!("note: post stored but the channel could not be refreshed");
            }
        }
        ForumAction::Read { channel, polls } => {
            sync.select_channel(&store, ChannelId::new(channel)?)?;
            sync.entries().iter().for_each(print_entry);

            let mut ticker = PollTicker::new(ctx.config.poll_interval);
            // The initial load counts as the first tick.
            ticker.is_due(Instant::now());
            let mut remaining = polls;
            while remaining > 0 {
                let now = Instant::now();
                if !ticker.is_due(now) {
                    std::thread::sleep(ticker.remaining(now));
                    continue;
                }
                remaining -= 1;
                let seen = sync.entries().len();
                match sync.poll(&store) {
                    Ok(SyncOutcome::Appended { count }) if count > 0 => {
                        sync.entries()[seen..].iter().for_each(print_entry);
                    }
                    Ok(_) => {}
                    // Retried on the next tick.
                    Err(err) => eprintln!("warning: {err}"),
                }
            }
        }
    }
    Ok(())
}

fn print_entry(entry: &FeedEntry) {
    println!("[{}] {}: {}", entry.seq, entry.author, entry.body);
}
