use super::{CliResult, Context};
use clap::Subcommand;
use slughub_core::{NewEventRequest, ScheduleService, SqliteScheduleRepository};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ClassAction {
    /// Add a weekly class
    Add {
        /// Course name, e.g. "CSE 101"
        #[arg(long)]
        name: String,

        /// Routing destination, e.g. "Baskin Engineering"
        #[arg(long)]
        location: String,

        /// Day letters, e.g. "M,W,F"
        #[arg(long)]
        days: String,

        /// Start time, e.g. "1:20 PM" or "13:20"
        #[arg(long)]
        time: String,

        /// Flag as a one-off campus event
        #[arg(long)]
        special: bool,
    },
    /// List classes in the order they were added
    List,
    /// Remove a class by ID
    Remove { id: Uuid },
}

pub fn run(action: ClassAction, ctx: &Context) -> CliResult {
    let session = ctx.session()?;
    let service = ScheduleService::new(SqliteScheduleRepository::try_new(&ctx.conn)?);

    match action {
        ClassAction::Add {
            name,
            location,
            days,
            time,
            special,
        } => {
            let request = NewEventRequest::parse(&name, &location, &days, &time)?;
            let id = if special {
                service.add_special_event(&session, &request)?
            } else {
                service.add_event(&session, &request)?
            };
            println!("added {id}");
        }
        ClassAction::List => {
            let events = service.list_events(&session)?;
            if events.is_empty() {
                println!("no classes");
            }
            for event in events {
                let marker = if event.is_special { " [special]" } else { "" };
                println!("{}  {event}{marker}", event.id);
            }
        }
        ClassAction::Remove { id } => {
            service.delete_event(&session, id)?;
            println!("removed {id}");
        }
    }
    Ok(())
}
