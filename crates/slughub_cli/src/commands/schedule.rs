use super::{CliResult, Context};
use chrono::{Local, NaiveDate};
use slughub_core::model::event::parse_weekday_list;
use slughub_core::schedule::slots::suggested_start_times;
use slughub_core::{
    NavigationCursor, Occurrence, RenderSurface, Resolution, RouteBridge, RouteCommand,
    ScheduleService, SqliteScheduleRepository, Step, TravelMode,
};

/// Prints surface commands as script lines.
struct StdoutSurface;

impl RenderSurface for StdoutSurface {
    fn send(&mut self, command: RouteCommand) {
        println!("{}", command.to_script());
    }
}

pub fn slots(days: &str) -> CliResult {
    let days = parse_weekday_list(days)?;
    for time in suggested_start_times(&days) {
        println!("{time}");
    }
    Ok(())
}

pub fn next(ctx: &Context, all: bool) -> CliResult {
    let session = ctx.session()?;
    let service = ScheduleService::new(SqliteScheduleRepository::try_new(&ctx.conn)?);
    let now = Local::now().naive_local();

    match service.upcoming(&session, now)? {
        Resolution::NoUpcoming => println!("no upcoming classes this week"),
        Resolution::Upcoming(occurrences) => {
            let shown = if all { occurrences.len() } else { 1 };
            for occurrence in occurrences.iter().take(shown) {
                println!("{}", describe(occurrence, now.date()));
            }
        }
    }
    Ok(())
}

/// Starts a cursor, steps `skip` times, then routes through a bridge whose
/// surface becomes ready only after the request was made.
pub fn route(ctx: &Context, mode: Option<&str>, skip: usize) -> CliResult {
    let mode = mode.map(str::parse::<TravelMode>).transpose()?;
    let session = ctx.session()?;
    let service = ScheduleService::new(SqliteScheduleRepository::try_new(&ctx.conn)?);
    let now = Local::now().naive_local();

    let mut cursor = NavigationCursor::new();
    if service
        .start_navigation(&session, now, &mut cursor)?
        .is_none()
    {
        println!("no upcoming classes this week");
        return Ok(());
    }
    for _ in 0..skip {
        if let Step::NoFurther = cursor.advance() {
            println!("only {} upcoming on that day", cursor.len());
            break;
        }
    }
    let Some(target) = cursor.current() else {
        return Ok(());
    };
    println!("{}", describe(target, now.date()));

    let mut bridge = RouteBridge::with_travel_mode(StdoutSurface, ctx.config.travel_mode);
    bridge.route_to_occurrence(target);
    if let Some(mode) = mode {
        bridge.set_travel_mode(mode);
    }
    bridge.on_ready();
    bridge.teardown();
    Ok(())
}

fn describe(occurrence: &Occurrence, today: NaiveDate) -> String {
    let event = &occurrence.event;
    let marker = if event.is_special { " [special]" } else { "" };
    format!(
        "{} {}  {} @ {}{marker}",
        occurrence.date(today).map_or_else(
            || "date out of range".to_string(),
            |date| date.format("%a %Y-%m-%d").to_string()
        ),
        event.start_time,
        event.name,
        event.location
    )
}
