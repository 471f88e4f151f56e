//! Readiness-gated route command bridge.
//!
//! # Responsibility
//! - Accept route and travel-mode requests at any time.
//! - Forward commands to the rendering surface only after it signaled ready.
//!
//! # Invariants
//! - No command reaches the surface before `on_ready()`; the surface is only
//!   reachable through `ready_surface()`, which yields nothing while not ready.
//! - At most one destination is pending; a newer request overwrites it.
//! - After readiness, a travel-mode command always precedes the route command
//!   it affects.
//! - One bridge serves one surface instance; `teardown()` consumes it so a
//!   destroyed surface can no longer be signaled or sent to.

use crate::route::command::{RouteCommand, TravelMode};
use crate::schedule::resolver::Occurrence;
use log::{debug, info, warn};

/// Sink for commands addressed to the rendering surface.
pub trait RenderSurface {
    fn send(&mut self, command: RouteCommand);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn send(&mut self, command: RouteCommand) {
        (**self).send(command);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    NotReady,
    Ready,
}

/// Outcome of a route or travel-mode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDispatch {
    /// Commands were sent to the surface.
    Sent,
    /// Surface not ready yet; the request is kept for `on_ready()`.
    Buffered,
    /// Blank destination; nothing recorded.
    Ignored,
}

/// Command queue between navigation actions and one map surface instance.
#[derive(Debug)]
pub struct RouteBridge<S: RenderSurface> {
    surface: S,
    readiness: Readiness,
    travel_mode: TravelMode,
    pending_destination: Option<String>,
}

impl<S: RenderSurface> RouteBridge<S> {
    /// Creates a not-ready bridge using the default travel mode.
    pub fn new(surface: S) -> Self {
        Self::with_travel_mode(surface, TravelMode::default())
    }

    /// Creates a not-ready bridge carrying over a travel-mode preference.
    pub fn with_travel_mode(surface: S, travel_mode: TravelMode) -> Self {
        Self {
            surface,
            readiness: Readiness::NotReady,
            travel_mode,
            pending_destination: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    pub fn pending_destination(&self) -> Option<&str> {
        self.pending_destination.as_deref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Requests a route to `destination` under the current travel mode.
    ///
    /// The destination is remembered either way, so a later travel-mode
    /// change or readiness signal can (re)issue it.
    pub fn request_route(&mut self, destination: impl Into<String>) -> RouteDispatch {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            warn!("event=route_request module=route status=ignored reason=blank_destination");
            return RouteDispatch::Ignored;
        }

        self.pending_destination = Some(destination.clone());
        match self.ready_surface() {
            Some(surface) => {
                surface.send(RouteCommand::CreateRoute { destination });
                debug!("event=route_request module=route status=sent");
                RouteDispatch::Sent
            }
            None => {
                debug!("event=route_request module=route status=buffered");
                RouteDispatch::Buffered
            }
        }
    }

    /// Requests a route to the location of `occurrence`.
    pub fn route_to_occurrence(&mut self, occurrence: &Occurrence) -> RouteDispatch {
        self.request_route(occurrence.location())
    }

    /// Changes the travel mode, replaying the pending route when ready.
    pub fn set_travel_mode(&mut self, mode: TravelMode) -> RouteDispatch {
        self.travel_mode = mode;
        if !self.is_ready() {
            debug!("event=travel_mode module=route status=buffered mode={mode}");
            return RouteDispatch::Buffered;
        }
        self.flush();
        debug!("event=travel_mode module=route status=sent mode={mode}");
        RouteDispatch::Sent
    }

    /// Readiness signal from the rendering surface.
    ///
    /// Applies the current travel mode, then the buffered destination if any.
    /// Returns `false` when the bridge was already ready.
    pub fn on_ready(&mut self) -> bool {
        if self.is_ready() {
            warn!("event=surface_ready module=route status=ignored reason=already_ready");
            return false;
        }
        self.readiness = Readiness::Ready;
        info!(
            "event=surface_ready module=route status=ok mode={} pending={}",
            self.travel_mode,
            self.pending_destination.is_some()
        );
        self.flush();
        true
    }

    /// Detaches from the surface, returning the travel-mode preference.
    ///
    /// Any pending destination is dropped with the bridge.
    pub fn teardown(self) -> TravelMode {
        debug!(
            "event=surface_teardown module=route status=ok dropped_pending={}",
            self.pending_destination.is_some()
        );
        self.travel_mode
    }

    fn ready_surface(&mut self) -> Option<&mut S> {
        match self.readiness {
            Readiness::Ready => Some(&mut self.surface),
            Readiness::NotReady => None,
        }
    }

    /// Sends mode then pending route. No-op while not ready.
    fn flush(&mut self) {
        let mode = self.travel_mode;
        let destination = self.pending_destination.clone();
        let Some(surface) = self.ready_surface() else {
            return;
        };
        surface.send(RouteCommand::SetTravelMode { mode });
        if let Some(destination) = destination {
            surface.send(RouteCommand::CreateRoute { destination });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderSurface, RouteBridge, RouteDispatch};
    use crate::route::command::RouteCommand;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<RouteCommand>,
    }

    impl RenderSurface for Recorder {
        fn send(&mut self, command: RouteCommand) {
            self.sent.push(command);
        }
    }

    #[test]
    fn blank_destination_is_ignored() {
        let mut bridge = RouteBridge::new(Recorder::default());
        assert_eq!(bridge.request_route("   "), RouteDispatch::Ignored);
        assert!(bridge.pending_destination().is_none());
    }

    #[test]
    fn borrowed_surface_receives_commands() {
        let mut recorder = Recorder::default();
        {
            let mut bridge = RouteBridge::new(&mut recorder);
            bridge.on_ready();
        }
        assert_eq!(recorder.sent.len(), 1);
    }
}
