//! Commands sent to the map rendering surface.
//!
//! # Invariants
//! - Script rendering quotes destinations as JSON string literals, so any
//!   user-entered text is safe to embed in a surface script.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Travel mode understood by the map surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Transit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "DRIVING",
            Self::Walking => "WALKING",
            Self::Bicycling => "BICYCLING",
            Self::Transit => "TRANSIT",
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = UnknownTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownTravelMode(normalized.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTravelMode(pub String);

impl Display for UnknownTravelMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown travel mode `{}`; expected driving|walking|bicycling|transit",
            self.0
        )
    }
}

impl Error for UnknownTravelMode {}

/// One command for the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RouteCommand {
    SetTravelMode { mode: TravelMode },
    CreateRoute { destination: String },
}

impl RouteCommand {
    /// Renders the command as a surface script call, e.g.
    /// `createRoute("Porter College");`.
    pub fn to_script(&self) -> String {
        match self {
            Self::SetTravelMode { mode } => {
                format!("setTravelMode({});", js_string_literal(mode.as_str()))
            }
            Self::CreateRoute { destination } => {
                format!("createRoute({});", js_string_literal(destination))
            }
        }
    }
}

fn js_string_literal(value: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::{RouteCommand, TravelMode};

    #[test]
    fn travel_mode_parses_case_insensitively() {
        assert_eq!("walking".parse::<TravelMode>(), Ok(TravelMode::Walking));
        assert_eq!(" TRANSIT ".parse::<TravelMode>(), Ok(TravelMode::Transit));
        assert!("flying".parse::<TravelMode>().is_err());
        assert_eq!(TravelMode::default(), TravelMode::Driving);
    }

    #[test]
    fn scripts_escape_destination_text() {
        let command = RouteCommand::CreateRoute {
            destination: "Kresge \"Town Hall\"".to_string(),
        };
        assert_eq!(command.to_script(), r#"createRoute("Kresge \"Town Hall\"");"#);
        assert_eq!(
            RouteCommand::SetTravelMode {
                mode: TravelMode::Bicycling
            }
            .to_script(),
            r#"setTravelMode("BICYCLING");"#
        );
    }

    #[test]
    fn command_serializes_with_tag() {
        let json = serde_json::to_value(RouteCommand::SetTravelMode {
            mode: TravelMode::Walking,
        })
        .expect("command should serialize");
        assert_eq!(json["command"], "set_travel_mode");
        assert_eq!(json["mode"], "WALKING");
    }
}
