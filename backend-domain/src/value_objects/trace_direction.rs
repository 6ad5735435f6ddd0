// Trace direction value object

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InvalidValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    Up,
    Down,
    #[default]
    Both,
}

impl TraceDirection {
    pub fn includes_ancestors(&self) -> bool {
        matches!(self, TraceDirection::Up | TraceDirection::Both)
    }

    pub fn includes_descendants(&self) -> bool {
        matches!(self, TraceDirection::Down | TraceDirection::Both)
    }
}

impl FromStr for TraceDirection {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(TraceDirection::Up),
            "down" => Ok(TraceDirection::Down),
            "both" => Ok(TraceDirection::Both),
            _ => Err(InvalidValue::new("direction", s)),
        }
    }
}
