// Entity type value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InvalidValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Package,
    Shipment,
    Item,
    Container,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Package,
        EntityType::Shipment,
        EntityType::Item,
        EntityType::Container,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Package => "package",
            EntityType::Shipment => "shipment",
            EntityType::Item => "item",
            EntityType::Container => "container",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "package" => Ok(EntityType::Package),
            "shipment" => Ok(EntityType::Shipment),
            "item" => Ok(EntityType::Item),
            "container" => Ok(EntityType::Container),
            _ => Err(InvalidValue::new("entity type", s)),
        }
    }
}
