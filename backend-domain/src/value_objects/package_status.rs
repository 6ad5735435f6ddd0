// Package status value object
// Vocabulary for event_type on every event, not only package events

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InvalidValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Created,
    PickedUp,
    InTransit,
    SortingCenter,
    OutForDelivery,
    Delivered,
    DeliveryFailed,
    Returned,
    Cancelled,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Created => "created",
            PackageStatus::PickedUp => "picked_up",
            PackageStatus::InTransit => "in_transit",
            PackageStatus::SortingCenter => "sorting_center",
            PackageStatus::OutForDelivery => "out_for_delivery",
            PackageStatus::Delivered => "delivered",
            PackageStatus::DeliveryFailed => "delivery_failed",
            PackageStatus::Returned => "returned",
            PackageStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageStatus {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(PackageStatus::Created),
            "picked_up" => Ok(PackageStatus::PickedUp),
            "in_transit" => Ok(PackageStatus::InTransit),
            "sorting_center" => Ok(PackageStatus::SortingCenter),
            "out_for_delivery" => Ok(PackageStatus::OutForDelivery),
            "delivered" => Ok(PackageStatus::Delivered),
            "delivery_failed" => Ok(PackageStatus::DeliveryFailed),
            "returned" => Ok(PackageStatus::Returned),
            "cancelled" => Ok(PackageStatus::Cancelled),
            _ => Err(InvalidValue::new("event type", s)),
        }
    }
}
