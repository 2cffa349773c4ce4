use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::SiteConfigError;

/// Upper bound on the number of charging points of a site
pub const MAX_CAPACITY: u32 = 1024;

/// Static description of the carpark: how many points it has, the power they
/// share and the identifiers they answer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub name: String,
    pub capacity: u32,
    /// Total power budget in amperes, shared by every point of the site
    pub total_power: u32,
    /// Point identifiers in reporting order. Generated as `CP1..CPn` when empty.
    #[serde(default)]
    pub charging_points: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            name: "ubi".into(),
            capacity: 10,
            total_power: 100,
            charging_points: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Minimum power handed to any connected point.
    pub fn unit(&self) -> u32 {
        self.total_power.checked_div(self.capacity).unwrap_or(0)
    }

    /// Check the configuration and fill in the generated catalogue if needed.
    pub(crate) fn resolve(mut self) -> Result<SiteConfig, SiteConfigError> {
        if self.capacity == 0 {
            return Err(SiteConfigError::NoChargingPoints);
        }
        if self.capacity > MAX_CAPACITY {
            return Err(SiteConfigError::TooManyChargingPoints {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        if self.total_power % self.capacity != 0 {
            return Err(SiteConfigError::UnevenPowerSplit {
                total_power: self.total_power,
                capacity: self.capacity,
            });
        }
        if self.unit() == 0 {
            return Err(SiteConfigError::PowerBelowCapacity {
                total_power: self.total_power,
                capacity: self.capacity,
            });
        }

        if self.charging_points.is_empty() {
            self.charging_points = (1..=self.capacity).map(|n| format!("CP{n}")).collect();
            return Ok(self);
        }

        if self.charging_points.len() != self.capacity as usize {
            return Err(SiteConfigError::CatalogueSizeMismatch {
                capacity: self.capacity,
                actual: self.charging_points.len(),
            });
        }
        let mut seen = HashSet::new();
        for id in &self.charging_points {
            if id.trim().is_empty() {
                return Err(SiteConfigError::EmptyChargingPointId);
            }
            if !seen.insert(id.as_str()) {
                return Err(SiteConfigError::DuplicateChargingPoint { id: id.clone() });
            }
        }
        Ok(self)
    }
}

/// Projection of one charging point at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingPoint {
    pub id: String,
    /// Allocated power, 0 while disconnected
    pub current: u32,
    pub connected: bool,
}

impl ChargingPoint {
    pub(crate) fn connected(id: &str, current: u32) -> Self {
        ChargingPoint {
            id: id.to_owned(),
            current,
            connected: true,
        }
    }

    pub(crate) fn disconnected(id: &str) -> Self {
        ChargingPoint {
            id: id.to_owned(),
            current: 0,
            connected: false,
        }
    }
}
