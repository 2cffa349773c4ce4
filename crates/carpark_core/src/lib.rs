mod allocator;
mod models;

pub use crate::models::*;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChargingPointError {
    /// Unknown id, or a disconnect on a point that is not connected
    #[error("Charging point {id} not found")]
    NotFound { id: String },
    #[error("Charging point {id} is already connected")]
    Conflict { id: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteConfigError {
    #[error("The site must have at least one charging point")]
    NoChargingPoints,
    #[error("Total power {total_power} cannot be split evenly between {capacity} charging points")]
    UnevenPowerSplit { total_power: u32, capacity: u32 },
    #[error("Total power {total_power} is too low for {capacity} charging points")]
    PowerBelowCapacity { total_power: u32, capacity: u32 },
    #[error("Expected {capacity} charging point ids, got {actual}")]
    CatalogueSizeMismatch { capacity: u32, actual: usize },
    #[error("Charging point {id} is listed more than once")]
    DuplicateChargingPoint { id: String },
    #[error("Charging point ids cannot be empty")]
    EmptyChargingPointId,
    #[error("A site cannot have more than {max} charging points, got {capacity}")]
    TooManyChargingPoints { capacity: u32, max: u32 },
}

/// A carpark with a fixed set of charging points sharing a fixed power budget.
///
/// The only mutable state is the active ordering: the connected points,
/// newest first, stored as indexes into the catalogue. Allocated power is
/// derived from that ordering every time it is read, under the same lock
/// that guards the mutations.
#[derive(Debug)]
pub struct Carpark {
    config: SiteConfig,
    unit: u32,
    index: HashMap<String, usize>,
    active: Mutex<VecDeque<usize>>,
}

impl Carpark {
    pub fn new(config: SiteConfig) -> Result<Self, SiteConfigError> {
        let config = config.resolve()?;
        let index = config
            .charging_points
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        Ok(Carpark {
            unit: config.unit(),
            active: Mutex::new(VecDeque::with_capacity(config.charging_points.len())),
            index,
            config,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn capacity(&self) -> usize {
        self.config.charging_points.len()
    }

    /// The ordering never holds a half-applied update: every mutation finishes
    /// its checks before touching it, so a poisoned lock is still consistent.
    fn ordering(&self) -> MutexGuard<'_, VecDeque<usize>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, id: &str) -> Result<usize, ChargingPointError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ChargingPointError::NotFound { id: id.to_owned() })
    }

    /// Power of every catalogue entry, `None` for disconnected points.
    fn allocation(&self, ordering: &VecDeque<usize>) -> Vec<Option<u32>> {
        let shares = allocator::redistribute(ordering.len(), self.capacity(), self.unit);
        tracing::debug!("Redistributed power: {:?}", shares);
        let mut allocation = vec![None; self.capacity()];
        for (&idx, share) in ordering.iter().zip(shares) {
            allocation[idx] = Some(share);
        }
        allocation
    }

    /// Connect a point. It becomes the most recently connected one and the
    /// power of every connected point is recomputed.
    pub fn connect(&self, id: &str) -> Result<ChargingPoint, ChargingPointError> {
        tracing::info!("Connecting charging point {}", id);
        let idx = self.lookup(id).inspect_err(|_| {
            tracing::warn!("Rejecting connect: charging point {} does not exist", id);
        })?;

        let mut ordering = self.ordering();
        if ordering.contains(&idx) {
            tracing::warn!("Rejecting connect: charging point {} is already connected", id);
            return Err(ChargingPointError::Conflict { id: id.to_owned() });
        }
        ordering.push_front(idx);

        let current = self.allocation(&ordering)[idx].unwrap_or(self.unit);
        tracing::info!(
            "Charging point {} connected with {}, {} of {} points in use",
            id,
            current,
            ordering.len(),
            self.capacity()
        );
        Ok(ChargingPoint::connected(id, current))
    }

    /// Disconnect a point and give its power back to the remaining ones.
    ///
    /// A point that is not connected is reported as [`ChargingPointError::NotFound`],
    /// the same as an unknown id.
    pub fn disconnect(&self, id: &str) -> Result<ChargingPoint, ChargingPointError> {
        tracing::info!("Disconnecting charging point {}", id);
        let idx = self.lookup(id).inspect_err(|_| {
            tracing::warn!("Rejecting disconnect: charging point {} does not exist", id);
        })?;

        let mut ordering = self.ordering();
        let Some(position) = ordering.iter().position(|&active| active == idx) else {
            tracing::warn!("Rejecting disconnect: charging point {} is not connected", id);
            return Err(ChargingPointError::NotFound { id: id.to_owned() });
        };
        ordering.remove(position);

        tracing::info!(
            "Charging point {} disconnected, {} of {} points in use",
            id,
            ordering.len(),
            self.capacity()
        );
        Ok(ChargingPoint::disconnected(id))
    }

    /// Every point of the catalogue, in catalogue order.
    pub fn describe(&self) -> Vec<ChargingPoint> {
        let allocation = {
            let ordering = self.ordering();
            self.allocation(&ordering)
        };
        self.config
            .charging_points
            .iter()
            .zip(allocation)
            .map(|(id, power)| match power {
                Some(current) => ChargingPoint::connected(id, current),
                None => ChargingPoint::disconnected(id),
            })
            .collect()
    }

    /// Connected point ids, most recently connected first.
    pub fn active_ordering(&self) -> Vec<String> {
        self.ordering()
            .iter()
            .map(|&idx| self.config.charging_points[idx].clone())
            .collect()
    }
}
