use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::contract::{PickupLocation, Vehicle};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("fleet roster must contain at least one vehicle")]
    EmptyRoster,
}

/// Ordered, non-empty set of vehicles available for assignment.
///
/// Duplicate entries are valid roster data and are kept as-is; a vehicle listed
/// twice is twice as likely to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetRoster {
    vehicles: Vec<Vehicle>,
}

impl FleetRoster {
    pub fn new(vehicles: Vec<Vehicle>) -> Result<Self, SelectionError> {
        if vehicles.is_empty() {
            return Err(SelectionError::EmptyRoster);
        }
        Ok(Self { vehicles })
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn contains(&self, vehicle: &Vehicle) -> bool {
        self.vehicles.iter().any(|candidate| candidate == vehicle)
    }
}

/// Chooses which vehicle serves a pickup.
///
/// Implementations must return a copy of a roster entry and never fabricate or
/// alter a vehicle. The pickup location is passed through so that a
/// location-aware strategy can be added behind the same seam.
pub trait VehicleSelector: Send + Sync {
    /// Select a vehicle for the given pickup.
    ///
    /// Selection cannot fail at request time: an empty roster is rejected when
    /// the selector is built.
    fn select(&self, pickup: &PickupLocation) -> Vehicle;
}

/// Uniform random draw over the roster.
///
/// Pickup coordinates are logged but do not influence the draw. The PRNG is
/// seeded once at construction and shared behind a mutex, so concurrent
/// requests serialize on it instead of replaying correlated sequences.
#[derive(Debug)]
pub struct RandomFleetSelector {
    roster: FleetRoster,
    rng: Mutex<StdRng>,
}

impl RandomFleetSelector {
    pub fn new(roster: FleetRoster) -> Self {
        Self {
            roster,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic selector, for reproducible tests.
    pub fn with_seed(roster: FleetRoster, seed: u64) -> Self {
        Self {
            roster,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn roster(&self) -> &FleetRoster {
        &self.roster
    }

    fn next_index(&self) -> usize {
        // A panic while holding the lock cannot leave the RNG in an invalid state.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..self.roster.len())
    }
}

impl VehicleSelector for RandomFleetSelector {
    fn select(&self, pickup: &PickupLocation) -> Vehicle {
        let index = self.next_index();
        let vehicle = self.roster.vehicles[index].clone();
        tracing::debug!(
            component = "fleet_selector",
            latitude = pickup.latitude,
            longitude = pickup.longitude,
            roster_index = index,
            vehicle = %vehicle.name,
            "selected vehicle for pickup"
        );
        vehicle
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    fn reference_roster() -> FleetRoster {
        FleetRoster::new(vec![
            Vehicle::new("Bucephalus", "Golden", "Male"),
            Vehicle::new("Bucephalus", "Golden", "Male"),
            Vehicle::new("Rocinante", "Yellow", "Female"),
        ])
        .expect("roster should be valid")
    }

    fn pickup() -> PickupLocation {
        PickupLocation {
            latitude: 37.615223,
            longitude: -122.389977,
        }
    }

    #[test]
    fn rejects_empty_roster() {
        assert_eq!(FleetRoster::new(Vec::new()), Err(SelectionError::EmptyRoster));
    }

    #[test]
    fn keeps_duplicate_entries() {
        let roster = reference_roster();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.vehicles()[0], roster.vehicles()[1]);
    }

    #[test]
    fn always_selects_a_roster_member() {
        let selector = RandomFleetSelector::with_seed(reference_roster(), 7);
        for _ in 0..1_000 {
            let vehicle = selector.select(&pickup());
            assert!(selector.roster().contains(&vehicle));
        }
    }

    #[test]
    fn single_vehicle_roster_always_returns_that_vehicle() {
        let only = Vehicle::new("Shadowfax", "White", "Male");
        let roster = FleetRoster::new(vec![only.clone()]).expect("roster should be valid");
        let selector = RandomFleetSelector::new(roster);
        for _ in 0..100 {
            assert_eq!(selector.select(&pickup()), only);
        }
    }

    #[test]
    fn draws_cover_every_distinct_vehicle() {
        let selector = RandomFleetSelector::with_seed(reference_roster(), 42);
        let names: HashSet<String> = (0..500)
            .map(|_| selector.select(&pickup()).name)
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn coordinates_do_not_influence_seeded_draws() {
        let near = RandomFleetSelector::with_seed(reference_roster(), 99);
        let far = RandomFleetSelector::with_seed(reference_roster(), 99);
        let far_pickup = PickupLocation {
            latitude: -89.0,
            longitude: 179.0,
        };
        for _ in 0..50 {
            assert_eq!(near.select(&pickup()), far.select(&far_pickup));
        }
    }

    #[test]
    fn mutating_selected_vehicle_leaves_roster_untouched() {
        let selector = RandomFleetSelector::with_seed(reference_roster(), 3);
        let mut vehicle = selector.select(&pickup());
        vehicle.name.push_str("-modified");
        assert!(!selector.roster().contains(&vehicle));
        assert_eq!(selector.roster(), &reference_roster());
    }

    #[test]
    fn shared_selector_serves_concurrent_callers() {
        let selector = Arc::new(RandomFleetSelector::new(reference_roster()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let selector = Arc::clone(&selector);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| selector.select(&pickup()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for vehicle in handle.join().expect("selector thread panicked") {
                assert!(selector.roster().contains(&vehicle));
            }
        }
    }
}
