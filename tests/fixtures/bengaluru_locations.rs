//! Real Bengaluru locations for network-backed tests.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Warehouse used by the default planner config.
pub const WAREHOUSE: Location = Location::new("MG Road / Cubbon Park", 12.9716, 77.5946);

/// Delivery points within a couple of kilometers of the warehouse.
pub const CENTRAL_STOPS: &[Location] = &[
    Location::new("Vidhana Soudha", 12.9796, 77.5906),
    Location::new("Brigade Road", 12.9719, 77.6070),
    Location::new("Lalbagh West Gate", 12.9507, 77.5848),
    Location::new("Shivajinagar Bus Stand", 12.9857, 77.6057),
];
