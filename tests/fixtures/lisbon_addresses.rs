//! Real Lisbon addresses for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use homecare_route_optimizer::Coordinate;

/// An address with the coordinate a geocoder should return for it.
#[derive(Debug, Clone, Copy)]
pub struct Address {
    pub text: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Address {
    pub const fn new(text: &'static str, lat: f64, lng: f64) -> Self {
        Self { text, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lng, self.lat).expect("fixture coordinates are finite")
    }
}

/// Agency office used as the starting point.
pub const AGENCY_OFFICE: Address =
    Address::new("Praça do Comércio, 1100-148 Lisboa", 38.7075, -9.1364);

pub const BAIXA_VISITS: &[Address] = &[
    Address::new("Rua Augusta 100, 1100-053 Lisboa", 38.7101, -9.1383),
    Address::new("Rua Garrett 50, 1200-204 Lisboa", 38.7107, -9.1420),
    Address::new("Rua da Prata 80, 1100-415 Lisboa", 38.7098, -9.1366),
    Address::new("Largo do Carmo 10, 1200-092 Lisboa", 38.7121, -9.1409),
];

pub const NORTH_VISITS: &[Address] = &[
    Address::new("Avenida da Liberdade 200, 1250-147 Lisboa", 38.7205, -9.1459),
    Address::new("Largo do Rato 1, 1250-185 Lisboa", 38.7203, -9.1540),
    Address::new("Avenida de Roma 10, 1000-265 Lisboa", 38.7452, -9.1386),
    Address::new("Campo Grande 28, 1700-093 Lisboa", 38.7578, -9.1527),
    Address::new("Rua de São Bento 300, 1200-822 Lisboa", 38.7142, -9.1531),
];

/// Every visit address, Baixa first.
pub fn all_visits() -> Vec<Address> {
    let mut all = Vec::with_capacity(BAIXA_VISITS.len() + NORTH_VISITS.len());
    all.extend_from_slice(BAIXA_VISITS);
    all.extend_from_slice(NORTH_VISITS);
    all
}

/// Returns the first `count` visit addresses.
pub fn sample_visits(count: usize) -> Vec<Address> {
    all_visits().into_iter().take(count).collect()
}
