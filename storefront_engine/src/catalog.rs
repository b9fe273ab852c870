//! The fixed product catalog used for recommendation picks.
//!
//! The catalog is a stand-in for a real product source: ten products with stable ids. Reactive and
//! scheduled recommendation paths both pick uniformly at random from this list.

use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: &'static str,
}

pub const CATALOG: [Product; 10] = [
    Product { id: 101, name: "Wireless Mouse" },
    Product { id: 102, name: "Bluetooth Keyboard" },
    Product { id: 103, name: "USB-C Hub" },
    Product { id: 104, name: "Noise Cancelling Headphones" },
    Product { id: 105, name: "4K Monitor" },
    Product { id: 106, name: "External SSD" },
    Product { id: 107, name: "Smartphone Stand" },
    Product { id: 108, name: "Webcam" },
    Product { id: 109, name: "Portable Charger" },
    Product { id: 110, name: "LED Desk Lamp" },
];

/// Picks a catalog product uniformly at random.
pub fn random_product() -> Product {
    let mut rng = rand::thread_rng();
    // The catalog is a non-empty const array, so `choose` cannot return None.
    *CATALOG.choose(&mut rng).unwrap_or(&CATALOG[0])
}

pub fn contains_product(product_id: i64) -> bool {
    CATALOG.iter().any(|p| p.id == product_id)
}
