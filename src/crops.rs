//! Base temperatures (°C) used for Growing Degree Days.
//!
//! Reference: https://ndawn.ndsu.nodak.edu/help-corn-growing-degree-days.html

/// Supported crops and their base temperature, in canonical order.
pub const CROP_BASE_TEMPERATURES: [(&str, i32); 10] = [
    ("Wheat", 4),
    ("Rice", 10),
    ("Maize", 10),
    ("Barley", 4),
    ("Soybeans", 10),
    ("Potatoes", 7),
    ("Tomatoes", 10),
    ("Sugarcane", 20),
    ("Cotton", 14),
    ("Coffee", 18),
];

pub const DEFAULT_CROP: &str = "Wheat";

/// Case-sensitive lookup; crops outside the table use a base of 0.
pub fn base_temperature(crop: &str) -> i32 {
    CROP_BASE_TEMPERATURES
        .iter()
        .find(|(name, _)| *name == crop)
        .map(|(_, base)| *base)
        .unwrap_or(0)
}

pub fn is_supported(crop: &str) -> bool {
    CROP_BASE_TEMPERATURES.iter().any(|(name, _)| *name == crop)
}

pub fn supported_crops() -> impl Iterator<Item = &'static str> {
    CROP_BASE_TEMPERATURES.iter().map(|(name, _)| *name)
}
