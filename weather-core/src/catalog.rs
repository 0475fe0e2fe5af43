//! Fixed country/city catalog offered for manual selection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub label: &'static str,
    pub cities: &'static [&'static str],
}

const COUNTRIES: &[Country] = &[
    Country {
        code: "IN",
        label: "India",
        cities: &["Delhi", "Mumbai", "Bengaluru", "Kolkata"],
    },
    Country {
        code: "US",
        label: "USA",
        cities: &["New York", "Los Angeles", "Chicago", "Houston"],
    },
    Country {
        code: "GB",
        label: "UK",
        cities: &["London", "Manchester", "Birmingham", "Glasgow"],
    },
];

pub const DEFAULT_COUNTRY: &str = "IN";

pub fn countries() -> &'static [Country] {
    COUNTRIES
}

pub fn find_country(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// Cities offered for a country; empty for codes outside the catalog.
pub fn cities_for(code: &str) -> &'static [&'static str] {
    find_country(code).map(|c| c.cities).unwrap_or(&[])
}

/// First city of a country, used when the country selection changes.
pub fn default_city(code: &str) -> Option<&'static str> {
    cities_for(code).first().copied()
}
