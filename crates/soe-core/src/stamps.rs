// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

//! Passport stamps earned by visiting countries.

use crate::countries;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// ISO 3166-1 alpha-2 codes with stamp artwork, in display order.
pub const STAMP_CATALOGUE: &[(&str, &str)] = &[
    ("in", "India"),
    ("ae", "United Arab Emirates"),
    ("us", "United States"),
    ("gb", "United Kingdom"),
    ("th", "Thailand"),
    ("sg", "Singapore"),
    ("de", "Germany"),
    ("fr", "France"),
    ("it", "Italy"),
    ("ch", "Switzerland"),
    ("br", "Brazil"),
    ("jp", "Japan"),
    ("pt", "Portugal"),
    ("nl", "Netherlands"),
    ("be", "Belgium"),
    ("my", "Malaysia"),
    ("va", "Vatican City"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub iso_code: String,
    pub name: String,
}

impl Stamp {
    /// Artwork path relative to the asset root.
    pub fn image_path(&self) -> String {
        format!("stamps/{}.png", self.iso_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampStatus {
    pub stamp: Stamp,
    pub achieved: bool,
}

pub fn catalogue() -> Vec<Stamp> {
    STAMP_CATALOGUE
        .iter()
        .map(|(code, name)| Stamp {
            iso_code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// Lowercase ISO code for a country as it appears in airport data.
///
/// Accepts full English names, common short forms and bare two-letter codes.
/// Anything unrecognized comes back lowercased so it can still be compared.
pub fn country_to_iso(country: &str) -> Option<String> {
    let wanted = country.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    if let Some((code, _)) = STAMP_CATALOGUE
        .iter()
        .find(|(_, name)| name.to_lowercase() == wanted)
    {
        return Some(code.to_string());
    }
    Some(countries::iso_code(&wanted).map_or(wanted, str::to_string))
}

/// Every catalogue stamp with whether one of `countries` earns it.
pub fn earned_stamps<I, S>(countries: I) -> Vec<StampStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let earned: HashSet<String> = countries
        .into_iter()
        .filter_map(|c| country_to_iso(c.as_ref()))
        .collect();

    catalogue()
        .into_iter()
        .map(|stamp| {
            let achieved = earned.contains(&stamp.iso_code);
            StampStatus { stamp, achieved }
        })
        .collect()
}
