// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

//! Country naming shared by the airport tables, statistics and stamps.
//!
//! The bundled airports name countries ("India", "UK") while OurAirports rows
//! carry ISO 3166-1 alpha-2 codes ("IN", "GB"). Both resolve to the same
//! entry here so a country is counted once whatever the source.

/// ISO code and display name, as the bundled airport data spells it.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("ae", "UAE"),
    ("ar", "Argentina"),
    ("at", "Austria"),
    ("au", "Australia"),
    ("bd", "Bangladesh"),
    ("be", "Belgium"),
    ("br", "Brazil"),
    ("bt", "Bhutan"),
    ("ca", "Canada"),
    ("ch", "Switzerland"),
    ("cl", "Chile"),
    ("cn", "China"),
    ("cz", "Czechia"),
    ("de", "Germany"),
    ("dk", "Denmark"),
    ("eg", "Egypt"),
    ("es", "Spain"),
    ("fi", "Finland"),
    ("fr", "France"),
    ("gb", "UK"),
    ("gr", "Greece"),
    ("hk", "Hong Kong"),
    ("hu", "Hungary"),
    ("id", "Indonesia"),
    ("ie", "Ireland"),
    ("il", "Israel"),
    ("in", "India"),
    ("is", "Iceland"),
    ("it", "Italy"),
    ("jp", "Japan"),
    ("ke", "Kenya"),
    ("kh", "Cambodia"),
    ("kr", "South Korea"),
    ("kw", "Kuwait"),
    ("lk", "Sri Lanka"),
    ("lu", "Luxembourg"),
    ("mv", "Maldives"),
    ("mx", "Mexico"),
    ("my", "Malaysia"),
    ("nl", "Netherlands"),
    ("no", "Norway"),
    ("np", "Nepal"),
    ("nz", "New Zealand"),
    ("om", "Oman"),
    ("ph", "Philippines"),
    ("pl", "Poland"),
    ("pt", "Portugal"),
    ("qa", "Qatar"),
    ("sa", "Saudi Arabia"),
    ("se", "Sweden"),
    ("sg", "Singapore"),
    ("th", "Thailand"),
    ("tr", "Turkey"),
    ("tw", "Taiwan"),
    ("us", "USA"),
    ("va", "Vatican City"),
    ("vn", "Vietnam"),
    ("za", "South Africa"),
];

/// Other spellings found in airline and airport datasets.
const ALIASES: &[(&str, &str)] = &[
    ("united arab emirates", "ae"),
    ("united kingdom", "gb"),
    ("great britain", "gb"),
    ("england", "gb"),
    ("united states", "us"),
    ("united states of america", "us"),
    ("holy see", "va"),
    ("czech republic", "cz"),
    ("korea", "kr"),
    ("republic of korea", "kr"),
    ("türkiye", "tr"),
];

/// Lowercase ISO code for a country name, alias or two-letter code.
pub fn iso_code(country: &str) -> Option<&'static str> {
    let wanted = country.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    COUNTRIES
        .iter()
        .find(|(code, name)| *code == wanted || name.to_lowercase() == wanted)
        .map(|(code, _)| *code)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == wanted)
                .map(|(_, code)| *code)
        })
}

/// The one spelling used for counting and display. Unknown countries come
/// back trimmed but otherwise untouched.
pub fn display_name(country: &str) -> String {
    match iso_code(country).and_then(|code| COUNTRIES.iter().find(|(c, _)| *c == code)) {
        Some((_, name)) => name.to_string(),
        None => country.trim().to_string(),
    }
}

/// Stable reorder that moves entries for `home` to the front.
pub fn home_first<T, F>(items: &mut [T], home: &str, country_of: F)
where
    F: Fn(&T) -> &str,
{
    let home = display_name(home);
    if home.is_empty() {
        return;
    }
    items.sort_by_key(|item| display_name(country_of(item)) != home);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_codes_and_aliases_agree() {
        assert_eq!(iso_code("India"), Some("in"));
        assert_eq!(iso_code("IN"), Some("in"));
        assert_eq!(iso_code(" united kingdom "), Some("gb"));
        assert_eq!(iso_code("UK"), Some("gb"));
        assert_eq!(iso_code("Atlantis"), None);
        assert_eq!(iso_code(""), None);
    }

    #[test]
    fn test_display_name_is_canonical() {
        assert_eq!(display_name("GB"), "UK");
        assert_eq!(display_name("United Kingdom"), "UK");
        assert_eq!(display_name("us"), "USA");
        assert_eq!(display_name("IN"), "India");
        assert_eq!(display_name(" Atlantis "), "Atlantis");
    }

    #[test]
    fn test_home_first_keeps_order() {
        let mut list = vec!["Finland", "India", "UK", "IN"];
        home_first(&mut list, "in", |c| *c);
        assert_eq!(list, vec!["India", "IN", "Finland", "UK"]);

        home_first(&mut list, "  ", |c| *c);
        assert_eq!(list, vec!["India", "IN", "Finland", "UK"]);
    }
}
