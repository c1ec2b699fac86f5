use super::{AirportInfo, AirportTable};
use std::sync::OnceLock;

static BUNDLED: OnceLock<AirportTable> = OnceLock::new();

pub fn bundled_entries() -> Vec<AirportInfo> {
    match serde_json::from_str(include_str!("airports.json")) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Bundled airports.json is unreadable: {}", e);
            Vec::new()
        }
    }
}

pub(crate) fn bundled_table() -> &'static AirportTable {
    BUNDLED.get_or_init(|| AirportTable::from_entries(bundled_entries()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::AirportResolver;

    #[test]
    fn test_bundled_loading() {
        let entries = bundled_entries();
        assert!(!entries.is_empty(), "Bundled airport list should not be empty");

        let table = AirportTable::bundled();
        assert_eq!(table.len(), entries.len());

        let del = table.resolve("DEL").expect("DEL missing");
        assert_eq!(del.city, "New Delhi");
        assert_eq!(del.country, "India");

        let lhr = table.resolve("lhr").expect("LHR missing");
        assert_eq!(lhr.country, "UK");

        assert!(table.resolve("ZZZ").is_none());
    }

    #[test]
    fn test_bundled_coordinates_in_range() {
        for entry in bundled_entries() {
            assert!(entry.coordinate().is_valid(), "{} out of range", entry.code);
        }
    }
}
