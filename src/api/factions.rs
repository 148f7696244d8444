/// A parliamentary group and the identifier the search API filters by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faction {
    pub name: &'static str,
    pub id: &'static str,
}

/// Factions of the German Bundestag (Wikidata identifiers)
pub const BUNDESTAG_FACTIONS: &[Faction] = &[
    Faction { name: "AfD", id: "Q42575708" },
    Faction { name: "CDU/CSU", id: "Q1023134" },
    Faction { name: "SPD", id: "Q2207512" },
    Faction { name: "FDP", id: "Q1387991" },
    Faction { name: "DIE LINKE.", id: "Q1826856" },
    Faction { name: "BÜNDNIS 90/DIE GRÜNEN", id: "Q1007353" },
];

/// Lookup table from faction names to search identifiers
#[derive(Debug, Clone, Copy)]
pub struct FactionTable {
    factions: &'static [Faction],
}

impl Default for FactionTable {
    fn default() -> Self {
        Self::new(BUNDESTAG_FACTIONS)
    }
}

impl FactionTable {
    pub fn new(factions: &'static [Faction]) -> Self {
        Self { factions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Faction> {
        self.factions.iter()
    }

    /// Find a faction by name (case-insensitive) or by its identifier
    pub fn resolve(&self, name_or_id: &str) -> Option<&Faction> {
        let needle = name_or_id.trim();
        self.factions
            .iter()
            .find(|f| f.id == needle || f.name.to_lowercase() == needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_name_and_id() {
        let table = FactionTable::default();

        assert_eq!(table.resolve("spd").map(|f| f.id), Some("Q2207512"));
        assert_eq!(table.resolve(" Bündnis 90/Die Grünen ").map(|f| f.id), Some("Q1007353"));
        assert_eq!(table.resolve("Q42575708").map(|f| f.name), Some("AfD"));
        assert!(table.resolve("Piraten").is_none());
    }

    #[test]
    fn test_custom_table() {
        const LANDTAG: &[Faction] = &[Faction { name: "Freie Wähler", id: "Q1" }];
        let table = FactionTable::new(LANDTAG);

        assert_eq!(table.iter().count(), 1);
        assert!(table.resolve("SPD").is_none());
    }
}
