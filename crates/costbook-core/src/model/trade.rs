use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three master rate catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trade {
    Labor,
    Material,
    Equipment,
}

impl Trade {
    pub const ALL: [Self; 3] = [Self::Labor, Self::Material, Self::Equipment];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Labor => "labor",
            Self::Material => "material",
            Self::Equipment => "equipment",
        }
    }

    /// Header of the catalog column that carries the item name.
    ///
    /// The on-disk files use a trade-specific column (`LaborType`,
    /// `MaterialType`, `EquipmentType`) where the in-memory model uses the
    /// canonical `name` field; the inventory store renames in both
    /// directions to stay compatible with pre-existing files.
    #[must_use]
    pub const fn type_column(self) -> &'static str {
        match self {
            Self::Labor => "LaborType",
            Self::Material => "MaterialType",
            Self::Equipment => "EquipmentType",
        }
    }

    /// File name of this trade's catalog inside the data directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

/// Error returned when parsing a trade name from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTradeError {
    pub got: String,
}

impl fmt::Display for ParseTradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid trade: '{}'", self.got)
    }
}

impl std::error::Error for ParseTradeError {}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trade {
    type Err = ParseTradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "labor" => Ok(Self::Labor),
            "material" => Ok(Self::Material),
            "equipment" => Ok(Self::Equipment),
            _ => Err(ParseTradeError { got: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Trade;
    use std::str::FromStr;

    #[test]
    fn display_parse_roundtrips() {
        for trade in Trade::ALL {
            let rendered = trade.to_string();
            let reparsed = Trade::from_str(&rendered).unwrap();
            assert_eq!(trade, reparsed);
        }
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(Trade::from_str("overhead").is_err());
        assert!(Trade::from_str("").is_err());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Trade::from_str("Labor").unwrap(), Trade::Labor);
        assert_eq!(Trade::from_str(" EQUIPMENT ").unwrap(), Trade::Equipment);
    }

    #[test]
    fn type_columns_match_legacy_headers() {
        assert_eq!(Trade::Labor.type_column(), "LaborType");
        assert_eq!(Trade::Material.type_column(), "MaterialType");
        assert_eq!(Trade::Equipment.type_column(), "EquipmentType");
    }

    #[test]
    fn file_names_follow_trade() {
        assert_eq!(Trade::Labor.file_name(), "labor.csv");
        assert_eq!(Trade::Material.file_name(), "material.csv");
        assert_eq!(Trade::Equipment.file_name(), "equipment.csv");
    }
}
