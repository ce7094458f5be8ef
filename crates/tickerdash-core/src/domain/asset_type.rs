use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Asset class selector; picks the ticker universe and the server-side table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    #[default]
    Stock,
    Etf,
    Crypto,
}

impl AssetType {
    pub const ALL: [Self; 3] = [Self::Stock, Self::Etf, Self::Crypto];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Etf => "etf",
            Self::Crypto => "crypto",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|asset_type| asset_type.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidAssetType {
                value: input.to_owned(),
            })
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(AssetType::parse(" ETF ").expect("valid"), AssetType::Etf);
        assert_eq!("crypto".parse::<AssetType>().expect("valid"), AssetType::Crypto);
    }

    #[test]
    fn rejects_unknown_asset_type() {
        let err = AssetType::parse("bond").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidAssetType { .. }));
    }

    #[test]
    fn serializes_as_path_segment() {
        let encoded = serde_json::to_string(&AssetType::Stock).expect("serializes");
        assert_eq!(encoded, "\"stock\"");
    }
}
