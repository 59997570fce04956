use crate::utils::error::{DashError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Layer names the user has ticked. Order carries no meaning; the server decides stacking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSelection {
    names: BTreeSet<String>,
}

impl LayerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LayerSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    /// Tile template with `{z}`, `{x}` and `{y}` placeholders.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayersRequest {
    pub layers: Vec<String>,
}

impl From<&LayerSelection> for LayersRequest {
    fn from(selection: &LayerSelection) -> Self {
        Self {
            layers: selection.iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayersResponse {
    pub layers: Vec<LayerInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub district: String,
    pub dataset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotResponse {
    /// `data:image/png;base64,...`
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStatsRequest {
    #[serde(rename = "info_district")]
    pub district: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatsResponse {
    pub chirps: f64,
    pub era5_temp: f64,
    pub soil_moist: f64,
    pub ndvi: f64,
}

/// The four text slots of the statistics panel, already formatted with units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedStats {
    pub chirps: String,
    pub temp: String,
    pub soil_moist: String,
    pub ndvi: String,
}

impl MonthlyStatsResponse {
    // `{}` on f64 is the shortest round-trip form: 18.0 prints as "18", 0.42 as "0.42".
    pub fn formatted(&self) -> FormattedStats {
        FormattedStats {
            chirps: format!("{} {}", self.chirps, Dataset::Chirps.unit()),
            temp: format!("{} {}", self.era5_temp, Dataset::Era5Temp.unit()),
            soil_moist: format!("{} {}", self.soil_moist, Dataset::SoilMoist.unit()),
            ndvi: format!("{}", self.ndvi),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Chirps,
    Era5Temp,
    SoilMoist,
    Ndvi,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::Chirps,
        Dataset::Era5Temp,
        Dataset::SoilMoist,
        Dataset::Ndvi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Chirps => "chirps",
            Dataset::Era5Temp => "era5_temp",
            Dataset::SoilMoist => "soil_moist",
            Dataset::Ndvi => "ndvi",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dataset::Chirps => "Precipitation",
            Dataset::Era5Temp => "Temperature",
            Dataset::SoilMoist => "Soil moisture",
            Dataset::Ndvi => "NDVI",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Dataset::Chirps => "mm",
            Dataset::Era5Temp => "°C",
            Dataset::SoilMoist => "%",
            Dataset::Ndvi => "",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        Dataset::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| DashError::InvalidConfigValueError {
                field: "dataset".to_string(),
                value: s.to_string(),
                reason: "Unknown dataset".to_string(),
            })
    }
}

/// Risk overlays the server knows how to render, listed bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLayer {
    Landslide,
    Drought,
    Flood,
    Districts,
}

impl RiskLayer {
    pub const STACKING_ORDER: [RiskLayer; 4] = [
        RiskLayer::Landslide,
        RiskLayer::Drought,
        RiskLayer::Flood,
        RiskLayer::Districts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLayer::Landslide => "landslide",
            RiskLayer::Drought => "drought",
            RiskLayer::Flood => "flood",
            RiskLayer::Districts => "districts",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLayer::Landslide => "Landslide risk",
            RiskLayer::Drought => "Drought risk",
            RiskLayer::Flood => "Flood risk",
            RiskLayer::Districts => "District boundaries",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::STACKING_ORDER.into_iter().find(|l| l.as_str() == name)
    }
}

/// A parsed `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix("data:").ok_or_else(|| DashError::DataUriError {
            message: "missing 'data:' prefix".to_string(),
        })?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| DashError::DataUriError {
            message: "missing ',' separator".to_string(),
        })?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| DashError::DataUriError {
            message: "only base64 payloads are supported".to_string(),
        })?;

        let data = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }
}
