//! Forest, groundwater and infrastructure attribute sets

use serde::{Deserialize, Serialize};

/// Forest density class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForestType {
    /// Canopy density above 70%
    Dense,
    /// Canopy density 40-70%
    Open,
    /// Degraded stand
    Degraded,
    /// Scrubland
    Scrub,
}

impl ForestType {
    /// Every class, in synthesizer draw order
    pub const ALL: [ForestType; 4] = [
        ForestType::Dense,
        ForestType::Open,
        ForestType::Degraded,
        ForestType::Scrub,
    ];
}

/// Forest attributes for the analysed area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestData {
    /// Density class
    pub forest_type: ForestType,
    /// Dominant species, 2-5 entries
    pub tree_species: Vec<String>,
    /// Percentage of ground covered by canopy, 20-80
    pub canopy_cover: f64,
    /// Tonnes per hectare
    pub biomass: f64,
    /// Tonnes of carbon per hectare
    pub carbon_stock: f64,
    /// 0.3 - 0.9
    pub biodiversity_index: f64,
}

/// Groundwater quality class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterQuality {
    /// Potable without treatment
    Excellent,
    /// Potable with minimal treatment
    Good,
    /// Usable for irrigation
    Fair,
    /// Contaminated
    Poor,
}

impl WaterQuality {
    /// Every class, in synthesizer draw order
    pub const ALL: [WaterQuality; 4] = [
        WaterQuality::Excellent,
        WaterQuality::Good,
        WaterQuality::Fair,
        WaterQuality::Poor,
    ];
}

/// Groundwater attributes for the analysed area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundwaterData {
    /// Metres below ground, 5-25
    pub water_table_depth: f64,
    /// Quality class
    pub water_quality: WaterQuality,
    /// Millimetres per year
    pub recharge_rate: f64,
    /// Aquifer description
    pub aquifer_type: String,
    /// Seasonal swing of the water table, metres
    pub seasonal_variation: f64,
}

/// Road classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    /// National highway
    National,
    /// State highway
    State,
    /// District road
    District,
    /// Village road
    Village,
}

/// Surface condition of a road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadCondition {
    /// All-weather, well maintained
    Excellent,
    /// Usable year round
    Good,
    /// Seasonal problems
    Fair,
    /// Barely passable
    Poor,
}

/// Nearest road of a given class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadAccess {
    /// Road class
    #[serde(rename = "type")]
    pub road_type: RoadType,
    /// Distance in km
    pub distance: f64,
    /// Surface condition
    pub condition: RoadCondition,
}

/// Utility service class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityType {
    /// Grid electricity
    Electricity,
    /// Piped water
    Water,
    /// Telephone / data
    Telecom,
    /// Sewer connection
    Sewerage,
}

/// Availability of a utility near the area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityAccess {
    /// Utility class
    #[serde(rename = "type")]
    pub utility_type: UtilityType,
    /// Whether a connection is available
    pub available: bool,
    /// Distance to the nearest connection point, km
    pub distance: f64,
}

/// Distances to regional transport hubs, km
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connectivity {
    /// Nearest railway station
    pub nearest_railway: f64,
    /// Nearest airport
    pub nearest_airport: f64,
    /// Nearest sea port
    pub nearest_port: f64,
}

/// Descriptive infrastructure records around the area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureData {
    /// Nearby roads
    pub roads: Vec<RoadAccess>,
    /// Nearby utilities
    pub utilities: Vec<UtilityAccess>,
    /// Regional connectivity
    pub connectivity: Connectivity,
}
