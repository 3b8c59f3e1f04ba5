//! Forest, groundwater and infrastructure synthesis
//!
//! Independent of detection output; each set is drawn from fixed ranges.

use crate::random::{pick, RandomSource};
use fra_model::{
    Connectivity, ForestData, ForestType, GroundwaterData, InfrastructureData, RoadAccess,
    RoadCondition, RoadType, UtilityAccess, UtilityType, WaterQuality,
};
use std::sync::Arc;

/// Candidate species, taken as a prefix of 2-5 entries
pub const TREE_SPECIES: [&str; 7] = ["Teak", "Sal", "Bamboo", "Eucalyptus", "Neem", "Banyan", "Peepal"];

/// Aquifer description reported for every area
pub const DEFAULT_AQUIFER: &str = "Unconfined";

/// Draws domain attribute sets
#[derive(Clone)]
pub struct DomainDataSynthesizer {
    random: Arc<dyn RandomSource>,
}

impl DomainDataSynthesizer {
    /// Create synthesizer drawing from `random`
    #[must_use]
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Forest attributes: canopy 20-80%, biodiversity 0.3-0.9, 2-5 species
    #[must_use]
    pub fn synthesize_forest(&self) -> ForestData {
        let rng = self.random.as_ref();

        let forest_type = *pick(rng, &ForestType::ALL);
        let species = rng.index(2, 4);

        ForestData {
            forest_type,
            tree_species: TREE_SPECIES[..species].iter().map(|s| (*s).to_string()).collect(),
            canopy_cover: rng.uniform(20.0, 60.0),
            biomass: rng.uniform(50.0, 200.0),
            carbon_stock: rng.uniform(25.0, 100.0),
            biodiversity_index: rng.uniform(0.3, 0.6),
        }
    }

    /// Groundwater attributes: table depth 5-25 m
    #[must_use]
    pub fn synthesize_groundwater(&self) -> GroundwaterData {
        let rng = self.random.as_ref();

        GroundwaterData {
            water_table_depth: rng.uniform(5.0, 20.0),
            water_quality: *pick(rng, &WaterQuality::ALL),
            recharge_rate: rng.uniform(50.0, 200.0),
            aquifer_type: DEFAULT_AQUIFER.to_string(),
            seasonal_variation: rng.uniform(1.0, 5.0),
        }
    }

    /// Nearby roads, utilities and regional connectivity
    #[must_use]
    pub fn synthesize_infrastructure(&self) -> InfrastructureData {
        let rng = self.random.as_ref();

        let roads = vec![
            RoadAccess {
                road_type: RoadType::Village,
                distance: rng.uniform(0.0, 5.0),
                condition: RoadCondition::Good,
            },
            RoadAccess {
                road_type: RoadType::District,
                distance: rng.uniform(2.0, 8.0),
                condition: RoadCondition::Fair,
            },
        ];

        let electricity = rng.exceeds(0.3);
        let electricity_distance = rng.uniform(0.0, 3.0);
        let water = rng.exceeds(0.4);
        let water_distance = rng.uniform(0.0, 2.0);
        let utilities = vec![
            UtilityAccess {
                utility_type: UtilityType::Electricity,
                available: electricity,
                distance: electricity_distance,
            },
            UtilityAccess {
                utility_type: UtilityType::Water,
                available: water,
                distance: water_distance,
            },
        ];

        InfrastructureData {
            roads,
            utilities,
            connectivity: Connectivity {
                nearest_railway: rng.uniform(10.0, 40.0),
                nearest_airport: rng.uniform(50.0, 100.0),
                nearest_port: rng.uniform(100.0, 200.0),
            },
        }
    }
}

impl std::fmt::Debug for DomainDataSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainDataSynthesizer").finish_non_exhaustive()
    }
}
