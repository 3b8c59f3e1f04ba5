//! FRA Core - Analysis Coordinator
//!
//! Deduplicates concurrent land analyses:
//! - One pipeline run per outstanding identical query key
//! - One shared outcome fanned out to every waiter
//! - Key-level cancellation and best-effort status
//! - FRA claim validation on top of the analysis
//!
//! # Example
//!
//! ```rust,ignore
//! use fra_core::{AnalysisCoordinator, CoordinatorConfig};
//! use fra_model::{AnalysisQuery, Coordinates};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = AnalysisCoordinator::new(CoordinatorConfig::new());
//!
//! let query = AnalysisQuery::new(Coordinates::new(21.8, 76.3));
//! let result = coordinator.analyze(query).await?;
//!
//! println!("Detected {} assets", result.land_assets.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod claims;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod in_flight;

pub use claims::{
    ClaimApplication, ClaimType, ClaimValidation, ClaimValidator, LandType, ValidationDetails,
};
pub use config::CoordinatorConfig;
pub use coordinator::AnalysisCoordinator;
pub use error::{AnalysisError, ConfigError};
pub use in_flight::{InFlightTable, Outcome, Registration, Retired, Settlement, WaiterTicket};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with FRA Core
    pub use crate::{
        AnalysisCoordinator, AnalysisError, ClaimApplication, ClaimValidation, CoordinatorConfig,
    };
    pub use fra_model::{AnalysisQuery, AnalysisResult, AnalysisStatus, Coordinates};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
