pub mod analysis;
pub mod config;
pub mod dto;
pub mod extraction;

pub use analysis::*;
pub use config::{CategoryInclusion, Config, ConfigError};
pub use dto::{AnalysisRequest, AnalysisResponse, CategoryContradictionDto, ContradictionDto};
