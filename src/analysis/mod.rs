//! Analysis result model and the contract the provider must satisfy.

mod models;
pub mod schema;
mod validation;

pub use models::{
    AnalysisResult, HairDiagnosis, Reflect, SkinAnalysis, SkinChroma, SkinHue, SkinValue,
    TechnicalCode, MAX_SAFE_LIFT,
};
pub use schema::{contract, SchemaDialect, SchemaNode};
pub use validation::{parse_analysis, validate_value, ContractViolation};
