//! Analysis gateway for the external multimodal classifier.

pub mod gateway;
pub mod illustration;
pub mod prompts;
pub mod types;

pub use gateway::AnalysisGateway;
pub use illustration::{illustrate, placeholder_image_for};
pub use types::{AnalysisOutcome, ClassifierResponse, Recipe, SpoilageWarning};
