mod backend;
pub mod backends;
pub mod classifier;
mod confidence;
pub mod config;
mod errors;
mod opentelemetry;
mod orchestrator;
pub mod parser;
pub mod prompt;
mod types;

pub use backend::{Backend, BackendKind, BackendProfile, ModelBackend, ModelTier};
pub use classifier::{ClassifiedError, ErrorKind};
pub use confidence::ConfidenceScorer;
pub use config::{BackendConfig, OrchestratorConfig};
pub use errors::*;
pub use orchestrator::{backend_order, GenerationOrchestrator, GENERATION_CANCELLED};
pub use types::*;
