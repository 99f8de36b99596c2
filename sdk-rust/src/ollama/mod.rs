mod api;
mod model;

pub use model::{OllamaModel, OllamaModelOptions, OLLAMA_BASE_URL};
