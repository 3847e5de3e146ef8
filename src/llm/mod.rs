pub mod gemini;
pub mod media;

pub use gemini::{
    FailureCategory, GenerationClient, GenerationError, GenerationRequest, GenerationResult,
};
