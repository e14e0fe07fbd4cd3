mod traits;
mod gemini;
pub mod discovery;
pub mod translate;

pub use traits::*;
pub use gemini::GeminiClient;
pub use discovery::{alternate_model_name, model_resource, ModelInfo};
pub use translate::build_contents;
