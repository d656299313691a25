//! Model-call façade: prompts, provider calls and response parsing for
//! every tutor operation that needs a generative model.

pub mod image_prep;
pub mod json;
pub mod prompts;
pub mod provider;
pub mod tutor;
pub mod types;

pub use image_prep::prepare_image;
pub use provider::{AiSettings, Provider};
pub use tutor::{analyze_image, evaluate_answer, generate_questions, summarize, tutor_reply};
pub use types::*;
