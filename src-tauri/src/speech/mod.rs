//! Speech I/O: spoken answers in, read-aloud feedback out.

pub mod stt;
pub mod tts;

pub use stt::{transcribe, Transcription};
pub use tts::{speak_to_file, synthesize};
