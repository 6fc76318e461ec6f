//! yWriter 7 project codec
//!
//! This library reads `.yw7` project files into a document model and writes
//! the model back, patching the original XML so that elements it does not
//! know about survive the round trip.

// Module declarations
pub mod config;
pub mod constants;
pub mod file;
pub mod models;
pub mod parser;
pub mod xml;

pub use config::CodecConfig;
pub use file::Yw7File;
pub use models::{Chapter, Character, ContentType, Novel, ProjectNote, Scene, WorldElement};
