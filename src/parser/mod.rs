//! Reading and writing the yWriter 7 XML dialect.
//!
//! The reader maps an element tree onto the document model, the writer
//! patches the model back into a tree, and the postprocessor turns the
//! serialized tree into the text yWriter expects.

pub mod postprocess;
pub mod reader;
pub mod type_codec;
pub mod writer;

// Re-export commonly used functions
pub use postprocess::{postprocess_xml, postprocess_xml_file};
pub use reader::{parse_yw7, parse_yw7_str, read_novel};
pub use writer::{build_element_tree, prepare_for_write};
