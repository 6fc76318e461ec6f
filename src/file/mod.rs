//! Project files on disk.
//!
//! [`Yw7File`] ties the reader, writer and postprocessor to a path; the
//! [`guard`] module holds the lock and backup conventions yWriter relies on.

pub mod guard;
pub mod yw7_file;

pub use yw7_file::Yw7File;
