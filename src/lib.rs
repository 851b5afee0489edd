//! Copy media files from an input tree into an output tree, renaming each
//! file with a token that encodes its age relative to a reference date.

pub mod args;
pub mod filename;
pub mod metadata;
pub mod processor;
