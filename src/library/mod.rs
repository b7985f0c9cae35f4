//! Browsing published look files.
//!
//! - [`MaterialFilter`] - Include/ignore filters for library material lists
//! - [`load_template`] - Merge project search path templates into preferences
//! - [`scan_shader_files`] - Find look files under a search root

mod filter;
mod paths;

pub use filter::*;
pub use paths::*;
