//! Material module - shader records and assignable objects.
//!
//! This module provides the value types the assignment engine works on,
//! decoupled from any host scene representation.
//!
//! ## Key Concepts
//!
//! - **Shader Record**: A published material plus its recorded target objects
//! - **Live Object**: An object in the destination scene with ordered material slots
//! - **Material Definition**: The persisted form of a material in a document
//!
//! ## Example
//!
//! ```
//! use look_assigner::material::{LiveObject, ShaderRecord};
//!
//! let skin = ShaderRecord::from_raw_targets("skin_MAT", "Torso, Head");
//! let torso = LiveObject::new("charA:Torso.002");
//! assert!(skin.is_pipelined());
//! assert!(torso.primary_material().is_none());
//! ```

mod schema;

pub use schema::*;
