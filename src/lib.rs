//! # Look Assigner
//!
//! Publish shaders ("looks") stamped with the names of the objects they were
//! applied to, then re-assign them onto matching objects in another scene,
//! tolerating the renaming that scene merging introduces.
//!
//! ## Modules
//!
//! - [`util`] - Errors
//! - [`core`] - Material metadata and the pipeline target encoding
//! - [`material`] - Shader records and assignable objects
//! - [`resolve`] - Recorded-name to live-name matching
//! - [`assign`] - The assignment engine (forced and pipeline modes)
//! - [`scene`] - Scene and shader library documents, object pools
//! - [`publish`] - Stamping pipeline metadata from a dressed scene
//! - [`library`] - Material filters, search paths, look file discovery
//! - [`config`] - Persistent preferences
//! - [`report`] - Report sinks
//! - [`session`] - Caller layer tying the above together
//!
//! ## Example
//!
//! ```
//! use look_assigner::prelude::*;
//!
//! let shaders = vec![ShaderRecord::from_raw_targets("skin_MAT", "Torso, Head")];
//! let mut pool = vec![
//!     LiveObject::with_materials("charA:Torso.002", &["old_MAT"]),
//!     LiveObject::new("Hat"),
//! ];
//!
//! let outcome = assign(&shaders, &mut pool, AssignMode::Pipeline)?;
//! let report = &outcome.reports()[0];
//! assert!(report.resolved_objects.contains("charA:Torso.002"));
//! assert!(report.unresolved_targets.contains("Head"));
//! assert_eq!(pool[0].materials, ["skin_MAT"]);
//! # Ok::<(), look_assigner::Error>(())
//! ```

pub mod util;
pub mod core;
pub mod material;
pub mod resolve;
pub mod assign;
pub mod scene;
pub mod publish;
pub mod library;
pub mod config;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::core::{MetaData, PIPELINE_ATTRIBUTE};
    pub use crate::material::{LiveObject, MaterialDef, ShaderRecord};
    pub use crate::resolve::{resolve, NameResolver};
    pub use crate::assign::{assign, AssignMode, AssignOutcome, AssignmentEngine, ResolutionReport};
    pub use crate::scene::{ObjectKind, SceneDocument, SceneObject, ShaderLibrary};
    pub use crate::config::Preferences;
    pub use crate::report::{CollectingSink, ReportSink, TracingSink};
    pub use crate::session::{AssignRequest, LookSession};
}
