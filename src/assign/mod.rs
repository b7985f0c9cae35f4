//! Assignment engine.
//!
//! Applies a batch of [`ShaderRecord`]s to a pool of [`LiveObject`]s under
//! one of two policies:
//!
//! - **Forced**: the single selected shader replaces every material on every
//!   object in the pool. Name resolution is bypassed.
//! - **Pipeline**: every shader with pipeline metadata is assigned to the
//!   live objects its recorded names resolve to, replacing slot 0 only.
//!   Shaders without metadata are handed back untouched.
//!
//! Validation happens before anything is touched, so a rejected batch leaves
//! the pool exactly as it was. Once validated, a batch always runs to
//! completion; recorded names that match nothing only show up in the reports.
//!
//! The engine never logs; callers get a [`AssignOutcome`] and typed errors.

use std::collections::{BTreeSet, HashMap};

use crate::material::{LiveObject, ShaderRecord};
use crate::resolve::resolve_all;
use crate::util::{Error, Result};

/// Assignment policy for one call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssignMode {
    /// Resolve recorded targets and replace slot 0 on each match.
    #[default]
    Pipeline,
    /// Put the one selected shader on every object in the pool.
    Forced,
}

/// What one pipelined shader resolved to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Originating shader.
    pub shader_name: String,
    /// Live objects that received the shader.
    pub resolved_objects: BTreeSet<String>,
    /// Recorded names that matched no live object.
    pub unresolved_targets: BTreeSet<String>,
}

impl ResolutionReport {
    /// Whether every recorded target was found.
    pub fn is_complete(&self) -> bool {
        self.unresolved_targets.is_empty()
    }
}

/// Result of a forced assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForcedAssignment {
    /// The forced shader.
    pub shader_name: String,
    /// Objects whose material list was replaced.
    pub assigned: Vec<String>,
    /// Objects that already had the shader as their sole material.
    pub unchanged: Vec<String>,
}

/// Result of a successful [`AssignmentEngine::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignOutcome<'a> {
    /// Forced mode summary.
    Forced(ForcedAssignment),
    /// Pipeline mode reports, in shader order, and the standard shaders.
    Pipeline {
        reports: Vec<ResolutionReport>,
        standard: Vec<&'a ShaderRecord>,
    },
}

impl<'a> AssignOutcome<'a> {
    /// Pipeline reports (empty in forced mode).
    pub fn reports(&self) -> &[ResolutionReport] {
        match self {
            Self::Forced(_) => &[],
            Self::Pipeline { reports, .. } => reports,
        }
    }

    /// Shaders left for the caller because they carry no metadata.
    pub fn standard(&self) -> &[&'a ShaderRecord] {
        match self {
            Self::Forced(_) => &[],
            Self::Pipeline { standard, .. } => standard,
        }
    }
}

/// Split shaders into (pipelined, standard), keeping input order.
pub fn partition(shaders: &[ShaderRecord]) -> (Vec<&ShaderRecord>, Vec<&ShaderRecord>) {
    shaders.iter().partition(|s| s.is_pipelined())
}

/// Validated assignment of one shader batch.
#[derive(Debug)]
pub struct AssignmentEngine<'a> {
    shaders: &'a [ShaderRecord],
    mode: AssignMode,
}

impl<'a> AssignmentEngine<'a> {
    /// Validate the batch for `mode`.
    ///
    /// Fails with [`Error::NoShadersSelected`] on an empty batch and with
    /// [`Error::ConflictingAssignmentMode`] when more than one shader is
    /// selected for forced assignment.
    pub fn new(shaders: &'a [ShaderRecord], mode: AssignMode) -> Result<Self> {
        if shaders.is_empty() {
            return Err(Error::NoShadersSelected);
        }
        if mode == AssignMode::Forced && shaders.len() > 1 {
            return Err(Error::ConflictingAssignmentMode {
                count: shaders.len(),
            });
        }
        Ok(Self { shaders, mode })
    }

    /// The assignment policy.
    pub fn mode(&self) -> AssignMode {
        self.mode
    }

    /// The shader that will be forced, in forced mode.
    pub fn forced_shader(&self) -> Option<&'a ShaderRecord> {
        match self.mode {
            AssignMode::Forced => self.shaders.first(),
            AssignMode::Pipeline => None,
        }
    }

    /// Apply the batch to `pool`.
    pub fn run(&self, pool: &mut [LiveObject]) -> AssignOutcome<'a> {
        match self.forced_shader() {
            Some(shader) => AssignOutcome::Forced(force_assign(shader, pool)),
            None => self.run_pipeline(pool),
        }
    }

    fn run_pipeline(&self, pool: &mut [LiveObject]) -> AssignOutcome<'a> {
        let (pipelined, standard) = partition(self.shaders);

        // Resolve against the pool as it was before this batch.
        let mut reports = Vec::with_capacity(pipelined.len());
        for shader in &pipelined {
            let resolution = resolve_all(shader.targets(), pool);
            reports.push(ResolutionReport {
                shader_name: shader.name.clone(),
                resolved_objects: resolution.resolved,
                unresolved_targets: resolution.unresolved,
            });
        }

        let index: HashMap<String, usize> = pool
            .iter()
            .enumerate()
            .map(|(i, obj)| (obj.name.clone(), i))
            .collect();

        // Later shaders overwrite earlier ones on shared objects.
        for report in &reports {
            for name in &report.resolved_objects {
                if let Some(&i) = index.get(name) {
                    replace_primary(&mut pool[i], &report.shader_name);
                }
            }
        }

        AssignOutcome::Pipeline { reports, standard }
    }
}

/// Validate and run in one call.
pub fn assign<'a>(
    shaders: &'a [ShaderRecord],
    pool: &mut [LiveObject],
    mode: AssignMode,
) -> Result<AssignOutcome<'a>> {
    Ok(AssignmentEngine::new(shaders, mode)?.run(pool))
}

/// Replace slot 0, or add it if the object has no materials.
fn replace_primary(obj: &mut LiveObject, shader: &str) {
    match obj.materials.first_mut() {
        Some(slot) => *slot = shader.to_string(),
        None => obj.materials.push(shader.to_string()),
    }
}

fn force_assign(shader: &ShaderRecord, pool: &mut [LiveObject]) -> ForcedAssignment {
    let mut result = ForcedAssignment {
        shader_name: shader.name.clone(),
        ..Default::default()
    };

    for obj in pool.iter_mut() {
        if obj.has_sole_material(&shader.name) {
            result.unchanged.push(obj.name.clone());
        } else {
            obj.materials.clear();
            obj.materials.push(shader.name.clone());
            result.assigned.push(obj.name.clone());
        }
    }

    result
}
