//! Look session - drives publishing and assignment for a caller.
//!
//! The session is the layer between a user-facing front end and the pure
//! assignment core. It loads shader records with the configured attribute
//! name, builds the object pool, runs the engine and routes every result to
//! the injected [`ReportSink`].

use tracing::{debug, info_span};

use crate::assign::{AssignMode, AssignOutcome, AssignmentEngine};
use crate::config::Preferences;
use crate::library::MaterialFilter;
use crate::material::ShaderRecord;
use crate::publish::{publish_scene, PublishOutcome};
use crate::report::ReportSink;
use crate::scene::{PoolFilter, SceneDocument, ShaderLibrary};
use crate::util::{Error, Result};

/// What the artist asked to assign.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignRequest {
    /// Library materials marked for use.
    pub shaders: Vec<String>,
    /// Force the single marked shader onto every pool object.
    pub force: bool,
    /// Restrict the pool to the current selection.
    pub selected_only: bool,
}

impl AssignRequest {
    /// Pipeline assignment of `shaders` over the whole scene.
    pub fn pipeline<S: AsRef<str>>(shaders: &[S]) -> Self {
        Self {
            shaders: shaders.iter().map(|s| s.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    /// Forced assignment of `shader`.
    pub fn forced(shader: &str) -> Self {
        Self {
            shaders: vec![shader.to_string()],
            force: true,
            ..Default::default()
        }
    }

    /// Restrict to selected objects.
    pub fn selected_only(mut self) -> Self {
        self.selected_only = true;
        self
    }

    fn mode(&self) -> AssignMode {
        if self.force {
            AssignMode::Forced
        } else {
            AssignMode::Pipeline
        }
    }
}

/// Summary of a session assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignSummary {
    /// Shaders imported into the scene.
    pub imported: Vec<String>,
    /// Requested shaders the library does not define.
    pub missing: Vec<String>,
    /// Pool size.
    pub pool_size: usize,
    /// Objects that received a shader.
    pub assigned_objects: usize,
    /// Recorded names that resolved to nothing, over all shaders.
    pub unresolved_targets: usize,
    /// Shaders without pipeline metadata.
    pub standard: Vec<String>,
}

/// Publishing and assignment with shared preferences and reporting.
pub struct LookSession<S: ReportSink> {
    prefs: Preferences,
    sink: S,
}

impl<S: ReportSink> LookSession<S> {
    /// Create a session.
    pub fn new(prefs: Preferences, sink: S) -> Self {
        Self { prefs, sink }
    }

    /// Session preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// The report sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the session and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Library materials that pass the configured filters.
    pub fn list_materials(&mut self, library: &ShaderLibrary, bypass_filters: bool) -> Vec<String> {
        let filter = MaterialFilter::from_preferences(&self.prefs, bypass_filters);
        let outcome = filter.apply(&library.material_names());
        debug!(
            "Filtering to include materials containing '{}', ignoring materials named: {}",
            self.prefs.material_filter, self.prefs.ignore_filter
        );
        if outcome.filtered > 0 {
            self.sink.info(&format!("{} materials hidden by filters", outcome.filtered));
        }
        outcome.accepted
    }

    /// Stamp pipeline metadata on `scene` and export its looks.
    pub fn publish(&mut self, scene: &mut SceneDocument) -> PublishOutcome {
        let _span = info_span!("publish").entered();
        let outcome = publish_scene(scene, &self.prefs.pipeline_attribute_name);

        for name in &outcome.ambiguous {
            self.sink.warning(&Error::AmbiguousSeparator { name: name.clone() });
        }
        for name in &outcome.undefined {
            self.sink.warning(&Error::ShaderNotFound(name.clone()));
        }
        self.sink.info(&format!(
            "Published {} shaders with pipeline data",
            outcome.library.materials.len()
        ));

        outcome
    }

    /// Import the requested shaders from `library` and assign them in `scene`.
    ///
    /// Validation failures are reported to the sink and returned; the scene
    /// is untouched in that case.
    pub fn assign(
        &mut self,
        scene: &mut SceneDocument,
        library: &ShaderLibrary,
        request: &AssignRequest,
    ) -> Result<AssignSummary> {
        let _span = info_span!("assign", shaders = request.shaders.len(), force = request.force).entered();

        if let Err(err) = validate(request) {
            self.sink.warning(&err);
            return Err(err);
        }
        debug!("Material load buffer: {:?}", request.shaders);

        let (imported, missing) = scene.import_materials(library, &request.shaders);
        for name in &missing {
            self.sink.warning(&Error::ShaderNotFound(name.clone()));
        }

        let attribute = &self.prefs.pipeline_attribute_name;
        let records: Vec<ShaderRecord> = imported
            .iter()
            .map(|mat| ShaderRecord::from_material(mat, attribute))
            .collect();
        for record in &records {
            match &record.pipeline_targets {
                Some(targets) => debug!("Pipeline data {} {:?}", record.name, targets),
                None => debug!("Pipeline data {}: none", record.name),
            }
        }

        let mut pool = scene.extract_pool(&PoolFilter::meshes(request.selected_only));
        debug!("Viable object buffer: {:?}", pool.names());

        let mut summary = AssignSummary {
            imported: records.iter().map(|r| r.name.clone()).collect(),
            missing,
            pool_size: pool.len(),
            ..Default::default()
        };

        let result = AssignmentEngine::new(&records, request.mode())
            .map(|engine| engine.run(&mut pool.objects));
        scene.restore_pool(pool);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                if err.is_warning() {
                    self.sink.warning(&err);
                }
                return Err(err);
            }
        };

        match &outcome {
            AssignOutcome::Forced(forced) => {
                summary.assigned_objects = forced.assigned.len();
                self.sink.forced(forced);
            }
            AssignOutcome::Pipeline { reports, standard } => {
                for report in reports {
                    self.sink.resolution(report);
                    for target in &report.unresolved_targets {
                        self.sink.warning(&Error::UnresolvedTarget {
                            shader: report.shader_name.clone(),
                            target: target.clone(),
                        });
                    }
                    summary.unresolved_targets += report.unresolved_targets.len();
                }
                summary.assigned_objects = reports
                    .iter()
                    .flat_map(|r| r.resolved_objects.iter())
                    .collect::<std::collections::HashSet<_>>()
                    .len();
                if !standard.is_empty() {
                    self.sink.standard(standard);
                }
                summary.standard = standard.iter().map(|s| s.name.clone()).collect();
            }
        }

        Ok(summary)
    }
}

/// Request-level checks, run before anything is imported.
fn validate(request: &AssignRequest) -> Result<()> {
    if request.shaders.is_empty() {
        return Err(Error::NoShadersSelected);
    }
    if request.force && request.shaders.len() > 1 {
        return Err(Error::ConflictingAssignmentMode {
            count: request.shaders.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_request() {
        assert!(matches!(
            validate(&AssignRequest::default()),
            Err(Error::NoShadersSelected)
        ));

        let request = AssignRequest {
            shaders: vec!["a".into(), "b".into()],
            force: true,
            selected_only: false,
        };
        assert!(matches!(
            validate(&request),
            Err(Error::ConflictingAssignmentMode { count: 2 })
        ));

        assert!(validate(&AssignRequest::forced("a")).is_ok());
        assert!(validate(&AssignRequest::pipeline(&["a", "b"])).is_ok());
    }

    #[test]
    fn test_request_mode() {
        assert_eq!(AssignRequest::forced("a").mode(), AssignMode::Forced);
        assert_eq!(AssignRequest::pipeline(&["a"]).mode(), AssignMode::Pipeline);
        assert!(AssignRequest::pipeline(&["a"]).selected_only().selected_only);
    }
}
