//! Reporting sinks.
//!
//! The assignment core returns structured results and never logs. Whoever
//! drives it hands those results to a [`ReportSink`], which decides how the
//! artist gets to see them.

use crate::assign::{ForcedAssignment, ResolutionReport};
use crate::material::ShaderRecord;
use crate::util::Error;

/// Receives assignment results and user-facing warnings.
pub trait ReportSink {
    /// A non-fatal problem the artist should see.
    fn warning(&mut self, warning: &Error);

    /// Informational progress message.
    fn info(&mut self, _message: &str) {}

    /// One pipelined shader's resolution.
    fn resolution(&mut self, report: &ResolutionReport);

    /// Summary of a forced assignment.
    fn forced(&mut self, result: &ForcedAssignment);

    /// Shaders that carried no pipeline metadata and were not assigned.
    fn standard(&mut self, shaders: &[&ShaderRecord]);
}

/// Sink that forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn warning(&mut self, warning: &Error) {
        tracing::warn!("{}", warning);
    }

    fn info(&mut self, message: &str) {
        tracing::info!("{}", message);
    }

    fn resolution(&mut self, report: &ResolutionReport) {
        tracing::info!(
            shader = %report.shader_name,
            resolved = report.resolved_objects.len(),
            unresolved = report.unresolved_targets.len(),
            "shader assigned"
        );
        for name in &report.resolved_objects {
            tracing::debug!("Shader {} assigned to : {}", report.shader_name, name);
        }
    }

    fn forced(&mut self, result: &ForcedAssignment) {
        tracing::info!(
            shader = %result.shader_name,
            assigned = result.assigned.len(),
            unchanged = result.unchanged.len(),
            "shader force assigned"
        );
    }

    fn standard(&mut self, shaders: &[&ShaderRecord]) {
        for shader in shaders {
            tracing::debug!("{}: no pipeline data attribute found", shader.name);
        }
    }
}

/// Sink that keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    /// Warning messages, in order.
    pub warnings: Vec<String>,
    /// Info messages, in order.
    pub messages: Vec<String>,
    /// Pipeline resolutions, in order.
    pub reports: Vec<ResolutionReport>,
    /// Forced assignment summaries.
    pub forced: Vec<ForcedAssignment>,
    /// Names of standard shaders.
    pub standard: Vec<String>,
}

impl ReportSink for CollectingSink {
    fn warning(&mut self, warning: &Error) {
        self.warnings.push(warning.to_string());
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn resolution(&mut self, report: &ResolutionReport) {
        self.reports.push(report.clone());
    }

    fn forced(&mut self, result: &ForcedAssignment) {
        self.forced.push(result.clone());
    }

    fn standard(&mut self, shaders: &[&ShaderRecord]) {
        self.standard.extend(shaders.iter().map(|s| s.name.clone()));
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn warning(&mut self, warning: &Error) {
        (**self).warning(warning)
    }

    fn info(&mut self, message: &str) {
        (**self).info(message)
    }

    fn resolution(&mut self, report: &ResolutionReport) {
        (**self).resolution(report)
    }

    fn forced(&mut self, result: &ForcedAssignment) {
        (**self).forced(result)
    }

    fn standard(&mut self, shaders: &[&ShaderRecord]) {
        (**self).standard(shaders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let mut sink = CollectingSink::default();
        sink.warning(&Error::NoShadersSelected);
        sink.info("loaded");
        let shader = ShaderRecord::standard("floor_MAT");
        sink.standard(&[&shader]);

        assert_eq!(sink.warnings, ["No shaders selected for assignment"]);
        assert_eq!(sink.messages, ["loaded"]);
        assert_eq!(sink.standard, ["floor_MAT"]);
    }

    #[test]
    fn test_sink_by_reference() {
        fn report(mut sink: impl ReportSink) {
            sink.warning(&Error::ShaderNotFound("x".into()));
        }

        let mut sink = CollectingSink::default();
        report(&mut sink);
        assert_eq!(sink.warnings.len(), 1);
    }
}
