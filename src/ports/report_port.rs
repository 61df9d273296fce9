//! Report output port trait.

use std::io::Write;

use crate::domain::error::AtlasError;
use crate::domain::impact::ImpactSummary;
use crate::domain::recommendation::Recommendation;

/// Port for rendering a recommendation run.
pub trait ReportPort {
    fn write(
        &self,
        recommendations: &[Recommendation],
        impact: &ImpactSummary,
        out: &mut dyn Write,
    ) -> Result<(), AtlasError>;

    /// Renders into a `String`; used by tests and callers that buffer output.
    fn render(
        &self,
        recommendations: &[Recommendation],
        impact: &ImpactSummary,
    ) -> Result<String, AtlasError> {
        let mut buf = Vec::new();
        self.write(recommendations, impact, &mut buf)?;
        String::from_utf8(buf).map_err(|e| AtlasError::Report {
            reason: e.to_string(),
        })
    }
}
