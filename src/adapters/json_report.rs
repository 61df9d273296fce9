//! JSON report adapter implementing ReportPort.

use std::io::Write;

use serde::Serialize;

use crate::domain::error::AtlasError;
use crate::domain::impact::ImpactSummary;
use crate::domain::recommendation::Recommendation;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct JsonReport<'a> {
    recommendations: &'a [Recommendation],
    impact: &'a ImpactSummary,
}

#[derive(Default)]
pub struct JsonReportAdapter {
    pub pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        recommendations: &[Recommendation],
        impact: &ImpactSummary,
        out: &mut dyn Write,
    ) -> Result<(), AtlasError> {
        let report = JsonReport {
            recommendations,
            impact,
        };
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &report)
        } else {
            serde_json::to_writer(&mut *out, &report)
        };
        result.map_err(|e| AtlasError::Report {
            reason: format!("failed to encode JSON: {e}"),
        })?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
