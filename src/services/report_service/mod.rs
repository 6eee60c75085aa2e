// src/services/report_service/mod.rs

pub mod assemble;
pub mod decorate;
pub mod package;
pub mod slide;

#[cfg(test)]
pub(crate) mod fixtures;

pub use assemble::{generate_report, kpi_lines, ReportArtifact, ReportRequest, REPORT_TITLE};
pub use decorate::clone_decorative_shapes;
pub use package::{Deck, Relationship};
pub use slide::{Geometry, Placeholder, ShapeDescriptor, ShapeKind, EMU_PER_INCH};
