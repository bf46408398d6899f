//! Affordability and equity-eligibility evaluation engine for Swiss-style
//! mortgage dossiers.
//!
//! The canonical rule set the feasibility dialog, financing-apport screen,
//! quick simulator, and dossier-detail view all converge to: one pure
//! evaluation pipeline plus the intake, persistence, and HTTP scaffolding
//! around it.

pub mod config;
pub mod dossier;
pub mod error;
pub mod telemetry;
