//! Questionnaire backend for the VAK learning-style, emotional-intelligence and
//! representational-system assessments.

pub mod assessment;
pub mod config;
pub mod error;
pub mod export;
pub mod instruments;
pub mod telemetry;
