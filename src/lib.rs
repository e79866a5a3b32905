//! MindMorph - Personality assessment client
//!
//! Talks to the MindMorph prediction backend: keeps the user's session,
//! drives the questionnaire, free-text and Twitter assessments, fetches
//! results and history, and exports reports as PDF, HTML or Markdown.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
