//! MedBook Client - session-aware client for the MedBook booking platform
//!
//! This crate keeps the signed-in session of a patient, doctor or admin,
//! sends every backend call through one request pipeline, and decides where
//! the application may navigate for the current role.

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
