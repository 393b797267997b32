// src/core/mod.rs — Batch evaluation engine

pub mod checkpoint;
pub mod escalation;
pub mod orchestrator;
pub mod projector;
pub mod types;
