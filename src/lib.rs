// src/lib.rs — Library root for chatqa

pub mod cli;
pub mod core;
pub mod data;
pub mod evaluator;
pub mod infra;
pub mod lookup;
pub mod provider;
pub mod util;
