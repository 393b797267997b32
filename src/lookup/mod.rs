// src/lookup/mod.rs — Reply retrieval and product search

pub mod catalog;
pub mod embeddings;
pub mod retrieval;
