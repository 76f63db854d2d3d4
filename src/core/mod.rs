// src/core/mod.rs
pub mod engine;
pub mod index;
pub mod layout;
pub mod translation;
pub mod types;
