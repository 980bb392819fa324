//! Bioinformatics functionality built on the engines

pub mod seq;
pub mod annotate;
