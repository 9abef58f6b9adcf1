pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod genotype;
pub mod haplogroup;
pub mod reference;
pub mod utils;

pub use error::{SnappyError, SnappyResult};
pub use haplogroup::analyze_haplogroups;
