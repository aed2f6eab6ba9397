pub mod analyzer;
pub mod cli;
pub mod config;
pub mod model;
pub mod patch;
pub mod scan;
pub mod util;
