pub mod config;
pub mod filesystem;
pub mod front_matter;
pub mod generate;
pub mod migrate;
pub mod refresh;
pub mod runtime;
pub mod scan;
