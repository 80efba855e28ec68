pub mod config;
pub mod enrich;
pub mod extract;

pub use enrich::run_enrich;
pub use extract::run_extract;
