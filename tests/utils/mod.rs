pub mod mocks;
pub mod season_builders;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::{DelayedPlayStream, FlakyCatalog};
#[allow(unused_imports)]
pub use season_builders::{date, script, SeasonBuilder};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
