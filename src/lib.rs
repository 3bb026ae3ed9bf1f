pub mod configuration;
pub mod domain;
pub mod telemetry;
