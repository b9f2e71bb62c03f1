// Domain layer - Dashboard, telemetry and relay models
pub mod command;
pub mod dashboard;
pub mod relay;
pub mod telemetry;
