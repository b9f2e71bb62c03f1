// Application layer - Dashboard use cases behind ports
pub mod channel;
pub mod dashboard_app;
pub mod gauge_simulator;
pub mod navigation;
pub mod ports;
pub mod relay_manager;
pub mod settings_service;
pub mod telemetry_display;

#[cfg(test)]
pub mod testing;
