// Main entry point - Dependency injection and the dashboard event loop
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::channel::{endpoint_for_host, Channel};
use crate::application::dashboard_app::{AppEvent, DashboardApp};
use crate::application::ports::{Clock, Notifier};
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::system_clock::SystemClock;
use crate::infrastructure::websocket_transport::WebSocketTransport;
use crate::presentation::console::{dispatch_line, Flow};
use crate::presentation::terminal::{StderrNotifier, TerminalSurface};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, stdout belongs to the dashboard screen)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create transport (infrastructure layer)
    let endpoint = endpoint_for_host(&config.device.host);
    let transport = Arc::new(WebSocketTransport::new(
        endpoint,
        config.channel.reconnect_schedule(),
    ));
    let (event_tx, mut event_rx) = mpsc::channel(100);
    let transport_task = transport.spawn(event_tx);

    // Create the controller (application layer)
    let notifier: Arc<dyn Notifier> = Arc::new(StderrNotifier);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let channel = Channel::new(transport.clone(), notifier.clone());
    let mut app = DashboardApp::new(
        TerminalSurface::stdout(),
        channel,
        notifier,
        clock,
        config.telemetry.max_points,
        Box::new(StdRng::from_entropy()),
    );
    app.start();
    info!(endpoint = %transport.endpoint(), "Dashboard started, type `help` for commands");

    let mut gauge_timer = tokio::time::interval(config.gauges.refresh_interval());
    gauge_timer.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    // Every event is handled to completion before the next one is taken
    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => app.handle(AppEvent::Channel(event)),
            _ = gauge_timer.tick() => app.handle(AppEvent::GaugeTick),
            line = lines.next_line() => {
                let line = line.unwrap_or_else(|e| {
                    warn!(error = %e, "Failed to read console input");
                    None
                });
                if dispatch_line(&mut app, line.as_deref(), &mut stdout) == Flow::Quit {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down");
    transport_task.abort();

    Ok(())
}
