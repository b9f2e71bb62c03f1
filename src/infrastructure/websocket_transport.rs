// WebSocket transport - tokio-tungstenite client with fixed-delay reconnect
use crate::application::channel::{
    ChannelError, ChannelEvent, ConnectionState, ReconnectSchedule, Transport,
};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

struct Link {
    state: ConnectionState,
    writer: Option<mpsc::UnboundedSender<String>>,
}

pub struct WebSocketTransport {
    endpoint: String,
    schedule: ReconnectSchedule,
    link: Mutex<Link>,
}

impl WebSocketTransport {
    pub fn new(endpoint: String, schedule: ReconnectSchedule) -> Self {
        Self {
            endpoint,
            schedule,
            link: Mutex::new(Link {
                state: ConnectionState::Closed,
                writer: None,
            }),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start the connect loop. Every session end (close frame, error or
    /// failed connect) reports `Closed` and schedules one new attempt after
    /// the reconnect delay. The loop stops once `events` has no receiver.
    pub fn spawn(self: &Arc<Self>, events: mpsc::Sender<ChannelEvent>) -> JoinHandle<()> {
        let transport = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                transport.run_session(&events).await;
                if events.is_closed() {
                    debug!("Event receiver dropped, stopping reconnect loop");
                    break;
                }

                let next_attempt = transport.schedule.next_attempt(Instant::now());
                debug!(delay_ms = transport.schedule.delay().as_millis() as u64, "Reconnect scheduled");
                tokio::time::sleep_until(tokio::time::Instant::from_std(next_attempt)).await;
            }
        })
    }

    async fn run_session(&self, events: &mpsc::Sender<ChannelEvent>) {
        self.set_link(ConnectionState::Connecting, None);
        info!(endpoint = %self.endpoint, "Trying to open a WebSocket connection");

        let stream = match tokio_tungstenite::connect_async(self.endpoint.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "WebSocket connect failed");
                self.close(events).await;
                return;
            }
        };

        let (mut sink, mut stream) = stream.split();
        let (writer, mut outbound) = mpsc::unbounded_channel::<String>();
        self.set_link(ConnectionState::Open, Some(writer));
        info!("Connection opened");
        let _ = events.send(ChannelEvent::Opened).await;

        loop {
            tokio::select! {
                Some(text) = outbound.recv() => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        warn!(error = %e, "WebSocket write failed");
                        break;
                    }
                }
                inbound = stream.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if events.send(ChannelEvent::Message(text)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "Close frame received");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket read failed");
                        break;
                    }
                    None => break,
                },
            }
        }

        self.close(events).await;
    }

    async fn close(&self, events: &mpsc::Sender<ChannelEvent>) {
        self.set_link(ConnectionState::Closed, None);
        info!("Connection closed");
        let _ = events.send(ChannelEvent::Closed).await;
    }

    fn set_link(&self, state: ConnectionState, writer: Option<mpsc::UnboundedSender<String>>) {
        let mut link = self.lock();
        link.state = state;
        link.writer = writer;
    }

    fn lock(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for WebSocketTransport {
    fn state(&self) -> ConnectionState {
        self.lock().state
    }

    fn transmit(&self, payload: String) -> Result<(), ChannelError> {
        let link = self.lock();
        match (&link.state, &link.writer) {
            (ConnectionState::Open, Some(writer)) => {
                writer.send(payload).map_err(|_| ChannelError::Closed)
            }
            _ => Err(ChannelError::NotConnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    async fn next_event(rx: &mut mpsc::Receiver<ChannelEvent>) -> ChannelEvent {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for channel event")
            .expect("event sender dropped")
    }

    fn transport(addr: SocketAddr, delay_ms: u64) -> Arc<WebSocketTransport> {
        Arc::new(WebSocketTransport::new(
            format!("ws://{}/ws", addr),
            ReconnectSchedule::new(Duration::from_millis(delay_ms)),
        ))
    }

    #[test]
    fn test_send_before_connect_is_rejected() {
        let transport = WebSocketTransport::new(
            "ws://127.0.0.1:9/ws".to_string(),
            ReconnectSchedule::default(),
        );

        assert_eq!(transport.state(), ConnectionState::Closed);
        assert!(matches!(
            transport.transmit("x".to_string()),
            Err(ChannelError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_exchanges_text_frames() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.send(Message::Text(r#"{"temperature":21}"#.to_string()))
                .await
                .unwrap();
            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => return text,
                    Some(Ok(_)) => continue,
                    _ => panic!("client went away"),
                }
            }
        });

        let transport = transport(addr, 2000);
        let (tx, mut rx) = mpsc::channel(16);
        let handle = transport.spawn(tx);

        assert_eq!(next_event(&mut rx).await, ChannelEvent::Opened);
        assert_eq!(transport.state(), ConnectionState::Open);
        assert_eq!(
            next_event(&mut rx).await,
            ChannelEvent::Message(r#"{"temperature":21}"#.to_string())
        );

        transport.transmit("hello device".to_string()).unwrap();
        let received = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
        assert_eq!(received, "hello device");

        handle.abort();
    }

    #[tokio::test]
    async fn test_reconnects_once_per_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                let _ = ws.close(None).await;
            }
        });

        let delay = Duration::from_millis(100);
        let transport = transport(addr, delay.as_millis() as u64);
        let (tx, mut rx) = mpsc::channel(16);
        let handle = transport.spawn(tx);

        assert_eq!(next_event(&mut rx).await, ChannelEvent::Opened);
        assert_eq!(next_event(&mut rx).await, ChannelEvent::Closed);
        let closed_at = Instant::now();
        assert_eq!(transport.state(), ConnectionState::Closed);

        assert_eq!(next_event(&mut rx).await, ChannelEvent::Opened);
        assert!(closed_at.elapsed() >= delay - Duration::from_millis(10));
        assert_eq!(next_event(&mut rx).await, ChannelEvent::Closed);

        handle.abort();
    }

    #[tokio::test]
    async fn test_failed_connect_is_treated_as_close() {
        // Grab a free port, then release it so nothing is listening
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let transport = transport(addr, 50);
        let (tx, mut rx) = mpsc::channel(16);
        let handle = transport.spawn(tx);

        assert_eq!(next_event(&mut rx).await, ChannelEvent::Closed);
        assert_eq!(next_event(&mut rx).await, ChannelEvent::Closed);
        assert!(matches!(
            transport.transmit("x".to_string()),
            Err(ChannelError::NotConnected)
        ));

        handle.abort();
    }
}
