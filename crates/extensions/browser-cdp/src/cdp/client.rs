//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::error::CdpError;
use super::protocol::{CdpEvent, CdpRequest, CommandFault, Incoming, NewTarget, RawMessage, VersionInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type Reply = Result<Value, CommandFault>;

/// Per-command reply timeout.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Session id browser-level events are routed under.
pub const BROWSER_SESSION: &str = "";

/// Event senders keyed by session id.
#[derive(Default)]
struct Routes {
    sessions: RwLock<HashMap<String, mpsc::UnboundedSender<CdpEvent>>>,
}

impl Routes {
    fn open(&self, session_id: &str) -> mpsc::UnboundedReceiver<CdpEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.write().insert(session_id.to_string(), tx);
        rx
    }

    fn close(&self, session_id: &str) {
        self.sessions.write().remove(session_id);
    }

    fn deliver(&self, event: CdpEvent) {
        let key = event.session_id.clone().unwrap_or_default();
        let sessions = self.sessions.read();
        match sessions.get(&key) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    trace!("Receiver for session {:?} dropped", key);
                }
            }
            None => trace!("No route for {} on session {:?}", event.method, key),
        }
    }
}

/// Command channel shared by the client and every page session on it.
pub(crate) struct Connection {
    sink: tokio::sync::Mutex<WsSink>,
    next_id: AtomicU64,
    in_flight: Mutex<HashMap<u64, oneshot::Sender<Reply>>>,
}

impl Connection {
    /// Send a command and wait for its reply.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let text = serde_json::to_string(&CdpRequest {
            id,
            method,
            params,
            session_id,
        })?;
        trace!("-> {}", text);

        let (tx, rx) = oneshot::channel();
        self.in_flight.lock().insert(id, tx);

        let sent = self.sink.lock().await.send(Message::Text(text.into())).await;
        if let Err(e) = sent {
            self.in_flight.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(fault))) => Err(CdpError::Command {
                method: method.to_string(),
                code: fault.code,
                message: fault.message,
            }),
            Ok(Err(_)) => Err(CdpError::ConnectionClosed),
            Err(_) => {
                self.in_flight.lock().remove(&id);
                Err(CdpError::NoReply {
                    method: method.to_string(),
                    timeout: CALL_TIMEOUT,
                })
            }
        }
    }

    fn complete(&self, id: u64, reply: Reply) {
        match self.in_flight.lock().remove(&id) {
            Some(tx) => {
                let _ = tx.send(reply);
            }
            None => trace!("Reply {} arrived after its caller gave up", id),
        }
    }
}

/// Connection to one Chrome instance. Page sessions are multiplexed on the
/// browser socket.
pub struct CdpClient {
    http_endpoint: String,
    conn: Arc<Connection>,
    routes: Arc<Routes>,
    reader: JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome's DevTools endpoint (e.g. `http://localhost:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let unreachable = |e: reqwest::Error| CdpError::EndpointUnreachable {
            endpoint: http_endpoint.clone(),
            reason: e.to_string(),
        };

        let version: VersionInfo = reqwest::get(format!("{}/json/version", http_endpoint))
            .await
            .map_err(unreachable)?
            .json()
            .await
            .map_err(unreachable)?;
        debug!("DevTools endpoint is {}", version.browser);

        let (socket, _) = tokio_tungstenite::connect_async(version.browser_ws_url.as_str()).await?;
        let (sink, source) = socket.split();

        let conn = Arc::new(Connection {
            sink: tokio::sync::Mutex::new(sink),
            next_id: AtomicU64::new(1),
            in_flight: Mutex::new(HashMap::new()),
        });
        let routes = Arc::new(Routes::default());
        let reader = tokio::spawn(read_loop(source, conn.clone(), routes.clone()));

        debug!("Attached to browser socket {}", version.browser_ws_url);
        Ok(Self {
            http_endpoint,
            conn,
            routes,
            reader,
        })
    }

    /// Send a browser-level command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.conn.call(method, params, None).await
    }

    /// Browser-level events (target lifecycle) from now on.
    pub fn browser_events(&self) -> mpsc::UnboundedReceiver<CdpEvent> {
        self.routes.open(BROWSER_SESSION)
    }

    /// Ask Chrome to report target creation and destruction.
    pub async fn discover_targets(&self) -> Result<(), CdpError> {
        self.call("Target.setDiscoverTargets", Some(json!({"discover": true})))
            .await?;
        Ok(())
    }

    /// Stop routing events for a session.
    pub fn release_session(&self, session_id: &str) {
        self.routes.close(session_id);
    }

    /// Open a blank tab and attach a session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        // /json/new only accepts PUT on current Chrome.
        let target: NewTarget = reqwest::Client::new()
            .put(format!("{}/json/new?about:blank", self.http_endpoint))
            .send()
            .await?
            .json()
            .await?;
        debug!("Created target {} ({})", target.id, target.url);

        self.attach_page(&target.id).await
    }

    /// Attach a flattened session to an existing page target.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let reply = self
            .call(
                "Target.attachToTarget",
                Some(json!({"targetId": target_id, "flatten": true})),
            )
            .await?;
        let session_id = reply["sessionId"]
            .as_str()
            .ok_or(CdpError::MissingField {
                method: "Target.attachToTarget",
                field: "sessionId",
            })?
            .to_string();

        let events = self.routes.open(&session_id);
        let session = PageSession::new(target_id.to_string(), session_id, self.conn.clone(), events);
        if let Err(e) = session.enable_domains().await {
            self.routes.close(session.session_id());
            return Err(e);
        }
        Ok(session)
    }

    /// Close a page target.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Reads the socket until it closes, completing replies and routing events.
async fn read_loop(mut source: WsSource, conn: Arc<Connection>, routes: Arc<Routes>) {
    while let Some(frame) = source.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("Browser socket error: {}", e);
                break;
            }
        };
        trace!("<- {}", text.as_str());

        match serde_json::from_str::<RawMessage>(text.as_str()).map(RawMessage::classify) {
            Ok(Incoming::Reply { id, outcome }) => conn.complete(id, outcome),
            Ok(Incoming::Event(event)) => routes.deliver(event),
            Ok(Incoming::Unknown) => {}
            Err(e) => warn!("Undecodable CDP message: {}", e),
        }
    }

    debug!("Browser socket closed");
    // Dropping the senders ends every session's event stream.
    routes.sessions.write().clear();
    // Dropping the reply senders fails every in-flight call.
    conn.in_flight.lock().clear();
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
