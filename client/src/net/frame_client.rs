//! WebSocket frame client for per-project streaming.
//!
//! The workspace opens one socket per mounted project with [`connect`] and
//! closes it with [`disconnect`]. Every decoded frame goes through a
//! thread-local [`Dispatcher`]; features subscribe to the frame kinds they care
//! about with [`subscribe`] and release them with [`unsubscribe`], so the chat
//! panel and the workspace read the same socket without knowing about each
//! other.
//!
//! Socket code is gated behind `#[cfg(feature = "hydrate")]` since it requires
//! a browser environment. Subscription and delivery are plain Rust.
//!
//! Each socket delivers through its own [`DeliveryGate`]. [`disconnect`]
//! closes the gate before the socket, so frames the old socket had already
//! buffered never reach listeners registered by the next workspace.
//!
//! ERROR HANDLING
//! ==============
//! Decode and transport failures are logged; a dropped socket flips the
//! status callback to `Disconnected`. There is no automatic reconnect.
//! `Connected` is only reported once the backend's `connection` greeting
//! arrives, which the workspace handles as a frame.

#[cfg(test)]
#[path = "frame_client_test.rs"]
mod frame_client_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use frames::dispatch::{Dispatcher, ListenerId, dispatch_shared};
use frames::{CodecError, Frame, FrameKind};

#[cfg(feature = "hydrate")]
use crate::state::workspace::ConnectionStatus;

thread_local! {
    static DISPATCHER: RefCell<Dispatcher> = RefCell::new(Dispatcher::new());
}

/// Socket URL for a project: `http` -> `ws`, `https` -> `wss`, path
/// `/ws/{project_id}`.
pub fn ws_url(base_url: &str, project_id: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_owned()
    } else {
        format!("ws://{base}")
    };
    format!("{base}/ws/{project_id}")
}

/// Register `listener` for every kind in `kinds`.
pub fn subscribe(kinds: &[FrameKind], listener: impl Fn(&Frame) + 'static) -> ListenerId {
    DISPATCHER.with(|d| d.borrow_mut().on_each(kinds, listener))
}

/// Register a listener for frames no other listener handles.
pub fn subscribe_unhandled(listener: impl Fn(&Frame) + 'static) -> ListenerId {
    DISPATCHER.with(|d| d.borrow_mut().on_unhandled(listener))
}

/// Remove a registration. Returns `false` if `id` was not registered.
pub fn unsubscribe(id: ListenerId) -> bool {
    DISPATCHER.with(|d| d.borrow_mut().off(id))
}

/// Deliver a decoded frame to its listeners.
pub fn deliver(frame: &Frame) -> usize {
    DISPATCHER.with(|d| dispatch_shared(d, frame))
}

/// Decode one websocket text message and deliver it.
///
/// # Errors
///
/// Returns the [`CodecError`] when the text is not a valid frame.
pub fn deliver_text(text: &str) -> Result<usize, CodecError> {
    let frame = frames::decode_frame(text)?;
    Ok(deliver(&frame))
}

/// Per-socket switch in front of [`deliver_text`]. Once closed it drops
/// every later frame.
#[derive(Clone, Debug)]
pub struct DeliveryGate(Rc<Cell<bool>>);

impl Default for DeliveryGate {
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl DeliveryGate {
    pub fn close(&self) {
        self.0.set(false);
    }

    pub fn is_open(&self) -> bool {
        self.0.get()
    }

    /// Decode and deliver `text` while the gate is open. `Ok(None)` once
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns the [`CodecError`] when the text is not a valid frame.
    pub fn deliver_text(&self, text: &str) -> Result<Option<usize>, CodecError> {
        if !self.is_open() {
            return Ok(None);
        }
        deliver_text(text).map(Some)
    }
}

/// Handle returned by [`connect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

#[cfg(feature = "hydrate")]
thread_local! {
    static NEXT_CONNECTION_ID: std::cell::Cell<u64> = const { std::cell::Cell::new(0) };
    static CONNECTIONS: RefCell<std::collections::HashMap<u64, LiveConnection>> =
        RefCell::new(std::collections::HashMap::new());
}

#[cfg(feature = "hydrate")]
struct LiveConnection {
    gate: DeliveryGate,
    close: futures::channel::oneshot::Sender<()>,
}

/// Open the socket for `project_id` and pump its frames into the dispatcher
/// until [`disconnect`] or the server closes it.
#[cfg(feature = "hydrate")]
pub fn connect(
    base_url: &str,
    project_id: &str,
    on_status: impl Fn(ConnectionStatus) + 'static,
) -> ConnectionId {
    let id = NEXT_CONNECTION_ID.with(|next| {
        let id = next.get() + 1;
        next.set(id);
        id
    });
    let (close_tx, close_rx) = futures::channel::oneshot::channel::<()>();
    let gate = DeliveryGate::default();
    CONNECTIONS.with(|c| {
        c.borrow_mut().insert(
            id,
            LiveConnection {
                gate: gate.clone(),
                close: close_tx,
            },
        )
    });

    let url = ws_url(base_url, project_id);
    leptos::task::spawn_local(async move {
        on_status(ConnectionStatus::Connecting);
        match run_connection(&url, &gate, close_rx).await {
            Ok(()) => leptos::logging::log!("WS disconnected cleanly"),
            Err(e) => leptos::logging::warn!("WS error: {e}"),
        }
        gate.close();
        CONNECTIONS.with(|c| c.borrow_mut().remove(&id));
        on_status(ConnectionStatus::Disconnected);
    });

    ConnectionId(id)
}

/// Close a socket opened by [`connect`]. No-op if it already ended.
#[cfg(feature = "hydrate")]
pub fn disconnect(id: ConnectionId) {
    if let Some(live) = CONNECTIONS.with(|c| c.borrow_mut().remove(&id.0)) {
        live.gate.close();
        let _ = live.close.send(());
    }
}

/// Run one socket until it closes, errors, `close_rx` fires, or `gate` closes.
#[cfg(feature = "hydrate")]
async fn run_connection(
    url: &str,
    gate: &DeliveryGate,
    close_rx: futures::channel::oneshot::Receiver<()>,
) -> Result<(), String> {
    use futures::future::Either;
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Text(text)) => match gate.deliver_text(&text) {
                    Ok(Some(_)) => {}
                    Ok(None) => break,
                    Err(e) => leptos::logging::warn!("WS frame dropped: {e}"),
                },
                Ok(Message::Bytes(_)) => {}
                Err(e) => return Err(e.to_string()),
            }
        }
        Ok(())
    };

    let result = match futures::future::select(Box::pin(recv_task), close_rx).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Ok(()),
    };
    if !gate.is_open() {
        let _ = ws_write.close().await;
    }
    result
}
