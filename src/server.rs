use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
    task::JoinHandle,
};

use crate::{
    api,
    error::Result,
    spotify::client::{AuthenticatedClient, TokenExchange},
    warning,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Single-use sender delivering the attempt's result to the waiting caller.
pub type Handoff = oneshot::Sender<Result<AuthenticatedClient>>;

/// Everything the callback handler needs for one authorization attempt.
pub struct CallbackState {
    pub expected_state: String,
    pub exchange: TokenExchange,
    handoff: Mutex<Option<Handoff>>,
}

impl CallbackState {
    pub fn new(expected_state: String, exchange: TokenExchange, handoff: Handoff) -> Self {
        CallbackState {
            expected_state,
            exchange,
            handoff: Mutex::new(Some(handoff)),
        }
    }

    /// Takes the handoff; only the first caller gets it.
    pub async fn take_handoff(&self) -> Option<Handoff> {
        self.handoff.lock().await.take()
    }
}

/// Short-lived listener for the OAuth redirect.
///
/// The port stays bound from `bind` until `shutdown` or drop, whichever
/// comes first.
pub struct CallbackServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CallbackServer {
    /// Binds `127.0.0.1:<port>` and starts serving `callback_path` plus a
    /// catch-all root on a background task.
    pub async fn bind(port: u16, callback_path: &str, state: CallbackState) -> Result<Self> {
        let app = Router::new()
            .route(callback_path, get(api::callback))
            .fallback(api::root)
            .with_state(Arc::new(state));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port))).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                warning!("Callback server stopped with error: {}", e);
            }
        });

        Ok(CallbackServer {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops the listener and waits for the port to be released.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
                task.abort();
                let _ = task.await;
            }
        }
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
