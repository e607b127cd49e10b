//! HTTP listener lifecycle.
//!
//! On shutdown the listener stops accepting and in-flight requests get
//! `SHUTDOWN_GRACE` to finish; anything still running after that is dropped.

use crate::config::HttpServerConfig;
use axum::Router;
use log::{info, warn};
use std::future::Future;
use std::io;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;
use tokio::time::Duration;

pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// HTTP server for the students API.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, router: Router) -> Self {
        Self { config, router }
    }

    /// Runs until SIGINT/SIGTERM, then drains with the grace period.
    pub async fn run(self) -> io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs until `shutdown` resolves, then drains with the grace period.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> io::Result<()> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
        let listener = TcpListener::bind(addr).await?;
        serve_with_grace(listener, self.router, shutdown, SHUTDOWN_GRACE).await
    }
}

/// Serves `router` on `listener` until `shutdown` resolves, then waits at most
/// `grace` for in-flight requests.
pub async fn serve_with_grace(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()>,
    grace: Duration,
) -> io::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("event=server_start module=server status=ok address={local_addr}");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = stop_rx.await;
    });
    let mut server_task = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server_task => {
            // Listener died before any shutdown request.
            return flatten(result);
        }
        _ = shutdown => {}
    }

    info!(
        "event=server_shutdown module=server status=start grace_ms={}",
        grace.as_millis()
    );
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server_task).await {
        Ok(result) => {
            flatten(result)?;
            info!("event=server_shutdown module=server status=ok");
            Ok(())
        }
        Err(_) => {
            warn!(
                "event=server_shutdown module=server status=timeout grace_ms={}",
                grace.as_millis()
            );
            server_task.abort();
            Ok(())
        }
    }
}

fn flatten(result: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    result.map_err(io::Error::other)?
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("event=signal_install module=server status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("event=signal_received module=server status=ok");
}
