//! Listening sockets and accept loops

use crate::router::EventRouter;
use crate::server::session::handle_connection;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{lookup_host, TcpListener, ToSocketAddrs};
use tokio::task::JoinSet;

/// Bind every address `addr` resolves to.
///
/// A host such as `localhost` may resolve to both `127.0.0.1` and `::1`;
/// clients connecting to either are served. Fails only when no address
/// could be bound.
pub async fn bind(addr: impl ToSocketAddrs) -> anyhow::Result<Vec<TcpListener>> {
    let mut resolved: Vec<SocketAddr> = Vec::new();
    for candidate in lookup_host(addr).await? {
        if !resolved.contains(&candidate) {
            resolved.push(candidate);
        }
    }
    bind_all(&resolved).await
}

/// Bind each address, skipping the ones that fail.
pub async fn bind_all(addrs: &[SocketAddr]) -> anyhow::Result<Vec<TcpListener>> {
    let mut listeners = Vec::with_capacity(addrs.len());
    let mut last_error = None;

    for addr in addrs {
        match TcpListener::bind(addr).await {
            Ok(listener) => listeners.push(listener),
            Err(e) => {
                tracing::warn!("Failed to bind {}: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    match (listeners.is_empty(), last_error) {
        (false, _) => Ok(listeners),
        (true, Some(e)) => Err(e.into()),
        (true, None) => Err(anyhow::anyhow!("no address to bind")),
    }
}

async fn accept_loop(listener: TcpListener, router: EventRouter) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let router = router.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, router).await {
                        tracing::warn!("Connection from {} failed: {}", peer, e);
                    }
                });
            }
            Err(e) => {
                tracing::error!("Accept error: {}", e);
            }
        }
    }
}

/// Accept connections on every listener until `shutdown` resolves, spawning
/// one session task per connection.
///
/// Sessions already running are left to finish on their own.
pub async fn serve<F>(
    listeners: Vec<TcpListener>,
    router: EventRouter,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let mut accept_loops = JoinSet::new();
    for listener in listeners {
        accept_loops.spawn(accept_loop(listener, router.clone()));
    }

    tokio::select! {
        _ = shutdown => {
            tracing::info!("Listener shutting down");
        }
        _ = async {
            while accept_loops.join_next().await.is_some() {}
        } => {}
    }

    accept_loops.shutdown().await;
    Ok(())
}
