//! HTTP server loop.

use crate::routes::build_router;
use crate::state::SharedState;
use log::info;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

/// Serves the API on `bind` until Ctrl+C or SIGTERM.
pub async fn serve(state: SharedState, bind: SocketAddr) -> io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(
        "event=server_start module=api status=ok bind={}",
        listener.local_addr()?
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=api status=ok signal=ctrl_c"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=api status=ok signal=terminate");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
