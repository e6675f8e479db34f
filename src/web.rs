pub mod api;
pub mod except;
pub mod javascript;
pub mod messages;
pub mod route;
pub mod upload;
pub mod url;

use crate::erx::{Erx, Layouted, PreL4, ResultEX};
use axum::Router;
use std::future::Future;
use tracing::{error, info};

/// Bind `bind` and serve `router` until `shutdown` resolves.
pub async fn serve<F>(name: &str, bind: &str, router: Router, shutdown: F) -> ResultEX
where
    F: Future<Output = ()> + Send + 'static,
{
    let listen = match tokio::net::TcpListener::bind(bind).await {
        Ok(listen) => listen,
        Err(err) => {
            error!("[{} - webserver] can't bind to : {}  ERROR: {}", name, bind, err);
            let mut erx = Erx::coded(Layouted::common(PreL4::COMM.four(), "0001"), &err.to_string());
            erx.add_extra("bind", bind);
            return Err(erx);
        },
    };

    info!("WebMod[ {} ] served : {}", name, bind);
    axum::serve(listen, router).with_graceful_shutdown(shutdown).await?;
    info!("WebMod[ {} ] terminated", name);

    Ok(())
}

/// resolves on Ctrl-C
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("ctrl-c handler failed: {}", err);
        std::future::pending::<()>().await;
    }
    info!("ctrl-c received, shutting down");
}
