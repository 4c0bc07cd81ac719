use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError},
};

use axum::{
    Router,
    extract::State as AxumState,
    response::{IntoResponse, Response},
    routing::get,
};
use http::StatusCode;
use npd_operator_controller::metrics::REGISTRY;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{Result, http::shutdown};

#[derive(Clone)]
pub(crate) struct State {
    ready: CancellationToken,
}

impl State {
    pub fn new(token: CancellationToken) -> Self {
        Self { ready: token }
    }

    pub fn ready(&self) -> Readiness {
        if self.ready.is_cancelled() {
            Readiness::Ready
        } else {
            Readiness::NotReady
        }
    }

    pub fn metrics(&self) -> String {
        let mut buffer = String::new();
        let registry = &*REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
        match prometheus_client::encoding::text::encode(&mut buffer, registry) {
            Ok(_) => buffer,
            Err(e) => {
                error!(%e, "failed to encode metrics");
                String::new()
            }
        }
    }
}

pub(crate) async fn serve(
    addr: SocketAddr,
    state: Arc<State>,
    cancel: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("metrics listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown(cancel))
        .await?;
    Ok(())
}

pub(crate) fn router(state: Arc<State>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/readyz", get(readyz))
        .with_state(state)
}

async fn metrics(AxumState(handler): AxumState<Arc<State>>) -> String {
    handler.metrics()
}

async fn readyz(AxumState(handler): AxumState<Arc<State>>) -> Readiness {
    handler.ready()
}

pub(crate) enum Readiness {
    Ready,
    NotReady,
}

impl IntoResponse for Readiness {
    fn into_response(self) -> Response {
        match self {
            Readiness::Ready => (StatusCode::OK, "Ok").into_response(),
            Readiness::NotReady => (StatusCode::INTERNAL_SERVER_ERROR, "NotReady").into_response(),
        }
    }
}
