mod api;
mod app;
pub mod http;

use anyhow::Result;
use clap::Args;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use crate::upstream::UpstreamArgs;

pub use app::{build_router, AppState};

#[derive(Debug, Args, Clone)]
pub struct ServerArgs {
    /// HTTP server listen address
    #[arg(long, default_value = "0.0.0.0:8080", env = "LENS_LISTEN_ADDR")]
    pub listen_addr: String,

    /// CORS allow origin (any origin when omitted)
    #[arg(long, env = "LENS_CORS_ALLOW_ORIGIN")]
    pub cors_allow_origin: Option<String>,
}

pub async fn run(args: ServerArgs, upstream: &UpstreamArgs) -> Result<()> {
    info!("Initializing lens-admin server");

    let schema = upstream.connect().await?;
    let state = AppState::new(schema);
    let router = build_router(state, args.cors_allow_origin.as_deref())?;

    let addr: SocketAddr = args.listen_addr.parse()?;
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
