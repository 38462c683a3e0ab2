//! HTTP binding for the keyrights service.
//!
//! A single POST endpoint accepts the request envelope as JSON and
//! returns the per-action results as JSON. Authentication rejections
//! are normal responses (every action reported as an authentication
//! failure); only a body that is not an action list maps to 400.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use clap::Parser;
use keyrights::{EngineError, Service};
use keyrights_core::{Request, SignKeyGen};
use keyrights_crypto::ReferencePrimitives;
use keyrights_store::{Database, SqliteStore};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "keyrights-server", about = "Capability-based access control service")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:4343")]
    listen: SocketAddr,

    /// Path to the SQLite database file.
    #[arg(long, default_value = "keyrights.db")]
    database: PathBuf,
}

type AppService = Arc<Service<SqliteStore>>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let store = SqliteStore::open(&args.database)?;
    let primitives = Arc::new(ReferencePrimitives::generate());
    let sign_key_pair = primitives.sign_key_gen().await?;
    let service: AppService = Arc::new(Service::new(
        primitives.clone(),
        primitives,
        Database::new(store),
        sign_key_pair,
    ));

    let app = Router::new().route("/", post(handle)).with_state(service);

    let listener = TcpListener::bind(args.listen).await?;
    info!(listen = %args.listen, database = %args.database.display(), "keyrights server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle(State(service): State<AppService>, Json(request): Json<Request>) -> Response {
    match service.handle(&request).await {
        Ok(response) => Json(response).into_response(),
        Err(EngineError::MalformedRequest(message)) => {
            (StatusCode::BAD_REQUEST, message).into_response()
        }
        Err(err) => {
            error!(error = %err, "request processing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
