// src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use bnb_agent_actions::{
    actions::ActionContext,
    api::{
        actions::{list_actions_handler, run_action_handler},
        health::health_handler,
        rpc::rpc_handler,
    },
    config::Config,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};
use std::env;
use std::net::SocketAddr;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn serve_http(state: AppState) -> anyhow::Result<()> {
    let routes = Router::new()
        .route("/health", get(health_handler))
        .route("/actions", get(list_actions_handler))
        .route("/actions/:name", post(run_action_handler))
        .route("/rpc", post(rpc_handler));

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = Router::new()
        .nest("/api", routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Action API listening on http://{}/api", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Answers one stdio line; `None` for notifications.
async fn answer_line(line: &str, state: &AppState) -> Option<Response> {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle_mcp_request(request, state.clone()).await,
        Err(e) => {
            warn!("Unparseable MCP frame: {}", e);
            Some(Response::error(
                serde_json::Value::Null,
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", e),
            ))
        }
    }
}

/// Newline-delimited JSON-RPC over stdin/stdout until EOF.
async fn serve_stdio(state: AppState) -> anyhow::Result<()> {
    info!("🚀 MCP server reading from stdin");
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("<- {}", line);
        let Some(response) = answer_line(line, &state).await else {
            continue;
        };
        let mut frame = serde_json::to_string(&response)?;
        debug!("-> {}", frame);
        frame.push('\n');
        stdout.write_all(frame.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("stdin closed, MCP server exiting");
    Ok(())
}

#[tokio::main]
async fn main() {
    // stdout carries MCP frames, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bnb_agent_actions=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return;
        }
    };

    let context = match ActionContext::from_config(&config) {
        Ok(ctx) => {
            info!("Signer ready at {:?}", ctx.signer.address());
            Some(ctx)
        }
        Err(e) => {
            warn!("Actions disabled until a signer is configured: {:#}", e);
            None
        }
    };
    let state = AppState::new(config, context);

    let stdio = env::args().any(|arg| arg == "--mcp") || env::var("MCP_MODE").is_ok();
    let result = if stdio {
        serve_stdio(state).await
    } else {
        serve_http(state).await
    };
    if let Err(e) = result {
        error!("❌ Server stopped: {:#}", e);
    }
}
