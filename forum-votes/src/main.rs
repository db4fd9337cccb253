use forum_votes::{AppError, Dependencies};
use dotenv::dotenv;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the forum votes service.
///
/// Initializes dotenv and tracing, sets up application dependencies, then
/// answers one JSON command per stdin line with one JSON line on stdout.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    init_tracing();

    let dependencies = Dependencies::new().await?;
    info!(
        service_name = "forum-votes",
        service_version = env!("CARGO_PKG_VERSION"),
        "ready for commands"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match dependencies.handler.handle_line(&line).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "command failed");
                json!({ "success": false, "error": e.to_string(), "status": 500 }).to_string()
            }
        };
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Structured JSON logs go to stderr so stdout carries only replies.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "forum_votes=info,forum_votes_engine=info,forum_votes_repository=info".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .json(),
        )
        .init();
}
