//! Rang CLI: colorize black & white photos from the command line.
//!
//! Set RANG_API_URL (or API_URL) and optionally RANG_API_TOKEN.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use rang_cli::{init_tracing, ConsoleNotifier};
use rang_client::ApiClient;
use rang_core::models::{format_count, FeedbackEntry, UserIdentity};
use rang_core::{Config, NoSession, SessionProvider, StaticSession};
use rang_workflow::present::{download, share};
use rang_workflow::{ColorizeWorkflow, LinkOnlySink, Phase};

#[derive(Parser)]
#[command(name = "rang", about = "Rang colorization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Colorize a black & white photo
    Colorize {
        /// Path to the photo to colorize
        file: PathBuf,
        /// Directory to save the colorized result into (default: RANG_DOWNLOAD_DIR or .)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Use the ephemeral path: the result is returned inline and
        /// nothing is stored by the service
        #[arg(long)]
        ephemeral: bool,
        /// User id for attribution (enables the persistent, pollable path)
        #[arg(long)]
        user_id: Option<Uuid>,
        /// User email for attribution
        #[arg(long)]
        email: Option<String>,
        /// Print a share link after saving
        #[arg(long)]
        share: bool,
    },
    /// Show aggregate usage counters
    Stats {
        /// Output format: json or table (default: table)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Submit feedback
    Feedback {
        /// Feedback text (at most 500 characters)
        message: String,
        /// User id
        #[arg(long)]
        user_id: Uuid,
        /// User email
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    let client = Arc::new(ApiClient::from_config(&config)?);

    match cli.command {
        Commands::Colorize {
            file,
            out,
            ephemeral,
            user_id,
            email,
            share: want_share,
        } => {
            let session: Arc<dyn SessionProvider> = match (ephemeral, user_id, email) {
                (false, Some(id), Some(email)) => Arc::new(StaticSession::new(Some(
                    UserIdentity::new(id, email),
                ))),
                _ => Arc::new(NoSession),
            };

            let workflow = ColorizeWorkflow::new(
                client.clone(),
                session,
                Arc::new(ConsoleNotifier),
                &config,
            );

            workflow
                .submit_path(&file)
                .await
                .with_context(|| format!("Failed to colorize {}", file.display()))?;

            // Render progress until the workflow settles.
            let mut last_line = String::new();
            let snapshot = loop {
                let snapshot = workflow.snapshot();
                if snapshot.phase != Phase::Processing {
                    break snapshot;
                }
                let mut line = format!("{} {}%", snapshot.stage.title(), snapshot.progress);
                if snapshot.slow_processing {
                    if let Some(secs) = snapshot.elapsed_secs {
                        line.push_str(&format!(" ({}s, this may take up to a minute)", secs));
                    }
                }
                if line != last_line {
                    eprintln!("{}", line);
                    last_line = line;
                }
                tokio::time::sleep(Duration::from_millis(250)).await;
            };

            if snapshot.phase != Phase::Complete {
                anyhow::bail!("Colorization did not complete");
            }

            let colorized = snapshot
                .colorized_image
                .context("Completed workflow is missing the colorized image")?;
            let out_dir = out.unwrap_or_else(|| config.download_dir.clone());
            let saved = download(client.as_ref(), &colorized, &out_dir).await?;
            println!("{}", saved.display());

            if want_share {
                share(
                    client.as_ref(),
                    &colorized,
                    &config.share_link,
                    Arc::new(LinkOnlySink),
                )
                .await;
            }
        }
        Commands::Stats { format } => {
            let stats = client.stats_or_fallback().await;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => {
                    println!("Users:    {}", format_count(stats.total_users));
                    println!("Memories: {}", format_count(stats.total_memories));
                    println!("Updated:  {}", stats.last_updated);
                }
            }
        }
        Commands::Feedback {
            message,
            user_id,
            email,
        } => {
            let user = UserIdentity::new(user_id, email);
            let entry = FeedbackEntry::new(&user, &message)?;
            client
                .submit_feedback(&entry)
                .await
                .context("Failed to submit feedback")?;
            println!("Thank you! Your feedback has been submitted.");
        }
    }

    Ok(())
}
