mod terminal;

use anyhow::{bail, Context, Result};
use arsip_client::exit_form::prelude::*;
use arsip_client::{ArsipHttpClient, Config};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use terminal::TerminalNotifier;

#[derive(Parser, Debug)]
#[command(name = "arsip", about = "Register member exits against the archive backend")]
struct Cli {
    /// Backend base URL; overrides arsip.toml and ARSIP_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to load instead of ./arsip.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the known centers.
    Centers,
    /// Lists the members of a center.
    Members {
        #[arg(long)]
        center: String,
    },
    /// Shows a member's archive record.
    Detail {
        #[arg(long)]
        member: String,
    },
    /// Registers a member exit with a supporting document.
    Exit {
        #[arg(long)]
        center: String,
        #[arg(long)]
        member: String,
        /// Exit date as YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// Supporting document to upload.
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "")]
        notes: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &cli.api_url {
        Some(url) => Ok(config.with_base_url(url)?),
        None => Ok(config),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    env_logger::Builder::new()
        .parse_filters(&config.logging.level)
        .init();
    log::debug!("Using backend {}", config.api.base_url);

    let client = Arc::new(ArsipHttpClient::new(&config.api)?);

    match cli.command {
        Commands::Centers => {
            let centers = client.fetch_centers().await?;
            println!("🏢 {} center(s)", centers.len());
            for center in centers {
                println!("  {}", center);
            }
        }
        Commands::Members { center } => {
            let center = CenterCode::new(center);
            let members = client.fetch_members(&center).await?;
            if members.is_empty() {
                println!("No members in center {}", center);
            }
            for member in members {
                println!("  {:<32} {}", member.id, member.display_label);
            }
        }
        Commands::Detail { member } => {
            let detail = client.fetch_member_detail(&MemberId::new(member)).await?;
            println!("📁 {}", detail.path);
            for (key, value) in &detail.extra {
                println!("  {}: {}", key, value);
            }
        }
        Commands::Exit {
            center,
            member,
            date,
            file,
            notes,
            yes,
        } => {
            let outcome = register_exit(
                client,
                TerminalNotifier::new(yes),
                ExitRequest {
                    center: CenterCode::new(center),
                    member: MemberId::new(member),
                    date,
                    file,
                    notes,
                },
            )
            .await?;

            if !outcome.is_success() {
                bail!("Exit record was not saved ({:?})", outcome);
            }
        }
    }

    Ok(())
}

struct ExitRequest {
    center: CenterCode,
    member: MemberId,
    date: String,
    file: PathBuf,
    notes: String,
}

/// Walk the exit form the way an operator would: pick the center, pick the
/// member, wait for the archive path, fill in the fields and submit.
async fn register_exit(
    client: Arc<ArsipHttpClient>,
    notifier: TerminalNotifier,
    request: ExitRequest,
) -> Result<SubmitOutcome> {
    NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
        .with_context(|| format!("Exit date '{}' is not YYYY-MM-DD", request.date))?;

    let bytes = tokio::fs::read(&request.file)
        .await
        .with_context(|| format!("Failed to read {}", request.file.display()))?;
    let file_name = request
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    let mut form = ExitFormManager::with_backend(client, Arc::new(notifier));

    form.dispatch(ExitFormAction::Mount);
    form.dispatch(ExitFormAction::SelectCenter(Some(request.center.clone())));
    form.settle().await;

    if let SelectionState::Failed(reason) = form.centers() {
        bail!("Could not load centers: {}", reason);
    }
    if form.selection().selected_center() != Some(&request.center) {
        bail!("Center {} is not listed", request.center);
    }
    if let SelectionState::Failed(reason) = form.members() {
        bail!("Could not load members of center {}: {}", request.center, reason);
    }
    if !form.members().items().iter().any(|m| m.id == request.member) {
        bail!("Member {} is not listed in center {}", request.member, request.center);
    }

    form.dispatch(ExitFormAction::SelectMember(Some(request.member.clone())));
    form.settle().await;

    let Some(detail) = form.resolved_member() else {
        bail!("Could not load the archive record of member {}", request.member);
    };
    println!("📁 Archive path: {}", detail.path);

    form.dispatch(ExitFormAction::SetExitDate(request.date));
    form.dispatch(ExitFormAction::SetNotes(request.notes));
    form.dispatch(ExitFormAction::Attach(Attachment::new(file_name, bytes)));
    form.dispatch(ExitFormAction::Submit);
    form.settle().await;

    form.last_submit_outcome()
        .cloned()
        .context("Submit action was not available")
}
