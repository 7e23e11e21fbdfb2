use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use orgjoin_invites::{ActionOutcome, ResolutionState, RouteQuery};
use orgjoin_runtime::{telemetry, JoinServices};
use tracing::debug;

mod terminal;

use terminal::{render, summarize, TerminalNavigator, TerminalNotifier};

#[derive(Parser)]
#[command(name = "orgjoin")]
#[command(about = "Resolve, accept, or decline an organization invite link")]
#[command(version)]
struct Cli {
    /// Platform API base URL; overrides configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Access token of the signed-in account
    #[arg(long, global = true, env = "ORGJOIN_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InviteArgs {
    /// Organization slug from the invite link
    #[arg(long)]
    slug: Option<String>,

    /// Invite token from the invite link
    #[arg(long)]
    token: Option<String>,
}

impl InviteArgs {
    fn route(&self) -> RouteQuery {
        RouteQuery::new(self.slug.as_deref(), self.token.as_deref())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the invite and print what the join page would show
    Show(InviteArgs),
    /// Resolve the invite and join the organization
    Accept(InviteArgs),
    /// Resolve the invite and decline it
    Decline(InviteArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = orgjoin_config::load().context("failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    if let Some(token) = cli.access_token.filter(|token| !token.is_empty()) {
        config.api.access_token = Some(token);
    }

    telemetry::init_tracing(&config.telemetry)?;

    let services = JoinServices::initialise(&config)?;
    let navigator = Arc::new(TerminalNavigator::default());
    let controller = services.controller(Arc::new(TerminalNotifier), navigator.clone())?;

    let (args, action) = match &cli.command {
        Commands::Show(args) => (args, None),
        Commands::Accept(args) => (args, Some(Action::Accept)),
        Commands::Decline(args) => (args, Some(Action::Decline)),
    };

    let state = controller.resolve(&args.route()).await;
    for line in render(&controller.view()) {
        println!("{line}");
    }

    if state == ResolutionState::Loading {
        debug!("invite was not resolved; nothing further to do");
        println!("{}", "The invite could not be resolved yet.".dimmed());
    }

    let Some(action) = action else {
        return Ok(());
    };

    let outcome = match action {
        Action::Accept => controller.accept().await,
        Action::Decline => controller.decline().await,
    };

    match &outcome {
        ActionOutcome::Navigated { .. } => {
            println!("{} {}", "✓".green(), summarize(&outcome));
            debug!(landing = ?navigator.last(), "invite flow finished");
            Ok(())
        }
        ActionOutcome::Failed { .. } | ActionOutcome::Ignored(_) => {
            Err(anyhow::anyhow!(summarize(&outcome)))
        }
    }
}

#[derive(Clone, Copy)]
enum Action {
    Accept,
    Decline,
}
