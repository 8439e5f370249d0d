use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use pillbug::config::{config_schema, load_config};
use pillbug::models::StoredCredential;
use pillbug::notify::ConsoleNotifier;
use pillbug::startup::{build_session, Session};
use pillbug::state::AuthState;
use pillbug::utils::init_logging;

#[derive(Parser)]
#[command(name = "pillbug", version, about = "Session manager for a federated social client")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "./config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the stored session and show who is signed in.
    Status,
    /// Store an access token for an instance, then resolve with it.
    Login {
        /// Base URL of the instance, e.g. https://fosstodon.org
        #[arg(long)]
        instance: String,
        /// An access token issued by that instance.
        #[arg(long, env = "PILLBUG_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Forget the stored credential.
    Logout,
    /// Print the JSON schema of the configuration file.
    Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Schema = cli.command {
        println!("{}", config_schema());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let session = build_session(&config, Arc::new(ConsoleNotifier));
    run(cli.command, session).await
}

async fn run(command: Command, session: Session) -> ExitCode {
    match command {
        Command::Status => report(&session).await,
        Command::Login { instance, token } => {
            let credential = StoredCredential::new(instance, token);
            if let Err(e) = session.resolver.remember(&credential).await {
                eprintln!("Could not store credential: {}", e);
                return ExitCode::FAILURE;
            }
            report(&session).await
        }
        Command::Logout => {
            session.initializer.resolve_session().await;
            match session.initializer.sign_out().await {
                Ok(()) => {
                    println!("signed out");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    warn!("Sign-out left a credential behind: {}", e);
                    eprintln!(
                        "Signed out locally, but the stored credential could not be removed: {}",
                        e
                    );
                    ExitCode::FAILURE
                }
            }
        }
        Command::Schema => {
            println!("{}", config_schema());
            ExitCode::SUCCESS
        }
    }
}

/// Resolve and print the outcome; resolution errors were already shown by the notifier.
async fn report(session: &Session) -> ExitCode {
    let outcome = session.initializer.resolve_session().await;
    info!("Resolution finished: {:?}", outcome);

    match session.auth.auth_state() {
        AuthState::SignedIn(signed_in) => {
            println!("{}", signed_in.account_label());
            ExitCode::SUCCESS
        }
        AuthState::SignedOut => {
            println!("signed out");
            ExitCode::SUCCESS
        }
        AuthState::Failed { .. } | AuthState::Unresolved => ExitCode::FAILURE,
    }
}
