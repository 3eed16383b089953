use anyhow::Result;
use clap::{Parser, Subcommand};
use fondos_api::FondosClient;
use fondos_core::{Session, SubscribeForm, TransactionKind};
use tracing::debug;

mod commands;
mod config;
mod logging;
mod render;
mod state;
mod tui;

use logging::LogTarget;
use state::FileSessionStore;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FONDOS_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "fondos",
    version,
    long_version = LONG_VERSION,
    about = "Mutual fund subscription client"
)]
struct Cli {
    /// Override the API base URL for this run
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log at debug level (one-shot commands default to warnings only)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive client (default)
    Tui,

    /// Print the fund catalog
    Funds,

    /// Subscribe to a fund and remember the user id
    Subscribe {
        /// Fund name as listed by `fondos funds`
        #[arg(long)]
        fund: String,
        #[arg(long)]
        cedula: String,
        #[arg(long)]
        correo: String,
        #[arg(long)]
        telefono: String,
        /// Opening balance
        #[arg(long)]
        saldo: String,
    },

    /// Transaction history and per-fund balances
    History {
        /// User id (defaults to the active session)
        #[arg(long)]
        user: Option<String>,
    },

    /// Deposit into a fund for the active user
    Deposit {
        #[arg(long)]
        fund: String,
        #[arg(long)]
        amount: String,
    },

    /// Withdraw from a fund for the active user
    Withdraw {
        #[arg(long)]
        fund: String,
        #[arg(long)]
        amount: String,
    },

    /// Print the active user id
    Whoami,

    /// Forget the active user id
    Logout,

    /// Manage ~/.fondos/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    if let Command::Config { command } = &command {
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(),
        };
    }

    let cfg = config::load_config()?.with_overrides(cli.api_url, None);
    let interactive = matches!(command, Command::Tui);
    let (level, target) = match (interactive, cli.verbose) {
        (true, true) => ("debug", LogTarget::File(state::log_path()?)),
        (true, false) => (cfg.log.level.as_str(), LogTarget::File(state::log_path()?)),
        (false, true) => ("debug", LogTarget::Stderr),
        (false, false) => ("warn", LogTarget::Stderr),
    };
    logging::init_logging(&cfg.log, level, target)?;
    debug!(base_url = %cfg.api.base_url, "config loaded");

    let client = FondosClient::new(cfg.api.base_url.clone());
    let store = FileSessionStore::default_location()?;
    debug!(path = %store.path().display(), "session file");
    let mut session = Session::open(store)?;

    match command {
        Command::Tui => {
            let handle = tokio::runtime::Handle::current();
            tokio::task::block_in_place(|| tui::run(client, session, handle))?;
        }

        Command::Funds => commands::list_funds(&client).await?,

        Command::Subscribe {
            fund,
            cedula,
            correo,
            telefono,
            saldo,
        } => {
            let form = SubscribeForm {
                cedula,
                correo,
                telefono,
                saldo,
            };
            commands::subscribe(&client, &mut session, &fund, form).await?;
        }

        Command::History { user } => commands::history(&client, &session, user).await?,

        Command::Deposit { fund, amount } => {
            commands::transact(&client, &session, &fund, &amount, TransactionKind::Deposit).await?;
        }

        Command::Withdraw { fund, amount } => {
            commands::transact(
                &client,
                &session,
                &fund,
                &amount,
                TransactionKind::Cancellation,
            )
            .await?;
        }

        Command::Whoami => commands::whoami(&session),

        Command::Logout => commands::logout(&mut session)?,

        Command::Config { .. } => {}
    }

    Ok(())
}
