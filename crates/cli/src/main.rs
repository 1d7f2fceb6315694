//! Cookshop CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cookshop-cli migrate
//!
//! # Edit site settings
//! cookshop-cli settings set whatsapp_number "600-1234"
//! cookshop-cli settings show
//!
//! # Reset the admin password (logs out every admin session)
//! cookshop-cli password set 'new-password-42'
//! ```
//!
//! All commands read `DATABASE_URL` (a `.env` file is honoured).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cookshop_core::PasswordStrength;
use cookshop_core::store::PgSettingsStore;

mod commands;

#[derive(Parser)]
#[command(name = "cookshop-cli")]
#[command(author, version, about = "Cookshop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// View or edit site settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Manage the admin password
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Set a setting (`business_name`, `whatsapp_number`, `logo_url`, `theme`)
    Set { key: String, value: String },
    /// Print every stored setting
    Show,
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Replace the admin password without knowing the current one
    Set { new_password: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::Settings { action } => {
            let store = PgSettingsStore::new(pool);
            match action {
                SettingsAction::Set { key, value } => {
                    let row = commands::settings::set(&store, &key, &value).await?;
                    println!("{} saved (version {})", row.key, row.version);
                }
                SettingsAction::Show => {
                    for line in commands::settings::show(&store).await? {
                        println!("{line}");
                    }
                }
            }
        }
        Commands::Password { action } => match action {
            PasswordAction::Set { new_password } => {
                let store = PgSettingsStore::new(pool);
                let (row, strength) = commands::password::set(&store, &new_password).await?;
                println!("Admin password updated (version {}).", row.version);
                if strength == PasswordStrength::Common {
                    println!("{}", strength.message());
                }
                println!("Every admin session will be asked to log in again.");
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_settings_set() {
        let cli = Cli::try_parse_from(["cookshop-cli", "settings", "set", "theme", "dark"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Settings {
                action: SettingsAction::Set { .. }
            })
        ));
    }
}
