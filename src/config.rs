use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Password};
use std::io::Write;

use crate::api::{DEFAULT_BALANCE_TYPE, DEFAULT_COUNTRY};
use crate::auth::Credentials;
use crate::http_client::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Default redirect target after the end user links a bank
pub const DEFAULT_REDIRECT_URL: &str = "http://localhost:3000";

/// Bank Account Data command-line client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Secret ID issued in the Bank Account Data portal
    #[arg(long, env = "GOCARDLESS_SECRET_ID", hide_env_values = true)]
    pub secret_id: Option<String>,

    /// Secret key issued in the Bank Account Data portal
    #[arg(long, env = "GOCARDLESS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// API base URL
    #[arg(long, env = "GOCARDLESS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub http_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Redirect URL used when creating requisitions
    #[arg(long, env = "REDIRECT_URL", default_value = DEFAULT_REDIRECT_URL)]
    pub redirect_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List institutions available in a country
    Institutions {
        /// ISO 3166 alpha-2 country code
        #[arg(short, long, default_value = DEFAULT_COUNTRY)]
        country: String,
    },

    /// Create an end-user agreement and print its ID
    Agreement {
        /// Institution ID (e.g. SANDBOXFINANCE_SFIN0000)
        institution_id: String,
    },

    /// Create or inspect requisitions
    #[command(subcommand)]
    Requisition(RequisitionCommand),

    /// Print the balance of one or more accounts
    Balance {
        /// Account IDs
        #[arg(required = true)]
        account_ids: Vec<String>,

        /// Balance type to report
        #[arg(short = 't', long, default_value = DEFAULT_BALANCE_TYPE)]
        balance_type: String,
    },

    /// Obtain a token and print its expiry
    Token,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum RequisitionCommand {
    /// Create a requisition and print the link for the end user
    Create {
        /// Institution ID
        institution_id: String,

        /// Existing agreement ID; a new agreement is created when omitted
        #[arg(short, long)]
        agreement: Option<String>,
    },

    /// Show a requisition and its linked accounts
    Get {
        /// Requisition ID
        id: String,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub secret_id: String,
    pub secret_key: String,

    // API
    pub base_url: String,
    pub http_request_timeout: u64,
    pub redirect_url: String,

    // Logging
    pub log_level: String,
}

impl Config {
    /// Build configuration from parsed arguments (CLI > ENV > defaults)
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = Config {
            secret_id: args
                .secret_id
                .clone()
                .context("GOCARDLESS_SECRET_ID is required (use --secret-id or set GOCARDLESS_SECRET_ID env var)")?,

            secret_key: args
                .secret_key
                .clone()
                .context("GOCARDLESS_SECRET_KEY is required (use --secret-key or set GOCARDLESS_SECRET_KEY env var)")?,

            base_url: args.base_url.clone(),
            http_request_timeout: args.http_timeout,
            redirect_url: args.redirect_url.clone(),
            log_level: args.log_level.clone(),
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.credentials()?;

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("GOCARDLESS_BASE_URL must be an http(s) URL: {}", self.base_url);
        }

        if self.http_request_timeout == 0 {
            anyhow::bail!("HTTP_REQUEST_TIMEOUT must be greater than zero");
        }

        Ok(())
    }

    /// Credential pair for the token manager
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(self.secret_id.clone(), self.secret_key.clone())
            .context("Invalid Bank Account Data credentials")
    }
}

// === Interactive Setup ===

/// Check if interactive setup is needed
///
/// Secrets may come from flags, the environment or .env; all of them are
/// already folded into `args`. Prompting only happens on a terminal.
pub fn needs_interactive_setup(args: &CliArgs, interactive: bool) -> bool {
    interactive && (args.secret_id.is_none() || args.secret_key.is_none())
}

/// Configuration collected from interactive setup
#[derive(Debug, Clone)]
pub struct InteractiveConfig {
    pub secret_id: String,
    pub secret_key: String,
}

impl CliArgs {
    /// Fill in the secrets collected interactively, keeping any given on the command line
    pub fn apply_interactive(&mut self, setup: InteractiveConfig) {
        self.secret_id.get_or_insert(setup.secret_id);
        self.secret_key.get_or_insert(setup.secret_key);
    }
}

/// Ask for the secret pair and optionally persist it to .env
pub fn run_interactive_setup() -> Result<InteractiveConfig> {
    println!();
    println!("No credentials found. Create a secret pair in the Bank Account Data portal");
    println!("(User secrets section) and paste it below.");
    println!();

    let secret_id: String = Password::new()
        .with_prompt("Secret ID (GOCARDLESS_SECRET_ID)")
        .interact()
        .context("Failed to read GOCARDLESS_SECRET_ID")?;

    let secret_key: String = Password::new()
        .with_prompt("Secret key (GOCARDLESS_SECRET_KEY)")
        .interact()
        .context("Failed to read GOCARDLESS_SECRET_KEY")?;

    if secret_id.trim().is_empty() || secret_key.trim().is_empty() {
        anyhow::bail!("Secret ID and secret key cannot be empty");
    }

    let config = InteractiveConfig {
        secret_id,
        secret_key,
    };

    println!();
    let save_to_env = Confirm::new()
        .with_prompt("Save credentials to .env file?")
        .default(true)
        .interact()
        .context("Failed to read save confirmation")?;

    if save_to_env {
        save_env_file(&config)?;
        println!("Credentials saved to .env file");
    }
    println!();

    Ok(config)
}

fn render_env_file(config: &InteractiveConfig) -> String {
    format!(
        r#"# Bank Account Data client configuration
# Generated by interactive setup

# Secret pair from the Bank Account Data portal (required)
GOCARDLESS_SECRET_ID={}
GOCARDLESS_SECRET_KEY={}

# API settings
GOCARDLESS_BASE_URL={}
HTTP_REQUEST_TIMEOUT={}
REDIRECT_URL={}

# Logging (trace, debug, info, warn, error)
LOG_LEVEL=info
"#,
        config.secret_id,
        config.secret_key,
        DEFAULT_BASE_URL,
        DEFAULT_REQUEST_TIMEOUT_SECS,
        DEFAULT_REDIRECT_URL,
    )
}

fn save_env_file(config: &InteractiveConfig) -> Result<()> {
    let mut file = std::fs::File::create(".env").context("Failed to create .env file")?;
    file.write_all(render_env_file(config).as_bytes())
        .context("Failed to write .env file")?;

    Ok(())
}
