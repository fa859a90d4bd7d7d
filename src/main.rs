use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;

use bankdata_client::config::{self, CliArgs, Command, Config, RequisitionCommand};
use bankdata_client::http_client::BankDataClient;
use bankdata_client::models::{AgreementRequest, RequisitionRequest};
use bankdata_client::utils::token_preview;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut args = CliArgs::parse();

    // Ask for secrets when flags, the environment and .env all left them out
    if config::needs_interactive_setup(&args, std::io::stdin().is_terminal()) {
        let interactive_config = config::run_interactive_setup()?;
        args.apply_interactive(interactive_config);
    }

    let config = Config::from_args(&args)?;
    config.validate()?;

    // Initialize logging with a configured level; stdout is reserved for command output
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!(base_url = %config.base_url, "Bank Account Data client starting");

    let client = Arc::new(
        BankDataClient::new(
            config.credentials()?,
            config.base_url.clone(),
            config.http_request_timeout,
        )
        .context("Failed to create Bank Account Data client")?,
    );

    // Authenticate up front so credential problems surface before any business call
    if let Err(e) = client.auth_manager().ensure_valid_token().await {
        tracing::error!("Authentication failed: {}", e);
        tracing::error!("Check GOCARDLESS_SECRET_ID / GOCARDLESS_SECRET_KEY and try again");
        anyhow::bail!("Unable to obtain an access token");
    }

    run_command(&client, &config, args.command).await
}

async fn run_command(client: &Arc<BankDataClient>, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Institutions { country } => {
            let institutions = client
                .list_institutions(&country)
                .await
                .context("Failed to list institutions")?;

            for institution in institutions {
                println!("{:<40} {}", institution.id, institution.name);
            }
        }

        Command::Agreement { institution_id } => {
            let agreement = client
                .create_agreement(&AgreementRequest::new(institution_id))
                .await
                .context("Failed to create agreement")?;

            println!("{}", agreement.id);
        }

        Command::Requisition(RequisitionCommand::Create {
            institution_id,
            agreement,
        }) => {
            let agreement_id = match agreement {
                Some(id) => id,
                None => {
                    client
                        .create_agreement(&AgreementRequest::new(institution_id.clone()))
                        .await
                        .context("Failed to create agreement")?
                        .id
                }
            };

            let request =
                RequisitionRequest::new(institution_id, Some(agreement_id), &config.redirect_url);
            let requisition = client
                .create_requisition(&request)
                .await
                .context("Failed to create requisition")?;

            println!("Requisition: {}", requisition.id);
            println!("Open this link to connect your bank:");
            println!("{}", requisition.link);
        }

        Command::Requisition(RequisitionCommand::Get { id }) => {
            let requisition = client
                .get_requisition(&id)
                .await
                .context("Failed to fetch requisition")?;

            println!("Requisition: {}", requisition.id);
            println!("Status:      {}", requisition.status);
            println!("Institution: {}", requisition.institution_id);
            for account in &requisition.accounts {
                println!("Account:     {}", account);
            }
        }

        Command::Balance {
            account_ids,
            balance_type,
        } => {
            // Accounts are fetched concurrently; they all share one token
            let lines = futures::future::try_join_all(account_ids.iter().map(|account_id| {
                let client = client.clone();
                let balance_type = balance_type.clone();
                async move {
                    let details = client.get_account_details(account_id).await?;
                    let balance = client.get_account_balance(account_id, &balance_type).await?;
                    let label = if details.account.name.is_empty() {
                        account_id.to_string()
                    } else {
                        details.account.name
                    };
                    Ok::<_, bankdata_client::ClientError>(format!("{}: {}", label, balance))
                }
            }))
            .await
            .context("Failed to fetch balances")?;

            for line in lines {
                println!("{}", line);
            }
        }

        Command::Token => {
            let token = client.auth_manager().ensure_valid_token().await?;
            let state = client.auth_manager().snapshot().await;

            println!("Access token:   {}", token_preview(&token));
            println!("Access expiry:  {}", state.access_expiry.to_rfc3339());
            println!("Refresh expiry: {}", state.refresh_expiry.to_rfc3339());
        }
    }

    Ok(())
}
