use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;

use vips_review::config::{MailConfig, VipsConfig};
use vips_review::notify::{EmailContext, EmailRenderer, Mailer};
use vips_review::vips::service::{get_invoice_details, is_application_ready_for_payment};
use vips_review::vips::{ApiResponse, VipsClient, generate_correlation_id};

#[derive(Debug, Parser)]
#[command(name = "vips-review", version, about = "Query VIPS and render review notifications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ping the VIPS API.
    Health,
    /// Look up a prohibition's status.
    Status { prohibition_number: String },
    /// Look up a prohibition's payment status.
    Payment { prohibition_number: String },
    /// Show invoice details for a prohibition.
    Invoice { prohibition_number: String },
    /// Check whether an applicant can pay for their review.
    Ready {
        prohibition_number: String,
        last_name: String,
    },
    /// List available review time slots.
    Schedule {
        notice_type: String,
        review_type: String,
        /// YYYY-MM-DD
        review_date: NaiveDate,
    },
    /// Render a notification, optionally sending it.
    Render {
        template: String,
        prohibition_number: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        body: Option<String>,
        /// Send the rendered email to this address (needs SMTP_HOST).
        #[arg(long)]
        send_to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let vips_config = VipsConfig::from_env();
    let log_level = vips_config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Install rustls crypto provider before any TLS usage
    install_crypto_provider();

    match cli.command {
        Command::Render {
            template,
            prohibition_number,
            full_name,
            body,
            send_to,
        } => render(&template, &prohibition_number, full_name, body, send_to).await,
        command => {
            let config = vips_config.context("VIPS API is not configured")?;
            query(VipsClient::new(config), command).await
        }
    }
}

async fn query(client: VipsClient, command: Command) -> anyhow::Result<()> {
    let correlation_id = generate_correlation_id();

    match command {
        Command::Health => print_response(&client.health_get().await),
        Command::Status { prohibition_number } => {
            print_response(&client.status_get(&prohibition_number, &correlation_id).await)
        }
        Command::Payment { prohibition_number } => {
            print_response(&client.payment_get(&prohibition_number, &correlation_id).await)
        }
        Command::Invoice { prohibition_number } => {
            match get_invoice_details(&client, &prohibition_number).await? {
                Some(details) => println!("{}", serde_json::to_string_pretty(&details)?),
                None => anyhow::bail!("No invoice details for prohibition {prohibition_number}"),
            }
        }
        Command::Ready {
            prohibition_number,
            last_name,
        } => {
            let (is_success, is_ready) =
                is_application_ready_for_payment(&client, &prohibition_number, &last_name).await;
            let summary = json!({ "is_success": is_success, "ready_for_payment": is_ready });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Schedule {
            notice_type,
            review_type,
            review_date,
        } => print_response(
            &client
                .schedule_get(&notice_type, &review_type, review_date, &correlation_id)
                .await,
        ),
        Command::Render { .. } => anyhow::bail!("render does not query VIPS"),
    }

    Ok(())
}

async fn render(
    template: &str,
    prohibition_number: &str,
    full_name: Option<String>,
    body: Option<String>,
    send_to: Option<String>,
) -> anyhow::Result<()> {
    let renderer = EmailRenderer::new()?;
    let mut context = EmailContext::new();
    context.full_name = full_name;
    context.body = body;

    let email = renderer.render_email(template, prohibition_number, context)?;

    let Some(to) = send_to else {
        println!("Subject: {}\n\n{}", email.subject, email.html);
        return Ok(());
    };

    let mail_config = MailConfig::from_env()?.context("SMTP_HOST is not set")?;
    let mailer = Mailer::new(mail_config);
    tokio::task::spawn_blocking(move || mailer.send(&to, &email)).await??;
    Ok(())
}

/// Install ring as the process-wide rustls provider. Returns false if a
/// provider was already installed.
fn install_crypto_provider() -> bool {
    match rustls::crypto::ring::default_provider().install_default() {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("rustls crypto provider already installed, keeping it");
            false
        }
    }
}

fn print_response(response: &ApiResponse) {
    let output = json!({ "is_success": response.is_success, "data": response.data });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_provider_installs_once() {
        install_crypto_provider();
        assert!(!install_crypto_provider());
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "vips-review",
            "render",
            "last_name_mismatch.html",
            "21900040",
            "--full-name",
            "Bob O'Brien",
        ])
        .unwrap();
        match cli.command {
            Command::Render {
                template,
                full_name,
                send_to,
                ..
            } => {
                assert_eq!(template, "last_name_mismatch.html");
                assert_eq!(full_name.as_deref(), Some("Bob O'Brien"));
                assert!(send_to.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
