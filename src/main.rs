mod collectors;
mod config;
mod mailer;
mod render;
mod report;

use chrono::Local;
use clap::Parser;
use collectors::CollectorError;
use config::Config;
use mailer::{MailSettings, Mailer};
use report::Report;
use sysinfo::{System, SystemExt};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vpsreport")]
#[command(version)]
struct Cli {
    #[arg(long, default_value = "./config.yaml")]
    config: String,
    #[arg(long)]
    print_default_config: bool,
    #[arg(long, conflicts_with = "mail_off")]
    mail_on: bool,
    #[arg(long, conflicts_with = "mail_on")]
    mail_off: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_yaml());
        return;
    }

    let mut cfg = match Config::load_from_file(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(error = %err, "could not load configuration");
            std::process::exit(1);
        }
    };
    if cli.mail_on {
        cfg.mail.enabled = true;
    } else if cli.mail_off {
        cfg.mail.enabled = false;
    }

    let mailer = if cfg.mail.enabled {
        let settings = match ensure_mail_settings(&cfg) {
            Ok(settings) => settings,
            Err(err) => {
                error!(error = %err, "could not resolve mail settings");
                std::process::exit(1);
            }
        };
        match Mailer::new(&settings) {
            Ok(mailer) => Some(mailer),
            Err(err) => {
                error!(error = %err, "could not configure the mail transport");
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    info!(
        services = ?cfg.services,
        log_lines = cfg.log_lines,
        mail = cfg.mail.enabled,
        "starting health report run"
    );

    if let Err(err) = run_report(&cfg, mailer.as_ref()).await {
        error!(error = %err, "health report run failed");
        std::process::exit(1);
    }
}

/// One complete run: collect, compose, render, dispatch once. Only the
/// host inspection is a hard failure; every other collector degrades into
/// a placeholder section, and a delivery failure is logged without
/// failing the run.
async fn run_report(cfg: &Config, mailer: Option<&Mailer>) -> Result<(), CollectorError> {
    let mut system = System::new();

    info!("inspecting host");
    let host = collectors::host::inspect(&system).await?;
    let memory = collectors::host::memory_load(&mut system);

    info!("querying the process manager");
    let processes = collectors::processes::census().await;

    info!("auditing the cron schedule");
    let schedule = collectors::schedule::audit(report::SCHEDULE_CATALOG).await;

    info!("tailing service logs");
    let tails = futures::future::join_all(
        cfg.services
            .iter()
            .map(|service| collectors::logs::tail(service, cfg.log_lines)),
    )
    .await;
    let log_tails = cfg.services.iter().cloned().zip(tails).collect();

    let report = Report::compose(host, memory, processes, schedule, log_tails, Local::now());
    let html = render::render_html(&report);

    match mailer {
        Some(mailer) => match mailer.send(html, report.generated_at).await {
            Ok(receipt) => info!(receipt = %receipt, "report delivered"),
            Err(err) => error!(error = %err, "report delivery failed"),
        },
        None => {
            info!("mail disabled, writing the report to stdout");
            println!("{html}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn ensure_mail_settings(cfg: &Config) -> Result<MailSettings, String> {
    let mail = &cfg.mail;

    let username = env_value(&mail.username_env).ok_or_else(|| {
        format!(
            "mail username missing: set '{}' in the environment",
            mail.username_env
        )
    })?;
    let password = env_value(&mail.password_env).ok_or_else(|| {
        format!(
            "mail password missing: set '{}' in the environment",
            mail.password_env
        )
    })?;
    let to = mail
        .to
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env_value(&mail.recipient_env))
        .ok_or_else(|| {
            format!(
                "mail recipient missing: set '{}' in the environment or mail.to in config",
                mail.recipient_env
            )
        })?;
    let from = mail
        .from
        .clone()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| username.clone());

    Ok(MailSettings {
        smtp_host: mail.smtp_host.clone(),
        smtp_port: mail.smtp_port,
        username,
        password,
        from,
        to,
    })
}
