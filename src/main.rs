use anyhow::{Context, Result};
use areatrack::config::Config;
use areatrack::context::AppContext;
use areatrack::error::AppError;
use areatrack::logger::Logger;
use areatrack::notifications::Notifications;
use areatrack::utils::datetime;
use std::path::PathBuf;

const USAGE: &str = "Usage: areatrack <command>

Commands:
  init-config [path]     Write a default configuration file
  seed                   Create the configured areas
  sweep [YYYY-MM-DD]     Mark overdue subtasks as Retrasado, as of today or the given date
  dashboard <username>   Print the dashboard of a user as JSON";

fn print_notices(notifications: &Notifications) {
    for notice in notifications.drain() {
        eprintln!("{}", notice.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{}", USAGE);
        return Ok(());
    };

    if command == "init-config" {
        let path = match args.get(1) {
            Some(path) => PathBuf::from(path),
            None => Config::get_default_config_path()?,
        };
        return Config::generate_default_config(path);
    }

    let config = Config::load()?;
    let logger = Logger::from_config(&config.logging)?;
    logger.install()?;

    let ctx = AppContext::new(config, logger).await?;

    let outcome: Result<(), AppError> = match command {
        "seed" => ctx.service.seed_areas(&ctx.config.seed.areas).await.map(|created| {
            println!("🌱 Created {} area(s)", created);
        }),
        "sweep" => {
            let as_of = match args.get(1) {
                Some(date) => datetime::parse_date(date).with_context(|| format!("Invalid date '{}'", date))?,
                None => datetime::today(),
            };
            ctx.service.sweep_overdue_subtasks_on(as_of).await.map(|report| {
                println!("⏰ Marked {} subtask(s) as Retrasado", report.marked);
            })
        }
        "dashboard" => {
            let username = args.get(1).context("dashboard needs a username")?;
            match ctx.service.principal_by_login(username).await? {
                Some(principal) => match ctx.service.dashboard(&principal).await {
                    Ok(dashboard) => {
                        let json = serde_json::to_string_pretty(&dashboard).context("Failed to serialize dashboard")?;
                        println!("{}", json);
                        Ok(())
                    }
                    Err(err) => Err(err),
                },
                None => {
                    eprintln!("❌ Unknown user '{}'", username);
                    Ok(())
                }
            }
        }
        other => {
            eprintln!("❌ Unknown command '{}'\n\n{}", other, USAGE);
            Ok(())
        }
    };

    if let Err(err) = &outcome {
        ctx.service.report(err);
    }
    print_notices(&ctx.notifications);

    outcome.map_err(anyhow::Error::from)
}
