use ai_news_crawler::config::{init_logger, load_environment, AppConfig};
use ai_news_crawler::pipeline::run_digest;
use ai_news_crawler::services::scheduler::{run_scheduler, DigestTrigger};
use ai_news_crawler::services::youtube_api::YouTubeClient;
use anyhow::Result;
use chrono::Local;
use log::{error, info};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    load_environment();
    init_logger();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let api = YouTubeClient::new(&config.api_base_url, &config.youtube_api_key);

    let result = match std::env::args().nth(1).as_deref() {
        Some("schedule") => run_weekly_scheduler(&api, &config).await,
        _ => run_once(&api, &config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run_once(api: &YouTubeClient, config: &AppConfig) -> Result<()> {
    run_digest(api, config).await?;
    Ok(())
}

async fn run_weekly_scheduler(api: &YouTubeClient, config: &AppConfig) -> Result<()> {
    let trigger = DigestTrigger::new(&config.scheduler.schedule, &Local::now())?;
    info!(
        "Scheduler started with schedule '{}' - press Ctrl+C to stop",
        config.scheduler.schedule
    );

    run_scheduler(
        trigger,
        config.scheduler.poll_interval,
        Local::now,
        || async {
            if let Err(e) = run_digest(api, config).await {
                error!("Scheduled digest run failed: {e:?}");
            }
        },
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
        },
    )
    .await;

    Ok(())
}
