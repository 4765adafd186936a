use concertalert::config::env_loader::load_config;
use concertalert::mail::api::MailAPI;
use concertalert::shutdown::ShutdownSignal;
use concertalert::store::JsonFileStore;
use concertalert::ticketmaster::api::TicketmasterAPI;
use concertalert::tracing::setup_loki;
use concertalert::watcher::Watcher;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let loki = setup_loki().await;

    info!("Concert alert running...");

    let exit_code = match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    };

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;
        let _ = handle.await;
    }

    exit_code
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    info!(
        "Watching '{}' in {} (up to {} events)",
        config.ticketmaster.query.keyword,
        config.ticketmaster.query.country_code,
        config.ticketmaster.query.size
    );

    let watcher = Watcher::new(
        TicketmasterAPI::new(&config.ticketmaster),
        MailAPI::new(&config.mail, config.debug_config.skip_sending)?,
        JsonFileStore::new(&config.events_file),
        config.poll_interval,
    );

    if config.debug_config.run_once {
        let report = watcher.run_cycle().await?;
        info!("Single run finished: {:?}", report);
        return Ok(());
    }

    let shutdown = ShutdownSignal::install()?;

    watcher.run(shutdown.recv()).await?;

    Ok(())
}
