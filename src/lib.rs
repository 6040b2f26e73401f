pub mod config;
pub mod convert;
pub mod currencies;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod rates;
pub mod session;
pub mod shell;
pub mod ui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use comfy_table::Cell;
use tracing::{debug, info};

use crate::rate_provider::RateProvider;
use crate::rates::RateTable;

pub enum AppCommand {
    Interactive,
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::open_er_api::OpenErApiProvider::new(
        &config.provider.base_url,
        &config.base_currency,
        Duration::from_secs(config.timeout_secs),
    );

    match command {
        AppCommand::Interactive => shell::run(Arc::new(provider), &config.preferred_target).await,
        AppCommand::Convert { amount, from, to } => {
            convert_once(&provider, &amount, &from, &to).await
        }
        AppCommand::Currencies => list_currencies(&provider).await,
    }
}

async fn fetch_with_spinner(provider: &dyn RateProvider) -> Result<RateTable> {
    let spinner = ui::new_spinner("Loading exchange rates...");
    let outcome = provider.fetch_rates().await;
    spinner.finish_and_clear();
    Ok(outcome?)
}

async fn convert_once(
    provider: &dyn RateProvider,
    amount: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    // Amount validation happens before any network traffic.
    let amount = convert::parse_amount(amount)?;

    let table = fetch_with_spinner(provider).await?;

    let from = from.to_uppercase();
    let to = to.to_uppercase();
    let conversion = convert::convert(amount, &from, &to, &table)?;

    println!(
        "{}",
        ui::style_text(&conversion.to_string(), ui::StyleType::Result)
    );
    println!(
        "{}",
        ui::style_text(
            &format!("Exchange rates updated at {}", table.last_update()),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}

async fn list_currencies(provider: &dyn RateProvider) -> Result<()> {
    let table = fetch_with_spinner(provider).await?;

    let mut out = ui::new_styled_table();
    out.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell(&format!("Rate ({})", table.base())),
    ]);

    for code in table.codes() {
        if let Some(rate) = table.rate(&code) {
            out.add_row(vec![
                Cell::new(&code),
                Cell::new(currencies::full_name(&code)),
                ui::rate_cell(rate),
            ]);
        }
    }

    println!("{out}");
    println!(
        "{}",
        ui::style_text(
            &format!(
                "{} currencies, updated at {}",
                table.len(),
                table.last_update()
            ),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
