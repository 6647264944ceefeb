use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reefwatch::net::types::{Alert, ForecastDataPoint, HistoricalDataPoint, SiteWithConditions};
use reefwatch::state::persist::PrefsFile;
use reefwatch::state::selectors::{active_alerts, high_risk_sites};
use reefwatch::util::format::{
    TemperatureUnit, difficulty_label, dhw_description, format_date, format_date_time, format_dhw, format_relative_time,
    format_short_date, format_temperature, trend_arrow,
};
use reefwatch::{
    AlertsCoordinator, ApiClient, ApiError, ChatClient, ChatOutcome, ClientConfig, ConditionsCoordinator,
    ConfigError, ReefApi, SiteDetailCoordinator, Store,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("backend unreachable at {0}")]
    Unreachable(String),
    #[error("unknown site `{0}`")]
    UnknownSite(String),
    #[error("chat request failed")]
    ChatFailed,
    #[error("nothing to send")]
    EmptyMessage,
    #[error("signal handler failed: {0}")]
    Signal(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "reefwatch", about = "ReefWatch Oahu reef-conditions console")]
struct Cli {
    /// Backend origin; overrides `REEFWATCH_API_URL`.
    #[arg(long, env = "REEFWATCH_API_URL")]
    api_url: Option<String>,

    /// Print raw JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Show temperatures in Fahrenheit.
    #[arg(long, global = true, default_value_t = false)]
    fahrenheit: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the backend root.
    Ping,
    /// Backend health report.
    Health,
    /// Current conditions for every site.
    Sites {
        /// Only sites at high or severe risk.
        #[arg(long, default_value_t = false)]
        at_risk: bool,
    },
    /// One site with its history and forecast.
    Site {
        site_id: String,
        #[arg(long)]
        history_days: Option<u32>,
        #[arg(long)]
        forecast_days: Option<u32>,
    },
    /// Active alerts.
    Alerts {
        /// Include inactive alerts.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Forecasts for one site, or for all sites.
    Forecast {
        site_id: Option<String>,
        #[arg(long)]
        days: Option<u32>,
    },
    /// Ask the reef assistant a question.
    Chat {
        #[arg(required = true)]
        message: Vec<String>,
        /// Use the request/response endpoint instead of the stream.
        #[arg(long, default_value_t = false)]
        no_stream: bool,
        /// Do not ask the backend to include current conditions.
        #[arg(long, default_value_t = false)]
        no_context: bool,
    },
    /// Forget the persisted chat session.
    ClearChat,
    /// Suggested assistant prompts for current conditions.
    Suggest,
    /// Ask the backend to refresh its data.
    Refresh,
    /// Run the coordinators and print a summary whenever data changes.
    Watch {
        /// Select this site so its detail is kept loaded.
        #[arg(long)]
        select: Option<String>,
        #[arg(long, default_value_t = 5)]
        render_every_secs: u64,
    },
    /// Show or toggle the persisted dark-mode preference.
    Theme {
        #[arg(long, default_value_t = false)]
        toggle: bool,
    },
}

struct CliContext {
    config: ClientConfig,
    api: Arc<ApiClient>,
    store: Store,
    json: bool,
    unit: TemperatureUnit,
}

impl CliContext {
    fn new(cli: &Cli) -> Result<Self, CliError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &cli.api_url {
            config = config.with_api_url(url)?;
        }
        let api = Arc::new(ApiClient::from_config(&config)?);
        let store = match &config.storage_dir {
            Some(dir) => Store::with_persistence(PrefsFile::in_dir(dir)),
            None => Store::new(),
        };
        let unit = if cli.fahrenheit { TemperatureUnit::Fahrenheit } else { TemperatureUnit::Celsius };
        Ok(Self { config, api, store, json: cli.json, unit })
    }

    fn reef_api(&self) -> Arc<dyn ReefApi> {
        self.api.clone()
    }

    fn conditions(&self) -> ConditionsCoordinator {
        ConditionsCoordinator::from_config(self.reef_api(), self.store.clone(), &self.config)
    }

    fn alerts(&self) -> AlertsCoordinator {
        AlertsCoordinator::from_config(self.reef_api(), self.store.clone(), &self.config)
    }

    fn chat(&self, include_context: bool) -> ChatClient {
        ChatClient::new(self.reef_api(), self.store.clone()).with_context(include_context)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = CliContext::new(&cli)?;
    debug!(api_url = %ctx.config.api_url, "console starting");

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Health => run_health(&ctx).await,
        Command::Sites { at_risk } => run_sites(&ctx, at_risk).await,
        Command::Site { site_id, history_days, forecast_days } => {
            run_site(&ctx, &site_id, history_days, forecast_days).await
        }
        Command::Alerts { all } => run_alerts(&ctx, all).await,
        Command::Forecast { site_id, days } => run_forecast(&ctx, site_id.as_deref(), days).await,
        Command::Chat { message, no_stream, no_context } => {
            run_chat(&ctx, &message.join(" "), !no_stream, !no_context).await
        }
        Command::ClearChat => run_clear_chat(&ctx).await,
        Command::Suggest => run_suggest(&ctx).await,
        Command::Refresh => run_refresh(&ctx).await,
        Command::Watch { select, render_every_secs } => {
            run_watch(&ctx, select.as_deref(), Duration::from_secs(render_every_secs.max(1))).await
        }
        Command::Theme { toggle } => run_theme(&ctx, toggle),
    }
}

// =============================================================================
// ONE-SHOT COMMANDS
// =============================================================================

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    if !ctx.api.check_connection().await {
        return Err(CliError::Unreachable(ctx.config.api_url.clone()));
    }
    println!("ok");
    Ok(())
}

async fn run_health(ctx: &CliContext) -> Result<(), CliError> {
    let health = ctx.api.health().await?;
    if ctx.json {
        return print_json(&health);
    }
    println!("status:  {:?}", health.status);
    println!("version: {}", health.version);
    println!("checked: {}", format_date_time(&health.timestamp));
    let mut checks: Vec<_> = health.checks.iter().collect();
    checks.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in checks {
        println!("  {name}: {value}");
    }
    Ok(())
}

async fn run_sites(ctx: &CliContext, at_risk: bool) -> Result<(), CliError> {
    ctx.conditions().refresh().await?;
    let snapshot = ctx.store.snapshot();
    let sites: Vec<&SiteWithConditions> = if at_risk {
        high_risk_sites(&snapshot.data.sites)
    } else {
        snapshot.data.sites.iter().collect()
    };
    if ctx.json {
        return print_json(&sites);
    }
    if let Some(date) = &snapshot.data.data_date {
        println!("data date: {}", format_date(date));
    }
    for site in sites {
        println!("{}", site_line(site, ctx.unit));
    }
    Ok(())
}

async fn run_site(
    ctx: &CliContext,
    site_id: &str,
    history_days: Option<u32>,
    forecast_days: Option<u32>,
) -> Result<(), CliError> {
    let mut config = ctx.config.clone();
    if let Some(days) = history_days {
        config.history_days = days;
    }
    if let Some(days) = forecast_days {
        config.forecast_days = days;
    }

    ctx.conditions().refresh().await?;
    if !ctx.store.select_site_by_id(site_id) {
        return Err(CliError::UnknownSite(site_id.to_owned()));
    }
    SiteDetailCoordinator::from_config(ctx.reef_api(), ctx.store.clone(), &config)
        .load(site_id)
        .await?;

    let Some(selected) = ctx.store.read(|s| s.data.selected.clone()) else {
        return Err(CliError::UnknownSite(site_id.to_owned()));
    };
    if ctx.json {
        return print_json(&serde_json::json!({
            "site": selected.site,
            "history": selected.history,
            "forecast": selected.forecast,
        }));
    }

    let site = &selected.site;
    println!("{} ({})", site.site.name, site.site.id);
    println!("  {}", site.site.description);
    println!("  difficulty: {}", difficulty_label(site.site.difficulty));
    println!("  best conditions: {}", site.site.best_conditions);
    if !site.site.facilities.is_empty() {
        println!("  facilities: {}", site.site.facilities.join(", "));
    }
    let dhw = site.conditions.as_ref().and_then(|c| c.dhw);
    println!("  risk: {} ({})", site.risk.level(), site.risk.description());
    println!("  heat stress: {} - {}", format_dhw(dhw), dhw_description(dhw));

    if let Some(history) = &selected.history {
        println!("history ({} days):", history.len());
        for point in history {
            println!("  {}", history_line(point, ctx.unit));
        }
    }
    if let Some(forecast) = &selected.forecast {
        println!("forecast:");
        for point in forecast {
            println!("  {}", forecast_line(point, ctx.unit));
        }
    }
    Ok(())
}

async fn run_alerts(ctx: &CliContext, all: bool) -> Result<(), CliError> {
    ctx.alerts().refresh().await?;
    let alerts = ctx.store.read(|s| s.data.alerts.clone());
    let shown: Vec<&Alert> = if all { alerts.iter().collect() } else { active_alerts(&alerts) };
    if ctx.json {
        return print_json(&shown);
    }
    if shown.is_empty() {
        println!("no alerts");
    }
    let now = chrono::Utc::now();
    for alert in shown {
        println!(
            "[{:?}] {} ({})",
            alert.severity,
            alert.title,
            format_relative_time(&alert.created_at, now)
        );
        println!("  {}", alert.description);
        if !alert.affected_sites.is_empty() {
            println!("  sites: {}", alert.affected_sites.join(", "));
        }
    }
    Ok(())
}

async fn run_forecast(ctx: &CliContext, site_id: Option<&str>, days: Option<u32>) -> Result<(), CliError> {
    let forecasts = match site_id {
        Some(id) => vec![ctx.api.site_forecast(id, days).await?],
        None => ctx.api.forecasts(days).await?.forecasts,
    };
    if ctx.json {
        return print_json(&forecasts);
    }
    for forecast in &forecasts {
        println!("{} ({})", forecast.site_name, forecast.model_version);
        for point in &forecast.forecast {
            println!("  {}", forecast_line(point, ctx.unit));
        }
    }
    Ok(())
}

async fn run_chat(ctx: &CliContext, message: &str, stream: bool, include_context: bool) -> Result<(), CliError> {
    let chat = ctx.chat(include_context);
    let outcome = if stream {
        let outcome = chat
            .send_streaming_observed(message, |chunk| {
                print!("{chunk}");
                if let Err(e) = io::stdout().flush() {
                    debug!(error = %e, "stdout flush failed");
                }
            })
            .await;
        println!();
        outcome
    } else {
        let outcome = chat.send(message).await;
        if outcome == ChatOutcome::Replied {
            if let Some(reply) = ctx.store.read(|s| s.chat.messages.last().map(|m| m.content.clone())) {
                println!("{reply}");
            }
        }
        outcome
    };

    match outcome {
        ChatOutcome::Replied => {
            if let Some(session) = ctx.store.read(|s| s.chat.session_id.clone()) {
                info!(session_id = %session, "chat session");
            }
            Ok(())
        }
        ChatOutcome::Failed => Err(CliError::ChatFailed),
        ChatOutcome::Ignored => Err(CliError::EmptyMessage),
    }
}

async fn run_clear_chat(ctx: &CliContext) -> Result<(), CliError> {
    let had_session = ctx.store.read(|s| s.chat.session_id.is_some());
    ctx.chat(true).clear().await;
    println!("{}", if had_session { "chat session cleared" } else { "no chat session" });
    Ok(())
}

async fn run_suggest(ctx: &CliContext) -> Result<(), CliError> {
    let (conditions, alerts) = (ctx.conditions(), ctx.alerts());
    let (conditions, alerts) = tokio::join!(conditions.refresh(), alerts.refresh());
    conditions?;
    alerts?;
    let prompts = ctx.chat(true).suggestions();
    if ctx.json {
        return print_json(&prompts);
    }
    for prompt in prompts {
        println!("- {prompt}");
    }
    Ok(())
}

async fn run_refresh(ctx: &CliContext) -> Result<(), CliError> {
    let result = ctx.api.refresh_data().await?;
    if ctx.json {
        return print_json(&result);
    }
    match result.records_updated {
        Some(n) => println!("{}: {} ({n} records)", result.status, result.message),
        None => println!("{}: {}", result.status, result.message),
    }
    Ok(())
}

fn run_theme(ctx: &CliContext, toggle: bool) -> Result<(), CliError> {
    if toggle {
        ctx.store.toggle_dark_mode();
    }
    println!("{}", reefwatch::util::dark_mode::theme_name());
    if ctx.config.storage_dir.is_none() && toggle {
        info!("REEFWATCH_STORAGE_DIR unset; preference not persisted");
    }
    Ok(())
}

// =============================================================================
// WATCH
// =============================================================================

#[derive(PartialEq, Eq)]
struct Summary {
    last_updated: Option<String>,
    alerts: usize,
    detail: Option<(String, bool)>,
    error: Option<String>,
}

fn summarize(store: &Store) -> Summary {
    store.read(|s| Summary {
        last_updated: s.data.last_updated.clone(),
        alerts: s.data.alerts.len(),
        detail: s.data.selected.as_ref().map(|sel| (sel.id().to_owned(), sel.is_complete())),
        error: s.ui.error.clone(),
    })
}

async fn run_watch(ctx: &CliContext, select: Option<&str>, render_every: Duration) -> Result<(), CliError> {
    // Sites must be present before a selection can resolve.
    ctx.conditions().refresh().await?;
    if let Some(id) = select {
        if !ctx.store.select_site_by_id(id) {
            return Err(CliError::UnknownSite(id.to_owned()));
        }
    }

    let handles = [
        ctx.conditions().activate(),
        ctx.alerts().activate(),
        SiteDetailCoordinator::from_config(ctx.reef_api(), ctx.store.clone(), &ctx.config).activate(),
    ];

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(render_every);
    let mut last: Option<Summary> = None;

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            _ = ticker.tick() => {
                let summary = summarize(&ctx.store);
                if last.as_ref() != Some(&summary) {
                    render_watch(&ctx.store, ctx.unit);
                    last = Some(summary);
                }
            }
        }
    }

    for handle in handles {
        handle.cancel();
    }
    Ok(())
}

fn render_watch(store: &Store, unit: TemperatureUnit) {
    let snapshot = store.snapshot();
    let now = chrono::Utc::now();
    let updated = snapshot
        .data
        .last_updated
        .as_deref()
        .map_or_else(|| "never".to_owned(), |t| format_relative_time(t, now));
    println!("--- {} sites, updated {updated}", snapshot.data.sites.len());
    for site in high_risk_sites(&snapshot.data.sites) {
        println!("  {}", site_line(site, unit));
    }
    println!("  {} active alerts", active_alerts(&snapshot.data.alerts).len());
    if let Some(selected) = &snapshot.data.selected {
        let history = selected.history.as_ref().map_or(0, Vec::len);
        let forecast = selected.forecast.as_ref().map_or(0, Vec::len);
        println!("  selected {}: {history} history, {forecast} forecast", selected.id());
    }
    if let Some(error) = &snapshot.ui.error {
        println!("  error: {error}");
    }
}

// =============================================================================
// RENDERING
// =============================================================================

fn site_line(site: &SiteWithConditions, unit: TemperatureUnit) -> String {
    let conditions = site.conditions.as_ref();
    format!(
        "{:<24} {:<9} {} {} dhw {}",
        site.site.name,
        site.risk.level(),
        format_temperature(conditions.and_then(|c| c.sst), unit),
        trend_arrow(conditions.and_then(|c| c.temperature_trend)),
        format_dhw(conditions.and_then(|c| c.dhw)),
    )
}

fn history_line(point: &HistoricalDataPoint, unit: TemperatureUnit) -> String {
    format!(
        "{:<7} {} dhw {}",
        format_short_date(&point.date),
        format_temperature(point.sst, unit),
        format_dhw(point.dhw)
    )
}

fn forecast_line(point: &ForecastDataPoint, unit: TemperatureUnit) -> String {
    format!(
        "{:<7} {} dhw {} {} ({:.0}%)",
        format_short_date(&point.date),
        format_temperature(Some(point.predicted_sst), unit),
        format_dhw(Some(point.predicted_dhw)),
        point.predicted_risk,
        point.confidence * 100.0
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
