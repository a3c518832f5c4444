mod bootstrap;
mod di;
mod server;

use bastion_dns_application::ports::DnsServerControl;
use bastion_dns_application::use_cases::CleanupOldQueryLogsUseCase;
use bastion_dns_domain::CliOverrides;
use bastion_dns_infrastructure::dns::{spawn_purge_task, PURGE_INTERVAL};
use bastion_dns_jobs::{BlocklistRefreshJob, JobRunner, QueryLogRetentionJob};
use clap::Parser;
use di::{DnsServices, Repositories, UseCases};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "bastion-dns")]
#[command(version, about = "Filtering DNS forwarder with an HTTP admin API", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long, value_name = "PORT")]
    dns_port: Option<u16>,

    /// Admin API port
    #[arg(short = 'w', long, value_name = "PORT")]
    web_port: Option<u16>,

    /// Bind address for both listeners
    #[arg(short = 'b', long, value_name = "ADDRESS")]
    bind: Option<String>,

    /// Database path
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = CliOverrides {
        dns_port: cli.dns_port,
        web_port: cli.web_port,
        bind_address: cli.bind,
        database_path: cli.database,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    let config_path = bastion_dns_domain::Config::resolve_path(cli.config.as_deref());
    bootstrap::init_logging(&config);

    info!("Starting Bastion DNS v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path),
        None => info!("No configuration file found, using defaults"),
    }
    info!(
        "DNS {} | API {} | upstreams: {:?}",
        config.server.dns_bind(),
        config.server.web_bind(),
        config.dns.upstream_servers
    );

    let pool = bootstrap::init_database(&config.database).await?;
    let repos = Repositories::new(pool, config.clone(), config_path.map(PathBuf::from));
    let dns = DnsServices::new(&repos, &config).await?;

    let shutdown = CancellationToken::new();
    let retention_job = QueryLogRetentionJob::new(
        Arc::new(CleanupOldQueryLogsUseCase::new(repos.query_log.clone())),
        config.database.log_retention_days,
    )
    .with_cancellation(shutdown.clone());
    let use_cases = UseCases::new(&repos, &dns, retention_job.window());

    if config.blocking.default_blocklists {
        if let Err(e) = use_cases.seed_blocklists.execute().await {
            warn!(error = %e, "Failed to seed default blocklists");
        }
    }

    let initial_refresh = use_cases.refresh_blocklists.clone();
    tokio::spawn(async move {
        if let Err(e) = initial_refresh.execute().await {
            error!(error = %e, "Initial blocklist refresh failed");
        }
    });

    server::start_dns_server(&dns.controller).await?;
    spawn_purge_task(dns.cache.clone(), PURGE_INTERVAL, shutdown.clone());

    JobRunner::new()
        .with_blocklist_refresh(
            BlocklistRefreshJob::new(use_cases.refresh_blocklists.clone())
                .with_interval(config.blocking.refresh_interval)
                .with_cancellation(shutdown.clone()),
        )
        .with_query_log_retention(retention_job)
        .start()
        .await;

    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                signal.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let web_result =
        server::start_web_server(&config.server, use_cases.state, shutdown.clone()).await;
    shutdown.cancel();

    if dns.controller.is_running() {
        if let Err(e) = dns.controller.stop().await {
            warn!(error = %e, "DNS server did not stop cleanly");
        }
    }
    repos.query_log.flush().await;
    info!("Bastion DNS stopped");

    web_result
}
