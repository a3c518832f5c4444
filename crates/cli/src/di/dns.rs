use super::Repositories;
use bastion_dns_application::ports::FilterEnginePort;
use bastion_dns_domain::Config;
use bastion_dns_infrastructure::dns::{
    AnswerCache, DnsServerController, FilterEngine, QueryHandler, QueryMetrics, RuleCompiler,
    UpstreamForwarder,
};
use std::sync::Arc;
use tracing::error;

pub struct DnsServices {
    pub engine: Arc<FilterEngine>,
    pub forwarder: Arc<UpstreamForwarder>,
    pub cache: Arc<AnswerCache>,
    pub metrics: QueryMetrics,
    pub handler: Arc<QueryHandler>,
    pub controller: Arc<DnsServerController>,
}

impl DnsServices {
    /// Builds the resolver and compiles the stored rules. A store failure
    /// leaves the engine forwarding everything until the next reload.
    pub async fn new(repos: &Repositories, config: &Config) -> anyhow::Result<Self> {
        let compiler = RuleCompiler::new(
            repos.blocklists.clone(),
            repos.filters.clone(),
            repos.rewrites.clone(),
            repos.client_settings.clone(),
            repos.client_rules.clone(),
        );
        let engine = Arc::new(FilterEngine::new(compiler, config.blocking.enabled));
        if let Err(e) = engine.reload().await {
            error!(error = %e, "Initial filter compile failed");
        }

        let forwarder = Arc::new(UpstreamForwarder::from_config(config)?);
        let cache = Arc::new(AnswerCache::from_config(config));
        let metrics = QueryMetrics::new();
        let handler = Arc::new(
            QueryHandler::new(
                engine.clone(),
                forwarder.clone(),
                repos.query_log.clone(),
                metrics.clone(),
                config,
            )
            .with_cache(cache.clone()),
        );
        let controller = Arc::new(DnsServerController::new(
            handler.clone(),
            forwarder.clone(),
            repos.config.clone(),
        ));

        Ok(Self {
            engine,
            forwarder,
            cache,
            metrics,
            handler,
            controller,
        })
    }
}
