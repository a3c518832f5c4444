use bastion_dns_application::ports::DnsServerControl;
use bastion_dns_infrastructure::dns::DnsServerController;
use tracing::info;

/// Binds the UDP and TCP listeners. A bind failure aborts startup.
pub async fn start_dns_server(controller: &DnsServerController) -> anyhow::Result<()> {
    controller.start().await?;
    if let Some(addr) = controller.local_addr() {
        info!("DNS server listening on {} (UDP + TCP)", addr);
    }
    Ok(())
}
