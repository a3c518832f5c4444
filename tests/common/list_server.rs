use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

/// Serves one blocklist body over HTTP at `/list.txt`.
pub struct ListServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
}

impl ListServer {
    pub async fn start(body: &'static str) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();

        let app = Router::new().route("/list.txt", get(move || async move { body }));
        let token = shutdown.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(token.cancelled_owned())
                .await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self) -> String {
        format!("http://{}/list.txt", self.addr)
    }
}

impl Drop for ListServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
