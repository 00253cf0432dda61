pub mod api;

use crate::cli::Args;
use api::AppState;
use log::{ error, info };
use std::error::Error;
use std::net::SocketAddr;

pub struct Server {
    addr: String,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(addr: String, state: AppState, args: Args) -> Self {
        Self { addr, state, args }
    }

    /// Serves until the listener fails. TLS is used when enabled and both
    /// PEM paths are given.
    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let app = api::router(self.state);

        match (self.args.enable_tls, &self.args.tls_cert_path, &self.args.tls_key_path) {
            (true, Some(cert_path), Some(key_path)) => {
                let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    cert_path,
                    key_path
                ).await?;
                info!("HTTPS server listening on https://{}", addr);
                axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
            }
            (true, _, _) => {
                error!("ENABLE_TLS is set but TLS_CERT_PATH or TLS_KEY_PATH is missing");
                return Err("incomplete TLS configuration".into());
            }
            _ => {
                let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                    error!("Failed to bind HTTP server to {}: {}", addr, e);
                    e
                })?;
                info!("HTTP server listening on http://{}", addr);
                axum::serve(listener, app.into_make_service()).await?;
            }
        }
        Ok(())
    }
}
