use crate::api::{router, AppState};
use crate::configuration::Context;
use crate::core::service_manager::{Error as ServiceManagerError, Service};
use async_trait::async_trait;
use tokio::net::TcpListener;
use tracing::info;

pub struct HttpService {
    address: String,
    state: AppState,
}

#[async_trait]
impl Service for HttpService {
    type Context = Context;

    async fn new(context: Context) -> Self {
        Self {
            address: context.config.bind_address(),
            state: AppState::new(context.store.clone()),
        }
    }

    async fn run(self) -> Result<(), ServiceManagerError> {
        let app = router(self.state);

        let listener = TcpListener::bind(&self.address)
            .await
            .map_err(|e| ServiceManagerError::new(&format!("Failed to bind {}: {}", self.address, e)))?;

        info!("User directory HTTP server running on {}", self.address);

        axum::serve(listener, app)
            .await
            .map_err(|e| ServiceManagerError::new(&format!("HTTP server error: {}", e)))
    }
}
