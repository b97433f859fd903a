use std::sync::Arc;

use crate::{cli::build_service, config::Config, error, info, server::start_api_server};

pub async fn serve(config: &Config, in_memory: bool) {
    let service = Arc::new(build_service(config, in_memory));

    info!("Serving on http://{}", config.server_addr);
    if let Err(e) = start_api_server(service, config.server_addr).await {
        error!("Server stopped. Err: {}", e);
    }
}
