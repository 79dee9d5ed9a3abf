use std::sync::Arc;

use poem::{
    EndpointExt, Route, Server as PoemServer, listener::TcpListener, middleware::Tracing,
};
use poem_openapi::OpenApiService;

use crate::middleware::metrics::{self, HttpMetrics, RequestMetrics};
use crate::middleware::recovery;
use crate::{config::app_config::AppConfig, setup::dependency_injection::DependencyContainer};

pub struct Server;

impl Server {
    pub async fn run(config: AppConfig, container: DependencyContainer) -> anyhow::Result<()> {
        let addr = config.server.bind_address();
        let api_service = OpenApiService::new(
            (
                container.health_api,
                container.shell_api,
                container.executions_api,
            ),
            "Ops Agent API",
            "0.1.0",
        )
        .server(format!("http://{}", addr));
        let ui = api_service.swagger_ui();
        let spec = api_service.spec_endpoint();

        let http_metrics = Arc::new(HttpMetrics::new()?);

        let app = Route::new()
            .nest("/", api_service)
            .nest("/docs", ui)
            .nest("/openapi.json", spec)
            .at("/metrics", poem::get(metrics::exporter))
            .data(http_metrics.clone())
            .with(config.cors)
            .with(recovery::catch_panic())
            .with(RequestMetrics::new(http_metrics))
            .with(Tracing);

        println!("Server running at http://{}", addr);
        println!("Swagger UI at http://{}/docs", addr);
        println!("OpenAPI JSON at http://{}/openapi.json", addr);
        println!("Metrics at http://{}/metrics", addr);
        PoemServer::new(TcpListener::bind(&addr)).run(app).await?;
        Ok(())
    }
}
