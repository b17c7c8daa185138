use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use union_portal::auth::{AuthState, OtpService, SessionGate};
use union_portal::config::AppConfig;
use union_portal::error::AppError;
use union_portal::telemetry;
use union_portal::unions::{PortalState, UnionRegistryService};

use crate::cli::ServeArgs;
use crate::infra::{
    default_eligibility_config, AppState, DevSmsSender, InMemoryUnionRegistry,
    StaticDocumentExtractor,
};
use crate::routes::portal_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let registry = Arc::new(InMemoryUnionRegistry::default());
    let sender = Arc::new(DevSmsSender::default());
    let extractor = Arc::new(StaticDocumentExtractor::unconfigured());
    let gate = Arc::new(SessionGate::new(config.admin.credentials()));
    let otp = Arc::new(OtpService::new(sender, config.otp.policy()));
    let service = Arc::new(UnionRegistryService::new(
        registry.clone(),
        default_eligibility_config(),
    ));

    let app = portal_routes(
        AuthState {
            otp,
            gate: gate.clone(),
            registry,
        },
        PortalState {
            service,
            gate,
            extractor,
        },
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "union registration portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
