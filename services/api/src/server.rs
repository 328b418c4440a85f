use crate::cli::ServeArgs;
use crate::infra::{AppState, Stores};
use crate::routes::{with_site_routes, SiteServices};
use crate::seed;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use realty_site::auth::{AdminCredentials, TokenAuthority};
use realty_site::config::AppConfig;
use realty_site::error::AppError;
use realty_site::notify::{Dispatcher, NoticePlanner, NotificationQueue, NotificationWorker};
use realty_site::seo::{HttpSeoSource, SeoResolver};
use realty_site::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let stores = Stores::default();
    if args.seed {
        let summary = seed::load(&stores)?;
        info!(properties = ?summary.property_ids, blog = ?summary.blog_slugs, "serving demo catalog");
    }

    let (queue, jobs) = NotificationQueue::channel(config.notifications.queue_capacity);
    let dispatcher = Dispatcher::from_config(&config.notifications)?;
    let planner = NoticePlanner::from_config(&config.notifications, &config.site.site_name);
    tokio::spawn(NotificationWorker::new(jobs, planner, dispatcher).run());

    let resolver = match &config.api_base_url {
        Some(api_base) => {
            info!(%api_base, "seo payloads fetched from remote api");
            SeoResolver::new(
                config.site.clone(),
                Arc::new(HttpSeoSource::new(
                    api_base.clone(),
                    config.notifications.outbound_timeout,
                )),
            )
        }
        None => SeoResolver::new(config.site.clone(), stores.seo_source(&config.site)),
    };

    let credentials = AdminCredentials::from_config(&config.auth);
    if credentials.is_none() {
        warn!("ADMIN_EMAIL or ADMIN_PASSWORD missing; admin login disabled");
    }

    let services = SiteServices {
        content: stores.content_service(),
        properties: stores.property_service(),
        contacts: stores.contact_service(Arc::new(queue)),
        resolver,
        authority: TokenAuthority::new(&config.auth.jwt_secret, config.auth.token_ttl_hours),
        credentials,
    };

    let app = with_site_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, site = %config.site.base_url, "realty site api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
