use axum::{
    handler::Handler,
    http::HeaderValue,
    middleware::{self, from_fn},
    routing::{delete, get, put},
    Router,
};
use domain::services::{EntityStore, I18nResolver, PageCompositionEngine, RedirectRegistry};
use shared::jwt::{JwtConfig, JwtError};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::permissions::{
    require_pages_create, require_pages_delete, require_pages_read, require_pages_update,
    require_seo_any, require_seo_read, require_seo_update, require_settings_read,
    require_settings_update,
};
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth, trace_id,
    RateLimiterState,
};
use crate::routes::{components, health, i18n, pages, public, redirects};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn EntityStore>) -> Result<Self, JwtError> {
        let jwt = Arc::new(config.jwt.build()?);
        let rate_limiter =
            RateLimiterState::new(config.security.public_rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            store,
            config: Arc::new(config),
            jwt,
            rate_limiter,
        })
    }

    fn default_language(&self) -> String {
        self.config.i18n.default_language.clone()
    }

    pub fn pages(&self) -> PageCompositionEngine {
        PageCompositionEngine::new(self.store.clone(), self.default_language())
    }

    pub fn i18n(&self) -> I18nResolver {
        I18nResolver::new(self.store.clone(), self.default_language())
    }

    pub fn redirects(&self) -> RedirectRegistry {
        RedirectRegistry::new(self.store.clone())
    }
}

pub fn create_app(config: Config, store: Arc<dyn EntityStore>) -> Result<Router, JwtError> {
    Ok(router(AppState::new(config, store)?))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    // Every route here needs a principal; each handler adds its own gate
    let admin_routes = Router::new()
        .route(
            "/api/pages",
            get(pages::list_pages.layer(from_fn(require_pages_read)))
                .post(pages::create_page.layer(from_fn(require_pages_create))),
        )
        .route(
            "/api/pages/:id",
            get(pages::get_page.layer(from_fn(require_pages_read)))
                .put(pages::update_page.layer(from_fn(require_pages_update)))
                .delete(pages::delete_page.layer(from_fn(require_pages_delete))),
        )
        .route(
            "/api/pages/:id/publish",
            put(pages::toggle_publish.layer(from_fn(require_pages_update))),
        )
        .route(
            "/api/pages/:id/components",
            get(pages::list_components.layer(from_fn(require_pages_read)))
                .post(pages::add_component.layer(from_fn(require_pages_update))),
        )
        .route(
            "/api/pages/:id/components/reorder",
            put(pages::reorder_components.layer(from_fn(require_pages_update))),
        )
        .route(
            "/api/pages/components/:id",
            put(pages::update_component.layer(from_fn(require_pages_update)))
                .delete(pages::remove_component.layer(from_fn(require_pages_update))),
        )
        .route(
            "/api/components",
            get(components::list_catalog.layer(from_fn(require_pages_read))),
        )
        .route(
            "/api/seo/redirects",
            get(redirects::list_redirects.layer(from_fn(require_seo_read)))
                .post(redirects::create_redirect.layer(from_fn(require_seo_any))),
        )
        .route(
            "/api/seo/redirects/:id",
            get(redirects::get_redirect.layer(from_fn(require_seo_read)))
                .put(redirects::update_redirect.layer(from_fn(require_seo_update)))
                .delete(redirects::delete_redirect.layer(from_fn(require_seo_update))),
        )
        .route(
            "/api/i18n/languages",
            get(i18n::list_languages.layer(from_fn(require_settings_read)))
                .post(i18n::create_language.layer(from_fn(require_settings_update))),
        )
        .route(
            "/api/i18n/languages/:id",
            put(i18n::update_language.layer(from_fn(require_settings_update)))
                .delete(i18n::delete_language.layer(from_fn(require_settings_update))),
        )
        .route(
            "/api/i18n/content",
            get(i18n::list_content.layer(from_fn(require_settings_read)))
                .post(i18n::upsert_content.layer(from_fn(require_settings_update))),
        )
        .route(
            "/api/i18n/content/:id",
            delete(i18n::delete_content.layer(from_fn(require_settings_update))),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let public_routes = Router::new()
        .route("/api/public/pages/:slug", get(public::get_page))
        .route("/api/public/redirects", get(public::list_redirects))
        .route("/api/public/redirects/resolve", get(public::resolve_redirect))
        .route("/api/public/products", get(public::list_products))
        .route("/api/public/products/:slug", get(public::get_product))
        .route("/api/public/posts", get(public::list_posts))
        .route("/api/public/posts/:slug", get(public::get_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(ops_routes)
        .merge(public_routes)
        .merge(admin_routes)
        // Outermost layer runs first
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(trace_id))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state)
}
