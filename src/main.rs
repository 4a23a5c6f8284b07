use axum::{
    middleware as axum_mw,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

mod cache;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod seed;
mod services;

use cache::Cache;
use config::Config;
use middleware::rate_limit::RateLimiter;
use services::staging::PendingStore;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub cache: Cache,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimiter,
    pub staging: PendingStore,
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // --- Auth routes (no auth required) ---
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route(
            "/profile",
            get(routes::auth::get_profile)
                .put(routes::auth::update_profile)
                .layer(axum_mw::from_fn_with_state(
                    state.clone(),
                    middleware::auth::authenticate,
                )),
        );

    // --- Public discovery routes ---
    let turf_routes = Router::new()
        .route("/", get(routes::turfs::list_turfs))
        .route("/featured", get(routes::turfs::featured_turfs))
        .route("/:id", get(routes::turfs::get_turf))
        .route("/:id/slots", get(routes::turfs::booked_slots));

    // --- Booking workflow (authenticated) ---
    let booking_routes = Router::new()
        .route("/", get(routes::bookings::list_my_bookings))
        .route("/request/:turfId", post(routes::bookings::request_slot))
        .route(
            "/pending",
            get(routes::bookings::get_pending).delete(routes::bookings::abandon),
        )
        .route("/confirm", post(routes::bookings::confirm))
        .route("/:id", get(routes::bookings::receipt))
        .route("/:id/cancel", post(routes::bookings::cancel))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    let review_routes = Router::new()
        .route("/:turfId", post(routes::reviews::submit_review))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    let admin_routes = Router::new()
        .route("/stats", get(routes::admin::stats))
        .route(
            "/turfs",
            get(routes::admin::list_all_turfs).post(routes::admin::create_turf),
        )
        .route("/turfs/:id", delete(routes::admin::deactivate_turf))
        .route("/bookings", get(routes::admin::list_all_bookings))
        .route("/users", get(routes::admin::list_users))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::admin::require_admin,
        ))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    // --- Compose full API ---
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/turfs", turf_routes)
        .nest("/bookings", booking_routes)
        .nest("/reviews", review_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(routes::health::health))
        // Global middleware
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let pool = db::create_pool(&config).await;
    let cache = Cache::new(&config).await;
    let rate_limiter =
        RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window_secs);
    let staging = PendingStore::new(config.booking.staging_ttl_min);

    if let Err(e) = seed::run(&pool, &config).await {
        tracing::error!("Seeding failed: {e}");
        std::process::exit(1);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("TurfBook API listening on {addr}");

    let state = AppState {
        db: pool,
        cache,
        config: Arc::new(config),
        rate_limiter,
        staging,
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
