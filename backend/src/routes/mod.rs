//! Route definitions for the Factory Inventory Management Platform

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, rate_limit_middleware, RateLimiter},
    AppState,
};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // User administration and auth
        .nest("/users", user_routes(&state))
        // Material catalog and stock ledger
        .nest("/materials", material_routes(&state))
}

/// User routes: public auth endpoints plus protected administration
fn user_routes(state: &AppState) -> Router<AppState> {
    let limiter = RateLimiter::new(
        state.config.rate_limit.max_requests,
        state.config.rate_limit.window_seconds,
    );

    // Login and refresh are rate limited per client IP
    let public = Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));

    let protected = Router::new()
        .route("/me", get(handlers::me).patch(handlers::update_me))
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}

/// Material routes (protected): catalog CRUD plus the stock ledger workflow
fn material_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_materials).post(handlers::create_material),
        )
        .route("/search", get(handlers::search_materials))
        .route("/filter", get(handlers::filter_materials))
        .route("/low-stock", get(handlers::low_stock_materials))
        .route("/receive", post(handlers::receive_material))
        .route(
            "/:material_id",
            get(handlers::get_material)
                .put(handlers::update_material)
                .delete(handlers::delete_material),
        )
        .route("/:material_id/adjust", patch(handlers::adjust_stock))
        .route("/:material_id/logs", get(handlers::material_ledger))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}
