//! HTTP routes.
//!
//! ## Route Table
//! ```text
//! GET    /                              service banner
//! GET    /health                        liveness + database flag
//! GET    /api/health                    503 when the database is down
//!
//! POST   /api/users/register
//! POST   /api/users/login
//! POST   /api/users/forgot-password
//! POST   /api/users/reset-password
//! GET    /api/users/{email}
//! PUT    /api/users/{email}
//!
//! GET    /api/cart/{user_id}
//! POST   /api/cart/{user_id}            full replace
//! DELETE /api/cart/{user_id}
//!
//! POST   /api/orders                    simplified creation
//! GET    /api/orders/{order_id}
//! GET    /api/orders/user/{user_id}
//! PUT    /api/orders/{order_id}/status
//! ```
//!
//! Static segments win over parameters, so `/api/users/login` never
//! reaches the `{email}` handler.

pub mod cart;
pub mod health;
pub mod orders;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let users = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/forgot-password", post(users::forgot_password))
        .route("/reset-password", post(users::reset_password))
        .route("/{email}", get(users::get_user).put(users::update_user));

    let cart = Router::new().route(
        "/{user_id}",
        get(cart::get_cart).post(cart::save_cart).delete(cart::clear_cart),
    );

    let orders = Router::new()
        .route("/", post(orders::create_order))
        .route("/{order_id}", get(orders::get_order))
        .route("/user/{user_id}", get(orders::user_orders))
        .route("/{order_id}/status", put(orders::update_status));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/api/health", get(health::api_health))
        .nest("/api/users", users)
        .nest("/api/cart", cart)
        .nest("/api/orders", orders)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router over a fresh in-memory database, for handler tests.
#[cfg(test)]
pub(crate) mod test_support {
    use axum_test::TestServer;
    use styler_db::Database;

    use crate::config::ApiConfig;
    use crate::state::AppState;

    pub async fn server() -> (TestServer, AppState) {
        let config = ApiConfig {
            database_path: ":memory:".to_string(),
            ..ApiConfig::default()
        };
        let db = Database::new(config.db_config()).await.unwrap();
        let state = AppState::new(db, config);
        let server = TestServer::new(super::router(state.clone())).unwrap();
        (server, state)
    }

    /// Registers `email` / `pw123456` and returns the new user id.
    pub async fn register(server: &TestServer, email: &str) -> i64 {
        let response = server
            .post("/api/users/register")
            .json(&serde_json::json!({
                "email": email,
                "password": "pw123456",
                "name": "Asha Rao",
                "phone": "9876543210",
            }))
            .await;
        response.assert_status_ok();
        response.json::<serde_json::Value>()["id"].as_i64().unwrap()
    }
}
