//! Cart endpoints under `/api/cart/{user_id}`.

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use styler_core::cart::CartItemDraft;
use styler_core::CartItem;

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/cart/{user_id}`
pub async fn get_cart(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<CartItem>>> {
    let Path(user_id) = path?;
    Ok(Json(state.carts().get(user_id).await?))
}

/// `POST /api/cart/{user_id}`. The body replaces the whole cart.
///
/// A missing body or `null` clears the cart.
pub async fn save_cart(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let Path(user_id) = path?;

    let drafts: Vec<CartItemDraft> = if body.iter().all(u8::is_ascii_whitespace) {
        Vec::new()
    } else {
        serde_json::from_slice::<Option<Vec<CartItemDraft>>>(&body)?.unwrap_or_default()
    };

    let items = state.carts().replace(user_id, drafts).await?;
    Ok(Json(json!({ "success": true, "items": items })))
}

/// `DELETE /api/cart/{user_id}`
pub async fn clear_cart(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(user_id) = path?;
    state.carts().clear(user_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::routes::test_support::{register, server};

    #[tokio::test]
    async fn test_save_and_read_cart() {
        let (server, _) = server().await;
        let user_id = register(&server, "a@x.com").await;
        let path = format!("/api/cart/{user_id}");

        let response = server
            .post(&path)
            .json(&json!([
                {"productId": 1, "productName": "Linen Shirt", "price": 19.99, "quantity": 2, "size": "M"},
                {"productName": "no id", "price": 5, "quantity": 1},
                {"productId": 2, "price": "7.50", "quantity": 0},
                {"productId": 3, "quantity": 1},
            ]))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);

        let cart = server.get(&path).await.json::<Value>();
        assert_eq!(cart[0]["productId"], 1);
        assert_eq!(cart[0]["price"], 19.99);
        assert_eq!(cart[0]["size"], "M");
        assert_eq!(cart[1]["productId"], 3);
        assert_eq!(cart[1]["price"], 0.0);
    }

    #[tokio::test]
    async fn test_empty_body_and_delete_clear_cart() {
        let (server, _) = server().await;
        let user_id = register(&server, "a@x.com").await;
        let path = format!("/api/cart/{user_id}");

        server
            .post(&path)
            .json(&json!([{"productId": 1, "price": 10, "quantity": 1}]))
            .await
            .assert_status_ok();

        let response = server.post(&path).await;
        response.assert_status_ok();
        assert!(response.json::<Value>()["items"].as_array().unwrap().is_empty());

        server
            .post(&path)
            .json(&json!([{"productId": 1, "price": 10, "quantity": 1}]))
            .await
            .assert_status_ok();
        let response = server.delete(&path).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["success"], true);
        assert_eq!(server.get(&path).await.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn test_cart_errors() {
        let (server, _) = server().await;
        let user_id = register(&server, "a@x.com").await;

        let response = server.get("/api/cart/999").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "User not found with ID: 999");

        let response = server
            .post(&format!("/api/cart/{user_id}"))
            .json(&json!([{"productId": 1, "price": -1, "quantity": 1}]))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "price must not be negative");

        server
            .get("/api/cart/not-a-number")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
