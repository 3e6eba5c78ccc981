//! Order endpoints under `/api/orders`.
//!
//! Creation here is the simplified path: the storefront sends lines and an
//! address, and the total is either given or summed from the lines.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use styler_core::validation::split_full_name;
use styler_core::{
    CoreError, Money, Order, OrderItem, OrderStatus, ShippingAddress, User, ValidationError,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const CREATE_CONTEXT: &str = "Error creating order";

// =============================================================================
// Request Types
// =============================================================================

/// `userId` arrives as a number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserIdValue {
    Number(i64),
    Text(String),
}

impl UserIdValue {
    fn parse(&self) -> Result<i64, ValidationError> {
        match self {
            UserIdValue::Number(id) => Ok(*id),
            UserIdValue::Text(text) => {
                text.trim()
                    .parse()
                    .map_err(|_| ValidationError::InvalidFormat {
                        field: "userId".to_string(),
                        reason: format!("'{text}' is not a number"),
                    })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<UserIdValue>,
    pub user_email: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub shipping_address: AddressRequest,
    pub total_amount: Option<Money>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl OrderItemRequest {
    fn into_item(self) -> Result<OrderItem, ValidationError> {
        let required = |field: &str| ValidationError::Required {
            field: field.to_string(),
        };

        Ok(OrderItem {
            product_id: self.product_id.ok_or_else(|| required("productId"))?,
            price: self.price.ok_or_else(|| required("price"))?,
            quantity: self.quantity.ok_or_else(|| required("quantity"))?,
            product_name: self.product_name.unwrap_or_default(),
            product_category: self.category.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            size: self.size.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
        })
    }
}

/// Storefront address form. Accepts either `fullName` or first/last name,
/// and either `pincode` or `postalCode`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
}

impl From<AddressRequest> for ShippingAddress {
    fn from(req: AddressRequest) -> Self {
        let (first_name, last_name) = match req.full_name {
            Some(full_name) => split_full_name(&full_name),
            None => (
                req.first_name.unwrap_or_default(),
                req.last_name.unwrap_or_default(),
            ),
        };

        ShippingAddress {
            first_name,
            last_name,
            address_line_1: req.address_line1.unwrap_or_default(),
            address_line_2: req.address_line2.unwrap_or_default(),
            city: req.city.unwrap_or_default(),
            state: req.state.unwrap_or_default(),
            postal_code: req.pincode.or(req.postal_code).unwrap_or_default(),
            landmark: req.phone.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// One line of an order history listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub order_date: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
    pub item_count: usize,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        OrderSummary {
            order_id: order.order_id.clone(),
            status: order.status,
            total_amount: order.total_amount,
            order_date: order.order_date,
            estimated_delivery: order.estimated_delivery,
            item_count: order.item_count(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = body.map_err(|e| ApiError::from(e).with_context(CREATE_CONTEXT))?;

    let user = resolve_user(&state, req.user_id.as_ref(), req.user_email.as_deref()).await?;

    let items = req
        .items
        .into_iter()
        .map(OrderItemRequest::into_item)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::BadRequest(e.to_string()).with_context(CREATE_CONTEXT))?;

    let order = state
        .orders()
        .create_simple_order(
            user.id,
            items,
            req.shipping_address.into(),
            req.total_amount,
            req.payment_method,
        )
        .await
        .map_err(|e| ApiError::from(e).with_context(CREATE_CONTEXT))?;

    let items: Vec<Value> = order
        .items
        .iter()
        .map(|item| {
            json!({
                "productId": item.product_id,
                "productName": item.product_name,
                "quantity": item.quantity,
                "price": item.price,
            })
        })
        .collect();

    Ok(Json(json!({
        "id": order.id,
        "orderId": order.order_id,
        "totalAmount": order.total_amount,
        "status": order.status,
        "createdAt": order.order_date,
        "items": items,
        "shippingAddress": order.shipping_address,
        "success": true,
        "message": "Order created successfully",
    })))
}

/// `userId` wins over `userEmail`; a `null` id counts as absent.
async fn resolve_user(
    state: &AppState,
    user_id: Option<&UserIdValue>,
    user_email: Option<&str>,
) -> ApiResult<User> {
    if let Some(id) = user_id {
        let id = id
            .parse()
            .map_err(|e| ApiError::BadRequest(e.to_string()).with_context(CREATE_CONTEXT))?;
        return Ok(state.accounts().require_user(id).await?);
    }

    let Some(email) = user_email else {
        return Err(ApiError::BadRequest(
            "Either userId or userEmail is required".to_string(),
        ));
    };

    state
        .accounts()
        .find_by_email(email)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest(CoreError::UserNotFoundByEmail(email.to_string()).to_string())
        })
}

/// `GET /api/orders/{order_id}`
pub async fn get_order(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(order_id) = path?;

    let order = state
        .orders()
        .find_by_order_id(&order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(CoreError::OrderNotFound(order_id).to_string()))?;

    Ok(Json(json!({
        "orderId": order.order_id,
        "status": order.status,
        "totalAmount": order.total_amount,
        "subtotal": order.subtotal,
        "shippingCost": order.shipping_cost,
        "taxAmount": order.tax_amount,
        "paymentMethod": order.payment_method,
        "orderDate": order.order_date,
        "estimatedDelivery": order.estimated_delivery,
        "actualDelivery": order.actual_delivery,
        "shippingAddress": order.shipping_address,
        "items": order.items,
    })))
}

/// `GET /api/orders/user/{user_id}`. Newest first.
pub async fn user_orders(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<OrderSummary>>> {
    let Path(user_id) = path?;
    let orders = state.orders().user_orders(user_id).await?;
    Ok(Json(orders.iter().map(OrderSummary::from).collect()))
}

/// `PUT /api/orders/{order_id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(order_id) = path?;
    let Json(req) = body?;

    let status = req
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Status is required".to_string()))?;

    let order = state.orders().update_status(&order_id, &status).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Order status updated successfully",
        "orderId": order.order_id,
        "status": order.status,
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::routes::test_support::{register, server};

    fn address() -> Value {
        json!({
            "fullName": "Asha Rao",
            "addressLine1": "12 Market Road",
            "city": "Pune",
            "state": "MH",
            "pincode": "411001",
            "phone": "9876543210",
        })
    }

    async fn place(server: &TestServer, body: Value) -> Value {
        let response = server.post("/api/orders").json(&body).await;
        response.assert_status_ok();
        response.json::<Value>()
    }

    #[tokio::test]
    async fn test_simple_order_sums_lines() {
        let (server, state) = server().await;
        let user_id = register(&server, "a@x.com").await;

        let body = place(
            &server,
            json!({
                "userId": user_id,
                "items": [{"productId": 1, "price": 10.00, "quantity": 2}],
                "shippingAddress": address(),
            }),
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Order created successfully");
        assert_eq!(body["totalAmount"], 20.0);
        assert_eq!(body["status"], "CONFIRMED");
        assert_eq!(body["items"][0]["productName"], "");
        assert_eq!(body["shippingAddress"]["firstName"], "Asha");
        assert_eq!(body["shippingAddress"]["lastName"], "Rao");
        assert_eq!(body["shippingAddress"]["postalCode"], "411001");
        assert_eq!(body["shippingAddress"]["landmark"], "9876543210");

        let order_id = body["orderId"].as_str().unwrap();
        assert!(order_id.starts_with("ORD-"));

        let detail = server.get(&format!("/api/orders/{order_id}")).await.json::<Value>();
        assert_eq!(detail["subtotal"], 20.0);
        assert_eq!(detail["shippingCost"], 0.0);
        assert_eq!(detail["taxAmount"], 0.0);
        assert_eq!(detail["paymentMethod"], "COD");
        assert!(detail["actualDelivery"].is_null());

        assert_eq!(state.orders().all_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_resolution() {
        let (server, _) = server().await;
        let user_id = register(&server, "a@x.com").await;
        let items = json!([{"productId": 1, "productName": "Scarf", "price": "5.50", "quantity": 1}]);

        let by_text_id = place(
            &server,
            json!({"userId": user_id.to_string(), "items": items, "shippingAddress": address()}),
        )
        .await;
        assert_eq!(by_text_id["totalAmount"], 5.5);

        let by_email = place(
            &server,
            json!({
                "userEmail": "a@x.com",
                "items": items,
                "shippingAddress": address(),
                "totalAmount": 4.99,
                "paymentMethod": "UPI",
            }),
        )
        .await;
        assert_eq!(by_email["totalAmount"], 4.99);

        let cases = [
            (json!({"items": items}), "Either userId or userEmail is required"),
            (json!({"userId": null, "items": items}), "Either userId or userEmail is required"),
            (json!({"userId": 999, "items": items}), "User not found with ID: 999"),
            (
                json!({"userEmail": "ghost@x.com", "items": items}),
                "User not found with email: ghost@x.com",
            ),
        ];
        for (body, message) in cases {
            let response = server.post("/api/orders").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>()["message"], message);
        }
    }

    #[tokio::test]
    async fn test_invalid_order_is_rejected_whole() {
        let (server, state) = server().await;
        let user_id = register(&server, "a@x.com").await;

        let response = server
            .post("/api/orders")
            .json(&json!({
                "userId": user_id,
                "items": [
                    {"productId": 1, "price": 10, "quantity": 1},
                    {"productId": 2, "price": 0, "quantity": 1},
                ],
                "shippingAddress": address(),
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let message = response.json::<Value>()["message"].as_str().unwrap().to_string();
        assert_eq!(
            message,
            "Error creating order: Invalid order item at position 1: price must be positive"
        );

        let response = server
            .post("/api/orders")
            .json(&json!({
                "userId": user_id,
                "items": [{"productId": 1, "quantity": 1}],
                "shippingAddress": address(),
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Error creating order: price is required"
        );

        let response = server
            .post("/api/orders")
            .json(&json!({
                "userId": user_id,
                "items": [{"productId": 1, "price": 10, "quantity": 1}],
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Error creating order: addressLine1 is required"
        );

        assert!(state.orders().all_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_total_beyond_range_is_rejected() {
        let (server, state) = server().await;
        let user_id = register(&server, "a@x.com").await;

        let response = server
            .post("/api/orders")
            .json(&json!({
                "userId": user_id,
                "items": [{"productId": 1, "price": 100000000000000_i64, "quantity": 1000}],
                "shippingAddress": address(),
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Error creating order: totalAmount is too large");

        assert!(state.orders().all_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_order_history() {
        let (server, _) = server().await;
        let user_id = register(&server, "a@x.com").await;

        let first = place(
            &server,
            json!({
                "userId": user_id,
                "items": [{"productId": 1, "price": 10, "quantity": 1}],
                "shippingAddress": address(),
            }),
        )
        .await;
        let second = place(
            &server,
            json!({
                "userId": user_id,
                "items": [
                    {"productId": 2, "price": 3, "quantity": 1},
                    {"productId": 3, "price": 4, "quantity": 2},
                ],
                "shippingAddress": address(),
            }),
        )
        .await;

        let history = server
            .get(&format!("/api/orders/user/{user_id}"))
            .await
            .json::<Value>();
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["orderId"], second["orderId"]);
        assert_eq!(history[0]["itemCount"], 2);
        assert_eq!(history[1]["orderId"], first["orderId"]);

        let response = server.get("/api/orders/user/999").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "User not found with ID: 999");
    }

    #[tokio::test]
    async fn test_status_updates() {
        let (server, _) = server().await;
        let user_id = register(&server, "a@x.com").await;
        let order = place(
            &server,
            json!({
                "userId": user_id,
                "items": [{"productId": 1, "price": 10, "quantity": 1}],
                "shippingAddress": address(),
            }),
        )
        .await;
        let order_id = order["orderId"].as_str().unwrap();
        let status_path = format!("/api/orders/{order_id}/status");

        let response = server
            .put(&status_path)
            .json(&json!({"status": "delivered"}))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Order status updated successfully");
        assert_eq!(body["status"], "DELIVERED");

        let detail = server.get(&format!("/api/orders/{order_id}")).await.json::<Value>();
        assert!(detail["actualDelivery"].is_string());

        let response = server.put(&status_path).json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Status is required");

        let response = server.put(&status_path).json(&json!({"status": "LOST"})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid order status: LOST"));

        let response = server
            .put("/api/orders/ORD-0-MISSING/status")
            .json(&json!({"status": "SHIPPED"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Order not found: ORD-0-MISSING");

        server
            .get("/api/orders/ORD-0-MISSING")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
