use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    middleware,
    orders::{HistoryQuery, OrderHistoryPage, PageRequest, PlaceOrderRequest, PlacedOrder},
};

/// Order placement and order history for the authenticated user.
pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/pemesanan",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(create_pemesanan))
            .routes(utoipa_axum::routes!(get_riwayat))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::authenticate,
            )),
    )
}

/// Place an order for a single product and open its payment transaction.
#[utoipa::path(
    post,
    path = "/create",
    tags = ["Pemesanan"],
    security(("bearerAuth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (
            status = 201,
            description = "Order created successfully",
            body = StdResponse<PlacedOrder, String>
        ),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Ordering on behalf of another user"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Insufficient stock"),
        (status = 502, description = "Payment gateway is unreachable")
    )
)]
async fn create_pemesanan(
    State(state): State<AppState>,
    Extension(user_id): Extension<i32>,
    body: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    if body.user_id.is_some_and(|id| id != user_id) {
        return Err(AppError::ForbiddenResource(
            "Cannot place an order for another user".into(),
        ));
    }

    let placed = state.orders.place_order(body).await?;

    Ok((
        StatusCode::CREATED,
        StdResponse {
            data: Some(placed),
            message: Some("Order created successfully"),
        },
    ))
}

/// Fetch the authenticated user's orders, newest first.
#[utoipa::path(
    get,
    path = "/riwayat",
    tags = ["Pemesanan"],
    security(("bearerAuth" = [])),
    params(HistoryQuery),
    responses(
        (
            status = 200,
            description = "Get order history successfully",
            body = StdResponse<OrderHistoryPage, String>
        ),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
async fn get_riwayat(
    State(state): State<AppState>,
    Extension(user_id): Extension<i32>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let history = state
        .orders
        .order_history(user_id, PageRequest::from_query(&query))
        .await?;

    Ok(StdResponse {
        data: Some(history),
        message: Some("Get order history successfully"),
    })
}
