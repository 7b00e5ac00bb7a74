use axum::{
    Router,
    http::{HeaderValue, Method, Uri, header},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::{app_error::AppError, app_state::AppState};

pub mod pemesanan;

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront OrderService API", version = "1.0.0"),
    modifiers(&BearerAuth)
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// The full application router: API routes, Swagger UI, a JSON 404 for
/// anything else, CORS for the given frontend origins and request tracing.
pub fn app(state: AppState, frontend_urls: &[String]) -> Router {
    let (routes, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(pemesanan::routes_with_openapi(state.clone()))
        .split_for_parts();

    routes
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .fallback(not_found)
        .layer(cors(frontend_urls))
        .layer(TraceLayer::new_for_http())
}

fn cors(frontend_urls: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = frontend_urls
        .iter()
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .filter_map(|url| match HeaderValue::from_str(url) {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = url, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Endpoint {} not found", uri.path()))
}
