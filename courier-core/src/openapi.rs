//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates handler path annotations and domain schemas into a single
//! OpenAPI specification, served through Swagger UI when enabled.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Courier Email API",
        version = "0.1.0",
        description = "Templated email dispatch backed by object storage and AWS SES",
        license(name = "Proprietary"),
        contact(name = "Courier Team")
    ),
    tags(
        (name = "System", description = "Health checks and system status"),
        (name = "Email", description = "Templated email dispatch"),
    ),
    components(
        schemas(
            crate::domain::EmailRequest,
            crate::domain::DispatchResponse,
            crate::api::health::HealthResponse,
        )
    ),
    paths(
        crate::api::health::health,
        crate::api::health::healthcheck,
        crate::api::email::send_single,
        crate::api::email::send_multiple,
    ),
)]
pub struct ApiDoc;
