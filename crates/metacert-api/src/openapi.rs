//! OpenAPI document for the upload surface.

use utoipa::OpenApi;

/// Auto-generated OpenAPI 3 spec for this service.
#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::upload::upload),
    components(schemas(
        crate::routes::upload::UploadResponse,
        crate::error::ErrorBody,
    )),
    info(
        title = "MetaCert Upload Service",
        description = "Publishes credential artwork and metadata as linked content-addressed objects."
    )
)]
pub struct ApiDoc;
