use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDoc {
    pub id: String,
    pub name: String,
    /// One of pets, auto, events, beauty, home, health.
    pub category: String,
    pub images: Vec<String>,
    pub user_id: String,
}

#[derive(ToSchema)]
pub struct CreateBusinessDoc {
    pub name: String,
    pub category: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDoc {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub images: Vec<String>,
    pub user_id: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientDoc {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDoc {
    pub id: String,
    pub client_id: String,
    pub business_id: String,
    /// RFC 3339 timestamp.
    pub date: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentDoc {
    pub client_id: String,
    pub business_id: String,
    pub date: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::businesses::list,
        crate::routes::businesses::get,
        crate::routes::businesses::create,
        crate::routes::businesses::get_image,
        crate::routes::businesses::upload_image,
        crate::routes::businesses::delete,
        crate::routes::clients::list,
        crate::routes::clients::get,
        crate::routes::clients::create,
        crate::routes::clients::get_image,
        crate::routes::clients::upload_image,
        crate::routes::clients::delete,
        crate::routes::appointments::list,
        crate::routes::appointments::get,
        crate::routes::appointments::create,
        crate::routes::appointments::delete,
    ),
    components(
        schemas(
            HealthResponse,
            BusinessDoc,
            CreateBusinessDoc,
            ClientDoc,
            CreateClientDoc,
            AppointmentDoc,
            CreateAppointmentDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "businesses"),
        (name = "clients"),
        (name = "appointments")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_mount() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/businesses/", "/businesses/{id}/images", "/clients/{id}/images/{key}", "/clients/{id}", "/appointments/"] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
        assert!(!doc.paths.paths.contains_key("/appointments/{id}/images"));
    }
}
