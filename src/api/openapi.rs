use super::handlers::{auth, events, health, timetables};
use utoipa::openapi::{
    Components, InfoBuilder, License, OpenApiBuilder, Tag,
    security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec. The root route (`/`) is
/// intentionally not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(auth::register::register))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::verification::send_verification))
        .routes(routes!(auth::verification::verify_otp))
        .routes(routes!(auth::password::forget_password))
        .routes(routes!(timetables::create_timetable))
        .routes(routes!(timetables::list_timetables))
        .routes(routes!(timetables::get_timetable))
        .routes(routes!(timetables::update_timetable))
        .routes(routes!(timetables::delete_timetable))
        .routes(routes!(events::create_event))
        .routes(routes!(events::list_events))
        .routes(routes!(events::get_event))
        .routes(routes!(events::update_event))
        .routes(routes!(events::delete_event));

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Registration, login, OTP verification and password reset".to_string());

    let mut timetables_tag = Tag::new("timetables");
    timetables_tag.description = Some("Owner-scoped timetable containers".to_string());

    let mut events_tag = Tag::new("events");
    events_tag.description = Some("Owner-scoped events with recurrence descriptors".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service and database health".to_string());

    router.get_openapi_mut().tags = Some(vec![auth_tag, timetables_tag, events_tag, health_tag]);

    router
        .get_openapi_mut()
        .components
        .get_or_insert_with(Components::default)
        .add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    let identifier = env!("CARGO_PKG_LICENSE");
    if !identifier.is_empty() {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        info.license = Some(license);
    }

    OpenApiBuilder::new().info(info).build()
}
