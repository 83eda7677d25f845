use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::bookings::{
    dtos as bookings_dtos, handlers as bookings_handlers, models as bookings_models,
};
use crate::features::orders::{
    dtos as orders_dtos, handlers as orders_handlers, models as orders_models,
};
use crate::features::push::handler as push_handler;
use crate::features::rate_limits::{dtos as rate_limits_dtos, handlers as rate_limits_handlers};
use crate::features::reviews::{dtos as reviews_dtos, handlers as reviews_handlers};
use crate::features::websites::{
    dtos as websites_dtos, handlers as websites_handlers, models as websites_models,
    sections as websites_sections,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Websites
        websites_handlers::resolve_website,
        websites_handlers::create_website,
        websites_handlers::list_websites,
        websites_handlers::list_all_websites,
        websites_handlers::get_website,
        websites_handlers::update_website,
        websites_handlers::delete_website,
        // Sections
        websites_handlers::get_sections,
        websites_handlers::replace_sections,
        websites_handlers::move_section,
        websites_handlers::set_section_visibility,
        // Bookings
        bookings_handlers::create_booking,
        bookings_handlers::list_bookings,
        bookings_handlers::update_booking_status,
        // Orders
        orders_handlers::create_order,
        orders_handlers::list_orders,
        orders_handlers::get_order,
        orders_handlers::update_order_status,
        // Reviews
        reviews_handlers::create_review,
        reviews_handlers::list_published_reviews,
        reviews_handlers::list_reviews,
        reviews_handlers::publish_review,
        // Rate limits
        rate_limits_handlers::get_rate_limit_status,
        // Push
        push_handler::get_vapid_key,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            ApiResponse<auth::model::AuthenticatedUser>,
            // Websites
            websites_models::BusinessType,
            websites_models::Branding,
            websites_models::WebsiteConfig,
            websites_sections::SectionEntry,
            websites_dtos::BrandingDto,
            websites_dtos::CreateWebsiteDto,
            websites_dtos::UpdateWebsiteDto,
            websites_dtos::WebsiteResponseDto,
            websites_dtos::PublicWebsiteDto,
            websites_dtos::ReplaceSectionsDto,
            websites_dtos::MoveSectionDto,
            websites_dtos::SectionVisibilityDto,
            ApiResponse<websites_dtos::WebsiteResponseDto>,
            ApiResponse<Vec<websites_dtos::WebsiteResponseDto>>,
            ApiResponse<websites_dtos::PublicWebsiteDto>,
            ApiResponse<Vec<websites_sections::SectionEntry>>,
            // Bookings
            bookings_models::BookingStatus,
            bookings_dtos::CreateBookingDto,
            bookings_dtos::UpdateBookingStatusDto,
            bookings_dtos::BookingResponseDto,
            ApiResponse<bookings_dtos::BookingResponseDto>,
            ApiResponse<Vec<bookings_dtos::BookingResponseDto>>,
            // Orders
            orders_models::OrderStatus,
            orders_dtos::OrderItemDto,
            orders_dtos::CreateOrderDto,
            orders_dtos::UpdateOrderStatusDto,
            orders_dtos::OrderItemResponseDto,
            orders_dtos::OrderResponseDto,
            orders_dtos::OrderDetailResponseDto,
            ApiResponse<orders_dtos::OrderResponseDto>,
            ApiResponse<Vec<orders_dtos::OrderResponseDto>>,
            ApiResponse<orders_dtos::OrderDetailResponseDto>,
            // Reviews
            reviews_dtos::CreateReviewDto,
            reviews_dtos::PublishReviewDto,
            reviews_dtos::ReviewResponseDto,
            reviews_dtos::PublicReviewDto,
            ApiResponse<reviews_dtos::ReviewResponseDto>,
            ApiResponse<Vec<reviews_dtos::ReviewResponseDto>>,
            ApiResponse<reviews_dtos::PublicReviewDto>,
            ApiResponse<Vec<reviews_dtos::PublicReviewDto>>,
            // Rate limits
            rate_limits_dtos::RateLimitStatusDto,
            ApiResponse<rate_limits_dtos::RateLimitStatusDto>,
            // Push
            push_handler::VapidKeyDto,
            ApiResponse<push_handler::VapidKeyDto>,
        )
    ),
    tags(
        (name = "auth", description = "Authenticated user"),
        (name = "websites", description = "Tenant websites and host resolution"),
        (name = "sections", description = "Page builder section layout"),
        (name = "bookings", description = "Reservations and appointments"),
        (name = "orders", description = "Online orders"),
        (name = "reviews", description = "Customer reviews and moderation"),
        (name = "rate-limits", description = "Public API rate limit status"),
        (name = "push", description = "Web push subscription support"),
        (name = "admin", description = "Platform admin endpoints"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Sitekit API",
        version = "0.1.0",
        description = "API for multi-tenant small-business websites",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_public_and_owner_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/public/sites/{site}",
            "/api/public/sites/{site}/bookings",
            "/api/websites/{id}/sections/move",
            "/api/rate-limit",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
