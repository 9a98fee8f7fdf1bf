//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, members, rentals, reports};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Circulation API",
        version = "0.1.0",
        description = "Library circulation REST API: catalog, members, rentals and reports",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::create_librarian,
        // Books
        books::list_books,
        books::get_book,
        books::add_book,
        books::total_copies,
        books::delete_by_isbn,
        books::delete_by_year,
        // Members
        members::register,
        members::get_member,
        members::rental_status,
        members::member_rentals,
        // Rentals
        rentals::rent_book,
        rentals::return_book,
        rentals::get_rental,
        // Reports
        reports::overdue,
        reports::active_rentals,
        reports::genres,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::librarian::Librarian,
            crate::models::librarian::CreateLibrarian,
            // Books
            books::CopiesResponse,
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::AddBookOutcome,
            crate::models::book::DeleteOutcome,
            crate::models::book::GenreTotal,
            // Members
            crate::models::member::Member,
            crate::models::member::RegisterMember,
            crate::models::member::RentalStatus,
            // Rentals
            crate::models::rental::Rental,
            crate::models::rental::RentalDetails,
            crate::models::rental::RentBook,
            crate::models::rental::ReturnBook,
            crate::models::rental::ReturnOutcome,
            crate::models::rental::OverdueReport,
            // Reports
            reports::GenresResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Librarian authentication"),
        (name = "books", description = "Catalog management"),
        (name = "members", description = "Membership cards"),
        (name = "rentals", description = "Renting and returning books"),
        (name = "reports", description = "Circulation reports")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected endpoints
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

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
