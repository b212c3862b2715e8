//! OpenAPI Documentation
//!
//! One document per service, served next to its Swagger UI.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use contactdesk::{ContactStatus, ContactType, Priority};

use crate::models::{
    ContactFileResponse, ContactMessageResponse, CreateContactFileRequest, CreateContactRequest,
    HealthCheckEntry, HealthReport, MessagePageResponse, MessageRequest, MessageResponse,
    UpdateContactStatusRequest,
};

/// Registers the `bearer` JWT scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
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

#[derive(OpenApi)]
#[openapi(
    paths(
        super::contacts::create_contact,
        super::contacts::list_contacts,
        super::contacts::get_contact,
        super::contacts::update_contact_status,
        super::contacts::delete_contact,
        super::contacts::list_contact_files,
        super::contacts::delete_contact_file,
        super::contacts::download_contact_file,
        super::health::liveness,
        super::health::contact_readiness,
    ),
    info(
        title = "Contact Service API",
        version = "1.0",
        description = "Contact-form intake with attachments stored through the upload service",
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Contacts", description = "Contact messages and their files"),
        (name = "Health", description = "Liveness and readiness checks"),
    ),
    components(
        schemas(
            ContactType,
            Priority,
            ContactStatus,
            CreateContactRequest,
            CreateContactFileRequest,
            UpdateContactStatusRequest,
            ContactMessageResponse,
            ContactFileResponse,
            HealthReport,
            HealthCheckEntry,
        )
    ),
    modifiers(&BearerAuth),
)]
pub struct ContactApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::messages::create_message,
        super::messages::list_messages,
        super::messages::get_message,
        super::messages::update_message,
        super::messages::delete_message,
        super::health::message_readiness,
    ),
    info(
        title = "Message Service API",
        version = "1.0",
        description = "Stored messages with search, sorting and pagination",
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Messages", description = "Message records"),
        (name = "Health", description = "Readiness check"),
    ),
    components(
        schemas(
            MessageRequest,
            MessageResponse,
            MessagePageResponse,
            HealthReport,
            HealthCheckEntry,
        )
    ),
    modifiers(&BearerAuth),
)]
pub struct MessageApiDoc;
