use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{PaymentMethod, PrizeKind};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "gateway_identity",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-User-Id"))),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::wheel::list_wheels,
        handlers::wheel::get_wheel,
        handlers::wheel::spin,
        handlers::wheel::get_records,
        handlers::balance::get_balance,
        handlers::admin::list_all_wheels,
        handlers::admin::create_wheel,
        handlers::admin::update_wheel,
        handlers::admin::credit_balance,
    ),
    components(
        schemas(
            WheelResponse,
            PrizeResponse,
            CostPerSpin,
            PrizeInput,
            CreateWheelRequest,
            UpdateWheelRequest,
            SpinRequest,
            SpinResponse,
            WonPrize,
            SpinRecordResponse,
            SpinRecordPageResponse,
            SpinRecordQuery,
            BalanceResponse,
            AdjustBalanceRequest,
            PrizeKind,
            PaymentMethod,
            Currency,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "wheel", description = "Prize wheel API"),
        (name = "balance", description = "User balance API"),
        (name = "admin", description = "Wheel administration API"),
    ),
    info(
        title = "Lootwheel Backend API",
        version = "1.0.0",
        description = "Lootwheel Backend REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
