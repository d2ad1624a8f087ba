pub mod filters;
pub mod settings;

use actix_web::{web, HttpResponse, Responder};

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/settings", web::get().to(settings::get_settings))
        .route("/settings/currency", web::post().to(settings::update_currency))
        .route("/api/filters/{scope}", web::get().to(filters::get_filter))
        .route("/api/filters/{scope}", web::put().to(filters::replace_filter))
        .route("/api/filters/{scope}", web::delete().to(filters::reset_filter))
        .route("/api/filters/{scope}/build", web::post().to(filters::build_filter))
        .route("/api/filters/{scope}/extract", web::post().to(filters::extract_filter))
        .route("/api/filters/{scope}/edit", web::post().to(filters::edit_filter));
}
