use crate::config::ApiConfig;
use actix_web::{web, HttpResponse, Result};
use shared_types::{ErrorResponse, SettingsResponse, UpdateCurrencyRequest};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct SettingsAppState {
    pub config: Arc<std::sync::RwLock<ApiConfig>>,
    pub config_path: PathBuf,
}

impl SettingsAppState {
    pub fn new(config: ApiConfig, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(std::sync::RwLock::new(config)),
            config_path,
        }
    }

    pub fn snapshot(&self) -> Result<ApiConfig> {
        let config = self.config.read().map_err(|e| {
            actix_web::error::ErrorInternalServerError(format!(
                "Failed to acquire config read lock: {}",
                e
            ))
        })?;
        Ok(config.clone())
    }
}

pub async fn get_settings(data: web::Data<SettingsAppState>) -> Result<HttpResponse> {
    let config = data.snapshot()?;

    let response = SettingsResponse {
        config_file_path: data.config_path.to_string_lossy().to_string(),
        base_currency: config.currency.base_currency,
        display_currency: config.currency.display_currency,
        rates: config.currency.rates,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn update_currency(
    data: web::Data<SettingsAppState>,
    request: web::Json<UpdateCurrencyRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    let mut updated = data.snapshot()?;
    if let Some(display_currency) = req.display_currency {
        updated.currency.display_currency = display_currency.to_ascii_uppercase();
    }
    if let Some(rates) = req.rates {
        updated.currency.rates = rates;
    }

    let checked = updated.currency.rate_table().and_then(|rates| {
        rates.rate(&updated.currency.display_currency)?;
        Ok(rates)
    });
    if let Err(e) = checked {
        warn!("Rejected currency settings: {}", e);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: e.to_string(),
        }));
    }

    updated.save(&data.config_path).map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!("Failed to write config file: {}", e))
    })?;

    {
        let mut config = data.config.write().map_err(|e| {
            actix_web::error::ErrorInternalServerError(format!(
                "Failed to acquire config write lock: {}",
                e
            ))
        })?;
        *config = updated;
    }

    info!("Updated currency settings");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "path": data.config_path.to_string_lossy()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::configure_routes;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_update_currency_persists_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        let state = SettingsAppState::new(ApiConfig::default(), path.clone());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/settings/currency")
            .set_json(json!({"display_currency": "eur", "rates": {"EUR": 0.5}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(path.exists());

        let req = test::TestRequest::get().uri("/settings").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["display_currency"], "EUR");
        assert_eq!(body["base_currency"], "USD");
        assert_eq!(body["rates"], json!({"EUR": 0.5}));

        let req = test::TestRequest::post()
            .uri("/settings/currency")
            .set_json(json!({"rates": {"EUR": 0.0}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.snapshot().unwrap().currency.rates["EUR"], 0.5);
    }

    #[actix_web::test]
    async fn test_update_rejects_display_currency_without_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        let state = SettingsAppState::new(ApiConfig::default(), path.clone());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/settings/currency")
            .set_json(json!({"display_currency": "GBP"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unknown currency: GBP");
        assert!(!path.exists());
        assert_eq!(state.snapshot().unwrap().currency.display_currency, "VND");

        let req = test::TestRequest::post()
            .uri("/settings/currency")
            .set_json(json!({"display_currency": "usd"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.snapshot().unwrap().currency.display_currency, "USD");
    }
}
