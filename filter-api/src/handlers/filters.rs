use crate::config::ApiConfig;
use crate::handlers::settings::SettingsAppState;
use crate::helpers::filter_store::{FilterSlot, FilterStore};
use actix_web::{web, HttpResponse, Result as ActixResult};
use filter_engine::{FilterContext, RateTable};
use shared_types::{
    AmountRange, BuildFilterRequest, EditFilterRequest, ErrorResponse, ExtractFilterRequest,
    FilterError, FilterStateResponse, ReplaceFilterRequest,
};
use std::sync::Arc;
use tracing::{info, warn};

fn rate_table(config: &ApiConfig) -> ActixResult<RateTable> {
    config
        .currency
        .rate_table()
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))
}

fn filter_error(scope: &str, err: FilterError) -> HttpResponse {
    warn!("Rejected filter for scope {}: {}", scope, err);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: err.to_string(),
    })
}

fn state_response(scope: String, slot: FilterSlot) -> HttpResponse {
    HttpResponse::Ok().json(FilterStateResponse {
        scope,
        tree: slot.tree,
        base_range: slot.base_range,
    })
}

pub async fn build_filter(
    settings: web::Data<SettingsAppState>,
    store: web::Data<Arc<FilterStore>>,
    path: web::Path<String>,
    request: web::Json<BuildFilterRequest>,
) -> ActixResult<HttpResponse> {
    let scope = path.into_inner();
    let request = request.into_inner();
    let config = settings.snapshot()?;
    let rates = rate_table(&config)?;

    let display_currency = request
        .display_currency
        .as_deref()
        .unwrap_or(&config.currency.display_currency);
    let ctx = FilterContext::new(
        display_currency,
        &config.currency.base_currency,
        &rates,
        &config.filters,
    );

    let built = match filter_engine::build_filter(&request.params, &ctx) {
        Ok(built) => built,
        Err(e) => return Ok(filter_error(&scope, e)),
    };

    store
        .publish(&scope, built.tree.clone(), built.base_range)
        .await;

    info!(
        "Published filter for scope {}: types={}, base_range=[{}, {}]",
        scope,
        request.params.types.len(),
        built.base_range.min,
        built.base_range.max
    );

    Ok(HttpResponse::Ok().json(FilterStateResponse {
        scope,
        tree: built.tree,
        base_range: Some(built.base_range),
    }))
}

pub async fn extract_filter(
    settings: web::Data<SettingsAppState>,
    store: web::Data<Arc<FilterStore>>,
    path: web::Path<String>,
    request: web::Json<ExtractFilterRequest>,
) -> ActixResult<HttpResponse> {
    let scope = path.into_inner();
    let request = request.into_inner();
    let config = settings.snapshot()?;
    let rates = rate_table(&config)?;

    let tree = match request.tree {
        Some(tree) => tree,
        None => store.get(&scope).await.tree,
    };

    let defaults = AmountRange::new(
        request.default_min.unwrap_or(config.amount_defaults.min),
        request.default_max.unwrap_or(config.amount_defaults.max),
    );
    let display_currency = request
        .display_currency
        .as_deref()
        .unwrap_or(&config.currency.display_currency);
    let ctx = FilterContext::new(
        display_currency,
        &config.currency.base_currency,
        &rates,
        &config.filters,
    );

    match filter_engine::extract_filter(&tree, &ctx, defaults) {
        Ok(params) => Ok(HttpResponse::Ok().json(params)),
        Err(e) => Ok(filter_error(&scope, e)),
    }
}

pub async fn edit_filter(
    store: web::Data<Arc<FilterStore>>,
    path: web::Path<String>,
    request: web::Json<EditFilterRequest>,
) -> ActixResult<HttpResponse> {
    let scope = path.into_inner();
    let EditFilterRequest { edit, replace } = request.into_inner();

    let slot = store
        .update_tree(&scope, |tree| {
            if replace {
                filter_engine::set_filter(tree, &edit)
            } else {
                filter_engine::edit_filter(tree, &edit)
            }
        })
        .await;

    info!(
        "Edited filter for scope {}: target={}, replace={}",
        scope, edit.target, replace
    );

    Ok(state_response(scope, slot))
}

pub async fn get_filter(
    store: web::Data<Arc<FilterStore>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let scope = path.into_inner();
    let slot = store.get(&scope).await;
    Ok(state_response(scope, slot))
}

pub async fn replace_filter(
    store: web::Data<Arc<FilterStore>>,
    path: web::Path<String>,
    request: web::Json<ReplaceFilterRequest>,
) -> ActixResult<HttpResponse> {
    let scope = path.into_inner();
    store.replace_tree(&scope, request.into_inner().tree).await;

    info!("Replaced filter for scope {}", scope);

    let slot = store.get(&scope).await;
    Ok(state_response(scope, slot))
}

pub async fn reset_filter(
    store: web::Data<Arc<FilterStore>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let scope = path.into_inner();
    store.reset(&scope).await;

    info!("Reset filter for scope {}", scope);

    Ok(state_response(scope, FilterSlot::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::configure_routes;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::path::PathBuf;

    macro_rules! test_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(SettingsAppState::new(
                        ApiConfig::default(),
                        PathBuf::from("unused.toml"),
                    )))
                    .app_data(web::Data::new($store.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_build_publishes_and_extract_reads_store() {
        let store = Arc::new(FilterStore::new());
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/filters/saving-wallet/build")
            .set_json(json!({
                "params": {"types": ["Expense"], "amount_min": 250000, "amount_max": 2500000}
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["scope"], "saving-wallet");
        assert_eq!(body["base_range"], json!({"min": 10.0, "max": 100.0}));
        assert_eq!(
            body["tree"],
            json!({"AND": [
                {"OR": [{"type": "Expense"}]},
                {"AND": [{"amount": {"gte": 10, "lte": 100}}, {"currency": "FX"}]}
            ]})
        );

        let slot = store.get("saving-wallet").await;
        assert_eq!(slot.base_range, Some(AmountRange::new(10.0, 100.0)));

        let req = test::TestRequest::post()
            .uri("/api/filters/saving-wallet/extract")
            .set_json(json!({}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!({"types": ["Expense"], "amount_min": 250000.0, "amount_max": 2500000.0})
        );
    }

    #[actix_web::test]
    async fn test_extract_explicit_tree_with_defaults() {
        let store = Arc::new(FilterStore::new());
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/filters/transactions/extract")
            .set_json(json!({
                "tree": {"date": "2024-01-15", "AND": [{"type": "Income"}]},
                "default_min": 5,
                "default_max": 50
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["types"], json!(["Income"]));
        assert_eq!(body["amount_min"], json!(5.0));
        assert_eq!(body["amount_max"], json!(50.0));
        assert_eq!(
            body["date_range"],
            json!({"from": "2024-01-15T00:00:00Z", "to": "2024-01-15T00:00:00Z"})
        );
    }

    #[actix_web::test]
    async fn test_build_rejects_inverted_amounts() {
        let store = Arc::new(FilterStore::new());
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/filters/saving-wallet/build")
            .set_json(json!({"params": {"amount_min": 10, "amount_max": 1}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "Invalid amount range: min 10 is greater than max 1"
        );
        assert!(store.get("saving-wallet").await.tree.is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_display_currency_is_bad_request() {
        let store = Arc::new(FilterStore::new());
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/filters/saving-wallet/build")
            .set_json(json!({
                "params": {"amount_min": 0, "amount_max": 1},
                "display_currency": "GBP"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_edit_replace_and_reset() {
        let store = Arc::new(FilterStore::new());
        let app = test_app!(store);

        for value in ["Expense", "Income"] {
            let req = test::TestRequest::post()
                .uri("/api/filters/transactions/edit")
                .set_json(json!({"edit": {"target": "type", "value": value}}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/filters/transactions")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["tree"],
            json!({"AND": [{"type": "Expense"}, {"type": "Income"}]})
        );
        assert_eq!(body["base_range"], Value::Null);

        let req = test::TestRequest::post()
            .uri("/api/filters/transactions/edit")
            .set_json(json!({"edit": {"target": "type", "value": "Fee"}, "replace": true}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tree"], json!({"AND": [{"type": "Fee"}]}));

        let req = test::TestRequest::put()
            .uri("/api/filters/transactions")
            .set_json(json!({"tree": {"baseAmount": {"gte": 1}}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tree"], json!({"baseAmount": {"gte": 1}}));

        let req = test::TestRequest::delete()
            .uri("/api/filters/transactions")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tree"], json!({}));
        assert!(store.get("transactions").await.tree.is_empty());
    }
}
