//! HTTP handler functions for the crime trends API.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use crime_trends_analytics::{compute_views, default_selection, filter, filter_options};
use crime_trends_export::{EXPORT_FILE_NAME, EXPORT_MIME_TYPE, to_csv_bytes};
use crime_trends_incident_models::FilterSelection;
use crime_trends_loader::LoadReport;
use crime_trends_server_models::{
    ApiFilters, ApiHealth, ApiLoadReport, ApiPreview, PreviewQueryParams, SelectionQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/filters`
///
/// Returns the years and seasons present in the dataset and how it was
/// loaded.
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    let options = filter_options(state.dataset.incidents());
    HttpResponse::Ok().json(ApiFilters {
        years: options.years,
        seasons: options.seasons,
        report: api_report(state.dataset.report()),
    })
}

/// `GET /api/preview`
///
/// Returns the first rows of the filtered dataset.
pub async fn preview(
    state: web::Data<AppState>,
    params: web::Query<PreviewQueryParams>,
) -> HttpResponse {
    let selection = resolve_selection(&state, &params.selection_params());
    let filtered = filter(state.dataset.incidents(), &selection);

    HttpResponse::Ok().json(ApiPreview {
        total: filtered.len(),
        rows: filtered
            .head(params.limit())
            .iter()
            .map(|&incident| incident.clone())
            .collect(),
    })
}

/// `GET /api/views`
///
/// Computes all six aggregate views over the filtered dataset.
pub async fn views(
    state: web::Data<AppState>,
    params: web::Query<SelectionQueryParams>,
) -> HttpResponse {
    let selection = resolve_selection(&state, &params);
    let filtered = filter(state.dataset.incidents(), &selection);
    HttpResponse::Ok().json(compute_views(&filtered))
}

/// `GET /api/export`
///
/// Streams the filtered dataset as a CSV attachment.
pub async fn export(
    state: web::Data<AppState>,
    params: web::Query<SelectionQueryParams>,
) -> HttpResponse {
    let selection = resolve_selection(&state, &params);
    let filtered = filter(state.dataset.incidents(), &selection);

    match to_csv_bytes(filtered.iter()) {
        Ok(body) => HttpResponse::Ok()
            .content_type(format!("{EXPORT_MIME_TYPE}; charset=utf-8"))
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ))
            .body(body),
        Err(e) => {
            log::error!("Failed to export incidents: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to export incidents"
            }))
        }
    }
}

fn resolve_selection(state: &AppState, params: &SelectionQueryParams) -> FilterSelection {
    params.selection(&default_selection(state.dataset.incidents()))
}

const fn api_report(report: &LoadReport) -> ApiLoadReport {
    ApiLoadReport {
        total_rows: report.total_rows,
        unparseable_date: report.unparseable_date,
        out_of_range_year: report.out_of_range_year,
        missing_crime_type: report.missing_crime_type,
        loaded: report.loaded,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use chrono::NaiveDate;
    use crime_trends_incident_models::Incident;
    use crime_trends_loader::WorkingDataset;

    use super::*;
    use crate::configure;

    fn incident(y: i32, m: u32, d: u32, crime_type: &str, time: &str) -> Incident {
        Incident::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            Some(time.to_string()),
            crime_type.to_string(),
        )
    }

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            dataset: Arc::new(WorkingDataset::from_incidents(vec![
                incident(2021, 1, 5, "Theft", "10:00"),
                incident(2021, 7, 20, "Assault", "14:00"),
                incident(2022, 1, 10, "Theft", "09:00"),
            ])),
        })
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn filters_lists_years_and_seasons() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/filters").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["years"], serde_json::json!([2021, 2022]));
        assert_eq!(body["seasons"], serde_json::json!(["Winter", "Summer"]));
        assert_eq!(body["report"]["loaded"], 3);
    }

    #[actix_web::test]
    async fn preview_respects_selection_and_limit() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/preview?years=2021&limit=1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["rows"].as_array().unwrap().len(), 1);
        assert_eq!(body["rows"][0]["crimeType"], "Theft");
    }

    #[actix_web::test]
    async fn views_for_single_year() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/views?years=2022")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["rowCount"], 1);
        assert_eq!(
            body["yearlyTotals"],
            serde_json::json!([{ "year": 2022, "count": 1 }])
        );
    }

    #[actix_web::test]
    async fn empty_selection_yields_empty_views() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/views?seasons=")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["rowCount"], 0);
        assert_eq!(body["crimeTypeDistribution"]["shares"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn export_is_a_csv_attachment() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/export?seasons=Summer")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"filtered_crime_data.csv\""
        );

        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2021-07-20,14:00,Assault,"));
    }
}
