//! HTTP-level tests driving the router with in-memory datasets.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use climate_api::{config::ApiConfig, create_router, state::AppState};
use grid_dataset::{DatasetLoader, DatasetReader, GriddedDataset, InMemoryReader, UnsupportedReader};
use region_catalog::RegionCatalog;
use serde_json::{json, Value};
use test_utils::{
    dataset_from_fn, daily_times, nordic_dataset, nordic_lat, nordic_lon, nordic_regions_geojson,
    nordic_start, TestLayout,
};
use tower::ServiceExt;

struct TestApp {
    layout: TestLayout,
    state: Arc<AppState>,
}

impl TestApp {
    fn with_reader(reader: Arc<dyn DatasetReader>) -> Self {
        Self::build(reader, |_| {})
    }

    fn build(reader: Arc<dyn DatasetReader>, tweak: impl FnOnce(&mut ApiConfig)) -> Self {
        let layout = TestLayout::new();
        layout.write_region_file(&nordic_regions_geojson());
        layout.touch_dataset("t2m", "era5");

        let mut config = ApiConfig::with_root(layout.root());
        tweak(&mut config);
        let catalog = RegionCatalog::from_path(&config.region_file).unwrap();
        let loader = DatasetLoader::with_reader(&config.data_dir, reader);
        let state = Arc::new(AppState::new(config, catalog, loader));
        Self { layout, state }
    }

    fn with_dataset(dataset: GriddedDataset) -> Self {
        Self::with_reader(Arc::new(
            InMemoryReader::new().with_dataset("t2m_era5.nc", dataset),
        ))
    }

    fn new() -> Self {
        Self::with_dataset(nordic_dataset("t2m", 10))
    }

    fn router(&self) -> Router {
        create_router(Arc::clone(&self.state))
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.unwrap()
    }

    async fn process(&self, body: Value) -> (StatusCode, Value) {
        let response = self.send(post_json("/process", &body)).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn norway(area: &str) -> Value {
    json!({"country": "Norway", "variable": "t2m", "method": "era5", "area": area})
}

// ============================================================================
// POST /process
// ============================================================================

#[tokio::test]
async fn test_process_whole_country() {
    let app = TestApp::new();
    let (status, body) = app.process(norway("country")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["download_link"], "/download/norway_t2m_era5.csv");
    assert!(app
        .layout
        .download_dir()
        .join("norway_t2m_era5.csv")
        .is_file());
}

#[tokio::test]
async fn test_process_country_is_case_insensitive() {
    let app = TestApp::new();
    let (_, lower) = app
        .process(json!({"country": "norway", "variable": "t2m", "method": "era5", "area": "country"}))
        .await;
    let first = std::fs::read(app.layout.download_dir().join("norway_t2m_era5.csv")).unwrap();

    let (status, upper) = app
        .process(json!({"country": "NORWAY", "variable": "t2m", "method": "era5", "area": "country"}))
        .await;
    let second = std::fs::read(app.layout.download_dir().join("norway_t2m_era5.csv")).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(lower, upper);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_process_subregions_returns_archive() {
    let app = TestApp::new();
    let (status, body) = app.process(norway("subregion")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["download_link"], "/download/norway_t2m_era5.zip");

    let archive = std::fs::File::open(app.layout.download_dir().join("norway_t2m_era5.zip")).unwrap();
    let mut zip = zip_names(archive);
    zip.sort();
    // NO5 lies off the grid and is skipped
    assert_eq!(zip, vec!["norway_NO1_t2m_era5.csv", "norway_NO2_t2m_era5.csv"]);
}

fn zip_names(file: std::fs::File) -> Vec<String> {
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[tokio::test]
async fn test_process_missing_field_leaves_directory_alone() {
    let app = TestApp::new();
    std::fs::create_dir_all(app.layout.download_dir()).unwrap();
    let sentinel = app.layout.download_dir().join("keep.csv");
    std::fs::write(&sentinel, "x").unwrap();

    let (status, body) = app
        .process(json!({"country": "Norway", "variable": "t2m", "method": "era5"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Country, variable, method, and area are required!");
    assert!(sentinel.exists());
}

#[tokio::test]
async fn test_process_without_json() {
    let app = TestApp::new();
    let response = app
        .send(Request::post("/process").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No JSON data provided");
}

#[tokio::test]
async fn test_process_wipes_previous_output() {
    let app = TestApp::new();
    std::fs::create_dir_all(app.layout.download_dir()).unwrap();
    let stale = app.layout.download_dir().join("stale.zip");
    std::fs::write(&stale, "x").unwrap();

    let (status, _) = app.process(norway("country")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!stale.exists());
}

#[tokio::test]
async fn test_process_unknown_country_is_404() {
    let app = TestApp::new();
    let (status, body) = app
        .process(json!({"country": "Narnia", "variable": "t2m", "method": "era5", "area": "country"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Country 'narnia' not found in the region catalog.");
}

#[tokio::test]
async fn test_process_missing_dataset_is_404() {
    let app = TestApp::new();
    let (status, body) = app
        .process(json!({"country": "Norway", "variable": "tp", "method": "era5", "area": "country"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Dataset not found at "));
}

#[tokio::test]
async fn test_process_all_missing_is_400() {
    let dataset = dataset_from_fn(
        "t2m",
        nordic_lat(),
        nordic_lon(),
        daily_times(nordic_start(), 3),
        |_, _, _| f64::NAN,
    );
    let app = TestApp::with_dataset(dataset);

    let (status, body) = app.process(norway("country")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("only missing values"));

    let (status, body) = app.process(norway("subregion")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No valid subregions were processed successfully.");
}

#[tokio::test]
async fn test_process_reader_failure_is_generic_500() {
    let app = TestApp::with_reader(Arc::new(UnsupportedReader));
    let (status, body) = app.process(norway("country")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

// ============================================================================
// GET /download
// ============================================================================

#[tokio::test]
async fn test_download_rejects_traversal() {
    let app = TestApp::new();
    for uri in ["/download/..", "/download/..secret.csv", "/download/%2Fetc%2Fpasswd"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["error"], "Invalid filename");
    }
    assert_eq!(app.state.cleanup.pending_count(), 0);
}

#[tokio::test]
async fn test_download_rejects_zone_csv_in_subdirectory() {
    let app = TestApp::new();
    let (status, _) = app.process(norway("subregion")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app
        .layout
        .download_dir()
        .join("norway/norway_NO1_t2m_era5.csv")
        .is_file());

    let response = app.get("/download/norway%2Fnorway_NO1_t2m_era5.csv").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid filename");
    assert_eq!(app.state.cleanup.pending_count(), 0);
}

#[tokio::test]
async fn test_download_missing_file() {
    let app = TestApp::new();
    let response = app.get("/download/nothing.csv").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "File not found!");
}

#[tokio::test]
async fn test_download_serves_attachment_and_schedules_cleanup() {
    let app = TestApp::new();
    let (_, body) = app.process(norway("country")).await;
    let link = body["download_link"].as_str().unwrap().to_string();
    let on_disk = std::fs::read(app.layout.download_dir().join("norway_t2m_era5.csv")).unwrap();

    let response = app.get(&link).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"norway_t2m_era5.csv\""
    );
    assert_eq!(body_bytes(response).await, on_disk);
    assert_eq!(app.state.cleanup.pending_count(), 1);

    // A second download does not add another timer
    let response = app.get(&link).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.cleanup.pending_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_downloaded_file_deleted_after_delay() {
    let app = TestApp::build(Arc::new(InMemoryReader::new()), |config| {
        config.cleanup_delay = Duration::from_secs(300);
    });
    std::fs::create_dir_all(app.layout.download_dir()).unwrap();
    let file = app.layout.download_dir().join("sweden_t2m_era5.csv");
    std::fs::write(&file, "Time\n").unwrap();

    let response = app.get("/download/sweden_t2m_era5.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);

    tokio::time::advance(Duration::from_secs(299)).await;
    settle().await;
    assert!(file.exists());

    tokio::time::advance(Duration::from_secs(2)).await;
    settle().await;
    assert!(!file.exists());
    assert_eq!(app.state.cleanup.pending_count(), 0);

    let response = app.get("/download/sweden_t2m_era5.csv").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "File not found!");
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// POST /cleanup, GET /health, misc
// ============================================================================

#[tokio::test]
async fn test_cleanup_wipes_and_cancels() {
    let app = TestApp::new();
    app.process(norway("country")).await;
    app.get("/download/norway_t2m_era5.csv").await;
    assert_eq!(app.state.cleanup.pending_count(), 1);

    let response = app
        .send(Request::post("/cleanup").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Download directory cleaned successfully"
    );
    assert_eq!(app.state.cleanup.pending_count(), 0);
    assert!(app.layout.download_dir().is_dir());
    assert_eq!(std::fs::read_dir(app.layout.download_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_health_reports_pending_cleanup() {
    let app = TestApp::build(Arc::new(InMemoryReader::new()), |config| {
        config.public_domain = Some("climate.example.org".to_string());
    });

    let body = body_json(app.get("/health").await).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cleanup_status"], "0 files scheduled for cleanup");
    assert_eq!(body["domain"], "climate.example.org");

    std::fs::create_dir_all(app.layout.download_dir()).unwrap();
    std::fs::write(app.layout.download_dir().join("a.csv"), "x").unwrap();
    app.get("/download/a.csv").await;

    let body = body_json(app.get("/health").await).await;
    assert_eq!(body["cleanup_status"], "1 files scheduled for cleanup");
    assert_eq!(body["pending_cleanup"], 1);
}

#[tokio::test]
async fn test_countries_and_datasets() {
    let app = TestApp::new();

    let countries = body_json(app.get("/api/countries").await).await;
    assert_eq!(
        countries["countries"],
        json!([{"name": "norway", "zones": 3}, {"name": "sweden", "zones": 1}])
    );

    let datasets = body_json(app.get("/api/datasets").await).await;
    assert_eq!(
        datasets["datasets"],
        json!([{"variable": "t2m", "method": "era5"}])
    );
}

#[tokio::test]
async fn test_landing_page_and_metrics() {
    let app = TestApp::new();

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<form id=\"data-form\">"));

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_static_dir_served_when_configured() {
    let static_root = tempfile::tempdir().unwrap();
    std::fs::write(static_root.path().join("app.js"), "console.log(1);").unwrap();
    let static_path = static_root.path().to_path_buf();

    let app = TestApp::build(Arc::new(InMemoryReader::new()), move |config| {
        config.static_dir = Some(static_path);
    });

    let response = app.get("/static/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"console.log(1);");

    let without = TestApp::new();
    assert_eq!(without.get("/static/app.js").await.status(), StatusCode::NOT_FOUND);
}
