use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::io::Write;
use streamlens::aggregate::type_counts;
use streamlens::app::{build_router, AppState};
use streamlens::dataset::{self, UNKNOWN};
use streamlens::models::TitleType;
use tempfile::NamedTempFile;
use tower::util::ServiceExt;

const HEADER: &str =
    "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description";

fn fixture_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create fixture file");
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn three_row_fixture() -> NamedTempFile {
    fixture_csv(&[
        r#"s1,Movie,First Film,Jane Doe,,United States,"January 1, 2020",2019,PG-13,90 min,"Drama, International Movies",A film."#,
        r#"s2,Movie,Second Film,,,,"March 5, 2021",2021,R,120 min,Drama,Another film."#,
        r#"s3,TV Show,Some Show,,,United States,"January 15, 2020",2020,TV-MA,2 Seasons,Crime TV Shows,A show."#,
    ])
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[test]
fn end_to_end_cleaning_and_type_distribution() {
    let fixture = three_row_fixture();
    let records = dataset::load_catalog(fixture.path()).unwrap();
    assert_eq!(records.len(), 3);

    let counts = type_counts(&records);
    assert_eq!(counts[0], ("Movie".to_string(), 2));
    assert_eq!(counts[1], ("TV Show".to_string(), 1));

    let second = records
        .iter()
        .find(|r| r.title == "Second Film")
        .expect("second film present");
    assert_eq!(second.country, UNKNOWN);
    assert_eq!(second.director, UNKNOWN);
    assert_eq!(second.duration_minutes, Some(120));

    for record in &records {
        assert!(!record.rating.is_empty());
        assert!(!record.duration.is_empty());
        assert!(
            record.duration_minutes.is_none() || record.duration_seasons.is_none(),
            "at most one duration field may be set"
        );
    }

    let show = records
        .iter()
        .find(|r| r.title_type == TitleType::TvShow)
        .unwrap();
    assert_eq!(show.duration_seasons, Some(2));
    assert_eq!(
        show.genres,
        vec!["Crime TV Shows".to_string()]
    );
}

#[test]
fn rows_missing_required_fields_are_dropped() {
    let fixture = fixture_csv(&[
        r#"s1,Movie,Kept,,,,"January 1, 2020",2020,PG,90 min,Drama,"#,
        r#"s2,Movie,No Rating,,,,"January 1, 2020",2020,,90 min,Drama,"#,
        r#"s3,TV Show,No Duration,,,,"January 1, 2020",2020,TV-MA,,Drama,"#,
    ]);
    let records = dataset::load_catalog(fixture.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Kept");
}

#[test]
fn missing_catalog_file_is_fatal() {
    assert!(dataset::load_catalog("no/such/file.csv").is_err());
}

#[tokio::test]
async fn meta_reports_initial_selection_and_summary() {
    let fixture = three_row_fixture();
    let records = dataset::load_catalog(fixture.path()).unwrap();
    let app = build_router(AppState::new(records));

    let (status, meta) = get_json(app, "/api/meta").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meta["initial"]["content_type"], "Movie");
    assert_eq!(meta["initial"]["year"], 2021);
    assert_eq!(meta["years"], serde_json::json!([2020, 2021]));
    assert_eq!(meta["summary"]["movies"], 2);
    assert_eq!(meta["summary"]["tv_shows"], 1);
    assert_eq!(meta["summary"]["top_genre"], "Drama");
    assert_eq!(meta["summary"]["avg_movie_minutes"], 105);
    assert_eq!(meta["type_distribution"]["type"], "doughnut");
}

#[tokio::test]
async fn dashboard_recomputes_charts_for_selected_filters() {
    let fixture = three_row_fixture();
    let records = dataset::load_catalog(fixture.path()).unwrap();
    let app = build_router(AppState::new(records));

    let (status, data) =
        get_json(app.clone(), "/api/dashboard?content_type=Movie&year=2020").await;
    assert_eq!(status, StatusCode::OK);

    let country_labels = data["countries"]["data"]["labels"].as_array().unwrap();
    assert!(country_labels.iter().any(|l| l == "United States"));
    assert!(country_labels.iter().any(|l| l == "Unknown"));

    // Only the 2020 movie contributes to the year-filtered charts.
    assert_eq!(data["ratings"]["data"]["labels"], serde_json::json!(["PG-13"]));
    assert_eq!(data["ratings"]["data"]["datasets"][0]["data"][0], 1);
    let genre_labels = data["genres"]["data"]["labels"].as_array().unwrap();
    assert!(genre_labels.iter().any(|l| l == "International Movies"));

    // A year with no matching records yields empty charts, not an error.
    let (status, data) =
        get_json(app, "/api/dashboard?content_type=TV%20Show&year=1999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(data["ratings"]["data"]["labels"].as_array().unwrap().is_empty());
    assert!(data["genres"]["data"]["labels"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_content_type_is_rejected() {
    let fixture = three_row_fixture();
    let records = dataset::load_catalog(fixture.path()).unwrap();
    let app = build_router(AppState::new(records));

    let (status, body) =
        get_json(app, "/api/dashboard?content_type=Documentary&year=2020").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn health_and_dashboard_page_respond() {
    let fixture = three_row_fixture();
    let records = dataset::load_catalog(fixture.path()).unwrap();
    let app = build_router(AppState::new(records));

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("year-slider"));
    assert!(page.contains("type-select"));
}
