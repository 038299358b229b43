use crate::aggregate::{
    added_years, by_type, by_type_and_year, country_counts, genre_counts, max_added_year,
    rating_counts, summarize, top_n, type_counts, TOP_N,
};
use crate::charts::{chart_config, ChartData, ChartKind};
use crate::dataset;
use crate::models::{TitleRecord, TitleType};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{env, net::SocketAddr, sync::Arc};
use tracing::{info, warn};

const DEFAULT_CSV: &str = "netflix_titles.csv";
const PORT: u16 = 3080;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<Vec<TitleRecord>>,
}

impl AppState {
    pub fn new(records: Vec<TitleRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

pub async fn run_server() -> Result<()> {
    let csv_path = env::var("CATALOG_CSV").unwrap_or_else(|_| DEFAULT_CSV.to_string());
    let records = dataset::load_catalog(&csv_path)?;
    if records.is_empty() {
        warn!("Catalog {} produced no usable records", csv_path);
    }
    let state = AppState::new(records);

    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], PORT));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/meta", get(meta))
        .route("/api/dashboard", get(dashboard_data))
        .route("/health", get(health))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Static page data: available filter values, the initial selection
/// (type = Movie, year = latest present), the type-distribution donut, and
/// the summary cards.
async fn meta(State(state): State<AppState>) -> Json<Value> {
    let records = &state.records;
    let donut = chart_config(
        ChartKind::Doughnut,
        &ChartData::from_counts("Movies vs TV Shows", &type_counts(records.iter())),
    );

    Json(json!({
        "types": [TitleType::Movie.label(), TitleType::TvShow.label()],
        "years": added_years(records),
        "initial": {
            "content_type": TitleType::Movie.label(),
            "year": max_added_year(records),
        },
        "type_distribution": donut,
        "summary": summarize(records),
    }))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub content_type: String,
    pub year: Option<i32>,
}

/// Recompute the three filter-driven charts from the full record set. Every
/// input change re-runs this from scratch; nothing is cached between calls.
async fn dashboard_data(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> (StatusCode, Json<Value>) {
    let Some(title_type) = TitleType::parse(&query.content_type) else {
        warn!(
            "Rejecting dashboard query with unknown type '{}'",
            query.content_type
        );
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "message": format!("Unknown content type '{}'", query.content_type)
            })),
        );
    };
    let records = &state.records;
    let year = query.year.or_else(|| max_added_year(records));

    let of_type = by_type(records, title_type);
    let countries = chart_config(
        ChartKind::Bar,
        &ChartData::from_counts(
            format!("Top 10 Countries for {}s", title_type.label()),
            &top_n(country_counts(of_type.iter().copied()), TOP_N),
        ),
    );

    let in_year = match year {
        Some(y) => by_type_and_year(records, title_type, y),
        None => Vec::new(),
    };
    let rating_title = match year {
        Some(y) => format!("{}s Added in {} by Rating", title_type.label(), y),
        None => format!("{}s by Rating", title_type.label()),
    };
    let ratings = chart_config(
        ChartKind::Bar,
        &ChartData::from_counts(rating_title, &rating_counts(in_year.iter().copied())),
    );
    let genres = chart_config(
        ChartKind::Bar,
        &ChartData::from_counts(
            "Top Genres",
            &top_n(genre_counts(in_year.iter().copied()), TOP_N),
        ),
    );

    (
        StatusCode::OK,
        Json(json!({
            "countries": countries,
            "ratings": ratings,
            "genres": genres,
        })),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Streaming Catalog Dashboard</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #121212;
            color: #eee;
        }
        h1 { text-align: center; }
        .cards, .charts-grid {
            display: grid;
            gap: 16px;
            max-width: 1200px;
            margin: 0 auto 24px auto;
        }
        .cards { grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); }
        .charts-grid { grid-template-columns: repeat(auto-fit, minmax(480px, 1fr)); }
        .card, .chart-card, .controls {
            background: #1e1e1e;
            border-radius: 8px;
            padding: 16px;
        }
        .card h2 { margin: 4px 0 0 0; }
        .card span { color: #aaa; font-size: 14px; }
        .controls {
            display: flex;
            gap: 24px;
            align-items: center;
            max-width: 1200px;
            margin: 0 auto 24px auto;
        }
        .controls label { margin-right: 8px; }
        select, input[type="range"] { accent-color: #7d3cff; }
    </style>
</head>
<body>
    <h1>Streaming Catalog Dashboard</h1>
    <div class="cards">
        <div class="card"><span>Movies</span><h2 id="card-movies">-</h2></div>
        <div class="card"><span>TV Shows</span><h2 id="card-shows">-</h2></div>
        <div class="card"><span>Top Genre</span><h2 id="card-genre">-</h2></div>
        <div class="card"><span>Avg. Movie Duration</span><h2 id="card-duration">-</h2></div>
    </div>
    <div class="controls">
        <div>
            <label for="type-select">Content Type</label>
            <select id="type-select"></select>
        </div>
        <div style="flex:1">
            <label for="year-slider">Year <span id="year-label"></span></label>
            <input type="range" id="year-slider" style="width:100%">
        </div>
    </div>
    <div class="charts-grid">
        <div class="chart-card"><canvas id="donut-chart"></canvas></div>
        <div class="chart-card"><canvas id="country-chart"></canvas></div>
        <div class="chart-card"><canvas id="rating-chart"></canvas></div>
        <div class="chart-card"><canvas id="genre-chart"></canvas></div>
    </div>
    <script>
        const typeSelect = document.getElementById('type-select');
        const yearSlider = document.getElementById('year-slider');
        const yearLabel = document.getElementById('year-label');
        const charts = {};

        function draw(id, config) {
            if (charts[id]) charts[id].destroy();
            charts[id] = new Chart(document.getElementById(id), config);
        }

        async function refresh() {
            yearLabel.textContent = yearSlider.value;
            const params = new URLSearchParams({
                content_type: typeSelect.value,
                year: yearSlider.value,
            });
            const res = await fetch('/api/dashboard?' + params);
            if (!res.ok) return;
            const data = await res.json();
            draw('country-chart', data.countries);
            draw('rating-chart', data.ratings);
            draw('genre-chart', data.genres);
        }

        async function init() {
            const meta = await (await fetch('/api/meta')).json();
            for (const t of meta.types) {
                const option = document.createElement('option');
                option.value = t;
                option.textContent = t;
                typeSelect.appendChild(option);
            }
            typeSelect.value = meta.initial.content_type;
            const years = meta.years;
            if (years.length > 0) {
                yearSlider.min = years[0];
                yearSlider.max = years[years.length - 1];
            }
            yearSlider.value = meta.initial.year ?? yearSlider.max;

            document.getElementById('card-movies').textContent = meta.summary.movies;
            document.getElementById('card-shows').textContent = meta.summary.tv_shows;
            document.getElementById('card-genre').textContent = meta.summary.top_genre ?? '-';
            document.getElementById('card-duration').textContent =
                meta.summary.avg_movie_minutes != null ? meta.summary.avg_movie_minutes + ' min' : '-';

            draw('donut-chart', meta.type_distribution);
            typeSelect.addEventListener('change', refresh);
            yearSlider.addEventListener('input', refresh);
            await refresh();
        }

        init();
    </script>
</body>
</html>
"##;
