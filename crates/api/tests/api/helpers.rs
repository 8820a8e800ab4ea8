use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{
    app, AppState, ClimateData, Error, Measurement, MeasurementFilter, ObservationCount,
    PngHistogramRenderer, Station, StationActivity, TemperatureStats,
};
use hyper::{header, Method};
use mockall::mock;
use sqlx::{sqlite::SqliteConnectOptions, Connection, SqliteConnection};
use std::{path::Path, sync::Arc};
use tower::ServiceExt;

mock! {
    pub ClimateAccess {}
    #[async_trait]
    impl ClimateData for ClimateAccess {
        async fn stations(&self) -> Result<Vec<Station>, Error>;
        async fn measurements(&self, filter: &MeasurementFilter) -> Result<Vec<Measurement>, Error>;
        async fn observation_counts(&self) -> Result<Vec<ObservationCount>, Error>;
        async fn station_activity(&self) -> Result<Vec<StationActivity>, Error>;
        async fn temperature_stats(&self, filter: &MeasurementFilter) -> Result<TemperatureStats, Error>;
        async fn latest_date(&self) -> Result<Option<String>, Error>;
        async fn station_count(&self) -> Result<i64, Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub fn spawn_app(climate_db: Arc<dyn ClimateData>) -> TestApp {
    let app_state = AppState {
        climate_db,
        renderer: Arc::new(PngHistogramRenderer),
    };

    TestApp {
        app: app(app_state),
    }
}

impl TestApp {
    /// Sends a GET request, returning the status and the body as text
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "*/*")
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}

pub fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: Option<f64>) -> Measurement {
    Measurement {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

pub fn station(id: &str, name: &str) -> Station {
    Station {
        station: id.to_string(),
        name: name.to_string(),
        latitude: Some(21.45167),
        longitude: Some(-157.84889),
        elevation: Some(32.9),
    }
}

const SCHEMA: &str = r#"
CREATE TABLE station (
    id INTEGER PRIMARY KEY,
    station TEXT,
    name TEXT,
    latitude FLOAT,
    longitude FLOAT,
    elevation FLOAT
);
CREATE TABLE measurement (
    id INTEGER PRIMARY KEY,
    station TEXT,
    date TEXT,
    prcp FLOAT,
    tobs FLOAT
);
INSERT INTO station (station, name, latitude, longitude, elevation) VALUES
    ('USC00519397', 'WAIKIKI 717.2, HI US', 21.2716, -157.8168, 3.0),
    ('USC00519281', 'WAIHEE 837.5, HI US', 21.45167, -157.84889, 32.9),
    ('USC00513117', 'KANEOHE 838.1, HI US', 21.4234, -157.8015, 14.6),
    ('USC00517948', 'PEARL CITY, HI US', 21.3934, -157.9751, 11.9);
INSERT INTO measurement (station, date, prcp, tobs) VALUES
    ('USC00519281', '2016-08-22', 0.10, 70.0),
    ('USC00519281', '2016-08-23', 0.00, 77.0),
    ('USC00519281', '2017-01-15', NULL, 65.0),
    ('USC00519281', '2017-08-18', 0.06, 79.0),
    ('USC00519397', '2016-08-20', 0.02, 81.0),
    ('USC00519397', '2017-02-01', 0.50, 68.0),
    ('USC00519397', '2017-08-23', 0.00, 81.0),
    ('USC00513117', '2016-09-01', 1.20, 76.0),
    ('USC00513117', '2016-08-01', 0.30, NULL);
"#;

/// Writes a small Hawaii dataset to `dir/hawaii.sqlite`, returning its path.
///
/// Latest date is 2017-08-23 so the reference date is 2016-08-23.
/// USC00519281 has the most rows (4), then USC00519397 (3), USC00513117 (2);
/// USC00517948 has no measurements.
pub async fn seed_store(dir: &Path) -> String {
    let path = dir.join("hawaii.sqlite");
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);

    let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
    sqlx::raw_sql(SCHEMA).execute(&mut conn).await.unwrap();
    conn.close().await.unwrap();

    path.to_str().unwrap().to_string()
}
