use crate::helpers::{measurement, spawn_app, station, MockClimateAccess};
use axum::http::StatusCode;
use climate_api::{MeasurementFilter, ObservationCount, TemperatureStats};
use serde_json::{from_str, Value};
use std::sync::Arc;

#[tokio::test]
async fn home_lists_available_routes() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new()));

    let (status, html) = test_app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Welcome to Honolulu, Hawaii Climate API!"));
    for route in [
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/station-analysis",
        "/api/v1.0/&lt;start&gt;/&lt;end&gt;",
    ] {
        assert!(html.contains(route), "missing route {}", route);
    }
}

#[tokio::test]
async fn stations_lists_each_station_id() {
    let mut climate_db = MockClimateAccess::new();
    climate_db.expect_stations().times(1).returning(|| {
        Ok(vec![
            station("USC00519397", "WAIKIKI 717.2, HI US"),
            station("USC00513117", "KANEOHE 838.1, HI US"),
            station("USC00519281", "WAIHEE 837.5, HI US"),
        ])
    });
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = test_app.get("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<String> = from_str(&body).unwrap();
    assert_eq!(ids, vec!["USC00519397", "USC00513117", "USC00519281"]);
}

#[tokio::test]
async fn precipitation_covers_last_twelve_months() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_latest_date()
        .times(1)
        .returning(|| Ok(Some("2017-08-23".to_string())));
    climate_db
        .expect_measurements()
        .withf(|filter: &MeasurementFilter| *filter == MeasurementFilter::since("2016-08-23"))
        .times(1)
        .returning(|_| {
            Ok(vec![
                measurement("USC00519397", "2016-08-23", Some(0.0), Some(81.0)),
                measurement("USC00513117", "2016-08-23", None, Some(76.0)),
                measurement("USC00519281", "2017-08-23", Some(0.45), Some(82.0)),
            ])
        });
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    let readings: Vec<Value> = from_str(&body).unwrap();
    assert_eq!(readings.len(), 3);
    for reading in &readings {
        let object = reading.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["date", "prcp"]);
    }
    assert_eq!(readings[1]["prcp"], Value::Null);
    assert_eq!(readings[2]["prcp"], 0.45);
}

#[tokio::test]
async fn precipitation_on_empty_dataset_is_a_server_error() {
    let mut climate_db = MockClimateAccess::new();
    climate_db.expect_latest_date().returning(|| Ok(None));
    climate_db.expect_measurements().times(0);
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, _) = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn tobs_uses_busiest_station() {
    let mut climate_db = MockClimateAccess::new();
    climate_db.expect_observation_counts().times(1).returning(|| {
        Ok(vec![
            ObservationCount {
                station_id: "USC00519281".to_string(),
                observation_count: 2772,
            },
            ObservationCount {
                station_id: "USC00519397".to_string(),
                observation_count: 2724,
            },
        ])
    });
    climate_db
        .expect_latest_date()
        .times(1)
        .returning(|| Ok(Some("2017-08-18".to_string())));
    climate_db
        .expect_measurements()
        .withf(|filter: &MeasurementFilter| {
            filter.station.as_deref() == Some("USC00519281")
                && filter.start.as_deref() == Some("2016-08-18")
                && filter.end.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                measurement("USC00519281", "2016-08-18", Some(0.0), Some(80.0)),
                measurement("USC00519281", "2016-08-19", Some(0.31), Some(79.0)),
            ])
        });
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = test_app.get("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    let readings: Value = from_str(&body).unwrap();
    assert_eq!(
        readings,
        serde_json::json!([
            {"date": "2016-08-18", "tobs": 80.0},
            {"date": "2016-08-19", "tobs": 79.0}
        ])
    );
}

#[tokio::test]
async fn temperature_from_start_returns_three_values() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_stats()
        .withf(|filter: &MeasurementFilter| *filter == MeasurementFilter::since("2017-01-01"))
        .times(1)
        .returning(|_| {
            Ok(TemperatureStats {
                min: Some(58.0),
                avg: Some(74.14387974230493),
                max: Some(87.0),
            })
        });
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = test_app.get("/api/v1.0/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    let stats: Vec<Option<f64>> = from_str(&body).unwrap();
    assert_eq!(stats, vec![Some(58.0), Some(74.14387974230493), Some(87.0)]);
}

#[tokio::test]
async fn temperature_range_passes_both_bounds() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_stats()
        .withf(|filter: &MeasurementFilter| {
            *filter == MeasurementFilter::since("2017-01-01").with_end("2017-01-31")
        })
        .times(1)
        .returning(|_| {
            Ok(TemperatureStats {
                min: Some(60.0),
                avg: Some(69.5),
                max: Some(76.0),
            })
        });
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = test_app.get("/api/v1.0/2017-01-01/2017-01-31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[60.0,69.5,76.0]");
}

#[tokio::test]
async fn temperature_with_no_matching_rows_is_all_null() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_stats()
        .returning(|_| Ok(TemperatureStats::default()));
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = test_app.get("/api/v1.0/2018-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[null,null,null]");
}

#[tokio::test]
async fn malformed_dates_are_rejected_before_querying() {
    let mut climate_db = MockClimateAccess::new();
    climate_db.expect_temperature_stats().times(0);
    let test_app = spawn_app(Arc::new(climate_db));

    for uri in [
        "/api/v1.0/yesterday",
        "/api/v1.0/2017-1-1",
        "/api/v1.0/2017-01-01/soon",
        "/api/v1.0/2017-02-30/2017-03-01",
    ] {
        let (status, body) = test_app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert!(body.contains("expected YYYY-MM-DD"));
    }
}
