use async_trait::async_trait;
use climate_api_core::{is_file, list_dir};
use log::{error, info};
use regex::Regex;
use scooby::postgres::{select, Aliasable, Parameters, Select};
use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    FromRow,
};
use std::{env, path::Path, sync::LazyLock, time::Duration};
use utoipa::ToSchema;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\d+)").expect("placeholder pattern is valid")
});

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("climate store not found at {path} (found: {found:?})")]
    StoreNotFound { path: String, found: Vec<String> },
    #[error("climate store has no measurements")]
    EmptyDataset,
    #[error("malformed date `{0}`, expected YYYY-MM-DD")]
    MalformedDate(String),
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to parse date string: {0}")]
    TimeParse(#[from] time::error::Parse),
    #[error("Failed to format date string: {0}")]
    TimeFormat(#[from] time::error::Format),
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Every row of the station table
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// Measurement rows matching `filter`, in store order
    async fn measurements(&self, filter: &MeasurementFilter) -> Result<Vec<Measurement>, Error>;
    /// Measurement row counts grouped by station, largest first
    async fn observation_counts(&self) -> Result<Vec<ObservationCount>, Error>;
    /// Measurement counts joined with station names, largest first
    async fn station_activity(&self) -> Result<Vec<StationActivity>, Error>;
    /// Min, average and max of `tobs` over the rows matching `filter`
    async fn temperature_stats(&self, filter: &MeasurementFilter)
        -> Result<TemperatureStats, Error>;
    /// Most recent measurement date, `None` when there are no measurements
    async fn latest_date(&self) -> Result<Option<String>, Error>;
    async fn station_count(&self) -> Result<i64, Error>;
}

/// Row predicate for the measurement table. Unset fields do not filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasurementFilter {
    pub station: Option<String>,
    /// Inclusive lower bound on `date`
    pub start: Option<String>,
    /// Inclusive upper bound on `date`
    pub end: Option<String>,
}

impl MeasurementFilter {
    pub fn since(start: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            ..Self::default()
        }
    }

    pub fn for_station(station: impl Into<String>) -> Self {
        Self {
            station: Some(station.into()),
            ..Self::default()
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Adds the filter's WHERE clauses to `query`, returning the bound values
    /// in placeholder order.
    fn apply(&self, mut query: Select) -> (Select, Vec<String>) {
        let mut placeholders = Parameters::new();
        let mut values = vec![];

        if let Some(station) = &self.station {
            query = query.where_(format!("station = {}", placeholders.next()));
            values.push(station.clone());
        }
        if let Some(start) = &self.start {
            query = query.where_(format!("date >= {}", placeholders.next()));
            values.push(start.clone());
        }
        if let Some(end) = &self.end {
            query = query.where_(format!("date <= {}", placeholders.next()));
            values.push(end.clone());
        }

        (query, values)
    }
}

/// Read-only handle to the SQLite climate store.
///
/// Every query checks a connection out of the pool for its own duration; the
/// connection goes back to the pool when it is dropped, on success or error.
pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    /// Opens the store at `path`, failing with [`Error::StoreNotFound`] when the
    /// file does not exist instead of letting sqlite create an empty one.
    pub async fn open(path: &str) -> Result<Self, Error> {
        if !is_file(path) {
            return Err(store_not_found(path));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("climate store opened at: {}", path);
        Ok(Self { pool })
    }

    async fn query_as<T>(&self, select: Select, params: Vec<String>) -> Result<Vec<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = to_sqlite_placeholders(&select.to_string());
        let mut conn = self.pool.acquire().await?;
        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in params {
            query = query.bind(param);
        }
        Ok(query.fetch_all(&mut *conn).await?)
    }
}

/// Rewrites postgres style `$N` placeholders into sqlite's numbered `?N`.
pub fn to_sqlite_placeholders(sql: &str) -> String {
    PLACEHOLDER.replace_all(sql, "?${1}").into_owned()
}

fn store_not_found(path: &str) -> Error {
    let parent = Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let found = list_dir(parent);

    error!("climate store not found at: {}", path);
    if let Ok(cwd) = env::current_dir() {
        error!("current directory: {}", cwd.display());
    }
    match &found {
        Some(entries) => error!("contents of {}: {:?}", parent.display(), entries),
        None => error!("directory {} not found", parent.display()),
    }

    Error::StoreNotFound {
        path: path.to_owned(),
        found: found.unwrap_or_default(),
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let mut conn = self.pool.acquire().await?;
        let stations = sqlx::query_as::<_, Station>(
            "SELECT station, name, latitude, longitude, elevation FROM station",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(stations)
    }

    async fn measurements(&self, filter: &MeasurementFilter) -> Result<Vec<Measurement>, Error> {
        let (query, values) =
            filter.apply(select(("station", "date", "prcp", "tobs")).from("measurement"));
        self.query_as(query, values).await
    }

    async fn observation_counts(&self) -> Result<Vec<ObservationCount>, Error> {
        let mut conn = self.pool.acquire().await?;
        let counts = sqlx::query_as::<_, ObservationCount>(
            r#"
            SELECT station, COUNT(station) AS observation_count
            FROM measurement
            GROUP BY station
            ORDER BY observation_count DESC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(counts)
    }

    async fn station_activity(&self) -> Result<Vec<StationActivity>, Error> {
        let mut conn = self.pool.acquire().await?;
        let activity = sqlx::query_as::<_, StationActivity>(
            r#"
            SELECT measurement.station AS station,
                   COUNT(measurement.station) AS observation_count,
                   station.name AS name
            FROM measurement
            JOIN station ON measurement.station = station.station
            GROUP BY measurement.station
            ORDER BY observation_count DESC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(activity)
    }

    async fn temperature_stats(
        &self,
        filter: &MeasurementFilter,
    ) -> Result<TemperatureStats, Error> {
        let (query, values) = filter.apply(
            select((
                "MIN(tobs)".as_("min"),
                "AVG(tobs)".as_("avg"),
                "MAX(tobs)".as_("max"),
            ))
            .from("measurement"),
        );

        // Aggregates without GROUP BY always produce exactly one row
        let stats: Vec<TemperatureStats> = self.query_as(query, values).await?;
        Ok(stats.into_iter().next().unwrap_or_default())
    }

    async fn latest_date(&self) -> Result<Option<String>, Error> {
        let mut conn = self.pool.acquire().await?;
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&mut *conn)
            .await?;
        Ok(latest)
    }

    async fn station_count(&self) -> Result<i64, Error> {
        let mut conn = self.pool.acquire().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(station) FROM station")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow, ToSchema)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow, ToSchema)]
pub struct Measurement {
    pub station: String,
    pub date: String,
    /// Precipitation in inches
    pub prcp: Option<f64>,
    /// Temperature observation in degrees Fahrenheit
    pub tobs: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct ObservationCount {
    #[sqlx(rename = "station")]
    pub station_id: String,
    pub observation_count: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow, ToSchema)]
pub struct StationActivity {
    #[sqlx(rename = "station")]
    pub station_id: String,
    pub name: String,
    pub observation_count: i64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, FromRow, ToSchema)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    /// Same statistics with the average rounded to two decimal places, ties to even
    pub fn with_rounded_avg(self) -> Self {
        Self {
            avg: self.avg.map(|avg| (avg * 100.0).round_ties_even() / 100.0),
            ..self
        }
    }

    /// `[min, avg, max]`, the shape returned by the date range endpoints
    pub fn to_array(self) -> [Option<f64>; 3] {
        [self.min, self.avg, self.max]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: Option<f64>,
}

impl From<Measurement> for PrecipitationReading {
    fn from(measurement: Measurement) -> Self {
        Self {
            date: measurement.date,
            prcp: measurement.prcp,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct TobsReading {
    pub date: String,
    pub tobs: Option<f64>,
}

impl From<Measurement> for TobsReading {
    fn from(measurement: Measurement) -> Self {
        Self {
            date: measurement.date,
            tobs: measurement.tobs,
        }
    }
}
