//! Values computed per request from the store: the "last 12 months" lower
//! bound and the station with the most measurements.

use log::debug;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration};

use crate::db::{ClimateData, Error};

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Strictly parses a `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> Result<Date, Error> {
    Date::parse(input, ISO_DATE).map_err(|_| Error::MalformedDate(input.to_owned()))
}

/// Subtracts exactly 365 days, leap days included.
pub fn year_before(date: &str) -> Result<String, Error> {
    let parsed = Date::parse(date, ISO_DATE)?;
    let earlier = parsed - Duration::days(365);
    Ok(earlier.format(ISO_DATE)?)
}

/// Most recent measurement date minus 365 days.
pub async fn reference_date(db: &dyn ClimateData) -> Result<String, Error> {
    let latest = db.latest_date().await?.ok_or(Error::EmptyDataset)?;
    let reference = year_before(&latest)?;
    debug!("latest measurement {}, reference date {}", latest, reference);
    Ok(reference)
}

/// Station id with the most measurement rows. Ties resolve to whichever
/// station the store lists first.
pub async fn busiest_station(db: &dyn ClimateData) -> Result<String, Error> {
    db.observation_counts()
        .await?
        .into_iter()
        .next()
        .map(|top| top.station_id)
        .ok_or(Error::EmptyDataset)
}
