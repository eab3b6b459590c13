use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt::Display,
    fs::{File, FileTimes},
    path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::error::{PathContext, Result};

use super::data::PublishedPost;

/// Newest first. `sort_by` is stable, so ties keep directory order.
pub(super) fn sort_post<T: Borrow<PublishedPost>>(a: &T, b: &T) -> Ordering {
    b.borrow().modified.cmp(&a.borrow().modified)
}

pub(super) fn system_time(timestamp: i64) -> SystemTime {
    if timestamp >= 0 {
        UNIX_EPOCH + Duration::from_secs(timestamp.unsigned_abs())
    } else {
        UNIX_EPOCH - Duration::from_secs(timestamp.unsigned_abs())
    }
}

/// Sets both access and modification time of `path` (a directory) to `timestamp`.
pub(super) fn stamp_times(path: &Path, timestamp: i64) -> Result<()> {
    let time = system_time(timestamp);
    let times = FileTimes::new().set_accessed(time).set_modified(time);
    File::open(path).and_then(|dir| dir.set_times(times)).at(path)
}

pub(super) fn modified_time(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).at(path)
}

/// `jan 02, 2024`
pub(super) fn format_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: Display,
{
    let date = tz.timestamp_opt(timestamp, 0).single()?;
    Some(date.format("%b %d, %Y").to_string().to_lowercase())
}

pub(super) fn feed_time(timestamp: i64) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .fixed_offset()
}
