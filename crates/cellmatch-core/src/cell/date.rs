//! Excel serial date conversion
//!
//! Workbooks store dates as day counts ("serials") whose fractional part is
//! the time of day. The 1900 system keeps Excel's phantom 1900-02-29 at
//! serial 60, so serials below it sit one day off a plain day count.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// 1899-12-30 as days from the common era; serial 0 of the 1900 system
const DAY_ZERO: i64 = 693_594;

/// Days between 1899-12-30 and 1904-01-01
const EPOCH_1904_OFFSET: i64 = 1_462;

/// First serial past 9999-12-31
const SERIAL_LIMIT: f64 = 2_958_466.0;

/// Epoch a workbook's serial numbers count from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSystem {
    /// Serial 1 is 1900-01-01
    #[default]
    Excel1900,
    /// Serial 0 is 1904-01-01
    Excel1904,
}

impl DateSystem {
    /// Date and time of a serial, to the nearest second.
    ///
    /// Serials below 1 are times of day and land on 1899-12-30 in either
    /// system. Returns `None` for negative, non-finite or out-of-range serials.
    pub fn to_datetime(self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || !(0.0..SERIAL_LIMIT).contains(&serial) {
            return None;
        }

        let whole = serial.trunc();
        let mut days = whole as i64;
        let mut seconds = ((serial - whole) * SECONDS_PER_DAY).round() as u32;
        if f64::from(seconds) >= SECONDS_PER_DAY {
            days += 1;
            seconds = 0;
        }

        let offset = match self {
            _ if days == 0 => 0,
            DateSystem::Excel1900 if days < 60 => days + 1,
            DateSystem::Excel1900 => days,
            DateSystem::Excel1904 => days + EPOCH_1904_OFFSET,
        };

        let date = NaiveDate::from_num_days_from_ce_opt(i32::try_from(DAY_ZERO + offset).ok()?)?;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
        Some(NaiveDateTime::new(date, time))
    }

    /// Serial of a date and time; the inverse of
    /// [`to_datetime`](DateSystem::to_datetime)
    pub fn to_serial(self, value: NaiveDateTime) -> f64 {
        let offset = i64::from(value.date().num_days_from_ce()) - DAY_ZERO;
        let days = match self {
            _ if offset == 0 => 0,
            DateSystem::Excel1900 if (2..=60).contains(&offset) => offset - 1,
            DateSystem::Excel1900 => offset,
            DateSystem::Excel1904 => offset - EPOCH_1904_OFFSET,
        };

        let time = value.time();
        let seconds = f64::from(time.num_seconds_from_midnight())
            + f64::from(time.nanosecond()) / 1e9;
        days as f64 + seconds / SECONDS_PER_DAY
    }
}

/// Whether `value` is a bare time of day (a serial below 1)
pub(crate) fn is_time_only(value: &NaiveDateTime) -> bool {
    i64::from(value.date().num_days_from_ce()) == DAY_ZERO
}
