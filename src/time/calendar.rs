// Copyright  (C) 2021, Hove and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Hove (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use super::{DateTime, DaysSinceDatasetStart, SECONDS_PER_DAY};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::convert::TryFrom;

// we allow 36_600 days which is more than 100 years,
// and such that the last second of the last day still fits in a u32
const MAX_DAYS_IN_CALENDAR: u16 = 100 * 366;

/// The period covered by a dataset.
///
/// Day `0` of every `DateTime` is `first_date`.
#[derive(Debug, Clone)]
pub struct Calendar {
    first_date: NaiveDate, //first date which may be allowed
    last_date: NaiveDate,  //last date (included) which may be allowed
    nb_of_days: u16,       // == (last_date - first_date).num_of_days() + 1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    LastDateBeforeFirstDate(NaiveDate, NaiveDate),
    TooManyDays(i64),
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::LastDateBeforeFirstDate(first_date, last_date) => write!(
                f,
                "The last date {} of the calendar is before its first date {}",
                last_date, first_date
            ),
            CalendarError::TooManyDays(nb_of_days) => write!(
                f,
                "Trying to construct a calendar with {} days \
                 which is more than the maximum allowed of {} days",
                nb_of_days, MAX_DAYS_IN_CALENDAR
            ),
        }
    }
}

impl std::error::Error for CalendarError {}

impl Calendar {
    pub fn new(first_date: NaiveDate, last_date: NaiveDate) -> Result<Self, CalendarError> {
        if last_date < first_date {
            return Err(CalendarError::LastDateBeforeFirstDate(
                first_date, last_date,
            ));
        }
        let nb_of_days_i64: i64 = (last_date - first_date).num_days() + 1;
        let nb_of_days = u16::try_from(nb_of_days_i64)
            .ok()
            .filter(|nb_of_days| *nb_of_days <= MAX_DAYS_IN_CALENDAR)
            .ok_or(CalendarError::TooManyDays(nb_of_days_i64))?;

        Ok(Self {
            first_date,
            last_date,
            nb_of_days,
        })
    }

    pub fn nb_of_days(&self) -> u16 {
        self.nb_of_days
    }

    pub fn first_date(&self) -> &NaiveDate {
        &self.first_date
    }

    pub fn last_date(&self) -> &NaiveDate {
        &self.last_date
    }

    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.first_date <= *date && *date <= self.last_date
    }

    pub fn date_to_days_since_start(&self, date: &NaiveDate) -> Option<DaysSinceDatasetStart> {
        if !self.contains_date(date) {
            return None;
        }
        // the cast is safe since 0 <= days < nb_of_days <= MAX_DAYS_IN_CALENDAR
        let days = (*date - self.first_date).num_days() as u16;
        Some(DaysSinceDatasetStart { days })
    }

    pub fn to_naive_date(&self, day: &DaysSinceDatasetStart) -> NaiveDate {
        self.first_date + chrono::Duration::days(i64::from(day.days))
    }

    pub fn to_naive_datetime(&self, datetime: &DateTime) -> NaiveDateTime {
        self.first_date.and_time(NaiveTime::MIN)
            + chrono::Duration::seconds(i64::from(datetime.total_seconds()))
    }

    /// Returns `None` when the date of `naive_datetime` is not in the calendar
    pub fn from_naive_datetime(&self, naive_datetime: &NaiveDateTime) -> Option<DateTime> {
        let day = self.date_to_days_since_start(&naive_datetime.date())?;
        let seconds_in_day = naive_datetime.num_seconds_from_midnight();
        debug_assert!(seconds_in_day < SECONDS_PER_DAY);
        Some(DateTime::combine(day, seconds_in_day))
    }

    pub fn to_pretty_string(&self, datetime: &DateTime) -> String {
        self.to_naive_datetime(datetime)
            .format("%H:%M:%S %d-%b-%y")
            .to_string()
    }

    pub fn days(&self) -> impl Iterator<Item = DaysSinceDatasetStart> {
        (0..self.nb_of_days).map(|days| DaysSinceDatasetStart { days })
    }
}
