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

pub mod calendar;
pub mod days_patterns;

pub use calendar::Calendar;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// A point in time, stored as the number of seconds since 00:00:00
/// of the first day of the dataset calendar.
///
/// It packs a day index and a number of seconds in that day, so that
/// comparing two `DateTime` is the same as comparing them chronologically.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    seconds: u32,
}

/// Number of days since the first day of the dataset calendar
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct DaysSinceDatasetStart {
    pub(crate) days: u16,
}

/// Duration since the start of a service day.
///
/// This corresponds to the "Time" notion found in gtfs/ntfs stop_times.txt,
/// so it may be greater than 24h for vehicles running after midnight.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SecondsSinceDayStart {
    pub(crate) seconds: u32,
}

impl DateTime {
    pub fn combine(day: DaysSinceDatasetStart, seconds: u32) -> Self {
        Self {
            seconds: u32::from(day.days) * SECONDS_PER_DAY + seconds,
        }
    }

    pub fn date(&self) -> DaysSinceDatasetStart {
        // u32::MAX / SECONDS_PER_DAY is below u16::MAX so the cast is lossless
        DaysSinceDatasetStart {
            days: (self.seconds / SECONDS_PER_DAY) as u16,
        }
    }

    /// Number of seconds elapsed since the beginning of `self.date()`,
    /// always smaller than `SECONDS_PER_DAY`
    pub fn hour(&self) -> u32 {
        self.seconds % SECONDS_PER_DAY
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hour = self.hour();
        write!(
            f,
            "day {} {:02}:{:02}:{:02}",
            self.date().days,
            hour / 3600,
            hour / 60 % 60,
            hour % 60
        )
    }
}

impl DaysSinceDatasetStart {
    pub fn new(days: u16) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u16 {
        self.days
    }

    pub fn next_day(&self) -> Option<Self> {
        self.days.checked_add(1).map(|days| Self { days })
    }

    pub fn previous_day(&self) -> Option<Self> {
        self.days.checked_sub(1).map(|days| Self { days })
    }

    /// The day that is `nb_of_days` before `self`,
    /// or `None` if it falls before the dataset start.
    pub fn minus_days(&self, nb_of_days: u32) -> Option<Self> {
        let days = u32::from(self.days).checked_sub(nb_of_days)?;
        // days <= self.days so it fits in a u16
        Some(Self { days: days as u16 })
    }
}

impl SecondsSinceDayStart {
    pub fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }

    /// Position of this time in a single day, in `[0, SECONDS_PER_DAY)`
    pub fn hour(&self) -> u32 {
        self.seconds % SECONDS_PER_DAY
    }

    /// Number of midnights passed since the start of the service day
    pub fn day_shift(&self) -> u32 {
        self.seconds / SECONDS_PER_DAY
    }
}

impl Display for SecondsSinceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.seconds / 60 / 60,
            self.seconds / 60 % 60,
            self.seconds % 60
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    input: String,
}

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse `{}` as a time, expected format is HH:MM:SS",
            self.input
        )
    }
}

impl std::error::Error for TimeParseError {}

// parses HH:MM:SS where HH may be greater than 23
fn parse_hms(input: &str) -> Result<u32, TimeParseError> {
    let error = || TimeParseError {
        input: input.to_string(),
    };
    let mut parts = input.trim().split(':');
    let mut next_number = |max: Option<u32>| -> Result<u32, TimeParseError> {
        let number: u32 = parts
            .next()
            .ok_or_else(error)?
            .parse()
            .map_err(|_| error())?;
        match max {
            Some(max) if number >= max => Err(error()),
            _ => Ok(number),
        }
    };
    let hours = next_number(None)?;
    let minutes = next_number(Some(60))?;
    let seconds = next_number(Some(60))?;
    if parts.next().is_some() {
        return Err(error());
    }
    hours
        .checked_mul(3600)
        .and_then(|s| s.checked_add(minutes * 60 + seconds))
        .ok_or_else(error)
}

impl FromStr for SecondsSinceDayStart {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hms(s).map(|seconds| Self { seconds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_then_decompose() {
        let day = DaysSinceDatasetStart::new(3);
        let datetime = DateTime::combine(day, 29_100);
        assert_eq!(datetime.date(), day);
        assert_eq!(datetime.hour(), 29_100);
        assert_eq!(DateTime::combine(datetime.date(), datetime.hour()), datetime);
    }

    #[test]
    fn seconds_beyond_one_day_roll_into_next_day() {
        let day = DaysSinceDatasetStart::new(1);
        let datetime = DateTime::combine(day, SECONDS_PER_DAY + 600);
        assert_eq!(datetime.date(), DaysSinceDatasetStart::new(2));
        assert_eq!(datetime.hour(), 600);
    }

    #[test]
    fn ordering_is_chronological() {
        let late_on_day_0 = DateTime::combine(DaysSinceDatasetStart::new(0), 86_399);
        let early_on_day_1 = DateTime::combine(DaysSinceDatasetStart::new(1), 0);
        assert!(late_on_day_0 < early_on_day_1);
    }

    #[test]
    fn previous_day_of_first_day() {
        assert_eq!(DaysSinceDatasetStart::new(0).previous_day(), None);
        assert_eq!(DaysSinceDatasetStart::new(0).minus_days(1), None);
        assert_eq!(
            DaysSinceDatasetStart::new(5).minus_days(2),
            Some(DaysSinceDatasetStart::new(3))
        );
    }

    #[test]
    fn parse_times() {
        let time: SecondsSinceDayStart = "25:10:05".parse().unwrap();
        assert_eq!(time.total_seconds(), 25 * 3600 + 10 * 60 + 5);
        assert_eq!(time.day_shift(), 1);
        assert_eq!(time.hour(), 3600 + 600 + 5);
        assert_eq!(time.to_string(), "25:10:05");

        assert!("10:61:00".parse::<SecondsSinceDayStart>().is_err());
        assert!("10:00".parse::<SecondsSinceDayStart>().is_err());
        assert!("10:00:00:00".parse::<SecondsSinceDayStart>().is_err());
        assert!("aa:00:00".parse::<SecondsSinceDayStart>().is_err());
    }
}
