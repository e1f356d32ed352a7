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

use best_stop_time::{time::Calendar, DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeRepresent {
    Departure,
    Arrival,
}

impl Default for DateTimeRepresent {
    fn default() -> Self {
        DateTimeRepresent::Departure
    }
}

impl std::fmt::Display for DateTimeRepresent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateTimeRepresent::Departure => write!(f, "departure"),
            DateTimeRepresent::Arrival => write!(f, "arrival"),
        }
    }
}

impl std::str::FromStr for DateTimeRepresent {
    type Err = DateTimeRepresentConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let represent = match s {
            "departure" => DateTimeRepresent::Departure,
            "arrival" => DateTimeRepresent::Arrival,
            _ => {
                return Err(DateTimeRepresentConfigError {
                    datetime_represent_name: s.to_string(),
                })
            }
        };
        Ok(represent)
    }
}

/// Parses a utc datetime given as `20190628T163215`
pub fn parse_datetime(string_datetime: &str) -> Result<NaiveDateTime, BadDateTime> {
    NaiveDateTime::parse_from_str(string_datetime, "%Y%m%dT%H%M%S").map_err(|_| {
        BadDateTime::Unparsable {
            string_datetime: string_datetime.to_string(),
        }
    })
}

/// Parses `string_datetime` and places it in `calendar`
pub fn parse_datetime_in(
    calendar: &Calendar,
    string_datetime: &str,
) -> Result<DateTime, BadDateTime> {
    let naive_datetime = parse_datetime(string_datetime)?;
    calendar
        .from_naive_datetime(&naive_datetime)
        .ok_or_else(|| BadDateTime::OutOfCalendar {
            datetime: naive_datetime,
            first_date: calendar.first_date().to_string(),
            last_date: calendar.last_date().to_string(),
        })
}

#[derive(Debug)]
pub enum BadDateTime {
    Unparsable {
        string_datetime: String,
    },
    OutOfCalendar {
        datetime: NaiveDateTime,
        first_date: String,
        last_date: String,
    },
}

impl std::error::Error for BadDateTime {}

impl std::fmt::Display for BadDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BadDateTime::Unparsable { string_datetime } => write!(
                f,
                "Unable to parse {} as a datetime. Expected format is 20190628T163215",
                string_datetime
            ),
            BadDateTime::OutOfCalendar {
                datetime,
                first_date,
                last_date,
            } => write!(
                f,
                "The datetime {} is out of the data period [{}, {}]",
                datetime, first_date, last_date
            ),
        }
    }
}

#[derive(Debug)]
pub struct DateTimeRepresentConfigError {
    datetime_represent_name: String,
}

impl std::error::Error for DateTimeRepresentConfigError {}

impl std::fmt::Display for DateTimeRepresentConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bad datetime_represent : `{}`",
            self.datetime_represent_name
        )
    }
}
