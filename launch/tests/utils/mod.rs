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

#![allow(dead_code)]
pub mod model_builder;

use anyhow::{format_err, Error};
use best_stop_time::{all_stop_times, best_stop_time, NaiveDateTime, TransitData};
use best_stop_time_launch::{config::RequestParams, datetime::DateTimeRepresent};
use model_builder::AsDateTime;

pub struct Config<'a> {
    pub request_params: RequestParams,

    pub datetime: NaiveDateTime,

    pub pattern: &'a str,

    pub order: usize,
}

impl<'a> Config<'a> {
    pub fn new(datetime: impl AsDateTime, pattern: &'a str, order: usize) -> Self {
        Self {
            request_params: RequestParams::default(),
            datetime: datetime.as_datetime(),
            pattern,
            order,
        }
    }

    pub fn arrival(mut self) -> Self {
        self.request_params.datetime_represent = DateTimeRepresent::Arrival;
        self
    }
}

/// The vehicle journey found and its datetime at the stop
#[derive(Debug, PartialEq, Eq)]
pub struct Found {
    pub vehicle_journey: String,
    pub datetime: NaiveDateTime,
}

impl Found {
    pub fn new(vehicle_journey: &str, datetime: impl AsDateTime) -> Self {
        Self {
            vehicle_journey: vehicle_journey.to_string(),
            datetime: datetime.as_datetime(),
        }
    }
}

pub fn solve(data: &TransitData, config: &Config) -> Result<Option<Found>, Error> {
    let calendar = data.calendar();
    let pattern_point = data
        .pattern_point(config.pattern, config.order)
        .ok_or_else(|| format_err!("no stop {} on pattern {}", config.order, config.pattern))?;
    let datetime = calendar
        .from_naive_datetime(&config.datetime)
        .ok_or_else(|| format_err!("{} is out of the data period", config.datetime))?;
    let request_params = &config.request_params;

    let found = best_stop_time(
        data,
        &pattern_point,
        &datetime,
        &request_params.accessibility(),
        request_params.clockwise(),
        &request_params.real_time_level,
        request_params.reconstructing_path,
    )
    .map(|(stop_time, datetime)| Found {
        vehicle_journey: data.journey_of(&stop_time.trip()).id().to_string(),
        datetime: calendar.to_naive_datetime(&datetime),
    });
    Ok(found)
}

/// Local times, as HH:MM:SS, and vehicle journeys of the calendar lookup
pub fn calendar_stop_times(
    data: &TransitData,
    pattern: &str,
    order: usize,
    calendar_id: &str,
    request_params: &RequestParams,
) -> Result<Vec<(String, String)>, Error> {
    let pattern_point = data
        .pattern_point(pattern, order)
        .ok_or_else(|| format_err!("no stop {} on pattern {}", order, pattern))?;
    let result = all_stop_times(
        data,
        &pattern_point,
        calendar_id,
        &request_params.accessibility(),
    )
    .into_iter()
    .map(|(local_time, stop_time)| {
        let vehicle_journey = data.journey_of(&stop_time.trip()).id().to_string();
        (local_time.to_string(), vehicle_journey)
    })
    .collect();
    Ok(result)
}
