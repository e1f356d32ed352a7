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

use super::discrete::{next_valid_discrete_drop_off, next_valid_discrete_pick_up};
use super::frequency::{next_departure, previous_arrival};
use crate::models::{Accessibility, PatternPoint, RealTimeLevel, StopTime};
use crate::time::{DateTime, SECONDS_PER_DAY};
use crate::transit_data::TransitData;

/// The best stop time to use at `pattern_point` around `datetime`.
///
/// When `clockwise` is true, returns the earliest stop time at which one can board
/// at or after `datetime`, otherwise the latest one at which one can debark
/// at or before `datetime`. The stop time is returned along with the time of the
/// departure (resp. arrival).
///
/// Returns `None` when no vehicle of the pattern can be used, neither on the
/// day of `datetime` nor on the day after (resp. before).
///
/// Panics if `pattern_point` does not belong to `data`.
pub fn best_stop_time<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    datetime: &DateTime,
    accessibility: &Accessibility,
    clockwise: bool,
    real_time_level: &RealTimeLevel,
    reconstructing_path: bool,
) -> Option<(&'data StopTime, DateTime)> {
    if clockwise {
        earliest_stop_time(
            data,
            pattern_point,
            datetime,
            real_time_level,
            reconstructing_path,
            accessibility,
        )
    } else {
        tardiest_stop_time(
            data,
            pattern_point,
            datetime,
            real_time_level,
            reconstructing_path,
            accessibility,
        )
    }
}

pub fn earliest_stop_time<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    datetime: &DateTime,
    real_time_level: &RealTimeLevel,
    reconstructing_path: bool,
    accessibility: &Accessibility,
) -> Option<(&'data StopTime, DateTime)> {
    check_pattern_point(data, pattern_point);
    valid_pick_up(
        data,
        pattern_point,
        datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    )
}

pub fn tardiest_stop_time<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    datetime: &DateTime,
    real_time_level: &RealTimeLevel,
    reconstructing_path: bool,
    accessibility: &Accessibility,
) -> Option<(&'data StopTime, DateTime)> {
    check_pattern_point(data, pattern_point);
    valid_drop_off(
        data,
        pattern_point,
        datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    )
}

fn check_pattern_point(data: &TransitData, pattern_point: &PatternPoint) {
    let pattern = data.pattern(&pattern_point.pattern);
    assert!(
        pattern_point.order < pattern.nb_of_stops(),
        "Pattern {} has {} stops, but order {} was requested",
        pattern.id(),
        pattern.nb_of_stops(),
        pattern_point.order
    );
}

// We look for the first valid stop time on the day of `datetime`, at or after its hour.
//
// 2 lookups are done,
//  one on the ordered departures of the discrete vehicle journeys,
//  and one on each frequency vehicle journey of the pattern.
//
// If nothing is found on that day, we look again from the start of the next day.
fn valid_pick_up<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    datetime: &DateTime,
    reconstructing_path: bool,
    accessibility: &Accessibility,
    real_time_level: &RealTimeLevel,
) -> Option<(&'data StopTime, DateTime)> {
    let ordered_stop_times = data.ordered_stop_times();
    let range = ordered_stop_times.range(pattern_point);
    let first_idx = ordered_stop_times.first_departure_at_or_after(pattern_point, datetime.hour());

    let first_discrete = next_valid_discrete_pick_up(
        data,
        pattern_point,
        first_idx..range.end,
        datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    let first_frequency = next_valid_frequency_pick_up(
        data,
        pattern_point,
        datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    let today = earliest_of(first_discrete, first_frequency);
    // a frequency departure of the evening can fall after midnight,
    // the next day may then have an earlier one
    if let Some(best) = today.filter(|(_, best)| best.date() == datetime.date()) {
        return Some(best);
    }

    let next_day = match datetime.date().next_day() {
        Some(next_day) => next_day,
        None => return today,
    };
    let working_datetime = DateTime::combine(next_day, 0);
    let tomorrow_discrete = next_valid_discrete_pick_up(
        data,
        pattern_point,
        range,
        &working_datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    let tomorrow_frequency = next_valid_frequency_pick_up(
        data,
        pattern_point,
        &working_datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    // a candidate of today dated tomorrow is always a frequency one
    earliest_of(tomorrow_discrete, earliest_of(today, tomorrow_frequency))
}

// Mirror of `valid_pick_up` : the latest valid stop time on the day of `datetime`,
// at or before its hour, and then on the day before.
fn valid_drop_off<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    datetime: &DateTime,
    reconstructing_path: bool,
    accessibility: &Accessibility,
    real_time_level: &RealTimeLevel,
) -> Option<(&'data StopTime, DateTime)> {
    let ordered_stop_times = data.ordered_stop_times();
    let range = ordered_stop_times.range(pattern_point);
    let first_idx = ordered_stop_times.first_arrival_at_or_before(pattern_point, datetime.hour());

    let last_discrete = next_valid_discrete_drop_off(
        data,
        pattern_point,
        first_idx..range.end,
        datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    let last_frequency = previous_valid_frequency_drop_off(
        data,
        pattern_point,
        datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    let today = tardiest_of(last_discrete, last_frequency);
    // the last arrival of the window opened yesterday can be before midnight
    if let Some(best) = today.filter(|(_, best)| best.date() == datetime.date()) {
        return Some(best);
    }

    let previous_day = match datetime.date().previous_day() {
        Some(previous_day) => previous_day,
        None => return today,
    };
    let working_datetime = DateTime::combine(previous_day, SECONDS_PER_DAY - 1);
    let yesterday_discrete = next_valid_discrete_drop_off(
        data,
        pattern_point,
        range,
        &working_datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    let yesterday_frequency = previous_valid_frequency_drop_off(
        data,
        pattern_point,
        &working_datetime,
        reconstructing_path,
        accessibility,
        real_time_level,
    );
    tardiest_of(yesterday_discrete, tardiest_of(today, yesterday_frequency))
}

// to find the next frequency vehicle journey, we loop through all of them
// and compute the datetime at the pattern point for each one
fn next_valid_frequency_pick_up<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    datetime: &DateTime,
    reconstructing_path: bool,
    accessibility: &Accessibility,
    real_time_level: &RealTimeLevel,
) -> Option<(&'data StopTime, DateTime)> {
    let pattern = data.pattern(&pattern_point.pattern);
    let mut best: Option<(&'data StopTime, DateTime)> = None;
    for freq_vj_idx in pattern.frequency_vehicle_journeys() {
        let freq_vj = data.frequency_vehicle_journey(freq_vj_idx);
        let stop_time = data.stop_time_at(freq_vj.journey(), pattern_point.order);
        if !stop_time.can_board(reconstructing_path) || !freq_vj.journey().accessible(accessibility)
        {
            continue;
        }
        let has_departure = next_departure(data, datetime, freq_vj, stop_time, real_time_level);
        if let Some(departure) = has_departure {
            if best.map_or(true, |(_, best_departure)| departure < best_departure) {
                best = Some((stop_time, departure));
            }
        }
    }
    best
}

fn previous_valid_frequency_drop_off<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    datetime: &DateTime,
    reconstructing_path: bool,
    accessibility: &Accessibility,
    real_time_level: &RealTimeLevel,
) -> Option<(&'data StopTime, DateTime)> {
    let pattern = data.pattern(&pattern_point.pattern);
    let mut best: Option<(&'data StopTime, DateTime)> = None;
    for freq_vj_idx in pattern.frequency_vehicle_journeys() {
        let freq_vj = data.frequency_vehicle_journey(freq_vj_idx);
        let stop_time = data.stop_time_at(freq_vj.journey(), pattern_point.order);
        if !stop_time.can_debark(reconstructing_path)
            || !freq_vj.journey().accessible(accessibility)
        {
            continue;
        }
        let has_arrival = previous_arrival(data, datetime, freq_vj, stop_time, real_time_level);
        if let Some(arrival) = has_arrival {
            if best.map_or(true, |(_, best_arrival)| arrival > best_arrival) {
                best = Some((stop_time, arrival));
            }
        }
    }
    best
}

// on equal datetimes, the discrete stop time wins
fn earliest_of<'data>(
    discrete: Option<(&'data StopTime, DateTime)>,
    frequency: Option<(&'data StopTime, DateTime)>,
) -> Option<(&'data StopTime, DateTime)> {
    match (discrete, frequency) {
        (Some(discrete), Some(frequency)) => {
            if discrete.1 <= frequency.1 {
                Some(discrete)
            } else {
                Some(frequency)
            }
        }
        (discrete, None) => discrete,
        (None, frequency) => frequency,
    }
}

fn tardiest_of<'data>(
    discrete: Option<(&'data StopTime, DateTime)>,
    frequency: Option<(&'data StopTime, DateTime)>,
) -> Option<(&'data StopTime, DateTime)> {
    match (discrete, frequency) {
        (Some(discrete), Some(frequency)) => {
            if discrete.1 >= frequency.1 {
                Some(discrete)
            } else {
                Some(frequency)
            }
        }
        (discrete, None) => discrete,
        (None, frequency) => frequency,
    }
}
