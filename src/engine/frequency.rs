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

use crate::models::{FrequencyVehicleJourney, RealTimeLevel, StopTime};
use crate::time::{DateTime, DaysSinceDatasetStart, SecondsSinceDayStart, SECONDS_PER_DAY};
use crate::transit_data::TransitData;

// The virtual departures of a frequency vehicle journey at one stop,
// folded on a single day.
//
// In normal case we have something like:
// 0-------------------------------------86400(midnight)
//     lower-------higher
//
// When the service runs after midnight, higher < lower and we have:
// 0-------------------------------------86400(midnight)
//  -------higher               lower--------
// where [0, higher] belongs to the window opened the day before.
struct Window {
    lower: u32,
    higher: u32,
    headway: u32,
    // number of midnights between the start of the service day and `lower`
    day_shift: u32,
}

impl Window {
    fn new(freq_vj: &FrequencyVehicleJourney, offset: SecondsSinceDayStart) -> Self {
        let first = freq_vj.start_time.total_seconds() + offset.total_seconds();
        let last = freq_vj.end_time.total_seconds() + offset.total_seconds();
        Self {
            lower: first % SECONDS_PER_DAY,
            higher: last % SECONDS_PER_DAY,
            headway: freq_vj.headway_secs,
            day_shift: first / SECONDS_PER_DAY,
        }
    }

    fn is_overnight(&self) -> bool {
        self.lower > self.higher
    }

    // first virtual time at or after `lower + elapsed`, as seconds since `lower`'s day start
    fn next_after(&self, elapsed: u32) -> u32 {
        let nb_of_headways = (elapsed + self.headway - 1) / self.headway;
        self.lower + nb_of_headways * self.headway
    }

    // last virtual time at or before `lower + elapsed`
    fn previous_before(&self, elapsed: u32) -> u32 {
        self.lower + (elapsed / self.headway) * self.headway
    }

    // is the window that opens on calendar day `day` in service ?
    fn opens_on(
        &self,
        data: &TransitData,
        freq_vj: &FrequencyVehicleJourney,
        day: DaysSinceDatasetStart,
        real_time_level: &RealTimeLevel,
    ) -> bool {
        data.is_valid_some_day(&freq_vj.journey, day.minus_days(self.day_shift), real_time_level)
    }
}

/// Next departure of `freq_vj` at the stop of `stop_time` at or after `datetime`.
///
/// Only the window opening on the day of `datetime`, and the one
/// opened the day before when it runs through midnight, are considered.
/// Returns `None` if no departure is found there.
pub fn next_departure(
    data: &TransitData,
    datetime: &DateTime,
    freq_vj: &FrequencyVehicleJourney,
    stop_time: &StopTime,
    real_time_level: &RealTimeLevel,
) -> Option<DateTime> {
    let window = Window::new(freq_vj, stop_time.departure_time);
    let hour = datetime.hour();
    let date = datetime.date();
    let opens_on = |day| window.opens_on(data, freq_vj, day, real_time_level);

    if !window.is_overnight() {
        if hour <= window.lower {
            return opens_on(date).then(|| DateTime::combine(date, window.lower));
        }
        if hour > window.higher || !opens_on(date) {
            return None;
        }
        let next = window.next_after(hour - window.lower);
        // when the headway does not divide the window, the last step may overshoot `higher`
        return (next <= window.higher).then(|| DateTime::combine(date, next));
    }

    if hour >= window.lower {
        if !opens_on(date) {
            return None;
        }
        let next = window.next_after(hour - window.lower);
        return (next <= window.higher + SECONDS_PER_DAY).then(|| DateTime::combine(date, next));
    }

    if hour <= window.higher {
        // we may still catch the window opened yesterday
        if let Some(yesterday) = date.previous_day().filter(|day| opens_on(*day)) {
            // counted from yesterday's `lower`, `higher - hour` would step backward in time
            let next = window.next_after(hour + SECONDS_PER_DAY - window.lower);
            if next <= window.higher + SECONDS_PER_DAY {
                return Some(DateTime::combine(yesterday, next));
            }
        }
    }

    // the tail of yesterday is over or was not in service,
    // the first departure of tonight needs today's validity as much as the dead zone does
    opens_on(date).then(|| DateTime::combine(date, window.lower))
}

/// Latest arrival of `freq_vj` at the stop of `stop_time` at or before `datetime`.
///
/// Mirror of `next_departure`, using the arrival offset of `stop_time`.
pub fn previous_arrival(
    data: &TransitData,
    datetime: &DateTime,
    freq_vj: &FrequencyVehicleJourney,
    stop_time: &StopTime,
    real_time_level: &RealTimeLevel,
) -> Option<DateTime> {
    let window = Window::new(freq_vj, stop_time.arrival_time);
    let hour = datetime.hour();
    let date = datetime.date();
    let opens_on = |day| window.opens_on(data, freq_vj, day, real_time_level);

    if !window.is_overnight() {
        if hour < window.lower || !opens_on(date) {
            return None;
        }
        let upto = hour.min(window.higher);
        let previous = window.previous_before(upto - window.lower);
        return Some(DateTime::combine(date, previous));
    }

    if hour >= window.lower && opens_on(date) {
        let previous = window.previous_before(hour - window.lower);
        return Some(DateTime::combine(date, previous));
    }

    // the window opened yesterday, which closed at `higher` this morning
    let yesterday = date.previous_day().filter(|day| opens_on(*day))?;
    let upto = hour.min(window.higher);
    let previous = window.previous_before(upto + SECONDS_PER_DAY - window.lower);
    Some(DateTime::combine(yesterday, previous))
}
