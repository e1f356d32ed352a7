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

use std::collections::HashSet;

use crate::models::{Accessibility, FrequencyVehicleJourney, PatternPoint, StopTime, TripIdx};
use crate::time::{SecondsSinceDayStart, SECONDS_PER_DAY};
use crate::transit_data::TransitData;

/// All stop times at `pattern_point` of the vehicle journeys associated to `calendar_id`,
/// with their departure time in the local time of each vehicle journey.
///
/// Unlike `best_stop_time`, there is no precise date here, only a calendar.
/// For each meta vehicle journey, only its first vehicle journey is considered, since
/// all vehicle journeys of a meta vehicle journey share the same local times.
/// Frequency vehicle journeys are expanded into one entry per departure.
///
/// The result is sorted by increasing local time.
pub fn all_stop_times<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    calendar_id: &str,
    accessibility: &Accessibility,
) -> Vec<(SecondsSinceDayStart, &'data StopTime)> {
    let pattern = data.pattern(&pattern_point.pattern);
    let trips = pattern
        .vehicle_journeys()
        .iter()
        .map(|vj| TripIdx::Discrete(*vj))
        .chain(
            pattern
                .frequency_vehicle_journeys()
                .iter()
                .map(|freq_vj| TripIdx::Frequency(*freq_vj)),
        );

    let mut meta_vehicle_journeys: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();
    for trip in trips {
        let journey = data.journey_of(&trip);
        if !journey.is_associated_to(calendar_id) {
            continue;
        }
        if let Some(meta_vehicle_journey) = journey.meta_vehicle_journey() {
            if !meta_vehicle_journeys.insert(meta_vehicle_journey) {
                continue;
            }
        }
        if !journey.accessible(accessibility) {
            continue;
        }
        let stop_time = data.stop_time_at(journey, pattern_point.order);
        match trip {
            TripIdx::Discrete(_) => {
                let local_time = to_local(stop_time.departure_time.total_seconds(), journey.utc_offset());
                result.push((local_time, stop_time));
            }
            TripIdx::Frequency(freq_vj_idx) => {
                let freq_vj = data.frequency_vehicle_journey(&freq_vj_idx);
                for departure in departures(freq_vj, stop_time) {
                    let local_time = to_local(departure, journey.utc_offset());
                    result.push((local_time, stop_time));
                }
            }
        }
    }

    result.sort_by_key(|(local_time, _)| *local_time);
    result
}

// Note: end can be lower than start, so we have to cycle through the day
fn departures(
    freq_vj: &FrequencyVehicleJourney,
    stop_time: &StopTime,
) -> impl Iterator<Item = u32> {
    let offset = stop_time.departure_time.total_seconds();
    let first = freq_vj.start_time.total_seconds() + offset;
    let mut last = freq_vj.end_time.total_seconds() + offset;
    if last < first {
        last += SECONDS_PER_DAY;
    }
    let headway = freq_vj.headway_secs;
    (0..)
        .map(move |nb_of_headways: u32| first + nb_of_headways * headway)
        .take_while(move |departure| *departure <= last)
}

fn to_local(utc_seconds: u32, utc_offset: i32) -> SecondsSinceDayStart {
    let local = (i64::from(utc_seconds) + i64::from(utc_offset)).rem_euclid(i64::from(SECONDS_PER_DAY));
    // rem_euclid gives a value in [0, SECONDS_PER_DAY)
    SecondsSinceDayStart::from_seconds(local as u32)
}
