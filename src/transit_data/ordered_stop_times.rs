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

use std::ops::Range;

use crate::models::{Pattern, PatternPoint, VehicleJourney, VehicleJourneyIdx};

/// Stop times of the discrete vehicle journeys, sorted for each pattern point.
///
/// For a pattern with `nb_trips[pattern]` vehicle journeys, the stop times at
/// `order` occupy the range
///    `first_stop_time[pattern] + order * nb_trips[pattern]`
///     .. `first_stop_time[pattern] + (order + 1) * nb_trips[pattern]`
/// of every vector below, so that ranges of distinct pattern points never overlap.
#[derive(Debug)]
pub struct OrderedStopTimes {
    /// in each range, `departure_times[idx]` is the departure time (modulo one day)
    /// of the vehicle journey `st_forward[idx]`, sorted by increasing time
    departure_times: Vec<u32>,
    st_forward: Vec<VehicleJourneyIdx>,

    /// in each range, `arrival_times[idx]` is the arrival time (modulo one day)
    /// of the vehicle journey `st_backward[idx]`, sorted by decreasing time
    arrival_times: Vec<u32>,
    st_backward: Vec<VehicleJourneyIdx>,

    first_stop_time: Vec<usize>,
    nb_trips: Vec<usize>,
}

impl OrderedStopTimes {
    pub(crate) fn new(patterns: &[Pattern], vehicle_journeys: &[VehicleJourney]) -> Self {
        let nb_of_stop_times: usize = patterns
            .iter()
            .map(|pattern| pattern.vehicle_journeys.len() * pattern.nb_of_stops())
            .sum();

        let mut result = Self {
            departure_times: Vec::with_capacity(nb_of_stop_times),
            st_forward: Vec::with_capacity(nb_of_stop_times),
            arrival_times: Vec::with_capacity(nb_of_stop_times),
            st_backward: Vec::with_capacity(nb_of_stop_times),
            first_stop_time: Vec::with_capacity(patterns.len()),
            nb_trips: Vec::with_capacity(patterns.len()),
        };

        let mut buffer: Vec<(u32, VehicleJourneyIdx)> = Vec::new();
        for pattern in patterns {
            result.first_stop_time.push(result.departure_times.len());
            result.nb_trips.push(pattern.vehicle_journeys.len());

            for order in 0..pattern.nb_of_stops() {
                // (departure, arrival) of the vehicle journey at `order`, modulo one day
                let times_of = |vj_idx: &VehicleJourneyIdx| -> (u32, u32) {
                    let vehicle_journey = &vehicle_journeys[vj_idx.idx];
                    assert_eq!(vehicle_journey.stop_times.len(), pattern.nb_of_stops());
                    let stop_time = &vehicle_journey.stop_times[order];
                    (
                        stop_time.departure_time.hour(),
                        stop_time.arrival_time.hour(),
                    )
                };

                buffer.clear();
                buffer.extend(pattern.vehicle_journeys.iter().map(|vj_idx| {
                    let (time, _) = times_of(vj_idx);
                    (time, *vj_idx)
                }));
                // stable sort, so vehicle journeys with the same time
                // keep their insertion order
                buffer.sort_by_key(|(time, _)| *time);
                result
                    .departure_times
                    .extend(buffer.iter().map(|(time, _)| *time));
                result.st_forward.extend(buffer.iter().map(|(_, vj)| *vj));

                buffer.clear();
                buffer.extend(pattern.vehicle_journeys.iter().map(|vj_idx| {
                    let (_, time) = times_of(vj_idx);
                    (time, *vj_idx)
                }));
                buffer.sort_by(|(lhs, _), (rhs, _)| rhs.cmp(lhs));
                result
                    .arrival_times
                    .extend(buffer.iter().map(|(time, _)| *time));
                result.st_backward.extend(buffer.iter().map(|(_, vj)| *vj));
            }
        }

        debug_assert_eq!(result.departure_times.len(), nb_of_stop_times);
        result
    }

    pub fn nb_of_stop_times(&self) -> usize {
        self.departure_times.len()
    }

    /// Range of indices of the stop times at `pattern_point`,
    /// valid both for the forward and the backward vectors
    pub fn range(&self, pattern_point: &PatternPoint) -> Range<usize> {
        let pattern_idx = pattern_point.pattern.idx;
        let nb_trips = self.nb_trips[pattern_idx];
        let begin = self.first_stop_time[pattern_idx] + pattern_point.order * nb_trips;
        begin..begin + nb_trips
    }

    /// Index of the first stop time at `pattern_point` that departs at or after `hour`.
    /// Equals `self.range(pattern_point).end` if there is none.
    pub fn first_departure_at_or_after(&self, pattern_point: &PatternPoint, hour: u32) -> usize {
        let range = self.range(pattern_point);
        let slice = &self.departure_times[range.clone()];
        range.start + slice.partition_point(|departure_time| *departure_time < hour)
    }

    /// Index of the first stop time at `pattern_point` in the backward order
    /// that arrives at or before `hour`.
    /// Equals `self.range(pattern_point).end` if there is none.
    pub fn first_arrival_at_or_before(&self, pattern_point: &PatternPoint, hour: u32) -> usize {
        let range = self.range(pattern_point);
        let slice = &self.arrival_times[range.clone()];
        range.start + slice.partition_point(|arrival_time| *arrival_time > hour)
    }

    pub fn forward_vehicle_journey(&self, idx: usize) -> &VehicleJourneyIdx {
        &self.st_forward[idx]
    }

    pub fn backward_vehicle_journey(&self, idx: usize) -> &VehicleJourneyIdx {
        &self.st_backward[idx]
    }

    pub fn departure_time(&self, idx: usize) -> u32 {
        self.departure_times[idx]
    }

    pub fn arrival_time(&self, idx: usize) -> u32 {
        self.arrival_times[idx]
    }
}
