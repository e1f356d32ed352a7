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

pub mod init;
pub mod ordered_stop_times;

pub use init::{BuildError, FrequencyInput, StopTimeInput, TransitDataBuilder, TripInput};
pub use ordered_stop_times::OrderedStopTimes;

use std::collections::HashMap;

use crate::models::{
    FrequencyVehicleJourney, FrequencyVehicleJourneyIdx, Pattern, PatternIdx, PatternPoint,
    RealTimeLevel, StopTime, TripIdx, VehicleJourney, VehicleJourneyIdx,
};
use crate::time::{days_patterns::DaysPatterns, Calendar, DaysSinceDatasetStart};

/// Immutable snapshot of the transit network.
///
/// Built once by a `TransitDataBuilder`, then only read.
#[derive(Debug)]
pub struct TransitData {
    pub(crate) calendar: Calendar,
    pub(crate) days_patterns: DaysPatterns,

    pub(crate) patterns: Vec<Pattern>,
    pub(crate) vehicle_journeys: Vec<VehicleJourney>,
    pub(crate) frequency_vehicle_journeys: Vec<FrequencyVehicleJourney>,

    pub(crate) pattern_id_to_idx: HashMap<String, PatternIdx>,
    pub(crate) vehicle_journey_id_to_idx: HashMap<String, TripIdx>,

    pub(crate) ordered_stop_times: OrderedStopTimes,
}

impl TransitData {
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn days_patterns(&self) -> &DaysPatterns {
        &self.days_patterns
    }

    pub fn ordered_stop_times(&self) -> &OrderedStopTimes {
        &self.ordered_stop_times
    }

    pub fn nb_of_patterns(&self) -> usize {
        self.patterns.len()
    }

    pub fn nb_of_vehicle_journeys(&self) -> usize {
        self.vehicle_journeys.len()
    }

    pub fn nb_of_frequency_vehicle_journeys(&self) -> usize {
        self.frequency_vehicle_journeys.len()
    }

    pub fn pattern(&self, pattern: &PatternIdx) -> &Pattern {
        &self.patterns[pattern.idx]
    }

    pub fn pattern_idx(&self, pattern_id: &str) -> Option<PatternIdx> {
        self.pattern_id_to_idx.get(pattern_id).copied()
    }

    /// Returns `None` if `order` is not a position of the pattern `pattern_id`
    pub fn pattern_point(&self, pattern_id: &str, order: usize) -> Option<PatternPoint> {
        let pattern = self.pattern_idx(pattern_id)?;
        if order < self.pattern(&pattern).nb_of_stops() {
            Some(PatternPoint { pattern, order })
        } else {
            None
        }
    }

    pub fn trip_idx(&self, vehicle_journey_id: &str) -> Option<TripIdx> {
        self.vehicle_journey_id_to_idx.get(vehicle_journey_id).copied()
    }

    pub fn vehicle_journey(&self, vehicle_journey: &VehicleJourneyIdx) -> &VehicleJourney {
        &self.vehicle_journeys[vehicle_journey.idx]
    }

    pub fn frequency_vehicle_journey(
        &self,
        frequency_vehicle_journey: &FrequencyVehicleJourneyIdx,
    ) -> &FrequencyVehicleJourney {
        &self.frequency_vehicle_journeys[frequency_vehicle_journey.idx]
    }

    /// The discrete vehicle journey, or the journey template of a frequency one
    pub fn journey_of(&self, trip: &TripIdx) -> &VehicleJourney {
        match trip {
            TripIdx::Discrete(vj) => self.vehicle_journey(vj),
            TripIdx::Frequency(freq_vj) => &self.frequency_vehicle_journey(freq_vj).journey,
        }
    }

    /// Panics if the stop times of `vehicle_journey` do not match its pattern,
    /// which means the snapshot is corrupted.
    pub fn stop_time_at<'a>(&self, vehicle_journey: &'a VehicleJourney, order: usize) -> &'a StopTime {
        let stop_time = vehicle_journey.stop_times.get(order).unwrap_or_else(|| {
            panic!(
                "Vehicle journey {} has {} stop times, but stop time at order {} was requested",
                vehicle_journey.id,
                vehicle_journey.stop_times.len(),
                order
            )
        });
        assert_eq!(stop_time.order, order);
        stop_time
    }

    pub fn is_valid_day(
        &self,
        vehicle_journey: &VehicleJourney,
        day: &DaysSinceDatasetStart,
        real_time_level: &RealTimeLevel,
    ) -> bool {
        self.days_patterns
            .is_allowed(vehicle_journey.days_pattern(real_time_level), day)
    }

    /// Same as `is_valid_day`, a day before the dataset start is never valid
    pub(crate) fn is_valid_some_day(
        &self,
        vehicle_journey: &VehicleJourney,
        day: Option<DaysSinceDatasetStart>,
        real_time_level: &RealTimeLevel,
    ) -> bool {
        day.map_or(false, |day| {
            self.is_valid_day(vehicle_journey, &day, real_time_level)
        })
    }
}
