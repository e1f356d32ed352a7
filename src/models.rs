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

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::time::{days_patterns::DaysPattern, SecondsSinceDayStart};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternIdx {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleJourneyIdx {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrequencyVehicleJourneyIdx {
    pub(crate) idx: usize,
}

/// The trip a stop time belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripIdx {
    Discrete(VehicleJourneyIdx),
    Frequency(FrequencyVehicleJourneyIdx),
}

/// A position on a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternPoint {
    pub pattern: PatternIdx,
    pub order: usize,
}

/// A sequence of stops shared by several vehicle journeys
#[derive(Debug)]
pub struct Pattern {
    pub(crate) id: String,
    pub(crate) stop_points: Vec<String>,
    pub(crate) vehicle_journeys: Vec<VehicleJourneyIdx>,
    pub(crate) frequency_vehicle_journeys: Vec<FrequencyVehicleJourneyIdx>,
}

#[derive(Debug, Clone)]
pub struct StopTime {
    pub(crate) order: usize,
    /// for a frequency vehicle journey, this is an offset
    /// from the start of the vehicle journey
    pub(crate) arrival_time: SecondsSinceDayStart,
    /// for a frequency vehicle journey, this is an offset
    /// from the start of the vehicle journey
    pub(crate) departure_time: SecondsSinceDayStart,
    pub(crate) pick_up_allowed: bool,
    pub(crate) drop_off_allowed: bool,
    pub(crate) trip: TripIdx,
}

/// A vehicle running at fixed times on every day of its validity pattern
#[derive(Debug)]
pub struct VehicleJourney {
    pub(crate) id: String,
    pub(crate) pattern: PatternIdx,
    pub(crate) stop_times: Vec<StopTime>,
    pub(crate) validity: DaysPattern,
    /// used instead of `validity` when disruptions are taken into account
    pub(crate) adapted_validity: Option<DaysPattern>,
    pub(crate) accessibility: Accessibility,
    /// local time = utc time + utc_offset
    pub(crate) utc_offset: i32,
    pub(crate) meta_vehicle_journey: Option<String>,
    pub(crate) associated_calendars: BTreeSet<String>,
}

/// A vehicle departing every `headway_secs` between `start_time` and `end_time`.
///
/// The stop times of `journey` hold offsets from the start of each departure.
/// `end_time` may be smaller than `start_time` modulo one day
/// when the service runs through midnight.
#[derive(Debug)]
pub struct FrequencyVehicleJourney {
    pub(crate) journey: VehicleJourney,
    pub(crate) start_time: SecondsSinceDayStart,
    pub(crate) end_time: SecondsSinceDayStart,
    pub(crate) headway_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealTimeLevel {
    Base,
    RealTime,
}

/// Properties a vehicle must offer to be used by a traveler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Accessibility {
    bits: u8,
}

impl Pattern {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stop_points.len()
    }

    pub fn stop_point(&self, order: usize) -> &str {
        &self.stop_points[order]
    }

    pub fn vehicle_journeys(&self) -> &[VehicleJourneyIdx] {
        &self.vehicle_journeys
    }

    pub fn frequency_vehicle_journeys(&self) -> &[FrequencyVehicleJourneyIdx] {
        &self.frequency_vehicle_journeys
    }
}

impl StopTime {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn arrival_time(&self) -> SecondsSinceDayStart {
        self.arrival_time
    }

    pub fn departure_time(&self) -> SecondsSinceDayStart {
        self.departure_time
    }

    pub fn trip(&self) -> TripIdx {
        self.trip
    }

    pub fn pick_up_allowed(&self) -> bool {
        self.pick_up_allowed
    }

    pub fn drop_off_allowed(&self) -> bool {
        self.drop_off_allowed
    }

    /// Can a traveler board the vehicle here ?
    /// When a path is reconstructed from its destination, the
    /// roles of boarding and alighting are swapped.
    pub fn can_board(&self, reconstructing_path: bool) -> bool {
        if reconstructing_path {
            self.drop_off_allowed
        } else {
            self.pick_up_allowed
        }
    }

    pub fn can_debark(&self, reconstructing_path: bool) -> bool {
        self.can_board(!reconstructing_path)
    }

    pub fn is_frequency(&self) -> bool {
        matches!(self.trip, TripIdx::Frequency(_))
    }
}

impl VehicleJourney {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> PatternIdx {
        self.pattern
    }

    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    pub fn utc_offset(&self) -> i32 {
        self.utc_offset
    }

    pub fn meta_vehicle_journey(&self) -> Option<&str> {
        self.meta_vehicle_journey.as_deref()
    }

    pub fn is_associated_to(&self, calendar_id: &str) -> bool {
        self.associated_calendars.contains(calendar_id)
    }

    pub fn accessible(&self, required: &Accessibility) -> bool {
        self.accessibility.contains(required)
    }

    pub fn days_pattern(&self, real_time_level: &RealTimeLevel) -> &DaysPattern {
        match (real_time_level, &self.adapted_validity) {
            (RealTimeLevel::RealTime, Some(adapted)) => adapted,
            _ => &self.validity,
        }
    }
}

impl FrequencyVehicleJourney {
    pub fn journey(&self) -> &VehicleJourney {
        &self.journey
    }

    pub fn start_time(&self) -> SecondsSinceDayStart {
        self.start_time
    }

    pub fn end_time(&self) -> SecondsSinceDayStart {
        self.end_time
    }

    pub fn headway_secs(&self) -> u32 {
        self.headway_secs
    }
}

impl Accessibility {
    pub const WHEELCHAIR: Accessibility = Accessibility { bits: 1 };
    pub const BIKE: Accessibility = Accessibility { bits: 1 << 1 };
    pub const AIR_CONDITIONED: Accessibility = Accessibility { bits: 1 << 2 };
    pub const VISUAL_ANNOUNCEMENT: Accessibility = Accessibility { bits: 1 << 3 };
    pub const AUDIBLE_ANNOUNCEMENT: Accessibility = Accessibility { bits: 1 << 4 };
    pub const APPROPRIATE_ESCORT: Accessibility = Accessibility { bits: 1 << 5 };
    pub const APPROPRIATE_SIGNAGE: Accessibility = Accessibility { bits: 1 << 6 };
    pub const SCHOOL_VEHICLE: Accessibility = Accessibility { bits: 1 << 7 };

    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// true if every property of `other` is also in `self`
    pub fn contains(&self, other: &Accessibility) -> bool {
        self.bits & other.bits == other.bits
    }

    pub fn insert(&mut self, other: Accessibility) {
        self.bits |= other.bits;
    }
}

impl std::ops::BitOr for Accessibility {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl std::str::FromStr for RealTimeLevel {
    type Err = RealTimeLevelConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(RealTimeLevel::Base),
            "real_time" => Ok(RealTimeLevel::RealTime),
            _ => Err(RealTimeLevelConfigError {
                real_time_level_name: s.to_string(),
            }),
        }
    }
}

impl Display for RealTimeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RealTimeLevel::Base => write!(f, "base"),
            RealTimeLevel::RealTime => write!(f, "real_time"),
        }
    }
}

#[derive(Debug)]
pub struct RealTimeLevelConfigError {
    real_time_level_name: String,
}

impl Display for RealTimeLevelConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bad real time level given : `{}`",
            self.real_time_level_name
        )
    }
}

impl std::error::Error for RealTimeLevelConfigError {}
