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

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{OrderedStopTimes, TransitData};
use crate::models::{
    Accessibility, FrequencyVehicleJourney, FrequencyVehicleJourneyIdx, Pattern, PatternIdx,
    StopTime, TripIdx, VehicleJourney, VehicleJourneyIdx,
};
use crate::time::{
    calendar::CalendarError,
    days_patterns::{DaysPattern, DaysPatterns},
    Calendar, SecondsSinceDayStart, SECONDS_PER_DAY,
};

/// Description of a vehicle journey, as provided by the data import.
#[derive(Debug, Clone)]
pub struct TripInput {
    pub id: String,
    pub pattern: String,
    /// id of the calendar giving the days on which the vehicle runs
    pub calendar: String,
    /// id of the calendar to use instead of `calendar` when disruptions are active
    pub adapted_calendar: Option<String>,
    pub accessibility: Accessibility,
    pub utc_offset: i32,
    pub meta_vehicle_journey: Option<String>,
    /// one per stop of the pattern
    pub stop_times: Vec<StopTimeInput>,
}

#[derive(Debug, Clone)]
pub struct StopTimeInput {
    pub arrival_time: SecondsSinceDayStart,
    pub departure_time: SecondsSinceDayStart,
    pub pick_up_allowed: bool,
    pub drop_off_allowed: bool,
}

#[derive(Debug, Clone)]
pub struct FrequencyInput {
    pub start_time: SecondsSinceDayStart,
    pub end_time: SecondsSinceDayStart,
    pub headway_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    Calendar(CalendarError),
    DuplicatedCalendar(String),
    DuplicatedPattern(String),
    DuplicatedVehicleJourney(String),
    EmptyPattern(String),
    UnknownPattern {
        vehicle_journey: String,
        pattern: String,
    },
    UnknownCalendar(String),
    UnknownVehicleJourney(String),
    NbOfStopTimes {
        vehicle_journey: String,
        expected: usize,
        actual: usize,
    },
    ArrivalAfterDeparture {
        vehicle_journey: String,
        order: usize,
    },
    DecreasingTimes {
        vehicle_journey: String,
        upstream: usize,
        downstream: usize,
    },
    InvalidHeadway {
        vehicle_journey: String,
        headway_secs: u32,
    },
    NoValidDates(String),
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use BuildError::*;
        match self {
            Calendar(err) => write!(f, "Invalid dataset period : {}", err),
            DuplicatedCalendar(id) => write!(f, "Calendar {} is defined twice", id),
            DuplicatedPattern(id) => write!(f, "Pattern {} is defined twice", id),
            DuplicatedVehicleJourney(id) => write!(f, "Vehicle journey {} is defined twice", id),
            EmptyPattern(id) => write!(f, "Pattern {} has no stop point", id),
            UnknownPattern {
                vehicle_journey,
                pattern,
            } => write!(
                f,
                "Vehicle journey {} references an unknown pattern {}",
                vehicle_journey, pattern
            ),
            UnknownCalendar(id) => write!(f, "Unknown calendar {}", id),
            UnknownVehicleJourney(id) => write!(f, "Unknown vehicle journey {}", id),
            NbOfStopTimes {
                vehicle_journey,
                expected,
                actual,
            } => write!(
                f,
                "Vehicle journey {} has {} stop times while its pattern has {} stops",
                vehicle_journey, actual, expected
            ),
            ArrivalAfterDeparture {
                vehicle_journey,
                order,
            } => write!(
                f,
                "Vehicle journey {} arrives after it departs at order {}",
                vehicle_journey, order
            ),
            DecreasingTimes {
                vehicle_journey,
                upstream,
                downstream,
            } => write!(
                f,
                "Vehicle journey {} departs at order {} after it arrives at order {}",
                vehicle_journey, upstream, downstream
            ),
            InvalidHeadway {
                vehicle_journey,
                headway_secs,
            } => write!(
                f,
                "Frequency vehicle journey {} has a headway of {} seconds, \
                 expected a value between 1 second and one day",
                vehicle_journey, headway_secs
            ),
            NoValidDates(id) => write!(
                f,
                "Vehicle journey {} does not run on any day of the dataset",
                id
            ),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<CalendarError> for BuildError {
    fn from(err: CalendarError) -> Self {
        BuildError::Calendar(err)
    }
}

impl TripInput {
    pub fn new(id: &str, pattern: &str, calendar: &str) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
            calendar: calendar.to_string(),
            adapted_calendar: None,
            accessibility: Accessibility::empty(),
            utc_offset: 0,
            meta_vehicle_journey: None,
            stop_times: Vec::new(),
        }
    }
}

impl StopTimeInput {
    pub fn new(arrival_time: SecondsSinceDayStart, departure_time: SecondsSinceDayStart) -> Self {
        Self {
            arrival_time,
            departure_time,
            pick_up_allowed: true,
            drop_off_allowed: true,
        }
    }
}

/// Validates the imported objects and builds the sorted stop times
/// needed to answer queries on a `TransitData`.
pub struct TransitDataBuilder {
    calendar: Calendar,
    days_patterns: DaysPatterns,
    calendars: HashMap<String, DaysPattern>,

    patterns: Vec<Pattern>,
    pattern_id_to_idx: HashMap<String, PatternIdx>,

    vehicle_journeys: Vec<VehicleJourney>,
    frequency_vehicle_journeys: Vec<FrequencyVehicleJourney>,
    vehicle_journey_id_to_idx: HashMap<String, TripIdx>,
}

impl TransitDataBuilder {
    pub fn new(first_date: NaiveDate, last_date: NaiveDate) -> Result<Self, BuildError> {
        let calendar = Calendar::new(first_date, last_date)?;
        let days_patterns = DaysPatterns::new(calendar.nb_of_days().into());
        Ok(Self {
            calendar,
            days_patterns,
            calendars: HashMap::new(),
            patterns: Vec::new(),
            pattern_id_to_idx: HashMap::new(),
            vehicle_journeys: Vec::new(),
            frequency_vehicle_journeys: Vec::new(),
            vehicle_journey_id_to_idx: HashMap::new(),
        })
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Dates outside of the dataset period are ignored
    pub fn add_calendar<'a, Dates>(&mut self, id: &str, dates: Dates) -> Result<(), BuildError>
    where
        Dates: IntoIterator<Item = &'a NaiveDate>,
    {
        if self.calendars.contains_key(id) {
            return Err(BuildError::DuplicatedCalendar(id.to_string()));
        }
        let mut days = Vec::new();
        let mut nb_ignored = 0;
        for date in dates {
            match self.calendar.date_to_days_since_start(date) {
                Some(day) => days.push(day),
                None => nb_ignored += 1,
            }
        }
        if nb_ignored > 0 {
            debug!(
                "{} dates of calendar {} are out of the dataset period and are ignored",
                nb_ignored, id
            );
        }
        let days_pattern = self.days_patterns.get_or_insert(days);
        self.calendars.insert(id.to_string(), days_pattern);
        Ok(())
    }

    pub fn add_pattern<StopPoints>(
        &mut self,
        id: &str,
        stop_points: StopPoints,
    ) -> Result<PatternIdx, BuildError>
    where
        StopPoints: IntoIterator,
        StopPoints::Item: Into<String>,
    {
        if self.pattern_id_to_idx.contains_key(id) {
            return Err(BuildError::DuplicatedPattern(id.to_string()));
        }
        let stop_points: Vec<String> = stop_points.into_iter().map(Into::into).collect();
        if stop_points.is_empty() {
            return Err(BuildError::EmptyPattern(id.to_string()));
        }
        let pattern_idx = PatternIdx {
            idx: self.patterns.len(),
        };
        self.patterns.push(Pattern {
            id: id.to_string(),
            stop_points,
            vehicle_journeys: Vec::new(),
            frequency_vehicle_journeys: Vec::new(),
        });
        self.pattern_id_to_idx.insert(id.to_string(), pattern_idx);
        Ok(pattern_idx)
    }

    pub fn add_vehicle_journey(
        &mut self,
        trip: TripInput,
    ) -> Result<VehicleJourneyIdx, BuildError> {
        let vj_idx = VehicleJourneyIdx {
            idx: self.vehicle_journeys.len(),
        };
        let vehicle_journey = self.make_vehicle_journey(trip, TripIdx::Discrete(vj_idx))?;
        let pattern = vehicle_journey.pattern;
        self.vehicle_journey_id_to_idx
            .insert(vehicle_journey.id.clone(), TripIdx::Discrete(vj_idx));
        self.vehicle_journeys.push(vehicle_journey);
        self.patterns[pattern.idx].vehicle_journeys.push(vj_idx);
        Ok(vj_idx)
    }

    pub fn add_frequency_vehicle_journey(
        &mut self,
        trip: TripInput,
        frequency: FrequencyInput,
    ) -> Result<FrequencyVehicleJourneyIdx, BuildError> {
        if frequency.headway_secs == 0 || frequency.headway_secs > SECONDS_PER_DAY {
            return Err(BuildError::InvalidHeadway {
                vehicle_journey: trip.id,
                headway_secs: frequency.headway_secs,
            });
        }
        let freq_vj_idx = FrequencyVehicleJourneyIdx {
            idx: self.frequency_vehicle_journeys.len(),
        };
        let journey = self.make_vehicle_journey(trip, TripIdx::Frequency(freq_vj_idx))?;
        let pattern = journey.pattern;
        self.vehicle_journey_id_to_idx
            .insert(journey.id.clone(), TripIdx::Frequency(freq_vj_idx));
        self.frequency_vehicle_journeys.push(FrequencyVehicleJourney {
            journey,
            start_time: frequency.start_time,
            end_time: frequency.end_time,
            headway_secs: frequency.headway_secs,
        });
        self.patterns[pattern.idx]
            .frequency_vehicle_journeys
            .push(freq_vj_idx);
        Ok(freq_vj_idx)
    }

    /// Makes `calendar_id` list the vehicle journey `vehicle_journey_id`
    /// in addition to the calendar it runs on.
    pub fn associate_calendar(
        &mut self,
        calendar_id: &str,
        vehicle_journey_id: &str,
    ) -> Result<(), BuildError> {
        if !self.calendars.contains_key(calendar_id) {
            return Err(BuildError::UnknownCalendar(calendar_id.to_string()));
        }
        let trip = *self
            .vehicle_journey_id_to_idx
            .get(vehicle_journey_id)
            .ok_or_else(|| BuildError::UnknownVehicleJourney(vehicle_journey_id.to_string()))?;
        let vehicle_journey = match trip {
            TripIdx::Discrete(vj) => &mut self.vehicle_journeys[vj.idx],
            TripIdx::Frequency(freq_vj) => &mut self.frequency_vehicle_journeys[freq_vj.idx].journey,
        };
        vehicle_journey
            .associated_calendars
            .insert(calendar_id.to_string());
        Ok(())
    }

    pub fn build(self) -> TransitData {
        let ordered_stop_times = OrderedStopTimes::new(&self.patterns, &self.vehicle_journeys);
        info!(
            "Transit data built with {} patterns, {} vehicle journeys, {} frequency vehicle journeys \
             and {} validity patterns, over {} days starting {}",
            self.patterns.len(),
            self.vehicle_journeys.len(),
            self.frequency_vehicle_journeys.len(),
            self.days_patterns.nb_of_patterns(),
            self.calendar.nb_of_days(),
            self.calendar.first_date(),
        );
        TransitData {
            calendar: self.calendar,
            days_patterns: self.days_patterns,
            patterns: self.patterns,
            vehicle_journeys: self.vehicle_journeys,
            frequency_vehicle_journeys: self.frequency_vehicle_journeys,
            pattern_id_to_idx: self.pattern_id_to_idx,
            vehicle_journey_id_to_idx: self.vehicle_journey_id_to_idx,
            ordered_stop_times,
        }
    }

    fn days_pattern(&self, calendar_id: &str) -> Result<DaysPattern, BuildError> {
        self.calendars
            .get(calendar_id)
            .copied()
            .ok_or_else(|| BuildError::UnknownCalendar(calendar_id.to_string()))
    }

    fn make_vehicle_journey(
        &self,
        trip: TripInput,
        trip_idx: TripIdx,
    ) -> Result<VehicleJourney, BuildError> {
        if self.vehicle_journey_id_to_idx.contains_key(&trip.id) {
            return Err(BuildError::DuplicatedVehicleJourney(trip.id));
        }
        let pattern_idx = *self.pattern_id_to_idx.get(&trip.pattern).ok_or_else(|| {
            BuildError::UnknownPattern {
                vehicle_journey: trip.id.clone(),
                pattern: trip.pattern.clone(),
            }
        })?;
        let nb_of_stops = self.patterns[pattern_idx.idx].nb_of_stops();
        if trip.stop_times.len() != nb_of_stops {
            return Err(BuildError::NbOfStopTimes {
                vehicle_journey: trip.id,
                expected: nb_of_stops,
                actual: trip.stop_times.len(),
            });
        }
        inspect(&trip.id, &trip.stop_times)?;

        let validity = self.days_pattern(&trip.calendar)?;
        if self.days_patterns.is_empty_pattern(&validity) {
            return Err(BuildError::NoValidDates(trip.id));
        }
        let adapted_validity = trip
            .adapted_calendar
            .as_deref()
            .map(|calendar_id| self.days_pattern(calendar_id))
            .transpose()?;

        let last_order = nb_of_stops - 1;
        let stop_times = trip
            .stop_times
            .iter()
            .enumerate()
            .map(|(order, input)| StopTime {
                order,
                arrival_time: input.arrival_time,
                departure_time: input.departure_time,
                // nobody can board at the last stop,
                // nor debark at the first one
                pick_up_allowed: input.pick_up_allowed && order != last_order,
                drop_off_allowed: input.drop_off_allowed && order != 0,
                trip: trip_idx,
            })
            .collect();

        let mut associated_calendars = BTreeSet::new();
        associated_calendars.insert(trip.calendar.clone());

        Ok(VehicleJourney {
            id: trip.id,
            pattern: pattern_idx,
            stop_times,
            validity,
            adapted_validity,
            accessibility: trip.accessibility,
            utc_offset: trip.utc_offset,
            meta_vehicle_journey: trip.meta_vehicle_journey,
            associated_calendars,
        })
    }
}

// Checks that the vehicle never goes back in time along its pattern
fn inspect(vehicle_journey: &str, stop_times: &[StopTimeInput]) -> Result<(), BuildError> {
    for (order, stop_time) in stop_times.iter().enumerate() {
        if stop_time.arrival_time > stop_time.departure_time {
            return Err(BuildError::ArrivalAfterDeparture {
                vehicle_journey: vehicle_journey.to_string(),
                order,
            });
        }
    }
    for (upstream, pair) in stop_times.windows(2).enumerate() {
        if pair[0].departure_time > pair[1].arrival_time {
            return Err(BuildError::DecreasingTimes {
                vehicle_journey: vehicle_journey.to_string(),
                upstream,
                downstream: upstream + 1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> SecondsSinceDayStart {
        s.parse().unwrap()
    }

    fn builder() -> TransitDataBuilder {
        let mut builder = TransitDataBuilder::new(date("2020-01-01"), date("2020-01-10")).unwrap();
        builder
            .add_calendar("everyday", &[date("2020-01-01"), date("2020-01-02")])
            .unwrap();
        builder.add_pattern("P", vec!["A", "B"]).unwrap();
        builder
    }

    fn trip(id: &str, times: &[(&str, &str)]) -> TripInput {
        let mut trip = TripInput::new(id, "P", "everyday");
        trip.stop_times = times
            .iter()
            .map(|(arrival, departure)| StopTimeInput::new(time(arrival), time(departure)))
            .collect();
        trip
    }

    #[test]
    fn stop_times_must_match_the_pattern() {
        let mut builder = builder();
        let result = builder.add_vehicle_journey(trip("vj", &[("10:00:00", "10:00:00")]));
        assert_eq!(
            result,
            Err(BuildError::NbOfStopTimes {
                vehicle_journey: "vj".to_string(),
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn times_must_not_decrease() {
        let mut builder = builder();
        let result = builder.add_vehicle_journey(trip(
            "vj",
            &[("10:00:00", "10:05:00"), ("10:01:00", "10:01:00")],
        ));
        assert!(matches!(result, Err(BuildError::DecreasingTimes { .. })));

        let result = builder.add_vehicle_journey(trip(
            "vj",
            &[("10:00:00", "09:00:00"), ("10:01:00", "10:01:00")],
        ));
        assert!(matches!(
            result,
            Err(BuildError::ArrivalAfterDeparture { order: 0, .. })
        ));
    }

    #[test]
    fn unknown_references() {
        let mut builder = builder();
        let mut unknown_pattern = trip("vj", &[("10:00:00", "10:00:00"), ("10:01:00", "10:01:00")]);
        unknown_pattern.pattern = "Q".to_string();
        assert!(matches!(
            builder.add_vehicle_journey(unknown_pattern),
            Err(BuildError::UnknownPattern { .. })
        ));

        let mut unknown_calendar = trip("vj", &[("10:00:00", "10:00:00"), ("10:01:00", "10:01:00")]);
        unknown_calendar.calendar = "never".to_string();
        assert_eq!(
            builder.add_vehicle_journey(unknown_calendar),
            Err(BuildError::UnknownCalendar("never".to_string()))
        );

        assert_eq!(
            builder.associate_calendar("everyday", "vj"),
            Err(BuildError::UnknownVehicleJourney("vj".to_string()))
        );
    }

    #[test]
    fn duplicated_vehicle_journey() {
        let mut builder = builder();
        let times = [("10:00:00", "10:00:00"), ("10:01:00", "10:01:00")];
        builder.add_vehicle_journey(trip("vj", &times)).unwrap();
        assert_eq!(
            builder.add_vehicle_journey(trip("vj", &times)),
            Err(BuildError::DuplicatedVehicleJourney("vj".to_string()))
        );
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(SECONDS_PER_DAY, true)]
    #[case(SECONDS_PER_DAY + 1, false)]
    #[case(u32::MAX, false)]
    fn headway_must_fit_in_a_day(#[case] headway_secs: u32, #[case] accepted: bool) {
        let mut builder = builder();
        let frequency = FrequencyInput {
            start_time: time("07:00:00"),
            end_time: time("10:00:00"),
            headway_secs,
        };
        let result = builder.add_frequency_vehicle_journey(
            trip("freq", &[("00:00:00", "00:00:00"), ("00:10:00", "00:10:00")]),
            frequency,
        );
        if accepted {
            assert!(result.is_ok());
        } else {
            assert_eq!(
                result,
                Err(BuildError::InvalidHeadway {
                    vehicle_journey: "freq".to_string(),
                    headway_secs,
                })
            );
        }
    }

    #[test]
    fn calendar_without_days_in_dataset() {
        let mut builder = builder();
        builder
            .add_calendar("last_year", &[date("2019-01-01")])
            .unwrap();
        let mut last_year = trip("vj", &[("10:00:00", "10:00:00"), ("10:01:00", "10:01:00")]);
        last_year.calendar = "last_year".to_string();
        assert_eq!(
            builder.add_vehicle_journey(last_year),
            Err(BuildError::NoValidDates("vj".to_string()))
        );
    }

    #[test]
    fn first_and_last_stops_flows() {
        let mut builder = builder();
        let vj = builder
            .add_vehicle_journey(trip(
                "vj",
                &[("10:00:00", "10:00:00"), ("10:01:00", "10:01:00")],
            ))
            .unwrap();
        let data = builder.build();
        let stop_times = data.vehicle_journey(&vj).stop_times();
        assert!(stop_times[0].pick_up_allowed());
        assert!(!stop_times[0].drop_off_allowed());
        assert!(!stop_times[1].pick_up_allowed());
        assert!(stop_times[1].drop_off_allowed());
    }
}
