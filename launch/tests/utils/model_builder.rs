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

//! Provides an easy way to create a `TransitData`
//!
//! ```
//! # fn main() {
//!  let data = ModelBuilder::default()
//!      .vj("toto", |vj| {
//!          vj.st("A", "10:00:00")
//!            .st("B", "11:00:00");
//!      })
//!      .vj("tata", |vj| {
//!          vj.st("A", "10:00:00")
//!            .st("B", "11:00:00");
//!      })
//!      .build();
//! # }
//! ```

use best_stop_time::{
    Accessibility, FrequencyInput, NaiveDate, NaiveDateTime, SecondsSinceDayStart,
    StopTimeInput, TransitData, TransitDataBuilder, TripInput,
};

pub const DEFAULT_CALENDAR_ID: &str = "default_service";
pub const DEFAULT_PATTERN_ID: &str = "default_pattern";

/// Builder used to easily create a `TransitData`
/// Note: if not explicitly set all the vehicle journeys
/// will be attached to a default calendar, valid on every day of the data,
/// and to a default pattern
pub struct ModelBuilder {
    start_date: NaiveDate,
    end_date: NaiveDate,
    calendars: Vec<(String, Vec<NaiveDate>)>,
    vehicle_journeys: Vec<VehicleJourneyDraft>,
}

struct VehicleJourneyDraft {
    trip: TripInput,
    stop_points: Vec<String>,
    frequency: Option<FrequencyInput>,
    associated_calendars: Vec<String>,
}

/// Builder used to fill a new vehicle journey
pub struct VehicleJourneyBuilder<'a> {
    draft: &'a mut VehicleJourneyDraft,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        let date = "2020-01-01";
        Self::new(date, date)
    }
}

impl ModelBuilder {
    pub fn new(start_date: impl AsDate, end_date: impl AsDate) -> Self {
        let start_date = start_date.as_date();
        let end_date = end_date.as_date();
        assert!(start_date <= end_date);
        let dates: Vec<_> = start_date
            .iter_days()
            .take_while(|date| *date <= end_date)
            .collect();
        let model_builder = Self {
            start_date,
            end_date,
            calendars: Vec::new(),
            vehicle_journeys: Vec::new(),
        };
        model_builder.calendar(DEFAULT_CALENDAR_ID, dates.as_slice())
    }

    /// Add a new calendar, or replace the dates of an existing one
    ///
    /// ```
    /// # fn main() {
    /// let data = ModelBuilder::new("2020-01-01", "2020-01-10")
    ///        .calendar("c1", &["2020-01-02", "2020-01-05"])
    ///        .vj("toto", |vj| {
    ///            vj.calendar("c1")
    ///              .st("A", "10:00:00")
    ///              .st("B", "11:00:00");
    ///        })
    ///        .build();
    /// # }
    /// ```
    pub fn calendar(mut self, id: &str, dates: &[impl AsDate]) -> Self {
        let dates = dates.iter().map(AsDate::as_date).collect();
        match self.calendars.iter_mut().find(|(calendar_id, _)| calendar_id == id) {
            Some((_, old_dates)) => *old_dates = dates,
            None => self.calendars.push((id.to_string(), dates)),
        }
        self
    }

    /// Add a new vehicle journey to the model
    pub fn vj<F>(mut self, name: &str, mut vj_initer: F) -> Self
    where
        F: FnMut(VehicleJourneyBuilder),
    {
        assert!(
            self.vehicle_journeys
                .iter()
                .all(|draft| draft.trip.id != name),
            "vj {} already exists",
            name
        );
        self.vehicle_journeys.push(VehicleJourneyDraft {
            trip: TripInput::new(name, DEFAULT_PATTERN_ID, DEFAULT_CALENDAR_ID),
            stop_points: Vec::new(),
            frequency: None,
            associated_calendars: Vec::new(),
        });
        let draft = self
            .vehicle_journeys
            .last_mut()
            .expect("a vehicle journey was just pushed");
        vj_initer(VehicleJourneyBuilder { draft });
        self
    }

    /// Panics if the model is inconsistent
    pub fn build(self) -> TransitData {
        let mut builder = TransitDataBuilder::new(self.start_date, self.end_date)
            .expect("invalid validity period");
        for (id, dates) in &self.calendars {
            builder
                .add_calendar(id, dates)
                .unwrap_or_else(|err| panic!("calendar {} : {}", id, err));
        }

        let mut patterns: Vec<(&str, &[String])> = Vec::new();
        for draft in &self.vehicle_journeys {
            let pattern_id = draft.trip.pattern.as_str();
            match patterns.iter().find(|(id, _)| *id == pattern_id) {
                Some((_, stop_points)) => assert!(
                    *stop_points == draft.stop_points.as_slice(),
                    "vj {} does not stop at the stop points of pattern {}",
                    draft.trip.id,
                    pattern_id
                ),
                None => patterns.push((pattern_id, draft.stop_points.as_slice())),
            }
        }
        for (id, stop_points) in patterns {
            builder
                .add_pattern(id, stop_points.iter().cloned())
                .unwrap_or_else(|err| panic!("pattern {} : {}", id, err));
        }

        for draft in &self.vehicle_journeys {
            let result = match &draft.frequency {
                Some(frequency) => builder
                    .add_frequency_vehicle_journey(draft.trip.clone(), frequency.clone())
                    .map(|_| ()),
                None => builder
                    .add_vehicle_journey(draft.trip.clone())
                    .map(|_| ()),
            };
            result.unwrap_or_else(|err| panic!("vj {} : {}", draft.trip.id, err));
        }
        for draft in &self.vehicle_journeys {
            for calendar_id in &draft.associated_calendars {
                builder
                    .associate_calendar(calendar_id, &draft.trip.id)
                    .unwrap_or_else(|err| panic!("vj {} : {}", draft.trip.id, err));
            }
        }

        builder.build()
    }
}

impl<'a> VehicleJourneyBuilder<'a> {
    /// add a stop time to the vehicle journey, with the same arrival and departure
    ///
    /// Note: if the time is given in a string
    /// not in the right format, this conversion will fail
    pub fn st(self, name: &str, time: impl IntoTime) -> Self {
        let time = time.into_time();
        self.st_detailed(name, time, time, 0, 0)
    }

    /// pickup_type and drop_off_type equal to 1 forbid boarding and debarking
    pub fn st_detailed(
        self,
        name: &str,
        arrival: impl IntoTime,
        departure: impl IntoTime,
        pickup_type: u8,
        drop_off_type: u8,
    ) -> Self {
        let mut stop_time = StopTimeInput::new(arrival.into_time(), departure.into_time());
        stop_time.pick_up_allowed = pickup_type != 1;
        stop_time.drop_off_allowed = drop_off_type != 1;
        self.draft.stop_points.push(name.to_string());
        self.draft.trip.stop_times.push(stop_time);
        self
    }

    pub fn pattern(self, id: &str) -> Self {
        self.draft.trip.pattern = id.to_string();
        self
    }

    /// Set the calendar on which the vj runs
    pub fn calendar(self, id: &str) -> Self {
        self.draft.trip.calendar = id.to_string();
        self
    }

    /// Set the calendar used instead of the base one on real time requests
    pub fn adapted_calendar(self, id: &str) -> Self {
        self.draft.trip.adapted_calendar = Some(id.to_string());
        self
    }

    /// Make the vj listed as belonging to the calendar `id`
    /// in addition to the one it runs on
    pub fn associated_calendar(self, id: &str) -> Self {
        self.draft.associated_calendars.push(id.to_string());
        self
    }

    pub fn accessibility(self, accessibility: Accessibility) -> Self {
        self.draft.trip.accessibility.insert(accessibility);
        self
    }

    pub fn utc_offset(self, utc_offset: i32) -> Self {
        self.draft.trip.utc_offset = utc_offset;
        self
    }

    pub fn meta_vj(self, id: &str) -> Self {
        self.draft.trip.meta_vehicle_journey = Some(id.to_string());
        self
    }

    /// Turns the vj into a frequency vj departing every `headway_secs`
    /// between `start` and `end`.
    /// The stop times are then relative to each departure.
    pub fn frequency(self, start: impl IntoTime, end: impl IntoTime, headway_secs: u32) -> Self {
        self.draft.frequency = Some(FrequencyInput {
            start_time: start.into_time(),
            end_time: end.into_time(),
            headway_secs,
        });
        self
    }
}

pub trait IntoTime {
    fn into_time(&self) -> SecondsSinceDayStart;
}

impl IntoTime for SecondsSinceDayStart {
    fn into_time(&self) -> SecondsSinceDayStart {
        *self
    }
}

impl IntoTime for &str {
    // Note: if the string is not in the right format, this conversion will fail
    fn into_time(&self) -> SecondsSinceDayStart {
        self.parse().expect("invalid time format")
    }
}

pub trait AsDate {
    fn as_date(&self) -> NaiveDate;
}

impl AsDate for NaiveDate {
    fn as_date(&self) -> NaiveDate {
        *self
    }
}

impl AsDate for &NaiveDate {
    fn as_date(&self) -> NaiveDate {
        **self
    }
}

impl AsDate for &str {
    // Note: if the string is not in the right format, this conversion will fail
    fn as_date(&self) -> NaiveDate {
        self.parse().expect("invalid date format")
    }
}

pub trait AsDateTime {
    fn as_datetime(&self) -> NaiveDateTime;
}

impl AsDateTime for &str {
    fn as_datetime(&self) -> NaiveDateTime {
        self.parse().expect("invalid datetime format")
    }
}

impl AsDateTime for NaiveDateTime {
    fn as_datetime(&self) -> NaiveDateTime {
        *self
    }
}
