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

use std::{fs::File, io::BufReader, path::Path};

use crate::config::LaunchParams;
use anyhow::{Context, Error};
use best_stop_time::{
    chrono::{Duration, NaiveTime, Offset, TimeZone},
    tracing::{info, warn},
    Accessibility, FrequencyInput, NaiveDate, SecondsSinceDayStart, StopTimeInput, TransitData,
    TransitDataBuilder, TripInput,
};
use chrono_tz::Tz;
use serde::Deserialize;

/// The json snapshot of the vehicles to load
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub calendars: Vec<CalendarJson>,
    #[serde(default)]
    pub patterns: Vec<PatternJson>,
    #[serde(default)]
    pub vehicle_journeys: Vec<VehicleJourneyJson>,
    #[serde(default)]
    pub frequency_vehicle_journeys: Vec<FrequencyVehicleJourneyJson>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarJson {
    pub id: String,
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternJson {
    pub id: String,
    pub stop_points: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VehicleJourneyJson {
    pub id: String,
    pub pattern: String,
    pub calendar: String,
    pub adapted_calendar: Option<String>,
    /// other calendars listing this vehicle journey
    #[serde(default)]
    pub associated_calendars: Vec<String>,
    pub meta_vehicle_journey: Option<String>,
    /// seconds to add to utc times to get local times.
    /// When absent, it is computed from `timezone`
    pub utc_offset: Option<i32>,
    pub timezone: Option<String>,
    /// codes of the properties of the vehicle, see `accessibility_from_code`
    #[serde(default)]
    pub accessibility: Vec<u8>,
    pub stop_times: Vec<StopTimeJson>,
}

#[derive(Debug, Deserialize)]
pub struct FrequencyVehicleJourneyJson {
    #[serde(flatten)]
    pub vehicle_journey: VehicleJourneyJson,
    pub start_time: String,
    pub end_time: String,
    pub headway_secs: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopTimeJson {
    /// HH:MM:SS, may exceed 24:00:00
    pub arrival_time: String,
    pub departure_time: String,
    #[serde(default)]
    pub pickup_type: u8,
    #[serde(default)]
    pub drop_off_type: u8,
}

pub fn read(launch_params: &LaunchParams) -> Result<TransitData, Error> {
    let path = &launch_params.input_data_path;
    let snapshot = read_snapshot(path)?;
    info!("Snapshot {} loaded", path.display());
    build_transit_data(snapshot, &launch_params.default_timezone)
        .with_context(|| format!("Invalid snapshot {}", path.display()))
}

pub fn read_from_str(json: &str, default_timezone: &Tz) -> Result<TransitData, Error> {
    let snapshot: Snapshot = serde_json::from_str(json).context("Could not parse snapshot")?;
    build_transit_data(snapshot, default_timezone)
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot, Error> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let snapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Could not parse snapshot {}", path.display()))?;
    Ok(snapshot)
}

pub fn build_transit_data(snapshot: Snapshot, default_timezone: &Tz) -> Result<TransitData, Error> {
    let mut builder = TransitDataBuilder::new(snapshot.start_date, snapshot.end_date)?;
    for calendar in &snapshot.calendars {
        builder.add_calendar(&calendar.id, &calendar.dates)?;
    }
    for pattern in snapshot.patterns {
        builder.add_pattern(&pattern.id, pattern.stop_points)?;
    }

    let mut associations = Vec::new();
    for vehicle_journey in snapshot.vehicle_journeys {
        associations.extend(associated_calendars(&vehicle_journey));
        let trip = to_trip_input(&vehicle_journey, &snapshot.start_date, default_timezone)?;
        builder.add_vehicle_journey(trip)?;
    }
    for frequency_vehicle_journey in snapshot.frequency_vehicle_journeys {
        let vehicle_journey = frequency_vehicle_journey.vehicle_journey;
        associations.extend(associated_calendars(&vehicle_journey));
        let frequency = FrequencyInput {
            start_time: parse_time(&vehicle_journey.id, &frequency_vehicle_journey.start_time)?,
            end_time: parse_time(&vehicle_journey.id, &frequency_vehicle_journey.end_time)?,
            headway_secs: frequency_vehicle_journey.headway_secs,
        };
        let trip = to_trip_input(&vehicle_journey, &snapshot.start_date, default_timezone)?;
        builder.add_frequency_vehicle_journey(trip, frequency)?;
    }

    for (calendar_id, vehicle_journey_id) in associations {
        builder.associate_calendar(&calendar_id, &vehicle_journey_id)?;
    }

    Ok(builder.build())
}

fn associated_calendars(vehicle_journey: &VehicleJourneyJson) -> Vec<(String, String)> {
    vehicle_journey
        .associated_calendars
        .iter()
        .map(|calendar_id| (calendar_id.clone(), vehicle_journey.id.clone()))
        .collect()
}

fn to_trip_input(
    vehicle_journey: &VehicleJourneyJson,
    start_date: &NaiveDate,
    default_timezone: &Tz,
) -> Result<TripInput, Error> {
    let vehicle_journey_id = vehicle_journey.id.as_str();
    let mut trip = TripInput::new(
        vehicle_journey_id,
        &vehicle_journey.pattern,
        &vehicle_journey.calendar,
    );
    trip.adapted_calendar = vehicle_journey.adapted_calendar.clone();
    trip.meta_vehicle_journey = vehicle_journey.meta_vehicle_journey.clone();
    trip.utc_offset = match vehicle_journey.utc_offset {
        Some(utc_offset) => utc_offset,
        None => {
            let timezone = match &vehicle_journey.timezone {
                Some(name) => name.parse::<Tz>().map_err(|err| {
                    anyhow::format_err!(
                        "Vehicle journey {} has a bad timezone : {}",
                        vehicle_journey_id,
                        err
                    )
                })?,
                None => *default_timezone,
            };
            utc_offset_at(&timezone, start_date)
        }
    };
    for code in &vehicle_journey.accessibility {
        match accessibility_from_code(*code) {
            Some(property) => trip.accessibility.insert(property),
            None => warn!(
                "Unknown accessibility code {} for vehicle journey {}. I'll ignore it",
                code, vehicle_journey_id
            ),
        }
    }
    trip.stop_times = vehicle_journey
        .stop_times
        .iter()
        .map(|stop_time| to_stop_time_input(vehicle_journey_id, stop_time))
        .collect::<Result<_, _>>()?;
    Ok(trip)
}

// the offset is taken once for the whole dataset, daylight saving changes
// inside the dataset period are not taken into account
fn utc_offset_at(timezone: &Tz, date: &NaiveDate) -> i32 {
    let noon = date.and_time(NaiveTime::MIN) + Duration::hours(12);
    timezone
        .offset_from_utc_datetime(&noon)
        .fix()
        .local_minus_utc()
}

fn to_stop_time_input(vehicle_journey_id: &str, stop_time: &StopTimeJson) -> Result<StopTimeInput, Error> {
    let mut input = StopTimeInput::new(
        parse_time(vehicle_journey_id, &stop_time.arrival_time)?,
        parse_time(vehicle_journey_id, &stop_time.departure_time)?,
    );
    input.pick_up_allowed = is_allowed(stop_time.pickup_type, "pickup_type", vehicle_journey_id);
    input.drop_off_allowed =
        is_allowed(stop_time.drop_off_type, "drop_off_type", vehicle_journey_id);
    Ok(input)
}

fn parse_time(vehicle_journey_id: &str, time: &str) -> Result<SecondsSinceDayStart, Error> {
    time.parse::<SecondsSinceDayStart>()
        .with_context(|| format!("Bad time {} in vehicle journey {}", time, vehicle_journey_id))
}

// 0 : regular
// 1 : not available
// 2 : must phone the agency
// 3 : must coordinate with the driver
fn is_allowed(code: u8, field: &str, vehicle_journey_id: &str) -> bool {
    match code {
        0 | 2 | 3 => true,
        1 => false,
        _ => {
            warn!(
                "Unknown {} {} in vehicle journey {}. I'll consider it allowed",
                field, code, vehicle_journey_id
            );
            true
        }
    }
}

pub fn accessibility_from_code(code: u8) -> Option<Accessibility> {
    match code {
        0 => Some(Accessibility::WHEELCHAIR),
        1 => Some(Accessibility::BIKE),
        2 => Some(Accessibility::AIR_CONDITIONED),
        3 => Some(Accessibility::VISUAL_ANNOUNCEMENT),
        4 => Some(Accessibility::AUDIBLE_ANNOUNCEMENT),
        5 => Some(Accessibility::APPROPRIATE_ESCORT),
        6 => Some(Accessibility::APPROPRIATE_SIGNAGE),
        7 => Some(Accessibility::SCHOOL_VEHICLE),
        _ => None,
    }
}
