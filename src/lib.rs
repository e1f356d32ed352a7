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

pub mod engine;
pub mod models;
pub mod time;
pub mod transit_data;

pub use chrono;
pub use chrono::{NaiveDate, NaiveDateTime};
pub use tracing;

pub use engine::best_stop_time::{best_stop_time, earliest_stop_time, tardiest_stop_time};
pub use engine::calendar_stop_times::all_stop_times;
pub use models::{
    Accessibility, FrequencyVehicleJourney, Pattern, PatternPoint, RealTimeLevel, StopTime,
    TripIdx, VehicleJourney,
};
pub use time::{DateTime, DaysSinceDatasetStart, SecondsSinceDayStart};
pub use transit_data::{
    BuildError, FrequencyInput, StopTimeInput, TransitData, TransitDataBuilder, TripInput,
};
