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

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use crate::datetime::DateTimeRepresent;
use best_stop_time::{Accessibility, RealTimeLevel};

#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
#[structopt(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct RequestParams {
    /// Which version of the data to use for finding stop times ?
    /// base : the initial schedule, disregarding disruptions
    /// real_time : uses the adapted calendars of disrupted vehicle journeys
    #[structopt(long, default_value = DEFAULT_REAL_TIME_LEVEL)]
    #[serde(default = "default_real_time_level")]
    pub real_time_level: RealTimeLevel,

    /// departure : look for the first pick up at or after the datetime
    /// arrival : look for the last drop off at or before the datetime
    #[structopt(long, default_value = DEFAULT_DATETIME_REPRESENT)]
    #[serde(default)]
    pub datetime_represent: DateTimeRepresent,

    /// only use vehicles accessible to wheelchairs
    #[structopt(long)]
    #[serde(default)]
    pub wheelchair: bool,

    /// only use vehicles accepting bikes
    #[structopt(long)]
    #[serde(default)]
    pub bike: bool,

    /// swap pick up and drop off rules, as done when rebuilding
    /// a journey from its end
    #[structopt(long)]
    #[serde(default)]
    pub reconstructing_path: bool,
}

pub const DEFAULT_REAL_TIME_LEVEL: &str = "base";
pub const DEFAULT_DATETIME_REPRESENT: &str = "departure";

pub fn default_real_time_level() -> RealTimeLevel {
    RealTimeLevel::Base
}

impl RequestParams {
    /// The properties required from the vehicles
    pub fn accessibility(&self) -> Accessibility {
        let mut accessibility = Accessibility::empty();
        if self.wheelchair {
            accessibility.insert(Accessibility::WHEELCHAIR);
        }
        if self.bike {
            accessibility.insert(Accessibility::BIKE);
        }
        accessibility
    }

    pub fn clockwise(&self) -> bool {
        matches!(self.datetime_represent, DateTimeRepresent::Departure)
    }
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            real_time_level: default_real_time_level(),
            datetime_represent: DateTimeRepresent::default(),
            wheelchair: false,
            bike: false,
            reconstructing_path: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_json() {
        let params: RequestParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.real_time_level, RealTimeLevel::Base);
        assert!(params.clockwise());
        assert!(params.accessibility().is_empty());
        assert!(!params.reconstructing_path);
    }

    #[test]
    fn accessibility_from_flags() {
        let params: RequestParams = serde_json::from_str(
            r#"{ "wheelchair" : true, "bike" : true, "datetime_represent" : "arrival" }"#,
        )
        .unwrap();
        assert_eq!(
            params.accessibility(),
            Accessibility::WHEELCHAIR | Accessibility::BIKE
        );
        assert!(!params.clockwise());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<RequestParams, _> = serde_json::from_str(r#"{ "max_nb_of_legs" : 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn from_command_line() {
        let params = RequestParams::from_iter(&[
            "next_stop_time",
            "--real_time_level",
            "real_time",
            "--wheelchair",
        ]);
        assert_eq!(params.real_time_level, RealTimeLevel::RealTime);
        assert_eq!(params.accessibility(), Accessibility::WHEELCHAIR);
    }
}
