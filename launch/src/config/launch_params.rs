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

use std::path::PathBuf;

use super::parse_env_var;
use anyhow::Context;
use chrono_tz::Tz;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LaunchParams {
    /// json file describing the calendars, patterns and vehicle journeys to load
    pub input_data_path: PathBuf,

    /// timezone of the vehicle journeys that do not provide one
    #[serde(default = "default_timezone")]
    pub default_timezone: Tz,
}

pub const DEFAULT_TIMEZONE: Tz = Tz::UTC;

pub fn default_timezone() -> Tz {
    DEFAULT_TIMEZONE
}

impl LaunchParams {
    pub fn new(input_data_path: PathBuf) -> Self {
        Self {
            input_data_path,
            default_timezone: default_timezone(),
        }
    }

    pub fn new_from_env_vars() -> Result<Self, anyhow::Error> {
        let input_data_path = std::env::var("BEST_STOP_TIME_INPUT_DATA_PATH")
            .map(PathBuf::from)
            .context("Could not read mandatory env var BEST_STOP_TIME_INPUT_DATA_PATH")?;

        let default_timezone = parse_env_var(
            "BEST_STOP_TIME_DEFAULT_TIMEZONE",
            default_timezone(),
            |s| s.parse::<Tz>(),
        );

        Ok(Self {
            input_data_path,
            default_timezone,
        })
    }
}
