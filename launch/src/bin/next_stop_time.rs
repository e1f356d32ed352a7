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

use anyhow::{format_err, Error};
use best_stop_time::{
    all_stop_times, best_stop_time, tracing::info, PatternPoint, StopTime, TransitData,
};
use best_stop_time_launch::{
    config::{LaunchParams, RequestParams},
    datetime::parse_datetime_in,
    logger::init_logger,
    read,
};
use chrono_tz::Tz;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "next_stop_time",
    about = "Find the next stop time of a pattern at a given datetime.",
    rename_all = "snake_case"
)]
pub struct Options {
    /// json snapshot to load.
    /// Read from BEST_STOP_TIME_INPUT_DATA_PATH when not given
    #[structopt(long)]
    pub input_data_path: Option<std::path::PathBuf>,

    /// timezone of the vehicle journeys that do not provide one.
    /// Read from BEST_STOP_TIME_DEFAULT_TIMEZONE when not given, UTC by default
    #[structopt(long)]
    pub default_timezone: Option<Tz>,

    #[structopt(long)]
    pub pattern: String,

    /// position of the stop in the pattern, starting at 0
    #[structopt(long)]
    pub order: usize,

    /// utc datetime, formatted like 20190628T163215.
    /// Defaults to 08:00:00 on the first day of the data
    #[structopt(long)]
    pub datetime: Option<String>,

    /// list all the stop times of the vehicle journeys of this calendar
    /// instead of looking for the next one
    #[structopt(long)]
    pub calendar: Option<String>,

    #[structopt(flatten)]
    pub request_params: RequestParams,
}

fn main() {
    init_logger();
    if let Err(err) = run() {
        for cause in err.chain() {
            eprintln!("{}", cause);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let options = Options::from_args();
    let launch_params = launch_params(&options)?;
    let data = read::read(&launch_params)?;

    let pattern_point = data
        .pattern_point(&options.pattern, options.order)
        .ok_or_else(|| {
            format_err!(
                "The pattern {} does not exist or has no stop at order {}",
                options.pattern,
                options.order
            )
        })?;

    match &options.calendar {
        Some(calendar_id) => print_calendar(&data, &pattern_point, calendar_id, &options),
        None => print_best_stop_time(&data, &pattern_point, &options),
    }
}

fn launch_params(options: &Options) -> Result<LaunchParams, Error> {
    let mut launch_params = match &options.input_data_path {
        Some(input_data_path) => LaunchParams::new(input_data_path.clone()),
        None => LaunchParams::new_from_env_vars()?,
    };
    if let Some(default_timezone) = options.default_timezone {
        launch_params.default_timezone = default_timezone;
    }
    Ok(launch_params)
}

fn print_best_stop_time(
    data: &TransitData,
    pattern_point: &PatternPoint,
    options: &Options,
) -> Result<(), Error> {
    let calendar = data.calendar();
    let datetime = match &options.datetime {
        Some(string_datetime) => parse_datetime_in(calendar, string_datetime)?,
        None => calendar
            .first_date()
            .and_hms_opt(8, 0, 0)
            .and_then(|naive_datetime| calendar.from_naive_datetime(&naive_datetime))
            .ok_or_else(|| format_err!("The data has no valid day"))?,
    };
    let request_params = &options.request_params;
    info!(
        "Looking for the best stop time at {}, position {} with {} = {}",
        options.pattern,
        pattern_point.order,
        request_params.datetime_represent,
        calendar.to_pretty_string(&datetime),
    );

    let result = best_stop_time(
        data,
        pattern_point,
        &datetime,
        &request_params.accessibility(),
        request_params.clockwise(),
        &request_params.real_time_level,
        request_params.reconstructing_path,
    );
    match result {
        Some((stop_time, stop_datetime)) => {
            println!(
                "{} at {}",
                describe(data, stop_time),
                calendar.to_pretty_string(&stop_datetime)
            );
        }
        None => println!("No stop time found"),
    }
    Ok(())
}

fn print_calendar(
    data: &TransitData,
    pattern_point: &PatternPoint,
    calendar_id: &str,
    options: &Options,
) -> Result<(), Error> {
    let stop_times = all_stop_times(
        data,
        pattern_point,
        calendar_id,
        &options.request_params.accessibility(),
    );
    info!(
        "{} stop times found for calendar {}",
        stop_times.len(),
        calendar_id
    );
    for (local_time, stop_time) in stop_times {
        println!("{} {}", local_time, describe(data, stop_time));
    }
    Ok(())
}

fn describe(data: &TransitData, stop_time: &StopTime) -> String {
    let vehicle_journey = data.journey_of(&stop_time.trip());
    if stop_time.is_frequency() {
        format!("frequency vehicle journey {}", vehicle_journey.id())
    } else {
        format!("vehicle journey {}", vehicle_journey.id())
    }
}
