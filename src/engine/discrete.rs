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

use crate::models::{Accessibility, PatternPoint, RealTimeLevel, StopTime};
use crate::time::DateTime;
use crate::transit_data::TransitData;

/// Which is the first valid stop time in this range of the forward ordered stop times ?
///
/// A stop time is valid if one can board there, its vehicle journey runs on the
/// service day of `datetime` and is accessible with `accessibility`.
pub fn next_valid_discrete_pick_up<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    range: Range<usize>,
    datetime: &DateTime,
    reconstructing_path: bool,
    accessibility: &Accessibility,
    real_time_level: &RealTimeLevel,
) -> Option<(&'data StopTime, DateTime)> {
    let date = datetime.date();
    let ordered_stop_times = data.ordered_stop_times();
    for idx in range {
        let vehicle_journey =
            data.vehicle_journey(ordered_stop_times.forward_vehicle_journey(idx));
        let stop_time = data.stop_time_at(vehicle_journey, pattern_point.order);
        // a departure at 25:00 belongs to the service of the day before
        let service_day = date.minus_days(stop_time.departure_time.day_shift());
        if stop_time.can_board(reconstructing_path)
            && data.is_valid_some_day(vehicle_journey, service_day, real_time_level)
            && vehicle_journey.accessible(accessibility)
        {
            let departure = DateTime::combine(date, stop_time.departure_time.hour());
            return Some((stop_time, departure));
        }
    }
    None
}

/// Which is the first valid stop time in this range of the backward ordered stop times ?
pub fn next_valid_discrete_drop_off<'data>(
    data: &'data TransitData,
    pattern_point: &PatternPoint,
    range: Range<usize>,
    datetime: &DateTime,
    reconstructing_path: bool,
    accessibility: &Accessibility,
    real_time_level: &RealTimeLevel,
) -> Option<(&'data StopTime, DateTime)> {
    let date = datetime.date();
    let ordered_stop_times = data.ordered_stop_times();
    for idx in range {
        let vehicle_journey =
            data.vehicle_journey(ordered_stop_times.backward_vehicle_journey(idx));
        let stop_time = data.stop_time_at(vehicle_journey, pattern_point.order);
        let service_day = date.minus_days(stop_time.arrival_time.day_shift());
        if stop_time.can_debark(reconstructing_path)
            && data.is_valid_some_day(vehicle_journey, service_day, real_time_level)
            && vehicle_journey.accessible(accessibility)
        {
            let arrival = DateTime::combine(date, stop_time.arrival_time.hour());
            return Some((stop_time, arrival));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{DaysSinceDatasetStart, SecondsSinceDayStart};
    use crate::transit_data::{StopTimeInput, TransitDataBuilder, TripInput};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> SecondsSinceDayStart {
        s.parse().unwrap()
    }

    fn at(day: u16, hms: &str) -> DateTime {
        DateTime::combine(DaysSinceDatasetStart::new(day), time(hms).total_seconds())
    }

    fn add_trip(builder: &mut TransitDataBuilder, id: &str, calendar: &str, times: [&str; 2]) {
        let mut trip = TripInput::new(id, "P", calendar);
        trip.stop_times = times
            .iter()
            .map(|t| StopTimeInput::new(time(t), time(t)))
            .collect();
        builder.add_vehicle_journey(trip).unwrap();
    }

    fn data() -> TransitData {
        let mut builder = TransitDataBuilder::new(date("2020-01-01"), date("2020-01-10")).unwrap();
        builder
            .add_calendar("day_1", &[date("2020-01-02")])
            .unwrap();
        builder
            .add_calendar("day_2", &[date("2020-01-03")])
            .unwrap();
        builder.add_pattern("P", vec!["A", "B"]).unwrap();
        add_trip(&mut builder, "late", "day_1", ["11:00:00", "11:30:00"]);
        add_trip(&mut builder, "early", "day_2", ["09:00:00", "09:30:00"]);
        add_trip(&mut builder, "midnight", "day_1", ["24:30:00", "25:00:00"]);
        builder.build()
    }

    fn pick_up_id(data: &TransitData, datetime: DateTime) -> Option<(String, DateTime)> {
        let pattern_point = data.pattern_point("P", 0).unwrap();
        let ordered_stop_times = data.ordered_stop_times();
        let range = ordered_stop_times.range(&pattern_point);
        let first = ordered_stop_times.first_departure_at_or_after(&pattern_point, datetime.hour());
        next_valid_discrete_pick_up(
            data,
            &pattern_point,
            first..range.end,
            &datetime,
            false,
            &Accessibility::empty(),
            &RealTimeLevel::Base,
        )
        .map(|(stop_time, datetime)| {
            let id = data.journey_of(&stop_time.trip()).id().to_string();
            (id, datetime)
        })
    }

    fn drop_off_id(data: &TransitData, datetime: DateTime) -> Option<(String, DateTime)> {
        let pattern_point = data.pattern_point("P", 1).unwrap();
        let ordered_stop_times = data.ordered_stop_times();
        let range = ordered_stop_times.range(&pattern_point);
        let first = ordered_stop_times.first_arrival_at_or_before(&pattern_point, datetime.hour());
        next_valid_discrete_drop_off(
            data,
            &pattern_point,
            first..range.end,
            &datetime,
            false,
            &Accessibility::empty(),
            &RealTimeLevel::Base,
        )
        .map(|(stop_time, datetime)| {
            let id = data.journey_of(&stop_time.trip()).id().to_string();
            (id, datetime)
        })
    }

    #[test]
    fn slices_are_sorted() {
        let data = data();
        let pattern_point = data.pattern_point("P", 0).unwrap();
        let ordered_stop_times = data.ordered_stop_times();
        let range = ordered_stop_times.range(&pattern_point);
        assert_eq!(range.len(), 3);
        let departures: Vec<u32> = range
            .clone()
            .map(|idx| ordered_stop_times.departure_time(idx))
            .collect();
        // 24:30 is indexed at 00:30
        assert_eq!(departures, vec![1800, 9 * 3600, 11 * 3600]);
        let arrivals: Vec<u32> = range
            .map(|idx| ordered_stop_times.arrival_time(idx))
            .collect();
        assert_eq!(arrivals, vec![11 * 3600, 9 * 3600, 1800]);
    }

    #[test]
    fn skip_vehicle_journeys_not_running_on_the_day() {
        let data = data();
        // on day 1 only "late" runs, "early" runs on day 2
        assert_eq!(
            pick_up_id(&data, at(1, "08:00:00")),
            Some(("late".to_string(), at(1, "11:00:00")))
        );
        assert_eq!(
            pick_up_id(&data, at(2, "08:00:00")),
            Some(("early".to_string(), at(2, "09:00:00")))
        );
        assert_eq!(pick_up_id(&data, at(2, "09:00:01")), None);
    }

    #[test]
    fn departure_after_midnight_uses_previous_service_day() {
        let data = data();
        // "midnight" is a service of day 1, departing at 00:30 on day 2
        assert_eq!(
            pick_up_id(&data, at(2, "00:10:00")),
            Some(("midnight".to_string(), at(2, "00:30:00")))
        );
        assert_eq!(
            pick_up_id(&data, at(1, "00:10:00")),
            Some(("late".to_string(), at(1, "11:00:00")))
        );
    }

    #[test]
    fn drop_off_scan_goes_backward_in_time() {
        let data = data();
        assert_eq!(
            drop_off_id(&data, at(1, "23:00:00")),
            Some(("late".to_string(), at(1, "11:30:00")))
        );
        assert_eq!(
            drop_off_id(&data, at(2, "10:00:00")),
            Some(("early".to_string(), at(2, "09:30:00")))
        );
        assert_eq!(
            drop_off_id(&data, at(2, "01:00:00")),
            Some(("midnight".to_string(), at(2, "01:00:00")))
        );
        assert_eq!(drop_off_id(&data, at(1, "11:29:59")), None);
    }
}
