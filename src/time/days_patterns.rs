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

use std::collections::hash_map::{Entry, HashMap};

use crate::time::DaysSinceDatasetStart;

/// Interned validity calendars.
///
/// A `DaysPattern` is a dense array of booleans indexed by the number of
/// days since the start of the dataset, so checking whether a vehicle runs
/// on a given day is a single lookup.
/// Calendars running on the same days share the same `DaysPattern`.
#[derive(Debug)]
pub struct DaysPatterns {
    nb_of_days: usize,
    allowed_days: Vec<Vec<bool>>,
    known_patterns: HashMap<Vec<bool>, DaysPattern>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DaysPattern {
    idx: usize,
}

impl DaysPatterns {
    pub fn new(nb_of_days: usize) -> Self {
        Self {
            nb_of_days,
            allowed_days: Vec::new(),
            known_patterns: HashMap::new(),
        }
    }

    pub fn nb_of_patterns(&self) -> usize {
        self.allowed_days.len()
    }

    /// A day outside of the dataset is never allowed
    pub fn is_allowed(&self, days_pattern: &DaysPattern, day: &DaysSinceDatasetStart) -> bool {
        self.allowed_days[days_pattern.idx]
            .get(usize::from(day.days))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_empty_pattern(&self, days_pattern: &DaysPattern) -> bool {
        !self.allowed_days[days_pattern.idx].contains(&true)
    }

    /// Days beyond the end of the dataset are ignored.
    pub fn get_or_insert<Days>(&mut self, days: Days) -> DaysPattern
    where
        Days: IntoIterator<Item = DaysSinceDatasetStart>,
    {
        let mut allowed_days = vec![false; self.nb_of_days];
        for day in days {
            if let Some(allowed) = allowed_days.get_mut(usize::from(day.days)) {
                *allowed = true;
            }
        }
        let idx = self.allowed_days.len();
        match self.known_patterns.entry(allowed_days) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                self.allowed_days.push(entry.key().clone());
                *entry.insert(DaysPattern { idx })
            }
        }
    }
}
