// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use crate::record::{Actor, ChangeKind, HistoricalRecord};
use std::collections::BTreeMap;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("system"))
}

pub fn create_test_record(history_id: Option<i64>, history_date: &str) -> HistoricalRecord {
    let mut record: HistoricalRecord = HistoricalRecord::new(
        history_date.to_string(),
        ChangeKind::Changed,
        Some(create_test_actor()),
        String::from("Order"),
        1,
        BTreeMap::new(),
    );
    record.history_id = history_id;
    record
}
