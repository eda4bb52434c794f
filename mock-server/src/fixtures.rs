//! Canned results for the demo school.
//!
//! Times are integers without padding (`800` is 08:00) and lesson element
//! arrays may list the same id twice, as a real server does.

use serde_json::{json, Value};

pub fn departments() -> Value {
    json!([
        {"id": 1, "name": "MATH", "longName": "Mathematics"},
        {"id": 2, "name": "LANG", "longName": "Languages"},
    ])
}

pub fn holidays() -> Value {
    json!([
        {"id": 10, "name": "Easter", "longName": "Easter holidays", "startDate": 20240325, "endDate": 20240405},
        {"id": 11, "name": "Summer", "longName": "Summer holidays", "startDate": 20240722, "endDate": 20240830},
    ])
}

pub fn klassen() -> Value {
    json!([
        {"id": 1, "name": "5a", "longName": "Class 5a", "active": true},
        {"id": 2, "name": "5b", "longName": "Class 5b", "active": true},
        {"id": 3, "name": "4a", "longName": "Class 4a (last year)", "active": false},
    ])
}

pub fn rooms() -> Value {
    json!([
        {"id": 1, "name": "R101", "longName": "Room 101", "active": true, "building": "Main"},
        {"id": 2, "name": "LAB", "longName": "Chemistry lab", "active": true, "building": "Annex"},
    ])
}

pub fn school_years() -> Value {
    json!([
        {"id": 7, "name": "2022/2023", "startDate": 20220905, "endDate": 20230714},
        {"id": 8, "name": "2023/2024", "startDate": 20230904, "endDate": 20240712},
    ])
}

pub fn current_school_year() -> Value {
    json!({"id": 8, "name": "2023/2024", "startDate": 20230904, "endDate": 20240712})
}

pub fn subjects() -> Value {
    json!([
        {
            "id": 1, "name": "M", "longName": "Mathematics", "alternateName": "MA",
            "active": true, "backColor": "000000", "foreColor": "ffffff"
        },
        {
            "id": 2, "name": "E", "longName": "English", "alternateName": "EN",
            "active": true, "backColor": "ff0000", "foreColor": "000000"
        },
    ])
}

pub fn teachers() -> Value {
    json!([
        {"id": 1, "name": "SMI", "foreName": "Anna", "longName": "Smith", "title": "Dr.", "active": true},
        {"id": 2, "name": "JON", "foreName": "Ben", "longName": "Jones", "title": "", "active": true},
    ])
}

pub fn timegrid_units() -> Value {
    let units = json!([
        {"name": "1", "startTime": 800, "endTime": 845},
        {"name": "2", "startTime": 850, "endTime": 935},
        {"name": "3", "startTime": 955, "endTime": 1040},
    ]);
    json!((2..=6).map(|day| json!({"day": day, "timeUnits": units})).collect::<Vec<_>>())
}

pub fn lessons() -> Value {
    json!([
        {
            "id": 100, "date": 20240311, "startTime": 800, "endTime": 845,
            "kl": [{"id": 1}, {"id": 1}], "te": [{"id": 1}], "su": [{"id": 1}], "ro": [{"id": 1}],
            "activityType": "Unterricht"
        },
        {
            "id": 101, "date": 20240311, "startTime": 850, "endTime": 935,
            "kl": [{"id": 1}, {"id": 2}], "te": [{"id": 2}], "su": [{"id": 2}], "ro": [{"id": 2}],
            "code": "cancelled", "activityType": "Unterricht"
        },
        {
            "id": 102, "date": 20240312, "startTime": 955, "endTime": 1040,
            "kl": [{"id": 1}], "te": [{"id": 1}], "su": [{"id": 1}], "ro": [],
            "code": "irregular", "activityType": "Unterricht"
        },
        {
            "id": 103, "date": 20240318, "startTime": 800, "endTime": 845,
            "kl": [{"id": 2}], "te": [{"id": 2}], "su": [{"id": 2}], "ro": [{"id": 1}],
            "activityType": "Unterricht"
        },
    ])
}

pub fn latest_import_time() -> Value {
    json!(1710144000000_i64)
}

pub fn status_data() -> Value {
    json!({
        "lstypes": [{"ls": {"foreColor": "000000", "backColor": "ee7f00"}}],
        "codes": [{"cancelled": {"foreColor": "000000", "backColor": "b1b3b4"}}],
    })
}

pub fn exam_types() -> Value {
    json!([{"id": 1, "name": "Test", "longName": "Written test", "showInTimetable": true}])
}

pub fn exams() -> Value {
    json!([{"id": 1, "classes": [1], "teachers": [1], "subject": 1, "date": 20240313, "startTime": 800, "endTime": 935}])
}

pub fn class_reg_categories() -> Value {
    json!([{"id": 1, "name": "Late", "longName": "Arrived late"}])
}

pub fn class_reg_category_groups() -> Value {
    json!([{"id": 1, "name": "Behaviour"}])
}

pub fn class_reg_events() -> Value {
    json!([{"studentid": "4711", "surname": "Doe", "forname": "Jane", "date": 20240311, "subject": "M", "reason": "Late", "text": ""}])
}

pub fn timetable_with_absences() -> Value {
    json!({"periods": [{"id": 100, "date": 20240311, "startTime": 800, "endTime": 845, "absences": []}]})
}

/// Lesson fixtures whose date falls within `start..=end`, both `yyyyMMdd`.
pub fn lessons_between(start: i64, end: i64) -> Value {
    let lessons = lessons();
    let selected: Vec<Value> = lessons
        .as_array()
        .into_iter()
        .flatten()
        .filter(|lesson| {
            let date = lesson["date"].as_i64().unwrap_or_default();
            (start..=end).contains(&date)
        })
        .cloned()
        .collect();
    Value::Array(selected)
}
