//! Records decoded from method results.
//!
//! Every record is built by its `Decode` impl from one JSON value and is
//! never modified afterwards. Field names in the comments are the wire
//! names.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::decode::{
    as_object, collapse_id_array, decode_optional_enum, required, required_bool, required_date,
    required_i64, required_str, required_time,
};
use crate::error::DecodeError;
use crate::types::{Activatable, Colored, Colors, Decode, Identified, LessonCode, NameInfo, Named, ResponseList};

macro_rules! named {
    ($($record:ty),+ $(,)?) => {
        $(impl Identified for $record {
            fn id(&self) -> i64 {
                self.info.id
            }

            fn name(&self) -> &str {
                &self.info.name
            }
        }

        impl Named for $record {
            fn name_info(&self) -> &NameInfo {
                &self.info
            }
        })+
    };
}

macro_rules! activatable {
    ($($record:ty),+ $(,)?) => {
        $(impl Activatable for $record {
            fn is_active(&self) -> bool {
                self.active
            }
        })+
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    #[serde(flatten)]
    pub info: NameInfo,
}

impl Decode for Department {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "department")?;
        Ok(Self {
            info: NameInfo::decode(object)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    #[serde(flatten)]
    pub info: NameInfo,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Decode for Holiday {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "holiday")?;
        Ok(Self {
            info: NameInfo::decode(object)?,
            start_date: required_date(object, "startDate")?,
            end_date: required_date(object, "endDate")?,
        })
    }
}

impl Holiday {
    /// True if `date` falls within the holiday, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A school class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Klasse {
    #[serde(flatten)]
    pub info: NameInfo,
    pub active: bool,
}

impl Decode for Klasse {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "klasse")?;
        Ok(Self {
            info: NameInfo::decode(object)?,
            active: required_bool(object, "active")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    #[serde(flatten)]
    pub info: NameInfo,
    pub active: bool,
    pub building: String,
}

impl Decode for Room {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "room")?;
        Ok(Self {
            info: NameInfo::decode(object)?,
            active: required_bool(object, "active")?,
            building: required_str(object, "building")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolYear {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Decode for SchoolYear {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "school year")?;
        Ok(Self {
            id: required_i64(object, "id")?,
            name: required_str(object, "name")?,
            start_date: required_date(object, "startDate")?,
            end_date: required_date(object, "endDate")?,
        })
    }
}

impl Identified for SchoolYear {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl SchoolYear {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    #[serde(flatten)]
    pub info: NameInfo,
    pub active: bool,
    pub alternate_name: String,
    #[serde(flatten)]
    pub colors: Colors,
}

impl Decode for Subject {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "subject")?;
        Ok(Self {
            info: NameInfo::decode(object)?,
            active: required_bool(object, "active")?,
            alternate_name: required_str(object, "alternateName")?,
            colors: Colors {
                back_color: required_str(object, "backColor")?,
                fore_color: required_str(object, "foreColor")?,
            },
        })
    }
}

impl Colored for Subject {
    fn colors(&self) -> &Colors {
        &self.colors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teacher {
    #[serde(flatten)]
    pub info: NameInfo,
    pub active: bool,
    pub title: String,
    pub fore_name: String,
}

impl Decode for Teacher {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "teacher")?;
        Ok(Self {
            info: NameInfo::decode(object)?,
            active: required_bool(object, "active")?,
            title: required_str(object, "title")?,
            fore_name: required_str(object, "foreName")?,
        })
    }
}

named!(Department, Holiday, Klasse, Room, Subject, Teacher);
activatable!(Klasse, Room, Subject, Teacher);

/// One period of the time grid, e.g. `"1"` from 08:00 to 08:45.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeUnit {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Decode for TimeUnit {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "time unit")?;
        Ok(Self {
            name: required_str(object, "name")?,
            start_time: required_time(object, "startTime")?,
            end_time: required_time(object, "endTime")?,
        })
    }
}

/// The periods of one weekday. `day` counts from 1 = Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimegridUnit {
    pub day: i64,
    pub time_units: ResponseList<TimeUnit>,
}

impl Decode for TimegridUnit {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "timegrid unit")?;
        // Some servers name the list `timeUnitObjects`.
        let time_units = match object.get("timeUnitObjects") {
            Some(units) if !object.contains_key("timeUnits") => units,
            _ => required(object, "timeUnits")?,
        };
        Ok(Self {
            day: required_i64(object, "day")?,
            time_units: ResponseList::decode(time_units, "timeUnits")?,
        })
    }
}

/// One entry of a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lesson {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub klasse_ids: HashSet<i64>,
    pub teacher_ids: HashSet<i64>,
    pub subject_ids: HashSet<i64>,
    pub room_ids: HashSet<i64>,
    /// `None` for a regular lesson.
    pub code: Option<LessonCode>,
    pub activity_type: String,
}

impl Decode for Lesson {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = as_object(value, "lesson")?;
        let ids = |field: &str| collapse_id_array(required(object, field)?, field);
        Ok(Self {
            date: required_date(object, "date")?,
            start_time: required_time(object, "startTime")?,
            end_time: required_time(object, "endTime")?,
            klasse_ids: ids("kl")?,
            teacher_ids: ids("te")?,
            subject_ids: ids("su")?,
            room_ids: ids("ro")?,
            code: decode_optional_enum(object, "code")?,
            activity_type: required_str(object, "activityType")?,
        })
    }
}

impl Lesson {
    pub fn is_cancelled(&self) -> bool {
        self.code == Some(LessonCode::Cancelled)
    }
}

/// When data was last imported into the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatestImportTime {
    /// Milliseconds since the Unix epoch.
    pub millis: i64,
}

impl Decode for LatestImportTime {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let millis = value.as_i64().ok_or_else(|| DecodeError::WrongType {
            field: "result".to_string(),
            expected: "integer",
        })?;
        Ok(Self { millis })
    }
}

impl LatestImportTime {
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.millis)
    }
}

pub type Departments = ResponseList<Department>;
pub type Holidays = ResponseList<Holiday>;
pub type Klassen = ResponseList<Klasse>;
pub type Rooms = ResponseList<Room>;
pub type SchoolYears = ResponseList<SchoolYear>;
pub type Subjects = ResponseList<Subject>;
pub type Teachers = ResponseList<Teacher>;
pub type TimeUnits = ResponseList<TimeUnit>;
pub type TimegridUnits = ResponseList<TimegridUnit>;
pub type Timetable = ResponseList<Lesson>;

impl Rooms {
    pub fn find_by_building(&self, building: &str) -> Option<&Room> {
        self.find(|room| room.building == building)
    }

    pub fn search_by_building(&self, building: &str) -> Self {
        self.filter(|room| room.building == building)
    }
}

impl Subjects {
    pub fn find_by_alternate_name(&self, alternate_name: &str) -> Option<&Subject> {
        self.find(|subject| subject.alternate_name == alternate_name)
    }
}

impl Teachers {
    pub fn search_by_fore_name(&self, fragment: &str) -> Self {
        self.filter(|teacher| teacher.fore_name.contains(fragment))
    }
}

impl Holidays {
    pub fn containing(&self, date: NaiveDate) -> Self {
        self.filter(|holiday| holiday.contains(date))
    }
}

impl SchoolYears {
    pub fn find_by_start_date(&self, date: NaiveDate) -> Option<&SchoolYear> {
        self.find(|year| year.start_date == date)
    }

    pub fn find_by_end_date(&self, date: NaiveDate) -> Option<&SchoolYear> {
        self.find(|year| year.end_date == date)
    }

    pub fn containing(&self, date: NaiveDate) -> Option<&SchoolYear> {
        self.find(|year| year.contains(date))
    }
}

impl TimegridUnits {
    pub fn for_day(&self, day: i64) -> Option<&TimegridUnit> {
        self.find(|unit| unit.day == day)
    }
}

impl Timetable {
    pub fn on_date(&self, date: NaiveDate) -> Self {
        self.filter(|lesson| lesson.date == date)
    }

    pub fn with_klasse(&self, id: i64) -> Self {
        self.filter(|lesson| lesson.klasse_ids.contains(&id))
    }

    pub fn with_teacher(&self, id: i64) -> Self {
        self.filter(|lesson| lesson.teacher_ids.contains(&id))
    }

    pub fn with_subject(&self, id: i64) -> Self {
        self.filter(|lesson| lesson.subject_ids.contains(&id))
    }

    pub fn with_room(&self, id: i64) -> Self {
        self.filter(|lesson| lesson.room_ids.contains(&id))
    }

    pub fn cancelled(&self) -> Self {
        self.filter(Lesson::is_cancelled)
    }

    /// Lessons ordered by day and start time. The server does not sort.
    pub fn sorted(&self) -> Self {
        let mut lessons = self.to_vec();
        lessons.sort_by_key(|lesson| (lesson.date, lesson.start_time));
        Self::new(lessons)
    }
}
