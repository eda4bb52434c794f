//! Enumerations, shared field groups and the ordered record list.
//!
//! # Design
//! Records share small groups of fields rather than a base type: most
//! carry an id with a short and a long name (`NameInfo`), some an active
//! flag, subjects a pair of colours. The `Identified`, `Named`,
//! `Activatable` and `Colored` traits expose those groups so
//! `ResponseList` can offer the same search helpers to every record that
//! has them. School years have an id and a name but no long name, so they
//! are `Identified` without being `Named`.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{as_array, required_i64, required_str, WireEnum};
use crate::error::DecodeError;

/// The dimension a timetable or class register query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    Klasse,
    Teacher,
    Subject,
    Room,
    Student,
}

impl ElementType {
    /// Numeric code used as the `type` request parameter.
    pub const fn code(self) -> i64 {
        match self {
            ElementType::Klasse => 1,
            ElementType::Teacher => 2,
            ElementType::Subject => 3,
            ElementType::Room => 4,
            ElementType::Student => 5,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ElementType::Klasse),
            2 => Some(ElementType::Teacher),
            3 => Some(ElementType::Subject),
            4 => Some(ElementType::Room),
            5 => Some(ElementType::Student),
            _ => None,
        }
    }
}

/// Why a lesson deviates from the regular timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonCode {
    Cancelled,
    Irregular,
}

impl WireEnum for LessonCode {
    const KIND: &'static str = "lesson code";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("cancelled", LessonCode::Cancelled),
        ("irregular", LessonCode::Irregular),
    ];
}

/// Id, short name and long name, shared by most master data records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameInfo {
    pub id: i64,
    pub name: String,
    pub long_name: String,
}

impl NameInfo {
    pub(crate) fn decode(object: &serde_json::Map<String, Value>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: required_i64(object, "id")?,
            name: required_str(object, "name")?,
            long_name: required_str(object, "longName")?,
        })
    }
}

/// Foreground and background colour as sent by the server (hex, no `#`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Colors {
    pub back_color: String,
    pub fore_color: String,
}

/// Records with a numeric id and a short name.
pub trait Identified {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

/// Records carrying the full `NameInfo` group.
pub trait Named: Identified {
    fn name_info(&self) -> &NameInfo;

    fn long_name(&self) -> &str {
        &self.name_info().long_name
    }
}

pub trait Activatable {
    fn is_active(&self) -> bool;
}

pub trait Colored {
    fn colors(&self) -> &Colors;

    fn back_color(&self) -> &str {
        &self.colors().back_color
    }

    fn fore_color(&self) -> &str {
        &self.colors().fore_color
    }
}

/// A record decoded from one JSON value of a result.
pub trait Decode: Sized {
    fn decode(value: &Value) -> Result<Self, DecodeError>;
}

/// Records in the order the server sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseList<T> {
    items: Vec<T>,
}

impl<T> ResponseList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// The records matching `predicate`, order kept.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        Self::new(self.items.iter().filter(|item| predicate(item)).cloned().collect())
    }

    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }
}

impl<T: Decode> ResponseList<T> {
    /// Decode every element of a JSON array result.
    pub fn decode(result: &Value, what: &'static str) -> Result<Self, DecodeError> {
        as_array(result, what)?
            .iter()
            .map(T::decode)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl<T: Identified + Clone> ResponseList<T> {
    pub fn find_by_id(&self, id: i64) -> Option<&T> {
        self.find(|item| item.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        self.find(|item| item.name() == name)
    }

    /// Records whose short name contains `fragment`.
    pub fn search_by_name(&self, fragment: &str) -> Self {
        self.filter(|item| item.name().contains(fragment))
    }
}

impl<T: Named + Clone> ResponseList<T> {
    pub fn find_by_long_name(&self, long_name: &str) -> Option<&T> {
        self.find(|item| item.long_name() == long_name)
    }
}

impl<T: Activatable + Clone> ResponseList<T> {
    pub fn active(&self) -> Self {
        self.filter(|item| item.is_active())
    }
}

impl<T> Default for ResponseList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Deref for ResponseList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> FromIterator<T> for ResponseList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for ResponseList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResponseList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
