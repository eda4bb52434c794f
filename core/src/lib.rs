//! Blocking client for the WebUntis JSON-RPC API.
//!
//! # Overview
//! `Session::login` authenticates against a school and returns a session
//! with one method per API operation. Each operation is a single POST of a
//! JSON-RPC envelope; the answer is classified as success or error and the
//! result decoded into typed records.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use untis_core::{Credentials, ElementType, Session};
//!
//! # fn main() -> Result<(), untis_core::UntisError> {
//! let credentials = Credentials::new("mese.webuntis.com", "demo-school", "student", "secret")
//!     .with_user_agent("my-app");
//! let session = Session::login(credentials)?;
//! let klasse = session.get_klassen(None)?.find_by_name("5a").cloned();
//! if let Some(klasse) = klasse {
//!     let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
//!     let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//!     let week = session.get_timetable(monday, friday, ElementType::Klasse, klasse.info.id)?;
//!     println!("{} lessons", week.len());
//! }
//! session.logout()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `RequestManager` builds requests and classifies envelopes without
//!   raising; `Session` decides what is an error.
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   default, tests plug in canned responses.
//! - `decode` holds the field decoders for the server's integer dates,
//!   unpadded times, optional codes and id arrays.

pub mod config;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod http;
pub mod method;
pub mod records;
pub mod request;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::{ClientConfig, Credentials};
pub use envelope::ResponseEnvelope;
pub use error::{DecodeError, TransportError, UntisError};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use method::Method;
pub use records::{
    Department, Departments, Holiday, Holidays, Klasse, Klassen, LatestImportTime, Lesson, Room, Rooms, SchoolYear,
    SchoolYears, Subject, Subjects, Teacher, Teachers, TimeUnit, TimeUnits, TimegridUnit, TimegridUnits, Timetable,
};
pub use request::{RequestManager, SessionInfo};
pub use session::Session;
pub use types::{
    Activatable, Colored, Colors, Decode, ElementType, Identified, LessonCode, NameInfo, Named, ResponseList,
};
