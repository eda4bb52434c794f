//! Full session lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives a `Session` over
//! real HTTP with `UreqTransport`. Validates request building, cookie
//! handling and result decoding end-to-end.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use untis_core::{
    ClientConfig, Credentials, ElementType, Identified, LessonCode, Named, Session, TransportError, UntisError,
    UreqTransport,
};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn credentials(addr: SocketAddr, password: &str) -> Credentials {
    Credentials::new(&format!("http://{addr}"), mock_server::SCHOOL, mock_server::USER, password)
        .with_user_agent("untis-core tests")
}

fn connect(credentials: Credentials) -> Result<Session, UntisError> {
    let config = ClientConfig::default();
    let transport = Arc::new(UreqTransport::new(config.timeout));
    Session::login_with(credentials, config, transport)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn session_lifecycle() {
    let addr = start_server();

    // Step 1: log in.
    let mut session = connect(credentials(addr, mock_server::PASSWORD)).unwrap();
    let info = session.session_info().unwrap().clone();
    assert_eq!(info.person_id, Some(mock_server::PERSON_ID));
    assert_eq!(info.klasse_id, Some(mock_server::KLASSE_ID));

    // Step 2: master data.
    let rooms = session.get_rooms().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms.find_by_building("Annex").unwrap().name(), "LAB");

    let klassen = session.get_klassen(None).unwrap();
    assert_eq!(klassen.active().len(), 2);
    let five_a = klassen.find_by_name("5a").unwrap().id();

    let teachers = session.get_teachers().unwrap();
    assert_eq!(teachers.search_by_fore_name("Ann").len(), 1);

    let subjects = session.get_subjects().unwrap();
    assert_eq!(subjects.find_by_alternate_name("EN").unwrap().long_name(), "English");

    let years = session.get_school_years().unwrap();
    let current = session.get_current_school_year().unwrap();
    assert_eq!(years.containing(date(2024, 3, 11)), Some(&current));
    assert_eq!(years.find_by_id(current.id).unwrap().name(), "2023/2024");

    let holidays = session.get_holidays().unwrap();
    assert_eq!(holidays.containing(date(2024, 3, 28)).len(), 1);

    assert_eq!(session.get_departments().unwrap().len(), 2);

    let grid = session.get_timegrid_units().unwrap();
    // Day 1 is Sunday; the demo school teaches Monday to Friday.
    assert!(grid.for_day(1).is_none());
    let monday = grid.for_day(2).unwrap();
    assert_eq!(monday.time_units[0].start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());

    let imported = session.get_latest_import_time().unwrap();
    assert_eq!(imported.millis, 1_710_144_000_000);

    // Step 3: timetable with decoded times, codes and collapsed ids.
    let week = session
        .get_timetable(date(2024, 3, 11), date(2024, 3, 15), ElementType::Klasse, five_a)
        .unwrap();
    assert_eq!(week.len(), 3);
    let first = week.sorted().into_vec().remove(0);
    assert_eq!(first.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert_eq!(first.end_time, NaiveTime::from_hms_opt(8, 45, 0).unwrap());
    assert_eq!(first.klasse_ids.len(), 1);
    assert_eq!(week.cancelled().len(), 1);
    assert!(week.iter().any(|l| l.code == Some(LessonCode::Irregular)));

    // Step 4: raw results.
    assert!(session.get_status_data().unwrap().is_object());
    assert!(session.get_exam_types().unwrap().is_array());
    assert!(session.get_exams(date(2024, 3, 11), date(2024, 3, 15), 1).unwrap().is_array());
    assert!(session.get_class_reg_categories().unwrap().is_array());
    assert!(session.get_class_reg_category_groups().unwrap().is_array());
    let events = session
        .get_class_reg_events(date(2024, 3, 11), date(2024, 3, 15), Some((ElementType::Klasse, five_a)))
        .unwrap();
    assert_eq!(events[0]["surname"], "Doe");
    let absences = session
        .get_timetable_with_absence(date(2024, 3, 11), date(2024, 3, 15))
        .unwrap();
    assert!(absences["periods"].is_array());

    // Step 5: custom calls return the envelope as is.
    let envelope = session.get_custom_data("getRooms", None).unwrap();
    assert_eq!(envelope.raw_result().unwrap().as_array().unwrap().len(), 2);
    let envelope = session.get_custom_data("getEverything", Some(json!({}))).unwrap();
    assert_eq!(envelope.error_code(), Some(-32601));

    // Step 6: refresh swaps the session token.
    session.refresh().unwrap();
    let refreshed = session.session_info().unwrap();
    assert_ne!(refreshed.session_id, info.session_id);
    assert_eq!(session.get_rooms().unwrap().len(), 2);

    // Step 7: logout.
    session.logout().unwrap();
}

#[test]
fn wrong_password_is_login_failure() {
    let addr = start_server();
    let err = connect(credentials(addr, "wrong")).unwrap_err();
    assert!(err.is_login_failure(), "got {err:?}");
}

#[test]
fn unknown_school_is_login_failure() {
    let addr = start_server();
    let credentials = Credentials::new(&format!("http://{addr}"), "nowhere", mock_server::USER, mock_server::PASSWORD);
    let err = connect(credentials).unwrap_err();
    assert!(err.is_login_failure());
}

#[test]
fn inverted_range_is_rejected_before_sending() {
    let addr = start_server();
    let session = connect(credentials(addr, mock_server::PASSWORD)).unwrap();
    let err = session
        .get_timetable(date(2024, 3, 15), date(2024, 3, 11), ElementType::Room, 1)
        .unwrap_err();
    assert!(matches!(err, UntisError::InvalidDateRange { .. }));
    session.logout().unwrap();
}

#[test]
fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let err = connect(credentials(addr, mock_server::PASSWORD)).unwrap_err();
    assert!(matches!(err, UntisError::Transport(TransportError::Request(_))), "got {err:?}");
}

#[test]
fn two_sessions_are_independent() {
    let addr = start_server();
    let a = connect(credentials(addr, mock_server::PASSWORD)).unwrap();
    let b = connect(credentials(addr, mock_server::PASSWORD)).unwrap();
    a.logout().unwrap();
    assert_eq!(b.get_rooms().unwrap().len(), 2);
    b.logout().unwrap();
}
