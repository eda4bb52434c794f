//! Logged-in access to a WebUntis school.
//!
//! # Design
//! A `Session` only exists while authenticated: `login` is the constructor
//! and `logout` consumes it. Reads borrow the session immutably and
//! `refresh` needs `&mut self`, so a refresh can never interleave with a
//! read on the same session.
//!
//! Every read follows the same pipeline: build params, `RequestManager::call`,
//! turn an error envelope into `UntisError::Api`, decode the result.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::{ClientConfig, Credentials};
use crate::decode::encode_date;
use crate::envelope::ResponseEnvelope;
use crate::error::UntisError;
use crate::http::{Transport, UreqTransport};
use crate::method::Method;
use crate::records::{
    Departments, Holidays, Klassen, LatestImportTime, Rooms, SchoolYear, SchoolYears, Subjects, Teachers,
    TimegridUnits, Timetable,
};
use crate::request::{RequestManager, SessionInfo};
use crate::types::{Decode, ElementType, ResponseList};

pub struct Session {
    credentials: Credentials,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    manager: RequestManager,
}

impl Session {
    /// Log in over HTTPS with the default configuration.
    pub fn login(credentials: Credentials) -> Result<Self, UntisError> {
        let config = ClientConfig::default();
        let transport = Arc::new(UreqTransport::new(config.timeout));
        Self::login_with(credentials, config, transport)
    }

    pub fn login_with(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, UntisError> {
        let manager = authenticate(&credentials, &config, &transport)?;
        info!(
            school = credentials.school_name(),
            user = credentials.username(),
            "logged in"
        );
        Ok(Self {
            credentials,
            config,
            transport,
            manager,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The session the server issued on the last successful login.
    pub fn session_info(&self) -> Option<&SessionInfo> {
        self.manager.session()
    }

    /// Log out and log in again with the stored credentials.
    ///
    /// The current request manager is only replaced once the new login has
    /// succeeded. If it fails the error is `LoginFailure` and the old
    /// manager stays installed, although the server has already ended its
    /// session.
    pub fn refresh(&mut self) -> Result<(), UntisError> {
        self.send_logout()?;
        self.manager = authenticate(&self.credentials, &self.config, &self.transport)?;
        info!(school = self.credentials.school_name(), "session refreshed");
        Ok(())
    }

    /// End the session. Only a transport failure is reported; the server
    /// refusing the logout is logged and ignored.
    pub fn logout(self) -> Result<(), UntisError> {
        self.send_logout()?;
        info!(school = self.credentials.school_name(), "logged out");
        Ok(())
    }

    fn send_logout(&self) -> Result<(), UntisError> {
        let envelope = self.manager.call(Method::Logout.wire_name(), json!({}))?;
        if let Some(message) = envelope.error_message() {
            warn!(reason = message, "logout rejected by server");
        }
        Ok(())
    }

    fn fetch(&self, method: Method, params: Value) -> Result<Value, UntisError> {
        self.manager.call(method.wire_name(), params)?.into_result()
    }

    fn fetch_list<T: Decode>(&self, method: Method, params: Value) -> Result<ResponseList<T>, UntisError> {
        let result = self.fetch(method, params)?;
        Ok(ResponseList::decode(&result, method.wire_name())?)
    }

    pub fn get_departments(&self) -> Result<Departments, UntisError> {
        self.fetch_list(Method::GetDepartments, json!({}))
    }

    pub fn get_holidays(&self) -> Result<Holidays, UntisError> {
        self.fetch_list(Method::GetHolidays, json!({}))
    }

    /// Classes of the current school year, or of `schoolyear_id`.
    pub fn get_klassen(&self, schoolyear_id: Option<i64>) -> Result<Klassen, UntisError> {
        let params = match schoolyear_id {
            Some(id) => json!({ "schoolyearId": id }),
            None => json!({}),
        };
        self.fetch_list(Method::GetKlassen, params)
    }

    pub fn get_rooms(&self) -> Result<Rooms, UntisError> {
        self.fetch_list(Method::GetRooms, json!({}))
    }

    pub fn get_school_years(&self) -> Result<SchoolYears, UntisError> {
        self.fetch_list(Method::GetSchoolYears, json!({}))
    }

    pub fn get_current_school_year(&self) -> Result<SchoolYear, UntisError> {
        let result = self.fetch(Method::GetCurrentSchoolYear, json!({}))?;
        Ok(SchoolYear::decode(&result)?)
    }

    pub fn get_subjects(&self) -> Result<Subjects, UntisError> {
        self.fetch_list(Method::GetSubjects, json!({}))
    }

    pub fn get_teachers(&self) -> Result<Teachers, UntisError> {
        self.fetch_list(Method::GetTeachers, json!({}))
    }

    pub fn get_timegrid_units(&self) -> Result<TimegridUnits, UntisError> {
        self.fetch_list(Method::GetTimegridUnits, json!({}))
    }

    pub fn get_latest_import_time(&self) -> Result<LatestImportTime, UntisError> {
        let result = self.fetch(Method::GetLatestImportTime, json!({}))?;
        Ok(LatestImportTime::decode(&result)?)
    }

    /// Lessons of one klasse, teacher, subject, room or student between two
    /// dates, both inclusive.
    pub fn get_timetable(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        element_type: ElementType,
        id: i64,
    ) -> Result<Timetable, UntisError> {
        check_range(start, end)?;
        self.fetch_list(
            Method::GetTimetable,
            json!({
                "startDate": encode_date(start),
                "endDate": encode_date(end),
                "type": element_type.code(),
                "id": id,
            }),
        )
    }

    pub fn get_status_data(&self) -> Result<Value, UntisError> {
        self.fetch(Method::GetStatusData, json!({}))
    }

    pub fn get_exam_types(&self) -> Result<Value, UntisError> {
        self.fetch(Method::GetExamTypes, json!({}))
    }

    pub fn get_exams(&self, start: NaiveDate, end: NaiveDate, exam_type_id: i64) -> Result<Value, UntisError> {
        self.fetch(
            Method::GetExams,
            json!({
                "startDate": encode_date(start),
                "endDate": encode_date(end),
                "examTypeId": exam_type_id,
            }),
        )
    }

    pub fn get_class_reg_categories(&self) -> Result<Value, UntisError> {
        self.fetch(Method::GetClassRegCategories, json!({}))
    }

    pub fn get_class_reg_category_groups(&self) -> Result<Value, UntisError> {
        self.fetch(Method::GetClassRegCategoryGroups, json!({}))
    }

    /// Class register events, optionally limited to one element.
    pub fn get_class_reg_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        element: Option<(ElementType, i64)>,
    ) -> Result<Value, UntisError> {
        check_range(start, end)?;
        let mut params = json!({
            "startDate": encode_date(start),
            "endDate": encode_date(end),
        });
        if let Some((element_type, id)) = element {
            params["type"] = json!(element_type.code());
            params["id"] = json!(id);
        }
        self.fetch(Method::GetClassRegEvents, params)
    }

    /// Timetable of the logged in student including absences.
    pub fn get_timetable_with_absence(&self, start: NaiveDate, end: NaiveDate) -> Result<Value, UntisError> {
        self.fetch(
            Method::GetTimetableWithAbsence,
            json!({
                "options": {
                    "startDate": encode_date(start),
                    "endDate": encode_date(end),
                }
            }),
        )
    }

    /// Call any method. The envelope is returned whether or not it is an
    /// error; only transport failures are raised.
    pub fn get_custom_data(&self, method: &str, params: Option<Value>) -> Result<ResponseEnvelope, UntisError> {
        Ok(self.manager.call(method, params.unwrap_or(Value::Null))?)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("manager", &self.manager)
            .finish()
    }
}

fn authenticate(
    credentials: &Credentials,
    config: &ClientConfig,
    transport: &Arc<dyn Transport>,
) -> Result<RequestManager, UntisError> {
    let mut manager = RequestManager::new(Arc::clone(transport), credentials, config);
    match manager.login(credentials.username(), credentials.password(), credentials.user_agent())? {
        ResponseEnvelope::Success(_) => Ok(manager),
        ResponseEnvelope::Error { message, .. } => {
            warn!(school = credentials.school_name(), reason = message.as_str(), "login rejected");
            Err(UntisError::LoginFailure { message })
        }
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), UntisError> {
    if start > end {
        return Err(UntisError::InvalidDateRange { start, end });
    }
    Ok(())
}
