//! JSON-RPC method names.

use std::fmt;

/// Every operation the client issues, mapped to its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Login,
    Logout,
    GetTimetable,
    GetTimetableWithAbsence,
    GetRooms,
    GetTeachers,
    GetSubjects,
    GetKlassen,
    GetDepartments,
    GetHolidays,
    GetSchoolYears,
    GetCurrentSchoolYear,
    GetTimegridUnits,
    GetStatusData,
    GetLatestImportTime,
    GetExamTypes,
    GetExams,
    GetClassRegCategories,
    GetClassRegCategoryGroups,
    GetClassRegEvents,
}

impl Method {
    pub const fn wire_name(self) -> &'static str {
        match self {
            Method::Login => "authenticate",
            Method::Logout => "logout",
            Method::GetTimetable => "getTimetable",
            Method::GetTimetableWithAbsence => "getTimetableWithAbsences",
            Method::GetRooms => "getRooms",
            Method::GetTeachers => "getTeachers",
            Method::GetSubjects => "getSubjects",
            Method::GetKlassen => "getKlassen",
            Method::GetDepartments => "getDepartments",
            Method::GetHolidays => "getHolidays",
            Method::GetSchoolYears => "getSchoolyears",
            Method::GetCurrentSchoolYear => "getCurrentSchoolyear",
            Method::GetTimegridUnits => "getTimegridUnits",
            Method::GetStatusData => "getStatusData",
            Method::GetLatestImportTime => "getLatestImportTime",
            Method::GetExamTypes => "getExamTypes",
            Method::GetExams => "getExams",
            Method::GetClassRegCategories => "getClassregCategories",
            Method::GetClassRegCategoryGroups => "getClassregCategoryGroups",
            Method::GetClassRegEvents => "getClassregEvents",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
