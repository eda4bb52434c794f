//! In-process WebUntis JSON-RPC server for tests and local experiments.
//!
//! One school, one account. Sessions are kept in memory and only live as
//! long as the router.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub mod fixtures;

pub const ENDPOINT: &str = "/WebUntis/jsonrpc.do";
pub const SCHOOL: &str = "demo-school";
pub const USER: &str = "student";
pub const PASSWORD: &str = "secret";
pub const SESSION_COOKIE: &str = "JSESSIONID";

pub const PERSON_TYPE: i64 = 5;
pub const PERSON_ID: i64 = 4711;
pub const KLASSE_ID: i64 = 1;

pub const ERR_UNKNOWN_SCHOOL: i64 = -8500;
pub const ERR_BAD_CREDENTIALS: i64 = -8504;
pub const ERR_NOT_AUTHENTICATED: i64 = -8520;
pub const ERR_UNKNOWN_METHOD: i64 = -32601;
pub const ERR_INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub struct RpcCall {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

pub type Sessions = Arc<RwLock<HashSet<String>>>;

pub fn app() -> Router {
    let sessions: Sessions = Arc::new(RwLock::new(HashSet::new()));
    Router::new().route(ENDPOINT, post(rpc)).with_state(sessions)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn success(id: Value, result: Value) -> Json<Value> {
    Json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

fn failure(id: Value, code: i64, message: &str) -> Json<Value> {
    Json(json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}}))
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

fn date_param(params: &Value, field: &str) -> Option<i64> {
    params.get(field).and_then(Value::as_i64)
}

async fn rpc(
    State(sessions): State<Sessions>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(call): Json<RpcCall>,
) -> Response {
    debug!(method = call.method.as_str(), "rpc call");
    if query.get("school").map(String::as_str) != Some(SCHOOL) {
        return failure(call.id, ERR_UNKNOWN_SCHOOL, "invalid schoolname").into_response();
    }

    if call.method == "authenticate" {
        return authenticate(&sessions, call).await;
    }

    let authenticated = match session_id(&headers) {
        Some(id) => sessions.read().await.contains(id),
        None => false,
    };
    if !authenticated {
        return failure(call.id, ERR_NOT_AUTHENTICATED, "not authenticated").into_response();
    }

    let result = match call.method.as_str() {
        "logout" => {
            if let Some(id) = session_id(&headers) {
                sessions.write().await.remove(id);
            }
            Value::Null
        }
        "getDepartments" => fixtures::departments(),
        "getHolidays" => fixtures::holidays(),
        "getKlassen" => fixtures::klassen(),
        "getRooms" => fixtures::rooms(),
        "getSchoolyears" => fixtures::school_years(),
        "getCurrentSchoolyear" => fixtures::current_school_year(),
        "getSubjects" => fixtures::subjects(),
        "getTeachers" => fixtures::teachers(),
        "getTimegridUnits" => fixtures::timegrid_units(),
        "getLatestImportTime" => fixtures::latest_import_time(),
        "getStatusData" => fixtures::status_data(),
        "getExamTypes" => fixtures::exam_types(),
        "getExams" => fixtures::exams(),
        "getClassregCategories" => fixtures::class_reg_categories(),
        "getClassregCategoryGroups" => fixtures::class_reg_category_groups(),
        "getClassregEvents" => fixtures::class_reg_events(),
        "getTimetableWithAbsences" => fixtures::timetable_with_absences(),
        "getTimetable" => {
            match (date_param(&call.params, "startDate"), date_param(&call.params, "endDate")) {
                (Some(start), Some(end)) => fixtures::lessons_between(start, end),
                _ => return failure(call.id, ERR_INVALID_PARAMS, "startDate and endDate required").into_response(),
            }
        }
        _ => return failure(call.id, ERR_UNKNOWN_METHOD, "method not found").into_response(),
    };
    success(call.id, result).into_response()
}

async fn authenticate(sessions: &Sessions, call: RpcCall) -> Response {
    let user = call.params.get("user").and_then(Value::as_str);
    let password = call.params.get("password").and_then(Value::as_str);
    if user != Some(USER) || password != Some(PASSWORD) {
        return failure(call.id, ERR_BAD_CREDENTIALS, "bad credentials").into_response();
    }

    let session = Uuid::new_v4().simple().to_string().to_uppercase();
    sessions.write().await.insert(session.clone());
    let cookie = format!("{SESSION_COOKIE}={session}; Path=/WebUntis; HttpOnly");
    let result = json!({
        "sessionId": session,
        "personType": PERSON_TYPE,
        "personId": PERSON_ID,
        "klasseId": KLASSE_ID,
    });
    ([(header::SET_COOKIE, cookie)], success(call.id, result)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_call_defaults_missing_params_and_id() {
        let call: RpcCall = serde_json::from_str(r#"{"method":"getRooms"}"#).unwrap();
        assert_eq!(call.method, "getRooms");
        assert!(call.params.is_null());
        assert!(call.id.is_null());
    }

    #[test]
    fn rpc_call_rejects_missing_method() {
        let result: Result<RpcCall, _> = serde_json::from_str(r#"{"params":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn session_id_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; JSESSIONID=ABC123".parse().unwrap());
        assert_eq!(session_id(&headers), Some("ABC123"));
    }

    #[test]
    fn session_id_missing_without_cookie() {
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn lessons_between_is_inclusive() {
        let week = fixtures::lessons_between(20240311, 20240312);
        assert_eq!(week.as_array().unwrap().len(), 3);
        let none = fixtures::lessons_between(20240101, 20240102);
        assert!(none.as_array().unwrap().is_empty());
    }
}
