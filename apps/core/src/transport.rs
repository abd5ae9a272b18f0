use serde::{Deserialize, Serialize};

use crate::contract::{
    CoreRequest, CoreResponse, OpenResponse, QueryRequest, QueryResponse, ReloadRequest,
    ReloadResponse,
};
use crate::error::IngestError;
use crate::locator::BrowserContext;
use crate::model::ResultLimit;
use crate::session::{HistorySession, ReloadOutcome, SessionError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    BrowserUnsupported,
    ProfileNotFound,
    Ingest,
    Launch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(session: &HistorySession, request: CoreRequest) -> TransportResponse {
    match dispatch(session, request) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err {
            error: map_session_error(error),
        },
    }
}

pub fn handle_json(session: &HistorySession, payload: &str) -> String {
    let response = match serde_json::from_str::<CoreRequest>(payload) {
        Ok(request) => handle_request(session, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|error| {
        format!(
            "{{\"status\":\"err\",\"error\":{{\"code\":\"invalid_json\",\"message\":{:?}}}}}",
            error.to_string()
        )
    })
}

fn dispatch(session: &HistorySession, request: CoreRequest) -> Result<CoreResponse, SessionError> {
    match request {
        CoreRequest::Query(request) => query(session, request).map(CoreResponse::Query),
        CoreRequest::Reload(request) => reload(session, request).map(CoreResponse::Reload),
        CoreRequest::Open(request) => {
            session.open(&request.action)?;
            Ok(CoreResponse::Open(OpenResponse { opened: true }))
        }
    }
}

fn query(session: &HistorySession, request: QueryRequest) -> Result<QueryResponse, SessionError> {
    let Some(text) = request.query else {
        return Err(SessionError::InvalidRequest("query is required".to_string()));
    };
    let limit = match request.max_results {
        Some(value) => ResultLimit::from_setting(value).ok_or_else(|| {
            SessionError::InvalidRequest(format!("max_results must be -1 or >= 0, got {value}"))
        })?,
        None => session.settings().max_results,
    };
    Ok(QueryResponse {
        results: session.query_with_limit(&text, limit),
    })
}

fn reload(session: &HistorySession, request: ReloadRequest) -> Result<ReloadResponse, SessionError> {
    let previous = session.current_context();
    let identifier = request
        .browser
        .or_else(|| previous.as_ref().map(|c| c.identifier.clone()))
        .ok_or(SessionError::NoBrowserContext)?;

    let mut context = match &previous {
        Some(previous) => BrowserContext {
            identifier,
            ..previous.clone()
        },
        None => BrowserContext::from_env(identifier),
    };
    if let Some(local) = request.local_app_data {
        context.local_app_data = local;
    }
    if let Some(roaming) = request.roaming_app_data {
        context.roaming_app_data = roaming;
    }
    if let Some(icon_path) = request.icon_path {
        context.icon_path = icon_path;
    }

    match session.reload(&context) {
        ReloadOutcome::Reloaded(report) => Ok(ReloadResponse::from(&report)),
        ReloadOutcome::Debounced => Ok(ReloadResponse::debounced()),
        ReloadOutcome::Failed(error) => Err(SessionError::Ingest(error)),
    }
}

fn map_session_error(error: SessionError) -> ErrorResponse {
    let message = error.to_string();
    let code = match &error {
        SessionError::InvalidRequest(_) | SessionError::NoBrowserContext => ErrorCode::InvalidRequest,
        SessionError::Launch(_) => ErrorCode::Launch,
        SessionError::Ingest(IngestError::BrowserUnsupported(_)) => ErrorCode::BrowserUnsupported,
        SessionError::Ingest(IngestError::ProfileNotFound(_)) => ErrorCode::ProfileNotFound,
        SessionError::Ingest(_) => ErrorCode::Ingest,
    };
    ErrorResponse { code, message }
}
