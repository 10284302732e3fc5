use crate::analysis::AnalysisResult;
use crate::error_code::ApiErrorCode;
use serde::{Deserialize, Serialize};

/// Lifecycle of a request. Everything but `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InvalidInput,
    NeedsClarification,
    Done,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InvalidInput => "invalid_input",
            Self::NeedsClarification => "needs_clarification",
            Self::Done => "done",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub id: String,
    pub city: String,
    pub sector: String,
    pub status: RequestStatus,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    pub suggested_cities: Vec<String>,
}

impl RequestRecord {
    pub fn pending(id: impl Into<String>, city: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            city: city.into(),
            sector: sector.into(),
            status: RequestStatus::Pending,
            result: None,
            error: None,
            suggested_cities: Vec::new(),
        }
    }

    /// Contract error code describing a terminal record, if any.
    ///
    /// A `done` record only carries an error when its result is the fallback
    /// estimate.
    pub fn error_code(&self) -> Option<ApiErrorCode> {
        match self.status {
            RequestStatus::Pending => None,
            RequestStatus::InvalidInput => Some(ApiErrorCode::InvalidInput),
            RequestStatus::NeedsClarification => Some(ApiErrorCode::NeedsClarification),
            RequestStatus::Done => self
                .error
                .as_ref()
                .map(|_| ApiErrorCode::InternalFallbackUsed),
        }
    }

    pub(crate) fn resolve(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Invalid { reason } => {
                self.status = RequestStatus::InvalidInput;
                self.result = None;
                self.error = Some(reason);
            }
            Resolution::Ambiguous { suggested_cities } => {
                self.status = RequestStatus::NeedsClarification;
                self.result = None;
                self.error = None;
                self.suggested_cities = suggested_cities;
            }
            Resolution::Analyzed { result, error } => {
                self.status = RequestStatus::Done;
                self.result = Some(result);
                self.error = error;
            }
        }
    }
}

/// Terminal outcome of one processing attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Invalid { reason: String },
    Ambiguous { suggested_cities: Vec<String> },
    Analyzed {
        result: AnalysisResult,
        error: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
    pub status: RequestStatus,
}
