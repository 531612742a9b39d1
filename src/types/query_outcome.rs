/// Result of a single catalog or data query.
///
/// `NotFound` is kept apart from `Error` so callers can treat a missing
/// relation as an expected answer instead of a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Ok(T),
    NotFound,
    Error(String),
}

impl<T> QueryOutcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            QueryOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, QueryOutcome::Ok(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryOutcome::NotFound)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Ok(value) => QueryOutcome::Ok(f(value)),
            QueryOutcome::NotFound => QueryOutcome::NotFound,
            QueryOutcome::Error(detail) => QueryOutcome::Error(detail),
        }
    }

    /// Short description of a non-`Ok` outcome, for log lines.
    pub fn failure_detail(&self) -> Option<String> {
        match self {
            QueryOutcome::Ok(_) => None,
            QueryOutcome::NotFound => Some("relation does not exist".to_string()),
            QueryOutcome::Error(detail) => Some(detail.clone()),
        }
    }
}
