//! Result codes and the `<result>` element of a response.

use std::fmt;

use serde::Serialize;

/// Numeric `<result code="...">` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ResultCode(pub u16);

/// Coarse classification of a result code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 1000: command completed
    Completed,
    /// 1001: command accepted, action pending
    Pending,
    /// 1300: no messages in the poll queue
    NoMessages,
    /// 1301: message returned, acknowledge to dequeue
    AckToDequeue,
    /// 1500: command completed, session ending
    EndingSession,
    /// Any other code in 1000..=1999
    OtherSuccess,
    /// 2000 and above
    Failure,
}

impl ResultCode {
    pub const COMPLETED: Self = Self(1000);
    pub const PENDING: Self = Self(1001);
    pub const NO_MESSAGES: Self = Self(1300);
    pub const ACK_TO_DEQUEUE: Self = Self(1301);
    pub const ENDING_SESSION: Self = Self(1500);
    pub const OBJECT_DOES_NOT_EXIST: Self = Self(2303);

    #[must_use]
    pub fn is_success(self) -> bool {
        (1000..2000).contains(&self.0)
    }

    #[must_use]
    pub fn is_failure(self) -> bool {
        self.0 >= 2000
    }

    #[must_use]
    pub fn outcome(self) -> Outcome {
        match self.0 {
            1000 => Outcome::Completed,
            1001 => Outcome::Pending,
            1300 => Outcome::NoMessages,
            1301 => Outcome::AckToDequeue,
            1500 => Outcome::EndingSession,
            1000..=1999 => Outcome::OtherSuccess,
            _ => Outcome::Failure,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `extValue` diagnostic: the offending element and the server's reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtValue {
    pub value: String,
    pub reason: String,
}

/// Decoded `<result>` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EppResult {
    pub code: ResultCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<ExtValue>,
}

impl EppResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

impl fmt::Display for EppResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)?;
        for r in &self.reasons {
            write!(f, " ({}: {})", r.value, r.reason)?;
        }
        Ok(())
    }
}
