//! This module implements `DatetimeError`.

use alloc::borrow::Cow;
use core::fmt;

use zone_provider::ZoneProviderError;

/// `DatetimeError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Error.
    #[default]
    Generic,
    /// TypeError
    Type,
    /// RangeError
    Range,
    /// SyntaxError
    Syntax,
    /// An internal assertion failed.
    Assert,
    /// The value does not hold a representable instant.
    InvalidInstant,
    /// The time zone identifier could not be resolved.
    InvalidZoneId,
    /// The overflow correction did not settle within the precaution limit.
    OverflowConvergence,
    /// The operation has no meaning for this value.
    Unsupported,
    /// A format string could not be rendered.
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => "Error",
            Self::Type => "TypeError",
            Self::Range => "RangeError",
            Self::Syntax => "SyntaxError",
            Self::Assert => "ImplementationError",
            Self::InvalidInstant => "InvalidInstantError",
            Self::InvalidZoneId => "InvalidZoneIdError",
            Self::OverflowConvergence => "OverflowConvergenceError",
            Self::Unsupported => "UnsupportedOperationError",
            Self::Format => "FormatError",
        }
        .fmt(f)
    }
}

/// The error type for `datetime_global`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl DatetimeError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Create a generic error
    #[must_use]
    pub fn general<S>(msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self::new(ErrorKind::Generic).with_message(msg)
    }

    /// Create a range error.
    #[must_use]
    pub fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Create a type error.
    #[must_use]
    pub fn r#type() -> Self {
        Self::new(ErrorKind::Type)
    }

    /// Create a syntax error.
    #[must_use]
    pub fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Creates an assertion error
    #[must_use]
    pub(crate) fn assert() -> Self {
        Self::new(ErrorKind::Assert).with_message("Implementation error: unreachable state.")
    }

    /// The value does not hold a valid instant.
    #[must_use]
    pub fn invalid_instant() -> Self {
        Self::new(ErrorKind::InvalidInstant).with_message("Invalid Date")
    }

    #[must_use]
    pub fn invalid_zone() -> Self {
        Self::new(ErrorKind::InvalidZoneId)
    }

    #[must_use]
    pub fn convergence() -> Self {
        Self::new(ErrorKind::OverflowConvergence)
    }

    #[must_use]
    pub fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported)
    }

    #[must_use]
    pub fn format() -> Self {
        Self::new(ErrorKind::Format)
    }

    /// Add a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for DatetimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DatetimeError {}

impl From<ZoneProviderError> for DatetimeError {
    fn from(value: ZoneProviderError) -> Self {
        use alloc::string::ToString;
        match value {
            ZoneProviderError::UnknownIdentifier(_) | ZoneProviderError::Unavailable => {
                Self::invalid_zone().with_message(value.to_string())
            }
            ZoneProviderError::InstantOutOfRange => {
                Self::range().with_message(value.to_string())
            }
            ZoneProviderError::MalformedData(_) => Self::general(value.to_string()),
        }
    }
}

impl From<crate::options::ParseDiscordStyleError> for DatetimeError {
    fn from(value: crate::options::ParseDiscordStyleError) -> Self {
        use alloc::string::ToString;
        Self::format().with_message(value.to_string())
    }
}
