pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when resolving a handle.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    status: Option<u16>,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be sent or the response could not be read.
    IO,
    /// The server answered with an HTTP status the handle API does not use.
    Status,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// The handle API answered with a response code other than success.
    Api,
    /// An error when an operation has failed to return a value.
    NoValue,
    /// The handle value has a type that cannot be turned into a URL.
    UnexpectedType,
    /// The resolver could not be built from the given options.
    Config,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            status: None,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            status: None,
            message: None,
            source: Some(source.into()),
        }
    }

    pub(crate) fn unexpected_status(status: u16, reason: &str) -> Self {
        Self {
            kind: ErrorKind::Status,
            status: Some(status),
            message: Some(format!("{status} {reason}")),
            source: None,
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The HTTP status code for errors of kind [`ErrorKind::Status`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::IO => f.write_str("IO error")?,
            ErrorKind::Status => f.write_str("Unexpected status error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::Api => f.write_str("Handle API error")?,
            ErrorKind::NoValue => f.write_str("No value error")?,
            ErrorKind::UnexpectedType => f.write_str("Unexpected value type error")?,
            ErrorKind::Config => f.write_str("Configuration error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_includes_kind_message_and_cause() {
        let err = Error::new(ErrorKind::NoValue, "Handle has no values");
        assert_eq!("No value error: Handle has no values", err.to_string());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = Error::wrap(ErrorKind::IO, io);
        assert_eq!("IO error: caused by connection reset", err.to_string());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unexpected_status_keeps_code() {
        let err = Error::unexpected_status(503, "Service Unavailable");
        assert_eq!(ErrorKind::Status, err.kind());
        assert_eq!(Some(503), err.status());
        assert_eq!(
            "Unexpected status error: 503 Service Unavailable",
            err.to_string()
        );
    }
}
