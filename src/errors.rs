use std::fmt;

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration file missing or malformed. Fatal before any connection
    /// attempt is made.
    Config(String),
    /// The gateway connection could not be established or was lost.
    Connection(String),
    /// A single fetch failed while the connection is otherwise healthy.
    /// Recovered by retrying on the next refresh cycle.
    Transient(String),
    /// Fetched data did not have the shape the renderer expects. Recovered
    /// with a placeholder instead of a chart or value.
    Render(String),
    Io(std::io::Error),
}

impl Error {
    /// Fatal errors abort the process; the rest are recovered in place.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Connection(_))
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(message) => write!(f, "configuration error: {message}"),
            Error::Connection(message) => write!(f, "connection error: {message}"),
            Error::Transient(message) => write!(f, "fetch failed: {message}"),
            Error::Render(message) => write!(f, "render error: {message}"),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Error {
        Error::Config(err.to_string())
    }
}

impl From<ibapi::Error> for Error {
    fn from(err: ibapi::Error) -> Error {
        match err {
            err @ (ibapi::Error::ConnectionFailed | ibapi::Error::ConnectionReset | ibapi::Error::Shutdown) => {
                Error::Connection(err.to_string())
            }
            err => Error::Transient(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failures_are_fatal() {
        // ConnectionReset and Shutdown are what a subscription reports when
        // the gateway drops mid-drain; all three must end the monitor loop.
        let gateway_errors = [ibapi::Error::ConnectionFailed, ibapi::Error::ConnectionReset, ibapi::Error::Shutdown];

        for gateway_error in gateway_errors {
            let error = Error::from(gateway_error);
            assert!(matches!(error, Error::Connection(_)), "expected Connection, got {error:?}");
            assert!(error.is_fatal());
        }
    }

    #[test]
    fn test_other_gateway_errors_are_transient() {
        let error = Error::from(ibapi::Error::Simple("pacing violation".to_string()));
        assert!(matches!(error, Error::Transient(_)), "expected Transient, got {error:?}");
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_display_includes_cause() {
        let error = Error::Config("missing field `host`".to_string());
        assert_eq!(error.to_string(), "configuration error: missing field `host`");
    }
}
