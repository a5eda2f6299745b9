use crate::config::ConfigError;
use std::fmt;
use std::io;

/// Failure (or clean end) of a [`FrameSource::read()`](crate::source::FrameSource::read) call.
///
/// A stream that holds no start code at all is reported as `EndOfStream`, not as a distinct
/// error.
#[derive(Debug)]
pub enum SourceError {
    /// The frame limit was reached, or the backing stream holds no further units. Expected, and
    /// terminal.
    EndOfStream,
    /// Reading the backing stream failed. Never retried.
    Io(io::Error),
    /// `read()` was called without a preceding `start()`, or after `stop()`.
    NotStarted,
    Config(ConfigError),
}
impl SourceError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, SourceError::EndOfStream)
    }
}
impl From<io::Error> for SourceError {
    fn from(e: io::Error) -> Self {
        SourceError::Io(e)
    }
}
impl From<ConfigError> for SourceError {
    fn from(e: ConfigError) -> Self {
        SourceError::Config(e)
    }
}
impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::EndOfStream => f.write_str("end of stream"),
            SourceError::Io(e) => write!(f, "reading input failed: {}", e),
            SourceError::NotStarted => f.write_str("source has not been started"),
            SourceError::Config(e) => write!(f, "invalid source configuration: {}", e),
        }
    }
}
impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io(e) => Some(e),
            SourceError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_error_is_kept() {
        let err = SourceError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"));
        assert!(!err.is_end_of_stream());
        assert!(err.to_string().contains("truncated"));
        assert!(err.source().is_some());
    }

    #[test]
    fn end_of_stream() {
        assert!(SourceError::EndOfStream.is_end_of_stream());
        assert!(SourceError::EndOfStream.source().is_none());
    }
}
