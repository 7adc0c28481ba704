use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::codemaker::{ClientError, JobHandle};
use crate::language::Language;

/// What the language registry could not map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    Extension(String),
    Language(Language),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::Extension(ext) => write!(f, "the file extension {ext:?} is not supported"),
            Unsupported::Language(lang) => write!(f, "the language {lang} is not supported"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodemakerError {
    #[error("{0}")]
    UnsupportedLanguage(Unsupported),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("job submission failed: {0}")]
    Submission(#[source] ClientError),

    #[error("transport error: {0}")]
    Transport(#[source] ClientError),

    #[error("job {0} failed on the service")]
    ServiceProcessingFailed(JobHandle),

    #[error("job {0} timed out on the service")]
    ServiceTimedOut(JobHandle),

    #[error("job {handle} still not finished after {elapsed:?}")]
    ClientTimedOut { handle: JobHandle, elapsed: Duration },

    #[error("job {0} was cancelled before completion")]
    Cancelled(JobHandle),

    #[error("interrupted before the job was submitted")]
    Interrupted,

    #[error("invalid file pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodemakerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// A user stop request. Ends the batch whatever its policy.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Cancelled(_) | Self::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_display() {
        let err = CodemakerError::UnsupportedLanguage(Unsupported::Extension(".xyz".into()));
        assert_eq!(err.to_string(), "the file extension \".xyz\" is not supported");
        let err = CodemakerError::UnsupportedLanguage(Unsupported::Language(Language::Kotlin));
        assert_eq!(err.to_string(), "the language KOTLIN is not supported");
    }

    #[test]
    fn client_timeout_is_distinct_from_service_timeout() {
        let handle = JobHandle::new("job-1");
        let client = CodemakerError::ClientTimedOut {
            handle: handle.clone(),
            elapsed: Duration::from_secs(600),
        };
        let service = CodemakerError::ServiceTimedOut(handle);
        assert_eq!(client.to_string(), "job job-1 still not finished after 600s");
        assert_eq!(service.to_string(), "job job-1 timed out on the service");
    }

    #[test]
    fn only_stop_requests_are_interrupts() {
        assert!(CodemakerError::Interrupted.is_interrupt());
        assert!(CodemakerError::Cancelled(JobHandle::new("j")).is_interrupt());
        assert!(!CodemakerError::ServiceProcessingFailed(JobHandle::new("j")).is_interrupt());
    }

    #[test]
    fn io_error_names_the_path() {
        let err = CodemakerError::io(
            "src/Foo.java",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "src/Foo.java: missing");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CodemakerError>();
    }
}
