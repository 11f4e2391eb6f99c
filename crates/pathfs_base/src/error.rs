use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why a custom error type and not use anyhow/eyre/thiserror etc?

- Better control over error handling
- No dependencies to compile and integrate
- More transparency into error handling logic
 */

/* 📖 # Why classify I/O errors instead of returning bool/zero?

Host filesystem calls fail for very different reasons. Collapsing all of them into
`false` or `0` makes "the file is empty" indistinguishable from "the file could not
be read". Every operation returns a result, and the kind tells callers whether the
path was missing, inaccessible, already present or failed for another I/O reason.
*/

/// Error variants that can occur in pathfs operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// The path does not exist
    NotFound { path: PathBuf, source: io::Error },

    /// The host denied access to the path
    PermissionDenied { path: PathBuf, source: io::Error },

    /// The target of a create or exclusive copy already exists
    AlreadyExists { path: PathBuf, source: io::Error },

    /// Any other failure reported by the host
    Io { path: PathBuf, source: io::Error },

    /// Catch-all for other errors with a message
    Message { message: String },
}

impl ErrorKind {
    /// Classifies a host I/O error by its `io::ErrorKind`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound { path, source },
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied { path, source },
            io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists { path, source },
            _ => ErrorKind::Io { path, source },
        }
    }

    /// The host path the error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ErrorKind::NotFound { path, .. }
            | ErrorKind::PermissionDenied { path, .. }
            | ErrorKind::AlreadyExists { path, .. }
            | ErrorKind::Io { path, .. } => Some(path),
            ErrorKind::Message { .. } => None,
        }
    }

    fn io_source(&self) -> Option<&io::Error> {
        match self {
            ErrorKind::NotFound { source, .. }
            | ErrorKind::PermissionDenied { source, .. }
            | ErrorKind::AlreadyExists { source, .. }
            | ErrorKind::Io { source, .. } => Some(source),
            ErrorKind::Message { .. } => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound { path, .. } => write!(f, "Not found: {}", path.display()),
            ErrorKind::PermissionDenied { path, .. } => {
                write!(f, "Permission denied: {}", path.display())
            }
            ErrorKind::AlreadyExists { path, .. } => {
                write!(f, "Already exists: {}", path.display())
            }
            ErrorKind::Io { path, source } => {
                write!(f, "I/O error at {}: {}", path.display(), source)
            }
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }
}

/* 📖 # Why separate ErrorKind and PathfsError?
- ErrorKind: structural variants callers can match on
- PathfsError: wraps ErrorKind with context strings, an optional cause and the span trace
  captured at construction time
*/

/// Error type wrapping an [`ErrorKind`] with context, cause and span trace.
pub struct PathfsError {
    kind: ErrorKind,
    context: Vec<String>,
    cause: Option<Box<PathfsError>>,
    span_trace: SpanTrace,
}

impl PathfsError {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            cause: None,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Creates a message-only error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Creates a classified error from a host I/O failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Box<Self> {
        Box::new(Self::new(ErrorKind::from_io(path, source)))
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Records the error that led to this one.
    pub fn caused_by(mut self, cause: PathfsError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    pub fn cause(&self) -> Option<&PathfsError> {
        self.cause.as_deref()
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// Returns the innermost error in the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    /// Writes the kind and one line per context entry and cause, without a trailing newline.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let entries = self.context.len() + usize::from(self.cause.is_some());
        for (i, ctx) in self.context.iter().enumerate() {
            let branch = if i + 1 == entries { "└─" } else { "├─" };
            write!(f, "\n{indent}{branch} {ctx}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "\n{indent}└─ cause: ")?;
            cause.fmt_tree(f, &format!("{indent}   "))?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for PathfsError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for PathfsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(cause) = &self.cause {
            return Some(cause.as_ref());
        }
        self.kind
            .io_source()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

impl fmt::Display for PathfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl fmt::Debug for PathfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, "")?;
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            write!(f, "\nTrace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/* 📖 # Why use Box<PathfsError> in the result type?

Boxing the error reduces the size of the result type, making it more efficient to return in the common case.
*/

/// Standard result type for pathfs operations.
pub type PathfsResult<T> = std::result::Result<T, Box<PathfsError>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> PathfsResult<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    fn with_context<F>(self, f: F) -> PathfsResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for PathfsResult<T> {
    fn context(self, context: impl Into<String>) -> PathfsResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> PathfsResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}

/// Builds a boxed message error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::PathfsError::message(format!($($arg)*)))
    };
}

/// Returns early with a boxed message error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}
