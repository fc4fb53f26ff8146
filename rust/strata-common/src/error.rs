use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Grammar violation in a type descriptor string.
    ///
    /// `position` is the byte offset of the offending token, or `None` when the
    /// input ended while `expected` was still outstanding.
    pub fn malformed(
        expected: impl Into<String>,
        position: Option<usize>,
        input: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::MalformedTypeDescriptor {
                expected: expected.into(),
                position,
                input: input.into(),
            }
            .into(),
        )
    }

    pub fn schema_mismatch(expected: usize, actual: usize) -> Error {
        Error(ErrorKind::SchemaMismatch { expected, actual }.into())
    }

    pub fn invalid_accessor(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidAccessor {
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn decode_with_source<E>(column: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::Decode {
                column: column.into(),
                message: source.to_string(),
                source: Some(Box::new(source)),
            }
            .into(),
        )
    }

    /// Returns the reported source position for a malformed descriptor error.
    pub fn position(&self) -> Option<usize> {
        match self.kind() {
            ErrorKind::MalformedTypeDescriptor { position, .. } => *position,
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind(), ErrorKind::MalformedTypeDescriptor { .. })
    }

    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self.kind(), ErrorKind::SchemaMismatch { .. })
    }

    pub fn is_invalid_accessor(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidAccessor { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("{}", format_malformed(expected, *position, input))]
    MalformedTypeDescriptor {
        expected: String,
        position: Option<usize>,
        input: String,
    },

    #[error("schema mismatch: expected {expected} columns, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("invalid accessor: {message}")]
    InvalidAccessor { message: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("failed to decode column '{column}': {message}")]
    Decode {
        column: String,
        message: String,
        #[source]
        source: Option<StdErrorBoxed>,
    },
}

fn format_malformed(expected: &str, position: Option<usize>, input: &str) -> String {
    match position {
        Some(position) => {
            format!("error: {expected} expected at the position {position} of '{input}'")
        }
        None => format!("error: {expected} expected at the end of '{input}'"),
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
