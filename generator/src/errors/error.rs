use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error { kind }
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// The kind of an error that can occur.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("Constraint `{constraint}` on table `{table}` has unsupported kind `{kind}`.")]
    UnsupportedConstraint {
        table: String,
        constraint: String,
        kind: String,
    },
    #[error("Cannot allocate a name from an empty identifier ({context}).")]
    EmptyIdentifier { context: String },
    #[error("Constraint `{constraint}` on table `{table}` is malformed: {reason}.")]
    MalformedConstraint {
        table: String,
        constraint: String,
        reason: String,
    },
    #[error("Table `{table}` referenced from `{referenced_by}` does not exist.")]
    UnknownTable { table: String, referenced_by: String },
    #[error("Column `{column}` not found within table `{table}`.")]
    UnknownColumn { table: String, column: String },
    #[error("Table `{table}` is defined more than once.")]
    DuplicateTable { table: String },
    #[error("Column `{column}` is defined more than once in table `{table}`.")]
    DuplicateColumn { table: String, column: String },
    #[error("Schema input is not valid: {0}")]
    InvalidSchema(String),
    #[error("Options are not valid: {0}")]
    InvalidOptions(String),
}
