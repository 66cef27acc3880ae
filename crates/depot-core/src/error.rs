use thiserror::Error as ThisError;

///
/// Error
///
/// Failure taxonomy shared by the mapping core, the table facade and the
/// storage backends. Backends translate their native failures into these
/// variants; nothing in the core recovers from them locally.
///

#[derive(Debug, ThisError)]
pub enum Error {
    /// The value handed to an accessor is not a mappable record.
    #[error("depot: invalid entity type: {type_name}")]
    InvalidEntityType { type_name: &'static str },

    /// An update op's delta cannot be combined with the stored value.
    #[error("depot: invalid transform on '{field}': {reason}")]
    InvalidTransform { field: String, reason: String },

    #[error("depot: entity not found: {key}")]
    EntityNotFound { key: String },

    #[error("depot: entity already exists: {key}")]
    EntityAlreadyExists { key: String },

    /// A sort directive was supplied but no field resolves to Sort for the
    /// selected index.
    #[error("depot: no sort field for index '{kind}'")]
    NoSortField { kind: String },

    /// A stored value could not be written back into its field.
    #[error("depot: field '{field}' expects {expected}, found {found}")]
    InvalidFieldValue {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("depot: invalid page token '{token}'")]
    InvalidPageToken { token: String },

    /// Backend-native failure with no counterpart in this taxonomy.
    #[error("depot: backend failure: {message}")]
    Backend { message: String },
}

impl Error {
    pub fn not_found(key: impl ToString) -> Self {
        Self::EntityNotFound {
            key: key.to_string(),
        }
    }

    pub fn already_exists(key: impl ToString) -> Self {
        Self::EntityAlreadyExists {
            key: key.to_string(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound { .. })
    }

    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::EntityAlreadyExists { .. })
    }
}
