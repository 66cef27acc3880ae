use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// FieldMode
///
/// Storage role of a field, either by default or under a named index.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum FieldMode {
    Exclude,
    OmitEmpty,
    #[default]
    Include,
    Partition,
    Sort,
}

impl FieldMode {
    #[must_use]
    pub const fn is_key(self) -> bool {
        matches!(self, Self::Partition | Self::Sort)
    }
}

///
/// IndexRole
///
/// Role a field takes when the named secondary index is queried.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexRole {
    pub name: String,
    pub mode: FieldMode,
}

///
/// Field
///
/// Storage metadata parsed from one struct field's annotation.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Field {
    /// Storage-visible name.
    pub name: String,
    pub mode: FieldMode,
    pub indexes: Vec<IndexRole>,
    /// Expiration timestamp stored as epoch seconds.
    pub ttl: bool,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: FieldMode::Include,
            indexes: Vec::new(),
            ttl: false,
        }
    }

    /// Effective mode under index `kind`; an empty kind selects the
    /// default mode.
    #[must_use]
    pub fn mode_for(&self, kind: &str) -> FieldMode {
        if kind.is_empty() {
            return self.mode;
        }

        self.indexes
            .iter()
            .find(|role| role.name == kind)
            .map_or(self.mode, |role| role.mode)
    }

    /// Whether a backend must index this field.
    ///
    /// Any override counts, including one whose mode is Exclude.
    #[must_use]
    pub fn needs_index(&self) -> bool {
        self.mode.is_key()
            || self
                .indexes
                .iter()
                .any(|role| role.mode.is_key() || role.mode == FieldMode::Exclude)
    }
}

///
/// TagError
///
/// A field annotation that cannot be parsed.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TagError {
    #[error("field '{field}': index role '{token}' must have the form index:<name>:pk|sk")]
    IndexArity { field: String, token: String },

    #[error("field '{field}': index role '{token}' has unknown mode '{mode}'")]
    IndexMode {
        field: String,
        token: String,
        mode: String,
    },
}

/// Parse the annotation of field `ident`.
///
/// `-` excludes the field. Otherwise the value is split on commas: a
/// non-empty first segment renames the field, later segments are keywords.
/// Unknown keywords are ignored.
pub fn parse_tag(ident: &str, tag: &str) -> Result<Field, TagError> {
    let mut field = Field::new(ident);

    if tag == "-" {
        field.mode = FieldMode::Exclude;
        return Ok(field);
    }

    let mut segments = tag.split(',');
    if let Some(name) = segments.next().map(str::trim)
        && !name.is_empty()
    {
        field.name = name.to_string();
    }

    for token in segments.map(str::trim) {
        match token {
            "pk" => field.mode = FieldMode::Partition,
            "sk" => field.mode = FieldMode::Sort,
            "omitempty" => field.mode = FieldMode::OmitEmpty,
            "ttl" => field.ttl = true,
            _ if token.starts_with("index:") => field.indexes.push(parse_index_role(ident, token)?),
            _ => {}
        }
    }

    Ok(field)
}

fn parse_index_role(ident: &str, token: &str) -> Result<IndexRole, TagError> {
    let parts: Vec<&str> = token.split(':').collect();
    let [_, name, mode] = parts.as_slice() else {
        return Err(TagError::IndexArity {
            field: ident.to_string(),
            token: token.to_string(),
        });
    };

    let mode = match *mode {
        "pk" => FieldMode::Partition,
        "sk" => FieldMode::Sort,
        other => {
            return Err(TagError::IndexMode {
                field: ident.to_string(),
                token: token.to_string(),
                mode: other.to_string(),
            });
        }
    };

    Ok(IndexRole {
        name: (*name).to_string(),
        mode,
    })
}
