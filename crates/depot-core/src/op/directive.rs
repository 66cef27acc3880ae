use crate::{Error, op::QueryOp};
use serde::{Deserialize, Serialize};

///
/// Directive
///
/// Shapes a query result rather than filtering it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Directive {
    Asc,
    Desc,
    Limit(usize),
    /// Continuation token returned by a previous page.
    Page(String),
}

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

///
/// QueryDirectives
///
/// Directives of one query call folded together. For each kind the last
/// directive supplied wins.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryDirectives {
    pub order: Option<Direction>,
    pub limit: Option<usize>,
    pub page: Option<String>,
}

impl QueryDirectives {
    /// Fold the directives in `ops` for a query on index `kind`.
    ///
    /// An order directive needs a sort field to order by.
    pub fn resolve(kind: &str, ops: &[QueryOp], sort_field: Option<&str>) -> Result<Self, Error> {
        let mut directives = Self::default();

        for directive in ops.iter().filter_map(QueryOp::as_directive) {
            match directive {
                Directive::Asc => directives.order = Some(Direction::Asc),
                Directive::Desc => directives.order = Some(Direction::Desc),
                Directive::Limit(n) => directives.limit = Some(*n),
                Directive::Page(token) => directives.page = Some(token.clone()),
            }
        }

        if directives.order.is_some() && sort_field.is_none() {
            return Err(Error::NoSortField {
                kind: kind.to_string(),
            });
        }

        Ok(directives)
    }
}
