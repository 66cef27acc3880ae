use crate::{
    Error,
    backend::{Backend, QueryPage, QueryRequest},
    entity::{EntityCondition, Key, Property, Update},
    op::{CompareOp, Direction, UpdateKind},
    value::{Value, add_values, compare_values, subtract_values},
};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::trace;

type Row = BTreeMap<String, Property>;
type Rows = BTreeMap<RowId, Row>;

///
/// RowId
///
/// Ordered identity of a stored row: each key part as its value kind plus
/// its rendering. Parts never share a string, so no separator can make two
/// keys collide.
///

type RowId = [(&'static str, String); 2];

fn row_id(key: &Key) -> RowId {
    [part_id(&key.partition.value), part_id(&key.sort.value)]
}

// Collections render through `Debug`, which quotes and escapes their text.
fn part_id(value: &Value) -> (&'static str, String) {
    let rendered = match value {
        Value::List(_) | Value::Map(_) => format!("{value:?}"),
        other => other.to_string(),
    };

    (value.kind(), rendered)
}

///
/// MemoryBackend
///
/// In-process backend over ordered maps. Rows are keyed by their `RowId`,
/// so unordered scans come back grouped by key kind and in key text order
/// within a kind. Page tokens are decimal row offsets.
///

#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Rows>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored in `table`.
    #[must_use]
    pub fn len(&self, table: &str) -> usize {
        self.read().get(table).map_or(0, BTreeMap::len)
    }

    #[must_use]
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Rows>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Rows>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn to_row(properties: Vec<Property>) -> Row {
    properties
        .into_iter()
        .map(|property| (property.name.clone(), property))
        .collect()
}

fn from_row(row: &Row) -> Vec<Property> {
    row.values().cloned().collect()
}

// Stage every update on a copy so a rejected transform leaves the row as
// it was.
fn apply_updates(row: &Row, updates: Vec<Update>) -> Result<Row, Error> {
    let mut staged = row.clone();

    for update in updates {
        let kind = update.op.as_ref().map(|op| op.kind);
        let stored = staged.get(&update.name).map(|p| &p.value);

        let value = match kind {
            Some(UpdateKind::Add | UpdateKind::Subtract) if !update.value.is_numeric() => {
                return Err(Error::InvalidTransform {
                    field: update.name,
                    reason: format!("delta of kind {} is not numeric", update.value.kind()),
                });
            }
            Some(UpdateKind::Add) => add_values(stored.unwrap_or(&Value::Null), &update.value),
            Some(UpdateKind::Subtract) => {
                subtract_values(stored.unwrap_or(&Value::Null), &update.value)
            }
            Some(UpdateKind::Force) | None => update.value,
        };

        let index = update.index;
        staged
            .entry(update.name.clone())
            .and_modify(|p| {
                p.value = value.clone();
                p.index |= index;
            })
            .or_insert_with(|| Property {
                name: update.name,
                value,
                index,
            });
    }

    Ok(staged)
}

fn row_matches(row: &Row, conditions: &[EntityCondition]) -> bool {
    conditions.iter().all(|condition| {
        let op = condition.op.as_ref().map_or(&CompareOp::Equal, |c| &c.op);

        op.matches(row.get(&condition.name).map(|p| &p.value), &condition.value)
    })
}

// Absent and null sort values order after every present value in both
// directions.
fn sort_order(left: Option<&Value>, right: Option<&Value>, order: Direction) -> Ordering {
    let left = left.filter(|v| !v.is_null());
    let right = right.filter(|v| !v.is_null());

    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => {
            let ordering = compare_values(l, r).unwrap_or(Ordering::Equal);

            match order {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        }
    }
}

fn parse_offset(token: Option<&str>) -> Result<usize, Error> {
    token.map_or(Ok(0), |token| {
        token.parse().map_err(|_| Error::InvalidPageToken {
            token: token.to_string(),
        })
    })
}

impl Backend for MemoryBackend {
    fn get(&self, table: &str, key: &Key) -> Result<Vec<Property>, Error> {
        trace!(table, %key, "memory get");

        self.read()
            .get(table)
            .and_then(|rows| rows.get(&row_id(key)))
            .map(from_row)
            .ok_or_else(|| Error::not_found(key))
    }

    fn put(&self, table: &str, key: &Key, properties: Vec<Property>) -> Result<(), Error> {
        trace!(table, %key, properties = properties.len(), "memory put");

        self.write()
            .entry(table.to_string())
            .or_default()
            .insert(row_id(key), to_row(properties));

        Ok(())
    }

    fn create(&self, table: &str, key: &Key, properties: Vec<Property>) -> Result<(), Error> {
        trace!(table, %key, properties = properties.len(), "memory create");

        let mut tables = self.write();
        let rows = tables.entry(table.to_string()).or_default();
        let id = row_id(key);
        if rows.contains_key(&id) {
            return Err(Error::already_exists(key));
        }
        rows.insert(id, to_row(properties));

        Ok(())
    }

    fn delete(&self, table: &str, key: &Key) -> Result<Option<Vec<Property>>, Error> {
        trace!(table, %key, "memory delete");

        let removed = self
            .write()
            .get_mut(table)
            .and_then(|rows| rows.remove(&row_id(key)));

        Ok(removed.as_ref().map(from_row))
    }

    fn update(&self, table: &str, key: &Key, updates: Vec<Update>) -> Result<Vec<Property>, Error> {
        trace!(table, %key, updates = updates.len(), "memory update");

        let mut tables = self.write();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(&row_id(key)))
            .ok_or_else(|| Error::not_found(key))?;

        *row = apply_updates(row, updates)?;

        Ok(from_row(row))
    }

    fn query(&self, table: &str, request: QueryRequest) -> Result<QueryPage, Error> {
        trace!(
            table,
            kind = %request.kind,
            conditions = request.conditions.len(),
            "memory query"
        );

        let offset = parse_offset(request.directives.page.as_deref())?;
        let tables = self.read();
        let Some(rows) = tables.get(table) else {
            return Ok(QueryPage::default());
        };

        let mut matched: Vec<&Row> = rows
            .values()
            .filter(|row| row_matches(row, &request.conditions))
            .collect();

        if let (Some(order), Some(sort_field)) = (request.directives.order, &request.sort_field) {
            matched.sort_by(|a, b| {
                sort_order(
                    a.get(sort_field).map(|p| &p.value),
                    b.get(sort_field).map(|p| &p.value),
                    order,
                )
            });
        }

        let total = matched.len();
        let start = offset.min(total);
        let end = request
            .directives
            .limit
            .map_or(total, |limit| start.saturating_add(limit).min(total));

        Ok(QueryPage {
            items: matched[start..end].iter().map(|row| from_row(row)).collect(),
            next: (end < total).then(|| end.to_string()),
        })
    }
}
