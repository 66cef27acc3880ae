use super::*;
use crate::{
    backend::{MemoryBackend, QueryPage},
    entity::{Key, KeyPart, Update},
    op::{add, asc, equal, limit},
    test_fixtures::Widget,
    value::Value,
};
use chrono::DateTime;
use std::sync::Arc;

fn table() -> (Arc<MemoryBackend>, Table<Widget, Arc<MemoryBackend>>) {
    let backend = Arc::new(MemoryBackend::new());
    let table = Table::new(Arc::clone(&backend), "widgets");

    (backend, table)
}

fn widget_key(tenant: &str, id: &str) -> Key {
    Key {
        partition: KeyPart {
            name: "tenantId".to_string(),
            value: tenant.into(),
        },
        sort: KeyPart {
            name: "id".to_string(),
            value: id.into(),
        },
    }
}

#[test]
fn config_deserializes_with_defaults() {
    let config: TableConfig = serde_json::from_str(r#"{"default_limit": 25}"#).unwrap();

    assert_eq!(
        config,
        TableConfig::default().with_default_limit(Some(25))
    );
    assert!(!config.convert_ttl);

    let empty: TableConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, TableConfig::default());
}

#[test]
fn put_then_get_hydrates_stored_values() {
    let (_, table) = table();
    let mut widget = Widget::keyed("t1", "w1");
    widget.name = "gear".to_string();
    widget.exclude = "local only".to_string();
    table.put(&widget).unwrap();

    let found = table.get(&Widget::keyed("t1", "w1")).unwrap();

    assert_eq!(found.name, "gear");
    assert_eq!(found.exclude, "");
}

#[test]
fn convert_ttl_stores_timestamps() {
    let (backend, table) = table();
    let table = table.with_config(TableConfig::default().with_convert_ttl(true));
    let mut widget = Widget::keyed("t1", "w1");
    widget.ttl = 1_700_000_000;

    table.put(&widget).unwrap();

    let stored = backend.get("widgets", &widget_key("t1", "w1")).unwrap();
    let ttl = stored.iter().find(|p| p.name == "ttl").unwrap();
    assert_eq!(
        ttl.value,
        Value::Timestamp(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    );
    assert_eq!(table.get(&widget).unwrap().ttl, 1_700_000_000);
}

#[test]
fn update_returns_stored_result() {
    let (_, table) = table();
    let mut widget = Widget::keyed("t1", "w1");
    widget.count = 2;
    widget.name = "gear".to_string();
    table.put(&widget).unwrap();

    let mut delta = Widget::keyed("t1", "w1");
    delta.count = 3;
    let updated = table.update(&delta, &[add("count")]).unwrap();

    assert_eq!(updated.count, 5);
    assert_eq!(updated.name, "gear");
}

#[test]
fn default_limit_applies_only_without_limit_op() {
    let (_, table) = table();
    let table = table.with_config(TableConfig::default().with_default_limit(Some(1)));
    for id in ["a", "b", "c"] {
        table.put(&Widget::keyed("t1", id)).unwrap();
    }
    let pattern = Widget::keyed("t1", "");

    let (items, next) = table.query("", &pattern, &[]).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(next.as_deref(), Some("1"));

    let (items, next) = table.query("", &pattern, &[limit(5)]).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(next, None);
}

#[test]
fn query_orders_by_index_sort_field() {
    let (_, table) = table();
    for (id, name) in [("a", "zeta"), ("b", "alpha"), ("c", "mu")] {
        let mut widget = Widget::keyed("t1", id);
        widget.name = name.to_string();
        table.put(&widget).unwrap();
    }

    let (items, _) = table
        .query("named", &Widget::keyed("t1", ""), &[asc()])
        .unwrap();
    let names: Vec<&str> = items.iter().map(|w| w.name.as_str()).collect();

    assert_eq!(names, ["alpha", "mu", "zeta"]);
}

#[test]
fn query_filters_by_field_condition() {
    let (_, table) = table();
    for (id, status) in [("a", "on"), ("b", "off"), ("c", "on")] {
        let mut widget = Widget::keyed("t1", id);
        widget.status = status.to_string();
        table.put(&widget).unwrap();
    }
    let mut pattern = Widget::keyed("t1", "");
    pattern.status = "on".to_string();

    let (items, _) = table.query("", &pattern, &[equal("status")]).unwrap();
    let ids: Vec<&str> = items.iter().map(|w| w.id.as_str()).collect();

    assert_eq!(ids, ["a", "c"]);
}

///
/// Offline
///
/// Backend whose every call fails with a native error.
///

struct Offline;

impl Backend for Offline {
    fn get(&self, _: &str, _: &Key) -> Result<Vec<Property>, Error> {
        Err(Error::backend("connection refused"))
    }

    fn put(&self, _: &str, _: &Key, _: Vec<Property>) -> Result<(), Error> {
        Err(Error::backend("connection refused"))
    }

    fn create(&self, _: &str, _: &Key, _: Vec<Property>) -> Result<(), Error> {
        Err(Error::backend("connection refused"))
    }

    fn delete(&self, _: &str, _: &Key) -> Result<Option<Vec<Property>>, Error> {
        Err(Error::backend("connection refused"))
    }

    fn update(&self, _: &str, _: &Key, _: Vec<Update>) -> Result<Vec<Property>, Error> {
        Err(Error::backend("connection refused"))
    }

    fn query(&self, _: &str, _: QueryRequest) -> Result<QueryPage, Error> {
        Err(Error::backend("connection refused"))
    }
}

#[test]
fn backend_failures_propagate() {
    let table: Table<Widget, Offline> = Table::new(Offline, "widgets");
    let widget = Widget::keyed("t1", "w1");

    let err = table.get(&widget).unwrap_err();
    assert!(matches!(err, Error::Backend { ref message } if message == "connection refused"));
    assert_eq!(err.to_string(), "depot: backend failure: connection refused");
    assert!(!err.is_not_found());

    assert!(matches!(table.put(&widget), Err(Error::Backend { .. })));
    assert!(matches!(table.query("", &widget, &[]), Err(Error::Backend { .. })));
}
