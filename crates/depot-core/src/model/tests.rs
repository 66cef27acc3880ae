use super::*;
use crate::{
    Error,
    test_fixtures::{Malformed, Record, Widget},
};
use std::{sync::Arc, thread};

//
// parse_tag
//

#[test]
fn empty_tag_keeps_ident_and_includes() {
    let field = parse_tag("name", "").unwrap();

    assert_eq!(field, Field::new("name"));
    assert_eq!(field.mode, FieldMode::Include);
}

#[test]
fn first_segment_renames() {
    let field = parse_tag("tenant_id", "tenantId,pk").unwrap();

    assert_eq!(field.name, "tenantId");
    assert_eq!(field.mode, FieldMode::Partition);
}

#[test]
fn empty_first_segment_keeps_ident() {
    let field = parse_tag("id", ",sk").unwrap();

    assert_eq!(field.name, "id");
    assert_eq!(field.mode, FieldMode::Sort);
}

#[test]
fn dash_excludes_under_the_ident() {
    let field = parse_tag("secret", "-").unwrap();

    assert_eq!(field.name, "secret");
    assert_eq!(field.mode, FieldMode::Exclude);
}

#[test]
fn keywords_and_index_roles() {
    let field = parse_tag("expiry", "exp,omitempty,ttl,index:expired:sk,bogus").unwrap();

    assert_eq!(field.name, "exp");
    assert_eq!(field.mode, FieldMode::OmitEmpty);
    assert!(field.ttl);
    assert_eq!(
        field.indexes,
        vec![IndexRole {
            name: "expired".to_string(),
            mode: FieldMode::Sort,
        }]
    );
}

#[test]
fn malformed_index_roles_are_rejected() {
    assert!(matches!(
        parse_tag("a", "a,index:only"),
        Err(TagError::IndexArity { .. })
    ));
    assert!(matches!(
        parse_tag("a", "a,index:x:pk:extra"),
        Err(TagError::IndexArity { .. })
    ));

    let err = parse_tag("a", "a,index:x:primary").unwrap_err();
    assert_eq!(
        err,
        TagError::IndexMode {
            field: "a".to_string(),
            token: "index:x:primary".to_string(),
            mode: "primary".to_string(),
        }
    );
}

//
// Field
//

#[test]
fn mode_for_prefers_matching_index_role() {
    let field = parse_tag("created_at", "createdAt,index:created:sk").unwrap();

    assert_eq!(field.mode_for("created"), FieldMode::Sort);
    assert_eq!(field.mode_for("named"), FieldMode::Include);
    assert_eq!(field.mode_for(""), FieldMode::Include);
}

#[test]
fn needs_index_counts_key_modes_and_overrides() {
    assert!(parse_tag("a", "a,pk").unwrap().needs_index());
    assert!(parse_tag("a", "a,index:x:sk").unwrap().needs_index());
    assert!(!parse_tag("a", "a,omitempty").unwrap().needs_index());

    let mut excluded_override = Field::new("a");
    excluded_override.indexes.push(IndexRole {
        name: "x".to_string(),
        mode: FieldMode::Exclude,
    });
    assert!(excluded_override.needs_index());
}

//
// describe
//

#[test]
fn describe_follows_declaration_order() {
    let descriptor = describe(&Widget::default()).unwrap();
    let names: Vec<&str> = descriptor.iter().map(|f| f.name.as_str()).collect();

    assert_eq!(descriptor.len(), 17);
    assert_eq!(&names[..3], ["tenantId", "id", "name"]);
    assert_eq!(names[10], "exclude");
    assert_eq!(descriptor[10].mode, FieldMode::Exclude);
    assert_eq!(descriptor[0].indexes.len(), 3);
    assert!(descriptor[9].ttl);
}

#[test]
fn describe_untagged_record() {
    let descriptor = describe(&Record::default()).unwrap();

    assert_eq!(descriptor.fields, vec![Field::new("name")]);
    assert_eq!(descriptor.field("name").map(|(i, _)| i), Some(0));
    assert!(descriptor.field("missing").is_none());
}

#[test]
fn describe_rejects_scalars() {
    let err = describe(&"plain".to_string()).unwrap_err();

    assert!(matches!(err, Error::InvalidEntityType { .. }));
    assert!(matches!(
        describe(&42_i64),
        Err(Error::InvalidEntityType { .. })
    ));
}

#[test]
fn describe_sees_through_boxes() {
    let boxed: Box<Widget> = Box::default();

    let direct = describe(&Widget::default()).unwrap();
    let through_box = describe(&boxed).unwrap();

    assert!(Arc::ptr_eq(&direct, &through_box));
}

#[test]
fn describe_shares_one_allocation_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| describe(&Record::default()).unwrap()))
        .collect();

    let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = describe(&Record::default()).unwrap();

    assert!(descriptors.iter().all(|d| Arc::ptr_eq(d, &first)));
}

#[test]
#[should_panic(expected = "index:orphan")]
fn describe_panics_on_malformed_annotation() {
    let _ = describe(&Malformed::default());
}
