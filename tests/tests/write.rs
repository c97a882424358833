use mortar::{
    criteria::Predicate,
    driver::{NativeError, Response},
    record, Criteria, Footprint, Meta, Value,
};
use pretty_assertions::assert_eq;
use tests::scripted;

#[tokio::test]
async fn update_reports_affected_rows() {
    let (db, adapter) = scripted();
    db.respond(Response::count(2));

    let criteria = Criteria::new().filter(Predicate::lt("age", 18));
    let affected = adapter
        .session()
        .update("user", &criteria, record! { "active" => false }, Meta::default())
        .await
        .unwrap();

    assert_eq!(affected.count, 2);
    assert_eq!(affected.records, None);

    let executed = db.log().pop();
    assert_eq!(
        executed.sql,
        "UPDATE `users` SET `active` = ? WHERE `age` < ?"
    );
    assert_eq!(executed.params, vec![Value::from(false), Value::from(18)]);
}

#[tokio::test]
async fn update_with_fetch_follows_a_changed_key() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "id" => 1 }])
        .respond(Response::count(1))
        .rows(vec![record! { "id" => 100, "name" => "Ada" }]);

    let criteria = Criteria::new().filter(Predicate::eq("id", 1));
    let affected = adapter
        .session()
        .update("user", &criteria, record! { "id" => 100 }, Meta::fetch())
        .await
        .unwrap();

    assert_eq!(affected.count, 1);
    assert_eq!(
        affected.records,
        Some(vec![record! { "id" => 100, "name" => "Ada" }])
    );

    assert_eq!(
        db.log().sql(),
        vec![
            "SELECT `id` FROM `users` WHERE `id` = ?".to_string(),
            "UPDATE `users` SET `id` = ? WHERE `id` = ?".to_string(),
            "SELECT `id`, `name`, `age`, `email_address`, `active`, `settings`, `avatar` \
             FROM `users` WHERE `id` = ?"
                .to_string(),
        ]
    );
    assert_eq!((db.acquired(), db.released()), (1, 1));
}

#[tokio::test]
async fn update_with_fetch_and_no_match_skips_the_reselect() {
    let (db, adapter) = scripted();
    db.rows(vec![]).respond(Response::count(0));

    let affected = adapter
        .session()
        .update(
            "user",
            &Criteria::new().filter(Predicate::eq("name", "nobody")),
            record! { "age" => 1 },
            Meta::fetch(),
        )
        .await
        .unwrap();

    assert_eq!(affected.count, 0);
    assert_eq!(affected.records, Some(vec![]));
    assert_eq!(db.log().len(), 2);
}

#[tokio::test]
async fn update_without_values_is_rejected() {
    let (db, adapter) = scripted();

    let err = adapter
        .session()
        .update("user", &Criteria::new(), record! {}, Meta::default())
        .await
        .unwrap_err();

    assert!(err.is_malformed_criteria());
    assert_eq!(db.acquired(), 0);
}

#[tokio::test]
async fn destroy_with_fetch_selects_before_deleting() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "id" => 10, "name" => "Rex", "owner_id" => 1 }])
        .respond(Response::count(1));

    let criteria = Criteria::new().filter(Predicate::eq("owner", 1));
    let affected = adapter
        .session()
        .destroy("pet", &criteria, Meta::fetch())
        .await
        .unwrap();

    assert_eq!(affected.count, 1);
    assert_eq!(
        affected.records,
        Some(vec![record! { "id" => 10, "name" => "Rex", "owner" => 1 }])
    );
    assert_eq!(
        db.log().sql(),
        vec![
            "SELECT `id`, `name`, `owner_id` FROM `pets` WHERE `owner_id` = ?".to_string(),
            "DELETE FROM `pets` WHERE `owner_id` = ?".to_string(),
        ]
    );
}

#[tokio::test]
async fn unique_violation_carries_its_footprint() {
    let (db, adapter) = scripted();
    db.fail(NativeError::statement(
        Some("ER_DUP_ENTRY".to_string()),
        "Duplicate entry 'ada@example.com' for key 'users.email_address'",
    ));

    let err = adapter
        .session()
        .create("user", record! { "email" => "ada@example.com" }, Meta::default())
        .await
        .unwrap_err();

    assert!(err.is_query_failed());
    assert_eq!(
        err.footprint(),
        Some(&Footprint::NotUnique {
            keys: vec!["email_address".to_string()]
        })
    );
    assert_eq!((db.acquired(), db.released()), (1, 1));
}

#[tokio::test]
async fn insert_answered_with_rows_is_a_parse_error() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "id" => 1 }]);

    let err = adapter
        .session()
        .create("team", record! { "name" => "red" }, Meta::default())
        .await
        .unwrap_err();

    assert!(err.is_parse());
    assert_eq!((db.acquired(), db.released()), (1, 1));
}
