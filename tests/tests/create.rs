use mortar::{
    driver::Response,
    record,
    schema::{Attribute, Model, Type},
    Adapter, Meta, Value,
};
use pretty_assertions::assert_eq;
use tests::{models, scripted, Scripted};

#[tokio::test]
async fn create_returns_generated_id() {
    let (db, adapter) = scripted();
    db.respond(Response::inserted(1, Some(7)));

    let inserted = adapter
        .session()
        .create("user", record! { "name" => "Ada", "age" => 36 }, Meta::default())
        .await
        .unwrap();

    assert_eq!(inserted.id, Value::I64(7));
    assert_eq!(inserted.record, None);

    let executed = db.log().pop();
    assert_eq!(
        executed.sql,
        "INSERT INTO `users` (`name`, `age`) VALUES (?, ?)"
    );
    assert_eq!(executed.params, vec![Value::from("Ada"), Value::from(36)]);
    assert_eq!((db.acquired(), db.released()), (1, 1));
}

#[tokio::test]
async fn null_primary_key_is_left_to_the_database() {
    let (db, adapter) = scripted();
    db.respond(Response::inserted(1, Some(3)));

    let inserted = adapter
        .session()
        .create(
            "team",
            record! { "id" => Value::Null, "name" => "red" },
            Meta::default(),
        )
        .await
        .unwrap();

    assert_eq!(inserted.id, Value::I64(3));
    assert_eq!(db.log().pop().sql, "INSERT INTO `teams` (`name`) VALUES (?)");
}

#[tokio::test]
async fn supplied_primary_key_wins_over_engine_id() {
    let (db, adapter) = scripted();
    // The counter does not move for explicit keys
    db.respond(Response::inserted(1, Some(0)));

    let inserted = adapter
        .session()
        .create("team", record! { "id" => 42, "name" => "red" }, Meta::default())
        .await
        .unwrap();

    assert_eq!(inserted.id, Value::I64(42));
    assert_eq!(
        db.log().pop().sql,
        "INSERT INTO `teams` (`id`, `name`) VALUES (?, ?)"
    );
}

#[tokio::test]
async fn engine_id_is_ignored_without_auto_increment() {
    let db = Scripted::mysql();
    let mut builder = Adapter::builder();
    for model in models() {
        builder.register(model);
    }
    builder.register(
        Model::new("tag", "tags")
            .attribute(Attribute::new("id", Type::Number))
            .attribute(Attribute::new("label", Type::String)),
    );
    let adapter = builder.build_with_provider(db.clone()).unwrap();

    // A stale counter from an earlier insert on the connection
    db.respond(Response::inserted(1, Some(8)));
    let inserted = adapter
        .session()
        .create("tag", record! { "label" => "rust" }, Meta::default())
        .await
        .unwrap();
    assert_eq!(inserted.id, Value::Null);

    // Differing column sets make two statements
    db.respond(Response::inserted(1, Some(8)))
        .respond(Response::inserted(1, Some(9)));
    let inserted = adapter
        .session()
        .create_each(
            "tag",
            vec![
                record! { "id" => 4, "label" => "a" },
                record! { "label" => "b" },
            ],
            Meta::default(),
        )
        .await
        .unwrap();
    let ids: Vec<Value> = inserted.into_iter().map(|inserted| inserted.id).collect();
    assert_eq!(ids, vec![Value::I64(4), Value::Null]);
}

#[tokio::test]
async fn create_with_fetch_reselects_by_key() {
    let (db, adapter) = scripted();
    db.respond(Response::inserted(1, Some(7)))
        .rows(vec![record! {
            "id" => 7,
            "name" => "Ada",
            "email_address" => "ada@example.com",
            "active" => 1,
            "settings" => r#"{"theme":"dark"}"#,
        }]);

    let inserted = adapter
        .session()
        .create(
            "user",
            record! {
                "name" => "Ada",
                "email" => "ada@example.com",
                "active" => true,
                "settings" => serde_json::json!({ "theme": "dark" }),
            },
            Meta::fetch(),
        )
        .await
        .unwrap();

    assert_eq!(
        inserted.record,
        Some(record! {
            "id" => 7,
            "name" => "Ada",
            "email" => "ada@example.com",
            "active" => true,
            "settings" => serde_json::json!({ "theme": "dark" }),
        })
    );

    let insert = db.log().pop();
    assert_eq!(
        insert.params,
        vec![
            Value::from("Ada"),
            Value::from("ada@example.com"),
            Value::from(true),
            Value::from(r#"{"theme":"dark"}"#),
        ]
    );

    let select = db.log().pop();
    assert!(select.sql.ends_with("FROM `users` WHERE `id` = ?"), "{}", select.sql);
    assert_eq!(select.params, vec![Value::from(7)]);

    // One connection for both statements
    assert_eq!((db.acquired(), db.released()), (1, 1));
}

#[tokio::test]
async fn ref_attributes_require_bytes() {
    let (db, adapter) = scripted();

    let err = adapter
        .session()
        .create("user", record! { "avatar" => "not bytes" }, Meta::default())
        .await
        .unwrap_err();

    assert!(err.is_unsupported_ref_value());
    assert!(db.log().is_empty());
    assert_eq!(db.acquired(), 0);
}

#[tokio::test]
async fn create_each_batches_records_with_the_same_columns() {
    let (db, adapter) = scripted();
    db.respond(Response::inserted(2, Some(10)))
        .respond(Response::inserted(1, Some(12)));

    let inserted = adapter
        .session()
        .create_each(
            "team",
            vec![
                record! { "name" => "red" },
                record! { "name" => "blue" },
                record! { "name" => "green", "id" => 99 },
            ],
            Meta::default(),
        )
        .await
        .unwrap();

    let ids: Vec<_> = inserted.into_iter().map(|inserted| inserted.id).collect();
    assert_eq!(ids, vec![Value::I64(10), Value::I64(11), Value::I64(99)]);

    assert_eq!(
        db.log().sql(),
        vec![
            "INSERT INTO `teams` (`name`) VALUES (?), (?)".to_string(),
            "INSERT INTO `teams` (`name`, `id`) VALUES (?, ?)".to_string(),
        ]
    );
    assert_eq!((db.acquired(), db.released()), (1, 1));
}

#[tokio::test]
async fn create_each_with_fetch_reselects_with_in() {
    let (db, adapter) = scripted();
    db.respond(Response::inserted(2, Some(1))).rows(vec![
        record! { "id" => 2, "name" => "blue" },
        record! { "id" => 1, "name" => "red" },
    ]);

    let inserted = adapter
        .session()
        .create_each(
            "team",
            vec![record! { "name" => "red" }, record! { "name" => "blue" }],
            Meta::fetch(),
        )
        .await
        .unwrap();

    // Records line up with the input, whatever order the select returned
    assert_eq!(
        inserted[0].record,
        Some(record! { "id" => 1, "name" => "red" })
    );
    assert_eq!(
        inserted[1].record,
        Some(record! { "id" => 2, "name" => "blue" })
    );

    db.log().pop();
    let select = db.log().pop();
    assert!(select.sql.ends_with("WHERE `id` IN (?, ?)"), "{}", select.sql);
}

#[tokio::test]
async fn create_each_with_no_records_runs_nothing() {
    let (db, adapter) = scripted();

    let inserted = adapter
        .session()
        .create_each("team", vec![], Meta::default())
        .await
        .unwrap();

    assert!(inserted.is_empty());
    assert_eq!(db.acquired(), 0);
}
