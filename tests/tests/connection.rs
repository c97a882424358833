use mortar::{
    criteria::Predicate,
    driver::{Capability, NativeError, Response},
    record, Adapter, Criteria, Meta, PoolConfig, Value,
};
use pretty_assertions::assert_eq;
use tests::{models, scripted, Scripted};

#[tokio::test]
async fn every_exit_path_releases_once() {
    let (db, adapter) = scripted();

    // Success
    db.rows(vec![]);
    adapter.session().find("team", &Criteria::new()).await.unwrap();
    assert_eq!((db.acquired(), db.released()), (1, 1));

    // Execution failure
    db.fail(NativeError::statement(None, "no such table: teams"));
    adapter
        .session()
        .find("team", &Criteria::new())
        .await
        .unwrap_err();
    assert_eq!((db.acquired(), db.released()), (2, 2));

    // Normalization failure after execution
    db.rows(vec![record! { "id" => 1, "settings" => "{" }]);
    adapter
        .session()
        .find("user", &Criteria::new())
        .await
        .unwrap_err();
    assert_eq!((db.acquired(), db.released()), (3, 3));

    // Compile failure never acquires
    adapter
        .session()
        .find("team", &Criteria::new().filter(Predicate::eq("color", "red")))
        .await
        .unwrap_err();
    assert_eq!((db.acquired(), db.released()), (3, 3));

    assert_eq!(db.pending(), 0);
}

#[tokio::test]
async fn leased_connections_are_never_released() {
    let (db, adapter) = scripted();
    db.respond(Response::inserted(1, Some(1)))
        .fail(NativeError::transport("connection reset"))
        .rows(vec![record! { "id" => 1, "name" => "red" }]);

    let mut connection = db.connection();
    let mut session = adapter.leased(&mut connection);

    session
        .create("team", record! { "name" => "red" }, Meta::default())
        .await
        .unwrap();
    session
        .destroy("team", &Criteria::new(), Meta::default())
        .await
        .unwrap_err();
    let teams = session.find("team", &Criteria::new()).await.unwrap();

    assert_eq!(teams, vec![record! { "id" => 1, "name" => "red" }]);
    assert_eq!(db.log().len(), 3);
    assert_eq!((db.acquired(), db.released()), (0, 0));
}

#[tokio::test]
async fn acquire_failure_is_a_connection_error() {
    let (db, adapter) = scripted();
    db.refuse_connections("too many connections");

    let err = adapter
        .session()
        .find("team", &Criteria::new())
        .await
        .unwrap_err();

    assert!(err.is_connection());
    assert!(db.log().is_empty());
    assert_eq!(db.released(), 0);
}

#[tokio::test]
async fn pooled_driver_runs_statements() {
    tests::init_tracing();

    let driver = Scripted::new(&Capability::POSTGRESQL);
    driver.rows(vec![record! { "id" => 1, "name" => "red" }]);

    let mut builder = Adapter::builder();
    for model in models() {
        builder.register(model);
    }
    let adapter = builder
        .pool_config(PoolConfig {
            max_size: 2,
            ..PoolConfig::default()
        })
        .build(driver.clone())
        .unwrap();

    let criteria = Criteria::new().filter(Predicate::eq("name", "red")).limit(5);
    let teams = adapter.session().find("team", &criteria).await.unwrap();

    assert_eq!(teams, vec![record! { "id" => 1, "name" => "red" }]);

    let executed = driver.log().pop();
    assert_eq!(
        executed.sql,
        r#"SELECT "id", "name" FROM "teams" WHERE "name" = $1 LIMIT 5"#
    );
    assert_eq!(executed.params, vec![Value::from("red")]);
}

#[tokio::test]
async fn models_load_from_json_descriptors() {
    let db = Scripted::mysql();
    db.rows(vec![]);

    let mut builder = Adapter::builder();
    builder
        .register_json(serde_json::json!({
            "identity": "invoice",
            "tableName": "invoices",
            "primaryKey": "number",
            "attributes": {
                "number": { "type": "number", "autoIncrement": true },
                "total": { "type": "number", "columnName": "total_cents" }
            }
        }))
        .unwrap();
    let adapter = builder.build_with_provider(db.clone()).unwrap();

    adapter
        .session()
        .find("invoice", &Criteria::new())
        .await
        .unwrap();

    assert_eq!(
        db.log().pop().sql,
        "SELECT `number`, `total_cents` FROM `invoices`"
    );
}

#[tokio::test]
async fn duplicate_models_are_rejected() {
    let mut builder = Adapter::builder();
    for model in models().into_iter().chain(models()) {
        builder.register(model);
    }

    let err = builder.build_with_provider(Scripted::mysql()).unwrap_err();
    assert!(err.is_invalid_schema());
}
