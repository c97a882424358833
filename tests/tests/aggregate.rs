use mortar::{criteria::Predicate, record, Criteria, Value};
use pretty_assertions::assert_eq;
use tests::scripted;

#[tokio::test]
async fn count_honours_the_filter() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "count" => 4 }]);

    let criteria = Criteria::new().filter(Predicate::eq("active", true));
    let count = adapter.session().count("user", &criteria).await.unwrap();

    assert_eq!(count, 4);

    let executed = db.log().pop();
    assert_eq!(
        executed.sql,
        "SELECT COUNT(*) AS `count` FROM `users` WHERE `active` = ?"
    );
    assert_eq!(executed.params, vec![Value::from(true)]);
}

#[tokio::test]
async fn sum_and_avg_read_decimal_text() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "sum" => "81.0" }])
        .rows(vec![record! { "avg" => "27.0000" }]);

    let mut session = adapter.session();
    let sum = session.sum("user", &Criteria::new(), "age").await.unwrap();
    let avg = session.avg("user", &Criteria::new(), "age").await.unwrap();

    assert_eq!(sum, 81.0);
    assert_eq!(avg, 27.0);
    assert_eq!(
        db.log().sql(),
        vec![
            "SELECT SUM(`age`) AS `sum` FROM `users`".to_string(),
            "SELECT AVG(`age`) AS `avg` FROM `users`".to_string(),
        ]
    );

    // One lease per operation
    assert_eq!((db.acquired(), db.released()), (2, 2));
}

#[tokio::test]
async fn empty_set_aggregates_to_zero() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "sum" => Value::Null }]);

    let sum = adapter
        .session()
        .sum("user", &Criteria::new(), "age")
        .await
        .unwrap();

    assert_eq!(sum, 0.0);
}

#[tokio::test]
async fn non_numeric_attributes_are_rejected() {
    let (db, adapter) = scripted();

    let err = adapter
        .session()
        .avg("user", &Criteria::new(), "name")
        .await
        .unwrap_err();

    assert!(err.is_malformed_criteria());
    assert_eq!(db.acquired(), 0);
}
