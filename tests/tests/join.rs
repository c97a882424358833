use mortar::{
    driver::NativeError, record, Criteria, JoinInstruction, JunctionSpec, Record, Value,
};
use pretty_assertions::assert_eq;
use tests::scripted;

fn pets() -> JoinInstruction {
    JoinInstruction::reverse_fk("pets", ("user", "id"), ("pet", "owner"))
}

fn teams() -> JoinInstruction {
    JoinInstruction::many_to_many(
        "teams",
        ("user", "id"),
        ("team", "id"),
        JunctionSpec::new("membership", "user", "team"),
    )
}

fn list(records: Vec<Record>) -> Value {
    Value::List(records.into_iter().map(Value::Record).collect())
}

#[tokio::test]
async fn reverse_fk_nests_children_in_parent_order() {
    let (db, adapter) = scripted();
    db.rows(vec![
        record! { "id" => 3, "name" => "Cy" },
        record! { "id" => 1, "name" => "Ada" },
        record! { "id" => 2, "name" => "Bo" },
    ])
    .rows(vec![
        record! { "id" => 10, "name" => "Rex", "owner_id" => 1 },
        record! { "id" => 11, "name" => "Tom", "owner_id" => 3 },
        record! { "id" => 12, "name" => "Kit", "owner_id" => 1 },
    ]);

    let records = adapter
        .session()
        .join("user", &Criteria::new(), &[pets()])
        .await
        .unwrap();

    assert_eq!(
        records,
        vec![
            record! {
                "id" => 3,
                "name" => "Cy",
                "pets" => list(vec![record! { "id" => 11, "name" => "Tom", "owner" => 3 }]),
            },
            record! {
                "id" => 1,
                "name" => "Ada",
                "pets" => list(vec![
                    record! { "id" => 10, "name" => "Rex", "owner" => 1 },
                    record! { "id" => 12, "name" => "Kit", "owner" => 1 },
                ]),
            },
            // No children still yields an empty list
            record! { "id" => 2, "name" => "Bo", "pets" => list(vec![]) },
        ]
    );

    db.log().pop();
    let children = db.log().pop();
    assert_eq!(
        children.sql,
        "SELECT `id`, `name`, `owner_id` FROM `pets` WHERE `owner_id` IN (?, ?, ?)"
    );
    assert_eq!(
        children.params,
        vec![Value::from(3), Value::from(1), Value::from(2)]
    );
    assert_eq!((db.acquired(), db.released()), (1, 1));
}

#[tokio::test]
async fn no_parents_skips_child_statements() {
    let (db, adapter) = scripted();
    db.rows(vec![]);

    let records = adapter
        .session()
        .join("user", &Criteria::new(), &[pets(), teams()])
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(db.log().len(), 1);
}

#[tokio::test]
async fn many_to_many_strips_the_junction_key() {
    let (db, adapter) = scripted();
    db.rows(vec![
        record! { "id" => 1, "name" => "Ada" },
        record! { "id" => 2, "name" => "Bo" },
    ])
    .rows(vec![
        record! { "id" => 5, "name" => "red", "__junction_parent_key" => 1 },
        record! { "id" => 5, "name" => "red", "__junction_parent_key" => 2 },
        record! { "id" => 6, "name" => "blue", "__junction_parent_key" => 2 },
    ]);

    let records = adapter
        .session()
        .join("user", &Criteria::new(), &[teams()])
        .await
        .unwrap();

    let red = record! { "id" => 5, "name" => "red" };
    let blue = record! { "id" => 6, "name" => "blue" };

    assert_eq!(records[0]["teams"], list(vec![red.clone()]));
    assert_eq!(records[1]["teams"], list(vec![red, blue]));

    db.log().pop();
    assert_eq!(
        db.log().pop().sql,
        "SELECT `teams`.`id`, `teams`.`name`, `memberships`.`user_id` AS `__junction_parent_key` \
         FROM `teams` INNER JOIN `memberships` ON `memberships`.`team_id` = `teams`.`id` \
         WHERE `memberships`.`user_id` IN (?, ?)"
    );
}

#[tokio::test]
async fn direct_fk_is_embedded_in_the_parent_select() {
    let (db, adapter) = scripted();
    db.rows(vec![
        record! {
            "id" => 10, "name" => "Rex", "owner_id" => 1,
            "owner__id" => 1, "owner__name" => "Ada",
        },
        record! {
            "id" => 11, "name" => "Stray", "owner_id" => Value::Null,
            "owner__id" => Value::Null, "owner__name" => Value::Null,
        },
    ]);

    let owner = JoinInstruction::direct_fk("owner", ("pet", "owner"), ("user", "id"))
        .criteria(Criteria::new().select(["name"]));

    let records = adapter
        .session()
        .join("pet", &Criteria::new(), &[owner])
        .await
        .unwrap();

    assert_eq!(
        records,
        vec![
            record! {
                "id" => 10,
                "name" => "Rex",
                "owner" => record! { "id" => 1, "name" => "Ada" },
            },
            record! { "id" => 11, "name" => "Stray", "owner" => Value::Null },
        ]
    );

    // One round-trip
    assert_eq!(
        db.log().sql(),
        vec![
            "SELECT `pets`.`id`, `pets`.`name`, `pets`.`owner_id`, \
             `owner`.`name` AS `owner__name`, `owner`.`id` AS `owner__id` \
             FROM `pets` LEFT OUTER JOIN `users` AS `owner` ON `owner`.`id` = `pets`.`owner_id`"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn paginated_children_use_one_union() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "id" => 1 }, record! { "id" => 2 }])
        .rows(vec![
            record! { "id" => 10, "name" => "Rex", "owner_id" => 1 },
            record! { "id" => 20, "name" => "Tom", "owner_id" => 2 },
        ]);

    let pets = pets().criteria(Criteria::new().limit(1));

    let records = adapter
        .session()
        .join("user", &Criteria::new(), &[pets])
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(db.log().len(), 2);

    db.log().pop();
    let children = db.log().pop();
    assert_eq!(children.sql.matches(" UNION ALL ").count(), 1);
    assert_eq!(children.params, vec![Value::from(1), Value::from(2)]);
}

#[tokio::test]
async fn projection_keeps_keys_needed_for_matching() {
    let (db, adapter) = scripted();
    db.rows(vec![]);

    adapter
        .session()
        .join("user", &Criteria::new().select(["name"]), &[pets()])
        .await
        .unwrap();

    assert_eq!(db.log().pop().sql, "SELECT `name`, `id` FROM `users`");
}

#[tokio::test]
async fn invalid_associations_fail_before_acquire() {
    let (db, adapter) = scripted();

    let cases = [
        JoinInstruction::reverse_fk("pets", ("user", "id"), ("ghost", "owner")),
        JoinInstruction::reverse_fk("pets", ("pet", "id"), ("pet", "owner")),
        JoinInstruction::reverse_fk("pets", ("user", "id"), ("pet", "keeper")),
        JoinInstruction::reverse_fk("", ("user", "id"), ("pet", "owner")),
        JoinInstruction::direct_fk("firstpet", ("user", "id"), ("pet", "owner")),
        JoinInstruction::many_to_many(
            "teams",
            ("user", "id"),
            ("team", "id"),
            JunctionSpec::new("roster", "user", "team"),
        ),
    ];

    for instruction in cases {
        let err = adapter
            .session()
            .join("user", &Criteria::new(), &[instruction])
            .await
            .unwrap_err();
        assert!(err.is_invalid_join_criteria(), "{err}");
    }

    let err = adapter
        .session()
        .join("user", &Criteria::new(), &[pets(), pets()])
        .await
        .unwrap_err();
    assert!(err.is_invalid_join_criteria());

    assert_eq!(db.acquired(), 0);
}

#[tokio::test]
async fn direct_fk_must_reference_the_child_primary_key() {
    let (db, adapter) = scripted();

    let firstpet = JoinInstruction::direct_fk("firstpet", ("user", "id"), ("pet", "owner"));
    let err = adapter
        .session()
        .join("user", &Criteria::new(), &[firstpet])
        .await
        .unwrap_err();

    assert!(err.is_invalid_join_criteria());
    assert!(err.to_string().contains("primary key of `pet`"), "{err}");
    assert!(db.log().is_empty());
    assert_eq!(db.acquired(), 0);
}

#[tokio::test]
async fn failing_child_statement_fails_the_join() {
    let (db, adapter) = scripted();
    db.rows(vec![record! { "id" => 1 }])
        .fail(NativeError::statement(
            Some("ER_NO_SUCH_TABLE".to_string()),
            "Table 'app.pets' doesn't exist",
        ));

    let err = adapter
        .session()
        .join("user", &Criteria::new(), &[pets()])
        .await
        .unwrap_err();

    assert!(err.is_query_failed());
    assert_eq!(err.footprint(), Some(&mortar::Footprint::NoSuchTable));
    assert_eq!((db.acquired(), db.released()), (1, 1));
}
