use super::*;
use crate::builder::*;
use crate::combine::merge;
use serde_json::json;

#[test]
fn parses_documented_example() {
    let map = ClauseMap::from_json(&json!({
        "select": [["=", "a", {"ip": 1}]],
        "from": "t",
        "where": ["and", ["=", "b", {"ip": 2}], ["=", "c", {"r": 3}]]
    }))
    .unwrap();

    let stmt = map.to_statement().unwrap();
    assert_eq!(
        stmt.text(),
        r#"SELECT "a" = $1 FROM "t" WHERE ("b" = $2 AND "c" = 3)"#
    );
    assert_eq!(stmt.values(), &[Param::Int(1), Param::Int(2)]);
}

#[test]
fn unknown_tag_is_unsupported_expression() {
    let err = ClauseMap::from_json(&json!({"where": ["xor", "a", "b"]})).unwrap_err();
    match &err {
        QbError::UnsupportedExpression { tag, supported } => {
            assert_eq!(tag, "xor");
            assert!(supported.contains(&"="));
            assert!(supported.contains(&"exists"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(err.to_string().starts_with("Unknown expr xor. Supported exprs: =, !="));
}

#[test]
fn unknown_clause_is_unsupported_clause() {
    let err = ClauseMap::from_json(&json!({"delete": "t"})).unwrap_err();
    assert!(matches!(
        err,
        QbError::UnsupportedClause { ref clause, .. } if clause == "delete"
    ));
    assert!(err.to_string().starts_with("Unknown clause delete. Supported clauses: select, "));
}

#[test]
fn nested_unknown_clause_is_reported() {
    let err = ClauseMap::from_json(&json!({
        "select": [{"select": ["id"], "frm": "t"}]
    }))
    .unwrap_err();
    assert!(matches!(err, QbError::UnsupportedClause { ref clause, .. } if clause == "frm"));
}

#[test]
fn bare_literals_are_invalid_values() {
    for bad in [json!(5), json!(true), json!(null)] {
        let err = ClauseMap::from_json(&json!({"where": ["=", "a", bad]})).unwrap_err();
        assert!(matches!(err, QbError::InvalidValue(_)), "{err:?}");
    }
}

#[test]
fn untagged_object_in_values_row_is_invalid() {
    let err = ClauseMap::from_json(&json!({
        "insert_into": "t",
        "values": [[{"x": 1}]]
    }))
    .unwrap_err();
    assert_eq!(err, QbError::InvalidValue(r#"{"x":1}"#.to_string()));
}

#[test]
fn wrong_shapes_are_malformed() {
    let cases = [
        json!({"select": "a"}),
        json!({"limit": "5"}),
        json!({"limit": -1}),
        json!({"where": []}),
        json!({"where": [1, "a"]}),
        json!({"where": ["=", "a"]}),
        json!({"where": ["not", "a", "b"]}),
        json!({"where": ["and"]}),
        json!({"from": ["t"]}),
        json!({"from": 3}),
        json!({"join": [["SIDEWAYS", "t", ["=", "a", "b"]]]}),
        json!({"order_by": [["a", "UP"]]}),
        json!({"columns": [1]}),
        json!({"select": [["%", 1]]})
    ];
    for case in cases {
        let err = ClauseMap::from_json(&case).unwrap_err();
        assert!(matches!(err, QbError::Malformed(_)), "{case}: {err:?}");
    }
    assert!(matches!(
        ClauseMap::from_json(&json!([])),
        Err(QbError::Malformed(_))
    ));
}

#[test]
fn raw_non_strings_keep_json_text() {
    let map = ClauseMap::from_json(&json!({"select": [["=", "t.code", {"r": null}]]})).unwrap();
    assert_eq!(
        map.to_statement().unwrap().text(),
        r#"SELECT "t"."code" = null"#
    );
}

#[test]
fn order_item_defaults_follow_direction() {
    let map = ClauseMap::from_json(&json!({"order_by": [["a"], ["b", "DESC"]]})).unwrap();
    assert_eq!(
        map,
        order_by(vec![OrderItem::asc("a"), OrderItem::desc("b")])
    );
}

#[test]
fn typed_and_dynamic_forms_agree() {
    let typed = merge([
        update_as("table", "t"),
        set(vec![
            Expr::eq("col1", Expr::param("val1")),
            Expr::eq("col2", Expr::param("val2")),
        ]),
        from_as(
            merge([
                select(vec![Expr::ident("t2.id"), Expr::ident("t2.name")]),
                from_as("joined", "t2"),
                where_(Expr::eq("t2.id", Expr::param(3))),
                for_update(),
            ]),
            "t3",
        ),
        where_(Expr::eq("t3.id", "t.id")),
        returning(vec![Expr::ident("t3.id")]),
    ]);

    let dynamic = ClauseMap::from_json(&json!({
        "update": ["table", "t"],
        "set": [["=", "col1", {"ip": "val1"}], ["=", "col2", {"ip": "val2"}]],
        "from": [
            {
                "select": ["t2.id", "t2.name"],
                "from": ["joined", "t2"],
                "where": ["=", "t2.id", {"ip": 3}],
                "for_update": true
            },
            "t3"
        ],
        "where": ["=", "t3.id", "t.id"],
        "returning": ["t3.id"]
    }))
    .unwrap();

    assert_eq!(typed, dynamic);
}

#[test]
fn json_round_trip() {
    let map = merge([
        select_distinct(
            vec![Expr::ident("t.id")],
            vec![Expr::call("count", vec![Expr::ident("t.id")])],
        ),
        from_as("table", "t"),
        joins(vec![
            join("table2", "t2", Expr::eq("t2.id", "t.id")),
            left_join("table3", "t3", Expr::eq("t3.id", "t.id")),
        ]),
        where_(Expr::and(vec![
            Expr::eq("t.col1", Expr::raw("3")),
            Expr::or(vec![
                Expr::in_list("t.code", vec![Expr::param("red"), Expr::param("green")]),
                Expr::not_in_subquery("t.code", select(vec![Expr::ident("t2.code")])),
                Expr::exists(select(vec![Expr::ident("t.c")])),
                Expr::not(Expr::is_null("t.b")),
                Expr::case_when(vec![
                    Expr::eq("t.code", Expr::param("blue")),
                    Expr::raw("1"),
                    Expr::raw("0"),
                ]),
            ]),
        ])),
        group_by(vec![Expr::ident("t.id")]),
        having(Expr::is_not_null("t.id")),
        order_by_with("t.id", Direction::Desc, Some(Nulls::Last)),
        limit(5),
        offset(3),
    ]);

    let json = map.to_json();
    assert_eq!(ClauseMap::from_json(&json).unwrap(), map);
}

#[test]
fn insert_round_trip_keeps_values_and_conflict() {
    let map = merge([
        insert_into("table_name"),
        columns(["first", "updated_at"]),
        values(vec![vec![
            Value::param("val1"),
            Value::raw("(NOW() AT TIME ZONE 'UTC')"),
        ]]),
        on_conflict(["first"]),
        do_update(vec![Expr::eq("first", "excluded.first")]),
        do_nothing(),
    ]);
    let json = map.to_json();
    assert_eq!(json["do_nothing"], JsonValue::Null);
    assert_eq!(json["values"], json!([[{"ip": "val1"}, {"r": "(NOW() AT TIME ZONE 'UTC')"}]]));
    assert_eq!(ClauseMap::from_json(&json).unwrap(), map);
}

#[test]
fn serde_impls_use_dynamic_form() {
    let map: ClauseMap =
        serde_json::from_str(r#"{"select": ["id"], "from": "users", "limit": 1}"#).unwrap();
    assert_eq!(map, merge([select(vec![Expr::ident("id")]), from("users"), limit(1)]));

    let text = serde_json::to_string(&map).unwrap();
    let back: ClauseMap = serde_json::from_str(&text).unwrap();
    assert_eq!(back, map);

    let err = serde_json::from_str::<ClauseMap>(r#"{"nope": 1}"#).unwrap_err();
    assert!(err.to_string().contains("Unknown clause nope"));
}

#[test]
fn depth_limit_applies_to_parsing() {
    let mut doc = json!({"select": [{"r": 1}]});
    for _ in 0..20 {
        doc = json!({"select": [doc]});
    }

    let shallow = RenderConfig::new().with_max_depth(10);
    assert_eq!(
        ClauseMap::from_json_with(&doc, &shallow),
        Err(QbError::DepthExceeded { max_depth: 10 })
    );
    assert!(ClauseMap::from_json(&doc).is_ok());
}

#[test]
fn deep_expressions_parse_under_a_small_limit() {
    let mut expr = json!("a");
    for _ in 0..20 {
        expr = json!(["not", expr]);
    }
    let shallow = RenderConfig::new().with_max_depth(1);
    assert!(ClauseMap::from_json_with(&json!({"where": expr}), &shallow).is_ok());
}

#[test]
fn value_objects_may_carry_extra_keys() {
    let map = ClauseMap::from_json(&json!({"select": [{"ip": 1, "note": "x"}]})).unwrap();
    let stmt = map.to_statement().unwrap();
    assert_eq!(stmt.text(), "SELECT $1");
    assert_eq!(stmt.values(), &[Param::Int(1)]);

    // `ip` wins when both are present.
    let map = ClauseMap::from_json(&json!({"select": [{"ip": 1, "r": 2}]})).unwrap();
    assert_eq!(map, select(vec![Expr::param(1)]));

    let map = ClauseMap::from_json(&json!({
        "columns": ["a", "b"],
        "values": [[{"ip": 1, "r": 2}, {"r": "NOW()", "note": "x"}]]
    }))
    .unwrap();
    let stmt = map.to_statement().unwrap();
    assert_eq!(stmt.text(), r#"("a", "b") VALUES ($1, NOW())"#);
    assert_eq!(stmt.values(), &[Param::Int(1)]);
}
