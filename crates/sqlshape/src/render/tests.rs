use super::*;
use crate::builder::*;
use crate::combine::merge;
use crate::error::QbError;
use crate::qb::clause::{Clause, Direction, Nulls, OrderItem};
use crate::qb::expr::Expr;
use crate::qb::table::{Join, JoinKind, TableExpr};
use crate::value::Value;

fn text(map: &ClauseMap) -> String {
    render(map).unwrap().text().to_string()
}

fn count_placeholders(sql: &str) -> usize {
    sql.match_indices('$').count()
}

#[test]
fn insert_with_conflict_handling() {
    let now = || Value::raw("(NOW() AT TIME ZONE 'UTC')");
    let map = merge([
        insert_into("table_name"),
        columns(["first", "second", "third", "updated_at"]),
        values(vec![
            vec![
                Value::param("val1"),
                Value::param("val2"),
                Value::param("val3"),
                now(),
            ],
            vec![
                Value::param("val1.2"),
                Value::param("val2.2"),
                Value::param("val3.2"),
                now(),
            ],
        ]),
        on_conflict(["first", "second"]),
        do_update(vec![Expr::eq("val3", "excluded.val3")]),
        do_nothing(),
        where_(Expr::neq("excluded.third", Expr::param(5))),
    ]);

    let stmt = render(&map).unwrap();
    assert_eq!(
        stmt.text(),
        concat!(
            r#"INSERT INTO "table_name""#,
            r#" ("first", "second", "third", "updated_at")"#,
            " VALUES",
            " ($1, $2, $3, (NOW() AT TIME ZONE 'UTC')),",
            " ($4, $5, $6, (NOW() AT TIME ZONE 'UTC'))",
            r#" ON CONFLICT ("first", "second") DO UPDATE"#,
            r#" SET "val3" = "excluded"."val3""#,
            " DO NOTHING",
            r#" WHERE "excluded"."third" != $7"#,
        )
    );
    assert_eq!(
        stmt.values(),
        &[
            Param::from("val1"),
            Param::from("val2"),
            Param::from("val3"),
            Param::from("val1.2"),
            Param::from("val2.2"),
            Param::from("val3.2"),
            Param::Int(5),
        ]
    );
}

#[test]
fn update_from_subquery() {
    let map = merge([
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

    let stmt = render(&map).unwrap();
    assert_eq!(
        stmt.text(),
        concat!(
            r#"UPDATE "table" "t""#,
            r#" SET "col1" = $1, "col2" = $2"#,
            r#" FROM (SELECT "t2"."id", "t2"."name" FROM "joined" "t2" WHERE "t2"."id" = $3 FOR UPDATE) "t3""#,
            r#" WHERE "t3"."id" = "t"."id""#,
            r#" RETURNING "t3"."id""#,
        )
    );
    assert_eq!(
        stmt.values(),
        &[Param::from("val1"), Param::from("val2"), Param::Int(3)]
    );
}

#[test]
fn select_with_joins_grouping_and_paging() {
    let map = merge([
        select(vec![Expr::call("count", vec![Expr::ident("t.id")])]),
        from_as("table", "t"),
        joins(vec![
            join("table2", "t2", Expr::eq("t2.id", "t.id")),
            join("table3", "t3", Expr::eq("t3.id", "t.id")),
        ]),
        where_(Expr::and(vec![
            Expr::eq("t.col1", Expr::raw("3")),
            Expr::or(vec![
                Expr::eq("t.col2", Expr::param(5)),
                Expr::eq("t.col3", Expr::param(6)),
            ]),
        ])),
        group_by(vec![Expr::ident("t.id")]),
        having(Expr::eq("t.id", Expr::param(7))),
        order_by_with("at.id", Direction::Asc, None),
        limit(5),
        offset(3),
    ]);

    let stmt = render(&map).unwrap();
    assert_eq!(
        stmt.text(),
        concat!(
            r#"SELECT COUNT("t"."id")"#,
            r#" FROM "table" "t""#,
            r#" INNER JOIN "table2" "t2" ON "t2"."id" = "t"."id""#,
            r#" INNER JOIN "table3" "t3" ON "t3"."id" = "t"."id""#,
            r#" WHERE ("t"."col1" = 3 AND ("t"."col2" = $1 OR "t"."col3" = $2))"#,
            r#" GROUP BY "t"."id""#,
            r#" HAVING "t"."id" = $3"#,
            r#" ORDER BY "at"."id" ASC NULLS LAST"#,
            " LIMIT 5",
            " OFFSET 3",
        )
    );
    assert_eq!(stmt.values(), &[Param::Int(5), Param::Int(6), Param::Int(7)]);
}

#[test]
fn select_distinct_on() {
    let map = merge([
        select_distinct(
            vec![Expr::ident("t.id")],
            vec![Expr::call("count", vec![Expr::ident("t.id")])],
        ),
        from_as("table", "t"),
    ]);
    assert_eq!(
        text(&map),
        r#"SELECT DISTINCT ON ("t"."id") COUNT("t"."id") FROM "table" "t""#
    );
}

#[test]
fn select_distinct_without_on() {
    let map = merge([
        select_distinct(vec![], vec![Expr::ident("a")]),
        from("t"),
    ]);
    assert_eq!(text(&map), r#"SELECT DISTINCT "a" FROM "t""#);
}

#[test]
fn multiple_order_items() {
    let map = order_by(vec![
        OrderItem::asc("at.id"),
        OrderItem::desc("col2"),
    ]);
    assert_eq!(
        text(&map),
        r#"ORDER BY "at"."id" ASC NULLS LAST, "col2" DESC NULLS FIRST"#
    );
}

#[test]
fn explicit_nulls_placement_wins() {
    let map = order_by_with("a", Direction::Desc, Some(Nulls::Last));
    assert_eq!(text(&map), r#"ORDER BY "a" DESC NULLS LAST"#);
}

#[test]
fn expression_forms() {
    let map = select(vec![
        Expr::is_null("t.id"),
        Expr::is_not_null("t.id"),
        Expr::eq("t.code", Expr::param(Param::Null)),
        Expr::eq("t.code", Expr::raw("null")),
        Expr::case_when(vec![
            Expr::eq("t.code", Expr::param("blue")),
            Expr::eq(Expr::raw("1"), Expr::raw("1")),
            Expr::eq(Expr::raw("1"), Expr::raw("0")),
        ]),
        Expr::in_list("t.code", vec![Expr::param("red"), Expr::param("green")]),
        Expr::in_list("t.code", vec![Expr::param("red")]),
        Expr::in_subquery("t.code", select(vec![Expr::ident("t2.code")])),
        Expr::subquery(merge([select(vec![Expr::ident("id")]), from("table")])),
        Expr::as_("col1", "renamed"),
        Expr::call(
            "concat",
            vec![Expr::subquery(select(vec![Expr::raw("'val'")]))],
        ),
        Expr::call("concat", vec![Expr::ident("t.col1"), Expr::ident("t2.col1")]),
        Expr::gt("t1.c", "t2.c"),
        Expr::gte("t1.c", "t2.c"),
        Expr::lt("t1.c", "t2.c"),
        Expr::lte("t1.c", "t2.c"),
        Expr::like("t1.c", Expr::param("%text%")),
        Expr::ilike("t1.c", Expr::param("%text%")),
        Expr::not_in("t.code", vec![Expr::param("red")]),
        Expr::overlaps("t1.c", "t2.c"),
        Expr::not("t1.b"),
    ]);

    let stmt = render(&map).unwrap();
    assert_eq!(
        stmt.text(),
        concat!(
            "SELECT",
            r#" "t"."id" IS NULL,"#,
            r#" "t"."id" IS NOT NULL,"#,
            r#" "t"."code" = $1,"#,
            r#" "t"."code" = null,"#,
            r#" CASE WHEN "t"."code" = $2 THEN 1 = 1 ELSE 1 = 0 END,"#,
            r#" "t"."code" IN($3, $4),"#,
            r#" "t"."code" IN($5),"#,
            r#" "t"."code" IN(SELECT "t2"."code"),"#,
            r#" (SELECT "id" FROM "table"),"#,
            r#" "col1" as "renamed","#,
            " CONCAT((SELECT 'val')),",
            r#" CONCAT("t"."col1", "t2"."col1"),"#,
            r#" "t1"."c" > "t2"."c","#,
            r#" "t1"."c" >= "t2"."c","#,
            r#" "t1"."c" < "t2"."c","#,
            r#" "t1"."c" <= "t2"."c","#,
            r#" "t1"."c" LIKE $6,"#,
            r#" "t1"."c" ILIKE $7,"#,
            r#" "t"."code" NOT IN($8),"#,
            r#" "t1"."c" && "t2"."c","#,
            r#" NOT ("t1"."b")"#,
        )
    );
    assert_eq!(
        stmt.values(),
        &[
            Param::Null,
            Param::from("blue"),
            Param::from("red"),
            Param::from("green"),
            Param::from("red"),
            Param::from("%text%"),
            Param::from("%text%"),
            Param::from("red"),
        ]
    );
}

#[test]
fn exists_wraps_subquery() {
    let map = merge([
        select(vec![Expr::ident("u.id")]),
        from_as("users", "u"),
        where_(Expr::exists(merge([
            select(vec![Expr::raw("1")]),
            from_as("orders", "o"),
            where_(Expr::and(vec![
                Expr::eq("o.user_id", "u.id"),
                Expr::gt("o.total", Expr::param(100)),
            ])),
        ]))),
    ]);
    let stmt = render(&map).unwrap();
    assert_eq!(
        stmt.text(),
        concat!(
            r#"SELECT "u"."id" FROM "users" "u" WHERE EXISTS"#,
            r#" (SELECT 1 FROM "orders" "o" WHERE ("o"."user_id" = "u"."id" AND "o"."total" > $1))"#,
        )
    );
    assert_eq!(stmt.values(), &[Param::Int(100)]);
}

#[test]
fn exists_on_plain_expression_adds_parens() {
    let map = where_(Expr::Exists(Box::new(Expr::raw("SELECT 1"))));
    assert_eq!(text(&map), "WHERE EXISTS (SELECT 1)");
}

#[test]
fn in_with_subquery_among_other_items_parenthesizes_it() {
    let map = where_(Expr::in_list(
        "a",
        vec![Expr::param(1), Expr::subquery(select(vec![Expr::raw("2")]))],
    ));
    assert_eq!(text(&map), r#"WHERE "a" IN($1, (SELECT 2))"#);
}

#[test]
fn empty_in_list_never_matches() {
    let map = where_(Expr::in_list("a", vec![]));
    assert_eq!(text(&map), r#"WHERE "a" IN(NULL)"#);
}

#[test]
fn empty_groups_render_constants() {
    assert_eq!(text(&where_(Expr::and(vec![]))), "WHERE TRUE");
    assert_eq!(text(&where_(Expr::or(vec![]))), "WHERE FALSE");
}

#[test]
fn case_when_without_else() {
    let map = select(vec![Expr::case_when(vec![
        Expr::eq("a", Expr::param(1)),
        Expr::raw("'one'"),
        Expr::eq("a", Expr::param(2)),
        Expr::raw("'two'"),
    ])]);
    assert_eq!(
        text(&map),
        r#"SELECT CASE WHEN "a" = $1 THEN 'one' WHEN "a" = $2 THEN 'two' END"#
    );
}

#[test]
fn insert_default_values() {
    let map = merge([insert_into("t"), columns(["a"]), values(vec![])]);
    let stmt = render(&map).unwrap();
    assert_eq!(stmt.text(), r#"INSERT INTO "t" ("a") DEFAULT VALUES"#);
    assert!(stmt.values().is_empty());
}

#[test]
fn empty_columns_render_nothing() {
    let map = merge([
        insert_into("table_name"),
        columns(Vec::<String>::new()),
        values(vec![]),
    ]);
    assert_eq!(text(&map), r#"INSERT INTO "table_name" DEFAULT VALUES"#);
}

#[test]
fn documented_example() {
    let map = merge([
        select(vec![Expr::eq("a", Expr::param(1))]),
        from("t"),
        where_(Expr::and(vec![
            Expr::eq("b", Expr::param(2)),
            Expr::eq("c", Expr::raw("3")),
        ])),
    ]);
    let stmt = render(&map).unwrap();
    assert_eq!(
        stmt.text(),
        r#"SELECT "a" = $1 FROM "t" WHERE ("b" = $2 AND "c" = 3)"#
    );
    assert_eq!(stmt.values(), &[Param::Int(1), Param::Int(2)]);
}

#[test]
fn clause_order_ignores_construction_order() {
    let forward = merge([
        select(vec![Expr::ident("a")]),
        from("t"),
        where_(Expr::eq("a", Expr::param(1))),
        order_by(vec![OrderItem::asc("a")]),
        limit(1),
    ]);
    let backward = merge([
        limit(1),
        order_by(vec![OrderItem::asc("a")]),
        where_(Expr::eq("a", Expr::param(1))),
        from("t"),
        select(vec![Expr::ident("a")]),
    ]);
    assert_eq!(render(&forward).unwrap(), render(&backward).unwrap());
    assert_eq!(
        text(&backward),
        r#"SELECT "a" FROM "t" WHERE "a" = $1 ORDER BY "a" ASC NULLS LAST LIMIT 1"#
    );
}

#[test]
fn placeholders_stay_in_lockstep_when_nested() {
    // Three levels of subqueries, each binding values before and after its child.
    let level3 = merge([
        select(vec![Expr::param("c1")]),
        where_(Expr::eq("z", Expr::param("c2"))),
    ]);
    let level2 = merge([
        select(vec![Expr::param("b1"), Expr::subquery(level3)]),
        where_(Expr::eq("y", Expr::param("b2"))),
    ]);
    let map = merge([
        select(vec![Expr::param("a1"), Expr::subquery(level2)]),
        from_as(select(vec![Expr::param("a2")]), "f"),
        where_(Expr::in_list("x", vec![Expr::param("a3"), Expr::param("a4")])),
    ]);

    let stmt = render(&map).unwrap();
    assert_eq!(count_placeholders(stmt.text()), stmt.values().len());
    assert_eq!(
        stmt.text(),
        concat!(
            "SELECT $1, (SELECT $2, (SELECT $3 WHERE \"z\" = $4) WHERE \"y\" = $5)",
            " FROM (SELECT $6) \"f\"",
            " WHERE \"x\" IN($7, $8)",
        )
    );
    let expected: Vec<Param> = ["a1", "b1", "c1", "c2", "b2", "a2", "a3", "a4"]
        .into_iter()
        .map(Param::from)
        .collect();
    assert_eq!(stmt.values(), expected.as_slice());
}

#[test]
fn join_kinds() {
    let map = merge([
        select(vec![Expr::ident("a.id")]),
        from_as("a", "a"),
        joins(vec![
            left_join("b", "b", Expr::eq("b.a_id", "a.id")),
            Join::new(
                JoinKind::Right,
                TableExpr::aliased("c", "c"),
                Expr::eq("c.a_id", "a.id"),
            ),
            Join::new(JoinKind::Full, "d", Expr::eq("d.a_id", "a.id")),
            Join::new(JoinKind::Cross, "e", Expr::raw("TRUE")),
        ]),
    ]);
    assert_eq!(
        text(&map),
        concat!(
            r#"SELECT "a"."id" FROM "a" "a""#,
            r#" LEFT JOIN "b" "b" ON "b"."a_id" = "a"."id""#,
            r#" RIGHT JOIN "c" "c" ON "c"."a_id" = "a"."id""#,
            r#" FULL JOIN "d" ON "d"."a_id" = "a"."id""#,
            r#" CROSS JOIN "e" ON TRUE"#,
        )
    );
}

#[test]
fn cross_join_keeps_its_condition() {
    let map = merge([
        select(vec![Expr::ident("t.id")]),
        from("t"),
        joins(vec![Join::new(
            JoinKind::Cross,
            "e",
            Expr::eq("e.id", Expr::param(5)),
        )]),
    ]);
    let stmt = render(&map).unwrap();
    assert_eq!(
        stmt.text(),
        r#"SELECT "t"."id" FROM "t" CROSS JOIN "e" ON "e"."id" = $1"#
    );
    assert_eq!(stmt.values(), &[Param::Int(5)]);
}

#[test]
fn case_when_without_operands_is_rejected() {
    let map = select(vec![Expr::case_when(vec![])]);
    assert!(matches!(render(&map), Err(QbError::Malformed(_))));

    let map = select(vec![Expr::case_when(vec![
        Expr::eq("a", Expr::param(1)),
        Expr::raw("'one'"),
        Expr::raw("'other'"),
    ])]);
    assert_eq!(
        text(&map),
        r#"SELECT CASE WHEN "a" = $1 THEN 'one' ELSE 'other' END"#
    );
}

#[test]
fn empty_expression_lists_leave_bare_keywords() {
    assert_eq!(text(&set(vec![])), "SET");
    assert_eq!(text(&group_by(vec![])), "GROUP BY");
    assert_eq!(text(&returning(vec![])), "RETURNING");
    assert_eq!(text(&do_update(vec![])), "DO UPDATE SET");
    assert_eq!(text(&order_by(vec![])), "ORDER BY");
    assert_eq!(text(&select(vec![])), "SELECT");
}

#[test]
fn bare_subquery_table() {
    let map = merge([
        select(vec![Expr::raw("*")]),
        from(select(vec![Expr::raw("1")])),
    ]);
    assert_eq!(text(&map), "SELECT * FROM (SELECT 1)");
}

#[test]
fn quoted_identifiers_pass_through() {
    let map = merge([
        select(vec![Expr::ident(r#""t3"."id""#)]),
        from("t3"),
    ]);
    assert_eq!(text(&map), r#"SELECT "t3"."id" FROM "t3""#);
}

#[test]
fn empty_map_is_an_error() {
    assert_eq!(render(&ClauseMap::new()), Err(QbError::EmptyClauseMap));
}

#[test]
fn empty_nested_map_is_an_error() {
    let map = select(vec![Expr::subquery(ClauseMap::new())]);
    assert_eq!(render(&map), Err(QbError::EmptyClauseMap));
}

#[test]
fn depth_limit() {
    let mut map = select(vec![Expr::raw("1")]);
    for _ in 0..40 {
        map = select(vec![Expr::subquery(map)]);
    }

    assert!(render(&map).is_ok());
    assert_eq!(
        render_with(&map, &RenderConfig::new().with_max_depth(16)),
        Err(QbError::DepthExceeded { max_depth: 16 })
    );
    assert!(render_with(&map, &RenderConfig::new().unbounded()).is_ok());
}

#[test]
fn deep_expressions_do_not_count_toward_depth() {
    let mut expr = Expr::ident("a");
    for _ in 0..300 {
        expr = Expr::not(expr);
    }
    let map = where_(expr);
    assert!(render_with(&map, &RenderConfig::new().with_max_depth(1)).is_ok());
}

#[test]
fn many_appended_filters_render_with_defaults() {
    let parts = (0..200).map(|i| where_(Expr::eq(format!("c{i}"), Expr::param(i as i64))));
    let map = crate::combine::append(parts).unwrap();

    let stmt = render(&map).unwrap();
    assert_eq!(stmt.values().len(), 200);
    assert!(stmt.text().starts_with(r#"WHERE "#));
    assert!(stmt.text().ends_with(r#""c199" = $200)"#));
}

#[test]
fn nested_subqueries_count_toward_depth() {
    let mut map = select(vec![Expr::raw("1")]);
    for _ in 0..10 {
        map = from(map);
    }
    assert!(render(&map).is_ok());
    assert!(matches!(
        render_with(&map, &RenderConfig::new().with_max_depth(5)),
        Err(QbError::DepthExceeded { .. })
    ));
}

#[test]
fn statement_accessors() {
    let stmt = render(&where_(Expr::eq("a", Expr::param(1)))).unwrap();
    assert_eq!(stmt.to_string(), r#"WHERE "a" = $1"#);
    assert_eq!(stmt.params_ref().len(), 1);

    let (text, values) = stmt.clone().into_parts();
    assert_eq!(text, stmt.text());
    assert_eq!(values, vec![Param::Int(1)]);
    assert_eq!(
        ClauseMap::from(Clause::Limit(2)).to_statement().unwrap().text(),
        "LIMIT 2"
    );
}

#[test]
fn statement_serializes_values_as_json() {
    let stmt = render(&where_(Expr::eq("a", Expr::param("x")))).unwrap();
    let json = serde_json::to_value(&stmt).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"text": "WHERE \"a\" = $1", "values": ["x"]})
    );
}

#[cfg(feature = "tracing")]
#[test]
fn truncation_respects_char_boundaries() {
    let s = "ééé";
    assert_eq!(truncate_sql_bytes(s, 3), "é");
    assert_eq!(truncate_sql_bytes(s, 10), s);
}
