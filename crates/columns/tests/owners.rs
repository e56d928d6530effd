mod common;

use columns::{
    CellAction, CellContent, Column, Filter, FilterOp, QueryPurpose, SortDirection, SourceTable,
    SqlColumn, TableManager, TableView, entity::EntityTable,
};
use common::FakeManager;
use model::core::value::Value;
use tracing_test::traced_test;

const EVENTS_QUERY: &str = concat!(
    r#"SELECT "base"."id" AS "id", "base"."owner_id" AS "owner_id", "#,
    r#""owners_0"."display_name" AS "owners[id=owner_id].display_name", "#,
    r#""owners_0"."id" AS "owners[id=owner_id].id" "#,
    r#"FROM "events" AS "base" "#,
    r#"LEFT OUTER JOIN "owners" AS "owners_0" ON ("owners_0"."id" = "base"."owner_id")"#
);

fn owners() -> EntityTable {
    EntityTable::named("owners", "owner", "display_name")
}

fn events_view() -> TableView {
    let mut view = TableView::new();
    view.add(Column::standard("id"));
    view.add(Column::entity("owner_id", owners(), false));
    view
}

fn events_manager() -> FakeManager {
    FakeManager::new("events").with_rows(
        &[
            "id",
            "owner_id",
            "owners[id=owner_id].display_name",
            "owners[id=owner_id].id",
        ],
        vec![
            vec![Value::Int(1), Value::Int(5), Value::from("alice"), Value::Int(5)],
            vec![Value::Int(2), Value::Null, Value::Null, Value::Null],
            // Owner 7 does not exist.
            vec![Value::Int(3), Value::Int(7), Value::Null, Value::Null],
        ],
    )
}

#[test]
fn events_query_joins_owners_once() {
    let manager = events_manager();
    let query = manager
        .state()
        .page_query(&events_view().projections())
        .unwrap();

    assert_eq!(query.sql, EVENTS_QUERY);
    assert_eq!(query.join_count, 1);
    assert_eq!(
        query.columns,
        vec![
            "id",
            "owner_id",
            "owners[id=owner_id].display_name",
            "owners[id=owner_id].id"
        ]
    );
}

#[traced_test]
#[tokio::test]
async fn events_render_owner_links() {
    let manager = events_manager();
    let page = events_view().load(&manager).await.unwrap();

    assert_eq!(page.headers, vec!["id", "owner_id"]);
    assert_eq!(page.rows.len(), 3);

    let alice = &page.rows[0][1];
    match &alice.content {
        CellContent::Link { label, target } => {
            assert_eq!(label, "alice");
            assert_eq!(target.table, "owners");
            assert_eq!(target.id, 5);
        }
        other => panic!("expected a link, got {other:?}"),
    }
    assert!(matches!(alice.actions[0], CellAction::Navigate { .. }));

    // NULL owner renders the empty cell.
    assert!(page.rows[1][1].is_null());

    // A dangling owner still renders, labelled by its id.
    assert_eq!(page.rows[2][1].text(), "owner 7");
    assert!(logs_contain("does not match any row"));

    let issued = manager.issued().await;
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].purpose, QueryPurpose::Rows);
    assert_eq!(issued[0].sql, EVENTS_QUERY);
}

#[tokio::test]
async fn events_page_applies_filters_and_paging() {
    let mut manager = events_manager();
    let display_name = owners_display_name();
    manager
        .state_mut()
        .add_filter(Filter::column(display_name, FilterOp::NotEq(Value::from("bob"))));
    manager.state_mut().set_page(Some(2), Some(4));

    events_view().load(&manager).await.unwrap();

    let issued = manager.issued().await;
    let sql = &issued[0].sql;
    assert_eq!(sql.matches("JOIN").count(), 1);
    assert!(sql.ends_with(r#"WHERE ("owners_0"."display_name" != 'bob') LIMIT 2 OFFSET 4"#));
}

#[tokio::test]
async fn events_sort_by_owner_column() {
    let mut manager = events_manager();
    let view = events_view();
    let sort = view.columns()[1].sort_specs(SortDirection::Desc);
    manager.state_mut().set_sort(sort);

    view.load(&manager).await.unwrap();

    let issued = manager.issued().await;
    assert!(issued[0].sql.ends_with(r#"ORDER BY "base"."owner_id" DESC"#));
}

fn owners_display_name() -> SqlColumn {
    SqlColumn::joined(
        "display_name",
        SourceTable::new("owners").join_on("id", SqlColumn::field("owner_id")),
    )
}
