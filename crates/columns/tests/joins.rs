mod common;

use columns::{
    CellContent, Column, ColumnError, ColumnOrSet, ColumnSet, TableManager, TableView,
    column_set::entity::{EntityColumnSet, EntitySetParams},
    entity::EntityTable,
};
use common::FakeManager;
use model::core::value::Value;

fn thread_set(not_null: bool) -> EntityColumnSet {
    EntityColumnSet::new(
        "utid",
        EntityTable::thread(),
        EntitySetParams {
            title: Some("thread".to_string()),
            not_null,
            ..Default::default()
        },
    )
}

fn discovered_column(set: &EntityColumnSet, key: &str) -> Column {
    match set.discover().into_iter().find(|d| d.key == key).map(|d| d.column) {
        Some(ColumnOrSet::Column(column)) => column,
        _ => panic!("{key} is not a column of {}", set.title()),
    }
}

fn discovered_set(set: &EntityColumnSet, key: &str) -> EntityColumnSet {
    match set.discover().into_iter().find(|d| d.key == key).map(|d| d.column) {
        Some(ColumnOrSet::Set(ColumnSet::Entity(nested))) => nested,
        _ => panic!("{key} is not an entity set of {}", set.title()),
    }
}

#[test]
fn columns_sharing_an_ancestor_share_its_join() {
    let manager = FakeManager::new("slice");
    let thread = thread_set(false);
    let process = discovered_set(&thread, "upid");

    let mut view = TableView::new();
    view.add(thread.entity_column());
    view.add(discovered_column(&thread, "tid"));
    view.add(discovered_column(&thread, "start_ts"));
    view.add(process.entity_column());
    view.add(discovered_column(&process, "pid"));

    let query = manager.state().page_query(&view.projections()).unwrap();

    assert_eq!(query.join_count, 2);
    assert_eq!(query.sql.matches(r#"JOIN "thread""#).count(), 1);
    assert_eq!(query.sql.matches(r#"JOIN "process""#).count(), 1);
    assert!(query.sql.contains(
        r#"LEFT OUTER JOIN "process" AS "process_1" ON ("process_1"."id" = "thread_0"."upid")"#
    ));
    assert!(query.columns.contains(&"process[id=thread[id=utid].upid].pid".to_string()));
}

#[test]
fn not_null_hint_selects_inner_join() {
    let manager = FakeManager::new("sched");

    let mut inner = TableView::new();
    inner.add_initial(&ColumnSet::Entity(thread_set(true)));
    let sql = manager.state().page_query(&inner.projections()).unwrap().sql;
    assert!(sql.contains(r#"INNER JOIN "thread" AS "thread_0""#));
    assert!(!sql.contains("LEFT OUTER JOIN"));

    let mut outer = TableView::new();
    outer.add_initial(&ColumnSet::Entity(thread_set(false)));
    let sql = manager.state().page_query(&outer.projections()).unwrap().sql;
    assert!(sql.contains(r#"LEFT OUTER JOIN "thread" AS "thread_0""#));
    assert!(!sql.contains("INNER JOIN"));
}

#[test]
fn mixed_hints_fall_back_to_outer_join() {
    let manager = FakeManager::new("sched");
    let mut view = TableView::new();
    view.add(thread_set(true).entity_column());
    view.add(discovered_column(&thread_set(false), "end_ts"));

    let query = manager.state().page_query(&view.projections()).unwrap();
    assert_eq!(query.join_count, 1);
    assert!(query.sql.contains(r#"LEFT OUTER JOIN "thread" AS "thread_0""#));
}

#[tokio::test]
async fn null_and_mistyped_values_render_per_cell() {
    let manager = FakeManager::new("slice").with_rows(
        &["ts", "dur", "slice_id", "utid"],
        vec![
            vec![Value::Null, Value::Null, Value::Null, Value::Null],
            vec![
                Value::from("yesterday"),
                Value::Float(0.5),
                Value::from("12"),
                Value::Bytes(vec![1]),
            ],
            vec![Value::Int(2_000_000_000), Value::Int(1_500_000_000), Value::Int(12), Value::Int(3)],
        ],
    );

    let mut view = TableView::new();
    view.add(Column::timestamp("ts"));
    view.add(Column::duration("dur"));
    view.add(Column::id_ref("slice_id", "slice"));
    view.add(Column::entity("utid", EntityTable::thread(), false));

    let page = view.load(&manager).await.unwrap();

    assert!(page.rows[0].iter().all(|cell| cell.is_null()));

    let errors: Vec<&str> = page.rows[1]
        .iter()
        .map(|cell| cell.error().map(|e| e.column_id()).unwrap_or_default())
        .collect();
    assert_eq!(errors, vec!["ts", "dur", "slice_id", "utid"]);

    let valid = &page.rows[2];
    assert_eq!(valid[0].content, CellContent::Timestamp(2_000_000_000));
    assert_eq!(valid[1].text(), "1s 500ms");
    assert_eq!(valid[2].text(), "12");
    assert_eq!(valid[3].text(), "thread 3");
}

#[tokio::test]
async fn primary_key_type_error_fails_the_page() {
    let manager = FakeManager::new("thread").with_rows(&["utid"], vec![vec![Value::from("main")]]);
    let mut view = TableView::new();
    view.add(Column::primary_key("utid", "thread"));

    let err = view.load(&manager).await.unwrap_err();
    assert!(matches!(err, ColumnError::PrimaryKeyType { ref column_id, .. } if column_id == "utid"));
}

#[tokio::test]
async fn empty_view_is_rejected() {
    let manager = FakeManager::new("slice");
    let err = TableView::new().load(&manager).await.unwrap_err();
    assert!(matches!(err, ColumnError::EmptyProjection));
    assert!(manager.issued().await.is_empty());
}
