//! Descriptions of entity tables: tables whose rows other tables reference
//! by id, and which can be expanded into their own columns.

/// How a value of an entity table is displayed when referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityStyle {
    /// Just the id, e.g. `slice 12`.
    IdOnly,
    /// A name and an optional secondary id, e.g. `main [1234]`.
    Named {
        name_field: String,
        secondary_field: Option<String>,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Standard,
    Timestamp,
    Duration,
    /// A foreign key into another entity table.
    Entity(fn() -> EntityTable),
    /// An attribute set id.
    ArgSet,
}

#[derive(Debug, Clone)]
pub struct EntityField {
    /// Key of the discovered column. Stable across calls.
    pub key: String,
    pub field: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone)]
pub struct EntityTable {
    pub table: String,
    /// Human name of one row, e.g. `thread`.
    pub kind: String,
    pub id_field: String,
    /// Key of the primary-key column offered when the entity is expanded,
    /// e.g. `utid`.
    pub id_label: String,
    pub style: EntityStyle,
    pub fields: Vec<EntityField>,
}

impl EntityTable {
    /// A table whose rows are only identified by their id.
    pub fn id_only(table: impl Into<String>, kind: impl Into<String>) -> Self {
        EntityTable {
            table: table.into(),
            kind: kind.into(),
            id_field: "id".to_string(),
            id_label: "id".to_string(),
            style: EntityStyle::IdOnly,
            fields: Vec::new(),
        }
    }

    /// A table whose rows are displayed by name.
    pub fn named(table: impl Into<String>, kind: impl Into<String>, name_field: impl Into<String>) -> Self {
        EntityTable {
            style: EntityStyle::Named {
                name_field: name_field.into(),
                secondary_field: None,
            },
            ..Self::id_only(table, kind)
        }
    }

    pub fn secondary(mut self, field: impl Into<String>) -> Self {
        if let EntityStyle::Named {
            secondary_field, ..
        } = &mut self.style
        {
            *secondary_field = Some(field.into());
        }
        self
    }

    pub fn id_label(mut self, label: impl Into<String>) -> Self {
        self.id_label = label.into();
        self
    }

    pub fn field(mut self, field: impl Into<String>, kind: FieldKind) -> Self {
        let field = field.into();
        let key = match kind {
            FieldKind::ArgSet => format!("{field} (args)"),
            _ => field.clone(),
        };
        self.fields.push(EntityField { key, field, kind });
        self
    }

    pub fn is_named(&self) -> bool {
        matches!(self.style, EntityStyle::Named { .. })
    }

    pub fn thread() -> Self {
        EntityTable::named("thread", "thread", "name")
            .secondary("tid")
            .id_label("utid")
            .field("tid", FieldKind::Standard)
            .field("name", FieldKind::Standard)
            .field("start_ts", FieldKind::Timestamp)
            .field("end_ts", FieldKind::Timestamp)
            .field("upid", FieldKind::Entity(EntityTable::process))
            .field("is_main_thread", FieldKind::Standard)
    }

    pub fn process() -> Self {
        EntityTable::named("process", "process", "name")
            .secondary("pid")
            .id_label("upid")
            .field("pid", FieldKind::Standard)
            .field("name", FieldKind::Standard)
            .field("start_ts", FieldKind::Timestamp)
            .field("end_ts", FieldKind::Timestamp)
            .field("parent_upid", FieldKind::Entity(EntityTable::process))
            .field("uid", FieldKind::Standard)
            .field("android_appid", FieldKind::Standard)
            .field("cmdline", FieldKind::Standard)
            .field("arg_set_id", FieldKind::ArgSet)
    }

    pub fn slice() -> Self {
        EntityTable::id_only("slice", "slice")
            .field("ts", FieldKind::Timestamp)
            .field("dur", FieldKind::Duration)
            .field("name", FieldKind::Standard)
            .field("thread_dur", FieldKind::Duration)
            .field("parent_id", FieldKind::Entity(EntityTable::slice))
            .field("arg_set_id", FieldKind::ArgSet)
    }

    pub fn sched() -> Self {
        EntityTable::id_only("sched", "sched")
            .field("ts", FieldKind::Timestamp)
            .field("dur", FieldKind::Duration)
            .field("cpu", FieldKind::Standard)
            .field("utid", FieldKind::Entity(EntityTable::thread))
            .field("end_state", FieldKind::Standard)
            .field("priority", FieldKind::Standard)
    }

    pub fn thread_state() -> Self {
        EntityTable::id_only("thread_state", "thread_state")
            .field("ts", FieldKind::Timestamp)
            .field("dur", FieldKind::Duration)
            .field("state", FieldKind::Standard)
            .field("utid", FieldKind::Entity(EntityTable::thread))
            .field("cpu", FieldKind::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_thread() {
        let thread = EntityTable::thread();
        assert_eq!(thread.id_label, "utid");
        assert!(thread.is_named());
        assert_eq!(
            thread.style,
            EntityStyle::Named {
                name_field: "name".to_string(),
                secondary_field: Some("tid".to_string()),
            }
        );
        let upid = thread.fields.iter().find(|f| f.field == "upid").unwrap();
        match upid.kind {
            FieldKind::Entity(target) => assert_eq!(target().table, "process"),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_arg_set_field_key() {
        let process = EntityTable::process();
        let args = process.fields.last().unwrap();
        assert_eq!(args.key, "arg_set_id (args)");
        assert!(matches!(args.kind, FieldKind::ArgSet));
    }

    #[test]
    fn test_custom_entity() {
        let owners = EntityTable::named("owners", "owner", "display_name");
        assert_eq!(owners.id_field, "id");
        assert!(owners.fields.is_empty());
        assert!(!EntityTable::slice().is_named());
    }
}
