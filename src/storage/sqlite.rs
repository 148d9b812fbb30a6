use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params, params_from_iter};
use tracing::{debug, warn};

use super::{ChildRow, ChildrenByParent, ItemRow, LaunchpadStore, RootIds};
use crate::error::{Result, SyncError};
use crate::model::{
    APPS_ROOT_ID, ContainerKind, ContainerRecord, ItemKind, ItemPlacement, RESERVED_ROOTS,
    WIDGETS_ROOT_ID,
};

const REQUIRED_TABLES: &[&str] = &["items", "groups", "dbinfo", "apps", "widgets"];

const ORDERING_TRIGGER_KEY: &str = "ignore_items_update_triggers";

/// [`LaunchpadStore`] over the Dock's SQLite file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens an existing database. Never creates one: a missing or foreign
    /// file is `StorageUnavailable`.
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| SyncError::StorageUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        if !path.is_file() {
            return Err(unavailable("no such file".to_string()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| unavailable(e.to_string()))?;
        Self::with_connection(conn, path.to_path_buf())
    }

    /// Wraps an already open connection, e.g. an in-memory database.
    pub fn with_connection(conn: Connection, path: PathBuf) -> Result<Self> {
        probe_schema(&conn).map_err(|reason| SyncError::StorageUnavailable { path: path.clone(), reason })?;
        debug!(path = %path.display(), "opened launchpad database");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection { &self.conn }
}

fn probe_schema(conn: &Connection) -> std::result::Result<(), String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
        .map_err(|e| e.to_string())?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
        .map_err(|e| e.to_string())?;

    let missing: Vec<_> = REQUIRED_TABLES
        .iter()
        .filter(|table| !tables.iter().any(|t| t == *table))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing tables: {}", missing.join(", ")))
    }
}

fn placeholders(count: usize) -> String { vec!["?"; count].join(", ") }

fn dbinfo_id(value: Value) -> Option<i64> {
    match value {
        Value::Integer(id) => Some(id),
        Value::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

impl LaunchpadStore for SqliteStore {
    fn item_rows(&mut self, kind: ItemKind) -> Result<Vec<ItemRow>> {
        let table = kind.table();
        let sql = format!(
            "SELECT {table}.item_id, {table}.title, items.uuid, items.flags
             FROM {table}
             JOIN items ON items.rowid = {table}.item_id
             ORDER BY {table}.item_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, title, uuid, flags) = row?;
            items.push(ItemRow {
                id,
                title,
                uuid: uuid.unwrap_or_default(),
                flags,
            });
        }
        Ok(items)
    }

    fn max_item_id(&mut self) -> Result<i64> {
        let sql = format!(
            "SELECT ifnull(max(rowid), 0) FROM items WHERE type IS NULL OR type NOT IN ({})",
            placeholders(ContainerKind::ALL.len())
        );
        let max = self.conn.query_row(
            &sql,
            params_from_iter(ContainerKind::ALL.iter().map(|&k| i64::from(k))),
            |row| row.get(0),
        )?;
        Ok(max)
    }

    fn delete_all_containers(&mut self, kinds: &[ContainerKind]) -> Result<usize> {
        if kinds.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM items WHERE type IN ({})", placeholders(kinds.len()));
        let removed = self
            .conn
            .execute(&sql, params_from_iter(kinds.iter().map(|&k| i64::from(k))))?;
        let orphaned = self
            .conn
            .execute("DELETE FROM groups WHERE item_id NOT IN (SELECT rowid FROM items)", [])?;
        debug!(removed, orphaned, "deleted containers");
        Ok(removed)
    }

    fn create_container(&mut self, record: &ContainerRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO items (rowid, uuid, flags, type, parent_id, ordering)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.uuid,
                record.flags,
                i64::from(record.kind),
                record.parent_id,
                record.ordering
            ],
        )?;
        Ok(())
    }

    fn create_group_metadata(&mut self, id: i64, title: Option<&str>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO groups (item_id, category_id, title) VALUES (?1, NULL, ?2)",
            params![id, title],
        )?;
        Ok(())
    }

    fn reassign_item(&mut self, placement: &ItemPlacement) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE items
             SET uuid = ?1, flags = ?2, type = ?3, parent_id = ?4, ordering = ?5
             WHERE rowid = ?6",
            params![
                placement.uuid,
                placement.flags,
                i64::from(placement.kind),
                placement.parent_id,
                placement.ordering,
                placement.id
            ],
        )?;
        if updated == 0 {
            warn!(id = placement.id, title = %placement.title, "item disappeared before placement");
        }
        Ok(())
    }

    fn set_ordering_enforcement(&mut self, enabled: bool) -> Result<()> {
        let ignore = if enabled { 0 } else { 1 };
        let updated = self.conn.execute(
            "UPDATE dbinfo SET value = ?1 WHERE key = ?2",
            params![ignore, ORDERING_TRIGGER_KEY],
        )?;
        if updated == 0 {
            debug!("dbinfo has no {} entry", ORDERING_TRIGGER_KEY);
        }
        Ok(())
    }

    fn root_ids(&mut self) -> Result<RootIds> {
        let lookup = |key: &str| -> Result<Option<i64>> {
            let value = self
                .conn
                .query_row("SELECT value FROM dbinfo WHERE key = ?1", params![key], |row| {
                    row.get::<_, Value>(0)
                })
                .optional()?;
            Ok(value.and_then(dbinfo_id))
        };

        let launchpad = lookup("launchpad_root")?.unwrap_or_else(|| {
            warn!("dbinfo has no launchpad_root, assuming {}", APPS_ROOT_ID);
            APPS_ROOT_ID
        });
        let dashboard = lookup("dashboard_root")?.unwrap_or_else(|| {
            warn!("dbinfo has no dashboard_root, assuming {}", WIDGETS_ROOT_ID);
            WIDGETS_ROOT_ID
        });
        Ok(RootIds { launchpad, dashboard })
    }

    fn children_by_parent(&mut self) -> Result<ChildrenByParent> {
        let sql = format!(
            "SELECT items.rowid, items.parent_id, items.type,
                    apps.title, widgets.title, groups.title
             FROM items
             LEFT JOIN apps ON apps.item_id = items.rowid
             LEFT JOIN widgets ON widgets.item_id = items.rowid
             LEFT JOIN groups ON groups.item_id = items.rowid
             WHERE items.uuid NOT IN ({})
             ORDER BY items.parent_id, items.ordering",
            placeholders(RESERVED_ROOTS.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(RESERVED_ROOTS.iter().map(|r| r.uuid)), |row| {
            Ok((
                row.get::<_, i64>(1)?,
                ChildRow {
                    id: row.get(0)?,
                    kind: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
                    app_title: row.get(3)?,
                    widget_title: row.get(4)?,
                    group_title: row.get(5)?,
                },
            ))
        })?;

        let mut children = ChildrenByParent::default();
        for row in rows {
            let (parent_id, child) = row?;
            children.entry(parent_id).or_default().push(child);
        }
        Ok(children)
    }
}
