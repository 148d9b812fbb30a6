#![allow(dead_code)]

use std::path::{Path, PathBuf};

use launchpad_sync::Result;
use launchpad_sync::model::{ContainerKind, ContainerRecord, ItemKind, ItemPlacement};
use launchpad_sync::storage::{ChildrenByParent, ItemRow, LaunchpadStore, RootIds, SqliteStore};
use rusqlite::{Connection, params};

/// The parts of the Dock's schema the synchronizer touches, with an ordering
/// trigger that only fires while `ignore_items_update_triggers` is 0.
pub const SCHEMA: &str = "
CREATE TABLE dbinfo (key VARCHAR, value VARCHAR);
CREATE TABLE items (
    rowid INTEGER PRIMARY KEY ASC,
    uuid VARCHAR,
    flags INTEGER,
    type INTEGER,
    parent_id INTEGER NOT NULL,
    ordering INTEGER
);
CREATE TABLE apps (item_id INTEGER PRIMARY KEY, title VARCHAR, bundleid VARCHAR);
CREATE TABLE widgets (item_id INTEGER PRIMARY KEY, title VARCHAR, bundleid VARCHAR);
CREATE TABLE downloading_apps (item_id INTEGER PRIMARY KEY, title VARCHAR, bundleid VARCHAR);
CREATE TABLE groups (item_id INTEGER PRIMARY KEY, category_id INTEGER, title VARCHAR);

CREATE TRIGGER insert_item_ordering AFTER INSERT ON items
WHEN CAST((SELECT value FROM dbinfo WHERE key = 'ignore_items_update_triggers') AS INTEGER) = 0
BEGIN
    UPDATE items
    SET ordering = (
        SELECT ifnull(max(ordering), -1) + 1 FROM items
        WHERE parent_id = new.parent_id AND rowid != new.rowid
    )
    WHERE rowid = new.rowid;
END;

INSERT INTO dbinfo (key, value) VALUES
    ('ignore_items_update_triggers', '0'),
    ('launchpad_root', '1'),
    ('dashboard_root', '3');
";

pub fn seeded_connection(conn: Connection) -> Connection {
    conn.execute_batch(SCHEMA).unwrap();
    // What the Dock writes on a fresh database: roots plus holding pages.
    conn.execute_batch(
        "
        INSERT INTO items (rowid, uuid, flags, type, parent_id, ordering) VALUES
            (1, 'ROOTPAGE', NULL, 1, 0, 0),
            (2, 'HOLDINGPAGE', NULL, 3, 1, 0),
            (3, 'ROOTPAGE_DB', NULL, 1, 0, 0),
            (4, 'HOLDINGPAGE_DB', NULL, 3, 3, 0),
            (5, 'ROOTPAGE_VERS', NULL, 1, 0, 0),
            (6, 'HOLDINGPAGE_VERS', NULL, 3, 5, 0);
        INSERT INTO groups (item_id, category_id, title) VALUES
            (1, NULL, NULL), (2, NULL, NULL), (3, NULL, NULL),
            (4, NULL, NULL), (5, NULL, NULL), (6, NULL, NULL);
        ",
    )
    .unwrap();
    conn
}

pub fn memory_store() -> SqliteStore {
    let conn = seeded_connection(Connection::open_in_memory().unwrap());
    SqliteStore::with_connection(conn, PathBuf::from(":memory:")).unwrap()
}

/// Creates a seeded database file at `path`.
pub fn create_db_file(path: &Path) {
    seeded_connection(Connection::open(path).unwrap());
}

fn add_item(conn: &Connection, kind: ItemKind, id: i64, title: &str) {
    let holding_page = match kind {
        ItemKind::Widget => 4,
        _ => 2,
    };
    conn.execute(
        "INSERT INTO items (rowid, uuid, flags, type, parent_id, ordering) VALUES (?1, ?2, 0, ?3, ?4, 0)",
        params![id, format!("ITEM-{id}"), i64::from(kind), holding_page],
    )
    .unwrap();
    conn.execute(
        &format!("INSERT INTO {} (item_id, title) VALUES (?1, ?2)", kind.table()),
        params![id, title],
    )
    .unwrap();
}

pub fn add_app(store: &SqliteStore, id: i64, title: &str) {
    add_item(store.connection(), ItemKind::Application, id, title);
}

pub fn add_widget(store: &SqliteStore, id: i64, title: &str) {
    add_item(store.connection(), ItemKind::Widget, id, title);
}

pub fn add_downloading_app(store: &SqliteStore, id: i64, title: &str) {
    add_item(store.connection(), ItemKind::DownloadingApplication, id, title);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: i64,
    pub uuid: Option<String>,
    pub flags: Option<i64>,
    pub kind: i64,
    pub parent_id: i64,
    pub ordering: i64,
}

pub fn item(store: &SqliteStore, id: i64) -> ItemRecord {
    store
        .connection()
        .query_row(
            "SELECT rowid, uuid, flags, type, parent_id, ordering FROM items WHERE rowid = ?1",
            params![id],
            |row| {
                Ok(ItemRecord {
                    id: row.get(0)?,
                    uuid: row.get(1)?,
                    flags: row.get(2)?,
                    kind: row.get(3)?,
                    parent_id: row.get(4)?,
                    ordering: row.get(5)?,
                })
            },
        )
        .unwrap()
}

pub fn ordering_flag(store: &SqliteStore) -> String {
    store
        .connection()
        .query_row(
            "SELECT CAST(value AS TEXT) FROM dbinfo WHERE key = 'ignore_items_update_triggers'",
            [],
            |row| row.get(0),
        )
        .unwrap()
}

pub fn count(store: &SqliteStore, sql: &str) -> i64 {
    store.connection().query_row(sql, [], |row| row.get(0)).unwrap()
}

/// Logs every call before delegating to the wrapped store. Fails
/// `reassign_item` for the title in `fail_on`.
pub struct Recording<S> {
    pub inner: S,
    pub calls: Vec<String>,
    pub fail_on: Option<String>,
}

impl<S> Recording<S> {
    pub fn new(inner: S) -> Self { Self { inner, calls: Vec::new(), fail_on: None } }
}

impl<S: LaunchpadStore> LaunchpadStore for Recording<S> {
    fn item_rows(&mut self, kind: ItemKind) -> Result<Vec<ItemRow>> {
        self.calls.push(format!("item_rows {kind}"));
        self.inner.item_rows(kind)
    }

    fn max_item_id(&mut self) -> Result<i64> {
        self.calls.push("max_item_id".to_string());
        self.inner.max_item_id()
    }

    fn delete_all_containers(&mut self, kinds: &[ContainerKind]) -> Result<usize> {
        self.calls.push("delete_all_containers".to_string());
        self.inner.delete_all_containers(kinds)
    }

    fn create_container(&mut self, record: &ContainerRecord) -> Result<()> {
        self.calls.push(format!("create_container {}", record.id));
        self.inner.create_container(record)
    }

    fn create_group_metadata(&mut self, id: i64, title: Option<&str>) -> Result<()> {
        self.calls.push(format!("create_group_metadata {id}"));
        self.inner.create_group_metadata(id, title)
    }

    fn reassign_item(&mut self, placement: &ItemPlacement) -> Result<()> {
        self.calls.push(format!("reassign_item {}", placement.title));
        if self.fail_on.as_deref() == Some(placement.title.as_str()) {
            return Err(rusqlite::Error::QueryReturnedNoRows.into());
        }
        self.inner.reassign_item(placement)
    }

    fn set_ordering_enforcement(&mut self, enabled: bool) -> Result<()> {
        self.calls.push(format!("set_ordering_enforcement {enabled}"));
        self.inner.set_ordering_enforcement(enabled)
    }

    fn root_ids(&mut self) -> Result<RootIds> {
        self.calls.push("root_ids".to_string());
        self.inner.root_ids()
    }

    fn children_by_parent(&mut self) -> Result<ChildrenByParent> {
        self.calls.push("children_by_parent".to_string());
        self.inner.children_by_parent()
    }
}
