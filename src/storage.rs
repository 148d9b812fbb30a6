//! The seam between the synchronizer and the Launchpad database.
//!
//! [`LaunchpadStore`] owns no policy: it inserts, updates and reads rows as
//! asked. Every call commits on its own before the next runs, so a pass that
//! is interrupted leaves whatever was written so far; recovery is a full
//! rebuild.

use tracing::{debug, error};

use crate::common::collections::HashMap;
use crate::error::Result;
use crate::model::{ContainerKind, ContainerRecord, ItemKind, ItemPlacement, Placement, RESERVED_ROOTS};

pub mod sqlite;

pub use sqlite::SqliteStore;

/// One row of `<kind table> JOIN items`. Untitled rows are kept so their
/// ids still count when picking fresh container ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: i64,
    pub title: Option<String>,
    pub uuid: String,
    pub flags: Option<i64>,
}

/// A child of some parent, as seen by the extraction query. `kind` is the raw
/// `items.type` value so unknown kinds survive until the extractor drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRow {
    pub id: i64,
    pub kind: i64,
    pub app_title: Option<String>,
    pub widget_title: Option<String>,
    pub group_title: Option<String>,
}

impl ChildRow {
    pub fn new(id: i64, kind: impl Into<i64>) -> Self {
        Self {
            id,
            kind: kind.into(),
            app_title: None,
            widget_title: None,
            group_title: None,
        }
    }
}

/// Children keyed by parent id, each list in sibling order.
pub type ChildrenByParent = HashMap<i64, Vec<ChildRow>>;

/// Entry points for the two user-visible kind-spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootIds {
    pub launchpad: i64,
    pub dashboard: i64,
}

pub trait LaunchpadStore {
    /// Items of one kind along with their titles.
    fn item_rows(&mut self, kind: ItemKind) -> Result<Vec<ItemRow>>;

    /// Highest row id of any non-container row, whatever its kind and
    /// whether or not it has a title. 0 for an empty table.
    fn max_item_id(&mut self) -> Result<i64>;

    /// Removes every container of the given kinds and any group metadata
    /// left without an owner. Returns the number of containers removed.
    fn delete_all_containers(&mut self, kinds: &[ContainerKind]) -> Result<usize>;

    fn create_container(&mut self, record: &ContainerRecord) -> Result<()>;

    fn create_group_metadata(&mut self, id: i64, title: Option<&str>) -> Result<()>;

    fn reassign_item(&mut self, placement: &ItemPlacement) -> Result<()>;

    /// When disabled, the database's triggers stop rewriting `ordering` on
    /// insert and update.
    fn set_ordering_enforcement(&mut self, enabled: bool) -> Result<()>;

    fn root_ids(&mut self) -> Result<RootIds>;

    fn children_by_parent(&mut self) -> Result<ChildrenByParent>;

    fn apply(&mut self, placement: &Placement) -> Result<()> {
        match placement {
            Placement::CreateContainer(record) => {
                self.create_container(record)?;
                self.create_group_metadata(record.id, record.title.as_deref())
            }
            Placement::ReassignItem(item) => self.reassign_item(item),
        }
    }
}

/// Runs `f` with ordering enforcement disabled. Enforcement is switched back
/// on whether or not `f` succeeds; `f`'s error takes precedence.
pub fn with_ordering_suspended<S, T, F>(store: &mut S, f: F) -> Result<T>
where
    S: LaunchpadStore + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    store.set_ordering_enforcement(false)?;
    let result = f(store);
    let restored = store.set_ordering_enforcement(true);
    match (result, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            error!("Could not re-enable ordering triggers: {}", restore_err);
            Err(e)
        }
    }
}

/// Writes the six fixed root and holding rows.
pub fn create_reserved_roots<S: LaunchpadStore + ?Sized>(store: &mut S) -> Result<()> {
    for root in &RESERVED_ROOTS {
        debug!(id = root.id, uuid = root.uuid, "creating reserved root");
        store.apply(&Placement::CreateContainer(root.record()))?;
    }
    Ok(())
}
