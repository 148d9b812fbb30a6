use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::common::collections::BTreeMap;

/// Raw values of the `items.type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i64)]
pub enum RecordKind {
    Root = 1,
    FolderRoot = 2,
    Page = 3,
    Application = 4,
    DownloadingApplication = 5,
    Widget = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Application,
    DownloadingApplication,
    Widget,
}

impl ItemKind {
    /// Sub-table holding `(item_id, title)` for this kind.
    pub fn table(self) -> &'static str {
        match self {
            ItemKind::Application => "apps",
            ItemKind::DownloadingApplication => "downloading_apps",
            ItemKind::Widget => "widgets",
        }
    }

    pub fn record_kind(self) -> RecordKind {
        match self {
            ItemKind::Application => RecordKind::Application,
            ItemKind::DownloadingApplication => RecordKind::DownloadingApplication,
            ItemKind::Widget => RecordKind::Widget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ContainerKind {
    Root,
    FolderRoot,
    Page,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 3] =
        [ContainerKind::Root, ContainerKind::FolderRoot, ContainerKind::Page];

    pub fn record_kind(self) -> RecordKind {
        match self {
            ContainerKind::Root => RecordKind::Root,
            ContainerKind::FolderRoot => RecordKind::FolderRoot,
            ContainerKind::Page => RecordKind::Page,
        }
    }
}

impl From<ItemKind> for i64 {
    fn from(kind: ItemKind) -> i64 { kind.record_kind().into() }
}

impl From<ContainerKind> for i64 {
    fn from(kind: ContainerKind) -> i64 { kind.record_kind().into() }
}

/// Placement-independent identity of an item owned by the Dock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIdentity {
    pub id: i64,
    pub uuid: String,
    pub flags: Option<i64>,
}

/// Title to identity lookup for one item kind, along with the highest row id
/// seen while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    entries: BTreeMap<String, ItemIdentity>,
    max_id: i64,
}

impl IdentityMap {
    pub fn new() -> Self { Self::default() }

    /// Inserts an identity, returning the one it replaced if the title was
    /// already present. `max_id` accounts for both.
    pub fn insert(&mut self, title: String, identity: ItemIdentity) -> Option<ItemIdentity> {
        self.max_id = self.max_id.max(identity.id);
        self.entries.insert(title, identity)
    }

    /// Accounts for a row that has no title and so gets no entry.
    pub fn observe_id(&mut self, id: i64) { self.max_id = self.max_id.max(id); }

    pub fn get(&self, title: &str) -> Option<&ItemIdentity> { self.entries.get(title) }

    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn max_id(&self) -> i64 { self.max_id }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl FromIterator<(String, ItemIdentity)> for IdentityMap {
    fn from_iter<I: IntoIterator<Item = (String, ItemIdentity)>>(iter: I) -> Self {
        let mut map = IdentityMap::new();
        for (title, identity) in iter {
            map.insert(title, identity);
        }
        map
    }
}
