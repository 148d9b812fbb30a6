use crate::model::item::{ContainerKind, ItemKind};

/// Flags written on freshly created pages.
pub const PAGE_FLAGS: i64 = 2;
/// Flags written on freshly created folder roots.
pub const FOLDER_FLAGS: i64 = 0;

pub const APPS_ROOT_ID: i64 = 1;
pub const WIDGETS_ROOT_ID: i64 = 3;
/// Highest identifier taken by [`RESERVED_ROOTS`].
pub const RESERVED_MAX_ID: i64 = 6;

/// A structural row in `items` plus its `groups` metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: i64,
    pub uuid: String,
    pub flags: Option<i64>,
    pub kind: ContainerKind,
    pub parent_id: i64,
    pub ordering: i64,
    /// Only folder roots carry a display title.
    pub title: Option<String>,
}

/// New placement fields for an existing item. `title` is carried for
/// reporting only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPlacement {
    pub id: i64,
    pub title: String,
    pub uuid: String,
    pub flags: Option<i64>,
    pub kind: ItemKind,
    pub parent_id: i64,
    pub ordering: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    CreateContainer(ContainerRecord),
    ReassignItem(ItemPlacement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRoot {
    pub id: i64,
    pub uuid: &'static str,
    pub kind: ContainerKind,
    pub parent_id: i64,
}

/// Root and holding page for each kind-space. The Dock expects these rows
/// verbatim.
pub const RESERVED_ROOTS: [ReservedRoot; 6] = [
    ReservedRoot { id: 1, uuid: "ROOTPAGE", kind: ContainerKind::Root, parent_id: 0 },
    ReservedRoot { id: 2, uuid: "HOLDINGPAGE", kind: ContainerKind::Page, parent_id: 1 },
    ReservedRoot { id: 3, uuid: "ROOTPAGE_DB", kind: ContainerKind::Root, parent_id: 0 },
    ReservedRoot { id: 4, uuid: "HOLDINGPAGE_DB", kind: ContainerKind::Page, parent_id: 3 },
    ReservedRoot { id: 5, uuid: "ROOTPAGE_VERS", kind: ContainerKind::Root, parent_id: 0 },
    ReservedRoot { id: 6, uuid: "HOLDINGPAGE_VERS", kind: ContainerKind::Page, parent_id: 5 },
];

impl ReservedRoot {
    pub fn record(&self) -> ContainerRecord {
        ContainerRecord {
            id: self.id,
            uuid: self.uuid.to_string(),
            flags: None,
            kind: self.kind,
            parent_id: self.parent_id,
            ordering: 0,
            title: None,
        }
    }

    pub fn is_reserved_uuid(uuid: &str) -> bool { RESERVED_ROOTS.iter().any(|r| r.uuid == uuid) }
}

/// Containers created during one build pass. Identifiers are arena indices
/// offset by `base`, so the first container gets `base + 1`.
#[derive(Debug, Clone, Default)]
pub struct ContainerArena {
    base: i64,
    nodes: Vec<ContainerRecord>,
}

impl ContainerArena {
    /// `base` is clamped above the reserved root identifiers.
    pub fn new(base: i64) -> Self {
        Self {
            base: base.max(RESERVED_MAX_ID),
            nodes: Vec::new(),
        }
    }

    pub fn alloc(
        &mut self,
        kind: ContainerKind,
        uuid: String,
        parent_id: i64,
        ordering: i64,
        title: Option<String>,
    ) -> &ContainerRecord {
        let flags = match kind {
            ContainerKind::FolderRoot => FOLDER_FLAGS,
            ContainerKind::Root | ContainerKind::Page => PAGE_FLAGS,
        };
        let id = self.next_id();
        self.nodes.push(ContainerRecord {
            id,
            uuid,
            flags: Some(flags),
            kind,
            parent_id,
            ordering,
            title,
        });
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn get(&self, id: i64) -> Option<&ContainerRecord> {
        let index = usize::try_from(id - self.base - 1).ok()?;
        self.nodes.get(index)
    }

    /// Identifier the next allocation will receive.
    pub fn next_id(&self) -> i64 { self.base + self.nodes.len() as i64 + 1 }

    /// Highest identifier handed out so far, or `base` if none.
    pub fn last_id(&self) -> i64 { self.base + self.nodes.len() as i64 }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
}
