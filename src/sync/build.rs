use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    ContainerArena, ContainerKind, Entry, Folder, IdentityMap, ItemKind, ItemPlacement, Layout,
    Placement,
};
use crate::storage::LaunchpadStore;
use crate::sync::report::{Diagnostic, Reporter};

/// Supplies the `uuid` written on each new container.
pub trait TokenSource {
    fn next_token(&mut self) -> String;
}

/// Uppercase random UUIDs, the form the Dock itself writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&mut self) -> String { Uuid::new_v4().hyphenated().to_string().to_uppercase() }
}

/// `PREFIX-1`, `PREFIX-2`, ... for reproducible plans.
#[derive(Debug, Clone)]
pub struct SequentialTokens {
    prefix: String,
    next: u64,
}

impl SequentialTokens {
    pub fn new(prefix: impl Into<String>) -> Self { Self { prefix: prefix.into(), next: 1 } }
}

impl TokenSource for SequentialTokens {
    fn next_token(&mut self) -> String {
        let token = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        token
    }
}

/// Everything needed to lay out one kind-space, in the order it must be
/// written.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub kind: ItemKind,
    pub root_id: i64,
    /// Top-level pages, trailing pages for missing items included.
    pub pages: usize,
    pub containers: ContainerArena,
    pub placements: Vec<Placement>,
    pub unresolved: Vec<String>,
}

impl BuildPlan {
    /// The last identifier handed out, or the start id if nothing was
    /// created. The next kind-space continues from here.
    pub fn end_id(&self) -> i64 { self.containers.last_id() }

    pub fn placed_items(&self) -> impl Iterator<Item = &ItemPlacement> + '_ {
        self.placements.iter().filter_map(|p| match p {
            Placement::ReassignItem(item) => Some(item),
            Placement::CreateContainer(_) => None,
        })
    }

    /// Writes the plan one statement at a time.
    #[instrument(skip(self, store), fields(kind = %self.kind, placements = self.placements.len()))]
    pub fn apply<S: LaunchpadStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        for placement in &self.placements {
            trace!(?placement, "applying");
            store.apply(placement)?;
        }
        Ok(())
    }
}

struct HierarchyBuilder<'a> {
    kind: ItemKind,
    map: &'a IdentityMap,
    tokens: &'a mut dyn TokenSource,
    reporter: &'a mut dyn Reporter,
    arena: ContainerArena,
    placements: Vec<Placement>,
    unresolved: Vec<String>,
}

impl HierarchyBuilder<'_> {
    fn container(
        &mut self,
        kind: ContainerKind,
        parent_id: i64,
        ordering: i64,
        title: Option<String>,
    ) -> i64 {
        let uuid = self.tokens.next_token();
        let record = self.arena.alloc(kind, uuid, parent_id, ordering, title).clone();
        let id = record.id;
        self.placements.push(Placement::CreateContainer(record));
        id
    }

    /// Returns whether the title resolved and took an ordering slot.
    fn item(&mut self, title: &str, parent_id: i64, ordering: i64) -> bool {
        let Some(identity) = self.map.get(title) else {
            self.unresolved.push(title.to_string());
            self.reporter.report(&Diagnostic::UnresolvedReference {
                kind: self.kind,
                title: title.to_string(),
            });
            return false;
        };
        self.placements.push(Placement::ReassignItem(ItemPlacement {
            id: identity.id,
            title: title.to_string(),
            uuid: identity.uuid.clone(),
            flags: identity.flags,
            kind: self.kind,
            parent_id,
            ordering,
        }));
        true
    }

    fn page(&mut self, root_id: i64, page_index: usize, entries: &[Entry]) {
        // Ordering 0 under each root belongs to the holding page.
        let page_id = self.container(ContainerKind::Page, root_id, page_index as i64 + 1, None);

        let mut ordering = 0;
        for entry in entries {
            match entry {
                Entry::Title(title) => {
                    if self.item(title, page_id, ordering) {
                        ordering += 1;
                    }
                }
                Entry::Folder(folder) => {
                    if self.folder(folder, page_id, ordering) {
                        ordering += 1;
                    }
                }
            }
        }
    }

    fn folder(&mut self, folder: &Folder, page_id: i64, ordering: i64) -> bool {
        if folder.folder_layout.is_empty() {
            self.reporter.report(&Diagnostic::EmptyFolder {
                kind: self.kind,
                title: folder.folder_title.clone(),
            });
            return false;
        }

        let folder_id = self.container(
            ContainerKind::FolderRoot,
            page_id,
            ordering,
            Some(folder.folder_title.clone()),
        );
        for (index, titles) in folder.folder_layout.iter().enumerate() {
            let folder_page_id = self.container(ContainerKind::Page, folder_id, index as i64, None);
            let mut item_ordering = 0;
            for title in titles {
                if self.item(title, folder_page_id, item_ordering) {
                    item_ordering += 1;
                }
            }
        }
        true
    }
}

/// Plans the container tree for `layout` under `root_id`. Container ids
/// start right after `start_id`. Titles missing from `map` are reported and
/// skipped.
#[instrument(skip(layout, map, tokens, reporter), fields(pages = layout.len()))]
pub fn build(
    kind: ItemKind,
    layout: &Layout,
    map: &IdentityMap,
    start_id: i64,
    root_id: i64,
    tokens: &mut dyn TokenSource,
    reporter: &mut dyn Reporter,
) -> BuildPlan {
    let mut builder = HierarchyBuilder {
        kind,
        map,
        tokens,
        reporter,
        arena: ContainerArena::new(start_id),
        placements: Vec::new(),
        unresolved: Vec::new(),
    };
    for (index, page) in layout.iter().enumerate() {
        builder.page(root_id, index, page);
    }

    debug!(
        containers = builder.arena.len(),
        end_id = builder.arena.last_id(),
        unresolved = builder.unresolved.len(),
        "planned hierarchy"
    );
    BuildPlan {
        kind,
        root_id,
        pages: layout.len(),
        containers: builder.arena,
        placements: builder.placements,
        unresolved: builder.unresolved,
    }
}
