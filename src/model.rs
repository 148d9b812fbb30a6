pub mod container;
pub mod item;
pub mod layout;

pub use container::{
    APPS_ROOT_ID, ContainerArena, ContainerRecord, ItemPlacement, Placement, RESERVED_ROOTS,
    ReservedRoot, WIDGETS_ROOT_ID,
};
pub use item::{ContainerKind, IdentityMap, ItemIdentity, ItemKind, RecordKind};
pub use layout::{Entry, Folder, LaunchpadLayout, Layout, LayoutFormat, Page};
