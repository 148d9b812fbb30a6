use tracing::trace;

use crate::model::{Entry, Folder, Layout, Page, RecordKind};
use crate::storage::{ChildRow, ChildrenByParent};

/// Rebuilds the declarative layout hanging off `root_id`. Every child of the
/// root is read as a page. Rows of unknown kind, untitled leaves and folders
/// nested inside folders are left out.
pub fn extract(root_id: i64, children: &ChildrenByParent) -> Layout {
    children_of(children, root_id)
        .iter()
        .map(|page| page_entries(children, page.id))
        .collect()
}

fn children_of(children: &ChildrenByParent, parent_id: i64) -> &[ChildRow] {
    children.get(&parent_id).map(Vec::as_slice).unwrap_or(&[])
}

fn leaf_title(row: &ChildRow) -> Option<&str> {
    match RecordKind::try_from(row.kind).ok()? {
        RecordKind::Application => row.app_title.as_deref(),
        RecordKind::Widget => row.widget_title.as_deref(),
        _ => None,
    }
}

fn page_entries(children: &ChildrenByParent, page_id: i64) -> Page {
    let mut entries = Vec::new();
    for row in children_of(children, page_id) {
        match RecordKind::try_from(row.kind) {
            Ok(RecordKind::Application | RecordKind::Widget) => {
                if let Some(title) = leaf_title(row) {
                    entries.push(Entry::Title(title.to_string()));
                }
            }
            Ok(RecordKind::FolderRoot) => entries.push(Entry::Folder(Folder {
                folder_title: row.group_title.clone().unwrap_or_default(),
                folder_layout: children_of(children, row.id)
                    .iter()
                    .map(|folder_page| folder_titles(children, folder_page.id))
                    .collect(),
            })),
            _ => trace!(id = row.id, kind = row.kind, "omitting row from page"),
        }
    }
    entries
}

fn folder_titles(children: &ChildrenByParent, page_id: i64) -> Vec<String> {
    children_of(children, page_id)
        .iter()
        .filter_map(leaf_title)
        .map(str::to_owned)
        .collect()
}
