use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{IdentityMap, ItemIdentity, ItemKind};
use crate::storage::{ItemRow, LaunchpadStore};
use crate::sync::report::{Diagnostic, Reporter};

/// Maps every stored item of `kind` by title.
#[instrument(skip(store, reporter))]
pub fn resolve<S>(store: &mut S, kind: ItemKind, reporter: &mut dyn Reporter) -> Result<IdentityMap>
where
    S: LaunchpadStore + ?Sized,
{
    let rows = store.item_rows(kind)?;
    let map = identities_from_rows(kind, rows, reporter);
    debug!(items = map.len(), max_id = map.max_id(), "resolved identities");
    Ok(map)
}

/// Later rows replace earlier ones that share a title; each replacement is
/// reported as a [`Diagnostic::TitleCollision`]. Untitled rows only raise
/// `max_id`.
pub fn identities_from_rows(
    kind: ItemKind,
    rows: impl IntoIterator<Item = ItemRow>,
    reporter: &mut dyn Reporter,
) -> IdentityMap {
    let mut map = IdentityMap::new();
    for ItemRow { id, title, uuid, flags } in rows {
        let Some(title) = title else {
            debug!(id, %kind, "untitled item has no mapping");
            map.observe_id(id);
            continue;
        };
        let identity = ItemIdentity { id, uuid, flags };
        if let Some(previous) = map.insert(title.clone(), identity) {
            reporter.report(&Diagnostic::TitleCollision {
                kind,
                title,
                kept_id: id,
                dropped_id: previous.id,
            });
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, title: &str) -> ItemRow {
        ItemRow {
            id,
            title: Some(title.to_string()),
            uuid: format!("uuid-{id}"),
            flags: Some(id % 3),
        }
    }

    #[test]
    fn maps_titles_and_tracks_max_id() {
        let mut diagnostics = Vec::new();
        let map = identities_from_rows(
            ItemKind::Application,
            vec![row(101, "Safari"), row(140, "Mail"), row(120, "Notes")],
            &mut diagnostics,
        );
        assert!(diagnostics.is_empty());
        assert_eq!(map.len(), 3);
        assert_eq!(map.max_id(), 140);
        assert_eq!(
            map.get("Mail"),
            Some(&ItemIdentity { id: 140, uuid: "uuid-140".into(), flags: Some(2) })
        );
    }

    #[test]
    fn last_row_wins_on_collision() {
        let mut diagnostics = Vec::new();
        let map = identities_from_rows(
            ItemKind::Widget,
            vec![row(30, "Weather"), row(31, "Weather")],
            &mut diagnostics,
        );
        assert_eq!(map.get("Weather").map(|i| i.id), Some(31));
        assert_eq!(map.max_id(), 31);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::TitleCollision {
                kind: ItemKind::Widget,
                title: "Weather".into(),
                kept_id: 31,
                dropped_id: 30,
            }]
        );
    }

    #[test]
    fn untitled_rows_raise_max_id_without_an_entry() {
        let mut diagnostics = Vec::new();
        let untitled = ItemRow { title: None, ..row(150, "") };
        let map = identities_from_rows(
            ItemKind::Application,
            vec![row(101, "Safari"), untitled],
            &mut diagnostics,
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.max_id(), 150);
        assert!(map.get("").is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn empty_scan_has_zero_max_id() {
        let map = identities_from_rows(ItemKind::Application, Vec::new(), &mut Vec::new());
        assert!(map.is_empty());
        assert_eq!(map.max_id(), 0);
    }
}
