use std::fmt;

use tracing::warn;

use crate::model::ItemKind;

/// Recoverable conditions noticed while resolving, normalizing or building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Two stored items share a title; the later row replaced the earlier.
    TitleCollision {
        kind: ItemKind,
        title: String,
        kept_id: i64,
        dropped_id: i64,
    },
    /// The layout names a title that is not in the database. The entry was
    /// skipped.
    UnresolvedReference { kind: ItemKind, title: String },
    /// A folder without pages. It was not created and took no slot.
    EmptyFolder { kind: ItemKind, title: String },
    /// Stored items the layout did not mention, appended as trailing pages.
    MissingItems { kind: ItemKind, titles: Vec<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TitleCollision { kind, title, kept_id, dropped_id } => write!(
                f,
                "Two {kind} items are titled {title:?}; using id {kept_id} and ignoring id {dropped_id}"
            ),
            Diagnostic::UnresolvedReference { kind, title } => {
                write!(f, "Unable to find {kind} {title:?}, skipping")
            }
            Diagnostic::EmptyFolder { kind, title } => {
                write!(f, "The {kind} folder {title:?} has no pages, skipping")
            }
            Diagnostic::MissingItems { kind, titles } => write!(
                f,
                "{} uncategorised {kind} item(s) added to the last page(s): {}",
                titles.len(),
                titles.join(", ")
            ),
        }
    }
}

/// Receives diagnostics as they happen. The synchronizer never prints on its
/// own; the binary decides where these go.
pub trait Reporter {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Logs every diagnostic at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, diagnostic: &Diagnostic) { warn!("{}", diagnostic); }
}

impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) { self.push(diagnostic.clone()); }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, diagnostic: &Diagnostic) { (**self).report(diagnostic) }
}

/// Forwards to another reporter while keeping a copy of everything seen.
pub(crate) struct Recorder<'a> {
    inner: &'a mut dyn Reporter,
    pub(crate) seen: Vec<Diagnostic>,
}

impl<'a> Recorder<'a> {
    pub(crate) fn new(inner: &'a mut dyn Reporter) -> Self { Self { inner, seen: Vec::new() } }
}

impl Reporter for Recorder<'_> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.inner.report(diagnostic);
        self.seen.push(diagnostic.clone());
    }
}
