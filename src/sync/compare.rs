use std::fmt;

use crate::model::{Entry, LaunchpadLayout, Layout};

/// Structural equality by content; no identifiers are involved.
pub fn layouts_equal(a: &LaunchpadLayout, b: &LaunchpadLayout) -> bool { a == b }

/// Where two layouts first disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// e.g. `app_layout[1][3]` or `app_layout[0][2].folder_layout[1]`
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, found {}", self.path, self.expected, self.actual)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Different(Difference),
}

impl Comparison {
    pub fn is_equal(&self) -> bool { matches!(self, Comparison::Equal) }
}

pub fn compare(expected: &LaunchpadLayout, actual: &LaunchpadLayout) -> Comparison {
    match first_difference(expected, actual) {
        None => Comparison::Equal,
        Some(difference) => Comparison::Different(difference),
    }
}

pub fn first_difference(expected: &LaunchpadLayout, actual: &LaunchpadLayout) -> Option<Difference> {
    layout_difference("app_layout", &expected.app_layout, &actual.app_layout)
        .or_else(|| layout_difference("widget_layout", &expected.widget_layout, &actual.widget_layout))
}

fn describe_entry(entry: Option<&Entry>) -> String {
    match entry {
        None => "nothing".to_string(),
        Some(Entry::Title(title)) => format!("{title:?}"),
        Some(Entry::Folder(folder)) => format!("folder {:?}", folder.folder_title),
    }
}

fn describe_title(title: Option<&String>) -> String {
    match title {
        None => "nothing".to_string(),
        Some(title) => format!("{title:?}"),
    }
}

fn count(n: usize, noun: &str) -> String { format!("{n} {noun}{}", if n == 1 { "" } else { "s" }) }

fn layout_difference(section: &str, expected: &Layout, actual: &Layout) -> Option<Difference> {
    for (page_index, (e_page, a_page)) in expected.iter().zip(actual).enumerate() {
        let len = e_page.len().max(a_page.len());
        for i in 0..len {
            let path = format!("{section}[{page_index}][{i}]");
            let (e, a) = (e_page.get(i), a_page.get(i));
            match (e, a) {
                (Some(Entry::Folder(ef)), Some(Entry::Folder(af))) => {
                    if ef.folder_title != af.folder_title {
                        return Some(Difference {
                            path: format!("{path}.folder_title"),
                            expected: format!("{:?}", ef.folder_title),
                            actual: format!("{:?}", af.folder_title),
                        });
                    }
                    if let Some(d) = folder_difference(&path, &ef.folder_layout, &af.folder_layout) {
                        return Some(d);
                    }
                }
                _ if e != a => {
                    return Some(Difference {
                        path,
                        expected: describe_entry(e),
                        actual: describe_entry(a),
                    });
                }
                _ => {}
            }
        }
    }

    (expected.len() != actual.len()).then(|| Difference {
        path: section.to_string(),
        expected: count(expected.len(), "page"),
        actual: count(actual.len(), "page"),
    })
}

fn folder_difference(path: &str, expected: &[Vec<String>], actual: &[Vec<String>]) -> Option<Difference> {
    for (page_index, (e_page, a_page)) in expected.iter().zip(actual).enumerate() {
        let len = e_page.len().max(a_page.len());
        for i in 0..len {
            let (e, a) = (e_page.get(i), a_page.get(i));
            if e != a {
                return Some(Difference {
                    path: format!("{path}.folder_layout[{page_index}][{i}]"),
                    expected: describe_title(e),
                    actual: describe_title(a),
                });
            }
        }
    }

    (expected.len() != actual.len()).then(|| Difference {
        path: format!("{path}.folder_layout"),
        expected: count(expected.len(), "page"),
        actual: count(actual.len(), "page"),
    })
}
