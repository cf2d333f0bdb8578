//! Read interface over cached document trees
//!
//! Resolves a document and a path of child names to something a presentation
//! layer can render: an index of child entries for tables of contents (and for
//! pages not crawled yet), or the paragraphs of a section.

use crate::config::{Config, Document};
use crate::storage::{open_storage, Storage};
use crate::tree::{DocumentTree, NodeKind, Paragraph, TreeError};
use crate::MirrorError;
use std::collections::HashMap;
use std::fmt;

/// Deepest indentation rendered for a paragraph
const MAX_RENDERED_INDENT: u32 = 8;

/// One child listed on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub title: Option<String>,
    /// Navigation path of the child, e.g. `/ohio-constitution/Article I`
    pub href: String,
}

/// A resolved page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// Table of contents, or a node that has not been crawled yet
    Index {
        document: String,
        breadcrumb: Vec<String>,
        /// Last title found along the path
        title: Option<String>,
        entries: Vec<IndexEntry>,
    },
    /// Section text
    Page {
        document: String,
        breadcrumb: Vec<String>,
        title: String,
        effective_date: Option<String>,
        paragraphs: Vec<Paragraph>,
    },
}

impl PageView {
    /// Path segments leading to this page, without the document
    pub fn breadcrumb(&self) -> &[String] {
        match self {
            PageView::Index { breadcrumb, .. } | PageView::Page { breadcrumb, .. } => breadcrumb,
        }
    }

    /// Navigation path of this page, e.g. `/ohio-constitution/Article I`
    pub fn base_path(&self) -> String {
        let document = match self {
            PageView::Index { document, .. } | PageView::Page { document, .. } => document,
        };
        base_path(document, self.breadcrumb())
    }
}

fn base_path(document: &str, breadcrumb: &[String]) -> String {
    let mut path = format!("/{}", document);
    for segment in breadcrumb {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Resolves a path in a tree to a page view
///
/// # Errors
///
/// `TreeError::NotFound` if any segment of `path` is missing.
pub fn resolve<S: AsRef<str>>(tree: &DocumentTree, path: &[S]) -> Result<PageView, TreeError> {
    let breadcrumb: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();

    // Walk once to pick up the last title along the way
    let mut node = &tree.root;
    let mut title = None;
    for (depth, segment) in breadcrumb.iter().enumerate() {
        node = node
            .child(segment)
            .ok_or_else(|| TreeError::not_found(&tree.name, &breadcrumb[..=depth]))?;
        if node.title.is_some() {
            title = node.title.clone();
        }
    }

    if node.kind() == NodeKind::Leaf {
        let title = title
            .or_else(|| breadcrumb.last().cloned())
            .unwrap_or_else(|| tree.name.clone());
        return Ok(PageView::Page {
            document: tree.name.clone(),
            breadcrumb,
            title,
            effective_date: node.effective_date().map(str::to_string),
            paragraphs: node.paragraphs().to_vec(),
        });
    }

    let here = base_path(&tree.name, &breadcrumb);
    let entries = node
        .children()
        .iter()
        .map(|(name, child)| IndexEntry {
            name: name.clone(),
            title: child.title.clone(),
            href: format!("{}/{}", here, name),
        })
        .collect();

    Ok(PageView::Index {
        document: tree.name.clone(),
        breadcrumb,
        title,
        entries,
    })
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageView::Index { title, entries, .. } => {
                let heading = title
                    .as_deref()
                    .or_else(|| self.breadcrumb().last().map(String::as_str))
                    .unwrap_or("Contents");
                writeln!(f, "{}", heading)?;
                writeln!(f, "{}", self.base_path())?;
                writeln!(f)?;

                if entries.is_empty() {
                    return writeln!(f, "  (not mirrored yet)");
                }
                for entry in entries {
                    match &entry.title {
                        Some(title) => writeln!(f, "  {} - {}", entry.name, title)?,
                        None => writeln!(f, "  {}", entry.name)?,
                    }
                }
                Ok(())
            }
            PageView::Page {
                title,
                effective_date,
                paragraphs,
                ..
            } => {
                writeln!(f, "{}", title)?;
                writeln!(f, "{}", self.base_path())?;
                if let Some(date) = effective_date {
                    writeln!(f, "Effective: {}", date)?;
                }
                writeln!(f)?;

                for paragraph in paragraphs {
                    let level = paragraph.indent_level.unwrap_or(0).min(MAX_RENDERED_INDENT);
                    let indent = "    ".repeat(level as usize);
                    writeln!(f, "{}{}", indent, paragraph.text)?;
                }
                Ok(())
            }
        }
    }
}

/// All cached documents, loaded for reading
#[derive(Debug, Clone, Default)]
pub struct Library {
    trees: HashMap<Document, DocumentTree>,
}

impl Library {
    /// Loads the cache of every known document
    ///
    /// Documents that were never crawled load as empty trees.
    pub fn load(config: &Config) -> Result<Self, MirrorError> {
        let mut trees = HashMap::new();
        for document in Document::ALL {
            let tree = open_storage(config, document)
                .load(document.as_str(), &config.document_url(document))?;
            trees.insert(document, tree);
        }
        Ok(Self { trees })
    }

    pub fn from_trees(trees: impl IntoIterator<Item = (Document, DocumentTree)>) -> Self {
        Self {
            trees: trees.into_iter().collect(),
        }
    }

    pub fn tree(&self, document: Document) -> Option<&DocumentTree> {
        self.trees.get(&document)
    }

    /// Resolves a page of a document given by name
    ///
    /// # Errors
    ///
    /// `TreeError::NotFound` for an unknown or unloaded document, or a path
    /// that does not exist.
    pub fn view<S: AsRef<str>>(&self, document: &str, path: &[S]) -> Result<PageView, TreeError> {
        let tree = document
            .parse::<Document>()
            .ok()
            .and_then(|doc| self.tree(doc))
            .ok_or_else(|| TreeError::not_found::<&str>(document, &[]))?;
        resolve(tree, path)
    }

    /// Resolves a slash-separated location such as
    /// `ohio-constitution/Article I/Inalienable Rights`
    pub fn lookup(&self, location: &str) -> Result<PageView, TreeError> {
        let mut segments = location.split('/').filter(|s| !s.is_empty());
        let document = segments.next().unwrap_or_default();
        let path: Vec<&str> = segments.collect();
        self.view(document, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{LeafContent, Node};
    use indexmap::IndexMap;

    fn sample_tree() -> DocumentTree {
        let mut tree = DocumentTree::new(
            "ohio-constitution",
            "https://codes.ohio.gov/ohio-constitution",
        );

        let mut articles = IndexMap::new();
        articles.insert(
            "Article I".to_string(),
            Node::with_title(
                "https://codes.ohio.gov/ohio-constitution/article-1",
                Some("Bill of Rights".to_string()),
            ),
        );
        articles.insert(
            "Article II".to_string(),
            Node::new("https://codes.ohio.gov/ohio-constitution/article-2"),
        );
        tree.root.set_children(articles);

        let mut sections = IndexMap::new();
        sections.insert(
            "Inalienable Rights".to_string(),
            Node::new("https://codes.ohio.gov/ohio-constitution/section-1.1"),
        );
        tree.get_mut(&["Article I"]).unwrap().set_children(sections);

        tree.get_mut(&["Article I", "Inalienable Rights"])
            .unwrap()
            .set_leaf(LeafContent {
                effective_date: Some("1851".to_string()),
                paragraphs: vec![
                    Paragraph {
                        order: 0,
                        text: "All men are, by nature, free and independent.".to_string(),
                        indent_level: Some(0),
                    },
                    Paragraph {
                        order: 1,
                        text: "(A) Nested".to_string(),
                        indent_level: Some(1),
                    },
                ],
            });

        tree
    }

    #[test]
    fn test_root_index() {
        let view = resolve::<&str>(&sample_tree(), &[]).unwrap();
        let PageView::Index { title, entries, .. } = &view else {
            panic!("expected an index, got {:?}", view);
        };

        assert_eq!(title, &None);
        assert_eq!(view.base_path(), "/ohio-constitution");
        assert_eq!(
            entries[0],
            IndexEntry {
                name: "Article I".to_string(),
                title: Some("Bill of Rights".to_string()),
                href: "/ohio-constitution/Article I".to_string(),
            }
        );
        assert_eq!(entries[1].title, None);
    }

    #[test]
    fn test_page_inherits_title_along_path() {
        let view = resolve(&sample_tree(), &["Article I", "Inalienable Rights"]).unwrap();
        let PageView::Page {
            title,
            effective_date,
            paragraphs,
            ..
        } = &view
        else {
            panic!("expected a page, got {:?}", view);
        };

        assert_eq!(title, "Bill of Rights");
        assert_eq!(effective_date.as_deref(), Some("1851"));
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(view.breadcrumb(), ["Article I", "Inalienable Rights"]);
        assert_eq!(
            view.base_path(),
            "/ohio-constitution/Article I/Inalienable Rights"
        );
    }

    #[test]
    fn test_page_title_falls_back_to_last_segment() {
        let mut tree = sample_tree();
        tree.get_mut(&["Article II"]).unwrap().set_leaf(LeafContent {
            effective_date: None,
            paragraphs: vec![Paragraph {
                order: 0,
                text: "The legislative power".to_string(),
                indent_level: None,
            }],
        });

        match resolve(&tree, &["Article II"]).unwrap() {
            PageView::Page { title, .. } => assert_eq!(title, "Article II"),
            other => panic!("expected a page, got {:?}", other),
        }
    }

    #[test]
    fn test_unvisited_node_is_empty_index() {
        match resolve(&sample_tree(), &["Article II"]).unwrap() {
            PageView::Index { entries, .. } => assert!(entries.is_empty()),
            other => panic!("expected an index, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_path() {
        let err = resolve(&sample_tree(), &["Article I", "Missing"]).unwrap_err();
        let TreeError::NotFound { path, .. } = err;
        assert_eq!(path, vec!["Article I", "Missing"]);
    }

    #[test]
    fn test_library_lookup() {
        let library = Library::from_trees([(Document::OhioConstitution, sample_tree())]);

        let view = library
            .lookup("/ohio-constitution/Article I/Inalienable Rights/")
            .unwrap();
        assert!(matches!(view, PageView::Page { .. }));

        assert!(library.view("ohio-revised-code", &["Title 1"]).is_err());
        assert!(library.lookup("ohio-tax-code").is_err());
        assert!(library.lookup("").is_err());
    }

    #[test]
    fn test_display_renders_indentation() {
        let view = resolve(&sample_tree(), &["Article I", "Inalienable Rights"]).unwrap();
        let text = view.to_string();

        assert!(text.starts_with("Bill of Rights\n"));
        assert!(text.contains("Effective: 1851\n"));
        assert!(text.contains("\n    (A) Nested\n"));
    }

    #[test]
    fn test_display_caps_indentation() {
        let mut tree = sample_tree();
        tree.get_mut(&["Article II"]).unwrap().set_leaf(LeafContent {
            effective_date: None,
            paragraphs: vec![Paragraph {
                order: 0,
                text: "Deep".to_string(),
                indent_level: Some(4_000_000_000),
            }],
        });

        let text = resolve(&tree, &["Article II"]).unwrap().to_string();
        let expected = format!("\n{}Deep\n", "    ".repeat(MAX_RENDERED_INDENT as usize));
        assert!(text.ends_with(&expected));
    }

    #[test]
    fn test_library_load_missing_caches() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::parse_config(&format!(
            r#"
[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
cache-dir = "{}"
summary-path = "./summary.md"
"#,
            dir.path().display()
        ))
        .unwrap();

        let library = Library::load(&config).unwrap();
        for document in Document::ALL {
            let tree = library.tree(document).unwrap();
            assert_eq!(tree.root.kind(), NodeKind::Unvisited);
        }
    }
}
