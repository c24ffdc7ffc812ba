//! Document Model Bridge
//!
//! Converts between persisted `content` strings and the node tree.
//!
//! The conversion is deliberately lossy in the storage direction: headings,
//! lists and inline marks exist only in the live editing session. Hydration
//! rebuilds plain paragraphs, one per line.

use super::document::{Block, Document, TextRun};

/// Build a document from persisted content
///
/// One paragraph per `\n`-separated line; empty lines become empty
/// paragraphs. The result always has at least one block.
pub fn hydrate(content: &str) -> Document {
    let blocks = content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                Block::empty_paragraph()
            } else {
                Block::paragraph(vec![TextRun::plain(line)])
            }
        })
        .collect();
    Document::new(blocks)
}

/// Reduce a document to plain text, one line per leaf in document order
pub fn flatten(document: &Document) -> String {
    document
        .leaves()
        .iter()
        .filter_map(|leaf| document.leaf_text(leaf))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::{List, ListItem, ListKind, TextFormat};

    #[test]
    fn test_hydrate_lines_to_paragraphs() {
        let document = hydrate("line1\n\nline3");
        assert_eq!(
            document.blocks,
            vec![
                Block::paragraph(vec![TextRun::plain("line1")]),
                Block::empty_paragraph(),
                Block::paragraph(vec![TextRun::plain("line3")]),
            ]
        );
    }

    #[test]
    fn test_hydrate_empty_content_has_one_paragraph() {
        assert_eq!(hydrate("").blocks, vec![Block::empty_paragraph()]);
    }

    #[test]
    fn test_round_trip_without_structural_edits() {
        for content in ["line1\nline2", "", "a\n", "\n\nb", "tab\there"] {
            assert_eq!(flatten(&hydrate(content)), content);
        }
    }

    #[test]
    fn test_flatten_drops_structure_and_marks() {
        let mut parent = ListItem::new(vec![
            TextRun::formatted("bold", TextFormat::BOLD),
            TextRun::plain(" item"),
        ]);
        parent.children = Some(List::new(
            ListKind::Ordered,
            vec![ListItem::new(vec![TextRun::plain("nested")])],
        ));
        let document = Document::new(vec![
            Block::Heading {
                level: crate::editor::document::HeadingLevel::H1,
                runs: vec![TextRun::plain("Title")],
            },
            Block::List(List::new(ListKind::Unordered, vec![parent])),
        ]);

        assert_eq!(flatten(&document), "Title\nbold item\nnested");
    }
}
