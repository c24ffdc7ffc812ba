//! Document Editor - the body editing surface
//!
//! Owns a [`Document`] and the current [`Selection`] and exposes the
//! mutations the command layer needs:
//!
//! - text insertion with live text transforms (arrows, em-dash, headings)
//! - paragraph split (plain Enter) and literal tab insertion
//! - inline format toggles over the selection
//! - list insertion/removal, indent, outdent and list exit
//!
//! Every mutation returns `false` instead of failing when it does not apply
//! (no selection, caret outside a list, nothing to indent under).
//!
//! Structural list edits never add, drop or reorder leaves, so the selection
//! is carried across them by leaf ordinal.

use super::bridge;
use super::document::{
    Block, Document, HeadingLevel, LeafPath, List, ListItem, ListKind, TextFormat,
};
use super::inline;
use super::selection::{Position, Selection};

/// Live substitutions, checked in this order
const TEXT_TRANSFORMS: [(&str, &str); 3] = [("->", "→"), ("<-", "←"), ("--", "—")];

/// Heading shortcuts, longest marker first
const HEADING_MARKERS: [(&str, HeadingLevel); 3] = [
    ("### ", HeadingLevel::H3),
    ("## ", HeadingLevel::H2),
    ("# ", HeadingLevel::H1),
];

/// Which live transform an insertion triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedTransform {
    Substitution {
        pattern: &'static str,
        replacement: &'static str,
    },
    Heading(HeadingLevel),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentEditor {
    document: Document,
    selection: Option<Selection>,
}

impl DocumentEditor {
    /// Wrap a document; there is no selection until one is placed
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: None,
        }
    }

    /// Hydrate persisted content into a fresh editor
    pub fn from_content(content: &str) -> Self {
        Self::new(bridge::hydrate(content))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Flattened plain text, as persisted on save
    pub fn text(&self) -> String {
        bridge::flatten(&self.document)
    }

    /// Replace the selection
    ///
    /// Returns `false` (leaving the selection untouched) when either endpoint
    /// names a leaf that does not exist. Offsets are clamped to the leaf.
    pub fn set_selection(&mut self, selection: Selection) -> bool {
        let anchor = self.clamp(selection.anchor);
        let focus = self.clamp(selection.focus);
        let (Some(anchor), Some(focus)) = (anchor, focus) else {
            return false;
        };
        self.selection = Some(Selection::range(anchor, focus));
        true
    }

    pub fn place_caret(&mut self, leaf: LeafPath, offset: usize) -> bool {
        self.set_selection(Selection::caret(Position::new(leaf, offset)))
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Caret at the end of the last leaf
    pub fn caret_to_end(&mut self) {
        if let Some(leaf) = self.document.leaves().pop() {
            self.place_caret(leaf, usize::MAX);
        }
    }

    pub fn select_all(&mut self) {
        let leaves = self.document.leaves();
        if let (Some(first), Some(last)) = (leaves.first(), leaves.last()) {
            self.set_selection(Selection::range(
                Position::new(first.clone(), 0),
                Position::new(last.clone(), usize::MAX),
            ));
        }
    }

    pub fn focus_leaf(&self) -> Option<&LeafPath> {
        self.selection
            .as_ref()
            .map(|selection| &selection.focus.leaf)
    }

    pub fn in_list_item(&self) -> bool {
        self.focus_leaf().is_some_and(LeafPath::is_list_item)
    }

    /// Collapsed caret inside a list item with no text
    pub fn in_empty_list_item(&self) -> bool {
        match &self.selection {
            Some(selection) if selection.is_collapsed() && self.in_list_item() => self
                .document
                .runs(&selection.focus.leaf)
                .is_some_and(|runs| inline::text_len(runs) == 0),
            _ => false,
        }
    }

    /// Type text at the caret, then run at most one live transform
    pub fn insert_text(&mut self, text: &str) -> bool {
        if !self.insert_raw(text) {
            return false;
        }
        if let Some(applied) = self.apply_text_transform(text.chars().count()) {
            tracing::trace!("Applied text transform {:?}", applied);
        }
        true
    }

    /// Insert a literal tab at the caret
    pub fn insert_tab(&mut self) -> bool {
        self.insert_raw("\t")
    }

    /// Plain Enter: split the current leaf at the caret
    ///
    /// Paragraph and heading tails become a new paragraph; a list item's tail
    /// becomes the next item and takes the nested list with it.
    pub fn insert_paragraph(&mut self) -> bool {
        let Some(caret) = self.collapse_selection() else {
            return false;
        };
        let leaf = caret.leaf;

        let next = match leaf.items.split_last() {
            Some((&index, prefix)) => {
                let Some(item) = self.document.item_mut(&leaf) else {
                    return false;
                };
                let runs = inline::split_off(&mut item.runs, caret.offset);
                let children = item.children.take();
                let Some(list) = self.document.list_containing_mut(leaf.block, prefix) else {
                    return false;
                };
                list.items.insert(index + 1, ListItem { runs, children });

                let mut items = leaf.items.clone();
                if let Some(last) = items.last_mut() {
                    *last += 1;
                }
                LeafPath::item(leaf.block, items)
            }
            None => {
                let Some(runs) = self.document.runs_mut(&leaf) else {
                    return false;
                };
                let tail = inline::split_off(runs, caret.offset);
                self.document
                    .blocks
                    .insert(leaf.block + 1, Block::paragraph(tail));
                LeafPath::block(leaf.block + 1)
            }
        };

        self.selection = Some(Selection::caret(Position::new(next, 0)));
        true
    }

    /// Delete the selection, or the character before a collapsed caret
    pub fn delete_backward(&mut self) -> bool {
        let Some(selection) = self.selection.clone() else {
            return false;
        };
        if !selection.is_collapsed() {
            return self.collapse_selection().is_some();
        }

        let caret = selection.focus;
        if caret.offset == 0 {
            return false;
        }
        let Some(runs) = self.document.runs_mut(&caret.leaf) else {
            return false;
        };
        let offset = caret.offset - 1;
        inline::delete(runs, offset, caret.offset);
        self.selection = Some(Selection::caret(Position::new(caret.leaf, offset)));
        true
    }

    /// Toggle `flag` over the selection
    ///
    /// Removes the flag when every selected character already has it,
    /// otherwise applies it everywhere. No-op without a non-empty selection.
    pub fn toggle_format(&mut self, flag: TextFormat) -> bool {
        let Some(selection) = &self.selection else {
            return false;
        };
        if selection.is_collapsed() {
            return false;
        }
        let (start, end) = (selection.start().clone(), selection.end().clone());

        let ranges: Vec<(LeafPath, usize, usize)> = self
            .document
            .leaves()
            .into_iter()
            .filter(|leaf| *leaf >= start.leaf && *leaf <= end.leaf)
            .filter_map(|leaf| {
                let len = inline::text_len(self.document.runs(&leaf)?);
                let from = if leaf == start.leaf { start.offset } else { 0 };
                let to = if leaf == end.leaf { end.offset } else { len };
                Some((leaf, from.min(len), to.min(len)))
            })
            .filter(|(_, from, to)| from < to)
            .collect();

        if ranges.is_empty() {
            return false;
        }

        let already = ranges.iter().all(|(leaf, from, to)| {
            self.document
                .runs(leaf)
                .is_some_and(|runs| inline::range_has_format(runs, *from, *to, flag))
        });

        for (leaf, from, to) in ranges {
            if let Some(runs) = self.document.runs_mut(&leaf) {
                inline::set_format(runs, from, to, flag, !already);
            }
        }
        true
    }

    /// Convert the selected blocks into one list of `kind`
    ///
    /// When every selected block already is a `kind` list the lists are
    /// removed instead, each item becoming a paragraph.
    pub fn insert_list(&mut self, kind: ListKind) -> bool {
        let Some(selection) = &self.selection else {
            return false;
        };
        let (first, last) = (selection.start().leaf.block, selection.end().leaf.block);
        if last >= self.document.blocks.len() {
            return false;
        }

        let remove = self.document.blocks[first..=last]
            .iter()
            .all(|block| matches!(block, Block::List(list) if list.kind == kind));

        self.restructure(|document| {
            let selected: Vec<Block> = document.blocks.drain(first..=last).collect();
            let replacement = if remove {
                unwrap_lists(selected)
            } else {
                vec![Block::List(wrap_in_list(selected, kind))]
            };
            document.blocks.splice(first..first, replacement);
            true
        })
    }

    /// Nest the focused list item under its previous sibling
    pub fn indent(&mut self) -> bool {
        let Some(leaf) = self.focus_leaf().cloned() else {
            return false;
        };
        let Some((&index, prefix)) = leaf.items.split_last() else {
            return false;
        };
        if index == 0 {
            return false;
        }

        self.restructure(|document| {
            let Some(list) = document.list_containing_mut(leaf.block, prefix) else {
                return false;
            };
            if index >= list.items.len() {
                return false;
            }
            let kind = list.kind;
            let item = list.items.remove(index);
            list.items[index - 1]
                .children
                .get_or_insert_with(|| List::new(kind, Vec::new()))
                .items
                .push(item);
            true
        })
    }

    /// Move the focused list item one level out
    ///
    /// Its later siblings become its children. A top-level item turns into a
    /// paragraph and splits the list around it.
    pub fn outdent(&mut self) -> bool {
        let Some(leaf) = self.focus_leaf().cloned() else {
            return false;
        };
        if !leaf.is_list_item() {
            return false;
        }
        self.restructure(|document| outdent_item(document, &leaf))
    }

    /// Outdent until the focused item is a plain paragraph
    pub fn exit_list(&mut self) -> bool {
        let mut changed = false;
        while self.in_list_item() {
            if !self.outdent() {
                break;
            }
            changed = true;
        }
        changed
    }

    fn clamp(&self, position: Position) -> Option<Position> {
        let len = inline::text_len(self.document.runs(&position.leaf)?);
        Some(Position::new(position.leaf, position.offset.min(len)))
    }

    /// Delete a ranged selection and return the collapsed caret
    ///
    /// Across leaves the structure is kept: the start leaf loses its tail,
    /// the end leaf its head and the leaves between are emptied.
    fn collapse_selection(&mut self) -> Option<Position> {
        let selection = self.selection.clone()?;
        if selection.is_collapsed() {
            return Some(selection.focus);
        }

        let (start, end) = (selection.start().clone(), selection.end().clone());
        if start.leaf == end.leaf {
            if let Some(runs) = self.document.runs_mut(&start.leaf) {
                inline::delete(runs, start.offset, end.offset);
            }
        } else {
            for leaf in self.document.leaves() {
                if leaf < start.leaf || leaf > end.leaf {
                    continue;
                }
                let Some(runs) = self.document.runs_mut(&leaf) else {
                    continue;
                };
                if leaf == start.leaf {
                    let len = inline::text_len(runs);
                    inline::delete(runs, start.offset, len);
                } else if leaf == end.leaf {
                    inline::delete(runs, 0, end.offset);
                } else {
                    runs.clear();
                }
            }
        }

        self.selection = Some(Selection::caret(start.clone()));
        Some(start)
    }

    fn insert_raw(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let Some(caret) = self.collapse_selection() else {
            return false;
        };
        let Some(runs) = self.document.runs_mut(&caret.leaf) else {
            return false;
        };

        let format = inline::format_at(runs, caret.offset);
        inline::insert(runs, caret.offset, text, format);

        let offset = caret.offset + text.chars().count();
        self.selection = Some(Selection::caret(Position::new(caret.leaf, offset)));
        true
    }

    /// Apply the first transform completed by the last `inserted` chars
    ///
    /// A substitution must end at or before the caret and include at least
    /// one inserted char. A heading marker must sit at block start and end
    /// exactly at the caret. Text already in the leaf is never rewritten.
    fn apply_text_transform(&mut self, inserted: usize) -> Option<AppliedTransform> {
        let caret = self.selection.as_ref()?.focus.clone();
        let text = self.document.leaf_text(&caret.leaf)?;
        let chars: Vec<char> = text.chars().collect();
        let caret_offset = caret.offset.min(chars.len());

        for (pattern, replacement) in TEXT_TRANSFORMS {
            let pattern_len = pattern.chars().count();
            let window_start = caret_offset.saturating_sub(inserted + pattern_len - 1);
            let window: String = chars[window_start..caret_offset].iter().collect();
            let Some(byte) = window.find(pattern) else {
                continue;
            };
            let start = window_start + window[..byte].chars().count();
            let end = start + pattern_len;
            let replaced = replacement.chars().count();

            let runs = self.document.runs_mut(&caret.leaf)?;
            inline::replace(runs, start, end, replacement);

            let offset = caret_offset - (end - start) + replaced;
            self.selection = Some(Selection::caret(Position::new(caret.leaf, offset)));
            return Some(AppliedTransform::Substitution {
                pattern,
                replacement,
            });
        }

        if caret.leaf.is_list_item() {
            return None;
        }
        let (marker, level) = HEADING_MARKERS.into_iter().find(|(marker, _)| {
            caret_offset == marker.chars().count() && text.starts_with(marker)
        })?;

        let block = self.document.blocks.get_mut(caret.leaf.block)?;
        let Block::Paragraph { runs } = block else {
            return None;
        };
        let mut runs = std::mem::take(runs);
        inline::strip_prefix(&mut runs, marker.chars().count());
        let end = inline::text_len(&runs);
        *block = Block::Heading { level, runs };

        self.selection = Some(Selection::caret(Position::new(caret.leaf, end)));
        Some(AppliedTransform::Heading(level))
    }

    /// Run a leaf-order-preserving structural edit and carry the selection
    fn restructure<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut Document) -> bool,
    {
        let leaves = self.document.leaves();
        let ordinal = |position: &Position| {
            leaves
                .iter()
                .position(|leaf| *leaf == position.leaf)
                .map(|index| (index, position.offset))
        };
        let marks = self
            .selection
            .as_ref()
            .map(|selection| (ordinal(&selection.anchor), ordinal(&selection.focus)));

        if !edit(&mut self.document) {
            return false;
        }
        self.document.ensure_block();

        let leaves = self.document.leaves();
        let locate = |mark: Option<(usize, usize)>| {
            mark.and_then(|(index, offset)| {
                leaves
                    .get(index)
                    .map(|leaf| Position::new(leaf.clone(), offset))
            })
        };
        if let Some((anchor, focus)) = marks {
            self.selection = match (locate(anchor), locate(focus)) {
                (Some(anchor), Some(focus)) => Some(Selection::range(anchor, focus)),
                _ => None,
            };
        }
        true
    }
}

fn outdent_item(document: &mut Document, leaf: &LeafPath) -> bool {
    let Some((&index, prefix)) = leaf.items.split_last() else {
        return false;
    };

    match prefix.split_last() {
        Some((&parent_index, grand_prefix)) => {
            let Some(outer) = document.list_containing_mut(leaf.block, grand_prefix) else {
                return false;
            };
            let Some(parent) = outer.items.get_mut(parent_index) else {
                return false;
            };
            let Some(list) = parent.children.as_mut() else {
                return false;
            };
            if index >= list.items.len() {
                return false;
            }

            let kind = list.kind;
            let mut item = list.items.remove(index);
            let trailing: Vec<ListItem> = list.items.drain(index..).collect();
            if list.items.is_empty() {
                parent.children = None;
            }
            if !trailing.is_empty() {
                item.children
                    .get_or_insert_with(|| List::new(kind, Vec::new()))
                    .items
                    .extend(trailing);
            }
            outer.items.insert(parent_index + 1, item);
            true
        }
        None => {
            let Some(Block::List(list)) = document.blocks.get_mut(leaf.block) else {
                return false;
            };
            if index >= list.items.len() {
                return false;
            }

            let kind = list.kind;
            let item = list.items.remove(index);
            let mut trailing: Vec<ListItem> = list.items.drain(index..).collect();
            let leading = std::mem::take(&mut list.items);

            let mut replacement = Vec::new();
            if !leading.is_empty() {
                replacement.push(Block::List(List::new(kind, leading)));
            }
            replacement.push(Block::paragraph(item.runs));
            match item.children {
                Some(mut children) if children.kind == kind => {
                    children.items.append(&mut trailing);
                    replacement.push(Block::List(children));
                }
                Some(children) => replacement.push(Block::List(children)),
                None => {}
            }
            if !trailing.is_empty() {
                replacement.push(Block::List(List::new(kind, trailing)));
            }

            document.blocks.splice(leaf.block..=leaf.block, replacement);
            true
        }
    }
}

fn wrap_in_list(blocks: Vec<Block>, kind: ListKind) -> List {
    let mut items = Vec::new();
    for block in blocks {
        match block {
            Block::Paragraph { runs } | Block::Heading { runs, .. } => {
                items.push(ListItem::new(runs))
            }
            Block::List(list) => items.extend(list.items),
        }
    }
    List::new(kind, items)
}

fn unwrap_lists(blocks: Vec<Block>) -> Vec<Block> {
    let mut unwrapped = Vec::new();
    for block in blocks {
        match block {
            Block::List(list) => push_items_as_paragraphs(list, &mut unwrapped),
            other => unwrapped.push(other),
        }
    }
    unwrapped
}

fn push_items_as_paragraphs(list: List, blocks: &mut Vec<Block>) {
    for item in list.items {
        blocks.push(Block::paragraph(item.runs));
        if let Some(children) = item.children {
            push_items_as_paragraphs(children, blocks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::TextRun;

    fn editor_with_caret_at_end(content: &str) -> DocumentEditor {
        let mut editor = DocumentEditor::from_content(content);
        editor.caret_to_end();
        editor
    }

    fn type_chars(editor: &mut DocumentEditor, text: &str) {
        for ch in text.chars() {
            assert!(editor.insert_text(&ch.to_string()));
        }
    }

    #[test]
    fn test_arrow_transform_keeps_caret_after_replacement() {
        let mut editor = editor_with_caret_at_end("");
        type_chars(&mut editor, "a->");

        assert_eq!(editor.text(), "a→");
        assert_eq!(editor.selection().unwrap().focus.offset, 2);

        type_chars(&mut editor, "b");
        assert_eq!(editor.text(), "a→b");
        assert_eq!(editor.selection().unwrap().focus.offset, 3);
    }

    #[test]
    fn test_only_first_matching_transform_applies() {
        let mut editor = editor_with_caret_at_end("");
        editor.insert_text("<--");

        assert_eq!(editor.text(), "←-");
    }

    #[test]
    fn test_em_dash() {
        let mut editor = editor_with_caret_at_end("wait");
        type_chars(&mut editor, "--");
        assert_eq!(editor.text(), "wait—");
    }

    #[test]
    fn test_heading_promotion() {
        let mut editor = editor_with_caret_at_end("");
        type_chars(&mut editor, "## Hello");

        assert_eq!(
            editor.document().blocks,
            vec![Block::Heading {
                level: HeadingLevel::H2,
                runs: vec![TextRun::plain("Hello")]
            }]
        );
    }

    #[test]
    fn test_heading_promotion_strips_marker_and_moves_caret_to_end() {
        let mut editor = DocumentEditor::from_content("Title");
        editor.place_caret(LeafPath::block(0), 0);
        editor.insert_text("### ");

        assert_eq!(
            editor.document().blocks[0],
            Block::Heading {
                level: HeadingLevel::H3,
                runs: vec![TextRun::plain("Title")]
            }
        );
        assert_eq!(editor.selection().unwrap().focus.offset, 5);
    }

    #[test]
    fn test_heading_marker_ignored_inside_list_item() {
        let mut editor = editor_with_caret_at_end("");
        editor.insert_list(ListKind::Unordered);
        editor.insert_text("# ");

        assert!(matches!(editor.document().blocks[0], Block::List(_)));
        assert_eq!(editor.text(), "# ");
    }

    #[test]
    fn test_stored_arrow_survives_typing_elsewhere() {
        let mut editor = editor_with_caret_at_end("a->b");
        assert!(editor.insert_text("!"));

        assert_eq!(editor.text(), "a->b!");
        assert_eq!(editor.selection().unwrap().focus.offset, 5);

        editor.place_caret(LeafPath::block(0), 0);
        type_chars(&mut editor, "x-");
        assert_eq!(editor.text(), "x-a->b!");
    }

    #[test]
    fn test_stored_heading_marker_survives_typing_at_end() {
        let mut editor = editor_with_caret_at_end("## done");
        assert!(editor.insert_text("x"));

        assert_eq!(
            editor.document().blocks,
            vec![Block::Paragraph {
                runs: vec![TextRun::plain("## donex")]
            }]
        );
    }

    #[test]
    fn test_transform_completed_by_typed_char_inside_text() {
        let mut editor = DocumentEditor::from_content("ab");
        editor.place_caret(LeafPath::block(0), 1);
        type_chars(&mut editor, "->");

        assert_eq!(editor.text(), "a→b");
        assert_eq!(editor.selection().unwrap().focus.offset, 2);
    }

    #[test]
    fn test_insert_paragraph_splits_block() {
        let mut editor = DocumentEditor::from_content("helloworld");
        editor.place_caret(LeafPath::block(0), 5);

        assert!(editor.insert_paragraph());
        assert_eq!(editor.text(), "hello\nworld");
        assert_eq!(
            editor.selection().unwrap().focus,
            Position::new(LeafPath::block(1), 0)
        );
    }

    #[test]
    fn test_toggle_format_requires_selection() {
        let mut editor = DocumentEditor::from_content("text");
        assert!(!editor.toggle_format(TextFormat::BOLD));

        editor.place_caret(LeafPath::block(0), 2);
        assert!(!editor.toggle_format(TextFormat::BOLD));
    }

    #[test]
    fn test_toggle_format_round_trip() {
        let mut editor = DocumentEditor::from_content("text");
        editor.select_all();

        assert!(editor.toggle_format(TextFormat::STRIKETHROUGH));
        assert_eq!(
            editor.document().runs(&LeafPath::block(0)).unwrap(),
            &vec![TextRun::formatted("text", TextFormat::STRIKETHROUGH)]
        );

        assert!(editor.toggle_format(TextFormat::STRIKETHROUGH));
        assert_eq!(
            editor.document().runs(&LeafPath::block(0)).unwrap(),
            &vec![TextRun::plain("text")]
        );
    }

    #[test]
    fn test_insert_list_wraps_selected_paragraphs_and_toggles_off() {
        let mut editor = DocumentEditor::from_content("one\ntwo\nthree");
        editor.set_selection(Selection::range(
            Position::new(LeafPath::block(0), 0),
            Position::new(LeafPath::block(1), 1),
        ));

        assert!(editor.insert_list(ListKind::Unordered));
        assert_eq!(editor.document().blocks.len(), 2);
        assert_eq!(
            editor.selection().unwrap().focus,
            Position::new(LeafPath::item(0, vec![1]), 1)
        );

        assert!(editor.insert_list(ListKind::Unordered));
        assert_eq!(editor.document().blocks.len(), 3);
        assert!(editor
            .document()
            .blocks
            .iter()
            .all(|block| matches!(block, Block::Paragraph { .. })));
        assert_eq!(editor.text(), "one\ntwo\nthree");
    }

    #[test]
    fn test_indent_and_outdent() {
        let mut editor = DocumentEditor::from_content("a\nb\nc");
        editor.select_all();
        editor.insert_list(ListKind::Unordered);

        editor.place_caret(LeafPath::item(0, vec![0]), 0);
        assert!(!editor.indent(), "first item has nothing to nest under");

        editor.place_caret(LeafPath::item(0, vec![1]), 0);
        assert!(editor.indent());
        assert_eq!(
            editor.selection().unwrap().focus.leaf,
            LeafPath::item(0, vec![0, 0])
        );
        assert_eq!(editor.text(), "a\nb\nc");

        assert!(editor.outdent());
        assert_eq!(
            editor.selection().unwrap().focus.leaf,
            LeafPath::item(0, vec![1])
        );
    }

    #[test]
    fn test_outdent_adopts_trailing_siblings() {
        let mut editor = DocumentEditor::from_content("a\nb\nc\nd");
        editor.select_all();
        editor.insert_list(ListKind::Unordered);
        for index in [1, 1, 1] {
            // b, c, d all nest under a
            editor.place_caret(LeafPath::item(0, vec![index]), 0);
            editor.indent();
        }

        editor.place_caret(LeafPath::item(0, vec![0, 1]), 0);
        assert!(editor.outdent());

        let Block::List(list) = &editor.document().blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items.len(), 2);
        let c = &list.items[1];
        assert_eq!(inline::plain_text(&c.runs), "c");
        assert_eq!(c.children.as_ref().map(|l| l.items.len()), Some(1));
        assert_eq!(editor.text(), "a\nb\nc\nd");
    }

    #[test]
    fn test_exit_list_from_nested_empty_item() {
        let mut editor = DocumentEditor::from_content("a");
        editor.caret_to_end();
        editor.insert_list(ListKind::Ordered);
        editor.insert_paragraph();
        editor.indent();
        assert!(editor.in_empty_list_item());

        assert!(editor.exit_list());
        assert!(!editor.in_list_item());
        assert_eq!(editor.document().blocks.len(), 2);
        assert_eq!(editor.document().blocks[1], Block::empty_paragraph());
    }

    #[test]
    fn test_insert_tab_is_literal() {
        let mut editor = editor_with_caret_at_end("x");
        assert!(editor.insert_tab());
        assert_eq!(editor.text(), "x\t");
    }

    #[test]
    fn test_mutations_without_selection_are_noops() {
        let mut editor = DocumentEditor::from_content("x");
        assert!(!editor.insert_text("y"));
        assert!(!editor.insert_paragraph());
        assert!(!editor.insert_list(ListKind::Unordered));
        assert!(!editor.indent());
        assert!(!editor.outdent());
        assert_eq!(editor.text(), "x");
    }
}
