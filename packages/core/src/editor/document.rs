//! Document node tree
//!
//! The in-memory structure edited by [`DocumentEditor`](super::DocumentEditor):
//!
//! ```text
//! Document
//! └── Block*            paragraph | heading(1..3) | list
//!     └── List          ordered | unordered
//!         └── ListItem  runs + optional nested List
//! ```
//!
//! Text lives in *leaves*: paragraphs, headings and list items. A
//! [`LeafPath`] addresses one leaf; paths sort in document order.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Inline format bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextFormat(u8);

impl TextFormat {
    pub const PLAIN: TextFormat = TextFormat(0);
    pub const BOLD: TextFormat = TextFormat(1);
    pub const ITALIC: TextFormat = TextFormat(1 << 1);
    pub const UNDERLINE: TextFormat = TextFormat(1 << 2);
    pub const STRIKETHROUGH: TextFormat = TextFormat(1 << 3);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_plain(self) -> bool {
        self.0 == 0
    }

    /// True when every flag in `other` is set
    pub fn contains(self, other: TextFormat) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: TextFormat) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: TextFormat) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: TextFormat, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for TextFormat {
    type Output = TextFormat;

    fn bitor(self, rhs: TextFormat) -> TextFormat {
        TextFormat(self.0 | rhs.0)
    }
}

impl BitOrAssign for TextFormat {
    fn bitor_assign(&mut self, rhs: TextFormat) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (TextFormat::BOLD, "bold"),
            (TextFormat::ITALIC, "italic"),
            (TextFormat::UNDERLINE, "underline"),
            (TextFormat::STRIKETHROUGH, "strikethrough"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            write!(f, "plain")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

/// A span of text sharing one format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub format: TextFormat,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::PLAIN,
        }
    }

    pub fn formatted(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub runs: Vec<TextRun>,
    /// Nested list rendered under this item
    pub children: Option<List>,
}

impl ListItem {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            children: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(kind: ListKind, items: Vec<ListItem>) -> Self {
        Self { kind, items }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph { runs: Vec<TextRun> },
    Heading {
        level: HeadingLevel,
        runs: Vec<TextRun>,
    },
    List(List),
}

impl Block {
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Block::Paragraph { runs }
    }

    pub fn empty_paragraph() -> Self {
        Block::Paragraph { runs: Vec::new() }
    }
}

/// Address of a text-bearing node
///
/// `items` is empty for paragraphs and headings. For list items it holds the
/// item index at each nesting level, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafPath {
    pub block: usize,
    pub items: Vec<usize>,
}

impl LeafPath {
    pub fn block(block: usize) -> Self {
        Self {
            block,
            items: Vec::new(),
        }
    }

    pub fn item(block: usize, items: Vec<usize>) -> Self {
        Self { block, items }
    }

    pub fn is_list_item(&self) -> bool {
        !self.items.is_empty()
    }

    /// Nesting depth; 0 outside lists, 1 for top-level items
    pub fn depth(&self) -> usize {
        self.items.len()
    }
}

/// Root of the node tree. Never has zero blocks once built by
/// [`Document::new`] or hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Build a document; an empty block list becomes one empty paragraph
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut document = Self { blocks };
        document.ensure_block();
        document
    }

    pub(crate) fn ensure_block(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::empty_paragraph());
        }
    }

    /// Every leaf in document order
    pub fn leaves(&self) -> Vec<LeafPath> {
        let mut leaves = Vec::new();
        for (index, block) in self.blocks.iter().enumerate() {
            match block {
                Block::Paragraph { .. } | Block::Heading { .. } => {
                    leaves.push(LeafPath::block(index))
                }
                Block::List(list) => collect_list_leaves(list, index, &mut Vec::new(), &mut leaves),
            }
        }
        leaves
    }

    pub fn runs(&self, path: &LeafPath) -> Option<&Vec<TextRun>> {
        match (self.blocks.get(path.block)?, path.items.split_first()) {
            (Block::Paragraph { runs }, None) | (Block::Heading { runs, .. }, None) => Some(runs),
            (Block::List(list), Some((first, rest))) => {
                let mut item = list.items.get(*first)?;
                for index in rest {
                    item = item.children.as_ref()?.items.get(*index)?;
                }
                Some(&item.runs)
            }
            _ => None,
        }
    }

    pub fn runs_mut(&mut self, path: &LeafPath) -> Option<&mut Vec<TextRun>> {
        if path.is_list_item() {
            return self.item_mut(path).map(|item| &mut item.runs);
        }
        match self.blocks.get_mut(path.block)? {
            Block::Paragraph { runs } | Block::Heading { runs, .. } => Some(runs),
            Block::List(_) => None,
        }
    }

    /// Plain text of one leaf
    pub fn leaf_text(&self, path: &LeafPath) -> Option<String> {
        self.runs(path)
            .map(|runs| runs.iter().map(|run| run.text.as_str()).collect())
    }

    pub fn item_mut(&mut self, path: &LeafPath) -> Option<&mut ListItem> {
        let (last, prefix) = path.items.split_last()?;
        self.list_containing_mut(path.block, prefix)?
            .items
            .get_mut(*last)
    }

    /// The list whose items are addressed by `prefix + [index]`
    pub(crate) fn list_containing_mut(
        &mut self,
        block: usize,
        prefix: &[usize],
    ) -> Option<&mut List> {
        let Block::List(list) = self.blocks.get_mut(block)? else {
            return None;
        };
        let mut current = list;
        for index in prefix {
            current = current.items.get_mut(*index)?.children.as_mut()?;
        }
        Some(current)
    }

    pub(crate) fn list_containing(&self, block: usize, prefix: &[usize]) -> Option<&List> {
        let Block::List(list) = self.blocks.get(block)? else {
            return None;
        };
        let mut current = list;
        for index in prefix {
            current = current.items.get(*index)?.children.as_ref()?;
        }
        Some(current)
    }
}

fn collect_list_leaves(
    list: &List,
    block: usize,
    prefix: &mut Vec<usize>,
    leaves: &mut Vec<LeafPath>,
) {
    for (index, item) in list.items.iter().enumerate() {
        prefix.push(index);
        leaves.push(LeafPath::item(block, prefix.clone()));
        if let Some(children) = &item.children {
            collect_list_leaves(children, block, prefix, leaves);
        }
        prefix.pop();
    }
}
