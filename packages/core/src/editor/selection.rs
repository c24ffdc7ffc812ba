//! Selection model

use super::document::LeafPath;

/// A caret location: a leaf and a character offset inside it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub leaf: LeafPath,
    pub offset: usize,
}

impl Position {
    pub fn new(leaf: LeafPath, offset: usize) -> Self {
        Self { leaf, offset }
    }
}

/// Anchor is where the selection started, focus is where the caret is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
        }
    }

    pub fn range(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Earlier endpoint in document order
    pub fn start(&self) -> &Position {
        std::cmp::min(&self.anchor, &self.focus)
    }

    /// Later endpoint in document order
    pub fn end(&self) -> &Position {
        std::cmp::max(&self.anchor, &self.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backwards_selection_orders_endpoints() {
        let later = Position::new(LeafPath::item(1, vec![0, 1]), 0);
        let earlier = Position::new(LeafPath::item(1, vec![0]), 4);
        let selection = Selection::range(later.clone(), earlier.clone());

        assert_eq!(selection.start(), &earlier);
        assert_eq!(selection.end(), &later);
        assert!(!selection.is_collapsed());
    }
}
