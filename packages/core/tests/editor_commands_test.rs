//! Editor Command Tests
//!
//! Drives the body surface through the command registry the way a key
//! handler would: dispatch first, surface default on `Continue`.

#[cfg(test)]
mod editor_commands_tests {
    use swiftnote_core::editor::bridge::{flatten, hydrate};
    use swiftnote_core::editor::{
        Block, CommandRegistry, DispatchOutcome, DocumentEditor, EditorCommand, HeadingLevel,
        InputSurface, Key, KeyEvent, LeafPath, ListKind, TextFormat,
    };

    /// Feed one event to the body the way the note editor does
    fn press(
        registry: &CommandRegistry,
        editor: &mut DocumentEditor,
        event: KeyEvent,
    ) -> DispatchOutcome {
        let outcome = registry.dispatch(InputSurface::Body, &event, Some(&mut *editor));
        if outcome == DispatchOutcome::Continue && !event.modifiers.primary() {
            match event.key {
                Key::Char(ch) => {
                    editor.insert_text(&ch.to_string());
                }
                Key::Enter => {
                    editor.insert_paragraph();
                }
                Key::Backspace => {
                    editor.delete_backward();
                }
                _ => {}
            }
        }
        outcome
    }

    fn type_str(registry: &CommandRegistry, editor: &mut DocumentEditor, text: &str) {
        for ch in text.chars() {
            press(registry, editor, KeyEvent::char(ch));
        }
    }

    fn empty_editor() -> DocumentEditor {
        let mut editor = DocumentEditor::from_content("");
        editor.caret_to_end();
        editor
    }

    #[test]
    fn test_arrow_transform_while_typing() {
        let registry = CommandRegistry::default();
        let mut editor = empty_editor();

        type_str(&registry, &mut editor, "a->b");

        assert_eq!(editor.text(), "a→b");
        assert_eq!(editor.selection().unwrap().focus.offset, 3);
    }

    #[test]
    fn test_loaded_text_is_not_rewritten_by_later_typing() {
        let registry = CommandRegistry::default();

        let mut arrow = DocumentEditor::from_content("a->b");
        arrow.caret_to_end();
        type_str(&registry, &mut arrow, "!");
        assert_eq!(arrow.text(), "a->b!");

        let mut heading = DocumentEditor::from_content("## done");
        heading.caret_to_end();
        type_str(&registry, &mut heading, "x");
        let first = &heading.document().blocks[0];
        assert!(matches!(first, Block::Paragraph { .. }));
        assert_eq!(heading.text(), "## donex");
    }

    #[test]
    fn test_heading_marker_converts_paragraph() {
        let registry = CommandRegistry::default();
        let mut editor = empty_editor();

        type_str(&registry, &mut editor, "## Hello");

        let Block::Heading { level, .. } = &editor.document().blocks[0] else {
            panic!("expected heading");
        };
        assert_eq!(*level, HeadingLevel::H2);
        assert_eq!(editor.text(), "Hello");
    }

    #[test]
    fn test_bullet_list_then_double_enter_exits() {
        let registry = CommandRegistry::default();
        let mut editor = empty_editor();
        type_str(&registry, &mut editor, "Groceries");

        let outcome = press(
            &registry,
            &mut editor,
            KeyEvent::char('8').with_meta().with_shift(),
        );
        assert_eq!(
            outcome,
            DispatchOutcome::Intercepted(EditorCommand::InsertList(ListKind::Unordered))
        );
        assert!(editor.in_list_item());

        // First Enter splits into a new empty item
        assert_eq!(
            press(&registry, &mut editor, KeyEvent::new(Key::Enter)),
            DispatchOutcome::Continue
        );
        assert!(editor.in_empty_list_item());

        // Second Enter on the empty item leaves the list
        assert_eq!(
            press(&registry, &mut editor, KeyEvent::new(Key::Enter)),
            DispatchOutcome::Intercepted(EditorCommand::ExitList)
        );
        assert!(!editor.in_list_item());
        assert!(matches!(editor.document().blocks[0], Block::List(_)));
        let after = &editor.document().blocks[1];
        assert!(matches!(after, Block::Paragraph { .. }));

        type_str(&registry, &mut editor, "after");
        assert_eq!(editor.text(), "Groceries\nafter");
    }

    #[test]
    fn test_tab_indents_inside_list_and_inserts_outside() {
        let registry = CommandRegistry::default();
        let mut editor = DocumentEditor::from_content("one\ntwo");
        editor.select_all();
        let bullets = KeyEvent::char('8').with_ctrl().with_shift();
        press(&registry, &mut editor, bullets);
        editor.caret_to_end();

        assert_eq!(
            press(&registry, &mut editor, KeyEvent::new(Key::Tab)),
            DispatchOutcome::Intercepted(EditorCommand::Indent)
        );
        assert_eq!(editor.focus_leaf().unwrap().depth(), 2);

        assert_eq!(
            press(&registry, &mut editor, KeyEvent::new(Key::Tab).with_shift()),
            DispatchOutcome::Intercepted(EditorCommand::Outdent)
        );
        assert_eq!(editor.focus_leaf().unwrap().depth(), 1);

        let mut plain = DocumentEditor::from_content("x");
        plain.caret_to_end();
        assert_eq!(
            press(&registry, &mut plain, KeyEvent::new(Key::Tab)),
            DispatchOutcome::Intercepted(EditorCommand::InsertTab)
        );
        assert_eq!(plain.text(), "x\t");
    }

    #[test]
    fn test_bold_shortcut_formats_selection_only() {
        let registry = CommandRegistry::default();
        let mut editor = DocumentEditor::from_content("bold me");
        editor.select_all();

        assert_eq!(
            press(&registry, &mut editor, KeyEvent::char('b').with_meta()),
            DispatchOutcome::Intercepted(EditorCommand::ToggleFormat(TextFormat::BOLD))
        );
        let runs = editor.document().runs(&LeafPath::block(0)).unwrap();
        assert!(runs.iter().all(|run| run.format.contains(TextFormat::BOLD)));

        // Formatting is lost on the way to storage
        assert_eq!(editor.text(), "bold me");
    }

    #[test]
    fn test_ordered_lists_can_be_disabled() {
        let registry = CommandRegistry::new(false);
        let mut editor = DocumentEditor::from_content("item");
        editor.caret_to_end();

        let numbered = KeyEvent::char('9').with_meta().with_shift();
        let outcome = press(&registry, &mut editor, numbered);
        assert_eq!(outcome, DispatchOutcome::Continue);
        assert!(!editor.in_list_item());
    }

    #[test]
    fn test_hydrate_then_flatten_preserves_lines() {
        for content in ["", "one", "one\ntwo", "a\n\nb\n", "\n"] {
            assert_eq!(flatten(&hydrate(content)), content);
        }
    }

    #[test]
    fn test_structure_flattens_to_lines() {
        let registry = CommandRegistry::default();
        let mut editor = DocumentEditor::from_content("title\nfirst\nsecond");
        editor.select_all();
        let numbered = KeyEvent::char('9').with_ctrl().with_shift();
        press(&registry, &mut editor, numbered);

        let reloaded = DocumentEditor::from_content(&editor.text());
        assert_eq!(reloaded.text(), "title\nfirst\nsecond");
        assert!(reloaded
            .document()
            .blocks
            .iter()
            .all(|block| matches!(block, Block::Paragraph { .. })));
    }
}
