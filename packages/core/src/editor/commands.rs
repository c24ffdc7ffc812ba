//! Command Dispatcher
//!
//! Turns key events into editor commands through a fixed, priority-ordered
//! table of bindings. Each binding pairs a command with a trigger chord, the
//! input surface it listens on and a context predicate. The first binding
//! that matches wins and dispatch stops there.
//!
//! Commands that only touch the document are applied directly to the
//! [`DocumentEditor`]. `Save` and `FocusBody` need the surrounding session
//! and are handed back to the caller inside [`DispatchOutcome::Intercepted`].

use super::document::{ListKind, TextFormat};
use super::keymap::{Chord, Key, KeyEvent};
use super::surface::DocumentEditor;

/// Where a key event originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSurface {
    Title,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// Persist title and body
    Save,
    /// Leave the title field for the body
    FocusBody,
    /// Drop list structure at an empty item
    ExitList,
    ToggleFormat(TextFormat),
    InsertList(ListKind),
    Indent,
    Outdent,
    InsertTab,
}

/// Which surfaces a binding listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFilter {
    Any,
    Only(InputSurface),
}

impl SurfaceFilter {
    fn accepts(self, surface: InputSurface) -> bool {
        match self {
            SurfaceFilter::Any => true,
            SurfaceFilter::Only(only) => only == surface,
        }
    }
}

/// Predicate over the body editor's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandContext {
    Always,
    InListItem,
    InEmptyListItem,
    OutsideList,
}

impl CommandContext {
    fn holds(self, editor: Option<&DocumentEditor>) -> bool {
        match (self, editor) {
            (CommandContext::Always, _) => true,
            (_, None) => false,
            (CommandContext::InListItem, Some(editor)) => editor.in_list_item(),
            (CommandContext::InEmptyListItem, Some(editor)) => editor.in_empty_list_item(),
            (CommandContext::OutsideList, Some(editor)) => !editor.in_list_item(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub command: EditorCommand,
    pub trigger: Chord,
    pub surface: SurfaceFilter,
    pub context: CommandContext,
}

impl Binding {
    const fn new(
        command: EditorCommand,
        trigger: Chord,
        surface: SurfaceFilter,
        context: CommandContext,
    ) -> Self {
        Self {
            command,
            trigger,
            surface,
            context,
        }
    }

    /// Body bindings need a mounted body surface; global ones do not
    fn requires_body(&self) -> bool {
        self.surface == SurfaceFilter::Only(InputSurface::Body)
    }
}

/// Result of dispatching one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A binding handled the event; the surface must skip its default
    Intercepted(EditorCommand),
    /// No binding matched; the surface runs its default behavior
    Continue,
}

impl DispatchOutcome {
    pub fn is_intercepted(&self) -> bool {
        matches!(self, DispatchOutcome::Intercepted(_))
    }
}

/// Priority-ordered command table
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    bindings: Vec<Binding>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CommandRegistry {
    /// The standard table; `ordered_lists` enables Cmd/Ctrl+Shift+9
    pub fn new(ordered_lists: bool) -> Self {
        use CommandContext::*;
        use EditorCommand::*;

        let body = SurfaceFilter::Only(InputSurface::Body);
        let title = SurfaceFilter::Only(InputSurface::Title);

        let mut bindings = vec![
            Binding::new(Save, Chord::Primary('s'), SurfaceFilter::Any, Always),
            Binding::new(FocusBody, Chord::Plain(Key::Enter), title, Always),
            Binding::new(ExitList, Chord::Plain(Key::Enter), body, InEmptyListItem),
            Binding::new(
                ToggleFormat(TextFormat::STRIKETHROUGH),
                Chord::PrimaryShift('x'),
                body,
                Always,
            ),
            Binding::new(
                ToggleFormat(TextFormat::BOLD),
                Chord::Primary('b'),
                body,
                Always,
            ),
            Binding::new(
                ToggleFormat(TextFormat::ITALIC),
                Chord::Primary('i'),
                body,
                Always,
            ),
            Binding::new(
                ToggleFormat(TextFormat::UNDERLINE),
                Chord::Primary('u'),
                body,
                Always,
            ),
            Binding::new(
                InsertList(ListKind::Unordered),
                Chord::PrimaryShift('8'),
                body,
                Always,
            ),
        ];
        if ordered_lists {
            bindings.push(Binding::new(
                InsertList(ListKind::Ordered),
                Chord::PrimaryShift('9'),
                body,
                Always,
            ));
        }
        bindings.extend([
            Binding::new(Indent, Chord::Plain(Key::Tab), body, InListItem),
            Binding::new(Outdent, Chord::Shift(Key::Tab), body, InListItem),
            Binding::new(InsertTab, Chord::Plain(Key::Tab), body, OutsideList),
        ]);

        Self { bindings }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// First binding matching the event, surface and editor state
    pub fn resolve(
        &self,
        surface: InputSurface,
        event: &KeyEvent,
        editor: Option<&DocumentEditor>,
    ) -> Option<EditorCommand> {
        self.bindings
            .iter()
            .filter(|binding| binding.surface.accepts(surface))
            .filter(|binding| !binding.requires_body() || editor.is_some())
            .find(|binding| binding.trigger.matches(event) && binding.context.holds(editor))
            .map(|binding| binding.command)
    }

    /// Resolve and apply
    ///
    /// `editor` is `None` while the body surface is not mounted; body bindings
    /// are then inert and only global ones (save) can fire.
    pub fn dispatch(
        &self,
        surface: InputSurface,
        event: &KeyEvent,
        editor: Option<&mut DocumentEditor>,
    ) -> DispatchOutcome {
        let Some(command) = self.resolve(surface, event, editor.as_deref()) else {
            return DispatchOutcome::Continue;
        };

        if let Some(editor) = editor {
            let changed = apply(command, editor);
            tracing::debug!("Dispatched {:?} (changed: {})", command, changed);
        } else {
            tracing::debug!("Dispatched {:?}", command);
        }
        DispatchOutcome::Intercepted(command)
    }
}

/// Apply a document command; session-level commands report no change
fn apply(command: EditorCommand, editor: &mut DocumentEditor) -> bool {
    match command {
        EditorCommand::Save | EditorCommand::FocusBody => false,
        EditorCommand::ExitList => editor.exit_list(),
        EditorCommand::ToggleFormat(flag) => editor.toggle_format(flag),
        EditorCommand::InsertList(kind) => editor.insert_list(kind),
        EditorCommand::Indent => editor.indent(),
        EditorCommand::Outdent => editor.outdent(),
        EditorCommand::InsertTab => editor.insert_tab(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::LeafPath;

    fn body_with_caret(content: &str) -> DocumentEditor {
        let mut editor = DocumentEditor::from_content(content);
        editor.caret_to_end();
        editor
    }

    #[test]
    fn test_table_order_is_fixed() {
        let commands: Vec<EditorCommand> = CommandRegistry::new(true)
            .bindings()
            .iter()
            .map(|binding| binding.command)
            .collect();

        assert_eq!(commands.first(), Some(&EditorCommand::Save));
        assert_eq!(commands.last(), Some(&EditorCommand::InsertTab));
        assert_eq!(commands.len(), 12);
        assert_eq!(CommandRegistry::new(false).bindings().len(), 11);
    }

    #[test]
    fn test_save_fires_on_either_surface_without_body() {
        let registry = CommandRegistry::default();
        let save = KeyEvent::char('s').with_meta();

        assert_eq!(
            registry.dispatch(InputSurface::Title, &save, None),
            DispatchOutcome::Intercepted(EditorCommand::Save)
        );
        assert_eq!(
            registry.dispatch(InputSurface::Body, &save, None),
            DispatchOutcome::Intercepted(EditorCommand::Save)
        );
    }

    #[test]
    fn test_unmounted_body_is_inert() {
        let registry = CommandRegistry::default();
        let outcome = registry.dispatch(InputSurface::Body, &KeyEvent::new(Key::Tab), None);
        assert_eq!(outcome, DispatchOutcome::Continue);
    }

    #[test]
    fn test_enter_in_title_focuses_body() {
        let registry = CommandRegistry::default();
        let mut body = body_with_caret("text");

        let outcome = registry.dispatch(
            InputSurface::Title,
            &KeyEvent::new(Key::Enter),
            Some(&mut body),
        );
        assert_eq!(
            outcome,
            DispatchOutcome::Intercepted(EditorCommand::FocusBody)
        );
        assert_eq!(body.text(), "text");
    }

    #[test]
    fn test_tab_depends_on_list_context() {
        let registry = CommandRegistry::default();
        let mut body = body_with_caret("x");

        let tab = KeyEvent::new(Key::Tab);
        let outcome = registry.dispatch(InputSurface::Body, &tab, Some(&mut body));
        assert_eq!(
            outcome,
            DispatchOutcome::Intercepted(EditorCommand::InsertTab)
        );
        assert_eq!(body.text(), "x\t");

        let outcome = registry.dispatch(
            InputSurface::Body,
            &KeyEvent::new(Key::Tab).with_shift(),
            Some(&mut body),
        );
        assert_eq!(outcome, DispatchOutcome::Continue);
    }

    #[test]
    fn test_plain_enter_outside_empty_item_continues() {
        let registry = CommandRegistry::default();
        let mut body = body_with_caret("x");
        let enter = KeyEvent::new(Key::Enter);
        let outcome = registry.dispatch(InputSurface::Body, &enter, Some(&mut body));
        assert_eq!(outcome, DispatchOutcome::Continue);
    }

    #[test]
    fn test_ordered_list_chord_respects_variant() {
        let chord = KeyEvent::char('9').with_ctrl().with_shift();

        let mut body = body_with_caret("x");
        let without = CommandRegistry::new(false);
        assert_eq!(
            without.dispatch(InputSurface::Body, &chord, Some(&mut body)),
            DispatchOutcome::Continue
        );

        let with = CommandRegistry::new(true);
        assert!(with
            .dispatch(InputSurface::Body, &chord, Some(&mut body))
            .is_intercepted());
        assert_eq!(body.focus_leaf(), Some(&LeafPath::item(0, vec![0])));
    }

    #[test]
    fn test_format_chord_without_selection_is_intercepted_noop() {
        let registry = CommandRegistry::default();
        let mut body = DocumentEditor::from_content("plain");

        let outcome = registry.dispatch(
            InputSurface::Body,
            &KeyEvent::char('b').with_ctrl(),
            Some(&mut body),
        );
        assert_eq!(
            outcome,
            DispatchOutcome::Intercepted(EditorCommand::ToggleFormat(TextFormat::BOLD))
        );
        assert_eq!(body, DocumentEditor::from_content("plain"));
    }
}
