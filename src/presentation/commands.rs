use std::collections::HashMap;
use std::fmt::Write;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::domain::keybinding::{Action, Keybind};

/// Maps key chords to actions.
///
/// Several actions may share a key (Enter opens a conversation in the list
/// and sends in the input), so lookups are scoped to the actions the focused
/// component understands.
pub struct CommandRegistry {
    display_bindings: HashMap<Action, KeyEvent>,
    input_bindings: Vec<(KeyEvent, Action)>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self {
            display_bindings: HashMap::new(),
            input_bindings: Vec::new(),
        };

        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        let plain = |code| KeyEvent::new(code, KeyModifiers::NONE);
        let shifted = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT);

        registry.register(Action::Quit, ctrl('c'), true);
        registry.register(Action::SwitchToUsers, ctrl('u'), true);
        registry.register(Action::SwitchToBots, ctrl('b'), true);
        registry.register(Action::SwitchToChannels, ctrl('n'), true);
        registry.register(Action::SwitchToGroups, ctrl('g'), true);
        registry.register(Action::ToggleAttachmentPicker, ctrl('a'), true);
        registry.register(Action::OpenSearch, ctrl('f'), true);
        registry.register(Action::FocusNext, plain(KeyCode::Tab), true);
        registry.register(Action::FocusPrevious, plain(KeyCode::BackTab), true);
        registry.register(
            Action::FocusPrevious,
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            false,
        );

        registry.register(Action::NavigateUp, plain(KeyCode::Up), true);
        registry.register(Action::NavigateUp, plain(KeyCode::Char('k')), false);
        registry.register(Action::NavigateDown, plain(KeyCode::Down), true);
        registry.register(Action::NavigateDown, plain(KeyCode::Char('j')), false);
        registry.register(Action::NavigateLeft, plain(KeyCode::Left), true);
        registry.register(Action::NavigateLeft, plain(KeyCode::Char('h')), false);
        registry.register(Action::NavigateRight, plain(KeyCode::Right), true);
        registry.register(Action::NavigateRight, plain(KeyCode::Char('l')), false);
        registry.register(Action::Select, plain(KeyCode::Enter), true);
        registry.register(Action::SelectFirst, plain(KeyCode::Char('g')), true);
        registry.register(Action::SelectFirst, plain(KeyCode::Home), false);
        registry.register(Action::SelectLast, shifted('G'), true);
        registry.register(Action::SelectLast, plain(KeyCode::End), false);

        registry.register(Action::OpenStories, plain(KeyCode::Char('s')), true);

        registry.register(Action::LoadOlder, shifted('K'), true);
        registry.register(Action::LoadOlder, plain(KeyCode::PageUp), false);
        registry.register(Action::Reply, plain(KeyCode::Char('r')), true);
        registry.register(Action::EditMessage, plain(KeyCode::Char('e')), true);
        registry.register(Action::DeleteMessage, plain(KeyCode::Char('d')), true);
        registry.register(Action::ForwardMessage, plain(KeyCode::Char('f')), true);

        registry.register(Action::SendMessage, plain(KeyCode::Enter), true);
        registry.register(Action::ClearAttachment, ctrl('x'), true);
        registry.register(Action::Cancel, plain(KeyCode::Esc), true);

        registry.register(Action::Confirm, plain(KeyCode::Char('y')), true);
        registry.register(Action::Confirm, plain(KeyCode::Enter), false);
        registry.register(Action::Deny, plain(KeyCode::Char('n')), true);
        registry.register(Action::ToggleHidden, plain(KeyCode::Char('.')), true);

        registry
    }
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the default keymap and layers user overrides on top.
    ///
    /// Override keys are chord strings such as `"Ctrl+q"` or `"F2"`;
    /// unparsable entries are skipped with a warning.
    #[must_use]
    pub fn with_overrides(overrides: &HashMap<String, Action>) -> Self {
        let mut registry = Self::default();
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (chord, action) in entries {
            match parse_key(chord) {
                Some(key) => registry.rebind(*action, key),
                None => warn!(chord = %chord, "Ignoring unparsable key binding"),
            }
        }
        registry
    }

    fn register(&mut self, action: Action, key: KeyEvent, is_primary: bool) {
        if is_primary {
            self.display_bindings.insert(action, key);
        }
        self.input_bindings.push((key, action));
    }

    /// Binds `key` to `action` ahead of every default binding.
    fn rebind(&mut self, action: Action, key: KeyEvent) {
        self.input_bindings.retain(|(k, a)| !(*a == action && same_key(k, &key)));
        self.input_bindings.insert(0, (key, action));
        self.display_bindings.insert(action, key);
    }

    #[must_use]
    pub fn get(&self, action: Action) -> Option<KeyEvent> {
        self.display_bindings.get(&action).copied()
    }

    #[must_use]
    pub fn find_action(&self, key: KeyEvent) -> Option<Action> {
        self.input_bindings
            .iter()
            .find(|(k, _)| same_key(k, &key))
            .map(|(_, a)| *a)
    }

    /// Resolves `key` among `scope` only.
    #[must_use]
    pub fn find_action_in(&self, key: KeyEvent, scope: &[Action]) -> Option<Action> {
        self.input_bindings
            .iter()
            .find(|(k, a)| scope.contains(a) && same_key(k, &key))
            .map(|(_, a)| *a)
    }

    /// Footer hints for `actions`, in the given order.
    #[must_use]
    pub fn keybinds(&self, actions: &[Action]) -> Vec<Keybind> {
        actions
            .iter()
            .filter_map(|action| {
                self.get(*action)
                    .map(|key| Keybind::new(key, *action, action.label()))
            })
            .collect()
    }
}

/// Character keys already encode shift in their case.
fn same_key(bound: &KeyEvent, pressed: &KeyEvent) -> bool {
    if bound.code != pressed.code {
        return false;
    }
    match bound.code {
        KeyCode::Char(_) | KeyCode::BackTab => {
            let ignore = KeyModifiers::SHIFT;
            bound.modifiers.difference(ignore) == pressed.modifiers.difference(ignore)
        }
        _ => bound.modifiers == pressed.modifiers,
    }
}

/// Parses chords like `Ctrl+Shift+k`, `Alt+Enter`, `F5` or `x`.
#[must_use]
pub fn parse_key(chord: &str) -> Option<KeyEvent> {
    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = chord.split('+').map(str::trim).collect();
    let key = parts.pop().filter(|k| !k.is_empty())?;

    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => return None,
        }
    }

    let code = match key.to_ascii_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        lower => {
            if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                KeyCode::F(n)
            } else {
                let mut chars = key.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                if modifiers.contains(KeyModifiers::CONTROL) {
                    KeyCode::Char(c.to_ascii_lowercase())
                } else {
                    KeyCode::Char(c)
                }
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}

/// Compact label for a key chord, as shown in the footer.
#[must_use]
pub fn format_key(key: &KeyEvent) -> String {
    let mut s = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("C-");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        s.push_str("A-");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT)
        && !matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab)
    {
        s.push_str("S-");
    }

    match key.code {
        KeyCode::Char(' ') => s.push_str("Space"),
        KeyCode::Char(c) => s.push(c),
        KeyCode::Enter => s.push_str("Enter"),
        KeyCode::Esc => s.push_str("Esc"),
        KeyCode::Tab => s.push_str("Tab"),
        KeyCode::BackTab => s.push_str("S-Tab"),
        KeyCode::Backspace => s.push_str("Bksp"),
        KeyCode::PageUp => s.push_str("PgUp"),
        KeyCode::Up => s.push('↑'),
        KeyCode::Down => s.push('↓'),
        KeyCode::Left => s.push('←'),
        KeyCode::Right => s.push('→'),
        KeyCode::F(n) => {
            let _ = write!(s, "F{n}");
        }
        _ => {
            let _ = write!(s, "{:?}", key.code);
        }
    }
    s
}
