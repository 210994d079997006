use crossterm::event::KeyEvent;
use directories::UserDirs;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};
use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::domain::keybinding::Action;
use crate::presentation::commands::{CommandRegistry, format_key};

const PICKER_ACTIONS: [Action; 9] = [
    Action::Cancel,
    Action::NavigateUp,
    Action::NavigateDown,
    Action::NavigateLeft,
    Action::NavigateRight,
    Action::Select,
    Action::SelectFirst,
    Action::SelectLast,
    Action::ToggleHidden,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileExplorerAction {
    SelectFile(PathBuf),
    Close,
    None,
}

#[derive(Debug, Clone)]
struct FileEntry {
    path: PathBuf,
    is_dir: bool,
    name: String,
}

/// Directory browser used to pick an attachment.
#[derive(Debug, Clone)]
pub struct FileExplorerComponent {
    current_dir: PathBuf,
    entries: Vec<FileEntry>,
    state: ListState,
    show_hidden: bool,
}

impl FileExplorerComponent {
    /// Opens the picker in the user's home directory.
    #[must_use]
    pub fn new() -> Self {
        let root = UserDirs::new().map_or_else(|| PathBuf::from("/"), |dirs| dirs.home_dir().to_path_buf());
        Self::with_root(root)
    }

    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut component = Self {
            current_dir: root.clone(),
            entries: Vec::new(),
            state: ListState::default(),
            show_hidden: false,
        };
        component.load_entries(&root);
        component
    }

    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    #[must_use]
    pub const fn shows_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Names in display order, `..` first when the directory has a parent.
    #[must_use]
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[must_use]
    pub fn selected_name(&self) -> Option<&str> {
        self.selected_entry().map(|e| e.name.as_str())
    }

    fn load_entries(&mut self, path: &Path) {
        let selected_name = self.selected_entry().map(|e| e.name.clone());

        self.entries.clear();

        if let Some(parent) = path.parent() {
            self.entries.push(FileEntry {
                path: parent.to_path_buf(),
                is_dir: true,
                name: "..".to_string(),
            });
        }

        match fs::read_dir(path) {
            Ok(read_dir) => {
                let mut entries: Vec<FileEntry> = read_dir
                    .filter_map(Result::ok)
                    .map(|entry| {
                        let path = entry.path();
                        let is_dir = path.is_dir();
                        let name = entry.file_name().to_string_lossy().into_owned();
                        FileEntry { path, is_dir, name }
                    })
                    .filter(|entry| self.show_hidden || !entry.name.starts_with('.'))
                    .collect();

                entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => a.name.cmp(&b.name),
                });

                self.entries.extend(entries);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Cannot read directory"),
        }

        let index = selected_name
            .and_then(|name| self.entries.iter().position(|e| e.name == name))
            .or_else(|| (!self.entries.is_empty()).then_some(0));
        self.state.select(index);
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        let path = self.current_dir.clone();
        self.load_entries(&path);
    }

    fn change_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
        self.state.select(None);
        let path = self.current_dir.clone();
        self.load_entries(&path);
    }

    fn go_up(&mut self) {
        if let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) {
            self.change_dir(parent);
        }
    }

    fn open_selected(&mut self) -> FileExplorerAction {
        let Some(selected) = self.selected_entry().cloned() else {
            return FileExplorerAction::None;
        };
        if selected.name == ".." {
            self.go_up();
            FileExplorerAction::None
        } else if selected.is_dir {
            self.change_dir(selected.path);
            FileExplorerAction::None
        } else {
            FileExplorerAction::SelectFile(selected.path)
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, registry: &CommandRegistry) -> FileExplorerAction {
        match registry.find_action_in(key, &PICKER_ACTIONS) {
            Some(Action::Cancel) => FileExplorerAction::Close,
            Some(Action::NavigateUp) => {
                self.previous();
                FileExplorerAction::None
            }
            Some(Action::NavigateDown) => {
                self.next();
                FileExplorerAction::None
            }
            Some(Action::SelectFirst) => {
                self.state.select((!self.entries.is_empty()).then_some(0));
                FileExplorerAction::None
            }
            Some(Action::SelectLast) => {
                self.state.select(self.entries.len().checked_sub(1));
                FileExplorerAction::None
            }
            Some(Action::NavigateLeft) => {
                self.go_up();
                FileExplorerAction::None
            }
            Some(Action::NavigateRight | Action::Select) => self.open_selected(),
            Some(Action::ToggleHidden) => {
                self.toggle_hidden();
                FileExplorerAction::None
            }
            _ => FileExplorerAction::None,
        }
    }

    fn next(&mut self) {
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.entries.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(0) | None => self.entries.len().saturating_sub(1),
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn selected_entry(&self) -> Option<&FileEntry> {
        self.state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, registry: &CommandRegistry) {
        Clear.render(area, buf);

        let title = if self.show_hidden {
            format!(" Attach file: {} (hidden shown) ", self.current_dir.display())
        } else {
            format!(" Attach file: {} ", self.current_dir.display())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Yellow));

        let inner_area = block.inner(area);
        let [list_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner_area);

        block.render(area, buf);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let (icon, color) = if entry.is_dir {
                    ("▸ ", Color::Blue)
                } else {
                    ("  ", Color::White)
                };
                ListItem::new(format!("{icon}{}", entry.name)).style(Style::default().fg(color))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        StatefulWidget::render(list, list_area, buf, &mut self.state);

        let hint = |action: Action| {
            registry
                .get(action)
                .map_or_else(String::new, |key| format!("[{}] {} ", format_key(&key), action.label()))
        };
        let footer = Line::from(vec![
            Span::raw(" "),
            Span::raw(hint(Action::Select)),
            Span::raw(hint(Action::NavigateLeft)),
            Span::raw(hint(Action::ToggleHidden)),
            Span::raw(hint(Action::Cancel)),
        ])
        .style(Style::default().fg(Color::Gray));

        Widget::render(footer, footer_area, buf);
    }
}

impl Default for FileExplorerComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("photos")).expect("mkdir");
        fs::write(dir.path().join("photos").join("cat.png"), b"png").expect("write");
        fs::write(dir.path().join("notes.txt"), b"hi").expect("write");
        fs::write(dir.path().join(".secret"), b"x").expect("write");
        dir
    }

    #[test]
    fn test_directories_first_and_hidden_filtered() {
        let dir = fixture();
        let picker = FileExplorerComponent::with_root(dir.path());
        assert_eq!(picker.entry_names(), vec!["..", "photos", "notes.txt"]);
        assert_eq!(picker.selected_name(), Some(".."));
    }

    #[test]
    fn test_toggle_hidden_keeps_selection() {
        let dir = fixture();
        let registry = CommandRegistry::new();
        let mut picker = FileExplorerComponent::with_root(dir.path());
        picker.handle_key(key(KeyCode::Down), &registry);
        assert_eq!(picker.selected_name(), Some("photos"));

        picker.handle_key(key(KeyCode::Char('.')), &registry);
        assert!(picker.shows_hidden());
        assert!(picker.entry_names().contains(&".secret"));
        assert_eq!(picker.selected_name(), Some("photos"));
    }

    #[test]
    fn test_enter_directory_and_select_file() {
        let dir = fixture();
        let registry = CommandRegistry::new();
        let mut picker = FileExplorerComponent::with_root(dir.path());

        picker.handle_key(key(KeyCode::Down), &registry);
        assert_eq!(picker.handle_key(key(KeyCode::Enter), &registry), FileExplorerAction::None);
        assert_eq!(picker.current_dir(), dir.path().join("photos"));

        picker.handle_key(key(KeyCode::Down), &registry);
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter), &registry),
            FileExplorerAction::SelectFile(dir.path().join("photos").join("cat.png"))
        );

        picker.handle_key(key(KeyCode::Char('h')), &registry);
        assert_eq!(picker.current_dir(), dir.path());
    }

    #[test]
    fn test_wraparound_and_close() {
        let dir = fixture();
        let registry = CommandRegistry::new();
        let mut picker = FileExplorerComponent::with_root(dir.path());

        picker.handle_key(key(KeyCode::Up), &registry);
        assert_eq!(picker.selected_name(), Some("notes.txt"));
        picker.handle_key(key(KeyCode::Down), &registry);
        assert_eq!(picker.selected_name(), Some(".."));

        assert_eq!(picker.handle_key(key(KeyCode::Esc), &registry), FileExplorerAction::Close);
    }
}
