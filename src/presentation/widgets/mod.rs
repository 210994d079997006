mod conversation_list;
mod file_explorer;
mod footer_bar;
mod header_bar;
mod input;
mod message_pane;

pub use conversation_list::{ConversationList, ConversationListStyle};
pub use file_explorer::{FileExplorerAction, FileExplorerComponent};
pub use footer_bar::{FooterBar, FooterBarStyle};
pub use header_bar::{HeaderBar, HeaderBarStyle};
pub use input::TextInput;
pub use message_pane::{MessagePane, MessagePaneStyle};
