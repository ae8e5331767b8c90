mod stateful_list;
mod text_input;

pub use stateful_list::StatefulList;
pub use text_input::TextInput;
