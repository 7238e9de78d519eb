mod state;
mod view;

pub use state::{create_state, DocumentListState};
pub use view::DocumentList;
