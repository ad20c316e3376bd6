pub mod session;
pub mod store;

pub use session::{ChatMessage, ChatRole, Session};
pub use store::{SessionStore, DEFAULT_SESSION_ID};
