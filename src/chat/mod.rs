//! Ephemeral chat.
//!
//! Two [`ChatStore`] instances back the site: a public room everyone reads,
//! and a direct inbox where each participant talks to the operator.  Both
//! share one [`MessageFilter`] and get their own [`SendGuard`].

pub mod filter;
pub mod guard;
pub mod store;

pub use filter::MessageFilter;
pub use guard::SendGuard;
pub use store::{unread_from_participant, ChatStore, Message, NewMessage};
