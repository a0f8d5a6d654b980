pub mod blocker_event;
pub mod token;

pub use blocker_event::{BlockerEvent, EventKey};
pub use token::StoredToken;
