//! Account services used behind the access requirements.
//!
//! - `paging` - Page requests and paged results
//! - `preferences` - Preference storage and search
//! - `messages` - System messages and dismissals
//! - `notify` - Mail delivery and the account-approved email

pub mod messages;
pub mod notify;
pub mod paging;
pub mod preferences;

pub use messages::{DismissedMessage, InMemoryMessageStore, Message, MessageService, MessageStore};
pub use notify::{Email, InMemoryMailer, Mailer, NewUserEmail};
pub use paging::{Page, PageQuery, PageRequest, Sort, SortDirection};
pub use preferences::{
    InMemoryPreferenceStore, Preference, PreferenceFilter, PreferenceService, PreferenceStore,
};
