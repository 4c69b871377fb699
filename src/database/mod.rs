pub mod messages;
pub mod users;

pub use messages::{CannedMessageStore, PgCannedMessageStore};
pub use users::{PgUserStore, UserStore};
