//! Command implementations

pub mod add;
pub mod list;
pub mod oauth;
pub mod reset;
pub mod sync;

pub use add::run_add;
pub use list::run_list;
pub use oauth::{run_oauth_login, run_oauth_token};
pub use reset::run_reset;
pub use sync::run_sync;
