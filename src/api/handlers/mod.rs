mod health;
mod links;
mod messages;
mod session;

pub use health::health;
pub use links::{create_link, dashboard, get_link, list_links};
pub use messages::{get_inbox, submit_message};
pub use session::{get_session, sign_in, sign_out};
