pub mod client;
pub mod graph;
pub mod webhook;

pub use client::{MessageDelivery, SendApi};
pub use graph::{GraphApi, UserProfileSource};
pub use webhook::{handle_receive_webhook, handle_verify_webhook, AppState};
