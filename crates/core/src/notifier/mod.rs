//! Outbound notification channel.
//!
//! Delivery is best-effort: callers log a `DeliveryError` and move on.

mod discord;
pub mod embed;
mod types;

pub use discord::DiscordNotifier;
pub use types::*;
