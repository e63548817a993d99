//! Feed retrieval and normalization.
//!
//! A `FeedFetcher` yields a snapshot of the feed as an ordered sequence of
//! `FeedItem`s, most recent first, exactly as the source lists them.

mod nyaa;
mod parser;
mod types;

pub use nyaa::NyaaFeedClient;
pub use parser::parse_nyaa_feed;
pub use types::*;
