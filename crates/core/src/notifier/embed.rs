//! Discord embed payloads for feed announcements.

use chrono::Utc;
use serde_json::{json, Value};

use crate::feed::FeedItem;

pub const TRUSTED_COLOR: u32 = 0x00ff00;
pub const UNTRUSTED_COLOR: u32 = 0xff9900;
pub const PERSONAL_COLOR: u32 = 0xff6b6b;

const CATEGORY_EMOJI: &[(&str, &str)] = &[
    ("Anime", "🎌"),
    ("Literature", "📚"),
    ("Live Action", "🎬"),
    ("Pictures", "🖼️"),
    ("Music", "🎵"),
    ("Software", "💻"),
];

/// Emoji for a category label; first matching family wins.
pub fn category_emoji(category: &str) -> &'static str {
    CATEGORY_EMOJI
        .iter()
        .find(|(family, _)| category.contains(family))
        .map(|(_, emoji)| *emoji)
        .unwrap_or("📁")
}

fn published_label(item: &FeedItem) -> String {
    item.published_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn links(item: &FeedItem) -> String {
    format!("[Download]({}) | [Details]({})", item.download_url, item.view_url)
}

fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(8) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// Embed for the shared announcement channel.
pub fn broadcast_embed(item: &FeedItem) -> Value {
    let (title, color) = if item.trusted {
        ("✅ New Torrent", TRUSTED_COLOR)
    } else {
        ("⚠️ New Torrent", UNTRUSTED_COLOR)
    };

    json!({
        "title": title,
        "url": item.view_url,
        "description": format!("**{}**", item.title),
        "color": color,
        "fields": [
            {
                "name": "Category",
                "value": format!("{} {}", category_emoji(&item.category), item.category),
                "inline": true
            },
            { "name": "Size", "value": item.size, "inline": true },
            { "name": "Date", "value": published_label(item), "inline": true },
            {
                "name": "Statistics",
                "value": format!(
                    "🌱 {} | 📥 {} | ⬇️ {}",
                    item.seeders, item.leechers, item.downloads
                ),
                "inline": false
            },
            {
                "name": "Trusted",
                "value": if item.trusted { "Yes" } else { "No" },
                "inline": true
            },
            { "name": "Links", "value": links(item), "inline": false }
        ],
        "footer": {
            "text": format!("Nyaa.si Bot | Hash: {}...", short_hash(&item.info_hash))
        },
        "timestamp": Utc::now().to_rfc3339()
    })
}

/// Embed for a keyword match sent to one subscriber.
pub fn personal_embed(item: &FeedItem, keyword: &str) -> Value {
    json!({
        "title": "🔔 Subscription Notification",
        "description": format!("New torrent for keyword: **{}**", keyword),
        "color": PERSONAL_COLOR,
        "fields": [
            { "name": "Title", "value": item.title, "inline": false },
            { "name": "Category", "value": item.category, "inline": true },
            { "name": "Size", "value": item.size, "inline": true },
            {
                "name": "Stats",
                "value": format!("🌱 {} | 📥 {}", item.seeders, item.leechers),
                "inline": true
            },
            { "name": "Links", "value": links(item), "inline": false }
        ],
        "footer": { "text": format!("Keyword: {}", keyword) },
        "timestamp": Utc::now().to_rfc3339()
    })
}

/// Message body wrapping a single embed.
pub fn message_payload(embed: Value) -> Value {
    json!({ "embeds": [embed] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_category_emoji() {
        assert_eq!(category_emoji("Anime - English-translated"), "🎌");
        assert_eq!(category_emoji("Literature - Raw"), "📚");
        assert_eq!(category_emoji("Live Action - Idol/PV"), "🎬");
        assert_eq!(category_emoji("Pictures - Photos"), "🖼️");
        assert_eq!(category_emoji("Audio - Lossless Music"), "🎵");
        assert_eq!(category_emoji("Software - Games"), "💻");
        assert_eq!(category_emoji("Unknown"), "📁");
    }

    #[test]
    fn test_broadcast_embed_trusted() {
        let mut item = fixtures::feed_item("1001", "[Sub] Show - 01 [1080p]");
        item.trusted = true;
        item.info_hash = "0123456789abcdef".to_string();

        let embed = broadcast_embed(&item);
        assert_eq!(embed["title"], "✅ New Torrent");
        assert_eq!(embed["color"], TRUSTED_COLOR);
        assert_eq!(embed["url"], item.view_url);
        assert_eq!(embed["description"], "**[Sub] Show - 01 [1080p]**");
        assert_eq!(embed["footer"]["text"], "Nyaa.si Bot | Hash: 01234567...");

        let fields = embed["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[4]["value"], "Yes");
    }

    #[test]
    fn test_broadcast_embed_untrusted_unknown_date() {
        let mut item = fixtures::feed_item("1002", "Something");
        item.published_at = None;
        item.info_hash = String::new();

        let embed = broadcast_embed(&item);
        assert_eq!(embed["title"], "⚠️ New Torrent");
        assert_eq!(embed["color"], UNTRUSTED_COLOR);
        assert_eq!(embed["fields"][2]["value"], "Unknown");
        assert_eq!(embed["footer"]["text"], "Nyaa.si Bot | Hash: ...");
    }

    #[test]
    fn test_personal_embed_names_keyword() {
        let item = fixtures::feed_item("1003", "Anime Title");
        let embed = personal_embed(&item, "anime");

        assert_eq!(embed["color"], PERSONAL_COLOR);
        assert_eq!(embed["description"], "New torrent for keyword: **anime**");
        assert_eq!(embed["footer"]["text"], "Keyword: anime");
        assert_eq!(embed["fields"][0]["value"], "Anime Title");
    }

    #[test]
    fn test_embeds_carry_send_timestamp() {
        let item = fixtures::feed_item("1004", "Anime Title");
        let before = Utc::now();

        for embed in [broadcast_embed(&item), personal_embed(&item, "anime")] {
            let stamp = embed["timestamp"].as_str().unwrap();
            let at = chrono::DateTime::parse_from_rfc3339(stamp).unwrap();
            assert!(at >= before);
        }
    }

    #[test]
    fn test_message_payload_wraps_embed() {
        let payload = message_payload(json!({"title": "x"}));
        assert_eq!(payload["embeds"][0]["title"], "x");
    }
}
