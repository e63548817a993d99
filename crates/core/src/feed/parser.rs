use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::warn;

use super::{FeedError, FeedItem, RawFeedItem};

/// Parse a Nyaa RSS feed from raw XML bytes.
///
/// Items keep the document order. Entries that cannot be normalized (no guid
/// or no title) are skipped.
pub fn parse_nyaa_feed(xml: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    let raw_items = parse_raw_items(xml)?;
    let total = raw_items.len();

    let items: Vec<FeedItem> = raw_items
        .into_iter()
        .filter_map(RawFeedItem::normalize)
        .collect();

    if items.len() < total {
        warn!(
            skipped = total - items.len(),
            "Skipped feed entries without guid or title"
        );
    }

    Ok(items)
}

fn parse_raw_items(xml: &[u8]) -> Result<Vec<RawFeedItem>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut current_item: Option<RawFeedItem> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    current_item = Some(RawFeedItem::default());
                }
                current_element = name;
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current_item.take() {
                        items.push(item);
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = e
                        .unescape()
                        .map_err(|e| FeedError::Parse(format!("XML parse error: {}", e)))?;
                    assign_field(item, &current_element, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = String::from_utf8_lossy(&e);
                    assign_field(item, &current_element, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

fn assign_field(item: &mut RawFeedItem, element: &str, text: &str) {
    if text.is_empty() {
        return;
    }

    let slot = match element {
        "guid" => &mut item.guid,
        "title" => &mut item.title,
        "link" => &mut item.link,
        "pubDate" => &mut item.pub_date,
        "nyaa:category" => &mut item.category,
        "nyaa:size" => &mut item.size,
        "nyaa:seeders" => &mut item.seeders,
        "nyaa:leechers" => &mut item.leechers,
        "nyaa:downloads" => &mut item.downloads,
        "nyaa:trusted" => &mut item.trusted,
        "nyaa:infoHash" => &mut item.info_hash,
        _ => return,
    };

    // Text split around entities or CDATA sections arrives in pieces.
    if let Some(existing) = slot.as_mut() {
        existing.push_str(text);
    } else {
        *slot = Some(text.to_string());
    }
}
