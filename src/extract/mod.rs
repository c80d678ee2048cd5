use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::ExtractionError;

pub mod charset;
mod record;
pub mod tree;

pub use charset::decode_page;
pub use record::EpisodeRecord;
use tree::{first_after_open, first_following, flat_text, is_tag};

/// Record separator left behind in descriptions by the archive's encoding.
const RECORD_SEPARATOR: char = '\u{1e}';

const TITLE_FONT_SIZE: &str = "2";
const DESCRIPTION_FONT_SIZE: &str = "1";

pub type Outcome = Result<EpisodeRecord, ExtractionError>;

/// Walk every `<a name=...>` on the page and turn the numeric ones into episodes.
///
/// Anchors with a non-numeric name are navigation targets and yield nothing.
/// A numeric anchor that cannot be parsed yields an `Err` for that anchor only;
/// iteration always continues with the next anchor.
pub fn extract(doc: &Html) -> impl Iterator<Item = Outcome> + '_ {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_tag(el, "a"))
        .filter_map(|el| {
            let anchor = el.value().attr("name")?.trim().parse::<u32>().ok()?;
            Some(episode_at(*el, anchor))
        })
}

fn episode_at(anchor_node: NodeRef<'_, Node>, anchor: u32) -> Outcome {
    let header = first_after_open(anchor_node, |e| is_tag(e, "table"))
        .ok_or(ExtractionError::MissingHeader { anchor })?;
    let Header { label, number, date, length } = parse_header(&flat_text(&header), anchor)?;
    let minutes = parse_minutes(&length);

    let body = first_following(*header, |e| is_tag(e, "table"))
        .ok_or(ExtractionError::MissingBody { anchor })?;

    let title = font_text(&body, TITLE_FONT_SIZE)
        .filter(|t| !t.trim().is_empty())
        .ok_or(ExtractionError::MissingTitle { anchor })?;
    let description = font_text(&body, DESCRIPTION_FONT_SIZE)
        .ok_or(ExtractionError::MissingDescription { anchor })?;

    let description = clean_description(&description, &title);
    if description.is_empty() {
        return Err(ExtractionError::EmptyDescription { anchor });
    }

    Ok(EpisodeRecord::new(number, label, date, length, minutes, title.trim().to_string(), description))
}

#[derive(Debug, PartialEq, Eq)]
struct Header {
    label: String,
    number: u32,
    date: String,
    length: String,
}

// "Episode #999 | May 3 2016 | 62 min"
fn parse_header(text: &str, anchor: u32) -> Result<Header, ExtractionError> {
    let fields: Vec<&str> = text.split('|').map(str::trim).collect();
    let [label, date, length] = fields.as_slice() else {
        return Err(ExtractionError::MalformedHeader { anchor, fields: fields.len() });
    };
    let number = label
        .split_once('#')
        .and_then(|(_, n)| n.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| ExtractionError::BadEpisodeNumber { anchor, label: label.to_string() })?;
    Ok(Header {
        label: label.to_string(),
        number,
        date: date.to_string(),
        length: length.to_string(),
    })
}

/// Leading integer of the length field; anything unreadable counts as one minute.
pub fn parse_minutes(length: &str) -> u32 {
    length
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse().ok())
        .unwrap_or(1)
}

fn font_text(body: &ElementRef<'_>, size: &str) -> Option<String> {
    let sel = Selector::parse("font[size]").ok()?;
    body.select(&sel)
        .find(|f| f.value().attr("size").map(str::trim) == Some(size))
        .map(|f| flat_text(&f))
}

/// Drop a duplicated title prefix (once), separator bytes and surrounding whitespace.
pub fn clean_description(raw: &str, raw_title: &str) -> String {
    let body = match raw.strip_prefix(raw_title) {
        Some(rest) if !raw_title.is_empty() => rest,
        _ => raw,
    };
    body.replace(RECORD_SEPARATOR, "").trim().to_string()
}
