// HTML export reader
//
// Messenger HTML exports are one page per thread chunk:
//
//   <h1>Thread title</h1>
//   <h2>Participants: Ana, Ben</h2>
//   <section class="_a6-g">
//     <h2>Sender</h2>
//     <div class="_2ph_ _a6-p"><div><div>text</div>...</div></div>
//     <footer><div class="_a72d">Oct 25, 2022 10:03:52 am</div></footer>
//   </section>
//
// The markup is regular enough that a handful of patterns recover every
// field without a DOM.

use super::text::normalize;
use super::timestamp::parse_export_timestamp;
use crate::derive::TimeBasis;
use crate::model::{Media, RawMessage};
use regex::Regex;
use std::sync::LazyLock;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("title pattern is valid"));
static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>").expect("h2 pattern is valid"));
static PARTICIPANTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Participants:\s*(.+)").expect("participants pattern is valid")
});
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<section[^>]*class="[^"]*\b_a6-g\b[^"]*"[^>]*>(.*?)</section>"#)
        .expect("section pattern is valid")
});
static CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="[^"]*\b_2ph_\s+_a6-p\b[^"]*"[^>]*>(.*?)(?:<footer|$)"#)
        .expect("content pattern is valid")
});
static FOOTER_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="[^"]*\b_a72d\b[^"]*"[^>]*>(.*?)</div>"#)
        .expect("footer pattern is valid")
});
static TEXT_NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">([^<]+)<").expect("text node pattern is valid"));
static MEDIA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(img|video|audio)\b").expect("media pattern is valid")
});

const UNKNOWN_THREAD: &str = "Unknown Thread";

/// Reaction glyphs that prefix reaction lines rather than message text
const REACTION_PREFIXES: &[&str] = &["❤", "👍", "😮", "😆", "😢", "😠"];

/// Parse one exported HTML page
pub fn parse(html: &str, basis: TimeBasis) -> Vec<RawMessage> {
    let thread = TITLE_RE
        .captures(html)
        .map(|c| normalize(&c[1]))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_THREAD.to_string());
    let nb_participants = participants(html);

    SECTION_RE
        .captures_iter(html)
        .filter_map(|c| section_message(&c[1], &thread, nb_participants, basis))
        .collect()
}

/// Count names on the first `<h2>` when it is the participants line
fn participants(html: &str) -> u32 {
    H2_RE
        .captures(html)
        .map(|c| normalize(&c[1]))
        .and_then(|h2| {
            PARTICIPANTS_RE
                .captures(&h2)
                .map(|p| p[1].split(',').filter(|n| !n.trim().is_empty()).count() as u32)
        })
        .unwrap_or(0)
}

fn section_message(
    section: &str,
    thread: &str,
    nb_participants: u32,
    basis: TimeBasis,
) -> Option<RawMessage> {
    if section.contains("Participants:") {
        return None;
    }

    let sender = normalize(&H2_RE.captures(section)?[1]);
    let lowered = sender.to_lowercase();
    if lowered.contains("group invite link") || lowered.contains("participants:") {
        return None;
    }

    let content = CONTENT_RE.captures(section)?;
    let content = &content[1];
    let has_media = MEDIA_RE.is_match(content);
    let text = TEXT_NODE_RE
        .captures_iter(content)
        .map(|c| normalize(&c[1]))
        .find(|t| !t.is_empty() && !REACTION_PREFIXES.iter().any(|p| t.starts_with(p)))
        .or_else(|| has_media.then(|| "[Media file]".to_string()))?;

    let footer = FOOTER_TIME_RE.captures(section)?;
    let timestamp = parse_export_timestamp(&normalize(&footer[1]), basis);

    let media = if has_media { Media::Media } else { Media::None };
    Some(RawMessage::new(
        sender,
        timestamp,
        thread,
        nb_participants,
        media,
        text,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<h1>Book &amp; Wine</h1>
<h2>Participants: Ana, Ben, Cy</h2>
<section class="_a6-g"><h2 class="_2ph_">Ana</h2>
  <div class="_2ph_ _a6-p"><div><div></div><div>Hello there</div><div>❤ Ben</div></div></div>
  <footer class="_3-94"><div class="_a72d">Oct 25, 2022 10:03:52 am</div></footer>
</section>
<section class="_a6-g"><h2>Ben</h2>
  <div class="_2ph_ _a6-p"><div><img src="photos/1.jpg"/></div></div>
  <footer><div class="_a72d">2022-10-25 11:00:00</div></footer>
</section>
<section class="_a6-g"><h2>Group invite link</h2>
  <div class="_2ph_ _a6-p"><div>join here</div></div>
  <footer><div class="_a72d">2022-10-25 11:00:00</div></footer>
</section>
<section class="_a6-g"><h2>Cy</h2>
  <div class="_2ph_ _a6-p"><div>no footer</div></div>
</section>
</body></html>"#;

    #[test]
    fn test_parse_page() {
        let messages = parse(PAGE, TimeBasis::Utc);
        assert_eq!(messages.len(), 2);

        let first = &messages[0];
        assert_eq!(first.thread, "Book & Wine");
        assert_eq!(first.nb_participants, 3);
        assert_eq!(first.sender_name, "Ana");
        assert_eq!(first.message, "Hello there");
        assert_eq!(first.timestamp, 1_666_692_232.0);
        assert_eq!(first.media, Media::None);

        let second = &messages[1];
        assert_eq!(second.sender_name, "Ben");
        assert_eq!(second.message, "[Media file]");
        assert_eq!(second.media, Media::Media);
    }

    #[test]
    fn test_page_without_title() {
        let page = r#"<section class="_a6-g"><h2>Ana</h2><div class="_2ph_ _a6-p"><div>hi</div></div><footer><div class="_a72d">2022-10-25 11:00:00</div></footer></section>"#;
        let messages = parse(page, TimeBasis::Utc);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].thread, UNKNOWN_THREAD);
        assert_eq!(messages[0].nb_participants, 0);
    }

    #[test]
    fn test_full_month_footer() {
        let page = r#"<section class="_a6-g"><h2>Ana</h2><div class="_2ph_ _a6-p"><div>hi</div></div><footer><div class="_a72d">October 25, 2022 10:03:52 am</div></footer></section>"#;
        let messages = parse(page, TimeBasis::Utc);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].timestamp, 1_666_692_232.0);
    }

    #[test]
    fn test_unparseable_footer_keeps_message() {
        let page = r#"<section class="_a6-g"><h2>Ana</h2><div class="_2ph_ _a6-p"><div>hi</div></div><footer><div class="_a72d">sometime</div></footer></section>"#;
        let messages = parse(page, TimeBasis::Utc);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].timestamp > 1_666_692_232.0);
    }
}
