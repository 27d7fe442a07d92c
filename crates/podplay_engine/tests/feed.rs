use chrono::{DateTime, TimeZone, Utc};
use podplay_engine::{
    assemble, normalize_date, normalize_date_with, parse_feed, FailureKind, FeedError, FetchError,
    FetchMetadata, FetchOutput,
};
use pretty_assertions::assert_eq;

const FEED_URL: &str = "https://feeds.example.com/show.xml";

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap()
}

fn rss(channel_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>{channel_body}</channel>
</rss>"#
    )
}

fn fetched(body: &str) -> Result<FetchOutput, FetchError> {
    Ok(FetchOutput {
        bytes: body.as_bytes().to_vec(),
        metadata: FetchMetadata {
            original_url: FEED_URL.to_string(),
            final_url: FEED_URL.to_string(),
            redirect_count: 0,
            content_type: Some("application/rss+xml".to_string()),
            byte_len: body.len() as u64,
        },
    })
}

#[test]
fn parses_channel_and_episode_fields() {
    let doc = rss(
        r#"
    <title>Deep Dives</title>
    <description>Long talks</description>
    <itunes:summary>Ignored downstream</itunes:summary>
    <pubDate>Wed, 02 Oct 2024 10:00:00 GMT</pubDate>
    <item>
      <title>Episode One</title>
      <description>First</description>
      <itunes:duration>01:02:03</itunes:duration>
      <guid>ep-1</guid>
      <pubDate>Tue, 01 Oct 2024 08:30:00 GMT</pubDate>
      <link>https://example.com/1</link>
      <enclosure url="https://cdn.example.com/1.mp3" type="audio/mpeg" length="123"/>
    </item>"#,
    );

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(podcast.feed_url, FEED_URL);
    assert_eq!(podcast.title, "Deep Dives");
    assert_eq!(podcast.description, "Long talks");
    assert_eq!(podcast.image_url, "");
    assert_eq!(
        podcast.last_updated,
        Utc.with_ymd_and_hms(2024, 10, 2, 10, 0, 0).unwrap()
    );
    assert_eq!(podcast.episodes.len(), 1);

    let episode = &podcast.episodes[0];
    assert_eq!(episode.title, "Episode One");
    assert_eq!(episode.description, "First");
    assert_eq!(episode.duration_text, "01:02:03");
    assert_eq!(episode.guid, "ep-1");
    assert_eq!(episode.media_url, "https://cdn.example.com/1.mp3");
    assert_eq!(episode.mime_type, "audio/mpeg");
    assert_eq!(
        episode.released,
        Utc.with_ymd_and_hms(2024, 10, 1, 8, 30, 0).unwrap()
    );
}

#[test]
fn undeclared_namespace_prefix_is_accepted() {
    let body = r#"<rss><channel><title>T</title><item><title>a</title><itunes:duration>10:00</itunes:duration><enclosure url="https://x/a.mp3" type="audio/mpeg"/></item></channel></rss>"#;

    let podcast = parse_feed(FEED_URL, body.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(podcast.title, "T");
    assert_eq!(podcast.episodes.len(), 1);
    let episode = &podcast.episodes[0];
    assert_eq!(episode.title, "a");
    assert_eq!(episode.duration_text, "10:00");
    assert_eq!(episode.media_url, "https://x/a.mp3");
    assert_eq!(episode.mime_type, "audio/mpeg");
    assert!(assemble(FEED_URL, fetched(body), &fixed_now).is_some());
}

#[test]
fn nested_field_inside_item_is_not_attributed() {
    let doc = rss("<item><foo><title>X</title></foo></item>");

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(podcast.episodes.len(), 1);
    assert_eq!(podcast.episodes[0].title, "");
    assert_eq!(podcast.title, "");
}

#[test]
fn episode_count_matches_items_directly_under_channel() {
    let doc = rss(
        "<item><title>a</title></item>\
         <item/>\
         <wrapper><item><title>not counted</title></item></wrapper>\
         <item><title>c</title></item>",
    );

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    let titles: Vec<&str> = podcast
        .episodes
        .iter()
        .map(|episode| episode.title.as_str())
        .collect();
    assert_eq!(titles, vec!["a", "", "c"]);
}

#[test]
fn empty_item_yields_default_episode() {
    let doc = rss("<item></item>");

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    let episode = &podcast.episodes[0];
    assert_eq!(episode.guid, "");
    assert_eq!(episode.title, "");
    assert_eq!(episode.description, "");
    assert_eq!(episode.media_url, "");
    assert_eq!(episode.mime_type, "");
    assert_eq!(episode.duration_text, "");
    assert_eq!(episode.released, fixed_now());
    assert!(!episode.is_playable());
}

#[test]
fn repeated_field_keeps_last_value() {
    let doc = rss("<item><title>first</title><title>second</title></item>");

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(podcast.episodes[0].title, "second");
}

#[test]
fn field_text_includes_inline_markup() {
    let doc = rss("<item><description>Hello<b>World</b><![CDATA[<i>!</i>]]></description></item>");

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(podcast.episodes[0].description, "HelloWorld<i>!</i>");
}

#[test]
fn missing_dates_fall_back_to_clock() {
    let doc = rss("<item><pubDate>sometime last week</pubDate></item>");

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(podcast.last_updated, fixed_now());
    assert_eq!(podcast.episodes[0].released, fixed_now());
}

#[test]
fn first_playable_skips_blank_enclosures() {
    let doc = rss(
        r#"<item><enclosure url="  " type="audio/mpeg"/></item>
           <item><title>no enclosure</title></item>
           <item><enclosure url=" https://cdn.example.com/3.mp3 " type="audio/mpeg"/></item>"#,
    );

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(
        podcast.first_playable_media(),
        Some("https://cdn.example.com/3.mp3")
    );
}

#[test]
fn no_playable_episode_when_all_enclosures_blank() {
    let doc = rss(r#"<item><title>a</title></item><item><enclosure url="" type=""/></item>"#);

    let podcast = parse_feed(FEED_URL, doc.as_bytes(), &fixed_now).expect("parses");

    assert_eq!(podcast.first_playable_media(), None);
}

#[test]
fn blank_payload_is_rejected() {
    assert_eq!(
        parse_feed(FEED_URL, b"  \n\t ", &fixed_now),
        Err(FeedError::Empty)
    );
    assert_eq!(assemble(FEED_URL, fetched(""), &fixed_now), None);
}

#[test]
fn malformed_markup_is_rejected() {
    let body = "<rss><channel><item></channel>";
    assert!(matches!(
        parse_feed(FEED_URL, body.as_bytes(), &fixed_now),
        Err(FeedError::Malformed(_))
    ));
    assert_eq!(assemble(FEED_URL, fetched(body), &fixed_now), None);
}

#[test]
fn fetch_failure_collapses_to_none() {
    let failure = Err(FetchError::new(FailureKind::HttpStatus(500), "boom"));
    assert_eq!(assemble(FEED_URL, failure, &fixed_now), None);
}

#[test]
fn assemble_keeps_caller_identifier() {
    let doc = rss("<link>https://elsewhere.example.com/feed</link><item/>");

    let podcast = assemble(FEED_URL, fetched(&doc), &fixed_now).expect("assembled");

    assert_eq!(podcast.feed_url, FEED_URL);
    assert_eq!(podcast.episodes.len(), 1);
}

#[test]
fn date_normalizer_parses_rfc822_and_falls_back() {
    assert_eq!(
        normalize_date(Some("Wed, 02 Oct 2024 10:00:00 GMT")),
        Utc.with_ymd_and_hms(2024, 10, 2, 10, 0, 0).unwrap()
    );
    assert_eq!(normalize_date_with(None, &fixed_now), fixed_now());
    assert_eq!(normalize_date_with(Some(""), &fixed_now), fixed_now());
    assert_eq!(
        normalize_date_with(Some("not a date"), &fixed_now),
        fixed_now()
    );

    let before = Utc::now();
    let fallback = normalize_date(Some("not a date"));
    assert!(fallback >= before);
}
