use std::borrow::Borrow;
use std::io;
use std::io::ErrorKind;

use chrono::{DateTime, Utc};
use spdlog::info;

use crate::config::{Config, Site};
use crate::content::content_store::ContentStore;
use crate::content::PostRecord;
use crate::excerpt::{process_posts_excerpts, PostWithExcerpt};
use crate::slug::derive_post_url;
use crate::view::rss_renderer::RssChannel;

pub const DEFAULT_FEED_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub pub_date: DateTime<Utc>,
    /// Site relative, `/blog/<slug>`
    pub link: String,
    /// Rendered excerpt, may be empty
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub title: String,
    pub description: String,
    pub site: String,
}

impl From<&Site> for Channel {
    fn from(site: &Site) -> Self {
        Channel {
            title: site.title.clone(),
            description: site.description.clone(),
            site: site.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub channel: Channel,
    pub items: Vec<FeedItem>,
}

impl Feed {
    pub fn to_xml(&self) -> io::Result<Vec<u8>> {
        let rss = RssChannel {
            ch_title: &self.channel.title,
            ch_link: &self.channel.site,
            ch_desc: &self.channel.description,
        };

        match rss.render(&self.items) {
            Ok(xml) => Ok(xml),
            Err(e) => Err(io::Error::new(ErrorKind::Other, format!("Error writing rss feed: {}", e))),
        }
    }
}

fn post_date<P: Borrow<PostRecord>>(post: &P) -> DateTime<Utc> {
    let post: &PostRecord = post.borrow();
    post.data.date
}

/// Most recent posts first, at most `limit` of them. Posts with the same date
/// keep their input order. The input is left untouched.
pub fn select_recent<P>(posts: &[P], limit: usize) -> Vec<P>
where
    P: Borrow<PostRecord> + Clone,
{
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| post_date(b).cmp(&post_date(a)));
    sorted.truncate(limit);
    sorted
}

pub fn to_feed_items(posts: &[PostWithExcerpt]) -> Vec<FeedItem> {
    posts.iter()
        .map(|post| FeedItem {
            title: post.data.title.clone(),
            pub_date: post.data.date,
            link: derive_post_url(post.id.as_str()),
            content: post.excerpt_html.clone(),
        })
        .collect()
}

pub async fn build_feed(store: &dyn ContentStore, channel: &Channel, collection: &str, limit: usize) -> io::Result<Feed> {
    let posts = store.get_all_posts(collection)?;
    let post_count = posts.len();

    let recent = select_recent(&posts, limit);
    let with_excerpts = process_posts_excerpts(recent).await?;
    let items = to_feed_items(&with_excerpts);

    info!("Feed built with {} items out of {} posts in {}", items.len(), post_count, collection);

    Ok(Feed {
        channel: channel.clone(),
        items,
    })
}

/// Builds the feed for the configured site and serializes it as RSS.
pub async fn render_feed_xml(config: &Config, store: &dyn ContentStore) -> io::Result<Vec<u8>> {
    let channel = Channel::from(&config.site);
    let feed = build_feed(store, &channel, &config.feed.collection, config.feed.item_limit).await?;
    feed.to_xml()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use futures::executor::block_on;

    use crate::content::content_store::{StaticContentStore, BLOG_COLLECTION};
    use crate::content::PostMeta;

    use super::*;

    fn date(ymd: &str) -> DateTime<Utc> {
        let date = NaiveDate::parse_from_str(ymd, "%Y-%m-%d").unwrap();
        date.and_hms_opt(0, 0, 0).unwrap().and_utc()
    }

    fn mock_post(id: &str, title: &str, ymd: &str) -> PostRecord {
        PostRecord::new(id, BLOG_COLLECTION, "Post body content", PostMeta::new(title, date(ymd)))
    }

    fn mock_post_with_excerpt(id: &str, title: &str, ymd: &str, excerpt_html: &str) -> PostWithExcerpt {
        PostWithExcerpt {
            post: mock_post(id, title, ymd),
            excerpt: "Test excerpt".to_string(),
            excerpt_html: excerpt_html.to_string(),
            has_more: true,
        }
    }

    fn fifteen_posts() -> Vec<PostRecord> {
        (1..=15)
            .map(|i| {
                let ymd = format!("2024-01-{:02}", i);
                mock_post(&format!("{}-post.md", ymd), &format!("Post {}", i), &ymd)
            })
            .collect()
    }

    fn channel() -> Channel {
        Channel {
            title: "Test Site".to_string(),
            description: "Test Description".to_string(),
            site: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_select_recent_sorts_by_date() {
        let posts = vec![
            mock_post("2024-01-01-old-post.md", "Old Post", "2024-01-01"),
            mock_post("2024-03-01-newest-post.md", "Newest Post", "2024-03-01"),
            mock_post("2024-02-01-middle-post.md", "Middle Post", "2024-02-01"),
        ];

        let result = select_recent(&posts, DEFAULT_FEED_LIMIT);
        let titles: Vec<&str> = result.iter().map(|p| p.data.title.as_str()).collect();
        assert_eq!(titles, ["Newest Post", "Middle Post", "Old Post"]);
    }

    #[test]
    fn test_select_recent_limits() {
        let posts = fifteen_posts();
        assert_eq!(select_recent(&posts, DEFAULT_FEED_LIMIT).len(), 10);
        assert_eq!(select_recent(&posts, 5).len(), 5);
        assert_eq!(select_recent(&posts, 0).len(), 0);
        assert_eq!(select_recent(&posts[..2], 10).len(), 2);

        let empty: Vec<PostRecord> = vec![];
        assert!(select_recent(&empty, 0).is_empty());
        assert!(select_recent(&empty, 10).is_empty());
    }

    #[test]
    fn test_select_recent_keeps_latest() {
        let result = select_recent(&fifteen_posts(), DEFAULT_FEED_LIMIT);
        let titles: Vec<String> = result.iter().map(|p| p.data.title.clone()).collect();
        let expected: Vec<String> = (6..=15).rev().map(|i| format!("Post {}", i)).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_select_recent_ties_keep_input_order() {
        let posts = vec![
            mock_post("2024-01-01-a.md", "A", "2024-01-01"),
            mock_post("2024-01-01-b.md", "B", "2024-01-01"),
            mock_post("2024-02-01-c.md", "C", "2024-02-01"),
            mock_post("2024-01-01-d.md", "D", "2024-01-01"),
        ];

        let result = select_recent(&posts, DEFAULT_FEED_LIMIT);
        let titles: Vec<&str> = result.iter().map(|p| p.data.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B", "D"]);
    }

    #[test]
    fn test_select_recent_does_not_mutate_input() {
        let posts = vec![
            mock_post("2024-01-01-old-post.md", "Old Post", "2024-01-01"),
            mock_post("2024-03-01-newest-post.md", "Newest Post", "2024-03-01"),
        ];
        let original = posts.clone();

        let _ = select_recent(&posts, DEFAULT_FEED_LIMIT);
        assert_eq!(posts, original);
    }

    #[test]
    fn test_select_recent_with_excerpts() {
        let posts = vec![
            mock_post_with_excerpt("2024-01-10-second-post.md", "Second Post", "2024-01-10", ""),
            mock_post_with_excerpt("2024-01-15-first-post.md", "First Post", "2024-01-15", ""),
        ];
        let result = select_recent(&posts, 1);
        assert_eq!(result[0].data.title, "First Post");
    }

    #[test]
    fn test_to_feed_items() {
        let posts = vec![
            mock_post_with_excerpt("2024-01-15-first-post.md", "First Post", "2024-01-15", "<p>First excerpt</p>"),
            mock_post_with_excerpt("2024-01-10-second-post.md", "Second Post", "2024-01-10", "<p>Second excerpt</p>"),
        ];

        let result = to_feed_items(&posts);
        assert_eq!(result, vec![
            FeedItem {
                title: "First Post".to_string(),
                pub_date: date("2024-01-15"),
                link: "/blog/first-post".to_string(),
                content: "<p>First excerpt</p>".to_string(),
            },
            FeedItem {
                title: "Second Post".to_string(),
                pub_date: date("2024-01-10"),
                link: "/blog/second-post".to_string(),
                content: "<p>Second excerpt</p>".to_string(),
            },
        ]);
    }

    #[test]
    fn test_to_feed_items_keeps_posts_without_excerpt() {
        let posts = vec![mock_post_with_excerpt("2024-01-01-test-post.md", "Test Post", "2024-01-01", "")];
        let result = to_feed_items(&posts);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, "");
        assert_eq!(result[0].link, "/blog/test-post");

        assert!(to_feed_items(&[]).is_empty());
    }

    #[test]
    fn test_to_feed_items_keeps_exact_date() {
        let mut post = mock_post_with_excerpt("2024-06-15-dated-post.md", "Dated Post", "2024-06-15", "");
        let exact = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
        post.post.data.date = exact;
        assert_eq!(to_feed_items(&[post])[0].pub_date, exact);
    }

    #[test]
    fn test_build_feed_orders_and_links() {
        let store = StaticContentStore::new(vec![
            mock_post("2024-01-01-old.md", "2024-01-01-old", "2024-01-01"),
            mock_post("2024-03-01-new.md", "2024-03-01-new", "2024-03-01"),
        ]);

        let feed = block_on(build_feed(&store, &channel(), BLOG_COLLECTION, DEFAULT_FEED_LIMIT)).unwrap();
        assert_eq!(feed.channel, channel());

        let titles: Vec<&str> = feed.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["2024-03-01-new", "2024-01-01-old"]);
        let links: Vec<&str> = feed.items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, ["/blog/new", "/blog/old"]);
    }

    #[test]
    fn test_build_feed_renders_excerpts() {
        let mut post = mock_post("2024-01-01-test-post.md", "Test Post", "2024-01-01");
        post.body = "**Bold**<!--more-->rest".to_string();
        let store = StaticContentStore::new(vec![post]);

        let feed = block_on(build_feed(&store, &channel(), BLOG_COLLECTION, DEFAULT_FEED_LIMIT)).unwrap();
        assert!(feed.items[0].content.contains("<strong>Bold</strong>"));
        assert!(!feed.items[0].content.contains("rest"));
    }

    #[test]
    fn test_build_feed_limits_to_latest() {
        let store = StaticContentStore::new(fifteen_posts());
        let feed = block_on(build_feed(&store, &channel(), BLOG_COLLECTION, DEFAULT_FEED_LIMIT)).unwrap();

        assert_eq!(feed.items.len(), 10);
        assert_eq!(feed.items[0].link, "/blog/post");
        assert_eq!(feed.items[0].pub_date, date("2024-01-15"));
        assert_eq!(feed.items[9].pub_date, date("2024-01-06"));
    }

    #[test]
    fn test_build_feed_empty_collection() {
        let store = StaticContentStore::default();
        let feed = block_on(build_feed(&store, &channel(), BLOG_COLLECTION, DEFAULT_FEED_LIMIT)).unwrap();
        assert!(feed.items.is_empty());
        assert_eq!(feed.channel.title, "Test Site");

        let xml = String::from_utf8(feed.to_xml().unwrap()).unwrap();
        assert!(xml.contains("<title>Test Site</title>"));
        assert!(!xml.contains("<item>"));
    }

    struct FailingStore;

    impl ContentStore for FailingStore {
        fn get_all_posts(&self, _collection: &str) -> io::Result<Vec<PostRecord>> {
            Err(io::Error::new(ErrorKind::NotFound, "no content"))
        }
    }

    #[test]
    fn test_build_feed_propagates_store_errors() {
        let err = block_on(build_feed(&FailingStore, &channel(), BLOG_COLLECTION, DEFAULT_FEED_LIMIT)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "no content");
    }
}
