//! RSS 2.0 + iTunes document rendering.
//!
//! The document is produced by plain string templating so the output is
//! byte-stable: header, one block per episode, footer. Channel fields come
//! pre-encoded from the settings loader; only episode titles are encoded here.

use crate::{
    config::PodcastInfo,
    library::FileEntry,
    utils::{date::DateTimeUtc, html},
};

/// MIME type announced for every enclosure.
pub const ENCLOSURE_TYPE: &str = "audio/mpeg";

/// Closing tags of the document.
pub const FOOTER: &str = "\t</channel>\n</rss>\n";

/// One episode ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub file: FileEntry,
    /// Title as read from tags, not yet encoded.
    pub title: String,
}

impl FeedItem {
    /// Enclosure URL, also used as the GUID.
    pub fn url(&self, url_prefix: &str) -> String {
        format!("{url_prefix}{}", self.file.name)
    }
}

/// Channel header up to and including the self link.
pub fn render_header(podcast: &PodcastInfo) -> String {
    let explicit = if podcast.explicit { "yes" } else { "no" };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss xmlns:itunes=\"http://www.itunes.com/dtds/podcast-1.0.dtd\" version=\"2.0\">\n\
         \t<channel>\n\
         \t\t<title>{title}</title>\n\
         \t\t<link>{link}</link>\n\
         \t\t<language>{language}</language>\n\
         \t\t<copyright>{copyright}</copyright>\n\
         \t\t<itunes:subtitle>{subtitle}</itunes:subtitle>\n\
         \t\t<itunes:author>{author}</itunes:author>\n\
         \t\t<itunes:summary>{summary}</itunes:summary>\n\
         \t\t<description>{summary}</description>\n\
         \t\t<itunes:explicit>{explicit}</itunes:explicit>\n\
         \t\t<itunes:owner>\n\
         \t\t\t<itunes:name>{title}</itunes:name>\n\
         \t\t\t<itunes:email>{email}</itunes:email>\n\
         \t\t</itunes:owner>\n\
         \t\t<itunes:image href=\"{artwork}\" />\n\
         \t\t<itunes:category text=\"{category}\">\n\
         \t\t\t<itunes:category text=\"{sub_category}\" />\n\
         \t\t</itunes:category>\n\
         \t\t<atom10:link xmlns:atom10=\"http://www.w3.org/2005/Atom\" rel=\"self\" type=\"application/rss+xml\" href=\"{rss_url}\" />\n",
        title = podcast.title,
        link = podcast.homepage,
        language = podcast.language,
        copyright = podcast.copyright,
        subtitle = podcast.subtitle,
        author = podcast.author,
        summary = podcast.summary,
        explicit = explicit,
        email = podcast.email,
        artwork = podcast.artwork_url,
        category = podcast.category,
        sub_category = podcast.sub_category,
        rss_url = podcast.rss_url,
    )
}

/// A single `<item>` block followed by a blank line.
///
/// `<itunes:subtitle>` and `<itunes:summary>` are always empty.
pub fn render_item(item: &FeedItem, url_prefix: &str) -> String {
    let url = item.url(url_prefix);
    format!(
        "<item>\n\
         \t<title>{title}</title>\n\
         \t<pubDate>{pub_date}</pubDate>\n\
         \t<guid isPermaLink=\"false\">{url}</guid>\n\
         \t<enclosure url=\"{url}\" length=\"{length}\" type=\"{mime}\" />\n\
         \t<itunes:subtitle></itunes:subtitle>\n\
         \t<itunes:summary></itunes:summary>\n\
         </item>\n\n",
        title = html::escape(&item.title),
        pub_date = DateTimeUtc::from_system_time(item.file.created).to_rfc2822(),
        url = url,
        length = item.file.len,
        mime = ENCLOSURE_TYPE,
    )
}

/// All item blocks in the given order.
pub fn render_items(items: &[FeedItem], url_prefix: &str) -> String {
    items
        .iter()
        .map(|item| render_item(item, url_prefix))
        .collect()
}

/// Concatenate header, items and footer.
pub fn render_document(podcast: &PodcastInfo, items: &[FeedItem], url_prefix: &str) -> String {
    let mut out = render_header(podcast);
    out.push_str(&render_items(items, url_prefix));
    out.push_str(FOOTER);
    out
}
