use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::feed::FeedItem;

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
<channel>
  <title>Trey Mack</title>
  <link>https://www.treymack.com</link>
  <description>Full-stack engineer and tech lead</description>
  <item>
    <title>Get-ADObject with PSCX: MemberOf</title>
    <link>https://www.treymack.com/blog/get-adobject-pscx-memberof</link>
    <guid isPermaLink="true">https://www.treymack.com/blog/get-adobject-pscx-memberof</guid>
    <pubDate>Fri, 30 Jun 2017 00:00:00 +0000</pubDate>
    <content:encoded><![CDATA[<p>Finding the groups a user belongs to</p>]]></content:encoded>
  </item>
</channel>
</rss>
*/

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
}

impl<'a> RssChannel<'a> {
    pub fn render(&self, items: &[FeedItem]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:content", CONTENT_NS));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;
        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;

        for item in items {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", &item.title)?;

            let link = full_link(self.ch_link, &item.link);
            push_text(&mut writer, "link", &link)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid))?;
            writer.write_event(Event::Text(BytesText::new(&link)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            // <pubDate>Wed, 20 Apr 2022 16:00:00 +0000</pubDate>
            push_text(&mut writer, "pubDate", &item.pub_date.to_rfc2822())?;

            if !item.content.is_empty() {
                push_cdata(&mut writer, "content:encoded", &item.content)?;
            }

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

/// Joins a site relative link to the site url. Absolute links are kept.
fn full_link(base_url: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }

    let base_url = base_url.trim_end_matches('/');
    let link = link.trim_start_matches('/');
    format!("{}/{}", base_url, link)
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    // A CDATA section cannot hold "]]>", so it is split in two sections
    let text = text.replace("]]>", "]]]]><![CDATA[>");
    writer.write_event(Event::CData(BytesCData::new(text.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
