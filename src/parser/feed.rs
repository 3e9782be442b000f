//! Syndication feeds: RSS 2.0, RSS 1.0 (RDF) and Atom

use serde_json::Value;

use super::normalize::{
    attr, field, field_text, link_refs, one_or_many, parse_timestamp, select_links, text, texts,
    LinkRef,
};
use super::sanitize::{clean_text, html_to_text};
use super::RecordDraft;
use crate::models::RecordLinks;
use crate::utils::error::ParseError;

/// Items of any supported feed flavour
pub fn parse(doc: &Value) -> Result<Vec<RecordDraft>, ParseError> {
    if let Some(rss) = doc.get("rss") {
        let channel = rss
            .get("channel")
            .ok_or_else(|| ParseError::UnexpectedShape("<rss> without <channel>".to_string()))?;
        return Ok(one_or_many(channel.get("item"))
            .into_iter()
            .map(parse_rss_item)
            .collect());
    }

    if let Some(rdf) = doc.get("rdf:RDF") {
        // RSS 1.0 items are siblings of the channel
        return Ok(one_or_many(rdf.get("item"))
            .into_iter()
            .map(parse_rss_item)
            .collect());
    }

    if let Some(feed) = doc.get("feed") {
        return Ok(one_or_many(feed.get("entry"))
            .into_iter()
            .map(parse_atom_entry)
            .collect());
    }

    Err(ParseError::MissingRoot {
        expected: "rss, rdf:RDF or feed".to_string(),
    })
}

fn parse_rss_item(item: &Value) -> RecordDraft {
    let link = field_text(item, &["link"]);
    let guid = field_text(item, &["guid"]);

    let mut links = link
        .clone()
        .map(RecordLinks::primary)
        .unwrap_or_default();
    // a permalink guid is a usable link when <link> is missing
    if links.primary.is_empty() {
        if let Some(guid) = guid.as_deref().filter(|g| g.starts_with("http")) {
            links.primary = guid.to_string();
        }
    }
    if let Some(enclosure) = item.get("enclosure") {
        if let Some(url) = attr(enclosure, "url") {
            if attr(enclosure, "type") == Some("application/pdf") {
                links.pdf = Some(url.to_string());
            } else {
                links.alternates.push(url.to_string());
            }
        }
    }
    if let Some(comments) = field_text(item, &["comments"]) {
        links.alternates.push(comments);
    }

    let mut authors = texts(item.get("author"));
    authors.extend(texts(item.get("dc:creator")));

    RecordDraft {
        id: guid.or(link).or_else(|| item.get("@rdf:about").and_then(text)),
        title: clean_text(&field_text(item, &["title"]).unwrap_or_default()),
        summary: html_to_text(&field_text(item, &["description", "content:encoded"]).unwrap_or_default()),
        authors: authors.iter().map(|a| clean_text(a)).collect(),
        published_at: field_text(item, &["pubDate", "dc:date"]).and_then(|s| parse_timestamp(&s)),
        updated_at: field_text(item, &["atom:updated", "dcterms:modified"]).and_then(|s| parse_timestamp(&s)),
        tags: texts(item.get("category")).iter().map(|t| clean_text(t)).collect(),
        links,
    }
}

/// Atom text constructs are plain unless typed `html` or `xhtml`
fn atom_text(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let raw = text(value).unwrap_or_default();
    match attr(value, "type") {
        Some("html") | Some("xhtml") => html_to_text(&raw),
        _ => clean_text(&raw),
    }
}

fn parse_atom_entry(entry: &Value) -> RecordDraft {
    let links: Vec<LinkRef> = link_refs(entry.get("link"));

    let authors = one_or_many(entry.get("author"))
        .into_iter()
        .filter_map(|author| field_text(author, &["name"]).or_else(|| text(author)))
        .map(|name| clean_text(&name))
        .filter(|name| !name.is_empty())
        .collect();

    let tags = one_or_many(entry.get("category"))
        .into_iter()
        .filter_map(|c| attr(c, "term").map(str::to_string).or_else(|| text(c)))
        .collect();

    RecordDraft {
        id: field_text(entry, &["id"]),
        title: atom_text(entry.get("title")),
        summary: atom_text(field(entry, &["summary", "content"])),
        authors,
        published_at: field_text(entry, &["published", "issued"]).and_then(|s| parse_timestamp(&s)),
        updated_at: field_text(entry, &["updated", "modified"]).and_then(|s| parse_timestamp(&s)),
        tags,
        links: select_links(&links),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::xml::to_value;

    #[test]
    fn test_rss2_items() {
        let doc = to_value(
            r#"<rss version="2.0"><channel><title>Blog</title>
            <item>
              <title>First &amp;amp; best</title>
              <link>https://blog.example.org/1</link>
              <guid isPermaLink="true">https://blog.example.org/1</guid>
              <description>&lt;p&gt;Hello &lt;b&gt;world&lt;/b&gt;&lt;/p&gt;</description>
              <pubDate>Fri, 01 Mar 2024 12:00:00 GMT</pubDate>
              <category>rust</category><category>async</category>
              <dc:creator>Ann</dc:creator>
            </item>
            <item><title>Second</title><link>https://blog.example.org/2</link></item>
            </channel></rss>"#,
        )
        .unwrap();

        let drafts = parse(&doc).unwrap();
        assert_eq!(drafts.len(), 2);

        let first = &drafts[0];
        assert_eq!(first.id.as_deref(), Some("https://blog.example.org/1"));
        assert_eq!(first.title, "First & best");
        assert_eq!(first.summary, "Hello world");
        assert_eq!(first.authors, vec!["Ann"]);
        assert_eq!(first.tags, vec!["rust", "async"]);
        assert_eq!(first.links.primary, "https://blog.example.org/1");
        assert!(first.published_at.is_some());

        assert_eq!(drafts[1].summary, "");
        assert!(drafts[1].published_at.is_none());
    }

    #[test]
    fn test_rss_single_item_and_empty_channel() {
        let single = to_value("<rss><channel><item><title>Only</title></item></channel></rss>").unwrap();
        assert_eq!(parse(&single).unwrap().len(), 1);

        let empty = to_value("<rss><channel><title>Nothing</title></channel></rss>").unwrap();
        assert!(parse(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_rdf_items() {
        let doc = to_value(
            r#"<rdf:RDF><channel rdf:about="x"><title>c</title></channel>
            <item rdf:about="https://e.org/a"><title>A</title><link>https://e.org/a</link><dc:date>2024-02-02T00:00:00Z</dc:date></item>
            </rdf:RDF>"#,
        )
        .unwrap();

        let drafts = parse(&doc).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].links.primary, "https://e.org/a");
        assert!(drafts[0].published_at.is_some());
    }

    #[test]
    fn test_atom_entries() {
        let doc = to_value(
            r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry>
              <id>tag:example.org,2024:1</id>
              <title type="text">Atom &lt;entry&gt;</title>
              <summary type="html">&lt;p&gt;Short &amp;amp; sweet&lt;/p&gt;</summary>
              <link rel="alternate" href="https://example.org/1"/>
              <link rel="enclosure" type="application/pdf" href="https://example.org/1.pdf"/>
              <author><name>Bo</name></author>
              <category term="news"/>
              <updated>2024-03-01T12:00:00Z</updated>
            </entry>
            </feed>"#,
        )
        .unwrap();

        let drafts = parse(&doc).unwrap();
        assert_eq!(drafts.len(), 1);
        let entry = &drafts[0];
        assert_eq!(entry.title, "Atom <entry>");
        assert_eq!(entry.summary, "Short & sweet");
        assert_eq!(entry.links.primary, "https://example.org/1");
        assert_eq!(entry.links.pdf.as_deref(), Some("https://example.org/1.pdf"));
        assert_eq!(entry.tags, vec!["news"]);
        assert!(entry.published_at.is_none());
        assert!(entry.updated_at.is_some());
    }

    #[test]
    fn test_unknown_root() {
        let doc = to_value("<html><body/></html>").unwrap();
        assert!(matches!(parse(&doc), Err(ParseError::MissingRoot { .. })));
    }

    #[test]
    fn test_rss_without_channel() {
        let doc = to_value("<rss version=\"2.0\"/>").unwrap();
        assert!(matches!(parse(&doc), Err(ParseError::UnexpectedShape(_))));
    }
}
