//! Sitemap XML reading and writing.
//!
//! Uses `quick-xml`'s event Reader for parsing and Writer for generation.

use crate::merge::SitemapEntry;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::HashMap;
use std::io::Cursor;
use storyloom_error::{SitemapError, SitemapErrorKind};
use tracing::warn;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Parse an existing sitemap into a URL → last-modified map.
///
/// Anything that fails to parse yields an empty map: a damaged document is
/// replaced wholesale on the next publish rather than aborting the run.
pub fn parse_document(xml: &str) -> HashMap<String, String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = HashMap::new();
    let mut in_loc = false;
    let mut in_lastmod = false;
    let mut loc: Option<String> = None;
    let mut lastmod: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"loc" => in_loc = true,
                b"lastmod" => in_lastmod = true,
                b"url" => {
                    loc = None;
                    lastmod = None;
                }
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                let Ok(text) = t.unescape() else {
                    warn!("Undecodable text in existing sitemap, starting fresh");
                    return HashMap::new();
                };
                if in_loc {
                    loc = Some(text.trim().to_string());
                } else if in_lastmod {
                    lastmod = Some(text.trim().to_string());
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"loc" => in_loc = false,
                b"lastmod" => in_lastmod = false,
                b"url" => {
                    if let (Some(l), Some(m)) = (loc.take(), lastmod.take()) {
                        entries.insert(l, m);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Malformed existing sitemap, starting fresh");
                return HashMap::new();
            }
        }
    }

    entries
}

fn xml_err(e: impl std::fmt::Display) -> SitemapError {
    SitemapError::new(SitemapErrorKind::Xml(e.to_string()))
}

/// Render entries as a sitemap document.
pub fn render_document(entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer
        .write_event(Event::Start(urlset))
        .map_err(xml_err)?;

    for entry in entries {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_err)?;

        writer
            .write_event(Event::Start(BytesStart::new("loc")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Text(BytesText::new(&entry.loc)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("loc")))
            .map_err(xml_err)?;

        writer
            .write_event(Event::Start(BytesStart::new("lastmod")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Text(BytesText::new(&entry.lastmod)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("lastmod")))
            .map_err(xml_err)?;

        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url>
                <loc>https://example.com/</loc>
                <lastmod>2026-08-06</lastmod>
              </url>
              <url>
                <loc>https://example.com/date/20260805</loc>
                <lastmod>2026-08-05</lastmod>
              </url>
            </urlset>"#;

        let entries = parse_document(xml);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries.get("https://example.com/date/20260805").unwrap(),
            "2026-08-05"
        );
    }

    #[test]
    fn test_parse_malformed_is_fresh_start() {
        assert!(parse_document("<urlset><url><loc>broken").is_empty());
        assert!(parse_document("not xml at all }{").is_empty());
        assert!(parse_document("").is_empty());
    }

    #[test]
    fn test_parse_skips_urls_without_lastmod() {
        let xml = r#"<urlset>
              <url><loc>https://example.com/a</loc></url>
              <url><loc>https://example.com/b</loc><lastmod>2026-01-01</lastmod></url>
            </urlset>"#;
        let entries = parse_document(xml);
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("https://example.com/b"));
    }

    #[test]
    fn test_render_has_namespace_and_order() {
        let entries = vec![
            SitemapEntry {
                loc: "https://example.com/".to_string(),
                lastmod: "2026-08-07".to_string(),
            },
            SitemapEntry {
                loc: "https://example.com/date/20260806".to_string(),
                lastmod: "2026-08-06".to_string(),
            },
        ];

        let xml = render_document(&entries).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(SITEMAP_NS));
        let home = xml.find("https://example.com/</loc>").unwrap();
        let dated = xml.find("https://example.com/date/20260806").unwrap();
        assert!(home < dated);

        // What we render, we can read back.
        let parsed = parse_document(&xml);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("https://example.com/").unwrap(), "2026-08-07");
    }
}
