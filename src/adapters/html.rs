//! HTML flattening for the page fetcher.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "svg", "template", "iframe"];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "tr", "td", "th",
    "table", "article", "section", "main", "header", "footer", "nav", "aside", "blockquote",
    "pre", "dt", "dd", "dl", "title", "hr",
];

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector"));

fn collect_text(element: &ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) => {
                let tag = el.name();
                if SKIP_TAGS.contains(&tag) {
                    continue;
                }
                let is_block = BLOCK_TAGS.contains(&tag);
                if is_block {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
                if is_block {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn flatten_lines(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Visible text of `document`, one non-empty trimmed line per text block.
fn visible_text(document: &Html) -> String {
    let mut buf = String::new();
    collect_text(&document.root_element(), &mut buf);
    flatten_lines(&buf)
}

/// Absolute URLs of links that look like a call-for-papers page.
fn cfp_links(document: &Html, base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let label = anchor
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if !label.contains("call for papers") && !href.to_lowercase().contains("cfp") {
            continue;
        }

        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);

        let resolved = resolved.to_string();
        if resolved != base.as_str() && seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }

    links
}

/// Flattens `html` into text and collects CFP links relative to `base`.
pub fn flatten_page(html: &str, base: &Url) -> (String, Vec<String>) {
    let document = Html::parse_document(html);
    (visible_text(&document), cfp_links(&document, base))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head><title>SOSP 2026</title><style>.x { color: red }</style></head>
<body>
  <nav><a href="/2026/cfp.html">Call for   Papers</a> | <a href="/venue">Venue</a></nav>
  <script>var deadline = "1 January 1999";</script>
  <h2>Important   Dates</h2>
  <ul>
    <li>Paper submission deadline: <b>April 17, 2026</b></li>
    <li>Conference dates: October 12-15, 2026</li>
  </ul>
  <p>The symposium will be held in Lisbon, Portugal.<br>See you there.</p>
  <a href="https://cfp.example.org/sosp#top">Submit</a>
  <a href="mailto:cfp@example.org">Mail</a>
</body></html>"#;

    #[test]
    fn test_visible_text_is_line_per_block() {
        let base = Url::parse("https://sosp.org/").unwrap();
        let (text, _) = flatten_page(PAGE, &base);

        assert!(text.contains("Paper submission deadline: April 17, 2026"));
        assert!(text.contains("Conference dates: October 12-15, 2026"));
        assert!(text.contains("\nSee you there."));
        assert!(text.contains("Important Dates"));
        assert!(!text.contains("1 January 1999"));
        assert!(!text.contains("color: red"));
        assert!(text.lines().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_cfp_links_resolved_and_filtered() {
        let base = Url::parse("https://sosp.org/").unwrap();
        let (_, links) = flatten_page(PAGE, &base);

        assert_eq!(
            links,
            vec![
                "https://sosp.org/2026/cfp.html".to_string(),
                "https://cfp.example.org/sosp".to_string(),
            ]
        );
    }
}
