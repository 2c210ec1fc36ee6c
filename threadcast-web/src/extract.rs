//! HTML extraction: title and readable text.
//!
//! Title preference: `og:title` meta, `<title>`, then the first `<h1>`. Body
//! text comes from the first recognised content container (`article`, `main`,
//! ...) and falls back to the whole document. Only paragraph, heading and
//! list-item text is kept, so scripts and styles drop out. A block nested in
//! another block (`<li><p>`) is emitted once, as part of its outermost block.

use scraper::{ElementRef, Html, Selector};

use crate::Article;

const CONTENT_CONTAINERS: [&str; 5] = ["article", "main", "[role='main']", ".content", "#content"];
const TEXT_BLOCKS: &str = "p, h1, h2, h3, h4, h5, h6, li";

pub fn extract_article(url: &str, html: &str) -> Article {
    let document = Html::parse_document(html);
    Article {
        url: url.to_string(),
        title: extract_title(&document).unwrap_or_default(),
        body: extract_text(&document),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract_title(document: &Html) -> Option<String> {
    if let Some(og) = selector("meta[property='og:title']") {
        let found = document
            .select(&og)
            .filter_map(|el| el.value().attr("content"))
            .map(collapse)
            .find(|t| !t.is_empty());
        if found.is_some() {
            return found;
        }
    }

    ["title", "h1"].iter().find_map(|css| {
        let sel = selector(css)?;
        document
            .select(&sel)
            .next()
            .map(|el| collapse(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    })
}

pub fn extract_text(document: &Html) -> String {
    for css in CONTENT_CONTAINERS {
        let Some(sel) = selector(css) else { continue };
        if let Some(container) = document.select(&sel).next() {
            let text = text_blocks(container);
            if !text.is_empty() {
                return text;
            }
        }
    }

    text_blocks(document.root_element())
}

fn text_blocks(root: ElementRef<'_>) -> String {
    let Some(blocks) = selector(TEXT_BLOCKS) else {
        return String::new();
    };

    root.select(&blocks)
        .filter(|el| !inside_block(el, root, &blocks))
        .map(|el| collapse(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whether `el` has an ancestor below `root` that is itself a text block.
fn inside_block(el: &ElementRef<'_>, root: ElementRef<'_>, blocks: &Selector) -> bool {
    el.ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|ancestor| blocks.matches(&ancestor))
}
