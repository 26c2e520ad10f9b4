//! HTML content extraction
//!
//! This module handles parsing HTML content to extract:
//! - Heading and paragraph text (with navigation, scripts and other noise removed)
//! - Links to PDF documents and images
//! - Anchor targets for the next crawl hop

use crate::url::{media_name, resolve_href, strip_fragment};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Tags whose contents never count as page text
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "noscript", "form", "aside",
];

/// Image extensions collected as media links
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

const DOCUMENT_EXTENSION: &str = ".pdf";

const DOCUMENT_FALLBACK_NAME: &str = "document";
const IMAGE_FALLBACK_NAME: &str = "image";

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3").expect("hardcoded selector is valid"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("hardcoded selector is valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("hardcoded selector is valid"));
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("hardcoded selector is valid"));

/// A named link to a document or image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    /// Last path segment of the resolved URL
    pub name: String,

    /// Absolute URL
    pub url: String,
}

impl MediaLink {
    fn from_url(url: &Url, fallback: &str) -> Self {
        Self {
            name: media_name(url, fallback),
            url: url.to_string(),
        }
    }
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Heading text followed by paragraph text, newline-joined
    pub text: String,

    /// Linked PDF documents (absolute URLs)
    pub pdfs: Vec<MediaLink>,

    /// Embedded images (absolute URLs)
    pub images: Vec<MediaLink>,

    /// Every resolvable anchor target, fragment removed
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts text, media and links
///
/// # Text Extraction Rules
///
/// - Content inside `script, style, nav, header, footer, noscript, form, aside`
///   is ignored
/// - Every `h1`/`h2`/`h3` contributes its trimmed text, in document order
/// - Every `p` whose text has more than `min_paragraph_words` words follows
///
/// Media and anchors are collected from the whole document, noise included,
/// so navigation menus still feed the frontier.
///
/// # Example
///
/// ```
/// use sumi_corpus::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Title</h1><a href="report.pdf">Report</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, 5);
/// assert_eq!(parsed.text, "Title");
/// assert_eq!(parsed.pdfs[0].name, "report.pdf");
/// ```
pub fn parse_html(html: &str, base_url: &Url, min_paragraph_words: usize) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: extract_text(&document, min_paragraph_words),
        pdfs: extract_pdfs(&document, base_url),
        images: extract_images(&document, base_url),
        links: extract_links(&document, base_url),
    }
}

/// Extracts heading text then qualifying paragraph text
fn extract_text(document: &Html, min_paragraph_words: usize) -> String {
    let mut parts = Vec::new();

    for heading in document.select(&HEADING_SELECTOR) {
        if inside_noise(&heading) {
            continue;
        }

        let text = visible_text(heading);
        let text = text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
    }

    for paragraph in document.select(&PARAGRAPH_SELECTOR) {
        if inside_noise(&paragraph) {
            continue;
        }

        let text = visible_text(paragraph);
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > min_paragraph_words {
            parts.push(words.join(" "));
        }
    }

    parts.join("\n")
}

/// Collects PDF links from anchors
fn extract_pdfs(document: &Html, base_url: &Url) -> Vec<MediaLink> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| ends_with_any(href, &[DOCUMENT_EXTENSION]))
        .filter_map(|href| resolve_href(href, base_url))
        .map(|url| MediaLink::from_url(&url, DOCUMENT_FALLBACK_NAME))
        .collect()
}

/// Collects image links from `<img src>`
fn extract_images(document: &Html, base_url: &Url) -> Vec<MediaLink> {
    document
        .select(&IMAGE_SELECTOR)
        .filter_map(|element| element.value().attr("src"))
        .filter(|src| ends_with_any(src, IMAGE_EXTENSIONS))
        .filter_map(|src| resolve_href(src, base_url))
        .map(|url| MediaLink::from_url(&url, IMAGE_FALLBACK_NAME))
        .collect()
}

/// Resolves every anchor on the page
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(href, base_url))
        .map(strip_fragment)
        .collect()
}

fn ends_with_any(value: &str, extensions: &[&str]) -> bool {
    let lowered = value.trim().to_lowercase();
    extensions.iter().any(|ext| lowered.ends_with(ext))
}

fn is_noise(element: &ElementRef) -> bool {
    NOISE_TAGS.contains(&element.value().name())
}

/// Returns true if any ancestor of the element is a noise tag
fn inside_noise(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_noise(&ancestor))
}

/// Concatenates descendant text, skipping noise subtrees
fn visible_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !is_noise(&child_element) {
                collect_text(child_element, out);
            }
        }
    }
}
