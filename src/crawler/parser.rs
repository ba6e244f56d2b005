//! HTML parser for extracting links and leaf content
//!
//! Every scraper recognises its links with a fixed rule: a tag name, an
//! attribute predicate and sometimes a text predicate. This module holds the
//! rules, the extraction functions, and the few leaf-content readers
//! (headings, verses) the scrapers need.

use lazy_regex::regex_is_match;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// A URL or path fragment taken verbatim from an `href`
///
/// No structural validation is done; a malformed link only fails once it is
/// fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link(String);

impl Link {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last `/`-separated segment of the link
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl From<String> for Link {
    fn from(link: String) -> Self {
        Self(link)
    }
}

impl From<&str> for Link {
    fn from(link: &str) -> Self {
        Self(link.to_string())
    }
}

impl From<Link> for String {
    fn from(link: Link) -> Self {
        link.0
    }
}

impl AsRef<str> for Link {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed HTML document
///
/// Lives for one fetch-parse-extract cycle. The underlying tree is not
/// `Send`, so it must be dropped before the next network await.
pub struct ParsedPage {
    document: Html,
}

impl ParsedPage {
    /// Parses an HTML document; malformed markup is repaired, never rejected
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }
}

impl fmt::Debug for ParsedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedPage").finish_non_exhaustive()
    }
}

/// A fixed tag/attribute/text predicate selecting one category of link
#[derive(Debug, Clone, Copy)]
pub enum MatchRule {
    /// `<a href>` whose href starts with the prefix
    HrefPrefix(&'static str),

    /// `<a class=.. href>` whose href starts with the prefix
    ClassHrefPrefix {
        class: &'static str,
        prefix: &'static str,
    },

    /// `<a href>` whose text equals the literal exactly
    ExactText(&'static str),

    /// `<a href>` nested in a `container` element whose id starts with
    /// `id_prefix`, kept when its text satisfies `text`
    NestedText {
        container: &'static str,
        id_prefix: &'static str,
        text: fn(&str) -> bool,
    },

    /// `<a href>` whose href ends with the suffix
    HrefSuffix(&'static str),
}

impl MatchRule {
    /// Poet pages on the poetry archive
    pub const POETS: MatchRule = MatchRule::HrefPrefix("cat");

    /// Poem pages listed on a poet's page
    pub const POEMS: MatchRule = MatchRule::ClassHrefPrefix {
        class: "float-right",
        prefix: "poem",
    };

    /// Company pages on the annual reports listing
    pub const COMPANIES: MatchRule = MatchRule::ExactText("all annual reports");

    /// Yearly report documents on a company page
    pub const YEARLY_REPORTS: MatchRule = MatchRule::NestedText {
        container: "article",
        id_prefix: "post2",
        text: has_year,
    };

    /// Any PDF document
    pub const PDF: MatchRule = MatchRule::HrefSuffix(".pdf");
}

/// Checks whether a string contains a year, i.e. a run of 4 digits
///
/// # Example
///
/// ```
/// use site_scrapers::crawler::has_year;
///
/// assert!(has_year("Report 2020 Summary"));
/// assert!(!has_year("Report"));
/// ```
pub fn has_year(text: &str) -> bool {
    regex_is_match!(r"[0-9]{4}", text)
}

/// Extracts matching links in document order, duplicates included
///
/// # Arguments
///
/// * `page` - The parsed page
/// * `rule` - Which links to keep
///
/// # Returns
///
/// The matching hrefs; an empty vector when nothing matches
pub fn extract_links(page: &ParsedPage, rule: &MatchRule) -> Vec<Link> {
    let document = page.document();

    match *rule {
        MatchRule::HrefPrefix(prefix) => select_hrefs(document, "a[href]", |href, _| {
            href.starts_with(prefix)
        }),
        MatchRule::ClassHrefPrefix { class, prefix } => {
            select_hrefs(document, &format!("a.{}[href]", class), |href, _| {
                href.starts_with(prefix)
            })
        }
        MatchRule::ExactText(literal) => select_hrefs(document, "a[href]", |_, element| {
            element_text(element) == literal
        }),
        MatchRule::NestedText {
            container,
            id_prefix,
            text,
        } => {
            let (Ok(container_selector), Ok(a_selector)) = (
                Selector::parse(&format!(r#"{}[id^="{}"]"#, container, id_prefix)),
                Selector::parse("a[href]"),
            ) else {
                return Vec::new();
            };

            document
                .select(&container_selector)
                .flat_map(|article| article.select(&a_selector))
                .filter(|element| text(&element_text(*element)))
                .filter_map(|element| element.value().attr("href"))
                .map(Link::from)
                .collect()
        }
        MatchRule::HrefSuffix(suffix) => select_hrefs(document, "a[href]", |href, _| {
            href.ends_with(suffix)
        }),
    }
}

/// Extracts matching links as a deduplicated set
pub fn extract_link_set(page: &ParsedPage, rule: &MatchRule) -> BTreeSet<Link> {
    extract_links(page, rule).into_iter().collect()
}

/// Returns the trimmed text of the first element matching `selector`
pub fn first_text(page: &ParsedPage, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    page.document()
        .select(&selector)
        .next()
        .map(|element| element_text(element).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts poem verses: every `h3` inside the first `div#poem_content`
///
/// A page without the container yields no verses.
pub fn extract_verses(page: &ParsedPage) -> Vec<String> {
    let (Ok(content_selector), Ok(verse_selector)) =
        (Selector::parse("div#poem_content"), Selector::parse("h3"))
    else {
        return Vec::new();
    };

    let Some(content) = page.document().select(&content_selector).next() else {
        return Vec::new();
    };

    content
        .select(&verse_selector)
        .map(|verse| element_text(verse).trim().to_string())
        .collect()
}

/// Resolves a link against the page it was found on
///
/// Absolute links come back unchanged. If either side cannot be parsed the
/// raw href is returned and the failure surfaces when it is fetched.
pub fn resolve_link(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

fn select_hrefs<F>(document: &Html, selector: &str, keep: F) -> Vec<Link>
where
    F: Fn(&str, ElementRef<'_>) -> bool,
{
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            keep(href, element).then(|| Link::from(href))
        })
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
