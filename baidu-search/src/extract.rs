//! Result extraction from one result page's HTML.
//!
//! The engine renders several historically distinct layouts (plain
//! results, "op" rich results, "tts" voice/QA results, game listings), so
//! every field is located through an ordered list of selector strategies.
//! For single-valued fields the first strategy that matches wins, even if
//! a later strategy would match an element earlier in the document.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::SearchError;
use crate::types::PartialRecord;

/// Container markers, matched in document order.
const CONTAINER_CLASSES: &[&str] = &["result", "result-op", "result-tts", "result-game-item"];

/// Title markers on `h3`/`div`, in priority order.
const TITLE_CLASSES: &[&str] = &["t", "result-title", "result-op-title", "tts-title", "c-title"];

/// Source/attribution markers on `span`/`div`, in priority order.
const SOURCE_CLASSES: &[&str] = &["c-showurl", "result-op-source", "tts-source"];

/// Summary markers on `div`/`p`. Every match contributes to `content`.
const CONTENT_CLASSES: &[&str] = &[
    "c-abstract",
    "content",
    "op_exactqa_s_answer",
    "c-span-last",
    "result-game-desc",
    "tts-content",
];

/// One way of locating an element inside a result container.
#[derive(Debug)]
struct Strategy {
    marker: &'static str,
    selector: Selector,
}

impl Strategy {
    fn new(tags: &[&str], marker: &'static str) -> Result<Self, SearchError> {
        let css = tags
            .iter()
            .map(|tag| format!("{tag}.{marker}"))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Self {
            marker,
            selector: compile(&css)?,
        })
    }

    fn apply<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        node.select(&self.selector).next()
    }
}

/// Try strategies in order; the first one that finds anything wins.
fn first_match<'a>(
    strategies: &[Strategy],
    node: ElementRef<'a>,
) -> Option<(&'static str, ElementRef<'a>)> {
    strategies
        .iter()
        .find_map(|s| s.apply(node).map(|el| (s.marker, el)))
}

fn compile(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|e| SearchError::Extraction(format!("invalid selector {css:?}: {e:?}")))
}

/// Text of an element with every text fragment trimmed and empty
/// fragments dropped, concatenated without separators.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Everything extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    /// Records in document order. Containers without a title or URL are
    /// not included.
    pub records: Vec<PartialRecord>,
    /// Number of result containers found on the page.
    pub containers: usize,
    /// Containers skipped because extraction failed outright.
    pub failures: usize,
}

/// Compiled selector strategies for every field.
#[derive(Debug)]
pub struct Extractor {
    containers: Selector,
    title: Vec<Strategy>,
    link: Selector,
    source: Vec<Strategy>,
    content: Selector,
    base: Option<Url>,
}

impl Extractor {
    /// Compile the selector strategies.
    ///
    /// `base` is used to resolve relative result links; without it
    /// relative links are a per-container extraction failure.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Extraction`] if a selector fails to compile.
    pub fn new(base: Option<Url>) -> Result<Self, SearchError> {
        let containers = compile(
            &CONTAINER_CLASSES
                .iter()
                .map(|c| format!("div.{c}"))
                .collect::<Vec<_>>()
                .join(", "),
        )?;
        let title = TITLE_CLASSES
            .iter()
            .copied()
            .map(|c| Strategy::new(&["h3", "div"], c))
            .collect::<Result<Vec<_>, _>>()?;
        let source = SOURCE_CLASSES
            .iter()
            .copied()
            .map(|c| Strategy::new(&["span", "div"], c))
            .collect::<Result<Vec<_>, _>>()?;
        let content = compile(
            &CONTENT_CLASSES
                .iter()
                .flat_map(|c| [format!("div.{c}"), format!("p.{c}")])
                .collect::<Vec<_>>()
                .join(", "),
        )?;
        Ok(Self {
            containers,
            title,
            link: compile("a[href]")?,
            source,
            content,
            base,
        })
    }

    /// Parse one page of HTML into partial records.
    ///
    /// Zero containers is not an error. A container that fails extraction
    /// is logged and skipped without affecting the others.
    pub fn extract_page(&self, html: &str) -> PageExtraction {
        let document = Html::parse_document(html);
        let mut page = PageExtraction::default();

        for (idx, container) in document.select(&self.containers).enumerate() {
            page.containers += 1;
            match self.extract_container(container) {
                Ok(Some(record)) => page.records.push(record),
                Ok(None) => {}
                Err(err) => {
                    page.failures += 1;
                    tracing::warn!(container = idx + 1, error = %err, "skipping result container");
                }
            }
        }

        tracing::debug!(
            containers = page.containers,
            records = page.records.len(),
            failures = page.failures,
            "page extracted"
        );
        page
    }

    /// Extract one container.
    ///
    /// `Ok(None)` means the container is not a usable result (no title or
    /// no link). `Err` means its markup could not be interpreted.
    fn extract_container(
        &self,
        container: ElementRef<'_>,
    ) -> Result<Option<PartialRecord>, SearchError> {
        let Some((title_marker, title_el)) = first_match(&self.title, container) else {
            tracing::trace!("container has no title element");
            return Ok(None);
        };
        let title = stripped_text(title_el);

        let href = [title_el, container].into_iter().find_map(|node| {
            node.select(&self.link)
                .filter_map(|a| a.value().attr("href"))
                .map(str::trim)
                .find(|h| !h.is_empty())
        });
        let Some(href) = href else {
            tracing::trace!(title_marker, "container has no link");
            return Ok(None);
        };
        let url = self.resolve(href)?;

        let source = first_match(&self.source, container).map(|(_, el)| stripped_text(el));

        let content = container
            .select(&self.content)
            .map(stripped_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        Ok(Some(PartialRecord {
            title,
            url: Some(url),
            source,
            content,
        }))
    }

    /// Absolute hrefs are kept verbatim; relative ones are joined onto the
    /// base URL.
    fn resolve(&self, href: &str) -> Result<String, SearchError> {
        match Url::parse(href) {
            Ok(_) => Ok(href.to_string()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base.as_ref().ok_or_else(|| {
                    SearchError::Extraction(format!("relative link without base: {href}"))
                })?;
                base.join(href)
                    .map(String::from)
                    .map_err(|e| SearchError::Extraction(format!("unresolvable link {href}: {e}")))
            }
            Err(e) => Err(SearchError::Extraction(format!("malformed link {href}: {e}"))),
        }
    }
}
