use crate::app::domain::selector::Selector;
use crate::app::domain::settings::{HIGHLIGHT_CLASS, PageSettings};
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::host::{Host, ScrollBehavior, ScrollRequest};
use crate::app::services::text_ops::{literal_matcher, match_ranges, normalize_query};

/// What one search pass did to the active section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Blocks that contained the query, in document order.
    pub blocks: Vec<NodeId>,
    /// Markers inserted.
    pub markers: usize,
    /// Markers removed before marking.
    pub cleared: usize,
}

/// Live search over the active section: wraps each occurrence of the query
/// in a marker span and scrolls matching blocks into view.
pub struct SearchController {
    input: Selector,
    active_section: Selector,
    targets: Selector,
    markers: Selector,
    min_query_len: usize,
    marker_style: String,
    behavior: ScrollBehavior,
}

impl SearchController {
    pub fn new(settings: &PageSettings) -> Result<Self> {
        let selectors = &settings.selectors;
        Ok(Self {
            input: Selector::parse(&selectors.search_input)?,
            active_section: Selector::parse(&selectors.active_section)?,
            targets: Selector::parse(&selectors.search_targets)?,
            markers: Selector::parse(&format!("span.{HIGHLIGHT_CLASS}"))?,
            min_query_len: settings.min_query_len,
            marker_style: settings.highlight_style.clone(),
            behavior: settings.scroll_behavior(),
        })
    }

    pub fn is_input(&self, doc: &Document, node: NodeId) -> bool {
        self.input.matches(doc, node)
    }

    /// React to the search field changing to `value`.
    pub fn on_input<H: Host>(&self, doc: &mut Document, host: &mut H, value: &str) -> Result<SearchOutcome> {
        let term = normalize_query(value);
        let root = doc.root();
        let Some(section) = doc.query_selector(root, &self.active_section) else {
            log::debug!("search: no active section");
            return Ok(SearchOutcome::default());
        };

        if term.chars().count() < self.min_query_len {
            let cleared = self.clear_markers(doc, section);
            log::debug!("search: query too short, cleared {cleared} markers");
            return Ok(SearchOutcome {
                cleared,
                ..SearchOutcome::default()
            });
        }

        let matcher = literal_matcher(&term)?;
        let mut outcome = SearchOutcome::default();
        for block in doc.query_selector_all(section, &self.targets) {
            outcome.cleared += self.clear_markers(doc, block);

            let ranges = match_ranges(&doc.text_content(block), &matcher);
            if ranges.is_empty() {
                continue;
            }

            host.scroll(
                doc,
                ScrollRequest::IntoView {
                    node: block,
                    behavior: self.behavior,
                },
            );
            outcome.markers += self.mark_ranges(doc, block, &ranges);
            outcome.blocks.push(block);
        }

        log::debug!(
            "search '{}': {} markers in {} blocks",
            term,
            outcome.markers,
            outcome.blocks.len()
        );
        Ok(outcome)
    }

    /// Remove every marker under `scope`, restoring the plain text. Returns
    /// how many were removed.
    pub fn clear_markers(&self, doc: &mut Document, scope: NodeId) -> usize {
        let markers = doc.query_selector_all(scope, &self.markers);
        if markers.is_empty() {
            return 0;
        }
        for &marker in markers.iter().rev() {
            doc.unwrap(marker);
        }
        doc.normalize(scope);
        markers.len()
    }

    /// Wrap byte ranges of `block`'s text content. Ranges are relative to the
    /// concatenated text. An occurrence that crosses element boundaries gets
    /// one marker per run of adjacent siblings it covers, so `sta<code>tus</code>`
    /// ends up inside a single marker.
    fn mark_ranges(&self, doc: &mut Document, block: NodeId, ranges: &[(usize, usize)]) -> usize {
        let mut count = 0;
        // Back to front so earlier offsets stay valid while splitting.
        for &(start, end) in ranges.iter().rev() {
            split_text_at(doc, block, end);
            split_text_at(doc, block, start);

            let spans = text_spans(doc, block);
            let mut tops: Vec<NodeId> = Vec::new();
            for &(node, s, e) in &spans {
                if s < e && s >= start && e <= end {
                    let top = outermost_covered(doc, block, node, &spans, start, end);
                    if tops.last() != Some(&top) {
                        tops.push(top);
                    }
                }
            }

            let mut runs: Vec<Vec<NodeId>> = Vec::new();
            for top in tops {
                match runs.last_mut() {
                    Some(run) if run.last().and_then(|&prev| doc.next_sibling(prev)) == Some(top) => run.push(top),
                    _ => runs.push(vec![top]),
                }
            }

            for run in runs {
                let Some(parent) = doc.parent(run[0]) else {
                    continue;
                };
                let marker = self.create_marker(doc);
                doc.insert_before(parent, marker, run[0]);
                for node in run {
                    doc.append_child(marker, node);
                }
                count += 1;
            }
        }
        count
    }

    fn create_marker(&self, doc: &mut Document) -> NodeId {
        let marker = doc.create_element("span");
        doc.add_class(marker, HIGHLIGHT_CLASS);
        if !self.marker_style.is_empty() {
            doc.set_attr(marker, "style", &self.marker_style);
        }
        marker
    }
}

/// Text nodes under `block` with their byte span in the concatenated text.
fn text_spans(doc: &Document, block: NodeId) -> Vec<(NodeId, usize, usize)> {
    let mut offset = 0;
    doc.text_nodes(block)
        .into_iter()
        .map(|node| {
            let start = offset;
            offset += doc.text(node).map_or(0, str::len);
            (node, start, offset)
        })
        .collect()
}

/// Make `pos` fall on a text node boundary.
fn split_text_at(doc: &mut Document, block: NodeId, pos: usize) {
    let inside = text_spans(doc, block)
        .into_iter()
        .find(|&(_, s, e)| s < pos && pos < e);
    if let Some((node, s, _)) = inside {
        doc.split_text(node, pos - s);
    }
}

/// Climb from `node` while the parent's text lies entirely within
/// `start..end`, stopping below `block`.
fn outermost_covered(
    doc: &Document,
    block: NodeId,
    node: NodeId,
    spans: &[(NodeId, usize, usize)],
    start: usize,
    end: usize,
) -> NodeId {
    let mut top = node;
    while let Some(parent) = doc.parent(top) {
        if parent == block {
            break;
        }
        let covered = spans
            .iter()
            .filter(|&&(n, _, _)| doc.contains(parent, n))
            .all(|&(_, s, e)| s >= start && e <= end);
        if !covered {
            break;
        }
        top = parent;
    }
    top
}
