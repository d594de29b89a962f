use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use similar::TextDiff;

use crate::app::domain::events::{DispatchOutcome, PageEvent};
use crate::app::domain::selector::Selector;
use crate::app::domain::settings::PageSettings;
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::host::{ScrollRequest, Viewport};
use crate::app::services::markup::{document_html, outline};
use crate::app::state::PageController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_height() -> u32 {
    800
}

/// One scripted user action. Targets are selectors; the first match is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Click(String),
    Input { target: String, value: String },
    Resize(u32),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click(target) => write!(f, "click {target}"),
            Step::Input { target, value } => write!(f, "input {target} {value:?}"),
            Step::Resize(width) => write!(f, "resize {width}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub viewport: Option<ViewportSize>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl ReplayScript {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: String,
    pub outcome: DispatchOutcome,
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub scrolls: Vec<ScrollRequest>,
    pub final_scroll_top: f64,
    pub html: String,
    /// Unified diff of the body outline before and after the script.
    pub diff: Option<String>,
}

impl ReplayReport {
    pub fn scroll_lines(&self) -> Vec<String> {
        self.scrolls.iter().map(describe_scroll).collect()
    }
}

fn describe_scroll(request: &ScrollRequest) -> String {
    match request {
        ScrollRequest::To { top, behavior } => format!("to {top:.1} ({behavior:?})"),
        ScrollRequest::IntoView { node, behavior } => format!("node {node} into view ({behavior:?})"),
    }
}

fn resolve(doc: &Document, index: usize, selector: &str) -> Result<NodeId> {
    let parsed = Selector::parse(selector)?;
    doc.query_selector(doc.root(), &parsed)
        .ok_or_else(|| AppError::Replay(format!("step {}: '{}' matches nothing", index + 1, selector)))
}

/// Drive `script` through a controller for `doc` and collect what happened.
pub fn run_script(doc: Document, settings: PageSettings, script: &ReplayScript, with_diff: bool) -> Result<ReplayReport> {
    let viewport = script
        .viewport
        .map(|size| Viewport::new(size.width, size.height))
        .unwrap_or_default();
    let mut page = PageController::new(doc, settings, viewport)?;
    page.initialize();

    let before = with_diff.then(|| outline(page.document(), page.document().body()));

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        log::debug!("step {}: {}", index + 1, step);
        let outcome = match step {
            Step::Click(selector) => {
                let target = resolve(page.document(), index, selector)?;
                page.dispatch(PageEvent::Click { target })?
            }
            Step::Input { target, value } => {
                let target = resolve(page.document(), index, target)?;
                page.dispatch(PageEvent::Input {
                    target,
                    value: value.clone(),
                })?
            }
            Step::Resize(width) => {
                page.host_mut().resize(*width);
                DispatchOutcome::default()
            }
        };
        steps.push(StepReport {
            step: step.to_string(),
            outcome,
        });
    }

    let diff = before.map(|before| {
        let after = outline(page.document(), page.document().body());
        TextDiff::from_lines(&before, &after)
            .unified_diff()
            .context_radius(2)
            .header("before", "after")
            .to_string()
    });

    let html = document_html(page.document());
    let (_, viewport) = page.into_parts();
    Ok(ReplayReport {
        steps,
        final_scroll_top: viewport.scroll_top,
        scrolls: viewport.history,
        html,
        diff,
    })
}
