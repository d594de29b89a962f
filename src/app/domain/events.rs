use super::tree::NodeId;

/// User input delivered to the page controller.
/// The host translates its native events into one of these; `PageController::dispatch`
/// routes them to the individual handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Pointer click on the given element.
    Click { target: NodeId },
    /// The text of an input element changed.
    Input { target: NodeId, value: String },
}

/// What a dispatched event did, for hosts that need to follow up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// A handler asked for the host's default action to be suppressed.
    pub default_prevented: bool,
    /// Names of the handlers that ran, in order.
    pub handled: Vec<&'static str>,
}

impl DispatchOutcome {
    pub fn ran(&self, handler: &str) -> bool {
        self.handled.iter().any(|h| *h == handler)
    }
}
