use crate::tools::ToolKind;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
    GraphChanged { nodes: usize, edges: usize },
    SelectionChanged { selected: usize },
    ToolChanged(ToolKind),
}

impl GraphEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            GraphEvent::GraphChanged { .. } => ListenerKind::Graph,
            GraphEvent::SelectionChanged { .. } => ListenerKind::Selection,
            GraphEvent::ToolChanged(_) => ListenerKind::Tool,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Graph,
    Selection,
    Tool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

type Callback = Box<dyn FnMut(&GraphEvent)>;

/// Synchronous listener registry. Delivery is skipped while disabled and
/// never re-enters itself.
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, ListenerKind, Callback)>,
    enabled: bool,
    dispatching: bool,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Listeners { next_id: 1, entries: Vec::new(), enabled: true, dispatching: false }
    }
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, kind: ListenerKind, f: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, kind, f));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(lid, _, _)| *lid != id);
        self.entries.len() != before
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn emit(&mut self, event: GraphEvent) {
        if !self.enabled || self.dispatching {
            return;
        }
        self.dispatching = true;
        let kind = event.kind();
        for (_, k, f) in self.entries.iter_mut() {
            if *k == kind {
                f(&event);
            }
        }
        self.dispatching = false;
    }
}
