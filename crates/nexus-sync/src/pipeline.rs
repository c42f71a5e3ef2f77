//! Fetch, diff-and-render and event derivation for one poll purpose.

use crate::context::SyncContext;
use crate::derive::EventDeriver;
use crate::timer::Purpose;
use futures_util::future::join_all;
use nexus_api::{ApiClient, Endpoint};
use nexus_core::{SemanticEvent, Snapshot};
use nexus_telemetry::Metrics;
use nexus_view::{RegionSlot, Renderer};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Where a pipeline's snapshot comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// One endpoint whose object payload holds every section.
    Combined(Endpoint),
    /// One endpoint per section, fetched concurrently.
    Sections(Vec<(&'static str, Endpoint)>),
}

impl Source {
    /// Fetch a snapshot, or `None` when nothing usable came back.
    ///
    /// For `Sections`, any subset may fail; the cycle is skipped only when
    /// every section failed.
    pub async fn fetch(&self, api: &ApiClient) -> Option<Snapshot> {
        match self {
            Self::Combined(endpoint) => api.fetch(endpoint).await.map(Snapshot::from_value),
            Self::Sections(parts) => {
                let bodies = join_all(parts.iter().map(|(_, endpoint)| api.fetch(endpoint))).await;
                let snapshot =
                    Snapshot::from_sections(parts.iter().map(|(name, _)| *name).zip(bodies));
                (!snapshot.is_empty()).then_some(snapshot)
            }
        }
    }
}

/// Result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fetch failed; nothing rendered, no events.
    Skipped,
    /// Snapshot applied.
    Applied { committed: usize, events: usize },
}

struct Renderable {
    renderer: Box<dyn Renderer>,
    slots: Vec<RegionSlot>,
}

/// Rendered state and event memory. Dropped with the pipeline.
struct PipelineState {
    renderables: Vec<Renderable>,
    deriver: EventDeriver,
    /// Last snapshot applied.
    last: Option<Snapshot>,
}

/// One poll purpose on one page.
pub struct Pipeline {
    purpose: Purpose,
    source: Source,
    ctx: Arc<SyncContext>,
    state: Mutex<PipelineState>,
    /// Serializes cycles started by the timer and by user actions.
    cycle_gate: tokio::sync::Mutex<()>,
}

impl Pipeline {
    pub fn new(
        purpose: Purpose,
        source: Source,
        renderers: Vec<Box<dyn Renderer>>,
        ctx: Arc<SyncContext>,
    ) -> Self {
        let sections: Vec<&'static str> = renderers.iter().map(|r| r.section()).collect();
        let renderables = renderers
            .into_iter()
            .map(|renderer| {
                let slots = renderer.regions().into_iter().map(RegionSlot::new).collect();
                Renderable { renderer, slots }
            })
            .collect();
        let deriver = EventDeriver::for_sections(&ctx.config, &sections);

        Self {
            purpose,
            source,
            ctx,
            state: Mutex::new(PipelineState {
                renderables,
                deriver,
                last: None,
            }),
            cycle_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// Regions this pipeline owns.
    pub fn regions(&self) -> Vec<&'static str> {
        self.state
            .lock()
            .renderables
            .iter()
            .flat_map(|r| r.slots.iter().map(RegionSlot::region))
            .collect()
    }

    /// The snapshot the regions currently reflect, if any cycle succeeded.
    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.state.lock().last.clone()
    }

    /// Run one fetch-and-render cycle.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let _gate = self.cycle_gate.lock().await;

        let Some(snapshot) = self.source.fetch(&self.ctx.api).await else {
            debug!(purpose = %self.purpose, "Fetch failed, skipping cycle");
            Metrics::poll_cycle(self.purpose.as_str(), "skipped");
            return CycleOutcome::Skipped;
        };

        let outcome = self.apply(&snapshot);
        Metrics::poll_cycle(self.purpose.as_str(), "applied");
        outcome
    }

    /// Render a snapshot and deliver the events it implies.
    ///
    /// Locks are released before events reach the sink.
    pub fn apply(&self, snapshot: &Snapshot) -> CycleOutcome {
        let (committed, events) = {
            let mut state = self.state.lock();
            let committed = self.render(&mut state.renderables, snapshot);
            let events = state.deriver.derive(snapshot);
            state.last = Some(snapshot.clone());
            (committed, events)
        };

        trace!(purpose = %self.purpose, committed, events = events.len(), "Cycle applied");
        self.deliver(&events);
        CycleOutcome::Applied {
            committed,
            events: events.len(),
        }
    }

    fn render(&self, renderables: &mut [Renderable], snapshot: &Snapshot) -> usize {
        let mut surface = self.ctx.surface.lock();
        let mut committed = 0;

        for renderable in renderables.iter_mut() {
            let section = snapshot.section(renderable.renderer.section());
            if section.is_none() && !renderable.renderer.render_missing() {
                continue;
            }
            let fragments = renderable.renderer.render(section, &*surface);
            for fragment in fragments {
                if let Some(slot) = renderable
                    .slots
                    .iter_mut()
                    .find(|s| s.region() == fragment.region)
                {
                    if slot.commit(fragment.html, &mut *surface) {
                        committed += 1;
                    }
                }
            }
        }
        committed
    }

    fn deliver(&self, events: &[SemanticEvent]) {
        for event in events {
            debug!(purpose = %self.purpose, kind = %event.kind, "Semantic event");
            self.ctx.sink.on_event(event);
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("purpose", &self.purpose)
            .field("source", &self.source)
            .finish()
    }
}
