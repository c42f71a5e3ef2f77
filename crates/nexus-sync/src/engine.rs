//! Per-page sync engine.

use crate::actions::MarketActions;
use crate::context::SyncContext;
use crate::pipeline::{CycleOutcome, Pipeline, Source};
use crate::timer::{PollTimers, Purpose};
use nexus_api::Endpoint;
use nexus_core::Page;
use nexus_view::render::{
    AdviceRenderer, InsightRenderer, LowStockRenderer, MarketWidgetRenderer, PortfolioRenderer,
    ProductSelectRenderer, ProductTableRenderer, QuoteGridRenderer, RecentSalesRenderer,
    SalesChartRenderer, SalesHistoryRenderer, StatsRenderer, WatchlistRenderer,
};
use nexus_view::Renderer;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

struct Scheduled {
    period: Duration,
    pipeline: Arc<Pipeline>,
}

/// Pipelines and timers for one page.
///
/// Only the pipelines of the page's route exist. Dropping the engine cancels
/// its timers and discards its rendered state.
pub struct SyncEngine {
    page: Page,
    scheduled: Vec<Scheduled>,
    timers: PollTimers,
    market: Option<MarketActions>,
}

impl SyncEngine {
    pub fn new(page: Page, ctx: Arc<SyncContext>) -> Self {
        let scheduled = plan(page, &ctx);
        let market = (page == Page::Market)
            .then(|| {
                scheduled
                    .iter()
                    .find(|s| s.pipeline.purpose() == Purpose::MarketRefresh)
                    .map(|s| MarketActions::new(Arc::clone(&ctx), Arc::clone(&s.pipeline)))
            })
            .flatten();

        Self {
            page,
            scheduled,
            timers: PollTimers::new(),
            market,
        }
    }

    /// Start every timer. The first cycle of each runs immediately.
    pub fn start(&mut self) {
        for scheduled in &self.scheduled {
            let pipeline = Arc::clone(&scheduled.pipeline);
            self.timers
                .start(pipeline.purpose(), scheduled.period, move || {
                    let pipeline = Arc::clone(&pipeline);
                    async move {
                        pipeline.run_cycle().await;
                    }
                });
        }
        info!(page = %self.page, timers = self.timers.len(), "Sync engine started");
    }

    /// Cancel every timer.
    pub fn stop(&mut self) {
        if !self.timers.is_empty() {
            info!(page = %self.page, "Sync engine stopped");
        }
        self.timers.cancel_all();
    }

    /// Run every pipeline once, outside the timers.
    pub async fn refresh_all(&self) -> Vec<(Purpose, CycleOutcome)> {
        let mut outcomes = Vec::with_capacity(self.scheduled.len());
        for scheduled in &self.scheduled {
            let outcome = scheduled.pipeline.run_cycle().await;
            outcomes.push((scheduled.pipeline.purpose(), outcome));
        }
        outcomes
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Purposes this page polls for.
    pub fn purposes(&self) -> Vec<Purpose> {
        self.scheduled.iter().map(|s| s.pipeline.purpose()).collect()
    }

    pub fn is_running(&self, purpose: Purpose) -> bool {
        self.timers.is_active(purpose)
    }

    /// Number of timers still running.
    pub fn active_timers(&self) -> usize {
        self.purposes()
            .into_iter()
            .filter(|p| self.timers.is_active(*p))
            .count()
    }

    /// Market page actions; `None` on every other page.
    pub fn market(&self) -> Option<&MarketActions> {
        self.market.as_ref()
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("page", &self.page)
            .field("timers", &self.timers)
            .finish()
    }
}

/// Pipelines for a page.
fn plan(page: Page, ctx: &Arc<SyncContext>) -> Vec<Scheduled> {
    let config = &ctx.config;
    let inventory = || {
        Source::Sections(vec![
            ("stats", Endpoint::Summary),
            ("products", Endpoint::Products),
            ("sales", Endpoint::Sales),
        ])
    };

    match page {
        Page::Dashboard => vec![
            scheduled(
                ctx,
                Purpose::Heartbeat,
                config.heartbeat_interval(),
                Source::Combined(Endpoint::RealtimeUpdates),
                vec![Box::new(StatsRenderer), Box::new(RecentSalesRenderer)],
            ),
            // The ticker widget keeps the market cadence.
            scheduled(
                ctx,
                Purpose::MarketRefresh,
                config.market_interval(),
                Source::Sections(vec![("market", Endpoint::Market)]),
                vec![Box::new(MarketWidgetRenderer)],
            ),
        ],
        Page::Products => vec![scheduled(
            ctx,
            Purpose::Heartbeat,
            config.heartbeat_interval(),
            Source::Sections(vec![
                ("stats", Endpoint::Summary),
                ("products", Endpoint::Products),
            ]),
            vec![Box::new(ProductTableRenderer)],
        )],
        Page::Sales => vec![scheduled(
            ctx,
            Purpose::Heartbeat,
            config.heartbeat_interval(),
            inventory(),
            vec![
                Box::new(ProductSelectRenderer),
                Box::new(SalesHistoryRenderer),
            ],
        )],
        Page::Reports => vec![
            scheduled(
                ctx,
                Purpose::Heartbeat,
                config.heartbeat_interval(),
                inventory(),
                vec![
                    Box::new(LowStockRenderer),
                    Box::new(SalesChartRenderer),
                    Box::new(SalesHistoryRenderer),
                ],
            ),
            scheduled(
                ctx,
                Purpose::InsightRefresh,
                config.insight_interval(),
                Source::Sections(vec![("advice", Endpoint::InventoryAdvice)]),
                vec![Box::new(AdviceRenderer)],
            ),
        ],
        Page::Market => vec![
            scheduled(
                ctx,
                Purpose::MarketRefresh,
                config.market_interval(),
                Source::Sections(vec![
                    ("indices", Endpoint::Market),
                    ("watchlist", Endpoint::Watchlist),
                    ("portfolio", Endpoint::Portfolio),
                ]),
                vec![
                    Box::new(QuoteGridRenderer::indices()),
                    Box::new(WatchlistRenderer),
                    Box::new(PortfolioRenderer),
                ],
            ),
            scheduled(
                ctx,
                Purpose::InsightRefresh,
                config.insight_interval(),
                Source::Sections(vec![("insight", Endpoint::MarketInsights)]),
                vec![Box::new(InsightRenderer)],
            ),
        ],
        Page::Static => Vec::new(),
    }
}

fn scheduled(
    ctx: &Arc<SyncContext>,
    purpose: Purpose,
    period: Duration,
    source: Source,
    renderers: Vec<Box<dyn Renderer>>,
) -> Scheduled {
    Scheduled {
        period,
        pipeline: Arc::new(Pipeline::new(purpose, source, renderers, Arc::clone(ctx))),
    }
}
