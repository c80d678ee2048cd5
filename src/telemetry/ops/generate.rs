use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Generate;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Page, Fetch, Extract, Render, Write }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Page => "page",
        Phase::Fetch => "fetch",
        Phase::Extract => "extract",
        Phase::Render => "render",
        Phase::Write => "write",
    }}
    fn span(&self) -> Span { match self {
        Phase::Page => info_span!("page"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Extract => info_span!("extract"),
        Phase::Render => info_span!("render"),
        Phase::Write => info_span!("write"),
    }}
}

impl OpMarker for Generate {
    const NAME: &'static str = "generate";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("generate") }
}
