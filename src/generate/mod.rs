use std::collections::HashSet;
use std::fmt::Display;
use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use scraper::Html;
use tracing::debug;

use crate::archive::{archive_pages, ArchivePage};
use crate::config::Config;
use crate::error::GenerateError;
use crate::extract::{decode_page, extract};
use crate::fetch::PageFetcher;
use crate::output::types::Meta;
use crate::render::FeedRenderer;
use crate::telemetry::{self, ctx::LogCtx};
use crate::telemetry::ops::generate::{Generate, Phase as GeneratePhase};
use crate::util::time::current_year;

pub mod types;

use types::{GenerateSummary, PageYield};

pub async fn run(cfg: &Config) -> Result<GenerateSummary> {
    let t0 = Instant::now();
    let log = telemetry::generate();
    let _g = log.root_span_kv([
        ("backto", format!("{:?}", cfg.backto)),
        ("output", cfg.output.display().to_string()),
        ("cache_dir", cfg.cache_dir.display().to_string()),
    ]).entered();

    let fetcher = PageFetcher::from_config(cfg)?;
    let renderer = FeedRenderer::from_config(cfg)?;
    let pages = archive_pages(cfg, current_year());

    let summary = run_with(cfg, &fetcher, &renderer, &pages, &Local::now()).await?;

    log.info(format!("📄 Created {}", summary.output));
    log.info(format!(
        "   Put {} on a cloud drive (Dropbox, Google Drive, etc), create a link, and put the link in your podcast player",
        summary.output
    ));
    log.result(&summary, Some(Meta { duration_ms: Some(t0.elapsed().as_millis()) }))?;
    Ok(summary)
}

/// Fetch, extract and render every page in order, then write the feed.
///
/// Failed pages and broken anchors are logged and counted, never fatal.
/// Finding no episodes at all is the one error: nothing is written.
pub async fn run_with<Tz>(
    cfg: &Config,
    fetcher: &PageFetcher,
    renderer: &FeedRenderer,
    pages: &[ArchivePage],
    now: &DateTime<Tz>,
) -> Result<GenerateSummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let log = telemetry::generate();

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut pages_failed = 0usize;
    let mut skipped = 0usize;
    let mut duplicates = 0usize;

    for page in pages {
        let _p = log.span_kv(&GeneratePhase::Page, [("url", page.url.clone())]).entered();
        log.info(format!("⬇️ Downloading {}", page.url));

        let body = {
            let _s = log.span(&GeneratePhase::Fetch).entered();
            fetcher.fetch(page).await
        };
        let body = match body {
            Ok(b) => b,
            Err(e) => {
                pages_failed += 1;
                log.error_kv(&format!("❌ {}", e), [("url", page.url.clone())]);
                continue;
            }
        };

        let found = {
            let _s = log.span(&GeneratePhase::Extract).entered();
            extract_page(&log, &body)
        };
        log.page_summary(&page.url, found.records.len(), found.skipped);
        skipped += found.skipped;

        for rec in found.records {
            if seen.insert(rec.number()) {
                debug!(number = rec.number(), label = rec.label(), date = rec.raw_date(), length = rec.raw_duration(), "record");
                log.episode_found(rec.number());
                records.push(rec);
            } else {
                duplicates += 1;
                log.warn_kv(
                    &format!("↩️ duplicate episode {} on {}, keeping the first", rec.number(), page.url),
                    [("number", rec.number().to_string()), ("url", page.url.clone())],
                );
            }
        }
    }

    log.totals(pages.len(), pages_failed, records.len(), skipped);

    if records.is_empty() {
        log.error("❌ No episodes found!");
        return Err(GenerateError::NoEpisodes.into());
    }

    let xml = {
        let _s = log.span(&GeneratePhase::Render).entered();
        renderer.render(&records, now)?
    };
    {
        let _s = log.span(&GeneratePhase::Write).entered();
        fs::write(&cfg.output, xml).with_context(|| format!("writing {}", cfg.output.display()))?;
    }

    Ok(GenerateSummary {
        output: cfg.output.display().to_string(),
        pages: pages.len(),
        pages_failed,
        episodes: records.len(),
        skipped,
        duplicates,
    })
}

fn extract_page(log: &LogCtx<Generate>, body: &[u8]) -> PageYield {
    let html = decode_page(body);
    let doc = Html::parse_document(&html);
    let mut out = PageYield::default();
    for outcome in extract(&doc) {
        match outcome {
            Ok(rec) => out.records.push(rec),
            Err(e) => {
                out.skipped += 1;
                log.warn_kv(&format!("↩️ skip: {}", e), [("anchor", e.anchor().to_string())]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::PageKind;
    use crate::fetch::{build_client, cache::Cache};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CURRENT: &str = r#"<html><body>
        <a name="top"></a>
        <a name="1000"></a>
        <table><tr><td>Episode #1000 | Sept 12 2016 | 60 min</td></tr></table>
        <table><tr><td><font size="2">Milestone</font><font size="1">Milestone One thousand.</font></td></tr></table>
        <a name="999"></a>
        <table><tr><td>Episode #999 | May 3 2016 | 62 min</td></tr></table>
        <table><tr><td><font size="2">Nine</font><font size="1">Nine nine nine.</font></td></tr></table>
        <a name="998"></a>
        <table><tr><td>broken header</td></tr></table>
        </body></html>"#;

    const YEAR_2015: &str = r#"<html><body>
        <a name="999"></a>
        <table><tr><td>Episode #999 | May 3 2016 | 62 min</td></tr></table>
        <table><tr><td><font size="2">Nine</font><font size="1">Repeated on the yearly page.</font></td></tr></table>
        </body></html>"#;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snarchive-run-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn setup(server: &MockServer) -> (Config, PageFetcher, Vec<ArchivePage>) {
        let dir = scratch_dir();
        let cfg = Config {
            base_url: server.uri(),
            backto: Some(2014),
            output: dir.join("snarchive.xml"),
            cache_dir: dir.join("cache"),
            ..Config::default()
        };
        let fetcher = PageFetcher::new(build_client(&cfg).unwrap(), Cache::open(&cfg.cache_dir).unwrap());
        let pages = archive_pages(&cfg, 2016);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].kind, PageKind::Current);
        (cfg, fetcher, pages)
    }

    async fn serve(server: &MockServer, p: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn failed_pages_and_broken_anchors_do_not_stop_the_run() {
        let server = MockServer::start().await;
        serve(&server, "/securitynow.htm", 200, CURRENT).await;
        serve(&server, "/sn/past/2015.htm", 200, YEAR_2015).await;
        serve(&server, "/sn/past/2014.htm", 500, "").await;
        let (cfg, fetcher, pages) = setup(&server);

        let summary = run_with(&cfg, &fetcher, &FeedRenderer::default(), &pages, &Utc::now()).await.unwrap();
        assert_eq!(summary, GenerateSummary {
            output: cfg.output.display().to_string(),
            pages: 3,
            pages_failed: 1,
            episodes: 2,
            skipped: 1,
            duplicates: 1,
        });

        let xml = fs::read_to_string(&cfg.output).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let titles: Vec<&str> = channel.items().iter().filter_map(|i| i.title()).collect();
        assert_eq!(titles, vec!["SN 1000: Milestone", "SN 999: Nine"]);
        assert_eq!(channel.items()[0].description(), Some("One thousand."));
        assert_eq!(channel.items()[0].pub_date(), Some("Sep 12 2016"));
        // the yearly page repeats 999; the current page's copy wins
        assert_eq!(channel.items()[1].description(), Some("nine nine."));
    }

    #[tokio::test]
    async fn legacy_charset_pages_are_decoded() {
        let server = MockServer::start().await;
        let mut page = br#"<html><head><meta charset="windows-1252"></head><body>
            <a name="30"></a>
            <table><tr><td>Episode #30 | Mar 2 2006 | 45 min</td></tr></table>
            <table><tr><td><font size="2">Listener Q&amp;A</font><font size="1">Steve"#.to_vec();
        page.extend_from_slice(b"\x92s answers \x96 part one</font></td></tr></table></body></html>");
        Mock::given(method("GET"))
            .and(path("/securitynow.htm"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(page))
            .mount(&server)
            .await;
        let (cfg, fetcher, pages) = setup(&server);

        run_with(&cfg, &fetcher, &FeedRenderer::default(), &pages[..1], &Utc::now()).await.unwrap();
        let xml = fs::read_to_string(&cfg.output).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.items()[0].description(), Some("Steve\u{2019}s answers \u{2013} part one"));
        assert!(!xml.contains('\u{fffd}'));
    }

    #[tokio::test]
    async fn no_episodes_means_no_output_file() {
        let server = MockServer::start().await;
        serve(&server, "/securitynow.htm", 200, "<html><body><a name=\"top\"></a></body></html>").await;
        let (cfg, fetcher, pages) = setup(&server);

        let err = run_with(&cfg, &fetcher, &FeedRenderer::default(), &pages, &Utc::now()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<GenerateError>(), Some(GenerateError::NoEpisodes)));
        assert!(!cfg.output.exists());
    }
}
