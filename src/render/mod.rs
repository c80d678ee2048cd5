use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use quick_xml::escape::escape;

use crate::config::Config;
use crate::error::TemplateError;
use crate::extract::EpisodeRecord;
use crate::util::time::feed_timestamp;

pub mod template;

use template::Template;

const DOCUMENT_TEMPLATE: &str = include_str!("../../templates/sn-template.xml");
const ITEM_TEMPLATE: &str = include_str!("../../templates/sn-item.xml");

/// Cut the month name to three letters: some old episodes say `Sept`, and
/// podcast players reject that. Other tokens are left alone.
pub fn normalize_date(raw: &str) -> String {
    let mut month_done = false;
    raw.split(' ')
        .map(|tok| {
            if !month_done && !tok.is_empty() && tok.chars().all(char::is_alphabetic) {
                month_done = true;
                tok.chars().take(3).collect::<String>()
            } else {
                tok.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `hours:minutes:00`, unpadded.
pub fn format_duration(minutes: u32) -> String {
    format!("{}:{}:00", minutes / 60, minutes % 60)
}

fn esc(s: &str) -> String {
    escape(s).into_owned()
}

pub struct FeedRenderer {
    document: Template,
    item: Template,
}

impl Default for FeedRenderer {
    fn default() -> Self {
        FeedRenderer { document: Template::new(DOCUMENT_TEMPLATE), item: Template::new(ITEM_TEMPLATE) }
    }
}

impl FeedRenderer {
    pub fn new(document: Template, item: Template) -> Self {
        FeedRenderer { document, item }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, TemplateError> {
        let mut r = FeedRenderer::default();
        if let Some(p) = &cfg.template { r.document = Template::from_file(p)?; }
        if let Some(p) = &cfg.item_template { r.item = Template::from_file(p)?; }
        Ok(r)
    }

    pub fn render_item(&self, rec: &EpisodeRecord) -> Result<String, TemplateError> {
        let nr = rec.number().to_string();
        let vars: HashMap<&str, String> = HashMap::from([
            ("NR4", esc(&format!("{:04}", rec.number()))),
            ("NR", esc(&nr)),
            ("DATE", esc(&normalize_date(rec.raw_date()))),
            ("DURATION", esc(&format_duration(rec.minutes()))),
            ("TITLE", esc(rec.title())),
            ("DESCRIPTION", esc(rec.description())),
        ]);
        self.item.substitute(&vars)
    }

    pub fn render<Tz>(&self, records: &[EpisodeRecord], now: &DateTime<Tz>) -> Result<String, TemplateError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let items = records
            .iter()
            .map(|r| self.render_item(r))
            .collect::<Result<Vec<_>, _>>()?;
        let vars: HashMap<&str, String> = HashMap::from([
            ("NOW", esc(&feed_timestamp(now))),
            ("ITEMS", items.concat()),
        ]);
        self.document.substitute(&vars)
    }
}
