use chrono::Duration;

use crate::config::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Current,
    Year(i32),
}

/// How long a cached copy of a page stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    Never,
    Days(i64),
}

impl Expiry {
    pub fn max_age(&self) -> Option<Duration> {
        match self {
            Expiry::Never => None,
            Expiry::Days(d) => Some(Duration::days(*d)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivePage {
    pub url: String,
    pub kind: PageKind,
}

impl ArchivePage {
    // past years are frozen; only the current page changes
    pub fn expiry(&self) -> Expiry {
        match self.kind {
            PageKind::Current => Expiry::Days(1),
            PageKind::Year(_) => Expiry::Never,
        }
    }
}

/// Current page first, then one page per year from `this_year - 1` down to the cutoff.
pub fn archive_pages(cfg: &Config, this_year: i32) -> Vec<ArchivePage> {
    let mut pages = vec![ArchivePage { url: cfg.current_url(), kind: PageKind::Current }];
    if let Some(backto) = cfg.backto {
        pages.extend(
            (backto..this_year)
                .rev()
                .map(|year| ArchivePage { url: cfg.year_url(year), kind: PageKind::Year(year) }),
        );
    }
    pages
}
