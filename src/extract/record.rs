/// One episode as found on an archive page. Built once, never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeRecord {
    number: u32,
    label: String,
    raw_date: String,
    raw_duration: String,
    minutes: u32,
    title: String,
    description: String,
}

impl EpisodeRecord {
    pub(crate) fn new(
        number: u32,
        label: String,
        raw_date: String,
        raw_duration: String,
        minutes: u32,
        title: String,
        description: String,
    ) -> Self {
        EpisodeRecord { number, label, raw_date, raw_duration, minutes, title, description }
    }

    pub fn number(&self) -> u32 { self.number }
    pub fn label(&self) -> &str { &self.label }
    /// Date exactly as printed in the header, e.g. `Sept 12 2016`.
    pub fn raw_date(&self) -> &str { &self.raw_date }
    pub fn raw_duration(&self) -> &str { &self.raw_duration }
    pub fn minutes(&self) -> u32 { self.minutes }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
}
