//! Session state
//! Current uploads, filter selection and computed view, independent of rendering.

use crate::config::DashboardConfig;
use crate::data::{DatasetBundle, FilterCriteria, UploadKey};
use crate::pipeline::{self, DashboardView, Notice, PipelineState};
use std::sync::Arc;

/// Which of the two compared seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    A,
    B,
}

impl Season {
    pub const BOTH: [Season; 2] = [Season::A, Season::B];

    pub fn label(self, config: &DashboardConfig) -> &str {
        match self {
            Season::A => &config.season_a,
            Season::B => &config.season_b,
        }
    }
}

/// Upload status of one season.
#[derive(Debug, Clone, Default)]
pub struct SeasonSlot {
    pub file_names: Vec<String>,
    /// Identity of the current upload set; `None` until files are chosen.
    pub key: Option<UploadKey>,
    pub bundle: Option<Arc<DatasetBundle>>,
    pub load_error: Option<String>,
    /// Ticket of the file read in flight for this season, if any.
    pub pending_read: Option<ReadTicket>,
}

impl SeasonSlot {
    pub fn is_loading(&self) -> bool {
        self.pending_read.is_some()
            || (self.key.is_some() && self.bundle.is_none() && self.load_error.is_none())
    }
}

/// Identifies one file selection while its files are read in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket(u64);

/// The whole UI state. Each season's slot is replaced wholesale when its
/// uploads change, which also resets the filter selection.
#[derive(Debug, Default)]
pub struct SessionState {
    season_a: SeasonSlot,
    season_b: SeasonSlot,
    criteria: FilterCriteria,
    pipeline: PipelineState,
    next_read: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, season: Season) -> &SeasonSlot {
        match season {
            Season::A => &self.season_a,
            Season::B => &self.season_b,
        }
    }

    fn slot_mut(&mut self, season: Season) -> &mut SeasonSlot {
        match season {
            Season::A => &mut self.season_a,
            Season::B => &mut self.season_b,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn pipeline(&self) -> &PipelineState {
        &self.pipeline
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.pipeline.view()
    }

    pub fn is_loading(&self) -> bool {
        Season::BOTH.iter().any(|s| self.slot(*s).is_loading())
    }

    /// Files chosen for a season and being read. Supersedes any earlier read
    /// for that season; the current upload stays in place until this one lands.
    pub fn begin_read(&mut self, season: Season) -> ReadTicket {
        self.next_read += 1;
        let ticket = ReadTicket(self.next_read);
        self.slot_mut(season).pending_read = Some(ticket);
        ticket
    }

    pub fn is_current_read(&self, season: Season, ticket: ReadTicket) -> bool {
        self.slot(season).pending_read == Some(ticket)
    }

    /// A read that could not complete. Returns whether it was still current.
    pub fn fail_read(&mut self, season: Season, ticket: ReadTicket) -> bool {
        if !self.is_current_read(season, ticket) {
            return false;
        }
        self.slot_mut(season).pending_read = None;
        true
    }

    /// New files read for a season: drop the old bundle and go back to
    /// awaiting until the new one is loaded.
    pub fn begin_upload(&mut self, season: Season, file_names: Vec<String>, key: UploadKey) {
        *self.slot_mut(season) = SeasonSlot {
            file_names,
            key: Some(key),
            ..Default::default()
        };
        self.criteria = FilterCriteria::default();
        self.pipeline = PipelineState::AwaitingUploads;
    }

    /// Attach a finished load. Results for a superseded upload are dropped;
    /// returns whether the result was accepted.
    pub fn finish_upload(
        &mut self,
        season: Season,
        key: UploadKey,
        result: Result<Arc<DatasetBundle>, String>,
    ) -> bool {
        let slot = self.slot_mut(season);
        if slot.key != Some(key) {
            log::debug!("Dropping stale load result for season {:?}", season);
            return false;
        }

        match result {
            Ok(bundle) => slot.bundle = Some(bundle),
            Err(e) => slot.load_error = Some(e),
        }
        true
    }

    /// Change the filter selection. Returns whether it differs from the current one.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        if self.criteria == criteria {
            return false;
        }
        self.criteria = criteria;
        true
    }

    /// Re-run the pipeline from scratch if both seasons are loaded.
    pub fn recompute(&mut self, config: &DashboardConfig) {
        self.pipeline = match (&self.season_a.bundle, &self.season_b.bundle) {
            (Some(a), Some(b)) => {
                log::debug!("Recomputing dashboard");
                PipelineState::Computed(Box::new(pipeline::run(a, b, &self.criteria, config)))
            }
            _ => PipelineState::AwaitingUploads,
        };
    }

    /// Notices shown while the pipeline is waiting for uploads.
    pub fn awaiting_notices(&self, config: &DashboardConfig) -> Vec<Notice> {
        let mut notices = Vec::new();
        for season in Season::BOTH {
            let slot = self.slot(season);
            if let Some(e) = &slot.load_error {
                notices.push(Notice::error(format!(
                    "Could not load the {} files: {}",
                    season.label(config),
                    e
                )));
            }
        }

        let missing = Season::BOTH
            .iter()
            .any(|s| self.slot(*s).key.is_none() || self.slot(*s).load_error.is_some());
        if missing {
            notices.push(Notice::error(format!(
                "Please upload all the required files for {} and {}.",
                config.season_a, config.season_b
            )));
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DatasetLoader, UploadSet, UploadedFile};

    fn upload(body: &str) -> UploadSet {
        UploadSet::new(vec![UploadedFile::new("wc_players_main.csv", body)])
    }

    fn load_season(state: &mut SessionState, loader: &mut DatasetLoader, season: Season, body: &str) {
        let set = upload(body);
        state.begin_upload(season, set.file_names(), set.key());
        let bundle = loader
            .cached(set.key())
            .map(Ok)
            .unwrap_or_else(|| DatasetLoader::parse(&set).map(|b| loader.store(set.key(), b)))
            .map_err(|e| e.to_string());
        assert!(state.finish_upload(season, set.key(), bundle));
    }

    #[test]
    fn computes_only_with_both_seasons() {
        let config = DashboardConfig::default();
        let mut loader = DatasetLoader::new();
        let mut state = SessionState::new();
        assert!(!state.pipeline().is_computed());

        load_season(&mut state, &mut loader, Season::A, "team,position\nT1,top\n");
        state.recompute(&config);
        assert!(!state.pipeline().is_computed());

        load_season(&mut state, &mut loader, Season::B, "team,position\nT1,mid\n");
        state.recompute(&config);
        assert!(state.pipeline().is_computed());
    }

    #[test]
    fn new_upload_resets_to_awaiting_and_clears_filters() {
        let config = DashboardConfig::default();
        let mut loader = DatasetLoader::new();
        let mut state = SessionState::new();
        load_season(&mut state, &mut loader, Season::A, "team\nT1\n");
        load_season(&mut state, &mut loader, Season::B, "team\nT2\n");
        state.set_criteria(FilterCriteria::new("T1", "all"));
        state.recompute(&config);
        assert!(state.pipeline().is_computed());

        let replacement = upload("team\nT3\n");
        state.begin_upload(Season::B, replacement.file_names(), replacement.key());
        assert!(!state.pipeline().is_computed());
        assert!(state.is_loading());
        assert_eq!(state.criteria(), &FilterCriteria::default());
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut state = SessionState::new();
        let first = upload("team\nT1\n");
        let second = upload("team\nT2\n");

        state.begin_upload(Season::A, first.file_names(), first.key());
        state.begin_upload(Season::A, second.file_names(), second.key());

        let stale = DatasetLoader::parse(&first).map(Arc::new).map_err(|e| e.to_string());
        assert!(!state.finish_upload(Season::A, first.key(), stale));
        assert!(state.slot(Season::A).bundle.is_none());
    }

    #[test]
    fn superseded_read_is_dropped() {
        let mut state = SessionState::new();
        let older = state.begin_read(Season::A);
        let newer = state.begin_read(Season::A);
        assert!(state.is_loading());
        assert!(!state.is_current_read(Season::A, older));

        let set = upload("team\nT2\n");
        assert!(state.is_current_read(Season::A, newer));
        state.begin_upload(Season::A, set.file_names(), set.key());

        assert!(!state.is_current_read(Season::A, older));
        assert!(!state.fail_read(Season::A, older));
        assert_eq!(state.slot(Season::A).key, Some(set.key()));
        assert!(state.slot(Season::A).pending_read.is_none());
    }

    #[test]
    fn failed_read_stops_loading_and_keeps_upload() {
        let mut state = SessionState::new();
        let set = upload("team\nT1\n");
        state.begin_upload(Season::B, set.file_names(), set.key());
        let bundle = DatasetLoader::parse(&set).map(Arc::new).map_err(|e| e.to_string());
        state.finish_upload(Season::B, set.key(), bundle);
        assert!(!state.is_loading());

        let ticket = state.begin_read(Season::B);
        assert!(state.is_loading());
        assert!(state.fail_read(Season::B, ticket));
        assert!(!state.is_loading());
        assert!(state.slot(Season::B).bundle.is_some());
    }

    #[test]
    fn load_errors_become_notices() {
        let config = DashboardConfig::default();
        let mut state = SessionState::new();
        let broken = upload("");
        state.begin_upload(Season::A, broken.file_names(), broken.key());
        let result = DatasetLoader::parse(&broken).map(Arc::new).map_err(|e| e.to_string());
        state.finish_upload(Season::A, broken.key(), result);

        let notices = state.awaiting_notices(&config);
        assert_eq!(notices.len(), 2);
        assert!(notices[0].message.contains("2020"));
        assert!(notices[1].message.contains("Please upload"));
    }

    #[test]
    fn unchanged_criteria_report_no_change() {
        let mut state = SessionState::new();
        assert!(!state.set_criteria(FilterCriteria::default()));
        assert!(state.set_criteria(FilterCriteria::new("all", "top")));
    }
}
