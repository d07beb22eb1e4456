use std::collections::HashSet;
use std::sync::Arc;

use pista_core::model::Activity;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    ActivityList,
    ActivityDetail,
}

pub(crate) struct App {
    pub screen: Screen,

    pub activities: Arc<[Activity]>,
    pub activity_list_index: usize,

    pub selected_activity: Option<Activity>,
    pub participants: Vec<String>,
    pub participant_list_index: usize,
    pub toggled_participants: HashSet<String>,
    pub loading_participants: bool,

    /// Token identifying the current detail selection. Participant fetch
    /// results carry the token they were started with; results for an
    /// outdated token are dropped instead of overwriting the open view.
    pub selection_seq: u64,

    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            screen: Screen::ActivityList,
            activities: Vec::new().into(),
            activity_list_index: 0,
            selected_activity: None,
            participants: Vec::new(),
            participant_list_index: 0,
            toggled_participants: HashSet::new(),
            loading_participants: false,
            selection_seq: 0,
            error_message: None,
        }
    }

    /// Replace the activity snapshot, keeping the cursor in bounds.
    pub(crate) fn apply_snapshot(&mut self, activities: Arc<[Activity]>) {
        self.activities = activities;
        if self.activity_list_index >= self.activities.len() {
            self.activity_list_index = self.activities.len().saturating_sub(1);
        }
    }

    /// Open the detail view for the activity under the cursor.
    ///
    /// Resets the participant list and toggle set, bumps the selection
    /// token, and returns it together with the activity so the caller can
    /// start the participant fetch.
    pub(crate) fn open_current_activity(&mut self) -> Option<(u64, Activity)> {
        let activity = self.activities.get(self.activity_list_index).cloned()?;

        self.selection_seq += 1;
        self.selected_activity = Some(activity.clone());
        self.participants.clear();
        self.participant_list_index = 0;
        self.toggled_participants.clear();
        self.loading_participants = true;
        self.screen = Screen::ActivityDetail;

        Some((self.selection_seq, activity))
    }

    pub(crate) fn close_detail(&mut self) {
        self.screen = Screen::ActivityList;
        self.selected_activity = None;
        self.participants.clear();
        self.participant_list_index = 0;
        self.toggled_participants.clear();
        self.loading_participants = false;
    }

    /// Commit a finished participant fetch if its selection is still the
    /// one on screen; late results for superseded selections are dropped.
    pub(crate) fn commit_participants(&mut self, seq: u64, names: Vec<String>) {
        if seq != self.selection_seq || self.selected_activity.is_none() {
            return;
        }
        self.participants = names;
        self.participant_list_index = 0;
        self.loading_participants = false;
    }

    /// Toggle the highlighted participant in the per-view toggle set.
    pub(crate) fn toggle_current_participant(&mut self) {
        let Some(name) = self.participants.get(self.participant_list_index) else {
            return;
        };
        if !self.toggled_participants.remove(name) {
            self.toggled_participants.insert(name.clone());
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pista_core::model::{Capacity, FacilityId};

    use super::*;

    fn activity(name: &str) -> Activity {
        let day = NaiveDate::from_ymd_opt(2031, 3, 10).expect("valid date");
        Activity {
            facility: FacilityId(1),
            facility_name: name.to_owned(),
            start: day.and_hms_opt(18, 0, 0).expect("valid time"),
            end: day.and_hms_opt(19, 0, 0).expect("valid time"),
            capacity: Capacity { free: 2, total: 10 },
        }
    }

    #[test]
    fn stale_participant_results_are_dropped() {
        let mut app = App::new();
        app.apply_snapshot(vec![activity("Padel 1"), activity("Padel 2")].into());

        let (first_seq, _) = app.open_current_activity().expect("activity selected");
        app.close_detail();
        app.activity_list_index = 1;
        let (second_seq, _) = app.open_current_activity().expect("activity selected");

        // The fetch for the first selection finishes late.
        app.commit_participants(first_seq, vec!["old booking".to_owned()]);
        assert!(app.participants.is_empty(), "stale result must not land");
        assert!(app.loading_participants);

        app.commit_participants(second_seq, vec!["ANA LOPEZ".to_owned()]);
        assert_eq!(app.participants, vec!["ANA LOPEZ"]);
        assert!(!app.loading_participants);
    }

    #[test]
    fn reopening_resets_the_toggle_set() {
        let mut app = App::new();
        app.apply_snapshot(vec![activity("Padel 1")].into());

        let (seq, _) = app.open_current_activity().expect("activity selected");
        app.commit_participants(seq, vec!["ana".to_owned()]);
        app.toggle_current_participant();
        assert!(app.toggled_participants.contains("ana"));

        app.close_detail();
        app.open_current_activity().expect("activity selected");
        assert!(app.toggled_participants.is_empty());
        assert!(app.participants.is_empty());
    }

    #[test]
    fn toggling_twice_clears_the_mark() {
        let mut app = App::new();
        app.apply_snapshot(vec![activity("Padel 1")].into());
        let (seq, _) = app.open_current_activity().expect("activity selected");
        app.commit_participants(seq, vec!["ana".to_owned(), "luis".to_owned()]);

        app.participant_list_index = 1;
        app.toggle_current_participant();
        app.toggle_current_participant();
        assert!(app.toggled_participants.is_empty());
    }

    #[test]
    fn snapshot_shrink_clamps_the_cursor() {
        let mut app = App::new();
        app.apply_snapshot(vec![activity("A"), activity("B"), activity("C")].into());
        app.activity_list_index = 2;

        app.apply_snapshot(vec![activity("A")].into());
        assert_eq!(app.activity_list_index, 0);
    }
}
