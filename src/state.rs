use std::collections::VecDeque;
use std::mem;
use std::path::Path;
use std::time::Duration;

use chrono::Local;

use crate::fixtures::{AnalysisRecord, BadPoint, FixtureSet, Player};
use crate::video::{VideoError, VideoLibrary, VideoRef};

pub const ANALYSIS_READY_MESSAGE: &str = "This is an MVP. Video analysis functionality is not yet implemented. You can now label the player and add your notes based on the AI analysis.";
pub const ANALYSIS_SAVED_MESSAGE: &str = "Analysis saved successfully!";

/// What the simulated AI hands back after an analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftResult {
    pub overall_summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<BadPoint>,
    pub drills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    Player,
    CoachNote,
    CorrectionNote,
    Save,
}

impl ReviewField {
    pub fn next(self) -> Self {
        match self {
            ReviewField::Player => ReviewField::CoachNote,
            ReviewField::CoachNote => ReviewField::CorrectionNote,
            ReviewField::CorrectionNote => ReviewField::Save,
            ReviewField::Save => ReviewField::Player,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ReviewField::Player => ReviewField::Save,
            ReviewField::CoachNote => ReviewField::Player,
            ReviewField::CorrectionNote => ReviewField::CoachNote,
            ReviewField::Save => ReviewField::CorrectionNote,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, ReviewField::CoachNote | ReviewField::CorrectionNote)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingReview {
    pub draft: DraftResult,
    pub assigned_player: Option<Player>,
    pub coach_note: String,
    pub correction_note: String,
    pub focus: ReviewField,
}

impl PendingReview {
    pub fn new(draft: DraftResult) -> Self {
        Self {
            draft,
            assigned_player: None,
            coach_note: String::new(),
            correction_note: String::new(),
            focus: ReviewField::Player,
        }
    }

    pub fn can_save(&self) -> bool {
        self.assigned_player.is_some() && !self.correction_note.is_empty()
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            ReviewField::CoachNote => Some(&mut self.coach_note),
            ReviewField::CorrectionNote => Some(&mut self.correction_note),
            ReviewField::Player | ReviewField::Save => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Analyzing { job: u64 },
}

#[derive(Debug)]
pub struct UploadView {
    pub video: Option<VideoRef>,
    pub phase: AnalysisPhase,
    pub draft: Option<DraftResult>,
    /// Path being typed in place of a file picker.
    pub path_prompt: Option<String>,
}

impl UploadView {
    pub fn idle() -> Self {
        Self {
            video: None,
            phase: AnalysisPhase::Idle,
            draft: None,
            path_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceView {
    pub player_id: u32,
    /// Index into the player's history; never points outside it.
    pub record: Option<usize>,
}

#[derive(Debug)]
pub enum Screen {
    Onboarding,
    Upload(UploadView),
    Review(PendingReview),
    TeamList { selected: usize },
    PlayerPerformance(PerformanceView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Onboarding,
    Upload,
    Review,
    TeamList,
    PlayerPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTab {
    Upload,
    Team,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub modal: Option<String>,
    pub fixtures: FixtureSet,
    pub videos: VideoLibrary,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    last_job: u64,
    cancelled_jobs: Vec<u64>,
}

#[derive(Debug, Clone)]
pub enum Delta {
    AnalysisReady { job: u64, draft: DraftResult },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    StartAnalysis { job: u64, delay: Duration },
    CancelAnalysis { job: u64 },
}

impl AppState {
    pub fn new(fixtures: FixtureSet) -> Self {
        Self {
            screen: Screen::Onboarding,
            modal: None,
            fixtures,
            videos: VideoLibrary::new(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            last_job: 0,
            cancelled_jobs: Vec::new(),
        }
    }

    pub fn screen_kind(&self) -> ScreenKind {
        match &self.screen {
            Screen::Onboarding => ScreenKind::Onboarding,
            Screen::Upload(_) => ScreenKind::Upload,
            Screen::Review(_) => ScreenKind::Review,
            Screen::TeamList { .. } => ScreenKind::TeamList,
            Screen::PlayerPerformance(_) => ScreenKind::PlayerPerformance,
        }
    }

    /// Highlighted bottom-nav tab. Review highlights nothing.
    pub fn active_tab(&self) -> Option<NavTab> {
        match &self.screen {
            Screen::Upload(_) => Some(NavTab::Upload),
            Screen::TeamList { .. } | Screen::PlayerPerformance(_) => Some(NavTab::Team),
            Screen::Onboarding | Screen::Review(_) => None,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn modal_message(&self) -> Option<&str> {
        self.modal.as_deref()
    }

    pub fn upload_view(&self) -> Option<&UploadView> {
        match &self.screen {
            Screen::Upload(view) => Some(view),
            _ => None,
        }
    }

    pub fn uploaded_video(&self) -> Option<&VideoRef> {
        self.upload_view().and_then(|view| view.video.as_ref())
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(
            self.upload_view().map(|view| view.phase),
            Some(AnalysisPhase::Analyzing { .. })
        )
    }

    pub fn draft_result(&self) -> Option<&DraftResult> {
        self.upload_view().and_then(|view| view.draft.as_ref())
    }

    pub fn pending_review(&self) -> Option<&PendingReview> {
        match &self.screen {
            Screen::Review(review) => Some(review),
            _ => None,
        }
    }

    pub fn selected_player_id(&self) -> Option<u32> {
        match &self.screen {
            Screen::PlayerPerformance(view) => Some(view.player_id),
            _ => None,
        }
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.selected_player_id()
            .and_then(|id| self.fixtures.player(id))
    }

    pub fn selected_record_index(&self) -> Option<usize> {
        match &self.screen {
            Screen::PlayerPerformance(view) => view.record,
            _ => None,
        }
    }

    pub fn selected_analysis(&self) -> Option<&AnalysisRecord> {
        let Screen::PlayerPerformance(view) = &self.screen else {
            return None;
        };
        view.record
            .and_then(|idx| self.fixtures.records(view.player_id).get(idx))
    }

    /// False for unknown players and players with an empty history.
    pub fn has_performance_data(&self) -> bool {
        let Some(id) = self.selected_player_id() else {
            return false;
        };
        self.fixtures.player(id).is_some() && !self.fixtures.records(id).is_empty()
    }

    pub fn roster_cursor(&self) -> Option<usize> {
        match &self.screen {
            Screen::TeamList { selected } => Some(*selected),
            _ => None,
        }
    }

    /// Job ids abandoned since the last call; the worker should drop them.
    pub fn drain_cancelled_jobs(&mut self) -> Vec<u64> {
        mem::take(&mut self.cancelled_jobs)
    }

    pub fn is_text_input_active(&self) -> bool {
        match &self.screen {
            Screen::Upload(view) => view.path_prompt.is_some(),
            Screen::Review(review) => review.focus.is_text(),
            _ => false,
        }
    }

    pub fn start(&mut self) {
        if matches!(self.screen, Screen::Onboarding) {
            self.screen = Screen::Upload(UploadView::idle());
            self.push_log("[INFO] Session started");
        }
    }

    /// Swap in `next` and release whatever the old screen held.
    fn replace_screen(&mut self, next: Screen) {
        let old = mem::replace(&mut self.screen, next);
        if let Screen::Upload(view) = old {
            if let AnalysisPhase::Analyzing { job } = view.phase {
                self.cancelled_jobs.push(job);
                self.push_log(format!("[INFO] Analysis job {job} cancelled"));
            }
            if let Some(video) = view.video {
                self.videos.revoke(video);
            }
        }
    }

    pub fn navigate(&mut self, tab: NavTab) {
        match (self.screen_kind(), tab) {
            (ScreenKind::Onboarding, _) => {}
            (ScreenKind::Upload, NavTab::Upload) => {}
            (ScreenKind::TeamList, NavTab::Team) => {}
            (_, NavTab::Upload) => self.replace_screen(Screen::Upload(UploadView::idle())),
            (_, NavTab::Team) => self.replace_screen(Screen::TeamList { selected: 0 }),
        }
    }

    pub fn open_path_prompt(&mut self) {
        if let Screen::Upload(view) = &mut self.screen
            && view.phase == AnalysisPhase::Idle
        {
            view.path_prompt = Some(String::new());
        }
    }

    pub fn close_path_prompt(&mut self) {
        if let Screen::Upload(view) = &mut self.screen {
            view.path_prompt = None;
        }
    }

    pub fn path_prompt_push(&mut self, ch: char) {
        if let Screen::Upload(view) = &mut self.screen
            && let Some(prompt) = view.path_prompt.as_mut()
        {
            prompt.push(ch);
        }
    }

    pub fn path_prompt_pop(&mut self) {
        if let Screen::Upload(view) = &mut self.screen
            && let Some(prompt) = view.path_prompt.as_mut()
        {
            prompt.pop();
        }
    }

    /// Attach the typed path. Failures are logged and the prompt stays open.
    pub fn submit_path_prompt(&mut self) -> bool {
        let Some(raw) = self
            .upload_view()
            .and_then(|view| view.path_prompt.clone())
        else {
            return false;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.close_path_prompt();
            return false;
        }
        match self.attach_video(Path::new(trimmed)) {
            Ok(attached) => {
                self.close_path_prompt();
                attached
            }
            Err(err) => {
                self.push_log(format!("[WARN] Video not attached: {err}"));
                false
            }
        }
    }

    /// Attach a video on an idle Upload screen, revoking the one it replaces.
    /// Returns Ok(false) when the screen does not accept videos right now.
    pub fn attach_video(&mut self, path: &Path) -> Result<bool, VideoError> {
        let accepts = matches!(
            &self.screen,
            Screen::Upload(view) if view.phase == AnalysisPhase::Idle
        );
        if !accepts {
            return Ok(false);
        }
        let video = self.videos.open(path)?;
        let label = format!("[INFO] Video attached: {} ({})", video.name, video.size_label());
        if let Screen::Upload(view) = &mut self.screen
            && let Some(old) = view.video.replace(video)
        {
            self.videos.revoke(old);
        }
        self.push_log(label);
        Ok(true)
    }

    /// Start a simulated analysis. Returns the job id the worker should run.
    pub fn begin_analysis(&mut self) -> Option<u64> {
        let Screen::Upload(view) = &mut self.screen else {
            return None;
        };
        if view.phase != AnalysisPhase::Idle {
            return None;
        }
        self.last_job += 1;
        let job = self.last_job;
        view.phase = AnalysisPhase::Analyzing { job };
        view.draft = None;
        view.path_prompt = None;
        // The run is simulated; the attached video is not used.
        if let Some(video) = view.video.take() {
            self.videos.revoke(video);
        }
        self.push_log(format!("[INFO] Analysis job {job} started"));
        Some(job)
    }

    fn finish_analysis(&mut self, job: u64, draft: DraftResult) -> bool {
        let Screen::Upload(view) = &mut self.screen else {
            return false;
        };
        if view.phase != (AnalysisPhase::Analyzing { job }) {
            return false;
        }
        view.phase = AnalysisPhase::Idle;
        view.draft = Some(draft);
        self.modal = Some(ANALYSIS_READY_MESSAGE.to_string());
        true
    }

    /// Close the modal; a waiting draft moves the user on to Review.
    pub fn dismiss_modal(&mut self) {
        if self.modal.take().is_none() {
            return;
        }
        let draft = match &mut self.screen {
            Screen::Upload(view) => view.draft.take(),
            _ => None,
        };
        if let Some(draft) = draft {
            self.replace_screen(Screen::Review(PendingReview::new(draft)));
        }
    }

    pub fn review_mut(&mut self) -> Option<&mut PendingReview> {
        match &mut self.screen {
            Screen::Review(review) => Some(review),
            _ => None,
        }
    }

    pub fn assign_player(&mut self, player_id: u32) -> bool {
        let Some(player) = self.fixtures.player(player_id).cloned() else {
            return false;
        };
        match self.review_mut() {
            Some(review) => {
                review.assigned_player = Some(player);
                true
            }
            None => false,
        }
    }

    /// Step the player picker through the roster, wrapping at either end.
    pub fn cycle_review_player(&mut self, forward: bool) {
        let roster_len = self.fixtures.players.len();
        if roster_len == 0 {
            return;
        }
        let Screen::Review(review) = &mut self.screen else {
            return;
        };
        let current = review
            .assigned_player
            .as_ref()
            .and_then(|p| self.fixtures.players.iter().position(|r| r.id == p.id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => roster_len - 1,
            (Some(idx), true) => (idx + 1) % roster_len,
            (Some(idx), false) => (idx + roster_len - 1) % roster_len,
        };
        review.assigned_player = self.fixtures.players.get(next).cloned();
    }

    pub fn set_coach_note(&mut self, note: impl Into<String>) {
        if let Some(review) = self.review_mut() {
            review.coach_note = note.into();
        }
    }

    pub fn set_correction_note(&mut self, note: impl Into<String>) {
        if let Some(review) = self.review_mut() {
            review.correction_note = note.into();
        }
    }

    pub fn focus_next_field(&mut self) {
        if let Some(review) = self.review_mut() {
            review.focus = review.focus.next();
        }
    }

    pub fn focus_prev_field(&mut self) {
        if let Some(review) = self.review_mut() {
            review.focus = review.focus.prev();
        }
    }

    /// Type into the focused note. Returns false if no note has focus.
    pub fn review_type_char(&mut self, ch: char) -> bool {
        match self.review_mut().and_then(|r| r.focused_text_mut()) {
            Some(text) => {
                text.push(ch);
                true
            }
            None => false,
        }
    }

    pub fn review_backspace(&mut self) -> bool {
        match self.review_mut().and_then(|r| r.focused_text_mut()) {
            Some(text) => {
                text.pop();
                true
            }
            None => false,
        }
    }

    pub fn can_save(&self) -> bool {
        self.pending_review().is_some_and(PendingReview::can_save)
    }

    /// Save the review and return to Upload. Does nothing (and returns
    /// false) until a player and a correction note are present.
    pub fn save_review(&mut self) -> bool {
        if !self.can_save() {
            return false;
        }
        let player = self
            .pending_review()
            .and_then(|r| r.assigned_player.as_ref())
            .map(|p| p.name.clone())
            .unwrap_or_default();
        self.replace_screen(Screen::Upload(UploadView::idle()));
        self.modal = Some(ANALYSIS_SAVED_MESSAGE.to_string());
        self.push_log(format!(
            "[INFO] Review saved for {player} at {}",
            Local::now().format("%H:%M:%S")
        ));
        true
    }

    pub fn cancel_review(&mut self) {
        if matches!(self.screen, Screen::Review(_)) {
            self.replace_screen(Screen::Upload(UploadView::idle()));
            self.push_log("[INFO] Review discarded");
        }
    }

    /// Open a player's performance view, pre-selecting the first record.
    pub fn open_player(&mut self, player_id: u32) {
        if !matches!(self.screen, Screen::TeamList { .. }) {
            return;
        }
        let record = if self.fixtures.records(player_id).is_empty() {
            None
        } else {
            Some(0)
        };
        self.replace_screen(Screen::PlayerPerformance(PerformanceView { player_id, record }));
    }

    pub fn open_selected_player(&mut self) {
        let Some(cursor) = self.roster_cursor() else {
            return;
        };
        if let Some(id) = self.fixtures.players.get(cursor).map(|p| p.id) {
            self.open_player(id);
        }
    }

    pub fn select_record(&mut self, index: usize) {
        let Screen::PlayerPerformance(view) = &mut self.screen else {
            return;
        };
        if index < self.fixtures.records(view.player_id).len() {
            view.record = Some(index);
        }
    }

    pub fn back(&mut self) {
        match self.screen_kind() {
            ScreenKind::PlayerPerformance => self.replace_screen(Screen::TeamList { selected: 0 }),
            ScreenKind::Review => self.cancel_review(),
            _ => {}
        }
    }

    pub fn select_next(&mut self) {
        match &mut self.screen {
            Screen::TeamList { selected } => {
                let total = self.fixtures.players.len();
                *selected = if total == 0 { 0 } else { (*selected + 1) % total };
            }
            Screen::PlayerPerformance(view) => {
                let total = self.fixtures.records(view.player_id).len();
                if total > 0 {
                    view.record = Some(view.record.map_or(0, |idx| (idx + 1) % total));
                }
            }
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match &mut self.screen {
            Screen::TeamList { selected } => {
                let total = self.fixtures.players.len();
                *selected = if total == 0 {
                    0
                } else if *selected == 0 {
                    total - 1
                } else {
                    *selected - 1
                };
            }
            Screen::PlayerPerformance(view) => {
                let total = self.fixtures.records(view.player_id).len();
                if total > 0 {
                    view.record = Some(view.record.map_or(0, |idx| (idx + total - 1) % total));
                }
            }
            _ => {}
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::AnalysisReady { job, draft } => {
            if state.finish_analysis(job, draft) {
                state.push_log(format!("[INFO] Analysis job {job} finished"));
            } else {
                state.push_log(format!("[INFO] Dropped stale result for analysis job {job}"));
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn screen_label(kind: ScreenKind) -> &'static str {
    match kind {
        ScreenKind::Onboarding => "WELCOME",
        ScreenKind::Upload => "UPLOAD",
        ScreenKind::Review => "REVIEW & LABEL",
        ScreenKind::TeamList => "TEAM",
        ScreenKind::PlayerPerformance => "PERFORMANCE",
    }
}
