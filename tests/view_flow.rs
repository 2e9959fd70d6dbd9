use std::io::Write;

use tempfile::NamedTempFile;

use padel_analyst::fixtures::{AnalysisRecord, FixtureSet, Player, PlayerHistory};
use padel_analyst::mock_analyst::mock_draft_result;
use padel_analyst::state::{
    ANALYSIS_READY_MESSAGE, ANALYSIS_SAVED_MESSAGE, AppState, Delta, NavTab, ReviewField,
    ScreenKind, apply_delta,
};
use padel_analyst::video::VideoError;

fn record(summary: &str, date: &str) -> AnalysisRecord {
    AnalysisRecord {
        date: date.to_string(),
        summary: summary.to_string(),
        stats: vec![
            ("Serve".to_string(), 70.0),
            ("Volley".to_string(), 60.0),
            ("Footwork".to_string(), 80.0),
        ],
        good_points: Vec::new(),
        bad_points: Vec::new(),
        improved_points: Vec::new(),
        coach_notes: String::new(),
    }
}

fn ann_and_bob() -> FixtureSet {
    FixtureSet {
        players: vec![
            Player {
                id: 1,
                name: "Ann".to_string(),
                sport: "Padel".to_string(),
            },
            Player {
                id: 2,
                name: "Bob".to_string(),
                sport: "Padel".to_string(),
            },
        ],
        histories: vec![
            PlayerHistory {
                player_id: 1,
                records: vec![
                    record("Smash Analysis", "2024-03-02"),
                    record("Lob Analysis", "2024-02-20"),
                ],
            },
            PlayerHistory {
                player_id: 2,
                records: Vec::new(),
            },
        ],
    }
}

fn started() -> AppState {
    let mut state = AppState::new(ann_and_bob());
    state.start();
    state
}

fn in_review() -> AppState {
    let mut state = started();
    let job = state.begin_analysis().expect("analysis should start");
    apply_delta(
        &mut state,
        Delta::AnalysisReady {
            job,
            draft: mock_draft_result(),
        },
    );
    state.dismiss_modal();
    assert_eq!(state.screen_kind(), ScreenKind::Review);
    state
}

fn temp_file(prefix: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile()
        .expect("temp file should be creatable");
    file.write_all(b"not really a video")
        .expect("temp file should be writable");
    file
}

#[test]
fn onboarding_is_left_once_and_ignores_navigation() {
    let mut state = AppState::new(ann_and_bob());
    assert_eq!(state.screen_kind(), ScreenKind::Onboarding);
    state.navigate(NavTab::Team);
    assert_eq!(state.screen_kind(), ScreenKind::Onboarding);

    state.start();
    assert_eq!(state.screen_kind(), ScreenKind::Upload);
    state.navigate(NavTab::Team);
    state.start();
    assert_eq!(state.screen_kind(), ScreenKind::TeamList);
}

#[test]
fn player_without_history_shows_no_data_and_first_record_is_auto_selected() {
    let mut state = started();
    state.navigate(NavTab::Team);

    state.open_player(2);
    assert_eq!(state.screen_kind(), ScreenKind::PlayerPerformance);
    assert_eq!(state.selected_player_id(), Some(2));
    assert!(!state.has_performance_data());
    assert!(state.selected_analysis().is_none());

    state.back();
    assert_eq!(state.screen_kind(), ScreenKind::TeamList);
    assert!(state.selected_player_id().is_none());

    state.open_player(1);
    assert!(state.has_performance_data());
    let picked = state.selected_analysis().expect("first record should be selected");
    assert_eq!(picked.summary, "Smash Analysis");
}

#[test]
fn unknown_player_is_an_empty_state() {
    let mut state = started();
    state.navigate(NavTab::Team);
    state.open_player(99);
    assert_eq!(state.screen_kind(), ScreenKind::PlayerPerformance);
    assert!(!state.has_performance_data());
    assert!(state.selected_analysis().is_none());
}

#[test]
fn selecting_records_stays_inside_the_players_history() {
    let mut state = started();
    state.navigate(NavTab::Team);
    state.open_player(1);

    state.select_record(1);
    assert_eq!(state.screen_kind(), ScreenKind::PlayerPerformance);
    assert_eq!(state.selected_analysis().map(|r| r.summary.as_str()), Some("Lob Analysis"));

    state.select_record(5);
    assert_eq!(state.selected_record_index(), Some(1));

    state.select_next();
    assert_eq!(state.selected_record_index(), Some(0));
    state.select_prev();
    assert_eq!(state.selected_record_index(), Some(1));

    state.back();
    assert!(state.selected_analysis().is_none());
}

#[test]
fn roster_cursor_opens_the_highlighted_player() {
    let mut state = started();
    state.navigate(NavTab::Team);
    assert_eq!(state.roster_cursor(), Some(0));
    state.select_prev();
    assert_eq!(state.roster_cursor(), Some(1));
    state.open_selected_player();
    assert_eq!(state.selected_player().map(|p| p.name.as_str()), Some("Bob"));
}

#[test]
fn analysis_completes_and_modal_leads_to_review() {
    let mut state = started();
    assert!(!state.is_analyzing());

    let job = state.begin_analysis().expect("analysis should start");
    assert!(state.is_analyzing());
    assert!(state.begin_analysis().is_none());

    let draft = mock_draft_result();
    apply_delta(
        &mut state,
        Delta::AnalysisReady {
            job,
            draft: draft.clone(),
        },
    );
    assert!(!state.is_analyzing());
    assert_eq!(state.draft_result(), Some(&draft));
    assert_eq!(state.modal_message(), Some(ANALYSIS_READY_MESSAGE));
    assert_eq!(state.screen_kind(), ScreenKind::Upload);

    state.dismiss_modal();
    assert!(state.modal_message().is_none());
    assert_eq!(state.screen_kind(), ScreenKind::Review);
    let review = state.pending_review().expect("review should exist");
    assert_eq!(review.draft, draft);
    assert!(review.assigned_player.is_none());
}

#[test]
fn result_for_another_job_is_ignored() {
    let mut state = started();
    let job = state.begin_analysis().unwrap();
    apply_delta(
        &mut state,
        Delta::AnalysisReady {
            job: job + 1,
            draft: mock_draft_result(),
        },
    );
    assert!(state.is_analyzing());
    assert!(state.modal_message().is_none());
}

#[test]
fn navigating_away_cancels_the_running_job() {
    let mut state = started();
    let job = state.begin_analysis().unwrap();

    state.navigate(NavTab::Team);
    assert_eq!(state.drain_cancelled_jobs(), vec![job]);
    assert!(state.drain_cancelled_jobs().is_empty());

    state.navigate(NavTab::Upload);
    apply_delta(
        &mut state,
        Delta::AnalysisReady {
            job,
            draft: mock_draft_result(),
        },
    );
    assert!(!state.is_analyzing());
    assert!(state.draft_result().is_none());
    assert!(state.modal_message().is_none());
}

#[test]
fn save_is_gated_on_player_and_correction_note() {
    let mut state = in_review();

    assert!(!state.can_save());
    assert!(!state.save_review());
    assert_eq!(state.screen_kind(), ScreenKind::Review);

    assert!(state.assign_player(1));
    assert!(!state.can_save());
    assert!(!state.save_review());

    state.set_correction_note("Forehand needs more wrist action.");
    assert!(state.can_save());
    assert!(state.save_review());

    assert_eq!(state.screen_kind(), ScreenKind::Upload);
    assert!(state.pending_review().is_none());
    assert!(state.draft_result().is_none());
    assert!(state.uploaded_video().is_none());
    assert!(!state.is_analyzing());
    assert_eq!(state.modal_message(), Some(ANALYSIS_SAVED_MESSAGE));

    state.dismiss_modal();
    assert_eq!(state.screen_kind(), ScreenKind::Upload);
}

#[test]
fn correction_note_alone_does_not_enable_save() {
    let mut state = in_review();
    state.set_correction_note("note");
    assert!(!state.can_save());
    assert!(!state.assign_player(42));
    assert!(!state.can_save());
}

#[test]
fn cancel_and_navigation_discard_the_review() {
    let mut state = in_review();
    state.assign_player(2);
    state.cancel_review();
    assert_eq!(state.screen_kind(), ScreenKind::Upload);
    assert!(state.pending_review().is_none());

    let mut state = in_review();
    state.navigate(NavTab::Team);
    assert_eq!(state.screen_kind(), ScreenKind::TeamList);
    state.navigate(NavTab::Upload);
    assert!(state.pending_review().is_none());
    assert!(state.draft_result().is_none());
}

#[test]
fn review_fields_take_typed_text_only_when_focused() {
    let mut state = in_review();
    assert!(!state.review_type_char('x'));

    state.focus_next_field();
    assert_eq!(state.pending_review().unwrap().focus, ReviewField::CoachNote);
    assert!(state.is_text_input_active());
    for ch in "good".chars() {
        state.review_type_char(ch);
    }
    state.review_backspace();

    state.focus_next_field();
    state.review_type_char('!');

    let review = state.pending_review().unwrap();
    assert_eq!(review.coach_note, "goo");
    assert_eq!(review.correction_note, "!");

    state.focus_next_field();
    state.focus_next_field();
    assert_eq!(state.pending_review().unwrap().focus, ReviewField::Player);
    state.focus_prev_field();
    assert_eq!(state.pending_review().unwrap().focus, ReviewField::Save);
}

#[test]
fn player_picker_wraps_around_the_roster() {
    let mut state = in_review();
    state.cycle_review_player(false);
    assert_eq!(state.pending_review().unwrap().assigned_player.as_ref().unwrap().id, 2);
    state.cycle_review_player(true);
    assert_eq!(state.pending_review().unwrap().assigned_player.as_ref().unwrap().id, 1);
    state.cycle_review_player(true);
    assert_eq!(state.pending_review().unwrap().assigned_player.as_ref().unwrap().id, 2);
}

#[test]
fn active_tab_tracks_screen() {
    let mut state = AppState::new(ann_and_bob());
    assert_eq!(state.active_tab(), None);
    state.start();
    assert_eq!(state.active_tab(), Some(NavTab::Upload));
    state.navigate(NavTab::Team);
    assert_eq!(state.active_tab(), Some(NavTab::Team));
    state.open_player(1);
    assert_eq!(state.active_tab(), Some(NavTab::Team));

    let state = in_review();
    assert_eq!(state.active_tab(), None);
}

#[test]
fn video_handles_are_revoked_when_replaced_or_discarded() {
    let first = temp_file("first", ".mp4");
    let second = temp_file("second", ".MOV");

    let mut state = started();
    assert!(state.attach_video(first.path()).unwrap());
    assert_eq!(state.videos.live_handles(), 1);
    assert!(state.uploaded_video().unwrap().name.ends_with(".mp4"));

    assert!(state.attach_video(second.path()).unwrap());
    assert_eq!(state.videos.live_handles(), 1);
    assert!(state.uploaded_video().unwrap().name.ends_with(".MOV"));

    state.begin_analysis().unwrap();
    assert!(state.uploaded_video().is_none());
    assert_eq!(state.videos.live_handles(), 0);
    assert!(!state.attach_video(first.path()).unwrap());

    let mut state = started();
    state.attach_video(first.path()).unwrap();
    state.navigate(NavTab::Team);
    assert_eq!(state.videos.live_handles(), 0);
}

#[test]
fn non_video_files_are_refused() {
    let notes = temp_file("notes", ".txt");
    let mut state = started();
    let err = state.attach_video(notes.path()).unwrap_err();
    assert!(matches!(err, VideoError::UnsupportedType(ref ext) if ext == "txt"));
    assert!(state.uploaded_video().is_none());
    assert_eq!(state.videos.live_handles(), 0);
}

#[test]
fn path_prompt_attaches_typed_path() {
    let clip = temp_file("prompt", ".webm");
    let mut state = started();
    state.open_path_prompt();
    assert!(state.is_text_input_active());
    for ch in clip.path().display().to_string().chars() {
        state.path_prompt_push(ch);
    }
    assert!(state.submit_path_prompt());
    assert!(!state.is_text_input_active());
    assert!(state.uploaded_video().is_some());

    state.open_path_prompt();
    for ch in "/missing/clip.mp4".chars() {
        state.path_prompt_push(ch);
    }
    assert!(!state.submit_path_prompt());
    assert!(state.is_text_input_active());
    assert!(state.logs.back().unwrap().starts_with("[WARN]"));
}

#[test]
fn log_delta_lands_in_console() {
    let mut state = started();
    apply_delta(&mut state, Delta::Log("[INFO] hello".to_string()));
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] hello"));
}
