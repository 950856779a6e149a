use crate::{SessionSnapshot, UserNotice};

fn snapshot(prompt_index: usize, is_recording: bool) -> SessionSnapshot {
    SessionSnapshot {
        prompt_index,
        prompt_text: format!("Q{}", prompt_index),
        is_recording,
        can_advance: !is_recording,
        entries_recorded: 0,
    }
}

/// WHAT: Status label follows the capture screen's rules
/// WHY: Users rely on it to tell recording from between-question states
#[test]
fn given_snapshot_states_when_labelling_then_matches_screen_rules() {
    // Given/When/Then: Recording always wins
    assert_eq!(snapshot(0, true).status_label(), "recording");
    assert_eq!(snapshot(2, true).status_label(), "recording");

    // Given/When/Then: Idle past the first prompt invites the next question
    assert_eq!(snapshot(1, false).status_label(), "next question");

    // Given/When/Then: Idle on the first prompt shows nothing
    assert_eq!(snapshot(0, false).status_label(), "");
}

/// WHAT: Notices render user-facing messages
/// WHY: The permission alert must be explicit
#[test]
fn given_notices_when_displayed_then_messages_are_user_facing() {
    // Given: Each notice kind
    let denied = UserNotice::PermissionDenied;
    let lost = UserNotice::EntryNotSaved {
        audio_location: "file:///a.wav".to_string(),
    };

    // When/Then: Messages name the problem
    assert_eq!(
        denied.to_string(),
        "Permission to access microphone is required!"
    );
    assert!(lost.to_string().contains("file:///a.wav"));
}
