use crate::{
    CaptureTransition, CoreError, MemoryKeyValueStore, UserNotice,
    tests::support::{FakeAudio, ReadOnlyStore, controller_with},
};

use std::sync::atomic::Ordering;

/// WHAT: Two prompts, two recordings, one advance in between
/// WHY: Covers the full capture flow end to end
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_two_prompts_when_recording_each_then_two_entries_with_matching_prompts() {
    // Given: Prompts ["Q0", "Q1"] and a granted microphone
    let (mut controller, _notices) =
        controller_with(&["Q0", "Q1"], FakeAudio::granted(), MemoryKeyValueStore::new()).await;
    assert_eq!(controller.prompt_index(), 0);

    // When: Recording, advancing, recording again
    assert_eq!(
        controller.start_capture().await.unwrap(),
        CaptureTransition::Started
    );
    let first = controller.stop_capture().await.unwrap();
    assert!(controller.advance_prompt());
    assert_eq!(controller.prompt_index(), 1);
    controller.start_capture().await.unwrap();
    controller.stop_capture().await.unwrap();

    // Then: Two entries, tagged with the prompt active at capture time
    let entries = controller.journal().load_all().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].prompt_index(), 0);
    assert_eq!(entries[0].prompt_text(), "Q0");
    assert_eq!(entries[1].prompt_index(), 1);
    assert_eq!(entries[1].prompt_text(), "Q1");
    assert_eq!(first, CaptureTransition::Stopped(entries[0].clone()));
}

/// WHAT: Stopping while idle changes nothing
/// WHY: A stray stop must not append or release a non-existent resource
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_controller_when_stopping_then_ignored() {
    // Given: An idle controller
    let audio = FakeAudio::granted();
    let counters = audio.counters.clone();
    let (mut controller, _notices) =
        controller_with(&["Q0"], audio, MemoryKeyValueStore::new()).await;

    // When: Stopping
    let result = controller.stop_capture().await.unwrap();

    // Then: Ignored, nothing finalized, journal empty
    assert_eq!(result, CaptureTransition::Ignored);
    assert_eq!(counters.finalized(), 0);
    assert!(controller.journal().load_all().await.unwrap().is_empty());
}

/// WHAT: Starting while recording does not open a second resource
/// WHY: At most one capture handle may exist at a time
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_controller_when_starting_again_then_ignored() {
    // Given: A controller that is already recording
    let audio = FakeAudio::granted();
    let counters = audio.counters.clone();
    let (mut controller, _notices) =
        controller_with(&["Q0"], audio, MemoryKeyValueStore::new()).await;
    controller.start_capture().await.unwrap();

    // When: Starting again
    let result = controller.start_capture().await.unwrap();

    // Then: Ignored, only one handle ever opened
    assert_eq!(result, CaptureTransition::Ignored);
    assert_eq!(counters.begun(), 1);
    assert_eq!(counters.active(), 1);
}

/// WHAT: Any start/stop sequence keeps recording state and handles in step
/// WHY: Recording without a handle, or with two, must be impossible
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_mixed_start_stop_sequence_when_applied_then_handles_match_state() {
    // Given: A controller and an irregular command sequence
    let audio = FakeAudio::granted();
    let counters = audio.counters.clone();
    let (mut controller, _notices) =
        controller_with(&["Q0"], audio, MemoryKeyValueStore::new()).await;
    let sequence = [true, true, false, false, true, false, true, true, true, false, false];

    // When: Applying each command
    for start in sequence {
        if start {
            controller.start_capture().await.unwrap();
        } else {
            controller.stop_capture().await.unwrap();
        }

        // Then: Recording iff exactly one handle is live
        assert_eq!(controller.is_recording(), counters.active() == 1);
        assert!(counters.active() <= 1);
    }

    assert_eq!(counters.max_active(), 1);
    assert_eq!(counters.begun(), counters.finalized());
    assert_eq!(controller.journal().load_all().await.unwrap().len(), 3);
}

/// WHAT: Advancing while recording is refused
/// WHY: The prompt must not change under an in-progress answer
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_controller_when_advancing_then_pointer_unchanged() {
    // Given: A recording controller on the first of two prompts
    let (mut controller, _notices) =
        controller_with(&["Q0", "Q1"], FakeAudio::granted(), MemoryKeyValueStore::new()).await;
    controller.start_capture().await.unwrap();

    // When: Advancing
    let advanced = controller.advance_prompt();

    // Then: Nothing moves and the recording keeps its prompt
    assert!(!advanced);
    assert!(!controller.can_advance());
    assert_eq!(controller.prompt_index(), 0);

    let stopped = controller.stop_capture().await.unwrap();
    assert!(matches!(
        stopped,
        CaptureTransition::Stopped(ref entry) if entry.prompt_index() == 0
    ));
}

/// WHAT: Advancing at the last prompt is a no-op
/// WHY: The pointer is bounded by the prompt count
#[tokio::test]
async fn given_last_prompt_when_advancing_then_pointer_unchanged() {
    // Given: A controller already on its last prompt
    let (mut controller, _notices) =
        controller_with(&["Q0", "Q1"], FakeAudio::granted(), MemoryKeyValueStore::new()).await;
    assert!(controller.advance_prompt());

    // When: Advancing twice more
    let second = controller.advance_prompt();
    let third = controller.advance_prompt();

    // Then: Pointer stays on the last index
    assert!(!second);
    assert!(!third);
    assert_eq!(controller.prompt_index(), 1);
    assert_eq!(controller.current_prompt(), "Q1");
}

/// WHAT: Denied permission raises a notice and start fails cleanly
/// WHY: The user must be told, and the controller must stay usable
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_denied_permission_when_starting_then_error_and_idle() {
    // Given: A microphone that refuses access
    let (mut controller, mut notices) =
        controller_with(&["Q0"], FakeAudio::denied(), MemoryKeyValueStore::new()).await;

    // When: Requesting permission, then starting
    let granted = controller.request_capture_permission().await;
    let result = controller.start_capture().await;

    // Then: Denial notice, start failure, still idle
    assert!(!granted);
    assert_eq!(notices.try_recv().unwrap(), UserNotice::PermissionDenied);
    assert!(matches!(result, Err(CoreError::CaptureStartFailed { .. })));
    assert!(!controller.is_recording());
}

/// WHAT: A platform start failure leaves the controller idle
/// WHY: A failed start must not leave a half-open recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_microphone_when_starting_then_idle_with_notice() {
    // Given: A microphone whose next start fails
    let audio = FakeAudio::granted();
    audio.fail_begin.store(true, Ordering::SeqCst);
    let fail_begin = audio.fail_begin.clone();
    let (mut controller, mut notices) =
        controller_with(&["Q0"], audio, MemoryKeyValueStore::new()).await;

    // When: Starting
    let result = controller.start_capture().await;

    // Then: Error, idle, failure notice
    assert!(matches!(result, Err(CoreError::CaptureStartFailed { .. })));
    assert!(!controller.is_recording());
    assert!(matches!(
        notices.try_recv().unwrap(),
        UserNotice::CaptureFailed { .. }
    ));

    // And: A later start succeeds once the microphone recovers
    fail_begin.store(false, Ordering::SeqCst);
    assert_eq!(
        controller.start_capture().await.unwrap(),
        CaptureTransition::Started
    );
}

/// WHAT: A finalize failure still releases the handle and appends nothing
/// WHY: The resource must not leak on the stop failure path
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_finalize_when_stopping_then_released_and_no_entry() {
    // Given: A recording controller whose finalize will fail
    let audio = FakeAudio::granted();
    let counters = audio.counters.clone();
    audio.fail_finalize.store(true, Ordering::SeqCst);
    let (mut controller, _notices) =
        controller_with(&["Q0"], audio, MemoryKeyValueStore::new()).await;
    controller.start_capture().await.unwrap();

    // When: Stopping, then stopping again
    let first = controller.stop_capture().await;
    let second = controller.stop_capture().await.unwrap();

    // Then: Error once, handle released exactly once, journal empty
    assert!(matches!(first, Err(CoreError::CaptureStopFailed { .. })));
    assert_eq!(second, CaptureTransition::Ignored);
    assert!(!controller.is_recording());
    assert_eq!(counters.active(), 0);
    assert_eq!(counters.finalized(), 1);
    assert!(controller.journal().load_all().await.unwrap().is_empty());
}

/// WHAT: A failed journal write names the orphaned recording
/// WHY: The audio exists even though the journal lost track of it
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_store_when_stopping_then_entry_not_saved_notice() {
    // Given: A recording controller backed by a store that rejects writes
    let audio = FakeAudio::granted();
    let counters = audio.counters.clone();
    let (mut controller, mut notices) =
        controller_with(&["Q0"], audio, ReadOnlyStore::default()).await;
    controller.start_capture().await.unwrap();

    // When: Stopping
    let result = controller.stop_capture().await;

    // Then: Write error, idle, resource released, notice carries the location
    assert!(matches!(
        result,
        Err(CoreError::PersistenceWriteFailed { .. })
    ));
    assert!(!controller.is_recording());
    assert_eq!(counters.active(), 0);
    assert_eq!(
        notices.try_recv().unwrap(),
        UserNotice::EntryNotSaved {
            audio_location: "file:///recordings/0.m4a".to_string()
        }
    );
    assert_eq!(controller.snapshot().entries_recorded, 0);
}

/// WHAT: Audio mode is configured once at construction only
/// WHY: Mode setup is process-wide and must not repeat per recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_multiple_recordings_when_capturing_then_mode_configured_once() {
    // Given: A freshly constructed controller
    let audio = FakeAudio::granted();
    let counters = audio.counters.clone();
    let (mut controller, _notices) =
        controller_with(&["Q0"], audio, MemoryKeyValueStore::new()).await;
    assert_eq!(counters.mode_calls(), 1);

    // When: Recording twice
    for _ in 0..2 {
        controller.start_capture().await.unwrap();
        controller.stop_capture().await.unwrap();
    }

    // Then: Still a single mode setup
    assert_eq!(counters.mode_calls(), 1);
}

/// WHAT: Subscribers see every state change
/// WHY: The UI renders only from published snapshots
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_subscriber_when_state_changes_then_snapshot_updated() {
    // Given: A subscribed UI on a two-prompt controller
    let (mut controller, _notices) =
        controller_with(&["Q0", "Q1"], FakeAudio::granted(), MemoryKeyValueStore::new()).await;
    let rx = controller.subscribe();
    assert_eq!(rx.borrow().prompt_text, "Q0");
    assert!(rx.borrow().can_advance);

    // When/Then: Recording is visible and blocks advancing
    controller.start_capture().await.unwrap();
    assert!(rx.borrow().is_recording);
    assert!(!rx.borrow().can_advance);

    // When/Then: Stopping shows the saved entry
    controller.stop_capture().await.unwrap();
    assert!(!rx.borrow().is_recording);
    assert_eq!(rx.borrow().entries_recorded, 1);

    // When/Then: Advancing shows the last prompt
    controller.advance_prompt();
    let snapshot = rx.borrow().clone();
    assert_eq!(snapshot.prompt_index, 1);
    assert_eq!(snapshot.prompt_text, "Q1");
    assert!(!snapshot.can_advance);
}

/// WHAT: Toggle alternates between start and stop
/// WHY: The microphone button is a single toggle
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_controller_when_toggling_twice_then_one_entry() {
    // Given: An idle controller
    let (mut controller, _notices) =
        controller_with(&["Q0"], FakeAudio::granted(), MemoryKeyValueStore::new()).await;

    // When: Toggling twice
    let first = controller.toggle_capture().await.unwrap();
    let second = controller.toggle_capture().await.unwrap();

    // Then: Started, then stopped with a saved entry
    assert_eq!(first, CaptureTransition::Started);
    assert!(matches!(second, CaptureTransition::Stopped(_)));
    assert_eq!(controller.journal().load_all().await.unwrap().len(), 1);
}

/// WHAT: Shutdown while recording finishes and saves the capture
/// WHY: The resource must be released on process exit
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_controller_when_shutting_down_then_entry_saved() {
    // Given: A recording controller
    let audio = FakeAudio::granted();
    let counters = audio.counters.clone();
    let (mut controller, _notices) =
        controller_with(&["Q0"], audio, MemoryKeyValueStore::new()).await;
    controller.start_capture().await.unwrap();

    // When: Shutting down
    controller.shutdown().await.unwrap();

    // Then: Idle, released, and the answer is in the journal
    assert!(!controller.is_recording());
    assert_eq!(counters.active(), 0);
    assert_eq!(controller.journal().load_all().await.unwrap().len(), 1);
}
