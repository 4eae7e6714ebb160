//! Integration tests for focus trapping and restoration.

mod common;

use common::{DIALOG, Harness, button};
use nibble_a11y::{
    Announcer, ElementId, FocusConfig, FocusTrapSession, Key, KeyInput, KeyOutcome, MemoryLiveRegion,
    SessionState,
};

fn trap(harness: &Harness, options: FocusConfig) -> FocusTrapSession {
    FocusTrapSession::new(DIALOG, harness.shared_host(), harness.scheduler.clone(), options)
}

fn auto_focus() -> FocusConfig {
    FocusConfig {
        auto_focus: true,
        ..FocusConfig::default()
    }
}

#[test]
fn test_tab_wraps_from_last_to_first() {
    let harness = Harness::with_buttons(&[1, 2, 3]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    harness.set_active(3);
    let outcome = session.handle_key(KeyInput::new(Key::Tab));
    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(harness.active(), Some(ElementId(1)));
}

#[test]
fn test_shift_tab_wraps_from_first_to_last() {
    let harness = Harness::with_buttons(&[1, 2, 3]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    harness.set_active(1);
    let outcome = session.handle_key(KeyInput::shifted(Key::Tab));
    assert!(outcome.is_handled());
    assert_eq!(harness.active(), Some(ElementId(3)));
}

#[test]
fn test_tab_inside_sequence_is_left_to_the_browser() {
    let harness = Harness::with_buttons(&[1, 2, 3]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    harness.set_active(2);
    assert_eq!(session.handle_key(KeyInput::new(Key::Tab)), KeyOutcome::Ignored);
    assert_eq!(session.handle_key(KeyInput::shifted(Key::Tab)), KeyOutcome::Ignored);
    assert_eq!(harness.active(), Some(ElementId(2)));
}

#[test]
fn test_tab_from_outside_enters_the_region() {
    let harness = Harness::with_buttons(&[1, 2, 3]);
    let session = trap(&harness, FocusConfig::default());
    harness.set_active(42);
    session.activate();

    assert!(session.handle_key(KeyInput::new(Key::Tab)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(1)));

    harness.set_active(42);
    assert!(session.handle_key(KeyInput::shifted(Key::Tab)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(3)));
}

#[test]
fn test_trap_disabled_lets_tab_through() {
    let harness = Harness::with_buttons(&[1, 2]);
    let session = trap(
        &harness,
        FocusConfig {
            trap_focus: false,
            ..FocusConfig::default()
        },
    );
    session.activate();
    harness.set_active(2);
    assert_eq!(session.handle_key(KeyInput::new(Key::Tab)), KeyOutcome::Ignored);
}

#[test]
fn test_home_end_and_escape() {
    let harness = Harness::with_buttons(&[1, 2, 3]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();
    harness.set_active(2);

    assert!(session.handle_key(KeyInput::new(Key::End)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(3)));
    assert!(session.handle_key(KeyInput::new(Key::Home)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(1)));

    // Escape bubbles to whoever owns the dialog
    assert_eq!(session.handle_key(KeyInput::new(Key::Escape)), KeyOutcome::Ignored);
}

#[test]
fn test_ineligible_elements_are_skipped() {
    let harness = Harness::new(vec![
        button(1).disabled(),
        button(2),
        button(3).aria_hidden(),
        button(4).with_tab_order(-1),
        button(5),
        button(6).hidden(),
    ]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    let ids: Vec<_> = session.focusable_elements().iter().map(|el| el.id).collect();
    assert_eq!(ids, vec![ElementId(2), ElementId(5)]);

    harness.set_active(5);
    session.handle_key(KeyInput::new(Key::Tab));
    assert_eq!(harness.active(), Some(ElementId(2)));

    // Still a candidate of the region even though it is not tabbable
    assert!(session.contains(ElementId(4)));
    assert!(!session.contains(ElementId(9)));
}

#[test]
fn test_tab_from_roving_member_follows_document_order() {
    let harness = Harness::new(vec![button(1), button(2).with_tab_order(-1), button(3), button(4)]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    // Focus sits on a toolbar member after arrow navigation
    harness.set_active(2);
    assert_eq!(session.handle_key(KeyInput::new(Key::Tab)), KeyOutcome::Ignored);
    assert_eq!(session.handle_key(KeyInput::shifted(Key::Tab)), KeyOutcome::Ignored);
    assert_eq!(harness.active(), Some(ElementId(2)));
}

#[test]
fn test_tab_from_roving_member_at_edges_wraps() {
    let harness = Harness::new(vec![button(1).with_tab_order(-1), button(2), button(3), button(4).with_tab_order(-1)]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    harness.set_active(4);
    assert!(session.handle_key(KeyInput::new(Key::Tab)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(2)));

    harness.set_active(4);
    assert_eq!(session.handle_key(KeyInput::shifted(Key::Tab)), KeyOutcome::Ignored);

    harness.set_active(1);
    assert!(session.handle_key(KeyInput::shifted(Key::Tab)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(3)));
}

#[test]
fn test_refused_wrap_is_not_handled() {
    let harness = Harness::with_buttons(&[1, 2, 3]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    harness.refuse_focus(1);
    harness.set_active(3);
    assert_eq!(session.handle_key(KeyInput::new(Key::Tab)), KeyOutcome::Ignored);
    assert_eq!(harness.active(), Some(ElementId(3)));

    // The other direction still wraps
    harness.set_active(1);
    assert!(session.handle_key(KeyInput::shifted(Key::Tab)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(3)));
}

#[test]
fn test_positive_tab_order_comes_first() {
    let harness = Harness::new(vec![button(1), button(2).with_tab_order(1), button(3)]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    assert_eq!(session.focus_first(), Some(ElementId(2)));
    assert_eq!(session.focus_last(), Some(ElementId(3)));
}

#[test]
fn test_list_reflects_dom_changes() {
    let harness = Harness::with_buttons(&[1, 2, 3]);
    let session = trap(&harness, FocusConfig::default());
    session.activate();
    assert_eq!(session.focusable_elements().len(), 3);

    harness.host.lock().elements.push(button(4));
    harness.set_active(4);
    assert!(session.handle_key(KeyInput::new(Key::Tab)).is_handled());
    assert_eq!(harness.active(), Some(ElementId(1)));
}

#[test]
fn test_empty_region_is_noop() {
    let harness = Harness::new(Vec::new());
    let session = trap(&harness, auto_focus());
    session.activate();

    assert_eq!(session.focus_first(), None);
    assert_eq!(session.focus_last(), None);
    assert_eq!(session.handle_key(KeyInput::new(Key::Tab)), KeyOutcome::Ignored);
    assert_eq!(session.handle_key(KeyInput::new(Key::Home)), KeyOutcome::Ignored);

    harness.advance(200);
    assert!(harness.host.lock().focus_calls.is_empty());
}

#[test]
fn test_auto_focus_after_settle_delay() {
    let harness = Harness::with_buttons(&[1, 2]);
    harness.set_active(42);
    let session = trap(&harness, auto_focus());
    session.activate();

    harness.advance(99);
    assert_eq!(harness.active(), Some(ElementId(42)));

    harness.advance(1);
    assert_eq!(harness.active(), Some(ElementId(1)));
}

#[test]
fn test_auto_focus_announces_label() {
    let harness = Harness::new(vec![button(1).with_label("Meal name"), button(2)]);
    let announcer = Announcer::new(harness.scheduler.clone());
    let region = MemoryLiveRegion::new();
    announcer.attach(region.clone());

    let session = trap(&harness, auto_focus()).with_announcer(announcer);
    session.activate();

    harness.advance(100);
    assert_eq!(harness.active(), Some(ElementId(1)));
    harness.advance(100);
    assert_eq!(region.text(), "Meal name");
}

#[test]
fn test_early_teardown_cancels_auto_focus() {
    let harness = Harness::with_buttons(&[1, 2]);
    harness.set_active(42);
    let session = trap(&harness, auto_focus());
    session.activate();

    harness.advance(50);
    session.deactivate();
    harness.advance(500);

    assert!(!harness.host.lock().focus_calls.contains(&ElementId(1)));
    assert_eq!(harness.active(), Some(ElementId(42)));
}

#[test]
fn test_restore_on_next_tick() {
    let harness = Harness::with_buttons(&[1, 2]);
    harness.set_active(42);
    let session = trap(&harness, FocusConfig::default());
    session.activate();
    assert_eq!(session.restore_target(), Some(ElementId(42)));

    harness.set_active(2);
    session.deactivate();
    assert_eq!(session.state(), SessionState::TornDown);
    assert_eq!(harness.active(), Some(ElementId(2)));

    assert_eq!(harness.advance(0), 1);
    assert_eq!(harness.active(), Some(ElementId(42)));
}

#[test]
fn test_restore_skipped_when_target_detached() {
    let harness = Harness::with_buttons(&[1, 2]);
    harness.set_active(42);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    harness.set_active(1);
    harness.detach(42);
    session.deactivate();
    harness.advance(0);

    assert_eq!(harness.active(), Some(ElementId(1)));
}

#[test]
fn test_drop_deactivates_and_restores() {
    let harness = Harness::with_buttons(&[1, 2]);
    harness.set_active(42);
    {
        let session = trap(&harness, auto_focus());
        session.activate();
        harness.advance(100);
        assert_eq!(harness.active(), Some(ElementId(1)));
    }

    // Restoration outlives the session
    harness.advance(0);
    assert_eq!(harness.active(), Some(ElementId(42)));
}

#[test]
fn test_double_activation_keeps_first_target() {
    let harness = Harness::with_buttons(&[1, 2]);
    harness.set_active(42);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    harness.set_active(1);
    session.activate();
    assert_eq!(session.restore_target(), Some(ElementId(42)));
}

#[test]
fn test_deactivate_twice_restores_once() {
    let harness = Harness::with_buttons(&[1]);
    harness.set_active(42);
    let session = trap(&harness, FocusConfig::default());
    session.activate();

    session.deactivate();
    session.deactivate();
    assert_eq!(harness.advance(0), 1);
    assert_eq!(harness.scheduler.pending_count(), 0);
}

#[test]
fn test_restore_delay() {
    let harness = Harness::with_buttons(&[1]);
    harness.set_active(42);
    let session = trap(
        &harness,
        FocusConfig {
            restore_delay_ms: 30,
            ..FocusConfig::default()
        },
    );
    session.activate();
    harness.set_active(1);
    session.deactivate();

    assert_eq!(harness.advance(29), 0);
    assert_eq!(harness.advance(1), 1);
    assert_eq!(harness.active(), Some(ElementId(42)));
}
