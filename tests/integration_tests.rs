//! Integration tests for the tab host
//!
//! These drive `TabHost` through its public API the way an embedder would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tabhost::surface::SurfaceRegistry;
use tabhost::tab::PinnedSlotState;
use tabhost::window::{TabStrip, TabStripEvent};
use tabhost::{CloseOutcome, SurfaceId, SurfaceParams, TabHost, WindowId};
use tokio_test::assert_ok;

fn history(host: &TabHost, id: SurfaceId) -> (Vec<String>, Option<usize>) {
    let navigation = host.surface(id).unwrap().navigation();
    let urls = navigation
        .entries()
        .iter()
        .map(|e| e.url().to_string())
        .collect();
    (urls, navigation.last_committed_index())
}

fn host_with_tab() -> (TabHost, WindowId, SurfaceId) {
    let mut host = TabHost::new();
    let window = host.open_window();
    let id = host
        .create_tab(SurfaceParams::in_window(window).with_url("https://start.test/"))
        .unwrap();
    host.run_until_idle();
    (host, window, id)
}

#[test]
fn test_host_starts_empty() {
    let host = TabHost::new();
    assert_eq!(host.window_count(), 0);
    assert_eq!(host.surface_count(), 0);
    assert_eq!(host.last_active_window(), None);
}

proptest! {
    #[test]
    fn test_detach_preserves_navigation_state(
        hosts in prop::collection::vec("[a-z]{1,8}", 1..8),
        back in 0usize..8,
    ) {
        let (mut host, _, id) = host_with_tab();
        for name in &hosts {
            host.navigate(id, &format!("https://{}.test/", name)).unwrap();
        }
        host.task_poster().post_for_surface(id, move |surface| {
            for _ in 0..back {
                surface.navigation_mut().go_back();
            }
        });
        host.run_pending_tasks();
        let before = history(&host, id);

        let placeholder = host.detach_guest(id).unwrap().unwrap();
        prop_assert_eq!(history(&host, placeholder), before);
        prop_assert_eq!(host.record(id).unwrap().owning_window(), None);
    }

    #[test]
    fn test_registry_last_write_wins(
        ops in prop::collection::vec((1i32..6, 1i32..100, 1i32..100), 0..40),
    ) {
        let mut registry = SurfaceRegistry::new();
        let mut model = HashMap::new();
        for (id, process_id, routing_id) in ops {
            registry.register(SurfaceId::new(id), process_id, routing_id);
            model.insert(id, (process_id, routing_id));
        }
        prop_assert_eq!(registry.len(), model.len());
        for (id, (process_id, routing_id)) in model {
            let channel = registry.lookup(SurfaceId::new(id)).unwrap();
            prop_assert_eq!((channel.process_id, channel.routing_id), (process_id, routing_id));
        }
    }
}

#[test]
fn test_replace_is_observed_after_the_swap() {
    let (mut host, window, id) = host_with_tab();
    let seen: Arc<Mutex<Vec<Option<SurfaceId>>>> = Arc::default();
    let sink = Arc::clone(&seen);
    host.add_strip_listener(
        window,
        Arc::new(move |event: &TabStripEvent, strip: &TabStrip| {
            if let TabStripEvent::Replaced { index, .. } = *event {
                sink.lock().unwrap().push(strip.surface_at(index));
            }
        }),
    );

    let placeholder = assert_ok!(host.detach_guest(id)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![Some(placeholder)]);
}

#[test]
fn test_unpinned_move_round_trip() {
    let (mut host, first, id) = host_with_tab();
    let second = host.open_window();

    let placeholder = assert_ok!(host.detach_guest(id)).unwrap();
    assert!(host.move_to_window(id, Some(second)));
    host.run_until_idle();

    assert!(host.surface(placeholder).is_none());
    assert!(!host.registry().contains(placeholder));
    assert_eq!(host.window(first).unwrap().tab_strip().count(), 0);
    assert_eq!(host.index_of(second, id), Some(0));
    assert_eq!(host.tab_value(id).unwrap().window_id, second.get());
    assert_eq!(history(&host, id).0, vec!["https://start.test/".to_string()]);
}

#[test]
fn test_pinned_tab_survives_close_of_inactive_window() {
    let mut host = TabHost::new();
    let first = host.open_window();
    let id = host
        .create_tab(SurfaceParams::in_window(first).pinned())
        .unwrap();
    let second = host.open_window();
    host.run_until_idle();
    assert_eq!(
        host.record(id).unwrap().pinned_slot_state(),
        Some(PinnedSlotState::Attached)
    );

    assert_eq!(host.request_window_close(first), CloseOutcome::Hidden);
    assert_eq!(host.last_active_window(), Some(second));

    host.begin_shutdown();
    assert_eq!(
        host.request_window_close(first),
        CloseOutcome::Closed { orphaned: vec![id] }
    );
}

#[test]
fn test_discard_then_reactivate() {
    let (mut host, window, id) = host_with_tab();
    assert!(assert_ok!(host.discard(id)));
    host.run_until_idle();

    let placeholder = host
        .window(window)
        .unwrap()
        .tab_strip()
        .surface_at(0)
        .unwrap();
    assert!(host.is_discarded(placeholder));
    assert!(host.surface(id).is_none());

    host.set_active(placeholder, true);
    assert!(host.is_active(placeholder));
    assert!(!host.surface(placeholder).unwrap().is_visible());
    assert_eq!(history(&host, placeholder).0, vec!["https://start.test/".to_string()]);
}

#[tokio::test]
async fn test_background_completion_runs_on_next_tick() {
    let (mut host, _, id) = host_with_tab();
    let poster = host.task_poster();

    tokio::spawn(async move {
        poster.post_for_surface(id, |surface| surface.set_auto_discardable(false));
    })
    .await
    .unwrap();

    assert!(host.surface(id).unwrap().is_auto_discardable());
    assert_eq!(host.run_pending_tasks(), 1);
    assert!(!host.surface(id).unwrap().is_auto_discardable());
}

#[tokio::test]
async fn test_completion_for_destroyed_surface_is_dropped() {
    let (mut host, _, id) = host_with_tab();
    let poster = host.task_poster();
    host.destroy_tab(id);
    host.run_pending_tasks();

    tokio::spawn(async move {
        poster.post_for_surface(id, |surface| surface.set_auto_discardable(false));
    })
    .await
    .unwrap();
    assert_eq!(host.run_pending_tasks(), 0);
}
