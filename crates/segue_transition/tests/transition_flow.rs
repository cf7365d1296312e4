//! Integration tests for the full transition engine
//!
//! These tests verify that:
//! - mount/open, gesture dismissal, and removal compose end to end
//! - the close animation defers removal until it actually finishes
//! - a superseded close transition never removes its screen
//! - the pipeline + link store + geometry produce usable per-frame styles
//! - teardown leaves no stale state behind

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use segue_core::{EdgeInsets, MeasuredRect, ScreenLayout, StyleSnapshot};
use segue_geometry::{
    compose_transform_relative, compute_relative_geometry, Anchor, ComposeArgs, ComposeOptions,
    GeometryRequest, ProgressRange, ScaleMode,
};
use segue_store::BoundLinkStore;
use segue_transition::{
    DismissDirections, Easing, FrameInput, GestureSession, ReleaseOutcome, RemovalDecision,
    ScreenAnimationPipeline, ScreenLifecycle, ScreenStateStore, ScrollEdges, StyleMap,
    TransitionScheduler, TransitionSpec,
};

const FRAME_MS: f32 = 1000.0 / 60.0;
const LAYOUT: ScreenLayout = ScreenLayout {
    width: 400.0,
    height: 800.0,
};

struct Harness {
    links: Arc<BoundLinkStore>,
    states: Arc<ScreenStateStore>,
    scheduler: Arc<Mutex<TransitionScheduler>>,
    lifecycle: ScreenLifecycle,
    pipeline: ScreenAnimationPipeline,
}

fn harness() -> Harness {
    // Opt into log output with RUST_LOG=segue_transition=debug.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let links = Arc::new(BoundLinkStore::new());
    let states = Arc::new(ScreenStateStore::new());
    let scheduler = Arc::new(Mutex::new(TransitionScheduler::new(Arc::clone(&states))));
    let lifecycle = ScreenLifecycle::new(Arc::clone(&links), Arc::clone(&scheduler));
    let pipeline = ScreenAnimationPipeline::new(Arc::clone(&links), Arc::clone(&states));
    Harness {
        links,
        states,
        scheduler,
        lifecycle,
        pipeline,
    }
}

fn run_frames(scheduler: &Mutex<TransitionScheduler>, frames: usize) {
    for _ in 0..frames {
        scheduler.lock().unwrap().advance(FRAME_MS);
    }
}

#[test]
fn test_open_transition_settles() {
    let h = harness();
    let finished = Arc::new(AtomicUsize::new(0));
    let finished_inner = finished.clone();

    h.lifecycle.screen_mounted(
        "detail",
        Some("Detail"),
        Some(&TransitionSpec::default()),
        Some(Box::new(move |ok| {
            assert!(ok);
            finished_inner.fetch_add(1, Ordering::SeqCst);
        })),
    );

    let opening = h.states.get("detail").unwrap();
    assert!(opening.entering);
    assert!(opening.animating);
    assert!(!opening.settled());

    run_frames(&h.scheduler, 240);

    let open = h.states.get("detail").unwrap();
    assert_eq!(open.progress, 1.0);
    assert!(!open.entering);
    assert!(open.settled());
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[test]
fn test_deferred_removal_runs_after_close() -> anyhow::Result<()> {
    let h = harness();
    h.lifecycle.screen_mounted("detail", None, None, None);

    let removed = Arc::new(AtomicUsize::new(0));
    let removed_inner = removed.clone();
    let spec = TransitionSpec::timing(200.0, Easing::EaseOut);
    let decision = h.lifecycle.request_removal(
        "detail",
        Some(&spec),
        Box::new(move || {
            removed_inner.fetch_add(1, Ordering::SeqCst);
        }),
    )?;
    assert_eq!(decision, RemovalDecision::Deferred);
    assert!(h.states.get("detail").unwrap().closing);
    assert_eq!(removed.load(Ordering::SeqCst), 0, "removal must wait");

    run_frames(&h.scheduler, 20);
    assert_eq!(removed.load(Ordering::SeqCst), 1);
    assert_eq!(h.states.get("detail").unwrap().progress, 0.0);

    h.lifecycle.finalize_removal("detail");
    assert!(!h.states.contains("detail"));
    assert!(h.states.is_empty());
    Ok(())
}

#[test]
fn test_superseded_close_never_removes() -> anyhow::Result<()> {
    let h = harness();
    h.lifecycle.screen_mounted("detail", None, None, None);

    let removed = Arc::new(AtomicUsize::new(0));
    let removed_inner = removed.clone();
    let slow = TransitionSpec::timing(1000.0, Easing::Linear);
    h.lifecycle.request_removal(
        "detail",
        Some(&slow),
        Box::new(move || {
            removed_inner.fetch_add(1, Ordering::SeqCst);
        }),
    )?;
    run_frames(&h.scheduler, 10);

    // The user navigated forward again mid-close: the reopen supersedes
    // the close, whose callback reports finished = false.
    h.lifecycle
        .screen_mounted("detail", None, Some(&TransitionSpec::default()), None);
    run_frames(&h.scheduler, 300);

    assert_eq!(removed.load(Ordering::SeqCst), 0);
    assert_eq!(h.states.get("detail").unwrap().progress, 1.0);
    Ok(())
}

#[test]
fn test_gesture_dismiss_end_to_end() -> anyhow::Result<()> {
    let h = harness();
    h.lifecycle.screen_mounted("list", None, None, None);
    h.lifecycle.screen_mounted("detail", None, None, None);

    // Drag the detail screen right, past the dismissal threshold.
    let mut session = {
        let mut scheduler = h.scheduler.lock().unwrap();
        GestureSession::begin(&mut scheduler, "detail", LAYOUT, DismissDirections::horizontal())
    };
    let edges = ScrollEdges::default();
    for dx in [10.0, 80.0, 160.0, 260.0] {
        assert!(session.sample(dx, 4.0, &edges));
    }

    let dragged = h.states.get("detail").unwrap();
    assert!(dragged.gesture.dragging);
    assert!((dragged.progress - (1.0 - 260.0 / 400.0)).abs() < 1e-5);

    let spec = TransitionSpec::timing(120.0, Easing::EaseOut);
    let outcome = {
        let mut scheduler = h.scheduler.lock().unwrap();
        session.release(900.0, 0.0, &mut scheduler, Some(&spec))
    };
    assert_eq!(outcome, ReleaseOutcome::Dismissed);

    // The host reacts to the dismissal by requesting removal.
    let removed = Arc::new(AtomicUsize::new(0));
    let removed_inner = removed.clone();
    h.lifecycle.request_removal(
        "detail",
        Some(&spec),
        Box::new(move || {
            removed_inner.fetch_add(1, Ordering::SeqCst);
        }),
    )?;

    run_frames(&h.scheduler, 20);
    assert_eq!(removed.load(Ordering::SeqCst), 1);

    h.lifecycle.finalize_removal("detail");
    assert!(!h.states.contains("detail"));
    assert!(h.states.contains("list"));
    Ok(())
}

#[test]
fn test_gesture_cancel_restores_open_state() {
    let h = harness();
    h.lifecycle.screen_mounted("detail", None, None, None);

    let mut session = {
        let mut scheduler = h.scheduler.lock().unwrap();
        GestureSession::begin(&mut scheduler, "detail", LAYOUT, DismissDirections::horizontal())
    };
    assert!(session.sample(60.0, 0.0, &ScrollEdges::default()));

    let spec = TransitionSpec::timing(100.0, Easing::Linear);
    let outcome = {
        let mut scheduler = h.scheduler.lock().unwrap();
        session.release(0.0, 0.0, &mut scheduler, Some(&spec))
    };
    assert_eq!(outcome, ReleaseOutcome::Cancelled);

    run_frames(&h.scheduler, 10);
    let state = h.states.get("detail").unwrap();
    assert_eq!(state.progress, 1.0);
    assert_eq!(state.gesture.x, 0.0);
    assert!(state.settled());
}

#[test]
fn test_shared_element_styles_during_open() {
    let h = harness();

    // Both screens have reported the tagged element's layout.
    let list_rect = MeasuredRect::from_origin_size(20.0, 600.0, 80.0, 80.0);
    let detail_rect = MeasuredRect::from_origin_size(0.0, 100.0, 400.0, 400.0);
    h.links
        .set_link_source("hero", "list", list_rect, StyleSnapshot::opacity(1.0), &[]);
    h.links.set_link_destination(
        "hero",
        "detail",
        detail_rect,
        StyleSnapshot::opacity(1.0),
        &[],
        Some("list"),
    );

    h.lifecycle.screen_mounted("list", None, None, None);
    h.lifecycle
        .screen_mounted("detail", None, Some(&TransitionSpec::default()), None);
    run_frames(&h.scheduler, 12);

    let input = FrameInput {
        current: "detail",
        previous: Some("list"),
        next: None,
        layout: LAYOUT,
        insets: EdgeInsets::default(),
    };
    let snapshot = h.pipeline.snapshot(&input);
    assert!(snapshot.active);
    assert!(snapshot.focused);
    let progress = snapshot.progress;
    assert!(progress > 0.0 && progress < 1.0, "mid-flight, got {progress}");

    let styles = h.pipeline.compute_styles(&snapshot, |frame| {
        let mut map = StyleMap::default();
        if let Some(pair) = frame.bounds("hero") {
            let geometry = compute_relative_geometry(&GeometryRequest {
                start: pair.source_bounds,
                end: pair.dest_bounds,
                entering: true,
                anchor: Anchor::Center,
                scale_mode: ScaleMode::Uniform,
            });
            let style = compose_transform_relative(&ComposeArgs {
                start: pair.source_bounds,
                end: pair.dest_bounds,
                geometry,
                progress: frame.snapshot.progress,
                range: ProgressRange::Enter,
                options: ComposeOptions::default(),
            });
            map.insert("hero".to_string(), style);
        }
        map
    });

    let transform = styles["hero"].transform.expect("hero resolved");
    // Mid-open: the element is somewhere between the list rect and its
    // natural detail-screen rect, scaled down toward the 80px origin.
    assert!(transform.scale_x > 0.2 && transform.scale_x < 1.0);
    assert!(transform.translate_y > 0.0, "still displaced down toward the list row");

    // After the open settles, the element rests at identity.
    run_frames(&h.scheduler, 240);
    let snapshot = h.pipeline.snapshot(&input);
    assert_eq!(snapshot.progress, 1.0);
    let styles = h.pipeline.compute_styles(&snapshot, |frame| {
        let mut map = StyleMap::default();
        if let Some(pair) = frame.bounds("hero") {
            let geometry = compute_relative_geometry(&GeometryRequest {
                start: pair.source_bounds,
                end: pair.dest_bounds,
                entering: true,
                anchor: Anchor::Center,
                scale_mode: ScaleMode::Uniform,
            });
            map.insert(
                "hero".to_string(),
                compose_transform_relative(&ComposeArgs {
                    start: pair.source_bounds,
                    end: pair.dest_bounds,
                    geometry,
                    progress: frame.snapshot.progress,
                    range: ProgressRange::Enter,
                    options: ComposeOptions::default(),
                }),
            );
        }
        map
    });
    let settled = styles["hero"].transform.unwrap();
    assert!((settled.scale_x - 1.0).abs() < 1e-3);
    assert!(settled.translate_x.abs() < 1e-2);
}

#[test]
fn test_finalize_clears_link_store() {
    let h = harness();
    let rect = MeasuredRect::from_origin_size(0.0, 0.0, 10.0, 10.0);
    h.links
        .register_snapshot("hero", "detail", rect, StyleSnapshot::default(), &[]);
    h.links
        .register_snapshot("hero", "list", rect, StyleSnapshot::default(), &[]);
    h.lifecycle.screen_mounted("detail", None, None, None);

    h.lifecycle.finalize_removal("detail");

    // The other screen's entries are untouched.
    assert_eq!(h.links.tag_count(), 1);
    assert!(!h.states.contains("detail"));
}
