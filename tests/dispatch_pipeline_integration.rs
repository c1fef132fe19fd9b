//! Integration tests for the feed dispatch pipeline
//!
//! These tests drive a dispatcher with a manual clock and recording render
//! targets, covering:
//! - Blank and well-formed lines
//! - Pause and resume without history loss or backfill
//! - Burst coalescing by the rate limiter
//! - Live theme changes
//! - Malformed fields and unbound surfaces

mod common;

use common::builders::{DispatcherBuilder, TestPipeline, T0};
use common::mock_helpers::{MockTarget, SurfaceEvent};
use common::{assert_float_eq, frame, SIX_FOUR};
use std::collections::HashMap;
use streamscope::pipeline::{
    AppearanceProfile, ChannelRegistry, DispatcherOptions, FeedDispatcher, RenderTarget,
    SurfaceId, Theme,
};

/// Let the throttle window elapse, then feed one frame.
fn feed_after_window(p: &mut TestPipeline, raw: &str) {
    p.clock.advance(100);
    p.dispatcher.ingest_frame(raw);
}

fn total_buffered(p: &TestPipeline) -> usize {
    (0..6).map(|i| p.buffered(i)).sum()
}

#[test]
fn test_blank_lines_append_nothing() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).build();

    for raw in ["", "   ", "\n\n", " \t \r\n  ", "\r\n"] {
        feed_after_window(&mut p, raw);
    }
    p.clock.advance(1_000);
    p.dispatcher.tick();

    assert_eq!(total_buffered(&p), 0);
    let stats = p.dispatcher.stats();
    assert_eq!(stats.lines_received, 0);
    assert_eq!(stats.lines_dispatched, 0);
    assert_eq!(stats.frames_received, 5);
    assert!(p.dispatcher.next_deadline().is_none());
}

#[test]
fn test_well_formed_line_fills_enabled_channels_only() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).build();
    p.clock.set(T0 + 4_321);
    p.dispatcher.ingest_frame("0,1.5,2.5,3.5,4.5,5.5,6.5");

    let expected = [1.5, 2.5, 3.5, 4.5];
    for (index, value) in expected.iter().enumerate() {
        let samples = p.target(index).samples();
        assert_eq!(samples.len(), 1, "channel {}", index);
        assert_float_eq(samples[0].value, *value, 1e-12);
        assert_eq!(samples[0].timestamp_ms, T0 + 4_321);
        assert_eq!(p.buffered(index), 1);
    }

    assert!(p.dispatcher.channel(4).is_none());
    assert!(p.dispatcher.channel(5).is_none());
    assert_eq!(p.buffered(4), 0);
    assert_eq!(p.buffered(5), 0);
    assert_eq!(p.dispatcher.stats().samples_appended, 4);
}

#[test]
fn test_timestamp_is_ingestion_time_not_sequence() {
    let mut p = DispatcherBuilder::new(&[true]).build();
    p.clock.set(T0 + 50);
    p.dispatcher.ingest_frame("999999,7");
    let sample = p.target(0).samples()[0];
    assert_eq!(sample.timestamp_ms, T0 + 50);
    assert_eq!(sample.value, 7.0);
}

#[test]
fn test_pause_freezes_one_channel_and_keeps_history() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).build();

    p.dispatcher.ingest_frame("0,1,2,3,4");
    feed_after_window(&mut p, "1,1,2,3,4");
    let history_before: Vec<_> = p.dispatcher.channel(2).unwrap().window().iter().copied().collect();
    assert_eq!(history_before.len(), 2);

    assert_eq!(p.dispatcher.toggle_pause(2), Some(true));
    assert!(p.dispatcher.is_paused(2));

    for seq in 2..7 {
        feed_after_window(&mut p, &format!("{},10,20,30,40", seq));
    }

    let history_after: Vec<_> = p.dispatcher.channel(2).unwrap().window().iter().copied().collect();
    assert_eq!(history_after, history_before);
    for other in [0, 1, 3] {
        assert_eq!(p.buffered(other), 7, "channel {}", other);
    }
    assert_eq!(p.dispatcher.stats().samples_paused, 5);
    assert_eq!(p.target(2).count(|e| *e == SurfaceEvent::Stop), 1);
}

#[test]
fn test_resume_appends_without_backfill() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).build();

    p.dispatcher.ingest_frame("0,1,1,1,1");
    p.dispatcher.toggle_pause(0);
    feed_after_window(&mut p, "1,2,2,2,2");
    feed_after_window(&mut p, "2,3,3,3,3");
    assert_eq!(p.dispatcher.toggle_pause(0), Some(false));
    feed_after_window(&mut p, "3,4,4,4,4");

    let values: Vec<f64> = p.dispatcher.channel(0).unwrap().window().iter().map(|s| s.value).collect();
    assert_eq!(values, vec![1.0, 4.0]);
    assert_eq!(p.buffered(1), 4);

    let events = p.target(0).events();
    let lifecycle: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, SurfaceEvent::Start | SurfaceEvent::Stop))
        .cloned()
        .collect();
    assert_eq!(
        lifecycle,
        vec![SurfaceEvent::Start, SurfaceEvent::Stop, SurfaceEvent::Start]
    );
}

#[test]
fn test_invalid_pause_index_is_noop() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).build();
    assert_eq!(p.dispatcher.toggle_pause(42), None);
    assert!(!p.dispatcher.is_paused(42));
    assert!(p.dispatcher.channel_states().iter().all(|c| !c.paused));

    p.dispatcher.ingest_frame("0,1,2,3,4");
    assert_eq!(total_buffered(&p), 4);
}

#[test]
fn test_burst_is_bounded_and_settles_on_last_line() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).throttle_ms(100).build();

    let burst: Vec<String> = (0..50).map(|i| format!("{},{},{},{},{}", i, i, i * 2, i * 3, i * 4)).collect();
    let burst_refs: Vec<&str> = burst.iter().map(String::as_str).collect();
    let raw = frame(&burst_refs);

    p.dispatcher.ingest_frame(&raw);
    assert_eq!(p.dispatcher.stats().lines_dispatched, 1);
    assert_eq!(p.dispatcher.next_deadline(), Some(T0 + 100));

    p.clock.advance(99);
    assert!(!p.dispatcher.tick());
    p.clock.advance(1);
    assert!(p.dispatcher.tick());
    assert!(!p.dispatcher.tick());

    let first_pass: Vec<Option<f64>> = (0..4).map(|i| p.latest(i)).collect();
    assert_eq!(
        first_pass,
        vec![Some(49.0), Some(98.0), Some(147.0), Some(196.0)]
    );
    let stats = p.dispatcher.stats();
    assert_eq!(stats.lines_received, 50);
    assert_eq!(stats.lines_dispatched, 2);
    assert_eq!(stats.lines_coalesced, 48);

    // replay with the same timing relative to an idle throttle
    p.clock.advance(100);
    p.dispatcher.ingest_frame(&raw);
    p.clock.advance(100);
    p.dispatcher.tick();

    let second_pass: Vec<Option<f64>> = (0..4).map(|i| p.latest(i)).collect();
    assert_eq!(second_pass, first_pass);
    assert_eq!(p.dispatcher.stats().lines_dispatched, 4);
}

#[test]
fn test_frames_faster_than_throttle_keep_only_latest() {
    let mut p = DispatcherBuilder::new(&[true]).throttle_ms(100).build();

    p.dispatcher.ingest_frame("0,1");
    for (seq, value) in [(1, 2), (2, 3), (3, 4)] {
        p.clock.advance(20);
        p.dispatcher.ingest_frame(&format!("{},{}", seq, value));
    }
    p.clock.advance(40);
    p.dispatcher.tick();

    let values: Vec<f64> = p.target(0).samples().iter().map(|s| s.value).collect();
    assert_eq!(values, vec![1.0, 4.0]);
}

#[test]
fn test_pending_line_released_by_next_frame() {
    let mut p = DispatcherBuilder::new(&[true]).build();
    p.dispatcher.ingest_frame("0,1\n1,2");
    p.clock.advance(150);
    // no tick: the next frame polls the throttle first
    p.dispatcher.ingest_frame("2,3");

    let values: Vec<f64> = p.target(0).samples().iter().map(|s| s.value).collect();
    assert_eq!(values, vec![1.0, 2.0]);
    assert_eq!(p.dispatcher.next_deadline(), Some(T0 + 250));
}

#[test]
fn test_theme_round_trip_preserves_profile_and_counts() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).theme(Theme::Dark).build();
    let original = *p.dispatcher.appearance();
    assert_eq!(original, AppearanceProfile::for_theme(Theme::Dark));

    p.dispatcher.ingest_frame("0,1,2,3,4");
    feed_after_window(&mut p, "1,1,2,3,4");
    let counts: Vec<usize> = (0..6).map(|i| p.buffered(i)).collect();

    p.dispatcher.set_theme(Theme::Light);
    assert_eq!(*p.dispatcher.appearance(), AppearanceProfile::for_theme(Theme::Light));
    assert_eq!(
        p.target(1).last_appearance(),
        Some(AppearanceProfile::for_theme(Theme::Light))
    );

    p.dispatcher.set_theme(Theme::Dark);
    assert_eq!(*p.dispatcher.appearance(), original);
    for _ in 0..5 {
        p.dispatcher.set_theme(Theme::Dark);
    }

    let counts_after: Vec<usize> = (0..6).map(|i| p.buffered(i)).collect();
    assert_eq!(counts_after, counts);
    for index in 0..4 {
        assert_eq!(p.target(index).last_appearance(), Some(original));
        assert_eq!(p.target(index).samples().len(), 2);
    }
}

#[test]
fn test_malformed_field_skips_only_that_channel() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).build();
    p.dispatcher.ingest_frame("1,abc,2.5,3.5,4.5");

    assert_eq!(p.buffered(0), 0);
    assert_eq!(p.latest(1), Some(2.5));
    assert_eq!(p.latest(2), Some(3.5));
    assert_eq!(p.latest(3), Some(4.5));
    assert_eq!(p.dispatcher.stats().invalid_fields, 1);
}

#[test]
fn test_short_and_empty_fields_are_no_sample() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).build();
    p.dispatcher.ingest_frame("1,,2");

    assert_eq!(p.buffered(0), 0);
    assert_eq!(p.latest(1), Some(2.0));
    assert_eq!(p.buffered(2), 0);
    assert_eq!(p.buffered(3), 0);
    assert_eq!(p.dispatcher.stats().invalid_fields, 3);
}

#[test]
fn test_missing_surface_leaves_channel_inert() {
    let mut p = DispatcherBuilder::new(&SIX_FOUR).without_surface(1).build();
    assert!(!p.dispatcher.channel(1).unwrap().is_bound());

    p.dispatcher.ingest_frame("0,1,2,3,4");
    assert_eq!(p.buffered(1), 0);
    assert_eq!(p.latest(0), Some(1.0));
    assert_eq!(p.latest(2), Some(3.0));

    // toggling and restyling an unbound channel is harmless
    assert_eq!(p.dispatcher.toggle_pause(1), Some(true));
    p.dispatcher.set_theme(Theme::Light);
}

#[test]
fn test_surfaces_resolved_once_by_channel_id() {
    let mut resolved = Vec::new();
    let mut resolver = |id: &SurfaceId| -> Option<Box<dyn RenderTarget>> {
        resolved.push(id.clone());
        let mut target = MockTarget::new();
        target.expect_apply_appearance().times(1).return_const(());
        target.expect_start().times(1).return_const(());
        target.expect_on_sample().times(1).return_const(());
        Some(Box::new(target))
    };

    let mut dispatcher = FeedDispatcher::new(
        ChannelRegistry::new(vec![true, false, true]),
        DispatcherOptions::default(),
        &mut resolver,
    );
    dispatcher.ingest_frame("0,1,2,3");

    assert_eq!(
        resolved,
        vec![SurfaceId::new("chart-1"), SurfaceId::new("chart-3")]
    );
}

#[test]
fn test_map_registry_ignores_unknown_ids() {
    let mut surfaces: HashMap<SurfaceId, Box<dyn RenderTarget>> = HashMap::new();
    let mut stray = MockTarget::new();
    stray.expect_apply_appearance().never();
    stray.expect_start().never();
    surfaces.insert(SurfaceId::new("chart-9"), Box::new(stray));

    let dispatcher = FeedDispatcher::new(
        ChannelRegistry::new(vec![true]),
        DispatcherOptions::default(),
        &mut surfaces,
    );
    assert!(!dispatcher.channel(0).unwrap().is_bound());
    assert_eq!(surfaces.len(), 1);
}
