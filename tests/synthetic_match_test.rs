//! End-to-end over a synthetic frame sequence: kickoff, touch, goal, pad
//! pickups, and the quantified report invariants.

mod common;

use chrono::TimeZone;
use rlcoach::adapter::{BoostPadEvent, PadEventStatus};
use rlcoach::analysis::{analyze, AnalysisContext};
use rlcoach::events::detect_all;
use rlcoach::field;
use rlcoach::frame::{PlayerSlot, Vec3};
use rlcoach::report::{assemble, ReportParts};
use rlcoach::schema::validate_report;

fn kickoff_and_touch_timeline() -> Vec<rlcoach::frame::Frame> {
    vec![
        common::frame(
            0.0,
            Vec3::new(0.0, 0.0, 93.15),
            Vec3::ZERO,
            vec![
                common::player_frame(0, 0, Vec3::new(0.0, -500.0, 17.0), Vec3::ZERO, 33.0),
                common::player_frame(1, 1, Vec3::new(0.0, 1000.0, 17.0), Vec3::ZERO, 33.0),
            ],
        ),
        common::frame(
            1.0,
            Vec3::new(0.0, 120.0, 93.15),
            Vec3::new(0.0, 120.0, 0.0),
            vec![
                common::player_frame(0, 0, Vec3::new(0.0, -500.0, 17.0), Vec3::ZERO, 33.0),
                common::player_frame(1, 1, Vec3::new(0.0, 1000.0, 17.0), Vec3::ZERO, 33.0),
            ],
        ),
        common::frame(
            1.1,
            Vec3::new(0.0, 150.0, 93.15),
            Vec3::new(0.0, 300.0, 0.0),
            vec![
                common::player_frame(0, 0, Vec3::new(0.0, 160.0, 17.0), Vec3::new(0.0, 660.0, 0.0), 30.0),
                common::player_frame(1, 1, Vec3::new(0.0, 1000.0, 17.0), Vec3::ZERO, 33.0),
            ],
        ),
    ]
}

#[test]
fn synthetic_kickoff_yields_one_kickoff_one_touch_no_goal() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1)]);
    let index = common::index_for(&header);
    let timeline = kickoff_and_touch_timeline();

    let events = detect_all(&timeline, &[], &index);
    assert_eq!(events.kickoffs.len(), 1, "exactly one kickoff");
    assert_eq!(
        events.kickoffs[0].phase,
        rlcoach::events::KickoffPhase::Complete
    );
    assert_eq!(events.touches.len(), 1, "exactly one touch");
    assert_eq!(events.touches[0].player_id, "slug:alpha");
    assert!(events.goals.is_empty(), "no goal events");
}

#[test]
fn timeline_is_sorted_and_sums_per_type_lists() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1)]);
    let index = common::index_for(&header);
    let timeline = kickoff_and_touch_timeline();
    let events = detect_all(&timeline, &[], &index);

    let expected_len = events.goals.len()
        + events.demos.len()
        + events.kickoffs.len()
        + events.boost_pickups.len()
        + events.touches.len()
        + events.challenges.len();
    assert_eq!(events.timeline.len(), expected_len);

    for window in events.timeline.windows(2) {
        let (a, b) = (&window[0], &window[1]);
        assert!(
            a.timestamp() < b.timestamp()
                || (a.timestamp() == b.timestamp() && a.type_rank() <= b.type_rank()),
            "timeline must be sorted by (timestamp, type_rank)"
        );
    }
}

#[test]
fn stolen_big_pad_credits_collector_team_aggregates() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1)]);
    let index = common::index_for(&header);
    let timeline = kickoff_and_touch_timeline();

    // Big pad on the blue half collected by the orange player.
    let pad = field::PAD_TABLE[4];
    let pad_events = vec![BoostPadEvent {
        pad_id: pad.pad_id,
        status: PadEventStatus::Collected,
        actor_id: 77,
        slot: Some(PlayerSlot(1)),
        is_big: true,
        pad_side: pad.side,
        snap_error_uu: 1.5,
        timestamp_s: 1.0,
        frame: 1,
    }];
    let events = detect_all(&timeline, &pad_events, &index);
    assert_eq!(events.boost_pickups.len(), 1);
    let pickup = &events.boost_pickups[0];
    assert!(pickup.is_big);
    assert!(pickup.stolen);

    let ctx = AnalysisContext {
        timeline: &timeline,
        events: &events,
        index: &index,
        duration_s: 1.1,
    };
    let analysis = analyze(&ctx);
    let orange = &analysis.per_team.orange.boost;
    assert_eq!(orange.amount_collected, 100.0);
    assert_eq!(orange.amount_stolen, 100.0);
    assert_eq!(orange.big_pads, 1);
    let blue = &analysis.per_team.blue.boost;
    assert_eq!(blue.amount_stolen, 0.0);
}

#[test]
fn time_accumulators_stay_within_duration_tolerance() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1)]);
    let index = common::index_for(&header);
    let timeline = kickoff_and_touch_timeline();
    let events = detect_all(&timeline, &[], &index);
    let duration = 1.1f32;
    let ctx = AnalysisContext {
        timeline: &timeline,
        events: &events,
        index: &index,
        duration_s: duration,
    };
    let analysis = analyze(&ctx);

    for (id, block) in &analysis.per_player {
        let speed_bands =
            block.movement.time_slow_s + block.movement.time_boost_speed_s + block.movement.time_supersonic_s;
        let z_bands =
            block.movement.time_ground_s + block.movement.time_low_air_s + block.movement.time_high_air_s;
        let thirds = block.positioning.time_offensive_third_s
            + block.positioning.time_middle_third_s
            + block.positioning.time_defensive_third_s;
        for (name, total) in [("speed", speed_bands), ("z", z_bands), ("thirds", thirds)] {
            assert!(
                total <= duration * 1.01,
                "{} bands for {} exceed duration: {} > {}",
                name,
                id,
                total,
                duration
            );
            assert!(total >= 0.0);
        }
    }
}

#[test]
fn full_report_over_synthetic_match_validates_and_is_deterministic() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1)]);
    let index = common::index_for(&header);
    let timeline = kickoff_and_touch_timeline();
    let generated = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let build = || {
        let events = detect_all(&timeline, &[], &index);
        let ctx = AnalysisContext {
            timeline: &timeline,
            events: &events,
            index: &index,
            duration_s: 1.1,
        };
        let analysis = analyze(&ctx);
        assemble(ReportParts {
            header: &header,
            index: &index,
            analysis,
            events,
            quality: common::full_parse_quality(),
            replay_id: "c".repeat(64),
            source_file: "synthetic.replay".to_string(),
            duration_seconds: 1.1,
            recorded_frame_hz: 30.0,
            total_frames: timeline.len() as u64,
            me_canonical_id: None,
            generated_at_utc: generated,
        })
        .expect("report assembles")
    };

    let first = build().to_json(false).unwrap();
    let second = build().to_json(false).unwrap();
    assert_eq!(first, second, "same inputs must produce identical JSON");

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    validate_report(&value).unwrap();
    assert_eq!(value["metadata"]["total_frames"], 3);
    assert_eq!(value["quality"]["parser"]["parsed_network_data"], true);
}

#[test]
fn goal_detection_is_edge_triggered_over_parked_ball() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1)]);
    let index = common::index_for(&header);

    let mut timeline = vec![common::frame(
        0.0,
        Vec3::new(0.0, 4000.0, 93.0),
        Vec3::new(0.0, 2000.0, 0.0),
        vec![common::player_frame(0, 0, Vec3::new(0.0, 3000.0, 17.0), Vec3::ZERO, 50.0)],
    )];
    for i in 0..60 {
        timeline.push(common::frame(
            1.0 + i as f32 / 30.0,
            Vec3::new(0.0, field::ARENA.back_wall_y + 100.0, 93.0),
            Vec3::ZERO,
            vec![common::player_frame(0, 0, Vec3::new(0.0, 3000.0, 17.0), Vec3::ZERO, 50.0)],
        ));
    }

    let events = detect_all(&timeline, &[], &index);
    assert_eq!(events.goals.len(), 1, "sixty parked frames, one goal");
    assert_eq!(events.goals[0].team, 0);
}
