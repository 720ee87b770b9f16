//! Header-only boundary behavior: an empty timeline still yields a report
//! with every analytic block present, the fallback warning set, and a
//! schema-valid document.

mod common;

use chrono::TimeZone;
use rlcoach::analysis::{analyze, AnalysisContext};
use rlcoach::events::Events;
use rlcoach::report::{assemble, ReportParts};
use rlcoach::schema::validate_report;

#[test]
fn header_only_report_has_all_players_and_validates() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1)]);
    let index = common::index_for(&header);
    let events = Events::default();
    let timeline = Vec::new();

    let ctx = AnalysisContext {
        timeline: &timeline,
        events: &events,
        index: &index,
        duration_s: header.match_length_s,
    };
    let analysis = analyze(&ctx);

    let report = assemble(ReportParts {
        header: &header,
        index: &index,
        analysis,
        events,
        quality: common::header_only_quality(),
        replay_id: "a".repeat(64),
        source_file: "test.replay".to_string(),
        duration_seconds: header.match_length_s,
        recorded_frame_hz: 30.0,
        total_frames: 0,
        me_canonical_id: None,
        generated_at_utc: chrono::Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    })
    .expect("header-only report must assemble");

    assert!(!report.quality.parser.parsed_network_data);
    assert!(report
        .quality
        .warnings
        .contains(&"network_data_unparsed_fallback_header_only".to_string()));

    // Both players present with all-zero fundamentals.
    assert_eq!(report.analysis.per_player.len(), 2);
    for player in &report.players {
        let block = report
            .analysis
            .per_player
            .get(&player.player_id)
            .expect("per_player keyed by players[].player_id");
        assert_eq!(block.fundamentals.goals, 0);
        assert_eq!(block.fundamentals.shots, 0);
        assert_eq!(block.boost.amount_collected, 0.0);
    }

    // per_player keys are exactly the players[] ids.
    let mut report_ids: Vec<&str> = report.players.iter().map(|p| p.player_id.as_str()).collect();
    report_ids.sort();
    let analysis_ids: Vec<&str> = report.analysis.per_player.keys().map(|k| k.as_str()).collect();
    assert_eq!(report_ids, analysis_ids);

    let value = serde_json::to_value(&report).unwrap();
    validate_report(&value).expect("document must satisfy the embedded schema");
}

#[test]
fn teams_split_roster_by_team_index() {
    let header = common::header_with(&[("Alpha", 0), ("Bravo", 1), ("Charlie", 0)]);
    let index = common::index_for(&header);
    let events = Events::default();
    let timeline = Vec::new();
    let ctx = AnalysisContext {
        timeline: &timeline,
        events: &events,
        index: &index,
        duration_s: 300.0,
    };
    let analysis = analyze(&ctx);

    let report = assemble(ReportParts {
        header: &header,
        index: &index,
        analysis,
        events,
        quality: common::header_only_quality(),
        replay_id: "b".repeat(64),
        source_file: "test.replay".to_string(),
        duration_seconds: 300.0,
        recorded_frame_hz: 30.0,
        total_frames: 0,
        me_canonical_id: Some("slug:alpha".to_string()),
        generated_at_utc: chrono::Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    })
    .unwrap();

    assert_eq!(report.teams.blue.players.len(), 2);
    assert_eq!(report.teams.orange.players.len(), 1);

    let me: Vec<&rlcoach::report::ReportPlayer> = report
        .players
        .iter()
        .filter(|p| p.is_me == Some(true))
        .collect();
    assert_eq!(me.len(), 1);
    assert_eq!(me[0].display_name, "Alpha");
}
