//! Property-style checks over generated frame sequences, driven by a seeded
//! LCG: timeline monotonicity, determinism under shuffle, and the pad snap
//! inverse.

mod common;

use rlcoach::field;
use rlcoach::frame::Vec3;
use rlcoach::normalize::build_timeline;

fn random_frames(seed: u64, count: usize) -> Vec<rlcoach::frame::Frame> {
    let mut rng = common::Lcg(seed);
    (0..count)
        .map(|i| {
            common::frame(
                i as f32 / 30.0 + rng.next_f32(0.0, 0.01),
                Vec3::new(
                    rng.next_f32(-4000.0, 4000.0),
                    rng.next_f32(-5000.0, 5000.0),
                    rng.next_f32(0.0, 2000.0),
                ),
                Vec3::new(
                    rng.next_f32(-2000.0, 2000.0),
                    rng.next_f32(-2000.0, 2000.0),
                    rng.next_f32(-500.0, 500.0),
                ),
                vec![common::player_frame(
                    0,
                    0,
                    Vec3::new(
                        rng.next_f32(-4000.0, 4000.0),
                        rng.next_f32(-5000.0, 5000.0),
                        17.0,
                    ),
                    Vec3::new(rng.next_f32(-1500.0, 1500.0), rng.next_f32(-1500.0, 1500.0), 0.0),
                    rng.next_f32(0.0, 100.0),
                )],
            )
        })
        .collect()
}

fn shuffle<T>(items: &mut Vec<T>, rng: &mut common::Lcg) {
    for i in (1..items.len()).rev() {
        let j = rng.next_usize(i + 1);
        items.swap(i, j);
    }
}

#[test]
fn built_timelines_are_monotonic() {
    for seed in [1u64, 7, 42, 1234] {
        let (timeline, stats) = build_timeline(random_frames(seed, 200));
        assert_eq!(stats.skipped_frames, 0);
        for window in timeline.windows(2) {
            assert!(
                window[0].timestamp_s <= window[1].timestamp_s,
                "seed {} produced a non-monotonic timeline",
                seed
            );
        }
    }
}

#[test]
fn timeline_build_is_invariant_under_input_shuffle() {
    for seed in [3u64, 99, 555] {
        let original = random_frames(seed, 150);
        let mut shuffled = original.clone();
        shuffle(&mut shuffled, &mut common::Lcg(seed ^ 0xDEADBEEF));

        let (a, _) = build_timeline(original);
        let (b, _) = build_timeline(shuffled);
        assert_eq!(a, b, "seed {}: sort must normalize input order", seed);
    }
}

#[test]
fn pad_snap_inverts_jittered_canonical_positions() {
    let mut rng = common::Lcg(2026);
    for pad in field::PAD_TABLE.iter() {
        for _ in 0..16 {
            // Jitter inside the snap tolerance, at most 150 UU.
            let angle = rng.next_f32(0.0, std::f32::consts::TAU);
            let radius = rng.next_f32(0.0, 140.0);
            let jittered = Vec3::new(
                pad.position.x + radius * angle.cos(),
                pad.position.y + radius * angle.sin(),
                pad.position.z,
            );
            let (snapped, error) = field::snap_to_pad(jittered)
                .unwrap_or_else(|| panic!("pad {} lost under jitter {}", pad.pad_id, radius));
            assert_eq!(snapped, pad.pad_id, "pad {} radius {}", pad.pad_id, radius);
            assert!(error <= 150.0);
        }
    }
}

#[test]
fn malformed_frames_never_panic_the_builder() {
    let mut frames = random_frames(11, 50);
    frames[10].ball.position.x = f32::NAN;
    frames[20].timestamp_s = f32::INFINITY;
    frames[30].players[0].boost_amount = f32::NAN;
    let (timeline, stats) = build_timeline(frames);
    assert_eq!(stats.skipped_frames, 3);
    assert_eq!(timeline.len(), 47);
}
