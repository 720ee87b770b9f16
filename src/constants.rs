//! Archetype names, network attribute keys, and the numeric thresholds used
//! by the detectors and analyzers. Everything tunable lives here.

pub static BALL_ARCHETYPES: [&str; 5] = [
    "Archetypes.Ball.Ball_Default",
    "Archetypes.Ball.Ball_Basketball",
    "Archetypes.Ball.Ball_Puck",
    "Archetypes.Ball.CubeBall",
    "Archetypes.Ball.Ball_Breakout",
];

pub static CAR_ARCHETYPE: &str = "Archetypes.Car.Car_Default";
pub static GAME_EVENT_ARCHETYPE: &str = "Archetypes.GameEvent.GameEvent_Soccar";
pub static PLAYER_INFO_ARCHETYPE: &str = "TAGame.Default__PRI_TA";
pub static TEAM_ZERO_ARCHETYPE: &str = "Archetypes.Teams.Team0";
pub static TEAM_ONE_ARCHETYPE: &str = "Archetypes.Teams.Team1";

pub static BOOST_COMPONENT_ARCHETYPE: &str = "Archetypes.CarComponents.CarComponent_Boost";
pub static JUMP_COMPONENT_ARCHETYPE: &str = "Archetypes.CarComponents.CarComponent_Jump";
pub static DOUBLE_JUMP_COMPONENT_ARCHETYPE: &str =
    "Archetypes.CarComponents.CarComponent_DoubleJump";
pub static DODGE_COMPONENT_ARCHETYPE: &str = "Archetypes.CarComponents.CarComponent_Dodge";
pub static FLIP_CAR_COMPONENT_ARCHETYPE: &str = "Archetypes.CarComponents.CarComponent_FlipCar";

/// Substring that marks any boost pad actor, whose full object names are
/// per-map (`TheWorld:PersistentLevel.VehiclePickup_Boost_TA_N`).
pub static PAD_ACTOR_SUBSTRING: &str = "VehiclePickup_Boost";

// Classification allow-lists. Classification operates on resolved class
// names, never on raw archetype strings.
pub static BALL_CLASS_SUBSTRINGS: [&str; 1] = ["Ball_TA"];
pub static CAR_CLASS_SUBSTRINGS: [&str; 2] = ["Vehicle_TA", "Car_TA"];
pub static CAR_CLASS_EXCLUDE_SUBSTRING: &str = "CarComponent_";

pub static BOOST_AMOUNT_KEY: &str = "TAGame.CarComponent_Boost_TA:ReplicatedBoostAmount";
pub static BOOST_REPLICATED_KEY: &str = "TAGame.CarComponent_Boost_TA:ReplicatedBoost";
pub static COMPONENT_ACTIVE_KEY: &str = "TAGame.CarComponent_TA:ReplicatedActive";
pub static DEMOLISH_KEY: &str = "TAGame.Car_TA:ReplicatedDemolish";
pub static DEMOLISH_GOAL_EXPLOSION_KEY: &str = "TAGame.Car_TA:ReplicatedDemolishGoalExplosion";
pub static PICKUP_KEY: &str = "TAGame.VehiclePickup_TA:ReplicatedPickupData";
pub static PICKUP_NEW_KEY: &str = "TAGame.VehiclePickup_TA:NewReplicatedPickupData";
pub static PLAYER_NAME_KEY: &str = "Engine.PlayerReplicationInfo:PlayerName";
pub static PLAYER_REPLICATION_KEY: &str = "Engine.Pawn:PlayerReplicationInfo";
pub static RIGID_BODY_STATE_KEY: &str = "TAGame.RBActor_TA:ReplicatedRBState";
pub static SECONDS_REMAINING_KEY: &str = "TAGame.GameEvent_Soccar_TA:SecondsRemaining";
pub static TEAM_KEY: &str = "Engine.PlayerReplicationInfo:Team";
pub static TEAM_PAINT_KEY: &str = "TAGame.Car_TA:TeamPaint";
pub static UNIQUE_ID_KEY: &str = "Engine.PlayerReplicationInfo:UniqueId";
pub static VEHICLE_KEY: &str = "TAGame.CarComponent_TA:Vehicle";
pub static CAM_SETTINGS_KEY: &str = "TAGame.CameraSettingsActor_TA:ProfileSettings";
pub static CAMERA_PRI_KEY: &str = "TAGame.CameraSettingsActor_TA:PRI";
pub static LOADOUT_KEY: &str = "TAGame.PRI_TA:ClientLoadout";

// Physics.
pub static UU_PER_METER: f32 = 100.0;
/// 1 UU/s expressed in km/h.
pub static KPH_PER_UU_S: f32 = 0.036;
pub static MAX_CAR_SPEED_UU: f32 = 2300.0;
pub static SUPERSONIC_SPEED_UU: f32 = 2200.0;
pub static BOOST_SPEED_UU: f32 = 1200.0;
pub static BOOST_USED_PER_SECOND: f32 = 80.0 / 0.93;
pub static SMALL_PAD_AMOUNT: f32 = 12.0;
pub static BIG_PAD_AMOUNT: f32 = 100.0;
/// A car resting on its wheels sits at roughly z = 17.
pub static ON_GROUND_MAX_Z: f32 = 25.0;

// Movement bands (analyzer z / speed cut points).
pub static GROUND_BAND_MAX_Z: f32 = 20.0;
pub static LOW_AIR_BAND_MAX_Z: f32 = 600.0;
pub static AERIAL_MIN_DURATION_S: f32 = 0.5;

// Touch detection.
pub static TOUCH_PROXIMITY_UU: f32 = 200.0;
pub static TOUCH_BALL_DELTA_EPSILON_UU: f32 = 20.0;
pub static TOUCH_DEBOUNCE_WINDOW_S: f32 = 0.2;
pub static TOUCH_DEBOUNCE_RADIUS_UU: f32 = 120.0;
pub static DRIBBLE_REPEAT_WINDOW_S: f32 = 0.5;
pub static SHOT_CONE_HALF_ANGLE_DEG: f32 = 35.0;
pub static PASS_CONE_HALF_ANGLE_DEG: f32 = 30.0;

// Goal attribution.
pub static GOAL_SCORER_WINDOW_S: f32 = 4.0;
pub static GOAL_ASSIST_WINDOW_S: f32 = 5.0;

// Kickoffs.
pub static KICKOFF_BALL_CENTER_UU: f32 = 50.0;
pub static KICKOFF_SPAWN_MOVE_UU: f32 = 150.0;
pub static KICKOFF_ACTIVE_TIMEOUT_S: f32 = 5.0;
pub static KICKOFF_STATIONARY_SPEED_UU: f32 = 10.0;
pub static KICKOFF_FAKE_CONTEST_UU: f32 = 100.0;
pub static KICKOFF_FAKE_MAX_BOOST_USED: f32 = 5.0;
pub static KICKOFF_DELAY_DECEL_RATIO: f32 = 0.30;
pub static KICKOFF_DELAY_WINDOW_S: f32 = 0.5;
pub static KICKOFF_DELAY_MIN_PEAK_UU: f32 = 1800.0;
pub static KICKOFF_FLIP_CANCEL_WINDOW_S: f32 = 0.3;
/// A goal this soon after the first touch counts as a kickoff goal.
pub static KICKOFF_GOAL_WINDOW_S: f32 = 5.0;
/// Instant speed gain that reads as a dodge impulse at ~30 Hz.
pub static DODGE_IMPULSE_MIN_GAIN_UU: f32 = 400.0;

// Demolitions.
pub static DEMO_ATTACKER_LOOKBACK_FRAMES: usize = 4;
pub static DEMO_ATTACKER_MIN_REL_SPEED_UU: f32 = 1000.0;

// Boost pickups.
pub static BOOST_DELTA_FALLBACK_MIN_RISE: f32 = 10.0;
/// Slack added on top of the snap tolerance when attributing fallback
/// pickups to a pad.
pub static BOOST_DELTA_FALLBACK_SLACK_UU: f32 = 50.0;

// Challenges.
pub static CHALLENGE_PAIR_WINDOW_S: f32 = 1.0;
pub static CHALLENGE_MIN_SEPARATION_UU: f32 = 200.0;
pub static CHALLENGE_MAX_SEPARATION_UU: f32 = 1000.0;
pub static CHALLENGE_MIN_BALL_SPEED_KPH: f32 = 15.0;
pub static CHALLENGE_LOW_BOOST: f32 = 20.0;
pub static CHALLENGE_HIGH_SPEED_UU: f32 = 1800.0;

// Possession / passing.
pub static POSSESSION_TOUCH_TTL_S: f32 = 1.5;
pub static POSSESSION_FAST_RETREAT_UU: f32 = 1500.0;
pub static PASS_MIN_FORWARD_PROGRESS_UU: f32 = 80.0;
pub static GIVE_AND_GO_WINDOW_S: f32 = 4.0;

// Movement / positioning sampling.
pub static SLOW_SPEED_MAX_UU: f32 = 1200.0;
pub static POWERSLIDE_MIN_YAW_RATE: f32 = 1.5;
pub static HALF_FLIP_REVERSE_WINDOW_S: f32 = 0.6;
pub static SPEEDFLIP_DIAGONAL_MIN_RATIO: f32 = 0.35;
pub static WAVEDASH_LANDING_WINDOW_S: f32 = 0.25;
pub static WAVEDASH_MIN_SPEED_GAIN_UU: f32 = 150.0;

// Heatmaps: rows span the y extent, columns the x extent.
pub static HEATMAP_ROWS: usize = 20;
pub static HEATMAP_COLS: usize = 16;

// Frame-rate measurement.
pub static MIN_PLAUSIBLE_HZ: f32 = 1.0;
pub static MAX_PLAUSIBLE_HZ: f32 = 240.0;
pub static DEFAULT_HZ: f32 = 30.0;
pub static TYPICAL_HZ_MIN: f32 = 20.0;
pub static TYPICAL_HZ_MAX: f32 = 60.0;

// Coordinate normalization: positions may exceed the arena box by this
// fraction before they are clamped and counted.
pub static OUT_OF_BOUNDS_TOLERANCE: f32 = 0.02;

// Quality gates.
pub static PAD_COVERAGE_WARN_RATIO: f64 = 0.90;
pub static ROTATION_APPROXIMATED_WARN_RATIO: f64 = 0.50;

// Ingest bounds.
pub static MAX_REPLAY_BYTES: u64 = 50 * 1024 * 1024;
pub static MIN_REPLAY_BYTES: u64 = 1024;

// Environment directives.
pub static SAMPLE_EVERY_ENV: &str = "SAMPLE_EVERY";
pub static DEBUG_BOOST_EVENTS_ENV: &str = "DEBUG_BOOST_EVENTS";
