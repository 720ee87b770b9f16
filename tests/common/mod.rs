//! Shared builders for the integration tests: synthetic headers, rosters,
//! and frame sequences. No test reads a real replay from disk.
#![allow(dead_code)]

use rlcoach::adapter::SlotMeta;
use rlcoach::frame::{BallFrame, Frame, PlayerFrame, PlayerSlot, Vec3};
use rlcoach::header::{Header, PlayerInfo};
use rlcoach::normalize::{normalize_players, PlayerIndex};
use rlcoach::quality::{ParserQuality, Quality};

pub fn header_with(players: &[(&str, u8)]) -> Header {
    Header {
        map_name: "Stadium_P".to_string(),
        team_size: players.iter().filter(|(_, t)| *t == 0).count().max(1) as u32,
        match_length_s: 300.0,
        players: players
            .iter()
            .map(|(name, team)| {
                PlayerInfo::from_name_and_platform(name.to_string(), *team, Default::default())
            })
            .collect(),
        ..Header::default()
    }
}

pub fn index_for(header: &Header) -> PlayerIndex {
    let roster: Vec<SlotMeta> = header
        .players
        .iter()
        .map(|p| SlotMeta {
            display_name: Some(p.display_name.clone()),
            team: Some(p.team),
            ..Default::default()
        })
        .collect();
    normalize_players(header, &roster)
}

pub fn player_frame(slot: usize, team: u8, position: Vec3, velocity: Vec3, boost: f32) -> PlayerFrame {
    PlayerFrame {
        slot: PlayerSlot(slot),
        team,
        position,
        velocity,
        rotation: Vec3::ZERO,
        rotation_approximated: false,
        boost_amount: boost,
        is_supersonic: velocity.length() >= 2200.0,
        is_on_ground: position.z <= 25.0,
        is_demolished: false,
    }
}

pub fn frame(t: f32, ball_position: Vec3, ball_velocity: Vec3, players: Vec<PlayerFrame>) -> Frame {
    Frame {
        timestamp_s: t,
        ball: BallFrame {
            position: ball_position,
            velocity: ball_velocity,
            angular_velocity: Vec3::ZERO,
        },
        players,
    }
}

pub fn header_only_quality() -> Quality {
    Quality {
        parser: ParserQuality {
            name: "rlcoach-boxcars".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            parsed_header_data: true,
            parsed_network_data: false,
            crc_checked: true,
        },
        warnings: vec!["network_data_unparsed_fallback_header_only".to_string()],
    }
}

pub fn full_parse_quality() -> Quality {
    Quality {
        parser: ParserQuality {
            name: "rlcoach-boxcars".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            parsed_header_data: true,
            parsed_network_data: true,
            crc_checked: true,
        },
        warnings: vec!["parsed_with_full_decoder".to_string()],
    }
}

/// Deterministic LCG for property-style tests; no randomness crates in the
/// dev set.
pub struct Lcg(pub u64);

impl Lcg {
    pub fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 32) as u32
    }

    pub fn next_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (self.next_u32() as f32 / u32::MAX as f32) * (hi - lo)
    }

    pub fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u32() as usize) % bound.max(1)
    }
}
