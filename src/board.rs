//! Static board layout: scoring zones and spawn regions
//!
//! Zones are sensor strips along the bottom of the board. They are created
//! once per layout and recreated wholesale on resize; zone indices stay
//! stable left to right.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What landing in a zone is worth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoneValue {
    /// Multiplies [`ZONE_BASE_POINTS`](crate::consts::ZONE_BASE_POINTS)
    Multiplier(f32),
    /// Fixed point award
    Points(u32),
}

impl ZoneValue {
    /// Base points a ball landing here earns, before combo/multiplier
    pub fn base_points(&self) -> u32 {
        match *self {
            ZoneValue::Multiplier(m) => (ZONE_BASE_POINTS as f32 * m).floor() as u32,
            ZoneValue::Points(p) => p,
        }
    }
}

/// One scoring zone sensor strip
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringZone {
    pub index: usize,
    pub value: ZoneValue,
    /// Horizontal extent [min_x, max_x)
    pub min_x: f32,
    pub max_x: f32,
}

/// Board geometry the core needs: zone strip plus spawn/attractor regions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardLayout {
    pub width: f32,
    pub height: f32,
    pub zones: Vec<ScoringZone>,
}

impl BoardLayout {
    /// Build the default layout: seven multiplier zones across the bottom
    pub fn new(width: f32, height: f32) -> Self {
        let zone_width = width / ZONE_MULTIPLIERS.len() as f32;
        let zones = ZONE_MULTIPLIERS
            .iter()
            .enumerate()
            .map(|(i, &mult)| ScoringZone {
                index: i,
                value: ZoneValue::Multiplier(mult),
                min_x: zone_width * i as f32,
                max_x: zone_width * (i + 1) as f32,
            })
            .collect();

        Self {
            width,
            height,
            zones,
        }
    }

    /// Recreate zones for new dimensions (window resize)
    pub fn resize(&mut self, width: f32, height: f32) {
        *self = Self::new(width, height);
    }

    pub fn zone(&self, index: usize) -> Option<&ScoringZone> {
        self.zones.get(index)
    }

    /// Zone under a horizontal position, if any
    pub fn zone_at(&self, x: f32) -> Option<&ScoringZone> {
        self.zones.iter().find(|z| x >= z.min_x && x < z.max_x)
    }

    /// Magnet attractor point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Central sub-region where power-ups may spawn: (min, max) corners
    pub fn powerup_spawn_region(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.width * 0.2, self.height * 0.3),
            Vec2::new(self.width * 0.8, self.height * 0.7),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_ladder() {
        let board = BoardLayout::new(700.0, 700.0);
        assert_eq!(board.zones.len(), 7);
        // Center zone pays the most
        assert_eq!(board.zones[3].value, ZoneValue::Multiplier(10.0));
        assert_eq!(board.zones[3].value.base_points(), 1000);
        // Edges pay the least
        assert_eq!(board.zones[0].value.base_points(), 200);
        assert_eq!(board.zones[6].value.base_points(), 200);
    }

    #[test]
    fn test_zone_at_covers_width() {
        let board = BoardLayout::new(700.0, 700.0);
        assert_eq!(board.zone_at(0.0).unwrap().index, 0);
        assert_eq!(board.zone_at(350.0).unwrap().index, 3);
        assert_eq!(board.zone_at(699.9).unwrap().index, 6);
        assert!(board.zone_at(700.0).is_none());
        assert!(board.zone_at(-1.0).is_none());
    }

    #[test]
    fn test_resize_recreates_zones() {
        let mut board = BoardLayout::new(700.0, 700.0);
        board.resize(1400.0, 900.0);
        assert_eq!(board.zones.len(), 7);
        assert!((board.zones[6].max_x - 1400.0).abs() < 0.01);
        assert_eq!(board.center(), Vec2::new(700.0, 450.0));
    }

    #[test]
    fn test_spawn_region_is_central() {
        let board = BoardLayout::new(800.0, 700.0);
        let (min, max) = board.powerup_spawn_region();
        assert!((min - Vec2::new(160.0, 210.0)).length() < 1e-3);
        assert!((max - Vec2::new(640.0, 490.0)).length() < 1e-3);
    }
}
