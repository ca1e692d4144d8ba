//! Axial hex grid (pointy-top).

pub const DEFAULT_HEX_SIZE: f32 = 1.0;
pub const BACKGROUND_RADIUS: i32 = 8;

/// Territory anchors, used in order and cycled once exhausted.
pub const TERRITORY_CENTERS: [HexCell; 4] = [
    HexCell::new(-4, 0),
    HexCell::new(4, -4),
    HexCell::new(0, 4),
    HexCell::new(4, 0),
];

/// Seats around an anchor, used in order and cycled past six members.
pub const NEIGHBOR_RING: [HexCell; 6] = [
    HexCell::new(1, 0),
    HexCell::new(1, -1),
    HexCell::new(0, -1),
    HexCell::new(-1, 0),
    HexCell::new(-1, 1),
    HexCell::new(0, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexCell {
    pub q: i32,
    pub r: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPosition {
    pub x: f32,
    pub z: f32,
}

impl HexCell {
    pub const ORIGIN: HexCell = HexCell::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn s(self) -> i32 {
        -self.q - self.r
    }

    pub fn offset(self, by: HexCell) -> HexCell {
        HexCell::new(self.q + by.q, self.r + by.r)
    }

    pub fn distance(self, other: HexCell) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds)
    }

    /// `x = size·√3·(q + r/2)`, `z = size·1.5·r`.
    pub fn to_world(self, size: f32) -> WorldPosition {
        let q = self.q as f32;
        let r = self.r as f32;
        WorldPosition {
            x: size * 3.0_f32.sqrt() * (q + r / 2.0),
            z: size * 1.5 * r,
        }
    }
}

/// Every cell within `radius` steps of the origin, ordered by `q` then `r`.
pub fn hex_field(radius: i32) -> Vec<HexCell> {
    let radius = radius.max(0);
    let mut cells = Vec::with_capacity((3 * radius * (radius + 1) + 1) as usize);
    for q in -radius..=radius {
        let r_min = (-radius).max(-q - radius);
        let r_max = radius.min(-q + radius);
        for r in r_min..=r_max {
            cells.push(HexCell::new(q, r));
        }
    }
    cells
}

pub fn territory_anchor(index: usize) -> HexCell {
    TERRITORY_CENTERS[index % TERRITORY_CENTERS.len()]
}

pub fn ring_offset(index: usize) -> HexCell {
    NEIGHBOR_RING[index % NEIGHBOR_RING.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axial_to_world_matches_pointy_top_formula() {
        let origin = HexCell::ORIGIN.to_world(2.0);
        assert_eq!(origin, WorldPosition { x: 0.0, z: 0.0 });

        let cell = HexCell::new(1, 2).to_world(2.0);
        assert!((cell.x - 2.0 * 3.0_f32.sqrt() * 2.0).abs() < 1e-5);
        assert!((cell.z - 6.0).abs() < 1e-5);
    }

    #[test]
    fn field_has_centered_hexagonal_count() {
        for radius in 0..=BACKGROUND_RADIUS {
            let field = hex_field(radius);
            assert_eq!(field.len() as i32, 3 * radius * (radius + 1) + 1);
            assert!(field
                .iter()
                .all(|cell| cell.distance(HexCell::ORIGIN) <= radius));
        }
        assert_eq!(hex_field(-3), vec![HexCell::ORIGIN]);
    }

    #[test]
    fn ring_offsets_are_the_six_neighbors() {
        for offset in NEIGHBOR_RING {
            assert_eq!(offset.distance(HexCell::ORIGIN), 1);
        }
        assert_eq!(ring_offset(6), ring_offset(0));
        assert_eq!(ring_offset(13), ring_offset(1));
    }

    #[test]
    fn anchors_cycle_and_fit_inside_background() {
        assert_eq!(territory_anchor(4), territory_anchor(0));
        for center in TERRITORY_CENTERS {
            assert!(center.distance(HexCell::ORIGIN) + 1 <= BACKGROUND_RADIUS);
        }
        for (i, a) in TERRITORY_CENTERS.iter().enumerate() {
            for b in TERRITORY_CENTERS.iter().skip(i + 1) {
                assert!(a.distance(*b) >= 3, "seat rings overlap: {a:?} {b:?}");
            }
        }
    }
}
