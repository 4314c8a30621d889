//! Axis-separated tile collision.
//!
//! The core algorithm is **axis-separable move-and-snap**: integrate X and
//! resolve it against the grid, then integrate Y and resolve it using the
//! already-corrected X. Every mover (player, enemy, power-up) goes through
//! [`move_and_collide`], which is what keeps a fast diagonal mover from
//! tunnelling through the corner of a block.
//!
//! Each pass scans the cells the box now overlaps in row-major order and
//! resolves only the **first** solid cell found: the box is snapped flush to
//! that cell's boundary and its velocity on that axis is zeroed. Several
//! simultaneous contacts on one axis are not disambiguated; one hit per axis
//! per tick.
//!
//! The vertical pass is the only writer of `Body::grounded`. Hits are handed
//! back to the caller instead of acting on blocks directly, so the block layer
//! decides what a head bump does.

use crate::body::{Body, Facing};
use crate::tile::{pixel_to_cell, Cell, TileGrid};

/// Trailing edges are pulled in by this much so a box flush against a cell
/// boundary does not count as overlapping the next cell.
const EDGE_EPSILON: f32 = 0.001;

/// Inclusive cell range covered by a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
}

impl CellSpan {
    pub fn of(body: &Body) -> Self {
        Self {
            x0: pixel_to_cell(body.left()),
            x1: pixel_to_cell(body.right() - EDGE_EPSILON),
            y0: pixel_to_cell(body.top()),
            y1: pixel_to_cell(body.bottom() - EDGE_EPSILON),
        }
    }

    /// Cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| Cell::new(x, y)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallHit {
    pub cell: Cell,
    /// Direction of travel when the wall was met; velocity is already zero.
    pub moving: Facing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalHit {
    /// Landed on top of the cell.
    Floor(Cell),
    /// Struck the cell from below.
    Ceiling(Cell),
    /// Touched a flag tile before any solid cell; nothing was resolved.
    Flagpole(Cell),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub wall: Option<WallHit>,
    pub vertical: Option<VerticalHit>,
}

impl Contacts {
    pub fn landed(&self) -> bool {
        matches!(self.vertical, Some(VerticalHit::Floor(_)))
    }

    pub fn head_bump(&self) -> Option<Cell> {
        match self.vertical {
            Some(VerticalHit::Ceiling(cell)) => Some(cell),
            _ => None,
        }
    }

    pub fn flagpole(&self) -> Option<Cell> {
        match self.vertical {
            Some(VerticalHit::Flagpole(cell)) => Some(cell),
            _ => None,
        }
    }
}

fn first_solid(body: &Body, grid: &TileGrid) -> Option<Cell> {
    CellSpan::of(body).cells().find(|cell| grid.is_solid(*cell))
}

/// Resolve the horizontal axis after X has been integrated.
pub fn resolve_x(body: &mut Body, grid: &TileGrid) -> Option<WallHit> {
    if body.vel.x == 0.0 {
        return None;
    }
    let cell = first_solid(body, grid)?;
    let moving = if body.vel.x > 0.0 {
        body.pos.x = cell.left() - body.size.x;
        Facing::Right
    } else {
        body.pos.x = cell.right();
        Facing::Left
    };
    body.vel.x = 0.0;
    log::trace!("wall hit at ({}, {}) moving {:?}", cell.x, cell.y, moving);
    Some(WallHit { cell, moving })
}

/// Resolve the vertical axis after Y has been integrated.
pub fn resolve_y(body: &mut Body, grid: &TileGrid) -> Option<VerticalHit> {
    resolve_y_inner(body, grid, false)
}

/// Like [`resolve_y`], but a flag tile met before any solid cell is reported
/// as [`VerticalHit::Flagpole`] and leaves the body untouched.
pub fn resolve_y_sensing_flagpole(body: &mut Body, grid: &TileGrid) -> Option<VerticalHit> {
    resolve_y_inner(body, grid, true)
}

fn resolve_y_inner(body: &mut Body, grid: &TileGrid, sense_flagpole: bool) -> Option<VerticalHit> {
    body.grounded = false;

    let cell = CellSpan::of(body).cells().find(|cell| {
        let kind = grid.get(*cell);
        kind.is_solid() || (sense_flagpole && kind.is_flagpole())
    })?;

    if grid.get(cell).is_flagpole() {
        return Some(VerticalHit::Flagpole(cell));
    }

    let hit = if body.vel.y >= 0.0 {
        body.pos.y = cell.top() - body.size.y;
        body.grounded = true;
        VerticalHit::Floor(cell)
    } else {
        body.pos.y = cell.bottom();
        VerticalHit::Ceiling(cell)
    };
    body.vel.y = 0.0;
    log::trace!("vertical hit {:?}", hit);
    Some(hit)
}

/// Integrate and resolve X, then integrate and resolve Y.
pub fn move_and_collide(body: &mut Body, grid: &TileGrid) -> Contacts {
    body.pos.x += body.vel.x;
    let wall = resolve_x(body, grid);
    body.pos.y += body.vel.y;
    let vertical = resolve_y(body, grid);
    Contacts { wall, vertical }
}

/// [`move_and_collide`] for the player, who can grab the flagpole.
pub fn move_and_collide_sensing_flagpole(body: &mut Body, grid: &TileGrid) -> Contacts {
    body.pos.x += body.vel.x;
    let wall = resolve_x(body, grid);
    body.pos.y += body.vel.y;
    let vertical = resolve_y_sensing_flagpole(body, grid);
    Contacts { wall, vertical }
}

/// Whether a walker at `body` would step off a ledge on its next move.
pub fn ledge_ahead(body: &Body, grid: &TileGrid) -> bool {
    let ahead_x = match Facing::of_velocity(body.vel.x, body.facing) {
        Facing::Left => body.left() - 1.0,
        Facing::Right => body.right(),
    };
    let below = Cell::containing(ahead_x, body.bottom() + 1.0);
    !grid.is_solid(below)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileKind;

    fn grid(cells: &[(i32, i32, TileKind)]) -> TileGrid {
        let mut grid = TileGrid::new(16, 15);
        for x in 0..16 {
            grid.set(Cell::new(x, 13), TileKind::Ground);
        }
        for &(x, y, kind) in cells {
            grid.set(Cell::new(x, y), kind);
        }
        grid
    }

    fn moving(x: f32, y: f32, w: f32, h: f32, vx: f32, vy: f32) -> Body {
        let mut body = Body::new(x, y, w, h);
        body.vel = glam::Vec2::new(vx, vy);
        body
    }

    #[test]
    fn move_into_wall_snaps_flush_and_stops() {
        let grid = grid(&[(5, 12, TileKind::HardBlock)]);
        let mut body = moving(66.0, 192.0, 12.0, 16.0, 3.0, 0.0);
        let contacts = move_and_collide(&mut body, &grid);
        assert_eq!(body.right(), 80.0);
        assert_eq!(body.vel.x, 0.0);
        assert_eq!(
            contacts.wall,
            Some(WallHit {
                cell: Cell::new(5, 12),
                moving: Facing::Right
            })
        );
    }

    #[test]
    fn moving_left_snaps_to_right_edge() {
        let grid = grid(&[(2, 12, TileKind::Brick)]);
        let mut body = moving(49.0, 192.0, 12.0, 16.0, -2.0, 0.0);
        let contacts = move_and_collide(&mut body, &grid);
        assert_eq!(body.left(), 48.0);
        assert_eq!(contacts.wall.map(|w| w.moving), Some(Facing::Left));
    }

    #[test]
    fn falling_onto_floor_sets_grounded() {
        let grid = grid(&[]);
        let mut body = moving(40.0, 191.0, 12.0, 16.0, 0.0, 2.0);
        let contacts = move_and_collide(&mut body, &grid);
        assert!(contacts.landed());
        assert!(body.grounded);
        assert_eq!(body.bottom(), 208.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn airborne_pass_clears_grounded() {
        let grid = grid(&[]);
        let mut body = moving(40.0, 100.0, 12.0, 16.0, 0.0, 1.0);
        body.grounded = true;
        let contacts = move_and_collide(&mut body, &grid);
        assert_eq!(contacts.vertical, None);
        assert!(!body.grounded);
    }

    #[test]
    fn rising_into_block_reports_head_bump_and_never_grounds() {
        let grid = grid(&[(3, 9, TileKind::QuestionBlock)]);
        let mut body = moving(50.0, 162.0, 12.0, 16.0, 0.0, -4.0);
        let contacts = move_and_collide(&mut body, &grid);
        assert_eq!(contacts.head_bump(), Some(Cell::new(3, 9)));
        assert_eq!(body.top(), 160.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(!body.grounded);
    }

    #[test]
    fn moving_up_beside_a_wall_does_not_push_down() {
        let grid = grid(&[(4, 12, TileKind::HardBlock)]);
        // Flush against the block's left face, jumping straight up.
        let mut body = moving(52.0, 192.0, 12.0, 16.0, 0.0, -4.0);
        move_and_collide(&mut body, &grid);
        assert!(body.top() <= 192.0 - 4.0 + 1e-4);
    }

    #[test]
    fn only_first_cell_in_scan_order_resolves() {
        // Box spans two columns under two blocks; the left one is hit.
        let grid = grid(&[(2, 9, TileKind::Brick), (3, 9, TileKind::QuestionBlock)]);
        let mut body = moving(44.0, 162.0, 12.0, 16.0, 0.0, -4.0);
        let contacts = move_and_collide(&mut body, &grid);
        assert_eq!(contacts.head_bump(), Some(Cell::new(2, 9)));
    }

    #[test]
    fn x_resolves_before_y_at_corners() {
        // Falling diagonally into the top-left corner of a block: the X pass
        // sees no overlap (box still above the block), the Y pass lands it.
        let grid = grid(&[(5, 12, TileKind::HardBlock)]);
        let mut body = moving(69.0, 174.0, 12.0, 16.0, 1.5, 3.0);
        let contacts = move_and_collide(&mut body, &grid);
        assert_eq!(contacts.wall, None);
        assert!(contacts.landed());
        assert_eq!(body.bottom(), 192.0);
    }

    #[test]
    fn leaving_the_grid_falls_freely() {
        let grid = TileGrid::new(4, 4);
        let mut body = moving(-30.0, 90.0, 12.0, 16.0, -1.0, 4.0);
        let contacts = move_and_collide(&mut body, &grid);
        assert_eq!(contacts, Contacts::default());
        assert_eq!(body.pos.y, 94.0);
    }

    #[test]
    fn flagpole_is_sensed_but_not_solid() {
        let grid = grid(&[(6, 11, TileKind::FlagPole), (6, 12, TileKind::FlagPole)]);
        let mut body = moving(88.0, 170.0, 12.0, 16.0, 1.0, 1.0);
        let contacts = move_and_collide_sensing_flagpole(&mut body, &grid);
        assert_eq!(contacts.flagpole(), Some(Cell::new(6, 11)));
        assert_eq!(contacts.wall, None);

        let mut plain = moving(88.0, 170.0, 12.0, 16.0, 1.0, 1.0);
        let contacts = move_and_collide(&mut plain, &grid);
        assert_eq!(contacts.vertical, None);
    }

    #[test]
    fn ledge_check_looks_past_leading_edge() {
        let mut grid = TileGrid::new(8, 8);
        for x in 0..4 {
            grid.set(Cell::new(x, 5), TileKind::Ground);
        }
        // Right edge already past the last ground column.
        let mut walker = moving(49.0, 64.0, 16.0, 16.0, 0.5, 0.0);
        assert!(ledge_ahead(&walker, &grid));
        walker.vel.x = -0.5;
        assert!(!ledge_ahead(&walker, &grid));
    }
}
