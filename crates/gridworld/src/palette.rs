use crate::types::{AgentId, Color, Tile};
use image::Rgb;

pub const EMPTY: Rgb<u8> = Rgb([0, 0, 0]);
pub const WALL: Rgb<u8> = Rgb([180, 180, 180]);
pub const OUT_OF_BOUNDS: Rgb<u8> = Rgb([60, 60, 60]);

const AGENT_COLORS: [Rgb<u8>; 6] = [
    Rgb([159, 67, 255]),
    Rgb([2, 81, 154]),
    Rgb([204, 0, 204]),
    Rgb([216, 30, 54]),
    Rgb([254, 151, 0]),
    Rgb([100, 255, 255]),
];

#[must_use]
pub const fn item(color: Color) -> Rgb<u8> {
    match color {
        Color::Green => Rgb([0, 255, 0]),
        Color::Red => Rgb([255, 0, 0]),
        Color::Blue => Rgb([0, 0, 255]),
    }
}

#[must_use]
pub fn agent(id: AgentId) -> Rgb<u8> {
    AGENT_COLORS[id.0 % AGENT_COLORS.len()]
}

#[must_use]
pub fn tile(tile: Tile) -> Rgb<u8> {
    match tile {
        Tile::Empty => EMPTY,
        Tile::Wall => WALL,
        Tile::Item(c) => item(c),
        Tile::Agent(id) => agent(id),
    }
}
