use crate::entities::lane::GraphLane;

pub const GIT_RED: u32 = 0xE64D3F;
pub const GIT_YELLOW: u32 = 0xF1C40F;
pub const GIT_GREEN: u32 = 0x2ECC71;
pub const GIT_BLUE: u32 = 0x3498DB;
pub const GIT_PURPLE: u32 = 0x9B59B6;
pub const VEC_COLORS: &[u32] = &[GIT_PURPLE, GIT_BLUE, GIT_RED, GIT_YELLOW, GIT_GREEN];

/// Palette color of a lane, stable for as long as the lane lives.
pub fn lane_color(lane: &GraphLane) -> u32 {
    VEC_COLORS[lane.color_index(VEC_COLORS.len())]
}

/// Splits `0xRRGGBB`.
pub fn rgb(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}
