//! The colored cube mesh: 4 vertices per face so every face gets a flat
//! color, two triangles per face.

pub const POSITION_ATTRIBUTE: &str = "aPosition";
pub const COLOR_ATTRIBUTE: &str = "aColor";

/// Floats per vertex record: 3 position followed by 3 color.
pub const VERTEX_FLOATS: usize = 6;
pub const VERTEX_COUNT: usize = 24;
pub const INDEX_COUNT: usize = 36;

#[rustfmt::skip]
pub const VERTICES: [f32; VERTEX_COUNT * VERTEX_FLOATS] = [
    // front, red
    -1.0, -1.0,  1.0,   1.0, 0.0, 0.0,
     1.0, -1.0,  1.0,   1.0, 0.0, 0.0,
     1.0,  1.0,  1.0,   1.0, 0.0, 0.0,
    -1.0,  1.0,  1.0,   1.0, 0.0, 0.0,
    // back, green
    -1.0, -1.0, -1.0,   0.0, 1.0, 0.0,
    -1.0,  1.0, -1.0,   0.0, 1.0, 0.0,
     1.0,  1.0, -1.0,   0.0, 1.0, 0.0,
     1.0, -1.0, -1.0,   0.0, 1.0, 0.0,
    // top, blue
    -1.0,  1.0, -1.0,   0.0, 0.0, 1.0,
    -1.0,  1.0,  1.0,   0.0, 0.0, 1.0,
     1.0,  1.0,  1.0,   0.0, 0.0, 1.0,
     1.0,  1.0, -1.0,   0.0, 0.0, 1.0,
    // bottom, yellow
    -1.0, -1.0, -1.0,   1.0, 1.0, 0.0,
     1.0, -1.0, -1.0,   1.0, 1.0, 0.0,
     1.0, -1.0,  1.0,   1.0, 1.0, 0.0,
    -1.0, -1.0,  1.0,   1.0, 1.0, 0.0,
    // right, magenta
     1.0, -1.0, -1.0,   1.0, 0.0, 1.0,
     1.0,  1.0, -1.0,   1.0, 0.0, 1.0,
     1.0,  1.0,  1.0,   1.0, 0.0, 1.0,
     1.0, -1.0,  1.0,   1.0, 0.0, 1.0,
    // left, cyan
    -1.0, -1.0, -1.0,   0.0, 1.0, 1.0,
    -1.0, -1.0,  1.0,   0.0, 1.0, 1.0,
    -1.0,  1.0,  1.0,   0.0, 1.0, 1.0,
    -1.0,  1.0, -1.0,   0.0, 1.0, 1.0,
];

#[rustfmt::skip]
pub const INDICES: [u16; INDEX_COUNT] = [
     0,  1,  2,   0,  2,  3,
     4,  5,  6,   4,  6,  7,
     8,  9, 10,   8, 10, 11,
    12, 13, 14,  12, 14, 15,
    16, 17, 18,  16, 18, 19,
    20, 21, 22,  20, 22, 23,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_in_range() {
        assert!(INDICES.iter().all(|i| (*i as usize) < VERTEX_COUNT));
    }

    #[test]
    fn every_vertex_used() {
        for v in 0..VERTEX_COUNT as u16 {
            assert!(INDICES.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn faces_are_flat_colored() {
        for face in VERTICES.chunks(4 * VERTEX_FLOATS) {
            let color = &face[3..6];
            for vertex in face.chunks(VERTEX_FLOATS) {
                assert_eq!(&vertex[3..6], color);
            }
        }
    }
}
