//! Texture atlas lookup.
//!
//! The atlas is a single strip of equally sized cells. Coordinates are pulled
//! in from the cell edges by [`ATLAS_INSET`] so linear filtering never samples
//! the neighbouring cell.

/// Cells per atlas row.
pub const ATLAS_COLUMNS: usize = 227;
/// Rows in the atlas.
pub const ATLAS_ROWS: usize = 1;
/// Distance, in UV units, kept between a quad's texture and its cell edge.
pub const ATLAS_INSET: f32 = 1.0e-5;

/// UV rectangle of an atlas cell as `(min, max)`.
pub fn cell_bounds(index: usize) -> ([f32; 2], [f32; 2]) {
    let column = (index % ATLAS_COLUMNS) as f32;
    let row = ((index / ATLAS_COLUMNS) % ATLAS_ROWS) as f32;
    let width = 1.0 / ATLAS_COLUMNS as f32;
    let height = 1.0 / ATLAS_ROWS as f32;
    (
        [column * width + ATLAS_INSET, row * height + ATLAS_INSET],
        [(column + 1.0) * width - ATLAS_INSET, (row + 1.0) * height - ATLAS_INSET],
    )
}

/// Texture coordinates of a face corner.
///
/// `corner` is the corner's `(u, v)` on the face in {0, 1}², with `v` pointing
/// up the face. Image rows run downwards, so `v` is flipped.
pub fn corner_uv(index: usize, corner: [i32; 2]) -> [f32; 2] {
    let (min, max) = cell_bounds(index);
    [
        min[0] + (max[0] - min[0]) * corner[0] as f32,
        max[1] - (max[1] - min[1]) * corner[1] as f32,
    ]
}
