/// The relative offsets of the 3x3 neighborhood, row-major.
///
/// Shared by the neighborhood operators; each operator applies its own
/// boundary policy when an offset lands outside the grid.
pub const NEIGHBORHOOD_3X3: [(isize, isize); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Create the 3x3 sobel kernel pair.
///
/// # Returns
///
/// The horizontal and vertical gradient kernels, indexed `[row][col]`.
pub fn sobel_kernel_3x3() -> ([[f32; 3]; 3], [[f32; 3]; 3]) {
    let kernel_x = [
        [-1.0, 0.0, 1.0],
        [-2.0, 0.0, 2.0],
        [-1.0, 0.0, 1.0],
    ];
    let kernel_y = [
        [-1.0, -2.0, -1.0],
        [0.0, 0.0, 0.0],
        [1.0, 2.0, 1.0],
    ];
    (kernel_x, kernel_y)
}
