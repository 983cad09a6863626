//! Common utilities for integration tests

pub mod mock_kernels;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_kernels::{KernelCall, RecordingKernels};
pub use test_helpers::{
    assert_fields_close,
    cell_grid,
    face_grids,
    interior_vector,
    manufactured_rhs,
};
