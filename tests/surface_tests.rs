// Host-side tests for surface error handling.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

mod surface {
    include!("../src/surface.rs");
}

use surface::*;

#[test]
fn lost_and_outdated_surfaces_are_reconfigured() {
    assert_eq!(
        recovery_for(&wgpu::SurfaceError::Lost),
        SurfaceRecovery::Reconfigure
    );
    assert_eq!(
        recovery_for(&wgpu::SurfaceError::Outdated),
        SurfaceRecovery::Reconfigure
    );
}

#[test]
fn timeouts_skip_one_frame() {
    assert_eq!(
        recovery_for(&wgpu::SurfaceError::Timeout),
        SurfaceRecovery::Skip
    );
}

#[test]
fn out_of_memory_stops_rendering() {
    assert_eq!(
        recovery_for(&wgpu::SurfaceError::OutOfMemory),
        SurfaceRecovery::Abandon
    );
}
