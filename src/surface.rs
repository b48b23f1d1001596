/// What the frame loop does after acquiring the surface texture fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceRecovery {
    /// The surface no longer matches the canvas; configure it again.
    Reconfigure,
    /// Drop this frame and try again on the next one.
    Skip,
    /// Stop rendering for the rest of the session.
    Abandon,
}

pub fn recovery_for(err: &wgpu::SurfaceError) -> SurfaceRecovery {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Abandon,
        _ => SurfaceRecovery::Skip,
    }
}
