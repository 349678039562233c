//! Chromatic distortion kernels driven by auxiliary maps.
//!
//! Both kernels write a separate destination surface and treat their maps
//! as read-only; hosts generate the maps (displacement, edge distance,
//! normals) from the glass shape being simulated.

/// Per-channel sample offsets along a displacement map.
pub mod aberration;
/// Snell's-law refraction along an edge-distance field.
pub mod dispersion;
