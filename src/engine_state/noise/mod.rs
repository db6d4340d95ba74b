//! # Noise
//!
//! Coherent noise used by the terrain generators. Only classic gradient (Perlin) noise is
//! provided; it is seeded, so the same seed always produces the same world.

pub mod perlin;

pub use perlin::PerlinNoise;
