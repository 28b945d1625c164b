//! Tessera demos: an animated triangle and a textured Voronoi mosaic.

pub mod assets;
pub mod triangle;
pub mod voronoi;
