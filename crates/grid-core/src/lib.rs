//! Platform-free core of the works grid: an infinite lattice of lazily
//! materialized cards, scrolled by drags with inertial coasting, plus the
//! tween and timer machinery that drives reveal/hide, camera pull and
//! distortion intensity.
//!
//! Nothing in here touches the DOM or the GPU; frontends feed pointer
//! events in, call [`SpatialCardGrid::update`] once per frame and read the
//! card list back out.

pub mod camera;
pub mod card;
pub mod clock;
pub mod config;
pub mod constants;
pub mod distortion;
pub mod grid;
pub mod timeline;
pub mod tween;

pub use camera::*;
pub use card::*;
pub use clock::*;
pub use config::*;
pub use distortion::*;
pub use grid::*;
pub use timeline::*;
pub use tween::*;
