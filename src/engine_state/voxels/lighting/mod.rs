//! # Lighting Module
//!
//! Skylight is computed per chunk, lazily, the first time a mesh is needed
//! after the chunk was generated or edited. [`skylight`] holds the flood fill
//! itself and [`relight_barrier`] keeps neighbouring chunks from relighting at
//! the same time, since each pass reads its neighbours' boundary light.

pub mod relight_barrier;
pub mod skylight;

pub use relight_barrier::{RelightBarrier, RelightGuard, RelightWaitTimeout};
pub use skylight::{propagate_sky_light, RelightOutcome};
