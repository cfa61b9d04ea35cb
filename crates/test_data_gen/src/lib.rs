//! Fixture generator for reurb-seed tests and benchmarks.
//!
//! Produces a deterministic project → quadra → property tree and renders it
//! as a Supabase dump, `seed.sql` and `seed-properties.sql`, optionally with
//! dangling references injected.
//!
//! # Example
//!
//! ```rust
//! use test_data_gen::{Generator, RenderConfig, Renderer, Scale};
//!
//! let data = Generator::new(42, Scale::Small).generate();
//! let renderer = Renderer::new(RenderConfig::default());
//! let dump = renderer
//!     .render_to_string(&data, Renderer::render_supabase_dump)
//!     .unwrap();
//!
//! assert!(dump.contains("ARRAY["));
//! ```

pub mod fake;
pub mod generator;
pub mod renderer;

pub use generator::{
    Generator, OrphanConfig, Project, Property, Quadra, ReurbData, Scale, MARABAIXO_ID,
    OIAPOQUE_ID,
};
pub use renderer::{RenderConfig, Renderer, PROPERTY_COLUMNS};
