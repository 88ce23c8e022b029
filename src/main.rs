//! # Voxel World Entry Point
//!
//! Loads the area around the origin on the worker pool and logs a summary.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    if let Err(error) = voxel_world::run() {
        eprintln!("voxel-world: {}", error);
        std::process::exit(1);
    }
}
