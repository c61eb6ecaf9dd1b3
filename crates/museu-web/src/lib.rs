//! Museu Web - browser front end for the virtual museum
//!
//! This crate assembles the Bevy app (start screen, tour overlay and the
//! walkthrough plugins from `museu-scene`). It builds as a WASM module for the
//! browser and as a library for the native launcher.

pub mod app;
mod ui;

#[cfg(target_arch = "wasm32")]
mod deep_link;

pub use app::{run, LaunchOptions};

/// Built-in museum configuration served with the web build
pub const DEFAULT_CONFIG: &str = include_str!("../../../assets/museum.toml");

/// Entry point for WASM module
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let config = match museu_core::MuseumConfig::from_toml(DEFAULT_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Built-in configuration is invalid, using defaults: {}", e);
            museu_core::MuseumConfig::default()
        }
    };

    // Run the Bevy app
    app::run(LaunchOptions {
        config,
        // Assets are served from the page root
        asset_root: String::new(),
        avatar: deep_link::avatar_param(),
    });
}
