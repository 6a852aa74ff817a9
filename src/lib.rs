//! Style graph: relates a page's distinct font and box-model declarations to
//! the visible elements using them, and overlays the result on the page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

// Modules
mod components;
pub mod extract;
pub mod host;
mod pages;

use crate::pages::audit::Audit;

pub use crate::extract::{ExtractError, ExtractOptions, StyleGraph, extract};
pub use crate::host::{PageSnapshot, StyleHost};

const OVERLAY_CSS: &str = "
.graph-overlay {
	position: fixed;
	top: 12px;
	right: 12px;
	z-index: 2147483647;
	max-width: 360px;
	padding: 8px 12px;
	background: rgba(255, 255, 255, 0.9);
	font: 14px sans-serif;
	pointer-events: auto;
}
";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Overlay root: audits the page it is mounted into.
#[component]
pub fn App() -> impl IntoView {
	// Provides context for the injected overlay stylesheet.
	provide_meta_context();

	view! {
		<Style>{OVERLAY_CSS}</Style>
		<Audit />
	}
}
