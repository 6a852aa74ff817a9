use leptos::prelude::*;
use log::{debug, error};

use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::extract::{ExtractError, ExtractOptions, StyleGraph, extract};
use crate::host::DomHost;

/// Id of an optional `<script type="application/toml">` carrying options.
pub const OPTIONS_ELEMENT_ID: &str = "style-graph-options";

fn page_options() -> Result<ExtractOptions, ExtractError> {
	let source = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(OPTIONS_ELEMENT_ID))
		.and_then(|e| e.text_content());
	match source {
		Some(source) => ExtractOptions::from_toml_str(&source),
		None => Ok(ExtractOptions::default()),
	}
}

fn run_audit() -> Result<StyleGraph, ExtractError> {
	let options = page_options()?;
	let host = DomHost::from_window()?;
	let graph = extract(&host, &options)?;
	let url = host.location().unwrap_or_default();
	let timestamp = String::from(js_sys::Date::new_0().to_iso_string());
	let graph = graph.with_title(&url, &timestamp);
	debug!("{}", graph.to_json()?);
	Ok(graph)
}

/// Extracts the style graph of the current page and overlays it.
#[component]
pub fn Audit() -> impl IntoView {
	match run_audit() {
		Ok(graph) => {
			let summary = graph.summary();
			let title = graph.title.clone().unwrap_or_default();
			let medias = graph.medias.clone();
			let data = Signal::derive(move || GraphData::from(&graph));
			view! {
				<div class="style-graph">
					<ForceGraphCanvas data=data />
					<div class="graph-overlay">
						<h1>"Style graph"</h1>
						<p class="subtitle">{title}</p>
						<p>
							{format!(
								"{} font styles across {} elements, {} box styles across {} elements",
								summary.font_hubs,
								summary.font_targets,
								summary.box_hubs,
								summary.box_targets,
							)}
						</p>
						<details>
							<summary>{format!("{} @media blocks", medias.len())}</summary>
							<ul>
								{medias.into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
							</ul>
						</details>
					</div>
				</div>
			}
			.into_any()
		}
		Err(err) => {
			error!("style graph extraction failed: {err}");
			view! {
				<div class="graph-overlay">
					<h1>"Uh oh! Something went wrong!"</h1>
					<p>{err.public_message()}</p>
				</div>
			}
			.into_any()
		}
	}
}
