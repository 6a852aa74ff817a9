use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

/// Pointer position relative to the canvas.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn with_state(state: &SharedState, f: impl FnOnce(&mut ForceGraphState)) {
	if let Some(ref mut s) = *state.borrow_mut() {
		f(s);
	}
}

/// Full-page canvas overlay drawing the style graph over the audited page.
///
/// `width`/`height` default to the document's scroll size so the overlay
/// covers content below the fold, like the page screenshot does. Either is
/// widened to the graph's extent when the label lanes reach past it.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let root = window.document().and_then(|d| d.document_element());
		let graph = data.get();
		// never narrower than the graph, so the box lane past the page edge is drawn
		let (graph_w, graph_h) = graph.extent();
		let w = width
			.or_else(|| root.as_ref().map(|r| r.scroll_width() as f64))
			.unwrap_or(1400.0)
			.max(graph_w);
		let h = height
			.or_else(|| root.as_ref().map(|r| r.scroll_height() as f64))
			.unwrap_or(1000.0)
			.max(graph_h);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				log::error!("canvas 2d context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = Some(ForceGraphState::new(&graph, w, h));

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			with_state(&state_md, |s| s.pointer_down(x, y));
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			with_state(&state_mm, |s| s.pointer_move(x, y));
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| with_state(&state_mu, |s| s.pointer_up());

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| with_state(&state_ml, |s| s.pointer_leave());

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			with_state(&state_wh, |s| s.zoom_at(x, y, ev.delta_y()));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="style-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="position: absolute; top: 0; left: 0; z-index: 2147483647; cursor: grab;"
		/>
	}
}
