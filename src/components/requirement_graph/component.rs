use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::DiagramConfig;
use super::render;
use super::selection::NodeDetails;
use super::state::{Command, DiagramState};
use super::theme::{Theme, Tier, palette};
use super::types::GraphData;

const FRAME_DT: f64 = 0.016;
const ZOOM_STEP: f64 = 1.2;

/// Shared diagram state plus the signals the overlays read from it.
#[derive(Clone)]
struct DiagramHandle {
	state: Rc<RefCell<Option<DiagramState>>>,
	details: RwSignal<Option<NodeDetails>>,
	theme: RwSignal<Theme>,
}

impl DiagramHandle {
	fn update(&self, f: impl FnOnce(&mut DiagramState)) {
		let (details, theme) = {
			let mut guard = self.state.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			f(s);
			(s.details(), s.theme)
		};
		if self.details.get_untracked() != details {
			self.details.set(details);
		}
		if self.theme.get_untracked() != theme {
			self.theme.set(theme);
		}
	}

	fn dispatch(&self, command: Command) {
		self.update(|s| s.apply(command));
	}

	/// Zooms about the middle of the canvas.
	fn zoom_centered(&self, factor: f64) {
		self.update(|s| {
			let (anchor_x, anchor_y) = (s.width / 2.0, s.height / 2.0);
			s.apply(Command::Zoom {
				factor,
				anchor_x,
				anchor_y,
			});
		});
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn RequirementGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: DiagramConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle = DiagramHandle {
		state: Rc::new(RefCell::new(None)),
		details: RwSignal::new(None),
		theme: RwSignal::new(Theme::default()),
	};
	let (details, theme) = (handle.details, handle.theme);
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let handle_init = handle.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if handle_init.state.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, config.fallback_viewport_height))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};

		match DiagramState::new(&data.get_untracked(), config, w, h) {
			Ok(state) => {
				info!(
					"diagram mounted with {} nodes across {} levels",
					state.nodes.len(),
					state.bands.level_count()
				);
				*handle_init.state.borrow_mut() = Some(state);
			}
			Err(e) => {
				error!("cannot lay out diagram: {e}");
				return;
			}
		}
		handle_init.dispatch(Command::FitView);

		if fullscreen {
			let (handle_resize, canvas_resize) = (handle_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				handle_resize.dispatch(Command::Resize {
					width: nw,
					height: nh,
				});
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (handle_init.state.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.apply(Command::Tick { dt: FRAME_DT });
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	Effect::new(move |_| {
		let theme = theme.get();
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return;
		};
		if let Some(root) = document.document_element() {
			let _ = root.set_attribute("data-theme", theme.name());
		}
		if let Some(body) = document.body() {
			let _ = body.style().set_property("background-color", theme.body_background());
		}
	});

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			handle_md.update(|s| s.pointer_down(x, y));
		}
	};

	let handle_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			handle_mm.update(|s| s.pointer_move(x, y));
		}
	};

	let handle_mu = handle.clone();
	let on_mouseup = move |_: MouseEvent| handle_mu.update(|s| s.pointer_up());

	let handle_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| handle_ml.update(|s| s.pointer_leave());

	let handle_wh = handle.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			handle_wh.dispatch(Command::Zoom {
				factor,
				anchor_x: x,
				anchor_y: y,
			});
		}
	};

	let handle_zoom_in = handle.clone();
	let on_zoom_in = move |_: MouseEvent| handle_zoom_in.zoom_centered(ZOOM_STEP);
	let handle_zoom_out = handle.clone();
	let on_zoom_out = move |_: MouseEvent| handle_zoom_out.zoom_centered(1.0 / ZOOM_STEP);
	let handle_fit = handle.clone();
	let on_fit = move |_: MouseEvent| handle_fit.dispatch(Command::FitView);
	let handle_reset = handle.clone();
	let on_reset = move |_: MouseEvent| handle_reset.dispatch(Command::Reset);
	let handle_theme = handle.clone();
	let on_toggle_theme = move |_: MouseEvent| handle_theme.dispatch(Command::ToggleTheme);
	let handle_close = handle.clone();
	let on_close = move |_: MouseEvent| handle_close.dispatch(Command::Dismiss);

	view! {
		<div class="requirement-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="requirement-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>

			<div class="graph-controls" style=move || controls_style(theme.get())>
				<button class="control-button" title="Zoom in" on:click=on_zoom_in>
					"+"
				</button>
				<button class="control-button" title="Zoom out" on:click=on_zoom_out>
					"−"
				</button>
				<button class="control-button" title="Fit view" on:click=on_fit>
					"⤢"
				</button>
				<button class="control-button" title="Reset view" on:click=on_reset>
					"⟳"
				</button>
				<button class="control-button" title="Toggle theme" on:click=on_toggle_theme>
					{move || theme.get().toggle_glyph()}
				</button>
			</div>

			<div
				class="details-panel"
				style=move || {
					let display = if details.get().is_some() { "block" } else { "none" };
					panel_style(
						theme.get(),
						&format!("top: 15px; right: 15px; width: 16rem; display: {display};"),
					)
				}
			>
				<div style="display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 0.5rem;">
					<h3 style="font-weight: bold; font-size: 1.125rem; margin: 0;">
						"Requirement Details"
					</h3>
					<button
						class="close-button"
						style="background: none; border: none; font-size: 1.5rem; line-height: 1; cursor: pointer; color: inherit;"
						on:click=on_close
					>
						"×"
					</button>
				</div>
				<div style=move || inset_style(theme.get())>
					<h4
						style="font-weight: 600; margin: 0;"
						title=move || details.get().map(|d| d.id).unwrap_or_default()
					>
						{move || details.get().map(|d| d.label).unwrap_or_default()}
					</h4>
					<p style="font-size: 0.875rem; margin: 0.25rem 0 0 0;">
						{move || details.get().map(|d| format!("Level: {}", d.level)).unwrap_or_default()}
					</p>
				</div>
			</div>

			<Legend theme=theme />
		</div>
	}
}

/// Level swatches and captions.
#[component]
fn Legend(theme: RwSignal<Theme>) -> impl IntoView {
	view! {
		<div
			class="graph-legend"
			style=move || {
				panel_style(
					theme.get(),
					"bottom: 15px; left: 50%; transform: translateX(-50%); font-size: 0.75rem;",
				)
			}
		>
			{Tier::ALL
				.into_iter()
				.map(|tier| {
					view! {
						<div
							style="display: flex; align-items: center; margin-bottom: 0.25rem;"
							data-level=tier.level().to_string()
						>
							<div style=move || swatch_style(theme.get(), tier)></div>
							<span>{tier.caption()}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

fn panel_style(theme: Theme, placement: &str) -> String {
	let colors = match theme {
		Theme::Light => "background: #fff; color: #4b5563;",
		Theme::Dark => "background: #111827; color: #d1d5db;",
	};
	format!(
		"position: absolute; {placement} {colors} padding: 0.75rem; border-radius: 0.5rem; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); z-index: 5;"
	)
}

fn swatch_style(theme: Theme, tier: Tier) -> String {
	let colors = palette(theme, tier);
	format!(
		"width: 0.75rem; height: 0.75rem; margin-right: 0.5rem; background: {}; border: 1px solid {};",
		colors.legend_fill, colors.legend_border
	)
}

fn inset_style(theme: Theme) -> &'static str {
	match theme {
		Theme::Light => "background: #f3f4f6; padding: 0.75rem; border-radius: 0.25rem;",
		Theme::Dark => "background: #1f2937; padding: 0.75rem; border-radius: 0.25rem;",
	}
}

fn controls_style(theme: Theme) -> String {
	panel_style(
		theme,
		"bottom: 15px; left: 15px; display: flex; flex-direction: column; gap: 0.25rem; padding: 0.25rem;",
	)
}
