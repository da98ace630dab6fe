//! Leptos component wrapping the graph pipeline and the canvas engine.
//!
//! The component owns the view state (slider cap or active filter), runs the
//! pipeline whenever the update policy says the inputs changed, and hands the
//! resulting frame to the engine. An animation loop runs via
//! `requestAnimationFrame`, advancing the transition and redrawing each frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};
use web_time::Instant;

use super::config::{GraphConfig, GraphDefaults, ViewState};
use super::layout::LayoutConfig;
use super::pipeline::GraphPipeline;
use super::projection::GraphDataProjector;
use super::render;
use super::settings::RendererSettings;
use super::snapshot::{SnapshotOptions, take_snapshot};
use super::state::{EngineEvent, GraphEngine};
use super::theme::Theme;
use super::timing::{ClickGuard, Debouncer};
use super::types::GraphData;
use super::update::{RenderInputs, should_recompute};

/// Frame time assumed by the animation loop.
const FRAME: Duration = Duration::from_millis(16);

/// The engine plus the canvas it draws into.
struct GraphContext {
	engine: GraphEngine,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	bindings: Bindings,
}

/// Handlers attached to engine events.
struct Bindings {
	clicks: ClickGuard,
	edge_color: String,
	highlighted_edge_color: String,
}

impl Bindings {
	fn new(config: &GraphConfig, defaults: &GraphDefaults) -> Self {
		Self {
			clicks: ClickGuard::new(defaults.click_cooldown),
			edge_color: config
				.edge_color
				.clone()
				.unwrap_or_else(|| defaults.edge_color.clone()),
			highlighted_edge_color: config
				.highlighted_edge_color
				.clone()
				.unwrap_or_else(|| defaults.highlighted_edge_color.clone()),
		}
	}

	/// Apply `events` to the engine. Returns the link to follow when a click
	/// on a node with an `href` was honored.
	fn handle(
		&mut self,
		engine: &mut GraphEngine,
		events: Vec<EngineEvent>,
		now: Instant,
	) -> Option<String> {
		let mut navigate = None;
		for event in events {
			match event {
				EngineEvent::OverNode(id) => {
					engine.highlight_neighbors(&id, &self.highlighted_edge_color, &self.edge_color)
				}
				EngineEvent::DragStart(_) => self.clicks.drag_started(),
				EngineEvent::DragEnd(_) => self.clicks.drag_ended(now),
				EngineEvent::ClickNode(id) => {
					if self.clicks.can_click(now) {
						navigate = engine.node(&id).and_then(|n| n.frame.node.href.clone());
					}
				}
			}
		}
		navigate
	}
}

/// Inputs of the last pipeline run, kept for change detection.
struct LastInputs {
	data: GraphData,
	view: ViewState,
	stage: Option<u64>,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Renders an interactive, category-colored node-link graph.
///
/// Nodes are laid out with a force simulation and animate from their previous
/// positions whenever the data or view state changes. Without `data` a small
/// sample graph is shown. Pass a changing `stage` to force a new layout
/// independently of the data.
#[component]
pub fn GraphView(
	#[prop(into, optional)] data: Option<Signal<GraphData>>,
	#[prop(optional)] config: GraphConfig,
	#[prop(into, optional)] stage: Option<Signal<u64>>,
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let defaults = GraphDefaults::default();
	let data = data.unwrap_or_else(|| Signal::derive(GraphData::sample));
	let config = Arc::new(config);
	let theme = theme.unwrap_or_default();
	let settings = RendererSettings::from_config(&config, &defaults);

	let view_state = RwSignal::new(ViewState::initial(&config));
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	let pipeline = Rc::new(RefCell::new(GraphPipeline::new(
		&defaults,
		LayoutConfig::default(),
	)));
	let context: SharedContext = Rc::new(RefCell::new(None));
	let last_inputs: Rc<RefCell<Option<LastInputs>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let (config_fx, defaults_fx, context_fx) = (config.clone(), defaults.clone(), context.clone());
	Effect::new(move |_| {
		let next = LastInputs {
			data: data.get(),
			view: view_state.get(),
			stage: stage.map(|s| s.get()),
		};
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if context_fx.borrow().is_none() {
			if let Err(e) = mount(
				&canvas,
				&context_fx,
				&animate,
				&resize_cb,
				settings.clone(),
				theme.clone(),
				Bindings::new(&config_fx, &defaults_fx),
				defaults_fx.height,
			) {
				error!("force-graph-view: cannot attach to canvas: {e}");
				return;
			}
		}

		let recompute = match last_inputs.borrow().as_ref() {
			None => true,
			Some(prev) => should_recompute(
				&RenderInputs {
					data: &prev.data,
					view: &prev.view,
					stage: prev.stage.as_ref(),
				},
				&RenderInputs {
					data: &next.data,
					view: &next.view,
					stage: next.stage.as_ref(),
				},
			),
		};
		if recompute {
			draw_graph(&pipeline, &context_fx, &next, &config_fx, settings.clone());
		} else {
			debug!("force-graph-view: inputs unchanged, keeping current layout");
		}
		*last_inputs.borrow_mut() = Some(next);
	});

	let projector = GraphDataProjector::new(&defaults);
	let config_legend = config.clone();
	let legend = Memo::new(move |_| {
		data.with(|d| projector.color_scale(d, &config_legend).legend())
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.engine.pointer_down(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let events = c.engine.pointer_move(x, y);
			c.bindings.handle(&mut c.engine, events, Instant::now());
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let target = match *context_mu.borrow_mut() {
			Some(ref mut c) => {
				let events = c.engine.pointer_up(x, y);
				c.bindings.handle(&mut c.engine, events, Instant::now())
			}
			None => None,
		};
		if let Some(href) = target {
			navigate(&href);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			let events = c.engine.pointer_leave();
			c.bindings.handle(&mut c.engine, events, Instant::now());
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			if c.engine.settings.enable_camera {
				ev.prevent_default();
				c.engine.wheel(x, y, ev.delta_y());
			}
		}
	};

	let (config_dl, context_dl) = (config.clone(), context.clone());
	let on_download = move |_: MouseEvent| {
		if context_dl.borrow().is_none() {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			error!("force-graph-view: download requested without a canvas");
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let options = SnapshotOptions {
			download: true,
			legend: config_dl.show_legend.then(|| legend.get_untracked()),
			title: config_dl.title.clone(),
			..SnapshotOptions::default()
		};
		if let Err(e) = take_snapshot(&canvas, &options) {
			error!("force-graph-view: snapshot failed: {e}");
		}
	};

	let controls = controls(&config, &defaults, view_state);
	let header_text = config.header_text.clone();
	let height = defaults.height;

	view! {
		<div class="graph-view">
			<div class="graph-view-header" style="display: flex; justify-content: space-between;">
				<div>
					{move || {
						legend
							.get()
							.into_iter()
							.map(|entry| {
								view! {
									<span style="display: inline-block; font-size: 0.9rem; margin-right: 1rem; white-space: nowrap;">
										<span style=format!(
											"background: {}; border-radius: 0.5rem; display: inline-block; height: 0.8rem; position: relative; top: 0.1rem; width: 0.8rem;",
											entry.color,
										)></span>
										" "
										{entry.text}
									</span>
								}
							})
							.collect_view()
					}}
				</div>
				<div style="white-space: nowrap;">{header_text}</div>
			</div>
			<div style="position: relative;">
				<canvas
					node_ref=canvas_ref
					class="graph-view-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style=format!("display: block; width: 100%; height: {height}px;")
				/>
			</div>
			<div class="graph-view-footer" style="display: flex; align-items: flex-end; justify-content: space-between;">
				{controls}
				<a class="button small secondary" on:click=on_download>
					"Download (.png)"
				</a>
			</div>
		</div>
	}
}

/// Filter selector when filters are configured, otherwise the node-cap slider.
fn controls(config: &GraphConfig, defaults: &GraphDefaults, view_state: RwSignal<ViewState>) -> AnyView {
	if config.hide_filter {
		return ().into_any();
	}

	if !config.filters.is_empty() {
		let radios = config
			.filter_names()
			.map(|name| {
				let (name, checked_name, selected_name) = (name.to_owned(), name.to_owned(), name.to_owned());
				view! {
					<label style="display: inline-block; margin-right: 1rem;">
						<input
							type="radio"
							value=name.clone()
							prop:checked=move || {
								view_state.with(|v| v.current_filter.as_deref() == Some(checked_name.as_str()))
							}
							on:change=move |_| {
								view_state.update(|v| v.current_filter = Some(selected_name.clone()))
							}
						/>
						{name}
					</label>
				}
			})
			.collect_view();
		return view! { <form>{radios}</form> }.into_any();
	}

	let (min, max) = (defaults.max_nodes, defaults.max_max_nodes);
	let slider = StoredValue::new_local(SliderRelease::<TimeoutHandle>::new(defaults.slider_debounce));
	on_cleanup(move || {
		if let Some(Some(timer)) = slider.try_update_value(SliderRelease::cancel) {
			timer.clear();
		}
	});

	let on_input = move |ev: leptos::ev::Event| {
		let Ok(value) = event_target_value(&ev).parse::<usize>() else {
			return;
		};
		let now = Instant::now();
		if let Some(Some(stale)) = slider.try_update_value(|s| s.restart(value.clamp(min, max), now)) {
			stale.clear();
		}
		arm_release(slider, view_state, slider.with_value(SliderRelease::delay));
	};

	view! {
		<div>
			<label>"Maximum Number of Nodes"</label>
			<div style="display: flex; justify-content: space-between;">
				<span>{min.to_string()}</span>
				<span>{max.to_string()}</span>
			</div>
			<input
				type="range"
				style="min-width: 15rem;"
				min=min.to_string()
				max=max.to_string()
				value=min.to_string()
				on:input=on_input
			/>
		</div>
	}
	.into_any()
}

/// Outcome of a slider timer firing.
#[derive(Debug, PartialEq)]
enum Release {
	Value(usize),
	/// The timer fired early; wait this much longer.
	Wait(Duration),
	Idle,
}

/// The debounced slider value and the one timer waiting to release it.
struct SliderRelease<H> {
	debouncer: Debouncer<usize>,
	timer: Option<H>,
}

impl<H> SliderRelease<H> {
	fn new(delay: Duration) -> Self {
		Self {
			debouncer: Debouncer::new(delay),
			timer: None,
		}
	}

	fn delay(&self) -> Duration {
		self.debouncer.delay()
	}

	/// Record a new value. Returns the previous timer for the caller to clear.
	fn restart(&mut self, value: usize, now: Instant) -> Option<H> {
		self.debouncer.start(value, now);
		self.timer.take()
	}

	/// Track `timer` as the live one. Returns any timer it replaces.
	fn arm(&mut self, timer: H) -> Option<H> {
		self.timer.replace(timer)
	}

	fn fire(&mut self, now: Instant) -> Release {
		self.timer = None;
		if let Some(value) = self.debouncer.poll(now) {
			return Release::Value(value);
		}
		match self.debouncer.time_until_release(now) {
			Some(wait) => Release::Wait(wait),
			None => Release::Idle,
		}
	}

	fn cancel(&mut self) -> Option<H> {
		self.debouncer.cancel();
		self.timer.take()
	}
}

/// Start the timer that applies the slider value once it is released,
/// re-arming it if the browser fires early.
fn arm_release(
	slider: StoredValue<SliderRelease<TimeoutHandle>, LocalStorage>,
	view_state: RwSignal<ViewState>,
	wait: Duration,
) {
	let timer = set_timeout_with_handle(
		move || match slider.try_update_value(|s| s.fire(Instant::now())) {
			Some(Release::Value(released)) => {
				info!("force-graph-view: node cap set to {released}");
				view_state.update(|v| v.current_max_nodes = Some(released));
			}
			Some(Release::Wait(remaining)) => arm_release(slider, view_state, remaining),
			Some(Release::Idle) | None => {}
		},
		wait,
	);
	match timer {
		Ok(timer) => {
			if let Some(Some(stale)) = slider.try_update_value(|s| s.arm(timer)) {
				stale.clear();
			}
		}
		Err(e) => error!("force-graph-view: cannot schedule slider update: {e:?}"),
	}
}

/// Size the canvas, create the engine and start the animation loop.
#[allow(clippy::too_many_arguments)]
fn mount(
	canvas: &HtmlCanvasElement,
	context: &SharedContext,
	animate: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize_cb: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	settings: RendererSettings,
	theme: Theme,
	bindings: Bindings,
	height: f64,
) -> Result<(), String> {
	let window: Window = web_sys::window().ok_or("no window")?;
	let width = container_width(canvas);
	canvas.set_width(width as u32);
	canvas.set_height(height as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|e| format!("{e:?}"))?
		.ok_or("no 2d context")?
		.dyn_into()
		.map_err(|_| "2d context has an unexpected type")?;

	*context.borrow_mut() = Some(GraphContext {
		engine: GraphEngine::new(settings, width, height),
		ctx,
		theme,
		bindings,
	});
	info!("force-graph-view: canvas attached ({width}x{height})");

	let (context_resize, canvas_resize) = (context.clone(), canvas.clone());
	*resize_cb.borrow_mut() = Some(Closure::new(move || {
		let width = container_width(&canvas_resize);
		canvas_resize.set_width(width as u32);
		if let Some(ref mut c) = *context_resize.borrow_mut() {
			c.engine.resize(width, c.engine.height);
		}
	}));
	if let Some(ref cb) = *resize_cb.borrow() {
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}

	let (context_anim, animate_inner) = (context.clone(), animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref mut c) = *context_anim.borrow_mut() {
			c.engine.tick(FRAME);
			render::render(&c.engine, &c.ctx, &c.theme);
		}
		if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
			let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
	Ok(())
}

/// Run the pipeline and load the result into the engine.
///
/// Runs are serialized: a trigger arriving while a run is in progress is
/// dropped. An empty projection clears the engine instead of rendering.
fn draw_graph(
	pipeline: &RefCell<GraphPipeline>,
	context: &SharedContext,
	inputs: &LastInputs,
	config: &GraphConfig,
	settings: RendererSettings,
) {
	let Ok(mut pipeline) = pipeline.try_borrow_mut() else {
		debug!("force-graph-view: pipeline busy, trigger ignored");
		return;
	};
	let result = pipeline.run(&inputs.data, config, &inputs.view);
	let mut context = context.borrow_mut();
	let Some(c) = context.as_mut() else {
		return;
	};
	match result {
		Ok(Some(frame)) => {
			debug!(
				"force-graph-view: rendering {} nodes, {} edges",
				frame.nodes.len(),
				frame.edges.len()
			);
			c.engine.load(frame, settings);
		}
		Ok(None) => {
			debug!("force-graph-view: nothing to render");
			c.engine.clear();
		}
		Err(e) => error!("force-graph-view: {e}"),
	}
}

fn container_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(800.0)
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn navigate(href: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(e) = window.location().set_href(href) {
		error!("force-graph-view: navigation to {href} failed: {e:?}");
	}
}
