use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::TopologyConfig;
use super::interaction::{HoverTarget, TooltipState};
use super::render::{self, ImageCache, Renderers};
use super::state::{TooltipContent, TopologyState};
use super::types::{GraphData, NodeClickPayload};

const FRAME_DT: f64 = 0.016;

type SharedState = Rc<RefCell<Option<TopologyState>>>;
type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// The live pieces of one rendered graph. Dropping it stops the frame loop
/// and detaches the resize listener.
struct GraphInstance {
	frame: Rc<Cell<Option<i32>>>,
	animate: FrameClosure,
	resize: Option<Closure<dyn FnMut()>>,
}

impl Drop for GraphInstance {
	fn drop(&mut self) {
		let window = web_sys::window();
		if let (Some(window), Some(id)) = (&window, self.frame.take()) {
			let _ = window.cancel_animation_frame(id);
		}
		if let (Some(window), Some(cb)) = (&window, self.resize.take()) {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		// the frame closure holds a handle to its own slot
		self.animate.borrow_mut().take();
		debug!("topology instance disposed");
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

fn tooltip_view(state: &TopologyState) -> Option<(TooltipState, TooltipContent)> {
	let tooltip = state.interaction.tooltip();
	let target = tooltip.target.filter(|_| tooltip.visible)?;
	Some((tooltip, state.tooltip_content(target)?))
}

/// Canvas view of a resource topology.
///
/// A new graph instance is built whenever `data` changes; the previous one
/// is torn down first. Clicking a node selects it and reports its metadata
/// through `on_node_click`.
#[component]
pub fn TopologyCanvas(
	/// Graph to draw.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Sizes and colours. Defaults apply when absent.
	#[prop(optional)]
	config: Option<TopologyConfig>,
	/// Drawing strategies. The resource card and flow edge when absent.
	#[prop(optional)]
	renderers: Option<Renderers>,
	/// Called with the node's id, label and metadata when it is clicked.
	#[prop(optional)]
	on_node_click: Option<Callback<NodeClickPayload>>,
	/// Fill the window and follow its resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width in pixels. The parent's width when absent.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height in pixels. The parent's height, or a height sized to the
	/// graph, when absent.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let instance: Rc<RefCell<Option<GraphInstance>>> = Rc::new(RefCell::new(None));
	let images = Rc::new(ImageCache::default());
	let tooltip = RwSignal::new(None::<(TooltipState, TooltipContent)>);
	let cursor = RwSignal::new("default");
	let config = config.unwrap_or_default();
	let renderers = renderers.unwrap_or_else(|| Renderers::new(&config));

	let teardown = StoredValue::new_local(instance.clone());
	on_cleanup(move || {
		teardown.try_with_value(|instance| drop(instance.borrow_mut().take()));
	});

	let (state_init, instance_init) = (state.clone(), instance.clone());
	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		// stale instance goes before anything new is wired
		instance_init.borrow_mut().take();
		tooltip.set(None);

		let (w, h) = if fullscreen {
			viewport_size(&window)
		} else {
			let parent = |f: fn(&web_sys::Element) -> i32| {
				canvas.parent_element().map(|p| f(&p) as f64).unwrap_or(0.0)
			};
			(
				width.unwrap_or_else(|| parent(web_sys::Element::client_width)),
				height.unwrap_or_else(|| parent(web_sys::Element::client_height)),
			)
		};
		let w = if w > 0.0 { w } else { 800.0 };
		let mut graph = TopologyState::new(data, config.clone(), w, h.max(1.0));
		let h = if h > 0.0 { h } else { graph.preferred_height() };
		graph.resize(w, h);
		graph.fit_to_view();
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		debug!(
			"topology instance created: {} nodes, {} edges, {}x{}",
			graph.data.nodes.len(),
			graph.data.edges.len(),
			w,
			h
		);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("canvas context is not 2d");
					return;
				}
			},
			_ => {
				error!("canvas 2d context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = Some(graph);

		let resize = fullscreen.then(|| {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let cb: Closure<dyn FnMut()> = Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			cb
		});

		let frame = Rc::new(Cell::new(None));
		let animate: FrameClosure = Rc::new(RefCell::new(None));
		let (state_anim, animate_inner, frame_inner) =
			(state_init.clone(), animate.clone(), frame.clone());
		let (renderers, images) = (renderers.clone(), images.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(FRAME_DT);
				}
				render::render(s, &renderers, &images, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				frame_inner.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			frame.set(request_frame(cb));
		}
		*instance_init.borrow_mut() = Some(GraphInstance {
			frame,
			animate,
			resize,
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let outcome = state_mm.borrow_mut().as_mut().map(|s| {
			let changed = s.pointer_move(x, y);
			let icon = if s.pan.active {
				"grabbing"
			} else if matches!(s.interaction.hovered(), Some(HoverTarget::Node(_))) {
				"pointer"
			} else {
				"default"
			};
			(changed.then(|| tooltip_view(s)), icon)
		});
		if let Some((update, icon)) = outcome {
			cursor.set(icon);
			if let Some(view) = update {
				tooltip.set(view);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let clicked = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(x, y),
			None => None,
		};
		if let (Some(cb), Some(payload)) = (on_node_click, clicked) {
			debug!("node clicked: {}", payload.id);
			cb.run(payload);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let left = state_ml
			.borrow_mut()
			.as_mut()
			.is_some_and(|s| s.pointer_leave());
		if left {
			tooltip.set(None);
		}
		cursor.set("default");
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let update = state_wh.borrow_mut().as_mut().map(|s| {
			s.wheel(x, y, ev.delta_y());
			tooltip_view(s)
		});
		if let Some(view) = update {
			tooltip.set(view);
		}
	};

	view! {
		<div class="topology-canvas" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style=move || format!("display: block; cursor: {};", cursor.get())
			/>
			{move || {
				tooltip
					.get()
					.map(|(at, content)| {
						view! {
							<div
								class="topology-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; transform: translate(-50%, calc(-100% - 8px)); pointer-events: none;",
									at.x,
									at.y,
								)
							>
								<div class="topology-tooltip-title">{content.title}</div>
								<dl>
									{content
										.lines
										.into_iter()
										.map(|(key, value)| view! {
											<dt>{key}</dt>
											<dd>{value}</dd>
										})
										.collect_view()}
								</dl>
							</div>
						}
					})
			}}
		</div>
	}
}
