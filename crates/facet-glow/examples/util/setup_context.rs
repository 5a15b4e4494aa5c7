// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `facet-glow`.
//
// `facet-glow` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `facet-glow` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `facet-glow`. If not, see <https://www.gnu.org/licenses/>.

// Shared module for the examples: opens a window with glutin and plays the
// part of the host windowing layer, driving a scene through the surface
// lifecycle.

mod util {
    use facet::{Scene, SceneConfig, SurfaceRenderer};
    use facet_glow::GlowContext;

    use glutin::config::ConfigTemplateBuilder;
    use glutin::context::{
        ContextApi, ContextAttributesBuilder, NotCurrentContext, PossiblyCurrentContext, Version,
    };
    use glutin::display::GetGlDisplay;
    use glutin::prelude::*;
    use glutin::surface::{Surface, SwapInterval, WindowSurface};
    use glutin_winit::{DisplayBuilder, GlWindow};

    use raw_window_handle::HasRawWindowHandle;

    use std::num::NonZeroU32;
    use std::time::Instant;

    use winit::event::{Event, WindowEvent};
    use winit::event_loop::EventLoop;
    use winit::window::{Window, WindowBuilder};

    pub(crate) fn init() {
        tracing_subscriber::fmt::init();
    }

    /// Open a window and drive `config` through the surface lifecycle until
    /// the window is closed.
    ///
    /// An unsupported device is reported and leaves the window running with
    /// rendering disabled; so does a failed shader build. There is no
    /// fallback rendering path.
    pub(crate) fn run_scene(config: SceneConfig) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new();
        let title = format!("facet: {}", config.name);

        // Start building a window; some platforms want it before the display.
        let window = if cfg!(windows) {
            Some(WindowBuilder::new().with_title(title.clone()))
        } else {
            None
        };

        // The octahedron stage needs a depth buffer, so ask for one up front.
        let display = DisplayBuilder::new().with_window_builder(window);
        let (mut window, gl_config) = display.build(
            &event_loop,
            ConfigTemplateBuilder::new().with_depth_size(24),
            |configs| {
                configs
                    .max_by_key(|config| config.num_samples())
                    .unwrap()
            },
        )?;

        // Prefer an ES 3.2 context, then fall back to whatever the platform
        // offers; the capability gate below sorts out the rest.
        let window_handle = window.as_ref().map(|w| w.raw_window_handle());
        let context_attributes = [
            ContextAttributesBuilder::new()
                .with_context_api(ContextApi::Gles(Some(Version::new(3, 2))))
                .build(window_handle),
            ContextAttributesBuilder::new().build(window_handle),
            ContextAttributesBuilder::new()
                .with_context_api(ContextApi::Gles(None))
                .build(window_handle),
        ];

        let gl_display = gl_config.display();
        let context = (|| {
            for attributes in &context_attributes {
                if let Ok(context) = unsafe { gl_display.create_context(&gl_config, attributes) } {
                    return Ok(context);
                }
            }

            Err(Box::<dyn std::error::Error>::from(
                "could not create a GL context",
            ))
        })()?;

        let mut not_current: Option<NotCurrentContext> = Some(context);
        let mut current: Option<(PossiblyCurrentContext, Surface<WindowSurface>, Window)> = None;
        let mut renderer: Option<GlowContext<glow::Context>> = None;
        let mut scene = Scene::<GlowContext<glow::Context>>::new(config);
        let start = Instant::now();

        event_loop.run(move |event, window_target, control_flow| {
            control_flow.set_poll();

            match event {
                Event::Resumed => {
                    let window = window.take().unwrap_or_else(|| {
                        let builder = WindowBuilder::new().with_title(title.clone());
                        glutin_winit::finalize_window(window_target, builder, &gl_config).unwrap()
                    });

                    let attrs = window.build_surface_attributes(<_>::default());
                    let gl_surface = unsafe {
                        gl_display
                            .create_window_surface(&gl_config, &attrs)
                            .unwrap()
                    };

                    let gl_context = not_current
                        .take()
                        .expect("resumed with a current context")
                        .make_current(&gl_surface)
                        .unwrap();

                    if let Err(err) = gl_surface
                        .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
                    {
                        tracing::warn!("error setting vsync: {err:?}");
                    }

                    // SAFETY: the context we just made current stays current
                    // until Suspended.
                    let glow_context = unsafe {
                        glow::Context::from_loader_function_cstr(|s| {
                            gl_display.get_proc_address(s) as *const _
                        })
                    };

                    match unsafe { GlowContext::new(glow_context) } {
                        Ok(context) => {
                            let size = window.inner_size();
                            let built = scene.surface_created(&context).and_then(|()| {
                                scene.surface_changed(&context, size.width, size.height)
                            });
                            match built {
                                Ok(()) => renderer = Some(context),
                                Err(error) => {
                                    tracing::error!(%error, "scene build failed; rendering disabled");
                                }
                            }
                        }
                        Err(error) => {
                            tracing::error!(%error, "rendering disabled");
                        }
                    }

                    current = Some((gl_context, gl_surface, window));
                }
                Event::Suspended => {
                    // Mobile targets can drop the backing window at any time;
                    // every GL object dies with the context surface pairing.
                    renderer = None;
                    if let Some((gl_context, ..)) = current.take() {
                        not_current = Some(gl_context.make_not_current().unwrap());
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) if size.width != 0 && size.height != 0 => {
                        if let Some((gl_context, gl_surface, _)) = &current {
                            gl_surface.resize(
                                gl_context,
                                NonZeroU32::new(size.width).unwrap(),
                                NonZeroU32::new(size.height).unwrap(),
                            );
                        }

                        let mut failed = false;
                        if let Some(context) = &renderer {
                            if let Err(error) =
                                scene.surface_changed(context, size.width, size.height)
                            {
                                tracing::error!(%error, "resize failed; rendering disabled");
                                failed = true;
                            }
                        }
                        if failed {
                            renderer = None;
                        }
                    }
                    WindowEvent::CloseRequested => control_flow.set_exit(),
                    _ => (),
                },
                Event::RedrawEventsCleared => {
                    if let Some((gl_context, gl_surface, _)) = &current {
                        let mut failed = false;
                        if let Some(context) = &renderer {
                            let elapsed = start.elapsed().as_secs_f32();
                            if let Err(error) = scene.draw_frame(context, elapsed) {
                                tracing::error!(%error, "draw failed; rendering disabled");
                                failed = true;
                            } else {
                                gl_surface.swap_buffers(gl_context).unwrap();
                            }
                        }
                        if failed {
                            renderer = None;
                        }
                    }
                }
                _ => (),
            }
        })
    }
}
