//! CPU wireframe overlay
//!
//! Projects the grid, model edges, selection brackets and name labels into
//! per-viewport 2D line lists that a UI toolkit can paint directly.

use glam::{Mat4, Vec2, Vec3};

use pose_core::{BoundingBox, Model, Scene};

use crate::camera::ViewPreset;
use crate::config::ViewConfig;
use crate::constants::wireframe::{BRACKET_FRACTION, MAX_TRIANGLES_PER_PART};
use crate::view::RenderView;
use crate::viewport::{Viewport, ViewportRect};

/// A projected 2D line in view pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point
    pub start: Vec2,
    /// End point
    pub end: Vec2,
    /// RGBA color
    pub color: [f32; 4],
}

/// A projected text label in view pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Anchor point
    pub position: Vec2,
    /// Text
    pub text: String,
    /// RGBA color
    pub color: [f32; 4],
}

/// Everything to paint for one visible viewport
#[derive(Debug, Clone, Default)]
pub struct ViewportOverlay {
    /// Viewport index
    pub index: usize,
    /// Viewport rectangle in view pixels
    pub rect: ViewportRect,
    /// Caption shown when the interface chrome is visible
    pub caption: Option<&'static str>,
    /// Line segments
    pub lines: Vec<LineSegment>,
    /// Labels
    pub labels: Vec<Label>,
}

/// Build overlays for every visible viewport of `view`
pub fn build_overlays(
    view: &RenderView,
    scene: &Scene,
    config: &ViewConfig,
) -> Vec<ViewportOverlay> {
    view.visible_viewports()
        .map(|viewport| build_viewport_overlay(view, viewport, scene, config))
        .collect()
}

fn build_viewport_overlay(
    view: &RenderView,
    viewport: &Viewport,
    scene: &Scene,
    config: &ViewConfig,
) -> ViewportOverlay {
    let chrome = view.chrome();
    let mut overlay = ViewportOverlay {
        index: viewport.index,
        rect: viewport.rect,
        caption: chrome.interface.then(|| viewport.camera.preset.name()),
        ..Default::default()
    };

    if chrome.grid {
        push_grid(&mut overlay.lines, viewport, config);
    }

    let selected = scene.selection().selected_model();
    for model in scene.models_iter() {
        let Some(world) = scene.model_world_transform(model.id) else {
            continue;
        };
        let is_selected = selected == Some(model.id);
        let color = if is_selected {
            config.selection_color
        } else {
            model.color
        };
        push_model_edges(&mut overlay.lines, viewport, model, world, color);

        if is_selected && chrome.brackets {
            if let Some(bounds) = scene.model_world_bounds(model.id) {
                push_brackets(&mut overlay.lines, viewport, &bounds, config.selection_color);
            }
        }

        if chrome.annotations {
            if let Some(position) = scene
                .model_world_bounds(model.id)
                .filter(BoundingBox::is_valid)
                .and_then(|bounds| viewport.project(bounds.center()))
            {
                overlay.labels.push(Label {
                    position,
                    text: model.name.clone(),
                    color: config.model_color,
                });
            }
        }
    }

    overlay
}

fn push_line(lines: &mut Vec<LineSegment>, viewport: &Viewport, a: Vec3, b: Vec3, color: [f32; 4]) {
    if let (Some(start), Some(end)) = (viewport.project(a), viewport.project(b)) {
        lines.push(LineSegment { start, end, color });
    }
}

/// Plane spanned by the grid: XY for the free and top cameras, otherwise the
/// plane facing the camera
fn grid_axes(preset: ViewPreset) -> (Vec3, Vec3) {
    match preset {
        ViewPreset::Free | ViewPreset::Top => (Vec3::X, Vec3::Y),
        ViewPreset::Front => (Vec3::X, Vec3::Z),
        ViewPreset::Left => (Vec3::Y, Vec3::Z),
    }
}

fn push_grid(lines: &mut Vec<LineSegment>, viewport: &Viewport, config: &ViewConfig) {
    let grid = &config.grid;
    if grid.spacing <= 0.0 || grid.size <= 0.0 {
        return;
    }
    let (u, v) = grid_axes(viewport.camera.preset);
    let rgba = |c: [f32; 3]| [c[0], c[1], c[2], 1.0];
    let line_color = rgba(grid.line_color);
    let u_axis_color = rgba(grid.x_axis_color);
    let v_axis_color = if v == Vec3::Z {
        rgba([0.2, 0.4, 0.9])
    } else {
        rgba(grid.y_axis_color)
    };

    let steps = (grid.size / grid.spacing).floor() as i32;
    for i in -steps..=steps {
        let offset = i as f32 * grid.spacing;
        // Line parallel to u
        let color = if i == 0 { u_axis_color } else { line_color };
        push_line(lines, viewport, u * -grid.size + v * offset, u * grid.size + v * offset, color);
        // Line parallel to v
        let color = if i == 0 { v_axis_color } else { line_color };
        push_line(lines, viewport, v * -grid.size + u * offset, v * grid.size + u * offset, color);
    }
}

fn push_model_edges(
    lines: &mut Vec<LineSegment>,
    viewport: &Viewport,
    model: &Model,
    world: Mat4,
    color: [f32; 4],
) {
    model.visit_parts(|part, transform| {
        let matrix = world * transform;
        if part.mesh.triangle_count() > MAX_TRIANGLES_PER_PART {
            push_box(lines, viewport, &part.mesh.bounds().transform(&matrix), color);
            return;
        }
        for [a, b, c] in part.mesh.triangles() {
            let a = matrix.transform_point3(a);
            let b = matrix.transform_point3(b);
            let c = matrix.transform_point3(c);
            push_line(lines, viewport, a, b, color);
            push_line(lines, viewport, b, c, color);
            push_line(lines, viewport, c, a, color);
        }
    });
}

/// Indices of the 12 box edges into `BoundingBox::corners`
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

fn push_box(
    lines: &mut Vec<LineSegment>,
    viewport: &Viewport,
    bounds: &BoundingBox,
    color: [f32; 4],
) {
    if !bounds.is_valid() {
        return;
    }
    let corners = bounds.corners();
    for (a, b) in BOX_EDGES {
        push_line(lines, viewport, corners[a], corners[b], color);
    }
}

/// Short arms at every corner of the box, pointing along its edges
fn push_brackets(
    lines: &mut Vec<LineSegment>,
    viewport: &Viewport,
    bounds: &BoundingBox,
    color: [f32; 4],
) {
    if !bounds.is_valid() {
        return;
    }
    let corners = bounds.corners();
    for (a, b) in BOX_EDGES {
        let (from, to) = (corners[a], corners[b]);
        let arm = (to - from) * BRACKET_FRACTION;
        push_line(lines, viewport, from, from + arm, color);
        push_line(lines, viewport, to, to - arm, color);
    }
}
