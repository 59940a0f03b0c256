// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui view of a graph.
//!
//! Paints nodes, ports and connections from graph state and turns primary
//! pointer press/move/release into [`DragController`] calls.

use crate::connection::{Connection, ConnectionId};
use crate::drag::{DragController, DragOutcome};
use crate::graph::Graph;
use crate::node::Node;
use crate::port::Port;
use crate::scene::{SceneEvent, SceneHost, SceneItem};
use egui::epaint::CubicBezierShape;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use indexmap::IndexMap;

const NODE_ROUNDING: f32 = 4.0;
const NODE_SHADOW_OFFSET: f32 = 3.0;
const PORT_LABEL_PADDING: f32 = 12.0;
const CONNECTION_THICKNESS: f32 = 2.5;
const HIGHLIGHT_SCALE: f32 = 1.3;

/// Interactive view state for one graph
#[derive(Debug, Default)]
pub struct GraphView {
    /// Connection drag state machine
    drag: DragController,
    /// Scroll offset of the canvas
    pub pan: Vec2,
    /// Last known pointer position (screen space)
    last_pointer: Option<Pos2>,
    /// Opacity animation length per connection, from fade events
    fades: IndexMap<ConnectionId, f32>,
}

impl GraphView {
    /// Create a new view
    pub fn new() -> Self {
        Self::default()
    }

    /// Drag state machine
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Convert screen position to graph position
    pub fn screen_to_graph(&self, screen_pos: Pos2, rect: Rect) -> Pos2 {
        screen_pos - rect.min.to_vec2() - self.pan
    }

    /// Convert graph position to screen position
    pub fn graph_to_screen(&self, graph_pos: Pos2, rect: Rect) -> Pos2 {
        graph_pos + rect.min.to_vec2() + self.pan
    }

    /// Handle input and paint the graph into the remaining space of `ui`
    pub fn ui(&mut self, ui: &mut egui::Ui, graph: &mut Graph) -> egui::Response {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        self.handle_input(ui, rect, graph);
        self.apply_events(ui.ctx(), graph);

        let painter = ui.painter_at(rect);
        // Connections below nodes
        self.draw_connections(&painter, rect, graph);
        self.draw_nodes(&painter, rect, graph);

        response
    }

    fn handle_input(&mut self, ui: &egui::Ui, rect: Rect, graph: &mut Graph) {
        let (pressed, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let Some(screen_pos) = pointer.or(self.last_pointer) else {
            return;
        };
        self.last_pointer = Some(screen_pos);
        let pos = self.screen_to_graph(screen_pos, rect);

        if pressed && rect.contains(screen_pos) && !self.drag.is_dragging() {
            if let Some(SceneItem::Port(port)) = graph.item_at(pos) {
                self.drag.press(graph, port, pos);
            }
        }

        if self.drag.is_dragging() {
            self.drag.move_to(graph, pos);
        }

        if released {
            let outcome = self.drag.release(graph);
            if outcome != DragOutcome::Ignored {
                tracing::debug!("Connection drag finished: {:?}", outcome);
            }
        }
    }

    /// Drain the graph's effect queue; fades become opacity animations
    fn apply_events(&mut self, ctx: &egui::Context, graph: &mut Graph) {
        let mut changed = false;
        for event in graph.take_events() {
            match event {
                SceneEvent::Fade { connection, duration, .. } => {
                    self.fades.insert(connection, duration.as_secs_f32());
                    changed = true;
                }
                SceneEvent::ConnectionDetached(connection) => {
                    self.fades.shift_remove(&connection);
                    changed = true;
                }
                SceneEvent::ConnectionAttached(_)
                | SceneEvent::PathChanged(_)
                | SceneEvent::PortHighlighted { .. } => changed = true,
            }
        }
        if changed {
            ctx.request_repaint();
        }
    }

    fn draw_connections(&self, painter: &egui::Painter, rect: Rect, graph: &Graph) {
        for connection in graph.connections() {
            let duration = self.fades.get(&connection.id).copied().unwrap_or(0.0);
            let opacity = painter.ctx().animate_value_with_time(
                egui::Id::new(("connection_fade", connection.id)),
                connection.opacity(),
                duration,
            );
            let color = connection_color(graph, connection, opacity);
            let points = connection.path().points().map(|p| self.graph_to_screen(p, rect));
            painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new(CONNECTION_THICKNESS, color),
            ));
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, rect: Rect, graph: &Graph) {
        let config = graph.config();
        for node in graph.nodes() {
            let node_rect = node.rect(config);
            let screen_rect = Rect::from_min_size(self.graph_to_screen(node_rect.min, rect), node_rect.size());
            if !screen_rect.intersects(rect) {
                continue;
            }

            // Shadow
            painter.rect_filled(
                screen_rect.translate(Vec2::new(NODE_SHADOW_OFFSET, NODE_SHADOW_OFFSET)),
                NODE_ROUNDING,
                Color32::from_rgba_unmultiplied(0, 0, 0, 60),
            );

            painter.rect_filled(screen_rect, NODE_ROUNDING, Color32::from_rgba_unmultiplied(120, 120, 120, 191));
            painter.rect_stroke(
                screen_rect,
                NODE_ROUNDING,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 64)),
            );

            let header_rect = Rect::from_min_size(screen_rect.min, Vec2::new(screen_rect.width(), config.header_height));
            painter.text(
                header_rect.center(),
                egui::Align2::CENTER_CENTER,
                &node.title,
                egui::FontId::proportional(12.0),
                Color32::WHITE,
            );

            for port in node.ports() {
                self.draw_port(painter, rect, graph, node, port);
            }
        }
    }

    fn draw_port(&self, painter: &egui::Painter, rect: Rect, graph: &Graph, node: &Node, port: &Port) {
        let config = graph.config();
        let Some(center) = node.port_position(port.id, config) else {
            return;
        };
        let center = self.graph_to_screen(center, rect);
        let [r, g, b] = port.port_type.color();
        let radius = if port.is_highlighted() {
            config.port_radius * HIGHLIGHT_SCALE
        } else {
            config.port_radius
        };

        painter.circle_filled(center, radius, Color32::from_rgb(r, g, b));
        painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::from_gray(30)));

        let (label_pos, align) = if port.is_input() {
            (Pos2::new(center.x + PORT_LABEL_PADDING, center.y), egui::Align2::LEFT_CENTER)
        } else {
            (Pos2::new(center.x - PORT_LABEL_PADDING, center.y), egui::Align2::RIGHT_CENTER)
        };
        painter.text(
            label_pos,
            align,
            &port.label,
            egui::FontId::proportional(10.0),
            Color32::from_gray(30),
        );
    }
}

/// Anchor port color, scaled by `opacity`
fn connection_color(graph: &Graph, connection: &Connection, opacity: f32) -> Color32 {
    let color = match graph.port(connection.anchor()) {
        Some(port) => {
            let [r, g, b] = port.port_type.color();
            Color32::from_rgb(r, g, b)
        }
        None => Color32::GRAY,
    };
    color.gamma_multiply(opacity)
}
