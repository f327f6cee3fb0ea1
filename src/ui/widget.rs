use crate::{
    component::MeasureMap,
    core::geo::Point,
    input::events::{EventHandled, InputEvent, KeyCode, MouseButton},
    rendering::context::{DrawCommand, LineRenderStyle, RenderContext},
    ui::overlay::{OverlayElement, OverlayStyle, Positioning},
};
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2, Widget};

/// egui front end of a [`MeasureMap`]: forwards pointer and keyboard input
/// and paints each frame's draw commands.
///
/// ```rust,ignore
/// let mut measure = mapruler::MeasureMap::mount_default()?;
/// // every frame:
/// ui.add(MeasureMapWidget::new(&mut measure));
/// ```
pub struct MeasureMapWidget<'a> {
    map: &'a mut MeasureMap,
    size: Option<Vec2>,
    show_attribution: bool,
}

impl<'a> MeasureMapWidget<'a> {
    pub fn new(map: &'a mut MeasureMap) -> Self {
        Self {
            map,
            size: None,
            show_attribution: true,
        }
    }

    /// Set the widget size (otherwise the target's dimensions are resolved
    /// against the available space)
    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    pub fn attribution(mut self, show: bool) -> Self {
        self.show_attribution = show;
        self
    }

    fn desired_size(&self, ui: &Ui) -> Vec2 {
        if let Some(size) = self.size {
            return size;
        }
        let available = ui.available_size();
        match self.map.map().target() {
            Some(target) => {
                let size = target.resolve_size(Point::new(available.x as f64, available.y as f64));
                Vec2::new(size.x as f32, size.y as f32)
            }
            None => available,
        }
    }

    /// Translate this frame's egui input into map input events
    fn collect_input(ui: &Ui, response: &Response, rect: Rect) -> Vec<InputEvent> {
        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        let mut events = Vec::new();

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::DragStart { position: local(pos) });
            }
        }
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                events.push(InputEvent::Drag {
                    delta: Point::new(delta.x as f64, delta.y as f64),
                });
            }
        }
        if response.drag_released() {
            events.push(InputEvent::DragEnd);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::Click {
                    position: local(pos),
                    button: MouseButton::Left,
                });
            }
        }
        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::Click {
                    position: local(pos),
                    button: MouseButton::Right,
                });
            }
        }
        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::DoubleClick { position: local(pos) });
            }
        }

        if let Some(pos) = response.hover_pos() {
            let last_id = response.id.with("last_pointer");
            let last = ui.ctx().memory(|mem| mem.data.get_temp::<Pos2>(last_id));
            if last != Some(pos) && !response.dragged() {
                events.push(InputEvent::MouseMove { position: local(pos) });
            }
            ui.ctx().memory_mut(|mem| mem.data.insert_temp(last_id, pos));

            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                events.push(InputEvent::Scroll {
                    delta: scroll as f64,
                    position: local(pos),
                });
            }

            ui.input(|i| {
                for (key, code) in [
                    (egui::Key::Enter, KeyCode::Enter),
                    (egui::Key::Escape, KeyCode::Escape),
                    (egui::Key::Plus, KeyCode::Plus),
                    (egui::Key::Minus, KeyCode::Minus),
                ] {
                    if i.key_pressed(key) {
                        events.push(InputEvent::KeyPress { key: code });
                    }
                }
            });
        }

        events
    }

    fn paint(ui: &mut Ui, rect: Rect, commands: &[DrawCommand]) {
        let painter = ui.painter_at(rect);
        let to_screen = |p: &Point| rect.min + Vec2::new(p.x as f32, p.y as f32);

        let mut tiles_ui = ui.child_ui(rect, *ui.layout());
        tiles_ui.set_clip_rect(rect);

        for command in commands {
            match command {
                DrawCommand::Tile {
                    url, bounds, opacity, ..
                } => {
                    let tile_rect = Rect::from_min_max(to_screen(&bounds.0), to_screen(&bounds.1));
                    egui::Image::new(url.clone())
                        .tint(Color32::WHITE.gamma_multiply(*opacity))
                        .paint_at(&tiles_ui, tile_rect);
                }
                DrawCommand::Point { position, style } => {
                    painter.circle(
                        to_screen(position),
                        style.radius,
                        style.fill_color,
                        Stroke::new(style.stroke_width, style.stroke_color),
                    );
                }
                DrawCommand::Line { points, style } => {
                    let points: Vec<Pos2> = points.iter().map(to_screen).collect();
                    painter.extend(line_shapes(points, style));
                }
                DrawCommand::Polygon { exterior, style } => {
                    let mut points: Vec<Pos2> = exterior.iter().map(to_screen).collect();
                    painter.add(Shape::convex_polygon(points.clone(), style.fill_color, Stroke::NONE));
                    if let Some(first) = points.first().copied() {
                        points.push(first);
                    }
                    painter.extend(line_shapes(points, &style.stroke));
                }
                DrawCommand::Overlay {
                    text,
                    class_name,
                    anchor,
                    offset,
                    positioning,
                    ..
                } => {
                    let screen_anchor = to_screen(anchor) + Vec2::new(offset[0], offset[1]);
                    paint_label(&painter, screen_anchor, text, class_name, *positioning);
                }
            }
        }
    }
}

fn line_shapes(points: Vec<Pos2>, style: &LineRenderStyle) -> Vec<Shape> {
    let stroke = Stroke::new(style.width, style.color);
    match style.dash_pattern.as_slice() {
        [dash, gap, ..] => Shape::dashed_line(&points, stroke, *dash, *gap),
        _ => vec![Shape::line(points, stroke)],
    }
}

/// Paints a tooltip-like label so that `positioning` of its box sits on
/// `anchor`
fn paint_label(painter: &egui::Painter, anchor: Pos2, text: &str, class_name: &str, positioning: Positioning) {
    let style = OverlayStyle::for_element(&OverlayElement::new(class_name));
    let font = FontId::proportional(style.font_size);
    let text_color: Color32 = style.text_color.into();
    let galley = painter.layout_no_wrap(text.to_string(), font.clone(), text_color);

    let size = galley.size() + Vec2::new(style.padding[0], style.padding[1]) * 2.0;
    let [fx, fy] = positioning.anchor_fraction();
    let min = anchor - Vec2::new(size.x * fx, size.y * fy);
    let box_rect = Rect::from_min_size(min, size);

    painter.rect_filled(box_rect, style.rounding, style.background);
    if let Some(border) = style.border {
        painter.rect_stroke(box_rect, style.rounding, Stroke::new(1.0, border));
    }

    let bottom_anchored = matches!(
        positioning,
        Positioning::BottomLeft | Positioning::BottomCenter | Positioning::BottomRight
    );
    if style.arrow_size > 0.0 && bottom_anchored {
        let tip_x = box_rect.min.x + size.x * fx.clamp(0.2, 0.8);
        let base_y = box_rect.max.y;
        painter.add(Shape::convex_polygon(
            vec![
                Pos2::new(tip_x - style.arrow_size, base_y),
                Pos2::new(tip_x + style.arrow_size, base_y),
                Pos2::new(tip_x, base_y + style.arrow_size),
            ],
            style.background,
            Stroke::NONE,
        ));
    }

    painter.text(box_rect.center(), Align2::CENTER_CENTER, text, font, text_color);
}

impl Widget for MeasureMapWidget<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let desired_size = self.desired_size(ui);
        let (rect, mut response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        if !self.map.is_mounted() {
            return response;
        }

        let size = Point::new(rect.width() as f64, rect.height() as f64);
        if self.map.map().viewport().size != size {
            self.map.handle_input(InputEvent::Resize { size });
        }

        let mut changed = false;
        for event in Self::collect_input(ui, &response, rect) {
            let is_move = matches!(event, InputEvent::MouseMove { .. });
            if self.map.handle_input(event) == EventHandled::Handled || is_move {
                changed = true;
            }
        }

        if response.hovered() {
            ui.ctx().set_cursor_icon(if response.dragged() {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Crosshair
            });
        }

        let mut context = RenderContext::new(rect.width() as u32, rect.height() as u32);
        match self.map.render(&mut context) {
            Ok(true) => Self::paint(ui, rect, context.drawing_queue()),
            Ok(false) => {}
            Err(e) => log::warn!("measure map frame failed: {e}"),
        }

        if self.show_attribution {
            let attribution = self.map.attribution();
            if !attribution.is_empty() {
                let painter = ui.painter_at(rect);
                let pos = rect.right_bottom() - Vec2::new(4.0, 2.0);
                let font = FontId::proportional(10.0);
                let galley = painter.layout_no_wrap(attribution.clone(), font.clone(), Color32::from_gray(60));
                let background = Rect::from_min_max(pos - galley.size() - Vec2::splat(2.0), pos + Vec2::new(2.0, 0.0));
                painter.rect_filled(background, 2.0, Color32::from_rgba_unmultiplied(255, 255, 255, 180));
                painter.text(pos, Align2::RIGHT_BOTTOM, attribution, font, Color32::from_gray(60));
            }
        }

        if changed {
            response.mark_changed();
            ui.ctx().request_repaint();
        }
        response
    }
}

/// Convenience for adding a measure map to a `Ui`
pub trait UiMeasureMapExt {
    fn measure_map(&mut self, map: &mut MeasureMap) -> Response;
}

impl UiMeasureMapExt for Ui {
    fn measure_map(&mut self, map: &mut MeasureMap) -> Response {
        self.add(MeasureMapWidget::new(map))
    }
}
