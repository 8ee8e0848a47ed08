use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Widget};
use ratatui::Frame;

use crate::config::{Variant, HELP_COLOR, STATUS_COLOR, TAIL_GLYPH, TITLE};
use crate::simulation::{Bounds, Point, Rgb, SimulationState};

/// Text drawing primitive the animation renders through
pub trait Surface {
    /// Draw `text` centered within `width` cells starting at column `x` on
    /// row `y`. Text wider than `width` is truncated; cells outside the
    /// surface are skipped.
    fn print(&mut self, text: &str, x: i32, y: i32, width: i32, color: Rgb);
}

/// [`Surface`] over a ratatui buffer
pub struct BufferSurface<'a> {
    buffer: &'a mut Buffer,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buffer: &'a mut Buffer) -> Self {
        Self { buffer }
    }
}

impl Surface for BufferSurface<'_> {
    fn print(&mut self, text: &str, x: i32, y: i32, width: i32, color: Rgb) {
        let Ok(row) = u16::try_from(y) else {
            return;
        };

        let glyphs: Vec<char> = text.chars().take(width.max(0) as usize).collect();
        let start = x + (width - glyphs.len() as i32) / 2;

        for (offset, glyph) in glyphs.into_iter().enumerate() {
            let Ok(column) = u16::try_from(start + offset as i32) else {
                continue;
            };
            if let Some(cell) = self.buffer.cell_mut(Position::new(column, row)) {
                cell.set_char(glyph).set_fg(color.into());
            }
        }
    }
}

/// Draw the titled box over the whole frame and run one animation frame
/// inside it.
pub fn draw(frame: &mut Frame, state: &mut SimulationState) {
    let area = frame.area();
    draw_box(frame.buffer_mut(), area);
    draw_frame(&mut BufferSurface::new(frame.buffer_mut()), state, area);
}

fn draw_box(buffer: &mut Buffer, area: Rect) {
    let title = Line::from(TITLE).style(
        Style::default()
            .fg(Color::Green)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD))
        .title(title)
        .render(area, buffer);
}

/// One frame pass: step the physics for `area`, then draw the status lines,
/// the tails and the balls on top.
pub fn draw_frame<S: Surface>(surface: &mut S, state: &mut SimulationState, area: Rect) {
    let bounds = Bounds::new(i32::from(area.width), i32::from(area.height));
    let origin = Point::new(i32::from(area.x), i32::from(area.y));
    let heads = state.step(bounds);

    let middle = origin.y + bounds.height / 2;
    surface.print(&status_line(state, &heads), origin.x, middle, bounds.width, STATUS_COLOR);
    if let Some(help) = state.variant().help() {
        surface.print(help, origin.x, middle + 1, bounds.width, HELP_COLOR);
    }

    let entities = state.population().active();
    for entity in entities {
        // Oldest first so fresher slots land on top where they overlap
        for (point, color) in entity.tail.faded(entity.color).rev() {
            // Positions recorded before a shrink may now sit on or past the border
            if bounds.contains(point) {
                surface.print(TAIL_GLYPH, origin.x + point.x, origin.y + point.y, 1, color);
            }
        }
    }

    let glyph = state.variant().ball_glyph();
    for (entity, head) in entities.iter().zip(&heads) {
        surface.print(glyph, origin.x + head.x, origin.y + head.y, 1, entity.color);
    }
}

fn status_line(state: &SimulationState, heads: &[Point]) -> String {
    let bounds = state.bounds();
    let speed = state.speed().millis();

    match state.variant() {
        Variant::Classic => {
            let head = heads.first().copied().unwrap_or_default();
            format!(
                "x={}, y={} - width={}, height={}",
                head.x, head.y, bounds.width, bounds.height
            )
        }
        Variant::Speed | Variant::Tail => format!(
            "width={}, height={}, speed={}ms",
            bounds.width, bounds.height, speed
        ),
        Variant::MultiBall => format!(
            "width={}, height={}, speed={}ms, balls={}",
            bounds.width,
            bounds.height,
            speed,
            state.population().active_count()
        ),
    }
}
