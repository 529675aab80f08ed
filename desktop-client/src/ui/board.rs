use eframe::egui;
use snake_engine::games::snake::{GridSize, Position, SnakeSnapshot};

use super::colors::{
    BOARD_BACKGROUND, FOOD_COLOR, GLOW_COLOR, pickup_color, pickup_label, to_color32,
};

/// Largest square cell that fits `grid` into `available`.
pub fn cell_size_for(grid: GridSize, available: egui::Vec2) -> f32 {
    let width = grid.width.max(1) as f32;
    let height = grid.height.max(1) as f32;
    (available.x / width).min(available.y / height).max(1.0)
}

fn cell_rect(origin: egui::Pos2, cell: f32, position: Position) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(position.x as f32 * cell, position.y as f32 * cell),
        egui::vec2(cell, cell),
    )
}

pub fn render_board(ui: &mut egui::Ui, snapshot: &SnakeSnapshot) {
    let cell = cell_size_for(snapshot.grid, ui.available_size());
    let size = egui::vec2(
        snapshot.grid.width as f32 * cell,
        snapshot.grid.height as f32 * cell,
    );

    ui.vertical_centered(|ui| {
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, BOARD_BACKGROUND);

        painter.rect_filled(cell_rect(rect.min, cell, snapshot.food).shrink(cell * 0.15), 2.0, FOOD_COLOR);

        for pickup in &snapshot.pickups {
            let center = cell_rect(rect.min, cell, pickup.position).center();
            painter.circle_filled(center, cell * 0.45, pickup_color(pickup.kind));
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                pickup_label(pickup.kind),
                egui::FontId::proportional(cell * 0.6),
                egui::Color32::BLACK,
            );
        }

        let visuals = &snapshot.visuals;
        for (i, segment) in snapshot.snake.iter().enumerate() {
            let segment_rect = cell_rect(rect.min, cell, *segment);
            if visuals.glow {
                painter.rect_filled(
                    segment_rect.expand(cell * 0.2),
                    cell * 0.3,
                    GLOW_COLOR.gamma_multiply(0.35),
                );
            }

            let color = if i == 0 {
                visuals.head
            } else {
                visuals.body.get(i - 1).copied().unwrap_or(visuals.head)
            };
            painter.rect_filled(segment_rect.shrink(1.0), 2.0, to_color32(color));
        }

        if let (Some(points), Some(head)) = (snapshot.score_popup, snapshot.snake.first()) {
            let anchor = cell_rect(rect.min, cell, *head).center_top();
            painter.text(
                anchor - egui::vec2(0.0, cell * 0.3),
                egui::Align2::CENTER_BOTTOM,
                format!("+{}", points),
                egui::FontId::proportional((cell * 0.9).max(12.0)),
                egui::Color32::YELLOW,
            );
        }
    });
}
