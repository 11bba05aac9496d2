//! Per-frame draw recording
//!
//! Render systems draw into a [`DrawList`]; backends decide what to do with
//! it at present time (upload to the GPU, or keep it for inspection).

use brick_core::ecs::Color;
use brick_core::{Rect, Surface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub rect: Rect,
    pub color: Color,
}

/// Filled rectangles in submission order (later on top).
#[derive(Debug, Clone)]
pub struct DrawList {
    width: u32,
    height: u32,
    clear_color: Color,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_color: Color::BLACK,
            commands: Vec::new(),
        }
    }

    /// Drop the previous frame's commands and set the background.
    pub fn begin(&mut self, clear_color: Color) {
        self.clear_color = clear_color;
        self.commands.clear();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand { rect, color });
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_submission_order() {
        let mut list = DrawList::new(640, 480);
        list.begin(Color::BLACK);
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        list.fill_rect(Rect::new(5.0, 5.0, 10.0, 10.0), Color::rgb(255, 0, 0));

        assert_eq!(list.len(), 2);
        assert_eq!(list.commands()[1].color, Color::rgb(255, 0, 0));
        assert_eq!(list.size(), (640, 480));
    }

    #[test]
    fn begin_resets_the_frame() {
        let mut list = DrawList::new(10, 10);
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.begin(Color::rgb(1, 2, 3));

        assert!(list.is_empty());
        assert_eq!(list.clear_color(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn degenerate_rects_are_skipped() {
        let mut list = DrawList::new(10, 10);
        list.fill_rect(Rect::new(0.0, 0.0, 0.0, 5.0), Color::WHITE);
        list.fill_rect(Rect::new(0.0, 0.0, 5.0, -1.0), Color::WHITE);
        assert!(list.is_empty());
    }
}
