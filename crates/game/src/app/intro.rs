use stage_engine::{Canvas, InputAction, InputSnapshot};

/// Distance of intro and dialogue text from the left edge of the frame.
pub(crate) const TEXT_MARGIN_X: i32 = 25;
/// Distance of the bottom text line's top edge from the bottom of the frame.
pub(crate) const TEXT_BOTTOM_OFFSET: i32 = 50;

/// Slides shown before gameplay. Each click or advance press moves to the
/// next page; once the images or texts run out the last one stays up.
#[derive(Debug, Clone)]
pub(crate) struct IntroSequence {
    images: Vec<String>,
    texts: Vec<String>,
    index: usize,
}

impl IntroSequence {
    pub(crate) fn new(images: Vec<String>, texts: Vec<String>) -> Self {
        Self {
            images,
            texts,
            index: 0,
        }
    }

    pub(crate) fn handle_input(&mut self, input: &InputSnapshot) {
        if input.left_click_pressed() {
            self.index += 1;
        }
        if input.was_pressed(InputAction::Advance) {
            self.index += 1;
        }
    }

    /// An intro without images is skipped even when it has text.
    pub(crate) fn is_done(&self) -> bool {
        self.images.is_empty() || self.index >= self.images.len().max(self.texts.len())
    }

    pub(crate) fn current_image(&self) -> Option<&str> {
        self.images
            .get(self.index)
            .or_else(|| self.images.last())
            .map(String::as_str)
    }

    pub(crate) fn current_text(&self) -> Option<&str> {
        self.texts
            .get(self.index)
            .or_else(|| self.texts.last())
            .map(String::as_str)
    }

    pub(crate) fn render(&self, canvas: &mut Canvas<'_>) {
        if self.is_done() {
            return;
        }
        if let Some(image) = self.current_image() {
            canvas.draw_fullscreen_image(image);
        }
        if let Some(text) = self.current_text() {
            let y = canvas.viewport().height as i32 - TEXT_BOTTOM_OFFSET;
            canvas.draw_text(text, TEXT_MARGIN_X, y);
        }
    }
}
