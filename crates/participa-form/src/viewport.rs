/// Presentation hooks invoked after every wizard transition.
///
/// Implementations scroll the page back to the top and move keyboard/screen
/// reader focus to the main content region, in that order.
pub trait Viewport {
    fn scroll_to_top(&mut self);
    fn focus_main_content(&mut self);
}

/// Viewport for headless use (CLI, tests) where there is nothing to scroll.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewport;

impl Viewport for NoopViewport {
    fn scroll_to_top(&mut self) {}
    fn focus_main_content(&mut self) {}
}

impl<V: Viewport + ?Sized> Viewport for &mut V {
    fn scroll_to_top(&mut self) {
        (**self).scroll_to_top();
    }

    fn focus_main_content(&mut self) {
        (**self).focus_main_content();
    }
}
