use crate::shared::frame::Frame;

/// Display sink that also carries the user's quit control.
pub trait Presenter {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// True when a quit request arrived since the previous poll. Waits at
    /// most a few milliseconds.
    fn poll_quit(&mut self) -> Result<bool, Box<dyn std::error::Error>>;

    /// Tears down the display surface. Safe to call more than once.
    fn close(&mut self);
}
