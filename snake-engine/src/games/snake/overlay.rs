/// The host's open flag and close callback, handed to the game at
/// construction. Closing is one-way and runs the callback exactly once.
pub struct OverlayHandle {
    open: bool,
    on_close: Option<Box<dyn FnOnce() + Send>>,
}

impl OverlayHandle {
    pub fn new(on_close: impl FnOnce() + Send + 'static) -> Self {
        Self {
            open: true,
            on_close: Some(Box::new(on_close)),
        }
    }

    /// An open overlay nobody needs to hear about closing.
    pub fn detached() -> Self {
        Self {
            open: true,
            on_close: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `false` when the overlay was already closed.
    pub fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
        true
    }
}

impl std::fmt::Debug for OverlayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayHandle")
            .field("open", &self.open)
            .field("has_on_close", &self.on_close.is_some())
            .finish()
    }
}
