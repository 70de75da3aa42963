//! Open/close state for the 3D preview and AR dialogs.

use crate::catalog::CakeCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    CloseButton,
    /// A click anywhere on the page; `on_backdrop` is true when its target is
    /// the modal element itself rather than its content.
    Click { on_backdrop: bool },
    Escape,
}

impl ModalEvent {
    /// Keys other than Escape do not concern dialogs.
    pub fn from_key(key: &str) -> Option<Self> {
        (key == "Escape").then_some(ModalEvent::Escape)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Returns true when the event closed the dialog.
    pub fn handle(&mut self, event: ModalEvent) -> bool {
        let close = match event {
            ModalEvent::CloseButton => true,
            ModalEvent::Click { on_backdrop } => on_backdrop,
            ModalEvent::Escape => self.open,
        };
        if close {
            self.open = false;
        }
        close
    }
}

/// AR dialog: owns the iframe source while open.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArLauncher {
    modal: ModalState,
    src: Option<String>,
}

impl ArLauncher {
    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Iframe source while the dialog is open.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// Opens the experience for `cake_id`, returning the URL to load.
    pub fn open(&mut self, catalog: &CakeCatalog, cake_id: &str) -> Option<&str> {
        let Some(url) = catalog.ar_url(cake_id) else {
            log::warn!("no AR experience for {cake_id}");
            return None;
        };
        self.modal.open();
        self.src = Some(url.to_string());
        self.src.as_deref()
    }

    /// Returns true when the dialog closed and the iframe must be cleared.
    pub fn handle(&mut self, event: ModalEvent) -> bool {
        if !self.modal.handle(event) {
            return false;
        }
        self.src = None;
        true
    }
}
