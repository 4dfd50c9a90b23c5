mod form_panel;
mod header_panel;
mod preview_panel;

pub use form_panel::form_panel;
pub use header_panel::header_panel;
pub use preview_panel::preview_panel;
