use crossterm::event::{KeyCode, KeyEvent};

use crate::controller::Controller;

/// Esc goes back wherever the current screen has somewhere to go back to.
/// Returns whether the key was Esc.
pub fn esc_to_back(k: &KeyEvent, controller: &mut Controller) -> bool {
    if !matches!(k.code, KeyCode::Esc) {
        return false;
    }
    // screens without a back target just ignore Esc
    let _ = controller.back();
    true
}
