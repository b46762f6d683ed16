//! Presenter seam: the host surface that actually shows a scare.
//!
//! The presenter holds no scheduling state. The engine decides when to show
//! and when to hide; the presenter only performs the side effects. Audio is
//! best-effort -- a refusal (e.g. blocked autoplay) is reported back but the
//! engine swallows it and the visual presentation continues.

use crate::catalog::ScareEntry;

pub trait Presenter {
    /// Make the overlay visible with the chosen visual.
    fn show(&mut self, entry: &ScareEntry);

    /// Begin playing the chosen audio. Best effort.
    fn play_audio(&mut self, entry: &ScareEntry) -> Result<(), String>;

    /// Hide the overlay and clear its content.
    fn hide(&mut self);
}
