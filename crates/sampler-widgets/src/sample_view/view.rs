//! Sample view function
//!
//! ```ignore
//! fn view(&self) -> Element<Message> {
//!     sample_view(&self.sample_view, Message::SampleView)
//! }
//!
//! fn update(&mut self, message: Message) {
//!     if let Message::SampleView(event) = message {
//!         let sound = self.bank.get_mut(self.selected).unwrap();
//!         self.sample_view.handle_event(event, sound);
//!     }
//! }
//! ```

use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::{SampleCanvas, SampleViewEvent};
use super::state::SampleView;
use crate::theme::SAMPLE_VIEW_HEIGHT;

/// Waveform with trim handles and playhead, full width and fixed height
pub fn sample_view<'a, Message>(
    view: &'a SampleView,
    on_event: impl Fn(SampleViewEvent) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(SampleCanvas { view, on_event })
        .width(Length::Fill)
        .height(Length::Fixed(SAMPLE_VIEW_HEIGHT))
        .into()
}
