//! Canvas program for the sample view
//!
//! Translates mouse input into [`SampleViewEvent`]s and draws through
//! [`SampleView::draw`]. All state changes happen in the application's
//! update, which forwards the events back to its [`SampleView`].

use iced::widget::canvas::{self, Event, Frame, Geometry, Program};
use iced::{mouse, Rectangle, Theme};
use sampler_core::{PointerPos, TrimState};

use super::state::SampleView;

/// Pointer input in canvas-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Down(PointerPos),
    Move(PointerPos),
    Up,
}

/// Input for [`SampleView`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleViewEvent {
    Pointer(PointerAction),
    /// Canvas width differs from the width the view was laid out for.
    /// `then` is the pointer input that arrived in the same event.
    Resized {
        width: f32,
        then: Option<PointerAction>,
    },
}

/// Canvas state: whether the left button went down inside the canvas
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleViewInteraction {
    pub pressed: bool,
}

pub struct SampleCanvas<'a, Message, F>
where
    F: Fn(SampleViewEvent) -> Message,
{
    pub view: &'a SampleView,
    pub on_event: F,
}

/// Map one canvas event to a view event
///
/// Moves and releases are still reported outside the bounds while a press
/// is held, so a drag past the edge clamps instead of sticking.
pub fn translate_event(
    interaction: &mut SampleViewInteraction,
    event: &Event,
    bounds: Rectangle,
    cursor: mouse::Cursor,
    laid_out_width: f32,
) -> Option<SampleViewEvent> {
    let pointer = pointer_action(interaction, event, bounds, cursor);

    if bounds.width > 0.0 && bounds.width != laid_out_width {
        return Some(SampleViewEvent::Resized {
            width: bounds.width,
            then: pointer,
        });
    }
    pointer.map(SampleViewEvent::Pointer)
}

fn pointer_action(
    interaction: &mut SampleViewInteraction,
    event: &Event,
    bounds: Rectangle,
    cursor: mouse::Cursor,
) -> Option<PointerAction> {
    let local = cursor.position_in(bounds).or_else(|| {
        interaction
            .pressed
            .then(|| cursor.position())
            .flatten()
            .map(|p| iced::Point::new(p.x - bounds.x, p.y - bounds.y))
    });

    match event {
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            let position = cursor.position_in(bounds)?;
            interaction.pressed = true;
            Some(PointerAction::Down(PointerPos::new(position.x, position.y)))
        }
        Event::Mouse(mouse::Event::CursorMoved { .. }) => {
            let position = local?;
            Some(PointerAction::Move(PointerPos::new(position.x, position.y)))
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            if !interaction.pressed {
                return None;
            }
            interaction.pressed = false;
            Some(PointerAction::Up)
        }
        _ => None,
    }
}

impl<'a, Message, F> Program<Message> for SampleCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(SampleViewEvent) -> Message,
{
    type State = SampleViewInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        translate_event(interaction, event, bounds, cursor, self.view.canvas_width())
            .map(|e| canvas::Action::publish((self.on_event)(e)))
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match self.view.editor().map(|e| e.state()) {
            Some(TrimState::DragLeft | TrimState::DragRight) => mouse::Interaction::Grabbing,
            Some(TrimState::HoverLeft | TrimState::HoverRight) if cursor.is_over(bounds) => {
                mouse::Interaction::Grab
            }
            _ => mouse::Interaction::default(),
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        self.view.draw(&mut frame);
        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{Point, Size};

    fn bounds() -> Rectangle {
        Rectangle::new(Point::new(10.0, 20.0), Size::new(300.0, 100.0))
    }

    fn at(x: f32, y: f32) -> mouse::Cursor {
        mouse::Cursor::Available(Point::new(x, y))
    }

    fn press() -> Event {
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
    }

    fn release() -> Event {
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
    }

    fn moved(x: f32, y: f32) -> Event {
        Event::Mouse(mouse::Event::CursorMoved {
            position: Point::new(x, y),
        })
    }

    #[test]
    fn test_press_move_release_in_local_coordinates() {
        let mut i = SampleViewInteraction::default();

        let e = translate_event(&mut i, &press(), bounds(), at(15.0, 24.0), 300.0);
        assert_eq!(e, Some(SampleViewEvent::Pointer(PointerAction::Down(PointerPos::new(5.0, 4.0)))));
        assert!(i.pressed);

        let e = translate_event(&mut i, &moved(90.0, 24.0), bounds(), at(90.0, 24.0), 300.0);
        assert_eq!(e, Some(SampleViewEvent::Pointer(PointerAction::Move(PointerPos::new(80.0, 4.0)))));

        let e = translate_event(&mut i, &release(), bounds(), at(90.0, 24.0), 300.0);
        assert_eq!(e, Some(SampleViewEvent::Pointer(PointerAction::Up)));
        assert!(!i.pressed);
    }

    #[test]
    fn test_drag_keeps_reporting_outside_bounds() {
        let mut i = SampleViewInteraction::default();
        translate_event(&mut i, &press(), bounds(), at(15.0, 24.0), 300.0);

        let e = translate_event(&mut i, &moved(0.0, 24.0), bounds(), at(0.0, 24.0), 300.0);
        assert_eq!(e, Some(SampleViewEvent::Pointer(PointerAction::Move(PointerPos::new(-10.0, 4.0)))));

        let e = translate_event(&mut i, &release(), bounds(), at(0.0, 24.0), 300.0);
        assert_eq!(e, Some(SampleViewEvent::Pointer(PointerAction::Up)));
    }

    #[test]
    fn test_outside_without_press_is_ignored() {
        let mut i = SampleViewInteraction::default();
        assert_eq!(translate_event(&mut i, &press(), bounds(), at(0.0, 0.0), 300.0), None);
        assert_eq!(translate_event(&mut i, &moved(0.0, 0.0), bounds(), at(0.0, 0.0), 300.0), None);
        assert_eq!(translate_event(&mut i, &release(), bounds(), at(0.0, 0.0), 300.0), None);
    }

    #[test]
    fn test_width_change_carries_the_pointer_input() {
        let mut i = SampleViewInteraction::default();
        let e = translate_event(&mut i, &moved(50.0, 30.0), bounds(), at(50.0, 30.0), 200.0);
        assert_eq!(
            e,
            Some(SampleViewEvent::Resized {
                width: 300.0,
                then: Some(PointerAction::Move(PointerPos::new(40.0, 10.0))),
            })
        );

        // A press on the resize frame is kept, not dropped
        let e = translate_event(&mut i, &press(), bounds(), at(15.0, 24.0), 200.0);
        assert_eq!(
            e,
            Some(SampleViewEvent::Resized {
                width: 300.0,
                then: Some(PointerAction::Down(PointerPos::new(5.0, 4.0))),
            })
        );
        assert!(i.pressed);
    }
}
