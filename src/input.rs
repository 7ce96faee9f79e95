use egui::{Context, Event, PointerButton, Pos2, Rect, TouchId, TouchPhase};

/// The element a surface is attached to: where it sits on screen and how many
/// physical pixels make up one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostElement {
    pub rect: Rect,
    pub pixels_per_point: f32,
}

impl HostElement {
    pub fn new(rect: Rect, pixels_per_point: f32) -> Self {
        Self {
            rect,
            pixels_per_point,
        }
    }

    /// True if a render target can be created for this host
    pub fn is_usable(&self) -> bool {
        self.rect.is_finite()
            && self.rect.width() >= 1.0
            && self.rect.height() >= 1.0
            && self.pixels_per_point.is_finite()
            && self.pixels_per_point > 0.0
    }

    /// Render target dimensions in physical pixels
    pub fn target_size(&self) -> [u32; 2] {
        let size = self.rect.size() * self.pixels_per_point;
        [size.x.round().max(1.0) as u32, size.y.round().max(1.0) as u32]
    }

    /// Converts a screen position to surface-local physical pixels
    pub fn to_local(&self, screen: Pos2) -> Pos2 {
        ((screen - self.rect.min) * self.pixels_per_point).to_pos2()
    }
}

/// Where a pointer event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Pointer input in screen coordinates, as seen by the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Pos2, source: PointerSource },
    PointerMove { position: Pos2, source: PointerSource },
    PointerUp { source: PointerSource },
    /// The pointer left the surface
    PointerLeave,
    /// The platform aborted the gesture
    PointerCancel { source: PointerSource },
}

/// Handles converting raw egui input into surface `InputEvent`s.
///
/// Only the primary mouse button draws. Multi-touch is reduced to the first
/// contact: other fingers are ignored until it lifts.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    primary_touch: Option<TouchId>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one frame of egui input for a surface covering `surface_rect`
    pub fn process_input(&mut self, ctx: &Context, surface_rect: Rect) -> Vec<InputEvent> {
        let raw_events = ctx.input(|input| input.raw.events.clone());
        self.process_events(&raw_events, surface_rect)
    }

    pub fn process_events(&mut self, raw_events: &[Event], surface_rect: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in raw_events {
            match event {
                Event::Touch { id, phase, pos, .. } => {
                    self.process_touch(*id, *phase, *pos, surface_rect, &mut events);
                }
                // egui mirrors touches as pointer events; the touch path above
                // already handles them.
                _ if self.primary_touch.is_some() => {}
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        if surface_rect.contains(*pos) {
                            events.push(InputEvent::PointerDown {
                                position: *pos,
                                source: PointerSource::Mouse,
                            });
                        }
                    } else {
                        events.push(InputEvent::PointerUp {
                            source: PointerSource::Mouse,
                        });
                    }
                    self.last_pointer_pos = Some(*pos);
                }
                Event::PointerMoved(pos) => {
                    let was_inside = self
                        .last_pointer_pos
                        .is_some_and(|last| surface_rect.contains(last));
                    if surface_rect.contains(*pos) {
                        events.push(InputEvent::PointerMove {
                            position: *pos,
                            source: PointerSource::Mouse,
                        });
                    } else if was_inside {
                        events.push(InputEvent::PointerLeave);
                    }
                    self.last_pointer_pos = Some(*pos);
                }
                Event::PointerGone => {
                    if self.last_pointer_pos.take().is_some() {
                        events.push(InputEvent::PointerLeave);
                    }
                }
                _ => {}
            }
        }

        events
    }

    fn process_touch(
        &mut self,
        id: TouchId,
        phase: TouchPhase,
        pos: Pos2,
        surface_rect: Rect,
        events: &mut Vec<InputEvent>,
    ) {
        let source = PointerSource::Touch;
        match phase {
            TouchPhase::Start => {
                if self.primary_touch.is_none() && surface_rect.contains(pos) {
                    self.primary_touch = Some(id);
                    events.push(InputEvent::PointerDown {
                        position: pos,
                        source,
                    });
                }
            }
            TouchPhase::Move if self.primary_touch == Some(id) => {
                events.push(InputEvent::PointerMove {
                    position: pos,
                    source,
                });
            }
            TouchPhase::End if self.primary_touch == Some(id) => {
                self.primary_touch = None;
                events.push(InputEvent::PointerUp { source });
            }
            TouchPhase::Cancel if self.primary_touch == Some(id) => {
                self.primary_touch = None;
                events.push(InputEvent::PointerCancel { source });
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, TouchDeviceId, pos2, vec2};

    fn rect() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(200.0, 100.0))
    }

    fn touch(id: u64, phase: TouchPhase, pos: Pos2) -> Event {
        Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos,
            force: None,
        }
    }

    #[test]
    fn test_host_local_coordinates_use_pixel_ratio() {
        let host = HostElement::new(rect(), 2.0);
        assert_eq!(host.to_local(pos2(110.0, 55.0)), pos2(20.0, 10.0));
        assert_eq!(host.target_size(), [400, 200]);
    }

    #[test]
    fn test_empty_host_is_unusable() {
        let host = HostElement::new(Rect::from_min_size(Pos2::ZERO, vec2(0.0, 10.0)), 1.0);
        assert!(!host.is_usable());
        assert!(HostElement::new(rect(), 1.0).is_usable());
        assert!(!HostElement::new(rect(), 0.0).is_usable());
    }

    #[test]
    fn test_mouse_press_drag_release() {
        let mut handler = InputHandler::new();
        let raw = vec![
            Event::PointerMoved(pos2(120.0, 60.0)),
            Event::PointerButton {
                pos: pos2(120.0, 60.0),
                button: PointerButton::Primary,
                pressed: true,
                modifiers: Modifiers::NONE,
            },
            Event::PointerMoved(pos2(130.0, 70.0)),
            Event::PointerButton {
                pos: pos2(130.0, 70.0),
                button: PointerButton::Primary,
                pressed: false,
                modifiers: Modifiers::NONE,
            },
        ];

        let mouse = PointerSource::Mouse;
        assert_eq!(
            handler.process_events(&raw, rect()),
            vec![
                InputEvent::PointerMove { position: pos2(120.0, 60.0), source: mouse },
                InputEvent::PointerDown { position: pos2(120.0, 60.0), source: mouse },
                InputEvent::PointerMove { position: pos2(130.0, 70.0), source: mouse },
                InputEvent::PointerUp { source: mouse },
            ]
        );
    }

    #[test]
    fn test_leaving_the_surface_emits_leave() {
        let mut handler = InputHandler::new();
        let raw = vec![
            Event::PointerMoved(pos2(120.0, 60.0)),
            Event::PointerMoved(pos2(10.0, 10.0)),
            Event::PointerMoved(pos2(5.0, 5.0)),
        ];

        let events = handler.process_events(&raw, rect());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], InputEvent::PointerLeave);
    }

    #[test]
    fn test_press_outside_surface_is_ignored() {
        let mut handler = InputHandler::new();
        let raw = vec![Event::PointerButton {
            pos: pos2(0.0, 0.0),
            button: PointerButton::Primary,
            pressed: true,
            modifiers: Modifiers::NONE,
        }];
        assert!(handler.process_events(&raw, rect()).is_empty());
    }

    #[test]
    fn test_multi_touch_reduced_to_first_contact() {
        let mut handler = InputHandler::new();
        let raw = vec![
            touch(1, TouchPhase::Start, pos2(150.0, 60.0)),
            touch(2, TouchPhase::Start, pos2(160.0, 60.0)),
            Event::PointerMoved(pos2(160.0, 60.0)),
            touch(2, TouchPhase::Move, pos2(170.0, 70.0)),
            touch(1, TouchPhase::Move, pos2(155.0, 65.0)),
            touch(2, TouchPhase::End, pos2(170.0, 70.0)),
            touch(1, TouchPhase::End, pos2(155.0, 65.0)),
        ];

        let touch_source = PointerSource::Touch;
        assert_eq!(
            handler.process_events(&raw, rect()),
            vec![
                InputEvent::PointerDown { position: pos2(150.0, 60.0), source: touch_source },
                InputEvent::PointerMove { position: pos2(155.0, 65.0), source: touch_source },
                InputEvent::PointerUp { source: touch_source },
            ]
        );
    }
}
