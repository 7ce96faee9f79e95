use egui::Pos2;

/// One continuous pointer drag, from press to release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSession {
    /// Surface-local position of the last recorded point
    pub last_point: Pos2,
    /// Whether any segment was drawn. A plain click leaves this false.
    pub dirty: bool,
}

/// Pointer interaction state of a drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SurfaceState {
    #[default]
    Idle,
    Dragging(StrokeSession),
}

impl SurfaceState {
    pub fn begin_stroke(&mut self, start: Pos2) {
        *self = Self::Dragging(StrokeSession {
            last_point: start,
            dirty: false,
        });
    }

    /// Advances the drag to `point`, returning the segment to draw.
    /// Returns `None` when no drag is in progress.
    pub fn extend_stroke(&mut self, point: Pos2) -> Option<(Pos2, Pos2)> {
        match self {
            Self::Dragging(session) => {
                let from = session.last_point;
                session.last_point = point;
                session.dirty = true;
                Some((from, point))
            }
            Self::Idle => None,
        }
    }

    /// Ends the drag. Returns the finished session, if there was one.
    pub fn end_stroke(&mut self) -> Option<StrokeSession> {
        match std::mem::take(self) {
            Self::Dragging(session) => Some(session),
            Self::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}
