use skatepark_common::Trick;
use skatepark_kernel::{Landing, Session, SessionEvent, TrickState};

/// Session inspector for developer tooling.
///
/// Read-only queries against a session for the HUD, the CLI and logs.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let s = session.skater();
        SessionSummary {
            frame: session.frame(),
            state: session.state(),
            position: s.position.to_array(),
            height: s.position.y - session.tuning().resting_height,
            velocity_y: s.velocity_y,
            flip_turns: s.flip_rotation / std::f32::consts::TAU,
            last_landing: session.last_landing(),
            pending_events: session.events().len(),
        }
    }

    /// Count landed tricks in an event slice, per trick in `Trick::ALL` order.
    pub fn landed_counts(events: &[SessionEvent]) -> [(Trick, usize); 4] {
        Trick::ALL.map(|trick| {
            let n = events
                .iter()
                .filter(|e| matches!(e, SessionEvent::Landed { landing, .. } if landing.trick == trick))
                .count();
            (trick, n)
        })
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub frame: u64,
    pub state: TrickState,
    pub position: [f32; 3],
    /// Height above resting height.
    pub height: f32,
    pub velocity_y: f32,
    pub flip_turns: f32,
    pub last_landing: Option<Landing>,
    pub pending_events: usize,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame={} state={} pos=({:.2}, {:.2}, {:.2}) height={:.2} vy={:.2} turns={:.2}",
            self.frame,
            self.state,
            self.position[0],
            self.position[1],
            self.position[2],
            self.height,
            self.velocity_y,
            self.flip_turns,
        )?;
        if let Some(l) = self.last_landing {
            write!(f, " last={} ({:.2}s)", l.trick, l.airtime)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_fresh_session() {
        let session = Session::default();
        let summary = SessionInspector::summary(&session);
        assert_eq!(summary.frame, 0);
        assert!(summary.state.is_idle());
        assert_eq!(summary.height, 0.0);
        assert!(summary.last_landing.is_none());
    }

    #[test]
    fn summary_mid_air() {
        let mut session = Session::default();
        session.trigger(Trick::Flip);
        session.step(0.1);
        let summary = SessionInspector::summary(&session);
        assert_eq!(summary.state, TrickState::Airborne(Trick::Flip));
        assert!(summary.height > 0.0);
        assert!(summary.flip_turns > 0.0);
        assert_eq!(summary.pending_events, 1);
    }

    #[test]
    fn landed_counts_by_trick() {
        let mut session = Session::default();
        for trick in [Trick::Flip, Trick::Flip, Trick::HardFlip] {
            session.trigger(trick);
            session.step(1.0);
        }
        let counts = SessionInspector::landed_counts(session.events());
        assert_eq!(counts[0], (Trick::Jump, 0));
        assert_eq!(counts[1], (Trick::Flip, 2));
        assert_eq!(counts[3], (Trick::HardFlip, 1));
    }

    #[test]
    fn summary_display() {
        let mut session = Session::default();
        session.trigger(Trick::Jump);
        session.step(1.0);
        let s = format!("{}", SessionInspector::summary(&session));
        assert!(s.contains("frame=1"));
        assert!(s.contains("state=idle"));
        assert!(s.contains("last=jump"));
    }
}
