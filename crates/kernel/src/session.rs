use crate::camera::CameraRig;
use crate::skater::{Skater, TrickState, trick_rotation};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_common::{MoveDir, MoveIntent, Trick, Tuning};
use skatepark_input::Action;

/// A record produced whenever the trick state machine changes or refuses to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The skater left the ground into `trick`.
    TrickStarted { trick: Trick, frame: u64 },
    /// The skater touched down and returned to idle.
    Landed { frame: u64, landing: Landing },
    /// A trick was requested while already airborne.
    Ignored { trick: Trick, frame: u64 },
}

/// Summary of a finished trick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub trick: Trick,
    /// Seconds spent airborne.
    pub airtime: f32,
    /// Flip accumulator at touchdown, in full turns.
    pub rotation_turns: f32,
}

/// The simulation context: one skater, its trick state, held movement keys
/// and the chase camera.
///
/// Owned by the frame scheduler and advanced with [`Session::step`]. All
/// mutation flows through `trigger`, `set_move`, `apply` and `step`.
#[derive(Debug, Clone)]
pub struct Session {
    tuning: Tuning,
    skater: Skater,
    state: TrickState,
    intent: MoveIntent,
    camera: CameraRig,
    frame: u64,
    airtime: f32,
    last_landing: Option<Landing>,
    events: Vec<SessionEvent>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            skater: Skater::at_rest(tuning.resting_height),
            state: TrickState::Idle,
            intent: MoveIntent::default(),
            camera: CameraRig::new(tuning.camera_offset, tuning.camera_blend),
            frame: 0,
            airtime: 0.0,
            last_landing: None,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn skater(&self) -> &Skater {
        &self.skater
    }

    pub fn state(&self) -> TrickState {
        self.state
    }

    pub fn intent(&self) -> MoveIntent {
        self.intent
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_landing(&self) -> Option<Landing> {
        self.last_landing
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Launch into `trick` if idle. Returns false, changing nothing but the
    /// event log, when already airborne.
    pub fn trigger(&mut self, trick: Trick) -> bool {
        match self.state {
            TrickState::Idle => {
                self.state = TrickState::Airborne(trick);
                self.skater.velocity_y = self.tuning.jump_impulse;
                self.skater.flip_rotation = 0.0;
                self.airtime = 0.0;
                self.events.push(SessionEvent::TrickStarted {
                    trick,
                    frame: self.frame,
                });
                tracing::debug!(%trick, frame = self.frame, "trick started");
                true
            }
            TrickState::Airborne(current) => {
                self.events.push(SessionEvent::Ignored {
                    trick,
                    frame: self.frame,
                });
                tracing::trace!(%trick, %current, "trick ignored while airborne");
                false
            }
        }
    }

    pub fn set_move(&mut self, dir: MoveDir, held: bool) {
        self.intent.set(dir, held);
    }

    /// Apply one input action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Trick(trick) => {
                self.trigger(trick);
            }
            Action::Move { dir, held } => self.set_move(dir, held),
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Airborne integration and landing run first; idle movement runs after,
    /// so the frame that lands also moves. The camera follows last. Returns
    /// the landing if one happened this frame.
    pub fn step(&mut self, dt: f32) -> Option<Landing> {
        self.frame += 1;
        let mut landed = None;

        if let TrickState::Airborne(trick) = self.state {
            let t = &self.tuning;
            let s = &mut self.skater;
            s.velocity_y += t.gravity * dt;
            s.position.y += s.velocity_y * dt;
            if trick.rotates() {
                s.flip_rotation += t.flip_speed * dt;
            }
            s.rotation = trick_rotation(trick, s.flip_rotation, s.rotation);
            self.airtime += dt;
            tracing::trace!(
                frame = self.frame,
                y = s.position.y,
                vy = s.velocity_y,
                flip = s.flip_rotation,
                "airborne"
            );

            if s.position.y <= t.resting_height {
                let landing = Landing {
                    trick,
                    airtime: self.airtime,
                    rotation_turns: s.flip_rotation / std::f32::consts::TAU,
                };
                s.land(t.resting_height);
                self.state = TrickState::Idle;
                self.airtime = 0.0;
                self.last_landing = Some(landing);
                self.events.push(SessionEvent::Landed {
                    frame: self.frame,
                    landing,
                });
                tracing::debug!(
                    %trick,
                    frame = self.frame,
                    airtime = landing.airtime,
                    turns = landing.rotation_turns,
                    "landed"
                );
                landed = Some(landing);
            }
        }

        if self.state.is_idle() {
            let dir = self.intent.direction();
            if dir.length_squared() > 0.0 {
                self.skater.position += dir.normalize() * self.tuning.move_speed * dt;
            }
        }

        self.camera.follow(self.skater.position);
        landed
    }

    /// Deterministic FNV-1a hash over the frame counter, trick state, held
    /// keys, airtime, skater and camera.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.frame.to_le_bytes());
        mix(&[state_tag(self.state)]);
        let held = MoveDir::ALL
            .into_iter()
            .enumerate()
            .fold(0u8, |bits, (i, dir)| bits | (u8::from(self.intent.is_held(dir)) << i));
        mix(&[held]);
        mix(&self.airtime.to_le_bytes());
        let s = &self.skater;
        let floats: [Vec3; 4] = [s.position, s.rotation, self.camera.eye, self.camera.target];
        for v in floats {
            for c in v.to_array() {
                mix(&c.to_le_bytes());
            }
        }
        mix(&s.velocity_y.to_le_bytes());
        mix(&s.flip_rotation.to_le_bytes());
        h
    }
}

fn state_tag(state: TrickState) -> u8 {
    match state {
        TrickState::Idle => 0,
        TrickState::Airborne(Trick::Jump) => 1,
        TrickState::Airborne(Trick::Flip) => 2,
        TrickState::Airborne(Trick::TreFlip) => 3,
        TrickState::Airborne(Trick::HardFlip) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn starts_idle_at_rest() {
        let s = Session::default();
        assert!(s.state().is_idle());
        assert_eq!(s.skater().position, Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(s.frame(), 0);
    }

    #[test]
    fn trigger_sets_impulse() {
        let mut s = Session::default();
        assert!(s.trigger(Trick::Flip));
        assert_eq!(s.state(), TrickState::Airborne(Trick::Flip));
        assert_eq!(s.skater().velocity_y, 4.0);
        assert_eq!(s.skater().flip_rotation, 0.0);
    }

    #[test]
    fn trigger_while_airborne_changes_nothing() {
        let mut s = Session::default();
        s.trigger(Trick::HardFlip);
        s.step(DT);
        let before = *s.skater();
        assert!(!s.trigger(Trick::Jump));
        assert_eq!(s.state(), TrickState::Airborne(Trick::HardFlip));
        assert_eq!(*s.skater(), before);
        assert!(matches!(
            s.events().last(),
            Some(SessionEvent::Ignored {
                trick: Trick::Jump,
                ..
            })
        ));
    }

    #[test]
    fn flip_with_one_second_frame_lands_immediately() {
        let mut s = Session::default();
        s.trigger(Trick::Flip);
        let landing = s.step(1.0).unwrap();
        assert_eq!(landing.trick, Trick::Flip);
        assert!((landing.rotation_turns - 1.1).abs() < 1e-5);
        assert!(s.state().is_idle());
        assert_eq!(s.skater().position.y, 0.1);
        assert_eq!(s.skater().rotation, Vec3::ZERO);
        assert_eq!(s.skater().velocity_y, 0.0);
        assert_eq!(s.skater().flip_rotation, 0.0);
    }

    #[test]
    fn first_frame_integrates_velocity_then_position() {
        let mut s = Session::default();
        s.trigger(Trick::Jump);
        s.step(0.1);
        let sk = s.skater();
        assert!((sk.velocity_y - 3.1).abs() < 1e-6);
        assert!((sk.position.y - (0.1 + 0.31)).abs() < 1e-6);
        assert_eq!(sk.rotation, Vec3::ZERO);
        assert_eq!(sk.flip_rotation, 0.0);
    }

    #[test]
    fn treflip_counter_rotates_every_frame() {
        let mut s = Session::default();
        s.trigger(Trick::TreFlip);
        while !s.state().is_idle() {
            s.step(DT);
            let r = s.skater().rotation;
            assert_eq!(r.y, -r.z);
            assert_eq!(r.x, 0.0);
        }
    }

    #[test]
    fn hardflip_half_rotation_every_frame() {
        let mut s = Session::default();
        s.trigger(Trick::HardFlip);
        while !s.state().is_idle() {
            s.step(DT);
            let r = s.skater().rotation;
            assert_eq!(r.y, r.z / 2.0);
        }
    }

    #[test]
    fn idle_forward_movement() {
        let mut s = Session::default();
        s.set_move(MoveDir::Forward, true);
        s.step(0.5);
        assert_eq!(s.skater().position, Vec3::new(0.0, 0.1, -2.0));
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut s = Session::default();
        s.set_move(MoveDir::Forward, true);
        s.set_move(MoveDir::Right, true);
        s.step(1.0);
        let p = s.skater().position;
        let travelled = Vec3::new(p.x, 0.0, p.z).length();
        assert!((travelled - 4.0).abs() < 1e-5);
    }

    #[test]
    fn no_movement_while_airborne() {
        let mut s = Session::default();
        s.set_move(MoveDir::Left, true);
        s.trigger(Trick::Jump);
        s.step(DT);
        assert_eq!(s.skater().position.x, 0.0);
    }

    #[test]
    fn landing_frame_also_moves() {
        let mut s = Session::default();
        s.set_move(MoveDir::Right, true);
        s.trigger(Trick::Jump);
        s.step(1.0);
        assert!(s.state().is_idle());
        assert_eq!(s.skater().position.x, 4.0);
    }

    #[test]
    fn camera_tracks_skater() {
        let mut s = Session::default();
        s.set_move(MoveDir::Back, true);
        s.step(0.5);
        assert_eq!(s.camera().target, s.skater().position);
        let desired = s.skater().position + Vec3::new(0.0, 2.0, 5.0);
        let expected = Vec3::new(0.0, 2.0, 5.0).lerp(desired, 0.8);
        assert!(s.camera().eye.distance(expected) < 1e-5);
    }

    #[test]
    fn events_record_trick_lifecycle() {
        let mut s = Session::default();
        s.trigger(Trick::Flip);
        s.step(1.0);
        let events = s.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            SessionEvent::TrickStarted {
                trick: Trick::Flip,
                frame: 0
            }
        ));
        assert!(matches!(events[1], SessionEvent::Landed { frame: 1, .. }));
        assert!(s.events().is_empty());
        assert_eq!(s.last_landing().map(|l| l.trick), Some(Trick::Flip));
    }

    #[test]
    fn apply_routes_actions() {
        let mut s = Session::default();
        s.apply(Action::Move {
            dir: MoveDir::Forward,
            held: true,
        });
        assert!(s.intent().forward);
        s.apply(Action::Trick(Trick::Jump));
        assert_eq!(s.state(), TrickState::Airborne(Trick::Jump));
    }

    #[test]
    fn state_hash_deterministic() {
        let run = || {
            let mut s = Session::default();
            s.trigger(Trick::TreFlip);
            for _ in 0..20 {
                s.step(DT);
            }
            s.state_hash()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn state_hash_covers_held_keys() {
        let idle = Session::default();
        let mut holding = Session::default();
        holding.set_move(MoveDir::Left, true);
        assert_ne!(idle.state_hash(), holding.state_hash());
        holding.set_move(MoveDir::Left, false);
        assert_eq!(idle.state_hash(), holding.state_hash());
    }

    #[test]
    fn state_hash_covers_airtime() {
        let mut a = Session::default();
        a.trigger(Trick::Jump);
        a.step(DT);
        let mut b = a.clone();
        b.airtime += DT;
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn state_hash_differs_after_step() {
        let mut s = Session::default();
        let h0 = s.state_hash();
        s.step(DT);
        assert_ne!(h0, s.state_hash());
    }
}
