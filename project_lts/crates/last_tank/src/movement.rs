use plugin_runtime::HostApi;

use crate::error::MatchError;

const GRAVITY: &str = "_gravity";
const JUMP_VELOCITY: &str = "_jumpVelocity";
const RELOAD_TIME: &str = "_reloadTime";
const TANK_SPEED: &str = "_tankSpeed";
const TANK_ANG_VEL: &str = "_tankAngVel";

/// The server physics variables that decide whether tanks can move or shoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementParams {
    pub gravity: f64,
    pub jump_velocity: f64,
    pub reload_time: f64,
    pub tank_speed: f64,
    pub tank_ang_vel: f64,
}

impl MovementParams {
    /// Values that pin every tank in place.
    pub const FROZEN: MovementParams = MovementParams {
        gravity: -1000.0,
        jump_velocity: 0.0,
        reload_time: 0.1,
        tank_speed: 0.000001,
        tank_ang_vel: 0.000001,
    };

    pub fn read(host: &dyn HostApi) -> Result<Self, MatchError> {
        let get = |name: &'static str| host.var_f64(name).ok_or(MatchError::MissingVar(name));
        Ok(Self {
            gravity: get(GRAVITY)?,
            jump_velocity: get(JUMP_VELOCITY)?,
            reload_time: get(RELOAD_TIME)?,
            tank_speed: get(TANK_SPEED)?,
            tank_ang_vel: get(TANK_ANG_VEL)?,
        })
    }

    pub fn write(&self, host: &mut dyn HostApi) {
        host.set_var_f64(GRAVITY, self.gravity);
        host.set_var_f64(JUMP_VELOCITY, self.jump_velocity);
        host.set_var_f64(RELOAD_TIME, self.reload_time);
        host.set_var_f64(TANK_SPEED, self.tank_speed);
        host.set_var_f64(TANK_ANG_VEL, self.tank_ang_vel);
    }
}

/// Freezes and restores tank movement around the countdown.
#[derive(Debug, Default)]
pub struct MovementGate {
    saved: Option<MovementParams>,
    frozen: bool,
}

impl MovementGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Last captured physics values.
    pub fn saved(&self) -> Option<&MovementParams> {
        self.saved.as_ref()
    }

    /// Capture current physics and replace them with [`MovementParams::FROZEN`].
    /// Returns `Ok(false)` without touching anything when already frozen.
    pub fn freeze(&mut self, host: &mut dyn HostApi) -> Result<bool, MatchError> {
        if self.frozen {
            tracing::warn!("movement already frozen, keeping saved physics");
            return Ok(false);
        }
        let current = MovementParams::read(host)?;
        MovementParams::FROZEN.write(host);
        self.saved = Some(current);
        self.frozen = true;
        tracing::debug!(?current, "movement frozen");
        Ok(true)
    }

    /// Restore the last captured physics. Does nothing if nothing was captured.
    pub fn unfreeze(&mut self, host: &mut dyn HostApi) -> bool {
        self.frozen = false;
        match self.saved {
            Some(params) => {
                params.write(host);
                tracing::debug!(?params, "movement restored");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{ManualClock, Timestamp};
    use plugin_runtime::{HostSettings, LocalHost};
    use std::sync::Arc;

    fn host() -> LocalHost {
        LocalHost::new(Arc::new(ManualClock::new(Timestamp(0))), HostSettings::default())
    }

    #[test]
    fn freeze_then_unfreeze_restores_physics() {
        let mut host = host();
        let before = MovementParams::read(&host).unwrap();
        let mut gate = MovementGate::new();

        assert!(gate.freeze(&mut host).unwrap());
        assert!(gate.is_frozen());
        assert_eq!(MovementParams::read(&host).unwrap(), MovementParams::FROZEN);

        assert!(gate.unfreeze(&mut host));
        assert!(!gate.is_frozen());
        assert_eq!(MovementParams::read(&host).unwrap(), before);
    }

    #[test]
    fn second_freeze_keeps_original_capture() {
        let mut host = host();
        let before = MovementParams::read(&host).unwrap();
        let mut gate = MovementGate::new();

        gate.freeze(&mut host).unwrap();
        assert!(!gate.freeze(&mut host).unwrap());
        assert_eq!(gate.saved(), Some(&before));

        gate.unfreeze(&mut host);
        assert_eq!(MovementParams::read(&host).unwrap(), before);
    }

    #[test]
    fn unfreeze_without_capture_is_a_no_op() {
        let mut host = host();
        host.set_var("_gravity", "-20");
        let mut gate = MovementGate::new();
        assert!(!gate.unfreeze(&mut host));
        assert_eq!(host.var_f64("_gravity"), Some(-20.0));
    }

    #[test]
    fn missing_variable_fails_freeze() {
        let mut host = host();
        host.set_var("_tankSpeed", "fast");
        let mut gate = MovementGate::new();
        assert!(matches!(
            gate.freeze(&mut host),
            Err(MatchError::MissingVar("_tankSpeed"))
        ));
        assert!(!gate.is_frozen());
        assert_eq!(host.var_f64("_gravity"), Some(-9.8));
    }
}
