//! Local state of the actuator panel.
//!
//! The panel is optimistic: a toggle changes the local controls at once and
//! yields the command to send. Rows pushed by the hub, and rows returned by
//! accepted commands, replace the local controls wholesale.

use std::fmt;

use aerotech_domain::actuator::{Actuator, Mode};
use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::command::ActuatorCommand;
use aerotech_domain::id::DeviceId;

use crate::api::CommandOutcome;

/// What the panel shows for one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorControl {
    /// The external controller owns the relay.
    pub automatic: bool,
    /// Desired power while not automatic.
    pub manual_on: bool,
}

impl Default for ActuatorControl {
    fn default() -> Self {
        Self {
            automatic: true,
            manual_on: false,
        }
    }
}

impl ActuatorControl {
    /// Whether the actuator is shown as running.
    ///
    /// Automatic control counts as active whatever the stored power says.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.automatic || self.manual_on
    }

    fn from_row(state: &ActuatorState, actuator: Actuator) -> Self {
        let channel = state.channel(actuator);
        Self {
            automatic: channel.mode == Mode::Auto,
            manual_on: channel.power,
        }
    }

    fn command(self, device_id: &DeviceId, actuator: Actuator) -> ActuatorCommand {
        if self.automatic {
            ActuatorCommand::auto(device_id.clone(), actuator)
        } else {
            ActuatorCommand::manual(device_id.clone(), actuator, self.manual_on)
        }
    }
}

/// Summary line of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Idle,
    Partial,
    AllActive,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "Idle",
            Self::Partial => "Partial",
            Self::AllActive => "All Active",
        })
    }
}

/// Controls of both actuators of one device.
#[derive(Debug, Clone)]
pub struct ActuatorPanel {
    device_id: DeviceId,
    pump: ActuatorControl,
    fan: ActuatorControl,
    in_flight: usize,
    error: Option<String>,
    warning: Option<String>,
}

impl ActuatorPanel {
    #[must_use]
    pub fn new(device_id: DeviceId) -> Self {
        Self {
            device_id,
            pump: ActuatorControl::default(),
            fan: ActuatorControl::default(),
            in_flight: 0,
            error: None,
            warning: None,
        }
    }

    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    #[must_use]
    pub fn control(&self, actuator: Actuator) -> ActuatorControl {
        match actuator {
            Actuator::Pump => self.pump,
            Actuator::Fan => self.fan,
        }
    }

    fn control_mut(&mut self, actuator: Actuator) -> &mut ActuatorControl {
        match actuator {
            Actuator::Pump => &mut self.pump,
            Actuator::Fan => &mut self.fan,
        }
    }

    /// Controls are disabled while any command awaits its answer.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Message of the last rejected command, until the next success.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Audit warning of the last accepted command, if any.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        Actuator::ALL
            .into_iter()
            .filter(|a| self.control(*a).is_active())
            .count()
    }

    #[must_use]
    pub fn system_status(&self) -> SystemStatus {
        match self.active_count() {
            0 => SystemStatus::Idle,
            n if n == Actuator::ALL.len() => SystemStatus::AllActive,
            _ => SystemStatus::Partial,
        }
    }

    /// Flip automatic control of `actuator`.
    ///
    /// Leaving automatic keeps the current manual power. Returns `None` while
    /// another command is in flight.
    pub fn toggle_automatic(&mut self, actuator: Actuator) -> Option<ActuatorCommand> {
        if self.is_busy() {
            return None;
        }
        let control = self.control_mut(actuator);
        control.automatic = !control.automatic;
        Some(self.issue(actuator))
    }

    /// Flip the manual power of `actuator`.
    ///
    /// Ignored while the actuator is automatic or a command is in flight.
    pub fn toggle_manual(&mut self, actuator: Actuator) -> Option<ActuatorCommand> {
        if self.is_busy() || self.control(actuator).automatic {
            return None;
        }
        let control = self.control_mut(actuator);
        control.manual_on = !control.manual_on;
        Some(self.issue(actuator))
    }

    /// Put both actuators under automatic control, or take both out of it
    /// when both already are. Yields one command per actuator.
    pub fn toggle_all_automatic(&mut self) -> Vec<ActuatorCommand> {
        if self.is_busy() {
            return Vec::new();
        }
        let automatic = !(self.pump.automatic && self.fan.automatic);
        Actuator::ALL
            .into_iter()
            .map(|actuator| {
                self.control_mut(actuator).automatic = automatic;
                self.issue(actuator)
            })
            .collect()
    }

    /// Switch both actuators to manual and off, even while busy.
    pub fn emergency_stop(&mut self) -> Vec<ActuatorCommand> {
        Actuator::ALL
            .into_iter()
            .map(|actuator| {
                *self.control_mut(actuator) = ActuatorControl {
                    automatic: false,
                    manual_on: false,
                };
                self.issue(actuator)
            })
            .collect()
    }

    fn issue(&mut self, actuator: Actuator) -> ActuatorCommand {
        self.in_flight += 1;
        self.control(actuator).command(&self.device_id, actuator)
    }

    /// Replace both controls with an authoritative row.
    ///
    /// Rows of other devices are ignored.
    pub fn apply_pushed(&mut self, state: &ActuatorState) {
        if state.device_id != self.device_id {
            return;
        }
        self.pump = ActuatorControl::from_row(state, Actuator::Pump);
        self.fan = ActuatorControl::from_row(state, Actuator::Fan);
    }

    /// Record the hub's answer to one of the issued commands.
    pub fn command_succeeded(&mut self, outcome: &CommandOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error = None;
        self.warning.clone_from(&outcome.log_warning);
        self.apply_pushed(&outcome.state);
    }

    /// Record a rejected command. Nothing is retried.
    pub fn command_failed(&mut self, message: impl Into<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use aerotech_domain::actuator_state::Channel;
    use aerotech_domain::id::ActorId;
    use aerotech_domain::time::now;

    use super::*;

    fn device() -> DeviceId {
        DeviceId::parse("aero-01").unwrap()
    }

    fn row(pump: Channel, fan: Channel) -> ActuatorState {
        ActuatorState::from_channels(device(), pump, fan, ActorId::new(), now())
    }

    fn settle(panel: &mut ActuatorPanel) {
        while panel.is_busy() {
            panel.command_failed("dropped");
        }
        panel.error = None;
    }

    #[test]
    fn should_start_automatic_and_all_active() {
        let panel = ActuatorPanel::new(device());

        assert!(panel.control(Actuator::Pump).automatic);
        assert_eq!(panel.active_count(), 2);
        assert_eq!(panel.system_status(), SystemStatus::AllActive);
        assert_eq!(panel.system_status().to_string(), "All Active");
    }

    #[test]
    fn should_issue_manual_command_with_current_power_when_leaving_automatic() {
        let mut panel = ActuatorPanel::new(device());

        let command = panel.toggle_automatic(Actuator::Fan).unwrap();

        assert_eq!(command, ActuatorCommand::manual(device(), Actuator::Fan, false));
        assert!(!panel.control(Actuator::Fan).is_active());
        assert_eq!(panel.system_status(), SystemStatus::Partial);
        assert!(panel.is_busy());
    }

    #[test]
    fn should_disable_toggles_while_command_in_flight() {
        let mut panel = ActuatorPanel::new(device());
        panel.toggle_automatic(Actuator::Pump).unwrap();

        assert!(panel.toggle_automatic(Actuator::Fan).is_none());
        assert!(panel.toggle_manual(Actuator::Pump).is_none());
        assert!(panel.toggle_all_automatic().is_empty());
        assert!(panel.control(Actuator::Fan).automatic);
    }

    #[test]
    fn should_ignore_manual_toggle_when_automatic() {
        let mut panel = ActuatorPanel::new(device());

        assert!(panel.toggle_manual(Actuator::Pump).is_none());
        assert!(!panel.control(Actuator::Pump).manual_on);
    }

    #[test]
    fn should_issue_manual_on_when_toggled_in_manual_mode() {
        let mut panel = ActuatorPanel::new(device());
        panel.toggle_automatic(Actuator::Pump);
        settle(&mut panel);

        let command = panel.toggle_manual(Actuator::Pump).unwrap();

        assert_eq!(command, ActuatorCommand::manual(device(), Actuator::Pump, true));
        assert!(panel.control(Actuator::Pump).is_active());
    }

    #[test]
    fn should_switch_both_to_manual_when_both_automatic() {
        let mut panel = ActuatorPanel::new(device());

        let commands = panel.toggle_all_automatic();

        assert_eq!(
            commands,
            vec![
                ActuatorCommand::manual(device(), Actuator::Pump, false),
                ActuatorCommand::manual(device(), Actuator::Fan, false),
            ]
        );
        assert_eq!(panel.system_status(), SystemStatus::Idle);
    }

    #[test]
    fn should_switch_both_to_automatic_when_either_is_manual() {
        let mut panel = ActuatorPanel::new(device());
        panel.toggle_automatic(Actuator::Fan);
        settle(&mut panel);

        let commands = panel.toggle_all_automatic();

        assert_eq!(
            commands,
            vec![
                ActuatorCommand::auto(device(), Actuator::Pump),
                ActuatorCommand::auto(device(), Actuator::Fan),
            ]
        );
        assert_eq!(panel.active_count(), 2);
    }

    #[test]
    fn should_stop_everything_even_while_busy() {
        let mut panel = ActuatorPanel::new(device());
        panel.toggle_automatic(Actuator::Pump);

        let commands = panel.emergency_stop();

        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| c.mode == Mode::Manual && !c.manual_on));
        assert_eq!(panel.system_status(), SystemStatus::Idle);
    }

    #[test]
    fn should_replace_local_state_with_pushed_row() {
        let mut panel = ActuatorPanel::new(device());
        panel.emergency_stop();

        panel.apply_pushed(&row(
            Channel::new(true, Mode::Manual),
            Channel::new(false, Mode::Auto),
        ));

        assert_eq!(
            panel.control(Actuator::Pump),
            ActuatorControl {
                automatic: false,
                manual_on: true
            }
        );
        assert!(panel.control(Actuator::Fan).automatic);
    }

    #[test]
    fn should_ignore_rows_of_other_devices() {
        let mut panel = ActuatorPanel::new(device());
        let mut other = row(Channel::new(false, Mode::Manual), Channel::new(false, Mode::Manual));
        other.device_id = DeviceId::parse("aero-02").unwrap();

        panel.apply_pushed(&other);

        assert_eq!(panel.active_count(), 2);
    }

    #[test]
    fn should_apply_response_row_and_clear_error_when_command_succeeds() {
        let mut panel = ActuatorPanel::new(device());
        panel.toggle_automatic(Actuator::Pump);
        panel.command_failed("Unauthorized");
        panel.toggle_automatic(Actuator::Pump);

        panel.command_succeeded(&CommandOutcome {
            state: row(Channel::new(false, Mode::Auto), Channel::new(false, Mode::Auto)),
            log_warning: Some("audit table unavailable".to_string()),
        });

        assert!(!panel.is_busy());
        assert!(panel.error().is_none());
        assert_eq!(panel.warning(), Some("audit table unavailable"));
        assert!(panel.control(Actuator::Pump).automatic);
    }

    #[test]
    fn should_keep_error_banner_when_command_rejected() {
        let mut panel = ActuatorPanel::new(device());
        panel.toggle_automatic(Actuator::Pump);

        panel.command_failed("missing required field `device_id`");

        assert!(!panel.is_busy());
        assert_eq!(panel.error(), Some("missing required field `device_id`"));
    }
}
