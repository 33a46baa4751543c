//! Actuator command vocabulary
//!
//! The Zigbee coordinator understands a closed set of ten ASCII tokens,
//! paired on/off per actuator. Everything that can mutate state or reach
//! hardware goes through [`Command`], so dispatch is exhaustive and
//! unknown tokens are rejected before any side effect.

use std::fmt;

/// A controllable device reachable via the actuator serial bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    Light,
    Fan,
    Aircon,
    Washer,
    Door,
}

impl Actuator {
    /// All actuators, in persisted-record order
    pub const ALL: [Actuator; 5] = [
        Actuator::Light,
        Actuator::Fan,
        Actuator::Aircon,
        Actuator::Washer,
        Actuator::Door,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Actuator::Light => "light",
            Actuator::Fan => "fan",
            Actuator::Aircon => "aircon",
            Actuator::Washer => "washer",
            Actuator::Door => "door",
        }
    }

    pub fn from_name(name: &str) -> Option<Actuator> {
        Actuator::ALL.into_iter().find(|a| a.name() == name)
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One actuator command from the closed vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    LightOn,
    LightOff,
    AirconOn,
    AirconOff,
    WasherOn,
    WasherOff,
    FanOn,
    FanOff,
    DoorOpen,
    DoorClose,
}

/// The one table mapping commands to/from wire tokens.
///
/// A `WIFI1`/`WIFI0` pair exists in some coordinator firmware headers but
/// is deliberately absent here: it was never part of the vocabulary the
/// relay consumer validates against.
const VOCABULARY: [(Command, &str); 10] = [
    (Command::LightOn, "L1"),
    (Command::LightOff, "L0"),
    (Command::AirconOn, "A1"),
    (Command::AirconOff, "A0"),
    (Command::WasherOn, "W1"),
    (Command::WasherOff, "W0"),
    (Command::FanOn, "F1"),
    (Command::FanOff, "F0"),
    (Command::DoorOpen, "D1"),
    (Command::DoorClose, "D0"),
];

impl Command {
    /// Exact, case-sensitive token lookup; no normalization, no prefixes.
    pub fn from_token(token: &str) -> Option<Command> {
        VOCABULARY
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(command, _)| *command)
    }

    /// Wire token written to the actuator bus (no delimiter is added)
    pub fn token(self) -> &'static str {
        VOCABULARY
            .iter()
            .find(|(command, _)| *command == self)
            .map(|(_, token)| *token)
            .unwrap_or_default()
    }

    pub fn actuator(self) -> Actuator {
        match self {
            Command::LightOn | Command::LightOff => Actuator::Light,
            Command::FanOn | Command::FanOff => Actuator::Fan,
            Command::AirconOn | Command::AirconOff => Actuator::Aircon,
            Command::WasherOn | Command::WasherOff => Actuator::Washer,
            Command::DoorOpen | Command::DoorClose => Actuator::Door,
        }
    }

    /// Polarity: true for on/open, false for off/closed
    pub fn engaged(self) -> bool {
        matches!(
            self,
            Command::LightOn
                | Command::FanOn
                | Command::AirconOn
                | Command::WasherOn
                | Command::DoorOpen
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Check a textual token against the vocabulary. Pure, no side effects.
pub fn validate(token: &str) -> bool {
    Command::from_token(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_round_trips() {
        for (command, token) in VOCABULARY {
            assert_eq!(Command::from_token(token), Some(command));
            assert_eq!(command.token(), token);
        }
    }

    #[test]
    fn test_validation_is_exact_and_case_sensitive() {
        assert!(validate("L1"));
        assert!(validate("D0"));
        assert!(!validate("l1"));
        assert!(!validate("L1 "));
        assert!(!validate("L"));
        assert!(!validate("L11"));
        assert!(!validate(""));
    }

    #[test]
    fn test_wifi_tokens_are_not_in_the_vocabulary() {
        assert!(!validate("WIFI1"));
        assert!(!validate("WIFI0"));
    }

    #[test]
    fn test_polarity_and_actuator() {
        assert_eq!(Command::DoorOpen.actuator(), Actuator::Door);
        assert!(Command::DoorOpen.engaged());
        assert!(!Command::DoorClose.engaged());
        assert_eq!(Command::FanOff.actuator(), Actuator::Fan);
        assert!(!Command::FanOff.engaged());
    }

    #[test]
    fn test_actuator_names_round_trip() {
        for actuator in Actuator::ALL {
            assert_eq!(Actuator::from_name(actuator.name()), Some(actuator));
        }
        assert_eq!(Actuator::from_name("Light"), None);
    }
}
