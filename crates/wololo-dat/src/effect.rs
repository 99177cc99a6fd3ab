use serde::{Deserialize, Serialize};

/// An effect command specifies an attribute change when a tech effect is triggered.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectCommand {
    /// The command.
    pub command_type: u8,
    /// The unit type the command applies to, or -1 to apply to a unit class.
    pub target_unit: i16,
    /// Unit class, or the unit type to upgrade to for upgrade commands.
    pub unit_class: i16,
    /// The attribute to change, or the tech to disable.
    pub attribute: i16,
    /// The value to set, add or multiply by.
    pub amount: f32,
}

/// A tech effect is a group of attribute changes that are applied when the effect is triggered.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Name for the effect.
    pub name: String,
    /// Attribute commands to execute when this effect is triggered.
    pub commands: Vec<EffectCommand>,
}

impl EffectCommand {
    pub const SET_ATTRIBUTE: u8 = 0;
    pub const ENABLE_UNIT: u8 = 2;
    pub const UPGRADE_UNIT: u8 = 3;
    pub const ADD_ATTRIBUTE: u8 = 4;
    pub const MULTIPLY_ATTRIBUTE: u8 = 5;
    pub const DISABLE_TECH: u8 = 102;

    /// Mutable references to the fields of this command that hold unit type IDs.
    ///
    /// Upgrade commands reference two units; other unit commands only their target.
    pub fn unit_refs_mut(&mut self) -> impl Iterator<Item = &mut i16> {
        let (target, upgrade) = match self.command_type {
            Self::UPGRADE_UNIT => (Some(&mut self.target_unit), Some(&mut self.unit_class)),
            Self::SET_ATTRIBUTE
            | Self::ENABLE_UNIT
            | Self::ADD_ATTRIBUTE
            | Self::MULTIPLY_ATTRIBUTE => (Some(&mut self.target_unit), None),
            _ => (None, None),
        };
        target.into_iter().chain(upgrade)
    }

    /// The unit type IDs referenced by this command. Class-wide commands reference none.
    pub fn unit_refs(&self) -> impl Iterator<Item = i16> {
        let (target, upgrade) = match self.command_type {
            Self::UPGRADE_UNIT => (Some(self.target_unit), Some(self.unit_class)),
            Self::SET_ATTRIBUTE
            | Self::ENABLE_UNIT
            | Self::ADD_ATTRIBUTE
            | Self::MULTIPLY_ATTRIBUTE => (Some(self.target_unit), None),
            _ => (None, None),
        };
        target.into_iter().chain(upgrade).filter(|&id| id >= 0)
    }
}
