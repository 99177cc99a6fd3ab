use crate::{TechID, Unit, UnitTypeID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Civilization {
    pub name: String,
    pub tech_tree_id: Option<TechID>,
    pub team_bonus_id: Option<TechID>,
    /// Unit types indexed by ID. Empty slots are unit types this civilization does not have.
    pub units: Vec<Option<Unit>>,
}

impl Civilization {
    /// Create a civilization without any unit types.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get a unit type by ID.
    pub fn unit(&self, id: UnitTypeID) -> Option<&Unit> {
        self.units.get(usize::from(id)).and_then(Option::as_ref)
    }

    /// Get a mutable reference to a unit type by ID.
    pub fn unit_mut(&mut self, id: UnitTypeID) -> Option<&mut Unit> {
        self.units.get_mut(usize::from(id)).and_then(Option::as_mut)
    }

    /// Put a unit type in the slot for its ID, growing the table if needed.
    ///
    /// Returns the unit type it replaces.
    pub fn set_unit(&mut self, unit: Unit) -> Option<Unit> {
        let index = usize::from(unit.id);
        if index >= self.units.len() {
            self.units.resize_with(index + 1, Default::default);
        }
        self.units[index].replace(unit)
    }

    /// Iterate over the unit types this civilization has.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().flatten()
    }

    /// Iterate mutably over the unit types this civilization has.
    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut().flatten()
    }
}
