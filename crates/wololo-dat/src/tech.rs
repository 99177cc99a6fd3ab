use crate::{EffectID, TechID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    /// Resource type, or -1 for no cost.
    pub resource_type: i16,
    pub amount: i16,
    pub paid: bool,
}

impl ResourceCost {
    /// A cost slot that costs nothing.
    pub const FREE: ResourceCost = ResourceCost {
        resource_type: -1,
        amount: 0,
        paid: false,
    };
}

/// A tech that can be researched, or that is triggered automatically once its requirements
/// are met.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tech {
    pub name: String,
    /// Techs that must be researched first. Unused slots are -1.
    pub required_techs: [i16; 6],
    /// How many of the required techs must be researched.
    pub required_tech_count: u16,
    pub resource_costs: [ResourceCost; 3],
    pub civilization_id: i16,
    pub full_tech_mode: bool,
    /// Unit type where this tech is researched, or -1 if it is triggered automatically.
    pub research_location: i16,
    pub research_time: i16,
    /// The effect to apply when this tech is researched.
    pub effect_id: Option<EffectID>,
    pub icon_id: i16,
    pub button_id: u8,
    pub name_string_id: i32,
    pub description_string_id: i32,
    pub help_string_id: i32,
    pub tech_tree_string_id: i32,
}

impl Tech {
    /// The techs this tech depends on.
    pub fn requirements(&self) -> impl Iterator<Item = TechID> + '_ {
        self.required_techs
            .iter()
            .filter_map(|&id| TechID::try_from(id).ok())
    }

    /// Make this tech free.
    pub fn clear_costs(&mut self) {
        self.resource_costs = [ResourceCost::FREE; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements_skip_empty_slots() {
        let tech = Tech {
            required_techs: [101, -1, 257, -1, -1, -1],
            ..Default::default()
        };
        let ids: Vec<u16> = tech.requirements().map(u16::from).collect();
        assert_eq!(ids, vec![101, 257]);
    }
}
