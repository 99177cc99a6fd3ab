use crate::{GraphicID, UnitTypeID};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageGraphic {
    pub graphic_id: Option<GraphicID>,
    pub damage_percent: u8,
    pub apply_mode: u8,
}

/// A unit type as seen by a single civilization.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitTypeID,
    pub copy_id: UnitTypeID,
    pub base_id: UnitTypeID,
    pub name: String,
    pub name_string_id: i32,
    pub creation_string_id: i32,
    pub help_string_id: i32,
    pub icon_id: i16,
    pub hidden_in_editor: bool,
    /// Unit that is left behind when this one dies.
    pub dead_unit_id: Option<UnitTypeID>,
    pub standing_graphic: (Option<GraphicID>, Option<GraphicID>),
    pub dying_graphic: Option<GraphicID>,
    pub walking_graphic: Option<GraphicID>,
    pub attack_graphic: Option<GraphicID>,
    pub garrison_graphic: Option<GraphicID>,
    pub construction_graphic: Option<GraphicID>,
    pub damage_graphics: Vec<DamageGraphic>,
    pub blast_attack_level: u8,
    pub hero_mode: u8,
}

impl Unit {
    /// Create an empty unit type.
    pub fn new(id: UnitTypeID) -> Self {
        Self {
            id,
            copy_id: id,
            base_id: id,
            ..Default::default()
        }
    }

    /// Give the unit a new ID, updating the IDs it was copied from.
    pub fn set_id(&mut self, id: UnitTypeID) {
        self.id = id;
        self.copy_id = id;
        self.base_id = id;
    }

    /// All graphics referenced by this unit.
    pub fn graphics(&self) -> impl Iterator<Item = GraphicID> + '_ {
        [
            self.standing_graphic.0,
            self.standing_graphic.1,
            self.dying_graphic,
            self.walking_graphic,
            self.attack_graphic,
            self.garrison_graphic,
            self.construction_graphic,
        ]
        .into_iter()
        .chain(self.damage_graphics.iter().map(|damage| damage.graphic_id))
        .flatten()
    }
}

/// A task that units of a type can perform, such as gathering from or attacking other units.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u16,
    pub is_default: bool,
    pub action_type: u16,
    pub object_class: i16,
    /// The unit type this task applies to.
    pub unit_id: Option<UnitTypeID>,
    pub terrain_id: i16,
    pub work_value: f32,
    pub work_range: f32,
}

/// The tasks shared by a unit type across all civilizations.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList(Vec<Task>);

impl Deref for TaskList {
    type Target = Vec<Task>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TaskList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self(tasks)
    }
}
