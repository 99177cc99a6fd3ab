use crate::{TechID, UnitTypeID};
use serde::{Deserialize, Serialize};

/// Something a tech tree node depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TechTreeDependency {
    /// A dependency on an age being researched.
    Age(i32),
    /// A dependency on a building.
    Building(UnitTypeID),
    /// A dependency on a unit.
    Unit(UnitTypeID),
    /// A dependency on a research/tech.
    Research(TechID),
}

/// The tech tree: which ages, buildings, units and techs unlock each other.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTree {
    /// Age nodes.
    pub ages: Vec<TechTreeAge>,
    /// Building nodes.
    pub buildings: Vec<TechTreeBuilding>,
    /// Unit nodes.
    pub units: Vec<TechTreeUnit>,
    /// Tech nodes.
    pub techs: Vec<TechTreeTech>,
}

/// An age in the tech tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTreeAge {
    /// The tech that advances to this age.
    pub age_id: i32,
    /// Buildings that become available in this age.
    pub dependent_buildings: Vec<UnitTypeID>,
    /// Units that become available in this age.
    pub dependent_units: Vec<UnitTypeID>,
    /// Techs that become available in this age.
    pub dependent_techs: Vec<TechID>,
    /// What must be done before this age can be reached.
    pub prerequisites: Vec<TechTreeDependency>,
}

/// A building in the tech tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTreeBuilding {
    /// The building's unit type.
    pub building_id: UnitTypeID,
    /// The tech that enables this building.
    pub depends_tech_id: Option<TechID>,
    /// Buildings unlocked by building this one.
    pub dependent_buildings: Vec<UnitTypeID>,
    /// Units trained here.
    pub dependent_units: Vec<UnitTypeID>,
    /// Techs researched here.
    pub dependent_techs: Vec<TechID>,
    /// What must be done before this building can be built.
    pub prerequisites: Vec<TechTreeDependency>,
}

/// A unit in the tech tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTreeUnit {
    /// The unit type.
    pub unit_id: UnitTypeID,
    /// The building that trains this unit.
    pub building: UnitTypeID,
    /// The tech that enables this unit.
    pub depends_tech_id: Option<TechID>,
    /// The tech that upgrades to this unit.
    pub requires_tech_id: Option<TechID>,
    /// Units unlocked by this one, such as its upgrades.
    pub dependent_units: Vec<UnitTypeID>,
    /// What must be done before this unit can be trained.
    pub prerequisites: Vec<TechTreeDependency>,
}

/// A tech in the tech tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTreeTech {
    /// The tech.
    pub tech_id: TechID,
    /// The building where this tech is researched.
    pub building: UnitTypeID,
    /// Buildings unlocked by this tech.
    pub dependent_buildings: Vec<UnitTypeID>,
    /// Units unlocked by this tech.
    pub dependent_units: Vec<UnitTypeID>,
    /// Techs unlocked by this tech.
    pub dependent_techs: Vec<TechID>,
    /// What must be done before this tech can be researched.
    pub prerequisites: Vec<TechTreeDependency>,
}

impl TechTreeDependency {
    /// The unit type this dependency refers to, if it is a building or unit dependency.
    pub fn unit_id(&self) -> Option<UnitTypeID> {
        match *self {
            Self::Building(id) | Self::Unit(id) => Some(id),
            Self::Age(_) | Self::Research(_) => None,
        }
    }

    /// Mutable reference to the unit type this dependency refers to.
    pub fn unit_id_mut(&mut self) -> Option<&mut UnitTypeID> {
        match self {
            Self::Building(id) | Self::Unit(id) => Some(id),
            Self::Age(_) | Self::Research(_) => None,
        }
    }
}

impl TechTree {
    /// Visit every unit type ID referenced anywhere in the tech tree.
    pub fn for_each_unit_ref(&self, mut visit: impl FnMut(UnitTypeID)) {
        fn visit_deps(deps: &[TechTreeDependency], visit: &mut dyn FnMut(UnitTypeID)) {
            deps.iter()
                .filter_map(TechTreeDependency::unit_id)
                .for_each(visit)
        }
        for age in &self.ages {
            age.dependent_buildings.iter().copied().for_each(&mut visit);
            age.dependent_units.iter().copied().for_each(&mut visit);
            visit_deps(&age.prerequisites, &mut visit);
        }
        for building in &self.buildings {
            visit(building.building_id);
            building.dependent_buildings.iter().copied().for_each(&mut visit);
            building.dependent_units.iter().copied().for_each(&mut visit);
            visit_deps(&building.prerequisites, &mut visit);
        }
        for unit in &self.units {
            visit(unit.unit_id);
            visit(unit.building);
            unit.dependent_units.iter().copied().for_each(&mut visit);
            visit_deps(&unit.prerequisites, &mut visit);
        }
        for tech in &self.techs {
            visit(tech.building);
            tech.dependent_buildings.iter().copied().for_each(&mut visit);
            tech.dependent_units.iter().copied().for_each(&mut visit);
            visit_deps(&tech.prerequisites, &mut visit);
        }
    }

    /// Visit every unit type ID referenced anywhere in the tech tree, allowing changes.
    pub fn for_each_unit_ref_mut(&mut self, mut visit: impl FnMut(&mut UnitTypeID)) {
        fn visit_deps(deps: &mut [TechTreeDependency], visit: &mut dyn FnMut(&mut UnitTypeID)) {
            deps.iter_mut()
                .filter_map(TechTreeDependency::unit_id_mut)
                .for_each(visit)
        }
        for age in &mut self.ages {
            age.dependent_buildings.iter_mut().for_each(&mut visit);
            age.dependent_units.iter_mut().for_each(&mut visit);
            visit_deps(&mut age.prerequisites, &mut visit);
        }
        for building in &mut self.buildings {
            visit(&mut building.building_id);
            building.dependent_buildings.iter_mut().for_each(&mut visit);
            building.dependent_units.iter_mut().for_each(&mut visit);
            visit_deps(&mut building.prerequisites, &mut visit);
        }
        for unit in &mut self.units {
            visit(&mut unit.unit_id);
            visit(&mut unit.building);
            unit.dependent_units.iter_mut().for_each(&mut visit);
            visit_deps(&mut unit.prerequisites, &mut visit);
        }
        for tech in &mut self.techs {
            visit(&mut tech.building);
            tech.dependent_buildings.iter_mut().for_each(&mut visit);
            tech.dependent_units.iter_mut().for_each(&mut visit);
            visit_deps(&mut tech.prerequisites, &mut visit);
        }
    }

    /// Visit every tech ID referenced anywhere in the tech tree.
    pub fn for_each_tech_ref(&self, mut visit: impl FnMut(TechID)) {
        fn research(deps: &[TechTreeDependency]) -> impl Iterator<Item = TechID> + '_ {
            deps.iter().filter_map(|dep| match *dep {
                TechTreeDependency::Research(id) => Some(id),
                _ => None,
            })
        }
        for age in &self.ages {
            age.dependent_techs.iter().copied().for_each(&mut visit);
            research(&age.prerequisites).for_each(&mut visit);
        }
        for building in &self.buildings {
            building.depends_tech_id.into_iter().for_each(&mut visit);
            building.dependent_techs.iter().copied().for_each(&mut visit);
            research(&building.prerequisites).for_each(&mut visit);
        }
        for unit in &self.units {
            unit.depends_tech_id.into_iter().for_each(&mut visit);
            unit.requires_tech_id.into_iter().for_each(&mut visit);
            research(&unit.prerequisites).for_each(&mut visit);
        }
        for tech in &self.techs {
            visit(tech.tech_id);
            tech.dependent_techs.iter().copied().for_each(&mut visit);
            research(&tech.prerequisites).for_each(&mut visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> TechTree {
        TechTree {
            ages: vec![TechTreeAge {
                age_id: 1,
                dependent_units: vec![4.into()],
                ..Default::default()
            }],
            buildings: vec![TechTreeBuilding {
                building_id: 87.into(),
                dependent_units: vec![4.into(), 24.into()],
                prerequisites: vec![
                    TechTreeDependency::Age(1),
                    TechTreeDependency::Unit(4.into()),
                ],
                ..Default::default()
            }],
            units: vec![TechTreeUnit {
                unit_id: 24.into(),
                building: 87.into(),
                requires_tech_id: Some(100.into()),
                ..Default::default()
            }],
            techs: vec![TechTreeTech {
                tech_id: 100.into(),
                building: 87.into(),
                prerequisites: vec![TechTreeDependency::Research(101.into())],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn visits_every_unit_reference() {
        let mut refs = vec![];
        tree().for_each_unit_ref(|id| refs.push(u16::from(id)));
        assert_eq!(refs, vec![4, 87, 4, 24, 4, 24, 87, 87]);
    }

    #[test]
    fn rewrites_unit_references() {
        let mut tree = tree();
        tree.for_each_unit_ref_mut(|id| {
            if *id == UnitTypeID::from(4) {
                *id = 5.into();
            }
        });
        assert_eq!(tree.buildings[0].prerequisites[1], TechTreeDependency::Unit(5.into()));
        let mut refs = vec![];
        tree.for_each_unit_ref(|id| refs.push(u16::from(id)));
        assert!(!refs.contains(&4));
    }

    #[test]
    fn visits_every_tech_reference() {
        let mut refs = vec![];
        tree().for_each_tech_ref(|id| refs.push(u16::from(id)));
        assert_eq!(refs, vec![100, 100, 101]);
    }
}
