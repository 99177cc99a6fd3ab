typed_id!(
    /// An ID identifying a unit type.
    UnitTypeID(u16)
);

fallible_try_into!(UnitTypeID, i16);
fallible_try_from!(UnitTypeID, i16);
fallible_try_from!(UnitTypeID, i32);
fallible_try_from!(UnitTypeID, usize);

typed_id!(
    /// An ID identifying a graphic.
    GraphicID(u16)
);

fallible_try_into!(GraphicID, i16);
fallible_try_from!(GraphicID, i16);
fallible_try_from!(GraphicID, i32);
fallible_try_from!(GraphicID, usize);

typed_id!(
    /// An ID identifying a tech.
    TechID(u16)
);

fallible_try_into!(TechID, i16);
fallible_try_from!(TechID, i16);
fallible_try_from!(TechID, i32);

typed_id!(
    /// An ID identifying a tech effect.
    EffectID(u16)
);

fallible_try_into!(EffectID, i16);
fallible_try_from!(EffectID, i16);

typed_id!(
    /// An ID identifying a civilization.
    CivilizationID(u8)
);

fallible_try_from!(CivilizationID, i32);
fallible_try_from!(CivilizationID, usize);
