use crate::GraphicID;
use serde::{Deserialize, Serialize};

/// A sub-graphic drawn as part of another graphic.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicDelta {
    pub graphic_id: Option<GraphicID>,
    pub offset_x: i16,
    pub offset_y: i16,
    pub display_angle: i16,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    pub id: GraphicID,
    pub name: String,
    pub file_name: String,
    /// ID of the SLP file holding the frames, or -1.
    pub slp_id: i32,
    pub layer: u8,
    pub frame_count: u16,
    pub frame_rate: f32,
    pub deltas: Vec<GraphicDelta>,
}

impl GraphicDelta {
    /// A delta drawing another graphic at the origin.
    pub fn new(graphic_id: GraphicID) -> Self {
        Self {
            graphic_id: Some(graphic_id),
            ..Default::default()
        }
    }
}

impl Graphic {
    /// IDs of the graphics drawn by this graphic's deltas.
    pub fn delta_graphics(&self) -> impl Iterator<Item = GraphicID> + '_ {
        self.deltas.iter().filter_map(|delta| delta.graphic_id)
    }
}
