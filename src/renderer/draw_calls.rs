use crate::renderer::gltf::{ComponentType, Mode};

/// Everything needed to submit one primitive once its vertex array is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    /// `glDrawArrays`
    Arrays { mode: Mode, first: i32, count: i32 },
    /// `glDrawElements` reading `count` indices from the vertex array's
    /// element buffer, starting at `byte_offset`.
    Elements {
        mode: Mode,
        count: i32,
        index_type: ComponentType,
        byte_offset: usize,
    },
}

