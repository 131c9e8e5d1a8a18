//! An index-based in-memory glTF 2.0 document.
//!
//! Everything refers to everything else by position in the document's flat
//! sequences, exactly as in the JSON. [`Document::validate`] guarantees that
//! all of those positions are in range, so the rest of the renderer indexes
//! without checking.

use std::collections::BTreeMap;
use std::path::PathBuf;

use glam::{Mat4, Quat, Vec3};

mod bounds;
mod loader;
mod program;
mod scene;
mod upload;

pub use bounds::{scene_bounds, Bounds};
pub use program::*;
pub use scene::{draw_scene, local_transform, walk_scene};
pub use upload::{upload, MeshResources, PrimitiveResources, SceneResources, UploadError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glTF JSON: {0}")]
    Json(String),

    #[error("invalid GLB container: {0}")]
    Glb(&'static str),

    #[error("failed to decode base64 buffer data")]
    Base64(#[from] base64::DecodeError),

    #[error("cannot resolve buffer uri \"{0}\" without a base directory")]
    UnsupportedUri(String),

    #[error("malformed glTF asset: {0}")]
    MalformedAsset(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// `componentType` of an accessor, with the OpenGL enum values glTF uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    pub fn from_gl_enum(value: u32) -> Option<ComponentType> {
        match value {
            5120 => Some(ComponentType::Byte),
            5121 => Some(ComponentType::UnsignedByte),
            5122 => Some(ComponentType::Short),
            5123 => Some(ComponentType::UnsignedShort),
            5125 => Some(ComponentType::UnsignedInt),
            5126 => Some(ComponentType::Float),
            _ => None,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            ComponentType::Byte => 5120,
            ComponentType::UnsignedByte => 5121,
            ComponentType::Short => 5122,
            ComponentType::UnsignedShort => 5123,
            ComponentType::UnsignedInt => 5125,
            ComponentType::Float => 5126,
        }
    }

    pub fn size(self) -> usize {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }

    pub fn is_index_type(self) -> bool {
        matches!(
            self,
            ComponentType::UnsignedByte | ComponentType::UnsignedShort | ComponentType::UnsignedInt
        )
    }
}

/// `type` of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    pub fn from_name(name: &str) -> Option<ElementType> {
        match name {
            "SCALAR" => Some(ElementType::Scalar),
            "VEC2" => Some(ElementType::Vec2),
            "VEC3" => Some(ElementType::Vec3),
            "VEC4" => Some(ElementType::Vec4),
            "MAT2" => Some(ElementType::Mat2),
            "MAT3" => Some(ElementType::Mat3),
            "MAT4" => Some(ElementType::Mat4),
            _ => None,
        }
    }

    pub fn component_count(self) -> usize {
        match self {
            ElementType::Scalar => 1,
            ElementType::Vec2 => 2,
            ElementType::Vec3 => 3,
            ElementType::Vec4 | ElementType::Mat2 => 4,
            ElementType::Mat3 => 9,
            ElementType::Mat4 => 16,
        }
    }
}

/// Primitive topology, with the OpenGL enum values glTF uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Mode {
    pub fn from_gl_enum(value: u32) -> Option<Mode> {
        match value {
            0 => Some(Mode::Points),
            1 => Some(Mode::Lines),
            2 => Some(Mode::LineLoop),
            3 => Some(Mode::LineStrip),
            4 => Some(Mode::Triangles),
            5 => Some(Mode::TriangleStrip),
            6 => Some(Mode::TriangleFan),
            _ => None,
        }
    }

    pub fn gl_enum(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    pub byte_length: usize,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
    pub target: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub component_type: ComponentType,
    pub normalized: bool,
    pub count: usize,
    pub element_type: ElementType,
    pub min: Option<Vec<f32>>,
    pub max: Option<Vec<f32>>,
}

impl Accessor {
    /// Size in bytes of one element.
    pub fn element_size(&self) -> usize {
        self.element_type.component_count() * self.component_type.size()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Primitive {
    /// Attribute semantic (`POSITION`, `NORMAL`, ...) to accessor index.
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

/// The local transform of a node. A matrix, when given, wins over TRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Matrix(Mat4),
    Decomposed {
        translation: Option<Vec3>,
        rotation: Option<Quat>,
        scale: Option<Vec3>,
    },
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Decomposed {
            translation: None,
            rotation: None,
            scale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub name: Option<String>,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
    pub transform: Transform,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub name: Option<String>,
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// The scene to display, `None` when the asset declares none.
    pub scene: Option<usize>,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
    /// The bytes of every buffer, concatenated in buffer order.
    pub blob: Vec<u8>,
}

impl Document {
    pub fn active_scene(&self) -> Option<&Scene> {
        self.scene.map(|index| &self.scenes[index])
    }

    /// Checks every cross-reference and byte range in the document.
    pub fn validate(&self) -> Result<()> {
        if let Some(scene) = self.scene {
            check_index("scene", scene, self.scenes.len(), "document")?;
        }

        let total_length = self
            .buffers
            .iter()
            .try_fold(0usize, |total, b| total.checked_add(b.byte_length))
            .ok_or_else(|| malformed("buffer lengths overflow".to_string()))?;
        if total_length > self.blob.len() {
            return Err(malformed(format!(
                "buffers declare {total_length} bytes but only {} were loaded",
                self.blob.len()
            )));
        }

        for (i, view) in self.buffer_views.iter().enumerate() {
            let referrer = format!("bufferView {i}");
            check_index("buffer", view.buffer, self.buffers.len(), &referrer)?;
            let buffer_length = self.buffers[view.buffer].byte_length;
            let end = view.byte_offset.checked_add(view.byte_length);
            if end.map_or(true, |end| end > buffer_length) {
                return Err(malformed(format!(
                    "{referrer} spans {} bytes from offset {} of buffer {} which is \
                     {buffer_length} bytes long",
                    view.byte_length, view.byte_offset, view.buffer,
                )));
            }
        }

        for (i, accessor) in self.accessors.iter().enumerate() {
            let referrer = format!("accessor {i}");
            let Some(view_index) = accessor.buffer_view else {
                continue;
            };
            check_index("bufferView", view_index, self.buffer_views.len(), &referrer)?;
            let view = &self.buffer_views[view_index];
            if accessor.count == 0 {
                continue;
            }
            let element_size = accessor.element_size();
            let required = match view.byte_stride {
                Some(stride) if stride > element_size => stride
                    .checked_mul(accessor.count - 1)
                    .and_then(|span| span.checked_add(element_size)),
                _ => element_size.checked_mul(accessor.count),
            };
            let fits = required.is_some_and(|required| {
                accessor.byte_offset <= view.byte_length
                    && required <= view.byte_length - accessor.byte_offset
            });
            if !fits {
                return Err(malformed(format!(
                    "{referrer} with {} elements at offset {} does not fit in bufferView \
                     {view_index} of {} bytes",
                    accessor.count, accessor.byte_offset, view.byte_length,
                )));
            }
        }

        for (i, mesh) in self.meshes.iter().enumerate() {
            for (j, primitive) in mesh.primitives.iter().enumerate() {
                let referrer = format!("mesh {i} primitive {j}");
                for accessor in primitive.attributes.values().chain(&primitive.indices) {
                    check_index("accessor", *accessor, self.accessors.len(), &referrer)?;
                }
            }
        }

        let mut parents = vec![None; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            let referrer = format!("node {i}");
            if let Some(mesh) = node.mesh {
                check_index("mesh", mesh, self.meshes.len(), &referrer)?;
            }
            for &child in &node.children {
                check_index("node", child, self.nodes.len(), &referrer)?;
                if let Some(parent) = parents[child].replace(i) {
                    return Err(malformed(format!(
                        "node {child} is a child of both node {parent} and node {i}"
                    )));
                }
            }
        }

        for (i, scene) in self.scenes.iter().enumerate() {
            let referrer = format!("scene {i}");
            for &root in &scene.nodes {
                check_index("node", root, self.nodes.len(), &referrer)?;
                if let Some(parent) = parents[root] {
                    return Err(malformed(format!(
                        "{referrer} lists node {root} as a root but it is a child of node {parent}"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn check_index(kind: &str, index: usize, len: usize, referrer: &str) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(malformed(format!(
            "{referrer} references {kind} {index} but there are only {len}"
        )))
    }
}

fn malformed(message: String) -> Error {
    Error::MalformedAsset(message)
}
