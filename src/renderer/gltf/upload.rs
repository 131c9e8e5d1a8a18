use crate::renderer::draw_calls::DrawCall;
use crate::renderer::gltf::{Accessor, BufferView, Document, Primitive, ATTRIBUTE_LOCATIONS};
use crate::renderer::gpu::{
    AttributeLayout, BufferObject, Gpu, GpuError, VertexArray, VertexArrayBinding,
};

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("failed to allocate GPU resources for the scene")]
    ResourceAllocation(#[from] GpuError),

    #[error("malformed glTF asset: {0}")]
    MalformedAsset(String),
}

/// The GPU objects created for a document.
///
/// These are not freed on drop since that needs the [`Gpu`]; the owner calls
/// [`SceneResources::release`].
#[derive(Debug, Default)]
pub struct SceneResources {
    /// One per document buffer, same order.
    pub buffer_objects: Vec<BufferObject>,
    /// One per document mesh, same order.
    pub meshes: Vec<MeshResources>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshResources {
    /// One per primitive of the mesh, same order.
    pub primitives: Vec<PrimitiveResources>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveResources {
    pub vertex_array: VertexArray,
    pub draw_call: DrawCall,
}

impl SceneResources {
    pub fn vertex_array_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.primitives.len()).sum()
    }

    /// Deletes every vertex array and buffer object.
    pub fn release(&mut self, gpu: &mut impl Gpu) {
        let vertex_arrays = self
            .meshes
            .drain(..)
            .flat_map(|mesh| mesh.primitives)
            .map(|primitive| primitive.vertex_array)
            .collect::<Vec<_>>();
        if !vertex_arrays.is_empty() {
            gpu.delete_vertex_arrays(&vertex_arrays);
        }
        if !self.buffer_objects.is_empty() {
            gpu.delete_buffers(&self.buffer_objects);
            self.buffer_objects.clear();
        }
    }
}

/// Creates one buffer object per document buffer and one vertex array per
/// mesh primitive. On error nothing stays allocated.
pub fn upload(gpu: &mut impl Gpu, document: &Document) -> Result<SceneResources, UploadError> {
    let mut resources = SceneResources::default();
    match upload_into(gpu, document, &mut resources) {
        Ok(()) => {
            log::info!(
                "Uploaded {} buffer objects and {} vertex arrays",
                resources.buffer_objects.len(),
                resources.vertex_array_count(),
            );
            Ok(resources)
        }
        Err(error) => {
            resources.release(gpu);
            Err(error)
        }
    }
}

fn upload_into(
    gpu: &mut impl Gpu,
    document: &Document,
    resources: &mut SceneResources,
) -> Result<(), UploadError> {
    let mut offset = 0;
    for buffer in &document.buffers {
        let data = &document.blob[offset..offset + buffer.byte_length];
        resources.buffer_objects.push(gpu.create_buffer(data)?);
        offset += buffer.byte_length;
    }

    let primitive_count = document.meshes.iter().map(|mesh| mesh.primitives.len()).sum();
    let mut vertex_arrays = gpu.create_vertex_arrays(primitive_count)?.into_iter();
    for (mesh_index, mesh) in document.meshes.iter().enumerate() {
        let mut mesh_resources = MeshResources::default();
        for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
            let Some(vertex_array) = vertex_arrays.next() else {
                return Err(GpuError::Allocation("vertex arrays").into());
            };
            let what = format!("mesh {mesh_index} primitive {primitive_index}");
            let setup = setup_vertex_array(
                gpu,
                document,
                &resources.buffer_objects,
                primitive,
                vertex_array,
                &what,
            );
            let draw_call = match setup {
                Ok(draw_call) => draw_call,
                Err(error) => {
                    // This one and those not handed out yet are still owned here.
                    let unused = std::iter::once(vertex_array)
                        .chain(vertex_arrays)
                        .collect::<Vec<_>>();
                    gpu.delete_vertex_arrays(&unused);
                    resources.meshes.push(mesh_resources);
                    return Err(error);
                }
            };
            mesh_resources.primitives.push(PrimitiveResources {
                vertex_array,
                draw_call,
            });
        }
        resources.meshes.push(mesh_resources);
    }
    Ok(())
}

fn setup_vertex_array(
    gpu: &mut impl Gpu,
    document: &Document,
    buffer_objects: &[BufferObject],
    primitive: &Primitive,
    vertex_array: VertexArray,
    what: &str,
) -> Result<DrawCall, UploadError> {
    let mut binding = VertexArrayBinding::bind(gpu, vertex_array);

    for (semantic, location) in ATTRIBUTE_LOCATIONS {
        let Some(&accessor_index) = primitive.attributes.get(semantic) else {
            continue;
        };
        let (accessor, view) = resolve(document, accessor_index, &format!("{what} {semantic}"))?;
        if accessor.element_type.component_count() > 4 {
            return Err(UploadError::MalformedAsset(format!(
                "{what} {semantic} uses a matrix accessor"
            )));
        }
        let layout = AttributeLayout {
            components: accessor.element_type.component_count() as i32,
            component_type: accessor.component_type,
            normalized: accessor.normalized,
            stride: view.byte_stride.unwrap_or(0),
            offset: accessor.byte_offset + view.byte_offset,
        };
        log::debug!("{what}: {semantic} -> location {location} {layout:?}");
        binding.attribute(location, buffer_objects[view.buffer], &layout);
    }
    for semantic in primitive.attributes.keys() {
        if !ATTRIBUTE_LOCATIONS.iter().any(|(known, _)| *known == semantic.as_str()) {
            log::debug!("{what}: ignoring attribute {semantic}");
        }
    }

    if let Some(indices) = primitive.indices {
        let (accessor, view) = resolve(document, indices, &format!("{what} indices"))?;
        if !accessor.component_type.is_index_type() {
            return Err(UploadError::MalformedAsset(format!(
                "{what} indices use {:?} components",
                accessor.component_type
            )));
        }
        binding.element_buffer(buffer_objects[view.buffer]);
        Ok(DrawCall::Elements {
            mode: primitive.mode,
            count: accessor.count as i32,
            index_type: accessor.component_type,
            byte_offset: accessor.byte_offset + view.byte_offset,
        })
    } else {
        let accessor_index = primitive
            .attributes
            .get("POSITION")
            .or_else(|| primitive.attributes.values().next())
            .ok_or_else(|| UploadError::MalformedAsset(format!("{what} has no attributes")))?;
        Ok(DrawCall::Arrays {
            mode: primitive.mode,
            first: 0,
            count: document.accessors[*accessor_index].count as i32,
        })
    }
}

fn resolve<'a>(
    document: &'a Document,
    accessor_index: usize,
    what: &str,
) -> Result<(&'a Accessor, &'a BufferView), UploadError> {
    let accessor = &document.accessors[accessor_index];
    let view_index = accessor.buffer_view.ok_or_else(|| {
        UploadError::MalformedAsset(format!("{what}: accessor {accessor_index} has no bufferView"))
    })?;
    Ok((accessor, &document.buffer_views[view_index]))
}
