use glam::{Mat4, Quat, Vec3};

use crate::renderer::gltf::{Document, Node, SceneResources, Transform};
use crate::renderer::gpu::{Gpu, VertexArrayBinding};
use crate::renderer::uniforms::{MatrixUniforms, NodeMatrices};

/// The transform of a node relative to its parent.
pub fn local_transform(node: &Node) -> Mat4 {
    match node.transform {
        Transform::Matrix(matrix) => matrix,
        Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => Mat4::from_scale_rotation_translation(
            scale.unwrap_or(Vec3::ONE),
            rotation.unwrap_or(Quat::IDENTITY),
            translation.unwrap_or(Vec3::ZERO),
        ),
    }
}

/// Visits every node of the active scene depth-first, parents before
/// children, siblings in the order the document lists them. `visit` gets the
/// node index, the node and its local-to-world matrix.
pub fn walk_scene<'a>(document: &'a Document, mut visit: impl FnMut(usize, &'a Node, &Mat4)) {
    let Some(scene) = document.active_scene() else {
        return;
    };
    let mut node_stack = scene
        .nodes
        .iter()
        .rev()
        .map(|&i| (i, Mat4::IDENTITY))
        .collect::<Vec<_>>();
    while let Some((node_index, parent_to_world)) = node_stack.pop() {
        let node = &document.nodes[node_index];
        let local_to_world = parent_to_world * local_transform(node);
        visit(node_index, node, &local_to_world);
        for &child_index in node.children.iter().rev() {
            node_stack.push((child_index, local_to_world));
        }
    }
}

/// Draws every primitive of every mesh-bearing node of the active scene.
pub fn draw_scene<G: Gpu>(
    gpu: &mut G,
    document: &Document,
    resources: &SceneResources,
    uniforms: &MatrixUniforms,
    projection: &Mat4,
    view: &Mat4,
) {
    walk_scene(document, |_, node, local_to_world| {
        let Some(mesh_index) = node.mesh else {
            return;
        };
        let matrices = NodeMatrices::new(projection, view, local_to_world);
        for primitive in &resources.meshes[mesh_index].primitives {
            uniforms.bind(gpu, &matrices);
            let mut binding = VertexArrayBinding::bind(gpu, primitive.vertex_array);
            binding.draw(&primitive.draw_call);
        }
    });
}
