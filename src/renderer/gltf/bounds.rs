use glam::{Mat4, Vec3};

use crate::renderer::gltf::{walk_scene, Document};

/// An axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    fn around(corners: impl IntoIterator<Item = Vec3>) -> Option<Bounds> {
        corners.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => Bounds {
                    min: point,
                    max: point,
                },
                Some(Bounds { min, max }) => Bounds {
                    min: min.min(point),
                    max: max.max(point),
                },
            })
        })
    }

    fn transformed(&self, matrix: &Mat4) -> Option<Bounds> {
        let Bounds { min, max } = *self;
        Bounds::around((0..8).map(|corner| {
            let point = Vec3::new(
                if corner & 1 == 0 { min.x } else { max.x },
                if corner & 2 == 0 { min.y } else { max.y },
                if corner & 4 == 0 { min.z } else { max.z },
            );
            matrix.transform_point3(point)
        }))
    }

    fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// World-space bounds of the active scene, from the `min`/`max` of each
/// drawn primitive's `POSITION` accessor. `None` when nothing in the scene
/// declares them.
pub fn scene_bounds(document: &Document) -> Option<Bounds> {
    let mut combined: Option<Bounds> = None;
    walk_scene(document, |_, node, local_to_world| {
        let Some(mesh_index) = node.mesh else {
            return;
        };
        for primitive in &document.meshes[mesh_index].primitives {
            let Some(&position) = primitive.attributes.get("POSITION") else {
                continue;
            };
            let accessor = &document.accessors[position];
            let (Some(min), Some(max)) = (&accessor.min, &accessor.max) else {
                continue;
            };
            if min.len() < 3 || max.len() < 3 {
                continue;
            }
            let local = Bounds {
                min: Vec3::from_slice(min),
                max: Vec3::from_slice(max),
            };
            if let Some(world) = local.transformed(local_to_world) {
                combined = Some(match combined {
                    Some(bounds) => bounds.union(world),
                    None => world,
                });
            }
        }
    });
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::gltf::{
        Accessor, ComponentType, ElementType, Mesh, Node, Primitive, Scene, Transform,
    };
    use std::collections::BTreeMap;

    fn unit_cube_document(translations: &[Vec3]) -> Document {
        Document {
            scene: Some(0),
            scenes: vec![Scene {
                name: None,
                nodes: (0..translations.len()).collect(),
            }],
            nodes: translations
                .iter()
                .map(|&translation| Node {
                    mesh: Some(0),
                    transform: Transform::Decomposed {
                        translation: Some(translation),
                        rotation: None,
                        scale: None,
                    },
                    ..Default::default()
                })
                .collect(),
            meshes: vec![Mesh {
                name: None,
                primitives: vec![Primitive {
                    attributes: BTreeMap::from([("POSITION".to_string(), 0)]),
                    ..Default::default()
                }],
            }],
            accessors: vec![Accessor {
                buffer_view: None,
                byte_offset: 0,
                component_type: ComponentType::Float,
                normalized: false,
                count: 8,
                element_type: ElementType::Vec3,
                min: Some(vec![-1.0, -1.0, -1.0]),
                max: Some(vec![1.0, 1.0, 1.0]),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn bounds_cover_every_instance() {
        let document = unit_cube_document(&[Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);
        let bounds = scene_bounds(&document).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(5.0, 1.0, 1.0));
        assert_eq!(bounds.center(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(bounds.diagonal(), Vec3::new(6.0, 2.0, 2.0));
    }

    #[test]
    fn accessors_without_min_max_are_skipped() {
        let mut document = unit_cube_document(&[Vec3::ZERO]);
        document.accessors[0].min = None;
        assert_eq!(scene_bounds(&document), None);
    }

    #[test]
    fn rotated_node_bounds_stay_axis_aligned() {
        let mut document = unit_cube_document(&[Vec3::ZERO]);
        document.nodes[0].transform = Transform::Matrix(Mat4::from_rotation_z(
            std::f32::consts::FRAC_PI_4,
        ));
        let bounds = scene_bounds(&document).unwrap();
        let half_diagonal = std::f32::consts::SQRT_2;
        assert!((bounds.max.x - half_diagonal).abs() < 1e-5);
        assert!((bounds.min.y + half_diagonal).abs() < 1e-5);
        assert!((bounds.max.z - 1.0).abs() < 1e-6);
    }
}
