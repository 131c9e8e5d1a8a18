use std::fs;
use std::path::Path;

/// The vertex attribute location of the POSITION attribute of glTF models.
pub const ATTR_LOC_POSITION: u32 = 0;
/// The vertex attribute location of the NORMAL attribute of glTF models.
pub const ATTR_LOC_NORMAL: u32 = 1;
/// The vertex attribute location of the TEXCOORD_0 attribute of glTF models.
pub const ATTR_LOC_TEXCOORD_0: u32 = 2;

/// Attribute semantics the renderer binds, and the slot each one goes to.
pub const ATTRIBUTE_LOCATIONS: [(&str, u32); 3] = [
    ("POSITION", ATTR_LOC_POSITION),
    ("NORMAL", ATTR_LOC_NORMAL),
    ("TEXCOORD_0", ATTR_LOC_TEXCOORD_0),
];

pub const MODEL_VIEW_PROJ_MATRIX: &str = "uModelViewProjMatrix";
pub const MODEL_VIEW_MATRIX: &str = "uModelViewMatrix";
pub const NORMAL_MATRIX: &str = "uNormalMatrix";

const VERTEX_SHADER: &str = include_str!("../../../shaders/forward.vs.glsl");
const FRAGMENT_SHADER: &str = include_str!("../../../shaders/normals.fs.glsl");

/// GLSL sources of the forward shading program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        ShaderSources {
            vertex: VERTEX_SHADER.to_string(),
            fragment: FRAGMENT_SHADER.to_string(),
        }
    }
}

impl ShaderSources {
    /// The built-in sources, with either stage replaced by a file when given.
    pub fn load(vertex: Option<&Path>, fragment: Option<&Path>) -> std::io::Result<ShaderSources> {
        let mut sources = ShaderSources::default();
        if let Some(path) = vertex {
            log::info!("Using vertex shader {}", path.display());
            sources.vertex = fs::read_to_string(path)?;
        }
        if let Some(path) = fragment {
            log::info!("Using fragment shader {}", path.display());
            sources.fragment = fs::read_to_string(path)?;
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_vertex_shader_matches_attribute_locations() {
        let sources = ShaderSources::default();
        assert!(sources.vertex.contains("layout(location = 0) in vec3 aPosition"));
        assert!(sources.vertex.contains("layout(location = 1) in vec3 aNormal"));
        assert!(sources.vertex.contains("layout(location = 2) in vec2 aTexCoords"));
        for uniform in [MODEL_VIEW_PROJ_MATRIX, MODEL_VIEW_MATRIX, NORMAL_MATRIX] {
            assert!(sources.vertex.contains(uniform));
        }
    }

    #[test]
    fn overrides_only_the_given_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.fs.glsl");
        let source = "#version 330\nout vec3 fColor;\nvoid main() { fColor = vec3(1, 0, 0); }\n";
        fs::write(&path, source).unwrap();
        let sources = ShaderSources::load(None, Some(&path)).unwrap();
        assert_eq!(sources.vertex, ShaderSources::default().vertex);
        assert!(sources.fragment.contains("vec3(1, 0, 0)"));
    }
}
