use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use base64::Engine;
use glam::{Mat4, Quat, Vec3};
use tinyjson::JsonValue;

use crate::renderer::gltf::{
    Accessor, Buffer, BufferView, ComponentType, Document, ElementType, Error, Mesh, Mode, Node,
    Primitive, Result, Scene, Transform,
};

type Object = HashMap<String, JsonValue>;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_CHUNK_JSON: u32 = 0x4E4F_534A;
const GLB_CHUNK_BIN: u32 = 0x004E_4942;

impl Document {
    /// Loads a `.gltf` or `.glb` file. External buffers are resolved relative
    /// to the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        log::info!("Loading {}", path.display());
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Document::from_slice(&bytes, path.parent())?;
        log::info!(
            "Loaded {} buffers, {} meshes, {} nodes and {} scenes",
            document.buffers.len(),
            document.meshes.len(),
            document.nodes.len(),
            document.scenes.len(),
        );
        Ok(document)
    }

    /// Parses a document from GLB or glTF JSON bytes. Without a base
    /// directory only embedded buffers (GLB chunk, `data:` URIs) can be
    /// resolved.
    pub fn from_slice(bytes: &[u8], base_dir: Option<&Path>) -> Result<Document> {
        let (json, bin) = if bytes.starts_with(GLB_MAGIC) {
            split_glb(bytes)?
        } else {
            (bytes, None)
        };
        let json = std::str::from_utf8(json).map_err(|_| Error::Json("not UTF-8".into()))?;
        let root: JsonValue = json.parse().map_err(|e| Error::Json(format!("{e}")))?;
        let document = parse_document(object(&root, "document")?, bin, base_dir)?;
        document.validate()?;
        Ok(document)
    }
}

/// Returns the JSON chunk and the optional BIN chunk of a GLB container.
fn split_glb(bytes: &[u8]) -> Result<(&[u8], Option<&[u8]>)> {
    let version = read_u32(bytes, 4).ok_or(Error::Glb("truncated header"))?;
    if version != 2 {
        return Err(Error::Glb("only version 2 is supported"));
    }
    let length = read_u32(bytes, 8).ok_or(Error::Glb("truncated header"))? as usize;
    if length > bytes.len() {
        return Err(Error::Glb("declared length exceeds file size"));
    }
    let bytes = &bytes[..length];

    let mut chunks = Vec::new();
    let mut offset = 12;
    while offset < bytes.len() {
        let chunk_length = read_u32(bytes, offset).ok_or(Error::Glb("truncated chunk header"))?;
        let chunk_type = read_u32(bytes, offset + 4).ok_or(Error::Glb("truncated chunk header"))?;
        let start = offset + 8;
        let data = start
            .checked_add(chunk_length as usize)
            .and_then(|end| bytes.get(start..end))
            .ok_or(Error::Glb("chunk exceeds container length"))?;
        let end = start + data.len();
        chunks.push((chunk_type, data));
        offset = end;
    }

    match chunks.as_slice() {
        [(GLB_CHUNK_JSON, json), rest @ ..] => {
            let bin = rest
                .first()
                .filter(|(chunk_type, _)| *chunk_type == GLB_CHUNK_BIN)
                .map(|(_, data)| *data);
            Ok((*json, bin))
        }
        _ => Err(Error::Glb("first chunk must be JSON")),
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let word = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes(word.try_into().ok()?))
}

fn parse_document(
    root: &Object,
    bin: Option<&[u8]>,
    base_dir: Option<&Path>,
) -> Result<Document> {
    if let Some(asset) = root.get("asset") {
        let asset = object(asset, "asset")?;
        if let Some(JsonValue::String(version)) = asset.get("version") {
            if !version.starts_with('2') {
                return Err(malformed(format!("unsupported glTF version {version}")));
            }
        }
    }

    // Negative scene indices are the "no active scene" sentinel.
    let scene = match root.get("scene") {
        Some(JsonValue::Number(n)) if *n < 0.0 => None,
        Some(value) => Some(as_index(value, "scene")?),
        None => None,
    };

    let buffers = array(root, "buffers")?
        .iter()
        .enumerate()
        .map(|(i, value)| parse_buffer(object(value, &format!("buffer {i}"))?))
        .collect::<Result<Vec<_>>>()?;
    let buffer_views = array(root, "bufferViews")?
        .iter()
        .enumerate()
        .map(|(i, value)| parse_buffer_view(object(value, &format!("bufferView {i}"))?, i))
        .collect::<Result<Vec<_>>>()?;
    let accessors = array(root, "accessors")?
        .iter()
        .enumerate()
        .map(|(i, value)| parse_accessor(object(value, &format!("accessor {i}"))?, i))
        .collect::<Result<Vec<_>>>()?;
    let meshes = array(root, "meshes")?
        .iter()
        .enumerate()
        .map(|(i, value)| parse_mesh(object(value, &format!("mesh {i}"))?, i))
        .collect::<Result<Vec<_>>>()?;
    let nodes = array(root, "nodes")?
        .iter()
        .enumerate()
        .map(|(i, value)| parse_node(object(value, &format!("node {i}"))?, i))
        .collect::<Result<Vec<_>>>()?;
    let scenes = array(root, "scenes")?
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let scene = object(value, &format!("scene {i}"))?;
            let what = format!("scene {i} nodes");
            Ok(Scene {
                name: optional_string(scene, "name"),
                nodes: index_array(scene, "nodes", &what)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let blob = resolve_buffers(&buffers, bin, base_dir)?;

    Ok(Document {
        scene,
        scenes,
        nodes,
        meshes,
        accessors,
        buffer_views,
        buffers,
        blob,
    })
}

fn parse_buffer(buffer: &Object) -> Result<Buffer> {
    Ok(Buffer {
        byte_length: as_index(required(buffer, "byteLength", "buffer")?, "buffer byteLength")?,
        uri: optional_string(buffer, "uri"),
    })
}

fn parse_buffer_view(view: &Object, index: usize) -> Result<BufferView> {
    let what = format!("bufferView {index}");
    Ok(BufferView {
        buffer: as_index(required(view, "buffer", &what)?, &what)?,
        byte_offset: optional_index(view, "byteOffset", &what)?.unwrap_or(0),
        byte_length: as_index(required(view, "byteLength", &what)?, &what)?,
        byte_stride: optional_index(view, "byteStride", &what)?,
        target: optional_index(view, "target", &what)?.map(|target| target as u32),
    })
}

fn parse_accessor(accessor: &Object, index: usize) -> Result<Accessor> {
    let what = format!("accessor {index}");
    let component_type = as_index(required(accessor, "componentType", &what)?, &what)?;
    let component_type = ComponentType::from_gl_enum(component_type as u32)
        .ok_or_else(|| malformed(format!("{what} has unknown componentType {component_type}")))?;
    let element_type = match required(accessor, "type", &what)? {
        JsonValue::String(name) => ElementType::from_name(name)
            .ok_or_else(|| malformed(format!("{what} has unknown type \"{name}\"")))?,
        _ => return Err(malformed(format!("{what} type must be a string"))),
    };
    let normalized = match accessor.get("normalized") {
        Some(JsonValue::Boolean(normalized)) => *normalized,
        Some(_) => return Err(malformed(format!("{what} normalized must be a boolean"))),
        None => false,
    };
    Ok(Accessor {
        buffer_view: optional_index(accessor, "bufferView", &what)?,
        byte_offset: optional_index(accessor, "byteOffset", &what)?.unwrap_or(0),
        component_type,
        normalized,
        count: as_index(required(accessor, "count", &what)?, &what)?,
        element_type,
        min: accessor.get("min").map(|v| floats(v, None, &what)).transpose()?,
        max: accessor.get("max").map(|v| floats(v, None, &what)).transpose()?,
    })
}

fn parse_mesh(mesh: &Object, index: usize) -> Result<Mesh> {
    let what = format!("mesh {index}");
    let primitives = match required(mesh, "primitives", &what)? {
        JsonValue::Array(primitives) => primitives,
        _ => return Err(malformed(format!("{what} primitives must be an array"))),
    };
    let primitives = primitives
        .iter()
        .enumerate()
        .map(|(j, primitive)| {
            let what = format!("{what} primitive {j}");
            let primitive = object(primitive, &what)?;
            let attributes = object(required(primitive, "attributes", &what)?, &what)?
                .iter()
                .map(|(semantic, accessor)| Ok((semantic.clone(), as_index(accessor, &what)?)))
                .collect::<Result<BTreeMap<_, _>>>()?;
            let mode = match optional_index(primitive, "mode", &what)? {
                Some(mode) => Mode::from_gl_enum(mode as u32)
                    .ok_or_else(|| malformed(format!("{what} has unknown mode {mode}")))?,
                None => Mode::Triangles,
            };
            Ok(Primitive {
                attributes,
                indices: optional_index(primitive, "indices", &what)?,
                mode,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Mesh {
        name: optional_string(mesh, "name"),
        primitives,
    })
}

fn parse_node(node: &Object, index: usize) -> Result<Node> {
    let what = format!("node {index}");
    let transform = if let Some(matrix) = node.get("matrix") {
        Transform::Matrix(Mat4::from_cols_slice(&floats(matrix, Some(16), &what)?))
    } else {
        let vec3 = |key: &str| {
            node.get(key)
                .map(|v| floats(v, Some(3), &what).map(|v| Vec3::from_slice(&v)))
                .transpose()
        };
        let rotation = node
            .get("rotation")
            .map(|v| floats(v, Some(4), &what).map(|q| Quat::from_xyzw(q[0], q[1], q[2], q[3])))
            .transpose()?;
        Transform::Decomposed {
            translation: vec3("translation")?,
            rotation,
            scale: vec3("scale")?,
        }
    };
    Ok(Node {
        name: optional_string(node, "name"),
        mesh: optional_index(node, "mesh", &what)?,
        children: index_array(node, "children", &what)?,
        transform,
    })
}

/// Concatenates the bytes of every buffer, in order, into one blob.
fn resolve_buffers(
    buffers: &[Buffer],
    bin: Option<&[u8]>,
    base_dir: Option<&Path>,
) -> Result<Vec<u8>> {
    let mut blob = Vec::new();
    for (i, buffer) in buffers.iter().enumerate() {
        let data = match (&buffer.uri, bin) {
            // The BIN chunk of GLBs
            (None, Some(bin)) if i == 0 => bin.to_vec(),
            (None, _) => return Err(malformed(format!("buffer {i} has no uri and no GLB chunk"))),
            (Some(uri), _) if uri.starts_with("data:") => decode_data_uri(uri)?,
            (Some(uri), _) => {
                let base_dir = base_dir.ok_or_else(|| Error::UnsupportedUri(uri.clone()))?;
                let path = base_dir.join(uri);
                log::debug!("Reading buffer {i} from {}", path.display());
                fs::read(&path).map_err(|source| Error::Io { path, source })?
            }
        };
        // GLB chunks may carry up to 3 bytes of padding.
        if data.len() < buffer.byte_length {
            return Err(malformed(format!(
                "buffer {i} declares {} bytes but only {} are available",
                buffer.byte_length,
                data.len()
            )));
        }
        blob.extend_from_slice(&data[..buffer.byte_length]);
    }
    Ok(blob)
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| Error::UnsupportedUri(uri.to_string()))?;
    if !header.ends_with(";base64") {
        return Err(Error::UnsupportedUri(header.to_string()));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

fn malformed(message: String) -> Error {
    Error::MalformedAsset(message)
}

fn object<'a>(value: &'a JsonValue, what: &str) -> Result<&'a Object> {
    match value {
        JsonValue::Object(object) => Ok(object),
        _ => Err(malformed(format!("{what} must be an object"))),
    }
}

fn required<'a>(object: &'a Object, key: &str, what: &str) -> Result<&'a JsonValue> {
    object
        .get(key)
        .ok_or_else(|| malformed(format!("{what} is missing \"{key}\"")))
}

/// A top-level array, empty when absent.
fn array<'a>(object: &'a Object, key: &str) -> Result<&'a [JsonValue]> {
    match object.get(key) {
        Some(JsonValue::Array(values)) => Ok(values),
        Some(_) => Err(malformed(format!("\"{key}\" must be an array"))),
        None => Ok(&[]),
    }
}

/// Largest integer a JSON number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn as_index(value: &JsonValue, what: &str) -> Result<usize> {
    match value {
        JsonValue::Number(n) if (0.0..=MAX_SAFE_INTEGER).contains(n) && n.fract() == 0.0 => {
            usize::try_from(*n as u64)
                .map_err(|_| malformed(format!("{what}: {n} does not fit in memory")))
        }
        _ => Err(malformed(format!("{what}: expected a non-negative integer"))),
    }
}

fn optional_index(object: &Object, key: &str, what: &str) -> Result<Option<usize>> {
    object
        .get(key)
        .map(|value| as_index(value, &format!("{what} {key}")))
        .transpose()
}

fn index_array(object: &Object, key: &str, what: &str) -> Result<Vec<usize>> {
    match object.get(key) {
        Some(JsonValue::Array(values)) => values.iter().map(|v| as_index(v, what)).collect(),
        Some(_) => Err(malformed(format!("{what}: \"{key}\" must be an array"))),
        None => Ok(Vec::new()),
    }
}

fn optional_string(object: &Object, key: &str) -> Option<String> {
    match object.get(key) {
        Some(JsonValue::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn floats(value: &JsonValue, len: Option<usize>, what: &str) -> Result<Vec<f32>> {
    let JsonValue::Array(values) = value else {
        return Err(malformed(format!("{what}: expected an array of numbers")));
    };
    if let Some(len) = len {
        if values.len() != len {
            return Err(malformed(format!(
                "{what}: expected {len} numbers, found {}",
                values.len()
            )));
        }
    }
    values
        .iter()
        .map(|value| match value {
            JsonValue::Number(n) => Ok(*n as f32),
            _ => Err(malformed(format!("{what}: expected an array of numbers"))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // One float VEC3 triangle, base64 of 36 bytes: (0,0,0) (1,0,0) (0,1,0).
    const TRIANGLE_DATA: &str =
        "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";

    fn triangle_json(buffer_uri: &str) -> String {
        format!(
            r#"{{
                "asset": {{ "version": "2.0" }},
                "scene": 0,
                "scenes": [{{ "nodes": [0] }}],
                "nodes": [{{ "mesh": 0, "translation": [1, 2, 3] }}],
                "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
                "buffers": [{{ "uri": "{buffer_uri}", "byteLength": 36 }}],
                "bufferViews": [{{
                    "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962
                }}],
                "accessors": [{{
                    "bufferView": 0, "byteOffset": 0, "componentType": 5126, "count": 3,
                    "type": "VEC3", "max": [1, 1, 0], "min": [0, 0, 0]
                }}]
            }}"#
        )
    }

    #[test]
    fn loads_embedded_triangle() {
        let json = triangle_json(TRIANGLE_DATA);
        let document = Document::from_slice(json.as_bytes(), None).unwrap();
        assert_eq!(document.scene, Some(0));
        assert_eq!(document.blob.len(), 36);
        assert_eq!(&document.blob[12..16], &1.0f32.to_le_bytes());
        let primitive = &document.meshes[0].primitives[0];
        assert_eq!(primitive.attributes["POSITION"], 0);
        assert_eq!(primitive.mode, Mode::Triangles);
        assert_eq!(primitive.indices, None);
        assert_eq!(document.accessors[0].max, Some(vec![1.0, 1.0, 0.0]));
        assert_eq!(document.buffer_views[0].target, Some(34962));
        assert_eq!(
            document.nodes[0].transform,
            Transform::Decomposed {
                translation: Some(Vec3::new(1.0, 2.0, 3.0)),
                rotation: None,
                scale: None,
            }
        );
    }

    #[test]
    fn matrix_is_kept_instead_of_trs() {
        let json = r#"{
            "nodes": [{
                "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 5,6,7,1],
                "translation": [100, 100, 100]
            }]
        }"#;
        let document = Document::from_slice(json.as_bytes(), None).unwrap();
        assert_eq!(
            document.nodes[0].transform,
            Transform::Matrix(Mat4::from_translation(Vec3::new(5.0, 6.0, 7.0)))
        );
    }

    #[test]
    fn negative_scene_means_no_active_scene() {
        let json = r#"{ "scene": -1, "scenes": [{ "nodes": [] }] }"#;
        let document = Document::from_slice(json.as_bytes(), None).unwrap();
        assert_eq!(document.scene, None);
        assert!(document.active_scene().is_none());
    }

    #[test]
    fn missing_scene_means_no_active_scene() {
        let document = Document::from_slice(br#"{ "scenes": [{}] }"#, None).unwrap();
        assert_eq!(document.scene, None);
        assert!(document.scenes[0].nodes.is_empty());
    }

    #[test]
    fn out_of_range_buffer_view_is_malformed() {
        let json =
            triangle_json(TRIANGLE_DATA).replace(r#""bufferView": 0"#, r#""bufferView": 7"#);
        let error = Document::from_slice(json.as_bytes(), None).unwrap_err();
        assert!(matches!(error, Error::MalformedAsset(_)), "{error}");
    }

    #[test]
    fn negative_index_is_malformed() {
        let json = r#"{ "nodes": [{ "mesh": -1 }] }"#;
        assert!(matches!(
            Document::from_slice(json.as_bytes(), None),
            Err(Error::MalformedAsset(_))
        ));
    }

    #[test]
    fn short_buffer_is_malformed() {
        let json = triangle_json(TRIANGLE_DATA)
            .replace(r#""byteLength": 36 }]"#, r#""byteLength": 48 }]"#);
        assert!(matches!(
            Document::from_slice(json.as_bytes(), None),
            Err(Error::MalformedAsset(_))
        ));
    }

    fn assert_malformed(json: &str) {
        match Document::from_slice(json.as_bytes(), None) {
            Err(Error::MalformedAsset(_)) => {}
            other => panic!("expected MalformedAsset, got {other:?}"),
        }
    }

    #[test]
    fn buffer_view_past_its_buffer_is_malformed() {
        let json = triangle_json(TRIANGLE_DATA).replace(
            r#""byteOffset": 0, "byteLength": 36"#,
            r#""byteOffset": 4, "byteLength": 36"#,
        );
        assert_malformed(&json);
    }

    #[test]
    fn huge_buffer_view_offset_is_malformed() {
        let json = triangle_json(TRIANGLE_DATA).replace(
            r#""byteOffset": 0, "byteLength": 36"#,
            r#""byteOffset": 9007199254740991, "byteLength": 9007199254740991"#,
        );
        assert_malformed(&json);
        let json = triangle_json(TRIANGLE_DATA).replace(
            r#""byteOffset": 0, "byteLength": 36"#,
            r#""byteOffset": 1e30, "byteLength": 2"#,
        );
        assert_malformed(&json);
    }

    #[test]
    fn huge_stride_and_count_are_malformed() {
        let json = triangle_json(TRIANGLE_DATA)
            .replace(r#""target": 34962"#, r#""byteStride": 9007199254740991"#)
            .replace(r#""count": 3"#, r#""count": 9007199254740991"#);
        assert_malformed(&json);
        let json = triangle_json(TRIANGLE_DATA).replace(r#""count": 3"#, r#""count": 1e30"#);
        assert_malformed(&json);
    }

    #[test]
    fn huge_buffer_length_is_malformed_without_allocating() {
        for length in ["9007199254740991", "1e16"] {
            let json = triangle_json(TRIANGLE_DATA).replace(
                r#""byteLength": 36 }]"#,
                &format!(r#""byteLength": {length} }}]"#),
            );
            assert_malformed(&json);
        }
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            Document::from_slice(b"{ nodes: ", None),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn external_buffer_needs_base_dir() {
        let json = triangle_json("triangle.bin");
        assert!(matches!(
            Document::from_slice(json.as_bytes(), None),
            Err(Error::UnsupportedUri(uri)) if uri == "triangle.bin"
        ));
    }

    #[test]
    fn loads_external_buffer_next_to_the_gltf() {
        let dir = tempfile::tempdir().unwrap();
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        fs::write(
            dir.path().join("triangle.bin"),
            bytemuck::cast_slice::<f32, u8>(&positions),
        )
        .unwrap();
        let gltf_path = dir.path().join("triangle.gltf");
        fs::write(&gltf_path, triangle_json("triangle.bin")).unwrap();

        let document = Document::load(&gltf_path).unwrap();
        assert_eq!(document.blob, bytemuck::cast_slice::<f32, u8>(&positions));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.gltf");
        assert!(matches!(Document::load(&path), Err(Error::Io { path: p, .. }) if p == path));
    }

    fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }
        let length = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::new();
        glb.write_all(b"glTF").unwrap();
        glb.write_all(&2u32.to_le_bytes()).unwrap();
        glb.write_all(&(length as u32).to_le_bytes()).unwrap();
        glb.write_all(&(json.len() as u32).to_le_bytes()).unwrap();
        glb.write_all(&GLB_CHUNK_JSON.to_le_bytes()).unwrap();
        glb.write_all(&json).unwrap();
        glb.write_all(&(bin.len() as u32).to_le_bytes()).unwrap();
        glb.write_all(&GLB_CHUNK_BIN.to_le_bytes()).unwrap();
        glb.write_all(&bin).unwrap();
        glb
    }

    #[test]
    fn loads_glb_bin_chunk_without_padding() {
        let json = r#"{ "buffers": [{ "byteLength": 6 }] }"#;
        let document = Document::from_slice(&glb(json, &[1, 2, 3, 4, 5, 6]), None).unwrap();
        assert_eq!(document.blob, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rejects_glb_with_wrong_version() {
        let mut bytes = glb("{}", &[]);
        bytes[4] = 1;
        assert!(matches!(Document::from_slice(&bytes, None), Err(Error::Glb(_))));
    }

    #[test]
    fn rejects_glb_chunk_longer_than_container() {
        let mut bytes = glb("{}", &[]);
        // Length of the JSON chunk
        bytes[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            Document::from_slice(&bytes, None),
            Err(Error::Glb("chunk exceeds container length"))
        ));
    }

    #[test]
    fn rejects_glb_without_leading_json_chunk() {
        let mut bytes = glb("{}", &[]);
        bytes[16..20].copy_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
        assert!(matches!(
            Document::from_slice(&bytes, None),
            Err(Error::Glb("first chunk must be JSON"))
        ));
    }

    #[test]
    fn rejects_non_base64_data_uri() {
        let json = triangle_json("data:text/plain,hello");
        assert!(matches!(
            Document::from_slice(json.as_bytes(), None),
            Err(Error::UnsupportedUri(_))
        ));
    }
}
