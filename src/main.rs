use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use gltf_viewer::{Camera, Viewer, ViewerConfig};

/// View a glTF 2.0 scene.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// The .gltf or .glb file to open.
    file: PathBuf,

    #[arg(long, default_value_t = 1280, allow_negative_numbers = true)]
    width: i32,

    #[arg(long, default_value_t = 720, allow_negative_numbers = true)]
    height: i32,

    #[arg(long, default_value = "glTF Viewer")]
    title: String,

    /// Initial camera as eye, center and up: ex,ey,ez,cx,cy,cz,ux,uy,uz
    #[arg(long, value_parser = parse_lookat, allow_hyphen_values = true)]
    lookat: Option<Camera>,

    /// Replaces the built-in vertex shader.
    #[arg(long)]
    vertex_shader: Option<PathBuf>,

    /// Replaces the built-in fragment shader.
    #[arg(long)]
    fragment_shader: Option<PathBuf>,

    /// Render one frame to this PNG file and exit.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    no_vsync: bool,
}

fn parse_lookat(value: &str) -> Result<Camera, String> {
    value.parse().map_err(|err: gltf_viewer::CameraError| err.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ViewerConfig::new(cli.width, cli.height, cli.title, cli.file)?
        .with_camera(cli.lookat)
        .with_shaders(cli.vertex_shader, cli.fragment_shader)
        .with_output(cli.output)
        .with_vsync(!cli.no_vsync);

    let mut viewer = Viewer::new(config)?;
    viewer.run()?;
    Ok(())
}
