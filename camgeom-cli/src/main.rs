use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::Level;

use camgeom::camera::{
    affine_to_orthographic, compose_camera_rotation, decompose_affine_all, head_poses,
    AffineCamera, DecompositionConfig, HeadPose, OrthographicCamera, ProjectionMatrix,
    FRANKFURT_PITCH_OFFSET_DEG,
};
use camgeom::linalg::Mat3;
use camgeom::rotation::{AxisOrder, EulerAngles};

/// Camera projection decomposition and head-pose extraction
#[derive(Parser)]
#[command(name = "camgeom", version)]
struct Cli {
    /// Log decomposition residuals to stderr (-vv for trace output)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Factor affine projection matrices (JSON 2x4 or 3x4, or a list of them) into K, R, T.
    Decompose {
        /// Input JSON file, or - for stdin
        input: String,
        /// Also factor each camera into an orthographic camera plus point warp
        #[arg(long)]
        ortho: bool,
        /// Keep the full upper-triangular point warp instead of its diagonal
        #[arg(long)]
        full_h: bool,
        /// Recomposition tolerance (overrides the config file)
        #[arg(long)]
        tolerance: Option<f64>,
        /// TOML file with decomposition settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Head pose (yaw, pitch, roll in degrees) of camera rotation matrices.
    Headpose {
        /// Input JSON file with a 3x3 matrix or a list of them, or - for stdin
        input: String,
        /// Degrees added to the extracted pitch
        #[arg(long, default_value_t = FRANKFURT_PITCH_OFFSET_DEG, allow_negative_numbers = true)]
        pitch_offset: f64,
    },
    /// Camera rotation matrix of a head pose.
    Compose {
        #[arg(long, allow_negative_numbers = true)]
        yaw: f64,
        #[arg(long, allow_negative_numbers = true)]
        pitch: f64,
        #[arg(long, allow_negative_numbers = true)]
        roll: f64,
        #[arg(long, default_value_t = FRANKFURT_PITCH_OFFSET_DEG, allow_negative_numbers = true)]
        pitch_offset: f64,
    },
    /// Euler angles of rotation matrices in any axis order.
    Euler {
        /// Input JSON file with a 3x3 matrix or a list of them, or - for stdin
        input: String,
        /// Axis application order, e.g. XYZ or YXZ
        #[arg(long, default_value = "XYZ")]
        order: String,
        /// Report degrees instead of radians
        #[arg(long)]
        degrees: bool,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(x) => vec![x],
            OneOrMany::Many(xs) => xs,
        }
    }
}

type RawMatrix = Vec<Vec<f64>>;

#[derive(Serialize)]
struct DecomposeOutput {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    affine: Option<AffineCamera>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orthographic: Option<OrthographicCamera>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct EulerOutput {
    order: String,
    angles: [f64; 3],
    unit: &'static str,
}

#[derive(Serialize)]
struct ComposeOutput {
    rotation: Mat3,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

fn read_matrices(path: &str) -> Result<Vec<RawMatrix>> {
    let text = read_input(path)?;
    let parsed: OneOrMany<RawMatrix> = serde_json::from_str(&text)
        .with_context(|| format!("{path}: expected a matrix or a list of matrices"))?;
    Ok(parsed.into_vec())
}

fn to_projection(raw: &RawMatrix, index: usize) -> Result<ProjectionMatrix> {
    if raw.iter().any(|row| row.len() != 4) {
        bail!("matrix {index}: projection rows must have 4 entries");
    }
    let row = |i: usize| [raw[i][0], raw[i][1], raw[i][2], raw[i][3]];
    match raw.len() {
        2 => Ok(ProjectionMatrix::from_affine_rows([row(0), row(1)])),
        3 => Ok(ProjectionMatrix([row(0), row(1), row(2)])),
        n => bail!("matrix {index}: expected 2 or 3 rows, got {n}"),
    }
}

fn to_mat3(raw: &RawMatrix, index: usize) -> Result<Mat3> {
    if raw.len() != 3 || raw.iter().any(|row| row.len() != 3) {
        bail!("matrix {index}: expected a 3x3 rotation matrix");
    }
    let mut m = [[0.0; 3]; 3];
    for (dst, src) in m.iter_mut().zip(raw) {
        dst.copy_from_slice(src);
    }
    Ok(m)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn load_config(
    path: Option<&PathBuf>,
    tolerance: Option<f64>,
    full_h: bool,
) -> Result<DecompositionConfig> {
    let mut config = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read config {}", p.display()))?;
            DecompositionConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", p.display()))?
        }
        None => DecompositionConfig::default(),
    };
    if let Some(tol) = tolerance {
        if !(tol.is_finite() && tol > 0.0) {
            bail!("--tolerance must be a positive number, got {tol}");
        }
        config.tolerance = tol;
    }
    if full_h {
        config.limit_h_diagonal = false;
    }
    Ok(config)
}

fn run_decompose(
    input: &str,
    ortho: bool,
    config: &DecompositionConfig,
    pretty: bool,
) -> Result<()> {
    let raw = read_matrices(input)?;
    let projections = raw
        .iter()
        .enumerate()
        .map(|(i, m)| to_projection(m, i))
        .collect::<Result<Vec<_>>>()?;

    let mut failures = 0;
    for (index, result) in decompose_affine_all(&projections, config).into_iter().enumerate() {
        let output = match result.and_then(|cam| {
            let orthographic = if ortho {
                Some(affine_to_orthographic(&cam.k, &cam.extrinsics, config)?)
            } else {
                None
            };
            Ok((cam, orthographic))
        }) {
            Ok((cam, orthographic)) => DecomposeOutput {
                index,
                affine: Some(cam),
                orthographic,
                error: None,
            },
            Err(e) => {
                failures += 1;
                tracing::warn!(index, error = %e, "decomposition failed");
                DecomposeOutput {
                    index,
                    affine: None,
                    orthographic: None,
                    error: Some(e.to_string()),
                }
            }
        };
        print_json(&output, pretty)?;
    }

    if failures > 0 {
        bail!("{failures} of {} matrices failed to decompose", projections.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Decompose {
            input,
            ortho,
            full_h,
            tolerance,
            config,
        } => {
            let config = load_config(config.as_ref(), *tolerance, *full_h)?;
            tracing::debug!(?config, "decomposition settings");
            run_decompose(input, *ortho, &config, cli.pretty)?;
        }
        Command::Headpose {
            input,
            pitch_offset,
        } => {
            let rotations = read_matrices(input)?
                .iter()
                .enumerate()
                .map(|(i, m)| to_mat3(m, i))
                .collect::<Result<Vec<_>>>()?;
            for pose in head_poses(&rotations, *pitch_offset) {
                print_json(&pose, cli.pretty)?;
            }
        }
        Command::Compose {
            yaw,
            pitch,
            roll,
            pitch_offset,
        } => {
            let rotation = compose_camera_rotation(&HeadPose::new(*yaw, *pitch, *roll), *pitch_offset);
            print_json(&ComposeOutput { rotation }, cli.pretty)?;
        }
        Command::Euler {
            input,
            order,
            degrees,
        } => {
            let order: AxisOrder = order.parse()?;
            for (i, raw) in read_matrices(input)?.iter().enumerate() {
                let m = to_mat3(raw, i)?;
                let e = EulerAngles::from_matrix(&m, order);
                let (angles, unit) = if *degrees {
                    (e.to_degrees(), "degrees")
                } else {
                    (e.angles, "radians")
                };
                print_json(
                    &EulerOutput {
                        order: order.to_string(),
                        angles,
                        unit,
                    },
                    cli.pretty,
                )?;
            }
        }
    }

    Ok(())
}
