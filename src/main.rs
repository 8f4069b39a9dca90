//! Facial attribute analysis CLI
//!
//! Reads face crops from disk, runs every configured model over them as one
//! batch and prints the results as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use demography::config::Config;
use demography::models::{FaceAttributes, FacialRecognition, ModelSet};
use demography::utils::image::{image_to_tensor, open_image, ChannelOrder};
use demography::utils::math::cosine_similarity;

#[derive(Debug, Parser)]
#[command(version, about = "Estimate age, gender, emotion and race of face crops")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = Config::default_path())]
    config: String,

    /// Also compute recognition embeddings
    #[arg(long)]
    embed: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Face crop images
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FaceReport {
    image: PathBuf,
    #[serde(flatten)]
    attributes: FaceAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity_to_first: Option<f32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&args.config).unwrap_or_else(|e| {
        info!("Using default config ({})", e);
        Config::default()
    });
    info!("  Device: {}", config.inference.device);
    info!("  Target size: {}", config.preprocess.target_size);

    let models = ModelSet::load(&config).context("failed to load models")?;

    let mut decoded = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let img = open_image(path).with_context(|| format!("cannot read {}", path.display()))?;
        decoded.push(img);
    }

    let faces = decoded
        .iter()
        .map(|img| image_to_tensor(img, config.preprocess.target_size, ChannelOrder::Bgr))
        .collect();
    let attributes = models.analyzer.analyze(faces)?;

    let similarities: Vec<Option<f32>> = match (&models.recognition, args.embed) {
        (Some(recognition), true) => {
            let (h, _) = recognition.input_shape();
            let embeddings = decoded
                .iter()
                .map(|img| {
                    let face = image_to_tensor(img, h as u32, ChannelOrder::Rgb).into_dyn();
                    recognition.forward(face.view())
                })
                .collect::<Result<Vec<_>, _>>()?;
            embeddings
                .iter()
                .map(|e| Some(cosine_similarity(&embeddings[0], e)))
                .collect()
        }
        (None, true) => {
            info!("No recognition model configured, skipping embeddings");
            vec![None; decoded.len()]
        }
        _ => vec![None; decoded.len()],
    };

    let reports: Vec<FaceReport> = args
        .images
        .into_iter()
        .zip(attributes)
        .zip(similarities)
        .map(|((image, attributes), similarity_to_first)| FaceReport {
            image,
            attributes,
            similarity_to_first,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
