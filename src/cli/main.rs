use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use vision::annotate::CloudVisionProvider;
use vision::common::FeatureType;
use vision::service::VisionService;
use vision_ocr::common::{init_logger_exe, vision_config_from_lookup};

#[derive(Parser, Debug)]
#[command(version, about = "A CLI tool to annotate images/PDFs with a cloud vision API", long_about = None)]
struct Cli {
    #[arg(
        long,
        help = "input file in image (png, jpeg, gif, webp, tiff, bmp, etc) format",
        conflicts_with = "pdf",
        required_unless_present = "pdf"
    )]
    image: Option<PathBuf>,
    #[arg(long, help = "input file in PDF format, text is extracted per page")]
    pdf: Option<PathBuf>,
    #[arg(
        long,
        default_value = "text",
        conflicts_with = "pdf",
        help = "feature to run on the image: text, document-text, landmark or face"
    )]
    feature: String,
    #[arg(long, conflicts_with = "pdf", help = "output file for the annotated image (face only)")]
    output: Option<PathBuf>,
    #[arg(long, help = "vision API key (defaults to VISION_API_KEY)")]
    api_key: Option<String>,
    #[arg(long, help = "vision API base URL (defaults to VISION_API_URL)")]
    url: Option<String>,
}

impl Cli {
    /// Image feature to run; `--output` is only meaningful for face detection.
    fn feature(&self) -> Result<FeatureType> {
        let feature = FeatureType::try_from(self.feature.as_str()).map_err(anyhow::Error::msg)?;
        match (feature, &self.output) {
            (FeatureType::Face, None) => anyhow::bail!("--output is required for face detection"),
            (FeatureType::Face, Some(_)) | (_, None) => Ok(feature),
            (_, Some(_)) => anyhow::bail!("--output is only supported with --feature face, not {}", feature),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger_exe();
    let cli = Cli::parse();
    let feature = match cli.pdf {
        Some(_) => None,
        None => Some(cli.feature()?),
    };

    let mut config = vision_config_from_lookup(|key| std::env::var(key).ok())?;
    if cli.api_key.is_some() {
        config.api_key = cli.api_key.clone();
    }
    if cli.url.is_some() {
        config.url = cli.url.clone();
    }

    let provider = CloudVisionProvider::new(&config)?;
    let service = VisionService::new(Arc::new(provider));

    if let Some(path) = &cli.pdf {
        let pdf = tokio::fs::read(path).await?;
        let pages = service.extract_text_from_pdf(pdf).await?;
        for (index, page) in pages.iter().enumerate() {
            println!("--- page {} ---", index + 1);
            println!("{}", page);
        }
        return Ok(());
    }

    let (path, feature) = cli.image.as_ref().zip(feature)
        .ok_or_else(|| anyhow::anyhow!("Either --image or --pdf is required"))?;
    let image = tokio::fs::read(path).await?;
    log::info!("Running {} on {}", feature, path.display());

    match feature {
        FeatureType::Text => println!("{}", service.extract_text_from_image(image).await?),
        FeatureType::DocumentText => println!("{}", service.detect_label_from_image(image).await?),
        FeatureType::Landmark => println!("{}", service.get_landmark_from_image(image).await?),
        FeatureType::Face => {
            let output = cli.output.as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required for face detection"))?;
            let rendered = service.detect_face_to_file(image, output).await?;
            log::info!("Wrote {} bytes ({})", rendered.bytes.len(), rendered.mime_type());
        }
    }

    Ok(())
}
