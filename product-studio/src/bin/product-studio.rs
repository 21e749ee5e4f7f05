//! CLI for the product photo studio.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use product_studio::types::options::OptionCategory;
use product_studio::{Client, OutputPane, PromptInputs, Studio, UploadedImage};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "product-studio")]
#[command(about = "Generate professional product photographs with Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a product shot from a product photo
    Generate(GenerateArgs),

    /// Print the instruction text for a selection
    Prompt(PromptArgs),

    /// List the available presentation options
    Options,
}

#[derive(Args)]
struct SelectionArgs {
    /// Aspect ratio id (e.g. 16:9)
    #[arg(long)]
    aspect_ratio: Option<String>,

    /// Lighting style id
    #[arg(long)]
    lighting: Option<String>,

    /// Camera perspective id
    #[arg(long)]
    camera: Option<String>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Product photo (PNG, JPEG or WebP)
    #[arg(short, long)]
    product: PathBuf,

    /// Optional style reference image
    #[arg(short, long)]
    style: Option<PathBuf>,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Model override
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Args)]
struct PromptArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Include the style reference clause
    #[arg(long)]
    with_style: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args, cli.json).await?,
        Commands::Prompt(args) => print_prompt(&args, cli.json)?,
        Commands::Options => list_options(cli.json)?,
    }

    Ok(())
}

fn apply_selection(studio: &mut Studio, selection: &SelectionArgs) -> anyhow::Result<()> {
    let requested = [
        (OptionCategory::AspectRatio, &selection.aspect_ratio),
        (OptionCategory::Lighting, &selection.lighting),
        (OptionCategory::CameraPerspective, &selection.camera),
    ];
    for (category, id) in requested {
        if let Some(id) = id {
            studio.select(category, id)?;
        }
    }
    Ok(())
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let mut studio = Studio::new();
    apply_selection(&mut studio, &args.selection)?;

    studio.set_product_image(Some(UploadedImage::from_path(&args.product).await?));
    if let Some(style) = &args.style {
        studio.set_style_image(Some(UploadedImage::from_path(style).await?));
    }

    let model = args.model;
    let result = studio
        .generate_with(|pending| async move {
            let mut generator = Client::from_env()?.generator();
            if let Some(model) = model {
                generator = generator.with_model(model);
            }
            generator
                .generate_image(
                    &pending.prompt,
                    &pending.product_image,
                    pending.style_image.as_ref(),
                )
                .await
        })
        .await;

    match (result, studio.output()) {
        (Ok(image), _) => {
            if json_output {
                let output = serde_json::json!({
                    "success": true,
                    "mime_type": image.mime_type(),
                    "data_uri": image.data_uri(),
                    "prompt": studio.prompt(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", image.data_uri());
            }
            Ok(())
        }
        (Err(err), OutputPane::Error { kind, message }) if json_output => {
            let output = serde_json::json!({
                "success": false,
                "kind": format!("{kind:?}"),
                "error": message,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Err(err.into())
        }
        (Err(err), _) => Err(err.into()),
    }
}

fn print_prompt(args: &PromptArgs, json_output: bool) -> anyhow::Result<()> {
    let mut studio = Studio::new();
    apply_selection(&mut studio, &args.selection)?;
    let inputs: PromptInputs = studio.inputs().with_style_image(args.with_style);
    let prompt = inputs.build();

    if json_output {
        let output = serde_json::json!({
            "aspect_ratio": inputs.aspect_ratio.id,
            "lighting": inputs.lighting.id,
            "camera_perspective": inputs.camera_perspective.id,
            "has_style_image": inputs.has_style_image,
            "prompt": prompt,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{prompt}");
    }
    Ok(())
}

fn list_options(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let catalogue: serde_json::Map<String, serde_json::Value> = OptionCategory::ALL
            .iter()
            .map(|category| {
                Ok((
                    category.label().to_string(),
                    serde_json::to_value(category.options())?,
                ))
            })
            .collect::<serde_json::Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
        return Ok(());
    }

    for category in OptionCategory::ALL {
        println!("{}:", category.label());
        let default = category.default_option();
        for option in category.options() {
            let marker = if option == default { " (default)" } else { "" };
            println!("  {:<24} {}{marker}", option.id, option.label);
        }
    }
    Ok(())
}
