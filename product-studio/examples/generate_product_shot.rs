use product_studio::{Client, Studio, UploadedImage};

#[tokio::main]
async fn main() -> product_studio::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(product) = args.next() else {
        eprintln!("usage: generate_product_shot <product-image> [style-image]");
        return Ok(());
    };

    let mut studio = Studio::new();
    studio.set_product_image(Some(UploadedImage::from_path(product).await?));
    if let Some(style) = args.next() {
        studio.set_style_image(Some(UploadedImage::from_path(style).await?));
    }
    studio.set_aspect_ratio("16:9")?;
    studio.set_lighting_style("cinematic moody lighting")?;

    println!("{}\n", studio.prompt());

    let generator = Client::from_env()?.generator();
    let image = studio.generate(&generator).await?;
    println!("{} ({} base64 chars)", image.mime_type(), image.base64_data().len());
    Ok(())
}
