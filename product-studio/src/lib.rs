//! Product photo studio on top of the Gemini image generation API.
//!
//! ```no_run
//! use product_studio::{Client, Studio, UploadedImage};
//!
//! #[tokio::main]
//! async fn main() -> product_studio::Result<()> {
//!     let mut studio = Studio::new();
//!     studio.set_product_image(Some(UploadedImage::from_path("bottle.png").await?));
//!     studio.set_lighting_style("natural sunlight")?;
//!
//!     let generator = Client::from_env()?.generator();
//!     let image = studio.generate(&generator).await?;
//!     println!("{}", image.data_uri());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod generation;
pub mod models;
pub mod preview;
pub mod prompt;
pub mod studio;

#[cfg(test)]
mod test_support;

pub use product_studio_types as types;

pub use client::{Client, ClientBuilder, HttpOptions, DEFAULT_MODEL};
pub use codec::UploadedImage;
pub use error::{Error, ErrorKind, Result};
pub use generation::{GeneratedImage, Generator};
pub use prompt::{build_prompt, PromptInputs};
pub use studio::{OutputPane, PendingGeneration, Studio};
