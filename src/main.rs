use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use baize::gfx::RenderEngine;
use baize::platform::{DesktopPlatform, Platform};
use baize::ui::UiManager;
use baize::{AppConfig, Application, ModelSource};

#[derive(Parser)]
#[command(name = "baize", version, about = "Render a model with a fly camera and a debug overlay")]
struct Cli {
    /// Wavefront OBJ file to load
    #[arg(long, conflicts_with = "sphere")]
    model: Option<PathBuf>,

    /// Draw a generated billiard ball instead of a file
    #[arg(long)]
    sphere: bool,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    title: Option<String>,

    /// Present as fast as possible instead of waiting for vblank
    #[arg(long)]
    no_vsync: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let mut config = AppConfig::default();
        let width = self.width.unwrap_or(config.window.width);
        let height = self.height.unwrap_or(config.window.height);
        config = config.with_window_size(width, height).with_vsync(!self.no_vsync);

        if let Some(title) = self.title {
            config = config.with_title(title);
        }
        if self.sphere {
            config = config.with_model(ModelSource::ball());
        } else if let Some(path) = self.model {
            config = config.with_model(ModelSource::File(path));
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();

    let platform = DesktopPlatform::new(&config.window).context("failed to open window")?;
    let window = platform.window().clone();
    let (width, height) = platform.framebuffer_size();

    let renderer = pollster::block_on(RenderEngine::new(
        window.clone(),
        width,
        height,
        config.window.vsync,
    ))
    .context("failed to initialize renderer")?;

    let overlay = UiManager::new(
        renderer.device(),
        renderer.queue(),
        renderer.surface_format(),
        &window,
        platform.content_scale(),
    );

    let mut app = Application::new(config, platform, renderer, overlay);
    app.initialize().context("failed to load scene")?;
    app.run().context("application error")?;

    Ok(())
}
