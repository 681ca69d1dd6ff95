#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("shelfmark")
            .with_inner_size([720.0, 860.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "shelfmark",
        options,
        Box::new(|cc| Ok(Box::new(shelfmark_ui::LabelApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {}
