mod config;
mod host;
mod state;
mod ui;

use clap::Parser;
use eframe::egui;
use snake_engine::log;
use snake_engine::logger::init_logger;
use tokio::sync::mpsc;

use config::get_config_manager;
use host::overlay_host_task;
use state::SharedState;
use ui::OverlayApp;

#[derive(Parser)]
#[command(name = "snake_overlay")]
struct Args {
    #[arg(long)]
    use_log_prefix: bool,

    /// Config file to use instead of the one next to the executable.
    #[arg(long)]
    config: Option<String>,

    /// Mount the snake overlay right away.
    #[arg(long)]
    open: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Overlay".to_string())
    } else {
        None
    };
    init_logger(prefix);

    let config_manager = get_config_manager(args.config.as_deref());
    let config = match config_manager.get_config() {
        Ok(config) => config,
        Err(e) => {
            log!("Failed to load config, falling back to defaults: {}", e);
            Default::default()
        }
    };

    let shared_state = SharedState::new();
    let (host_tx, host_rx) = mpsc::unbounded_channel();

    let runtime = tokio::runtime::Runtime::new()?;
    let shared_state_clone = shared_state.clone();
    let runtime_thread = std::thread::spawn(move || {
        runtime.block_on(overlay_host_task(shared_state_clone, host_rx));
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([200.0, 200.0])
            .with_title("Snake"),
        ..Default::default()
    };

    log!("Starting snake overlay host");
    let ui_shared_state = shared_state.clone();
    eframe::run_native(
        "Snake Overlay",
        options,
        Box::new(move |cc| {
            ui_shared_state.set_egui_ctx(cc.egui_ctx.clone());
            Ok(Box::new(OverlayApp::new(
                ui_shared_state,
                host_tx,
                config_manager,
                args.open,
            )))
        }),
    )?;

    if runtime_thread.join().is_err() {
        log!("Runtime thread panicked");
    }
    Ok(())
}
