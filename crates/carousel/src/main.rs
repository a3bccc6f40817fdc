use carousel::config;
use carousel::gui::app::AppModel;
use carousel::sys::runtime;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_default()?;
    log::info!("Loaded {} carousel items", config.items.len());

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.orbit.carousel");

    app.run::<AppModel>((config, rx));
    Ok(())
}
