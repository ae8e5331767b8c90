use std::{fs::File, io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use config::Config;
use event::EventBus;
use log::{error, info};
use ratatui::prelude::*;
use simplelog::WriteLogger;
use xdg::BaseDirectories;

mod app;
mod config;
mod event;
mod screens;
mod store;
mod styles;
mod tui;
mod widgets;

fn main() -> Result<()> {
    let config = Config::load_or_init()?;
    init_logging(&config)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("error starting runtime")?;
    let courses = config.course_store()?;
    match &config.backend {
        config::Backend::Memory => info!("using in-memory store"),
        config::Backend::Firestore(c) => info!("using firestore project {}", c.project_id),
    };
    info!("courses are in {}", courses.collection());

    let events = EventBus::new();
    events.spawn_terminal_listener()?;
    let mut app = App::new(&events, rt.handle().clone(), courses);

    let backend = CrosstermBackend::new(io::stderr());
    let mut terminal = Terminal::new(backend)?;
    tui::init(&mut terminal)?;

    let res = run(&mut terminal, &mut app, &events);

    tui::exit(&mut terminal)?;
    if let Err(e) = &res {
        error!("exiting with error: {:#}", e);
    }

    // outstanding store calls are abandoned
    drop(app);
    rt.shutdown_timeout(Duration::from_secs(1));

    res
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, events: &EventBus) -> Result<()> {
    while app.running {
        tui::draw(terminal, app)?;
        app.handle_event(events.next()?);
    }

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let path = BaseDirectories::with_prefix("coursebook")?.place_cache_file("coursebook.log")?;
    let file = File::create(&path).context("error creating log file")?;

    WriteLogger::init(config.log_level()?, simplelog::Config::default(), file)
        .context("error setting up logging")?;

    Ok(())
}
