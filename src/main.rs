//! screenspan - content-region layout demo for X11
//!
//! Opens a window and tracks its content regions as it is moved and resized
//! across monitors. Every material layout change is printed as JSON.
//!
//! Keys: `e` cycles emulation modes, `q` quits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::protocol::Event;
use x11rb::wrapper::ConnectionExt as _;

use screenspan::config::{Config, SplitConfig};
use screenspan::emulation::next_emulation;
use screenspan::status::{region_labels, status_line, status_placement, LayoutReport};
use screenspan::tracing::UpdateTracer;
use screenspan::x11::X11RegionSource;
use screenspan::{LayoutOptions, RegionLayout, SplitKind};

const KEYSYM_E: u32 = 0x65;
const KEYSYM_Q: u32 = 0x71;

/// screenspan - track the content regions of a window across displays
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.config/screenspan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emulate this many screens (0 = off)
    #[arg(long, global = true)]
    emulate: Option<i32>,

    /// Split direction for emulated screens
    #[arg(long, global = true, value_enum)]
    split: Option<SplitConfig>,

    /// Merge regions smaller than this many pixels into a neighbour
    #[arg(long, global = true)]
    min_region_size: Option<u32>,

    /// Print the update log as JSON on exit
    #[arg(long, global = true)]
    trace: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether multiple screens are present and list them
    Probe,

    /// Open a window and track its layout (default)
    Run,
}

/// Settings resolved from the config file and command line
struct Settings {
    options: LayoutOptions,
    emulate: i32,
    split: SplitKind,
    margin: i32,
    status_height: i32,
    trace: bool,
}

impl Settings {
    fn resolve(cli: &Cli) -> Self {
        let config = match &cli.config {
            Some(path) => Config::load_from_path(path.clone()),
            None => Config::load(),
        };

        let mut options = config.layout_options();
        if let Some(min) = cli.min_region_size {
            options.min_region_size = min.min(i32::MAX as u32) as i32;
        }

        Self {
            options,
            emulate: cli
                .emulate
                .unwrap_or(config.emulation.screens.min(i32::MAX as u32) as i32),
            split: cli.split.unwrap_or(config.emulation.split).into(),
            margin: config.presenter.margin,
            status_height: config.presenter.status_height,
            trace: cli.trace,
        }
    }
}

/// Demo presenter: one top-level window whose layout is tracked
struct Presenter {
    layout: RegionLayout<X11RegionSource>,
    window: Window,
    wm_protocols: Atom,
    wm_delete_window: Atom,
    tracer: UpdateTracer,
    margin: i32,
    status_height: i32,
}

impl Presenter {
    fn new(source: X11RegionSource, settings: &Settings) -> Result<Self> {
        let conn = source.conn();
        let screen = &conn.setup().roots[source.screen_num()];

        let window = conn.generate_id()?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            window,
            screen.root,
            0,
            0,
            720,
            500,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .background_pixel(screen.white_pixel)
                .event_mask(EventMask::STRUCTURE_NOTIFY | EventMask::KEY_PRESS),
        )?;

        let wm_protocols = intern(conn, b"WM_PROTOCOLS")?;
        let wm_delete_window = intern(conn, b"WM_DELETE_WINDOW")?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            wm_protocols,
            AtomEnum::ATOM,
            &[wm_delete_window],
        )?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            b"screenspan",
        )?;
        conn.map_window(window)?;
        conn.flush()?;

        log::info!("Created window 0x{:x}", window);

        let mut layout = RegionLayout::with_options(source, settings.options.clone());
        if settings.emulate > 0 {
            layout.emulate_screens(settings.emulate, settings.split);
        }

        Ok(Self {
            layout,
            window,
            wm_protocols,
            wm_delete_window,
            tracer: UpdateTracer::new(),
            margin: settings.margin,
            status_height: settings.status_height,
        })
    }

    fn conn(&self) -> &x11rb::rust_connection::RustConnection {
        self.layout.source().conn()
    }

    /// Event loop; returns when the window is closed or `q` is pressed
    fn run(&mut self) -> Result<()> {
        loop {
            let event = self.conn().wait_for_event()?;
            match event {
                Event::ConfigureNotify(e) if e.window == self.window => {
                    self.handle_layout_change()?;
                }
                Event::KeyPress(e) => match self.keysym_for(e.detail)? {
                    KEYSYM_E => {
                        self.cycle_emulation();
                        self.handle_layout_change()?;
                    }
                    KEYSYM_Q => break,
                    _ => {}
                },
                Event::ClientMessage(e) => {
                    let data = e.data.as_data32();
                    if e.format == 32 && e.type_ == self.wm_protocols && data[0] == self.wm_delete_window {
                        break;
                    }
                }
                _ => {}
            }
        }

        self.conn().destroy_window(self.window)?;
        self.conn().flush()?;
        Ok(())
    }

    /// Refresh the layout after a move or resize
    fn handle_layout_change(&mut self) -> Result<()> {
        let changed = self.layout.update(self.window);
        self.tracer.trace_update(&self.layout, changed);

        // The status line includes the window position, which is not a material change
        log::info!("{}", status_line(&self.layout));

        if changed {
            if let Some(status) = status_placement(&self.layout, self.margin, self.status_height) {
                log::debug!("Status element at {:?}", status);
            }
            for label in region_labels(&self.layout, self.margin, self.status_height) {
                log::debug!("Region {} content {:?}: {:?}", label.index, label.content, label.text);
            }
            let report = LayoutReport::from_layout(&self.layout);
            println!("{}", serde_json::to_string(&report)?);
        }
        Ok(())
    }

    fn cycle_emulation(&mut self) {
        let (screens, split) = next_emulation(
            self.layout.emulation(),
            self.layout.multiple_screens_present(),
            self.layout.split_kind(),
            self.layout.region_count(),
        );
        self.layout.emulate_screens(screens, split);
    }

    fn keysym_for(&self, keycode: Keycode) -> Result<u32> {
        let mapping = self.conn().get_keyboard_mapping(keycode, 1)?.reply()?;
        Ok(mapping.keysyms.first().copied().unwrap_or(0))
    }
}

fn intern(conn: &impl Connection, name: &[u8]) -> Result<Atom> {
    Ok(conn.intern_atom(false, name)?.reply()?.atom)
}

fn probe(source: &X11RegionSource) -> Result<()> {
    let monitors = source.monitors().unwrap_or_else(|e| {
        log::warn!("Could not list monitors: {:#}", e);
        Vec::new()
    });
    let report = json!({
        "backend": format!("{:?}", source.backend()),
        "multiple_screens": screenspan::layout::multiple_screens_present(source),
        "monitors": monitors,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli);
    let source = X11RegionSource::connect().context("screenspan needs an X11 display")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Probe => probe(&source),
        Commands::Run => {
            let mut presenter = Presenter::new(source, &settings)?;
            presenter.run()?;

            if settings.trace {
                println!("{}", serde_json::to_string_pretty(&presenter.tracer.get_all())?);
            }
            log::info!(
                "Exiting after {} layout change(s)",
                presenter.tracer.change_count()
            );
            Ok(())
        }
    }
}
