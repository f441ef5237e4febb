//! X11 region source.
//!
//! Content regions of a window are the parts of its client area that lie on a
//! monitor. Monitors come from RandR 1.5 `GetMonitors` when available, or from
//! Xinerama otherwise. The backend is picked once when the source is created.

use anyhow::{Context, Result};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::randr;
use x11rb::protocol::xinerama;
use x11rb::protocol::xproto::{ConnectionExt as XprotoExt, Window};
use x11rb::rust_connection::RustConnection;

use crate::source::{answer_query, clip_to_monitors, RegionQuery, RegionSource};
use crate::types::{Rect, WindowGeometry};

/// Where monitor rectangles come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorBackend {
    RandR,
    Xinerama,
    /// No multi-monitor extension; every region query fails
    Unsupported,
}

/// Region source backed by an X11 connection
pub struct X11RegionSource {
    conn: RustConnection,
    root: Window,
    screen_num: usize,
    backend: MonitorBackend,
}

impl X11RegionSource {
    /// Connect to the X server named by `$DISPLAY`
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) =
            RustConnection::connect(None).context("Failed to connect to X11 server")?;
        Ok(Self::from_connection(conn, screen_num))
    }

    pub fn from_connection(conn: RustConnection, screen_num: usize) -> Self {
        let root = conn.setup().roots[screen_num].root;
        let backend = resolve_backend(&conn);
        log::info!(
            "X11 screen {}, root window 0x{:x}, monitor backend {:?}",
            screen_num,
            root,
            backend
        );
        Self {
            conn,
            root,
            screen_num,
            backend,
        }
    }

    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub fn root(&self) -> Window {
        self.root
    }

    pub fn screen_num(&self) -> usize {
        self.screen_num
    }

    pub fn backend(&self) -> MonitorBackend {
        self.backend
    }

    /// All monitors in root coordinates, in the order the server reports them
    pub fn monitors(&self) -> Result<Vec<Rect>> {
        match self.backend {
            MonitorBackend::RandR => {
                let reply = randr::get_monitors(&self.conn, self.root, true)?
                    .reply()
                    .context("Failed to get monitors from RandR")?;
                Ok(reply
                    .monitors
                    .iter()
                    .map(|m| {
                        Rect::from_origin_size(m.x as i32, m.y as i32, m.width as u32, m.height as u32)
                    })
                    .collect())
            }
            MonitorBackend::Xinerama => {
                let reply = xinerama::query_screens(&self.conn)?
                    .reply()
                    .context("Failed to query Xinerama screens")?;
                Ok(reply
                    .screen_info
                    .iter()
                    .map(|s| {
                        Rect::from_origin_size(
                            s.x_org as i32,
                            s.y_org as i32,
                            s.width as u32,
                            s.height as u32,
                        )
                    })
                    .collect())
            }
            MonitorBackend::Unsupported => {
                anyhow::bail!("no multi-monitor extension available")
            }
        }
    }

    /// Client area of `window` in root coordinates
    fn client_area(&self, window: Window) -> Result<Rect> {
        let geom = self.conn.get_geometry(window)?.reply()?;
        let origin = self
            .conn
            .translate_coordinates(window, self.root, 0, 0)?
            .reply()?;
        Ok(Rect::from_origin_size(
            origin.dst_x as i32,
            origin.dst_y as i32,
            geom.width as u32,
            geom.height as u32,
        ))
    }

    /// Outer rectangle of the top-level ancestor of `window`, border included
    fn frame_rect(&self, window: Window) -> Result<Rect> {
        let mut top_level = window;
        loop {
            let tree = self.conn.query_tree(top_level)?.reply()?;
            if tree.parent == self.root || tree.parent == x11rb::NONE {
                break;
            }
            top_level = tree.parent;
        }

        let geom = self.conn.get_geometry(top_level)?.reply()?;
        let border = 2 * geom.border_width as u32;
        Ok(Rect::from_origin_size(
            geom.x as i32,
            geom.y as i32,
            geom.width as u32 + border,
            geom.height as u32 + border,
        ))
    }
}

impl RegionSource for X11RegionSource {
    type Window = Window;

    fn window_geometry(&self, window: Window) -> Result<WindowGeometry> {
        let geom = self
            .conn
            .get_geometry(window)?
            .reply()
            .with_context(|| format!("Failed to get geometry of window 0x{:x}", window))?;
        let client = Rect::new(0, 0, geom.width as i32, geom.height as i32);
        let frame = self.frame_rect(window)?;
        Ok(WindowGeometry {
            window: frame,
            client,
        })
    }

    fn query_regions(&self, window: Option<Window>, capacity: usize) -> RegionQuery {
        let regions = self.monitors().and_then(|monitors| {
            let area = window.map(|w| self.client_area(w)).transpose()?;
            Ok(clip_to_monitors(&monitors, area))
        });

        match regions {
            Ok(regions) => answer_query(regions, capacity),
            Err(e) => {
                log::debug!("Region query failed: {:#}", e);
                RegionQuery::Failed
            }
        }
    }
}

/// Pick the best available monitor backend
fn resolve_backend(conn: &RustConnection) -> MonitorBackend {
    if randr_supports_monitors(conn).unwrap_or(false) {
        return MonitorBackend::RandR;
    }
    if xinerama_active(conn).unwrap_or(false) {
        return MonitorBackend::Xinerama;
    }
    log::warn!("Neither RandR 1.5 nor Xinerama available, falling back to the client area");
    MonitorBackend::Unsupported
}

fn randr_supports_monitors(conn: &RustConnection) -> Result<bool> {
    if conn.extension_information(randr::X11_EXTENSION_NAME)?.is_none() {
        return Ok(false);
    }
    let version = randr::query_version(conn, 1, 5)?.reply()?;
    Ok((version.major_version, version.minor_version) >= (1, 5))
}

fn xinerama_active(conn: &RustConnection) -> Result<bool> {
    if conn.extension_information(xinerama::X11_EXTENSION_NAME)?.is_none() {
        return Ok(false);
    }
    Ok(xinerama::is_active(conn)?.reply()?.state != 0)
}
