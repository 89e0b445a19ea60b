//! Map Session - event loop glue between the host map and the controller
//!
//! The host pushes `MapEvent`s; `drain` handles them strictly in arrival
//! order on the caller's thread and forwards the resulting commands to the
//! `MapHost` and `NavigationBridge`. With zoom coalescing on, a run of
//! queued zoom-end events collapses to its last element (trailing edge).

use crate::clustering::ClusterId;
use crate::data::{RecordId, RecordSet};
use crate::error::MapError;
use crate::markers::{DetailPopup, MarkerId, RenderMarker};
use crate::utils::config::MapConfig;
use crate::utils::geometry::LatLon;
use crate::viewport::{HostCommand, ViewportController};
use std::collections::VecDeque;

/// Input from the host map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    ZoomEnd(f64),
    MoveEnd(LatLon),
    BackgroundClick,
    MarkerClick(MarkerId),
    /// Entry inside a cluster popup
    ClusterMemberClick(RecordId),
    PopupClick,
    PanFinished,
}

/// Rendering substrate consumed by the session
pub trait MapHost {
    fn place_marker(&mut self, marker: &RenderMarker);
    fn update_marker(&mut self, marker: &RenderMarker);
    fn remove_marker(&mut self, id: &MarkerId);
    fn pan_to(&mut self, target: LatLon, duration_secs: f64);
    fn fly_to(&mut self, target: LatLon, zoom: f64, duration_secs: f64);
    fn open_popup(&mut self, popup: &DetailPopup);
    fn close_popup(&mut self);

    /// Scroll the list entry tied to `id` into view, if the page has one
    fn scroll_into_view(&mut self, _id: &RecordId) {}
}

/// Turns a selected record into a detail view; only the id crosses over
pub trait NavigationBridge {
    fn navigate(&mut self, record_id: &RecordId);
}

/// Route commands to their receivers, in order
pub fn dispatch<H, N>(commands: Vec<HostCommand>, host: &mut H, bridge: &mut N)
where
    H: MapHost + ?Sized,
    N: NavigationBridge + ?Sized,
{
    for command in commands {
        match command {
            HostCommand::PlaceMarker(marker) => host.place_marker(&marker),
            HostCommand::UpdateMarker(marker) => host.update_marker(&marker),
            HostCommand::RemoveMarker(id) => host.remove_marker(&id),
            HostCommand::PanTo { target, duration_secs } => host.pan_to(target, duration_secs),
            HostCommand::FlyTo { target, zoom, duration_secs } => host.fly_to(target, zoom, duration_secs),
            HostCommand::OpenPopup(popup) => host.open_popup(&popup),
            HostCommand::ClosePopup => host.close_popup(),
            HostCommand::ScrollListIntoView(id) => host.scroll_into_view(&id),
            HostCommand::Navigate(id) => bridge.navigate(&id),
        }
    }
}

pub struct MapSession<H: MapHost, N: NavigationBridge> {
    controller: ViewportController,
    host: H,
    bridge: N,
    queue: VecDeque<MapEvent>,
    coalesce_zoom: bool,
}

impl<H: MapHost, N: NavigationBridge> MapSession<H, N> {
    /// Create a session and render the first frame at the initial zoom
    pub fn new(records: RecordSet, config: MapConfig, host: H, bridge: N) -> Result<Self, MapError> {
        let coalesce_zoom = config.viewport.coalesce_zoom;
        let controller = ViewportController::new(records, config)?;

        let mut session = Self {
            controller,
            host,
            bridge,
            queue: VecDeque::new(),
            coalesce_zoom,
        };
        let commands = session.controller.refresh();
        dispatch(commands, &mut session.host, &mut session.bridge);

        tracing::info!(
            "Map session started: {} records, {} markers at zoom {}",
            session.controller.records().len(),
            session.controller.layer().len(),
            session.controller.state().zoom
        );
        Ok(session)
    }

    pub fn push(&mut self, event: MapEvent) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Handle every queued event; returns how many were handled
    ///
    /// Stops at the first contract violation, leaving later events queued.
    pub fn drain(&mut self) -> Result<usize, MapError> {
        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            if self.coalesce_zoom
                && matches!(event, MapEvent::ZoomEnd(_))
                && matches!(self.queue.front(), Some(MapEvent::ZoomEnd(_)))
            {
                tracing::debug!("Coalescing superseded {:?}", event);
                continue;
            }
            self.handle(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Handle one event immediately, bypassing the queue
    pub fn handle(&mut self, event: MapEvent) -> Result<(), MapError> {
        let commands = match event {
            MapEvent::ZoomEnd(zoom) => self.controller.zoom_changed(zoom)?,
            MapEvent::MoveEnd(center) => {
                self.controller.moved(center);
                Vec::new()
            }
            MapEvent::BackgroundClick => self.controller.clear_selection(),
            MapEvent::MarkerClick(id) => self.controller.marker_clicked(&id),
            MapEvent::ClusterMemberClick(id) => self.controller.select_marker(id.as_str()),
            MapEvent::PopupClick => self.controller.popup_clicked(),
            MapEvent::PanFinished => {
                self.controller.pan_finished();
                Vec::new()
            }
        };
        dispatch(commands, &mut self.host, &mut self.bridge);
        Ok(())
    }

    /// Convenience for hosts that deliver cluster clicks by id
    pub fn click_cluster(&mut self, id: &ClusterId) {
        let commands = self.controller.cluster_clicked(id);
        dispatch(commands, &mut self.host, &mut self.bridge);
    }

    /// Drop queued events and reset the viewport; the host is expected to
    /// discard its markers as well
    pub fn teardown(&mut self) {
        self.queue.clear();
        self.controller.reset();
        tracing::info!("Map session torn down");
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn bridge(&self) -> &N {
        &self.bridge
    }

    /// Take the host and bridge back, ending the session
    pub fn into_parts(self) -> (H, N) {
        (self.host, self.bridge)
    }
}
