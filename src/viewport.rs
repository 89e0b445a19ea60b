//! Viewport Controller - owns the only mutable map state
//!
//! Phases:
//!   Idle         no selection
//!   PanAnimating a record was selected and the host is panning to it
//!   Selected     pan finished, selection still shown
//!
//! Every zoom change recomputes the partition from scratch before anything is
//! rendered. Each recomputation carries a `RecomputeTicket`; a ticket older
//! than the last committed one is rejected, so a late result can never
//! replace a newer frame.

use crate::clustering::{cluster_with, ClusterId};
use crate::data::{RecordId, RecordSet};
use crate::error::MapError;
use crate::markers::{build_markers, record_icon, DetailPopup, MarkerId, MarkerKind, MarkerLayer, RenderMarker};
use crate::utils::config::{IconConfig, MapConfig};
use crate::utils::geometry::LatLon;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewPhase {
    Idle,
    PanAnimating,
    Selected,
}

/// Where a programmatic pan is heading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanTarget {
    pub position: LatLon,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub center: LatLon,
    pub selected: Option<RecordId>,
    pub pan_target: Option<PanTarget>,
    pub phase: ViewPhase,
}

impl ViewportState {
    fn initial(config: &MapConfig) -> Self {
        Self {
            zoom: config.viewport.initial_zoom,
            center: config.viewport.initial_center,
            selected: None,
            pan_target: None,
            phase: ViewPhase::Idle,
        }
    }
}

/// Effects for the host map and the navigation bridge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HostCommand {
    PlaceMarker(RenderMarker),
    UpdateMarker(RenderMarker),
    RemoveMarker(MarkerId),
    PanTo { target: LatLon, duration_secs: f64 },
    FlyTo { target: LatLon, zoom: f64, duration_secs: f64 },
    OpenPopup(DetailPopup),
    ClosePopup,
    /// Bring the list entry for this record into view
    ScrollListIntoView(RecordId),
    /// Open the detail view for this record
    Navigate(RecordId),
}

/// Claim on a recomputation at a given zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecomputeTicket {
    generation: u64,
    zoom: f64,
}

impl RecomputeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }
}

pub struct ViewportController {
    records: RecordSet,
    config: MapConfig,
    state: ViewportState,
    layer: MarkerLayer,
    issued_generation: u64,
    committed_generation: u64,
}

impl ViewportController {
    pub fn new(records: RecordSet, config: MapConfig) -> Result<Self, MapError> {
        let zoom = config.viewport.initial_zoom;
        if !zoom.is_finite() {
            return Err(MapError::NonFiniteZoom(zoom));
        }

        Ok(Self {
            state: ViewportState::initial(&config),
            records,
            config,
            layer: MarkerLayer::new(),
            issued_generation: 0,
            committed_generation: 0,
        })
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Markers the host is currently showing
    pub fn layer(&self) -> &MarkerLayer {
        &self.layer
    }

    /// Re-render at the current zoom (first frame, or after teardown)
    pub fn refresh(&mut self) -> Vec<HostCommand> {
        let ticket = self.issue_ticket(self.state.zoom);
        let markers = self.compute_markers(ticket);
        self.commit(ticket, markers).unwrap_or_default()
    }

    /// The host finished a zoom; recompute and diff
    ///
    /// Selection is left alone.
    pub fn zoom_changed(&mut self, zoom: f64) -> Result<Vec<HostCommand>, MapError> {
        let ticket = self.begin_recompute(zoom)?;
        let markers = self.compute_markers(ticket);
        Ok(self.commit(ticket, markers).unwrap_or_default())
    }

    /// Reserve a recomputation; later tickets supersede earlier ones
    pub fn begin_recompute(&mut self, zoom: f64) -> Result<RecomputeTicket, MapError> {
        if !zoom.is_finite() {
            return Err(MapError::NonFiniteZoom(zoom));
        }
        Ok(self.issue_ticket(zoom))
    }

    fn issue_ticket(&mut self, zoom: f64) -> RecomputeTicket {
        self.issued_generation += 1;
        RecomputeTicket {
            generation: self.issued_generation,
            zoom,
        }
    }

    /// Cluster the records at the ticket's zoom and build markers
    pub fn compute_markers(&self, ticket: RecomputeTicket) -> Vec<RenderMarker> {
        let start = Instant::now();
        let mut partition = cluster_with(self.records.records(), ticket.zoom, &self.config.clustering);
        partition.mark_selected(self.state.selected.as_ref().map(RecordId::as_str));
        let markers = build_markers(&partition, &self.config);

        tracing::debug!(
            "Recompute #{} at zoom {:.2}: {} markers ({} clusters) in {:?}",
            ticket.generation,
            ticket.zoom,
            markers.len(),
            partition.clusters().len(),
            start.elapsed()
        );
        markers
    }

    /// Install markers computed for `ticket`
    ///
    /// Returns `None` when a newer ticket has already been committed.
    pub fn commit(&mut self, ticket: RecomputeTicket, mut markers: Vec<RenderMarker>) -> Option<Vec<HostCommand>> {
        if ticket.generation <= self.committed_generation {
            tracing::warn!(
                "Dropping stale recompute #{} (zoom {:.2}); #{} already committed",
                ticket.generation,
                ticket.zoom,
                self.committed_generation
            );
            return None;
        }
        self.committed_generation = ticket.generation;
        self.state.zoom = ticket.zoom;

        // Selection may have moved since the markers were built
        apply_selection(&mut markers, self.state.selected.as_ref(), &self.config.icons);
        Some(self.render(markers))
    }

    fn render(&mut self, markers: Vec<RenderMarker>) -> Vec<HostCommand> {
        let diff = self.layer.apply(markers);
        let mut commands = Vec::with_capacity(diff.removed.len() + diff.added.len() + diff.updated.len());
        commands.extend(diff.removed.into_iter().map(HostCommand::RemoveMarker));
        commands.extend(diff.added.into_iter().map(HostCommand::PlaceMarker));
        commands.extend(diff.updated.into_iter().map(HostCommand::UpdateMarker));
        commands
    }

    /// Restyle the current frame after a selection change, without reclustering
    fn restyle(&mut self) -> Vec<HostCommand> {
        let mut markers: Vec<RenderMarker> = self.layer.markers().cloned().collect();
        apply_selection(&mut markers, self.state.selected.as_ref(), &self.config.icons);
        self.render(markers)
    }

    /// Host reported a finished pan/drag
    pub fn moved(&mut self, center: LatLon) {
        self.state.center = center;
    }

    /// Select a record and pan to it
    ///
    /// Unknown ids leave the state untouched.
    pub fn select_marker(&mut self, id: &str) -> Vec<HostCommand> {
        let Some(record) = self.records.get(id) else {
            tracing::debug!("Ignoring selection of unknown record {}", id);
            return Vec::new();
        };

        let position = record.position();
        let popup = DetailPopup::for_record(record, &self.config.popup);
        let record_id = record.id.clone();

        self.state.pan_target = Some(PanTarget {
            position,
            label: record.name.clone(),
        });
        self.state.selected = Some(record_id.clone());
        self.state.phase = ViewPhase::PanAnimating;

        let mut commands = self.restyle();
        commands.push(HostCommand::PanTo {
            target: position,
            duration_secs: self.config.animation.pan_duration_secs,
        });
        commands.push(HostCommand::OpenPopup(popup));
        commands.push(HostCommand::ScrollListIntoView(record_id));
        commands
    }

    /// Animation callback from the host
    pub fn pan_finished(&mut self) {
        if self.state.phase != ViewPhase::PanAnimating {
            return;
        }
        if let Some(target) = &self.state.pan_target {
            self.state.center = target.position;
        }
        self.state.phase = ViewPhase::Selected;
    }

    /// Background click: drop selection and pan target from any phase
    pub fn clear_selection(&mut self) -> Vec<HostCommand> {
        let had_selection = self.state.selected.is_some();
        self.state.selected = None;
        self.state.pan_target = None;
        self.state.phase = ViewPhase::Idle;

        if !had_selection {
            return Vec::new();
        }
        let mut commands = self.restyle();
        commands.push(HostCommand::ClosePopup);
        commands
    }

    /// Zoom toward a rendered cluster
    ///
    /// Only issues the fly command; the recompute happens when the host
    /// reports the resulting zoom.
    pub fn cluster_clicked(&mut self, id: &ClusterId) -> Vec<HostCommand> {
        let Some(marker) = self.layer.get(&MarkerId::Cluster(id.clone())) else {
            tracing::debug!("Ignoring click on cluster {} that is not rendered", id);
            return Vec::new();
        };

        vec![HostCommand::FlyTo {
            target: marker.position,
            zoom: self.state.zoom + self.config.animation.cluster_zoom_step,
            duration_secs: self.config.animation.fly_duration_secs,
        }]
    }

    pub fn marker_clicked(&mut self, id: &MarkerId) -> Vec<HostCommand> {
        match id {
            MarkerId::Cluster(cluster_id) => self.cluster_clicked(cluster_id),
            MarkerId::Record(record_id) => self.select_marker(record_id.as_str()),
        }
    }

    /// Click on the selected record's popup hands off to detail navigation
    pub fn popup_clicked(&self) -> Vec<HostCommand> {
        match &self.state.selected {
            Some(id) => vec![HostCommand::Navigate(id.clone())],
            None => Vec::new(),
        }
    }

    /// Map view torn down: back to the initial state with nothing rendered
    ///
    /// Generations keep counting so tickets from before the reset stay stale.
    pub fn reset(&mut self) {
        self.state = ViewportState::initial(&self.config);
        self.layer.clear();
        self.committed_generation = self.issued_generation;
    }
}

/// Point record markers' selection flag and icon at `selected`
fn apply_selection(markers: &mut [RenderMarker], selected: Option<&RecordId>, icons: &IconConfig) {
    for marker in markers.iter_mut() {
        let is_selected = match &marker.id {
            MarkerId::Record(id) => Some(id) == selected,
            MarkerId::Cluster(_) => continue,
        };
        if let MarkerKind::Record { selected, icon } = &mut marker.kind {
            if *selected != is_selected {
                *selected = is_selected;
                *icon = record_icon(&icon.label, is_selected, icons);
            }
        }
    }
}
