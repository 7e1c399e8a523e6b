//! Scan session state machine
//!
//! `Idle --start--> Active --end--> Done`. Done is terminal.

use contracts::{
    ContractError, FinishedScan, GridConfig, PlotMode, ScanBlueprint, ScanRecord, StorageMode,
};
use ingestion::{codec, ControlMessage, SentinelMatcher};
use measurement::Measurement;
use observability::{record_cloud_points, ScanMetricsAggregator};
use point_cloud::PointCloud;
use tracing::{debug, error, info, trace, warn};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the start sentinel
    Idle,
    /// Collecting samples into the cloud
    Active,
    /// Cloud finalized, no more input accepted
    Done,
}

/// Outcome of feeding one line to the session
#[derive(Debug)]
pub enum SessionEvent {
    /// Start sentinel seen, fresh cloud allocated
    Started,
    /// Data line stored
    Stored(ScanRecord),
    /// Data line dropped; the session keeps listening
    Dropped(ContractError),
    /// Line had no effect in the current state
    Ignored,
    /// End sentinel seen, cloud finalized
    Finished,
}

/// One scan from start sentinel to end sentinel
#[derive(Debug)]
pub struct ScanSession {
    state: SessionState,
    sentinels: SentinelMatcher,
    measurement: Measurement,
    storage: StorageMode,
    plot_mode: PlotMode,
    grid: GridConfig,
    fatal_out_of_range: bool,
    cloud: Option<PointCloud>,
    finished: Option<FinishedScan>,
    stats: ScanMetricsAggregator,
}

impl ScanSession {
    pub fn new(blueprint: &ScanBlueprint) -> Self {
        let session = &blueprint.session;
        let mut this = Self {
            state: SessionState::Idle,
            sentinels: SentinelMatcher::from_config(session),
            measurement: Measurement::from_blueprint(blueprint),
            storage: session.storage,
            plot_mode: session.plot_mode,
            grid: blueprint.grid.clone(),
            fatal_out_of_range: session.fatal_out_of_range,
            cloud: None,
            finished: None,
            stats: ScanMetricsAggregator::new(),
        };
        if session.implicit_start {
            this.start();
        }
        this
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    pub fn stats(&self) -> &ScanMetricsAggregator {
        &self.stats
    }

    /// Cloud under construction (Active only)
    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    /// Take the finalized scan, once
    pub fn take_finished(&mut self) -> Option<FinishedScan> {
        self.finished.take()
    }

    /// Feed one line from the transport.
    ///
    /// Per-message failures come back as `SessionEvent::Dropped`. The only
    /// `Err` is an out-of-range grid index with `fatal_out_of_range` set.
    pub fn handle_line(&mut self, line: &str) -> Result<SessionEvent, ContractError> {
        self.stats.record_line();
        debug!(line, state = ?self.state, "Line received");

        if self.state == SessionState::Done {
            warn!(line, "Line received after scan end, ignoring");
            self.stats.record_ignored();
            return Ok(SessionEvent::Ignored);
        }

        match (self.sentinels.classify(line), self.state) {
            (Some(ControlMessage::ScanStart), SessionState::Idle) => {
                self.start();
                Ok(SessionEvent::Started)
            }
            (Some(ControlMessage::ScanStart), _) => {
                warn!(line, "Start sentinel while scan active, ignoring");
                self.stats.record_ignored();
                Ok(SessionEvent::Ignored)
            }
            (Some(ControlMessage::ScanEnd), SessionState::Active) => {
                self.finish();
                Ok(SessionEvent::Finished)
            }
            (Some(ControlMessage::ScanEnd), _) => {
                debug!(line, "End sentinel before scan start, ignoring");
                self.stats.record_ignored();
                Ok(SessionEvent::Ignored)
            }
            (None, SessionState::Active) => self.ingest(line),
            (None, _) => {
                trace!(line, "Data before scan start, ignoring");
                self.stats.record_ignored();
                Ok(SessionEvent::Ignored)
            }
        }
    }

    fn start(&mut self) {
        self.cloud = Some(PointCloud::new(self.storage, &self.grid));
        self.state = SessionState::Active;
        info!(storage = ?self.storage, "Scan started");
    }

    fn finish(&mut self) {
        let cloud = self
            .cloud
            .take()
            .unwrap_or_else(|| PointCloud::new(self.storage, &self.grid));
        let scan = cloud.finalize(self.plot_mode);
        let points = scan.len();

        self.stats.record_completed(points);
        self.finished = Some(scan);
        self.state = SessionState::Done;
        info!(points, "Scan finished");
    }

    fn is_fatal(&self, e: &ContractError) -> bool {
        !e.is_recoverable()
            || (self.fatal_out_of_range && matches!(e, ContractError::IndexOutOfRange { .. }))
    }

    fn ingest(&mut self, line: &str) -> Result<SessionEvent, ContractError> {
        let Some(cloud) = self.cloud.as_mut() else {
            return Ok(SessionEvent::Ignored);
        };

        let stored = codec::parse(line)
            .and_then(|raw| self.measurement.measure(raw))
            .and_then(|record| cloud.insert(record).map(|()| record));

        match stored {
            Ok(record) => {
                let raw = record.raw();
                debug!(
                    theta = raw.theta,
                    phi = raw.phi,
                    raw_reading = raw.raw_reading,
                    distance = record.sample.distance,
                    x = record.point.x,
                    y = record.point.y,
                    z = record.point.z,
                    "Sample stored"
                );
                self.stats.record_accepted(record.sample.distance);
                record_cloud_points(cloud.len());
                Ok(SessionEvent::Stored(record))
            }
            Err(e) if self.is_fatal(&e) => {
                error!(error = %e, kind = e.kind(), "Sample aborts the session");
                self.stats.record_dropped(e.kind());
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Sample dropped");
                self.stats.record_dropped(e.kind());
                Ok(SessionEvent::Dropped(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::CalibrationConfig;

    fn blueprint() -> ScanBlueprint {
        ScanBlueprint::default()
    }

    #[test]
    fn test_starts_idle() {
        let session = ScanSession::new(&blueprint());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.cloud().is_none());
    }

    #[test]
    fn test_implicit_start() {
        let mut bp = blueprint();
        bp.session.implicit_start = true;
        let mut session = ScanSession::new(&bp);
        assert_eq!(session.state(), SessionState::Active);

        let event = session.handle_line("60,65,400").unwrap();
        assert!(matches!(event, SessionEvent::Stored(_)));
    }

    #[test]
    fn test_data_before_start_ignored() {
        let mut session = ScanSession::new(&blueprint());
        let event = session.handle_line("60,65,400").unwrap();
        assert!(matches!(event, SessionEvent::Ignored));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.stats().ignored, 1);
    }

    #[test]
    fn test_end_before_start_ignored() {
        let mut session = ScanSession::new(&blueprint());
        assert!(matches!(
            session.handle_line("done").unwrap(),
            SessionEvent::Ignored
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_substring_sentinels() {
        let mut session = ScanSession::new(&blueprint());
        assert!(matches!(
            session.handle_line("##start##").unwrap(),
            SessionEvent::Started
        ));
        assert!(matches!(
            session.handle_line("scan-done\r").unwrap(),
            SessionEvent::Finished
        ));
        assert!(session.is_done());
    }

    #[test]
    fn test_repeated_start_keeps_cloud() {
        let mut session = ScanSession::new(&blueprint());
        session.handle_line("start").unwrap();
        session.handle_line("60,65,400").unwrap();
        assert!(matches!(
            session.handle_line("start").unwrap(),
            SessionEvent::Ignored
        ));
        assert_eq!(session.cloud().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_malformed_line_dropped() {
        let mut session = ScanSession::new(&blueprint());
        session.handle_line("start").unwrap();

        match session.handle_line("1,2").unwrap() {
            SessionEvent::Dropped(ContractError::MalformedMessage { .. }) => {}
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.stats().dropped.get("malformed_message"), Some(&1));
    }

    #[test]
    fn test_singularity_dropped() {
        let mut bp = blueprint();
        bp.calibration = CalibrationConfig::power_law();
        let mut session = ScanSession::new(&bp);
        session.handle_line("start").unwrap();

        let event = session.handle_line("60,65,0").unwrap();
        assert!(matches!(
            event,
            SessionEvent::Dropped(ContractError::CalibrationSingularity { raw_reading: 0 })
        ));
        assert_eq!(session.cloud().map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_grid_out_of_range_recoverable_by_default() {
        let mut bp = blueprint();
        bp.session.storage = StorageMode::Grid;
        let mut session = ScanSession::new(&bp);
        session.handle_line("start").unwrap();

        let event = session.handle_line("0,0,400").unwrap();
        assert!(matches!(
            event,
            SessionEvent::Dropped(ContractError::IndexOutOfRange { .. })
        ));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn test_grid_out_of_range_fatal_when_configured() {
        let mut bp = blueprint();
        bp.session.storage = StorageMode::Grid;
        bp.session.fatal_out_of_range = true;
        let mut session = ScanSession::new(&bp);
        session.handle_line("start").unwrap();

        let err = session.handle_line("0,0,400").unwrap_err();
        assert!(matches!(err, ContractError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_fatal_grid_mode_still_drops_malformed_lines() {
        let mut bp = blueprint();
        bp.session.storage = StorageMode::Grid;
        bp.session.fatal_out_of_range = true;
        let mut session = ScanSession::new(&bp);
        session.handle_line("start").unwrap();

        let event = session.handle_line("60,sixty-five,400").unwrap();
        assert!(matches!(
            event,
            SessionEvent::Dropped(ContractError::MalformedMessage { .. })
        ));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn test_lines_after_done_ignored() {
        let mut session = ScanSession::new(&blueprint());
        session.handle_line("start").unwrap();
        session.handle_line("60,65,400").unwrap();
        session.handle_line("done").unwrap();

        assert!(matches!(
            session.handle_line("61,65,400").unwrap(),
            SessionEvent::Ignored
        ));
        assert!(matches!(
            session.handle_line("start").unwrap(),
            SessionEvent::Ignored
        ));
        let scan = session.take_finished().unwrap();
        assert_eq!(scan.len(), 1);
        assert!(session.take_finished().is_none());
    }

    #[test]
    fn test_empty_scan_finalizes() {
        let mut session = ScanSession::new(&blueprint());
        session.handle_line("start").unwrap();
        session.handle_line("done").unwrap();
        let scan = session.take_finished().unwrap();
        assert!(scan.is_empty());
        assert_eq!(session.stats().scans_completed, 1);
    }
}
