//! # Integration Tests
//!
//! Cross-crate end-to-end scenarios.
//!
//! Covers:
//! - Contract snapshot checks
//! - Session lifecycle over a scripted transport
//! - Live scan -> CSV -> replay round trip

#[cfg(test)]
mod contract_tests {
    use contracts::{ConfigVersion, ScanBlueprint};

    #[test]
    fn test_default_blueprint_round_trips_through_toml() {
        let blueprint = ScanBlueprint::default();
        let text = config_loader::ConfigLoader::to_toml(&blueprint).unwrap();
        let parsed = config_loader::ConfigLoader::load_from_str(
            &text,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(parsed.version, ConfigVersion::V1);
        assert_eq!(parsed.sinks.len(), blueprint.sinks.len());
        assert_eq!(parsed.session.start_sentinel, "start");
        assert_eq!(parsed.session.end_sentinel, "done");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use approx::assert_relative_eq;
    use contracts::{
        CalibrationConfig, ContractError, OutputConfig, RawSample, ScanBlueprint, SinkConfig,
        SinkType, StorageMode,
    };
    use dispatcher::Dispatcher;
    use ingestion::{ReplayFile, ScriptedLineSource};
    use measurement::{to_cartesian, CalibrationCurve};
    use scan_engine::{run_session, ReplayProcessor, ScanSession, SessionEvent, SessionState};
    use tempfile::tempdir;

    fn blueprint_in(dir: &Path) -> ScanBlueprint {
        ScanBlueprint {
            output: OutputConfig {
                directory: dir.to_path_buf(),
                ..OutputConfig::default()
            },
            ..ScanBlueprint::default()
        }
    }

    /// Start sentinel, two samples, one corrupted line, end sentinel
    #[test]
    fn test_session_lifecycle_scenario() {
        let lines = [
            "noise-start-msg",
            "10,20,512",
            "30,40,256",
            "garbage",
            "finished-done-tag",
        ];
        let mut session = ScanSession::new(&ScanBlueprint::default());
        assert_eq!(session.state(), SessionState::Idle);

        let event = session.handle_line(lines[0]).unwrap();
        assert!(matches!(event, SessionEvent::Started));
        assert_eq!(session.state(), SessionState::Active);

        for line in &lines[1..3] {
            let event = session.handle_line(line).unwrap();
            assert!(matches!(event, SessionEvent::Stored(_)), "{line}: {event:?}");
        }

        let event = session.handle_line(lines[3]).unwrap();
        assert!(matches!(
            event,
            SessionEvent::Dropped(ContractError::MalformedMessage { .. })
        ));
        assert_eq!(session.state(), SessionState::Active);

        let event = session.handle_line(lines[4]).unwrap();
        assert!(matches!(event, SessionEvent::Finished));
        assert_eq!(session.state(), SessionState::Done);

        let scan = session.take_finished().unwrap();
        assert_eq!(scan.len(), 2);
        let samples: Vec<_> = scan.raw_samples().collect();
        assert_eq!(
            samples,
            vec![RawSample::new(10, 20, 512), RawSample::new(30, 40, 256)]
        );

        let stats = session.stats();
        assert_eq!(stats.lines, 5);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.total_dropped(), 1);
    }

    #[test]
    fn test_stored_points_match_measurement_math() {
        let blueprint = ScanBlueprint::default();
        let mut source = ScriptedLineSource::new(["start", "70,80,300", "done"]);
        let mut session = ScanSession::new(&blueprint);

        let scan = run_session(&mut source, &mut session).unwrap();
        let record = scan.records().next().unwrap();

        let distance = CalibrationCurve::new(blueprint.calibration)
            .calibrate(300)
            .unwrap();
        let expected = to_cartesian(70.0, 80.0, distance, &blueprint.transform);
        assert_relative_eq!(record.sample.distance, distance);
        assert_relative_eq!(record.point.x, expected.x);
        assert_relative_eq!(record.point.y, expected.y);
        assert_relative_eq!(record.point.z, expected.z);
    }

    #[test]
    fn test_power_law_singularity_never_reaches_cloud() {
        let mut blueprint = ScanBlueprint::default();
        blueprint.calibration = CalibrationConfig::power_law();
        let mut source = ScriptedLineSource::new(["start", "60,65,0", "60,66,350", "done"]);
        let mut session = ScanSession::new(&blueprint);

        let scan = run_session(&mut source, &mut session).unwrap();
        assert_eq!(scan.len(), 1);
        assert!(scan.points().all(|p| p.is_finite()));
        assert_eq!(
            session.stats().dropped.get("calibration_singularity"),
            Some(&1)
        );
    }

    #[test]
    fn test_live_scan_persists_and_replays() {
        let dir = tempdir().unwrap();
        let blueprint = blueprint_in(dir.path());
        let mut source = ScriptedLineSource::from_text(
            "boot\r\nstart\r\n60,65,400\r\n61,66,380\r\n62,67,360\r\ndone\r\n",
        );
        let mut session = ScanSession::new(&blueprint);
        let scan = run_session(&mut source, &mut session).unwrap();

        let mut dispatcher = Dispatcher::from_configs(&blueprint.sinks, &blueprint.output).unwrap();
        let report = dispatcher.dispatch(&scan);
        assert!(report.is_success());

        let saved = dir.path().join("sensor_reading_0.csv");
        assert!(report.written.contains(&saved));

        let replay = ReplayFile::load(&saved).unwrap();
        let original: Vec<_> = scan.raw_samples().collect();
        assert_eq!(replay.samples, original);

        let rebuilt = ReplayProcessor::new(&blueprint)
            .without_filter()
            .process(replay.samples);
        assert_eq!(rebuilt.len(), scan.len());
        for (a, b) in rebuilt.points().zip(scan.points()) {
            assert_relative_eq!(a.x, b.x);
            assert_relative_eq!(a.y, b.y);
            assert_relative_eq!(a.z, b.z);
        }
    }

    #[test]
    fn test_grid_scan_persists_every_cell() {
        let dir = tempdir().unwrap();
        let mut blueprint = blueprint_in(dir.path());
        blueprint.session.storage = StorageMode::Grid;
        blueprint.grid.num_points_theta = 2;
        blueprint.grid.num_points_phi = 3;
        blueprint.sinks = vec![SinkConfig::new("raw_csv", SinkType::Csv)];

        let mut source =
            ScriptedLineSource::new(["start", "30,45,400", "31,47,390", "99,45,1", "done"]);
        let mut session = ScanSession::new(&blueprint);
        let scan = run_session(&mut source, &mut session).unwrap();
        assert_eq!(scan.len(), 2);
        assert_eq!(
            session.stats().dropped.get("index_out_of_range"),
            Some(&1)
        );

        Dispatcher::from_configs(&blueprint.sinks, &blueprint.output)
            .unwrap()
            .dispatch(&scan);

        let content = fs::read_to_string(dir.path().join("sensor_reading_0.csv")).unwrap();
        assert_eq!(
            content,
            "theta,phi,raw_reading\n\
             30,45,400\n30,46,\n30,47,\n\
             31,45,\n31,46,\n31,47,390\n"
        );

        let replay = ReplayFile::load(&dir.path().join("sensor_reading_0.csv")).unwrap();
        assert_eq!(replay.samples.len(), 2);
        assert_eq!(replay.unset_rows, 4);
    }

    #[test]
    fn test_consecutive_scans_get_new_files() {
        let dir = tempdir().unwrap();
        let blueprint = blueprint_in(dir.path());
        let mut dispatcher = Dispatcher::from_configs(&blueprint.sinks, &blueprint.output).unwrap();

        for _ in 0..3 {
            let mut source = ScriptedLineSource::new(["start", "60,65,400", "done"]);
            let mut session = ScanSession::new(&blueprint);
            let scan = run_session(&mut source, &mut session).unwrap();
            dispatcher.dispatch(&scan);
        }

        for i in 0..3 {
            assert!(dir.path().join(format!("sensor_reading_{i}.csv")).exists());
            assert!(dir.path().join(format!("sensor_reading_{i}.svg")).exists());
        }
    }

    #[test]
    fn test_legacy_file_replay_with_filter() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("sensor_reading_3D.csv");
        // Raw 120 calibrates to roughly 87 cm, raw 700 to roughly 5 cm
        fs::write(&legacy, "[[60, 65, 120], [60, 65, 700], [61, 66, 130]]").unwrap();

        let mut blueprint = blueprint_in(dir.path());
        blueprint.filter.min = 40.0;
        blueprint.filter.max = 100.0;

        let replay = ReplayFile::load(&legacy).unwrap();
        let mut processor = ReplayProcessor::new(&blueprint);
        let scan = processor.process(replay.samples);

        assert_eq!(scan.len(), 2);
        assert_eq!(processor.stats().filtered, 1);
        assert!(scan.points().all(|p| (40.0..=100.0).contains(&p.y)));
    }

    #[test]
    fn test_missing_replay_file_reports_path() {
        let err = ReplayFile::load(Path::new("./data/never_saved.csv")).unwrap_err();
        assert_eq!(err.to_string(), "no file found at ./data/never_saved.csv");
        assert!(!err.is_recoverable());
    }
}
