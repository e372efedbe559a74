//! # Integration Tests
//!
//! 跨 crate 集成测试。
//!
//! 负责：
//! - 配置加载 -> 修复引擎 -> 指标聚合的端到端流程
//! - 修复步骤的场景测试
//! - 标签单调性 / 幂等性 / 补全完整性等性质

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod fixtures {
    use contracts::{CoordinateSystem, Observation, TimeUnit, Track};

    pub fn track(times: &[Option<f64>]) -> Track {
        let observations = times
            .iter()
            .enumerate()
            .map(|(i, t)| Observation::new("veh-1", *t, Some(i as f64), Some(2.0 * i as f64)))
            .collect();
        Track::new(CoordinateSystem::Planar, TimeUnit::Seconds, observations).unwrap()
    }

    /// Ten samples every 10 s; sample 4 carries a corrupted clock value and sample 7
    /// lost its x coordinate.
    pub fn defective_track() -> Track {
        let mut times: Vec<Option<f64>> = (0..10).map(|i| Some(10.0 * i as f64)).collect();
        times[4] = Some(500.0);
        let mut t = track(&times);
        t.observations_mut()[7].x = None;
        t
    }

    /// Smooth path with a little deterministic noise, one sample per second.
    pub fn wavy_track(n: usize) -> Track {
        let observations = (0..n)
            .map(|i| {
                let t = i as f64;
                let nx = ((i * 7919) % 101) as f64 / 101.0 - 0.5;
                let ny = ((i * 104729) % 97) as f64 / 97.0 - 0.5;
                let x = 0.8 * t + 2.0 * (t / 15.0).sin() + nx * 0.4;
                let y = 0.5 * t + (t / 10.0).cos() + ny * 0.3;
                Observation::new("veh-1", Some(t), Some(x), Some(y))
            })
            .collect();
        Track::new(CoordinateSystem::Planar, TimeUnit::Seconds, observations).unwrap()
    }

    pub const PIPELINE_TOML: &str = r#"
version = "V1"

[[passes]]
pass = "duplicate_timestamps"

[[passes]]
pass = "timestamp_sequence"

[[passes]]
pass = "missing_timestamps"

[[passes]]
pass = "missing_locations"

[[passes]]
pass = "complete_observations"
end = 120.0

[batch]
max_concurrent_tracks = 2
"#;
}

#[cfg(test)]
mod scenario_tests {
    use super::fixtures::*;
    use contracts::{
        CompletionConfig, DuplicateTimestampConfig, ErrorLabel, LocationSequenceConfig,
    };
    use repair_engine::{
        complete_missing_observations, correct_location_sequence, resolve_duplicate_timestamps,
    };

    #[test]
    fn test_duplicate_moved_to_free_slot() {
        let mut t = track(&[Some(0.0), Some(1.0), Some(1.0), Some(3.0)]);
        let report = resolve_duplicate_timestamps(&mut t, &DuplicateTimestampConfig::default())
            .unwrap();

        assert_eq!(report.corrected, 1);
        assert_eq!(t.observations()[2].time, Some(2.0));
        assert_eq!(t.observations()[2].error.to_string(), "timeDUP");
    }

    #[test]
    fn test_duplicate_with_taken_slot_nulled() {
        let mut t = track(&[Some(0.0), Some(1.0), Some(1.0), Some(2.0)]);
        let report = resolve_duplicate_timestamps(&mut t, &DuplicateTimestampConfig::default())
            .unwrap();

        assert_eq!(report.unresolved, 1);
        assert_eq!(t.observations()[2].time, None);
        assert_eq!(t.observations()[2].error.to_string(), "OK");
    }

    #[test]
    fn test_completion_end_scenarios() {
        let times = [Some(0.0), Some(10.0), Some(20.0), Some(30.0)];

        let mut complete = track(&times);
        let config = CompletionConfig {
            begin: Some(0.0),
            end: Some(30.0),
            ..Default::default()
        };
        let report = complete_missing_observations(&mut complete, &config).unwrap();
        assert_eq!(report.inserted, 0);
        assert_eq!(complete.len(), 4);

        let mut extended = track(&times);
        let config = CompletionConfig {
            begin: Some(0.0),
            end: Some(50.0),
            ..Default::default()
        };
        let report = complete_missing_observations(&mut extended, &config).unwrap();
        assert_eq!(report.inserted, 2);

        let tail = &extended.observations()[4..];
        assert_eq!(tail[0].time, Some(40.0));
        assert_eq!(tail[1].time, Some(50.0));
        assert!(tail.iter().all(|o| o.error.to_string() == "MISSING"));
    }

    #[test]
    fn test_location_spike_replaced() {
        let mut t = wavy_track(100);
        let obs = &mut t.observations_mut()[50];
        obs.x = obs.x.map(|x| x + 80.0);

        let report = correct_location_sequence(&mut t, &LocationSequenceConfig::default())
            .unwrap();
        assert!(report.flagged >= 1);

        let o = t.observations();
        assert!(o[50].error.contains(ErrorLabel::LocSeq));
        let between = (o[49].x.unwrap() + o[51].x.unwrap()) / 2.0;
        let got = o[50].x.unwrap();
        assert!((got - between).abs() < 0.5, "corrected x {got}, neighbours give {between}");
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::fixtures::*;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ErrorLabel, MissingLocationConfig, MissingTimestampConfig, PassKind};
    use observability::RepairMetricsAggregator;
    use repair_engine::{interpolate_missing_locations, interpolate_missing_timestamps, RepairEngine};

    fn engine() -> RepairEngine {
        let blueprint = ConfigLoader::load_from_str(PIPELINE_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(blueprint.batch.max_concurrent_tracks, 2);
        RepairEngine::from_blueprint(&blueprint)
    }

    #[test]
    fn test_full_pipeline_from_config() {
        let mut t = defective_track();
        let report = engine().run(&mut t).unwrap();

        let kinds: Vec<PassKind> = report.passes.iter().map(|p| p.pass).collect();
        assert_eq!(
            kinds,
            vec![
                PassKind::DuplicateTimestamps,
                PassKind::TimestampSequence,
                PassKind::MissingTimestamps,
                PassKind::MissingLocations,
                PassKind::CompleteObservations,
            ]
        );

        let o = t.observations();
        assert_eq!(o[4].time, Some(40.0));
        assert_eq!(o[4].error.to_string(), "timeSEQ");

        let x = o[7].x.unwrap();
        assert!((x - 7.0).abs() < 1e-9, "interpolated x {x}");
        assert_eq!(o[7].error.to_string(), "locNA");

        assert_eq!(report.observations_in, 10);
        assert_eq!(report.observations_out, 13);
        let completion = &report.passes[4];
        assert_eq!((completion.inserted, completion.unresolved), (3, 3));
        assert!(o[10..]
            .iter()
            .all(|r| r.error.to_string() == "MISSING" && !r.has_location()));

        let mut aggregator = RepairMetricsAggregator::new();
        aggregator.update(&report);
        let summary = aggregator.summary();
        assert_eq!(summary.tracks_repaired, 1);
        assert_eq!(summary.passes[&PassKind::TimestampSequence].corrected, 1);
        assert_eq!(summary.passes[&PassKind::CompleteObservations].inserted, 3);
    }

    #[test]
    fn test_regrid_is_complete_progression() {
        let mut t = defective_track();
        engine().run(&mut t).unwrap();

        let times: Vec<Option<f64>> = t.times();
        let expected: Vec<Option<f64>> = (0..=12).map(|i| Some(10.0 * i as f64)).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn test_second_run_is_quiet() {
        let engine = engine();
        let mut t = defective_track();
        engine.run(&mut t).unwrap();
        let before = t.clone();

        let again = engine.run(&mut t).unwrap();
        for pass in &again.passes {
            assert_eq!(pass.flagged, 0, "{} flagged on rerun", pass.pass);
        }
        assert_eq!(again.passes[4].inserted, 0);
        assert_eq!(t.times(), before.times());
        assert_eq!(t, before);

        // gaps at the track ends stay unresolved but are only flagged once
        let mut edges = track(&[None, Some(1.0), Some(2.0), Some(3.0)]);
        edges.observations_mut()[3].clear_location();
        let time_config = MissingTimestampConfig::default();
        let location_config = MissingLocationConfig::default();

        let first = interpolate_missing_timestamps(&mut edges, &time_config).unwrap();
        assert_eq!((first.flagged, first.unresolved), (1, 1));
        let first = interpolate_missing_locations(&mut edges, &location_config).unwrap();
        assert_eq!((first.flagged, first.unresolved), (1, 1));

        let second = interpolate_missing_timestamps(&mut edges, &time_config).unwrap();
        assert_eq!((second.flagged, second.unresolved), (0, 1));
        let second = interpolate_missing_locations(&mut edges, &location_config).unwrap();
        assert_eq!((second.flagged, second.unresolved), (0, 1));

        assert_eq!(edges.observations()[0].error.to_string(), "timeNA");
        assert_eq!(edges.observations()[3].error.to_string(), "locNA");
    }

    #[test]
    fn test_labels_never_removed_by_later_passes() {
        let engine = engine();
        let mut t = defective_track();
        // label carried over from an earlier run
        t.observations_mut()[2].error.merge(ErrorLabel::LocSeq);

        for config in engine.passes() {
            let before: Vec<_> = t.observations().iter().map(|o| o.error.clone()).collect();
            repair_engine::apply_pass(config, &mut t).unwrap();

            for (i, labels) in before.iter().enumerate() {
                let after = &t.observations()[i].error;
                assert!(
                    labels.iter().all(|l| after.contains(l)),
                    "{} removed a label at {i}: {labels} -> {after}",
                    config.kind()
                );
            }
        }
        assert!(t.observations()[2].error.contains(ErrorLabel::LocSeq));
    }
}

#[cfg(test)]
mod property_tests {
    use super::fixtures::*;
    use contracts::{DuplicateTimestampConfig, ErrorLabel, MissingLocationConfig};
    use repair_engine::{interpolate_missing_locations, resolve_duplicate_timestamps};
    use std::collections::HashSet;

    #[test]
    fn test_existing_label_survives_unresolved_duplicate() {
        let mut t = track(&[Some(0.0), Some(1.0), Some(1.0), Some(2.0)]);
        t.observations_mut()[2].error.merge(ErrorLabel::TimeDup);

        resolve_duplicate_timestamps(&mut t, &DuplicateTimestampConfig::default()).unwrap();
        assert_eq!(t.observations()[2].time, None);
        assert!(t.observations()[2].error.contains(ErrorLabel::TimeDup));
    }

    #[test]
    fn test_no_duplicates_after_resolution() {
        let mut t = track(&[
            Some(0.0),
            Some(5.0),
            Some(5.0),
            Some(5.0),
            Some(20.0),
            Some(25.0),
            Some(25.0),
            Some(35.0),
        ]);
        resolve_duplicate_timestamps(&mut t, &DuplicateTimestampConfig::default()).unwrap();

        let values = t.time_values();
        let distinct: HashSet<u64> = values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(distinct.len(), values.len(), "times {values:?}");

        let again =
            resolve_duplicate_timestamps(&mut t, &DuplicateTimestampConfig::default()).unwrap();
        assert_eq!(again.flagged, 0);
    }

    #[test]
    fn test_linear_fill_stays_within_anchors() {
        let mut t = wavy_track(40);
        for i in [3, 4, 5, 17, 30, 31] {
            t.observations_mut()[i].clear_location();
        }
        let anchors = t.clone();

        interpolate_missing_locations(&mut t, &MissingLocationConfig::default()).unwrap();

        for i in [3, 4, 5, 17, 30, 31] {
            let lo = (0..i).rev().find(|j| anchors.observations()[*j].has_location()).unwrap();
            let hi = (i + 1..40)
                .find(|j| anchors.observations()[*j].has_location())
                .unwrap();
            let (a, b) = (
                anchors.observations()[lo].x.unwrap(),
                anchors.observations()[hi].x.unwrap(),
            );
            let x = t.observations()[i].x.unwrap();
            assert!(
                x >= a.min(b) - 1e-9 && x <= a.max(b) + 1e-9,
                "x[{i}] = {x} outside [{a}, {b}]"
            );
        }
    }
}
