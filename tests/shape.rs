//! End-to-end tests for shape computation: layout, invariants, determinism
//! and export.

use pretty_assertions::assert_eq;

use tacet::compute_shape;
use tacet::config::{Mode, Outline, Params, StarProfile};
use tacet::render::{Export, Style};
use tacet::rng::{SeededRandom, ThreadRandom};

fn scenario() -> Params {
    Params {
        line_length: 600.0,
        max_amplitude: 60.0,
        segments: 4,
        sharpness: 2.0,
        noise_amount: 0.0,
        ..Params::wave()
    }
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn four_segment_wave_matches_hand_computed_samples() {
    let shape = compute_shape(&scenario(), &mut SeededRandom::new(0));

    assert_eq!(shape.width, 700.0);
    assert_eq!(shape.height, 200.0);
    assert_eq!(shape.center_y, 100.0);

    let xs: Vec<f64> = shape.points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![50.0, 200.0, 350.0, 500.0, 650.0]);

    let amps: Vec<f64> = shape.points.iter().map(|p| p.amplitude()).collect();
    assert_eq!(amps, vec![0.0, 15.0, 60.0, 15.0, 0.0]);

    let tops: Vec<f64> = shape.points.iter().map(|p| p.top_y).collect();
    let bottoms: Vec<f64> = shape.points.iter().map(|p| p.bottom_y).collect();
    assert_eq!(tops, vec![100.0, 85.0, 40.0, 85.0, 100.0]);
    assert_eq!(bottoms, vec![100.0, 115.0, 160.0, 115.0, 100.0]);
}

#[test]
fn four_segment_wave_path_text() {
    let shape = compute_shape(&scenario(), &mut SeededRandom::new(0));
    let expected = concat!(
        "M 50 100",
        " Q 50 100 125 92.5",
        " Q 200 85 275 62.5",
        " Q 350 40 425 62.5",
        " Q 500 85 575 92.5",
        " L 650 100",
        " L 650 100",
        " Q 650 100 575 107.5",
        " Q 500 115 425 137.5",
        " Q 350 160 275 137.5",
        " Q 200 115 125 107.5",
        " L 50 100",
        " Z",
    );
    assert_eq!(shape.path, expected);
}

#[test]
fn four_segment_wave_polyline_text() {
    let params = Params {
        outline: Outline::Polyline,
        ..scenario()
    };
    let shape = compute_shape(&params, &mut SeededRandom::new(0));
    let expected = concat!(
        "M 50 100",
        " L 50 100 L 200 85 L 350 40 L 500 85 L 650 100",
        " L 650 100 L 500 115 L 350 160 L 200 115 L 50 100",
        " Z",
    );
    assert_eq!(shape.path, expected);
}

#[test]
fn wave_has_no_peaks_or_markers() {
    let shape = compute_shape(&Params::wave(), &mut SeededRandom::new(0));
    assert!(shape.peaks.is_empty());
    assert!(shape.markers.is_empty());
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn top_above_center_above_bottom_for_any_noise() {
    for mode in [Mode::Wave, Mode::Star] {
        for seed in 0..25 {
            let params = Params {
                noise_amount: 40.0,
                max_amplitude: 20.0,
                seed,
                ..Params::for_mode(mode)
            };
            let shape = compute_shape(&params, &mut SeededRandom::new(seed));
            for p in &shape.points {
                assert!(p.top_y <= shape.center_y && shape.center_y <= p.bottom_y);
            }
        }
    }
}

#[test]
fn unseeded_noise_also_respects_centerline() {
    let params = Params {
        noise_amount: 40.0,
        ..Params::star()
    };
    let shape = compute_shape(&params, &mut ThreadRandom::new());
    for p in &shape.points {
        assert!(p.top_y <= shape.center_y && shape.center_y <= p.bottom_y);
    }
}

#[test]
fn zero_segments_degrades_to_single_span() {
    let params = Params {
        segments: 0,
        noise_amount: 0.0,
        ..Params::wave()
    };
    let shape = compute_shape(&params, &mut SeededRandom::new(0));
    assert_eq!(shape.points.len(), 2);
    assert!(shape.path.starts_with("M "));
    assert!(shape.path.ends_with(" Z"));
}

#[test]
fn negative_amplitude_is_clamped() {
    let params = Params {
        max_amplitude: -30.0,
        noise_amount: 0.0,
        ..Params::wave()
    };
    let shape = compute_shape(&params, &mut SeededRandom::new(0));
    assert_eq!(shape.height, 80.0);
    assert!(shape.points.iter().all(|p| p.amplitude() == 0.0));
}

#[test]
fn classic_star_sums_overlapping_peaks() {
    let quiet = Params {
        noise_amount: 0.0,
        segments: 60,
        ..Params::star()
    };
    let classic = Params {
        star: StarProfile::classic(),
        ..quiet.clone()
    };
    let a = compute_shape(&quiet, &mut SeededRandom::new(0));
    let b = compute_shape(&classic, &mut SeededRandom::new(0));
    assert_ne!(a.path, b.path);
    // Center peak at t = 1/2 lands on sample 30 in both layouts.
    assert_eq!(b.points[30].amplitude(), classic.max_amplitude);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn same_seed_same_output() {
    for mode in [Mode::Wave, Mode::Star] {
        let params = Params {
            seed: 42,
            ..Params::for_mode(mode)
        };
        let a = compute_shape(&params, &mut SeededRandom::new(params.seed));
        let b = compute_shape(&params, &mut SeededRandom::new(params.seed));
        assert_eq!(a, b);
    }
}

#[test]
fn reroll_changes_some_amplitude() {
    let mut params = Params::wave();
    let before = compute_shape(&params, &mut SeededRandom::new(params.seed));
    params.reroll();
    let after = compute_shape(&params, &mut SeededRandom::new(params.seed));
    assert!(
        before
            .points
            .iter()
            .zip(&after.points)
            .any(|(a, b)| a.amplitude() != b.amplitude())
    );
}

#[test]
fn recompute_without_reroll_is_idempotent() {
    let params = Params {
        seed: 5,
        ..Params::star()
    };
    let first = compute_shape(&params, &mut SeededRandom::new(params.seed)).path;
    for _ in 0..3 {
        let again = compute_shape(&params, &mut SeededRandom::new(params.seed)).path;
        assert_eq!(again, first);
    }
}

#[test]
fn unseeded_noise_differs_between_renders() {
    let params = Params {
        segments: 160,
        noise_amount: 20.0,
        ..Params::wave()
    };
    let a = compute_shape(&params, &mut ThreadRandom::new());
    let b = compute_shape(&params, &mut ThreadRandom::new());
    assert_ne!(a.path, b.path);
    assert_eq!(a.points.len(), b.points.len());
}

#[test]
fn jitter_does_not_disturb_noise_draws() {
    let plain = Params {
        seed: 3,
        ..Params::star()
    };
    let mut jittered = plain.clone();
    jittered.star.jitter = true;

    let a = compute_shape(&plain, &mut SeededRandom::new(3));
    let b = compute_shape(&jittered, &mut SeededRandom::new(3));
    // Tails sit outside every peak, so only noise shapes them.
    assert_eq!(a.points[0], b.points[0]);
    assert_eq!(a.points[80], b.points[80]);
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn export_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let params = Params::star();
    let shape = compute_shape(&params, &mut SeededRandom::new(0));
    let export = Export::snapshot(&shape, &Style::from_params(&params).unwrap());

    let path = export.write_to(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("tacet-stars.svg"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, export.body);
    assert!(written.contains(&shape.path));
}

#[test]
fn export_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("out").join("marks");
    let params = Params::wave();
    let shape = compute_shape(&params, &mut SeededRandom::new(0));
    let export = Export::snapshot(&shape, &Style::from_params(&params).unwrap())
        .with_file_name("tacet-wave-0.svg");
    let path = export.write_to(&nested).unwrap();
    assert!(path.ends_with("out/marks/tacet-wave-0.svg"));
    assert!(path.exists());
}

#[test]
fn params_load_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("params.json");
    std::fs::write(
        &file,
        r##"{"mode":"star","segments":30,"color":"#112233","star":{"jitter":true}}"##,
    )
    .unwrap();
    let params = Params::from_json_file(&file).unwrap();
    assert_eq!(params.mode, Mode::Star);
    assert_eq!(params.segments, 30);
    assert_eq!(params.color, "#112233");
    assert!(params.star.jitter);

    assert!(Params::from_json_file(&dir.path().join("missing.json")).is_err());
}

#[test]
fn params_file_fills_gaps_from_its_own_mode() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("star.json");
    std::fs::write(&file, r#"{"mode":"star"}"#).unwrap();

    let params = Params::from_json_file(&file).unwrap();
    assert_eq!(params, Params::star());
    assert_eq!(params.max_amplitude, 70.0);
    assert_eq!(params.segments, 80);
    assert!(params.show_guides);
}
