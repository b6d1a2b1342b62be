use approx::assert_abs_diff_eq;
use fast_symmetry::{
    AngleRange, EdgeMap, HoughGrid, PeakParams, SymmetryConfig, SymmetryDetector, SymmetryResults,
    VoteParams,
};
use std::f32::consts::FRAC_PI_2;

fn nonzero_cells(grid: &HoughGrid<u32>) -> Vec<(usize, usize, u32)> {
    grid.iter().filter(|c| c.2 > 0).collect()
}

/// Edge pixels of a few shapes mirrored about the vertical line `x = axis_x`,
/// plus some asymmetric clutter.
fn mirrored_scene(width: usize, height: usize, axis_x: usize) -> EdgeMap {
    let mut pts = Vec::new();
    for y in 20..60 {
        let dx = 10 + (y - 20) / 4;
        pts.push((axis_x - dx, y));
        pts.push((axis_x + dx, y));
    }
    for x in 0..12 {
        pts.push((axis_x - 25 + x, 70));
        pts.push((axis_x + 25 - x, 70));
    }
    pts.extend([(5, 5), (17, 90), (width - 3, 40), (60, height - 2)]);
    EdgeMap::from_points(width, height, &pts).unwrap()
}

#[test]
fn single_pair_votes_once_for_its_bisector() {
    let map = EdgeMap::from_points(20, 20, &[(0, 0), (10, 0)]).unwrap();
    let mut det = SymmetryDetector::new(20, 20, 50, 36).unwrap();
    let stats = det
        .vote(&map.view(), &VoteParams::unrestricted(5.0, 20.0))
        .unwrap();
    assert_eq!(stats.votes, 1);

    let m = det.mapper();
    let expected = (m.to_r_bin(5.0), m.to_theta_bin(FRAC_PI_2), 1);
    assert_eq!(nonzero_cells(det.accumulator()), vec![expected]);
    assert!((det.radians_from_index(expected.1) - FRAC_PI_2).abs() < m.theta_step());
    assert!((det.pixel_from_index(expected.0) - 5.0).abs() < m.r_step());
}

#[test]
fn pair_outside_distance_range_casts_no_vote() {
    let map = EdgeMap::from_points(64, 64, &[(3, 3), (40, 3)]).unwrap();
    let mut det = SymmetryDetector::new(64, 64, 100, 90).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(5.0, 36.0))
        .unwrap();
    assert_eq!(det.accumulator().total(), 0);
    det.vote(&map.view(), &VoteParams::unrestricted(37.5, 60.0))
        .unwrap();
    assert_eq!(det.accumulator().total(), 0);
}

#[test]
fn empty_edge_map_gives_zero_accumulator_and_no_lines() {
    let map = EdgeMap::new(32, 32).unwrap();
    let mut det = SymmetryDetector::new(32, 32, 46, 36).unwrap();
    let stats = det.vote(&map.view(), &VoteParams::default()).unwrap();
    assert_eq!(stats.edge_points, 0);
    assert_eq!(det.accumulator().total(), 0);

    let mut res = SymmetryResults::with_capacity(5);
    assert_eq!(det.get_result(&mut res, &PeakParams::unrestricted(5, 3)), 0);
}

#[test]
fn two_mirrored_pairs_give_axis_at_x50() {
    let map = EdgeMap::from_points(100, 100, &[(40, 20), (60, 20), (30, 70), (70, 70)]).unwrap();
    let mut det = SymmetryDetector::new(100, 100, 250, 180).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(5.0, 100.0))
        .unwrap();

    let mut res = SymmetryResults::with_capacity(1);
    let n = det.get_result(&mut res, &PeakParams::unrestricted(1, 10));
    assert_eq!(n, 1);
    let line = res.lines()[0];
    let m = det.mapper();
    assert!((line.theta - FRAC_PI_2).abs() < m.theta_step(), "theta {}", line.theta);
    assert!((line.r - 50.0).abs() < m.r_step(), "r {}", line.r);
    assert_eq!(line.votes, 2);
}

#[test]
fn sequential_voting_equals_binwise_sum() {
    let a = mirrored_scene(120, 100, 60);
    let b = EdgeMap::from_points(120, 100, &[(10, 10), (30, 12), (50, 80), (90, 15), (100, 95)])
        .unwrap();
    let params = VoteParams::unrestricted(8.0, 80.0);

    let mut both = SymmetryDetector::new(120, 100, 160, 90).unwrap();
    both.vote(&a.view(), &params).unwrap();
    both.vote(&b.view(), &params).unwrap();

    let mut only_a = SymmetryDetector::new(120, 100, 160, 90).unwrap();
    only_a.vote(&a.view(), &params).unwrap();
    let mut only_b = SymmetryDetector::new(120, 100, 160, 90).unwrap();
    only_b.vote(&b.view(), &params).unwrap();

    let summed: Vec<u32> = only_a
        .accumulator()
        .as_slice()
        .iter()
        .zip(only_b.accumulator().as_slice())
        .map(|(x, y)| x + y)
        .collect();
    assert_eq!(both.accumulator().as_slice(), summed.as_slice());

    both.reset();
    assert_eq!(both.accumulator().total(), 0);
}

#[test]
fn peak_count_never_exceeds_request_or_capacity() {
    let map = mirrored_scene(120, 100, 60);
    let mut det = SymmetryDetector::new(120, 100, 160, 90).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(4.0, 90.0))
        .unwrap();

    for k in 0..6 {
        let mut res = SymmetryResults::with_capacity(8);
        let n = det.get_result(&mut res, &PeakParams::unrestricted(k, 4));
        assert!(n <= k);
        assert_eq!(n, res.len());
        det.restore_from_backup();
    }

    let mut small = SymmetryResults::with_capacity(2);
    assert_eq!(det.get_result(&mut small, &PeakParams::unrestricted(10, 4)), 2);
}

#[test]
fn returned_peaks_are_spatially_distinct() {
    let map = mirrored_scene(120, 100, 60);
    let mut det = SymmetryDetector::new(120, 100, 160, 90).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(4.0, 90.0))
        .unwrap();

    let params = PeakParams {
        num_peaks: 6,
        suppress_width: 8,
        suppress_height: 6,
        use_mask: false,
        angle_range: None,
    };
    let mut res = SymmetryResults::with_capacity(6);
    det.get_result(&mut res, &params);
    assert!(res.len() > 1);

    let (hw, hh) = (params.suppress_width / 2, params.suppress_height / 2);
    let lines = res.lines();
    for (i, a) in lines.iter().enumerate() {
        for b in &lines[i + 1..] {
            let dr = a.r_index_raw.abs_diff(b.r_index_raw);
            let dt = a.theta_index_raw.abs_diff(b.theta_index_raw);
            assert!(dr > hw || dt > hh, "{a:?} and {b:?} overlap");
        }
        assert!(det.mask().get(a.r_index_raw, a.theta_index_raw).unwrap());
        assert_eq!(det.accumulator().get(a.r_index_raw, a.theta_index_raw), Some(0));
    }
    // Strongest first.
    assert!(lines.windows(2).all(|w| w[0].votes >= w[1].votes));
}

#[test]
fn extraction_replays_identically_from_backup() {
    let map = mirrored_scene(120, 100, 60);
    let mut det = SymmetryDetector::new(120, 100, 160, 90).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(4.0, 90.0))
        .unwrap();
    let before = det.accumulator().clone();

    let params = PeakParams::unrestricted(3, 6);
    let mut first = SymmetryResults::with_capacity(3);
    det.get_result(&mut first, &params);
    assert_eq!(det.backup(), &before);
    assert_ne!(det.accumulator(), &before);

    det.restore_from_backup();
    assert_eq!(det.accumulator(), &before);
    let mut second = SymmetryResults::with_capacity(3);
    det.get_result(&mut second, &params);
    assert_eq!(first, second);
}

#[test]
fn kept_mask_excludes_previous_peaks() {
    let map = mirrored_scene(120, 100, 60);
    let mut det = SymmetryDetector::new(120, 100, 160, 90).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(4.0, 90.0))
        .unwrap();

    let mut first = SymmetryResults::with_capacity(1);
    det.get_result(&mut first, &PeakParams::unrestricted(1, 6));
    det.restore_from_backup();

    let keep = PeakParams {
        use_mask: true,
        ..PeakParams::unrestricted(1, 6)
    };
    let mut second = SymmetryResults::with_capacity(1);
    det.get_result(&mut second, &keep);
    assert_eq!(second.len(), 1);
    assert_ne!(
        (first.lines()[0].r_index_raw, first.lines()[0].theta_index_raw),
        (second.lines()[0].r_index_raw, second.lines()[0].theta_index_raw)
    );

    // Once the mask is cleared the first answer comes back, even with `use_mask`.
    det.restore_from_backup();
    det.clear_mask();
    let mut third = SymmetryResults::with_capacity(1);
    det.get_result(&mut third, &keep);
    assert_eq!(third, first);
}

#[test]
fn finds_vertical_axis_of_mirrored_scene() {
    let map = mirrored_scene(120, 100, 60);
    let mut det = SymmetryDetector::new(120, 100, 221, 180).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(4.0, 90.0))
        .unwrap();

    let mut res = SymmetryResults::with_capacity(2);
    det.get_result(&mut res, &PeakParams::unrestricted(1, 10));
    let line = res.lines()[0];
    assert_abs_diff_eq!(line.theta, FRAC_PI_2, epsilon = det.mapper().theta_step());
    assert_abs_diff_eq!(line.r, 60.0, epsilon = det.mapper().r_step());
}

#[test]
fn extraction_angle_range_excludes_strong_bins() {
    let map = mirrored_scene(120, 100, 60);
    let mut det = SymmetryDetector::new(120, 100, 221, 180).unwrap();
    det.vote(&map.view(), &VoteParams::unrestricted(4.0, 90.0))
        .unwrap();

    let params = PeakParams {
        angle_range: Some(AngleRange::new(-25.0, 25.0)),
        ..PeakParams::unrestricted(3, 6)
    };
    let mut res = SymmetryResults::with_capacity(3);
    det.get_result(&mut res, &params);
    let range = AngleRange::new(-25.0, 25.0);
    for line in &res {
        assert!(range.contains(det.radians_from_index(line.theta_index_raw)));
    }
}

#[test]
fn vote_angle_range_drops_other_orientations() {
    let map = mirrored_scene(120, 100, 60);
    let mut det = SymmetryDetector::new(120, 100, 221, 180).unwrap();
    let params = VoteParams {
        min_dist: 4.0,
        max_dist: 90.0,
        angle_range: Some(AngleRange::new(80.0, 100.0)),
    };
    det.vote(&map.view(), &params).unwrap();
    let range = AngleRange::new(80.0, 100.0);
    let step = det.mapper().theta_step();
    for (_, t, _) in nonzero_cells(det.accumulator()) {
        let theta = det.radians_from_index(t);
        // Bin centres may sit up to half a bin outside the accepted range.
        assert!(
            range.contains(theta)
                || range.contains(theta - 0.5 * step)
                || range.contains(theta + 0.5 * step)
        );
    }
    assert!(det.mask().iter().all(|c| !c.2));
}

/// Exact mirror pairs about an axis through `(100, 60)` in a 200×120 image.
///
/// `u` runs along the axis and `w` is the integer normal with `|w| = |u|`,
/// so `c + a·u ± b·w` are reflections of each other.
fn tilted_scene(u: (i32, i32), w: (i32, i32)) -> EdgeMap {
    let mut pts = Vec::new();
    for a in -4..=4 {
        for b in [1, 2] {
            for side in [1, -1] {
                let x = 100 + a * u.0 + side * b * w.0;
                let y = 60 + a * u.1 + side * b * w.1;
                pts.push((x as usize, y as usize));
            }
        }
    }
    EdgeMap::from_points(200, 120, &pts).unwrap()
}

#[test]
fn default_config_finds_slightly_tilted_horizontal_axes() {
    // Axes tilted by atan(1/20) ≈ 2.9° on either side of horizontal.
    for (u, w) in [((20, -1), (1, 20)), ((20, 1), (-1, 20))] {
        let map = tilted_scene(u, w);
        let cfg = SymmetryConfig::default();
        let mut det = SymmetryDetector::from_config(200, 120, &cfg.accumulator).unwrap();
        det.vote(&map.view(), &cfg.vote).unwrap();
        let mut res = SymmetryResults::with_capacity(1);
        assert_eq!(det.get_result(&mut res, &cfg.peaks), 1);

        // The axis normal with the sign convention that keeps θ in [0, π).
        let (nx, ny) = if w.0 < 0 { (-w.0, -w.1) } else { w };
        let len = (nx as f32).hypot(ny as f32);
        let theta = (nx as f32).atan2(ny as f32);
        let r = (100 * nx + 60 * ny) as f32 / len;

        let line = res.lines()[0];
        let m = det.mapper();
        assert_eq!(line.votes, 18);
        assert_abs_diff_eq!(line.theta, theta, epsilon = m.theta_step());
        assert_abs_diff_eq!(line.r, r, epsilon = m.r_step());

        // The θ window runs past the seam and continues at the mirrored r bin.
        let (t0, n) = (line.theta_index_raw, m.theta_bins());
        let hh = cfg.peaks.suppress_height / 2;
        let (wrapped, beyond) = if t0 < hh {
            ((n + t0 - hh)..n, n + t0 - hh - 1)
        } else {
            (0..(t0 + hh + 1 - n), t0 + hh + 1 - n)
        };
        assert!(!wrapped.is_empty(), "peak bin {t0} is not near the seam");
        let mirrored = m.to_r_bin(-m.from_r_bin(line.r_index_raw));
        for t in wrapped {
            assert_eq!(det.mask().get(mirrored, t), Some(true), "row {t}");
            assert_eq!(det.mask().get(line.r_index_raw, t), Some(false), "row {t}");
        }
        assert_eq!(det.mask().get(mirrored, beyond), Some(false));
    }
}
