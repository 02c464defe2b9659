#![allow(non_snake_case)]

use conicache::solver::*;

fn warm_start_data() -> (ProblemInput, ConeSpec) {
    // minimize   x0 + x1 - x2 - x3
    // subject to x >= 0, x2 <= 1, x3 <= 1
    let A = SparseMatrix::csc(
        4,
        4,
        vec![0i64, 1, 2, 3, 4],
        vec![0i64, 1, 2, 3],
        vec![-1., -1., 1., 1.],
    );
    let data = ProblemInput::new(A, vec![0., 0., 1., 1.], vec![1., 1., -1., -1.]);
    let cone = ConeSpec::default().with_nonneg(4);
    (data, cone)
}

fn test_settings() -> SettingsOverrides {
    SettingsOverrides::new()
        .set("eps", 1e-6)
        .set("max_iters", 20000)
        .set("verbose", false)
}

#[test]
fn test_warm_start_from_solution() {
    let (data, cone) = warm_start_data();
    let settings = test_settings();

    let sol = solve(&data, &cone, None, &settings).unwrap();
    assert_eq!(sol.info.status, SolverStatus::Solved);
    assert!(sol.info.iter > 0);

    // restarting at the solution needs no iterations
    let warm = WarmStart::from(&sol);
    let sol2 = solve(&data, &cone, Some(&warm), &settings).unwrap();
    assert_eq!(sol2.info.status, SolverStatus::Solved);
    assert_eq!(sol2.info.iter, 0);

    // a perturbed start does
    let mut x = sol.x.clone();
    x.iter_mut().for_each(|v| *v *= 2.);
    let warm = WarmStart::new(x, sol.y.clone(), sol.s.clone());
    let sol3 = solve(&data, &cone, Some(&warm), &settings).unwrap();
    assert_eq!(sol3.info.status, SolverStatus::Solved);
    assert!(sol3.info.iter > 0);
}

#[test]
fn test_warm_start_not_aliased() {
    let (data, cone) = warm_start_data();
    let settings = test_settings();

    let sol = solve(&data, &cone, None, &settings).unwrap();
    let warm = WarmStart::from(&sol);
    let saved = warm.clone();

    let mut sol2 = solve(&data, &cone, Some(&warm), &settings).unwrap();
    sol2.x.iter_mut().for_each(|v| *v = 0.);
    sol2.y.iter_mut().for_each(|v| *v = 0.);

    assert_eq!(warm, saved);
}

#[test]
fn test_warm_start_in_workspace() {
    let (data, cone) = warm_start_data();

    let mut work = Workspace::with_defaults(&data, &cone, &test_settings()).unwrap();
    let sol = work.solve(SolveRequest::new()).unwrap();
    assert_eq!(sol.info.status, SolverStatus::Solved);

    let sol2 = work
        .solve(SolveRequest::new().with_warm_start(WarmStart::from(&sol)))
        .unwrap();
    assert_eq!(sol2.info.iter, 0);
}

#[test]
fn test_warm_start_other_dtypes() {
    let (data, cone) = warm_start_data();

    let warm = WarmStart::new(vec![0i64; 4], vec![0f32; 4], vec![1i32; 4]);
    let sol = solve(&data, &cone, Some(&warm), &test_settings()).unwrap();
    assert_eq!(sol.info.status, SolverStatus::Solved);
}

#[test]
fn test_warm_start_incomplete() {
    let (data, cone) = warm_start_data();

    let warm = WarmStart {
        x: Some(vec![0.; 4].into()),
        y: None,
        s: Some(vec![0.; 4].into()),
    };
    let err = solve(&data, &cone, Some(&warm), &test_settings()).unwrap_err();
    assert_eq!(err, Error::IncompleteWarmStart("y"));
}

#[test]
fn test_warm_start_wrong_length() {
    let (data, cone) = warm_start_data();

    let warm = WarmStart::new(vec![0.; 3], vec![0.; 4], vec![0.; 4]);
    let err = solve(&data, &cone, Some(&warm), &test_settings()).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { field: "x", .. }));
}
