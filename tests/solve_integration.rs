use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tsp_ga_solver::Service;
use tsp_ga_solver::bootstrap::bootstrap;
use tsp_ga_solver::models::{
    Algorithm, EdgeWeightType, Instance, Problem, ProblemType, SolverConfig,
};
use tsp_ga_solver::services::solver::Error;

const TOY_INSTANCE: &str = "NAME: toy\nTYPE: TSP\nDIMENSION: 4\nEDGE_WEIGHT_TYPE: EUC_2D\nNODE_COORD_SECTION\n1 0 0\n2 1 0\n3 2 0\n4 3 0\nEOF\n";

fn instances_dir_with_toy() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("toy.tsp"), TOY_INSTANCE).unwrap();
    dir
}

fn service(dir: &TempDir) -> Service {
    bootstrap(dir.path())
        .unwrap()
        .with_rng_seed(42)
        .build()
}

fn synthetic_problem(dimension: usize, instance_name: &str) -> Problem {
    Problem {
        problem_type: ProblemType::Tsp,
        edge_weight_type: EdgeWeightType::Euc2d,
        dimension,
        algorithm: Algorithm::Ga,
        instance: Instance::Synthetic {
            instance_name: instance_name.to_string(),
            best_known_cost: 6.0,
        },
    }
}

fn real_problem(dimension: usize, api_name: &str, coordinates_path: PathBuf) -> Problem {
    Problem {
        problem_type: ProblemType::Tsp,
        edge_weight_type: EdgeWeightType::Geo,
        dimension,
        algorithm: Algorithm::Ga,
        instance: Instance::Real {
            api_name: api_name.to_string(),
            coordinates_path,
        },
    }
}

#[tokio::test]
async fn it_solves_a_synthetic_instance_end_to_end() {
    let dir = instances_dir_with_toy();
    let service = service(&dir);

    let problem = synthetic_problem(4, "toy.tsp");
    let config = SolverConfig::new(4)
        .unwrap()
        .with_fixed_origin(0)
        .unwrap()
        .with_max_generations(50);

    let solved = service.solve(&problem, &config, None).await.unwrap();

    // Four collinear points: the optimal cycle walks the line and back
    assert_eq!(solved.best_cost, 6.0);
    assert_eq!(solved.solution[0], 0);
    assert_eq!(solved.best_cost_history[solved.best_cost_generation], 6.0);
    assert!(solved.generations >= 1);
}

#[tokio::test]
async fn it_reports_missing_instance_files_as_not_found() {
    let dir = instances_dir_with_toy();
    let service = service(&dir);

    let problem = synthetic_problem(4, "absent.tsp");
    let config = SolverConfig::new(4).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert!(matches!(error, Error::InstanceFileMissing { .. }));
    assert_eq!(error.status(), 404);
}

#[tokio::test]
async fn it_rejects_unsupported_edge_weight_types_as_bad_input() {
    let dir = TempDir::new().unwrap();
    let geo = TOY_INSTANCE.replace("EUC_2D", "GEO");
    fs::write(dir.path().join("geo.tsp"), geo).unwrap();
    let service = service(&dir);

    let problem = synthetic_problem(4, "geo.tsp");
    let config = SolverConfig::new(4).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert_eq!(error.status(), 400);
    assert!(error.to_string().contains("problem type not supported"));
}

#[tokio::test]
async fn it_rejects_mismatched_problem_and_config_dimensions() {
    let dir = instances_dir_with_toy();
    let service = service(&dir);

    let problem = synthetic_problem(4, "toy.tsp");
    let config = SolverConfig::new(5).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert!(matches!(
        error,
        Error::DimensionMismatch {
            problem: 4,
            config: 5
        }
    ));
    assert_eq!(error.status(), 400);
}

#[tokio::test]
async fn it_requires_an_api_key_for_real_instances() {
    let dir = instances_dir_with_toy();
    // No with_api_key: the builder leaves the credential unset
    let coords_path = dir.path().join("coords.txt");
    fs::write(&coords_path, "35.1,51.1\n35.2,51.2\n35.3,51.3\n").unwrap();

    let http = reqwest::Client::new();
    let service = Service::builder(dir.path().to_path_buf(), http).build();

    let problem = real_problem(3, "neshan", coords_path);
    let config = SolverConfig::new(3).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert_eq!(error.to_string(), "API key missing");
    assert_eq!(error.status(), 500);
}

#[tokio::test]
async fn it_rejects_unknown_routing_providers() {
    let dir = instances_dir_with_toy();
    let http = reqwest::Client::new();
    let service = Service::builder(dir.path().to_path_buf(), http)
        .with_api_key("key")
        .build();

    let coords_path = dir.path().join("coords.txt");
    fs::write(&coords_path, "35.1,51.1\n35.2,51.2\n35.3,51.3\n").unwrap();

    let problem = real_problem(3, "osrm", coords_path);
    let config = SolverConfig::new(3).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert!(error.to_string().contains("unsupported API"));
    assert_eq!(error.status(), 400);
}

#[tokio::test]
async fn it_fails_fast_on_malformed_coordinates() {
    let dir = instances_dir_with_toy();
    let http = reqwest::Client::new();
    let service = Service::builder(dir.path().to_path_buf(), http)
        .with_api_key("key")
        .build();

    let coords_path = dir.path().join("coords.txt");
    fs::write(&coords_path, "35.1,51.1\nnot-a-coordinate\n35.3,51.3\n").unwrap();

    let problem = real_problem(3, "neshan", coords_path);
    let config = SolverConfig::new(3).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert!(error.to_string().contains("origin or destination invalid"));
    assert_eq!(error.status(), 400);
}

#[tokio::test]
async fn it_tolerates_blank_lines_in_coordinate_files() {
    let dir = instances_dir_with_toy();
    let http = reqwest::Client::new();
    let service = Service::builder(dir.path().to_path_buf(), http)
        .with_api_key("key")
        .build();

    // Three coordinates padded with blank lines, against a dimension of
    // four: the count mismatch proves the blanks were skipped, and the
    // error fires before any provider request goes out
    let coords_path = dir.path().join("coords.txt");
    fs::write(&coords_path, "\n35.1,51.1\n\n35.2,51.2\n35.3,51.3\n\n").unwrap();

    let problem = real_problem(4, "neshan", coords_path);
    let config = SolverConfig::new(4).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert!(matches!(
        error,
        Error::CoordinateCountMismatch {
            expected: 4,
            found: 3
        }
    ));
}

#[tokio::test]
async fn it_reports_empty_coordinate_files_as_missing_resources() {
    let dir = instances_dir_with_toy();
    let http = reqwest::Client::new();
    let service = Service::builder(dir.path().to_path_buf(), http)
        .with_api_key("key")
        .build();

    let coords_path = dir.path().join("coords.txt");
    fs::write(&coords_path, "\n\n").unwrap();

    let problem = real_problem(3, "neshan", coords_path);
    let config = SolverConfig::new(3).unwrap();

    let error = service.solve(&problem, &config, None).await.unwrap_err();

    assert!(matches!(error, Error::CoordinatesEmpty { .. }));
    assert_eq!(error.status(), 404);
}
