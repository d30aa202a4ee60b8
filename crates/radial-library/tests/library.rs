//! Library sharing, aliasing and concurrent first use.

use std::sync::Arc;

use radial_library::{open_libraries, LibraryError, RadialModelLibrary};
use radial_model::{InterpolationPolicy, ModelConfig};
use test_utils::{four_spoke_grid, LibraryFixture};

fn config() -> ModelConfig {
    ModelConfig::default()
}

#[test]
fn test_open_is_idempotent() {
    let fixture = LibraryFixture::standard(&["AAA"]);

    let first = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    let model = first.model("SPRING", "AAA").unwrap().unwrap();
    assert_eq!(first.stats().models_loaded, 1);

    // same directory through a non-canonical path
    let second = RadialModelLibrary::open(fixture.root().join("SPRING/.."), &config()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&model, &second.model("SPRING", "AAA").unwrap().unwrap()));
    assert_eq!(second.stats().models_loaded, 1);

    let root = fixture.root().canonicalize().unwrap();
    assert!(open_libraries().contains(&root));
    first.close();
    assert!(!open_libraries().contains(&root));
}

#[test]
fn test_policies_open_separate_libraries() {
    let fixture = LibraryFixture::standard(&["AAA"]);
    let improved = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    let legacy =
        RadialModelLibrary::open(fixture.root(), &ModelConfig::with_policy(InterpolationPolicy::Legacy)).unwrap();

    assert!(!Arc::ptr_eq(&improved, &legacy));
    assert_eq!(legacy.policy(), InterpolationPolicy::Legacy);
    let model = legacy.model("WINTER", "AAA").unwrap().unwrap();
    assert_eq!(model.policy(), InterpolationPolicy::Legacy);

    improved.close();
    legacy.close();
}

#[test]
fn test_close_then_reopen_builds_new_instance() {
    let fixture = LibraryFixture::standard(&["AAA"]);
    let first = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    first.close();

    let second = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!second.is_closed());
    assert!(matches!(first.seasons(), Err(LibraryError::Closed(_))));

    // closing the stale instance must not unregister the live one
    first.close();
    let third = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    assert!(Arc::ptr_eq(&second, &third));
    second.close();
}

#[test]
fn test_open_never_returns_closed_library() {
    let fixture = LibraryFixture::standard(&["AAA"]);
    let root = fixture.root().to_path_buf();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let root = root.clone();
            scope.spawn(move || {
                for _ in 0..100 {
                    let library = RadialModelLibrary::open(&root, &config()).unwrap();
                    if matches!(library.seasons(), Err(LibraryError::Closed(_))) {
                        // once closed, the registry must already hand out another instance
                        let current = RadialModelLibrary::open(&root, &config()).unwrap();
                        assert!(!Arc::ptr_eq(&library, &current));
                    }
                    library.close();
                }
            });
        }
    });
}

#[test]
fn test_season_boundaries() {
    let fixture = LibraryFixture::standard(&["AAA"]);
    let library = RadialModelLibrary::open(fixture.root(), &config()).unwrap();

    assert_eq!(library.season_for(1).unwrap(), "SPRING");
    assert_eq!(library.season_for(100).unwrap(), "SPRING");
    assert_eq!(library.season_for(101).unwrap(), "SUMMER");
    assert_eq!(library.season_for(300).unwrap(), "AUTUMN");
    assert_eq!(library.season_for(365).unwrap(), "WINTER");
    // past every season
    assert_eq!(library.season_for(400).unwrap(), "SPRING");

    assert_eq!(
        library.resolve_jdate(2024101, "AAA").unwrap().unwrap().season(),
        "SPRING",
        "leap-year day 101 folds onto common day 100"
    );
    library.close();
}

#[cfg(unix)]
#[test]
fn test_aliases_share_one_model() {
    let fixture = LibraryFixture::new();
    fixture.write_stations("stations", &["H01", "H01N", "H01S", "H02"]);
    fixture.write_time_guide("time_guide", 0.0, &[("ALL", None)]);
    fixture.write_model("ALL", "H01", &four_spoke_grid());
    fixture.write_model("ALL", "H02", &four_spoke_grid());
    fixture.alias("ALL", "H01N", "H01");
    fixture.alias("ALL", "H01S", "H01");

    let library = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    let a = library.model("ALL", "H01N").unwrap().unwrap();
    let b = library.model("ALL", "H01S").unwrap().unwrap();
    let c = library.model("ALL", "H01").unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &c));
    assert_eq!(a.name(), "H01");

    assert_eq!(library.models("ALL").unwrap().len(), 4);
    let unique = library.unique_models("ALL").unwrap();
    assert_eq!(unique.keys().collect::<Vec<_>>(), vec!["H01", "H02"]);
    assert_eq!(library.stats().models_loaded, 2);
    library.close();
}

#[test]
fn test_concurrent_first_use_loads_once() {
    let stations = ["AAA", "BBB", "CCC"];
    let fixture = LibraryFixture::standard(&stations);
    let root = fixture.root().to_path_buf();

    let libraries: Vec<Arc<RadialModelLibrary>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let root = root.clone();
                scope.spawn(move || {
                    let library = RadialModelLibrary::open(&root, &config()).unwrap();
                    for season in ["SPRING", "SUMMER", "AUTUMN", "WINTER"] {
                        let station = stations[i % stations.len()];
                        let model = library.model(season, station).unwrap().unwrap();
                        assert_eq!(model.spoke_count(), 4);
                    }
                    library
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for library in &libraries[1..] {
        assert!(Arc::ptr_eq(&libraries[0], library));
    }
    let stats = libraries[0].stats();
    assert_eq!(stats.models_loaded, 12);
    assert_eq!(stats.load_failures, 0);
    libraries[0].close();
}

#[test]
fn test_failed_load_is_retried() {
    let fixture = LibraryFixture::standard(&["AAA"]);
    let path = fixture.root().join("SUMMER").join("AAA");
    std::fs::write(&path, [0u8, 1, 2]).unwrap();

    let library = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    let err = library.model("SUMMER", "AAA").unwrap_err();
    assert!(matches!(err, LibraryError::Model(_)), "{}", err);
    assert!(err.to_string().contains("AAA"), "{}", err);
    assert_eq!(library.stats().load_failures, 1);

    // other seasons are unaffected
    assert!(library.model("SPRING", "AAA").unwrap().is_some());

    std::fs::write(&path, four_spoke_grid().encode()).unwrap();
    assert!(library.model("SUMMER", "AAA").unwrap().is_some());
    let stats = library.stats();
    assert_eq!(stats.load_failures, 1);
    assert_eq!(stats.models_loaded, 2);
    library.close();
}

#[test]
fn test_stats_serialize() {
    let fixture = LibraryFixture::standard(&["AAA"]);
    let library = RadialModelLibrary::open(fixture.root(), &config()).unwrap();
    library.model("SPRING", "AAA").unwrap();

    let json = serde_json::to_value(library.stats()).unwrap();
    assert_eq!(json["models_loaded"], 1);
    assert_eq!(json["load_failures"], 0);
    library.close();
}
