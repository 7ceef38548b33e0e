use appbundler_build::{SupplementalData, SupplementalError};
use appbundler_core::DataSpec;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates the standard data fixture:
///
/// ```text
/// data/
///   test.json
///   test2.json
///   sub/
///     sub.json
///     sub2.yaml
/// ```
fn data_fixture() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    std::fs::create_dir_all(data.join("sub")).unwrap();
    std::fs::write(data.join("test.json"), r#"{"name": "test"}"#).unwrap();
    std::fs::write(data.join("test2.json"), r#"{"name": "test2"}"#).unwrap();
    std::fs::write(data.join("sub/sub.json"), r#"{"name": "sub"}"#).unwrap();
    std::fs::write(data.join("sub/sub2.yaml"), "name: sub2\n").unwrap();
    (tmp, data)
}

fn resolve(spec: DataSpec) -> SupplementalData {
    SupplementalData::resolve(spec).unwrap()
}

// ── Resolution ──

#[test]
fn no_pattern_no_subdirs_resolves_base() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data));

    assert_eq!(resolved.directory(), data);
    assert!(resolved.sub_directories().is_none());
    assert_eq!(resolved.locations(), [data.clone()]);
}

#[test]
fn subdir_without_pattern_resolves_subdir() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).sub_directories(["/sub"]));

    assert_eq!(resolved.sub_directories(), Some(&["/sub".to_owned()][..]));
    assert_eq!(resolved.locations(), [data.join("sub")]);
}

#[test]
fn non_recursive_pattern_matches_direct_children_only() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("*.json"));

    assert_eq!(
        resolved.locations(),
        [data.join("test.json"), data.join("test2.json")]
    );
}

#[test]
fn pattern_below_subdir() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(
        DataSpec::new(&data)
            .sub_directories(["/sub"])
            .pattern("*.json"),
    );

    assert_eq!(resolved.locations(), [data.join("sub/sub.json")]);
}

#[test]
fn recursive_pattern_matches_any_depth() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("*.yaml").recursive(true));

    assert!(resolved.is_recursive());
    assert_eq!(resolved.locations(), [data.join("sub/sub2.yaml")]);
}

#[test]
fn recursive_json_excludes_yaml_sibling() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("*.json").recursive(true));
    let mut locations = resolved.locations().to_vec();
    locations.sort();

    assert_eq!(
        locations,
        vec![
            data.join("sub/sub.json"),
            data.join("test.json"),
            data.join("test2.json"),
        ]
    );
    assert!(!locations.contains(&data.join("sub/sub2.yaml")));
}

#[test]
fn every_match_satisfies_the_pattern() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("*.json").recursive(true));

    for location in resolved.locations() {
        assert_eq!(location.extension().unwrap(), "json", "{location:?}");
    }
}

#[test]
fn pattern_can_match_directories() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("s*"));

    assert_eq!(resolved.locations(), [data.join("sub")]);
}

#[test]
fn pattern_with_path_component() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("sub/*.yaml"));

    assert_eq!(resolved.locations(), [data.join("sub/sub2.yaml")]);
}

#[test]
fn no_matches_is_empty_not_error() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("*.csv").recursive(true));

    assert!(resolved.locations().is_empty());
}

#[test]
fn locations_follow_root_order() {
    let (_tmp, data) = data_fixture();
    std::fs::create_dir_all(data.join("alpha")).unwrap();
    std::fs::write(data.join("alpha/a.json"), "{}").unwrap();

    let resolved = resolve(
        DataSpec::new(&data)
            .sub_directories(["sub", "alpha"])
            .pattern("*.json"),
    );

    assert_eq!(
        resolved.locations(),
        [data.join("sub/sub.json"), data.join("alpha/a.json")]
    );
}

#[test]
fn base_as_its_own_subdirectory_is_legal() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).sub_directories(["/"]));
    assert_eq!(resolved.locations(), [data.clone()]);

    let resolved = resolve(DataSpec::new(&data).sub_directories(["."]).pattern("*.json"));
    assert_eq!(
        resolved.locations(),
        [data.join("test.json"), data.join("test2.json")]
    );
}

#[test]
fn overlapping_roots_are_deduplicated() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(
        DataSpec::new(&data)
            .sub_directories(["/", "sub"])
            .pattern("*.json")
            .recursive(true),
    );

    assert_eq!(resolved.locations().len(), 3);
}

#[test]
fn missing_base_directory_fails() {
    let tmp = TempDir::new().unwrap();

    let err = SupplementalData::resolve(DataSpec::new(tmp.path().join("nope"))).unwrap_err();

    assert!(matches!(err, SupplementalError::DirectoryNotFound(_)));
}

#[test]
fn missing_subdirectory_fails() {
    let (_tmp, data) = data_fixture();

    let err = SupplementalData::resolve(DataSpec::new(&data).sub_directories(["/sub", "/ghost"]))
        .unwrap_err();

    assert!(matches!(err, SupplementalError::DirectoryNotFound(ref p) if p.ends_with("ghost")));
    assert!(err.to_string().contains("directory not found"));
}

#[test]
fn file_as_base_directory_fails() {
    let (_tmp, data) = data_fixture();

    let err = SupplementalData::resolve(DataSpec::new(data.join("test.json"))).unwrap_err();

    assert!(matches!(err, SupplementalError::NotADirectory(ref p) if p.ends_with("test.json")));
}

#[test]
fn matches_inside_a_matched_directory_are_dropped() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).pattern("*").recursive(true));

    assert_eq!(
        resolved.locations(),
        [data.join("sub"), data.join("test.json"), data.join("test2.json")]
    );
}

#[test]
fn nested_subdirectory_roots_collapse_into_parent() {
    let (_tmp, data) = data_fixture();

    let resolved = resolve(DataSpec::new(&data).sub_directories(["sub", "/"]));

    assert_eq!(resolved.locations(), [data.clone()]);
}

#[test]
fn invalid_pattern_fails() {
    let (_tmp, data) = data_fixture();

    let err = SupplementalData::resolve(DataSpec::new(&data).pattern("[oops")).unwrap_err();

    assert!(matches!(err, SupplementalError::InvalidPattern { .. }));
}

// ── Copy ──

#[test]
fn copy_preserves_structure_relative_to_base() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(DataSpec::new(&data).pattern("*.yaml").recursive(true));
    let written = resolved.copy(dest.path()).unwrap();

    assert_eq!(written, vec![dest.path().join("sub/sub2.yaml")]);
    assert_eq!(
        std::fs::read_to_string(dest.path().join("sub/sub2.yaml")).unwrap(),
        "name: sub2\n"
    );
}

#[test]
fn copy_flatten_places_files_at_root() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(
        DataSpec::new(&data)
            .pattern("*.yaml")
            .recursive(true)
            .flatten(true),
    );
    resolved.copy(dest.path()).unwrap();

    assert!(dest.path().join("sub2.yaml").exists());
    assert!(!dest.path().join("sub").exists());
}

#[test]
fn copy_writes_each_file_once_when_directory_and_contents_match() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(DataSpec::new(&data).pattern("*").recursive(true));
    let written = resolved.copy(dest.path()).unwrap();

    let mut unique = written.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(written.len(), 4);
    assert_eq!(unique.len(), written.len());
    assert!(dest.path().join("sub/sub.json").exists());
}

#[test]
fn copy_into_destination_inside_base_does_not_recurse() {
    let (_tmp, data) = data_fixture();
    let out = data.join("out");

    let resolved = resolve(DataSpec::new(&data));
    let written = resolved.copy(&out).unwrap();

    assert_eq!(written.len(), 4);
    assert!(out.join("sub/sub.json").exists());
    assert!(!out.join("out").exists());
}

#[test]
fn copy_excluding_skips_excluded_subtree() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(DataSpec::new(&data));
    let written = resolved.copy_excluding(dest.path(), &data.join("sub")).unwrap();

    assert_eq!(written.len(), 2);
    assert!(dest.path().join("test.json").exists());
    assert!(!dest.path().join("sub").exists());
}

#[test]
fn copy_whole_directory_mirrors_tree() {
    let (_tmp, data) = data_fixture();
    std::fs::create_dir_all(data.join("empty")).unwrap();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(DataSpec::new(&data));
    let written = resolved.copy(dest.path()).unwrap();

    assert_eq!(written.len(), 4);
    assert!(dest.path().join("test.json").exists());
    assert!(dest.path().join("test2.json").exists());
    assert!(dest.path().join("sub/sub.json").exists());
    assert!(dest.path().join("sub/sub2.yaml").exists());
    assert!(dest.path().join("empty").is_dir());
}

#[test]
fn copy_subdirectory_keeps_its_name() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(DataSpec::new(&data).sub_directories(["sub"]));
    resolved.copy(dest.path()).unwrap();

    assert!(dest.path().join("sub/sub.json").exists());
    assert!(dest.path().join("sub/sub2.yaml").exists());
    assert!(!dest.path().join("test.json").exists());
}

#[test]
fn copy_flattened_directory_drops_structure() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(DataSpec::new(&data).flatten(true));
    resolved.copy(dest.path()).unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dest.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["sub.json", "sub2.yaml", "test.json", "test2.json"]);
}

#[test]
fn flatten_collision_is_last_write_wins() {
    let (_tmp, data) = data_fixture();
    std::fs::create_dir_all(data.join("a")).unwrap();
    std::fs::create_dir_all(data.join("b")).unwrap();
    std::fs::write(data.join("a/same.txt"), "from a").unwrap();
    std::fs::write(data.join("b/same.txt"), "from b").unwrap();
    let dest = TempDir::new().unwrap();

    let resolved = resolve(
        DataSpec::new(&data)
            .pattern("same.txt")
            .recursive(true)
            .flatten(true),
    );
    let written = resolved.copy(dest.path()).unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(
        std::fs::read_to_string(dest.path().join("same.txt")).unwrap(),
        "from b"
    );
}

#[test]
fn copy_overwrites_existing_destination_files() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();
    std::fs::write(dest.path().join("test.json"), "stale").unwrap();

    let resolved = resolve(DataSpec::new(&data).pattern("test.json"));
    resolved.copy(dest.path()).unwrap();

    assert_eq!(
        std::fs::read_to_string(dest.path().join("test.json")).unwrap(),
        r#"{"name": "test"}"#
    );
}

#[test]
fn copy_creates_missing_destination() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();
    let nested = dest.path().join("build/data");

    let resolved = resolve(DataSpec::new(&data).pattern("*.json").recursive(true));
    resolved.copy(&nested).unwrap();

    assert!(nested.join("test.json").exists());
    assert!(nested.join("test2.json").exists());
    assert!(nested.join("sub/sub.json").exists());
    assert!(!nested.join("sub/sub2.yaml").exists());
}

#[test]
fn empty_resolution_copies_nothing() {
    let (_tmp, data) = data_fixture();
    let dest = TempDir::new().unwrap();
    let target = dest.path().join("out");

    let resolved = resolve(DataSpec::new(&data).pattern("*.csv"));
    let written = resolved.copy(&target).unwrap();

    assert!(written.is_empty());
    assert!(!Path::new(&target).exists());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,6}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn flatten_places_every_file_at_destination_root(
            dirs in proptest::collection::vec(segment(), 0..4),
            stem in segment(),
        ) {
            let tmp = TempDir::new().unwrap();
            let base = tmp.path().join("base");
            let mut nested = base.clone();
            for d in &dirs {
                nested.push(d);
            }
            std::fs::create_dir_all(&nested).unwrap();
            std::fs::write(nested.join(format!("{stem}.dat")), "x").unwrap();

            let dest = tmp.path().join("dest");
            let resolved = resolve(DataSpec::new(&base).pattern("*.dat").recursive(true).flatten(true));
            let written = resolved.copy(&dest).unwrap();

            prop_assert_eq!(written, vec![dest.join(format!("{stem}.dat"))]);
        }

        #[test]
        fn mirrored_copy_preserves_relative_path(
            dirs in proptest::collection::vec(segment(), 0..4),
            stem in segment(),
        ) {
            let tmp = TempDir::new().unwrap();
            let base = tmp.path().join("base");
            let mut rel = PathBuf::new();
            for d in &dirs {
                rel.push(d);
            }
            rel.push(format!("{stem}.dat"));
            std::fs::create_dir_all(base.join(&rel).parent().unwrap()).unwrap();
            std::fs::write(base.join(&rel), "x").unwrap();

            let dest = tmp.path().join("dest");
            let resolved = resolve(DataSpec::new(&base).pattern("*.dat").recursive(true));
            let written = resolved.copy(&dest).unwrap();

            prop_assert_eq!(written, vec![dest.join(&rel)]);
        }
    }
}
