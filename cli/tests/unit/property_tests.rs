//! Property-based tests for classification, validation and image cleanup.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use dem_cli::application::services::Platform;
use dem_cli::domain::config::VALID_CONFIG_KEYS;
use dem_cli::domain::{
    AvailabilityStatus, ImageSet, Tool, ToolImage, classify_reference, classify_tools,
    validate_config_key, validate_dev_env_name,
};
use dem_common::ToolType;

use crate::mocks::{FakeEngine, MemoryStore, RecordingReporter, collection, dev_env, installed};

const POOL: [&str; 5] = ["make:latest", "gcc:13", "stlink:1", "cpputest:latest", "jlink:7"];

// ============================================================================
// Availability classification
// ============================================================================

proptest! {
    /// The status is fully determined by set membership.
    #[test]
    fn prop_status_matches_membership(
        in_local in any::<bool>(),
        in_registry in any::<bool>(),
        name in "[a-z][a-z0-9_/]{0,15}",
        tag in "[a-z0-9.]{1,8}",
    ) {
        let reference = format!("{name}:{tag}");
        let mut local = ImageSet::new();
        let mut registry = ImageSet::new();
        if in_local { local.insert(reference.clone()); }
        if in_registry { registry.insert(reference.clone()); }

        let status = classify_reference(&reference, &local, &registry);

        prop_assert_eq!(status.is_local(), in_local);
        prop_assert_eq!(status == AvailabilityStatus::NotAvailable, !in_local && !in_registry);
        prop_assert_eq!(status == AvailabilityStatus::RegistryOnly, !in_local && in_registry);
    }

    /// Classifying twice against unchanged sets gives the same result.
    #[test]
    fn prop_classification_is_idempotent(
        local_picks in prop::collection::vec(any::<bool>(), POOL.len()),
        registry_picks in prop::collection::vec(any::<bool>(), POOL.len()),
    ) {
        let pick = |picks: &[bool]| -> ImageSet {
            POOL.iter()
                .zip(picks)
                .filter(|(_, picked)| **picked)
                .map(|(r, _)| (*r).to_string())
                .collect()
        };
        let (local, registry) = (pick(local_picks.as_slice()), pick(registry_picks.as_slice()));
        let tools: Vec<Tool> = POOL
            .iter()
            .zip(tool_types())
            .map(|(r, t)| Tool::new(t, ToolImage::parse(r).expect("valid reference")))
            .collect();

        let first = classify_tools(&tools, &local, &registry);
        let second = classify_tools(&tools, &local, &registry);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.tools.len(), POOL.len());
    }

    /// A different tag of the same name never matches.
    #[test]
    fn prop_tag_is_part_of_identity(tag in "[a-z0-9]{1,8}", other in "[a-z0-9]{1,8}") {
        prop_assume!(tag != other);
        let local: ImageSet = [format!("make:{other}")].into_iter().collect();
        let status = classify_reference(&format!("make:{tag}"), &local, &ImageSet::new());
        prop_assert_eq!(status, AvailabilityStatus::NotAvailable);
    }

    /// Parsing the rendered reference gives back the same image.
    #[test]
    fn prop_reference_parses_back(
        host in proptest::option::of("[a-z]{1,8}:[0-9]{2,5}"),
        repo in "[a-z][a-z0-9_]{0,12}",
        tag in "[a-z0-9.]{1,8}",
    ) {
        let name = host.map_or_else(|| repo.clone(), |h| format!("{h}/{repo}"));
        let image = ToolImage::new(name, tag);
        prop_assert_eq!(ToolImage::parse(&image.reference()).expect("parses"), image);
    }
}

// ============================================================================
// Name and config validation
// ============================================================================

proptest! {
    /// Names with whitespace or a slash are rejected.
    #[test]
    fn prop_names_with_separators_rejected(
        head in "[a-z]{1,10}",
        sep in prop::sample::select(vec![" ", "\t", "/"]),
        tail in "[a-z]{1,10}",
    ) {
        let name = format!("{head}{sep}{tail}");
        prop_assert!(validate_dev_env_name(&name).is_err(), "accepted {name:?}");
    }

    /// Arbitrary keys outside the whitelist are rejected.
    #[test]
    fn prop_arbitrary_keys_rejected(key in "[a-z]{1,20}\\.[a-z_]{1,20}") {
        if !VALID_CONFIG_KEYS.contains(&key.as_str()) {
            prop_assert!(validate_config_key(&key).is_err(), "accepted invalid key: {key}");
        }
    }
}

// ============================================================================
// Refcounted uninstall
// ============================================================================

fn tool_types() -> [ToolType; 5] {
    [
        ToolType::BuildSystem,
        ToolType::Toolchain,
        ToolType::Debugger,
        ToolType::Deployer,
        ToolType::TestFramework,
    ]
}

/// Up to four DevEnvs, each picking a subset of the image pool.
fn dev_env_images() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), POOL.len()), 2..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Uninstalling the first DevEnv removes exactly the images no other
    /// DevEnv declares, and keeps every image another DevEnv declares.
    #[test]
    fn prop_uninstall_never_removes_shared_images(selection in dev_env_images()) {
        let envs: Vec<_> = selection
            .iter()
            .enumerate()
            .map(|(i, picks)| {
                let tools: Vec<(ToolType, &str)> = picks
                    .iter()
                    .zip(POOL.iter().zip(tool_types()))
                    .filter(|(picked, _)| **picked)
                    .map(|(_, (image, t))| (t, *image))
                    .collect();
                installed(dev_env(&format!("env{i}"), &tools))
            })
            .collect();

        let target = envs[0].images();
        let others: std::collections::BTreeSet<ToolImage> =
            envs[1..].iter().flat_map(|e| e.images()).collect();

        let engine = FakeEngine::with_local(&POOL);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        runtime.block_on(async {
            let mut platform = Platform::load(MemoryStore::with(collection(envs)))
                .await
                .expect("load");
            platform
                .uninstall("env0", &engine, &RecordingReporter::default())
                .await
                .expect("uninstall");
        });

        for image in &others {
            prop_assert!(engine.has(&image.reference()), "removed shared {image}");
        }
        let removed: std::collections::BTreeSet<String> = engine.removed().into_iter().collect();
        let expected: std::collections::BTreeSet<String> = target
            .difference(&others)
            .map(ToolImage::reference)
            .collect();
        prop_assert_eq!(removed, expected);
    }
}
