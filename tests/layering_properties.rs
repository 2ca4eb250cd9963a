//! Property tests for path layering, merge precedence and key filtering.

use proptest::collection::{hash_map, hash_set};
use proptest::prelude::*;
use ssm_config_provider::core::{
    KeyFilter, LayerMerger, MergedConfig, MissingKeyPolicy, PathBuilder,
};
use ssm_config_provider::sources::InMemoryParameterStore;
use std::collections::{HashMap, HashSet};

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_.-]{1,12}"
}

fn layer() -> impl Strategy<Value = HashMap<String, String>> {
    hash_map("[a-e]{1,2}", "[a-z ]{0,8}", 0..6)
}

fn store_with(layers: &[(&str, &HashMap<String, String>)]) -> InMemoryParameterStore {
    layers
        .iter()
        .fold(InMemoryParameterStore::new(), |store, (path, params)| {
            params.iter().fold(store, |store, (name, value)| {
                store.with_parameter(*path, name.clone(), value.clone())
            })
        })
}

proptest! {
    #[test]
    fn prefixed_paths_have_fixed_shape(path in segment(), environment in segment()) {
        let paths = PathBuilder::new(Some(environment.as_str()), true).layer_paths(&path).unwrap();
        prop_assert_eq!(
            paths,
            vec![
                "/global/".to_string(),
                format!("/{}/", environment),
                format!("/{}/{}/", environment, path),
            ]
        );
    }

    #[test]
    fn unprefixed_paths_have_fixed_shape(path in segment()) {
        let paths = PathBuilder::new(None, false).layer_paths(&path).unwrap();
        prop_assert_eq!(paths, vec!["/global/".to_string(), format!("/{}/", path)]);
    }

    #[test]
    fn later_layer_wins_and_union_is_kept(earlier in layer(), later in layer()) {
        let store = store_with(&[("/global/", &earlier), ("/path/", &later)]);
        let merged = LayerMerger::new(&store).merge(&["/global/", "/path/"]).unwrap();

        for (key, value) in &later {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        for (key, value) in &earlier {
            if !later.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
        let expected: HashSet<&String> = earlier.keys().chain(later.keys()).collect();
        let actual: HashSet<&String> = merged.keys().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn non_empty_filter_yields_exact_key_set(
        merged in layer(),
        requested in hash_set("[a-g]{1,2}", 1..6),
    ) {
        let data = KeyFilter::new(MissingKeyPolicy::Marker).apply(merged.clone(), &requested);

        let actual: HashSet<String> = data.keys().cloned().collect();
        prop_assert_eq!(&actual, &requested);
        for key in &requested {
            prop_assert_eq!(data[key].as_ref(), merged.get(key));
        }
    }

    #[test]
    fn empty_filter_is_identity(merged in layer()) {
        let data = KeyFilter::default().apply(merged.clone(), &HashSet::new());
        prop_assert!(data.values().all(Option::is_some));

        let unwrapped: MergedConfig = data
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or_default()))
            .collect();
        prop_assert_eq!(unwrapped, merged);
    }
}
