// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT
use std::io::Write;

use forest_mpool::chain::{ChainStore, ChainStoreConfig};
use forest_mpool::db::MemoryDB;
use forest_mpool::logger::setup_logger;
use forest_mpool::{Config, MessagePool};

#[test]
fn configuration_file_drives_the_components() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[chain]
head_change_capacity = 4

[mpool]
verify_signatures = false

[log]
default_level = "warn"
filters = [{{ module = "forest_mpool::message_pool", level = "trace" }}]
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(
        config.chain,
        ChainStoreConfig {
            head_change_capacity: 4
        }
    );
    assert!(!config.mpool.verify_signatures);

    let mpool = MessagePool::new(config.mpool.clone());
    assert!(!mpool.config().verify_signatures);
    let cs = ChainStore::new(std::sync::Arc::new(MemoryDB::default()), &config.chain);
    assert!(cs.heaviest_tipset().is_empty());

    // Only one global subscriber can be installed per process.
    setup_logger(&config.log).unwrap();
    assert!(setup_logger(&config.log).is_err());
}

#[test]
fn malformed_configuration_is_rejected() {
    assert!(Config::from_toml_str("[mpool]\nverify_signatures = 3").is_err());
}
