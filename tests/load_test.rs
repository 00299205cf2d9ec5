//! Load and concurrency tests for the shared configuration handle.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use service_conf::config::schema::{DbConfig, DispatcherConfig, MemcacheConfig, RegionInfo, SqlConfig};
use service_conf::config::{
    ConfigCenter, FileCenter, FileCenterOptions, Loader, ServiceConfig, SharedConfig,
};
use service_conf::lifecycle::{self, Shutdown};

mod common;

#[test]
fn test_proxy_only_file() {
    let (_dir, path) = common::write_config("app.toml", "Proxy = true\n");
    let loader = Loader::new(SharedConfig::<ServiceConfig>::new());

    let config = loader.load_file(&path).unwrap();

    assert_eq!(
        *config,
        ServiceConfig {
            proxy: true,
            ..Default::default()
        }
    );
}

#[test]
fn test_encoded_record_loads_back() {
    let mut oauth = BTreeMap::new();
    oauth.insert("1001".to_string(), "http://oauth.example/1001".to_string());
    let record = ServiceConfig {
        proxy: true,
        account_uri: "http://account.example".into(),
        passport_uri: "http://passport.example".into(),
        db: Some(DbConfig {
            cloud: Some(SqlConfig {
                addr: "10.0.0.1:3306".into(),
                dsn: "user:pass@tcp(10.0.0.1:3306)/passport".into(),
                active: 10,
                idle: 5,
                idle_timeout: Duration::from_secs(60),
                query_timeout: Duration::from_millis(250),
                ..Default::default()
            }),
            other_region: None,
        }),
        memcache: Some(MemcacheConfig {
            addr: "127.0.0.1:11211".into(),
            expire: Duration::from_secs(3600),
            ..Default::default()
        }),
        dispatcher: Some(DispatcherConfig {
            name: "game".into(),
            oauth,
            renew_token: BTreeMap::new(),
            region_infos: vec![RegionInfo {
                region: "sea".into(),
                app_id: 1001,
                app_key: "k1".into(),
            }],
        }),
        ..Default::default()
    };

    let text = toml::to_string(&record).unwrap();
    let (_dir, path) = common::write_config("app.toml", &text);
    let loaded = Loader::new(SharedConfig::<ServiceConfig>::new())
        .load_file(&path)
        .unwrap();

    assert_eq!(*loaded, record);
}

#[test]
fn test_repeated_load_is_stable() {
    let (_dir, path) = common::write_config(
        "app.toml",
        "Proxy = true\nAccountURI = \"http://account.example\"\n[Memcache]\nAddr = \"127.0.0.1:11211\"\n",
    );
    let shared = SharedConfig::<ServiceConfig>::new();
    let loader = Loader::new(shared.clone());

    let first = loader.load_file(&path).unwrap();
    let after_first = shared.load();
    let second = loader.load_file(&path).unwrap();

    assert_eq!(*first, *second);
    assert_eq!(*after_first, *shared.load());
}

fn numbered(n: u32) -> ServiceConfig {
    let tag = n.to_string();
    ServiceConfig {
        proxy: n % 2 == 1,
        account_uri: tag.clone(),
        passport_uri: tag.clone(),
        dispatcher: Some(DispatcherConfig {
            name: tag,
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn test_readers_never_see_torn_record() {
    const SWAPS: u32 = 2_000;
    const READERS: usize = 4;

    let shared = SharedConfig::with_value(numbered(0));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let shared = shared.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut reads = 0u64;
                loop {
                    let config = shared.load();
                    let n: u32 = config.account_uri.parse().unwrap();
                    assert!(n <= SWAPS);
                    assert_eq!(*config, numbered(n), "torn read at value {}", n);
                    reads += 1;
                    if done.load(Ordering::Acquire) {
                        break;
                    }
                }
                reads
            })
        })
        .collect();

    for n in 1..=SWAPS {
        shared.store(numbered(n));
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(*shared.load(), numbered(SWAPS));
}

#[tokio::test]
async fn test_file_center_reload_on_publish() {
    let (dir, path) = common::write_config("app.toml", "AccountURI = \"v1\"\n");
    let shutdown = Shutdown::new();
    let options = FileCenterOptions {
        path: path.clone(),
        poll_interval: Duration::from_millis(100),
    };

    let started = lifecycle::init::<ServiceConfig, _, _>(
        SharedConfig::new(),
        "",
        || FileCenter::connect(options),
        &shutdown,
    )
    .unwrap();
    assert_eq!(started.shared.load().account_uri, "v1");
    let watcher = started.watcher.unwrap();

    // Give the OS watcher a moment to register before writing.
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(&path, "AccountURI = \"v2\"\n").unwrap();

    let shared = started.shared.clone();
    assert!(
        common::wait_until(Duration::from_secs(5), || shared.load().account_uri == "v2").await
    );

    // Other files in the directory don't trigger reloads.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let reloads = watcher.reloads();
    std::fs::write(dir.path().join("unrelated.txt"), "x").unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(watcher.reloads(), reloads);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), watcher.join())
        .await
        .unwrap()
        .unwrap();
}

#[test]
fn test_file_center_fetch_tracks_file() {
    let (_dir, path) = common::write_config("app.toml", "Proxy = true\n");
    let center = FileCenter::connect(FileCenterOptions::new(&path)).unwrap();

    assert_eq!(center.path(), path.as_path());
    assert_eq!(center.fetch().as_deref(), Some("Proxy = true\n"));

    std::fs::remove_file(&path).unwrap();
    assert!(center.fetch().is_none());
}
