use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use macshift_common::error::{MacshiftError, MutationStep};
use macshift_common::models::mac::parse_mac;
use macshift_common::vendors::StaticVendorTable;
use macshift_core::generator::AddressGenerator;
use macshift_core::inspector::ScrapingInspector;
use macshift_core::mutator::Confirmation;
use macshift_core::platform::{Ifconfig, IpRoute2};
use macshift_core::service::{Action, MacService, Outcome, RestoreOutcome, Target};
use macshift_integration_tests::fake_host::FakeHost;
use macshift_integration_tests::memory_backups::MemoryBackups;
use pnet::util::MacAddr;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tracing_subscriber::fmt::MakeWriter;

/*************************************************************
                        Helpers
**************************************************************/

fn mac(s: &str) -> MacAddr {
    parse_mac(s).unwrap()
}

fn generator() -> AddressGenerator<StdRng> {
    AddressGenerator::with_rng(StdRng::seed_from_u64(0x5eed), 64)
}

/// Collects formatted log lines in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

fn host() -> FakeHost {
    FakeHost::new()
        .with_link("lo", "00:00:00:00:00:00")
        .with_link("eth0", "aa:bb:cc:dd:ee:ff")
        .with_link("eth1", "52:54:00:12:34:56")
        .with_link("wlan0", "11:22:33:44:55:66")
}

/*************************************************************
                      One-shot changes
**************************************************************/

#[tokio::test]
async fn manual_change_on_wlan0() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let current = service.current_address("wlan0").unwrap();
    assert_eq!(current, mac("11:22:33:44:55:66"));

    let target = mac("00:14:22:aa:bb:cc");
    let outcome = service
        .dispatch("wlan0", current, Action::Change(Target::Manual(target)), &mut generator())
        .await
        .unwrap();

    let Outcome::Changed(report) = outcome else {
        panic!("expected a change, got {outcome:?}");
    };
    assert_eq!(report.before, mac("11:22:33:44:55:66"));
    assert_eq!(report.applied, target);
    assert_eq!(report.after, Some(target));
    assert_eq!(report.vendor, "Dell");
    assert_eq!(report.confirmation, Confirmation::Confirmed);

    assert_eq!(backups.snapshot()["wlan0"].original_mac, mac("11:22:33:44:55:66"));
    assert_eq!(
        host.mutations(),
        vec![
            "ip link set wlan0 down",
            "ip link set wlan0 address 00:14:22:aa:bb:cc",
            "ip link set wlan0 up",
        ]
    );
    assert!(host.is_up("wlan0"));
}

#[tokio::test]
async fn random_change_differs_from_current() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let current = service.current_address("eth0").unwrap();
    let outcome = service
        .dispatch("eth0", current, Action::Change(Target::Random), &mut generator())
        .await
        .unwrap();

    let Outcome::Changed(report) = outcome else {
        panic!("expected a change, got {outcome:?}");
    };
    assert_ne!(report.applied, current);
    assert_eq!(host.mac_of("eth0"), Some(report.applied));
    assert_ne!(report.vendor, "Unknown");
}

#[test]
fn change_reads_the_address_back_once() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let report = service
        .change("eth0", mac("aa:bb:cc:dd:ee:ff"), Target::Random, &mut generator())
        .unwrap();

    let reads: Vec<String> = host
        .commands()
        .into_iter()
        .filter(|c| c.starts_with("ip link show"))
        .collect();
    assert_eq!(reads, vec!["ip link show eth0"]);
    assert_eq!(report.after, Some(report.applied));
    assert_eq!(report.confirmation, Confirmation::Confirmed);
}

#[tokio::test]
async fn manual_target_equal_to_current_is_replaced() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let current = mac("AA:BB:CC:DD:EE:FF");
    let outcome = service
        .dispatch("eth0", current, Action::Change(Target::Manual(current)), &mut generator())
        .await
        .unwrap();

    let Outcome::Changed(report) = outcome else {
        panic!("expected a change, got {outcome:?}");
    };
    assert_ne!(report.applied, current);
}

#[tokio::test]
async fn legacy_ifconfig_path() {
    let host = host();
    let platform = Ifconfig;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    assert_eq!(service.interfaces().unwrap(), vec!["lo", "eth0", "eth1", "wlan0"]);

    let current = service.current_address("eth1").unwrap();
    let target = mac("00:40:96:01:02:03");
    let outcome = service
        .dispatch("eth1", current, Action::Change(Target::Manual(target)), &mut generator())
        .await
        .unwrap();

    let Outcome::Changed(report) = outcome else {
        panic!("expected a change, got {outcome:?}");
    };
    assert_eq!(report.vendor, "Cisco");
    assert_eq!(report.confirmation, Confirmation::Confirmed);
    assert_eq!(
        host.mutations(),
        vec![
            "ifconfig eth1 down",
            "ifconfig eth1 hw ether 00:40:96:01:02:03",
            "ifconfig eth1 up",
        ]
    );
}

#[tokio::test]
async fn silently_ignored_change_is_a_mismatch() {
    let host = host();
    host.ignore_address_changes();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let current = service.current_address("eth0").unwrap();
    let report = service
        .change("eth0", current, Target::Manual(mac("00:14:22:00:00:01")), &mut generator())
        .unwrap();

    assert_eq!(report.after, Some(current));
    assert_eq!(report.confirmation, Confirmation::Mismatch { observed: current });
}

#[tokio::test]
async fn failed_step_is_reported_and_not_rolled_back() {
    let host = host();
    host.fail_on("address");
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let current = service.current_address("eth0").unwrap();
    let err = service
        .dispatch("eth0", current, Action::Change(Target::Random), &mut generator())
        .await
        .unwrap_err();

    match err {
        MacshiftError::Mutation(e) => assert_eq!(e.step, MutationStep::SetAddress),
        other => panic!("unexpected error: {other}"),
    }
    // The backup was taken before the attempt and the link stays down.
    assert_eq!(backups.saves(), 1);
    assert!(!host.is_up("eth0"));
    assert_eq!(host.mac_of("eth0"), Some(current));
}

#[tokio::test]
async fn show_does_not_touch_anything() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let current = service.current_address("eth0").unwrap();
    let outcome = service
        .dispatch("eth0", current, Action::Show, &mut generator())
        .await
        .unwrap();

    let Outcome::Shown { vendor, backup } = outcome else {
        panic!("expected show, got {outcome:?}");
    };
    assert_eq!(vendor, "Unknown");
    assert!(backup.is_none());
    assert_eq!(backups.saves(), 0);
    assert!(host.mutations().is_empty());
    assert_eq!(host.commands(), vec!["ip link show eth0"]);
}

/*************************************************************
                         Discovery
**************************************************************/

#[test]
fn unknown_interface_has_no_address() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    assert!(matches!(
        service.current_address("eth9"),
        Err(MacshiftError::AddressUnavailable { interface }) if interface == "eth9"
    ));
    assert!(matches!(
        service.current_address("lo"),
        Err(MacshiftError::AddressUnavailable { .. })
    ));
}

#[test]
fn empty_host_is_a_discovery_failure() {
    let host = FakeHost::new();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    assert!(matches!(service.interfaces(), Err(MacshiftError::NoInterfaces)));
}

/*************************************************************
                          Restore
**************************************************************/

#[tokio::test]
async fn restore_reapplies_the_backed_up_address() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    service.backup("eth0", mac("aa:bb:cc:dd:ee:ff")).unwrap();
    service
        .change("eth0", mac("aa:bb:cc:dd:ee:ff"), Target::Random, &mut generator())
        .unwrap();
    let changed = host.mac_of("eth0").unwrap();
    let before_restore = host.mutations().len();

    let current = service.current_address("eth0").unwrap();
    assert_eq!(current, changed);
    let outcome = service
        .dispatch("eth0", current, Action::Restore, &mut generator())
        .await
        .unwrap();

    let Outcome::Restored(restored) = outcome else {
        panic!("expected restore, got {outcome:?}");
    };
    assert_eq!(
        restored,
        RestoreOutcome::Restored {
            original: mac("aa:bb:cc:dd:ee:ff"),
            confirmation: Confirmation::Confirmed,
        }
    );
    assert_eq!(
        host.mutations()[before_restore..],
        [
            "ip link set eth0 down",
            "ip link set eth0 address aa:bb:cc:dd:ee:ff",
            "ip link set eth0 up",
        ]
    );
    // Restore never takes a backup of its own.
    assert_eq!(backups.saves(), 1);
}

#[tokio::test]
async fn restore_without_backup_changes_nothing() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let current = service.current_address("eth1").unwrap();
    let outcome = service
        .dispatch("eth1", current, Action::Restore, &mut generator())
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Restored(RestoreOutcome::NoBackup)));
    assert!(host.mutations().is_empty());
}

#[test]
fn restore_with_corrupt_store_reports_no_backup() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    backups.corrupt();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    assert_eq!(service.restore("eth0").unwrap(), RestoreOutcome::NoBackup);
    assert!(host.mutations().is_empty());
}

#[test]
fn second_backup_replaces_the_first() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    service.backup("eth0", mac("aa:bb:cc:dd:ee:ff")).unwrap();
    service.backup("eth0", mac("00:14:22:00:00:01")).unwrap();

    let snapshot = backups.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot["eth0"].original_mac, mac("00:14:22:00:00:01"));
}

#[test]
fn backup_over_corrupt_store_starts_fresh() {
    let host = host();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    backups.corrupt();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    service.backup("wlan0", mac("11:22:33:44:55:66")).unwrap();
    assert_eq!(backups.snapshot()["wlan0"].original_mac, mac("11:22:33:44:55:66"));
}

/*************************************************************
                          Rotation
**************************************************************/

#[tokio::test(start_paused = true)]
async fn rotation_on_eth1_stops_after_second_tick() {
    let host = host();
    let (tx, rx) = watch::channel(false);
    host.stop_after_sets(2, tx);
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let original = service.current_address("eth1").unwrap();
    let (logs, _guard) = capture_logs();
    let started = tokio::time::Instant::now();
    let outcome = service
        .dispatch(
            "eth1",
            original,
            Action::Rotate {
                interval: Duration::from_secs(5),
                stop: rx,
            },
            &mut generator(),
        )
        .await
        .unwrap();

    let Outcome::Rotated(summary) = outcome else {
        panic!("expected rotation, got {outcome:?}");
    };
    assert_eq!(summary.applied.len(), 2);
    assert_eq!(summary.failed_ticks, 0);
    assert_ne!(summary.applied[0], original);
    assert_ne!(summary.applied[0], summary.applied[1]);
    assert_eq!(host.mac_of("eth1"), Some(summary.applied[1]));

    // Two full down/set/up cycles and a single backup taken before the first.
    assert_eq!(host.mutations().len(), 6);
    assert_eq!(backups.saves(), 1);
    assert_eq!(backups.snapshot()["eth1"].original_mac, original);

    // One interval slept between the ticks, none after the stop.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(10), "{elapsed:?}");

    // The stop is announced once, after the last tick.
    let text = logs.text();
    assert_eq!(text.matches("Rotated MAC: ").count(), 2, "{text}");
    assert_eq!(text.matches("Rotation stopped by user.").count(), 1, "{text}");
    let last_tick = text.rfind("Rotated MAC: ").unwrap();
    let stop = text.find("Rotation stopped by user.").unwrap();
    assert!(last_tick < stop, "{text}");
}

#[tokio::test(start_paused = true)]
async fn failing_tick_is_counted_and_rotation_continues_until_stopped() {
    let host = host();
    host.fail_on("down");
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let platform = IpRoute2;
    let inspector = ScrapingInspector::new(&host, &platform);
    let backups = MemoryBackups::new();
    let service = MacService::new(&host, &platform, &inspector, &StaticVendorTable, &backups);

    let original = service.current_address("eth0").unwrap();
    let outcome = service
        .dispatch(
            "eth0",
            original,
            Action::Rotate {
                interval: Duration::from_secs(1),
                stop: rx,
            },
            &mut generator(),
        )
        .await
        .unwrap();

    let Outcome::Rotated(summary) = outcome else {
        panic!("expected rotation, got {outcome:?}");
    };
    assert!(summary.applied.is_empty());
    assert_eq!(summary.failed_ticks, 1);
    assert_eq!(host.mac_of("eth0"), Some(original));
}
