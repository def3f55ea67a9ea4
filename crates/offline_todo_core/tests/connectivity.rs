use offline_todo_core::{
    Connectivity, ConnectivityMonitor, ConnectivityPlatform, ManualConnectivity, OFFLINE_BANNER,
};

#[test]
fn mount_reads_current_status() {
    let mut platform = ManualConnectivity::new(false);
    let mut monitor = ConnectivityMonitor::new();
    assert!(monitor.is_online());

    assert!(monitor.mount(&mut platform));
    assert_eq!(monitor.status(), Connectivity::Offline);
    assert_eq!(monitor.banner(), Some(OFFLINE_BANNER));
}

#[test]
fn events_update_status_synchronously() {
    let mut platform = ManualConnectivity::new(true);
    let mut monitor = ConnectivityMonitor::new();
    monitor.mount(&mut platform);
    assert_eq!(monitor.banner(), None);

    platform.set_online(false);
    assert_eq!(monitor.status(), Connectivity::Offline);
    platform.set_online(true);
    assert!(monitor.is_online());
    assert_eq!(monitor.banner(), None);
}

#[test]
fn listener_is_registered_once_and_removed_on_teardown() {
    let mut platform = ManualConnectivity::new(true);
    let mut monitor = ConnectivityMonitor::new();

    assert!(monitor.mount(&mut platform));
    assert!(!monitor.mount(&mut platform));
    assert_eq!(platform.listener_count(), 1);

    assert!(monitor.teardown(&mut platform));
    assert!(!monitor.teardown(&mut platform));
    assert_eq!(platform.listener_count(), 0);
    assert!(!monitor.is_mounted());

    platform.set_online(false);
    assert!(monitor.is_online(), "unmounted monitor must not observe events");

    assert!(monitor.mount(&mut platform));
    assert_eq!(platform.listener_count(), 1);
    assert_eq!(monitor.status(), Connectivity::Offline);
}

#[test]
fn remove_listener_reports_unknown_ids() {
    let mut platform = ManualConnectivity::new(true);
    let id = platform.add_listener(Box::new(|_| {}));
    assert!(platform.remove_listener(id));
    assert!(!platform.remove_listener(id));
}
