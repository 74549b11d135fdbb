use crate::kernel::signals::{signal_name, SIGINT, SIGQUIT, SIGTERM};

#[test]
fn test_signal_names() {
    assert_eq!(signal_name(SIGINT), "SIGINT");
    assert_eq!(signal_name(SIGTERM), "SIGTERM");
    assert_eq!(signal_name(SIGQUIT), "SIGQUIT");
    assert_eq!(signal_name(42), "UNKNOWN_SIGNAL");
}

#[cfg(unix)]
fn send_signal(name: &str) {
    let status = std::process::Command::new("kill")
        .args(["-s", name, &std::process::id().to_string()])
        .status()
        .expect("kill should run");
    assert!(status.success());
}

#[cfg(unix)]
fn wait_for(mut done: impl FnMut() -> bool) -> bool {
    use std::time::{Duration, Instant};

    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    true
}

// Kept as one test: a delivered signal reaches every live listener in the
// process, so the scenarios run one after another.
#[cfg(unix)]
#[test]
fn test_listener_lifecycle() {
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::support::{Journal, Recorder};
    use crate::kernel::bootstrap::{AppSettings, Application};
    use crate::kernel::context::StopHandle;
    use crate::kernel::signals::SignalListener;

    let idle = StopHandle::new();
    drop(SignalListener::spawn(idle.clone()).expect("listener should start"));
    assert!(!idle.is_stopping(), "Cancelling a listener must not request a stop");

    // First signal stops, the repeat escalates.
    let stop = StopHandle::new();
    let repeats = Arc::new(AtomicUsize::new(0));
    let repeated_code = Arc::new(AtomicI32::new(0));
    let mut listener = {
        let repeats = repeats.clone();
        let repeated_code = repeated_code.clone();
        SignalListener::spawn_with(stop.clone(), move |signum| {
            repeated_code.store(signum, Ordering::SeqCst);
            repeats.fetch_add(1, Ordering::SeqCst);
        })
        .expect("listener should start")
    };

    send_signal("TERM");
    assert!(wait_for(|| stop.is_stopping()));
    assert_eq!(stop.exit_code(), SIGTERM);
    assert_eq!(repeats.load(Ordering::SeqCst), 0);

    send_signal("INT");
    assert!(wait_for(|| repeats.load(Ordering::SeqCst) == 1));
    assert_eq!(repeated_code.load(Ordering::SeqCst), SIGINT);
    assert_eq!(stop.exit_code(), SIGTERM, "The first signal keeps its exit code");
    listener.shutdown();
    assert!(!idle.is_stopping());

    // A running application stops on SIGINT and cleans up once.
    let journal = Journal::default();
    let mut app = Application::with_settings(
        AppSettings::default().with_init_poll_interval(Duration::from_millis(1)),
    );
    app.add(Recorder::new("worker", &journal)).unwrap();

    let mut sent = false;
    let code = app.run_with(|_| {
        if !sent {
            sent = true;
            send_signal("INT");
        }
        std::thread::sleep(Duration::from_millis(1));
        Ok(())
    });

    assert_eq!(code, SIGINT);
    assert_eq!(journal.count("shutdown:"), 1);
    assert_eq!(journal.count("shutdown:worker:2"), 1);
    assert!(app.shutdown_report().is_some_and(|report| report.is_clean()));
}
