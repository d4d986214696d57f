use super::*;
use parking_lot::Mutex;

fn isolated() -> Arc<Bus> {
    Arc::new(Bus::new())
}

#[test]
fn delivers_value_and_sender_unchanged() {
    let sender: SenderRef = Arc::new("controller".to_owned());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let mut channel = Channel::<i32>::new("progress")
        .with_bus(isolated())
        .with_sender(Arc::clone(&sender));
    channel.subscribe(Some(Box::new(move |value, sender| {
        let label = sender
            .and_then(|sender| sender.downcast_ref::<String>())
            .cloned()
            .unwrap_or_default();
        sink.lock().push((value, label));
    })));

    assert_eq!(channel.name(), "progress");
    channel.post(42);

    assert_eq!(*seen.lock(), vec![(42, "controller".to_owned())]);
}

#[test]
fn unsubscribed_channel_delivers_nothing() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let mut channel = Channel::<i32>::new("progress").with_bus(isolated());
    channel.post(1);

    channel.subscribe(Some(Box::new(move |value, _| sink.lock().push(value))));
    channel.unsubscribe();
    channel.post(2);

    assert!(seen.lock().is_empty());
    assert!(!channel.is_subscribed());
}

#[test]
fn resubscribe_replaces_the_handler() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut channel = Channel::<i32>::new("progress").with_bus(isolated());
    let sink = Arc::clone(&seen);
    channel.subscribe(Some(Box::new(move |value, _| {
        sink.lock().push(("first", value))
    })));
    let sink = Arc::clone(&seen);
    channel.subscribe(Some(Box::new(move |value, _| {
        sink.lock().push(("second", value))
    })));

    channel.post(5);

    assert_eq!(*seen.lock(), vec![("second", 5)]);
}

#[test]
fn subscribe_none_acts_as_unsubscribe() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let mut channel = Channel::<i32>::new("progress").with_bus(isolated());
    channel.subscribe(Some(Box::new(move |value, _| sink.lock().push(value))));
    channel.subscribe(None);
    channel.post(5);

    assert!(seen.lock().is_empty());
    assert!(!channel.is_subscribed());
}

#[test]
fn type_mismatch_is_reported_not_delivered() {
    let bus = isolated();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let strings = Arc::new(Mutex::new(Vec::new()));

    let error_sink = Arc::clone(&errors);
    let string_sink = Arc::clone(&strings);
    let mut text = Channel::<String>::new("mixed")
        .with_bus(Arc::clone(&bus))
        .with_mismatch_hook(move |error| error_sink.lock().push(error));
    text.subscribe(Some(Box::new(move |value, _| string_sink.lock().push(value))));

    let numbers = Channel::<i32>::new("mixed").with_bus(bus);
    numbers.post(3);

    assert!(strings.lock().is_empty());
    let errors = errors.lock();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].channel, "mixed");
    assert_eq!(errors[0].expected, any::type_name::<String>());
    assert_eq!(errors[0].actual, any::type_name::<i32>());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "type mismatch on channel \"crossed\"")]
fn default_hook_is_fatal_in_debug_builds() {
    let bus = isolated();

    let mut text = Channel::<String>::new("crossed").with_bus(Arc::clone(&bus));
    text.subscribe(Some(Box::new(|_, _| {})));

    Channel::<i32>::new("crossed").with_bus(bus).post(3);
}

#[test]
fn drop_unregisters_from_the_bus() {
    let bus = isolated();
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let sink = Arc::clone(&seen);
        let mut doomed = Channel::<i32>::new("lifeline").with_bus(Arc::clone(&bus));
        doomed.subscribe(Some(Box::new(move |value, _| {
            sink.lock().push(("old", value))
        })));
    }

    let sink = Arc::clone(&seen);
    let mut fresh = Channel::<i32>::new("lifeline").with_bus(bus);
    fresh.subscribe(Some(Box::new(move |value, _| {
        sink.lock().push(("new", value))
    })));
    fresh.post(1);

    assert_eq!(*seen.lock(), vec![("new", 1)]);
}

#[test]
fn unsubscribe_is_idempotent() {
    let mut channel = Channel::<()>::new("quiet").with_bus(isolated());

    channel.unsubscribe();
    channel.unsubscribe();

    assert!(!channel.is_subscribed());
}

#[test]
fn same_name_instances_form_one_topic() {
    let bus = isolated();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let mut first = Channel::<i32>::new("telemetry").with_bus(Arc::clone(&bus));
    first.subscribe(Some(Box::new(move |value, _| {
        sink.lock().push(("first", value))
    })));

    let sink = Arc::clone(&seen);
    let mut second = Channel::<i32>::new("telemetry").with_bus(bus);
    second.subscribe(Some(Box::new(move |value, _| {
        sink.lock().push(("second", value))
    })));

    first.post(9);

    let mut seen = seen.lock().clone();
    seen.sort();
    assert_eq!(seen, vec![("first", 9), ("second", 9)]);
}

#[test]
fn channel_without_sender_passes_none() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let mut channel = Channel::<u8>::new("plain").with_bus(isolated());
    channel.subscribe(Some(Box::new(move |value, sender| {
        sink.lock().push((value, sender.is_none()))
    })));

    channel.post(1);

    assert_eq!(*seen.lock(), vec![(1, true)]);
}

#[test]
#[should_panic(expected = "channel name must be non-empty")]
fn empty_name_is_rejected() {
    let _ = Channel::<i32>::new("");
}

#[test]
fn declared_topics_build_channels_on_the_global_bus() {
    crate::declare! {
        /// Test-only heartbeat topic.
        channel Heartbeat(u8);
    }

    assert_eq!(Heartbeat::NAME, "Heartbeat");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut channel = Heartbeat::channel();
    channel.subscribe(Some(Box::new(move |value, _| sink.lock().push(value))));

    Heartbeat::channel().post(3);

    assert_eq!(*seen.lock(), vec![3]);
}
