use midiclock::event_loop::{EventLoop, Step};
use midiclock::led::MockLed;
use midiclock::midi::{MidiMessage, MockMidiEngine};
use midiclock::song_position::SongPosition;
use midiclock::timer::{ManualTimer, ManualTimerHandle};

type TrackedLoop = EventLoop<MockMidiEngine, ManualTimer, MockLed, SongPosition>;

fn tracked_loop() -> (TrackedLoop, ManualTimerHandle) {
    let (timer, handle) = ManualTimer::with_handle();
    let mut event_loop = EventLoop::with_tracker(
        MockMidiEngine::new(),
        timer,
        MockLed::new(),
        SongPosition::new(),
    );
    send(
        &mut event_loop,
        MidiMessage::ControlChange {
            channel: 0,
            controller: 3,
            value: 80,
        },
    );
    (event_loop, handle)
}

fn send(event_loop: &mut TrackedLoop, msg: MidiMessage) {
    event_loop.midi_mut().push_inbound(msg);
    assert!(matches!(event_loop.step(), Ok(Step::Message(_))));
}

fn pulses(event_loop: &mut TrackedLoop, handle: &ManualTimerHandle, count: usize) {
    for _ in 0..count {
        handle.fire();
        assert_eq!(event_loop.step().unwrap(), Step::InternalPulse);
    }
}

#[test]
fn test_position_advances_one_sixteenth_per_six_pulses() {
    let (mut event_loop, handle) = tracked_loop();
    pulses(&mut event_loop, &handle, 30);
    assert_eq!(event_loop.song_position().sixteenths(), 5);
}

#[test]
fn test_measure_boundary_keeps_beat_aligned() {
    let (mut event_loop, handle) = tracked_loop();
    pulses(&mut event_loop, &handle, 96);
    assert_eq!(event_loop.song_position().sixteenths(), 16);
    assert_eq!(event_loop.beat().pulse_counter(), 0);
}

#[test]
fn test_no_resync_between_measure_boundaries() {
    // Resync fires when the position is a multiple of 16, never on the
    // sixteenths in between.
    let (mut event_loop, handle) = tracked_loop();
    pulses(&mut event_loop, &handle, 6);
    assert_eq!(event_loop.song_position().sixteenths(), 1);
    assert_eq!(event_loop.beat().pulse_counter(), 6);

    pulses(&mut event_loop, &handle, 6);
    assert_eq!(event_loop.beat().pulse_counter(), 12);
}

#[test]
fn test_song_position_pointer_on_boundary_resyncs() {
    let (mut event_loop, handle) = tracked_loop();
    pulses(&mut event_loop, &handle, 5);

    send(&mut event_loop, MidiMessage::SongPosition { beats: 32 });
    assert_eq!(event_loop.song_position().sixteenths(), 32);
    assert_eq!(event_loop.beat().pulse_counter(), 0);
}

#[test]
fn test_song_position_pointer_off_boundary_keeps_counter() {
    let (mut event_loop, handle) = tracked_loop();
    pulses(&mut event_loop, &handle, 5);

    send(&mut event_loop, MidiMessage::SongPosition { beats: 17 });
    assert_eq!(event_loop.song_position().sixteenths(), 17);
    assert_eq!(event_loop.beat().pulse_counter(), 5);
}

#[test]
fn test_start_rewinds_song() {
    let (mut event_loop, handle) = tracked_loop();
    pulses(&mut event_loop, &handle, 40);

    send(&mut event_loop, MidiMessage::Start);
    assert_eq!(event_loop.song_position().sixteenths(), 0);
    assert_eq!(event_loop.beat().pulse_counter(), 0);
}

#[test]
fn test_external_pulses_advance_position() {
    let (mut event_loop, _handle) = tracked_loop();
    send(&mut event_loop, MidiMessage::Start);

    for _ in 0..12 {
        send(&mut event_loop, MidiMessage::Clock);
        assert_eq!(event_loop.step().unwrap(), Step::ExternalPulse);
    }
    assert_eq!(event_loop.song_position().sixteenths(), 2);
}

#[cfg(feature = "song-position")]
#[test]
fn test_feature_wires_tracker_into_default_loop() {
    let (timer, _handle) = ManualTimer::with_handle();
    let event_loop = EventLoop::new(MockMidiEngine::new(), timer, MockLed::new());
    let tracker: &SongPosition = event_loop.song_position();
    assert_eq!(tracker.sixteenths(), 0);
}
