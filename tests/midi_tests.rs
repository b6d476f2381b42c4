use midiclock::midi::{MidiEngine, MidiError, MidiMessage, MockMidiEngine};
use std::error::Error;

#[test]
fn test_system_message_parsing() {
    assert_eq!(MidiMessage::from_bytes(&[0xF8]), Some(MidiMessage::Clock));
    assert_eq!(MidiMessage::from_bytes(&[0xFA]), Some(MidiMessage::Start));
    assert_eq!(MidiMessage::from_bytes(&[0xFC]), Some(MidiMessage::Stop));
    assert_eq!(MidiMessage::from_bytes(&[0xFB]), Some(MidiMessage::Continue));

    // Verify channel messages still work
    assert_eq!(
        MidiMessage::from_bytes(&[0x90, 60, 100]),
        Some(MidiMessage::NoteOn {
            channel: 0,
            note: 60,
            velocity: 100
        })
    );
}

#[test]
fn test_tempo_message_parsing() {
    assert_eq!(
        MidiMessage::from_bytes(&[0xB5, 3, 20]),
        Some(MidiMessage::ControlChange {
            channel: 5,
            controller: 3,
            value: 20
        })
    );
    assert_eq!(
        MidiMessage::from_bytes(&[0xCE, 0]),
        Some(MidiMessage::ProgramChange {
            channel: 14,
            program: 0
        })
    );
}

#[test]
fn test_song_position_pointer() {
    // 0x0101 = 129 sixteenths
    assert_eq!(
        MidiMessage::from_bytes(&[0xF2, 0x01, 0x01]),
        Some(MidiMessage::SongPosition { beats: 129 })
    );
    assert_eq!(
        MidiMessage::SongPosition { beats: 16383 }.to_bytes(),
        vec![0xF2, 0x7F, 0x7F]
    );
}

#[test]
fn test_unsupported_and_truncated_data() {
    assert_eq!(MidiMessage::from_bytes(&[]), None);
    assert_eq!(MidiMessage::from_bytes(&[0xB0, 3]), None);
    assert_eq!(MidiMessage::from_bytes(&[0xF2, 0x01]), None);
    assert_eq!(MidiMessage::from_bytes(&[0xFE]), None);
    assert_eq!(MidiMessage::from_bytes(&[0xE0, 0, 64]), None);
}

#[test]
fn test_clock_encoding() {
    assert_eq!(MidiMessage::Clock.to_bytes(), vec![0xF8]);
    assert!(MidiMessage::Clock.is_realtime());
    assert!(!MidiMessage::SongPosition { beats: 0 }.is_realtime());
}

#[test]
fn test_midi_error_display() {
    let send_error = MidiError::SendError("Failed to send".to_string());
    let recv_error = MidiError::RecvError("Failed to receive".to_string());
    let conn_error = MidiError::ConnectionError("Failed to connect".to_string());

    assert_eq!(send_error.to_string(), "MIDI send error: Failed to send");
    assert_eq!(
        recv_error.to_string(),
        "MIDI receive error: Failed to receive"
    );
    assert_eq!(
        conn_error.to_string(),
        "MIDI connection error: Failed to connect"
    );
}

#[test]
fn test_midi_error_as_error() {
    let error = MidiError::SendError("test error".to_string());
    let _: &dyn Error = &error; // Verify it implements Error trait
}

#[test]
fn test_mock_engine_queues_and_records() {
    let mut engine = MockMidiEngine::new();
    assert_eq!(engine.poll(), Ok(None));

    engine.push_inbound(MidiMessage::Start);
    engine.push_inbound(MidiMessage::Clock);
    assert_eq!(engine.poll(), Ok(Some(MidiMessage::Start)));
    assert_eq!(engine.poll(), Ok(Some(MidiMessage::Clock)));
    assert_eq!(engine.poll(), Ok(None));

    engine.send(MidiMessage::Clock).unwrap();
    assert_eq!(engine.sent(), &[MidiMessage::Clock]);
    assert_eq!(engine.list_devices().len(), 2);
}
