//! Surface integration tests: full event flows through dispatch, the page
//! machine, the display synchronizer and the LED mirror.

use super::host::HostEvent;
use super::Surface;
use crate::bindings::{BoundEndpoint, ControlRef};
use crate::config::AppConfig;
use crate::display::DISPLAY_HEADER;
use crate::jog::CommandSink;
use crate::midi::MidiMessage;
use crate::pages::PageId;
use crate::state::{KEY_ACTIVE_PAGE, KEY_ACTIVE_SUBPAGE, KEY_DISPLAY_TYPE};
use crate::testing::SharedOut;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

fn test_surface() -> (Surface, SharedOut, SharedOut) {
    let main = SharedOut::new();
    let cc = SharedOut::new();
    let surface = Surface::new(
        Box::new(main.clone()),
        Box::new(cc.clone()),
        AppConfig::with_defaults().midi_page,
    );
    (surface, main, cc)
}

fn is_row_packet(data: &[u8]) -> bool {
    data.len() == 64 && data[..6] == DISPLAY_HEADER
}

fn is_indicator_packet(data: &[u8]) -> bool {
    data.len() == 9 && data[..6] == DISPLAY_HEADER
}

fn row_payload(data: &[u8]) -> &[u8] {
    &data[7..63]
}

fn note_on(note: u8) -> MidiMessage {
    MidiMessage::NoteOn {
        channel: 0,
        note,
        velocity: 127,
    }
}

/// Endpoint whose value can be observed from outside the registry
#[derive(Clone)]
struct SharedEndpoint {
    value: Arc<Mutex<f64>>,
}

impl SharedEndpoint {
    fn new(initial: f64) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial)),
        }
    }

    fn get(&self) -> f64 {
        *self.value.lock().unwrap()
    }
}

impl BoundEndpoint for SharedEndpoint {
    fn current_value(&self) -> f64 {
        self.get()
    }
    fn set_value(&mut self, value: f64) {
        *self.value.lock().unwrap() = value;
    }
}

#[derive(Clone, Default)]
struct CountingSink {
    pulses: Arc<AtomicU32>,
}

impl CountingSink {
    fn count(&self) -> u32 {
        self.pulses.load(Ordering::SeqCst)
    }
}

impl CommandSink for CountingSink {
    fn pulse(&mut self) {
        self.pulses.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_activation_sequence() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();

    let sent = main.sent();

    // Every LED is darkened first: 45 Note On velocity 0 messages
    assert!(sent.len() > 45);
    for msg in &sent[..45] {
        assert_eq!(msg[0], 0x90);
        assert_eq!(msg[2], 0);
    }

    assert_eq!(surface.active_page(), PageId::Mixer);
    assert_eq!(surface.state().get(KEY_ACTIVE_PAGE), "Mixer");
    assert_eq!(surface.state().get(KEY_ACTIVE_SUBPAGE), "Default");
    assert_eq!(surface.state().get(KEY_DISPLAY_TYPE), "Fader");

    // Both indicator slots are refreshed: zoom area 'Z', jog area 'N'
    let ind1 = sent
        .iter()
        .find(|p| is_indicator_packet(p) && p[6] == 111)
        .unwrap();
    assert_eq!(ind1[7], b'Z');
    let ind2 = sent
        .iter()
        .find(|p| is_indicator_packet(p) && p[6] == 55)
        .unwrap();
    assert_eq!(ind2[7], b'N');
}

#[test]
fn test_fader_title_lands_in_column() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();
    main.clear();

    surface
        .on_host_event(&HostEvent::FaderTitle {
            index: 3,
            object_title: "Gain".to_string(),
            value_title: "0.0".to_string(),
        })
        .unwrap();

    // Physical row 1 carries the title row; column 3 starts at offset 21
    let row1 = main
        .sent()
        .into_iter()
        .find(|p| is_row_packet(p) && p[6] == 56)
        .unwrap();
    assert_eq!(&row_payload(&row1)[21..27], b"Gain  ");
}

#[test]
fn test_page_cycle_buttons() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();
    main.clear();

    surface.on_midi(&note_on(49)).unwrap();
    assert_eq!(surface.active_page(), PageId::SelectedTrack);
    assert_eq!(surface.state().get(KEY_ACTIVE_SUBPAGE), "SendsQC");

    // The sends subpage LED (rec note 0) is lit after the clear sequence
    let sent = main.sent();
    let last_note_0 = sent
        .iter()
        .filter(|m| m.len() == 3 && m[0] == 0x90 && m[1] == 0)
        .next_back()
        .unwrap();
    assert_eq!(last_note_0[2], 127);

    surface.on_midi(&note_on(48)).unwrap();
    assert_eq!(surface.active_page(), PageId::Mixer);
}

#[test]
fn test_subpage_switch_resets_scope() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();
    surface.on_midi(&note_on(49)).unwrap(); // SelectedTrack / SendsQC

    surface
        .on_host_event(&HostEvent::QuickControlTitle {
            index: 0,
            value_title: "Cutoff".to_string(),
        })
        .unwrap();
    main.clear();

    // EQ subpage button: LED pattern switches and the scope starts blank
    surface.on_midi(&note_on(1)).unwrap();
    assert_eq!(surface.state().get(KEY_ACTIVE_SUBPAGE), "EQ");

    let sent = main.sent();
    assert!(sent
        .iter()
        .any(|m| m.len() == 3 && m[0] == 0x90 && m[1] == 1 && m[2] == 127));
    assert!(sent
        .iter()
        .any(|m| m.len() == 3 && m[0] == 0x90 && m[1] == 0 && m[2] == 0));

    let row1 = sent
        .iter()
        .find(|p| is_row_packet(p) && p[6] == 56)
        .unwrap();
    assert!(row_payload(row1).iter().all(|&b| b == b' '));
}

#[test]
fn test_display_mode_toggle() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();
    main.clear();

    surface.on_midi(&note_on(84)).unwrap();
    assert_eq!(surface.state().get(KEY_DISPLAY_TYPE), "Pan");
    let sent = main.sent();
    assert!(sent
        .iter()
        .any(|m| m.len() == 3 && m[0] == 0x90 && m[1] == 84 && m[2] == 127));
    // Mode change alone re-sends both rows even with identical text
    assert_eq!(sent.iter().filter(|p| is_row_packet(p)).count(), 2);

    surface.on_midi(&note_on(84)).unwrap();
    assert_eq!(surface.state().get(KEY_DISPLAY_TYPE), "Fader");
    assert!(main
        .sent()
        .iter()
        .any(|m| m.len() == 3 && m[0] == 0x90 && m[1] == 84 && m[2] == 0));
}

#[test]
fn test_jog_routes_to_active_jog_subpage() {
    let (mut surface, _main, _cc) = test_surface();
    surface.activate().unwrap();

    let nudge_inc = CountingSink::default();
    let nudge_dec = CountingSink::default();
    let scrub_inc = CountingSink::default();
    let scrub_dec = CountingSink::default();
    surface
        .bindings_mut()
        .bind_jog("Nudge", Box::new(nudge_inc.clone()), Box::new(nudge_dec.clone()));
    surface
        .bindings_mut()
        .bind_jog("Scrub", Box::new(scrub_inc.clone()), Box::new(scrub_dec.clone()));

    // Clockwise turn on the default (Nudge) subpage
    surface
        .on_midi(&MidiMessage::ControlChange {
            channel: 0,
            cc: 60,
            value: 32,
        })
        .unwrap();
    assert!(nudge_inc.count() > 0);
    assert_eq!(nudge_dec.count(), 0);
    assert_eq!(scrub_inc.count() + scrub_dec.count(), 0);

    // Wheel push switches the jog area to Scrub
    surface.on_midi(&note_on(101)).unwrap();
    let before = nudge_inc.count();

    // Counter-clockwise turn now drives the scrub decrease command
    surface
        .on_midi(&MidiMessage::ControlChange {
            channel: 0,
            cc: 60,
            value: 96,
        })
        .unwrap();
    assert!(scrub_dec.count() > 0);
    assert_eq!(scrub_inc.count(), 0);
    assert_eq!(nudge_inc.count(), before);
}

#[test]
fn test_jog_center_produces_no_pulses() {
    let (mut surface, _main, _cc) = test_surface();
    surface.activate().unwrap();

    let inc = CountingSink::default();
    let dec = CountingSink::default();
    surface
        .bindings_mut()
        .bind_jog("Nudge", Box::new(inc.clone()), Box::new(dec.clone()));

    surface
        .on_midi(&MidiMessage::ControlChange {
            channel: 0,
            cc: 60,
            value: 0,
        })
        .unwrap();
    assert_eq!(inc.count() + dec.count(), 0);
}

#[test]
fn test_midi_page_fader_bridges_cc() {
    let (mut surface, main, cc) = test_surface();
    surface.activate().unwrap();
    surface.activate_page(PageId::Midi).unwrap();
    main.clear();
    cc.clear();

    surface
        .on_midi(&MidiMessage::PitchBend {
            channel: 0,
            value: 16383,
        })
        .unwrap();

    // Motor fader is held in place by echoing the position
    assert!(main.sent().iter().any(|m| m == &vec![0xE0, 0x7F, 0x7F]));

    // First default assignment is CC 1 (mod wheel), full scale
    assert_eq!(cc.sent(), vec![vec![0xB0, 1, 127]]);

    // The 7-bit value shows up in column 0 of the values row
    let sent = main.sent();
    let row0 = sent
        .iter()
        .find(|p| is_row_packet(p) && p[6] == 0)
        .unwrap();
    assert_eq!(&row_payload(row0)[..3], b"127");
}

#[test]
fn test_midi_page_seeds_assignment_labels() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();
    main.clear();

    surface.activate_page(PageId::Midi).unwrap();

    let sent = main.sent();
    let row1 = sent
        .iter()
        .find(|p| is_row_packet(p) && p[6] == 56)
        .unwrap();
    // Labels are 6 characters wide in 7-character columns
    assert_eq!(&row_payload(row1)[..6], b"Mod wh");
    assert_eq!(&row_payload(row1)[7..13], b"Expres");

    let row0 = sent
        .iter()
        .find(|p| is_row_packet(p) && p[6] == 0)
        .unwrap();
    assert_eq!(&row_payload(row0)[..1], b"?");
}

#[test]
fn test_button_toggles_bound_endpoint() {
    let (mut surface, _main, _cc) = test_surface();
    surface.activate().unwrap();

    let solo = SharedEndpoint::new(0.0);
    surface.bindings_mut().bind(
        PageId::Mixer,
        None,
        ControlRef::Button(8),
        Box::new(solo.clone()),
    );

    surface.on_midi(&note_on(8)).unwrap();
    assert_eq!(solo.get(), 1.0);
    surface.on_midi(&note_on(8)).unwrap();
    assert_eq!(solo.get(), 0.0);
}

#[test]
fn test_fader_drives_bound_endpoint() {
    let (mut surface, _main, _cc) = test_surface();
    surface.activate().unwrap();

    let volume = SharedEndpoint::new(0.0);
    surface.bindings_mut().bind(
        PageId::Mixer,
        None,
        ControlRef::Fader(2),
        Box::new(volume.clone()),
    );

    surface
        .on_midi(&MidiMessage::PitchBend {
            channel: 2,
            value: 16383,
        })
        .unwrap();
    assert!((volume.get() - 1.0).abs() < 1e-6);
}

#[test]
fn test_led_value_feedback() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();
    main.clear();

    surface
        .on_host_event(&HostEvent::LedValue {
            note: 93,
            value: 1.0,
        })
        .unwrap();
    assert_eq!(main.sent(), vec![vec![0x90, 93, 127]]);

    // Repeated value: no traffic
    main.clear();
    surface
        .on_host_event(&HostEvent::LedValue {
            note: 93,
            value: 1.0,
        })
        .unwrap();
    assert!(main.sent().is_empty());
}

#[test]
fn test_encoder_title_send_slot_prefix_stripped() {
    let (mut surface, main, _cc) = test_surface();
    surface.activate().unwrap();
    surface.on_midi(&note_on(49)).unwrap(); // SelectedTrack / SendsQC
    main.clear();

    surface
        .on_host_event(&HostEvent::EncoderTitle {
            index: 0,
            object_title: "S1Reverb".to_string(),
            value_title: String::new(),
        })
        .unwrap();

    // Pan rows are not live under Fader mode; read the state directly
    let scope = surface.state().scope();
    let key = scope.key(crate::state::Section::Pan, crate::state::Field::ValueTitles);
    assert_eq!(&surface.state().get(&key)[..6], "Reverb");
}

#[test]
fn test_encoder_title_empty_send_slot_shows_none() {
    let (mut surface, _main, _cc) = test_surface();
    surface.activate().unwrap();
    surface.on_midi(&note_on(49)).unwrap();

    surface
        .on_host_event(&HostEvent::EncoderTitle {
            index: 2,
            object_title: "S3".to_string(),
            value_title: String::new(),
        })
        .unwrap();

    let scope = surface.state().scope();
    let key = scope.key(crate::state::Section::Pan, crate::state::Field::ValueTitles);
    assert_eq!(&surface.state().get(&key)[14..20], "None  ");
}
