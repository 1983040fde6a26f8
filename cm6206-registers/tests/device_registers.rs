//! Integration tests against a real CM6206 sound card.
//!
//! These tests require a card to be connected and accessible.
//! Run with: cargo test -p cm6206-registers --test device_registers -- --ignored --nocapture

use cm6206_registers::{Cm6206, RegisterIndex, WriteRequest};
use cm6206_transport::{HidDiscovery, HidTransport, MarkerPolicy};

fn open_card() -> Cm6206<HidTransport> {
    let transport = HidDiscovery::new()
        .expect("hidapi init failed")
        .open_first()
        .expect("No CM6206 found - plug in a supported sound card");
    Cm6206::new(transport).expect("register map")
}

/// Every reply carries the read marker, so strict decoding succeeds
#[test]
#[ignore] // requires hardware
fn read_all_strict() {
    let mut card = open_card();
    assert_eq!(card.marker_policy(), MarkerPolicy::Strict);
    let values = card.read_all().expect("read_all");
    for (i, value) in values.iter().enumerate() {
        println!("REG{i} = 0x{value:04X}");
    }
}

/// Rewriting the current value of REG0 leaves the card unchanged
#[test]
#[ignore] // requires hardware
fn rewrite_current_value() {
    let mut card = open_card();
    let before = card.read_all().expect("read_all");
    let index = RegisterIndex::new(0).unwrap();

    let sent = card
        .write_masked(WriteRequest::new(index, before[0]), before[0])
        .expect("write");
    assert_eq!(sent, before[0]);

    let after = card.read_all().expect("read_all");
    assert_eq!(after[0], before[0]);
}
