//! Integration tests for register batch operations against a simulated device.

use cm6206_registers::{
    Cm6206, RegisterError, RegisterIndex, WriteRequest, FACTORY_DEFAULTS, INIT_PROFILE,
};
use cm6206_transport::mock::MockDevice;
use cm6206_transport::{MarkerPolicy, ParsedRequest, TransportError};

fn open(device: MockDevice) -> Cm6206<MockDevice> {
    Cm6206::new(device).expect("CM6206 map is valid")
}

#[test]
fn init_profile_writes_in_order_then_reads_back() {
    let mut chip = open(MockDevice::new(FACTORY_DEFAULTS.to_vec()));
    let values = chip
        .apply_bulk_defaults(&[0x2004, 0x3000, 0xF800, 0x147F, 0x0000, 0x3000])
        .unwrap();
    assert_eq!(values, INIT_PROFILE);

    let requests = chip.transport().requests();
    assert_eq!(requests.len(), 12);
    for (i, req) in requests[..6].iter().enumerate() {
        assert_eq!(
            *req,
            ParsedRequest::Write {
                register: i as u8,
                value: INIT_PROFILE[i]
            }
        );
    }
    for (i, req) in requests[6..].iter().enumerate() {
        assert_eq!(*req, ParsedRequest::Read { register: i as u8 });
    }
}

#[test]
fn init_profile_stops_at_failed_write() {
    let device = MockDevice::new(FACTORY_DEFAULTS.to_vec()).fail_write_to(2);
    let mut chip = open(device);

    let err = chip.apply_bulk_defaults(&INIT_PROFILE).unwrap_err();
    match err {
        RegisterError::BulkWrite { index, source } => {
            assert_eq!(index, 2);
            assert!(matches!(source, TransportError::WriteShort { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    let device = chip.into_transport();
    // Registers 0 and 1 stay written, 2 was rejected, 3..5 never attempted
    assert_eq!(device.write_targets(), vec![0, 1, 2]);
    assert!(device.read_targets().is_empty());
    assert_eq!(device.registers()[0], 0x2004);
    assert_eq!(device.registers()[1], 0x3000);
    assert_eq!(device.registers()[2], FACTORY_DEFAULTS[2]);
}

#[test]
fn masked_write_preserves_other_bits() {
    let mut chip = open(MockDevice::new(FACTORY_DEFAULTS.to_vec()));
    let current = chip.read_all().unwrap();

    // DMA master to S/PDIF: bit 15 of register 0
    let index = RegisterIndex::new(0).unwrap();
    let request = WriteRequest::new(index, 0x8000).with_mask(0x8000);
    let sent = chip.write_masked(request, current[0]).unwrap();
    assert_eq!(sent, 0xA000);

    let after = chip.read_all().unwrap();
    assert_eq!(after[0], 0xA000);
    assert_eq!(&after[1..], &current[1..]);
}

#[test]
fn reread_reflects_read_only_bits() {
    // Bit 3 of register 1 does not take writes
    let device = MockDevice::new(FACTORY_DEFAULTS.to_vec()).with_read_only_bits(1, 0x0008);
    let mut chip = open(device);

    let index = RegisterIndex::new(1).unwrap();
    let sent = chip
        .write_masked(WriteRequest::new(index, 0xFFFF).with_mask(0x000F), 0x3002)
        .unwrap();
    assert_eq!(sent, 0x300F);

    let after = chip.read_all().unwrap();
    assert_eq!(after[1], 0x3007);
}

#[test]
fn strict_policy_rejects_unmarked_reply() {
    let device = MockDevice::new(FACTORY_DEFAULTS.to_vec()).with_status_byte(0x00);
    let mut chip = open(device);
    let err = chip.read_all().unwrap_err();
    assert!(matches!(
        err.transport(),
        Some(TransportError::Framing { status: 0x00 })
    ));
}

#[test]
fn lenient_policy_decodes_unmarked_reply() {
    let device = MockDevice::new(FACTORY_DEFAULTS.to_vec()).with_status_byte(0x00);
    let mut chip = open(device).with_marker_policy(MarkerPolicy::Lenient);
    assert_eq!(chip.read_all().unwrap(), FACTORY_DEFAULTS);
}
