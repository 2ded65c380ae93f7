//! Generate test vectors for TypeScript interop testing.
//!
//! Run with: cargo run --package protocol --example test_vectors

use protocol::messages::*;
use protocol::ErrorKind;
use serde::Serialize;

fn main() {
    // Test vector 1: Device snapshot
    let device = DeviceDescriptor {
        serial: "emulator-5554".to_string(),
        model: "Pixel 7".to_string(),
        manufacturer: "Google".to_string(),
        android_version: "14".to_string(),
        state: DeviceState::Device,
    };
    print_test_vector("device", &device);

    // Test vector 2: Device with unreadable properties
    let degraded = DeviceDescriptor {
        serial: "R58M123ABC".to_string(),
        model: "Unknown".to_string(),
        manufacturer: "Unknown".to_string(),
        android_version: "Unknown".to_string(),
        state: DeviceState::Device,
    };
    print_test_vector("device_degraded", &degraded);

    // Test vector 3: Local listing entry (carries modified, no permissions)
    let local_entry =
        FileEntry::new("notes.txt", "/home/user/notes.txt", false, 42).with_modified(1704067200);
    print_test_vector("local_entry", &local_entry);

    // Test vector 4: Remote listing entry (carries permissions, no modified)
    let remote_entry = FileEntry::new("DCIM", "/sdcard/DCIM", true, 0)
        .with_permissions("drwxr-xr-x");
    print_test_vector("remote_entry", &remote_entry);

    // Test vector 5: Listing envelope, sorted on construction
    let listing = DirectoryListing::new(
        "/sdcard",
        "/",
        vec![
            FileEntry::new("photo.jpg", "/sdcard/photo.jpg", false, 1234)
                .with_permissions("-rw-r--r--"),
            FileEntry::new("Pictures", "/sdcard/Pictures", true, 0)
                .with_permissions("drwxr-xr-x"),
        ],
    );
    print_test_vector("listing", &listing);

    // Test vector 6: Transfer request, both directions
    let push = TransferRequest {
        source_path: "/home/user/song.mp3".to_string(),
        destination_path: "/sdcard/Music/song.mp3".to_string(),
        device_serial: "emulator-5554".to_string(),
        direction: TransferDirection::ToRemote,
    };
    print_test_vector("transfer_push", &push);

    let pull = TransferRequest {
        source_path: "/sdcard/DCIM/photo.jpg".to_string(),
        destination_path: "/home/user/photo.jpg".to_string(),
        device_serial: "emulator-5554".to_string(),
        direction: TransferDirection::ToLocal,
    };
    print_test_vector("transfer_pull", &pull);

    // Test vector 7: Transfer outcome
    let outcome = TransferOutcome::completed("/sdcard/Music/song.mp3");
    print_test_vector("transfer_outcome", &outcome);

    // Test vector 8: Presence broadcast
    let update = PresenceUpdate::device_list(vec![DeviceDescriptor {
        serial: "emulator-5554".to_string(),
        model: "Pixel 7".to_string(),
        manufacturer: "Google".to_string(),
        android_version: "14".to_string(),
        state: DeviceState::Device,
    }]);
    print_test_vector("presence_update", &update);

    // Test vector 9: Error kinds
    let kinds = [
        ErrorKind::PathNotFound,
        ErrorKind::IsADirectory,
        ErrorKind::DeviceNotFound,
        ErrorKind::MissingDeviceSerial,
        ErrorKind::SourceNotFound,
        ErrorKind::DirectoryNotSupported,
        ErrorKind::RemoteListing,
        ErrorKind::Transfer,
        ErrorKind::Io,
    ];
    print_test_vector("error_kinds", &kinds);
}

fn print_test_vector<T: Serialize>(name: &str, value: &T) {
    let json = serde_json::to_string(value).expect("serialization failed");
    println!("export const {} = {};", name, json);
}
